//! Core entities: `User` (C2's projection), `Wallet`, and the immutable
//! ledger `Transaction`. See distilled spec §3 for the invariants these
//! types exist to uphold.

pub mod query;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use query::{ListQuery, SortKey};
pub use transaction::{Movement, Transaction, TransactionDraft, TransactionKind};
pub use user::User;
pub use wallet::{Wallet, WalletPatch};

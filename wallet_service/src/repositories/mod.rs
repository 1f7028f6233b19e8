pub mod ledger_repository;
pub mod movement_repository;
pub mod sweep_repository;
pub mod user_repository;
pub mod wallet_repository;

pub use ledger_repository::PgLedgerStore;
pub use movement_repository::PgMovementStore;
pub use sweep_repository::PgSweepStore;
pub use user_repository::PgUserStore;
pub use wallet_repository::PgWalletStore;

use wallet_core::domain::ListQuery;

/// Shared `ORDER BY`/`LIMIT`/`OFFSET`/filter clause builder, grounded on the
/// original `getTxQuery` dynamic query assembly
/// (`examples/original_source/internal/database/transaction.go`).
pub(crate) fn push_list_clause(
    sql: &mut String,
    args_len: &mut i64,
    filter_columns: &str,
    query: &ListQuery,
    sort_column: &str,
) {
    if !query.filter.is_empty() {
        *args_len += 1;
        sql.push_str(&format!(
            " AND concat_ws(' ', {filter_columns}) ILIKE ${}",
            *args_len
        ));
    }

    sql.push_str(&format!(" ORDER BY {sort_column}"));
    if query.descending {
        sql.push_str(" DESC");
    }

    *args_len += 1;
    sql.push_str(&format!(" LIMIT ${}", *args_len));

    if query.offset > 0 {
        *args_len += 1;
        sql.push_str(&format!(" OFFSET ${}", *args_len));
    }
}

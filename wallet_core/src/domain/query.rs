//! The filter/sort/paginate surface shared by `WalletStore::list` (§4.4.1)
//! and `LedgerStore::list_tx` (§4.5).

/// Columns a list endpoint is willing to sort by. Unknown sort keys fall
/// back to `Id`, per §4.4.1 ("unknown key falls back to `id`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Currency,
    Balance,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// Parses a wallet-list `sorting` query param. Ledger listing uses a
    /// narrower column set (§4.5); see `SortKey::for_ledger`.
    pub fn for_wallets(raw: &str) -> Self {
        match raw {
            "id" => SortKey::Id,
            "name" => SortKey::Name,
            "currency" => SortKey::Currency,
            "balance" => SortKey::Balance,
            "created_at" => SortKey::CreatedAt,
            "updated_at" => SortKey::UpdatedAt,
            _ => SortKey::Id,
        }
    }

    /// Ledger columns are `{id, name, currency, money, created_at}` (§4.5);
    /// `name` there is the transaction kind, `balance`/`updated_at` don't
    /// exist on a ledger row and also fall back to `id`.
    pub fn for_ledger(raw: &str) -> Self {
        match raw {
            "id" => SortKey::Id,
            "name" => SortKey::Name,
            "currency" => SortKey::Currency,
            "money" => SortKey::Balance,
            "created_at" => SortKey::CreatedAt,
            _ => SortKey::Id,
        }
    }

    /// Column name for a wallet-table query. `Balance` maps to the `balance`
    /// column; ledger queries must use `ledger_column` instead, since the
    /// same variant maps to `money` there.
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Currency => "currency",
            SortKey::Balance => "balance",
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
        }
    }

    /// Column name for a ledger-table query (§4.5's `{id, name, currency,
    /// money, created_at}`); `UpdatedAt` cannot occur here since
    /// `for_ledger` never produces it.
    pub fn ledger_column(self) -> &'static str {
        match self {
            SortKey::Balance => "money",
            other => other.column(),
        }
    }
}

pub const DEFAULT_LIMIT: i64 = 25;

/// `query = {sorting, descending, filter, limit, offset}` (§4.4.1).
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub sorting: String,
    pub descending: bool,
    pub filter: String,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            sorting: String::new(),
            descending: false,
            filter: String::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// `limit` default = 25 when omitted or 0 (§4.4.1).
    pub fn normalized_limit(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }
}

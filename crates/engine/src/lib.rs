//! Personal finance engine: transactions, shared-expense groups and the
//! views computed over them, persisted to a key-value table.

pub use category::{Category, TransactionKind};
pub use currency::CurrencyFormat;
pub use error::EngineError;
pub use group_expenses::{GroupExpense, NewGroupExpense};
pub use groups::{Group, GroupMember, NewGroup, OWNER_MEMBER_ID, OWNER_MEMBER_NAME};
pub use money::Money;
pub use snapshot::Snapshot;
pub use storage::{KEY_CURRENCY, KEY_GROUP_EXPENSES, KEY_GROUPS, KEY_TRANSACTIONS};
pub use store::{Store, StoreBuilder};
pub use transactions::{NewTransaction, Transaction};

mod category;
mod currency;
mod error;
pub mod format;
mod group_expenses;
mod groups;
mod money;
mod snapshot;
mod storage;
mod store;
mod transactions;
mod util;
pub mod views;

pub type ResultEngine<T> = Result<T, EngineError>;

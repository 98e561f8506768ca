//! Durable key-value storage of the snapshot.
//!
//! Each collection lives in its own row of `kv_entries`, keyed by collection
//! name, with a JSON payload. Rows are written together inside one database
//! transaction, so a reader never sees half of a mutation.

use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, TransactionTrait, entity::prelude::*,
};
use serde::de::DeserializeOwned;

use crate::{ResultEngine, Snapshot};

pub const KEY_TRANSACTIONS: &str = "transactions";
pub const KEY_GROUPS: &str = "groups";
pub const KEY_GROUP_EXPENSES: &str = "groupExpenses";
pub const KEY_CURRENCY: &str = "currency";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "kv_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

async fn read_entry<C: ConnectionTrait>(db: &C, name: &str) -> ResultEngine<Option<String>> {
    Ok(Entity::find_by_id(name.to_string())
        .one(db)
        .await?
        .map(|model| model.payload))
}

/// Absent and malformed entries both yield `None`; the latter is logged.
fn decode<T: DeserializeOwned>(name: &str, payload: Option<String>) -> Option<T> {
    let payload = payload?;
    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring malformed persisted `{name}` entry: {err}");
            None
        }
    }
}

/// Seeds each collection of `fallback` from storage when a parseable entry
/// exists. The persisted currency is never applied: `fallback.currency` is
/// the pinned startup value.
pub(crate) async fn load_snapshot(
    db: &DatabaseConnection,
    fallback: Snapshot,
) -> ResultEngine<Snapshot> {
    let mut snapshot = fallback;

    if let Some(transactions) = decode(KEY_TRANSACTIONS, read_entry(db, KEY_TRANSACTIONS).await?)
    {
        snapshot.transactions = transactions;
    }
    if let Some(groups) = decode(KEY_GROUPS, read_entry(db, KEY_GROUPS).await?) {
        snapshot.groups = groups;
    }
    if let Some(expenses) = decode(KEY_GROUP_EXPENSES, read_entry(db, KEY_GROUP_EXPENSES).await?)
    {
        snapshot.group_expenses = expenses;
    }
    if read_entry(db, KEY_CURRENCY).await?.is_some() {
        tracing::debug!(
            "persisted currency ignored, starting with {}",
            snapshot.currency
        );
    }

    Ok(snapshot)
}

/// Writes all four collections in one database transaction, updating rows
/// that already exist.
pub(crate) async fn save_snapshot(
    db: &DatabaseConnection,
    snapshot: &Snapshot,
) -> ResultEngine<()> {
    let entries = [
        (KEY_TRANSACTIONS, serde_json::to_string(&snapshot.transactions)?),
        (KEY_GROUPS, serde_json::to_string(&snapshot.groups)?),
        (
            KEY_GROUP_EXPENSES,
            serde_json::to_string(&snapshot.group_expenses)?,
        ),
        (KEY_CURRENCY, serde_json::to_string(&snapshot.currency)?),
    ];

    let db_tx = db.begin().await?;
    for (name, payload) in entries {
        match Entity::find_by_id(name.to_string()).one(&db_tx).await? {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.payload = ActiveValue::Set(payload);
                active.update(&db_tx).await?;
            }
            None => {
                ActiveModel {
                    name: ActiveValue::Set(name.to_string()),
                    payload: ActiveValue::Set(payload),
                }
                .insert(&db_tx)
                .await?;
            }
        }
    }
    db_tx.commit().await?;

    Ok(())
}

//! The state store: single owner of every record.
//!
//! Reads borrow from the current [`Snapshot`]. Mutations build the next
//! snapshot off to the side, persist it, and only then make it current, so a
//! failed write leaves both memory and storage untouched.

use sea_orm::DatabaseConnection;

use crate::{
    CurrencyFormat, EngineError, Group, GroupExpense, ResultEngine, Snapshot, Transaction,
    storage,
};

mod group_expenses;
mod groups;
mod transactions;

#[derive(Debug)]
pub struct Store {
    snapshot: Snapshot,
    database: DatabaseConnection,
}

impl Store {
    /// Return a builder for `Store`. Help to build the struct.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    pub fn groups(&self) -> &[Group] {
        &self.snapshot.groups
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.snapshot.group(id)
    }

    pub fn group_expenses(&self) -> &[GroupExpense] {
        &self.snapshot.group_expenses
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.snapshot.currency
    }

    /// Overwrites the currency setting.
    ///
    /// The value is persisted but does not survive a restart: the store
    /// always starts with the currency given to its builder. More than
    /// [`CurrencyFormat::MAX_DECIMAL_DIGITS`] fraction digits is rejected with
    /// [`EngineError::InvalidAmount`].
    pub async fn set_currency(&mut self, currency: CurrencyFormat) -> ResultEngine<()> {
        currency.validate()?;

        let mut next = self.snapshot.clone();
        next.currency = currency;
        self.commit(next).await?;
        tracing::debug!("currency set to {}", self.snapshot.currency);
        Ok(())
    }

    async fn commit(&mut self, next: Snapshot) -> ResultEngine<()> {
        storage::save_snapshot(&self.database, &next).await?;
        self.snapshot = next;
        Ok(())
    }
}

/// The builder for `Store`
#[derive(Default)]
pub struct StoreBuilder {
    database: Option<DatabaseConnection>,
    currency: Option<CurrencyFormat>,
    seed: Option<Snapshot>,
}

impl StoreBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> StoreBuilder {
        self.database = Some(db);
        self
    }

    /// Currency the store starts with, whatever was persisted.
    /// Defaults to [`CurrencyFormat::zar`].
    pub fn currency(mut self, currency: CurrencyFormat) -> StoreBuilder {
        self.currency = Some(currency);
        self
    }

    /// Records used for collections with nothing persisted.
    /// Defaults to [`Snapshot::sample`].
    pub fn seed(mut self, snapshot: Snapshot) -> StoreBuilder {
        self.seed = Some(snapshot);
        self
    }

    /// Construct `Store`, loading whatever the database holds.
    pub async fn build(self) -> ResultEngine<Store> {
        let database = self.database.ok_or(EngineError::MissingDatabase)?;

        let mut fallback = self.seed.unwrap_or_else(Snapshot::sample);
        fallback.currency = self.currency.unwrap_or_default();
        fallback.currency.validate()?;

        let snapshot = storage::load_snapshot(&database, fallback).await?;
        tracing::info!(
            "store loaded: {} transactions, {} groups, {} group expenses",
            snapshot.transactions.len(),
            snapshot.groups.len(),
            snapshot.group_expenses.len()
        );

        Ok(Store { snapshot, database })
    }
}

use crate::{
    NewTransaction, ResultEngine, Transaction,
    util::{new_id, validate_amount},
};

use super::Store;

impl Store {
    /// Records a transaction under a freshly generated id.
    pub async fn add_transaction(&mut self, input: NewTransaction) -> ResultEngine<Transaction> {
        validate_amount(input.amount, "transaction")?;

        let id = new_id(|id| self.snapshot.transaction(id).is_some());
        let transaction = input.with_id(id);

        let mut next = self.snapshot.clone();
        next.transactions.push(transaction.clone());
        self.commit(next).await?;

        tracing::debug!("added {} transaction {}", transaction.kind, transaction.id);
        Ok(transaction)
    }

    /// Deletes a transaction. Returns `false` when no transaction had `id`.
    pub async fn delete_transaction(&mut self, id: &str) -> ResultEngine<bool> {
        let mut next = self.snapshot.clone();
        next.transactions.retain(|t| t.id != id);
        let removed = next.transactions.len() != self.snapshot.transactions.len();
        self.commit(next).await?;

        if removed {
            tracing::debug!("deleted transaction {id}");
        }
        Ok(removed)
    }
}

use crate::{EngineError, GroupExpense, NewGroupExpense, ResultEngine, util::new_id};

use super::Store;

impl Store {
    /// Records an expense inside an existing group.
    ///
    /// The payer and everyone in the split must be members of that group.
    pub async fn add_group_expense(
        &mut self,
        input: NewGroupExpense,
    ) -> ResultEngine<GroupExpense> {
        let group = self
            .snapshot
            .group(&input.group_id)
            .ok_or_else(|| EngineError::KeyNotFound(input.group_id.clone()))?;
        let input = input.validate(group, &self.snapshot.currency)?;

        let id = new_id(|id| self.snapshot.group_expense(id).is_some());
        let expense = input.with_id(id);

        let mut next = self.snapshot.clone();
        next.group_expenses.push(expense.clone());
        self.commit(next).await?;

        tracing::debug!(
            "added group expense {} split {} ways",
            expense.id,
            expense.split_between.len()
        );
        Ok(expense)
    }

    /// Deletes a group expense. Returns `false` when no expense had `id`.
    pub async fn delete_group_expense(&mut self, id: &str) -> ResultEngine<bool> {
        let mut next = self.snapshot.clone();
        next.group_expenses.retain(|e| e.id != id);
        let removed = next.group_expenses.len() != self.snapshot.group_expenses.len();
        self.commit(next).await?;

        if removed {
            tracing::debug!("deleted group expense {id}");
        }
        Ok(removed)
    }
}

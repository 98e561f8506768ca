use crate::{Group, NewGroup, ResultEngine, util::new_id, views};

use super::Store;

impl Store {
    /// Creates a group.
    ///
    /// The group needs a name, at least two members, unique member ids, and
    /// the owner member among them.
    pub async fn add_group(&mut self, input: NewGroup) -> ResultEngine<Group> {
        let input = input.validate()?;

        let id = new_id(|id| self.snapshot.group(id).is_some());
        let group = input.with_id(id);

        let mut next = self.snapshot.clone();
        next.groups.push(group.clone());
        self.commit(next).await?;

        tracing::debug!("added group {} ({})", group.name, group.id);
        Ok(group)
    }

    /// Deletes a group together with its expenses.
    ///
    /// Returns `false` when no group had `id`.
    pub async fn delete_group(&mut self, id: &str) -> ResultEngine<bool> {
        let mut next = self.snapshot.clone();
        let removed = next
            .groups
            .iter()
            .position(|g| g.id == id)
            .map(|index| next.groups.remove(index));

        // The group is captured before removal so legacy expenses can still be
        // matched against its members.
        let mut cascaded = 0;
        if let Some(group) = &removed {
            let before = next.group_expenses.len();
            next.group_expenses
                .retain(|expense| !views::belongs_to(group, expense));
            cascaded = before - next.group_expenses.len();
        }

        self.commit(next).await?;

        if removed.is_some() {
            tracing::debug!("deleted group {id} and {cascaded} of its expenses");
        }
        Ok(removed.is_some())
    }
}

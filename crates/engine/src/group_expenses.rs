//! Expenses shared inside a group.
//!
//! An expense is paid by one member and split between a subset of the group's
//! members, equally unless explicit `shares` are given. New expenses always
//! carry the owning `group_id`; records persisted before that field existed
//! deserialize with `group_id: None` and are attributed through their payer
//! (see [`views::group_expenses`](crate::views::group_expenses)).

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Category, CurrencyFormat, EngineError, Group, ResultEngine,
    util::validate_amount,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExpense {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub paid_by: String,
    pub split_between: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Input for [`Store::add_group_expense`](crate::Store::add_group_expense).
#[derive(Clone, Debug, PartialEq)]
pub struct NewGroupExpense {
    pub group_id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub paid_by: String,
    pub split_between: Vec<String>,
    pub shares: Option<BTreeMap<String, f64>>,
}

impl NewGroupExpense {
    /// Checks every reference against `group` and the amounts against
    /// `currency` precision.
    ///
    /// Returns the input with a trimmed description and `split_between`
    /// de-duplicated (first occurrence wins).
    pub(crate) fn validate(
        mut self,
        group: &Group,
        currency: &CurrencyFormat,
    ) -> ResultEngine<Self> {
        validate_amount(self.amount, "expense")?;
        self.description = self.description.trim().to_string();

        if !group.has_member(&self.paid_by) {
            return Err(EngineError::InvalidMember(format!(
                "payer \"{}\" is not a member of group '{}'",
                self.paid_by, group.name
            )));
        }

        let mut seen = HashSet::new();
        self.split_between.retain(|id| seen.insert(id.clone()));
        if self.split_between.is_empty() {
            return Err(EngineError::InvalidMember(
                "expense must be split between at least one member".to_string(),
            ));
        }
        if let Some(stranger) = self.split_between.iter().find(|id| !group.has_member(id)) {
            return Err(EngineError::InvalidMember(format!(
                "\"{stranger}\" is not a member of group '{}'",
                group.name
            )));
        }

        if let Some(shares) = &self.shares {
            validate_shares(shares, &self.split_between, self.amount, currency)?;
        }

        Ok(self)
    }

    pub(crate) fn with_id(self, id: String) -> GroupExpense {
        GroupExpense {
            id,
            amount: self.amount,
            description: self.description,
            date: self.date,
            category: self.category,
            paid_by: self.paid_by,
            split_between: self.split_between,
            shares: self.shares,
            group_id: Some(self.group_id),
        }
    }
}

/// Explicit shares must name exactly the split members, be non-negative and
/// add up to the amount (within half a minor unit).
fn validate_shares(
    shares: &BTreeMap<String, f64>,
    split_between: &[String],
    amount: f64,
    currency: &CurrencyFormat,
) -> ResultEngine<()> {
    if shares.len() != split_between.len()
        || split_between.iter().any(|id| !shares.contains_key(id))
    {
        return Err(EngineError::InvalidMember(
            "shares must name exactly the members the expense is split between".to_string(),
        ));
    }
    if shares.values().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(EngineError::InvalidAmount(
            "shares must be finite and >= 0".to_string(),
        ));
    }
    let total: f64 = shares.values().sum();
    if (total - amount).abs() > currency.half_minor_unit() {
        return Err(EngineError::InvalidAmount(format!(
            "shares add up to {total}, expected {amount}"
        )));
    }
    Ok(())
}

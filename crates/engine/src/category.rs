//! Closed category vocabulary and transaction kinds.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Nature of a transaction or group expense.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Food,
    Rent,
    Utilities,
    Transportation,
    Entertainment,
    Shopping,
    Health,
    Education,
    Salary,
    Investment,
    Gift,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Self::Food,
        Self::Rent,
        Self::Utilities,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Health,
        Self::Education,
        Self::Salary,
        Self::Investment,
        Self::Gift,
        Self::Other,
    ];

    /// Categories offered when recording income.
    pub const INCOME: [Category; 4] = [Self::Salary, Self::Investment, Self::Gift, Self::Other];

    /// Categories offered when splitting a group expense.
    pub const GROUP_EXPENSE: [Category; 9] = [
        Self::Food,
        Self::Rent,
        Self::Utilities,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Health,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Salary => "Salary",
            Self::Investment => "Investment",
            Self::Gift => "Gift",
            Self::Other => "Other",
        }
    }

    /// Categories a form should offer for `kind`.
    ///
    /// Expenses get everything except `Salary` and `Investment`.
    pub fn for_kind(kind: TransactionKind) -> Vec<Category> {
        match kind {
            TransactionKind::Income => Self::INCOME.to_vec(),
            TransactionKind::Expense => Self::ALL
                .into_iter()
                .filter(|c| !matches!(c, Self::Salary | Self::Investment))
                .collect(),
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> ResultEngine<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::InvalidName(format!("unknown category: {trimmed}")))
    }
}

impl core::str::FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Whether a transaction brings money in or takes it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidName(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense event. Once recorded it is
//! never edited, only deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Category, TransactionKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Input for [`Store::add_transaction`](crate::Store::add_transaction): a
/// transaction without its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub(crate) fn with_id(self, id: String) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            description: self.description,
            date: self.date,
            category: self.category,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stored_under_type() {
        let json = r#"{
            "id": "2",
            "amount": 800,
            "description": "Rent",
            "date": "2023-05-02",
            "category": "Rent",
            "type": "expense"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert!(tx.is_expense());
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2023, 5, 2).unwrap());
        assert_eq!(tx.amount, 800.0);

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["type"], "expense");
        assert_eq!(back["date"], "2023-05-02");
        assert!(back.get("kind").is_none());
    }
}

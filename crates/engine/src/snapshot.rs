//! The complete state of the application at one point in time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Category, CurrencyFormat, Group, GroupExpense, GroupMember, Transaction, TransactionKind,
};

/// All four collections, persisted and reloaded as one unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub groups: Vec<Group>,
    pub group_expenses: Vec<GroupExpense>,
    pub currency: CurrencyFormat,
}

impl Snapshot {
    /// Demo data a fresh install starts with: five transactions (income
    /// 2300, expenses 970), the "Apartment" group of three and two shared
    /// utility bills.
    pub fn sample() -> Self {
        let transactions = vec![
            sample_tx(
                "1",
                2000.0,
                "Salary",
                (2023, 5, 1),
                Category::Salary,
                TransactionKind::Income,
            ),
            sample_tx(
                "2",
                800.0,
                "Rent",
                (2023, 5, 2),
                Category::Rent,
                TransactionKind::Expense,
            ),
            sample_tx(
                "3",
                120.0,
                "Groceries",
                (2023, 5, 3),
                Category::Food,
                TransactionKind::Expense,
            ),
            sample_tx(
                "4",
                50.0,
                "Electric bill",
                (2023, 5, 4),
                Category::Utilities,
                TransactionKind::Expense,
            ),
            sample_tx(
                "5",
                300.0,
                "Freelance work",
                (2023, 5, 5),
                Category::Other,
                TransactionKind::Income,
            ),
        ];

        let groups = vec![Group {
            id: "1".to_string(),
            name: "Apartment".to_string(),
            members: vec![
                GroupMember::owner(),
                GroupMember::from_parts("2", "Alex", Some("A")),
                GroupMember::from_parts("3", "Sam", Some("S")),
            ],
        }];

        let everyone = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let group_expenses = vec![
            GroupExpense {
                id: "1".to_string(),
                amount: 150.0,
                description: "Utilities".to_string(),
                date: date(2023, 5, 1),
                category: Category::Utilities,
                paid_by: "1".to_string(),
                split_between: everyone.clone(),
                shares: None,
                group_id: Some("1".to_string()),
            },
            GroupExpense {
                id: "2".to_string(),
                amount: 90.0,
                description: "Internet".to_string(),
                date: date(2023, 5, 2),
                category: Category::Utilities,
                paid_by: "2".to_string(),
                split_between: everyone,
                shares: None,
                group_id: Some("1".to_string()),
            },
        ];

        Self {
            transactions,
            groups,
            group_expenses,
            currency: CurrencyFormat::default(),
        }
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_expense(&self, id: &str) -> Option<&GroupExpense> {
        self.group_expenses.iter().find(|e| e.id == id)
    }
}

fn sample_tx(
    id: &str,
    amount: f64,
    description: &str,
    (y, m, d): (i32, u32, u32),
    category: Category,
    kind: TransactionKind,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        description: description.to_string(),
        date: date(y, m, d),
        category,
        kind,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

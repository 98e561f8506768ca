//! Derived views over a snapshot.
//!
//! Every function here is pure: it takes a slice of the current records and
//! recomputes its answer from scratch. Nothing is cached.

use std::str::FromStr;

use crate::{
    Category, EngineError, Group, GroupExpense, Transaction, TransactionKind, util::search_key,
};

/// Label shown for a payer id that does not resolve to a group member.
pub const UNKNOWN_MEMBER: &str = "Unknown";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Income total, expense total and `balance = income - expense`.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expense), t| match t.kind {
                TransactionKind::Income => (income + t.amount, expense),
                TransactionKind::Expense => (income, expense + t.amount),
            });
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    /// Fraction of all expenses, in `0.0..=1.0`.
    pub share: f64,
}

/// Expense totals per category, in order of first appearance.
///
/// Categories without expenses are left out rather than reported as zero.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        match out.iter_mut().find(|c| c.category == t.category) {
            Some(entry) => entry.total += t.amount,
            None => out.push(CategoryTotal {
                category: t.category,
                total: t.amount,
                share: 0.0,
            }),
        }
    }

    let grand_total: f64 = out.iter().map(|c| c.total).sum();
    if grand_total > 0.0 {
        for entry in &mut out {
            entry.share = entry.total / grand_total;
        }
    }
    out
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Largest first.
    Amount,
}

impl FromStr for SortKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            other => Err(EngineError::InvalidName(format!("unknown sort key: {other}"))),
        }
    }
}

/// What an income or expense list shows.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionFilter {
    pub kind: TransactionKind,
    /// Case-insensitive substring of the description or category name.
    pub search: Option<String>,
    pub category: Option<Category>,
    pub sort: SortKey,
}

impl TransactionFilter {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            search: None,
            category: None,
            sort: SortKey::default(),
        }
    }
}

/// Transactions of one kind, filtered and sorted. Ties keep storage order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(search_key);

    let mut out: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.kind == filter.kind)
        .filter(|t| filter.category.is_none_or(|c| t.category == c))
        .filter(|t| {
            needle.as_deref().is_none_or(|needle| {
                search_key(&t.description).contains(needle)
                    || search_key(t.category.as_str()).contains(needle)
            })
        })
        .collect();

    sort_transactions(&mut out, filter.sort);
    out
}

fn sort_transactions(items: &mut [&Transaction], key: SortKey) {
    match key {
        SortKey::Date => items.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Amount => items.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
    }
}

/// The `limit` most recent transactions of either kind.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut out: Vec<&Transaction> = transactions.iter().collect();
    sort_transactions(&mut out, SortKey::Date);
    out.truncate(limit);
    out
}

/// Distinct categories used by transactions of `kind`, in order of first
/// appearance.
pub fn used_categories(transactions: &[Transaction], kind: TransactionKind) -> Vec<Category> {
    let mut out = Vec::new();
    for t in transactions.iter().filter(|t| t.kind == kind) {
        if !out.contains(&t.category) {
            out.push(t.category);
        }
    }
    out
}

/// Whether `expense` is attributed to `group`.
///
/// Expenses carrying a `group_id` match on it. Legacy expenses without one
/// match when their payer is a member of the group; that rule is ambiguous
/// when two groups share a member id.
pub fn belongs_to(group: &Group, expense: &GroupExpense) -> bool {
    match &expense.group_id {
        Some(group_id) => *group_id == group.id,
        None => group.has_member(&expense.paid_by),
    }
}

/// The expenses of `group`, newest first.
pub fn group_expenses<'a>(group: &Group, expenses: &'a [GroupExpense]) -> Vec<&'a GroupExpense> {
    let mut out: Vec<&GroupExpense> = expenses.iter().filter(|e| belongs_to(group, e)).collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

pub fn expense_count(group: &Group, expenses: &[GroupExpense]) -> usize {
    expenses.iter().filter(|e| belongs_to(group, e)).count()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupSummary<'a> {
    pub group: &'a Group,
    pub expense_count: usize,
}

/// Every group with its number of expenses, for list display.
pub fn group_summaries<'a>(
    groups: &'a [Group],
    expenses: &[GroupExpense],
) -> Vec<GroupSummary<'a>> {
    groups
        .iter()
        .map(|group| GroupSummary {
            group,
            expense_count: expense_count(group, expenses),
        })
        .collect()
}

/// Equal split: `amount / |split_between|`, unrounded.
///
/// Returns `0.0` for an expense split between nobody.
pub fn per_person_share(expense: &GroupExpense) -> f64 {
    match expense.split_between.len() {
        0 => 0.0,
        n => expense.amount / n as f64,
    }
}

/// What each split member owes, in `split_between` order.
///
/// Explicit `shares` take precedence; a split member they do not mention
/// owes nothing.
pub fn split_shares(expense: &GroupExpense) -> Vec<(&str, f64)> {
    match &expense.shares {
        Some(shares) => expense
            .split_between
            .iter()
            .map(|id| (id.as_str(), shares.get(id).copied().unwrap_or(0.0)))
            .collect(),
        None => {
            let each = per_person_share(expense);
            expense
                .split_between
                .iter()
                .map(|id| (id.as_str(), each))
                .collect()
        }
    }
}

/// Name of whoever paid, or [`UNKNOWN_MEMBER`].
pub fn payer_name<'a>(group: &'a Group, expense: &GroupExpense) -> &'a str {
    group
        .member(&expense.paid_by)
        .map_or(UNKNOWN_MEMBER, |m| m.name.as_str())
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberBalance {
    pub member_id: String,
    pub name: String,
    pub paid: f64,
    pub owed: f64,
    /// `paid - owed`: positive means the group owes this member.
    pub net: f64,
}

/// Paid, owed and net position of every member across the group's expenses.
pub fn member_balances(group: &Group, expenses: &[GroupExpense]) -> Vec<MemberBalance> {
    let mine = group_expenses(group, expenses);
    group
        .members
        .iter()
        .map(|member| {
            let paid: f64 = mine
                .iter()
                .filter(|e| e.paid_by == member.id)
                .map(|e| e.amount)
                .sum();
            let owed: f64 = mine
                .iter()
                .flat_map(|e| split_shares(e))
                .filter(|(id, _)| *id == member.id)
                .map(|(_, amount)| amount)
                .sum();
            MemberBalance {
                member_id: member.id.clone(),
                name: member.name.clone(),
                paid,
                owed,
                net: paid - owed,
            }
        })
        .collect()
}

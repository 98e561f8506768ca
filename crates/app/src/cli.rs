use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{Category, TransactionKind, views::SortKey};

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Track income, expenses and shared group costs")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the database connection string.
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Balance, spending by category and recent activity.
    Summary(SummaryArgs),
    /// Income and expense transactions.
    Tx(Tx),
    /// Shared-expense groups.
    Group(Group),
    /// Expenses inside a group.
    Expense(Expense),
    /// Currency used to display amounts.
    Currency(Currency),
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// How many recent transactions to show (defaults to `recent_limit`).
    #[arg(long)]
    pub recent: Option<usize>,
}

#[derive(Debug, Args)]
pub struct Tx {
    #[command(subcommand)]
    pub command: TxCommand,
}

#[derive(Debug, Subcommand)]
pub enum TxCommand {
    Add(TxAddArgs),
    List(TxListArgs),
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct TxAddArgs {
    /// `income` or `expense`.
    #[arg(long)]
    pub kind: TransactionKind,
    /// Amount in major units, `.` or `,` as decimal separator.
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value_t = Category::Other)]
    pub category: Category,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct TxListArgs {
    #[arg(long)]
    pub kind: TransactionKind,
    /// Case-insensitive match on description or category.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    /// `date` (newest first) or `amount` (largest first).
    #[arg(long, default_value = "date")]
    pub sort: SortKey,
}

#[derive(Debug, Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct Group {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a group; you are always a member.
    Add(GroupAddArgs),
    List,
    /// Expenses, shares and balances of one group.
    Show(IdArg),
    /// Delete a group and all of its expenses.
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct GroupAddArgs {
    #[arg(long)]
    pub name: String,
    /// Name of another member; repeat for each.
    #[arg(long = "member", required = true)]
    pub members: Vec<String>,
}

#[derive(Debug, Args)]
pub struct Expense {
    #[command(subcommand)]
    pub command: ExpenseCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    Add(ExpenseAddArgs),
    Delete(IdArg),
}

#[derive(Debug, Args)]
pub struct ExpenseAddArgs {
    /// Group id.
    #[arg(long)]
    pub group: String,
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value_t = Category::Other)]
    pub category: Category,
    /// Member id of the payer (defaults to you).
    #[arg(long)]
    pub paid_by: Option<String>,
    /// Member id to split with; repeat for each. Defaults to every member.
    #[arg(long = "split")]
    pub split: Vec<String>,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct Currency {
    #[command(subcommand)]
    pub command: CurrencyCommand,
}

#[derive(Debug, Subcommand)]
pub enum CurrencyCommand {
    Show,
    /// Change the currency until the next start.
    Set(CurrencySetArgs),
}

#[derive(Debug, Args)]
pub struct CurrencySetArgs {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub symbol: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub plural: String,
    #[arg(long, default_value_t = 2)]
    pub digits: u8,
}

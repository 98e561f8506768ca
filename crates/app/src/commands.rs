//! One handler per subcommand. Handlers write plain text to `out`; logging
//! goes to stderr.

use std::io::Write;

use chrono::{Local, NaiveDate};
use engine::{
    CurrencyFormat, Money, NewGroup, NewGroupExpense, NewTransaction, OWNER_MEMBER_ID, Store,
    Transaction,
    format::{format_amount, format_date},
    views::{self, TransactionFilter},
};

use crate::{
    cli::{
        Command, CurrencyCommand, CurrencySetArgs, ExpenseAddArgs, ExpenseCommand, GroupAddArgs,
        GroupCommand, TxAddArgs, TxCommand, TxListArgs,
    },
    error::Result,
    settings::AppConfig,
};

pub async fn run<W: Write>(
    command: Command,
    store: &mut Store,
    settings: &AppConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Summary(args) => summary(store, args.recent.unwrap_or(settings.recent_limit), out),
        Command::Tx(tx) => match tx.command {
            TxCommand::Add(args) => add_transaction(store, args, out).await,
            TxCommand::List(args) => list_transactions(store, args, out),
            TxCommand::Delete(arg) => {
                let removed = store.delete_transaction(&arg.id).await?;
                report_delete(out, "transaction", &arg.id, removed)
            }
        },
        Command::Group(group) => match group.command {
            GroupCommand::Add(args) => add_group(store, args, out).await,
            GroupCommand::List => list_groups(store, out),
            GroupCommand::Show(arg) => show_group(store, &arg.id, out),
            GroupCommand::Delete(arg) => {
                let removed = store.delete_group(&arg.id).await?;
                report_delete(out, "group", &arg.id, removed)
            }
        },
        Command::Expense(expense) => match expense.command {
            ExpenseCommand::Add(args) => add_group_expense(store, args, out).await,
            ExpenseCommand::Delete(arg) => {
                let removed = store.delete_group_expense(&arg.id).await?;
                report_delete(out, "group expense", &arg.id, removed)
            }
        },
        Command::Currency(currency) => match currency.command {
            CurrencyCommand::Show => show_currency(store.currency(), out),
            CurrencyCommand::Set(args) => set_currency(store, args, out).await,
        },
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_amount(input: &str, currency: &CurrencyFormat) -> Result<f64> {
    Ok(Money::parse(input, currency.decimal_digits)?.to_major())
}

fn report_delete<W: Write>(out: &mut W, what: &str, id: &str, removed: bool) -> Result<()> {
    if removed {
        writeln!(out, "Deleted {what} {id}")?;
    } else {
        writeln!(out, "No {what} with id {id}")?;
    }
    Ok(())
}

fn write_transaction<W: Write>(
    out: &mut W,
    t: &Transaction,
    currency: &CurrencyFormat,
) -> Result<()> {
    let sign = if t.is_income() { '+' } else { '-' };
    writeln!(
        out,
        "  {:<13} {sign}{:>12}  {} ({})  [{}]",
        format_date(t.date),
        format_amount(t.amount, currency),
        t.description,
        t.category,
        t.id
    )?;
    Ok(())
}

fn summary<W: Write>(store: &Store, recent: usize, out: &mut W) -> Result<()> {
    let currency = store.currency();
    let totals = views::totals(store.transactions());

    writeln!(out, "Balance   {}", format_amount(totals.balance, currency))?;
    writeln!(out, "Income    {}", format_amount(totals.income, currency))?;
    writeln!(out, "Expenses  {}", format_amount(totals.expense, currency))?;

    let breakdown = views::category_breakdown(store.transactions());
    if !breakdown.is_empty() {
        writeln!(out)?;
        writeln!(out, "Spending by category")?;
        for entry in breakdown {
            writeln!(
                out,
                "  {:<15} {:>12}  {:>5.1}%",
                entry.category.as_str(),
                format_amount(entry.total, currency),
                entry.share * 100.0
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Recent transactions")?;
    let recent = views::recent_transactions(store.transactions(), recent);
    if recent.is_empty() {
        writeln!(out, "  No transactions yet")?;
    }
    for t in recent {
        write_transaction(out, t, currency)?;
    }
    Ok(())
}

async fn add_transaction<W: Write>(store: &mut Store, args: TxAddArgs, out: &mut W) -> Result<()> {
    let amount = parse_amount(&args.amount, store.currency())?;
    let transaction = store
        .add_transaction(NewTransaction {
            amount,
            description: args.description,
            date: args.date.unwrap_or_else(today),
            category: args.category,
            kind: args.kind,
        })
        .await?;

    writeln!(out, "Added {} {}", transaction.kind, transaction.id)?;
    write_transaction(out, &transaction, store.currency())
}

fn list_transactions<W: Write>(store: &Store, args: TxListArgs, out: &mut W) -> Result<()> {
    let filter = TransactionFilter {
        kind: args.kind,
        search: args.search,
        category: args.category,
        sort: args.sort,
    };
    let matches = views::filter_transactions(store.transactions(), &filter);
    if matches.is_empty() {
        writeln!(out, "No {} transactions found", filter.kind)?;
        return Ok(());
    }

    let total: f64 = matches.iter().map(|t| t.amount).sum();
    for t in &matches {
        write_transaction(out, t, store.currency())?;
    }
    writeln!(
        out,
        "{} transactions, {}",
        matches.len(),
        format_amount(total, store.currency())
    )?;
    Ok(())
}

async fn add_group<W: Write>(store: &mut Store, args: GroupAddArgs, out: &mut W) -> Result<()> {
    let input = args
        .members
        .iter()
        .fold(NewGroup::new(&args.name), |group, name| group.member(name));
    let group = store.add_group(input).await?;

    writeln!(out, "Added group {} ({})", group.name, group.id)?;
    for member in &group.members {
        writeln!(out, "  [{}] {} ({})", member.label(), member.name, member.id)?;
    }
    Ok(())
}

fn list_groups<W: Write>(store: &Store, out: &mut W) -> Result<()> {
    let summaries = views::group_summaries(store.groups(), store.group_expenses());
    if summaries.is_empty() {
        writeln!(out, "No groups yet")?;
    }
    for summary in summaries {
        writeln!(
            out,
            "{}  {}  {} members, {} expenses",
            summary.group.id,
            summary.group.name,
            summary.group.members.len(),
            summary.expense_count
        )?;
    }
    Ok(())
}

fn show_group<W: Write>(store: &Store, id: &str, out: &mut W) -> Result<()> {
    let Some(group) = store.group(id) else {
        writeln!(out, "No group with id {id}")?;
        return Ok(());
    };
    let currency = store.currency();

    writeln!(out, "{} ({})", group.name, group.id)?;
    let names: Vec<String> = group
        .members
        .iter()
        .map(|m| format!("[{}] {} ({})", m.label(), m.name, m.id))
        .collect();
    writeln!(out, "Members: {}", names.join(", "))?;

    writeln!(out)?;
    let expenses = views::group_expenses(group, store.group_expenses());
    if expenses.is_empty() {
        writeln!(out, "No expenses yet")?;
    }
    for expense in &expenses {
        writeln!(
            out,
            "  {:<13} {:>12}  {} ({})  paid by {}  [{}]",
            format_date(expense.date),
            format_amount(expense.amount, currency),
            expense.description,
            expense.category,
            views::payer_name(group, expense),
            expense.id
        )?;
        let shares: Vec<String> = views::split_shares(expense)
            .into_iter()
            .map(|(member_id, share)| {
                let name = group
                    .member(member_id)
                    .map_or(views::UNKNOWN_MEMBER, |m| m.name.as_str());
                format!("{name} {}", format_amount(share, currency))
            })
            .collect();
        writeln!(out, "      split: {}", shares.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "Balances")?;
    for balance in views::member_balances(group, store.group_expenses()) {
        writeln!(
            out,
            "  {:<15} paid {:>12}  owes {:>12}  net {:>12}",
            balance.name,
            format_amount(balance.paid, currency),
            format_amount(balance.owed, currency),
            format_amount(balance.net, currency)
        )?;
    }
    Ok(())
}

async fn add_group_expense<W: Write>(
    store: &mut Store,
    args: ExpenseAddArgs,
    out: &mut W,
) -> Result<()> {
    let amount = parse_amount(&args.amount, store.currency())?;
    let split_between = if args.split.is_empty() {
        store
            .group(&args.group)
            .map(|g| g.members.iter().map(|m| m.id.clone()).collect())
            .unwrap_or_default()
    } else {
        args.split
    };

    let expense = store
        .add_group_expense(NewGroupExpense {
            group_id: args.group,
            amount,
            description: args.description,
            date: args.date.unwrap_or_else(today),
            category: args.category,
            paid_by: args.paid_by.unwrap_or_else(|| OWNER_MEMBER_ID.to_string()),
            split_between,
            shares: None,
        })
        .await?;

    writeln!(
        out,
        "Added group expense {}: {} split {} ways, {} each",
        expense.id,
        format_amount(expense.amount, store.currency()),
        expense.split_between.len(),
        format_amount(views::per_person_share(&expense), store.currency())
    )?;
    Ok(())
}

fn show_currency<W: Write>(currency: &CurrencyFormat, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} ({}): {} / {}, {} decimal digits",
        currency.code, currency.symbol, currency.name, currency.name_plural, currency.decimal_digits
    )?;
    Ok(())
}

async fn set_currency<W: Write>(
    store: &mut Store,
    args: CurrencySetArgs,
    out: &mut W,
) -> Result<()> {
    store
        .set_currency(CurrencyFormat {
            code: args.code,
            symbol: args.symbol,
            name: args.name,
            decimal_digits: args.digits,
            name_plural: args.plural,
        })
        .await?;
    show_currency(store.currency(), out)?;
    writeln!(out, "The default currency is restored on the next start.")?;
    Ok(())
}

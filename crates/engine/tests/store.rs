use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Category, CurrencyFormat, EngineError, GroupExpense, KEY_CURRENCY, KEY_GROUP_EXPENSES,
    KEY_TRANSACTIONS, NewGroup, NewGroupExpense, NewTransaction, OWNER_MEMBER_ID, Snapshot, Store,
    TransactionKind, format::format_amount, views,
};
use migration::MigratorTrait;

async fn store_with_db() -> (Store, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let store = Store::builder().database(db.clone()).build().await.unwrap();
    (store, db)
}

async fn empty_store() -> (Store, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let store = Store::builder()
        .database(db.clone())
        .seed(Snapshot::default())
        .build()
        .await
        .unwrap();
    (store, db)
}

async fn reload(db: &DatabaseConnection) -> Store {
    Store::builder().database(db.clone()).build().await.unwrap()
}

async fn put_raw(db: &DatabaseConnection, name: &str, payload: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO kv_entries (name, payload) VALUES (?, ?) \
         ON CONFLICT(name) DO UPDATE SET payload = excluded.payload",
        vec![name.into(), payload.into()],
    ))
    .await
    .unwrap();
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
}

fn new_tx(amount: f64, kind: TransactionKind) -> NewTransaction {
    NewTransaction {
        amount,
        description: "Coffee".to_string(),
        date: day(1),
        category: Category::Food,
        kind,
    }
}

fn new_expense(group_id: &str, amount: f64, paid_by: &str, split: &[String]) -> NewGroupExpense {
    NewGroupExpense {
        group_id: group_id.to_string(),
        amount,
        description: "Dinner".to_string(),
        date: day(2),
        category: Category::Food,
        paid_by: paid_by.to_string(),
        split_between: split.to_vec(),
        shares: None,
    }
}

#[tokio::test]
async fn fresh_store_starts_from_sample_data() {
    let (store, _db) = store_with_db().await;

    assert_eq!(store.snapshot(), &Snapshot::sample());
    let totals = views::totals(store.transactions());
    assert_eq!(totals.income, 2300.0);
    assert_eq!(totals.expense, 970.0);
    assert_eq!(totals.balance, 1330.0);
    assert_eq!(store.currency(), &CurrencyFormat::zar());
}

#[tokio::test]
async fn build_without_database_fails() {
    let err = Store::builder().build().await.unwrap_err();
    assert_eq!(err, EngineError::MissingDatabase);
}

#[tokio::test]
async fn add_transaction_assigns_unique_ids_and_persists() {
    let (mut store, db) = store_with_db().await;

    let a = store.add_transaction(new_tx(10.0, TransactionKind::Expense)).await.unwrap();
    let b = store.add_transaction(new_tx(10.0, TransactionKind::Expense)).await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(store.transactions().iter().all(|t| !t.id.is_empty()));
    assert_eq!(store.transactions().len(), 7);

    let totals = views::totals(store.transactions());
    assert_eq!(totals.expense, 990.0);

    let reloaded = reload(&db).await;
    assert_eq!(reloaded.transactions(), store.transactions());
}

#[tokio::test]
async fn add_transaction_rejects_non_positive_amounts() {
    let (mut store, db) = store_with_db().await;

    for amount in [0.0, -3.0, f64::INFINITY, f64::NAN] {
        let err = store
            .add_transaction(new_tx(amount, TransactionKind::Income))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert_eq!(store.transactions().len(), 5);
    assert_eq!(reload(&db).await.transactions().len(), 5);
}

#[tokio::test]
async fn delete_transaction_is_idempotent() {
    let (mut store, db) = store_with_db().await;

    assert!(store.delete_transaction("2").await.unwrap());
    assert!(!store.delete_transaction("2").await.unwrap());
    assert!(!store.delete_transaction("missing").await.unwrap());

    assert!(store.transactions().iter().all(|t| t.id != "2"));
    assert_eq!(views::totals(store.transactions()).expense, 170.0);
    assert_eq!(reload(&db).await.transactions().len(), 4);
}

#[tokio::test]
async fn trip_expense_splits_evenly_then_disappears() {
    let (mut store, db) = empty_store().await;

    let trip = store
        .add_group(NewGroup::new("Trip").member("Alex"))
        .await
        .unwrap();
    assert_eq!(trip.members.len(), 2);
    let alex = trip.members[1].id.clone();

    let expense = store
        .add_group_expense(new_expense(
            &trip.id,
            100.0,
            OWNER_MEMBER_ID,
            &[OWNER_MEMBER_ID.to_string(), alex.clone()],
        ))
        .await
        .unwrap();
    assert_eq!(expense.group_id.as_deref(), Some(trip.id.as_str()));
    assert_eq!(views::per_person_share(&expense), 50.0);

    let listed = views::group_expenses(&trip, store.group_expenses());
    assert_eq!(listed.len(), 1);

    let balances = views::member_balances(&trip, store.group_expenses());
    assert_eq!(balances[0].net, 50.0);
    assert_eq!(balances[1].net, -50.0);

    assert!(store.delete_group_expense(&expense.id).await.unwrap());
    assert!(views::group_expenses(&trip, store.group_expenses()).is_empty());
    assert!(reload(&db).await.group_expenses().is_empty());
}

#[tokio::test]
async fn delete_group_cascades_to_its_expenses() {
    let (mut store, db) = store_with_db().await;

    let trip = store
        .add_group(NewGroup::new("Trip").member("Jo"))
        .await
        .unwrap();
    let jo = trip.members[1].id.clone();
    store
        .add_group_expense(new_expense(
            &trip.id,
            40.0,
            &jo,
            &[OWNER_MEMBER_ID.to_string(), jo.clone()],
        ))
        .await
        .unwrap();
    assert_eq!(store.group_expenses().len(), 3);

    assert!(store.delete_group("1").await.unwrap());
    assert!(store.group("1").is_none());
    let left: Vec<&GroupExpense> = store.group_expenses().iter().collect();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].group_id.as_deref(), Some(trip.id.as_str()));

    assert!(!store.delete_group("1").await.unwrap());

    let reloaded = reload(&db).await;
    assert_eq!(reloaded.groups().len(), 1);
    assert_eq!(reloaded.group_expenses().len(), 1);
}

#[tokio::test]
async fn delete_group_removes_legacy_expenses_through_payer() {
    let (mut store, db) = store_with_db().await;

    let legacy = r#"[
        {"id":"1","amount":150,"description":"Utilities","date":"2023-05-01",
         "category":"Utilities","paidBy":"1","splitBetween":["1","2","3"]},
        {"id":"2","amount":90,"description":"Internet","date":"2023-05-02",
         "category":"Utilities","paidBy":"2","splitBetween":["1","2","3"]}
    ]"#;
    put_raw(&db, KEY_GROUP_EXPENSES, legacy).await;
    store = reload(&db).await;
    assert!(store.group_expenses().iter().all(|e| e.group_id.is_none()));
    assert_eq!(views::expense_count(&store.groups()[0], store.group_expenses()), 2);

    assert!(store.delete_group("1").await.unwrap());
    assert!(store.group_expenses().is_empty());
}

#[tokio::test]
async fn group_expense_references_are_checked() {
    let (mut store, _db) = store_with_db().await;
    let everyone = vec!["1".to_string(), "2".to_string(), "3".to_string()];

    let err = store
        .add_group_expense(new_expense("nope", 30.0, "1", &everyone))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("nope".to_string()));

    let err = store
        .add_group_expense(new_expense("1", 30.0, "42", &everyone))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMember(_)));

    let err = store
        .add_group_expense(new_expense("1", 30.0, "1", &["1".to_string(), "42".to_string()]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMember(_)));

    assert_eq!(store.group_expenses().len(), 2);
}

#[tokio::test]
async fn explicit_shares_must_add_up() {
    let (mut store, _db) = store_with_db().await;
    let pair = vec!["1".to_string(), "2".to_string()];

    let mut uneven = new_expense("1", 100.0, "1", &pair);
    uneven.shares = Some(BTreeMap::from([("1".to_string(), 60.0), ("2".to_string(), 30.0)]));
    let err = store.add_group_expense(uneven.clone()).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    uneven.shares = Some(BTreeMap::from([("1".to_string(), 60.0), ("2".to_string(), 40.0)]));
    let expense = store.add_group_expense(uneven).await.unwrap();
    let total: f64 = views::split_shares(&expense).iter().map(|(_, v)| v).sum();
    assert_eq!(total, 100.0);
}

#[tokio::test]
async fn add_group_rejects_bad_shapes() {
    let (mut store, _db) = store_with_db().await;

    let err = store.add_group(NewGroup::new("Solo")).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidMember(_)));
    let err = store
        .add_group(NewGroup::new("  ").member("Alex"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
    assert_eq!(store.groups().len(), 1);
}

#[tokio::test]
async fn malformed_entry_falls_back_to_sample() {
    let (_store, db) = store_with_db().await;
    put_raw(&db, KEY_TRANSACTIONS, "{not json").await;

    let store = reload(&db).await;
    assert_eq!(store.transactions(), Snapshot::sample().transactions.as_slice());
}

#[tokio::test]
async fn persisted_currency_is_not_restored() {
    let (mut store, db) = store_with_db().await;

    let usd = CurrencyFormat {
        code: "USD".to_string(),
        symbol: "$".to_string(),
        name: "US Dollar".to_string(),
        decimal_digits: 2,
        name_plural: "US Dollars".to_string(),
    };
    store.set_currency(usd.clone()).await.unwrap();
    assert_eq!(store.currency(), &usd);

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT payload FROM kv_entries WHERE name = ?",
            vec![KEY_CURRENCY.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    let payload: String = row.try_get("", "payload").unwrap();
    assert!(payload.contains("\"USD\""));

    let reloaded = reload(&db).await;
    assert_eq!(reloaded.currency(), &CurrencyFormat::zar());

    let pinned = Store::builder()
        .database(db.clone())
        .currency(usd.clone())
        .build()
        .await
        .unwrap();
    assert_eq!(pinned.currency(), &usd);
}

#[tokio::test]
async fn persisted_entries_use_camel_case_keys() {
    let (mut store, db) = store_with_db().await;
    store.delete_group_expense("2").await.unwrap();

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT payload FROM kv_entries WHERE name = ?",
            vec![KEY_GROUP_EXPENSES.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    let payload: String = row.try_get("", "payload").unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(value[0]["paidBy"], "1");
    assert_eq!(value[0]["splitBetween"].as_array().unwrap().len(), 3);
    assert_eq!(value[0]["groupId"], "1");
}

#[tokio::test]
async fn many_adds_never_reuse_an_id() {
    let (mut store, _db) = empty_store().await;

    for _ in 0..40 {
        store
            .add_transaction(new_tx(1.0, TransactionKind::Expense))
            .await
            .unwrap();
    }
    let ids: HashSet<&str> = store.transactions().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 40);
}

#[tokio::test]
async fn set_currency_rejects_unsupported_precision() {
    let (mut store, db) = store_with_db().await;

    let too_precise = CurrencyFormat {
        decimal_digits: 19,
        ..CurrencyFormat::zar()
    };
    let err = store.set_currency(too_precise).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(store.currency(), &CurrencyFormat::zar());
    assert_eq!(format_amount(10.0, store.currency()), "R10.00");

    let err = Store::builder()
        .database(db.clone())
        .currency(CurrencyFormat {
            decimal_digits: 5,
            ..CurrencyFormat::zar()
        })
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let three = CurrencyFormat {
        decimal_digits: 3,
        ..CurrencyFormat::zar()
    };
    store.set_currency(three).await.unwrap();
    assert_eq!(format_amount(10.0, store.currency()), "R10.000");
}

#[tokio::test]
async fn failed_write_leaves_state_unchanged() {
    let (mut store, db) = store_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "DROP TABLE kv_entries"))
        .await
        .unwrap();

    let err = store.delete_transaction("1").await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(store.transactions().len(), 5);
    assert!(store.snapshot().transaction("1").is_some());

    let err = store
        .add_transaction(new_tx(5.0, TransactionKind::Income))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let err = store.delete_group("1").await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(store.snapshot(), &Snapshot::sample());
}

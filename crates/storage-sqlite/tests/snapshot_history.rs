//! Latest-row semantics of the snapshot history.

mod support;

use chrono::NaiveDate;
use networth_core::snapshots::{NewBalanceRow, SnapshotRepositoryTrait};
use networth_storage_sqlite::snapshots::SnapshotRepository;

fn row(account_id: &str, currency_id: &str, quantity: f64) -> NewBalanceRow {
    NewBalanceRow {
        account_id: account_id.to_string(),
        currency_id: currency_id.to_string(),
        quantity,
        value_base: quantity * 10.0,
        value_secondary: None,
    }
}

fn ts(day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn latest_balance_is_the_max_timestamp_row() {
    let (_dir, pool) = support::test_pool();
    let account_id = support::seed_account(&pool, "Binance").await;
    let btc = support::seed_currency(&pool, "BTC").await;
    let repository = SnapshotRepository::new(pool.clone());

    repository
        .insert_snapshot(ts(1, 12), vec![row(&account_id, &btc, 1.0)])
        .await
        .unwrap();
    repository
        .insert_snapshot(ts(2, 12), vec![row(&account_id, &btc, 0.75)])
        .await
        .unwrap();

    let latest = repository.latest_balances().unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].quantity, 0.75);
    assert_eq!(latest[0].timestamp, ts(2, 12));
}

#[tokio::test]
async fn zeroed_holding_leaves_nonzero_set() {
    let (_dir, pool) = support::test_pool();
    let account_id = support::seed_account(&pool, "Binance").await;
    let btc = support::seed_currency(&pool, "BTC").await;
    let eth = support::seed_currency(&pool, "ETH").await;
    let repository = SnapshotRepository::new(pool.clone());

    repository
        .insert_snapshot(
            ts(1, 12),
            vec![row(&account_id, &btc, 1.0), row(&account_id, &eth, 3.0)],
        )
        .await
        .unwrap();
    // ETH sold: explicit zero row in the next snapshot.
    repository
        .insert_snapshot(
            ts(2, 12),
            vec![row(&account_id, &btc, 1.0), row(&account_id, &eth, 0.0)],
        )
        .await
        .unwrap();

    let nonzero = repository.latest_nonzero_holdings().unwrap();
    assert_eq!(nonzero.len(), 1);
    assert_eq!(nonzero[0].currency_id, btc);
}

#[tokio::test]
async fn history_keeps_every_snapshot_row() {
    let (_dir, pool) = support::test_pool();
    let account_id = support::seed_account(&pool, "Binance").await;
    let btc = support::seed_currency(&pool, "BTC").await;
    let repository = SnapshotRepository::new(pool.clone());

    for day in 1..=3 {
        repository
            .insert_snapshot(ts(day, 12), vec![row(&account_id, &btc, day as f64)])
            .await
            .unwrap();
    }

    // The latest view collapses to one row per pair, but each run's row
    // stays in history untouched.
    let latest = repository.latest_balances().unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].quantity, 3.0);
}

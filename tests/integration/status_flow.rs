//! Status lookup against an in-memory gas station.

use tc_gas_station::domain::{
    history::HistoryRecord, package::PayType, status::StatusSession,
};
use tc_gas_station::infra::gas_station::GasStationApi;

use super::{FakeGasStation, TC_ADDR};

fn history(n: u64) -> Vec<HistoryRecord> {
    (1..=n)
        .map(|id| HistoryRecord {
            id,
            tx_btc_process_buy: format!("tx-{}", id),
            pay_type: Some(PayType::Btc),
            payment_amount: "100000000".to_string(),
            receive_address: "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0"
                .to_string(),
            tc_amount: "1000000000000000000".to_string(),
            created_at: "2023-06-15T12:00:00Z".to_string(),
            status_str: "Done".to_string(),
        })
        .collect()
}

async fn lookup(session: &mut StatusSession, api: &dyn GasStationApi) -> bool {
    let Some(address) = session.begin_lookup() else {
        return false;
    };
    let result = api
        .fetch_purchase_history(&address)
        .await
        .map_err(|e| e.to_string());
    session.finish_lookup(result);
    true
}

#[tokio::test]
async fn test_lookup_and_paginate() {
    let api = FakeGasStation {
        history: history(12),
        ..FakeGasStation::new()
    };
    let mut session = StatusSession::new(5);
    session.set_address(TC_ADDR);

    assert!(lookup(&mut session, &api).await);
    assert_eq!(api.looked_up.lock().unwrap().as_slice(), [TC_ADDR]);
    assert_eq!(session.rows().len(), 12);
    assert_eq!(session.page_count(), 3);

    let first = &session.current_page_rows()[0];
    assert_eq!(first.transaction, "tx-1");
    assert_eq!(first.deposit_amount, "1 BTC");
    assert_eq!(first.deposit_address, "bc1p0x...5jj0");
    assert_eq!(first.amount, "1 TC");
    assert_eq!(first.status, "Done");

    session.next_page();
    session.next_page();
    assert_eq!(session.page(), 2);
    assert_eq!(session.current_page_rows().len(), 2);
    assert_eq!(session.current_page_rows()[0].transaction, "tx-11");

    session.next_page();
    assert_eq!(session.page(), 2);
}

#[tokio::test]
async fn test_invalid_address_never_reaches_backend() {
    let api = FakeGasStation::new();
    let mut session = StatusSession::default();

    session.set_address("not-an-address");
    assert!(!lookup(&mut session, &api).await);
    assert_eq!(session.visible_error(), Some("Invalid TC wallet address."));
    assert!(api.looked_up.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_clears_table() {
    let ok = FakeGasStation {
        history: history(3),
        ..FakeGasStation::new()
    };
    let mut session = StatusSession::default();
    session.set_address(TC_ADDR);
    assert!(lookup(&mut session, &ok).await);
    assert_eq!(session.rows().len(), 3);

    let failing = FakeGasStation::failing("Too many requests");
    assert!(lookup(&mut session, &failing).await);
    assert!(session.rows().is_empty());
    assert_eq!(session.last_error(), Some("Too many requests"));
    assert!(!session.is_processing());
    assert_eq!(session.page_count(), 1);
}

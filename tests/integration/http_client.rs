//! `HttpGasStation` against a stub HTTP server.

use tc_gas_station::config::ApiConfig;
use tc_gas_station::domain::{
    package::{Currency, PayType},
    session::PurchasePayload,
    validation::FormValues,
};
use tc_gas_station::infra::gas_station::{GasStationApi, GasStationError, HttpGasStation};

use super::{StubServer, TC_ADDR};

fn client(server: &StubServer) -> HttpGasStation {
    HttpGasStation::new(&ApiConfig {
        base_url: format!("{}/", server.base_url),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_package_list() {
    let body = r#"{"data": [
        {"id": 1, "title": "Starter", "details": [{"currency": "TC", "amount": "1"}],
         "feeBtc": "0.0001", "feeEth": "0.001"},
        {"id": 2, "title": "Builder",
         "details": [{"currency": "TC", "amount": 5}, {"currency": "BTC", "amount": "0.005"}],
         "feeBtc": "0.0002", "feeEth": "0.002"},
        {"id": 0, "title": "Custom", "feeBtc": "0.00005", "feeEth": "0.0005"}
    ]}"#;
    let server = StubServer::start("200 OK", body).await;
    let api = client(&server);

    let packages = api.fetch_package_list().await.unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[1].amount(Currency::Tc), "5");
    assert_eq!(packages[1].amount(Currency::Btc), "0.005");
    assert_eq!(packages[1].amount(Currency::Wbtc), "0");
    assert_eq!(packages[2].fee_for(Some(PayType::Eth)), "0.0005 ETH");

    let request = server.request().await;
    assert_eq!(request.request_line, "GET /api/tc/packages HTTP/1.1");
}

#[tokio::test]
async fn test_fetch_history_sends_address() {
    let body = r#"{"data": [{"id": 9, "payType": "eth", "paymentAmount": "2000000000000000000",
        "statusStr": "Success"}]}"#;
    let server = StubServer::start("200 OK", body).await;
    let api = client(&server);

    let records = api.fetch_purchase_history(TC_ADDR).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 9);
    assert_eq!(records[0].pay_type, Some(PayType::Eth));

    let request = server.request().await;
    assert_eq!(
        request.request_line,
        format!("GET /api/tc/history?address={} HTTP/1.1", TC_ADDR)
    );
}

#[tokio::test]
async fn test_submit_posts_flat_payload() {
    let server = StubServer::start("200 OK", r#"{"data": {"depositAddress": "bc1q..."}}"#).await;
    let api = client(&server);

    let payload = PurchasePayload {
        values: FormValues {
            amount_tc: "5".to_string(),
            to_address: TC_ADDR.to_string(),
            pay_type: Some(PayType::Btc),
            ..Default::default()
        },
        custom_package: None,
    };
    api.submit_purchase(&payload).await.unwrap();

    let request = server.request().await;
    assert_eq!(request.request_line, "POST /api/tc/generate-deposit HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent["toAddress"], TC_ADDR);
    assert_eq!(sent["amountTC"], "5");
    assert_eq!(sent["payType"], "btc");
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let server = StubServer::start(
        "400 Bad Request",
        r#"{"error": {"message": "Each wallet is capped at 100 TC."}}"#,
    )
    .await;
    let api = client(&server);

    let err = api.fetch_purchase_history(TC_ADDR).await.unwrap_err();
    assert!(matches!(err, GasStationError::Api(_)));
    assert_eq!(err.to_string(), "Each wallet is capped at 100 TC.");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let api = HttpGasStation::new(&ApiConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let err = api.fetch_package_list().await.unwrap_err();
    assert!(matches!(err, GasStationError::Network(_)));
}

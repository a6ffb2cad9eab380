//! Integration tests for tc-gas-station.
//!
//! Provides two gas-station backends:
//! - `FakeGasStation`, an in-memory [`GasStationApi`] recording submissions
//! - `StubServer`, a one-shot HTTP server for exercising `HttpGasStation`

pub mod http_client;
pub mod purchase_flow;
pub mod status_flow;

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

use tc_gas_station::domain::{
    history::HistoryRecord,
    package::{Currency, Package},
    session::PurchasePayload,
};
use tc_gas_station::infra::gas_station::{GasStationApi, GasStationError};

pub const TC_ADDR: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
pub const TAPROOT: &str = "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0";

/// Three tiers plus the trailing custom-package template.
pub fn package_list() -> Vec<Package> {
    vec![
        Package::new(1, "Starter")
            .with_amount(Currency::Tc, "1")
            .with_fees("0.0001", "0.001"),
        Package::new(2, "Builder")
            .with_amount(Currency::Tc, "5")
            .with_amount(Currency::Btc, "0.005")
            .with_fees("0.0002", "0.002"),
        Package::new(3, "Pro")
            .with_amount(Currency::Tc, "10")
            .with_amount(Currency::Btc, "0.01")
            .with_amount(Currency::Wbtc, "0.01")
            .with_fees("0.0003", "0.003"),
        Package::new(0, "Custom").with_fees("0.00005", "0.0005"),
    ]
}

/// In-memory gas station.
#[derive(Default)]
pub struct FakeGasStation {
    pub packages: Vec<Package>,
    pub history: Vec<HistoryRecord>,
    pub fail_with: Option<String>,
    pub submitted: Mutex<Vec<PurchasePayload>>,
    pub looked_up: Mutex<Vec<String>>,
}

impl FakeGasStation {
    pub fn new() -> Self {
        Self {
            packages: package_list(),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    fn check(&self) -> Result<(), GasStationError> {
        match &self.fail_with {
            Some(msg) => Err(GasStationError::Api(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GasStationApi for FakeGasStation {
    async fn fetch_package_list(&self) -> Result<Vec<Package>, GasStationError> {
        Ok(self.packages.clone())
    }

    async fn fetch_purchase_history(
        &self,
        address: &str,
    ) -> Result<Vec<HistoryRecord>, GasStationError> {
        self.looked_up.lock().unwrap().push(address.to_string());
        self.check()?;
        Ok(self.history.clone())
    }

    async fn submit_purchase(&self, payload: &PurchasePayload) -> Result<(), GasStationError> {
        self.check()?;
        self.submitted.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Raw request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

/// Serves a single canned HTTP response and hands back the request it saw.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl StubServer {
    pub async fn start(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });

        Self {
            base_url: format!("http://{}/api", addr),
            handle,
        }
    }

    pub async fn request(self) -> CapturedRequest {
        self.handle.await.unwrap()
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.trim().parse::<usize>().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

//! Purchase history records and their table rendering.

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

use super::{address::format_long_address, package::PayType};

pub const TABLE_HEADINGS: [&str; 6] = [
    "Transaction",
    "Deposit amount",
    "Deposit address",
    "Amount",
    "Time",
    "Status",
];

const BTC_DECIMALS: usize = 8;
const ETH_DECIMALS: usize = 18;
const TC_DECIMALS: usize = 18;

/// One purchase as reported by the gas station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    pub id: u64,
    pub tx_btc_process_buy: String,
    #[serde(deserialize_with = "lenient_pay_type")]
    pub pay_type: Option<PayType>,
    /// Deposit in base units (satoshi or wei).
    pub payment_amount: String,
    pub receive_address: String,
    /// TC delivered, in 18-decimal base units.
    pub tc_amount: String,
    pub created_at: String,
    pub status_str: String,
}

fn lenient_pay_type<'de, D>(deserializer: D) -> Result<Option<PayType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("btc") => Some(PayType::Btc),
        Some("eth") => Some(PayType::Eth),
        _ => None,
    })
}

/// Display-ready table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub transaction: String,
    pub deposit_amount: String,
    pub deposit_address: String,
    pub amount: String,
    pub time: String,
    pub status: String,
}

impl HistoryRow {
    pub fn from_record(record: &HistoryRecord) -> Self {
        let (decimals, unit) = match record.pay_type {
            Some(PayType::Btc) => (BTC_DECIMALS, "BTC"),
            // Anything that is not BTC was paid in ETH.
            _ => (ETH_DECIMALS, "ETH"),
        };
        let deposit = format_units(&record.payment_amount, decimals, 6)
            .unwrap_or_else(|| record.payment_amount.clone());

        let amount = match format_units(&record.tc_amount, TC_DECIMALS, 4) {
            Some(tc) => format!("{} TC", tc),
            _ => "-".to_string(),
        };

        Self {
            id: record.id.to_string(),
            transaction: or_dash(&record.tx_btc_process_buy),
            deposit_amount: format!("{} {}", deposit, unit),
            deposit_address: format_long_address(&record.receive_address),
            amount,
            time: format_date_time(&record.created_at),
            status: or_dash(&record.status_str),
        }
    }

    /// Cells in [`TABLE_HEADINGS`] order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.transaction.as_str(),
            self.deposit_amount.as_str(),
            self.deposit_address.as_str(),
            self.amount.as_str(),
            self.time.as_str(),
            self.status.as_str(),
        ]
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Convert an integer amount in base units into a decimal string, truncated
/// to `max_fraction_digits`. Returns `None` for non-integer input.
pub fn format_units(raw: &str, decimals: usize, max_fraction_digits: usize) -> Option<String> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac[..max_fraction_digits.min(decimals)].trim_end_matches('0');

    if frac.is_empty() {
        Some(int.to_string())
    } else {
        Some(format!("{}.{}", int, frac))
    }
}

/// Format an RFC 3339 timestamp in local time, `-` when unparseable.
pub fn format_date_time(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%d %b %Y %H:%M")
            .to_string(),
        Err(_) => "-".to_string(),
    }
}

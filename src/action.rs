use strum::Display;

use tc_gas_station::domain::{history::HistoryRecord, package::Package};

/// Actions that can be triggered by user input or by finished API calls.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Resize(u16, u16),
    Suspend,
    Quit,
    Error(String),

    // Tab switching
    TabBuy,
    TabStatus,

    // Purchase flow
    LoadPackages,
    PackagesLoaded(Result<Vec<Package>, String>),
    SubmitPurchase,
    PurchaseFinished(Result<(), String>),

    // Status flow
    CheckStatus,
    HistoryLoaded(Result<Vec<HistoryRecord>, String>),
}

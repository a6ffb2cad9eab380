use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tc-gas-station")]
#[command(version)]
#[command(about = "Buy TC gas packages and check purchase status from the terminal")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Bitcoin network receiving addresses are checked against (mainnet, testnet, regtest)
    #[arg(short, long, default_value = "mainnet")]
    pub network: String,

    /// Gas-station API base URL
    #[arg(long, env = "GAS_STATION_API_URL")]
    pub api_url: Option<String>,

    /// Rows per page in the status table
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Data directory path (log file location)
    #[arg(long)]
    pub data_dir: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! cfctl - main entry point

use clap::Parser;
use log::{debug, info};

use cfctl::{init_logger, run_command, CfError, Cli, LogPreset};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logger(LogPreset::from_env_value(&cli.env), &cli.log_level);

    info!("Starting cfctl v{}", env!("CARGO_PKG_VERSION"));
    debug!("CLI args: {:?}", cli);

    let result = tokio::select! {
        result = run_command(&cli) => result,
        _ = tokio::signal::ctrl_c() => Err(CfError::Cancelled),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use colored::*;
use std::process;
use ufw_manager::{cli, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli_args = cli::parse_args();
    let config = cli_args.app_config();
    logging::init(&config, cli_args.verbose);

    if let Err(e) = cli::run(cli_args).await {
        tracing::error!("{}", e);
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

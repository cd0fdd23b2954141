use clap::Parser;
use covid_tracker_api::app::server;
use covid_tracker_api::utils::logger;
use covid_tracker_api::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定要先解析完才能決定日誌格式
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logs {
        logger::init_json_logger(cli.verbose, config.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level.as_deref());
    }

    tracing::info!("Starting covid-tracker-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = server::run(&config).await {
        tracing::error!("❌ Server failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    Ok(())
}

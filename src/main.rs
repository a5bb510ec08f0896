use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use solar_quote::core::Quote;
use solar_quote::utils::error::ErrorSeverity;
use solar_quote::utils::{logger, validation::Validate};
use solar_quote::{CliArgs, NasaPowerProvider, QuoteConfig, QuoteError, QuoteService};

#[derive(Debug, Serialize)]
struct QuoteReport {
    generated_at: DateTime<Utc>,
    quote: Quote,
}

async fn run(args: &CliArgs) -> solar_quote::Result<()> {
    args.validate()?;

    // 載入配置
    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            QuoteConfig::from_file(path)?
        }
        None => QuoteConfig::default(),
    };
    config.validate()?;
    tracing::debug!("Configuration: {:?}", config);

    let request = args.to_request(&config.defaults)?;
    let provider = NasaPowerProvider::from_config(&config.irradiance)?;
    let service = QuoteService::new(provider, config.engine(), config.sun_hours_policy());

    let quote = service.quote(&request).await?;
    tracing::info!(
        "✅ {} kW system, {} panels, payback {} months",
        quote.outputs.system_size_kw,
        quote.outputs.panel_count,
        quote.outputs.payback_months
    );

    let report = QuoteReport {
        generated_at: Utc::now(),
        quote,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

fn exit_code(e: &QuoteError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("🚀 Starting solar-quote");

    if let Err(e) = run(&args).await {
        tracing::error!(
            "❌ Quote failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        std::process::exit(exit_code(&e));
    }
}

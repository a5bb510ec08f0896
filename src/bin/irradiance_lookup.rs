use chrono::Month;
use clap::Parser;
use solar_quote::core::{Coordinates, IrradianceProvider};
use solar_quote::utils::{logger, validation::Validate};
use solar_quote::{NasaPowerProvider, QuoteConfig, QuoteError};

#[derive(Parser)]
#[command(name = "irradiance-lookup")]
#[command(about = "Fetch the normalised irradiance summary for a point")]
struct Args {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Month of year (1-12)
    #[arg(long)]
    month: Option<u8>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn lookup(args: &Args) -> solar_quote::Result<String> {
    let config = match &args.config {
        Some(path) => QuoteConfig::from_file(path)?,
        None => QuoteConfig::default(),
    };
    config.validate()?;

    let point = Coordinates::new(args.lat, args.lon)?;
    let month = args
        .month
        .map(|m| Month::try_from(m).map_err(|_| QuoteError::validation("month", m, "must be between 1 and 12")))
        .transpose()?;

    let provider = NasaPowerProvider::from_config(&config.irradiance)?;
    let summary = provider.fetch(point, month).await?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match lookup(&args).await {
        Ok(json) => println!("{}", json),
        Err(e) if e.is_data_unavailable() => {
            eprintln!("⚠️ {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}

//! fxconvert CLI
//!
//! Prints live exchange-rate tables and converted amounts.
//!
//! ```text
//! fxconvert                 # rates for USD
//! fxconvert EUR             # rates for EUR
//! fxconvert 100 EUR         # 100 EUR in every quoted currency
//! fxconvert 100 EUR USD     # 100 EUR in USD
//! ```

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxconvert_fx::{Converter, ConverterConfig, Dispatched};

mod output;

use output::Format;

/// fxconvert CLI
#[derive(Parser, Debug)]
#[command(name = "fxconvert")]
#[command(about = "Convert amounts between currencies using the latest exchange rates")]
struct Args {
    /// Amount to convert, or a currency code to list rates for
    query: Option<String>,

    /// Currency the amount is in
    from: Option<String>,

    /// Currency to convert into (every quoted currency when omitted)
    to: Option<String>,

    /// Rate service base URL (overrides FX_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.log_json);

    // Load configuration
    let mut config = ConverterConfig::from_env();
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    debug!(endpoint = %config.endpoint, "Using rate service");

    let converter = Converter::frankfurter(config)?;
    let format = if args.json { Format::Json } else { Format::Text };

    let result = converter
        .dispatch(
            args.query.as_deref(),
            args.from.as_deref(),
            args.to.as_deref(),
        )
        .await;

    match result {
        Ok(Dispatched::Builder(_)) => {
            anyhow::bail!("an amount needs a source currency: fxconvert <AMOUNT> <FROM> [TO]")
        }
        Ok(outcome) => {
            println!("{}", output::render(&outcome, format)?);
            Ok(())
        }
        Err(e) => {
            error!(code = e.error_code(), error = %e, "Request failed");
            Err(e.into())
        }
    }
}

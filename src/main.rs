//! Option Risk Helper - Main Entry Point
//!
//! Serves the HTTP API or runs one-shot calculations and risk configuration
//! changes from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use option_risk_helper::api::types::{
    CalculateResponse, ConfigResponse, PositionSizeResponse, SuggestionView, ValidationResponse,
};
use option_risk_helper::api::{store_from_settings, ApiServer, AppState};
use option_risk_helper::config::resolve_config;
use option_risk_helper::{ConfigStore, EngineError, TradeDirection, TradeInput};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the configuration file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Evaluate one trade and print the result
    Calculate {
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        delta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        theta: f64,
        /// Holding period in minutes
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        trade_time: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        risk: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        reward: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        entry: f64,
        /// buy or sell
        #[arg(long, default_value = "buy")]
        trade_type: String,
    },
    /// Check a risk amount against the risk configuration
    ValidateRisk {
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        amount: f64,
    },
    /// Suggest a contract count for a risk budget
    PositionSize {
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        risk_amount: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        entry: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        stop_loss: f64,
    },
    /// Show or change the risk configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        capital: Option<f64>,
        #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
        percent: Option<f64>,
    },
    Reset,
}

/// Parse a CLI number, refusing `NaN` and infinities
fn finite_number(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{}' is not a finite number", raw))
    }
}

/// `RUST_LOG` wins over the configured level
fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging(log_level: &str, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(log_level))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut app_config = resolve_config(&args.config)?;

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| app_config.settings.log_level.clone());
    init_logging(&log_level, args.log_json)?;

    info!("Configuration file: {}", args.config);

    let state = AppState::bootstrap(store_from_settings(&app_config.risk)).await;

    match args.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                app_config.server.host = host;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }

            info!("Starting Option Risk Helper API");
            ApiServer::new(state).serve(&app_config.server.bind_address()).await?;
        }
        Command::Calculate {
            delta,
            theta,
            trade_time,
            risk,
            reward,
            entry,
            trade_type,
        } => {
            let direction: TradeDirection = trade_type.parse()?;
            let input = TradeInput {
                delta,
                theta,
                trade_time_minutes: trade_time,
                risk_budget: risk,
                reward_budget: reward,
                entry_price: entry,
                direction,
            };
            let evaluation = state.evaluator.evaluate(&input)?;
            print_json(&CalculateResponse::new(&input, &evaluation))?;
        }
        Command::ValidateRisk { amount } => {
            let validation = state.policy.validate_risk(amount)?;
            print_json(&ValidationResponse {
                success: true,
                validation,
            })?;
        }
        Command::PositionSize {
            risk_amount,
            entry,
            stop_loss,
        } => {
            let suggestion = match state.sizer.suggest(risk_amount, entry, stop_loss) {
                Ok(suggestion) => SuggestionView::Sized(suggestion),
                Err(e @ EngineError::DegenerateInput { .. }) => SuggestionView::Degenerate {
                    error: e.to_string(),
                    suggested_contracts: 0,
                },
                Err(e) => return Err(e.into()),
            };
            print_json(&PositionSizeResponse {
                success: true,
                suggestion,
            })?;
        }
        Command::Config { action } => {
            let (config, message) = match action {
                ConfigAction::Show => (state.policy.current_config(), None),
                ConfigAction::Set { capital, percent } => (
                    state.policy.update_config(capital, percent)?,
                    Some("Configuration updated successfully"),
                ),
                ConfigAction::Reset => (
                    state.policy.reset_to_defaults(),
                    Some("Configuration reset to defaults"),
                ),
            };

            if message.is_some() {
                state.store.save(&config).await?;
            }
            print_json(&ConfigResponse {
                success: true,
                message,
                config,
            })?;
        }
    }

    Ok(())
}

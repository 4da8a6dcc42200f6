//! FlightOnTime - flight punctuality client
//!
//! Terminal front end over the prediction backend:
//!
//! - `airlines`: supported carriers and whether airport data is loaded
//! - `airports <code>`: origin and destination airports served by a carrier
//! - `predict <airline> <origin> <dest> [--departure 2026-10-19T10:00]`
//! - `stats [--watch]`: dashboard statistics, optionally refreshed periodically
//! - `health`: backend status
//! - `prefs`: stored language and unit preferences as JSON
//!
//! `--lang es|en` and `--units km|miles` change (and persist) the display
//! preferences before the command runs. `--verbose` also prints selector
//! updates.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flightontime_client::application::dtos::i18n_dto::PreferencesDto;
use flightontime_client::application::services::prediction_service::default_departure;
use flightontime_client::common::config::AppConfig;
use flightontime_client::common::di::{AppServiceFactory, AppState};
use flightontime_client::domain::entities::airline::AIRLINE_CATALOG;
use flightontime_client::domain::services::date_format::parse_timestamp;
use flightontime_client::interfaces::page_controller::PredictionPageController;
use flightontime_client::interfaces::view::console_view::ConsoleView;
use flightontime_client::interfaces::view::page::prediction_page;

struct Cli {
    lang: Option<String>,
    units: Option<String>,
    departure: Option<String>,
    watch: bool,
    verbose: bool,
    command: Vec<String>,
}

fn parse_cli() -> anyhow::Result<Cli> {
    let mut args = pico_args::Arguments::from_env();

    let cli = Cli {
        lang: args.opt_value_from_str("--lang")?,
        units: args.opt_value_from_str("--units")?,
        departure: args.opt_value_from_str("--departure")?,
        watch: args.contains("--watch"),
        verbose: args.contains(["-v", "--verbose"]),
        command: args
            .finish()
            .into_iter()
            .map(|arg| arg.into_string().map_err(|raw| anyhow!("Invalid argument: {:?}", raw)))
            .collect::<anyhow::Result<Vec<_>>>()?,
    };
    Ok(cli)
}

fn apply_preferences(state: &AppState, cli: &Cli) {
    if let Some(lang) = &cli.lang {
        state.core.i18n.set_language(lang);
    }
    if let Some(units) = &cli.units {
        state.core.units.set_unit(units);
    }
}

fn attach(state: &AppState, verbose: bool) -> anyhow::Result<Arc<PredictionPageController>> {
    let view = Arc::new(ConsoleView::stdout(verbose));
    let controller = PredictionPageController::attach(state, prediction_page(), view)
        .ok_or_else(|| anyhow!("Prediction page not available"))?;
    controller.initialize();
    Ok(controller)
}

fn list_airlines(state: &AppState) {
    let index = state.applications.cascade.index();
    for (code, name) in AIRLINE_CATALOG {
        let served = index
            .and_then(|index| index.get(code))
            .map(|airports| format!("{} / {}", airports.origin_airports.len(), airports.destination_airports.len()))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<3} {:<32} {}", code, name, served);
    }
}

fn list_airports(controller: &PredictionPageController, airline: &str) -> ExitCode {
    let snapshot = controller.on_airline_selected(Some(airline));
    if !snapshot.enabled {
        return ExitCode::FAILURE;
    }
    println!("ORIGIN: {}", snapshot.origin_options.join(", "));
    println!("DEST:   {}", snapshot.destination_options.join(", "));
    ExitCode::SUCCESS
}

async fn predict(controller: &PredictionPageController, args: &[String], departure: Option<&str>) -> anyhow::Result<ExitCode> {
    let [airline, origin, destination] = args else {
        bail!("usage: flightontime predict <airline> <origin> <destination> [--departure ISO]");
    };

    let departure = match departure {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("Invalid departure: {}", raw))?,
        None => default_departure(Local::now().naive_local()),
    };

    if !controller.on_airline_selected(Some(airline)).enabled {
        return Ok(ExitCode::FAILURE);
    }
    controller.on_origin_selected(Some(origin));
    controller.on_destination_selected(Some(destination));

    let (_, outcome) = futures::join!(controller.check_health(), controller.submit(Some(departure)));
    Ok(if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn stats(controller: &PredictionPageController, config: &AppConfig, watch: bool) -> anyhow::Result<()> {
    if !watch {
        controller.refresh_stats().await;
        return Ok(());
    }

    controller.start_stats_polling(config.polling.stats_interval());
    tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
    controller.stop_stats_polling();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = parse_cli()?;

    // Load configuration from environment variables
    let config = AppConfig::from_env();
    let state = AppServiceFactory::new(config.clone())
        .build()
        .await
        .context("Failed to initialize services")?;

    apply_preferences(&state, &cli);

    let Some((command, rest)) = cli.command.split_first() else {
        bail!("usage: flightontime [--lang es|en] [--units km|miles] <airlines|airports|predict|stats|health|prefs>");
    };

    match command.as_str() {
        "airlines" => list_airlines(&state),
        "airports" => {
            let airline = rest.first().context("usage: flightontime airports <airline>")?;
            let controller = attach(&state, cli.verbose)?;
            return Ok(list_airports(&controller, airline));
        }
        "predict" => {
            let controller = attach(&state, cli.verbose)?;
            return predict(&controller, rest, cli.departure.as_deref()).await;
        }
        "stats" => {
            let controller = attach(&state, cli.verbose)?;
            stats(&controller, &config, cli.watch).await?;
        }
        "health" => {
            let controller = attach(&state, cli.verbose)?;
            controller.check_health().await;
        }
        "prefs" => {
            let dto = PreferencesDto::new(
                state.core.i18n.get_language(),
                state.core.units.get_unit(),
                &state.core.i18n.available_locales(),
            );
            println!("{}", serde_json::to_string_pretty(&dto)?);
        }
        other => bail!("Unknown command: {}", other),
    }

    tracing::debug!("Command {} completed", command);
    Ok(ExitCode::SUCCESS)
}

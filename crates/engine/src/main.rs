//! Realmlore Engine - Command line entry point.

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use realmlore_domain::{LayerType, LocationId, ViewContext};
use realmlore_engine::{config::load_dotenv, App, EngineConfig};

#[derive(Debug, Parser)]
#[command(
    name = "realmlore-engine",
    version,
    about = "Layered description resolution over a realm graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile and print a location's description
    Describe {
        location_id: LocationId,
        #[arg(long)]
        weather: Option<String>,
        #[arg(long)]
        time: Option<String>,
        /// Base text used when the location has no base layers
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Print the realm context of a location
    Context {
        location_id: LocationId,
        #[arg(long, default_value_t = 0)]
        tick: u64,
    },
    /// Print the active layer of one type, with realm fallback
    Layer {
        location_id: LocationId,
        layer_type: LayerType,
        tick: u64,
    },
    /// Print the containment chain of a location or realm
    Chain { entity_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root when run from `crates/engine`.
    load_dotenv();

    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realmlore_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;
    tracing::debug!(
        store = ?config.store,
        depth_cap = config.chain_depth_cap,
        "Loaded configuration"
    );

    let app = App::from_config(&config).await?;
    let uc = &app.use_cases;

    match cli.command {
        Command::Describe {
            location_id,
            weather,
            time,
            fallback,
        } => {
            let mut context = ViewContext::new(Utc::now());
            context.weather = weather;
            context.time = time;
            let compiled = uc
                .description
                .compile(location_id, context, fallback.as_deref())
                .await?;
            print_json(&compiled)?;
        }
        Command::Context { location_id, tick } => {
            let context = uc
                .realm_context
                .get_location_context(location_id, tick)
                .await?;
            print_json(&context)?;
        }
        Command::Layer {
            location_id,
            layer_type,
            tick,
        } => {
            let resolved = uc
                .layers
                .get_active_layer_for_location(location_id, layer_type, tick)
                .await?;
            let output = resolved.map(|resolved| {
                serde_json::json!({
                    "layer": resolved.layer,
                    "source": resolved.source.as_str(),
                })
            });
            print_json(&output)?;
        }
        Command::Chain { entity_id } => {
            let chain = uc.realm_graph.get_containment_chain(entity_id).await?;
            print_json(&chain)?;
        }
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Host process: loads a persisted configuration, spawns one actor per
//! block, and runs until interrupted (§4.N).
//!
//! The type registry below is intentionally a plain match rather than a
//! generic plugin mechanism — the spec names exactly two reference block
//! types, and a host embedding more of its own just extends this match.

use clap::Parser;
use fb_blocks::{CounterBlock, GpioDoBlock};
use fb_runtime::{persistence, Registry, RuntimeConfig};
use fb_traits::{BlockState, BlockType, Definition};
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "fb-cli", about = "Runs a persisted function-block configuration")]
struct Args {
    /// Path to the persisted configuration file. Defaults to `FB_CONFIG_PATH`
    /// or `fb-config.json` when not given.
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Persistence(#[from] persistence::PersistenceError),
    #[error("block `{0}` has unknown block_type `{1}`")]
    UnknownType(String, String),
}

fn block_type_for(tag: &str) -> Option<Arc<dyn BlockType>> {
    match tag {
        "counter" => Some(Arc::new(CounterBlock)),
        "gpio_do" => Some(Arc::new(GpioDoBlock)),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let mut config = RuntimeConfig::from_env();
    if let Some(path) = args.config {
        config.config_path = path.into();
    }

    env_logger::Builder::new().filter_level(config.log_level).init();

    if let Err(err) = run(&config).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(config: &RuntimeConfig) -> Result<(), RunError> {
    let defs = persistence::load(&config.config_path)?;
    info!("loaded {} block definition(s) from {}", defs.len(), config.config_path.display());

    let registry = Registry::new();
    spawn_all(defs, &registry, config.min_tick_ms)?;

    tokio::signal::ctrl_c().await.ok();
    info!("shutting down {} block(s)", registry.len());
    registry.broadcast_delete();

    Ok(())
}

fn spawn_all(defs: Vec<Definition>, registry: &Registry, min_tick_ms: u64) -> Result<(), RunError> {
    for def in defs {
        let name = def.block_name().to_string();
        let type_tag = def.block_type().to_string();
        let Some(block_type) = block_type_for(&type_tag) else {
            return Err(RunError::UnknownType(name, type_tag));
        };
        let module = block_type.type_name();
        let state = BlockState::from_definition(name.clone(), module, def);
        fb_runtime::spawn(block_type, state, registry.clone(), min_tick_ms);
        info!("spawned block `{name}` ({module})");
    }
    if registry.is_empty() {
        warn!("configuration contained no blocks");
    }
    Ok(())
}

mod config;

use std::error::Error;

use config::LoaderConfig;
use jsonthings_things::{LoadedThings, ThingLoader, ThingRegistries};
use tracing::{debug, error, info};

const DEFAULT_CONFIG: &str = "jsonthings.toml";

/// `outer: inner: root` for an error and its sources.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn report(loaded: &LoadedThings, registries: &ThingRegistries) {
    for thing_type in loaded.parsers.thing_types() {
        let count = loaded.parsers.builder_count(thing_type).unwrap_or(0);
        info!("{thing_type}: {count} declared");
    }
    info!(
        "Registered {} blocks and {} items",
        registries.blocks.len(),
        registries.items.len()
    );
    for binding in &loaded.client.render_layers {
        debug!(block = %binding.block, layers = ?binding.layers, "Render layer binding");
    }
    for binding in &loaded.client.colors {
        debug!(key = %binding.key, target = ?binding.target, handler = ?binding.handler, "Color binding");
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config = match LoaderConfig::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "JsonThings loader v{} reading packs from {}",
        env!("CARGO_PKG_VERSION"),
        config.packs.directory
    );

    let pending = ThingLoader::new(&config.packs.directory)
        .with_disabled(config.packs.disabled.clone())
        .begin_loading();

    let mut registries = ThingRegistries::vanilla();
    match pending.finish(&mut registries).await {
        Ok(loaded) => report(&loaded, &registries),
        Err(e) => {
            error!("Failed to load thing packs: {}", error_chain(&e));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonthings_things::{LoadError, ResourceKey, ThingError};

    #[test]
    fn error_chain_walks_sources() {
        let err = LoadError::Parse {
            thing_type: "block".into(),
            key: ResourceKey::parse("mymod:marble").unwrap(),
            source: ThingError::MissingField {
                field: "material".into(),
            },
        };
        assert_eq!(
            error_chain(&err),
            "error while parsing block from mymod:marble: missing required field 'material'"
        );
    }
}

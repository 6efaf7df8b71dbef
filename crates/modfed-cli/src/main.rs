//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together: the
//! provider registry, the loader, and the demo consumer. The loader itself
//! never learns which resolver it got or whether a terminal is attached.
//!
//! The demo plays both roles of a federated deployment in one process: a
//! provider that registers its store and utility bundle in the container
//! registry, and a consumer that acquires them through the loader and keeps
//! rendering even when the provider is absent or slow to come up.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use modfed_core::domain::{CartState, Product};
use modfed_core::ports::{RemoteModule, SharedStore, UtilityBundle};
use modfed_core::store::{Action, slices};
use modfed_core::{LoaderConfig, LogLevel};
use modfed_loader::{FallbackUtils, LocalStore, RegistryResolver, RemoteLoader};

#[derive(Parser)]
#[command(name = "modfed", version, about = "Runtime module federation loader demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire the shared store and utils, then drive the cart end to end
    Demo {
        /// Leave the provider registry empty (forces degraded mode)
        #[arg(long)]
        offline: bool,

        /// Fail this many resolve calls before the provider answers,
        /// simulating a provider container that is still starting
        #[arg(long, default_value_t = 0)]
        flaky: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo { offline, flaky } => run_demo(offline, flaky).await,
    }
}

fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Mechanical Keyboard", 89.0),
        Product::new(2, "Trackball Mouse", 34.5),
        Product::new(3, "Desk Lamp", 22.0),
    ]
}

/// Build the provider side: a registry whose exported store already carries
/// the catalog.
fn build_registry(offline: bool, flaky: u32) -> RegistryResolver {
    let registry = RegistryResolver::new().with_warmup_failures(flaky);
    if offline {
        return registry;
    }

    let store = LocalStore::new();
    store.dispatch(Action::set_products(&demo_catalog()));
    registry.register("provider/store", RemoteModule::default_store(Arc::new(store)));
    // The demo provider exports the same bundle implementation the fallback
    // uses; in a real deployment this would be the provider's own build.
    registry.register(
        "provider/utils",
        RemoteModule::default_utils(Arc::new(FallbackUtils::new())),
    );
    registry
}

async fn run_demo(offline: bool, flaky: u32) -> Result<()> {
    info!(offline, flaky, "starting demo");

    let resolver = Arc::new(build_registry(offline, flaky));
    let loader = RemoteLoader::new(resolver, LoaderConfig::default());

    println!("Acquiring shared dependencies...");
    let utils = loader.load_utils().await;
    let store = loader.load_store().await;

    if store.using_fallback || utils.using_fallback {
        println!("! Running in fallback mode: the remote provider could not be reached.");
        println!("  Cart state is local to this process and will not be shared.");
    } else {
        println!("Connected to the remote provider.");
    }

    utils.value.log(
        LogLevel::Info,
        "dependencies resolved",
        Some(&snapshot_value(&store.value)),
    );

    // A consumer-side subscriber, the way a UI would re-render.
    let updates = Arc::new(AtomicU32::new(0));
    let counter = updates.clone();
    let subscription = store.value.subscribe(Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let catalog = demo_catalog();
    store.value.dispatch(Action::add_item(&catalog[0]));
    store.value.dispatch(Action::add_item(&catalog[1]));
    store.value.dispatch(Action::add_item(&catalog[0]));
    subscription.unsubscribe();

    let cart: CartState = store
        .value
        .get_state()
        .slice_as(slices::CART)
        .unwrap_or_default();

    println!();
    println!("Cart ({} updates observed):", updates.load(Ordering::SeqCst));
    for item in &cart.items {
        println!(
            "  {} x{}  {}",
            item.name,
            item.quantity,
            utils.value.format_currency(item.subtotal())
        );
    }
    println!(
        "Total: {}  ({})",
        utils.value.format_currency(cart.total()),
        utils.value.format_date(Utc::now())
    );

    Ok(())
}

/// The current snapshot as a log context value.
fn snapshot_value(store: &Arc<dyn SharedStore>) -> serde_json::Value {
    serde_json::to_value(store.get_state()).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_registry_is_empty_when_offline() {
        let registry = build_registry(true, 0);
        assert!(registry.registered_specifiers().is_empty());
    }

    #[test]
    fn test_registry_exports_both_modules() {
        let registry = build_registry(false, 0);
        assert_eq!(
            registry.registered_specifiers(),
            vec!["provider/store", "provider/utils"]
        );
    }
}

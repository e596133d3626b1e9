//! active-router CLI
//!
//! Replays navigations against the routes of a config file and prints every
//! listener notification as a JSON line, in delivery order.
//!
//! ```text
//! active-router --config routes.toml replay /users/1 /users/2 /
//! active-router resolve ../c /a/b
//! active-router parse "/the/path?the=query#the-hash"
//! active-router --config routes.toml check
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use active_router::config::{load_config, RouterConfig};
use active_router::location::{create_location, resolve_pathname};
use active_router::observability::logging::init_logging;
use active_router::routing::Dispatcher;
use active_router::{ListenerError, Router};

#[derive(Parser)]
#[command(name = "active-router")]
#[command(about = "Replay navigations against configured routes", long_about = None)]
struct Cli {
    /// Route configuration (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate through each path and print listener notifications
    Replay {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Resolve a pathname against a base
    Resolve { to: String, from: Option<String> },
    /// Parse a location and print it as JSON
    Parse {
        location: String,
        /// Resolve relative pathnames against this one
        #[arg(long)]
        base: Option<String>,
        #[arg(long)]
        key: Option<String>,
    },
    /// Validate the config and print routes in dispatch order
    Check,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    init_logging(&config.observability)?;

    tracing::debug!(
        routes = config.routes.len(),
        initial = %config.source.pathname,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Replay { paths } => replay(&config, &paths)?,
        Commands::Resolve { to, from } => {
            println!("{}", resolve_pathname(&to, from.as_deref()));
        }
        Commands::Parse {
            location,
            base,
            key,
        } => {
            let location = create_location(location, base.as_deref(), key.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
        Commands::Check => check(&config)?,
    }

    Ok(())
}

fn replay(config: &RouterConfig, paths: &[String]) -> Result<(), Box<dyn Error>> {
    let router = Router::from_config(config);
    let step = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(config.routes.len());
    for route in &config.routes {
        let name = route.name.clone();
        let step = Arc::clone(&step);
        let subscription = route
            .subscription()
            .listener(move |matched: Option<&Value>| -> Result<(), ListenerError> {
                let line = json!({
                    "step": step.load(Ordering::SeqCst),
                    "route": name,
                    "match": matched,
                });
                println!("{}", serde_json::to_string(&line)?);
                Ok(())
            })
            .build()?;
        handles.push(router.subscribe(subscription)?);
    }

    for (index, path) in paths.iter().enumerate() {
        step.store(index + 1, Ordering::SeqCst);
        let location = router.navigate(path.as_str())?;
        tracing::info!(step = index + 1, path = %location.path(), "Replayed navigation");
    }

    for handle in &handles {
        handle.unsubscribe();
    }
    Ok(())
}

fn check(config: &RouterConfig) -> Result<(), Box<dyn Error>> {
    let mut dispatcher = Dispatcher::new();
    for route in &config.routes {
        let subscription = route
            .subscription()
            .listener(|_: Option<&Value>| Ok(()))
            .build()?;
        dispatcher.insert(Arc::new(subscription), None);
    }

    println!(
        "metrics: {}",
        if config.observability.metrics_enabled { "enabled" } else { "disabled" }
    );
    println!(
        "max dispatch depth: {}",
        config
            .dispatch
            .max_depth
            .map(|depth| depth.to_string())
            .unwrap_or_else(|| "unbounded".to_string())
    );
    println!("{:<20} {:<12} {:<6} PATTERN", "ROUTE", "GROUP", "INDEX");
    for (_, subscription) in dispatcher.subscriptions() {
        let name = subscription.name().unwrap_or_default();
        let pattern = config
            .routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| if r.exact { format!("{} (exact)", r.pattern) } else { r.pattern.clone() })
            .unwrap_or_default();
        println!(
            "{:<20} {:<12} {:<6} {}",
            name,
            subscription.group_id().unwrap_or("-"),
            subscription
                .group_index()
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string()),
            pattern
        );
    }
    Ok(())
}

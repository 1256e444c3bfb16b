//! command-resolver CLI.
//!
//! Loads a command manifest, binds the built-in handlers, and resolves (or
//! executes) the names given on the command line.
//!
//! # Environment Variables
//!
//! See [`command_resolver::config`]. `RUST_LOG` sets the tracing filter
//! (default: "info,command_resolver=debug").
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin resolve -- ping pong
//! cargo run --bin resolve -- --manifest commands.yaml --exec ping 'echo={"k":1}'
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use command_resolver::handler::builtin_handlers;
use command_resolver::{
    Command, CommandExecutor, CommandResolver, HandlerRegistry, RegistryManifest, ResolverConfig,
    SharedHandler,
};

/// Resolve or execute command names against a manifest-declared registry.
#[derive(Debug, Parser)]
#[command(name = "resolve", version, about)]
struct Args {
    /// YAML manifest declaring the valid command names (overrides `COMMAND_MANIFEST`).
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Execute the commands instead of only resolving them.
    #[arg(short = 'x', long)]
    exec: bool,

    /// Command names, optionally with a JSON payload: `NAME[=JSON]`.
    names: Vec<String>,
}

fn build_registry(config: &ResolverConfig) -> anyhow::Result<HandlerRegistry<SharedHandler>> {
    let bindings: HashMap<String, SharedHandler> = builtin_handlers().into_iter().collect();

    let Some(path) = &config.manifest_path else {
        let mut registry = HandlerRegistry::new();
        for (name, handler) in bindings {
            registry.register(name, handler);
        }
        return Ok(registry);
    };

    let manifest = RegistryManifest::from_yaml_file(path)
        .with_context(|| format!("loading manifest {}", path.display()))?;
    let registry = HandlerRegistry::from_manifest(&manifest, bindings)?;

    for name in registry.unbound_names() {
        tracing::info!("Command '{}' is declared but has no built-in handler", name);
    }
    Ok(registry)
}

fn parse_command(arg: &str) -> anyhow::Result<Command> {
    match arg.split_once('=') {
        Some((name, data)) => {
            let data = serde_json::from_str(data)
                .with_context(|| format!("invalid JSON payload for '{}'", name))?;
            Ok(Command::new(name, data))
        }
        None => Ok(Command::named(arg)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,command_resolver=debug".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = ResolverConfig::from_env();
    if let Some(path) = args.manifest {
        config.manifest_path = Some(path);
    }

    let registry = build_registry(&config)?;
    tracing::info!("Registry loaded: {} commands", registry.len());

    let mut resolver = CommandResolver::new(&registry);
    if config.warn_on_miss {
        resolver = resolver.with_log_sink();
    }

    if args.names.is_empty() {
        for name in resolver.names() {
            let state = if resolver.contains(&name) { "ready" } else { "unavailable" };
            println!("{name}\t{state}");
        }
        return Ok(());
    }

    if args.exec {
        let commands = args
            .names
            .iter()
            .map(|arg| parse_command(arg))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let executor = CommandExecutor::new(resolver).with_max_commands(config.max_commands);
        let report = executor.drain(commands).await;

        for done in &report.completed {
            println!("{}\tok\t{}", done.command.name, done.output);
        }
        for (command, err) in &report.rejected {
            println!("{}\trejected\t{}", command.name, err);
        }
        for (command, err) in &report.failed {
            println!("{}\tfailed\t{}", command.name, err);
        }
        if !report.is_clean() {
            bail!(
                "{} rejected, {} failed, {} unprocessed",
                report.rejected.len(),
                report.failed.len(),
                report.unprocessed.len()
            );
        }
        return Ok(());
    }

    let mut missing = 0;
    for name in &args.names {
        match resolver.resolve(name) {
            Ok(handler) => println!("{name}\t{}", handler.name()),
            Err(err) => {
                missing += 1;
                println!("{name}\t{err}");
            }
        }
    }
    if missing > 0 {
        bail!("{} of {} names did not resolve", missing, args.names.len());
    }
    Ok(())
}

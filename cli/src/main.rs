//! jamctl - provision namespaces and collections on a JAM backend.
//!
//! `jamctl bootstrap` resolves configuration, loads the collections
//! manifest, and converges the backend: root namespace, every manifest
//! collection, manifest attributes, and the userified accounts collection.
//! `jamctl list` prints the backend's namespace listing.

use anyhow::{Context as _, Result, bail};
use jam_client::Jam;
use jam_config::Config;
use jam_core::BootstrapSpec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: jamctl [bootstrap|list] [--config <path>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Bootstrap,
    List,
}

#[derive(Debug)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Progress goes to stderr so `list` output on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut argv = argv.into_iter();
    let mut command = None;
    let mut config = None;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "bootstrap" if command.is_none() => command = Some(Command::Bootstrap),
            "list" if command.is_none() => command = Some(Command::List),
            "--config" => {
                let path = argv.next().with_context(|| format!("--config requires a path\n{USAGE}"))?;
                config = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }

    Ok(Args {
        command: command.unwrap_or(Command::Bootstrap),
        config,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(std::env::args().skip(1))?;
    let config =
        Config::resolve(args.config.as_deref()).context("failed to resolve configuration")?;
    let jam = Jam::new(config.url(), config.token())?;

    match args.command {
        Command::Bootstrap => {
            let manifest = jam_config::load_manifest(config.collections_path())
                .context("failed to load collections manifest")?;
            let spec = BootstrapSpec::from_config(&config, manifest)?;
            jam_core::run(&jam, &spec).await?;
            tracing::info!(namespace = %spec.namespace, "bootstrap complete");
        }
        Command::List => {
            let body = jam.list().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

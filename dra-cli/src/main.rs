use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dra_models::DeploymentMode;
use tracing::debug;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "dra", about = "Model registry for the deep research agent")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    mode: ModeArgs,
}

/// Deployment mode flags; the config file decides when neither is given.
#[derive(Args, Debug, Default)]
pub struct ModeArgs {
    /// Use the locally hosted OpenAI-compatible proxies
    #[arg(long, global = true, conflicts_with = "remote")]
    local_proxy: bool,

    /// Use each provider's public API
    #[arg(long, global = true)]
    remote: bool,
}

impl ModeArgs {
    /// The mode forced on the command line, if any.
    pub fn forced(&self) -> Option<DeploymentMode> {
        match (self.local_proxy, self.remote) {
            (true, _) => Some(DeploymentMode::LocalProxy),
            (_, true) => Some(DeploymentMode::Remote),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single prompt to a registered model
    Ask(commands::ask::AskArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Inspect registered models
    Models(commands::models::ModelsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => debug!("no .env file found"),
        Err(e) => return Err(e.into()),
    }

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &cli.mode).await,
        Commands::Config(args) => commands::config::run(args),
        Commands::Models(args) => commands::models::run(args, &cli.mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_flags() {
        let cli = Cli::try_parse_from(["dra", "--local-proxy", "models", "list"]).unwrap();
        assert_eq!(cli.mode.forced(), Some(DeploymentMode::LocalProxy));

        let cli = Cli::try_parse_from(["dra", "models", "list", "--remote"]).unwrap();
        assert_eq!(cli.mode.forced(), Some(DeploymentMode::Remote));

        let cli = Cli::try_parse_from(["dra", "models", "list"]).unwrap();
        assert_eq!(cli.mode.forced(), None);
    }

    #[test]
    fn test_mode_flags_conflict() {
        let result = Cli::try_parse_from(["dra", "--local-proxy", "--remote", "models", "list"]);
        assert!(result.is_err());
    }
}

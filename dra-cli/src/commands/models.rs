//! Model registry inspection commands.
//!
//! Lists registered bindings, shows one binding in detail, and checks that
//! every configured tool model resolves.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dra_models::adapters::Generate;
use dra_models::auth::CredentialPair;
use dra_models::{ModelEntry, ModelRegistry, ProviderFamily};

use super::Session;
use crate::ModeArgs;

/// Models management arguments.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

/// Models subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List registered models
    List {
        /// Filter by provider name (openai, anthropic, google, ...)
        #[arg(long)]
        provider: Option<String>,
    },
    /// Show detailed model information
    Info {
        /// Logical model name (e.g., gpt-4o, local-vllm)
        model: String,
    },
    /// Verify every configured tool model is registered
    Check,
}

/// Run models command.
pub fn run(args: ModelsArgs, mode: &ModeArgs) -> Result<()> {
    let session = Session::start(mode)?;
    match args.command {
        ModelsCommands::List { provider } => list_models(&session, provider.as_deref()),
        ModelsCommands::Info { model } => show_model_info(session.registry, &model),
        ModelsCommands::Check => check_models(&session),
    }
}

/// List registered models with optional provider filtering.
fn list_models(session: &Session, provider_filter: Option<&str>) -> Result<()> {
    let provider = provider_filter.map(parse_provider).transpose()?;

    let entries: Vec<&ModelEntry> = session
        .registry
        .names()
        .into_iter()
        .filter_map(|name| session.registry.get(name).ok())
        .filter(|entry| provider.is_none_or(|p| entry.adapter().provider() == p))
        .collect();

    if entries.is_empty() {
        if provider_filter.is_some() {
            println!("No models match the specified provider.");
        } else {
            println!("No models registered in {} mode.", session.mode);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Adapter").fg(Color::Cyan),
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Model ID").fg(Color::Cyan),
        Cell::new("Base").fg(Color::Cyan),
        Cell::new("Key").fg(Color::Cyan),
    ]);

    for entry in entries {
        let adapter = entry.adapter();
        let credentials = adapter.credentials();
        table.add_row(vec![
            Cell::new(entry.name()),
            Cell::new(adapter.kind()),
            Cell::new(adapter.provider()),
            Cell::new(adapter.model_id()),
            Cell::new(credentials.base_str()),
            key_state_cell(credentials),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Show detailed information about a specific model.
fn show_model_info(registry: &ModelRegistry, model_name: &str) -> Result<()> {
    let Ok(entry) = registry.get(model_name) else {
        bail!("Model '{}' not found", model_name);
    };
    let adapter = entry.adapter();
    let credentials = adapter.credentials();

    println!("Model: {}", entry.name());
    println!("Provider: {}", adapter.provider());
    println!("Adapter: {}", adapter.kind());
    println!("Model ID: {}", adapter.model_id());
    if let dra_models::adapters::Adapter::GenerateThenFetch(a) = adapter {
        println!("Fetch ID: {}", a.fetch_id());
    }
    println!();

    println!("Credentials:");
    println!("  Base: {}", credentials.base_str());
    println!("  Key: {}", key_state(credentials));
    Ok(())
}

/// Validate the configured tool selection against the registry.
fn check_models(session: &Session) -> Result<()> {
    let selection = session.selection();
    for (tool, name) in selection.tools() {
        println!("  {tool:<16} {name}");
    }

    let missing = selection.validate(session.registry);
    if missing.is_empty() {
        println!();
        println!("All tool models are registered.");
        return Ok(());
    }

    println!();
    for unresolved in &missing {
        println!("Error: {unresolved}");
    }
    bail!(
        "{} tool model(s) unresolved in {} mode",
        missing.len(),
        session.mode
    );
}

fn parse_provider(name: &str) -> Result<ProviderFamily> {
    let family = match name.to_lowercase().as_str() {
        "openai" => ProviderFamily::OpenAi,
        "anthropic" => ProviderFamily::Anthropic,
        "google" => ProviderFamily::Google,
        "qwen" => ProviderFamily::Qwen,
        "langchain" => ProviderFamily::LangChain,
        "vllm" => ProviderFamily::Vllm,
        "deepseek" => ProviderFamily::DeepSeek,
        _ => bail!(
            "Unknown provider '{}'. Valid: openai, anthropic, google, qwen, langchain, vllm, deepseek",
            name
        ),
    };
    Ok(family)
}

fn key_state(credentials: &CredentialPair) -> &'static str {
    if credentials.key.is_unset() {
        "unset"
    } else {
        "set"
    }
}

fn key_state_cell(credentials: &CredentialPair) -> Cell {
    let state = key_state(credentials);
    if credentials.key.is_unset() {
        Cell::new(state).fg(Color::Red)
    } else {
        Cell::new(state).fg(Color::Green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dra_models::Setting;

    #[test]
    fn parse_provider_known_names() {
        assert_eq!(parse_provider("openai").unwrap(), ProviderFamily::OpenAi);
        assert_eq!(parse_provider("vLLM").unwrap(), ProviderFamily::Vllm);
        assert_eq!(parse_provider("DeepSeek").unwrap(), ProviderFamily::DeepSeek);
    }

    #[test]
    fn parse_provider_unknown() {
        let err = parse_provider("ollama").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn key_state_reports_unset() {
        let unset = CredentialPair::new(Setting::Unset, Setting::from("http://x/v1"));
        let set = CredentialPair::new(Setting::from("sk"), Setting::from("http://x/v1"));
        assert_eq!(key_state(&unset), "unset");
        assert_eq!(key_state(&set), "set");
    }
}

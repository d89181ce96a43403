//! Console chat with the memory-backed character.

use anyhow::{Context, bail};
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use clap::Parser;
use log::{debug, info};
use mnemos_rs::config::MnemosConfig;
use mnemos_rs::core::prompt::system_prompt;
use mnemos_rs::core::{MemoryAgent, MemoryHooks, PersistOutcome, RetrievalOutcome};
use mnemos_rs::memory::{FileMemoryStore, MemoryStore};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

/// Fallback store location when the config sets none.
const DEFAULT_MEMORY_PATH: &str = ".mnemos/memory";

/// Inputs that end the conversation.
const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "종료"];

/// Command-line options for the console chat.
#[derive(Parser)]
#[command(name = "mnemos", version)]
struct Cli {
    /// Optional path to a mnemos.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Actor id to continue; a new one is generated when absent
    #[arg(long)]
    actor: Option<String>,
    /// Session id to continue; a new one is generated when absent
    #[arg(long)]
    session: Option<String>,
    /// OpenAI model name overriding the config
    #[arg(long)]
    model: Option<String>,
    /// Memory store directory overriding the config
    #[arg(long)]
    memory_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mnemos_rs::init_logging();

    let cli = Cli::parse();
    let config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        MnemosConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        info!("loading layered config from cwd: {}", cwd.display());
        let layered = MnemosConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };

    let model_name = cli.model.clone().unwrap_or_else(|| config.model.name.clone());
    let llm = build_llm(&config.model.provider, model_name)?;

    let memory_root = cli.memory_path.clone().unwrap_or_else(|| {
        PathBuf::from(
            config
                .memory
                .path
                .clone()
                .unwrap_or_else(|| DEFAULT_MEMORY_PATH.to_string()),
        )
    });
    let store: Arc<dyn MemoryStore> = Arc::new(
        FileMemoryStore::new(&memory_root)
            .context("failed to create memory store")?
            .with_top_k(config.memory.retrieve_top_k),
    );

    let actor_id = cli.actor.clone().unwrap_or_else(|| generate_id("user"));
    let session_id = cli.session.clone().unwrap_or_else(|| generate_id("session"));
    println!("🎹 {} (console)", config.character.name);
    println!("👤 actor: {actor_id}");
    println!("🔗 session: {session_id}");
    println!("💾 pass --actor and --session to continue this conversation later.");
    println!("{}", "-".repeat(50));

    let hooks = MemoryHooks::from_config(store, &config, actor_id, session_id);
    let mut agent = MemoryAgent::new(llm, hooks, system_prompt(&config.character));
    run_console(&mut agent, &config.character.name).await
}

async fn run_console(agent: &mut MemoryAgent, character: &str) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n👤 > ");
        std::io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next_line().await.context("read stdin")? else {
            break;
        };
        let input = line.trim();
        if is_exit_command(input) {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match agent.run(input).await {
            Ok(report) => {
                println!("\n🎹 {character}: {}", report.response);
                if let RetrievalOutcome::Failed { error } = &report.retrieval {
                    eprintln!("⚠️ memory retrieval failed: {error}");
                }
                if let PersistOutcome::Failed { error } = &report.persistence {
                    eprintln!("⚠️ memory save failed: {error}");
                }
            }
            Err(err) => eprintln!("\n❌ {err}"),
        }
    }
    println!("\n👋 bye");
    Ok(())
}

/// Build the chat provider named by `model.provider`.
fn build_llm(provider: &str, model_name: String) -> anyhow::Result<Arc<dyn LLMProvider>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
                bail!("OPENAI_API_KEY is required to run mnemos");
            };
            info!("building LLM provider (provider=openai, model={})", model_name);
            let llm: Arc<dyn LLMProvider> = LLMBuilder::<OpenAI>::new()
                .api_key(api_key)
                .model(model_name)
                .build()
                .context("failed to build OpenAI LLM provider")?;
            Ok(llm)
        }
        other => bail!("unsupported model provider: {other}"),
    }
}

fn is_exit_command(input: &str) -> bool {
    let lowered = input.to_lowercase();
    EXIT_COMMANDS.contains(&lowered.as_str())
}

/// `{prefix}_` followed by eight hex characters.
fn generate_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &simple[..8])
}

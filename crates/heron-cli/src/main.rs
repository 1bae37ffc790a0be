use anyhow::{Context, Result};
use clap::Parser;
use cliclack::spinner;
use console::style;
use std::env;

use heron::agent::Agent;
use heron::providers::configs::OpenAiProviderConfig;
use heron::providers::openai::OpenAiProvider;
use heron::tools;

#[derive(Parser)]
#[command(author, version, about = "Answer a question with an LLM and local tools", long_about = None)]
struct Cli {
    /// The question to answer
    question: String,

    /// Local file relevant to the question, mentioned to the model as a hint
    #[arg(short, long)]
    file: Option<String>,

    /// OpenAI API key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// API host
    #[arg(long, default_value = "https://api.openai.com")]
    host: String,

    /// Model to use
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,

    /// Maximum model/tool round trips before the run is truncated
    #[arg(long, default_value_t = 10)]
    max_steps: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .context("API key must be provided via --api-key or OPENAI_API_KEY environment variable")?;

    let config = OpenAiProviderConfig::new(cli.host.clone(), api_key, cli.model.clone());
    let provider = OpenAiProvider::new(config)?;

    let mut agent = Agent::new(Box::new(provider)).with_max_steps(cli.max_steps);
    for tool in tools::all() {
        agent.add_tool(tool);
    }

    let spin = spinner();
    spin.start("thinking");
    let answer = agent.run(&cli.question, cli.file.as_deref()).await;
    spin.stop("");

    println!("{}", style(answer).green());
    Ok(())
}

//! Colloquy CLI binary entry point.

use clap::Parser;
use colloquy::agent::{Agent, Attachment, ChatInput};
use colloquy::cli::{mime_for_path, Cli};
use colloquy::config::AgentConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AgentConfig::from_env()?;
    if let Some(model) = cli.model {
        config.completion_model = model;
    }

    let mut builder = Agent::builder(config).with_chain_of_thought(cli.thoughts);
    if let Some(instructions) = cli.instructions {
        builder = builder.with_instructions(instructions);
    }
    if let Some(effort) = cli.reasoning_effort {
        builder = builder.with_reasoning_effort(effort);
    }
    let mut agent = builder.build()?;

    let mut input = match (&cli.audio, cli.prompt) {
        (Some(path), _) => ChatInput::audio(tokio::fs::read(path).await?, mime_for_path(path)),
        (None, Some(prompt)) => ChatInput::text(prompt),
        (None, None) => return Err("a PROMPT or --audio file is required".into()),
    };
    if let Some(path) = &cli.image {
        let mut image = Attachment::new(tokio::fs::read(path).await?, mime_for_path(path));
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            image = image.with_filename(name);
        }
        input = input.with_attachment(image);
    }

    let reply = agent.chat(input).await?;
    println!("{reply}");

    let usage = agent.usage();
    tracing::info!(
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "Done"
    );
    Ok(())
}

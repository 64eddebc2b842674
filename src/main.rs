use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use cpf_chat::config::{LlmArgs, LlmConfig, SourceArgs};
use cpf_chat::{chat, constants, web_server, ChatEngine, ContentFetcher, OpenAiClient};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the chat web UI.
    Serve {
        #[arg(long, default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[command(flatten)]
        llm: LlmArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Chat with the bot in the terminal.
    Chat {
        #[command(flatten)]
        llm: LlmArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Ask a single question and print the answer.
    Ask {
        question: String,
        #[command(flatten)]
        llm: LlmArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the paragraph text scraped from the source article.
    Scrape {
        #[command(flatten)]
        source: SourceArgs,
    },
}

// Wire the completion client and article fetcher into an engine
fn build_engine(llm: LlmArgs, source: SourceArgs) -> Result<ChatEngine> {
    let client = OpenAiClient::new(LlmConfig::from(llm)).context("Failed to create completion client")?;
    info!(model = client.model(), source = %source.source_url, "Completion client ready");
    Ok(ChatEngine::new(Arc::new(client)).with_fetcher(ContentFetcher::new(source.source_url)))
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for OPENAI_API_KEY and friends)
    dotenvy::dotenv().ok();

    // Initialize tracing (logging) subscriber, writing to stderr so stdout stays for answers
    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,cpf_chat=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    info!("cpf-chat starting with command: {:?}", cli.command);

    // Handle the parsed command
    match cli.command {
        Commands::Serve { port, llm, source } => {
            let engine = build_engine(llm, source)?;

            // Start the web server in a separate asynchronous task
            // Declare as mutable for use in tokio::select!
            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, engine).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            // Keep the main thread alive and wait for shutdown signals or task completion
            let ctrl_c = tokio::signal::ctrl_c();
            // Pin the ctrl_c future to the stack so its address is stable
            tokio::pin!(ctrl_c);

            tokio::select! {
                // Wait for Ctrl-C signal for graceful shutdown
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down...");
                }
                // Handle potential completion/failure of the web server task
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            // Ensure the web server task is stopped if it's still running
            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Chat { llm, source } => {
            let engine = build_engine(llm, source)?;
            chat::run_chat(&engine).await.context("Chat session failed")?;
        }
        Commands::Ask { question, llm, source } => {
            let engine = build_engine(llm, source)?;
            // One-shot turn on a fresh session
            let mut session = engine.start_session().await;
            if let Some(notice) = session.notice() {
                eprintln!("Notice: {}", notice);
            }
            let outcome = engine
                .process_turn(&mut session, &question)
                .await
                .context("Failed to answer question")?;
            println!("{}", outcome.answer);
            println!();
            println!("Suggested questions:");
            for suggestion in session.suggestions().iter() {
                println!("- {}", suggestion);
            }
        }
        Commands::Scrape { source } => {
            // No completion client needed, only the article
            let text = ContentFetcher::new(source.source_url)
                .fetch()
                .await
                .context("Failed to load source article")?;
            println!("{}", text);
        }
    }

    Ok(())
}

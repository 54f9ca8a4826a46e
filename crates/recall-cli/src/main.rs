use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recall_cli::{
    config::Config,
    handlers::commands::{Command, HELP},
    handlers::stream::render_turn,
    state::AppState,
};
use recall_graph::TurnOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        model = %config.llm.model,
        provider = ?config.llm.provider,
        grounding = config.retrieval.enabled,
        "Starting recall"
    );

    let state = AppState::build(config).await?;
    let mut thread_id = state.config.chat.thread_id.clone();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("recall ({}), /help for commands\n", state.config.llm.model).as_bytes())
        .await?;

    loop {
        stdout.write_all(format!("[{}] > ", thread_id).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => stdout.write_all(format!("{}\n", HELP).as_bytes()).await?,
            Command::Unknown(input) => {
                stdout
                    .write_all(format!("unknown command {}, try /help\n", input).as_bytes())
                    .await?
            }
            Command::Switch(id) => thread_id = id,
            Command::Threads => {
                for id in state.orchestrator.store().thread_ids().await? {
                    let marker = if id == thread_id { "*" } else { " " };
                    stdout.write_all(format!("{} {}\n", marker, id).as_bytes()).await?;
                }
            }
            Command::Show => {
                let thread = state.orchestrator.thread(&thread_id).await?;
                if let Some(summary) = &thread.summary {
                    stdout.write_all(format!("summary:\n{}\n", summary).as_bytes()).await?;
                }
                stdout
                    .write_all(format!("{}\n", thread.history_text()).as_bytes())
                    .await?;
            }
            Command::Reset => {
                let existed = state.orchestrator.reset_thread(&thread_id).await?;
                tracing::info!(thread_id = %thread_id, existed, "Thread reset");
            }
            Command::Ask(question) => {
                let stream = match state
                    .orchestrator
                    .handle_turn(&thread_id, &question, TurnOptions::new())
                {
                    Ok(stream) => stream,
                    Err(e) => {
                        stdout.write_all(format!("[error: {}]\n", e).as_bytes()).await?;
                        continue;
                    }
                };

                // Dropping the render future cancels the turn
                let cancelled = tokio::select! {
                    outcome = render_turn(stream, &mut stdout) => {
                        let outcome = outcome?;
                        tracing::debug!(
                            thread_id = %thread_id,
                            grounded = ?outcome.grounded,
                            compacted = ?outcome.compacted,
                            duration_ms = ?outcome.duration_ms,
                            "Turn rendered"
                        );
                        false
                    }
                    _ = tokio::signal::ctrl_c() => true,
                };
                if cancelled {
                    stdout.write_all(b"\n[cancelled]\n").await?;
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so answers on stdout stay clean
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

// Interactive terminal chat.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::engine::ChatEngine;
use crate::error::TurnError;
use crate::session::ConversationSession;

pub async fn run_chat(engine: &ChatEngine) -> Result<()> {
    info!("Starting terminal chat session...");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut session = engine.start_session().await;
    run_chat_with(engine, &mut session, stdin, std::io::stdout()).await
}

/// Drive a session from `input` line by line until EOF or `quit`.
/// A line of `1`, `2` or `3` submits that suggestion.
pub async fn run_chat_with<R, W>(
    engine: &ChatEngine,
    session: &mut ConversationSession,
    input: R,
    mut out: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Ask Me Anything About CPF Bot. Type 'quit' to exit.")?;
    if let Some(notice) = session.notice() {
        writeln!(out, "Notice: {}", notice)?;
    }
    print_suggestions(&mut out, session)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let message = match line.parse::<usize>().ok().and_then(|n| session.suggestions().get(n)) {
            Some(suggestion) => {
                let suggestion = suggestion.to_string();
                writeln!(out, "You: {}", suggestion)?;
                suggestion
            }
            None => line.to_string(),
        };

        match engine.process_turn(session, &message).await {
            Ok(outcome) => {
                writeln!(out, "\nAI: {}\n", outcome.answer)?;
                print_suggestions(&mut out, session)?;
            }
            Err(TurnError::EmptyInput) => continue,
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                writeln!(out, "{}", crate::constants::TURN_FAILED_NOTICE)?;
            }
        }
    }

    writeln!(out, "Goodbye.")?;
    info!("Chat session finished.");
    Ok(())
}

fn print_suggestions<W: Write>(out: &mut W, session: &ConversationSession) -> Result<()> {
    writeln!(out, "Suggested questions:")?;
    for (i, suggestion) in session.suggestions().iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, suggestion)?;
    }
    Ok(())
}

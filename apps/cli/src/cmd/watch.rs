//! Sliding-window view of a response.

use anyhow::{Context, Result};
use console::{Term, style};
use futures_util::StreamExt;
use std::pin::pin;
use transport::{Connection, window::windows};

/// Send `prompt` and redraw the terminal for every window of `lines`
/// lookahead lines. The current line is shown first, in bold.
pub async fn run(addr: &str, prompt: &str, lines: usize) -> Result<()> {
    let mut conn = Connection::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    conn.send_prompt(prompt).await?;

    let term = Term::stdout();
    let mut shown = 0usize;
    {
        let mut windows = pin!(windows(conn.lines(), lines));
        loop {
            tokio::select! {
                window = windows.next() => match window {
                    Some(window) => {
                        render(&term, &window?)?;
                        shown += 1;
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }
    tracing::debug!("rendered {shown} windows");
    conn.close().await
}

pub(crate) fn render(term: &Term, window: &[String]) -> Result<()> {
    term.clear_screen()?;
    let Some((current, rest)) = window.split_first() else {
        return Ok(());
    };
    term.write_line(&style(current).bold().to_string())?;
    for line in rest {
        term.write_line(&style(line).dim().to_string())?;
    }
    Ok(())
}

//! Typing practice over a streamed response.

use crate::{
    cmd::watch::render,
    practice::{Analytics, Input, LineDrill, Step},
};
use anyhow::{Context, Result};
use console::{Term, style};
use futures_util::StreamExt;
use std::{pin::pin, time::Instant};
use transport::{Connection, window::windows};

/// Send `prompt`, then have the user type the response line by line.
///
/// Each window shows the line to type followed by `lines` lines of
/// lookahead. Esc stops early. A summary is printed at the end.
pub async fn run(addr: &str, prompt: &str, lines: usize) -> Result<()> {
    let mut conn = Connection::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    conn.send_prompt(prompt).await?;

    let term = Term::stdout();
    term.write_line("Press any key to start")?;
    blocking(&term, |term| term.read_key().map(drop)).await?;

    let started = Instant::now();
    let mut total = Analytics::default();
    {
        let mut windows = pin!(windows(conn.lines(), lines));
        while let Some(window) = windows.next().await {
            let window = window?;
            render(&term, &window)?;
            let Some(line) = window.first().cloned() else {
                continue;
            };
            let rows = window.len();
            let (analytics, quit) =
                blocking(&term, move |term| type_line(term, &line, rows)).await?;
            total.merge(analytics);
            if quit {
                break;
            }
        }
    }
    conn.close().await?;

    if let Some(accuracy) = total.accuracy() {
        term.clear_screen()?;
        term.write_line(&format!("{} errors made.", total.errors))?;
        term.write_line(&format!("{accuracy:.0}% Accuracy."))?;
        term.write_line(&format!("{:.0} WPM.", total.wpm(started.elapsed())))?;
        term.write_line(&format!("{} excess characters.", total.excess()))?;
    }
    Ok(())
}

/// Run terminal reads off the async workers.
async fn blocking<T, F>(term: &Term, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Term) -> std::io::Result<T> + Send + 'static,
{
    let term = term.clone();
    Ok(tokio::task::spawn_blocking(move || f(&term)).await??)
}

/// Drill over the first of `rows` rendered lines. Returns the line's score
/// and whether the user asked to stop.
fn type_line(term: &Term, line: &str, rows: usize) -> std::io::Result<(Analytics, bool)> {
    let mut drill = LineDrill::new(line);
    term.move_cursor_up(rows)?;
    term.move_cursor_right(drill.indent())?;
    loop {
        let key = term.read_key()?;
        let Some(input) = Input::from_key(&key) else {
            drill.ignored();
            continue;
        };
        match drill.press(input) {
            Step::Echo(marks) => {
                for mark in marks {
                    let styled = if mark.correct {
                        style(mark.ch).green()
                    } else {
                        style(mark.ch).red()
                    };
                    term.write_str(&styled.to_string())?;
                }
            }
            Step::Back => term.move_cursor_left(1)?,
            Step::Idle => {}
            Step::Done => return Ok((drill.analytics(), false)),
            Step::Quit => return Ok((drill.analytics(), true)),
        }
    }
}

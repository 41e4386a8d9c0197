//! Terminal session — drives a [`FormController`] from a line reader.
//!
//! DESIGN
//! ======
//! Both entry points are generic over their input and output so the same
//! code runs against stdin/stdout and against in-memory buffers.
//!
//! [`interactive`] reads one question per line and submits each one without
//! waiting for the previous answer. Snapshots are drawn as the controller
//! publishes them. The prompt is redrawn only once the response area has left
//! the pending state, so an answer never lands on the prompt line. At end of
//! input the session keeps drawing until every submission has settled.
//!
//! [`ask`] submits a single question and reports its outcome, so a failed
//! call can end the process with a non-zero status.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::controller::FormController;
use crate::state::Phase;
use crate::transport::TransportError;
use crate::view::Renderer;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("query failed: {0}")]
    Transport(#[from] TransportError),
    #[error("terminal io failed: {0}")]
    Io(#[from] io::Error),
}

/// Submit `question`, draw each state of the response area, and return the
/// answer.
///
/// # Errors
///
/// Returns [`SessionError::Transport`] when the submission fails and
/// [`SessionError::Io`] when writing to `out` fails.
pub async fn ask<W: Write>(
    controller: &FormController,
    question: impl Into<String>,
    out: W,
) -> Result<String, SessionError> {
    let mut renderer = Renderer::new(out);
    controller.set_query(question);
    renderer.echo_input(&controller.snapshot())?;

    let pending = controller.submit();
    renderer.draw(&controller.snapshot())?;

    let report = pending.await;
    renderer.draw(&controller.snapshot())?;
    Ok(report.outcome?)
}

/// Run the line-per-question loop until `input` ends and nothing is in flight.
///
/// # Errors
///
/// Returns [`SessionError::Io`] when reading `input` or writing `out` fails.
/// Failed submissions are not errors here; they surface through the
/// response area according to the controller's failure policy.
pub async fn interactive<R, W>(controller: &FormController, input: R, out: W) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut renderer = Renderer::new(out);
    renderer.banner()?;

    let mut updates = controller.subscribe();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut awaiting_prompt = false;
    renderer.prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    renderer.line_entered();
                    controller.set_query(line);
                    tokio::spawn(controller.submit());
                    awaiting_prompt = true;
                }
                None => input_open = false,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                renderer.draw(&snapshot)?;
                if awaiting_prompt && input_open && snapshot.phase != Phase::Pending {
                    renderer.prompt()?;
                    awaiting_prompt = false;
                }
            }
        }

        // Submissions are never cancelled; wait for stragglers after EOF.
        if !input_open && controller.snapshot().in_flight == 0 {
            renderer.draw(&controller.snapshot())?;
            break;
        }
    }

    Ok(())
}

//! Terminal rendering of the form.
//!
//! SYSTEM CONTEXT
//! ==============
//! The terminal plays the part of the page: the prompt line is the bound
//! input, a submitted line is the form submission, and the response area is
//! printed below it. [`project`] maps a snapshot to what should be visible;
//! [`Renderer`] writes only what changed since the last draw.

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use std::io::{self, Write};

use crate::state::FormState;

pub const TITLE: &str = "Query my tweets";

pub const SAMPLE_QUESTIONS: [&str; 3] = [
    "What television shows does the author watch?",
    "Does the author like dogs?",
    "How does the author feel about web frameworks?",
];

const PROMPT: &str = "> ";

/// Visible projection of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    /// Value shown in the input.
    pub input: String,
    /// Status or answer text shown under the input.
    pub response: String,
}

#[must_use]
pub fn project(state: &FormState) -> View {
    View { input: state.query.clone(), response: state.response_text.clone() }
}

/// Heading and sample questions printed once at startup.
#[must_use]
pub fn banner() -> String {
    let mut out = format!("{TITLE}\n\nTry some sample questions like...\n");
    for question in SAMPLE_QUESTIONS {
        out.push_str("  - ");
        out.push_str(question);
        out.push('\n');
    }
    out
}

/// Incremental writer for the response area.
pub struct Renderer<W: Write> {
    out: W,
    last_response: String,
    /// The cursor sits right after a prompt the user has not answered.
    at_prompt: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_response: String::new(), at_prompt: false }
    }

    /// Print the heading and sample questions.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", banner())?;
        self.out.flush()
    }

    /// Print the prompt without a trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.at_prompt = true;
        self.out.flush()
    }

    /// The user finished a line, so the terminal is already on a fresh one.
    pub fn line_entered(&mut self) {
        self.at_prompt = false;
    }

    /// Echo the input line for non-interactive use.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn echo_input(&mut self, state: &FormState) -> io::Result<()> {
        writeln!(self.out, "{PROMPT}{}", project(state).input)?;
        self.at_prompt = false;
        self.out.flush()
    }

    /// Write the response text if it differs from the last one drawn.
    /// Returns whether anything was written. Text that arrives while a
    /// prompt is waiting starts on its own line.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn draw(&mut self, state: &FormState) -> io::Result<bool> {
        let view = project(state);
        if view.response == self.last_response {
            return Ok(false);
        }
        if self.at_prompt {
            writeln!(self.out)?;
            self.at_prompt = false;
        }
        writeln!(self.out, "{}", view.response)?;
        self.out.flush()?;
        self.last_response = view.response;
        Ok(true)
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

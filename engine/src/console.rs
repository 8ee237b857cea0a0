//! Console collaborators: output channels and the confirmation prompt.
//!
//! The dispatcher never touches stdout, stderr or stdin directly. It talks to
//! a [`Console`], so a run can be driven by the real terminal or by a
//! [`BufferedConsole`] in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::warn;

/// Output sink and confirmation prompt used by a run.
pub trait Console {
    /// Writes a report to the standard channel.
    fn out(&mut self, text: &str);

    /// Writes an error line to the error channel.
    fn err(&mut self, text: &str);

    /// Asks a yes/no question. Blocks until answered; `false` means declined.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// The process terminal: stdout, stderr and a `y/N` prompt on stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn out(&mut self, text: &str) {
        println!("{text}");
    }

    fn err(&mut self, text: &str) {
        eprintln!("{text}");
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let stdin = io::stdin();
        confirm_from(&mut stdin.lock(), &mut io::stderr(), prompt)
    }
}

/// Reads one answer line. Only `y`/`yes` (any case) confirm; EOF and read
/// errors decline.
fn confirm_from(input: &mut impl BufRead, prompt_out: &mut impl Write, prompt: &str) -> bool {
    let _ = write!(prompt_out, "{prompt} [y/N] ");
    let _ = prompt_out.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(err) => {
            warn!(error = %err, "failed to read confirmation answer");
            false
        }
    }
}

/// In-memory console that records output and replays scripted answers.
///
/// Once the scripted answers run out every further prompt is declined.
///
/// # Examples
///
/// ```
/// use cmdtree::{BufferedConsole, Console};
///
/// let mut console = BufferedConsole::with_answers([true]);
/// assert!(console.confirm("Proceed?"));
/// assert!(!console.confirm("Again?"));
/// assert_eq!(console.prompts, vec!["Proceed?", "Again?"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BufferedConsole {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub prompts: Vec<String>,
    answers: VecDeque<bool>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console that answers prompts in order.
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Console for BufferedConsole {
    fn out(&mut self, text: &str) {
        self.stdout.push(text.to_string());
    }

    fn err(&mut self, text: &str) {
        self.stderr.push(text.to_string());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

// src/operator.rs
//! Operator boundary for the resolver.
//!
//! The resolver never reads stdin itself: whenever it needs a human decision it
//! builds a [`Prompt`] and hands it to an [`Operator`]. Adapters:
//! - [`LineEditorOperator`] is the interactive terminal adapter (rustyline: history,
//!   line editing, Ctrl-C / Ctrl-D handled as "no more input");
//! - [`ConsoleOperator`] renders prompts to any writer and reads answers line by line
//!   (stderr prompts under `--json`, in-memory buffers in tests);
//! - [`ScriptedOperator`] replays canned answers (batch replays and tests);
//! - [`DeclineAll`] answers blank to everything, so unknown words are skipped.
//!
//! End of input reads as a blank answer; [`Operator::exhausted`] tells callers
//! that keep asking (the score prompt) when to stop.

use crate::config::ScoreRange;
use crate::ranker::SuggestionList;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io::{BufRead, Write};

/// A question the resolver needs answered.
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    /// Pick one of the numbered suggestions, or leave blank.
    ChooseSuggestion {
        lexeme: &'a str,
        suggestions: &'a SuggestionList,
    },
    /// y/n: register the lexeme as a new lexicon entry?
    ConfirmRegistration { lexeme: &'a str },
    /// Free-text role tag for the new entry.
    RoleTag { lexeme: &'a str },
    /// Sentiment score; `retry` is set after an unparsable answer.
    SentimentScore {
        lexeme: &'a str,
        range: ScoreRange,
        retry: bool,
    },
}

impl Prompt<'_> {
    /// Console text for the prompt (question last, no trailing newline).
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            Prompt::ChooseSuggestion {
                lexeme,
                suggestions,
            } => {
                let _ = writeln!(out, "\nunknown lexeme found: '{lexeme}'");
                if suggestions.is_empty() {
                    let _ = writeln!(out, "no similar words found.");
                } else {
                    let _ = writeln!(out, "similar words:");
                    for (i, s) in suggestions.iter().enumerate() {
                        let _ = writeln!(out, "{}. {}", i + 1, s);
                    }
                }
                out.push_str("select number or leave blank to skip: ");
            }
            Prompt::ConfirmRegistration { lexeme } => {
                let _ = write!(out, "register '{lexeme}' as new? (y/n): ");
            }
            Prompt::RoleTag { lexeme } => {
                let _ = write!(out, "enter role tag for '{lexeme}': ");
            }
            Prompt::SentimentScore {
                lexeme,
                range,
                retry,
            } => {
                if *retry {
                    out.push_str("please enter a valid number.\n");
                }
                let _ = write!(
                    out,
                    "enter sentiment score for '{lexeme}' (range {}..{} advisory): ",
                    range.min, range.max
                );
            }
        }
        out
    }
}

/// Something that can answer prompts.
pub trait Operator {
    fn answer(&mut self, prompt: &Prompt<'_>) -> anyhow::Result<String>;

    /// Status line for the operator (selection confirmed, entry registered, ...).
    fn inform(&mut self, _message: &str) {}

    /// True once no further answers can arrive (EOF, script consumed).
    fn exhausted(&self) -> bool {
        false
    }
}

/// Interactive adapter over any line reader / writer pair.
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
    eof: bool,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            eof: false,
        }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn answer(&mut self, prompt: &Prompt<'_>) -> anyhow::Result<String> {
        self.output.write_all(prompt.render().as_bytes())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.eof = true;
            writeln!(self.output)?;
        }
        Ok(line.trim().to_string())
    }

    fn inform(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }

    fn exhausted(&self) -> bool {
        self.eof
    }
}

/// Terminal adapter backed by rustyline.
pub struct LineEditorOperator {
    editor: DefaultEditor,
    eof: bool,
}

impl LineEditorOperator {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            eof: false,
        })
    }
}

impl Operator for LineEditorOperator {
    fn answer(&mut self, prompt: &Prompt<'_>) -> anyhow::Result<String> {
        if self.eof {
            return Ok(String::new());
        }
        let rendered = prompt.render();
        let (preamble, question) = split_prompt(&rendered);
        if !preamble.is_empty() {
            print!("{preamble}");
        }
        match self.editor.readline(question) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                self.eof = true;
                println!();
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn inform(&mut self, message: &str) {
        println!("{message}");
    }

    fn exhausted(&self) -> bool {
        self.eof
    }
}

/// Split a rendered prompt into the lines printed above the input line and the
/// question rustyline shows inline.
fn split_prompt(rendered: &str) -> (&str, &str) {
    match rendered.rfind('\n') {
        Some(i) => rendered.split_at(i + 1),
        None => ("", rendered),
    }
}

/// Replays a fixed queue of answers; blank once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    asked: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// One answer per line, as written by hand in an answers file.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(str::trim))
    }

    /// Rendered prompts seen so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn answer(&mut self, prompt: &Prompt<'_>) -> anyhow::Result<String> {
        self.asked.push(prompt.render());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn inform(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn exhausted(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Non-interactive runs: every unknown word is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineAll;

impl Operator for DeclineAll {
    fn answer(&mut self, _prompt: &Prompt<'_>) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

/// `y`, `yes`, and the Spanish `s` / `si` / `sí`, any case.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

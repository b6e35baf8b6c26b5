//! Blocking question/answer prompts on a terminal.

use std::fs;
use std::io::{self, BufRead, Stdin, Stdout, Write};
use std::path::{Path, PathBuf};

use failure::Error;

use crate::error::TrimError;

pub const RETRY_QUESTION: &str = "No valid input received. Would you like to try that again?";

/// Interactive decisions the trimmer needs from the user.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> Result<bool, Error>;

    /// Asks for a non-negative number. Declining to retry after a bad answer
    /// yields `0.0`.
    fn ask_number(&mut self, question: &str) -> Result<f64, Error>;

    /// Returns the index of the chosen option.
    fn choose(&mut self, question: &str, options: &[String]) -> Result<usize, Error>;

    fn select_file(&mut self, question: &str, dir: &Path) -> Result<PathBuf, Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        if names.is_empty() {
            return Err(TrimError::invalid_argument(format!(
                "no files to choose from in {}",
                dir.display()
            ))
            .into());
        }
        names.sort();
        let index = self.choose(question, &names)?;
        Ok(dir.join(&names[index]))
    }
}

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Terminal::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Terminal { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String, Error> {
        write!(self.output, "? {} » ", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TrimError::invalid_argument(format!(
                "input closed before answering: {}",
                question
            ))
            .into());
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for Terminal<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, Error> {
        let question = format!("{} [y/n]", question);
        loop {
            match self.ask(&question)?.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer yes or no.")?,
            }
        }
    }

    fn ask_number(&mut self, question: &str) -> Result<f64, Error> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => return Ok(value),
                _ => {
                    tracing::debug!("rejected numeric answer {:?}", answer);
                    if !self.confirm(RETRY_QUESTION)? {
                        return Ok(0.0);
                    }
                }
            }
        }
    }

    fn choose(&mut self, question: &str, options: &[String]) -> Result<usize, Error> {
        if options.is_empty() {
            return Err(TrimError::invalid_argument("nothing to choose from").into());
        }
        writeln!(self.output, "? {}", question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }
        loop {
            let answer = self.ask("Enter a number")?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}.",
                    options.len()
                )?,
            }
        }
    }
}

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Line-oriented terminal I/O for the session.
///
/// Every `ask*` method returns `Ok(None)` once input is exhausted.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn show(&mut self, text: impl Display) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Prompt and return the next non-blank line, trimmed.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.show(prompt)?;
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    /// Prompt until the answer parses as `T`.
    pub fn ask_parsed<T: FromStr>(&mut self, prompt: &str, what: &str) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say(format_args!("'{answer}' is not a valid {what}."))?,
            }
        }
    }

    /// First character of the next non-blank line.
    pub fn ask_command(&mut self, prompt: &str) -> io::Result<Option<char>> {
        Ok(self.ask(prompt)?.and_then(|answer| answer.chars().next()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

//! Interactive console prompts.
//!
//! Wraps the common "ask a question, read a line" interactions with an
//! injectable reader and writer so tests can script both sides.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Prompting helper with configurable affixes and accepted answers.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    /// Prefix prepended to every question.
    pub prefix: String,
    /// Suffix appended to yes/no questions.
    pub yes_no_suffix: String,
    /// Answers accepted as "yes".
    pub yes_answers: Vec<String>,
    /// Answers accepted as "no".
    pub no_answers: Vec<String>,
    /// Line printed when an answer is neither yes nor no.
    pub invalid_response: String,
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt on the real console.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prefix: String::new(),
            yes_no_suffix: " <y|n>? ".to_string(),
            yes_answers: vec!["y".to_string(), "yes".to_string()],
            no_answers: vec!["n".to_string(), "no".to_string()],
            invalid_response: "Invalid response. Try again (Ctrl+C to exit).".to_string(),
        }
    }

    /// Ask `question` and return the answer line without its newline.
    /// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
    pub fn read_string(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}{}", self.prefix, question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a response",
            ));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Ask a yes/no question, re-prompting until an accepted answer arrives.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.ask_yes_no(question, false)
    }

    /// Like [`Prompt::confirm`], without appending the yes/no suffix.
    pub fn confirm_bare(&mut self, question: &str) -> io::Result<bool> {
        self.ask_yes_no(question, true)
    }

    fn ask_yes_no(&mut self, question: &str, bare: bool) -> io::Result<bool> {
        let prompt = if bare {
            question.to_string()
        } else {
            format!("{}{}", question, self.yes_no_suffix)
        };

        loop {
            let answer = self.read_string(&prompt)?;
            if self.yes_answers.iter().any(|a| *a == answer) {
                return Ok(true);
            }
            if self.no_answers.iter().any(|a| *a == answer) {
                return Ok(false);
            }
            writeln!(self.output, "{}", self.invalid_response)?;
        }
    }
}

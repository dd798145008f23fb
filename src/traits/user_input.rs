use anyhow::{Context, Result};
#[cfg(test)]
use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
#[cfg(test)]
use std::sync::Mutex;

/// Trait for user input operations to enable testing with mocks
pub trait UserInput: Send + Sync {
    /// Display a free-text prompt and return the raw answer
    fn text(&self, prompt: &str, help: Option<&str>) -> Result<String>;
}

/// Real user input implementation using inquire crate.
///
/// When stdin is not a terminal (piped answers, CI) each prompt consumes one
/// line of stdin instead.
pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn text(&self, prompt: &str, help: Option<&str>) -> Result<String> {
        use inquire::Text;

        if !std::io::stdin().is_terminal() {
            print!("{} ", prompt);
            std::io::stdout().flush().ok();
            return read_answer(&mut std::io::stdin().lock(), prompt);
        }

        let mut text_prompt = Text::new(prompt);
        if let Some(help_message) = help {
            text_prompt = text_prompt.with_help_message(help_message);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer)
    }
}

/// Read one line as the answer to `prompt`, without its line ending.
/// End of input is an error, like a closed prompt.
fn read_answer(reader: &mut impl BufRead, prompt: &str) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .with_context(|| format!("Failed to read answer to '{}'", prompt))?;
    if read == 0 {
        anyhow::bail!("Standard input closed before answering '{}'", prompt);
    }

    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

/// Mock user input implementation for testing
#[cfg(test)]
pub struct MockUserInput {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockUserInput {
    /// Create new mock with no pre-configured answers
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create mock with pre-configured answers, consumed in order
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl UserInput for MockUserInput {
    fn text(&self, prompt: &str, _help: Option<&str>) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more mock answers available for '{}'", prompt))
    }
}

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{AlertError, Result};

/// Where prompts go and answers come from.
pub trait Console {
    fn ask(&mut self, prompt: &str) -> Result<String>;
    fn say(&mut self, line: &str);
}

/// Blocking stdin/stdout session.
pub struct StdConsole;

impl Console for StdConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut buffer = String::new();
        let read = io::stdin().lock().read_line(&mut buffer)?;
        if read == 0 {
            return Err(AlertError::InvalidInput("input closed".to_string()));
        }
        Ok(buffer.trim().to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|l| l.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| AlertError::InvalidInput(format!("no scripted answer for {prompt:?}")))
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

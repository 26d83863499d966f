//! Interactive prompts

use crate::error::{ConfigError, Result};
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of answers for missing configuration
pub trait Prompter: Send + Sync {
    /// Whether questions can be asked at all
    fn is_interactive(&self) -> bool;

    /// Ask for a line of text. The answer is trimmed.
    fn text(&self, message: &str) -> Result<String>;

    /// Ask for a secret without echoing it
    fn password(&self, message: &str) -> Result<String>;

    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self) -> Result<String> {
        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(ConfigError::Prompt("input closed".to_string()));
        }
        Ok(input.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn text(&self, message: &str) -> Result<String> {
        print!("{} {} ", "?".green().bold(), message.bold());
        io::stdout().flush()?;
        self.read_line()
    }

    fn password(&self, message: &str) -> Result<String> {
        let prompt = format!("{} {} ", "?".green().bold(), message.bold());
        let secret = rpassword::prompt_password(prompt)?;
        Ok(secret.trim().to_string())
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        print!("{} {} {} ", "?".green().bold(), message.bold(), hint.dimmed());
        io::stdout().flush()?;

        let answer = self.read_line()?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }
}

/// Refuses every question
///
/// Used for `--no-input`, `CFMP_NO_INPUT=1` and when stdin is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn is_interactive(&self) -> bool {
        false
    }

    fn text(&self, message: &str) -> Result<String> {
        Err(ConfigError::Prompt(format!(
            "cannot ask '{}' without a terminal",
            message
        )))
    }

    fn password(&self, message: &str) -> Result<String> {
        self.text(message)
    }

    fn confirm(&self, _message: &str, default: bool) -> Result<bool> {
        Ok(default)
    }
}

/// Ask until a non-empty answer is given
pub(crate) fn ask_non_empty(
    prompter: &dyn Prompter,
    message: &str,
    secret: bool,
) -> Result<String> {
    loop {
        let answer = if secret {
            prompter.password(message)?
        } else {
            prompter.text(message)?
        };

        if !answer.is_empty() {
            return Ok(answer);
        }
        eprintln!("{}", "A value is required.".yellow());
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedPrompter;
    use super::*;

    #[test]
    fn test_ask_non_empty_repeats() {
        let prompter = ScriptedPrompter::new(&["", "", "value"]);

        let answer = ask_non_empty(&prompter, "Account ID", false).unwrap();

        assert_eq!(answer, "value");
        assert_eq!(prompter.asked.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_non_interactive_refuses() {
        let prompter = NonInteractive;

        assert!(!prompter.is_interactive());
        assert!(matches!(prompter.text("x"), Err(ConfigError::Prompt(_))));
        assert!(prompter.confirm("x", true).unwrap());
    }
}

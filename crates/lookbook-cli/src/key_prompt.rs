//! Terminal API key prompt

use std::io::{self, BufRead, IsTerminal, Write};

use lookbook_gen::CredentialPrompt;

/// Reads a key from stdin, but only when stdin is an interactive terminal
pub struct TerminalKeyPrompt;

impl CredentialPrompt for TerminalKeyPrompt {
    fn is_available(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn select_key(&mut self) -> Option<String> {
        print!("Enter API key (leave empty to cancel): ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let key = line.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

use std::io::{self, BufRead, Write};

/// Asks the visitor to approve a destructive action before it runs.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Interactive yes/no prompt on the terminal. Anything but `y`/`yes`
/// declines, including read errors and end of input.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_affirmative(&line),
            Err(e) => {
                log::warn!("confirm: could not read answer: {}", e);
                false
            }
        }
    }
}

/// Accepts every prompt (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

use dialoguer::Input;
use log::warn;
#[cfg(test)]
use mockall::automock;

/// Asks the operator a question on the terminal.
#[cfg_attr(test, automock)]
pub trait PromptOps {
    /// The typed answer, or `None` when nothing could be read (end of input,
    /// no terminal attached).
    fn ask(&self, prompt: &str) -> Option<String>;
}

pub struct TerminalPrompt;

impl PromptOps for TerminalPrompt {
    fn ask(&self, prompt: &str) -> Option<String> {
        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(answer) => Some(answer),
            Err(err) => {
                warn!("Could not read an answer: {}", err);
                None
            }
        }
    }
}

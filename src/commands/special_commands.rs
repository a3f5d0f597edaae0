//! Special commands parser for interactive chat mode
//!
//! This module parses special commands entered during an interactive chat
//! session. Special commands let the user:
//! - Toggle voice input
//! - Pick one of the suggested quick actions
//! - View session status and server-side history
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the screen rather than being sent to the coach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start voice capture, or stop it if already listening
    ToggleVoice,

    /// List the quick actions, or load one into the input (1-based)
    QuickAction(Option<usize>),

    /// Display conversation id, message count and voice status
    ShowStatus,

    /// Fetch and print the server-side conversation history
    ShowHistory,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the coach as a regular message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not
/// a valid command, and `CommandError::UnsupportedArgument` if a command
/// receives an invalid argument.
///
/// # Examples
///
/// ```
/// use fitcoach::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/voice").unwrap(), SpecialCommand::ToggleVoice);
/// assert_eq!(parse_special_command("/quick 2").unwrap(), SpecialCommand::QuickAction(Some(2)));
/// assert_eq!(parse_special_command("我需要营养建议").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/voice" | "/mic" => Ok(SpecialCommand::ToggleVoice),

        "/quick" => Ok(SpecialCommand::QuickAction(None)),
        input if input.starts_with("/quick ") => {
            let arg = input["/quick ".len()..].trim();
            match arg.parse::<usize>() {
                Ok(n) if n > 0 => Ok(SpecialCommand::QuickAction(Some(n))),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/quick".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        "/status" => Ok(SpecialCommand::ShowStatus),
        "/history" => Ok(SpecialCommand::ShowHistory),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

INPUT:
  /voice          - Start voice input, or stop it while listening
  /mic            - Same as /voice
  /quick          - List suggested prompts
  /quick <n>      - Load suggested prompt <n> into the input line

SESSION INFORMATION:
  /status         - Show conversation id, message count and voice status
  /history        - Show the server-side history of this conversation

OTHER:
  /help           - Show this help message
  exit, quit      - Exit the chat session

Anything else is sent to the coach.
"#
    );
}

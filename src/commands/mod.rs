/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`    - Interactive chat with the coach
- `send`    - One-shot turn, printing the reply
- `history` - Print the server-side history of a conversation

The handlers build a [`ChatScreen`](crate::screen::ChatScreen) from the
loaded configuration and drive it; rendering lives in `render`.
*/

use crate::api::{ChatApi, ConversationHistory, HttpChatApi};
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

// Special commands parser for the interactive loop
pub mod special_commands;

fn build_api(config: &Config) -> Result<Arc<dyn ChatApi>> {
    Ok(Arc::new(HttpChatApi::new(&config.api)?))
}

// Terminal rendering helpers shared by the handlers
pub mod render {
    use super::*;
    use crate::capture::CapturePhase;
    use crate::screen::ScreenSnapshot;
    use crate::session::{Message, Role};
    use colored::Colorize;

    /// Format one transcript message for the terminal
    pub fn format_message(message: &Message) -> String {
        let label = match message.role {
            Role::User => "you".blue().bold(),
            Role::Assistant if message.is_error => "coach".red().bold(),
            Role::Assistant => "coach".green().bold(),
        };
        let body = if message.is_error {
            message.content.red().to_string()
        } else {
            message.content.clone()
        };
        match &message.intent {
            Some(intent) => {
                let tag = format!("[intent: {}]", intent);
                format!("{}: {}\n{}", label, body, tag.dimmed())
            }
            None => format!("{}: {}", label, body),
        }
    }

    /// Line shown while a turn is outstanding
    pub fn typing_indicator() -> String {
        "coach is typing...".dimmed().to_string()
    }

    /// Display welcome banner at the start of interactive chat mode
    pub fn print_welcome_banner(snapshot: &ScreenSnapshot) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║            Fitcoach Interactive Chat - Welcome!              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        for message in &snapshot.messages {
            println!("{}\n", format_message(message));
        }
        if !snapshot.capture_supported {
            println!("{}", "Voice input is not available in this terminal.".dimmed());
        }
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Print the numbered quick actions
    pub fn print_quick_actions(actions: &[String]) {
        if actions.is_empty() {
            println!("No suggestions once the conversation has started.\n");
            return;
        }
        println!("Quick start:");
        for (i, action) in actions.iter().enumerate() {
            println!("  {}. {}", i + 1, action);
        }
        println!();
    }

    /// Display status for the `/status` command
    pub fn print_status(snapshot: &ScreenSnapshot) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Fitcoach Session Status                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Conversation: {}",
            snapshot.conversation_id.as_deref().unwrap_or("(not started)")
        );
        println!("Messages:     {}", snapshot.messages.len());
        let voice = if !snapshot.capture_supported {
            "unavailable".dimmed().to_string()
        } else if snapshot.capture_phase == CapturePhase::Listening {
            "listening".yellow().to_string()
        } else {
            "idle".to_string()
        };
        println!("Voice input:  {}", voice);
        if let Some(error) = &snapshot.capture_error {
            println!("Last voice error: {}", error.to_string().red());
        }
        println!();
    }

    /// Print a server-side conversation history
    pub fn print_history(history: &ConversationHistory) {
        println!("Conversation {}:", history.conversation_id.cyan());
        if history.messages.is_empty() {
            println!("  (empty)");
        }
        for entry in &history.messages {
            println!("  [{}] {}", entry.role, entry.content);
        }
        println!();
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Opens a chat screen and runs a readline loop: plain lines are typed
    //! into the compose buffer and submitted, `/` lines are special commands.

    use super::render::*;
    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::capture::{CaptureError, CapturePhase, UnsupportedBackend};
    use crate::error::FitcoachError;
    use crate::screen::ChatScreen;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Errors
    ///
    /// Returns error if the API client or line editor cannot be created,
    /// or the terminal fails mid-session
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let api = build_api(&config)?;
        let mut screen = ChatScreen::open(&config, api, Box::new(UnsupportedBackend));
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&screen.snapshot());
        print_quick_actions(screen.quick_actions());

        let result = loop {
            // A quick action or finalized transcript pre-fills the line
            let initial = screen.composer().text().to_string();
            let prompt = format!("{} ", ">>".cyan().bold());
            match rl.readline_with_initial(&prompt, (initial.as_str(), "")) {
                Ok(line) => {
                    // The edited line supersedes the pre-filled buffer
                    screen.type_text("");
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => {}
                        Ok(SpecialCommand::Exit) => break Ok(()),
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status(&screen.snapshot());
                            continue;
                        }
                        Ok(SpecialCommand::ShowHistory) => {
                            match screen.history().await {
                                Ok(Some(history)) => print_history(&history),
                                Ok(None) => println!("No conversation yet.\n"),
                                Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::QuickAction(None)) => {
                            print_quick_actions(screen.quick_actions());
                            continue;
                        }
                        Ok(SpecialCommand::QuickAction(Some(n))) => {
                            if !screen.choose_quick_action(n - 1) {
                                eprintln!("{}\n", format!("No quick action {}", n).red());
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ToggleVoice) => {
                            match screen.toggle_voice() {
                                Ok(CapturePhase::Listening) => println!("{}", "Listening...".yellow()),
                                Ok(CapturePhase::Idle) => {}
                                Err(CaptureError::Unsupported) => {
                                    println!("{}\n", "Voice input is not available.".dimmed())
                                }
                                Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
                            }
                            continue;
                        }
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    }

                    screen.type_text(trimmed);
                    let Some(request) = screen.begin_submit() else {
                        tracing::debug!("Submit rejected");
                        continue;
                    };
                    println!("{}", typing_indicator());
                    let outcome = screen.api().send_message(&request).await;
                    let reply = screen.complete_submit(outcome);
                    println!("\n{}\n", format_message(reply));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break Ok(());
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break Ok(());
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break Err(FitcoachError::Readline(err).into());
                }
            }
        };

        screen.close();
        println!("Goodbye!");
        result
    }
}

// One-shot send handler
pub mod send {
    //! Send a single turn and print the reply.

    use super::render::format_message;
    use super::*;
    use crate::error::FitcoachError;
    use crate::session::SessionStore;

    /// Send `message`, optionally continuing `conversation_id`
    ///
    /// Prints the reply followed by the conversation id to use next.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be built, the message is blank,
    /// or the turn fails
    pub async fn run_send(
        config: Config,
        message: String,
        conversation_id: Option<String>,
    ) -> Result<()> {
        let api = build_api(&config)?;
        let mut store = match conversation_id {
            Some(id) => SessionStore::resume(&config.chat, id),
            None => SessionStore::new(&config.chat),
        };

        let reply = store
            .submit(api.as_ref(), &message)
            .await
            .cloned()
            .ok_or_else(|| FitcoachError::Api("Message cannot be empty".to_string()))?;

        println!("{}", format_message(&reply));
        if reply.is_error {
            return Err(FitcoachError::Api("Chat turn failed".to_string()).into());
        }
        if let Some(id) = store.conversation_id() {
            println!("\nconversation_id: {}", id);
        }
        Ok(())
    }
}

// History handler
pub mod history {
    //! Print a server-side conversation.

    use super::render::print_history;
    use super::*;

    /// Fetch and print the history of `conversation_id`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the conversation is unknown
    pub async fn run_history(config: Config, conversation_id: String) -> Result<()> {
        let api = build_api(&config)?;
        let history = api.conversation_history(&conversation_id).await?;
        print_history(&history);
        Ok(())
    }
}

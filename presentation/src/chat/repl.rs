//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ProgressReporter};
use fiesta_application::{ChatSessionService, SendOutcome};
use fiesta_domain::{ChatId, ProviderKey};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    New,
    List,
    Switch(ChatId),
    Delete(ChatId),
    Quota,
    Show,
    Dismiss,
    /// Known command with a bad argument; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/new" => ReplCommand::New,
            "/list" | "/chats" => ReplCommand::List,
            "/quota" => ReplCommand::Quota,
            "/show" => ReplCommand::Show,
            "/dismiss" => ReplCommand::Dismiss,
            "/switch" => match arg.and_then(|a| a.parse().ok()) {
                Some(id) => ReplCommand::Switch(id),
                None => ReplCommand::Usage("/switch <chat id>"),
            },
            "/delete" => match arg.and_then(|a| a.parse().ok()) {
                Some(id) => ReplCommand::Delete(id),
                None => ReplCommand::Usage("/delete <chat id>"),
            },
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    service: ChatSessionService,
    providers: Vec<ProviderKey>,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(service: ChatSessionService, providers: Vec<ProviderKey>) -> Self {
        Self {
            service,
            providers,
            show_progress: true,
            history_path: dirs::data_dir().map(|p| p.join("ai-fiesta").join("history.txt")),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override where line history is kept
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_path = path;
        }
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(history) = self.history_path.as_deref().and_then(open_history) {
            editor = editor.with_history(Box::new(history));
        }

        self.print_welcome();

        loop {
            self.service.tick(Instant::now());
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(format!("fiesta {}", self.service.quota())),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }
                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("AI Fiesta - Chat Mode"));
        println!();
        println!(
            "Providers: {}",
            ConsoleFormatter::format_providers(&self.providers)
        );
        println!("{}", ConsoleFormatter::format_quota(self.service.quota()));
        println!(
            "Active chat: {} ({})",
            self.service.active_chat().title(),
            self.service.active_chat().id()
        );
        println!();
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /new             - Start a new chat");
        println!("  /list            - List chats (* marks the active one)");
        println!("  /switch <id>     - Make another chat active");
        println!("  /delete <id>     - Delete a chat");
        println!("  /show            - Show the active chat's responses");
        println!("  /quota           - Show messages used this session");
        println!("  /dismiss         - Hide the limit notice");
        println!("  /help, /h, /?    - Show this help");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::New => {
                let id = self.service.new_chat();
                println!("Started chat {}", id);
            }
            ReplCommand::List => print!("{}", ConsoleFormatter::format_chat_list(self.service.chats())),
            ReplCommand::Switch(id) => match self.service.switch_chat(id) {
                Ok(()) => println!("Switched to {}", self.service.active_chat().title()),
                Err(e) => println!("{}", e),
            },
            ReplCommand::Delete(id) => match self.service.delete_chat(id) {
                Ok(()) => println!(
                    "Deleted chat {}. Active: {}",
                    id,
                    self.service.active_chat().title()
                ),
                Err(e) if e.is_last_chat() => println!("The only chat cannot be deleted"),
                Err(e) => println!("{}", e),
            },
            ReplCommand::Show => {
                let chat = self.service.active_chat();
                if chat.responses().is_empty() {
                    println!("No responses in {} yet", chat.title());
                }
                for record in chat.responses() {
                    println!("{}", ConsoleFormatter::format_record(record));
                }
            }
            ReplCommand::Quota => println!("{}", ConsoleFormatter::format_quota(self.service.quota())),
            ReplCommand::Dismiss => self.service.dismiss_notice(),
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_message(&mut self, message: &str) {
        let outcome = if self.show_progress {
            let progress = ProgressReporter::new();
            self.service.send_with_progress(message, &progress).await
        } else {
            self.service.send(message).await
        };

        match outcome {
            SendOutcome::Delivered(record) => {
                println!("{}", ConsoleFormatter::format_record(&record));
                println!("{}", ConsoleFormatter::format_quota(self.service.quota()));
                println!();
            }
            SendOutcome::LimitReached { quota } if quota.can_send() => {
                println!("Type a message first.");
            }
            SendOutcome::LimitReached { quota } => {
                println!("{}", ConsoleFormatter::format_limit_notice(quota));
            }
            SendOutcome::Busy => println!("Still waiting for the previous message."),
        }
    }
}

/// Open the line history file, creating its directory; `None` on failure
fn open_history(path: &Path) -> Option<FileBackedHistory> {
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!("Could not create history directory {}: {}", parent.display(), e);
        return None;
    }
    match FileBackedHistory::with_file(HISTORY_CAPACITY, path.to_path_buf()) {
        Ok(history) => Some(history),
        Err(e) => {
            warn!("Could not open history file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_history_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.txt");
        assert!(open_history(&path).is_some());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_open_history_reports_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        assert!(open_history(&blocker.join("history.txt")).is_none());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/new"), ReplCommand::New);
        assert_eq!(ReplCommand::parse("/list"), ReplCommand::List);
        assert_eq!(ReplCommand::parse("/quota"), ReplCommand::Quota);
    }

    #[test]
    fn test_parse_commands_with_ids() {
        assert_eq!(
            ReplCommand::parse("/switch 1700000000000"),
            ReplCommand::Switch(ChatId::new(1_700_000_000_000))
        );
        assert_eq!(
            ReplCommand::parse("/delete  42 "),
            ReplCommand::Delete(ChatId::new(42))
        );
        assert_eq!(
            ReplCommand::parse("/switch"),
            ReplCommand::Usage("/switch <chat id>")
        );
        assert_eq!(
            ReplCommand::parse("/delete abc"),
            ReplCommand::Usage("/delete <chat id>")
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ReplCommand::parse("/frobnicate now"),
            ReplCommand::Unknown("/frobnicate".to_string())
        );
    }
}

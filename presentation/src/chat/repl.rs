//! REPL (Read-Eval-Print Loop) for interactive chat

use super::attachment::load_attachment;
use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use arkcutt_application::{
    NoTurnProgress, RunTurnInput, RunTurnOutput, RunTurnUseCase, TurnConfig, TurnError,
    TurnProgressNotifier,
};
use arkcutt_domain::{Attachment, Message};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

const HISTORY_CAPACITY: usize = 500;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Attach a file to the next message
    Attach(PathBuf),
    /// Forget the conversation and pending attachments
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    /// Parse a prompt line; `None` when it is a regular message.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        Some(match name {
            "/attach" | "/a" if !arg.is_empty() => ChatCommand::Attach(PathBuf::from(arg)),
            "/reset" => ChatCommand::Reset,
            "/help" | "/h" | "/?" => ChatCommand::Help,
            "/quit" | "/exit" | "/q" => ChatCommand::Quit,
            _ => ChatCommand::Unknown(line.to_string()),
        })
    }
}

/// Interactive chat REPL
///
/// Keeps the conversation across turns; each user line runs one turn.
pub struct ChatRepl {
    use_case: RunTurnUseCase,
    config: TurnConfig,
    show_progress: bool,
    format: OutputFormat,
    conversation: Vec<Message>,
    pending: Vec<Attachment>,
}

impl ChatRepl {
    pub fn new(use_case: RunTurnUseCase, config: TurnConfig) -> Self {
        Self {
            use_case,
            config,
            show_progress: true,
            format: OutputFormat::Text,
            conversation: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Start with files already attached to the first message
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.pending = attachments;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("arkcutt").join("history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("{} {}", "History disabled:".yellow(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("arkcutt".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ChatCommand::parse(line) {
                        if self.handle_command(command) {
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
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│       ArkCutt - Laser Cutting Quotes        │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!("{} {}", "Model:".bold(), self.config.model);
        if !self.pending.is_empty() {
            println!(
                "{} {}",
                "Attached:".bold(),
                self.pending
                    .iter()
                    .map(|a| a.filename.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /attach <file>    - Attach a DXF file to your next message");
        println!("  /reset            - Start a new conversation");
        println!("  /help, /h, /?     - Show this help");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ChatCommand) -> bool {
        match command {
            ChatCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ChatCommand::Help => Self::print_help(),
            ChatCommand::Reset => {
                self.conversation.clear();
                self.pending.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            ChatCommand::Attach(path) => match load_attachment(&path) {
                Ok(attachment) => {
                    println!(
                        "{} {} (sent with your next message)",
                        "Attached".green(),
                        attachment.filename
                    );
                    self.pending.push(attachment);
                }
                Err(e) => eprintln!("{} {}: {}", "Cannot attach".red(), path.display(), e),
            },
            ChatCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_message(&mut self, text: &str) {
        let mut message = Message::user(text);
        for attachment in self.pending.drain(..) {
            message = message.with_attachment(attachment);
        }
        self.conversation.push(message);
        println!();

        let input = RunTurnInput::new(self.conversation.clone(), self.config.clone());
        let token = CancellationToken::new();
        let use_case = self.use_case.clone().with_cancellation(token.clone());

        let reporter = ProgressReporter::new();
        let progress: &dyn TurnProgressNotifier = if self.show_progress {
            &reporter
        } else {
            &NoTurnProgress
        };

        let run = use_case.execute(input, progress);
        tokio::pin!(run);
        let result = tokio::select! {
            result = &mut run => result,
            _ = tokio::signal::ctrl_c() => {
                token.cancel();
                run.await
            }
        };

        match result {
            Ok(output) => {
                let rendered = match self.format {
                    OutputFormat::Text => ConsoleFormatter::format(&output),
                    OutputFormat::Reply => ConsoleFormatter::format_reply(&output),
                    OutputFormat::Json => ConsoleFormatter::format_json(&output),
                };
                println!("{}", rendered);
                if let Some(record) = assistant_record(&output) {
                    self.conversation.push(record);
                }
            }
            Err(e) => {
                // Put the message back so it can be retried
                if let Some(message) = self.conversation.pop() {
                    self.pending = message.attachments;
                }
                Self::print_error(&e);
            }
        }
        println!();
    }

    fn print_error(error: &TurnError) {
        if error.is_cancelled() {
            eprintln!("{}", "Cancelled.".yellow());
        } else {
            eprintln!("{} {}", "Error:".red().bold(), error);
        }
    }
}

/// Assistant message carried into later turns.
///
/// Holds the reply plus the latest successful payload of each tool, so
/// analysis figures and quotes stay visible to the model after a turn that
/// ended without text.
fn assistant_record(output: &RunTurnOutput) -> Option<Message> {
    let mut payloads = Map::new();
    for entry in output.history.entries() {
        if let (true, Some(payload)) = (entry.result.success, &entry.result.payload) {
            payloads.insert(entry.result.tool_name.clone(), payload.clone());
        }
    }

    let mut parts = Vec::new();
    if !output.text.is_empty() {
        parts.push(output.text.clone());
    }
    if !payloads.is_empty() {
        let json = serde_json::to_string(&Value::Object(payloads)).ok()?;
        parts.push(format!("Tool results: {}", json));
    }
    (!parts.is_empty()).then(|| Message::assistant(parts.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::{ErrorKind, History, TerminationReason, ToolCall, ToolError, ToolResult};
    use serde_json::json;

    fn output(text: &str, history: History) -> RunTurnOutput {
        RunTurnOutput {
            text: text.to_string(),
            history,
            steps: 2,
            termination: TerminationReason::StopPolicy {
                policy: "quote_success".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ChatCommand::parse("hola"), None);
        assert_eq!(ChatCommand::parse("/quit"), Some(ChatCommand::Quit));
        assert_eq!(ChatCommand::parse(" /reset "), Some(ChatCommand::Reset));
        assert_eq!(
            ChatCommand::parse("/attach designs/box v2.dxf"),
            Some(ChatCommand::Attach(PathBuf::from("designs/box v2.dxf")))
        );
    }

    #[test]
    fn test_attach_without_path_is_unknown() {
        assert_eq!(
            ChatCommand::parse("/attach"),
            Some(ChatCommand::Unknown("/attach".to_string()))
        );
        assert!(matches!(
            ChatCommand::parse("/frobnicate"),
            Some(ChatCommand::Unknown(_))
        ));
    }

    #[test]
    fn test_record_keeps_tool_payloads_without_text() {
        let mut history = History::new();
        history.append(
            1,
            ToolCall::new("analyzeDXF"),
            ToolResult::success("analyzeDXF", json!({"dimensions": {"area_mm2": 12000.0}})),
        );
        history.append(
            2,
            ToolCall::new("calculateQuote"),
            ToolResult::success("calculateQuote", json!({"costs": {"total": 7.2}})),
        );

        let record = assistant_record(&output("", history)).unwrap();
        assert!(record.content.starts_with("Tool results: "));
        assert!(record.content.contains("\"area_mm2\":12000.0"));
        assert!(record.content.contains("\"total\":7.2"));
    }

    #[test]
    fn test_record_skips_failures() {
        let mut history = History::new();
        history.append(
            1,
            ToolCall::new("calculateQuote"),
            ToolResult::failure(
                "calculateQuote",
                ToolError::new(ErrorKind::PreconditionNotMet, "analyze the file first"),
            ),
        );
        assert!(assistant_record(&output("", history.clone())).is_none());

        let record = assistant_record(&output("Sube tu DXF.", history)).unwrap();
        assert_eq!(record.content, "Sube tu DXF.");
    }
}

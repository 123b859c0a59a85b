//! CLI entrypoint for ArkCutt
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use arkcutt_application::{
    ConversationLogger, NoConversationLogger, NoTurnProgress, RunTurnInput, RunTurnUseCase,
    TurnConfig, TurnProgressNotifier, TurnRequest,
};
use arkcutt_domain::{Message, Model};
use arkcutt_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolConverter, JsonlConversationLogger, OpenAiGateway,
    QuoteServices, ToolInvoker, quote_tool_registry,
};
use arkcutt_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, load_attachment,
};
use clap::Parser;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!(e))?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    config.validate().context("Invalid configuration")?;

    let log_file = cli.log_file.clone().or_else(|| config.logging.log_file.clone());
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;

    info!("Starting ArkCutt");

    let turn_config = resolve_turn_config(&cli, &config)?;

    // === Dependency Injection ===
    let use_case = build_use_case(&config, turn_config.parallel_tool_calls)?;

    let attachments = cli
        .file
        .iter()
        .map(|path| {
            load_attachment(path).with_context(|| format!("Cannot read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    // Request mode: JSON in, JSON out
    if let Some(path) = &cli.request {
        return run_request(&use_case, turn_config, path).await;
    }

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, turn_config)
            .with_progress(!cli.quiet)
            .with_format(cli.output)
            .with_attachments(attachments);

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let text = match cli.message {
        Some(text) => text,
        None if !attachments.is_empty() => "Quote the attached design.".to_string(),
        None => bail!("A message is required. Use --chat for interactive mode."),
    };

    let mut message = Message::user(text);
    for attachment in attachments {
        message = message.with_attachment(attachment);
    }
    let input = RunTurnInput::new(vec![message], turn_config);

    let reporter = ProgressReporter::new();
    let progress: &dyn TurnProgressNotifier = if cli.quiet || cli.output == OutputFormat::Json {
        &NoTurnProgress
    } else {
        &reporter
    };

    let output = use_case.execute(input, progress).await?;

    let rendered = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&output),
        OutputFormat::Reply => ConsoleFormatter::format_reply(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", rendered);

    Ok(ExitCode::SUCCESS)
}

/// Initialize logging based on verbosity level.
///
/// With a log file, diagnostics go through a non-blocking writer; the
/// returned guard flushes it on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Cannot create {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Turn settings from the config file with command-line overrides applied.
fn resolve_turn_config(cli: &Cli, config: &FileConfig) -> Result<TurnConfig> {
    let mut turn_config = config.turn_config();
    if let Some(model) = &cli.model {
        turn_config = turn_config.with_model(model.parse::<Model>()?);
    }
    if let Some(max_steps) = cli.max_steps {
        if max_steps == 0 {
            bail!("--max-steps must be at least 1");
        }
        turn_config = turn_config.with_max_steps(max_steps);
    }
    if cli.sequential {
        turn_config = turn_config.with_parallel_tool_calls(false);
    }
    Ok(turn_config)
}

/// `parallel_tool_calls` is what the model endpoint is told, so it must
/// follow any `--sequential` override.
fn build_use_case(config: &FileConfig, parallel_tool_calls: bool) -> Result<RunTurnUseCase> {
    let services = QuoteServices::from_config(&config.services)?;
    let catalog = services.catalog(config.catalog.source);
    let registry = Arc::new(quote_tool_registry(&services, catalog)?);
    let executor = Arc::new(ToolInvoker::new(registry));

    let gateway = Arc::new(
        OpenAiGateway::from_config(&config.model)?
            .with_parallel_tool_calls(parallel_tool_calls),
    );

    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    Ok(
        RunTurnUseCase::new(gateway, executor, Arc::new(JsonSchemaToolConverter))
            .with_conversation_logger(logger),
    )
}

/// Run one JSON turn request and print the outcome as JSON.
///
/// Failures print the transport error payload and exit non-zero.
async fn run_request(
    use_case: &RunTurnUseCase,
    config: TurnConfig,
    path: &Path,
) -> Result<ExitCode> {
    let body = if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        body
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?
    };

    let result = match TurnRequest::from_json(&body) {
        Ok(request) => {
            use_case
                .execute(RunTurnInput::from_request(request, config), &NoTurnProgress)
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            println!("{}", ConsoleFormatter::format_json(&output));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.payload())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("arkcutt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_sequential_overrides_config() {
        let config = ConfigLoader::load_defaults();
        assert!(config.turn.parallel_tool_calls);

        let turn_config = resolve_turn_config(&cli(&["--sequential", "hola"]), &config).unwrap();
        assert!(!turn_config.parallel_tool_calls);

        let turn_config = resolve_turn_config(&cli(&["hola"]), &config).unwrap();
        assert!(turn_config.parallel_tool_calls);
    }

    #[test]
    fn test_zero_max_steps_rejected() {
        let config = ConfigLoader::load_defaults();
        assert!(resolve_turn_config(&cli(&["--max-steps", "0", "hola"]), &config).is_err());

        let turn_config =
            resolve_turn_config(&cli(&["--max-steps", "3", "hola"]), &config).unwrap();
        assert_eq!(turn_config.max_steps, 3);
    }

    #[tokio::test]
    async fn test_malformed_request_returns_failure_code() {
        let config = ConfigLoader::load_defaults();
        let use_case = build_use_case(&config, false).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turn.json");
        std::fs::write(&path, "{ not json").unwrap();

        let code = run_request(&use_case, config.turn_config(), &path)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}

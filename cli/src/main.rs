//! CLI entrypoint for Pitch Coach
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use coach_application::{
    GenerateTopicError, GenerateTopicUseCase, HistoryQuery, OperationError, RoutingProgress,
    SessionStore, SubmitPracticeError, SubmitPracticeInput, SubmitPracticeUseCase,
    ViewHistoryUseCase, ViewProgressUseCase,
};
use coach_domain::FeedbackRequest;
use coach_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, FileSessionStore, FileStorageConfig,
    InMemorySessionStore, ProviderRouter, configured_adapters,
};
use coach_presentation::{
    Cli, Command, ConsoleFormatter, HistoryArgs, JsonFormatter, OutputFormat, OutputFormatter,
    ProgressReporter,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Pitch Coach");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .context("Failed to load configuration")?;

    if cli.show_config {
        show_config(&cli, &file_config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    if !file_config.output.color {
        colored::control::set_override(false);
    }
    let format = cli
        .output
        .or(file_config.output.format.map(|f| match f {
            FileOutputFormat::Text => OutputFormat::Text,
            FileOutputFormat::Json => OutputFormat::Json,
        }))
        .unwrap_or(OutputFormat::Text);
    let formatter: Box<dyn OutputFormatter> = match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    // === Dependency Injection ===
    let store = session_store(&file_config.storage);

    // History and progress only read local data; no provider is needed.
    let title = match &command {
        Command::History(args) => {
            let text = show_history(store, formatter.as_ref(), &cli.user, args).await?;
            println!("{}", text);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Progress => {
            let report = ViewProgressUseCase::new(store).execute(&cli.user).await?;
            println!("{}", formatter.format_progress(&report));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Feedback(_) => "Feedback",
        Command::Topic { .. } => "Topic",
    };

    let router_config = file_config.router_config()?;
    let adapters = configured_adapters(&file_config.provider_config());
    if !adapters.iter().any(|a| a.kind() == router_config.primary()) {
        bail!(
            "Primary provider {} could not be initialized. Check API key configuration.",
            router_config.primary()
        );
    }

    let reporter = (!cli.quiet && format == OutputFormat::Text)
        .then(|| Arc::new(ProgressReporter::new(title)));
    let mut router = ProviderRouter::new(router_config, adapters);
    if let Some(reporter) = &reporter {
        router = router.with_progress(Arc::clone(reporter) as Arc<dyn RoutingProgress>);
    }
    let gateway = Arc::new(router);

    // Ctrl-C abandons the in-flight provider call and any backoff wait
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            on_signal.cancel();
        }
    });

    let rendered = match command {
        Command::Feedback(args) => {
            let use_case = SubmitPracticeUseCase::new(gateway, store);
            let request = FeedbackRequest::new(args.topic, args.goal, args.main_points, args.pitch);
            let result = use_case
                .execute_with_cancellation(SubmitPracticeInput::new(cli.user, request), &cancel)
                .await;
            finish(&reporter);
            match result {
                Ok(output) => Ok(formatter.format_feedback(&output)),
                Err(SubmitPracticeError::Feedback(e)) => Err(e),
                Err(e) => bail!(e),
            }
        }
        Command::Topic { role } => {
            let use_case = GenerateTopicUseCase::new(gateway);
            let result = use_case.execute_with_cancellation(&role, &cancel).await;
            finish(&reporter);
            match result {
                Ok(topic) => Ok(formatter.format_topic(&topic)),
                Err(GenerateTopicError::Topic(e)) => Err(e),
                Err(e) => bail!(e),
            }
        }
        Command::History(_) | Command::Progress => return Ok(ExitCode::SUCCESS),
    };

    Ok(print_outcome(formatter.as_ref(), rendered))
}

async fn show_history(
    store: Arc<dyn SessionStore>,
    formatter: &dyn OutputFormatter,
    user: &str,
    args: &HistoryArgs,
) -> Result<String> {
    let use_case = ViewHistoryUseCase::new(store);
    if let Some(id) = &args.id {
        return Ok(formatter.format_session(&use_case.get(user, id).await?));
    }
    let query = HistoryQuery {
        page: args.page,
        limit: args.limit,
        date_from: args.from,
        date_to: args.to,
        min_score: args.min_score,
        max_score: args.max_score,
    };
    Ok(formatter.format_history(&use_case.list(user, query).await?))
}

/// On-disk history when a data directory is available, otherwise this run only.
fn session_store(storage: &FileStorageConfig) -> Arc<dyn SessionStore> {
    match storage.root() {
        Some(root) => {
            info!(path = %root.display(), "Storing practice history");
            Arc::new(FileSessionStore::new(root))
        }
        None => {
            if storage.persist {
                warn!("No data directory found; practice history will not be kept");
            }
            Arc::new(InMemorySessionStore::new())
        }
    }
}

fn finish(reporter: &Option<Arc<ProgressReporter>>) {
    if let Some(reporter) = reporter {
        reporter.finish();
    }
}

fn print_outcome(formatter: &dyn OutputFormatter, rendered: Result<String, OperationError>) -> ExitCode {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", formatter.format_failure(&e));
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("{}", formatter.format_failure(&e));
            ExitCode::FAILURE
        }
    }
}

fn show_config(cli: &Cli, file_config: &FileConfig) -> Result<()> {
    if cli.no_config {
        println!("Configuration files disabled (--no-config)");
    } else {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
    }

    println!();
    println!("Effective configuration:");
    println!("{}", file_config.to_toml()?);

    match file_config.router_config() {
        Ok(router) => {
            let providers = file_config.provider_config();
            let configured: Vec<&str> = [
                ("anthropic", providers.anthropic.api_key.is_some()),
                ("gemini", providers.gemini.api_key.is_some()),
            ]
            .into_iter()
            .filter_map(|(name, has_key)| has_key.then_some(name))
            .collect();
            println!(
                "Primary: {}, Fallback: {}, Credentials found: {}",
                router.primary(),
                router
                    .fallback()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                if configured.is_empty() {
                    "none".to_string()
                } else {
                    configured.join(", ")
                }
            );
        }
        Err(e) => println!("Invalid router settings: {}", e),
    }
    Ok(())
}

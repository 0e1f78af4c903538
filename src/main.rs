use anyhow::{Context, bail};
use clap::Parser;
use fitbot::api::{self, app_state::AppState};
use fitbot::cli::{Cli, Command, PreferenceCollector, Repl, collect_interactive};
use fitbot::config::{AppConfig, ConfigLoader};
use fitbot::llm::create_chat_model;
use fitbot::observability::{
    AppMetrics, HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
};
use fitbot::services::session::{ChatSession, SessionSettings};
use fitbot::storage::CorpusLoader;
use fitbot::storage::ingest::ingest_directory;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            ConfigLoader::load_from(path)?
        }
        None => ConfigLoader::load()?,
    };

    let _guard = init_tracing(&config.logging, "fitbot");
    info!(
        "Starting {} ({}) v{}",
        config.app_name, config.environment, VERSION
    );

    match cli.command_or_default() {
        Command::Chat => run_chat(config).await,
        Command::Serve { port } => run_server(config, port).await,
        Command::Ingest { input, output } => run_ingest(&config, input, output),
    }
}

/// 终端对话
async fn run_chat(config: AppConfig) -> anyhow::Result<()> {
    ConfigLoader::validate(&config)?;

    let corpus = CorpusLoader::load(&config.corpus).context("failed to load corpus")?;
    let chat_model = create_chat_model(&config.llm)?;

    println!("Fitness Knowledge Bot");
    let stdin = io::stdin();
    let preferences = if stdin.is_terminal() {
        collect_interactive()?
    } else {
        PreferenceCollector::new(stdin.lock(), io::stdout()).collect()?
    };
    let Some(preferences) = preferences else {
        info!("Input closed before preferences were chosen");
        return Ok(());
    };

    let mut session = ChatSession::open(
        preferences,
        chat_model,
        &SessionSettings::from_config(&config),
    );
    Repl::new(stdin.lock(), io::stdout(), &corpus)
        .run(&mut session)
        .await?;

    let transcript = session.close();
    if let Some(mean) = transcript.mean_metric() {
        println!(
            "Session finished after {} interactions (mean BLEU {:.2}, mean WER {:.2})",
            transcript.len(),
            mean.bleu,
            mean.wer
        );
    }
    io::stdout().flush()?;
    Ok(())
}

/// HTTP 服务
async fn run_server(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    ConfigLoader::validate(&config)?;

    let corpus = CorpusLoader::load(&config.corpus).context("failed to load corpus")?;
    let corpus_summary = format!(
        "{} categories, {} rows, {} curated entries",
        corpus.content.category_count(),
        corpus.content.row_count(),
        corpus.curated.len()
    );
    info!("Corpus loaded: {}", corpus_summary);

    let chat_model = create_chat_model(&config.llm)?;
    info!("Chat model initialized: {}", chat_model.model());

    let metrics = Arc::new(AppMetrics::default());
    let app_state = AppState::from_config(&config, corpus, chat_model, metrics.clone());
    info!("Application state created");

    if config.server.session_idle_secs > 0 {
        let _sweeper =
            app_state.spawn_session_sweeper(Duration::from_secs(config.server.session_idle_secs));
        info!(
            "Idle sessions expire after {}s",
            config.server.session_idle_secs
        );
    }

    // 创建可观测性状态并集成路由
    let observability_state = Arc::new(ObservabilityState::new(VERSION, metrics));
    observability_state
        .add_health_check(HealthCheckResult::healthy("corpus", corpus_summary))
        .await;
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}

/// 文本导入
fn run_ingest(config: &AppConfig, input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| config.corpus.content_dir.clone());
    let written = ingest_directory(&input, &output)
        .with_context(|| format!("failed to ingest {}", input.display()))?;

    info!("Ingested {} documents into {}", written, output.display());
    println!("Wrote {} content tables to {}", written, output.display());
    Ok(())
}

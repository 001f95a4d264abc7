use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clipcheck_core::{
    EvaluateRequest, Pipeline, Provider, error::error_chain, format_run_readable,
};
use console::style;
use tracing::info;

use crate::config::AppConfig;

mod config;
mod routes;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Parser)]
#[command(name = "clipcheck")]
#[command(about = "Fact-check YouTube videos against web sources with AI")]
pub struct Cli {
    /// AI provider for query and evaluation generation
    #[arg(short, long, global = true, default_value = "gemini")]
    provider: CliProvider,

    /// Model name. Defaults to the provider's model.
    #[arg(short, long, global = true, env = "CLIPCHECK_MODEL")]
    model: Option<String>,

    /// Preferred transcript language; other languages are tried if it is missing
    #[arg(short, long, global = true, default_value = "en")]
    language: String,

    /// Google Custom Search API key
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    /// Google Programmable Search engine id
    #[arg(long, global = true, env = "GOOGLE_CX")]
    google_cx: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },
    /// Evaluate a single video and print the report
    Check {
        /// YouTube video id, e.g. dQw4w9WgXcQ
        video_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Validate API keys early
    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    let pipeline = Arc::new(config.build_pipeline()?);

    match cli.command {
        Command::Serve { host, port } => serve(pipeline, &host, port).await,
        Command::Check { video_id } => check(&pipeline, video_id).await,
    }
}

async fn serve(pipeline: Arc<Pipeline>, host: &str, port: u16) -> Result<()> {
    let app = routes::router(pipeline);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn check(pipeline: &Pipeline, video_id: String) -> Result<()> {
    let video_id = match Pipeline::validate(&EvaluateRequest::new(video_id)) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(2);
        }
    };

    println!(
        "\n{}  {}\n",
        style("clipcheck").cyan().bold(),
        style("Video Fact Checker").dim()
    );

    let started = Instant::now();
    let run = pipeline.execute(video_id).await;

    println!(
        "{} {} {}",
        style("Run").dim(),
        style(run.run_id).dim(),
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_run_readable(&run));

    if let Err(e) = &run.outcome {
        eprintln!(
            "{} failed while {}: {}",
            style("Error:").red().bold(),
            run.failed_in()
                .map(|stage| stage.to_string())
                .unwrap_or_default(),
            error_chain(e)
        );
        std::process::exit(1);
    }

    Ok(())
}

// AppleChat console entry point
// Reads one question per line and prints the answer

use anyhow::Context;
use applechat_core::config::parse_flag;
use applechat_core::{AppError, ChatConfig, ChatSupervisorHandle, JsonFileSource};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const RELOAD_COMMAND: &str = ":recarregar";
const STATUS_COMMAND: &str = ":status";
const QUIT_COMMAND: &str = ":sair";

fn init_tracing() {
    let json = std::env::var("APPLECHAT_LOG_JSON")
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout only carries answers.
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}

fn print_line(text: &str) {
    println!("[{}] {}", Local::now().format("%H:%M:%S"), text);
}

async fn reload(handle: &ChatSupervisorHandle, source: &JsonFileSource) {
    match handle.reload_from(source).await {
        Ok(report) => {
            if let Some(e) = &report.metrics_error {
                warn!("Metrics unavailable: {}", e);
            }
            print_line(&report.status.describe());
        }
        Err(e) => {
            error!("Reload failed: {}", e);
            print_line(&format!("Falha ao carregar os dados: {}", e));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = ChatConfig::from_env().context("invalid configuration")?;
    info!(
        dataset = %config.dataset_path.display(),
        metrics = %config.metrics_path.display(),
        "Starting AppleChat"
    );

    let source = JsonFileSource::from_config(&config);
    let handle = ChatSupervisorHandle::spawn(config);
    reload(&handle, &source).await;

    print_line("Pergunte sobre as maçãs (:recarregar, :status, :sair).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        match question {
            QUIT_COMMAND => break,
            RELOAD_COMMAND => reload(&handle, &source).await,
            STATUS_COMMAND => match handle.status().await {
                Ok(status) => print_line(&status.describe()),
                Err(e) => print_line(&format!("Erro: {}", e)),
            },
            _ => match handle.ask(question.to_string()).await {
                Ok(reply) => print_line(&reply.answer),
                Err(AppError::NotReady) => print_line(
                    "Os dados ainda não foram carregados. Aguarde o processamento e use :recarregar.",
                ),
                Err(e) => {
                    error!("Question failed: {}", e);
                    print_line(&format!("Erro: {}", e));
                }
            },
        }
    }

    handle.shutdown().await?;
    info!("AppleChat stopped");
    Ok(())
}

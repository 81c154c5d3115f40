use clap::Parser;
use docsearch_core::config;
use docsearch_server::api::create_router;
use docsearch_server::api::handlers::AppState;
use docsearch_server::api::metrics;
use docsearch_server::context::{ArtifactPaths, SearchContext};
use docsearch_server::embedding::EmbeddingArgs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docsearch-server", about = "TF-IDF, BM25 and dense document search API")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = config::DEFAULT_HOST, env = "DOCSEARCH_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT, env = "DOCSEARCH_PORT")]
    port: u16,

    /// Directory holding the trained artifacts
    #[arg(short, long, default_value = config::DEFAULT_MODELS_DIR, env = "DOCSEARCH_MODELS_DIR")]
    models_dir: PathBuf,

    /// Fail startup if any search strategy cannot be loaded
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Graceful shutdown timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    shutdown_timeout: u64,

    #[command(flatten)]
    embedding: EmbeddingArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("docsearch_server=info".parse()?)
                .add_directive("docsearch_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if !args.models_dir.is_dir() {
        tracing::warn!(
            "Models directory {:?} does not exist; search strategies will be unavailable",
            args.models_dir
        );
    }

    let paths = ArtifactPaths::in_dir(&args.models_dir);
    let context = match SearchContext::load(&paths, &args.embedding, args.strict).await {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Error: failed to load search artifacts (strict mode): {}", e);
            std::process::exit(1);
        }
    };

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    metrics::update_corpus_metrics(&context);

    let all_loaded = context.all_loaded();
    let state = AppState {
        context: Arc::new(context),
        prometheus_handle,
        start_time: Instant::now(),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!(
        addr = %addr,
        models_dir = ?args.models_dir,
        degraded = !all_loaded,
        "docsearch ready"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let shutdown_timeout = Duration::from_secs(args.shutdown_timeout);
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_signal())
            .await
    };
    tokio::select! {
        result = server => result?,
        _ = drain_deadline(shutdown_timeout) => {
            tracing::warn!(
                "In-flight requests did not drain within {}s, exiting",
                shutdown_timeout.as_secs()
            );
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves `timeout` after the first shutdown signal; never resolves before it.
async fn drain_deadline(timeout: Duration) {
    wait_for_signal_quiet().await;
    tokio::time::sleep(timeout).await;
}

async fn wait_for_signal() {
    wait_for_signal_quiet().await;
    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}

async fn wait_for_signal_quiet() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::debug!("Received SIGINT"),
        _ = terminate => tracing::debug!("Received SIGTERM"),
    }
}

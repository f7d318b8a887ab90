use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use goalflow_core::planner::RulePlanner;
use goalflow_core::PlanLimits;
use goalflow_exec::executor::{EventSink, Executor, ExecutorConfig, NoOpEventSink, ReqwestHttpClient, StdoutEventSink};
use goalflow_exec::{CredentialStore, SystemClock};
use goalflow_store::{run_migrations, SqliteRecordStore};

mod api;

#[derive(Debug, Parser)]
#[command(name = "goalflow", version, about = "Execute natural-language goals as HTTP call chains")]
struct Args {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1:8080", env = "GOALFLOW_ADDR")]
    addr: SocketAddr,

    /// SQLite database URL for saved executions.
    #[arg(long, default_value = "sqlite://goalflow.db", env = "GOALFLOW_DB")]
    database_url: String,

    /// Per-step request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Maximum number of steps a plan may contain.
    #[arg(long, default_value_t = 10)]
    max_steps: usize,

    /// Emit run events as JSON lines on stdout.
    #[arg(long)]
    events: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteRecordStore::connect(&args.database_url, 5).await?;
    run_migrations(store.pool()).await?;

    let planner = RulePlanner::with_default_catalog(PlanLimits {
        max_steps: args.max_steps,
    });

    let event_sink: Arc<dyn EventSink> = if args.events {
        Arc::new(StdoutEventSink)
    } else {
        Arc::new(NoOpEventSink)
    };

    let executor = Executor::new(
        ExecutorConfig {
            request_timeout: Duration::from_secs(args.timeout_secs),
            ..ExecutorConfig::default()
        },
        Arc::new(ReqwestHttpClient::default()),
        Arc::new(CredentialStore::from_env()),
        Arc::new(SystemClock),
        event_sink,
    );

    let state = api::AppState::new(Arc::new(planner), Arc::new(executor), Arc::new(store));
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    tracing::info!("listening on {}", args.addr);
    axum::serve(listener, router).await?;
    Ok(())
}

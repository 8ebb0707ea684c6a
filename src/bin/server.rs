use std::{env, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use contas::{
    AppState, RetryPolicy, ServiceCredentials, TransactionStore, build_router, connect_with_policy,
    graceful_shutdown, logging_middleware,
};

/// The environment variable consulted when --credentials is not given.
const CREDENTIALS_ENV_VAR: &str = "CONTAS_CREDENTIALS";

/// The web server for contas.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the workbook directory. The directory name is the workbook
    /// key the credentials must be scoped to.
    #[arg(long)]
    workbook_path: PathBuf,

    /// Path to the service credentials JSON file. Falls back to the
    /// CONTAS_CREDENTIALS environment variable.
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The local timezone as a canonical timezone name.
    #[arg(long, default_value = "America/Sao_Paulo")]
    timezone: String,

    /// How many seconds a loaded transaction set stays cached before the
    /// next page load rereads the workbook.
    #[arg(long, default_value_t = 600)]
    cache_ttl_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let credentials_path = args
        .credentials
        .or_else(|| env::var(CREDENTIALS_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            tracing::error!(
                "no credentials: pass --credentials or set {CREDENTIALS_ENV_VAR}"
            );
            std::process::exit(1);
        });

    let credentials = ServiceCredentials::load(&credentials_path).unwrap_or_else(|error| {
        tracing::error!("{error}");
        std::process::exit(1);
    });

    // Data-dependent rendering must not start without a workbook, so a
    // connection failure after the retries is fatal.
    let workbook = connect_with_policy(&args.workbook_path, &credentials, &RetryPolicy::default())
        .unwrap_or_else(|error| {
            tracing::error!("{error}");
            std::process::exit(1);
        });

    let store =
        TransactionStore::with_cache_ttl(workbook, Duration::from_secs(args.cache_ttl_secs));
    let app_state = AppState::new(store, &args.timezone);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state))
        .layer(middleware::from_fn(logging_middleware));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("could not start the server");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

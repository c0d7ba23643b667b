use std::{env, fs::OpenOptions, net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerly::{
    AppState, FIREBASE_KEY_ENV, build_router, graceful_shutdown, load_credential,
    logging_middleware,
};

/// The web server for the ledgerly finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Defaults to `<project_id>.sqlite3`
    /// using the project of the service account credential.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 10000)]
    port: u16,

    /// File path to a TrueType/OpenType font with CJK glyphs for PDF reports.
    #[arg(long, default_value = "static/fonts/NotoSansTC-Regular.ttf")]
    font_path: PathBuf,

    /// The directory to serve static files from.
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// The canonical name of the timezone dates are displayed in.
    #[arg(long, default_value = "Asia/Taipei")]
    timezone: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // The .env file may set PORT, so it must be loaded before parsing arguments.
    let dotenv_result = dotenvy::dotenv();
    let args = Args::parse();

    if let Err(error) = setup_logging() {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    if let Err(error) = dotenv_result {
        tracing::debug!("no .env file loaded: {error}");
    }

    let credential = match load_credential(env::var(FIREBASE_KEY_ENV).ok()) {
        Ok(credential) => credential,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "loaded credential for project {} ({})",
        credential.project_id,
        credential.client_email
    );

    let db_path = args
        .db_path
        .unwrap_or_else(|| PathBuf::from(format!("{}.sqlite3", credential.project_id)));

    let connection = match Connection::open(&db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database {}: {error}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(connection, &args.timezone, args.font_path, args.static_dir) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "using database {} with dates in {}",
        db_path.display(),
        state.local_timezone.name()
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

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

    Ok(())
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
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}

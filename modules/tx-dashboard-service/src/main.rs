//! Transaction Dashboard Service: standalone binary for submitting and
//! tracking simulated transactions.
//!
//! Hosts both an RPC API and a dashboard UI.
//! Default: http://127.0.0.1:9103/

mod config;
mod dashboard;
mod db;
mod error;
mod format;
mod kv;
mod routes;
mod session;
mod store;
mod submitter;
mod validation;
mod workflow;

use config::Config;
use kv::KvStore;
use routes::AppState;
use session::{HttpAuthBackend, Session};
use std::sync::Arc;
use std::time::Instant;
use store::TransactionStore;
use submitter::{MockSubmitter, TimeoutSubmitter, TransactionSubmitter};
use workflow::SubmissionWorkflow;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Opening database at: {}", config.db_path);
    let kv: Arc<dyn KvStore> = Arc::new(
        db::Db::open(&config.db_path).expect("Failed to open database"),
    );
    let store = Arc::new(TransactionStore::open(kv.clone()));

    let mut submitter: Arc<dyn TransactionSubmitter> = Arc::new(
        MockSubmitter::new(config.mock_success_delay, config.mock_failure_delay)
            .with_check_delay(config.mock_check_delay),
    );
    if let Some(timeout) = config.submit_timeout {
        log::info!("Submissions time out after {}s", timeout.as_secs());
        submitter = Arc::new(TimeoutSubmitter::new(submitter, timeout));
    }

    let session = Session::new(
        kv.clone(),
        Arc::new(HttpAuthBackend::new(config.auth_url.clone())),
        store.clone(),
    );

    let state = Arc::new(AppState {
        store: store.clone(),
        workflow: SubmissionWorkflow::new(store, submitter),
        session,
        start_time: Instant::now(),
    });

    let cors = tower_http::cors::CorsLayer::permissive();

    let app = axum::Router::new()
        .route("/", axum::routing::get(dashboard::dashboard))
        // Transactions
        .route(
            "/rpc/transactions/submit",
            axum::routing::post(routes::submit_transaction),
        )
        .route(
            "/rpc/transactions/list",
            axum::routing::get(routes::list_transactions),
        )
        .route(
            "/rpc/transactions/get",
            axum::routing::post(routes::get_transaction),
        )
        .route("/rpc/stats", axum::routing::get(routes::stats))
        .route("/rpc/address/check", axum::routing::post(routes::check_address))
        .route("/rpc/error/dismiss", axum::routing::post(routes::dismiss_error))
        // Session
        .route("/rpc/auth/signup", axum::routing::post(routes::signup))
        .route("/rpc/auth/login", axum::routing::post(routes::login))
        .route("/rpc/auth/logout", axum::routing::post(routes::logout))
        .route("/rpc/auth/me", axum::routing::get(routes::current_user))
        // Service
        .route("/rpc/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors);

    let addr = format!("127.0.0.1:{}", config.port);
    log::info!("Transaction Dashboard Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

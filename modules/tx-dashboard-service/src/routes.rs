//! Axum route handlers for the transaction dashboard RPC API.

use crate::error::DashboardError;
use crate::session::Session;
use crate::store::TransactionStore;
use crate::validation;
use crate::workflow::SubmissionWorkflow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;
use std::time::Instant;
use tx_dashboard_types::*;

pub struct AppState {
    pub store: Arc<TransactionStore>,
    pub workflow: SubmissionWorkflow,
    pub session: Session,
    pub start_time: Instant,
}

// =====================================================
// Transaction Endpoints
// =====================================================

// POST /rpc/transactions/submit
pub async fn submit_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitTransactionRequest>,
) -> (StatusCode, Json<RpcResponse<SubmitTransactionResponse>>) {
    let pending = match state.workflow.submit(&req.amount, &req.receiver_address) {
        Ok(pending) => pending,
        Err(e @ DashboardError::Validation(_)) => {
            return (StatusCode::BAD_REQUEST, Json(RpcResponse::err(e.user_message())));
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::err(e.user_message())),
            );
        }
    };

    if !req.wait {
        // resolution continues in the background and lands in the store
        return (
            StatusCode::ACCEPTED,
            Json(RpcResponse::ok(SubmitTransactionResponse {
                transaction: pending.transaction,
                message: None,
            })),
        );
    }

    match pending.outcome().await {
        Ok(outcome) => {
            log::debug!(
                "[Submit] {} resolved for waiting caller (success: {})",
                outcome.transaction().id,
                outcome.is_success()
            );
            (
                StatusCode::OK,
                Json(RpcResponse::ok(SubmitTransactionResponse {
                    message: Some(outcome.message().to_string()),
                    transaction: outcome.transaction().clone(),
                })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RpcResponse::err(e.user_message())),
        ),
    }
}

// GET /rpc/transactions/list
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<Vec<Transaction>>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.store.transactions())))
}

// POST /rpc/transactions/get
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetTransactionRequest>,
) -> (StatusCode, Json<RpcResponse<Option<Transaction>>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.store.get(&req.id))))
}

// GET /rpc/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<TransactionStats>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.store.stats())))
}

// POST /rpc/address/check
pub async fn check_address(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckAddressRequest>,
) -> (StatusCode, Json<RpcResponse<CheckAddressResponse>>) {
    if !validation::is_valid_address(&req.address) {
        let e = crate::error::ValidationError::InvalidAddress(req.address);
        return (StatusCode::BAD_REQUEST, Json(RpcResponse::err(e.to_string())));
    }
    match state.workflow.submitter().check_address(&req.address).await {
        Ok(trusted) => (
            StatusCode::OK,
            Json(RpcResponse::ok(CheckAddressResponse {
                address: req.address,
                trusted,
            })),
        ),
        Err(e) => (StatusCode::BAD_GATEWAY, Json(RpcResponse::err(e))),
    }
}

// POST /rpc/error/dismiss
pub async fn dismiss_error(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<bool>>) {
    state.store.set_error(None);
    (StatusCode::OK, Json(RpcResponse::ok(true)))
}

// =====================================================
// Auth Endpoints
// =====================================================

// POST /rpc/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> (StatusCode, Json<RpcResponse<serde_json::Value>>) {
    match state.session.signup(&req).await {
        Ok(body) => (StatusCode::OK, Json(RpcResponse::ok(body))),
        Err(e) => (StatusCode::BAD_GATEWAY, Json(RpcResponse::err(e))),
    }
}

// POST /rpc/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<RpcResponse<CurrentUser>>) {
    match state.session.login(&req).await {
        Ok(user) => (StatusCode::OK, Json(RpcResponse::ok(user))),
        Err(e) => (StatusCode::UNAUTHORIZED, Json(RpcResponse::err(e))),
    }
}

// POST /rpc/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<bool>>) {
    state.session.logout();
    (StatusCode::OK, Json(RpcResponse::ok(true)))
}

// GET /rpc/auth/me
pub async fn current_user(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<Option<CurrentUser>>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.session.current_user())))
}

// =====================================================
// Service
// =====================================================

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            authenticated: state.session.is_authenticated(),
            stats: state.store.stats(),
        })),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use crate::session::AuthBackend;
    use crate::submitter::MockSubmitter;
    use async_trait::async_trait;

    struct RejectingBackend;

    #[async_trait]
    impl AuthBackend for RejectingBackend {
        async fn signup(&self, _req: &SignupRequest) -> Result<serde_json::Value, String> {
            Err("Accounts API unavailable".to_string())
        }

        async fn login(&self, _req: &LoginRequest) -> Result<AuthTokens, String> {
            Err("Invalid credentials".to_string())
        }
    }

    pub(crate) fn test_state() -> Arc<AppState> {
        let kv = Arc::new(MemoryKv::new());
        let store = Arc::new(TransactionStore::open(kv.clone()));
        Arc::new(AppState {
            store: store.clone(),
            workflow: SubmissionWorkflow::new(store.clone(), Arc::new(MockSubmitter::instant())),
            session: Session::new(kv, Arc::new(RejectingBackend), store.clone()),
            start_time: Instant::now(),
        })
    }

    #[tokio::test]
    async fn test_submit_returns_pending() {
        let state = test_state();
        let (code, Json(resp)) = submit_transaction(
            State(state.clone()),
            Json(SubmitTransactionRequest {
                amount: "0.5".to_string(),
                receiver_address: "0x1111111111111111111111111111111111111111".to_string(),
                wait: false,
            }),
        )
        .await;

        assert_eq!(code, StatusCode::ACCEPTED);
        let body = resp.data.unwrap();
        assert_eq!(body.message, None);
        let tx = body.transaction;
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(state.store.stats().total, 1);

        let (_, Json(found)) = get_transaction(
            State(state.clone()),
            Json(GetTransactionRequest { id: tx.id.clone() }),
        )
        .await;
        assert_eq!(found.data.unwrap().unwrap().id, tx.id);
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_address() {
        let state = test_state();
        let (code, Json(resp)) = submit_transaction(
            State(state.clone()),
            Json(SubmitTransactionRequest {
                amount: "1".to_string(),
                receiver_address: "0xZZZ".to_string(),
                wait: false,
            }),
        )
        .await;

        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("valid Ethereum address"));

        let (_, Json(listed)) = list_transactions(State(state)).await;
        assert!(listed.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let state = test_state();
        let (code, Json(resp)) = submit_transaction(
            State(state.clone()),
            Json(SubmitTransactionRequest {
                amount: "1.5".to_string(),
                receiver_address: "0x4230000000000000000000000000000000000000".to_string(),
                wait: true,
            }),
        )
        .await;

        assert_eq!(code, StatusCode::OK);
        let body = resp.data.unwrap();
        assert_eq!(body.transaction.status, TransactionStatus::Failed);
        assert_eq!(body.transaction.hash, None);
        assert_eq!(body.message.as_deref(), Some("Suspicious wallet address detected"));
        assert_eq!(state.store.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_failure_banner_stays_until_dismissed() {
        let state = test_state();
        for (amount, receiver) in [
            ("1.5", "0x4230000000000000000000000000000000000000"),
            ("0.5", "0x1111111111111111111111111111111111111111"),
        ] {
            submit_transaction(
                State(state.clone()),
                Json(SubmitTransactionRequest {
                    amount: amount.to_string(),
                    receiver_address: receiver.to_string(),
                    wait: true,
                }),
            )
            .await;
        }
        assert_eq!(
            state.store.snapshot().error.as_deref(),
            Some("Suspicious wallet address detected")
        );
        assert!(!state.store.snapshot().loading);

        let (code, _) = dismiss_error(State(state.clone())).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(state.store.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_check_address() {
        let state = test_state();
        let (code, Json(resp)) = check_address(
            State(state.clone()),
            Json(CheckAddressRequest {
                address: "0x4230000000000000000000000000000000000000".to_string(),
            }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert!(!resp.data.unwrap().trusted);

        let (code, _) = check_address(
            State(state),
            Json(CheckAddressRequest { address: "nope".to_string() }),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_failure_and_status() {
        let state = test_state();
        let (code, _) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await;
        assert_eq!(code, StatusCode::UNAUTHORIZED);

        let (_, Json(resp)) = status(State(state)).await;
        let status = resp.data.unwrap();
        assert!(status.running);
        assert!(!status.authenticated);
        assert_eq!(status.stats, TransactionStats::default());
    }
}

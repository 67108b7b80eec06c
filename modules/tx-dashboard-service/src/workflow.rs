//! Optimistic submission workflow
//!
//! ## Flow
//! 1. Validate amount and receiver; reject before touching the store
//! 2. Insert a `pending` record under a fresh UUID and return it immediately
//! 3. A spawned task awaits the submitter
//! 4. The outcome (success with hash, or failed) replaces the pending record
//!    under the same id

use std::sync::Arc;
use tokio::task::JoinHandle;
use tx_dashboard_types::{Transaction, TransactionStatus};
use uuid::Uuid;

use crate::error::DashboardError;
use crate::store::TransactionStore;
use crate::submitter::TransactionSubmitter;
use crate::validation;

pub const SUCCESS_MESSAGE: &str = "Transaction completed successfully!";

/// Terminal result of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Completed { transaction: Transaction, message: String },
    Failed { transaction: Transaction, message: String },
}

impl SubmissionOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            SubmissionOutcome::Completed { transaction, .. }
            | SubmissionOutcome::Failed { transaction, .. } => transaction,
        }
    }

    /// User-facing notice; never persisted on the record
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Completed { message, .. }
            | SubmissionOutcome::Failed { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Completed { .. })
    }
}

/// A submission that has been recorded as pending and is still resolving.
///
/// Dropping it does not cancel anything; the result is still reconciled into
/// the store.
pub struct PendingSubmission {
    pub transaction: Transaction,
    handle: JoinHandle<SubmissionOutcome>,
}

impl PendingSubmission {
    pub async fn outcome(self) -> Result<SubmissionOutcome, DashboardError> {
        self.handle
            .await
            .map_err(|e| DashboardError::Submission(format!("Submission task failed: {}", e)))
    }
}

pub struct SubmissionWorkflow {
    store: Arc<TransactionStore>,
    submitter: Arc<dyn TransactionSubmitter>,
}

impl SubmissionWorkflow {
    pub fn new(store: Arc<TransactionStore>, submitter: Arc<dyn TransactionSubmitter>) -> Self {
        Self { store, submitter }
    }

    pub fn submitter(&self) -> &Arc<dyn TransactionSubmitter> {
        &self.submitter
    }

    /// Start a submission. Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        amount: &str,
        receiver_address: &str,
    ) -> Result<PendingSubmission, DashboardError> {
        let amount = validation::parse_amount(amount)?;
        let receiver_address = validation::validate_address(receiver_address)?;

        let pending = Transaction::pending(
            Uuid::new_v4().to_string(),
            amount,
            receiver_address,
            now_millis(),
        );
        log::info!(
            "[Submit] {} ETH to {} queued as {} via {}",
            pending.amount,
            pending.receiver_address,
            pending.id,
            self.submitter.name()
        );
        self.store.set_loading(true);
        self.store.insert(pending.clone());

        let handle = tokio::spawn(resolve(
            self.store.clone(),
            self.submitter.clone(),
            pending.clone(),
        ));

        Ok(PendingSubmission {
            transaction: pending,
            handle,
        })
    }
}

async fn resolve(
    store: Arc<TransactionStore>,
    submitter: Arc<dyn TransactionSubmitter>,
    pending: Transaction,
) -> SubmissionOutcome {
    let result = submitter
        .submit(pending.amount, &pending.receiver_address, &pending.id)
        .await
        .and_then(|tx| accept_record(&pending, tx));

    match result {
        Ok(transaction) => {
            log::info!(
                "[Submit] {} completed with hash {}",
                transaction.id,
                transaction.hash.as_deref().unwrap_or("-")
            );
            // a success leaves an earlier failure banner up until dismissed
            reconcile(&store, transaction.clone(), None);
            SubmissionOutcome::Completed {
                transaction,
                message: SUCCESS_MESSAGE.to_string(),
            }
        }
        Err(e) => {
            let error = DashboardError::Submission(e);
            log::warn!("[Submit] {} failed: {}", pending.id, error);
            let transaction = Transaction::failed(
                pending.id,
                pending.amount,
                pending.receiver_address,
                now_millis(),
            );
            let message = error.user_message();
            reconcile(&store, transaction.clone(), Some(message.clone()));
            SubmissionOutcome::Failed {
                transaction,
                message,
            }
        }
    }
}

/// A submitter answer only counts as success if it is about the same id and
/// actually carries a hash.
fn accept_record(pending: &Transaction, tx: Transaction) -> Result<Transaction, String> {
    if tx.id != pending.id {
        return Err(format!(
            "Submitter answered for {} instead of {}",
            tx.id, pending.id
        ));
    }
    if tx.status != TransactionStatus::Success || tx.hash.as_deref().unwrap_or("").is_empty() {
        return Err("Submitter returned an incomplete transaction".to_string());
    }
    Ok(tx)
}

/// Settle the record, setting the error banner in the same step when there is
/// one to show.
fn reconcile(store: &TransactionStore, tx: Transaction, error: Option<String>) {
    let id = tx.id.clone();
    let replaced = match error {
        Some(message) => store.update_with_error(tx, Some(message)),
        None => store.update(tx),
    };
    if !replaced {
        // e.g. the session logged out while this was in flight
        log::warn!("[Submit] {} is no longer in the store, result dropped", id);
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

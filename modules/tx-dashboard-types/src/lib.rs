//! Shared types for the transaction dashboard service and its RPC clients.

use serde::{Deserialize, Serialize};

/// Current layout of the persisted transaction state.
pub const STATE_SCHEMA_VERSION: u32 = 1;

// =====================================================
// Domain Types
// =====================================================

/// Lifecycle of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Inserted optimistically, waiting on the submitter
    Pending,
    /// Accepted by the submitter, has a hash
    Success,
    /// Rejected by the submitter or failed in transit
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A single transaction record. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub receiver_address: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Transaction {
    pub fn pending(id: String, amount: f64, receiver_address: String, timestamp: i64) -> Self {
        Self {
            id,
            amount,
            receiver_address,
            timestamp,
            status: TransactionStatus::Pending,
            hash: None,
        }
    }

    pub fn failed(id: String, amount: f64, receiver_address: String, timestamp: i64) -> Self {
        Self {
            id,
            amount,
            receiver_address,
            timestamp,
            status: TransactionStatus::Failed,
            hash: None,
        }
    }
}

/// Counts derived from the transaction list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub pending: usize,
}

impl TransactionStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let count = |status: TransactionStatus| {
            transactions.iter().filter(|tx| tx.status == status).count()
        };
        Self {
            total: transactions.len(),
            successful: count(TransactionStatus::Success),
            failed: count(TransactionStatus::Failed),
            pending: count(TransactionStatus::Pending),
        }
    }
}

/// Everything the dashboard persists, serialized as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionState {
    #[serde(default = "default_schema_version")]
    pub version: u32,
    /// Newest first
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Always recomputed on load, so older records without it still parse
    #[serde(default)]
    pub stats: TransactionStats,
}

fn default_schema_version() -> u32 {
    STATE_SCHEMA_VERSION
}

impl Default for TransactionState {
    fn default() -> Self {
        Self {
            version: STATE_SCHEMA_VERSION,
            transactions: Vec::new(),
            loading: false,
            error: None,
            stats: TransactionStats::default(),
        }
    }
}

impl TransactionState {
    pub fn recompute_stats(&mut self) {
        self.stats = TransactionStats::from_transactions(&self.transactions);
    }
}

/// The logged-in user as remembered by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
}

/// JWT pair handed out by the accounts backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

// =====================================================
// RPC Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTransactionRequest {
    /// Kept as text so the service owns number parsing and its error message
    pub amount: String,
    pub receiver_address: String,
    /// Block until the submission resolves instead of returning the pending record
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetTransactionRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAddressRequest {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTransactionResponse {
    pub transaction: Transaction,
    /// Outcome notice, only present once the submission has resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAddressResponse {
    pub address: String,
    pub trusted: bool,
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub authenticated: bool,
    pub stats: TransactionStats,
}

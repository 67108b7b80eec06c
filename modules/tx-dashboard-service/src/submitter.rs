//! Transaction submitters
//!
//! The workflow hands every validated transaction to a `TransactionSubmitter`
//! and only cares whether it comes back completed or fails. The bundled
//! `MockSubmitter` simulates a network round trip and flags a known-bad
//! address prefix; `TimeoutSubmitter` puts a deadline on any other submitter.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tx_dashboard_types::{Transaction, TransactionStatus};

/// Receiver addresses containing this (case-insensitive) are rejected by the mock
pub const SUSPICIOUS_ADDRESS_MARKER: &str = "0x423";

const HASH_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const HASH_BODY_LEN: usize = 26;

#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Perform the transfer. On success the returned record carries the same
    /// `id`, `status = Success` and a hash.
    async fn submit(
        &self,
        amount: f64,
        receiver_address: &str,
        id: &str,
    ) -> Result<Transaction, String>;

    /// Pre-flight reputation check for a receiver address.
    async fn check_address(&self, _address: &str) -> Result<bool, String> {
        Ok(true)
    }

    /// Get the submitter name for logging
    fn name(&self) -> &'static str;
}

pub fn is_suspicious_address(address: &str) -> bool {
    address.to_lowercase().contains(SUSPICIOUS_ADDRESS_MARKER)
}

/// `0x` followed by 26 lowercase alphanumerics
pub fn random_tx_hash() -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..HASH_BODY_LEN)
        .map(|_| HASH_ALPHABET[rng.gen_range(0..HASH_ALPHABET.len())] as char)
        .collect();
    format!("0x{}", body)
}

/// Simulated network submitter
pub struct MockSubmitter {
    success_delay: Duration,
    failure_delay: Duration,
    check_delay: Duration,
}

impl MockSubmitter {
    pub fn new(success_delay: Duration, failure_delay: Duration) -> Self {
        Self {
            success_delay,
            failure_delay,
            check_delay: Duration::from_secs(1),
        }
    }

    pub fn with_check_delay(mut self, check_delay: Duration) -> Self {
        self.check_delay = check_delay;
        self
    }

    /// No artificial latency at all
    #[cfg(test)]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO).with_check_delay(Duration::ZERO)
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(
        &self,
        amount: f64,
        receiver_address: &str,
        id: &str,
    ) -> Result<Transaction, String> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let suspicious = is_suspicious_address(receiver_address);
        let delay = if suspicious {
            self.failure_delay
        } else {
            self.success_delay
        };

        log::debug!(
            "[MockSubmitter] Processing {} to {} ({}ms)",
            id,
            receiver_address,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;

        if suspicious {
            return Err("Suspicious wallet address detected".to_string());
        }

        Ok(Transaction {
            id: id.to_string(),
            amount,
            receiver_address: receiver_address.to_string(),
            timestamp,
            status: TransactionStatus::Success,
            hash: Some(random_tx_hash()),
        })
    }

    async fn check_address(&self, address: &str) -> Result<bool, String> {
        tokio::time::sleep(self.check_delay).await;
        Ok(!is_suspicious_address(address))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fails any submission that takes longer than `timeout`.
pub struct TimeoutSubmitter {
    inner: Arc<dyn TransactionSubmitter>,
    timeout: Duration,
}

impl TimeoutSubmitter {
    pub fn new(inner: Arc<dyn TransactionSubmitter>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl TransactionSubmitter for TimeoutSubmitter {
    async fn submit(
        &self,
        amount: f64,
        receiver_address: &str,
        id: &str,
    ) -> Result<Transaction, String> {
        match tokio::time::timeout(self.timeout, self.inner.submit(amount, receiver_address, id)).await {
            Ok(result) => result,
            Err(_) => Err(format!(
                "Submission timed out after {}s",
                self.timeout.as_secs_f64()
            )),
        }
    }

    async fn check_address(&self, address: &str) -> Result<bool, String> {
        match tokio::time::timeout(self.timeout, self.inner.check_address(address)).await {
            Ok(result) => result,
            Err(_) => Err("Address check timed out".to_string()),
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StallingSubmitter;

    #[async_trait]
    impl TransactionSubmitter for StallingSubmitter {
        async fn submit(&self, _amount: f64, _receiver: &str, _id: &str) -> Result<Transaction, String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err("unreachable".to_string())
        }

        fn name(&self) -> &'static str {
            "stalling"
        }
    }

    #[test]
    fn test_random_hash_format() {
        for _ in 0..50 {
            let hash = random_tx_hash();
            assert_eq!(hash.len(), 2 + HASH_BODY_LEN);
            assert!(hash.starts_with("0x"));
            assert!(hash[2..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_suspicious_marker_is_case_insensitive() {
        assert!(is_suspicious_address("0x4230000000000000000000000000000000000000"));
        assert!(is_suspicious_address("0X4230000000000000000000000000000000000000"));
        assert!(!is_suspicious_address("0x1111111111111111111111111111111111111111"));
    }

    #[tokio::test]
    async fn test_mock_success() {
        let submitter = MockSubmitter::instant();
        let tx = submitter
            .submit(0.01, "0x1111111111111111111111111111111111111111", "abc")
            .await
            .unwrap();
        assert_eq!(tx.id, "abc");
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.amount, 0.01);
        assert!(tx.hash.is_some());
    }

    #[tokio::test]
    async fn test_mock_rejects_suspicious_address() {
        let submitter = MockSubmitter::instant();
        let err = submitter
            .submit(1.5, "0x4230000000000000000000000000000000000000", "abc")
            .await
            .unwrap_err();
        assert_eq!(err, "Suspicious wallet address detected");
    }

    #[tokio::test]
    async fn test_mock_check_address() {
        let submitter = MockSubmitter::instant();
        assert!(!submitter.check_address("0x4230000000000000000000000000000000000000").await.unwrap());
        assert!(submitter.check_address("0x1111111111111111111111111111111111111111").await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout_wrapper() {
        let submitter = TimeoutSubmitter::new(Arc::new(StallingSubmitter), Duration::from_millis(20));
        let err = submitter.submit(1.0, "0x1", "id").await.unwrap_err();
        assert!(err.contains("timed out"));
        assert_eq!(submitter.name(), "stalling");

        // default check passes through untouched
        assert!(submitter.check_address("0x1").await.unwrap());
    }
}

use std::env;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:8000/api/accounts";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub auth_url: String,
    pub mock_success_delay: Duration,
    pub mock_failure_delay: Duration,
    pub mock_check_delay: Duration,
    /// None means the submitter is trusted to finish on its own
    pub submit_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_u64 = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            port: lookup("TX_DASHBOARD_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(9103),
            db_path: lookup("TX_DASHBOARD_DB_PATH")
                .unwrap_or_else(|| "./tx_dashboard.db".to_string()),
            auth_url: lookup("TX_DASHBOARD_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            mock_success_delay: Duration::from_millis(
                parse_u64("TX_DASHBOARD_MOCK_SUCCESS_DELAY_MS").unwrap_or(3000),
            ),
            mock_failure_delay: Duration::from_millis(
                parse_u64("TX_DASHBOARD_MOCK_FAILURE_DELAY_MS").unwrap_or(2000),
            ),
            mock_check_delay: Duration::from_millis(
                parse_u64("TX_DASHBOARD_MOCK_CHECK_DELAY_MS").unwrap_or(1000),
            ),
            submit_timeout: parse_u64("TX_DASHBOARD_SUBMIT_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

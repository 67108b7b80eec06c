use std::fmt;

/// Why a submission was refused before anything was recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingAmount,
    MissingAddress,
    InvalidAmount(String),
    InvalidAddress(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingAmount => write!(f, "Amount is required"),
            ValidationError::MissingAddress => write!(f, "Receiver address is required"),
            ValidationError::InvalidAmount(raw) => {
                write!(f, "Amount must be a positive number, got '{}'", raw)
            }
            ValidationError::InvalidAddress(_) => write!(
                f,
                "Please enter a valid Ethereum address (0x followed by 40 hexadecimal characters)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Bad input, nothing was mutated
    Validation(ValidationError),
    /// The submitter rejected the transaction or could not be reached
    Submission(String),
    /// The key-value store refused a read or write
    Persistence(String),
}

impl DashboardError {
    /// Text suitable for showing to the person who made the request.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Validation(e) => e.to_string(),
            DashboardError::Submission(msg) if msg.trim().is_empty() => {
                "Transaction failed".to_string()
            }
            DashboardError::Submission(msg) => msg.clone(),
            DashboardError::Persistence(_) => "Could not save dashboard state".to_string(),
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation(e) => write!(f, "Validation error: {}", e),
            DashboardError::Submission(msg) => write!(f, "Submission error: {}", msg),
            DashboardError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<ValidationError> for DashboardError {
    fn from(e: ValidationError) -> Self {
        DashboardError::Validation(e)
    }
}

use thiserror::Error;

/// Unified error type for the entire paper-trader-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Trading ─────────────────────────────────────────────────────
    #[error("Share count must be a positive whole number")]
    InvalidShareCount,

    #[error("Insufficient funds: need ${required:.2}, have ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Insufficient shares of {symbol}: tried to sell {requested}, holding {held}")]
    InsufficientShares {
        symbol: String,
        requested: u32,
        held: u32,
    },

    #[error("Quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    // ── Store ───────────────────────────────────────────────────────
    #[error("Account was modified concurrently — retry the operation")]
    ConcurrentModification,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Watchlist not found: {0}")]
    WatchlistNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    // ── Snapshot / File ─────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}

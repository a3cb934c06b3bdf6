use thiserror::Error;

/// Store operation error.
///
/// Every variant means the same thing to the session: the store could not
/// be used for this interaction. The variants only exist so logs and the
/// diagnostics endpoint can say why.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("store authentication failed: {0}")]
    Auth(String),

    #[error("store API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed store data: {0}")]
    Malformed(String),

    #[error("store misconfigured: {0}")]
    Config(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

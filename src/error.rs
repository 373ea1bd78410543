use codec::CodecError;

/// Error returned by notebook operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request body could not be encoded (includes unsupported types).
    #[error("request encode failed: {0}")]
    Encode(#[source] CodecError),

    /// No HTTP response was obtained (DNS, refused connection, timeout).
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered an `eval` request with status >= 300.
    #[error("remote evaluation failed: status {status}: {}", lossy(.body))]
    RemoteEvaluation { status: u16, body: Vec<u8> },

    /// The server answered a `call` request with status >= 300.
    #[error("remote call failed: status {status}: {}", lossy(.body))]
    RemoteCall { status: u16, body: Vec<u8> },

    /// The response body is not a valid msgpack payload.
    #[error("response decode failed: {0}")]
    Decode(#[source] CodecError),

    /// The `eval` response has no entry for the requested output.
    #[error("response has no entry for output `{0}`")]
    MissingOutput(String),
}

impl ClientError {
    /// Raw server error body, for the two status-checked failures.
    #[must_use]
    pub fn remote_body(&self) -> Option<&[u8]> {
        match self {
            Self::RemoteEvaluation { body, .. } | Self::RemoteCall { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn lossy(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

//! Blocking HTTP client for the notebook server's `eval` and `call` endpoints.
//!
//! Each operation is one POST with a msgpack body; nothing is retried or
//! cached. Connection pooling is whatever `reqwest` does by default.

use std::collections::BTreeMap;

use codec::Value;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::config::{ClientConfig, MSGPACK_CONTENT_TYPE, PROTOCOL_VERSION};
use crate::error::ClientError;

/// Keyword arguments and evaluation inputs, keyed by parameter name.
pub type Kwargs = BTreeMap<String, Value>;

/// Every byte except ASCII alphanumerics and `-._~` is escaped, so `/` in a
/// notebook filename stays inside one path segment.
const FILENAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Last path segment of a notebook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/eval`: read outputs under substituted inputs.
    Eval,
    /// `/call`: invoke a notebook function.
    Call,
}

impl Endpoint {
    /// Path segment as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eval => "eval",
            Self::Call => "call",
        }
    }
}

/// Build `http://{host}/v1/notebook/{filename}/{endpoint}`.
#[must_use]
pub fn notebook_url(host: &str, filename: &str, endpoint: Endpoint) -> String {
    format!(
        "http://{host}/{PROTOCOL_VERSION}/notebook/{}/{}",
        utf8_percent_encode(filename, FILENAME_SEGMENT),
        endpoint.as_str()
    )
}

/// `{ "inputs": {...}, "outputs": [output] }`
#[must_use]
pub fn eval_body(output: &str, inputs: &Kwargs) -> Value {
    Value::Map(vec![
        (Value::from("inputs"), Value::from(inputs.clone())),
        (Value::from("outputs"), Value::Array(vec![Value::from(output)])),
    ])
}

/// `{ "function": symbol, "args": [...], "kwargs": {...} }`
#[must_use]
pub fn call_body(symbol: &str, args: &[Value], kwargs: &Kwargs) -> Value {
    Value::Map(vec![
        (Value::from("function"), Value::from(symbol)),
        (Value::from("args"), Value::Array(args.to_vec())),
        (Value::from("kwargs"), Value::from(kwargs.clone())),
    ])
}

/// Client bound to one notebook server.
#[derive(Debug, Clone)]
pub struct NotebookClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl NotebookClient {
    /// Build a client from a config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(config.timeout);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Build a client for `host` with no deadlines.
    ///
    /// # Errors
    ///
    /// See [`NotebookClient::new`].
    pub fn for_host(host: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(ClientConfig::default().with_host(host))
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Fetch the value of `output` from `filename`, with `inputs` substituted.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Encode`] if an input cannot be encoded.
    /// - [`ClientError::Transport`] if no response was obtained.
    /// - [`ClientError::RemoteEvaluation`] for status >= 300, carrying the raw body.
    /// - [`ClientError::Decode`] for a malformed response body.
    /// - [`ClientError::MissingOutput`] when the response lacks `output`.
    pub fn evaluate(&self, output: &str, inputs: &Kwargs, filename: &str) -> Result<Value, ClientError> {
        let body = eval_body(output, inputs);
        let (status, bytes) = self.post(filename, Endpoint::Eval, &body)?;

        if status >= 300 {
            warn!(%filename, %output, status, "notebook: eval rejected");
            return Err(ClientError::RemoteEvaluation { status, body: bytes });
        }

        codec::decode(&bytes)
            .map_err(ClientError::Decode)?
            .into_entry(output)
            .ok_or_else(|| ClientError::MissingOutput(output.to_owned()))
    }

    /// Invoke function `symbol` in `filename` and return the whole decoded
    /// response.
    ///
    /// A status >= 300 is reported as [`ClientError::RemoteCall`] rather than
    /// handed to the decoder, matching `evaluate`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Encode`] if an argument cannot be encoded.
    /// - [`ClientError::Transport`] if no response was obtained.
    /// - [`ClientError::RemoteCall`] for status >= 300, carrying the raw body.
    /// - [`ClientError::Decode`] for a malformed response body.
    pub fn call(
        &self,
        symbol: &str,
        args: &[Value],
        kwargs: &Kwargs,
        filename: &str,
    ) -> Result<Value, ClientError> {
        let body = call_body(symbol, args, kwargs);
        let (status, bytes) = self.post(filename, Endpoint::Call, &body)?;

        if status >= 300 {
            warn!(%filename, %symbol, status, "notebook: call rejected");
            return Err(ClientError::RemoteCall { status, body: bytes });
        }

        codec::decode(&bytes).map_err(ClientError::Decode)
    }

    fn post(&self, filename: &str, endpoint: Endpoint, body: &Value) -> Result<(u16, Vec<u8>), ClientError> {
        let payload = codec::encode(body).map_err(ClientError::Encode)?;
        let url = notebook_url(&self.config.host, filename, endpoint);
        debug!(%url, bytes = payload.len(), "notebook: sending request");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, MSGPACK_CONTENT_TYPE)
            .header(ACCEPT, MSGPACK_CONTENT_TYPE)
            .body(payload)
            .send()?;

        let status = response.status().as_u16();
        let bytes = response.bytes()?.to_vec();
        debug!(%url, status, bytes = bytes.len(), "notebook: response received");
        Ok((status, bytes))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

//! Handle-style access to one remote notebook.
//!
//! DESIGN
//! ======
//! A [`Notebook`] names a file on a server and nothing else; every lookup is
//! an independent request. Binding inputs produces a [`BoundNotebook`] whose
//! reads forward those inputs. Functions are reached through [`PendingCall`],
//! either explicitly with [`Notebook::function`] or via [`Notebook::resolve`],
//! which falls back to a pending call when the server reports the name is a
//! function.

use codec::Value;
use tracing::debug;

use crate::client::{Kwargs, NotebookClient};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Marker the server puts in an `eval` error body when the requested name is
/// a function rather than a value.
const FUNCTION_MARKER: &str = "function";

/// Whether `err` is the server telling us the evaluated name is a function.
///
/// The server has no structured error code for this, so the check is a
/// substring match on the raw error body of a rejected `eval`. Any other
/// error, including a rejected `call`, is not a function signal.
#[must_use]
pub fn is_function_error(err: &ClientError) -> bool {
    match err {
        ClientError::RemoteEvaluation { body, .. } => {
            String::from_utf8_lossy(body).contains(FUNCTION_MARKER)
        }
        _ => false,
    }
}

/// Result of [`Notebook::resolve`].
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The name evaluated to a value.
    Value(Value),
    /// The name is a function; nothing has been called yet.
    Function(PendingCall<'a>),
}

impl Resolved<'_> {
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Function(_) => None,
        }
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

/// A remote notebook document.
#[derive(Debug, Clone)]
pub struct Notebook {
    filename: String,
    client: NotebookClient,
}

impl Notebook {
    /// Notebook on the default host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails.
    pub fn new(filename: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(filename, ClientConfig::default())
    }

    /// Notebook on `host`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails.
    pub fn with_host(filename: impl Into<String>, host: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(filename, ClientConfig::default().with_host(host))
    }

    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails.
    pub fn with_config(filename: impl Into<String>, config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::from_client(filename, NotebookClient::new(config)?))
    }

    #[must_use]
    pub fn from_client(filename: impl Into<String>, client: NotebookClient) -> Self {
        Self {
            filename: filename.into(),
            client,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.client.host()
    }

    #[must_use]
    pub fn client(&self) -> &NotebookClient {
        &self.client
    }

    /// Current value of variable `name`.
    ///
    /// # Errors
    ///
    /// Any [`NotebookClient::evaluate`] error, unchanged.
    pub fn get(&self, name: &str) -> Result<Value, ClientError> {
        self.client.evaluate(name, &Kwargs::new(), &self.filename)
    }

    /// Value of `name`, or a [`PendingCall`] when the server says it is a
    /// function.
    ///
    /// # Errors
    ///
    /// Any [`NotebookClient::evaluate`] error not recognised by
    /// [`is_function_error`].
    pub fn resolve(&self, name: &str) -> Result<Resolved<'_>, ClientError> {
        match self.get(name) {
            Ok(value) => Ok(Resolved::Value(value)),
            Err(err) if is_function_error(&err) => {
                debug!(filename = %self.filename, %name, "notebook: name is a function");
                Ok(Resolved::Function(self.function(name)))
            }
            Err(err) => Err(err),
        }
    }

    /// Deferred call to function `name`. No request is made until
    /// [`PendingCall::call`].
    #[must_use]
    pub fn function(&self, name: &str) -> PendingCall<'_> {
        PendingCall {
            notebook: self,
            symbol: name.to_owned(),
        }
    }

    /// Bind `inputs`; reads through the result evaluate under them.
    #[must_use]
    pub fn with_inputs(&self, inputs: Kwargs) -> BoundNotebook<'_> {
        BoundNotebook {
            notebook: self,
            inputs,
        }
    }
}

/// A [`Notebook`] with substituted inputs.
#[derive(Debug, Clone)]
pub struct BoundNotebook<'a> {
    notebook: &'a Notebook,
    inputs: Kwargs,
}

impl BoundNotebook<'_> {
    #[must_use]
    pub fn inputs(&self) -> &Kwargs {
        &self.inputs
    }

    /// Value of `name` under the bound inputs. Every read is a new request and
    /// there is no function fallback.
    ///
    /// # Errors
    ///
    /// Any [`NotebookClient::evaluate`] error, unchanged.
    pub fn get(&self, name: &str) -> Result<Value, ClientError> {
        self.notebook
            .client
            .evaluate(name, &self.inputs, &self.notebook.filename)
    }
}

/// A named remote function awaiting arguments.
#[derive(Debug, Clone)]
pub struct PendingCall<'a> {
    notebook: &'a Notebook,
    symbol: String,
}

impl PendingCall<'_> {
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Invoke the function and return the server's full response.
    ///
    /// # Errors
    ///
    /// Any [`NotebookClient::call`] error, unchanged.
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value, ClientError> {
        self.notebook
            .client
            .call(&self.symbol, args, kwargs, &self.notebook.filename)
    }
}

#[cfg(test)]
#[path = "notebook_test.rs"]
mod tests;

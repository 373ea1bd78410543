//! Client for a notebook evaluation server.
//!
//! Reads variables from, and calls functions in, a remote stateful notebook
//! over HTTP with msgpack bodies. Fixed-width numeric arrays travel as
//! [`codec::TypedArray`] so their element kind survives the wire.
//!
//! ```no_run
//! use notebook_rpc::{Kwargs, Notebook, Resolved, TypedArray, Value};
//!
//! # fn main() -> Result<(), notebook_rpc::ClientError> {
//! let nb = Notebook::new("Softmax.jl")?;
//!
//! let mut inputs = Kwargs::new();
//! inputs.insert("z".to_owned(), TypedArray::Float64(vec![1.0, 1.0, 2.0]).into());
//! let dist = nb.with_inputs(inputs).get("dist")?;
//!
//! if let Resolved::Function(softmax) = nb.resolve("σ")? {
//!     let out = softmax.call(&[Value::from(vec![1.0, 1.0, 3.0])], &Kwargs::new())?;
//!     println!("{dist:?} {out:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod notebook;

pub use client::{Kwargs, NotebookClient};
pub use codec::{CodecError, ElementKind, TypedArray, Value};
pub use config::{ClientConfig, DEFAULT_HOST};
pub use error::ClientError;
pub use notebook::{BoundNotebook, Notebook, PendingCall, Resolved, is_function_error};

#[cfg(test)]
mod test_server;

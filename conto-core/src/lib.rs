//! conto-core
//!
//! The request machinery under the `conto` client: the [`HttpTransport`]
//! seam with its production reqwest adapter, the [`TokenManager`] owning the
//! bearer credential lifecycle, the [`RequestPipeline`] that attaches auth
//! and converts statuses into errors, and the typed models mirroring the
//! bank account data API's resources.
#![warn(missing_docs)]

/// Typed records mirroring the external API's resources.
pub mod models;
mod pipeline;
mod token;
/// Request/response value types and the transport trait.
pub mod transport;

pub use conto_types::ContoError;
pub use pipeline::RequestPipeline;
pub use token::{Credential, TokenManager};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, ReqwestTransport, RequestBody};

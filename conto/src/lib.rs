#![doc = include_str!("../README.md")]
//! conto
//!
//! High-level client facade: build a [`Conto`] with [`ContoBuilder`], then
//! call typed resource methods. The heavy lifting lives in `conto-core`
//! (transport, token lifecycle, pipeline, models) and `conto-middleware`
//! (durable cache, rate-limit back-off).

#![warn(missing_docs)]

mod core;
mod overview;
mod resources;
mod transactions;

pub use crate::core::{Conto, ContoBuilder};
pub use crate::overview::AccountOverview;

pub use conto_core::models;
pub use conto_core::{HttpTransport, Method, RequestBody, ReqwestTransport};
pub use conto_middleware::CacheStatus;
pub use conto_types::{BackoffConfig, CacheConfig, ClientConfig, ContoError};

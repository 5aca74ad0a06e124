//! conto-middleware
//!
//! Transport wrappers composable around any
//! [`HttpTransport`](conto_core::HttpTransport): a durable SQLite-backed
//! response cache and a bounded rate-limit back-off. Wrappers nest like an
//! onion; the builder applies them in the conventional order
//! (raw transport, then cache, then back-off outermost).

#![warn(missing_docs)]

mod backoff;
mod builder;
mod cache;

pub use crate::backoff::BackoffTransport;
pub use crate::builder::{TransportStack, TransportStackBuilder};
pub use crate::cache::{CacheStatus, CachingTransport};

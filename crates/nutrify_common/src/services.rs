// --- File: crates/nutrify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Outbound integrations are expressed as object-safe traits returning
//! [`BoxFuture`], so handlers hold `Arc<dyn Trait>` and tests can swap in stubs.

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

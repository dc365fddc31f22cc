//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Rate limiting on the public `/api` routes (governor)

pub mod rate_limit;

pub use rate_limit::api_rate_limiter;

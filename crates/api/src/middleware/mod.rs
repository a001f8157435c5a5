//! Request-gating middleware.

pub mod rate_limit;

//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Everything
//! wire-shaped (JSON DTOs, status codes, path decoding) stays here.

pub mod rest;

pub use rest::{router, ApiError};

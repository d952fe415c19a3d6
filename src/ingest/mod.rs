//! Stateless ingest stages: vendor normalization, validation, and
//! session resolution.
//!
//! All three stages are side-effect-free and run on any number of
//! concurrent tasks without coordination; state enters the picture only
//! at the attendance engine behind the per-key record lock.

pub mod normalizer;
pub mod resolver;
pub mod validator;

pub use normalizer::{classify, normalize};
pub use resolver::resolve;
pub use validator::{Verdict, validate};

//! CLI command implementations.

pub mod coherence;
pub mod common;
pub mod instruments;
pub mod psd;
pub mod response;
pub mod sinc;

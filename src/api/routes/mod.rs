//! API route modules.

pub mod transcribe;

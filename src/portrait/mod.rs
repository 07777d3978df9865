/// Canonical crops and placeholder art.
pub mod processor;

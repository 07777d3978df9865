/// Parallel batch rendering and sinks.
pub mod pipeline;

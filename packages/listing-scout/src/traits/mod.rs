//! Trait seams for the pipeline's external collaborators.
//!
//! Applications provide a renderer (browser automation) and a sink (the
//! ingestion service); the core never talks to the network directly.

pub mod renderer;
pub mod sink;

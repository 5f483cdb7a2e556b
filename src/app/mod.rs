// Application layer: user actions wired to the core pipeline.

pub mod handlers;
pub mod pipelines;

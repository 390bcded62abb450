//! Observability setup for the Mindneox client: tracing subscriber
//! initialization and shared span/field names.

pub mod attrs;
pub mod tracing_setup;

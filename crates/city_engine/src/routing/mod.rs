//! Connectivity route tracing

pub mod route_tracer;

pub use route_tracer::{trace_component, RouteInfo, RouteTracer, TraceOutcome};

//! Scheduling and configuration engine for the kube downscaler
//!
//! This crate decides whether a workload should currently run at full
//! capacity, at a reduced capacity, or be left alone, based on layered
//! configuration (workload annotations, namespace annotations, CLI flags,
//! environment variables, built-in defaults) and recurring or absolute
//! time windows.
//!
//! It deliberately knows nothing about the Kubernetes API: callers hand in
//! string maps, timestamps and a logging seam, and get back a verdict.

pub mod errors;
pub mod logging;
pub mod scope;
pub mod values;

pub use errors::{EvalError, ResolveError, ScopeError, ValueError};
pub use logging::{ResourceLogger, TracingLogger};
pub use scope::resolver::{Scaling, ScopeId, Scopes, SCOPE_COUNT};
pub use scope::Scope;
pub use values::{
    DayTime, EvalContext, Replicas, TimeSpan, TimeSpanSet, TriStateBool, WeekFrame,
};

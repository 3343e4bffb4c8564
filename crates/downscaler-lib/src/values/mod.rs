//! Value grammars shared by every configuration layer
//!
//! Each type here parses from the string form used in annotations, CLI
//! flags and environment variables, and serializes back to a canonical
//! form that parses to the same semantics.

pub mod daytime;
pub mod duration;
pub mod replicas;
pub mod timespan;
pub mod tristate;
pub mod weekframe;

pub use daytime::DayTime;
pub use duration::parse_duration;
pub use replicas::Replicas;
pub use timespan::{EvalContext, RelativeTimeSpan, TimeSpan, TimeSpanSet};
pub use tristate::TriStateBool;
pub use weekframe::WeekFrame;

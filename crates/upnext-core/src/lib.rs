//! Core types: events, look-ahead window, resolution, tracing setup

pub mod event;
pub mod lookahead;
pub mod resolve;
pub mod time;
pub mod tracing;

pub use event::{Event, UNTITLED_EVENT};
pub use lookahead::{MalformedDurationSpec, parse_lookahead};
pub use resolve::earliest_event;
pub use time::LookaheadWindow;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

//! Render payloads and output sinks.
//!
//! The resolution side of the system ends in a [`RenderPayload`]: either
//! "this event is next" or "nothing is coming up". Everything downstream
//! of that decision lives behind the [`Renderer`] trait, whether that means
//! composing an image for a panel or, as the built-ins here do, just
//! writing text.
//!
//! Sinks are looked up by name in a [`RendererRegistry`] built at startup.
//! There is no global registry; callers construct one, register what they
//! want, and build the configured sink from it.

pub mod console;
pub mod error;
pub mod file;
pub mod payload;
pub mod renderer;

pub use console::ConsoleRenderer;
pub use error::{RenderError, RenderResult};
pub use file::FileRenderer;
pub use payload::{format_time_until, RenderPayload};
pub use renderer::{Renderer, RendererRegistry, SinkOptions, CONSOLE_SINK, FILE_SINK};

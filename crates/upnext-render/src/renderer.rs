//! The `Renderer` trait and the sink registry.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::console::ConsoleRenderer;
use crate::error::{RenderError, RenderResult};
use crate::file::FileRenderer;
use crate::payload::RenderPayload;

/// Name of the built-in file sink.
pub const FILE_SINK: &str = "to-file";

/// Name of the built-in stdout sink.
pub const CONSOLE_SINK: &str = "console";

/// An output sink for render payloads.
///
/// Implementations own everything downstream of the render decision. A
/// failed render is reported back as an error value; it never panics and
/// never retries on its own.
pub trait Renderer: Send + Sync {
    /// Stable name, as used in configuration and logs.
    fn name(&self) -> &str;

    /// Emits one payload.
    fn render(&self, payload: &RenderPayload) -> RenderResult<()>;
}

impl std::fmt::Debug for dyn Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("name", &self.name()).finish()
    }
}

/// Options a sink builder may need.
#[derive(Debug, Clone, Default)]
pub struct SinkOptions {
    /// Where the file sink writes its rendition.
    pub output_path: Option<PathBuf>,
}

type SinkBuilder = Box<dyn Fn(&SinkOptions) -> RenderResult<Box<dyn Renderer>> + Send + Sync>;

/// Registry of named sink builders.
///
/// Constructed once at startup; the configured sink is built from it by
/// name and handed to the cycle runner by value.
pub struct RendererRegistry {
    builders: BTreeMap<String, SinkBuilder>,
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in sinks registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(FILE_SINK, |options| {
            let path = options
                .output_path
                .clone()
                .ok_or_else(|| RenderError::MissingOutputPath {
                    name: FILE_SINK.to_string(),
                })?;
            Ok(Box::new(FileRenderer::new(path)) as Box<dyn Renderer>)
        });

        registry.register(CONSOLE_SINK, |_options| {
            Ok(Box::new(ConsoleRenderer) as Box<dyn Renderer>)
        });

        registry
    }

    /// Registers a builder under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(&SinkOptions) -> RenderResult<Box<dyn Renderer>> + Send + Sync + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    /// Names of all registered sinks, sorted.
    pub fn known_sinks(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    /// Builds the sink registered under `name`.
    pub fn build(&self, name: &str, options: &SinkOptions) -> RenderResult<Box<dyn Renderer>> {
        match self.builders.get(name) {
            Some(builder) => builder(options),
            None => Err(RenderError::UnknownSink {
                name: name.to_string(),
                known: self.known_sinks().join(", "),
            }),
        }
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = RendererRegistry::with_builtins();
        assert_eq!(registry.known_sinks(), vec![CONSOLE_SINK, FILE_SINK]);
    }

    #[test]
    fn builds_console_sink() {
        let registry = RendererRegistry::with_builtins();
        let sink = registry.build(CONSOLE_SINK, &SinkOptions::default()).unwrap();
        assert_eq!(sink.name(), CONSOLE_SINK);
    }

    #[test]
    fn builds_file_sink_with_path() {
        let registry = RendererRegistry::with_builtins();
        let options = SinkOptions {
            output_path: Some(PathBuf::from("/tmp/out.txt")),
        };
        let sink = registry.build(FILE_SINK, &options).unwrap();
        assert_eq!(sink.name(), FILE_SINK);
    }

    #[test]
    fn file_sink_without_path_is_an_error() {
        let registry = RendererRegistry::with_builtins();
        let error = registry
            .build(FILE_SINK, &SinkOptions::default())
            .unwrap_err();
        assert!(matches!(error, RenderError::MissingOutputPath { .. }));
    }

    #[test]
    fn unknown_sink_names_the_known_ones() {
        let registry = RendererRegistry::with_builtins();
        let error = registry
            .build("e-paper", &SinkOptions::default())
            .unwrap_err();

        let message = error.to_string();
        assert!(message.contains("e-paper"));
        assert!(message.contains(CONSOLE_SINK));
        assert!(message.contains(FILE_SINK));
    }

    #[test]
    fn custom_sink_can_be_registered() {
        struct NullSink;
        impl Renderer for NullSink {
            fn name(&self) -> &str {
                "null"
            }
            fn render(&self, _payload: &RenderPayload) -> RenderResult<()> {
                Ok(())
            }
        }

        let mut registry = RendererRegistry::with_builtins();
        registry.register("null", |_| Ok(Box::new(NullSink) as Box<dyn Renderer>));

        let sink = registry.build("null", &SinkOptions::default()).unwrap();
        assert_eq!(sink.name(), "null");
    }
}

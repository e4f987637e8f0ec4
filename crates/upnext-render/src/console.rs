//! Console sink: prints the text rendition to stdout.

use crate::error::RenderResult;
use crate::payload::RenderPayload;
use crate::renderer::{Renderer, CONSOLE_SINK};

/// Prints each payload's text rendition to stdout, useful when the cycle
/// runs in the foreground or under a supervisor capturing output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn name(&self) -> &str {
        CONSOLE_SINK
    }

    fn render(&self, payload: &RenderPayload) -> RenderResult<()> {
        println!("{}", payload.display_text());
        Ok(())
    }
}

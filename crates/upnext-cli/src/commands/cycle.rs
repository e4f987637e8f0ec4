//! Cycle command — one full gather/resolve/render pass.

use tracing::{info, warn};

use upnext_render::RendererRegistry;

use crate::config::AppConfig;
use crate::cycle::Cycle;
use crate::error::{AppError, AppResult};
use crate::state::DecisionStateStore;

/// Runs one resolution cycle and drives the configured sink.
pub async fn run(config: &AppConfig) -> AppResult<()> {
    let sources = config.build_sources().map_err(AppError::config)?;
    if sources.is_empty() {
        warn!("no calendars configured; the cycle will resolve to no events");
    }

    let renderer = RendererRegistry::with_builtins()
        .build(&config.render.renderer, &config.render.sink_options())?;
    let state = DecisionStateStore::new(config.state.path());

    let cycle = Cycle {
        sources,
        renderer,
        state,
        look_ahead: config.look_ahead.clone(),
        fetch_timeout: config.sources.fetch_timeout(),
        no_events_message: config.render.no_events_message.clone(),
    };

    let outcome = cycle.run().await?;
    info!(decision = ?outcome.decision, "cycle complete");

    Ok(())
}

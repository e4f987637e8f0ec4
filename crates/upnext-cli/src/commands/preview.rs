//! Preview command — resolves the next event without side effects.
//!
//! Uses the same gather/resolve pipeline as the cycle but neither drives the
//! sink nor touches the decision state file, so it is safe to run while a
//! scheduled cycle is active.

use chrono::Utc;

use upnext_render::format_time_until;

use crate::config::AppConfig;
use crate::cycle::resolve_next;
use crate::error::{AppError, AppResult};

/// Resolves and prints the would-be decision.
pub async fn run(config: &AppConfig) -> AppResult<()> {
    let sources = config.build_sources().map_err(AppError::config)?;
    let now = Utc::now();

    let resolved = resolve_next(
        &sources,
        &config.look_ahead,
        config.sources.fetch_timeout(),
        now,
    )
    .await?;

    match resolved {
        Some(event) => {
            println!("next:      {}", event.name);
            println!("starts:    {}", event.start_time_utc.to_rfc3339());
            println!("countdown: {}", format_time_until(event.time_until(now)));
        }
        None => {
            println!("{}", config.render.no_events_message);
        }
    }

    Ok(())
}

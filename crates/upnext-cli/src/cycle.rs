//! The resolution cycle.
//!
//! One process invocation runs one cycle: gather candidates from every
//! configured source, resolve the single soonest one, and decide what the
//! display should do about it. The process is driven externally (cron, a
//! systemd timer); nothing here loops or sleeps.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use upnext_core::{Event, LookaheadWindow, earliest_event, parse_lookahead};
use upnext_render::{RenderPayload, Renderer};
use upnext_sources::{CalendarSource, gather_candidates};

use crate::error::AppResult;
use crate::state::DecisionStateStore;

/// Everything one cycle needs, built from configuration at startup.
pub struct Cycle {
    /// Sources to gather from, in configuration order.
    pub sources: Vec<Box<dyn CalendarSource>>,
    /// The sink the decision is rendered to.
    pub renderer: Box<dyn Renderer>,
    /// Persisted flag from the previous cycle.
    pub state: DecisionStateStore,
    /// Raw look-ahead spec, `D.HH:MM:SS`.
    pub look_ahead: String,
    /// Per-source fetch budget.
    pub fetch_timeout: std::time::Duration,
    /// Standby text for the no-events notice.
    pub no_events_message: String,
}

/// What a cycle decided to do with the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    /// Rendered the resolved upcoming event.
    RenderedEvent,
    /// Rendered the standby notice.
    RenderedNotice,
    /// Left the display alone; it already shows the standby notice.
    Suppressed,
}

/// Summary of one completed cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    /// What was done with the display.
    pub decision: CycleDecision,
    /// The event the cycle resolved, if any.
    pub resolved: Option<Event>,
}

/// Gathers and resolves without touching the display or the state file.
///
/// Shared by the cycle proper and by `preview`.
pub async fn resolve_next(
    sources: &[Box<dyn CalendarSource>],
    look_ahead: &str,
    fetch_timeout: std::time::Duration,
    now: DateTime<Utc>,
) -> AppResult<Option<Event>> {
    let look_ahead = parse_lookahead(look_ahead)?;
    let window = LookaheadWindow::starting_at(now, look_ahead);
    debug!(now = %window.now, until = %window.until, "look-ahead window");

    let candidates = gather_candidates(sources, &window, fetch_timeout).await;
    debug!(count = candidates.len(), "candidates inside window");

    Ok(earliest_event(candidates))
}

impl Cycle {
    /// Runs one cycle against the current time.
    pub async fn run(&self) -> AppResult<CycleOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Runs one cycle against a fixed reference instant.
    ///
    /// The instant is captured exactly once per cycle: the window, the
    /// candidate filtering, and the rendered countdown all derive from the
    /// same value.
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<CycleOutcome> {
        let resolved =
            resolve_next(&self.sources, &self.look_ahead, self.fetch_timeout, now).await?;
        let had_event_last_cycle = self.state.read();

        let decision = self.decide_and_render(&resolved, had_event_last_cycle, now);

        self.state.write(resolved.is_some())?;

        Ok(CycleOutcome { decision, resolved })
    }

    /// Applies the transition rule and drives the sink.
    ///
    /// A render failure is logged and absorbed here; the decision stands
    /// and state bookkeeping still runs.
    fn decide_and_render(
        &self,
        resolved: &Option<Event>,
        had_event_last_cycle: bool,
        now: DateTime<Utc>,
    ) -> CycleDecision {
        let (payload, decision) = match resolved {
            Some(event) => {
                info!(
                    event = %event.name,
                    start = %event.start_time_utc,
                    "resolved next upcoming event"
                );
                let payload = RenderPayload::UpcomingEvent {
                    name: event.name.clone(),
                    time_until: event.time_until(now),
                };
                (Some(payload), CycleDecision::RenderedEvent)
            }
            None if had_event_last_cycle => {
                info!("no upcoming events; rendering the standby notice");
                let payload = RenderPayload::NoEvents {
                    message: self.no_events_message.clone(),
                };
                (Some(payload), CycleDecision::RenderedNotice)
            }
            None => {
                debug!("no upcoming events; display already on standby");
                (None, CycleDecision::Suppressed)
            }
        };

        if let Some(payload) = payload {
            if let Err(err) = self.renderer.render(&payload) {
                error!(renderer = self.renderer.name(), error = %err, "render failed");
            }
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::{TempDir, tempdir};
    use upnext_render::RenderResult;
    use upnext_sources::{FailingSource, SourceErrorCode, StaticSource};

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn event(name: &str, at: DateTime<Utc>) -> Event {
        Event::new(name, at)
    }

    struct RecordingRenderer {
        seen: Arc<Mutex<Vec<RenderPayload>>>,
    }

    impl Renderer for RecordingRenderer {
        fn name(&self) -> &str {
            "recording"
        }

        fn render(&self, payload: &RenderPayload) -> RenderResult<()> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn recording_renderer() -> (Box<dyn Renderer>, Arc<Mutex<Vec<RenderPayload>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let renderer = RecordingRenderer { seen: seen.clone() };
        (Box::new(renderer), seen)
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn name(&self) -> &str {
            "failing"
        }

        fn render(&self, _payload: &RenderPayload) -> RenderResult<()> {
            Err(upnext_render::RenderError::Write {
                path: "/nowhere/frame.txt".into(),
                source: std::io::Error::other("disk on fire"),
            })
        }
    }

    fn cycle_with(
        sources: Vec<Box<dyn CalendarSource>>,
        renderer: Box<dyn Renderer>,
        dir: &TempDir,
    ) -> Cycle {
        Cycle {
            sources,
            renderer,
            state: DecisionStateStore::new(dir.path().join("state.json")),
            look_ahead: "1.00:00:00".to_string(),
            fetch_timeout: std::time::Duration::from_secs(5),
            no_events_message: "Nothing scheduled".to_string(),
        }
    }

    #[tokio::test]
    async fn renders_the_earliest_event_across_sources() {
        let dir = tempdir().unwrap();
        let now = utc(2025, 6, 1, 9, 0, 0);
        let (renderer, seen) = recording_renderer();

        let sources: Vec<Box<dyn CalendarSource>> = vec![
            Box::new(StaticSource::new(
                "a",
                vec![event("Later", utc(2025, 6, 1, 15, 0, 0))],
            )),
            Box::new(StaticSource::new(
                "b",
                vec![event("Sooner", utc(2025, 6, 1, 10, 30, 0))],
            )),
        ];

        let cycle = cycle_with(sources, renderer, &dir);
        let outcome = cycle.run_at(now).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::RenderedEvent);
        assert_eq!(outcome.resolved.unwrap().name, "Sooner");

        let rendered = seen.lock().unwrap();
        assert_eq!(
            rendered.as_slice(),
            [RenderPayload::UpcomingEvent {
                name: "Sooner".to_string(),
                time_until: Duration::minutes(90),
            }]
        );
        assert!(cycle.state.read());
    }

    #[tokio::test]
    async fn first_configured_source_wins_exact_ties() {
        let dir = tempdir().unwrap();
        let now = utc(2025, 6, 1, 9, 0, 0);
        let at = utc(2025, 6, 1, 12, 0, 0);
        let (renderer, _seen) = recording_renderer();

        let sources: Vec<Box<dyn CalendarSource>> = vec![
            Box::new(StaticSource::new("first", vec![event("From first", at)])),
            Box::new(StaticSource::new("second", vec![event("From second", at)])),
        ];

        let cycle = cycle_with(sources, renderer, &dir);
        let outcome = cycle.run_at(now).await.unwrap();

        assert_eq!(outcome.resolved.unwrap().name, "From first");
    }

    #[tokio::test]
    async fn renders_notice_when_display_had_an_event() {
        let dir = tempdir().unwrap();
        let (renderer, seen) = recording_renderer();
        let cycle = cycle_with(Vec::new(), renderer, &dir);
        cycle.state.write(true).unwrap();

        let outcome = cycle.run_at(utc(2025, 6, 1, 9, 0, 0)).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::RenderedNotice);
        assert!(outcome.resolved.is_none());
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            [RenderPayload::NoEvents {
                message: "Nothing scheduled".to_string(),
            }]
        );
        assert!(!cycle.state.read());
    }

    #[tokio::test]
    async fn suppresses_when_display_is_already_on_standby() {
        let dir = tempdir().unwrap();
        let (renderer, seen) = recording_renderer();
        let cycle = cycle_with(Vec::new(), renderer, &dir);
        cycle.state.write(false).unwrap();

        let outcome = cycle.run_at(utc(2025, 6, 1, 9, 0, 0)).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::Suppressed);
        assert!(seen.lock().unwrap().is_empty());
        assert!(!cycle.state.read());
    }

    #[tokio::test]
    async fn event_then_two_empty_cycles_settle_on_standby() {
        // The display's whole life: show an event, clear to the notice when
        // it is gone, then leave the panel alone.
        let dir = tempdir().unwrap();
        let (renderer, seen) = recording_renderer();

        let sources: Vec<Box<dyn CalendarSource>> = vec![Box::new(StaticSource::new(
            "a",
            vec![event("Standup", utc(2025, 6, 1, 10, 0, 0))],
        ))];
        let cycle = cycle_with(sources, renderer, &dir);

        let first = cycle.run_at(utc(2025, 6, 1, 9, 0, 0)).await.unwrap();
        assert_eq!(first.decision, CycleDecision::RenderedEvent);

        // Next day: the event is behind us and nothing else is scheduled.
        let second = cycle.run_at(utc(2025, 6, 2, 9, 0, 0)).await.unwrap();
        assert_eq!(second.decision, CycleDecision::RenderedNotice);

        let third = cycle.run_at(utc(2025, 6, 3, 9, 0, 0)).await.unwrap();
        assert_eq!(third.decision, CycleDecision::Suppressed);

        // Two renders total: the event and one notice.
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert!(!cycle.state.read());
    }

    #[tokio::test]
    async fn first_ever_empty_cycle_paints_the_notice() {
        // No state file yet: the conservative default assumes the display
        // holds stale content.
        let dir = tempdir().unwrap();
        let (renderer, seen) = recording_renderer();
        let cycle = cycle_with(Vec::new(), renderer, &dir);

        let outcome = cycle.run_at(utc(2025, 6, 1, 9, 0, 0)).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::RenderedNotice);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_look_ahead_aborts_before_any_side_effect() {
        let dir = tempdir().unwrap();
        let (renderer, seen) = recording_renderer();
        let mut cycle = cycle_with(Vec::new(), renderer, &dir);
        cycle.look_ahead = "twelve hours".to_string();

        let error = cycle.run_at(utc(2025, 6, 1, 9, 0, 0)).await.unwrap_err();

        assert!(matches!(error, crate::error::AppError::Lookahead(_)));
        assert!(seen.lock().unwrap().is_empty());
        assert!(!cycle.state.path().exists());
    }

    #[tokio::test]
    async fn render_failure_does_not_abort_the_cycle() {
        let dir = tempdir().unwrap();
        let now = utc(2025, 6, 1, 9, 0, 0);
        let sources: Vec<Box<dyn CalendarSource>> = vec![Box::new(StaticSource::new(
            "a",
            vec![event("Standup", utc(2025, 6, 1, 10, 0, 0))],
        ))];

        let cycle = cycle_with(sources, Box::new(FailingRenderer), &dir);
        cycle.state.write(false).unwrap();

        let outcome = cycle.run_at(now).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::RenderedEvent);
        // State bookkeeping still ran.
        assert!(cycle.state.read());
    }

    #[tokio::test]
    async fn failing_source_does_not_block_the_others() {
        let dir = tempdir().unwrap();
        let now = utc(2025, 6, 1, 9, 0, 0);
        let (renderer, _seen) = recording_renderer();

        let sources: Vec<Box<dyn CalendarSource>> = vec![
            Box::new(FailingSource::new(
                "broken",
                SourceErrorCode::Network,
                "connection refused",
            )),
            Box::new(StaticSource::new(
                "working",
                vec![event("Survives", utc(2025, 6, 1, 11, 0, 0))],
            )),
        ];

        let cycle = cycle_with(sources, renderer, &dir);
        let outcome = cycle.run_at(now).await.unwrap();

        assert_eq!(outcome.decision, CycleDecision::RenderedEvent);
        assert_eq!(outcome.resolved.unwrap().name, "Survives");
    }

    #[tokio::test]
    async fn event_past_the_window_is_not_resolved() {
        let dir = tempdir().unwrap();
        let now = utc(2025, 6, 1, 9, 0, 0);
        let (renderer, _seen) = recording_renderer();

        // One day look-ahead; the event is a minute past the bound.
        let sources: Vec<Box<dyn CalendarSource>> = vec![Box::new(StaticSource::new(
            "a",
            vec![event("Too far", utc(2025, 6, 2, 9, 1, 0))],
        ))];

        let cycle = cycle_with(sources, renderer, &dir);
        let outcome = cycle.run_at(now).await.unwrap();

        assert!(outcome.resolved.is_none());
        assert_eq!(outcome.decision, CycleDecision::RenderedNotice);
    }

    #[tokio::test]
    async fn preview_pipeline_resolves_without_side_effects() {
        let now = utc(2025, 6, 1, 9, 0, 0);
        let sources: Vec<Box<dyn CalendarSource>> = vec![Box::new(StaticSource::new(
            "a",
            vec![event("Next", utc(2025, 6, 1, 10, 0, 0))],
        ))];

        let resolved = resolve_next(
            &sources,
            "1.00:00:00",
            std::time::Duration::from_secs(5),
            now,
        )
        .await
        .unwrap();

        assert_eq!(resolved.unwrap().name, "Next");
    }
}

//! Drives a viewer in real (tokio) time until it closes.

use std::time::Duration;

use stories_core::event::DomainEvent;
use stories_navigation::application::viewer::Viewer;
use stories_navigation::domain::events::ViewerEventKind;
use tokio::time::Instant;
use tracing::info;

use crate::host::SimulatedHost;

/// Longest wait between video position updates.
pub const MEDIA_POLL: Duration = Duration::from_millis(250);

/// What happened during a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Events recorded by the viewer.
    pub events: usize,
    /// Groups opened, including the first.
    pub groups_opened: usize,
    /// Stories that reached 100%.
    pub stories_completed: usize,
}

/// Sleeps until the next timer or media poll, feeds video positions from
/// `host` to the open group, fires due timers, and logs the resulting
/// events. Returns once the viewer is closed.
pub async fn run(viewer: &mut Viewer, host: &SimulatedHost) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut last_poll = Instant::now();
    log_events(viewer, &mut summary);

    while viewer.is_open() {
        tokio::time::sleep(next_wait(viewer)).await;

        let now = Instant::now();
        let elapsed = now.duration_since(last_poll).as_secs_f64();
        last_poll = now;
        if let Some(group) = viewer.current_group() {
            for signal in host.advance(elapsed) {
                viewer.media_event(group, signal);
            }
        }
        viewer.run_due();
        log_events(viewer, &mut summary);
    }

    info!(
        events = summary.events,
        groups_opened = summary.groups_opened,
        stories_completed = summary.stories_completed,
        "viewer closed, run finished"
    );
    summary
}

fn next_wait(viewer: &Viewer) -> Duration {
    let event_loop = viewer.event_loop();
    let Some(deadline) = event_loop.next_deadline() else {
        return MEDIA_POLL;
    };
    (deadline - event_loop.now())
        .to_std()
        .unwrap_or(Duration::ZERO)
        .min(MEDIA_POLL)
}

fn log_events(viewer: &mut Viewer, summary: &mut RunSummary) {
    for event in viewer.take_events() {
        summary.events += 1;
        match &event.kind {
            ViewerEventKind::GroupOpened(_) => summary.groups_opened += 1,
            ViewerEventKind::StoryCompleted(_) => summary.stories_completed += 1,
            _ => {}
        }
        let metadata = event.metadata();
        info!(
            event_type = event.event_type(),
            sequence_number = metadata.sequence_number,
            correlation_id = %metadata.correlation_id,
            payload = %event.to_payload(),
            "viewer event"
        );
    }
}

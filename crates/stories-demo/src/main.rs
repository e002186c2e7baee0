//! Stories demo entry point.

use std::rc::Rc;

use stories_core::clock::Clock;
use stories_core::timer::EventLoop;
use stories_demo::clock::TokioClock;
use stories_demo::config::DemoConfig;
use stories_demo::error::AppError;
use stories_demo::host::SimulatedHost;
use stories_demo::runner;
use stories_navigation::application::viewer::Viewer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting stories demo");

    let config = DemoConfig::from_env()?;
    let catalog = config.load_catalog().await?;

    let host = Rc::new(SimulatedHost::default());
    let clock: Rc<dyn Clock> = Rc::new(TokioClock::new());
    let mut viewer = Viewer::new(catalog, EventLoop::new(clock), host.clone(), config.playback)?;
    viewer.open(config.start_group)?;

    let summary = runner::run(&mut viewer, &host).await;
    tracing::info!(
        groups_opened = summary.groups_opened,
        stories_completed = summary.stories_completed,
        "Stories demo finished"
    );

    Ok(())
}

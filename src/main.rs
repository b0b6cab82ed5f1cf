use anyhow::Result;
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use log::{info, warn};
use pilltrack::app::App;
use pilltrack::config::Config;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting pilltrack...");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Using default config: {:#}", e);
        Config::default()
    });
    if let Ok(path) = Config::path() {
        if !path.exists() {
            match config.save() {
                Ok(()) => info!("Wrote default config to {}", path.display()),
                Err(e) => warn!("Could not write default config: {:#}", e),
            }
        }
    }
    let fps = config.fps_cap.max(1);
    let mut app = App::new(config)?;

    let mut event_loop: EventLoop<App> = EventLoop::try_new()?;
    let signal = event_loop.get_signal();
    let frame = Duration::from_secs_f64(1.0 / fps as f64);
    let mut last_frame = Instant::now();

    info!("Running frame loop at {} fps", fps);
    event_loop
        .handle()
        .insert_source(Timer::from_duration(frame), move |_, _, app: &mut App| {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            if app.update(dt) {
                TimeoutAction::ToDuration(frame)
            } else {
                app.shutdown();
                signal.stop();
                TimeoutAction::Drop
            }
        })
        .map_err(|e| anyhow::anyhow!("Failed to register frame timer: {}", e.error))?;

    event_loop.run(frame, &mut app, |_| {})?;

    let view = app.pill.label_view();
    info!("Final label: day {} / {}", view.day, view.distance);
    Ok(())
}

//! Sky Runner entry point
//!
//! Runs a headless session: the autopilot plays, audio cues and frame
//! summaries go to the log, and the final frame is printed as JSON.
//!
//! Usage: `sky-runner [tuning.json] [frames]`

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sky_runner::Tuning;
use sky_runner::audio::AudioManager;
use sky_runner::consts::SIM_DT;
use sky_runner::platform::{FrameClock, InputSource, ScriptedInput, clear_one_shots};
use sky_runner::renderer::{FrameSummary, LogRenderer, RenderSink};
use sky_runner::sim::{SessionPhase, World, tick};

const DEFAULT_FRAMES: u64 = 60 * 120;

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn main() {
    env_logger::init();
    log::info!("Sky Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let seed = tuning.seed.unwrap_or_else(clock_seed);
    let mut world = World::new(seed, tuning);
    let mut clock = FrameClock::new();
    let mut pilot = ScriptedInput::new(Some(frames));
    let mut audio = AudioManager::default();
    let mut renderer = LogRenderer::new(60);

    let frame_time = Duration::from_secs_f32(SIM_DT);
    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let mut input = pilot.poll(&world);
        if input.quit {
            log::info!("Frame limit reached");
            break;
        }
        for _ in 0..clock.advance(dt) {
            tick(&mut world, &input, SIM_DT);
            // One-shot inputs only reach the first substep
            clear_one_shots(&mut input);
        }

        audio.handle_events(&world.drain_events());
        renderer.render(&world);

        if matches!(world.phase, SessionPhase::GameOver | SessionPhase::Victory) {
            log::info!("Session ended: {:?}", world.phase);
            break;
        }

        if let Some(rest) = frame_time.checked_sub(now.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    log::info!("{} audio cues played", audio.sink().played);
    let summary = FrameSummary::capture(&world);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}

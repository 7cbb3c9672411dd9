//! Rainbow Joe -- headless simulation runner.
//!
//! Loads a level, plays a scripted input replay through the simulation and
//! logs what happened. Rendering, audio and windowing are separate layers; the
//! runner stands in for them by logging draw counts and sound cues.
//!
//! Frame loop, one iteration per replay frame:
//!
//!   1. apply the frame's key snapshot to `InputState`
//!   2. `TimeState::begin_frame(frame_dt)` -- feed the accumulator
//!   3. `while should_step()` -- `SimulationState::step(fixed_dt)`
//!   4. clear edge-triggered input once a step has consumed it
//!
//! Usage: `rj_game [level.json] [replay.json] [config.json]`

mod actor;
mod collision;
mod config;
mod level;
mod replay;
mod simulation;
mod tilemap;

use std::path::{Path, PathBuf};

use config::{load_config_from_path, GameConfig};
use level::load_level_from_path;
use replay::load_replay_from_path;
use rj_core::animation::{load_clip_table, ClipTable};
use rj_core::input::InputState;
use rj_core::time::TimeState;
use simulation::{SimEvent, SimulationState};

const LEVEL_PATH: &str = "assets/levels/01.json";
const REPLAY_PATH: &str = "assets/replays/demo.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Rainbow Joe starting...");
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let level_path = PathBuf::from(args.first().map_or(LEVEL_PATH, String::as_str));
    let replay_path = PathBuf::from(args.get(1).map_or(REPLAY_PATH, String::as_str));

    let config = match args.get(2) {
        Some(path) => load_config_from_path(Path::new(path))?,
        None => GameConfig::default(),
    };
    let clips = match &config.clip_table_path {
        Some(path) => load_clip_table(path)?,
        None => ClipTable::default(),
    };
    let level = load_level_from_path(&level_path)?;
    let replay = load_replay_from_path(&replay_path)?;
    log::info!(
        "Level '{}' loaded: {}x{} tiles, {} actors",
        level.level_id,
        level.map.grid_size.0,
        level.map.grid_size.1,
        level.spawns.len()
    );
    for layer in level.map.layers() {
        log::debug!("Layer '{}' (collision: {})", layer.name, layer.collision);
    }

    let mut sim = SimulationState::new(level, &config, clips);
    let mut time = TimeState::new(f64::from(config.fixed_dt));
    let mut input = InputState::new();

    for keys in replay.expanded_inputs() {
        input.apply_snapshot(&keys);
        time.begin_frame(f64::from(replay.frame_dt));

        let mut stepped = false;
        while time.should_step() {
            let events = sim.step(&input, config.fixed_dt);
            report_events(&events, config.audio_enabled);
            stepped = true;
            if sim.quit_requested {
                break;
            }
        }
        time.end_frame();
        log::trace!(
            "Frame {}: {} steps, alpha {:.2}",
            time.frame_count,
            time.steps_this_frame,
            time.interpolation_alpha
        );
        if stepped {
            input.end_frame();
        }

        if sim.quit_requested {
            log::info!("Quit requested after {} frames", time.frame_count);
            break;
        }
    }

    let view = sim.camera.visible_rect();
    log::info!(
        "Finished after {} steps ({:.2}s simulated), camera at ({:.1}, {:.1}) {}x{} zoom {:.2}",
        time.fixed_step_count,
        time.total_time,
        view.x,
        view.y,
        view.w,
        view.h,
        sim.camera.zoom()
    );
    for (i, actor) in sim.actors.iter().enumerate() {
        log::info!(
            "Actor {i}: {:?} at ({:.1}, {:.1}), frame {}",
            actor.state(),
            actor.position.x,
            actor.position.y,
            actor.animation.frame
        );
    }
    if sim.player().dead {
        log::info!("Player ended the replay dead");
    }
    log::info!("{} draw requests for the last frame", sim.draw_requests().len());
    Ok(())
}

fn report_events(events: &[SimEvent], audio_enabled: bool) {
    for event in events {
        log::debug!("{event:?}");
        if !audio_enabled {
            continue;
        }
        let cue = match event {
            SimEvent::Jumped { .. } => "jump",
            SimEvent::Died { .. } => "dead",
            SimEvent::Impact { .. } => "impact",
            SimEvent::Paused => "pause",
            SimEvent::Resumed => "unpause",
            SimEvent::Respawned { .. } => continue,
        };
        log::info!("sfx: {cue}");
    }
}

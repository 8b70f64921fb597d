//! Headless pasture session -- a scripted player walk with no window.
//!
//! Run with:
//!   cargo run --example headless_pasture -p pasture-engine
//!
//! Optional: set `PASTURE_CONFIG` to the path of a JSON scene configuration,
//! and `RUST_LOG=info` (or `debug`) to watch the scene log.

use std::time::Duration;

use anyhow::Context;
use pasture_engine::prelude::*;
use tracing::info;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Held directions and how many 60 Hz frames to hold them for.
const SCRIPT: &[(&[Direction], u32)] = &[
    (&[], 30),
    (&[Direction::Up], 90),
    (&[Direction::Up, Direction::Left], 60),
    (&[Direction::Left], 30),
    (&[Direction::Down], 45),
    (&[], 30),
];

const FRAME_MS: f64 = 1000.0 / 60.0;

fn load_config() -> anyhow::Result<SceneConfig> {
    match std::env::var("PASTURE_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scene configuration {path}"))?;
            Ok(SceneConfig::from_json_str(&json)?)
        }
        Err(_) => Ok(SceneConfig {
            animals: ["pig", "cow", "llama", "zebra", "horse"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }),
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = load_config()?;
    let mut frame_loop = FrameLoop::new(config, HeadlessScene::default())?;
    let handles = frame_loop.populate(&stock_library())?;
    frame_loop.resize(1280, 720);

    let mut now_ms = 0.0;
    let mut update_time = Duration::ZERO;
    for (held, frames) in SCRIPT {
        let input = InputSnapshot::holding(held);
        for _ in 0..*frames {
            frame_loop.frame(now_ms, &input);
            update_time += frame_loop.last_diagnostics().update_time;
            now_ms += FRAME_MS;
        }
        let player = frame_loop
            .manager()
            .get(handles.player)
            .context("player disappeared")?;
        info!(
            held = ?held,
            position = ?player.transform().position(),
            gait = ?player.get::<Player>().map(Player::gait),
            "script segment done"
        );
    }

    let snapshot = frame_loop.capture_snapshot();
    println!("{}", snapshot.to_json()?);
    println!(
        "{} frames, {} objects, {:?} in updates, state hash {}",
        frame_loop.frame_count(),
        snapshot.objects.len(),
        update_time,
        snapshot.hash
    );
    Ok(())
}

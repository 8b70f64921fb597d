//! Variable-timestep frame driver.
//!
//! The host calls [`FrameLoop::frame`] once per displayed frame with its
//! monotonic timestamp in milliseconds. Each frame:
//!
//! 1. The [`FrameClock`] converts the timestamp to seconds and derives the
//!    elapsed time since the previous frame, clamped to
//!    [`SceneConfig::max_delta_time`] so a stall (a hidden tab, a debugger
//!    pause) never produces one giant step.
//! 2. The game object manager updates every live object with that delta and
//!    the frame's input snapshot.
//! 3. The frame counter advances and diagnostics are recorded.
//!
//! # Example
//!
//! ```
//! use pasture_engine::prelude::*;
//!
//! let mut frame_loop = FrameLoop::new(SceneConfig::default(), HeadlessScene::default()).unwrap();
//! frame_loop.populate(&stock_library()).unwrap();
//!
//! let input = InputSnapshot::default();
//! frame_loop.frame(0.0, &input);
//! // A five second stall is clamped to one twentieth of a second.
//! frame_loop.frame(5_000.0, &input);
//! assert!((frame_loop.last_diagnostics().delta_time - 0.05).abs() < 1e-6);
//! assert_eq!(frame_loop.frame_count(), 2);
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use pasture_core::prelude::*;

use crate::assets::ModelLibrary;
use crate::config::SceneConfig;
use crate::scene::{populate, SceneHandles};
use crate::snapshot::SceneSnapshot;
use crate::EngineError;

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Turns host timestamps into clamped per-frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f64,
    /// Time of the previous frame, in seconds. Starts at zero.
    then: f64,
}

impl FrameClock {
    /// Rejects a `max_delta` that is not positive and finite.
    pub fn new(max_delta: f32) -> Result<Self, EngineError> {
        if !(max_delta > 0.0 && max_delta.is_finite()) {
            return Err(EngineError::InvalidConfig {
                field: "max_delta_time",
                details: format!("must be positive and finite, got {max_delta}"),
            });
        }
        Ok(Self {
            max_delta: f64::from(max_delta),
            then: 0.0,
        })
    }

    /// Advance to the host timestamp `now_ms` (milliseconds).
    ///
    /// The delta is clamped to `[0, max_delta]`; a timestamp earlier than the
    /// previous one yields a zero delta.
    pub fn advance(&mut self, now_ms: f64) -> FrameTime {
        let now = now_ms * 0.001;
        let delta = (now - self.then).clamp(0.0, self.max_delta);
        self.then = now;
        FrameTime {
            time: now as f32,
            delta_time: delta as f32,
        }
    }

    /// Seconds at the last advance.
    pub fn time(&self) -> f64 {
        self.then
    }
}

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    /// Wall-clock time spent in the manager update.
    pub update_time: Duration,
    /// Game objects visited.
    pub objects_visited: usize,
    /// Clamped delta handed to components.
    pub delta_time: f32,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Owns the game objects, the scene root and the shared frame state, and
/// advances all of them one frame at a time.
#[derive(Debug)]
pub struct FrameLoop<S: SceneParent> {
    config: SceneConfig,
    manager: GameObjectManager,
    scene: S,
    shared: Shared,
    clock: FrameClock,
    frame_counter: u64,
    last_diagnostics: FrameDiagnostics,
    /// Camera rig to notify on resize, once the scene is populated.
    camera: Option<(GameObjectId, ComponentRef<crate::components::CameraInfo>)>,
}

impl<S: SceneParent> FrameLoop<S> {
    /// Validate `config` and create an empty loop over `scene`.
    pub fn new(config: SceneConfig, scene: S) -> Result<Self, EngineError> {
        config.validate()?;
        let clock = FrameClock::new(config.max_delta_time)?;
        Ok(Self {
            config,
            manager: GameObjectManager::new(),
            scene,
            shared: Shared::default(),
            clock,
            frame_counter: 0,
            last_diagnostics: FrameDiagnostics::default(),
            camera: None,
        })
    }

    /// Create the stock scene from `library` (see [`populate`]).
    pub fn populate(&mut self, library: &ModelLibrary) -> Result<SceneHandles, EngineError> {
        let handles = populate(&mut self.manager, &mut self.scene, library, &self.config)?;
        self.camera = Some((handles.camera, handles.camera_info));
        Ok(handles)
    }

    /// Run one frame at host time `now_ms`. Returns the objects visited.
    pub fn frame(&mut self, now_ms: f64, input: &dyn InputState) -> usize {
        let time = self.clock.advance(now_ms);
        let start = Instant::now();

        let mut ctx = FrameContext {
            time,
            input,
            scene: &mut self.scene,
            shared: &mut self.shared,
        };
        let visited = self.manager.update(&mut ctx);

        self.frame_counter += 1;
        self.last_diagnostics = FrameDiagnostics {
            update_time: start.elapsed(),
            objects_visited: visited,
            delta_time: time.delta_time,
        };
        visited
    }

    /// The output surface changed size; update the camera's aspect ratio.
    ///
    /// Returns `false` if there is no camera yet or the size is degenerate.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            debug!(width, height, "ignoring degenerate resize");
            return false;
        }
        let Some((rig, camera_info)) = self.camera else {
            return false;
        };
        let aspect = width as f32 / height as f32;
        match self
            .manager
            .get_mut(rig)
            .and_then(|object| object.component_mut(camera_info))
        {
            Some(camera) => {
                camera.set_aspect(aspect);
                debug!(width, height, aspect, "camera aspect updated");
                true
            }
            None => {
                warn!(rig = %rig, "resize before camera rig exists");
                false
            }
        }
    }

    /// Capture the current object state with its content hash.
    pub fn capture_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.manager, self.frame_counter)
    }

    /// Content hash of the current object state.
    pub fn state_hash(&self) -> String {
        self.capture_snapshot().hash
    }

    // -- accessors ----------------------------------------------------------

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Host time of the last frame, in seconds.
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn manager(&self) -> &GameObjectManager {
        &self.manager
    }

    /// Mutable access to the manager, for setup outside of frames.
    pub fn manager_mut(&mut self) -> &mut GameObjectManager {
        &mut self.manager
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Manager and scene together, for creating objects outside of frames.
    pub fn parts_mut(&mut self) -> (&mut GameObjectManager, &mut S) {
        (&mut self.manager, &mut self.scene)
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

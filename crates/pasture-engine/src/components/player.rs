use std::rc::Rc;

use glam::Vec3;
use tracing::{info, warn};

use pasture_core::prelude::*;

use super::skin::{require_clips, SkinInstance};
use crate::config::SceneConfig;

/// Local axis the player moves along when throttling forward.
pub const FORWARD: Vec3 = Vec3::Z;

/// The player's locomotion state, each with its own animation clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Idle,
    Run,
}

impl Gait {
    pub fn clip(self) -> &'static str {
        match self {
            Gait::Idle => "Idle",
            Gait::Run => "Run",
        }
    }
}

/// Player construction parameters.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub model: Rc<dyn SkinnedModel>,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub max_time_offscreen: f32,
}

impl PlayerConfig {
    /// Speeds and the offscreen limit from the scene config.
    pub fn from_scene(config: &SceneConfig, model: Rc<dyn SkinnedModel>) -> Self {
        Self {
            model,
            move_speed: config.move_speed,
            turn_speed: config.turn_speed,
            max_time_offscreen: config.max_time_offscreen,
        }
    }
}

/// Steers the owner from held directions and keeps it near the camera.
///
/// - Left/right yaw the owner at `turn_speed`.
/// - Up/down move it along its local [`FORWARD`] axis at `move_speed`.
/// - The sibling [`SkinInstance`] plays "Run" while throttling and "Idle"
///   otherwise, switching only when the gait changes.
/// - While a view frustum is published and the owner is outside it, a timer
///   runs; once it reaches `max_time_offscreen` the owner is put back at the
///   origin.
#[derive(Debug)]
pub struct Player {
    skin: ComponentRef<SkinInstance>,
    gait: Gait,
    move_speed: f32,
    turn_speed: f32,
    offscreen_timer: f32,
    max_time_offscreen: f32,
}

impl Player {
    pub fn gait(&self) -> Gait {
        self.gait
    }

    /// Handle to the sibling skin attached by this player.
    pub fn skin(&self) -> ComponentRef<SkinInstance> {
        self.skin
    }

    /// Seconds spent continuously outside the published frustum.
    pub fn offscreen_timer(&self) -> f32 {
        self.offscreen_timer
    }

    fn switch_gait(&mut self, owner: &mut Owner<'_>, gait: Gait) {
        let Some(skin) = owner.component_mut(self.skin) else {
            warn!(object = %owner.id(), "player lost its skin instance");
            return;
        };
        match skin.set_animation(gait.clip()) {
            Ok(()) => self.gait = gait,
            Err(e) => warn!(object = %owner.id(), error = %e, "gait animation switch failed"),
        }
    }

    fn track_visibility(&mut self, owner: &mut Owner<'_>, frame: &Frame<'_>) {
        let position = owner.transform().position();
        let visible = frame
            .shared()
            .frustum()
            .map_or(true, |frustum| frustum.contains_point(position));
        if visible {
            self.offscreen_timer = 0.0;
            return;
        }

        self.offscreen_timer += frame.delta_time();
        if self.offscreen_timer >= self.max_time_offscreen {
            owner.transform_mut().set_position(Vec3::ZERO);
            self.offscreen_timer = 0.0;
            info!(object = %owner.id(), from = ?position, "player offscreen too long, returned to origin");
        }
    }
}

fn axis(input: &dyn InputState, positive: Direction, negative: Direction) -> f32 {
    let mut value = 0.0;
    if input.is_down(positive) {
        value += 1.0;
    }
    if input.is_down(negative) {
        value -= 1.0;
    }
    value
}

impl Component for Player {
    fn update(&mut self, owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
        let delta_time = frame.delta_time();
        let turn = axis(frame.input(), Direction::Left, Direction::Right);
        let throttle = axis(frame.input(), Direction::Up, Direction::Down);

        let gait = if throttle != 0.0 { Gait::Run } else { Gait::Idle };
        if gait != self.gait {
            self.switch_gait(owner, gait);
        }

        let transform = owner.transform_mut();
        let mut rotation = transform.rotation();
        rotation.y += self.turn_speed * turn * delta_time;
        transform.set_rotation(rotation);
        transform.translate_on_axis(FORWARD, self.move_speed * throttle * delta_time);

        self.track_visibility(owner, frame);
    }
}

impl Attach for Player {
    type Config = PlayerConfig;

    fn attach(owner: &mut Owner<'_>, config: PlayerConfig) -> Result<Self, CoreError> {
        require_clips(config.model.as_ref(), &[Gait::Idle.clip(), Gait::Run.clip()])?;

        let skin = owner.add_component::<SkinInstance>(config.model)?;
        owner
            .component_mut(skin)
            .ok_or_else(|| CoreError::InvalidComponentConfig {
                component: "Player",
                details: "skin instance vanished during attach".to_owned(),
            })?
            .set_animation(Gait::Idle.clip())?;

        Ok(Self {
            skin,
            gait: Gait::Idle,
            move_speed: config.move_speed,
            turn_speed: config.turn_speed,
            offscreen_timer: 0.0,
            max_time_offscreen: config.max_time_offscreen,
        })
    }
}

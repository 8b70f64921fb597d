use tracing::warn;

use pasture_core::prelude::*;

/// CameraInfo construction parameters.
#[derive(Debug)]
pub struct CameraInfoConfig {
    pub camera: Box<dyn Camera>,
    /// Object whose position the rig copies every frame.
    pub target: Option<GameObjectId>,
}

/// Owns the camera mounted on this object (the rig) and publishes what it
/// sees.
///
/// Each frame the rig first hard-follows its target, if any, then the view
/// frustum derived from the camera's projection and world-inverse matrices
/// is published to [`Shared`] for visibility tests by other components.
#[derive(Debug)]
pub struct CameraInfo {
    camera: Box<dyn Camera>,
    target: Option<GameObjectId>,
    /// Set once the target has been reported missing.
    target_lost: bool,
}

impl CameraInfo {
    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    pub fn target(&self) -> Option<GameObjectId> {
        self.target
    }

    /// Follow `target` from the next frame on, or stop following.
    pub fn set_target(&mut self, target: Option<GameObjectId>) {
        self.target = target;
        self.target_lost = false;
    }

    /// Propagate a new output aspect ratio to the camera.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    fn follow(&mut self, owner: &mut Owner<'_>, frame: &Frame<'_>) {
        let Some(target) = self.target else {
            return;
        };
        match frame.game_object(target) {
            Some(object) => {
                owner.transform_mut().copy_position_from(object.transform());
                self.target_lost = false;
            }
            None if !self.target_lost => {
                warn!(object = %owner.id(), target = %target, "camera follow target is gone");
                self.target_lost = true;
            }
            None => {}
        }
    }
}

impl Component for CameraInfo {
    fn update(&mut self, owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
        self.follow(owner, frame);
        let frustum = self.camera.frustum(owner.transform());
        frame.shared_mut().set_frustum(frustum);
    }
}

impl Attach for CameraInfo {
    type Config = CameraInfoConfig;

    fn attach(owner: &mut Owner<'_>, config: CameraInfoConfig) -> Result<Self, CoreError> {
        if config.target == Some(owner.id()) {
            return Err(CoreError::InvalidComponentConfig {
                component: "CameraInfo",
                details: "a camera rig cannot follow itself".to_owned(),
            });
        }
        Ok(Self {
            camera: config.camera,
            target: config.target,
            target_lost: false,
        })
    }
}

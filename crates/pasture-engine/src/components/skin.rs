use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use pasture_core::prelude::*;

/// An animated copy of a skinned model, bound to its owner's transform.
///
/// Attaching clones the model's skeleton under the owner and creates a mixer
/// for it. [`set_animation`](Self::set_animation) switches the single active
/// clip; the mixer advances by the frame delta on every update.
#[derive(Debug)]
pub struct SkinInstance {
    model: Rc<dyn SkinnedModel>,
    mixer: Box<dyn AnimationMixer>,
    /// Actions created so far, by clip name.
    actions: HashMap<String, ActionId>,
    current: Option<String>,
}

impl SkinInstance {
    /// Disable every action started so far, then restart the action for
    /// `clip` from its beginning. Actions are created once per clip and
    /// reused afterwards.
    pub fn set_animation(&mut self, clip: &str) -> Result<(), CoreError> {
        if !self.model.has_clip(clip) {
            return Err(unknown_clip(self.model.as_ref(), clip));
        }
        let action = self
            .mixer
            .clip_action(clip)
            .ok_or_else(|| unknown_clip(self.model.as_ref(), clip))?;

        for &other in self.actions.values() {
            self.mixer.set_enabled(other, false);
        }
        self.mixer.set_enabled(action, true);
        self.mixer.reset(action);
        self.mixer.play(action);
        self.actions.insert(clip.to_owned(), action);
        self.current = Some(clip.to_owned());

        debug!(model = self.model.name(), clip, "animation set");
        Ok(())
    }

    /// Clip selected by the last successful `set_animation`.
    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The action created for `clip`, if it has ever been selected.
    pub fn action(&self, clip: &str) -> Option<ActionId> {
        self.actions.get(clip).copied()
    }

    pub fn model(&self) -> &dyn SkinnedModel {
        self.model.as_ref()
    }

    pub fn mixer(&self) -> &dyn AnimationMixer {
        self.mixer.as_ref()
    }

    pub fn mixer_mut(&mut self) -> &mut dyn AnimationMixer {
        self.mixer.as_mut()
    }
}

impl Component for SkinInstance {
    fn update(&mut self, _owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
        self.mixer.update(frame.delta_time());
    }
}

impl Attach for SkinInstance {
    type Config = Rc<dyn SkinnedModel>;

    fn attach(owner: &mut Owner<'_>, model: Self::Config) -> Result<Self, CoreError> {
        let mixer = model.instantiate(owner.transform_mut());
        Ok(Self {
            model,
            mixer,
            actions: HashMap::new(),
            current: None,
        })
    }
}

pub(crate) fn unknown_clip(model: &dyn SkinnedModel, clip: &str) -> CoreError {
    CoreError::UnknownClip {
        model: model.name().to_owned(),
        clip: clip.to_owned(),
        available: model.clip_names().join(", "),
    }
}

/// Fail unless `model` carries every clip in `clips`.
pub(crate) fn require_clips(model: &dyn SkinnedModel, clips: &[&str]) -> Result<(), CoreError> {
    match clips.iter().find(|clip| !model.has_clip(clip)) {
        Some(missing) => Err(unknown_clip(model, missing)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessModel, HeadlessScene};

    fn skinned() -> (GameObjectManager, GameObjectId, ComponentRef<SkinInstance>) {
        let mut scene = HeadlessScene::default();
        let mut manager = GameObjectManager::new();
        let model: Rc<dyn SkinnedModel> =
            Rc::new(HeadlessModel::new("pig", &[("Idle", 2.0), ("Walk", 1.0)]));
        let object = manager.create_game_object(&mut scene, "pig");
        let skin = object.add_component::<SkinInstance>(model).unwrap();
        let id = object.id();
        (manager, id, skin)
    }

    #[test]
    fn set_animation_enables_only_the_requested_clip() {
        let (mut manager, id, skin) = skinned();
        let skin = manager.get_mut(id).unwrap().component_mut(skin).unwrap();

        skin.set_animation("Idle").unwrap();
        let idle = skin.action("Idle").unwrap();
        assert!(skin.mixer().is_enabled(idle));

        skin.set_animation("Walk").unwrap();
        let walk = skin.action("Walk").unwrap();
        assert!(!skin.mixer().is_enabled(idle));
        assert!(skin.mixer().is_enabled(walk));
        assert_eq!(skin.current_animation(), Some("Walk"));

        // Switching back reuses the same action.
        skin.set_animation("Idle").unwrap();
        assert_eq!(skin.action("Idle"), Some(idle));
        assert!(!skin.mixer().is_enabled(walk));
    }

    #[test]
    fn set_animation_restarts_the_clip() {
        let (mut manager, id, skin) = skinned();
        let skin = manager.get_mut(id).unwrap().component_mut(skin).unwrap();
        skin.set_animation("Idle").unwrap();
        let idle = skin.action("Idle").unwrap();
        skin.mixer_mut().update(0.5);
        assert!(skin.mixer().action_time(idle).unwrap() > 0.0);

        skin.set_animation("Idle").unwrap();
        assert_eq!(skin.mixer().action_time(idle), Some(0.0));
    }

    #[test]
    fn unknown_clip_is_reported_with_catalog() {
        let (mut manager, id, skin) = skinned();
        let skin = manager.get_mut(id).unwrap().component_mut(skin).unwrap();
        let err = skin.set_animation("Fly").unwrap_err();
        assert_eq!(
            err.to_string(),
            "model 'pig' has no animation clip 'Fly'. Available clips: [Idle, Walk]"
        );
        assert!(skin.current_animation().is_none());
    }
}

use std::rc::Rc;

use pasture_core::prelude::*;

use super::skin::{require_clips, SkinInstance};

/// Animal construction parameters.
#[derive(Debug, Clone)]
pub struct AnimalConfig {
    pub model: Rc<dyn SkinnedModel>,
    /// Playback-rate multiplier applied to the animal's mixer.
    pub time_scale: f32,
}

/// A farm animal idling in place.
///
/// All behaviour lives in the sibling [`SkinInstance`] it attaches; the
/// animal itself has no per-frame work.
#[derive(Debug)]
pub struct Animal {
    skin: ComponentRef<SkinInstance>,
}

impl Animal {
    pub fn skin(&self) -> ComponentRef<SkinInstance> {
        self.skin
    }
}

impl Component for Animal {}

impl Attach for Animal {
    type Config = AnimalConfig;

    fn attach(owner: &mut Owner<'_>, config: AnimalConfig) -> Result<Self, CoreError> {
        require_clips(config.model.as_ref(), &["Idle"])?;
        if !(config.time_scale.is_finite() && config.time_scale >= 0.0) {
            return Err(CoreError::InvalidComponentConfig {
                component: "Animal",
                details: format!(
                    "time scale must be finite and non-negative, got {}",
                    config.time_scale
                ),
            });
        }

        let skin = owner.add_component::<SkinInstance>(config.model)?;
        let instance = owner
            .component_mut(skin)
            .ok_or_else(|| CoreError::InvalidComponentConfig {
                component: "Animal",
                details: "skin instance vanished during attach".to_owned(),
            })?;
        instance.mixer_mut().set_time_scale(config.time_scale);
        instance.set_animation("Idle")?;

        Ok(Self { skin })
    }
}

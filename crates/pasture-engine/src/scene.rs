//! Bootstrap of the pasture scene once every model has loaded.

use glam::Vec3;
use tracing::info;

use pasture_core::prelude::*;

use crate::assets::ModelLibrary;
use crate::camera::PerspectiveCamera;
use crate::components::{Animal, AnimalConfig, CameraInfo, CameraInfoConfig, Player, PlayerConfig};
use crate::config::SceneConfig;
use crate::EngineError;

/// Ids of the objects created by [`populate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    pub player: GameObjectId,
    pub camera: GameObjectId,
    pub camera_info: ComponentRef<CameraInfo>,
    /// One per configured animal, in configuration order.
    pub animals: Vec<GameObjectId>,
}

/// Create the player, the camera rig following it, and the configured
/// animals spaced out along +X.
///
/// Every model is resolved before anything is created, so an unknown model
/// name leaves the manager untouched. An object whose component rejects its
/// model is removed again; objects created before it are kept.
pub fn populate(
    manager: &mut GameObjectManager,
    scene: &mut dyn SceneParent,
    library: &ModelLibrary,
    config: &SceneConfig,
) -> Result<SceneHandles, EngineError> {
    library.log_catalog();

    let player_model = library.get(&config.player_model)?;
    let animal_models = config
        .animals
        .iter()
        .map(|name| library.get(name))
        .collect::<Result<Vec<_>, _>>()?;

    let (player, _) = spawn::<Player>(
        manager,
        scene,
        "player",
        PlayerConfig::from_scene(config, player_model),
    )?;
    let (camera, camera_info) = spawn::<CameraInfo>(
        manager,
        scene,
        "camera",
        CameraInfoConfig {
            camera: Box::new(PerspectiveCamera::new(&config.camera)),
            target: Some(player),
        },
    )?;

    let mut animals = Vec::with_capacity(animal_models.len());
    for (index, (name, model)) in config.animals.iter().zip(animal_models).enumerate() {
        let animal_config = AnimalConfig {
            model,
            time_scale: config.animal_time_scale,
        };
        let (animal, _) = spawn::<Animal>(manager, scene, name, animal_config)?;
        let x = (index + 1) as f32 * config.animal_spacing;
        if let Some(object) = manager.get_mut(animal) {
            object.transform_mut().set_position(Vec3::new(x, 0.0, 0.0));
        }
        animals.push(animal);
    }

    info!(
        player = %player,
        camera = %camera,
        animals = animals.len(),
        "scene populated"
    );

    Ok(SceneHandles {
        player,
        camera,
        camera_info,
        animals,
    })
}

/// Create `name` with a `C` attached; the object is removed again if the
/// attach fails.
fn spawn<C: Attach>(
    manager: &mut GameObjectManager,
    scene: &mut dyn SceneParent,
    name: &str,
    config: C::Config,
) -> Result<(GameObjectId, ComponentRef<C>), EngineError> {
    let object = manager.create_game_object(scene, name);
    let id = object.id();
    match object.add_component::<C>(config) {
        Ok(component) => Ok((id, component)),
        Err(e) => {
            manager.remove_game_object(id);
            Err(e.into())
        }
    }
}

//! Concrete components of the pasture scene.

mod animal;
mod camera_info;
mod player;
mod skin;

pub use animal::{Animal, AnimalConfig};
pub use camera_info::{CameraInfo, CameraInfoConfig};
pub use player::{Gait, Player, PlayerConfig, FORWARD};
pub use skin::SkinInstance;

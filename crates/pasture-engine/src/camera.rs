//! Perspective camera and six-plane view frustum.
//!
//! The camera is mounted on a rig node: its local pose is a fixed offset from
//! the rig that looks back at the rig origin, so moving the rig moves the
//! camera with it.

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};

use pasture_core::external::{Camera, Frustum, TransformHandle};

use crate::config::CameraConfig;

/// World matrix of a transform handle (rotation then translation, no scale).
pub fn world_matrix(node: &dyn TransformHandle) -> Mat4 {
    let rotation = node.rotation();
    let orientation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    Mat4::from_rotation_translation(orientation, node.position())
}

// ---------------------------------------------------------------------------
// PerspectiveCamera
// ---------------------------------------------------------------------------

/// A right-handed, OpenGL-convention perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    fov_y_radians: f32,
    aspect: f32,
    near: f32,
    far: f32,
    offset: Vec3,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            fov_y_radians: config.fov_degrees.to_radians(),
            aspect: config.aspect,
            near: config.near,
            far: config.far,
            offset: Vec3::from(config.offset),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Position relative to the rig.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Inverse of the camera's pose relative to its rig.
    fn local_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.offset, Vec3::ZERO, Vec3::Y)
    }
}

impl Camera for PerspectiveCamera {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, self.aspect, self.near, self.far)
    }

    fn world_inverse_matrix(&self, rig: &dyn TransformHandle) -> Mat4 {
        self.local_view() * world_matrix(rig).inverse()
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    fn frustum(&self, rig: &dyn TransformHandle) -> Box<dyn Frustum> {
        let view_projection = self.projection_matrix() * self.world_inverse_matrix(rig);
        Box::new(ViewFrustum::from_matrix(view_projection))
    }
}

// ---------------------------------------------------------------------------
// ViewFrustum
// ---------------------------------------------------------------------------

/// A plane `normal . p + distance = 0`, with the inside on the normal's side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        Self {
            normal: normal / length,
            distance: coefficients.w / length,
        }
    }

    fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Visible volume bounded by six planes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrustum {
    /// Left, right, bottom, top, near, far.
    planes: [Plane; 6],
}

impl ViewFrustum {
    /// Extract the planes of a combined projection * view matrix
    /// (Gribb-Hartmann, clip z in [-w, w]).
    pub fn from_matrix(view_projection: Mat4) -> Self {
        let x = view_projection.row(0);
        let y = view_projection.row(1);
        let z = view_projection.row(2);
        let w = view_projection.row(3);
        Self {
            planes: [
                Plane::from_coefficients(w + x),
                Plane::from_coefficients(w - x),
                Plane::from_coefficients(w + y),
                Plane::from_coefficients(w - y),
                Plane::from_coefficients(w + z),
                Plane::from_coefficients(w - z),
            ],
        }
    }
}

impl Frustum for ViewFrustum {
    fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

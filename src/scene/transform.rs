//! Root transform computation for the displayed model

use glam::{Mat4, Vec3};

use crate::engine::{Aabb, ModelHandle, RenderEngine};
use crate::scene::settings::ViewerSettings;

/// Transform that scales and centers `bounds` into the 2x2x2 cube at the
/// origin. Uniform scale, so aspect is preserved; the largest axis touches
/// the cube faces.
pub fn unit_cube_transform(bounds: &Aabb) -> Mat4 {
    let half = bounds.half_extent();
    let largest = half.x.max(half.y).max(half.z);
    if largest <= 0.0 {
        return Mat4::IDENTITY;
    }
    let scale = 1.0 / largest;
    Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-bounds.center())
}

/// Recompute the model's root transform per the current auto-scale policy
pub fn update_root_transform(
    engine: &mut dyn RenderEngine,
    model: ModelHandle,
    settings: &ViewerSettings,
) {
    let transform = if settings.auto_scale_enabled {
        engine
            .model_bounds(model)
            .map(|bounds| unit_cube_transform(&bounds))
            .unwrap_or(Mat4::IDENTITY)
    } else {
        Mat4::IDENTITY
    };
    engine.set_root_transform(model, transform);
}

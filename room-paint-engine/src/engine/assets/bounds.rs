use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Axis-aligned world-space bounds of the loaded room.
/// Used for the floor heuristic during classification and for camera framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl RoomBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// World bounds of a mesh-local AABB placed by `transform`.
    /// All eight corners are transformed so rotated nodes stay enclosed.
    pub fn from_local_aabb(aabb: &Aabb, transform: &GlobalTransform) -> Self {
        let min = Vec3::from(aabb.min());
        let max = Vec3::from(aabb.max());

        let mut corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            transform.transform_point(corner)
        });

        // Eight corners always exist.
        let first = corners.next().unwrap_or(transform.translation());
        corners.fold(Self::new(first, first), |bounds, p| bounds.include(p))
    }

    pub fn include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Calculate center point for camera positioning.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Lowest point of the room, taken as the floor plane.
    pub fn floor_height(&self) -> f32 {
        self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn union_covers_both_inputs() {
        let a = RoomBounds::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let b = RoomBounds::new(Vec3::new(-3.0, 0.5, 0.5), Vec3::new(0.5, 2.8, 4.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(u.max, Vec3::new(1.0, 2.8, 4.0));
        assert_eq!(u.center(), Vec3::new(-1.0, 1.4, 2.0));
    }

    #[test]
    fn new_orders_its_corners() {
        let b = RoomBounds::new(Vec3::splat(2.0), Vec3::splat(-1.0));
        assert_eq!(b.min, Vec3::splat(-1.0));
        assert_eq!(b.max, Vec3::splat(2.0));
    }

    #[test]
    fn rotated_aabb_stays_enclosed() {
        let aabb = Aabb::from_min_max(Vec3::new(-2.0, -0.5, -0.1), Vec3::new(2.0, 0.5, 0.1));
        let transform = GlobalTransform::from(
            Transform::from_xyz(5.0, 1.0, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let bounds = RoomBounds::from_local_aabb(&aabb, &transform);
        assert_abs_diff_eq!(bounds.min.x, 4.9, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.max.x, 5.1, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.min.z, -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.max.z, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.floor_height(), 0.5, epsilon = 1e-5);
    }
}

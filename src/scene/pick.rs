use glam::{Mat4, Vec3};

use super::geometry::Geometry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Maps the ray through an affine transform without renormalizing, so the
    /// ray parameter stays comparable with the untransformed ray.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    #[cfg(test)]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Anything the pointer can land on. Composite objects report the identity of
/// their owner no matter which part was hit.
pub trait Pickable {
    fn id(&self) -> usize;
    fn intersect(&self, ray: &Ray, geometries: &[Geometry]) -> Option<f32>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub id: usize,
    pub distance: f32,
}

pub fn nearest<'a, P: Pickable + 'a>(
    candidates: impl IntoIterator<Item = &'a P>,
    ray: &Ray,
    geometries: &[Geometry],
) -> Option<Hit> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            candidate.intersect(ray, geometries).map(|distance| Hit {
                id: candidate.id(),
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Nearest hit of a world-space ray against `geometry` placed by `model`.
pub fn intersect_mesh(geometry: &Geometry, model: &Mat4, ray: &Ray) -> Option<f32> {
    let inverse = model.inverse();
    if !inverse.is_finite() {
        return None;
    }
    geometry.intersect(&ray.transformed(&inverse))
}

/// One step of exponential smoothing toward `target`.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Box1 {
        id: usize,
        center: Vec3,
    }

    impl Pickable for Box1 {
        fn id(&self) -> usize {
            self.id
        }

        fn intersect(&self, ray: &Ray, geometries: &[Geometry]) -> Option<f32> {
            intersect_mesh(&geometries[0], &Mat4::from_translation(self.center), ray)
        }
    }

    #[test]
    fn nearest_of_overlapping_targets_wins() {
        let geometries = vec![Geometry::cuboid(1.0, 1.0, 1.0)];
        let far = Box1 {
            id: 7,
            center: Vec3::new(0.0, 0.0, -5.0),
        };
        let near = Box1 {
            id: 3,
            center: Vec3::new(0.0, 0.0, -2.0),
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = nearest([&far, &near], &ray, &geometries).expect("both boxes are on the ray");
        assert_eq!(hit.id, 3);
        assert!((hit.distance - 1.5).abs() < 1e-4);
    }

    #[test]
    fn scaled_mesh_keeps_world_distance() {
        let geometry = Geometry::cuboid(1.0, 1.0, 1.0);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -10.0),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let distance = intersect_mesh(&geometry, &model, &ray).expect("ray hits scaled box");
        assert!((distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn miss_returns_none() {
        let geometries = vec![Geometry::cuboid(1.0, 1.0, 1.0)];
        let target = Box1 {
            id: 1,
            center: Vec3::new(3.0, 0.0, -5.0),
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(nearest([&target], &ray, &geometries).is_none());
    }

    proptest! {
        #[test]
        fn smoothing_never_overshoots(current in -10.0f32..10.0, target in -10.0f32..10.0, factor in 0.0f32..=1.0) {
            let next = approach(current, target, factor);
            let (low, high) = if current <= target { (current, target) } else { (target, current) };
            prop_assert!(next >= low - 1e-4 && next <= high + 1e-4);
        }
    }
}

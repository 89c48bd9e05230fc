//! Triangle meshes for the scene primitives, built once at scene setup.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::pick::Ray;

const PARALLEL_EPSILON: f32 = 1e-10;
const DISTANCE_EPSILON: f32 = 1e-6;
const OUTLINE_MERGE_DISTANCE: f32 = 1e-4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    bounding_radius: f32,
}

impl Geometry {
    fn from_parts(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounding_radius = positions
            .iter()
            .map(|position| position.length())
            .fold(0.0_f32, f32::max);

        Self {
            positions,
            normals,
            indices,
            bounding_radius,
        }
    }

    #[cfg(test)]
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    #[cfg(test)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position and normal per vertex, packed for a single vertex buffer.
    pub fn interleaved(&self) -> Vec<f32> {
        self.positions
            .iter()
            .zip(&self.normals)
            .flat_map(|(position, normal)| {
                [position.x, position.y, position.z, normal.x, normal.y, normal.z]
            })
            .collect()
    }

    /// Distance along `ray` (in object space) to the nearest triangle, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if !ray_meets_sphere(ray, self.bounding_radius) {
            return None;
        }

        self.indices
            .chunks_exact(3)
            .filter_map(|triangle| {
                let a = self.positions[triangle[0] as usize];
                let b = self.positions[triangle[1] as usize];
                let c = self.positions[triangle[2] as usize];
                intersect_triangle(ray, a, b, c)
            })
            .min_by(f32::total_cmp)
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let v = j as f32 / radial_segments as f32 * TAU;

                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

                positions.push(position);
                normals.push((position - center).normalize_or_zero());
            }
        }

        let row = tubular_segments + 1;
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::from_parts(positions, normals, indices)
    }

    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let vertices = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|vertex| vertex.normalize() * radius);

        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        flat_polyhedron(&vertices, &FACES)
    }

    pub fn octahedron(radius: f32) -> Self {
        let vertices = [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ]
        .map(|vertex| vertex * radius);

        const FACES: [[usize; 3]; 8] = [
            [0, 2, 4],
            [0, 4, 3],
            [0, 3, 5],
            [0, 5, 2],
            [1, 2, 5],
            [1, 5, 3],
            [1, 3, 4],
            [1, 4, 2],
        ];

        flat_polyhedron(&vertices, &FACES)
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) / 2.0;
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u_axis, v_axis) in [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ] {
            let base = positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                positions.push((normal + u_axis * su + v_axis * sv) * half);
                normals.push(normal);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::from_parts(positions, normals, indices)
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let direction = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                positions.push(direction * radius);
                normals.push(direction.normalize_or_zero());
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::from_parts(positions, normals, indices)
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let half_height = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for (y, radius) in [(half_height, radius_top), (-half_height, radius_bottom)] {
            for x in 0..=radial_segments {
                let theta = x as f32 / radial_segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                positions.push(Vec3::new(radius * sin, y, radius * cos));
                normals.push(Vec3::new(sin, slope, cos).normalize_or_zero());
            }
        }

        let row = radial_segments + 1;
        for x in 0..radial_segments {
            let a = x;
            let b = row + x;
            let c = row + x + 1;
            let d = x + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        for (y, radius, normal) in [
            (half_height, radius_top, Vec3::Y),
            (-half_height, radius_bottom, Vec3::NEG_Y),
        ] {
            let center = positions.len() as u32;
            positions.push(Vec3::new(0.0, y, 0.0));
            normals.push(normal);

            for x in 0..=radial_segments {
                let theta = x as f32 / radial_segments as f32 * TAU;
                positions.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
                normals.push(normal);
            }

            for x in 0..radial_segments {
                let current = center + 1 + x;
                let next = current + 1;
                if normal.y > 0.0 {
                    indices.extend_from_slice(&[current, next, center]);
                } else {
                    indices.extend_from_slice(&[next, current, center]);
                }
            }
        }

        Self::from_parts(positions, normals, indices)
    }

    /// Prism from a star-shaped outline, spanning z in `[0, depth]`.
    pub fn extrude(outline: &[Vec2], depth: f32) -> Self {
        let mut points: Vec<Vec2> = Vec::with_capacity(outline.len());
        for &point in outline {
            if points
                .last()
                .is_none_or(|last: &Vec2| last.distance(point) > OUTLINE_MERGE_DISTANCE)
            {
                points.push(point);
            }
        }
        if points.len() > 1 && points[0].distance(points[points.len() - 1]) <= OUTLINE_MERGE_DISTANCE {
            points.pop();
        }
        if points.len() < 3 {
            return Self::default();
        }
        if signed_area(&points) < 0.0 {
            points.reverse();
        }

        let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for (z, normal) in [(depth, Vec3::Z), (0.0, Vec3::NEG_Z)] {
            let center = positions.len() as u32;
            positions.push(centroid.extend(z));
            normals.push(normal);
            for point in &points {
                positions.push(point.extend(z));
                normals.push(normal);
            }

            let count = points.len() as u32;
            for i in 0..count {
                let current = center + 1 + i;
                let next = center + 1 + (i + 1) % count;
                if normal.z > 0.0 {
                    indices.extend_from_slice(&[center, current, next]);
                } else {
                    indices.extend_from_slice(&[center, next, current]);
                }
            }
        }

        for (i, &start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            let edge = end - start;
            let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
            let base = positions.len() as u32;

            for corner in [start.extend(0.0), end.extend(0.0), end.extend(depth), start.extend(depth)] {
                positions.push(corner);
                normals.push(normal);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::from_parts(positions, normals, indices)
    }
}

/// Samples a cubic Bézier segment, excluding its start point.
pub fn cubic_bezier(start: Vec2, c1: Vec2, c2: Vec2, end: Vec2, samples: u32) -> Vec<Vec2> {
    (1..=samples)
        .map(|step| {
            let t = step as f32 / samples as f32;
            let mt = 1.0 - t;
            start * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + end * (t * t * t)
        })
        .collect()
}

fn signed_area(points: &[Vec2]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum::<f32>()
        / 2.0
}

fn flat_polyhedron(vertices: &[Vec3], faces: &[[usize; 3]]) -> Geometry {
    let mut positions = Vec::with_capacity(faces.len() * 3);
    let mut normals = Vec::with_capacity(faces.len() * 3);
    let mut indices = Vec::with_capacity(faces.len() * 3);

    for face in faces {
        let [a, b, c] = face.map(|index| vertices[index]);
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };

        let base = positions.len() as u32;
        positions.extend_from_slice(&[a, b, c]);
        normals.extend_from_slice(&[normal; 3]);
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    Geometry::from_parts(positions, normals, indices)
}

fn ray_meets_sphere(ray: &Ray, radius: f32) -> bool {
    let a = ray.direction.length_squared();
    if a == 0.0 {
        return false;
    }
    let b = ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - radius * radius;
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return false;
    }
    // Farthest root behind the origin means the sphere is entirely behind the ray.
    (-b + discriminant.sqrt()) / a >= 0.0
}

fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let determinant = edge1.dot(p);
    if determinant.abs() < PARALLEL_EPSILON {
        return None;
    }

    let inverse = 1.0 / determinant;
    let s = ray.origin - a;
    let u = s.dot(p) * inverse;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inverse;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let distance = edge2.dot(q) * inverse;
    (distance > DISTANCE_EPSILON).then_some(distance)
}

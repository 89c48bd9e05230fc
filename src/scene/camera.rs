use std::f32::consts::PI;

use glam::{Mat4, Vec2, Vec3};

use super::pick::Ray;

const POLE_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, position: Vec3) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
            position,
            target: Vec3::ZERO,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray from the eye through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let through = self
            .view_projection()
            .inverse()
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, through - self.position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_step: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
            min_distance: 3.0,
            max_distance: 10.0,
            rotate_speed: 1.0,
            zoom_step: 0.95,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Drag-to-orbit, wheel-to-zoom camera controller around a fixed target.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    settings: OrbitSettings,
    enabled: bool,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    drag_from: Option<(f64, f64)>,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings, camera: &PerspectiveCamera) -> Self {
        Self {
            settings,
            enabled: true,
            spherical: Spherical::from_offset(camera.position - camera.target),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            drag_from: None,
        }
    }

    #[cfg(test)]
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    /// Starts an orbit drag. Only the primary button orbits; panning is off.
    pub fn pointer_down(&mut self, button: i16, x: f64, y: f64) -> bool {
        if !self.enabled || button != 0 {
            return false;
        }

        self.drag_from = Some((x, y));
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, element_height: f64) {
        if !self.enabled || element_height <= 0.0 {
            return;
        }
        let Some((last_x, last_y)) = self.drag_from else {
            return;
        };

        let height = element_height as f32;
        self.delta_theta -= 2.0 * PI * (x - last_x) as f32 / height * self.settings.rotate_speed;
        self.delta_phi -= 2.0 * PI * (y - last_y) as f32 / height * self.settings.rotate_speed;
        self.drag_from = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Negative `delta_y` (wheel up) moves the camera closer.
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.enabled || !self.settings.enable_zoom || delta_y == 0.0 {
            return;
        }

        if delta_y < 0.0 {
            self.scale *= self.settings.zoom_step;
        } else {
            self.scale /= self.settings.zoom_step;
        }
    }

    /// Applies pending input to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let factor = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };

        self.spherical.theta += self.delta_theta * factor;
        self.spherical.phi = (self.spherical.phi + self.delta_phi * factor).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.spherical.radius = (self.spherical.radius * self.scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        let position = camera.target + self.spherical.to_offset();

        if self.settings.enable_damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let moved = position.distance_squared(camera.position) > 1e-12;
        camera.position = position;
        moved
    }

    pub fn dispose(&mut self) {
        self.enabled = false;
        self.drag_from = None;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

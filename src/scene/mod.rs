pub mod camera;
pub mod geometry;
pub mod hero;
pub mod pick;
pub mod skills;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

use crate::events::{Subscription, Viewport};
use crate::frame_loop::CancellationToken;
use geometry::Geometry;

pub type GeometryId = usize;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("webgl2 context unavailable")]
    ContextUnavailable,
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("gpu buffer allocation failed")]
    BufferAllocation,
    #[error("uniform `{0}` missing from program")]
    MissingUniform(&'static str),
}

pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub model: Mat4,
    pub material: Material,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub view_projection: Mat4,
    pub eye: Vec3,
    pub ambient: Vec3,
    pub lights: Vec<PointLight>,
    pub items: Vec<DrawItem>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: f64::from(viewport.width),
            height: f64::from(viewport.height),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// Normalized device coordinates of a client point, `None` outside the rect.
    pub fn ndc(&self, x: f64, y: f64) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 || !self.contains(x, y) {
            return None;
        }

        Some(Vec2::new(
            (((x - self.left) / self.width) * 2.0 - 1.0) as f32,
            (-((y - self.top) / self.height) * 2.0 + 1.0) as f32,
        ))
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width.round().max(0.0) as u32,
            height: self.height.round().max(0.0) as u32,
        }
    }
}

pub trait Surface {
    fn upload(&mut self, geometries: &[Geometry]) -> Result<(), SceneError>;
    fn set_size(&mut self, viewport: Viewport);
    fn size(&self) -> Viewport;
    fn draw(&mut self, frame: &Frame);
    fn dispose(&mut self);
}

pub trait SceneModel {
    fn geometries(&self) -> &[Geometry];
    fn viewport(&self) -> Viewport;
    fn advance(&mut self, now_ms: f64);
    fn resize(&mut self, viewport: Viewport);
    fn frame(&self) -> Frame;
    fn dispose(&mut self) {}
}

pub struct Stage<M, S> {
    pub model: M,
    pub surface: S,
}

impl<M: SceneModel, S: Surface> Stage<M, S> {
    pub fn render(&mut self, now_ms: f64) {
        self.model.advance(now_ms);
        let frame = self.model.frame();
        self.surface.draw(&frame);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }
        self.model.resize(viewport);
        self.surface.set_size(viewport);
    }

    fn dispose(&mut self) {
        self.model.dispose();
        self.surface.dispose();
    }
}

pub type SharedStage<M, S> = Rc<RefCell<Stage<M, S>>>;

/// Runs `apply` against the stage if it is still alive and not already borrowed.
pub fn with_stage<M, S>(stage: &Weak<RefCell<Stage<M, S>>>, apply: impl FnOnce(&mut Stage<M, S>)) {
    let Some(stage) = stage.upgrade() else {
        return;
    };
    let Ok(mut stage) = stage.try_borrow_mut() else {
        return;
    };
    apply(&mut stage);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Disposed,
}

pub struct SceneRuntime<M: SceneModel, S: Surface> {
    name: &'static str,
    phase: Phase,
    stage: Option<SharedStage<M, S>>,
    subscriptions: Vec<Subscription>,
    token: CancellationToken,
}

impl<M: SceneModel, S: Surface> SceneRuntime<M, S> {
    pub fn uninitialized(name: &'static str) -> Self {
        Self {
            name,
            phase: Phase::Uninitialized,
            stage: None,
            subscriptions: Vec::new(),
            token: CancellationToken::new(),
        }
    }

    pub fn launch(name: &'static str, model: M, mut surface: S) -> Result<Self, SceneError> {
        surface.upload(model.geometries())?;
        surface.set_size(model.viewport());

        log::debug!("scene `{name}` running with {} geometries", model.geometries().len());

        Ok(Self {
            name,
            phase: Phase::Running,
            stage: Some(Rc::new(RefCell::new(Stage { model, surface }))),
            subscriptions: Vec::new(),
            token: CancellationToken::new(),
        })
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage(&self) -> Option<SharedStage<M, S>> {
        self.stage.clone()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Keeps `subscription` alive until teardown. After teardown it is
    /// released immediately.
    pub fn hold(&mut self, mut subscription: Subscription) {
        if self.phase == Phase::Disposed {
            subscription.release();
            return;
        }
        self.subscriptions.push(subscription);
    }

    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }

        self.token.cancel();
        self.subscriptions.clear();

        if let Some(stage) = self.stage.take() {
            match stage.try_borrow_mut() {
                Ok(mut stage) => stage.dispose(),
                Err(_) => log::warn!("scene `{}` disposed while rendering", self.name),
            }
        }

        if self.phase == Phase::Running {
            log::debug!("scene `{}` disposed", self.name);
        }
        self.phase = Phase::Disposed;
    }
}

impl<M: SceneModel, S: Surface> Drop for SceneRuntime<M, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSurface;
    use super::*;

    struct StillModel {
        viewport: Viewport,
        geometries: Vec<Geometry>,
    }

    impl SceneModel for StillModel {
        fn geometries(&self) -> &[Geometry] {
            &self.geometries
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn advance(&mut self, _now_ms: f64) {}

        fn resize(&mut self, viewport: Viewport) {
            self.viewport = viewport;
        }

        fn frame(&self) -> Frame {
            Frame {
                view_projection: Mat4::IDENTITY,
                eye: Vec3::ZERO,
                ambient: Vec3::ZERO,
                lights: Vec::new(),
                items: Vec::new(),
            }
        }
    }

    fn still_model() -> StillModel {
        StillModel {
            viewport: Viewport {
                width: 640,
                height: 480,
            },
            geometries: vec![Geometry::cuboid(1.0, 1.0, 1.0)],
        }
    }

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(rgb(0xff0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(rgb(0x00ff00), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn ndc_maps_corners_and_rejects_outside() {
        let rect = ScreenRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };

        assert_eq!(rect.ndc(100.0, 50.0), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(rect.ndc(200.0, 100.0), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(rect.ndc(99.0, 60.0), None);
        assert_eq!(rect.ndc(150.0, 151.0), None);
    }

    #[test]
    fn launch_uploads_and_sizes_surface() {
        let runtime = SceneRuntime::launch("still", still_model(), RecordingSurface::default())
            .expect("recording surface accepts uploads");
        let stage = runtime.stage().expect("running scene has a stage");
        let stage = stage.borrow();

        assert_eq!(runtime.phase(), Phase::Running);
        assert_eq!(stage.surface.uploaded, 1);
        assert_eq!(
            stage.surface.size(),
            Viewport {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn failed_upload_surfaces_error() {
        let result = SceneRuntime::launch("still", still_model(), RecordingSurface::failing());
        assert!(matches!(result, Err(SceneError::ContextUnavailable)));
    }

    #[test]
    fn dispose_twice_disposes_surface_once() {
        let mut runtime = SceneRuntime::launch("still", still_model(), RecordingSurface::default())
            .expect("recording surface accepts uploads");
        let stage = runtime.stage().expect("running scene has a stage");
        let token = runtime.token();

        runtime.dispose();
        runtime.dispose();

        assert_eq!(runtime.phase(), Phase::Disposed);
        assert!(token.is_cancelled());
        assert_eq!(stage.borrow().surface.disposals, 1);
    }

    #[test]
    fn dispose_without_setup_is_harmless() {
        let mut runtime: SceneRuntime<StillModel, RecordingSurface> =
            SceneRuntime::uninitialized("never-started");
        runtime.dispose();
        runtime.dispose();
        assert_eq!(runtime.phase(), Phase::Disposed);
    }

    #[test]
    fn hold_after_dispose_releases_immediately() {
        let channel = crate::events::EventChannel::<()>::new();
        let mut runtime: SceneRuntime<StillModel, RecordingSurface> =
            SceneRuntime::uninitialized("late");
        runtime.dispose();

        runtime.hold(channel.subscribe(|_| {}));
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let runtime = SceneRuntime::launch("still", still_model(), RecordingSurface::default())
            .expect("recording surface accepts uploads");
        let stage = runtime.stage().expect("running scene has a stage");

        stage.borrow_mut().resize(Viewport {
            width: 0,
            height: 300,
        });

        assert_eq!(stage.borrow().model.viewport.width, 640);
    }
}

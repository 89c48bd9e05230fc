//! Hero background: four spinning solids under two orbiting lights.

use std::rc::Rc;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::camera::{OrbitControls, OrbitSettings, PerspectiveCamera};
use super::geometry::Geometry;
use super::pick::{self, approach, Pickable, Ray};
use super::{
    rgb, with_stage, DrawItem, Frame, GeometryId, Material, PointLight, SceneError, SceneModel, SceneRuntime,
    ScreenRect, Surface,
};
use crate::events::{BrowserEvents, Viewport};

pub const CLICK_HOLD_MS: f64 = 500.0;

const SMOOTHING: f32 = 0.1;
const FOV_DEGREES: f32 = 75.0;
const CAMERA_DISTANCE: f32 = 5.0;
const LIGHT_ORBIT_RADIUS: f32 = 3.0;
const LIGHT_ORBIT_RATE: f64 = 0.001;
const LIGHT_DEPTH: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Emphasis {
    Idle,
    Hovered,
    Clicked,
}

impl Emphasis {
    pub fn target_scale(self) -> f32 {
        match self {
            Self::Idle => 1.0,
            Self::Hovered => 1.2,
            Self::Clicked => 1.5,
        }
    }

    pub fn target_emissive(self) -> f32 {
        match self {
            Self::Idle => 0.5,
            Self::Hovered => 0.7,
            Self::Clicked => 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    id: usize,
    geometry: GeometryId,
    color: Vec3,
    position: Vec3,
    rotation: Vec3,
    spin: Vec2,
    scale: f32,
    emissive: f32,
    clicked_until: Option<f64>,
}

impl Solid {
    fn new(id: usize, geometry: GeometryId, color: u32, position: Vec3, spin: Vec2) -> Self {
        Self {
            id,
            geometry,
            color: rgb(color),
            position,
            rotation: Vec3::ZERO,
            spin,
            scale: 1.0,
            emissive: Emphasis::Idle.target_emissive(),
            clicked_until: None,
        }
    }

    #[cfg(test)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn emissive(&self) -> f32 {
        self.emissive
    }

    #[cfg(test)]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn is_clicked(&self, now_ms: f64) -> bool {
        self.clicked_until.is_some_and(|deadline| now_ms < deadline)
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }
}

impl Pickable for Solid {
    fn id(&self) -> usize {
        self.id
    }

    fn intersect(&self, ray: &Ray, geometries: &[Geometry]) -> Option<f32> {
        pick::intersect_mesh(geometries.get(self.geometry)?, &self.model_matrix(), ray)
    }
}

pub struct AmbientScene {
    geometries: Vec<Geometry>,
    solids: Vec<Solid>,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    pointer: Vec2,
    hovered: Option<usize>,
    lights: [PointLight; 2],
    now_ms: f64,
}

impl AmbientScene {
    pub fn new(viewport: Viewport) -> Self {
        let geometries = vec![
            Geometry::torus(1.0, 0.3, 16, 100),
            Geometry::icosahedron(0.8),
            Geometry::octahedron(0.6),
            Geometry::cuboid(0.7, 0.7, 0.7),
        ];
        let solids = vec![
            Solid::new(0, 0, 0x00d9ff, Vec3::new(-2.0, 0.0, 0.0), Vec2::new(0.002, 0.003)),
            Solid::new(1, 1, 0xb366ff, Vec3::new(2.0, 1.0, 0.0), Vec2::new(0.003, 0.002)),
            Solid::new(2, 2, 0xff4d8f, Vec3::new(0.0, -1.5, 0.0), Vec2::new(0.001, 0.004)),
            Solid::new(3, 3, 0x00ffaa, Vec3::new(1.5, -1.0, -1.0), Vec2::new(0.004, 0.001)),
        ];
        let camera = PerspectiveCamera::new(FOV_DEGREES, viewport.aspect(), Vec3::new(0.0, 0.0, CAMERA_DISTANCE));
        let controls = OrbitControls::new(OrbitSettings::default(), &camera);

        Self {
            geometries,
            solids,
            camera,
            controls,
            viewport,
            pointer: Vec2::ZERO,
            hovered: None,
            lights: [
                PointLight {
                    position: Vec3::new(5.0, 5.0, 5.0),
                    color: rgb(0x00d9ff),
                    intensity: 2.0,
                    range: 100.0,
                },
                PointLight {
                    position: Vec3::new(-5.0, -5.0, 5.0),
                    color: rgb(0xb366ff),
                    intensity: 2.0,
                    range: 100.0,
                },
            ],
            now_ms: 0.0,
        }
    }

    #[cfg(test)]
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[cfg(test)]
    pub fn lights(&self) -> &[PointLight; 2] {
        &self.lights
    }

    #[cfg(test)]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[cfg(test)]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn pointer_moved(&mut self, client_x: f64, client_y: f64) {
        if let Some(ndc) = ScreenRect::from_viewport(self.viewport).ndc(client_x, client_y) {
            self.pointer = ndc;
        }
    }

    /// Marks the nearest solid under the click as clicked for [`CLICK_HOLD_MS`].
    pub fn click(&mut self, client_x: f64, client_y: f64, now_ms: f64) -> Option<usize> {
        self.pointer_moved(client_x, client_y);
        let ray = self.camera.ray_from_ndc(self.pointer);
        let hit = pick::nearest(&self.solids, &ray, &self.geometries)?;

        let solid = self.solids.get_mut(hit.id)?;
        solid.clicked_until = Some(now_ms + CLICK_HOLD_MS);
        Some(hit.id)
    }

    pub fn emphasis(&self, index: usize, now_ms: f64) -> Emphasis {
        match self.solids.get(index) {
            Some(solid) if solid.is_clicked(now_ms) => Emphasis::Clicked,
            Some(_) if self.hovered == Some(index) => Emphasis::Hovered,
            _ => Emphasis::Idle,
        }
    }

    pub fn orbit_pointer_down(&mut self, button: i16, x: f64, y: f64) -> bool {
        self.controls.pointer_down(button, x, y)
    }

    pub fn orbit_pointer_move(&mut self, x: f64, y: f64, element_height: f64) {
        self.controls.pointer_move(x, y, element_height);
    }

    pub fn orbit_pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    pub fn orbit_wheel(&mut self, delta_y: f64) {
        self.controls.wheel(delta_y);
    }

    fn move_lights(&mut self, now_ms: f64) {
        let phase = now_ms * LIGHT_ORBIT_RATE;
        let (sin, cos) = ((phase.sin() as f32), (phase.cos() as f32));

        self.lights[0].position = Vec3::new(sin * LIGHT_ORBIT_RADIUS, cos * LIGHT_ORBIT_RADIUS, LIGHT_DEPTH);
        self.lights[1].position = Vec3::new(cos * LIGHT_ORBIT_RADIUS, sin * LIGHT_ORBIT_RADIUS, LIGHT_DEPTH);
    }
}

impl SceneModel for AmbientScene {
    fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        self.controls.update(&mut self.camera);

        let ray = self.camera.ray_from_ndc(self.pointer);
        self.hovered = pick::nearest(&self.solids, &ray, &self.geometries).map(|hit| hit.id);

        for index in 0..self.solids.len() {
            let emphasis = self.emphasis(index, now_ms);
            let solid = &mut self.solids[index];

            if solid.clicked_until.is_some_and(|deadline| now_ms >= deadline) {
                solid.clicked_until = None;
            }

            solid.rotation.x += solid.spin.x;
            solid.rotation.y += solid.spin.y;
            solid.scale = approach(solid.scale, emphasis.target_scale(), SMOOTHING);
            solid.emissive = approach(solid.emissive, emphasis.target_emissive(), SMOOTHING);
        }

        self.move_lights(now_ms);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    fn frame(&self) -> Frame {
        Frame {
            view_projection: self.camera.view_projection(),
            eye: self.camera.position,
            ambient: rgb(0x404040) * 2.0,
            lights: self.lights.to_vec(),
            items: self
                .solids
                .iter()
                .map(|solid| DrawItem {
                    geometry: solid.geometry,
                    model: solid.model_matrix(),
                    material: Material {
                        color: solid.color,
                        emissive: solid.color,
                        emissive_intensity: solid.emissive,
                        metalness: 0.7,
                        roughness: 0.2,
                    },
                })
                .collect(),
        }
    }

    fn dispose(&mut self) {
        self.controls.dispose();
    }
}

/// Builds the hero scene on `surface` and subscribes it to pointer, click and
/// resize broadcasts. Nothing is subscribed if the surface rejects the scene.
pub fn mount<S: Surface + 'static>(
    surface: S,
    viewport: Viewport,
    events: &BrowserEvents,
) -> Result<SceneRuntime<AmbientScene, S>, SceneError> {
    let mut runtime = SceneRuntime::launch("hero", AmbientScene::new(viewport), surface)?;
    let Some(stage) = runtime.stage() else {
        return Ok(runtime);
    };

    let weak = Rc::downgrade(&stage);
    runtime.hold(events.pointer_move.subscribe(move |event| {
        with_stage(&weak, |stage| stage.model.pointer_moved(event.client_x, event.client_y));
    }));

    let weak = Rc::downgrade(&stage);
    runtime.hold(events.click.subscribe(move |event| {
        with_stage(&weak, |stage| {
            if let Some(index) = stage.model.click(event.client_x, event.client_y, event.timestamp_ms) {
                log::debug!("hero solid {index} clicked");
            }
        });
    }));

    let weak = Rc::downgrade(&stage);
    runtime.hold(events.resize.subscribe(move |viewport| {
        with_stage(&weak, |stage| stage.resize(*viewport));
    }));

    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Click, PointerMove};
    use crate::scene::testing::RecordingSurface;
    use crate::scene::Phase;
    use proptest::prelude::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 720,
    };

    /// Client coordinates of a world point as seen by the scene's camera.
    fn screen_point(scene: &AmbientScene, world: Vec3) -> (f64, f64) {
        let ndc = scene.camera().view_projection().project_point3(world);
        (
            f64::from((ndc.x + 1.0) / 2.0) * f64::from(VIEWPORT.width),
            f64::from((1.0 - ndc.y) / 2.0) * f64::from(VIEWPORT.height),
        )
    }

    fn octahedron_on_screen(scene: &AmbientScene) -> (f64, f64) {
        screen_point(scene, Vec3::new(0.0, -1.5, 0.0))
    }

    #[test]
    fn scene_has_four_solids_with_distinct_spins() {
        let scene = AmbientScene::new(VIEWPORT);
        assert_eq!(scene.solids().len(), 4);
        for (index, solid) in scene.solids().iter().enumerate() {
            assert!(scene.solids()[index + 1..].iter().all(|other| other.spin != solid.spin));
        }
    }

    #[test]
    fn every_frame_spins_each_solid_by_its_increment() {
        let mut scene = AmbientScene::new(VIEWPORT);
        scene.advance(0.0);
        scene.advance(16.0);

        let torus = &scene.solids()[0];
        assert!((torus.rotation().x - 0.004).abs() < 1e-6);
        assert!((torus.rotation().y - 0.006).abs() < 1e-6);
    }

    #[test]
    fn hovering_a_solid_grows_it_smoothly() {
        let mut scene = AmbientScene::new(VIEWPORT);
        let (x, y) = octahedron_on_screen(&scene);
        scene.pointer_moved(x, y);
        scene.advance(0.0);

        assert_eq!(scene.hovered(), Some(2));
        let first = scene.solids()[2].scale();
        assert!(first > 1.0 && first < Emphasis::Hovered.target_scale());

        for step in 1..200 {
            scene.advance(f64::from(step) * 16.0);
        }
        assert!((scene.solids()[2].scale() - 1.2).abs() < 1e-3);
        assert!((scene.solids()[2].emissive() - 0.7).abs() < 1e-3);
        assert!((scene.solids()[0].scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_space_hovers_nothing() {
        let mut scene = AmbientScene::new(VIEWPORT);
        scene.pointer_moved(5.0, 5.0);
        scene.advance(0.0);
        assert_eq!(scene.hovered(), None);
    }

    #[test]
    fn click_flag_clears_exactly_after_hold() {
        let mut scene = AmbientScene::new(VIEWPORT);
        let (x, y) = octahedron_on_screen(&scene);

        assert_eq!(scene.click(x, y, 1_000.0), Some(2));
        assert!(scene.solids()[2].is_clicked(1_000.0));
        assert!(scene.solids()[2].is_clicked(1_499.999));
        assert!(!scene.solids()[2].is_clicked(1_500.0));

        scene.advance(1_499.0);
        assert_eq!(scene.emphasis(2, 1_499.0), Emphasis::Clicked);
        scene.advance(1_500.0);
        assert_ne!(scene.emphasis(2, 1_500.0), Emphasis::Clicked);
    }

    #[test]
    fn click_on_empty_space_marks_nothing() {
        let mut scene = AmbientScene::new(VIEWPORT);
        assert_eq!(scene.click(3.0, 3.0, 0.0), None);
        assert!(scene.solids().iter().all(|solid| !solid.is_clicked(0.0)));
    }

    #[test]
    fn clicked_outranks_hovered() {
        let mut scene = AmbientScene::new(VIEWPORT);
        let (x, y) = octahedron_on_screen(&scene);
        scene.pointer_moved(x, y);
        scene.click(x, y, 0.0);

        for step in 0..20 {
            scene.advance(f64::from(step) * 10.0);
        }
        assert_eq!(scene.emphasis(2, 190.0), Emphasis::Clicked);
        assert!(scene.solids()[2].scale() > 1.2);
    }

    #[test]
    fn lights_orbit_with_swapped_phase() {
        let mut scene = AmbientScene::new(VIEWPORT);
        scene.advance(0.0);

        let [first, second] = *scene.lights();
        assert!((first.position - Vec3::new(0.0, 3.0, 5.0)).length() < 1e-5);
        assert!((second.position - Vec3::new(3.0, 0.0, 5.0)).length() < 1e-5);

        scene.advance(std::f64::consts::FRAC_PI_2 * 1_000.0);
        let [first, second] = *scene.lights();
        assert!((first.position - Vec3::new(3.0, 0.0, 5.0)).length() < 1e-4);
        assert!((second.position - Vec3::new(0.0, 3.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn resize_updates_camera_and_surface() {
        let events = BrowserEvents::new();
        let runtime = mount(RecordingSurface::default(), VIEWPORT, &events).expect("mounts on recording surface");

        let resized = Viewport {
            width: 800,
            height: 600,
        };
        events.resize.publish(&resized);

        let stage = runtime.stage().expect("running scene has a stage");
        let stage = stage.borrow();
        assert_eq!(stage.model.camera().aspect, 800.0 / 600.0);
        assert_eq!(stage.surface.size(), resized);
    }

    #[test]
    fn broadcast_events_reach_the_scene() {
        let events = BrowserEvents::new();
        let runtime = mount(RecordingSurface::default(), VIEWPORT, &events).expect("mounts on recording surface");
        let stage = runtime.stage().expect("running scene has a stage");

        let (x, y) = octahedron_on_screen(&stage.borrow().model);
        events.pointer_move.publish(&PointerMove {
            client_x: x,
            client_y: y,
            target_interactive: false,
        });
        events.click.publish(&Click {
            client_x: x,
            client_y: y,
            timestamp_ms: 50.0,
        });
        stage.borrow_mut().render(60.0);

        let stage = stage.borrow();
        assert_eq!(stage.model.hovered(), Some(2));
        assert!(stage.model.solids()[2].is_clicked(60.0));
        assert_eq!(stage.surface.frames.len(), 1);
        assert_eq!(stage.surface.frames[0].items.len(), 4);
    }

    #[test]
    fn teardown_restores_listener_baseline() {
        let events = BrowserEvents::new();
        let _unrelated = events.resize.subscribe(|_| {});
        let baseline = events.listener_counts();

        let mut runtime = mount(RecordingSurface::default(), VIEWPORT, &events).expect("mounts on recording surface");
        assert_ne!(events.listener_counts(), baseline);

        let stage = runtime.stage().expect("running scene has a stage");
        runtime.dispose();
        runtime.dispose();

        assert_eq!(runtime.phase(), Phase::Disposed);
        assert_eq!(events.listener_counts(), baseline);
        assert_eq!(stage.borrow().surface.disposals, 1);
        assert!(!stage.borrow().model.controls().is_enabled());
    }

    #[test]
    fn missing_capability_registers_nothing() {
        let events = BrowserEvents::new();
        let baseline = events.listener_counts();

        let result = mount(RecordingSurface::failing(), VIEWPORT, &events);

        assert!(result.is_err());
        assert_eq!(events.listener_counts(), baseline);
    }

    #[test]
    fn dropping_runtime_disposes_it() {
        let events = BrowserEvents::new();
        let baseline = events.listener_counts();
        let runtime = mount(RecordingSurface::default(), VIEWPORT, &events).expect("mounts on recording surface");
        let token = runtime.token();

        drop(runtime);

        assert!(token.is_cancelled());
        assert_eq!(events.listener_counts(), baseline);
    }

    #[test]
    fn emphasis_targets_are_strictly_ordered() {
        let order = [Emphasis::Idle, Emphasis::Hovered, Emphasis::Clicked];
        for pair in order.windows(2) {
            assert!(pair[1].target_scale() > pair[0].target_scale());
            assert!(pair[1].target_emissive() > pair[0].target_emissive());
        }
    }

    proptest! {
        #[test]
        fn clicked_window_is_exactly_half_a_second(clicked_at in 0.0f64..1e9, probe in 0.0f64..1_000.0) {
            let mut scene = AmbientScene::new(VIEWPORT);
            let (x, y) = octahedron_on_screen(&scene);
            prop_assume!(scene.click(x, y, clicked_at).is_some());

            let now = clicked_at + probe;
            let solid = &scene.solids()[2];
            prop_assert_eq!(solid.is_clicked(now), probe < CLICK_HOLD_MS);
        }
    }
}

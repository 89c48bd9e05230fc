//! Skills carousel: one icon per skill on a slowly turning ring.

use std::cell::Cell;
use std::f32::consts::{PI, TAU};
use std::rc::Rc;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::camera::PerspectiveCamera;
use super::geometry::{cubic_bezier, Geometry};
use super::pick::{self, approach, Pickable, Ray};
use super::{
    rgb, with_stage, DrawItem, Frame, GeometryId, Material, PointLight, SceneError, SceneModel, SceneRuntime,
    ScreenRect, Surface,
};
use crate::content::{IconShape, Skill};
use crate::events::{BrowserEvents, Subscription, Viewport};

const FOV_DEGREES: f32 = 50.0;
const CAMERA_DISTANCE: f32 = 12.0;
const ORBIT_RADIUS: f32 = 5.0;
const DEPTH_WAVE: f32 = 0.5;

const SPIN_RATE: f32 = 0.01;
const CHILD_TUMBLE_RATE: f32 = 0.005;
const GROUP_SPIN_RATE: f32 = 0.003;
const FLOAT_AMPLITUDE: f32 = 0.01;
const PULSE_AMPLITUDE: f32 = 0.005;

const BASE_GLOW: f32 = 0.3;
const HOVER_GLOW: f32 = 0.8;
const HOVER_SCALE: f32 = 1.5;
const HOVER_SMOOTHING: f32 = 0.15;
const PARALLAX_STRENGTH: f32 = 0.3;
const PARALLAX_SMOOTHING: f32 = 0.05;
const CURVE_SAMPLES: u32 = 8;

const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

/// One primitive mesh of an icon, placed relative to the icon origin.
#[derive(Clone, Debug, PartialEq)]
pub struct IconPart {
    geometry: GeometryId,
    offset: Vec3,
    rotation: Vec3,
    glow: f32,
    metalness: f32,
    roughness: f32,
}

impl IconPart {
    fn new(geometry: GeometryId) -> Self {
        Self {
            geometry,
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            glow: BASE_GLOW,
            metalness: 0.6,
            roughness: 0.2,
        }
    }

    fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.offset,
        )
    }

    #[cfg(test)]
    pub fn glow(&self) -> f32 {
        self.glow
    }

    #[cfg(test)]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillIcon {
    index: usize,
    label: &'static str,
    color: Vec3,
    composite: bool,
    parts: Vec<IconPart>,
    base: Vec3,
    position: Vec3,
    rotation: Vec3,
    scale: f32,
}

impl SkillIcon {
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[cfg(test)]
    pub fn is_composite(&self) -> bool {
        self.composite
    }

    #[cfg(test)]
    pub fn parts(&self) -> &[IconPart] {
        &self.parts
    }

    #[cfg(test)]
    pub fn base(&self) -> Vec3 {
        self.base
    }

    #[cfg(test)]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[cfg(test)]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[cfg(test)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Placement inside the rotating ring.
    fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }

    fn idle_step(&mut self, now_ms: f64) {
        if self.composite {
            self.rotation.y += SPIN_RATE;
            for part in self.parts.iter_mut().skip(1) {
                part.rotation.x += CHILD_TUMBLE_RATE;
                part.rotation.z += CHILD_TUMBLE_RATE;
            }
        } else {
            self.rotation.x += SPIN_RATE;
            self.rotation.y += SPIN_RATE;
        }

        let phase = self.index as f64;
        self.position.z = self.base.z + (now_ms * 0.001 + phase).sin() as f32 * FLOAT_AMPLITUDE;

        let pulse = (now_ms * 0.002 + phase).sin() as f32 * PULSE_AMPLITUDE;
        for part in &mut self.parts {
            part.glow = (part.glow + pulse).max(BASE_GLOW);
        }
    }

    fn respond_to_pointer(&mut self, hovered: bool, pointer: Vec2) {
        let (scale, glow) = if hovered {
            (HOVER_SCALE, HOVER_GLOW)
        } else {
            (1.0, BASE_GLOW)
        };

        self.scale = approach(self.scale, scale, HOVER_SMOOTHING);
        for part in &mut self.parts {
            part.glow = approach(part.glow, glow, HOVER_SMOOTHING);
        }

        let target = self.base.truncate() + pointer * PARALLAX_STRENGTH;
        self.position.x = approach(self.position.x, target.x, PARALLAX_SMOOTHING);
        self.position.y = approach(self.position.y, target.y, PARALLAX_SMOOTHING);
    }
}

impl Pickable for SkillIcon {
    fn id(&self) -> usize {
        self.index
    }

    /// Expects a ray in ring space; any part hit counts for the whole icon.
    fn intersect(&self, ray: &Ray, geometries: &[Geometry]) -> Option<f32> {
        let icon = self.local_matrix();
        self.parts
            .iter()
            .filter_map(|part| {
                let geometry = geometries.get(part.geometry)?;
                pick::intersect_mesh(geometry, &(icon * part.local_matrix()), ray)
            })
            .min_by(f32::total_cmp)
    }
}

/// Builds meshes for a skill icon, pushing new geometries onto `geometries`.
fn build_parts(shape: IconShape, geometries: &mut Vec<Geometry>) -> Vec<IconPart> {
    let mut add = |geometry: Geometry| {
        geometries.push(geometry);
        geometries.len() - 1
    };

    match shape {
        IconShape::Shield { half_width } => {
            let half_width = f32::from(half_width) / 100.0;
            let inner = half_width - 0.1;
            let outline = [
                Vec2::new(0.0, 0.8),
                Vec2::new(half_width, 0.8),
                Vec2::new(inner, -0.8),
                Vec2::new(0.0, -1.0),
                Vec2::new(-inner, -0.8),
                Vec2::new(-half_width, 0.8),
            ];
            vec![IconPart::new(add(Geometry::extrude(&outline, 0.3)))]
        }
        IconShape::Cube => vec![IconPart::new(add(Geometry::cuboid(1.2, 1.2, 1.2)))],
        IconShape::HexPrism => {
            let outline: Vec<Vec2> = (0..6)
                .map(|i| {
                    let angle = i as f32 / 6.0 * TAU;
                    Vec2::new(angle.cos(), angle.sin()) * 0.7
                })
                .collect();
            vec![IconPart::new(add(Geometry::extrude(&outline, 0.4)))]
        }
        IconShape::Leaf => {
            let start = Vec2::new(0.0, 1.0);
            let mut outline = vec![start];
            outline.extend(cubic_bezier(
                start,
                Vec2::new(0.4, 0.6),
                Vec2::new(0.5, 0.2),
                Vec2::new(0.3, -0.5),
                CURVE_SAMPLES,
            ));
            outline.extend(cubic_bezier(
                Vec2::new(0.3, -0.5),
                Vec2::new(0.2, -0.8),
                Vec2::new(0.0, -1.0),
                Vec2::new(0.0, -1.0),
                CURVE_SAMPLES,
            ));
            outline.extend(cubic_bezier(
                Vec2::new(0.0, -1.0),
                Vec2::new(0.0, -1.0),
                Vec2::new(-0.2, -0.8),
                Vec2::new(-0.3, -0.5),
                CURVE_SAMPLES,
            ));
            outline.extend(cubic_bezier(
                Vec2::new(-0.3, -0.5),
                Vec2::new(-0.5, 0.2),
                Vec2::new(-0.4, 0.6),
                start,
                CURVE_SAMPLES,
            ));
            vec![IconPart::new(add(Geometry::extrude(&outline, 0.2)))]
        }
        IconShape::Atom => {
            let core = IconPart {
                glow: 0.5,
                metalness: 0.8,
                ..IconPart::new(add(Geometry::sphere(0.2, 16, 16)))
            };
            let ring = add(Geometry::torus(0.8, 0.05, 16, 100));
            let rings = (0..3).map(|i| IconPart {
                rotation: Vec3::new(i as f32 * PI / 3.0, i as f32 * PI / 6.0, 0.0),
                roughness: 0.3,
                ..IconPart::new(ring)
            });
            std::iter::once(core).chain(rings).collect()
        }
        IconShape::Elephant => {
            let body = IconPart {
                roughness: 0.3,
                ..IconPart::new(add(Geometry::cylinder(0.5, 0.5, 0.8, 32)))
            };
            let head = IconPart {
                offset: Vec3::new(0.0, 0.6, 0.0),
                roughness: 0.3,
                ..IconPart::new(add(Geometry::sphere(0.35, 32, 32)))
            };
            vec![body, head]
        }
        IconShape::Octahedron => vec![IconPart::new(add(Geometry::octahedron(0.8)))],
    }
}

pub struct SkillOrbit {
    geometries: Vec<Geometry>,
    icons: Vec<SkillIcon>,
    camera: PerspectiveCamera,
    viewport: Viewport,
    group_rotation: f32,
    hovered: Option<usize>,
    paused: bool,
}

impl SkillOrbit {
    pub fn new(skills: &[Skill], viewport: Viewport, paused: bool) -> Self {
        let mut geometries = Vec::new();
        let icons = skills
            .iter()
            .enumerate()
            .map(|(index, skill)| {
                let angle = index as f32 / skills.len() as f32 * TAU;
                let base = Vec3::new(
                    angle.cos() * ORBIT_RADIUS,
                    angle.sin() * ORBIT_RADIUS,
                    (angle * 2.0).sin() * DEPTH_WAVE,
                );
                let parts = build_parts(skill.icon, &mut geometries);

                SkillIcon {
                    index,
                    label: skill.name,
                    color: rgb(skill.color),
                    composite: parts.len() > 1,
                    parts,
                    base,
                    position: base,
                    rotation: Vec3::ZERO,
                    scale: 1.0,
                }
            })
            .collect();

        Self {
            geometries,
            icons,
            camera: PerspectiveCamera::new(
                FOV_DEGREES,
                viewport.aspect(),
                Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            ),
            viewport,
            group_rotation: 0.0,
            hovered: None,
            paused,
        }
    }

    #[cfg(test)]
    pub fn icons(&self) -> &[SkillIcon] {
        &self.icons
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[cfg(test)]
    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("skill orbit {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    #[cfg(test)]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hovered_label(&self) -> Option<&'static str> {
        self.hovered
            .and_then(|index| self.icons.get(index))
            .map(SkillIcon::label)
    }

    fn group_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.group_rotation)
    }

    /// Hit-tests the icons under `ndc` and eases every icon toward its hover
    /// and parallax targets. Returns whether the hovered icon changed.
    pub fn pointer_moved(&mut self, ndc: Vec2) -> bool {
        let ray = self
            .camera
            .ray_from_ndc(ndc)
            .transformed(&self.group_matrix().inverse());
        let hovered = pick::nearest(&self.icons, &ray, &self.geometries).map(|hit| hit.id);

        for icon in &mut self.icons {
            icon.respond_to_pointer(hovered == Some(icon.index), ndc);
        }

        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }
}

impl SceneModel for SkillOrbit {
    fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn advance(&mut self, now_ms: f64) {
        if self.paused {
            return;
        }

        for icon in &mut self.icons {
            icon.idle_step(now_ms);
        }
        self.group_rotation += GROUP_SPIN_RATE;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    fn frame(&self) -> Frame {
        let group = self.group_matrix();
        let items = self
            .icons
            .iter()
            .flat_map(|icon| {
                let placed = group * icon.local_matrix();
                icon.parts.iter().map(move |part| DrawItem {
                    geometry: part.geometry,
                    model: placed * part.local_matrix(),
                    material: Material {
                        color: icon.color,
                        emissive: icon.color,
                        emissive_intensity: part.glow,
                        metalness: part.metalness,
                        roughness: part.roughness,
                    },
                })
            })
            .collect();

        Frame {
            view_projection: self.camera.view_projection(),
            eye: self.camera.position,
            ambient: Vec3::splat(0.5),
            lights: vec![PointLight {
                position: group.transform_point3(LIGHT_POSITION),
                color: Vec3::ONE,
                intensity: 1.0,
                range: 0.0,
            }],
            items,
        }
    }
}

/// Builds the skills scene on `surface`. Pointer moves are only handled
/// inside `canvas_rect`; `on_hover` hears about hovered-label changes, and
/// gets a final `None` on teardown if a label was still showing.
pub fn mount<S: Surface + 'static>(
    surface: S,
    skills: &[Skill],
    viewport: Viewport,
    paused: bool,
    events: &BrowserEvents,
    canvas_rect: impl Fn() -> Option<ScreenRect> + 'static,
    on_hover: impl Fn(Option<&'static str>) + 'static,
) -> Result<SceneRuntime<SkillOrbit, S>, SceneError> {
    let mut runtime = SceneRuntime::launch("skills", SkillOrbit::new(skills, viewport, paused), surface)?;
    let Some(stage) = runtime.stage() else {
        return Ok(runtime);
    };
    let canvas_rect = Rc::new(canvas_rect);
    let on_hover = Rc::new(on_hover);
    let showing = Rc::new(Cell::new(false));

    let weak = Rc::downgrade(&stage);
    let rect = canvas_rect.clone();
    let notify = on_hover.clone();
    let shown = showing.clone();
    runtime.hold(events.pointer_move.subscribe(move |event| {
        let Some(ndc) = (*rect)().and_then(|rect| rect.ndc(event.client_x, event.client_y)) else {
            return;
        };

        let mut changed = None;
        with_stage(&weak, |stage| {
            if stage.model.pointer_moved(ndc) {
                changed = Some(stage.model.hovered_label());
            }
        });
        if let Some(label) = changed {
            shown.set(label.is_some());
            (*notify)(label);
        }
    }));

    runtime.hold(Subscription::new(move || {
        if showing.replace(false) {
            (*on_hover)(None);
        }
    }));

    let weak = Rc::downgrade(&stage);
    runtime.hold(events.resize.subscribe(move |_| {
        let Some(rect) = (*canvas_rect)() else {
            return;
        };
        with_stage(&weak, |stage| stage.resize(rect.viewport()));
    }));

    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::content::{skill_by_name, SKILLS};
    use crate::events::PointerMove;
    use crate::scene::testing::RecordingSurface;
    use proptest::prelude::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000,
        height: 500,
    };

    const CANVAS: ScreenRect = ScreenRect {
        left: 100.0,
        top: 200.0,
        width: 1000.0,
        height: 500.0,
    };

    fn orbit() -> SkillOrbit {
        SkillOrbit::new(&SKILLS, VIEWPORT, false)
    }

    fn index_of(orbit: &SkillOrbit, label: &str) -> usize {
        orbit
            .icons()
            .iter()
            .position(|icon| icon.label() == label)
            .expect("skill is in the catalog")
    }

    fn ndc_of(orbit: &SkillOrbit, world: Vec3) -> Vec2 {
        orbit.camera().view_projection().project_point3(world).truncate()
    }

    fn client_of(ndc: Vec2) -> (f64, f64) {
        (
            CANVAS.left + f64::from((ndc.x + 1.0) / 2.0) * CANVAS.width,
            CANVAS.top + f64::from((1.0 - ndc.y) / 2.0) * CANVAS.height,
        )
    }

    #[test]
    fn icons_are_evenly_spaced_on_the_ring() {
        let orbit = orbit();
        assert_eq!(orbit.icons().len(), SKILLS.len());

        for (index, icon) in orbit.icons().iter().enumerate() {
            let angle = index as f32 / SKILLS.len() as f32 * TAU;
            assert!((icon.base().truncate().length() - ORBIT_RADIUS).abs() < 1e-4);
            assert!((icon.base().y.atan2(icon.base().x).rem_euclid(TAU) - angle).abs() < 1e-4);
            assert!((icon.base().z - (angle * 2.0).sin() * DEPTH_WAVE).abs() < 1e-6);
        }
    }

    #[test]
    fn composite_icons_are_the_grouped_ones() {
        let orbit = orbit();
        let composites: Vec<_> = orbit
            .icons()
            .iter()
            .filter(|icon| icon.is_composite())
            .map(SkillIcon::label)
            .collect();
        assert_eq!(composites, ["React", "PostgreSQL"]);

        let react = &orbit.icons()[index_of(&orbit, "React")];
        assert_eq!(react.parts().len(), 4);
        assert_eq!(react.parts()[0].glow(), 0.5);
    }

    #[test]
    fn hit_on_a_ring_resolves_to_its_atom() {
        let mut orbit = orbit();
        let react = index_of(&orbit, "React");
        let center = orbit.icons()[react].base();
        let on_ring = center + Vec3::new(0.8, 0.0, 0.0);

        let ray = orbit.camera().ray_from_ndc(ndc_of(&orbit, on_ring));
        let icon = &orbit.icons()[react];
        let core = &icon.parts()[0];
        let core_hit = pick::intersect_mesh(
            &orbit.geometries[core.geometry],
            &(icon.local_matrix() * core.local_matrix()),
            &ray,
        );
        assert!(core_hit.is_none());

        orbit.pointer_moved(ndc_of(&orbit, on_ring));
        assert_eq!(orbit.hovered_label(), Some("React"));
    }

    #[test]
    fn only_the_hovered_icon_grows() {
        let mut orbit = orbit();
        let node = index_of(&orbit, "Node.js");
        let ndc = ndc_of(&orbit, orbit.icons()[node].base());

        for _ in 0..30 {
            orbit.pointer_moved(ndc);
        }

        assert_eq!(orbit.hovered(), Some(node));
        for icon in orbit.icons() {
            if icon.index == node {
                assert!(icon.scale() > 1.4);
                assert!(icon.parts().iter().all(|part| part.glow() > 0.7));
            } else {
                assert!((icon.scale() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn parallax_pulls_every_icon_toward_the_pointer() {
        let mut orbit = orbit();
        let corner = Vec2::new(0.99, 0.99);

        for _ in 0..400 {
            orbit.pointer_moved(corner);
        }

        for icon in orbit.icons() {
            let expected = icon.base().truncate() + corner * PARALLAX_STRENGTH;
            assert!(icon.position().truncate().distance(expected) < 1e-3);
        }
    }

    #[test]
    fn idle_animation_spins_floats_and_turns_the_ring() {
        let mut orbit = orbit();
        orbit.advance(1_000.0);

        let react = &orbit.icons()[index_of(&orbit, "React")];
        assert_eq!(react.rotation(), Vec3::new(0.0, SPIN_RATE, 0.0));
        assert_eq!(react.parts()[0].rotation(), Vec3::ZERO);
        assert!((react.parts()[1].rotation().x - CHILD_TUMBLE_RATE).abs() < 1e-6);

        let cube = &orbit.icons()[index_of(&orbit, "JavaScript")];
        assert_eq!(cube.rotation(), Vec3::new(SPIN_RATE, SPIN_RATE, 0.0));
        assert!((cube.position().z - cube.base().z).abs() <= FLOAT_AMPLITUDE + 1e-6);
        assert!((orbit.group_rotation - GROUP_SPIN_RATE).abs() < 1e-6);
    }

    #[test]
    fn pause_freezes_idle_motion_but_not_hover() {
        let mut orbit = orbit();
        orbit.advance(0.0);
        orbit.set_paused(true);
        let frozen = orbit.icons().to_vec();
        let frozen_group = orbit.group_rotation;

        for step in 1..50 {
            orbit.advance(f64::from(step) * 16.0);
        }
        assert_eq!(orbit.icons(), frozen.as_slice());
        assert_eq!(orbit.group_rotation, frozen_group);

        let cube = index_of(&orbit, "JavaScript");
        let target = orbit.group_matrix().transform_point3(orbit.icons()[cube].base());
        orbit.pointer_moved(ndc_of(&orbit, target));
        assert_eq!(orbit.hovered(), Some(cube));
        assert!(orbit.icons()[cube].scale() > frozen[cube].scale());
        assert!(orbit.icons()[cube].parts()[0].glow() > frozen[cube].parts()[0].glow());
    }

    #[test]
    fn skills_share_catalog_metadata() {
        let orbit = orbit();
        for icon in orbit.icons() {
            let skill = skill_by_name(icon.label()).expect("icon label comes from the catalog");
            assert_eq!(icon.color, rgb(skill.color));
        }
    }

    #[test]
    fn frame_draws_every_part_with_the_rotating_light() {
        let mut orbit = orbit();
        let parts: usize = orbit.icons().iter().map(|icon| icon.parts().len()).sum();
        assert_eq!(orbit.frame().items.len(), parts);

        orbit.advance(0.0);
        let light = orbit.frame().lights[0];
        assert!(light.position.distance(LIGHT_POSITION) > 1e-3);
        assert!((light.position.length() - LIGHT_POSITION.length()).abs() < 1e-4);
    }

    #[test]
    fn hover_callback_fires_only_on_change() {
        let events = BrowserEvents::new();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();

        let runtime = mount(
            RecordingSurface::default(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || Some(CANVAS),
            move |label| sink.borrow_mut().push(label),
        )
        .expect("mounts on recording surface");
        let stage = runtime.stage().expect("running scene has a stage");
        let ndc = ndc_of(&stage.borrow().model, stage.borrow().model.icons()[0].base());
        let (x, y) = client_of(ndc);

        for _ in 0..3 {
            events.pointer_move.publish(&PointerMove {
                client_x: x,
                client_y: y,
                target_interactive: false,
            });
        }
        events.pointer_move.publish(&PointerMove {
            client_x: CANVAS.left + 1.0,
            client_y: CANVAS.top + 1.0,
            target_interactive: false,
        });
        events.pointer_move.publish(&PointerMove {
            client_x: 5.0,
            client_y: 5.0,
            target_interactive: false,
        });

        assert_eq!(*heard.borrow(), [Some("HTML5"), None]);
    }

    #[test]
    fn teardown_clears_a_showing_label() {
        let events = BrowserEvents::new();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();

        let mut runtime = mount(
            RecordingSurface::default(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || Some(CANVAS),
            move |label| sink.borrow_mut().push(label),
        )
        .expect("mounts on recording surface");
        let stage = runtime.stage().expect("running scene has a stage");
        let ndc = ndc_of(&stage.borrow().model, stage.borrow().model.icons()[0].base());
        drop(stage);
        let (x, y) = client_of(ndc);

        events.pointer_move.publish(&PointerMove {
            client_x: x,
            client_y: y,
            target_interactive: false,
        });
        runtime.dispose();
        runtime.dispose();

        assert_eq!(*heard.borrow(), [Some("HTML5"), None]);
    }

    #[test]
    fn teardown_without_hover_stays_quiet() {
        let events = BrowserEvents::new();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();

        let mut runtime = mount(
            RecordingSurface::default(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || Some(CANVAS),
            move |label| sink.borrow_mut().push(label),
        )
        .expect("mounts on recording surface");
        runtime.dispose();

        assert!(heard.borrow().is_empty());
    }

    #[test]
    fn moves_outside_the_canvas_are_ignored() {
        let events = BrowserEvents::new();
        let runtime = mount(
            RecordingSurface::default(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || Some(CANVAS),
            |_| {},
        )
        .expect("mounts on recording surface");

        events.pointer_move.publish(&PointerMove {
            client_x: 50.0,
            client_y: 50.0,
            target_interactive: false,
        });

        let stage = runtime.stage().expect("running scene has a stage");
        let stage = stage.borrow();
        assert!(stage.model.icons().iter().all(|icon| icon.position() == icon.base()));
    }

    #[test]
    fn resize_follows_the_canvas() {
        let events = BrowserEvents::new();
        let runtime = mount(
            RecordingSurface::default(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || {
                Some(ScreenRect {
                    width: 600.0,
                    height: 300.0,
                    ..CANVAS
                })
            },
            |_| {},
        )
        .expect("mounts on recording surface");

        events.resize.publish(&Viewport {
            width: 1920,
            height: 1080,
        });

        let stage = runtime.stage().expect("running scene has a stage");
        let stage = stage.borrow();
        assert_eq!(stage.model.camera().aspect, 2.0);
        assert_eq!(
            stage.surface.size(),
            Viewport {
                width: 600,
                height: 300
            }
        );
    }

    #[test]
    fn teardown_restores_listener_baseline() {
        let events = BrowserEvents::new();
        let baseline = events.listener_counts();

        for paused in [false, true, false] {
            let mut runtime = mount(
                RecordingSurface::default(),
                &SKILLS,
                VIEWPORT,
                paused,
                &events,
                || Some(CANVAS),
                |_| {},
            )
            .expect("mounts on recording surface");
            assert_ne!(events.listener_counts(), baseline);
            runtime.dispose();
            runtime.dispose();
            assert_eq!(events.listener_counts(), baseline);
        }
    }

    #[test]
    fn failed_surface_registers_nothing() {
        let events = BrowserEvents::new();
        let baseline = events.listener_counts();
        let result = mount(
            RecordingSurface::failing(),
            &SKILLS,
            VIEWPORT,
            false,
            &events,
            || Some(CANVAS),
            |_| {},
        );
        assert!(result.is_err());
        assert_eq!(events.listener_counts(), baseline);
    }

    proptest! {
        #[test]
        fn pulse_never_drops_below_base_glow(times in proptest::collection::vec(0.0f64..1e7, 1..64)) {
            let mut orbit = orbit();
            for now in times {
                orbit.advance(now);
            }
            for icon in orbit.icons() {
                for part in icon.parts() {
                    prop_assert!(part.glow() >= BASE_GLOW);
                }
            }
        }
    }
}

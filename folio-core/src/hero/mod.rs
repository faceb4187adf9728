//! The homepage hero cube.
//!
//! [`HeroScene`] composes the pieces that run once per rendered frame:
//!
//! 1. [`drag::DragRotator`] integrates inertia left over from the last drag;
//! 2. [`press::PressFeedback`] eases pressed marks in and out;
//! 3. [`faces::FaceTracker`] scores every face against the camera and picks
//!    the active one;
//! 4. [`camera::PerspectiveCamera`] projects the active face's label anchor.
//!
//! Pointer events arrive between frames and only touch the rotator and the
//! press state.

pub mod camera;
pub mod drag;
pub mod faces;
pub mod press;

pub use camera::{PerspectiveCamera, Projection};
pub use drag::DragRotator;
pub use faces::{Face, FaceSelection, FaceTracker};
pub use press::{MarkOffset, PressFeedback};

use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use serde::Serialize;
use tracing::debug;

use crate::config::{CameraConfig, FolioConfig, HeroConfig};
use crate::error::Result;
use crate::types::{PointerId, ScreenPoint, SkillKind};

/// Rotation composed in X, then Y, then Z order (`qx · qy · qz`).
pub(crate) fn euler_xyz(x: f32, y: f32, z: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z)
}

/// Where the active face's label goes this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    /// Face the label belongs to.
    pub face: Face,
    /// Skill named by the label.
    pub skill: SkillKind,
    /// Anchor in world space.
    pub world: Point3<f32>,
    /// Anchor in normalized device coordinates.
    pub ndc: Point3<f32>,
    /// Anchor in viewport-relative coordinates.
    pub screen: ScreenPoint,
    /// Whether the label should be drawn.
    pub on_screen: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroFrame {
    /// Cube orientation.
    pub orientation: UnitQuaternion<f32>,
    /// Pitch and yaw in radians.
    pub rotation: Vector2<f32>,
    /// Pitch and yaw rates in radians per second.
    pub angular_velocity: Vector2<f32>,
    /// Facing score per face.
    pub facing: [f32; 6],
    /// Face whose label is shown.
    pub active: Option<Face>,
    /// Mark visibility per face.
    pub visible: [bool; 6],
    /// Label placement for the active face.
    pub label: Option<LabelPlacement>,
    /// Press-in transform per face mark.
    pub mark_offsets: [MarkOffset; 6],
    /// Last skill the visitor pressed.
    pub selected: Option<SkillKind>,
    /// Face under the pointer.
    pub hovered: Option<Face>,
}

/// The hero cube: drag rotation, face tracking, press feedback, camera.
#[derive(Debug, Clone)]
pub struct HeroScene {
    rotator: DragRotator,
    tracker: FaceTracker,
    press: PressFeedback,
    camera: PerspectiveCamera,
    cube_position: Point3<f32>,
    selected: Option<SkillKind>,
    hovered: Option<Face>,
}

impl HeroScene {
    /// Build the scene from the `hero` and `camera` sections.
    ///
    /// # Errors
    /// Returns `FolioError::Config` if either section is out of range.
    pub fn new(config: &FolioConfig) -> Result<Self> {
        Self::with_parts(&config.hero, &config.camera)
    }

    /// Build the scene from individual sections.
    ///
    /// # Errors
    /// Returns `FolioError::Config` if either section is out of range.
    pub fn with_parts(hero: &HeroConfig, camera: &CameraConfig) -> Result<Self> {
        hero.validate()?;
        Ok(Self {
            rotator: DragRotator::new(hero),
            tracker: FaceTracker::new(hero),
            press: PressFeedback::new(hero.press_damping),
            camera: PerspectiveCamera::new(camera)?,
            cube_position: Point3::origin(),
            selected: None,
            hovered: None,
        })
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// See [`DragRotator::pointer_down`].
    pub fn pointer_down(&mut self, pointer: PointerId, at: ScreenPoint, now: f64) -> bool {
        self.rotator.pointer_down(pointer, at, now)
    }

    /// See [`DragRotator::pointer_move`].
    pub fn pointer_move(&mut self, pointer: PointerId, at: ScreenPoint, now: f64) -> bool {
        self.rotator.pointer_move(pointer, at, now)
    }

    /// End the drag for `pointer` and let go of any pressed mark.
    pub fn pointer_up(&mut self, pointer: PointerId) {
        self.rotator.pointer_up(pointer);
        self.press.release_all();
    }

    /// Cancel, blur, or leave: end any drag and release all marks.
    pub fn release(&mut self) {
        self.rotator.release();
        self.press.release_all();
    }

    /// Press the mark on `face`, selecting its skill.
    ///
    /// A press that ends a drag with real movement is not a click and is
    /// ignored; `None` is returned in that case.
    pub fn press_face(&mut self, face: Face) -> Option<SkillKind> {
        if self.rotator.has_moved() {
            return None;
        }
        let skill = face.skill();
        self.press.press(face);
        if self.selected != Some(skill) {
            debug!(?face, skill = %skill, "Hero skill selected");
        }
        self.selected = Some(skill);
        Some(skill)
    }

    /// Record the face under the pointer.
    pub fn hover(&mut self, face: Option<Face>) {
        self.hovered = face;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Last pressed skill.
    #[must_use]
    pub fn selected_skill(&self) -> Option<SkillKind> {
        self.selected
    }

    /// Drag and inertia state.
    #[must_use]
    pub fn rotator(&self) -> &DragRotator {
        &self.rotator
    }

    /// Mutable drag state, for restoring a saved pose.
    pub fn rotator_mut(&mut self) -> &mut DragRotator {
        &mut self.rotator
    }

    /// Camera used for label projection.
    #[must_use]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    // -----------------------------------------------------------------------
    // Frame step
    // -----------------------------------------------------------------------

    /// Advance one animation frame of `dt` seconds.
    pub fn frame(&mut self, dt: f32) -> HeroFrame {
        self.rotator.tick(dt);
        self.press.tick(dt);

        let orientation = self.rotator.orientation();
        let selection = self
            .tracker
            .update(&orientation, &self.cube_position, &self.camera.position());

        let label = selection.active.map(|face| {
            let world = faces::label_anchor_world(
                face,
                &orientation,
                &self.cube_position,
                self.tracker.face_offset(),
                self.press.offset(face),
            );
            let projection = self.camera.project(&world);
            LabelPlacement {
                face,
                skill: face.skill(),
                world,
                ndc: projection.ndc,
                screen: projection.screen,
                on_screen: projection.on_screen,
            }
        });

        HeroFrame {
            orientation,
            rotation: self.rotator.rotation(),
            angular_velocity: self.rotator.angular_velocity(),
            facing: selection.facing,
            active: selection.active,
            visible: selection.visible,
            label,
            mark_offsets: self.press.offsets(),
            selected: self.selected,
            hovered: self.hovered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;

    fn scene() -> HeroScene {
        HeroScene::new(&FolioConfig::default()).expect("default scene")
    }

    #[test]
    fn euler_order_is_x_then_y() {
        let q = euler_xyz(0.3, 0.7, 0.0);
        let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7);
        assert!(q.angle_to(&expected) < 1e-6);
    }

    #[test]
    fn scene_rejects_pitch_margin_past_vertical() {
        for pitch_margin in [2.0, -2.0, f32::NAN] {
            let hero = HeroConfig { pitch_margin, ..HeroConfig::default() };
            let err = HeroScene::with_parts(&hero, &CameraConfig::default()).expect_err("should fail");
            assert!(matches!(err, FolioError::Config(_)), "margin {pitch_margin}");
        }
    }

    #[test]
    fn steep_drag_stops_short_of_vertical() {
        let mut s = scene();
        let p = PointerId(1);
        s.pointer_down(p, ScreenPoint::new(0.0, 0.0), 0.0);
        s.pointer_move(p, ScreenPoint::new(0.0, 400.0), 0.1);
        let limit = s.rotator().pitch_limit();
        assert!(limit > 0.0 && limit < std::f32::consts::FRAC_PI_2);
        assert!(s.rotator().rotation().x.abs() <= limit + 1e-6);
    }

    #[test]
    fn resting_scene_shows_front_label() {
        let mut s = scene();
        let frame = s.frame(1.0 / 60.0);
        assert_eq!(frame.active, Some(Face::Front));
        let label = frame.label.expect("front label");
        assert_eq!(label.skill, SkillKind::Database);
        assert!(label.on_screen);
        assert!(label.screen.y > 0.5, "label sits below the cube centre");
    }

    #[test]
    fn drag_then_inertia_changes_active_face() {
        let mut s = scene();
        let p = PointerId(1);
        assert!(s.pointer_down(p, ScreenPoint::new(0.0, 0.0), 0.0));
        // 200 px right is 1.6 rad of yaw; inertia carries it about 0.25 rad
        // further, leaving the left face toward the camera.
        s.pointer_move(p, ScreenPoint::new(100.0, 0.0), 0.5);
        s.pointer_move(p, ScreenPoint::new(200.0, 0.0), 1.0);
        s.pointer_up(p);

        let first = s.frame(1.0 / 60.0);
        assert!(first.angular_velocity.y > 0.0);
        for _ in 0..600 {
            s.frame(1.0 / 60.0);
        }
        let settled = s.frame(1.0 / 60.0);
        assert!(settled.angular_velocity.norm() < 1e-3);
        assert_eq!(settled.active, Some(Face::Left));
        assert_eq!(settled.label.map(|l| l.skill), Some(SkillKind::Kubernetes));
    }

    #[test]
    fn press_selects_skill_and_animates_mark() {
        let mut s = scene();
        assert_eq!(s.press_face(Face::Top), Some(SkillKind::Graphql));
        for _ in 0..30 {
            s.frame(1.0 / 60.0);
        }
        let frame = s.frame(1.0 / 60.0);
        assert_eq!(frame.selected, Some(SkillKind::Graphql));
        assert!(frame.mark_offsets[Face::Top.index()].depth > 0.03);
        assert!((frame.mark_offsets[Face::Front.index()].scale - 1.0).abs() < f32::EPSILON);

        s.release();
        for _ in 0..60 {
            s.frame(1.0 / 60.0);
        }
        assert!(s.frame(1.0 / 60.0).mark_offsets[Face::Top.index()].depth < 1e-3);
        assert_eq!(s.selected_skill(), Some(SkillKind::Graphql));
    }

    #[test]
    fn press_after_moving_drag_is_not_a_click() {
        let mut s = scene();
        let p = PointerId(7);
        s.pointer_down(p, ScreenPoint::new(10.0, 10.0), 0.0);
        s.pointer_move(p, ScreenPoint::new(40.0, 10.0), 0.016);
        assert_eq!(s.press_face(Face::Front), None);
        assert_eq!(s.selected_skill(), None);
    }

    #[test]
    fn zero_dt_frame_is_stable() {
        let mut s = scene();
        let a = s.frame(0.0);
        let b = s.frame(0.0);
        assert_eq!(a, b);
    }
}

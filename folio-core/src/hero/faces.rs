//! Face facing, active-face selection, and label anchoring.
//!
//! Each frame, every face's outward normal is rotated into world space and
//! dotted against the direction from the face to the camera. The score is
//! 1.0 for a face looking straight at the camera, 0.0 edge-on, negative when
//! turned away.

use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, UnitQuaternion, Vector3};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HeroConfig;
use crate::types::SkillKind;

use super::euler_xyz;
use super::press::MarkOffset;

/// Label anchor in face-local space: centred, just below the mark, slightly
/// proud of the surface.
pub const LABEL_ANCHOR: Vector3<f32> = Vector3::new(0.0, -0.53, 0.07);

/// One of the six cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// +Z
    Front,
    /// −Z
    Back,
    /// +X
    Right,
    /// −X
    Left,
    /// +Y
    Top,
    /// −Y
    Bottom,
}

impl Face {
    /// All faces in index order.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// Position in [`Face::ALL`] and in per-face arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Front => 0,
            Self::Back => 1,
            Self::Right => 2,
            Self::Left => 3,
            Self::Top => 4,
            Self::Bottom => 5,
        }
    }

    /// Skill whose mark is drawn on this face.
    #[must_use]
    pub fn skill(self) -> SkillKind {
        SkillKind::ALL[self.index()]
    }

    /// Outward unit normal in cube-local space.
    #[must_use]
    pub fn local_normal(self) -> Vector3<f32> {
        match self {
            Self::Front => Vector3::z(),
            Self::Back => -Vector3::z(),
            Self::Right => Vector3::x(),
            Self::Left => -Vector3::x(),
            Self::Top => Vector3::y(),
            Self::Bottom => -Vector3::y(),
        }
    }

    /// Rotation taking face-local space (mark drawn in the XY plane, facing
    /// +Z) into cube-local space.
    #[must_use]
    pub fn local_rotation(self) -> UnitQuaternion<f32> {
        match self {
            Self::Front => UnitQuaternion::identity(),
            Self::Back => euler_xyz(0.0, PI, 0.0),
            Self::Right => euler_xyz(0.0, FRAC_PI_2, 0.0),
            Self::Left => euler_xyz(0.0, -FRAC_PI_2, 0.0),
            Self::Top => euler_xyz(-FRAC_PI_2, 0.0, 0.0),
            Self::Bottom => euler_xyz(FRAC_PI_2, 0.0, 0.0),
        }
    }
}

/// Facing score of every face, indexed by [`Face::index`].
///
/// Zero-length to-camera vectors (camera inside a face) and non-finite
/// results score 0.0.
#[must_use]
pub fn facing_scores(
    orientation: &UnitQuaternion<f32>,
    cube_position: &Point3<f32>,
    camera_position: &Point3<f32>,
    face_offset: f32,
) -> [f32; 6] {
    let mut scores = [0.0; 6];
    for face in Face::ALL {
        let normal = orientation * face.local_normal();
        let face_position = cube_position + normal * face_offset;
        let to_camera = camera_position - face_position;

        let score = to_camera
            .try_normalize(f32::EPSILON)
            .map_or(0.0, |dir| normal.dot(&dir));
        scores[face.index()] = if score.is_finite() { score } else { 0.0 };
    }
    scores
}

/// World-space position of `face`'s label anchor, following the mark's
/// press-in offset.
#[must_use]
pub fn label_anchor_world(
    face: Face,
    orientation: &UnitQuaternion<f32>,
    cube_position: &Point3<f32>,
    face_offset: f32,
    mark: MarkOffset,
) -> Point3<f32> {
    let in_face = Vector3::new(0.0, 0.0, mark.depth) + LABEL_ANCHOR * mark.scale;
    let in_cube = face.local_normal() * face_offset + face.local_rotation() * in_face;
    cube_position + orientation * in_cube
}

/// Result of one face-tracking pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceSelection {
    /// Facing score per face.
    pub facing: [f32; 6],
    /// Face whose label is shown, if any.
    pub active: Option<Face>,
    /// Whether each face's mark is drawn.
    pub visible: [bool; 6],
}

/// Picks the active face each frame with hysteresis against near ties.
#[derive(Debug, Clone)]
pub struct FaceTracker {
    activation_threshold: f32,
    switch_hysteresis: f32,
    visibility_threshold: f32,
    face_offset: f32,
    active: Option<Face>,
}

impl FaceTracker {
    /// Create a tracker with no active face.
    #[must_use]
    pub fn new(config: &HeroConfig) -> Self {
        Self {
            activation_threshold: config.activation_threshold,
            switch_hysteresis: config.switch_hysteresis,
            visibility_threshold: config.visibility_threshold,
            face_offset: config.face_offset,
            active: None,
        }
    }

    /// Currently active face.
    #[must_use]
    pub fn active(&self) -> Option<Face> {
        self.active
    }

    /// Distance from the cube centre to each face plane.
    #[must_use]
    pub fn face_offset(&self) -> f32 {
        self.face_offset
    }

    /// Score all faces for this frame's pose and update the active face.
    pub fn update(
        &mut self,
        orientation: &UnitQuaternion<f32>,
        cube_position: &Point3<f32>,
        camera_position: &Point3<f32>,
    ) -> FaceSelection {
        let facing = facing_scores(orientation, cube_position, camera_position, self.face_offset);
        let active = self.select(&facing);
        let visible = facing.map(|score| score > self.visibility_threshold);
        FaceSelection {
            facing,
            active,
            visible,
        }
    }

    /// Apply the selection rule to precomputed scores.
    ///
    /// The best-scoring face above the threshold wins, except that a still
    /// qualifying active face is kept until a challenger beats it by at least
    /// the hysteresis margin.
    pub fn select(&mut self, facing: &[f32; 6]) -> Option<Face> {
        let threshold = self.activation_threshold;
        let best = Face::ALL
            .into_iter()
            .filter(|face| facing[face.index()] > threshold)
            .max_by_key(|face| OrderedFloat(facing[face.index()]));

        let next = match (self.active, best) {
            (_, None) => None,
            (Some(current), Some(challenger))
                if challenger != current
                    && facing[current.index()] > threshold
                    && facing[challenger.index()] < facing[current.index()] + self.switch_hysteresis =>
            {
                Some(current)
            }
            (_, Some(face)) => Some(face),
        };

        if next != self.active {
            debug!(from = ?self.active, to = ?next, "Active hero face changed");
            self.active = next;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> FaceTracker {
        FaceTracker::new(&HeroConfig::default())
    }

    fn camera() -> Point3<f32> {
        Point3::new(0.0, 0.0, 4.0)
    }

    #[test]
    fn local_rotation_matches_normal() {
        for face in Face::ALL {
            let rotated = face.local_rotation() * Vector3::z();
            assert!(
                (rotated - face.local_normal()).norm() < 1e-5,
                "{face:?}: {rotated:?}"
            );
        }
    }

    #[test]
    fn identity_pose_front_faces_camera() {
        let scores = facing_scores(&UnitQuaternion::identity(), &Point3::origin(), &camera(), 0.805);
        assert!((scores[Face::Front.index()] - 1.0).abs() < 1e-5);
        assert!(scores[Face::Back.index()] < -0.99);
        // Side faces lean slightly away from a camera at finite distance.
        assert!(scores[Face::Right.index()] < 0.0);
        assert!(scores[Face::Top.index()] < 0.0);
    }

    #[test]
    fn yaw_quarter_turn_brings_left_face_forward() {
        let q = euler_xyz(0.0, FRAC_PI_2, 0.0);
        let scores = facing_scores(&q, &Point3::origin(), &camera(), 0.805);
        let best = Face::ALL
            .into_iter()
            .max_by_key(|f| OrderedFloat(scores[f.index()]))
            .expect("six faces");
        assert_eq!(best, Face::Left);
    }

    #[test]
    fn camera_on_face_scores_zero() {
        let on_face = Point3::new(0.0, 0.0, 0.805);
        let scores = facing_scores(&UnitQuaternion::identity(), &Point3::origin(), &on_face, 0.805);
        assert!(scores[Face::Front.index()].abs() < f32::EPSILON);
    }

    #[test]
    fn selects_highest_above_threshold() {
        let mut t = tracker();
        let active = t.select(&[0.2, -0.9, 0.7, -0.1, 0.1, -0.3]);
        assert_eq!(active, Some(Face::Right));
    }

    #[test]
    fn none_when_nothing_crosses_threshold() {
        let mut t = tracker();
        assert_eq!(t.select(&[0.05, 0.01, -0.2, 0.0, 0.06, -1.0]), None);
    }

    #[test]
    fn hysteresis_keeps_current_face_on_near_tie() {
        let mut t = tracker();
        assert_eq!(t.select(&[0.70, 0.0, 0.60, 0.0, 0.0, 0.0]), Some(Face::Front));
        // Right now leads by 0.02, under the 0.03 margin.
        assert_eq!(t.select(&[0.69, 0.0, 0.71, 0.0, 0.0, 0.0]), Some(Face::Front));
        // Right leads by 0.05, over the margin.
        assert_eq!(t.select(&[0.66, 0.0, 0.71, 0.0, 0.0, 0.0]), Some(Face::Right));
    }

    #[test]
    fn active_face_dropping_below_threshold_is_replaced() {
        let mut t = tracker();
        t.select(&[0.9, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(t.select(&[0.05, 0.0, 0.07, 0.0, 0.0, 0.0]), Some(Face::Right));
    }

    #[test]
    fn alternating_near_tie_does_not_oscillate() {
        let mut t = tracker();
        t.select(&[0.70, 0.0, 0.69, 0.0, 0.0, 0.0]);
        for i in 0..20 {
            let wobble = if i % 2 == 0 { 0.01 } else { -0.01 };
            let active = t.select(&[0.70, 0.0, 0.70 + wobble, 0.0, 0.0, 0.0]);
            assert_eq!(active, Some(Face::Front));
        }
    }

    #[test]
    fn visibility_follows_threshold() {
        let mut t = tracker();
        let selection = t.update(&UnitQuaternion::identity(), &Point3::origin(), &camera());
        assert!(selection.visible[Face::Front.index()]);
        assert!(!selection.visible[Face::Back.index()]);
        assert_eq!(selection.active, Some(Face::Front));
    }

    #[test]
    fn label_anchor_sits_below_front_mark() {
        let anchor = label_anchor_world(
            Face::Front,
            &UnitQuaternion::identity(),
            &Point3::origin(),
            0.805,
            MarkOffset::default(),
        );
        assert!((anchor - Point3::new(0.0, -0.53, 0.875)).norm() < 1e-5);
    }

    #[test]
    fn pressed_mark_pulls_label_in() {
        let rest = MarkOffset::default();
        let pressed = MarkOffset { depth: 0.04, scale: 0.88 };
        let a = label_anchor_world(Face::Front, &UnitQuaternion::identity(), &Point3::origin(), 0.805, rest);
        let b = label_anchor_world(Face::Front, &UnitQuaternion::identity(), &Point3::origin(), 0.805, pressed);
        assert!(b.y > a.y, "scaled-down mark moves the label toward the centre");
    }
}

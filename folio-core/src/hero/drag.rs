//! Pointer-Driven Rotation with Inertia
//!
//! While a drag is active every pointer move rotates the cube directly:
//!   Δpitch = dy · k,  Δyaw = dx · k
//!
//! and feeds an exponentially smoothed angular-velocity estimate:
//!   v ← v + (Δ/Δt − v) · α
//!
//! Once released, the cube keeps spinning and the velocity decays as
//!   v(t) = v₀ · e^(−d·t)
//!
//! until |vx| + |vy| drops below the rest epsilon, at which point it is
//! snapped to zero. Pitch is always clamped to ±(π/2 − margin).

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{UnitQuaternion, Vector2};

use crate::config::HeroConfig;
use crate::types::{PointerId, ScreenPoint};

use super::euler_xyz;

/// Gesture state of the drag surface.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging {
        pointer: PointerId,
        last: ScreenPoint,
        last_time: f64,
        moved: bool,
    },
}

/// Tracks pitch/yaw of the hero cube and its angular velocity.
///
/// `rotation.x` is pitch (about the X axis), `rotation.y` is yaw (about Y),
/// both in radians. Velocities are radians per second.
#[derive(Debug, Clone)]
pub struct DragRotator {
    config: HeroConfig,
    rotation: Vector2<f32>,
    velocity: Vector2<f32>,
    gesture: Gesture,
}

impl DragRotator {
    /// Create a rotator at rest with zero rotation.
    #[must_use]
    pub fn new(config: &HeroConfig) -> Self {
        Self {
            config: config.clone(),
            rotation: Vector2::zeros(),
            velocity: Vector2::zeros(),
            gesture: Gesture::Idle,
        }
    }

    /// Largest absolute pitch the cube may reach.
    #[must_use]
    pub fn pitch_limit(&self) -> f32 {
        FRAC_PI_2 - self.config.pitch_margin
    }

    /// Begin a drag with `pointer`.
    ///
    /// Returns `false` (and changes nothing) if a drag is already in
    /// progress or the position is not finite.
    pub fn pointer_down(&mut self, pointer: PointerId, at: ScreenPoint, now: f64) -> bool {
        if self.is_dragging() || !at.is_finite() || !now.is_finite() {
            return false;
        }
        self.gesture = Gesture::Dragging {
            pointer,
            last: at,
            last_time: now,
            moved: false,
        };
        true
    }

    /// Feed a pointer move. Returns `true` if it rotated the cube.
    ///
    /// Moves from any pointer other than the one that started the drag are
    /// ignored, as are moves while idle.
    pub fn pointer_move(&mut self, pointer: PointerId, at: ScreenPoint, now: f64) -> bool {
        if !at.is_finite() || !now.is_finite() {
            return false;
        }

        let (delta, dt) = {
            let Gesture::Dragging {
                pointer: active,
                last,
                last_time,
                moved,
            } = &mut self.gesture
            else {
                return false;
            };
            if *active != pointer {
                return false;
            }

            let dx = at.x - last.x;
            let dy = at.y - last.y;
            if dx.abs() + dy.abs() > self.config.move_threshold_px {
                *moved = true;
            }

            // Clock going backwards degrades to the minimum sample step.
            #[allow(clippy::cast_possible_truncation)]
            let dt = ((now - *last_time) as f32).max(self.config.min_sample_dt);

            *last = at;
            *last_time = now;

            let k = self.config.rotate_speed;
            (Vector2::new(dy * k, dx * k), dt)
        };

        self.rotation += delta;
        self.normalize_rotation();

        let instantaneous = delta / dt;
        let alpha = self.config.velocity_smoothing;
        self.velocity += (instantaneous - self.velocity) * alpha;
        if !self.velocity.iter().all(|v| v.is_finite()) {
            self.velocity = Vector2::zeros();
        }
        true
    }

    /// End the drag if `pointer` is the one driving it.
    pub fn pointer_up(&mut self, pointer: PointerId) {
        if matches!(self.gesture, Gesture::Dragging { pointer: active, .. } if active == pointer) {
            self.gesture = Gesture::Idle;
        }
    }

    /// End any drag regardless of pointer (cancel, window blur, pointer leave).
    pub fn release(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Advance inertia by `dt` seconds. Returns `true` if the cube moved.
    ///
    /// No-op while dragging, for non-positive or non-finite `dt`, and when
    /// the cube is at rest.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_dragging() || !(dt.is_finite() && dt > 0.0) {
            return false;
        }
        if !self.velocity.iter().all(|v| v.is_finite()) {
            self.velocity = Vector2::zeros();
            return false;
        }
        if self.velocity.x.abs() + self.velocity.y.abs() < self.config.rest_epsilon {
            self.velocity = Vector2::zeros();
            return false;
        }

        self.rotation += self.velocity * dt;
        self.normalize_rotation();

        let decay = (-self.config.damping * dt).exp();
        self.velocity *= decay;
        if self.velocity.x.abs() + self.velocity.y.abs() < self.config.rest_epsilon {
            self.velocity = Vector2::zeros();
        }
        true
    }

    /// Current (pitch, yaw) in radians.
    #[must_use]
    pub fn rotation(&self) -> Vector2<f32> {
        self.rotation
    }

    /// Jump to a (pitch, yaw); pitch is clamped.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        if pitch.is_finite() && yaw.is_finite() {
            self.rotation = Vector2::new(pitch, yaw);
            self.normalize_rotation();
        }
    }

    /// Current angular velocity estimate (rad/s about X, Y).
    #[must_use]
    pub fn angular_velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    /// Magnitude of the angular velocity.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Whether a drag gesture is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Whether the active drag has travelled past the move threshold.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { moved: true, .. })
    }

    /// Not dragging and no residual spin.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        !self.is_dragging() && self.velocity == Vector2::zeros()
    }

    /// Orientation as a quaternion: pitch about X, then yaw about Y.
    #[must_use]
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        euler_xyz(self.rotation.x, self.rotation.y, 0.0)
    }

    fn normalize_rotation(&mut self) {
        let limit = self.pitch_limit();
        self.rotation.x = self.rotation.x.clamp(-limit, limit);
        // Keep yaw in [-π, π) so long spins don't lose precision.
        self.rotation.y = (self.rotation.y + PI).rem_euclid(TAU) - PI;
    }
}

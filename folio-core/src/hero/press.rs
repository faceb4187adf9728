//! Press-in feedback for the skill marks.

use serde::Serialize;

use super::faces::Face;

/// Normal offset of a fully pressed mark.
const PRESS_DEPTH: f32 = 0.04;
/// Fraction a fully pressed mark shrinks by.
const PRESS_SHRINK: f32 = 0.12;

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `damp(a, b, λ, dt) = a + (b − a)(1 − e^(−λ·dt))`
#[must_use]
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    if !(dt.is_finite() && dt > 0.0) {
        return current;
    }
    current + (target - current) * (1.0 - (-lambda * dt).exp())
}

/// Transform applied to a face's mark group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkOffset {
    /// Offset along the face normal.
    pub depth: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for MarkOffset {
    fn default() -> Self {
        Self {
            depth: 0.0,
            scale: 1.0,
        }
    }
}

/// Per-face press animation state.
#[derive(Debug, Clone)]
pub struct PressFeedback {
    amounts: [f32; 6],
    targets: [f32; 6],
    damping: f32,
}

impl PressFeedback {
    /// All marks at rest.
    #[must_use]
    pub fn new(damping: f32) -> Self {
        Self {
            amounts: [0.0; 6],
            targets: [0.0; 6],
            damping,
        }
    }

    /// Start pressing `face`.
    pub fn press(&mut self, face: Face) {
        self.targets[face.index()] = 1.0;
    }

    /// Let go of every mark.
    pub fn release_all(&mut self) {
        self.targets = [0.0; 6];
    }

    /// Advance every mark toward its target.
    pub fn tick(&mut self, dt: f32) {
        for (amount, target) in self.amounts.iter_mut().zip(self.targets) {
            *amount = damp(*amount, target, self.damping, dt);
        }
    }

    /// Press progress of `face` in [0, 1].
    #[must_use]
    pub fn amount(&self, face: Face) -> f32 {
        self.amounts[face.index()]
    }

    /// Mark transform for `face`.
    #[must_use]
    pub fn offset(&self, face: Face) -> MarkOffset {
        let amount = self.amount(face);
        MarkOffset {
            depth: amount * PRESS_DEPTH,
            scale: 1.0 - amount * PRESS_SHRINK,
        }
    }

    /// Mark transforms for all faces.
    #[must_use]
    pub fn offsets(&self) -> [MarkOffset; 6] {
        Face::ALL.map(|face| self.offset(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damp_moves_toward_target() {
        let next = damp(0.0, 1.0, 18.0, 1.0 / 60.0);
        assert!(next > 0.0 && next < 1.0);
        assert!((damp(0.3, 0.3, 18.0, 0.5) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn damp_ignores_bad_dt() {
        assert!((damp(0.4, 1.0, 18.0, 0.0) - 0.4).abs() < f32::EPSILON);
        assert!((damp(0.4, 1.0, 18.0, f32::NAN) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn press_then_release() {
        let mut p = PressFeedback::new(18.0);
        p.press(Face::Top);
        for _ in 0..60 {
            p.tick(1.0 / 60.0);
        }
        assert!(p.amount(Face::Top) > 0.99);
        assert!(p.amount(Face::Front).abs() < f32::EPSILON);

        let offset = p.offset(Face::Top);
        assert!((offset.depth - 0.04).abs() < 1e-3);
        assert!((offset.scale - 0.88).abs() < 1e-3);

        p.release_all();
        for _ in 0..60 {
            p.tick(1.0 / 60.0);
        }
        assert!(p.amount(Face::Top) < 0.01);
    }
}

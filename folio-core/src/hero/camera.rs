//! Perspective camera used to place the active face's label on screen.

use nalgebra::{Isometry3, Perspective3, Point3, Vector3};
use serde::Serialize;

use crate::config::CameraConfig;
use crate::error::{FolioError, Result};
use crate::types::ScreenPoint;

/// Labels projected slightly outside the viewport still count as on screen.
const SCREEN_SLACK: f32 = 1.15;

/// Right-handed perspective camera (looks down −Z in view space).
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    eye: Point3<f32>,
    view: Isometry3<f32>,
    projection: Perspective3<f32>,
}

/// Where a world-space point lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    /// Normalized device coordinates.
    pub ndc: Point3<f32>,
    /// Viewport-relative position in [0, 1], y growing downward.
    pub screen: ScreenPoint,
    /// Inside the clip depth range and (with slack) the viewport.
    pub on_screen: bool,
}

impl PerspectiveCamera {
    /// Build a camera from configuration.
    ///
    /// # Errors
    /// Returns `FolioError::Config` for a degenerate frustum or a camera
    /// placed on its own target.
    pub fn new(config: &CameraConfig) -> Result<Self> {
        if !(config.aspect.is_finite() && config.aspect > 0.0)
            || !(config.fov_y_degrees > 0.0 && config.fov_y_degrees < 180.0)
            || !(config.near > 0.0 && config.near < config.far)
        {
            return Err(FolioError::Config(format!(
                "invalid camera frustum: aspect={} fov={} near={} far={}",
                config.aspect, config.fov_y_degrees, config.near, config.far
            )));
        }

        let eye = Point3::from(config.position);
        let target = Point3::from(config.target);
        let forward = target - eye;
        if forward.norm() <= f32::EPSILON {
            return Err(FolioError::Config("camera position equals target".into()));
        }

        // Looking straight up or down: Y can't serve as the up vector.
        let up = if forward.normalize().cross(&Vector3::y()).norm() < 1e-4 {
            Vector3::z()
        } else {
            Vector3::y()
        };

        Ok(Self {
            eye,
            view: Isometry3::look_at_rh(&eye, &target, &up),
            projection: Perspective3::new(
                config.aspect,
                config.fov_y_degrees.to_radians(),
                config.near,
                config.far,
            ),
        })
    }

    /// Eye position in world space.
    #[must_use]
    pub fn position(&self) -> Point3<f32> {
        self.eye
    }

    /// Project a world-space point.
    #[must_use]
    pub fn project(&self, world: &Point3<f32>) -> Projection {
        let ndc = self.projection.project_point(&(self.view * world));
        let screen = ScreenPoint::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5);
        let on_screen = ndc.iter().all(|c| c.is_finite())
            && (-1.0..=1.0).contains(&ndc.z)
            && ndc.x.abs() <= SCREEN_SLACK
            && ndc.y.abs() <= SCREEN_SLACK;
        Projection {
            ndc,
            screen,
            on_screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default()).expect("default camera")
    }

    #[test]
    fn origin_projects_to_centre() {
        let p = camera().project(&Point3::origin());
        assert!(p.ndc.x.abs() < 1e-5 && p.ndc.y.abs() < 1e-5);
        assert!((p.screen.x - 0.5).abs() < 1e-5);
        assert!((p.screen.y - 0.5).abs() < 1e-5);
        assert!(p.on_screen);
    }

    #[test]
    fn lower_points_land_lower_on_screen() {
        let p = camera().project(&Point3::new(0.0, -0.5, 0.0));
        assert!(p.screen.y > 0.5);
    }

    #[test]
    fn points_behind_camera_are_off_screen() {
        let p = camera().project(&Point3::new(0.0, 0.0, 10.0));
        assert!(!p.on_screen);
    }

    #[test]
    fn degenerate_configs_rejected() {
        let mut config = CameraConfig::default();
        config.aspect = 0.0;
        assert!(PerspectiveCamera::new(&config).is_err());

        let mut config = CameraConfig::default();
        config.target = config.position;
        assert!(PerspectiveCamera::new(&config).is_err());
    }

    #[test]
    fn looking_straight_down_is_supported() {
        let config = CameraConfig {
            position: [0.0, 5.0, 0.0],
            ..CameraConfig::default()
        };
        let p = PerspectiveCamera::new(&config).expect("top-down camera").project(&Point3::origin());
        assert!(p.on_screen);
    }
}

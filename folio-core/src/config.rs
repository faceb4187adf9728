//! Configuration for the folio engine and tools.
//!
//! Maps directly to `folio.toml`. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Environment variable prefix for layered overrides (`FOLIO_SCAN__MAX_FILES=…`).
pub const ENV_PREFIX: &str = "FOLIO";

/// Top-level folio configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FolioConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Hero cube interaction tuning.
    #[serde(default)]
    pub hero: HeroConfig,
    /// Hero scene camera.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Prompt log location.
    #[serde(default)]
    pub prompt_log: PromptLogConfig,
    /// Project catalog location and assets.
    #[serde(default)]
    pub projects: ProjectsConfig,
    /// Repository scanner limits.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl FolioConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `FolioError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| FolioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load layered configuration: built-in defaults, then the optional TOML
    /// file, then `FOLIO_*` environment variables (`__` separates sections).
    ///
    /// # Errors
    /// Returns `FolioError::Config` if any layer fails to parse or the merged
    /// result is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let merged: Self = builder.build()?.try_deserialize()?;
        merged.validate()?;
        Ok(merged)
    }

    /// Reject values that would make the frame loop or camera degenerate.
    ///
    /// # Errors
    /// Returns `FolioError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.hero.validate()?;
        self.camera.validate()
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit log lines as JSON objects.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Hero cube drag, inertia, and face-selection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroConfig {
    /// Radians of rotation per pixel of pointer travel.
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
    /// Blend factor pulling the velocity estimate toward each new sample.
    #[serde(default = "default_velocity_smoothing")]
    pub velocity_smoothing: f32,
    /// Exponential damping rate per second once released. Higher stops sooner.
    #[serde(default = "default_damping")]
    pub damping: f32,
    /// Pitch is clamped to ±(π/2 − margin) so the cube never flips.
    #[serde(default = "default_pitch_margin")]
    pub pitch_margin: f32,
    /// Below this |vx|+|vy| the cube is considered at rest.
    #[serde(default = "default_rest_epsilon")]
    pub rest_epsilon: f32,
    /// Smallest time step (seconds) used when estimating velocity.
    #[serde(default = "default_min_sample_dt")]
    pub min_sample_dt: f32,
    /// Pointer travel (|dx|+|dy| pixels) that turns a press into a drag.
    #[serde(default = "default_move_threshold")]
    pub move_threshold_px: f32,
    /// Distance from the cube centre to each face plane.
    #[serde(default = "default_face_offset")]
    pub face_offset: f32,
    /// Facing score a face must exceed to become active.
    #[serde(default = "default_0_06")]
    pub activation_threshold: f32,
    /// Margin a challenger must beat the active face by to take over.
    #[serde(default = "default_0_03")]
    pub switch_hysteresis: f32,
    /// Facing score above which a face's mark is drawn.
    #[serde(default = "default_0_06")]
    pub visibility_threshold: f32,
    /// Damping rate of the press-in animation.
    #[serde(default = "default_press_damping")]
    pub press_damping: f32,
}

impl HeroConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        let positive = [
            ("hero.rotate_speed", self.rotate_speed),
            ("hero.damping", self.damping),
            ("hero.min_sample_dt", self.min_sample_dt),
            ("hero.face_offset", self.face_offset),
            ("hero.press_damping", self.press_damping),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FolioError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.velocity_smoothing) {
            return Err(FolioError::Config(format!(
                "hero.velocity_smoothing must be within [0, 1], got {}",
                self.velocity_smoothing
            )));
        }
        if !(self.switch_hysteresis.is_finite() && self.switch_hysteresis >= 0.0) {
            return Err(FolioError::Config(format!(
                "hero.switch_hysteresis must not be negative, got {}",
                self.switch_hysteresis
            )));
        }
        if !(self.pitch_margin >= 0.0 && self.pitch_margin < FRAC_PI_2) {
            return Err(FolioError::Config(format!(
                "hero.pitch_margin must be within [0, π/2), got {}",
                self.pitch_margin
            )));
        }
        let finite = [
            ("hero.rest_epsilon", self.rest_epsilon),
            ("hero.move_threshold_px", self.move_threshold_px),
            ("hero.activation_threshold", self.activation_threshold),
            ("hero.visibility_threshold", self.visibility_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(FolioError::Config(format!("{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.008,
            velocity_smoothing: 0.35,
            damping: 3.8,
            pitch_margin: 0.05,
            rest_epsilon: 1e-5,
            min_sample_dt: 0.001,
            move_threshold_px: 0.5,
            face_offset: 0.805,
            activation_threshold: 0.06,
            switch_hysteresis: 0.03,
            visibility_threshold: 0.06,
            press_damping: 18.0,
        }
    }
}

/// Perspective camera looking at the hero cube.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Eye position in world space.
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Point the camera looks at.
    #[serde(default)]
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_y_degrees: f32,
    /// Viewport width / height.
    #[serde(default = "default_1_0")]
    pub aspect: f32,
    /// Near clip plane.
    #[serde(default = "default_near")]
    pub near: f32,
    /// Far clip plane.
    #[serde(default = "default_far")]
    pub far: f32,
}

impl CameraConfig {
    fn validate(&self) -> Result<()> {
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(FolioError::Config(format!("camera.aspect must be positive, got {}", self.aspect)));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(FolioError::Config(format!(
                "camera.fov_y_degrees must be within (0, 180), got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(FolioError::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.position == self.target {
            return Err(FolioError::Config("camera.position must differ from camera.target".into()));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 4.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 50.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Prompt log location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptLogConfig {
    /// Path of the JSON log, relative to the site root.
    #[serde(default = "default_prompt_log_path")]
    pub path: PathBuf,
}

impl Default for PromptLogConfig {
    fn default() -> Self {
        Self {
            path: default_prompt_log_path(),
        }
    }
}

/// Project catalog location and screenshot assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Path of the JSON project catalog.
    #[serde(default = "default_projects_path")]
    pub path: PathBuf,
    /// Directory screenshots are copied into.
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    /// Public URL prefix the site serves screenshots under.
    #[serde(default = "default_screenshot_url_prefix")]
    pub screenshot_url_prefix: String,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            path: default_projects_path(),
            screenshot_dir: default_screenshot_dir(),
            screenshot_url_prefix: default_screenshot_url_prefix(),
        }
    }
}

/// Repository scanner limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Git executable.
    #[serde(default = "default_git")]
    pub git_program: String,
    /// Prefix of the temporary clone directory.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
    /// Max bytes read from the README.
    #[serde(default = "default_250k")]
    pub max_readme_bytes: usize,
    /// Max bytes read from `package-lock.json`.
    #[serde(default = "default_400k")]
    pub max_lock_bytes: usize,
    /// Stop walking the checkout after this many files.
    #[serde(default = "default_50k")]
    pub max_files: usize,
    /// Max bullets per extracted list.
    #[serde(default = "default_8")]
    pub max_items: usize,
    /// Max tech tags reported.
    #[serde(default = "default_16")]
    pub max_tech: usize,
    /// Number of most common file extensions reported.
    #[serde(default = "default_8")]
    pub top_extensions: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            git_program: default_git(),
            temp_prefix: default_temp_prefix(),
            max_readme_bytes: 250_000,
            max_lock_bytes: 400_000,
            max_files: 50_000,
            max_items: 8,
            max_tech: 16,
            top_extensions: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_git() -> String { "git".to_string() }
fn default_temp_prefix() -> String { "folio-scan-".to_string() }
fn default_prompt_log_path() -> PathBuf { PathBuf::from("src/data/agent-prompts.json") }
fn default_projects_path() -> PathBuf { PathBuf::from("src/data/projects.json") }
fn default_screenshot_dir() -> PathBuf { PathBuf::from("public/project-screenshots") }
fn default_screenshot_url_prefix() -> String { "project-screenshots/".to_string() }
fn default_camera_position() -> [f32; 3] { [0.0, 0.0, 4.0] }
fn default_rotate_speed() -> f32 { 0.008 }
fn default_velocity_smoothing() -> f32 { 0.35 }
fn default_damping() -> f32 { 3.8 }
fn default_pitch_margin() -> f32 { 0.05 }
fn default_rest_epsilon() -> f32 { 1e-5 }
fn default_min_sample_dt() -> f32 { 0.001 }
fn default_move_threshold() -> f32 { 0.5 }
fn default_face_offset() -> f32 { 0.805 }
fn default_press_damping() -> f32 { 18.0 }
fn default_fov() -> f32 { 50.0 }
fn default_near() -> f32 { 0.1 }
fn default_far() -> f32 { 100.0 }
fn default_0_03() -> f32 { 0.03 }
fn default_0_06() -> f32 { 0.06 }
fn default_1_0() -> f32 { 1.0 }
fn default_8() -> usize { 8 }
fn default_16() -> usize { 16 }
fn default_250k() -> usize { 250_000 }
fn default_400k() -> usize { 400_000 }
fn default_50k() -> usize { 50_000 }

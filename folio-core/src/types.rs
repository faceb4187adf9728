//! Core type definitions shared across the folio crates.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Identifier of a pointer (mouse, pen, or one touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// A point in screen space, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position (grows downward).
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// Skill shown on one face of the hero cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    /// Databases.
    Database,
    /// Node.js.
    Node,
    /// Containers.
    Containers,
    /// Kubernetes.
    Kubernetes,
    /// GraphQL.
    Graphql,
    /// General coding.
    Code,
}

impl SkillKind {
    /// Every skill, in cube-face order.
    pub const ALL: [SkillKind; 6] = [
        SkillKind::Database,
        SkillKind::Node,
        SkillKind::Containers,
        SkillKind::Kubernetes,
        SkillKind::Graphql,
        SkillKind::Code,
    ];

    /// Human-readable label drawn under the face's mark.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "Databases",
            Self::Node => "Node.js",
            Self::Containers => "Containers",
            Self::Kubernetes => "Kubernetes",
            Self::Graphql => "GraphQL",
            Self::Code => "Code",
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

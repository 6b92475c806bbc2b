//! Node identity and facets

use serde::{Deserialize, Serialize};

/// Host-assigned node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural kind reported by the host
///
/// Capabilities are probed through [`crate::DocumentTree`]; the kind is only
/// consulted for selection preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Canvas page
    Page,
    /// Bounded frame
    Frame,
    /// Ungrouped group
    Group,
    /// Reusable component
    Component,
    /// Text layer
    Text,
    /// Anything else (vectors, shapes, images)
    #[default]
    Other,
}

impl NodeKind {
    /// Kinds that may be scanned as a whole
    #[inline]
    #[must_use]
    pub fn is_scan_container(self) -> bool {
        matches!(self, Self::Frame | Self::Group)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Page => "page",
            Self::Frame => "frame",
            Self::Group => "group",
            Self::Component => "component",
            Self::Text => "text",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// 2D point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Bounds {
    /// Create bounds
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Font family + style pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Family name, e.g. "Inter"
    pub family: String,
    /// Style name, e.g. "Regular"
    pub style: String,
}

impl FontDescriptor {
    /// Create descriptor
    #[must_use]
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// Inter Regular, the host's default text font
    #[must_use]
    pub fn inter_regular() -> Self {
        Self::new("Inter", "Regular")
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::inter_regular()
    }
}

impl std::fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Solid RGB color, channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Flat red used to mark rejected text
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Create color
    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Text capability of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFacet {
    /// Visible characters
    pub characters: String,
    /// Structural label (layer name)
    pub label: String,
    /// Fonts used by the characters
    #[serde(default)]
    pub fonts: Vec<FontDescriptor>,
}

impl TextFacet {
    /// Create facet with a single font
    #[must_use]
    pub fn new(characters: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            label: label.into(),
            fonts: vec![FontDescriptor::inter_regular()],
        }
    }
}

/// Host metadata for a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Identity
    pub id: NodeId,
    /// Structural kind
    pub kind: NodeKind,
    /// Layer name
    pub name: String,
    /// Position and size
    pub bounds: Bounds,
    /// Parent, if attached
    pub parent: Option<NodeId>,
}

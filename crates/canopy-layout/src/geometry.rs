//! Positioned output handed to a render sink.
//!
//! Every element carries a [`NodeLabel`] so a sink can key enter, update
//! and exit joins by record id.

use crate::kind::LayoutKind;
use canopy_core::{Circle, Hierarchy, NodeId, Point, Rect, Size};
use serde::Serialize;

/// Identity and text of a drawn node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLabel {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon URL.
    pub icon: String,
    /// Distance from the root.
    pub depth: usize,
}

impl NodeLabel {
    /// Label for a node of `tree`.
    #[must_use]
    pub fn of(tree: &Hierarchy, id: NodeId) -> Self {
        let node = tree.node(id);
        Self {
            id: node.id().to_string(),
            name: node.display_name().to_string(),
            icon: node.icon().to_string(),
            depth: node.depth(),
        }
    }
}

/// Output of any adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum Geometry {
    /// Collapsible tree.
    Tree(TreeGeometry),
    /// Force-directed graph.
    Force(ForceGeometry),
    /// Zoomable sunburst.
    Sunburst(SunburstGeometry),
    /// Circle pack, plain or colored.
    Pack(PackGeometry),
    /// Squarified treemap.
    Treemap(TreemapGeometry),
}

impl Geometry {
    /// Number of drawn nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Tree(g) => g.nodes.len(),
            Self::Force(g) => g.nodes.len(),
            Self::Sunburst(g) => g.arcs.len(),
            Self::Pack(g) => g.circles.len(),
            Self::Treemap(g) => g.cells.len(),
        }
    }

    /// Ids of every drawn node, in output order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Tree(g) => g.nodes.iter().map(|n| n.label.id.as_str()).collect(),
            Self::Force(g) => g.nodes.iter().map(|n| n.label.id.as_str()).collect(),
            Self::Sunburst(g) => g.arcs.iter().map(|a| a.label.id.as_str()).collect(),
            Self::Pack(g) => g.circles.iter().map(|c| c.label.id.as_str()).collect(),
            Self::Treemap(g) => g.cells.iter().map(|c| c.label.id.as_str()).collect(),
        }
    }

    /// Which family of layout produced this geometry.
    #[must_use]
    pub fn family(&self) -> LayoutKind {
        match self {
            Self::Tree(_) => LayoutKind::CollapsibleTree,
            Self::Force(_) => LayoutKind::ForceGraph,
            Self::Sunburst(_) => LayoutKind::Sunburst,
            Self::Pack(g) if g.colored => LayoutKind::CirclePackColored,
            Self::Pack(_) => LayoutKind::CirclePack,
            Self::Treemap(_) => LayoutKind::Treemap,
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

/// A node of the collapsible tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNodeGeometry {
    /// Identity.
    #[serde(flatten)]
    pub label: NodeLabel,
    /// `x` runs along depth, `y` along breadth.
    pub position: Point,
    /// True if the node has hidden children.
    pub collapsed: bool,
    /// True if the node has any children at all.
    pub has_children: bool,
}

/// Cubic link from parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkPath {
    /// Parent position.
    pub start: Point,
    /// First control point.
    pub c1: Point,
    /// Second control point.
    pub c2: Point,
    /// Child position.
    pub end: Point,
}

impl LinkPath {
    /// Horizontal link with control points at the mid depth.
    #[must_use]
    pub fn horizontal(start: Point, end: Point) -> Self {
        let mid = (start.x + end.x) / 2.0;
        Self {
            start,
            c1: Point::new(mid, start.y),
            c2: Point::new(mid, end.y),
            end,
        }
    }

    /// SVG path data.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!(
            "M{},{}C{},{} {},{} {},{}",
            self.start.x,
            self.start.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A parent/child edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLink {
    /// Parent id.
    pub source: String,
    /// Child id.
    pub target: String,
    /// Curve.
    pub path: LinkPath,
}

/// Collapsible tree output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeGeometry {
    /// Visible nodes in pre-order.
    pub nodes: Vec<TreeNodeGeometry>,
    /// One link per visible non-root node.
    pub links: Vec<TreeLink>,
    /// Bounding box of node positions.
    pub extent: Rect,
}

// =============================================================================
// Force
// =============================================================================

/// A simulated node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForceNode {
    /// Identity.
    #[serde(flatten)]
    pub label: NodeLabel,
    /// Position relative to the simulation center.
    pub position: Point,
    /// True if the node has children.
    pub has_children: bool,
    /// True while dragged.
    pub pinned: bool,
}

/// A straight edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForceLink {
    /// Parent id.
    pub source: String,
    /// Child id.
    pub target: String,
    /// Parent position.
    pub start: Point,
    /// Child position.
    pub end: Point,
}

/// Force graph output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForceGeometry {
    /// All nodes, ignoring collapse state.
    pub nodes: Vec<ForceNode>,
    /// All parent/child edges.
    pub links: Vec<ForceLink>,
    /// Ticks run so far.
    pub ticks: usize,
    /// Alpha at the time of the snapshot.
    pub alpha: f64,
}

// =============================================================================
// Sunburst
// =============================================================================

/// Angular and radial extent of an arc, in partition units.
///
/// `x0..x1` are radians; `y0..y1` are ring indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcExtent {
    /// Start angle.
    pub x0: f64,
    /// End angle.
    pub x1: f64,
    /// Inner ring.
    pub y0: f64,
    /// Outer ring.
    pub y1: f64,
}

impl ArcExtent {
    /// Component-wise interpolation.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        use canopy_core::lerp;
        Self {
            x0: lerp(self.x0, to.x0, t),
            x1: lerp(self.x1, to.x1, t),
            y0: lerp(self.y0, to.y0, t),
            y1: lerp(self.y1, to.y1, t),
        }
    }
}

/// One sunburst segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    /// Identity.
    #[serde(flatten)]
    pub label: NodeLabel,
    /// Parent id; empty for the root.
    pub parent: String,
    /// Accumulated value.
    pub value: f64,
    /// Extent in the unzoomed partition.
    pub base: ArcExtent,
    /// Extent as currently drawn.
    pub current: ArcExtent,
    /// Start angle in radians, clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Inner radius in pixels.
    pub inner_radius: f64,
    /// Outer radius in pixels.
    pub outer_radius: f64,
    /// True if the arc lies inside the visible rings.
    pub visible: bool,
    /// 1 when visible, 0 otherwise.
    pub opacity: f64,
    /// True when the arc is large enough for a label.
    pub label_visible: bool,
    /// Fill color as `#rrggbb`.
    pub fill: String,
}

/// Sunburst output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstGeometry {
    /// Every visible node, in pre-order.
    pub arcs: Vec<Arc>,
    /// Id of the node filling the rings.
    pub focus: String,
    /// Pixel width of one ring.
    pub ring_width: f64,
    /// Rings drawn outside the center disc.
    pub visible_rings: usize,
    /// Center of the chart on the canvas.
    pub center: Point,
}

impl SunburstGeometry {
    /// Arc by node id.
    #[must_use]
    pub fn arc(&self, id: &str) -> Option<&Arc> {
        self.arcs.iter().find(|a| a.label.id == id)
    }
}

// =============================================================================
// Pack
// =============================================================================

/// A packed circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackCircle {
    /// Identity.
    #[serde(flatten)]
    pub label: NodeLabel,
    /// Parent id; empty for the root.
    pub parent: String,
    /// Position and radius on the canvas.
    pub circle: Circle,
    /// Accumulated value.
    pub value: f64,
    /// Longest downward path to a visible leaf.
    pub height: usize,
    /// True if the node has no visible children.
    pub leaf: bool,
    /// Fill color as `#rrggbb`, set by the colored variant.
    pub fill: Option<String>,
}

/// Circle pack output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackGeometry {
    /// Every visible node, in pre-order.
    pub circles: Vec<PackCircle>,
    /// Canvas the pack was fitted to.
    pub size: Size,
    /// True for the colored variant.
    pub colored: bool,
}

// =============================================================================
// Treemap
// =============================================================================

/// A treemap rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapCell {
    /// Identity.
    #[serde(flatten)]
    pub label: NodeLabel,
    /// Parent id; empty for the root.
    pub parent: String,
    /// Rectangle on the canvas.
    pub rect: Rect,
    /// Accumulated value.
    pub value: f64,
    /// True if the node has no visible children.
    pub leaf: bool,
}

/// Treemap output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapGeometry {
    /// Every visible node, in pre-order.
    pub cells: Vec<TreemapCell>,
    /// Canvas.
    pub size: Size,
}

impl TreemapGeometry {
    /// Cell by node id.
    #[must_use]
    pub fn cell(&self, id: &str) -> Option<&TreemapCell> {
        self.cells.iter().find(|c| c.label.id == id)
    }
}

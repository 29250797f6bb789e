//! Squarified treemap.
//!
//! Children are laid out in rows whose aspect ratios stay near the golden
//! ratio (Bruls, Huizing, van Wijk). Each row takes its share of the
//! remaining space; after the last child the parent's own weight is left as
//! unclaimed area at the end of its rectangle.

use crate::adapter::LayoutAdapter;
use crate::error::LayoutError;
use crate::geometry::{Geometry, TreemapCell, TreemapGeometry};
use crate::kind::LayoutKind;
use crate::settings::TreemapSettings;
use crate::snapshot::Snapshot;
use canopy_core::{Hierarchy, Rect, Size};

/// Target aspect ratio of squarified rows.
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    /// Shrink each side by `left, top, right, bottom`; a side that would
    /// cross its opposite collapses to the midpoint.
    fn shrink(self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let (mut x0, mut x1) = (self.x0 + left, self.x1 - right);
        let (mut y0, mut y1) = (self.y0 + top, self.y1 - bottom);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Self { x0, y0, x1, y1 }
    }

    fn clamp_to(self, outer: Self) -> Self {
        let x0 = self.x0.clamp(outer.x0, outer.x1);
        let y0 = self.y0.clamp(outer.y0, outer.y1);
        Self {
            x0,
            y0,
            x1: self.x1.clamp(x0, outer.x1),
            y1: self.y1.clamp(y0, outer.y1),
        }
    }

    fn rect(self) -> Rect {
        Rect::from_corners(self.x0, self.y0, self.x1, self.y1)
    }
}

/// Treemap adapter.
#[derive(Debug, Clone, Copy)]
pub struct TreemapLayout {
    canvas: Size,
    settings: TreemapSettings,
}

impl TreemapLayout {
    /// Treemap filling `canvas`.
    #[must_use]
    pub const fn new(canvas: Size, settings: TreemapSettings) -> Self {
        Self { canvas, settings }
    }

    /// Concrete geometry, without the [`Geometry`] wrapper.
    ///
    /// # Errors
    ///
    /// Fails on an empty canvas or a node without a usable weight.
    pub fn compute(&self, tree: &Hierarchy) -> Result<TreemapGeometry, LayoutError> {
        if !self.canvas.is_drawable() {
            return Err(LayoutError::EmptyCanvas);
        }
        let mut snap = Snapshot::weighted(tree)?;
        snap.sort_by_value();

        let inner = self.settings.padding_inner.max(0.0) / 2.0;
        let outer = self.settings.padding_outer.max(0.0);
        let mut bounds = vec![
            Bounds {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: 0.0,
            };
            snap.len()
        ];
        bounds[0] = Bounds {
            x0: 0.0,
            y0: 0.0,
            x1: self.canvas.width,
            y1: self.canvas.height,
        };

        for i in 0..snap.len() {
            let node = &snap.nodes[i];
            if let Some(p) = node.parent {
                bounds[i] = bounds[i].shrink(inner, inner, inner, inner).clamp_to(bounds[p]);
            }
            if node.children.is_empty() {
                continue;
            }
            let pad = outer - inner;
            let area = bounds[i].shrink(pad, pad, pad, pad);
            squarify(PHI, &snap, i, area, &mut bounds);
        }

        let cells = snap
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| TreemapCell {
                label: snap.label(tree, i),
                parent: node
                    .parent
                    .map(|p| tree.node(snap.nodes[p].id).id().to_string())
                    .unwrap_or_default(),
                rect: bounds[i].rect(),
                value: node.value,
                leaf: node.children.is_empty(),
            })
            .collect();

        Ok(TreemapGeometry {
            cells,
            size: self.canvas,
        })
    }
}

impl LayoutAdapter for TreemapLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Treemap
    }

    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError> {
        self.compute(tree).map(Geometry::Treemap)
    }
}

/// Lay the children of `parent` into `area` in squarified rows.
fn squarify(ratio: f64, snap: &Snapshot, parent: usize, area: Bounds, out: &mut [Bounds]) {
    let children = &snap.nodes[parent].children;
    let value_of = |i: usize| snap.nodes[children[i]].value;
    let n = children.len();
    let Bounds {
        mut x0,
        mut y0,
        x1,
        y1,
    } = area;
    let mut remaining = snap.nodes[parent].value;
    let (mut i0, mut i1) = (0, 0);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;
        if dx <= 0.0 || dy <= 0.0 || remaining <= 0.0 {
            for &c in &children[i0..] {
                out[c] = Bounds {
                    x0,
                    y0,
                    x1: x0.max(x1),
                    y1: y0.max(y1),
                };
            }
            return;
        }

        let mut sum = value_of(i1);
        i1 += 1;
        while sum == 0.0 && i1 < n {
            sum = value_of(i1);
            i1 += 1;
        }
        let (mut min_value, mut max_value) = (sum, sum);
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let v = value_of(i1);
            sum += v;
            min_value = min_value.min(v);
            max_value = max_value.max(v);
            beta = sum * sum * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum -= v;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &children[i0..i1];
        if dx < dy {
            let y = y0 + dy * sum / remaining;
            dice(snap, row, sum, Bounds { x0, y0, x1, y1: y }, out);
            y0 = y;
        } else {
            let x = x0 + dx * sum / remaining;
            slice(snap, row, sum, Bounds { x0, y0, x1: x, y1 }, out);
            x0 = x;
        }
        remaining -= sum;
        i0 = i1;
    }
}

/// Split `area` left to right among `row`.
fn dice(snap: &Snapshot, row: &[usize], total: f64, area: Bounds, out: &mut [Bounds]) {
    let k = if total > 0.0 {
        (area.x1 - area.x0) / total
    } else {
        0.0
    };
    let mut x = area.x0;
    for &c in row {
        let next = x + snap.nodes[c].value * k;
        out[c] = Bounds {
            x0: x,
            y0: area.y0,
            x1: next,
            y1: area.y1,
        };
        x = next;
    }
}

/// Split `area` top to bottom among `row`.
fn slice(snap: &Snapshot, row: &[usize], total: f64, area: Bounds, out: &mut [Bounds]) {
    let k = if total > 0.0 {
        (area.y1 - area.y0) / total
    } else {
        0.0
    };
    let mut y = area.y0;
    for &c in row {
        let next = y + snap.nodes[c].value * k;
        out[c] = Bounds {
            x0: area.x0,
            y0: y,
            x1: area.x1,
            y1: next,
        };
        y = next;
    }
}

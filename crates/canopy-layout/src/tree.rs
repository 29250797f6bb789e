//! Collapsible tidy tree.
//!
//! Positions come from the Buchheim/Jünger/Leipert linear-time version of
//! Walker's algorithm. The breadth axis is then scaled to the canvas height
//! and the depth axis spaced at a fixed pitch, giving a left-to-right tree.

use crate::adapter::LayoutAdapter;
use crate::error::LayoutError;
use crate::geometry::{Geometry, LinkPath, TreeGeometry, TreeLink, TreeNodeGeometry};
use crate::kind::LayoutKind;
use crate::settings::TreeSettings;
use crate::snapshot::Snapshot;
use canopy_core::{Hierarchy, Point, Rect, Size};
use serde::Serialize;
use std::collections::HashSet;

/// Collapsible tree adapter.
#[derive(Debug, Clone, Copy)]
pub struct TreeLayout {
    canvas: Size,
    settings: TreeSettings,
}

impl TreeLayout {
    /// Tree fitted to `canvas.height` along the breadth axis.
    #[must_use]
    pub const fn new(canvas: Size, settings: TreeSettings) -> Self {
        Self { canvas, settings }
    }

    /// Concrete geometry, without the [`Geometry`] wrapper.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyCanvas`] if the canvas has no area.
    pub fn compute(&self, tree: &Hierarchy) -> Result<TreeGeometry, LayoutError> {
        if !self.canvas.is_drawable() {
            return Err(LayoutError::EmptyCanvas);
        }
        let snap = Snapshot::visible(tree);
        let breadth = tidy_breadth(&snap, self.canvas.height);

        let positions: Vec<Point> = snap
            .nodes
            .iter()
            .zip(&breadth)
            .map(|(n, &b)| Point::new(n.depth as f64 * self.settings.depth_spacing, b))
            .collect();

        let nodes = snap
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| TreeNodeGeometry {
                label: snap.label(tree, i),
                position: positions[i],
                collapsed: tree.is_collapsed(n.id),
                has_children: tree.node(n.id).has_children(),
            })
            .collect::<Vec<_>>();

        let links = snap
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| {
                n.parent.map(|p| TreeLink {
                    source: nodes[p].label.id.clone(),
                    target: nodes[i].label.id.clone(),
                    path: LinkPath::horizontal(positions[p], positions[i]),
                })
            })
            .collect();

        Ok(TreeGeometry {
            extent: bounds(&positions),
            nodes,
            links,
        })
    }
}

impl LayoutAdapter for TreeLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::CollapsibleTree
    }

    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError> {
        self.compute(tree).map(Geometry::Tree)
    }
}

fn bounds(points: &[Point]) -> Rect {
    let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
    let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    if points.is_empty() {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    } else {
        Rect::from_corners(x0, y0, x1, y1)
    }
}

// =============================================================================
// Tidy tree
// =============================================================================

/// One unit between siblings, two between cousins.
fn separation(snap: &Snapshot, a: usize, b: usize) -> f64 {
    if snap.nodes[a].parent == snap.nodes[b].parent {
        1.0
    } else {
        2.0
    }
}

/// Per-node state of the tidy-tree walk. Index `n` is a virtual parent of
/// the root so the root can be treated like any other first child.
struct Walker<'a> {
    snap: &'a Snapshot,
    parent: Vec<usize>,
    children: Vec<Vec<usize>>,
    number: Vec<usize>,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    thread: Vec<Option<usize>>,
    ancestor: Vec<usize>,
    default_ancestor: Vec<Option<usize>>,
}

impl<'a> Walker<'a> {
    fn new(snap: &'a Snapshot) -> Self {
        let n = snap.len();
        let mut parent = vec![n; n + 1];
        let mut children: Vec<Vec<usize>> = snap.nodes.iter().map(|s| s.children.clone()).collect();
        children.push(vec![0]);
        let mut number = vec![0; n + 1];
        for (i, node) in snap.nodes.iter().enumerate() {
            for (k, &c) in node.children.iter().enumerate() {
                parent[c] = i;
                number[c] = k;
            }
        }
        parent[n] = n;
        Self {
            snap,
            parent,
            children,
            number,
            prelim: vec![0.0; n + 1],
            modifier: vec![0.0; n + 1],
            change: vec![0.0; n + 1],
            shift: vec![0.0; n + 1],
            thread: vec![None; n + 1],
            ancestor: (0..=n).collect(),
            default_ancestor: vec![None; n + 1],
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        separation(self.snap, a, b)
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children[v].first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children[v].last().copied().or(self.thread[v])
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.number[wp] as f64 - self.number[wm] as f64);
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for k in (0..self.children[v].len()).rev() {
            let w = self.children[v][k];
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent[a] == self.parent[v] {
            a
        } else {
            ancestor
        }
    }

    fn first_walk(&mut self, v: usize) {
        let p = self.parent[v];
        let w = (self.number[v] > 0).then(|| self.children[p][self.number[v] - 1]);
        if self.children[v].is_empty() {
            if let Some(w) = w {
                self.prelim[v] = self.prelim[w] + self.separation(v, w);
            }
        } else {
            self.execute_shifts(v);
            let first = self.children[v][0];
            let last = self.children[v][self.children[v].len() - 1];
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = w {
                self.prelim[v] = self.prelim[w] + self.separation(v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        }
        let fallback = self.default_ancestor[p].unwrap_or(self.children[p][0]);
        self.default_ancestor[p] = Some(self.apportion(v, w, fallback));
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.children[self.parent[v]][0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let mut next_vim = self.next_right(vim);
        let mut next_vip = self.next_left(vip);
        while let (Some(nvim), Some(nvip)) = (next_vim, next_vip) {
            vim = nvim;
            vip = nvip;
            // The outer contours exist whenever the inner ones do.
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.ancestor[vop] = v;
            let shift =
                self.prelim[vim] + sim - self.prelim[vip] - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let a = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
            next_vim = self.next_right(vim);
            next_vip = self.next_left(vip);
        }
        if let Some(nvim) = next_vim {
            if self.next_right(vop).is_none() {
                self.thread[vop] = Some(nvim);
                self.modifier[vop] += sim - sop;
            }
        }
        if let Some(nvip) = next_vip {
            if self.next_left(vom).is_none() {
                self.thread[vom] = Some(nvip);
                self.modifier[vom] += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    /// Unscaled breadth coordinate of every node.
    fn run(mut self) -> Vec<f64> {
        let n = self.snap.len();
        for v in self.snap.post_order() {
            self.first_walk(v);
        }
        self.modifier[n] = -self.prelim[0];
        let mut x = vec![0.0; n];
        for v in 0..n {
            let p = self.parent[v];
            x[v] = self.prelim[v] + self.modifier[p];
            self.modifier[v] += self.modifier[p];
        }
        x
    }
}

/// Breadth positions scaled so the extreme nodes sit half a separation
/// inside `[0, extent]`.
fn tidy_breadth(snap: &Snapshot, extent: f64) -> Vec<f64> {
    let raw = Walker::new(snap).run();
    let mut left = 0;
    let mut right = 0;
    for (i, &x) in raw.iter().enumerate() {
        if x < raw[left] {
            left = i;
        }
        if x > raw[right] {
            right = i;
        }
    }
    let s = if left == right {
        1.0
    } else {
        separation(snap, left, right) / 2.0
    };
    let tx = s - raw[left];
    let kx = extent / (raw[right] + s + tx);
    raw.iter().map(|&x| (x + tx) * kx).collect()
}

// =============================================================================
// Transitions
// =============================================================================

/// Enter/update/exit partition between two renders of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeTransition {
    /// Node that triggered the change.
    pub origin: String,
    /// Ids present only in the new render.
    pub entering: Vec<String>,
    /// Ids present in both.
    pub updating: Vec<String>,
    /// Ids present only in the old render.
    pub exiting: Vec<String>,
    /// Where entering nodes start: the origin's old position.
    pub enter_from: Point,
    /// Where exiting nodes end: the origin's new position.
    pub exit_to: Point,
}

impl TreeGeometry {
    /// Position of a node by id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Point> {
        self.nodes
            .iter()
            .find(|n| n.label.id == id)
            .map(|n| n.position)
    }

    /// Transition from `previous` to `self` after toggling `origin`.
    ///
    /// If the origin is missing from one render, its position in the other
    /// is used for both anchors.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if neither render contains the
    /// origin.
    pub fn transition(
        &self,
        previous: &Self,
        origin: &str,
    ) -> Result<TreeTransition, LayoutError> {
        let old = previous.position(origin);
        let new = self.position(origin);
        let (enter_from, exit_to) = match (old, new) {
            (Some(o), Some(n)) => (o, n),
            (Some(o), None) => (o, o),
            (None, Some(n)) => (n, n),
            (None, None) => return Err(LayoutError::UnknownNode(origin.to_string())),
        };

        let before: HashSet<&str> = previous.nodes.iter().map(|n| n.label.id.as_str()).collect();
        let after: HashSet<&str> = self.nodes.iter().map(|n| n.label.id.as_str()).collect();
        let mut transition = TreeTransition {
            origin: origin.to_string(),
            entering: Vec::new(),
            updating: Vec::new(),
            exiting: Vec::new(),
            enter_from,
            exit_to,
        };
        for node in &self.nodes {
            let id = node.label.id.clone();
            if before.contains(id.as_str()) {
                transition.updating.push(id);
            } else {
                transition.entering.push(id);
            }
        }
        transition.exiting = previous
            .nodes
            .iter()
            .filter(|n| !after.contains(n.label.id.as_str()))
            .map(|n| n.label.id.clone())
            .collect();
        Ok(transition)
    }
}

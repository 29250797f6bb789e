//! Circle packing.
//!
//! Leaves get radius `√value`. Each parent packs its children with the
//! front-chain algorithm (Wang et al.) and takes the minimal enclosing
//! circle of the result (Welzl, over a deterministic shuffle). Padding is
//! applied in a second pass scaled to the final fit, then the whole pack is
//! scaled to the canvas.

use crate::adapter::LayoutAdapter;
use crate::error::LayoutError;
use crate::geometry::{Geometry, PackCircle, PackGeometry};
use crate::kind::LayoutKind;
use crate::random::LayoutRng;
use crate::settings::{ColorScheme, PackSettings};
use crate::snapshot::Snapshot;
use canopy_core::{Circle, Color, Hierarchy, OrdinalScale, SequentialScale, Size};

/// Height at the dark end of the sequential ramp.
const SEQUENTIAL_DOMAIN_START: f64 = 8.0;

/// Circle pack adapter, plain or colored.
#[derive(Debug, Clone, Copy)]
pub struct PackLayout {
    canvas: Size,
    settings: PackSettings,
    colored: bool,
}

impl PackLayout {
    /// Uncolored pack.
    #[must_use]
    pub const fn plain(canvas: Size, settings: PackSettings) -> Self {
        Self {
            canvas,
            settings,
            colored: false,
        }
    }

    /// Pack filled by `settings.scheme`.
    #[must_use]
    pub const fn colored(canvas: Size, settings: PackSettings) -> Self {
        Self {
            canvas,
            settings,
            colored: true,
        }
    }

    /// Concrete geometry, without the [`Geometry`] wrapper.
    ///
    /// # Errors
    ///
    /// Fails on an empty canvas or a node without a usable weight.
    pub fn compute(&self, tree: &Hierarchy) -> Result<PackGeometry, LayoutError> {
        if !self.canvas.is_drawable() {
            return Err(LayoutError::EmptyCanvas);
        }
        let mut snap = Snapshot::weighted(tree)?;
        snap.sort_by_value();
        let circles = pack(&snap, self.canvas, self.settings.padding.max(0.0));
        let fills = self.colored.then(|| self.fills(tree, &snap));

        let circles = snap
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| PackCircle {
                label: snap.label(tree, i),
                parent: node
                    .parent
                    .map(|p| tree.node(snap.nodes[p].id).id().to_string())
                    .unwrap_or_default(),
                circle: circles[i],
                value: node.value,
                height: node.height,
                leaf: node.children.is_empty(),
                fill: fills.as_ref().map(|f| f[i].to_hex()),
            })
            .collect();

        Ok(PackGeometry {
            circles,
            size: self.canvas,
            colored: self.colored,
        })
    }

    fn fills(&self, tree: &Hierarchy, snap: &Snapshot) -> Vec<Color> {
        match self.settings.scheme {
            ColorScheme::Sequential => {
                let scale = SequentialScale::magma(SEQUENTIAL_DOMAIN_START, 0.0);
                snap.nodes
                    .iter()
                    .map(|n| scale.color(n.height as f64))
                    .collect()
            }
            ColorScheme::Ordinal => {
                let mut palette = OrdinalScale::category10();
                (0..snap.len())
                    .map(|i| {
                        snap.branch(i).map_or(Color::NEUTRAL, |b| {
                            palette.color(tree.node(snap.nodes[b].id).id())
                        })
                    })
                    .collect()
            }
        }
    }
}

impl LayoutAdapter for PackLayout {
    fn kind(&self) -> LayoutKind {
        if self.colored {
            LayoutKind::CirclePackColored
        } else {
            LayoutKind::CirclePack
        }
    }

    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError> {
        self.compute(tree).map(Geometry::Pack)
    }
}

/// Absolute circles for every snapshot node.
fn pack(snap: &Snapshot, canvas: Size, padding: f64) -> Vec<Circle> {
    let mut circles: Vec<Circle> = snap
        .nodes
        .iter()
        .map(|n| {
            let r = if n.children.is_empty() {
                n.value.max(0.0).sqrt()
            } else {
                0.0
            };
            Circle::new(0.0, 0.0, r)
        })
        .collect();
    let mut random = LayoutRng::new();
    pack_children(snap, &mut circles, 0.0, &mut random);
    let side = canvas.min_side();
    if padding > 0.0 {
        let k = circles[0].r / side;
        pack_children(snap, &mut circles, padding * k, &mut random);
    }

    let k = if circles[0].r > 0.0 {
        side / (2.0 * circles[0].r)
    } else {
        1.0
    };
    for (i, node) in snap.nodes.iter().enumerate() {
        circles[i].r *= k;
        match node.parent {
            Some(p) => {
                circles[i].x = circles[p].x + k * circles[i].x;
                circles[i].y = circles[p].y + k * circles[i].y;
            }
            None => {
                circles[i].x = canvas.width / 2.0;
                circles[i].y = canvas.height / 2.0;
            }
        }
    }
    circles
}

/// One bottom-up pass: pack each parent's children around its origin.
fn pack_children(snap: &Snapshot, circles: &mut [Circle], pad: f64, random: &mut LayoutRng) {
    for i in (0..snap.len()).rev() {
        let children = &snap.nodes[i].children;
        if children.is_empty() {
            continue;
        }
        let mut group: Vec<Circle> = children
            .iter()
            .map(|&c| Circle::new(0.0, 0.0, circles[c].r + pad))
            .collect();
        let r = pack_siblings(&mut group, random);
        for (&c, placed) in children.iter().zip(&group) {
            circles[c] = Circle::new(placed.x, placed.y, placed.r - pad);
        }
        circles[i].r = r + pad;
    }
}

// =============================================================================
// Sibling packing
// =============================================================================

/// Place `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, c: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            Circle::new(b.x - x * dx - y * dy, b.y - x * dy + y * dx, c.r)
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            Circle::new(a.x + x * dx - y * dy, a.y + x * dy + y * dx, c.r)
        }
    } else {
        Circle::new(a.x + c.r, a.y, c.r)
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of `a` and `b`.
fn score(a: &Circle, b: &Circle) -> f64 {
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Pack `circles` (radii set, positions ignored) around the origin.
///
/// Returns the radius of the enclosing circle; positions are written back
/// relative to its center.
pub(crate) fn pack_siblings(circles: &mut [Circle], random: &mut LayoutRng) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }
    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }
    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }
    circles[2] = place(circles[1], circles[0], circles[2]);

    // Front chain as a doubly linked ring over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;
    let (mut a, mut b) = (0usize, 1usize);

    let mut i = 3;
    'pack: while i < n {
        circles[i] = place(circles[a], circles[b], circles[i]);
        let c = i;

        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].r, circles[a].r);
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;

        let mut best = score(&circles[a], &circles[next[a]]);
        let mut node = next[c];
        while node != c {
            let s = score(&circles[node], &circles[next[node]]);
            if s < best {
                a = node;
                best = s;
            }
            node = next[node];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut node = next[b];
    while node != b {
        chain.push(circles[node]);
        node = next[node];
    }
    let e = enclose(&chain, random);
    for c in circles.iter_mut() {
        c.x -= e.x;
        c.y -= e.y;
    }
    e.r
}

// =============================================================================
// Minimal enclosing circle
// =============================================================================

/// Smallest circle containing every circle in `circles`.
pub(crate) fn enclose(circles: &[Circle], random: &mut LayoutRng) -> Circle {
    let mut shuffled = circles.to_vec();
    random.shuffle(&mut shuffled);

    let mut basis: Vec<Circle> = Vec::new();
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < shuffled.len() {
        let p = shuffled[i];
        if e.is_some_and(|e| encloses_weak(&e, &p)) {
            i += 1;
            continue;
        }
        match extend_basis(&basis, p) {
            Some(next) => {
                basis = next;
                e = Some(enclose_basis(&basis));
                i = 0;
            }
            None => {
                tracing::warn!(circles = circles.len(), "degenerate enclosing basis");
                return bounding_circle(circles);
            }
        }
    }
    e.unwrap_or_else(|| bounding_circle(circles))
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }
    for &bi in basis {
        if encloses_not(&p, &bi) && encloses_weak_all(&enclose2(&bi, &p), basis) {
            return Some(vec![bi, p]);
        }
    }
    for i in 0..basis.len().saturating_sub(1) {
        for j in i + 1..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose2(&bi, &bj), &p)
                && encloses_not(&enclose2(&bi, &p), &bj)
                && encloses_not(&enclose2(&bj, &p), &bi)
                && encloses_weak_all(&enclose3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }
    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose2(a, b),
        [a, b, c] => enclose3(a, b, c),
        _ => Circle::new(0.0, 0.0, 0.0),
    }
}

fn enclose2(a: &Circle, b: &Circle) -> Circle {
    let (x21, y21, r21) = (b.x - a.x, b.y - a.y, b.r - a.r);
    let l = x21.hypot(y21);
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let a2 = x1 - b.x;
    let a3 = x1 - c.x;
    let b2 = y1 - b.y;
    let b3 = y1 - c.y;
    let c2 = b.r - r1;
    let c3 = c.r - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

/// Loose fallback: centroid plus the farthest reach.
fn bounding_circle(circles: &[Circle]) -> Circle {
    let n = circles.len().max(1) as f64;
    let cx = circles.iter().map(|c| c.x).sum::<f64>() / n;
    let cy = circles.iter().map(|c| c.y).sum::<f64>() / n;
    let r = circles
        .iter()
        .map(|c| (c.x - cx).hypot(c.y - cy) + c.r)
        .fold(0.0, f64::max);
    Circle::new(cx, cy, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::parse_row;

    const EPS: f64 = 1e-6;

    fn tree() -> Hierarchy {
        let rows = [
            ["1", "organization", "", "", "", "Acme", ""],
            ["2", "folder", "", "", "1", "Prod", ""],
            ["3", "project", "", "", "2", "web", ""],
            ["4", "project", "", "", "2", "api", ""],
            ["5", "project", "", "", "2", "db", ""],
            ["6", "project", "", "", "1", "ops", ""],
            ["7", "bucket", "", "", "3", "logs", ""],
            ["8", "bucket", "", "", "3", "assets", ""],
            ["9", "instance", "", "", "1", "bastion", ""],
        ];
        Hierarchy::from_records(rows.iter().map(|r| parse_row(r).unwrap()).collect()).unwrap()
    }

    fn canvas() -> Size {
        Size::new(800.0, 600.0)
    }

    #[test]
    fn test_pack_siblings_no_overlap() {
        let mut circles: Vec<Circle> = [5.0, 3.0, 8.0, 1.0, 4.0, 4.0, 2.0, 6.0]
            .iter()
            .map(|&r| Circle::new(0.0, 0.0, r))
            .collect();
        let r = pack_siblings(&mut circles, &mut LayoutRng::new());
        let outer = Circle::new(0.0, 0.0, r);
        for (i, a) in circles.iter().enumerate() {
            assert!(outer.encloses(a, EPS), "circle {i} escapes");
            for b in &circles[i + 1..] {
                assert!(!a.overlaps(b, EPS));
            }
        }
    }

    #[test]
    fn test_two_siblings_touch() {
        let mut circles = vec![Circle::new(0.0, 0.0, 2.0), Circle::new(0.0, 0.0, 3.0)];
        let r = pack_siblings(&mut circles, &mut LayoutRng::new());
        assert!((r - 5.0).abs() < 1e-12);
        assert!((circles[0].x + 3.0).abs() < 1e-12);
        assert!((circles[1].x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_enclose_two_and_three() {
        let mut random = LayoutRng::new();
        let e = enclose(
            &[Circle::new(-1.0, 0.0, 1.0), Circle::new(1.0, 0.0, 1.0)],
            &mut random,
        );
        assert!(e.x.abs() < 1e-9 && (e.r - 2.0).abs() < 1e-9);

        let three = [
            Circle::new(0.0, 0.0, 1.0),
            Circle::new(4.0, 0.0, 1.0),
            Circle::new(2.0, 3.0, 1.0),
        ];
        let e = enclose(&three, &mut random);
        for c in &three {
            assert!(e.encloses(c, EPS));
        }
        assert!(e.r < bounding_circle(&three).r + EPS);
    }

    #[test]
    fn test_root_fills_canvas() {
        let g = PackLayout::plain(canvas(), PackSettings::default())
            .compute(&tree())
            .unwrap();
        let root = &g.circles[0];
        assert_eq!(root.label.id, "1");
        assert!((root.circle.r - 300.0).abs() < 1e-9);
        assert!((root.circle.x - 400.0).abs() < 1e-9);
        assert!((root.circle.y - 300.0).abs() < 1e-9);
        assert!(g.circles.iter().all(|c| c.fill.is_none()));
    }

    #[test]
    fn test_children_nested_and_disjoint() {
        let g = PackLayout::plain(canvas(), PackSettings::default())
            .compute(&tree())
            .unwrap();
        let by_id = |id: &str| g.circles.iter().find(|c| c.label.id == id).unwrap();
        for c in &g.circles[1..] {
            let parent = by_id(&c.parent);
            assert!(parent.circle.encloses(&c.circle, EPS), "{} escapes", c.label.id);
            for s in g.circles.iter().filter(|s| s.parent == c.parent && s.label.id != c.label.id) {
                assert!(!c.circle.overlaps(&s.circle, EPS));
            }
        }
    }

    #[test]
    fn test_padding_keeps_gap() {
        let g = PackLayout::plain(canvas(), PackSettings::default())
            .compute(&tree())
            .unwrap();
        let a = g.circles.iter().find(|c| c.label.id == "7").unwrap();
        let b = g.circles.iter().find(|c| c.label.id == "8").unwrap();
        let gap = a.circle.center().distance(&b.circle.center()) - a.circle.r - b.circle.r;
        assert!(gap > 1.0);
    }

    #[test]
    fn test_leaf_area_tracks_value() {
        let settings = PackSettings {
            padding: 0.0,
            ..PackSettings::default()
        };
        let g = PackLayout::plain(canvas(), settings).compute(&tree()).unwrap();
        let leaves: Vec<_> = g.circles.iter().filter(|c| c.leaf).collect();
        let ratio = leaves[0].circle.r.powi(2) / leaves[0].value;
        for l in &leaves {
            assert!((l.circle.r.powi(2) / l.value - ratio).abs() < 1e-9 * ratio.max(1.0));
        }
    }

    #[test]
    fn test_deterministic() {
        let l = PackLayout::colored(canvas(), PackSettings::default());
        assert_eq!(l.compute(&tree()).unwrap(), l.compute(&tree()).unwrap());
    }

    #[test]
    fn test_sequential_colors_by_height() {
        let g = PackLayout::colored(canvas(), PackSettings::default())
            .compute(&tree())
            .unwrap();
        let fill = |id: &str| {
            g.circles
                .iter()
                .find(|c| c.label.id == id)
                .and_then(|c| c.fill.clone())
                .unwrap()
        };
        assert_eq!(fill("7"), fill("9"));
        assert_ne!(fill("1"), fill("9"));
        assert!(g.colored);
    }

    #[test]
    fn test_ordinal_colors_by_branch() {
        let settings = PackSettings {
            scheme: ColorScheme::Ordinal,
            ..PackSettings::default()
        };
        let g = PackLayout::colored(canvas(), settings).compute(&tree()).unwrap();
        let fill = |id: &str| {
            g.circles
                .iter()
                .find(|c| c.label.id == id)
                .and_then(|c| c.fill.clone())
                .unwrap()
        };
        assert_eq!(fill("7"), fill("2"));
        assert_ne!(fill("6"), fill("2"));
        assert_eq!(fill("1"), Color::NEUTRAL.to_hex());
    }

    #[test]
    fn test_single_node() {
        let t = Hierarchy::from_records(vec![
            parse_row(&["1", "organization", "", "", "", "Acme", ""]).unwrap(),
        ])
        .unwrap();
        let g = PackLayout::plain(canvas(), PackSettings::default()).compute(&t).unwrap();
        assert!((g.circles[0].circle.r - 300.0).abs() < 1e-9);
    }
}

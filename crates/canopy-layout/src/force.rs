//! Force-directed graph.
//!
//! A velocity-Verlet simulation with link, many-body and centering forces.
//! Unlike every other layout it draws the whole tree, hidden subtrees
//! included. The simulation owns only plain vectors, so it can be dropped
//! at any tick.

use crate::adapter::LayoutAdapter;
use crate::error::LayoutError;
use crate::geometry::{ForceGeometry, ForceLink, ForceNode, Geometry, NodeLabel};
use crate::kind::LayoutKind;
use crate::random::LayoutRng;
use crate::settings::ForceSettings;
use canopy_core::{Hierarchy, NodeId, Point};
use std::collections::HashMap;
use std::f64::consts::PI;

const INITIAL_RADIUS: f64 = 10.0;
/// Ticks for alpha to fall from 1 to `alpha_min` with no target.
const DECAY_TICKS: f64 = 300.0;
const DISTANCE_MIN2: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Spring {
    source: usize,
    target: usize,
    /// Share of the correction applied to the target.
    bias: f64,
}

/// A running force simulation over every node of a tree.
#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<NodeId>,
    index: HashMap<String, usize>,
    position: Vec<Point>,
    velocity: Vec<Point>,
    pin: Vec<Option<Point>>,
    springs: Vec<Spring>,
    settings: ForceSettings,
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    ticks: usize,
    random: LayoutRng,
}

impl Simulation {
    /// Place every node of `tree` on a phyllotaxis spiral, at rest.
    #[must_use]
    pub fn new(tree: &Hierarchy, settings: ForceSettings) -> Self {
        let nodes = tree.all_descendants();
        let slot: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| (tree.node(n).id().to_string(), i))
            .collect();

        let angle = PI * (3.0 - 5f64.sqrt());
        let position = (0..nodes.len())
            .map(|i| {
                let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let a = i as f64 * angle;
                Point::new(r * a.cos(), r * a.sin())
            })
            .collect();

        let pairs: Vec<(usize, usize)> = tree
            .all_links()
            .into_iter()
            .map(|(p, c)| (slot[&p], slot[&c]))
            .collect();
        let mut degree = vec![0usize; nodes.len()];
        for &(s, t) in &pairs {
            degree[s] += 1;
            degree[t] += 1;
        }
        let springs = pairs
            .into_iter()
            .map(|(source, target)| Spring {
                source,
                target,
                bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
            })
            .collect();

        Self {
            velocity: vec![Point::ORIGIN; nodes.len()],
            pin: vec![None; nodes.len()],
            nodes,
            index,
            position,
            springs,
            alpha_decay: 1.0 - settings.alpha_min.powf(1.0 / DECAY_TICKS),
            settings,
            alpha: 1.0,
            alpha_target: 0.0,
            ticks: 0,
            random: LayoutRng::new(),
        }
    }

    /// Number of simulated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there is nothing to simulate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current cooling parameter.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// True once alpha has cooled below `alpha_min`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.alpha < self.settings.alpha_min
    }

    /// Current position of a node.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Point> {
        self.index.get(id).map(|&i| self.position[i])
    }

    /// Advance one step.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.apply_links();
        self.apply_charge();
        self.apply_centering();

        let keep = 1.0 - self.settings.velocity_decay;
        for i in 0..self.nodes.len() {
            if let Some(pin) = self.pin[i] {
                self.position[i] = pin;
                self.velocity[i] = Point::ORIGIN;
            } else {
                self.velocity[i] = Point::new(self.velocity[i].x * keep, self.velocity[i].y * keep);
                self.position[i] = self.position[i] + self.velocity[i];
            }
        }
        self.ticks += 1;
    }

    /// Tick until settled or `max_ticks` total ticks have run.
    ///
    /// Returns the number of ticks this call ran.
    pub fn run_to_settle(&mut self) -> usize {
        let start = self.ticks;
        while !self.is_settled() && self.ticks < self.settings.max_ticks {
            self.tick();
        }
        if !self.is_settled() {
            tracing::warn!(ticks = self.ticks, alpha = self.alpha, "force simulation hit tick cap");
        }
        self.ticks - start
    }

    /// Begin dragging: reheat and pin the node where it is.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] for an unknown id.
    pub fn drag_start(&mut self, id: &str) -> Result<(), LayoutError> {
        let i = self.slot(id)?;
        self.alpha_target = self.settings.drag_alpha_target;
        self.pin[i] = Some(self.position[i]);
        Ok(())
    }

    /// Move a dragged node's pin.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] for an unknown id.
    pub fn drag_to(&mut self, id: &str, point: Point) -> Result<(), LayoutError> {
        let i = self.slot(id)?;
        self.pin[i] = Some(point);
        self.position[i] = point;
        self.velocity[i] = Point::ORIGIN;
        Ok(())
    }

    /// Release a dragged node and let the simulation cool.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] for an unknown id.
    pub fn drag_end(&mut self, id: &str) -> Result<(), LayoutError> {
        let i = self.slot(id)?;
        self.alpha_target = 0.0;
        self.pin[i] = None;
        Ok(())
    }

    /// Snapshot the current positions.
    #[must_use]
    pub fn geometry(&self, tree: &Hierarchy) -> ForceGeometry {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| ForceNode {
                label: NodeLabel::of(tree, n),
                position: self.position[i],
                has_children: tree.node(n).has_children(),
                pinned: self.pin[i].is_some(),
            })
            .collect::<Vec<_>>();
        let links = self
            .springs
            .iter()
            .map(|s| ForceLink {
                source: nodes[s.source].label.id.clone(),
                target: nodes[s.target].label.id.clone(),
                start: self.position[s.source],
                end: self.position[s.target],
            })
            .collect();
        ForceGeometry {
            nodes,
            links,
            ticks: self.ticks,
            alpha: self.alpha,
        }
    }

    fn slot(&self, id: &str) -> Result<usize, LayoutError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownNode(id.to_string()))
    }

    fn apply_links(&mut self) {
        let strength = self.settings.link_strength * self.alpha;
        for k in 0..self.springs.len() {
            let Spring {
                source,
                target,
                bias,
            } = self.springs[k];
            let next_source = self.position[source] + self.velocity[source];
            let next_target = self.position[target] + self.velocity[target];
            let mut x = next_target.x - next_source.x;
            if x == 0.0 {
                x = self.random.jiggle();
            }
            let mut y = next_target.y - next_source.y;
            if y == 0.0 {
                y = self.random.jiggle();
            }
            let l = x.hypot(y);
            let scale = (l - self.settings.link_distance) / l * strength;
            let (x, y) = (x * scale, y * scale);
            self.velocity[target].x -= x * bias;
            self.velocity[target].y -= y * bias;
            self.velocity[source].x += x * (1.0 - bias);
            self.velocity[source].y += y * (1.0 - bias);
        }
    }

    /// Exact pairwise many-body force.
    fn apply_charge(&mut self) {
        let strength = self.settings.charge * self.alpha;
        let n = self.nodes.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.position[j].x - self.position[i].x;
                let mut y = self.position[j].y - self.position[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.random.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.random.jiggle();
                    l += y * y;
                }
                if l < DISTANCE_MIN2 {
                    l = (DISTANCE_MIN2 * l).sqrt();
                }
                let w = strength / l;
                self.velocity[i].x += x * w;
                self.velocity[i].y += y * w;
            }
        }
    }

    fn apply_centering(&mut self) {
        let k = self.settings.center_strength * self.alpha;
        for i in 0..self.nodes.len() {
            self.velocity[i].x -= self.position[i].x * k;
            self.velocity[i].y -= self.position[i].y * k;
        }
    }
}

/// Force graph adapter: runs a fresh simulation to rest.
#[derive(Debug, Clone, Copy)]
pub struct ForceLayout {
    settings: ForceSettings,
}

impl ForceLayout {
    /// Adapter with the given forces.
    #[must_use]
    pub const fn new(settings: ForceSettings) -> Self {
        Self { settings }
    }

    /// A simulation ready to tick, for interactive use.
    #[must_use]
    pub fn simulation(&self, tree: &Hierarchy) -> Simulation {
        Simulation::new(tree, self.settings)
    }
}

impl LayoutAdapter for ForceLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::ForceGraph
    }

    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError> {
        let mut sim = self.simulation(tree);
        let ticks = sim.run_to_settle();
        tracing::debug!(ticks, nodes = sim.len(), "force simulation settled");
        Ok(Geometry::Force(sim.geometry(tree)))
    }
}

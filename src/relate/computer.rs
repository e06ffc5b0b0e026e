use geo::Geometry;
use tracing::debug;

use geograph::{EdgeId, Location};

use crate::algorithm::{BoundaryNodeRule, PointLocator};
use crate::config::TopologyConfig;
use crate::error::ModelError;
use crate::noding::{IntersectionAdder, Noder};
use crate::relate::edge_end::edge_ends;
use crate::relate::geometry_graph::GeometryGraph;
use crate::relate::matrix::{Dimension, IntersectionMatrix};
use crate::relate::node_graph::{update_im_from_label, RelateNodeGraph};
use crate::relate::Phase;

/// Computes the intersection matrix of two geometries one phase at a time.
///
/// The phases must run in order; [`RelateComputer::compute`] runs whatever
/// is left.
#[derive(Debug)]
pub struct RelateComputer<'a> {
    arg: [GeometryGraph<'a>; 2],
    nodes: RelateNodeGraph,
    isolated_edges: Vec<(usize, EdgeId)>,
    noder: Noder,
    locator: PointLocator,
    im: IntersectionMatrix,
    cross: IntersectionAdder,
    disjoint: bool,
    phase: Phase,
}

impl<'a> RelateComputer<'a> {
    pub fn new(a: &'a Geometry<f64>, b: &'a Geometry<f64>, config: &TopologyConfig) -> Result<Self, ModelError> {
        let rule = config.boundary_node_rule;
        Ok(Self {
            arg: [GeometryGraph::new(0, a, rule)?, GeometryGraph::new(1, b, rule)?],
            nodes: RelateNodeGraph::new(),
            isolated_edges: Vec::new(),
            noder: Noder::new(config)?,
            locator: PointLocator::new(rule),
            im: IntersectionMatrix::new(),
            cross: IntersectionAdder::default(),
            disjoint: false,
            phase: Phase::Unbuilt,
        })
    }

    #[inline] pub fn phase(&self) -> Phase { self.phase }

    /// The matrix as computed so far.
    #[inline] pub fn matrix(&self) -> &IntersectionMatrix { &self.im }

    #[inline] pub fn node_graph(&self) -> &RelateNodeGraph { &self.nodes }

    #[inline] fn rule(&self) -> BoundaryNodeRule { self.arg[0].rule() }

    fn enter(&mut self, expected: Phase) -> Result<(), ModelError> {
        if self.phase != expected {
            return Err(ModelError::PhaseOrder { expected, found: self.phase });
        }
        Ok(())
    }

    /// Node both arguments against themselves and each other and add a node
    /// for every intersection.  Disjoint envelopes settle the matrix here.
    pub fn compute_nodes(&mut self) -> Result<(), ModelError> {
        self.enter(Phase::Unbuilt)?;
        self.im.set(Location::Exterior, Location::Exterior, Dimension::Area);

        if !self.arg[0].bounds().intersects(&self.arg[1].bounds()) {
            self.disjoint = true;
            self.compute_disjoint_im();
            self.phase = Phase::NodesComputed;
            debug!(im = %self.im, "envelopes are disjoint");
            return Ok(());
        }

        let [a, b] = &mut self.arg;
        a.compute_self_nodes(&self.noder, false)?;
        b.compute_self_nodes(&self.noder, false)?;
        self.cross = a.compute_edge_intersections(b, &self.noder, false)?;

        for gg in &self.arg {
            let arg = gg.arg_index();
            for edge in gg.edges() {
                let loc = edge.label().location(arg);
                for ei in edge.intersections().iter() {
                    let node = self.nodes.add_node(ei.coord);
                    if loc == Some(Location::Boundary) {
                        node.set_label_boundary(arg);
                    } else if node.label.is_null(arg) {
                        node.label.set_location(arg, Some(Location::Interior));
                    }
                }
            }
        }
        self.phase = Phase::NodesComputed;
        debug!(
            nodes = self.nodes.len(),
            tests = self.cross.num_tests(),
            proper = self.cross.has_proper_intersection(),
            "computed intersection nodes"
        );
        Ok(())
    }

    fn compute_disjoint_im(&mut self) {
        let [a, b] = &self.arg;
        if a.dimension() != Dimension::Empty {
            self.im.set(Location::Interior, Location::Exterior, a.dimension());
            self.im.set(Location::Boundary, Location::Exterior, boundary_dimension(a));
        }
        if b.dimension() != Dimension::Empty {
            self.im.set(Location::Exterior, Location::Interior, b.dimension());
            self.im.set(Location::Exterior, Location::Boundary, boundary_dimension(b));
        }
    }

    /// Copy the nodes of both geometry graphs with their labels, locate the
    /// nodes only one argument knows in the other, and apply what proper
    /// intersections alone imply.
    pub fn copy_labels(&mut self) -> Result<(), ModelError> {
        self.enter(Phase::NodesComputed)?;
        if !self.disjoint {
            for gg in &self.arg {
                let arg = gg.arg_index();
                for node in gg.graph().nodes() {
                    let loc = node.label.location(arg);
                    self.nodes.add_node(node.coord).label.set_location(arg, loc);
                }
            }
            self.label_isolated_nodes();
            self.compute_proper_intersection_im()?;
        }
        self.phase = Phase::LabelsCopied;
        Ok(())
    }

    fn label_isolated_nodes(&mut self) {
        let geoms = [self.arg[0].geometry(), self.arg[1].geometry()];
        for node in self.nodes.nodes_mut().iter_mut().filter(|n| n.is_isolated()) {
            let target = if node.label.is_null(0) { 0 } else { 1 };
            let loc = self.locator.locate(node.coord, geoms[target]);
            node.label.set_all(target, loc);
        }
    }

    fn compute_proper_intersection_im(&mut self) -> Result<(), ModelError> {
        let (dim_a, dim_b) = (self.arg[0].dimension(), self.arg[1].dimension());
        let has_proper = self.cross.has_proper_intersection();
        let has_proper_interior = self.cross.has_proper_interior_intersection();

        // A proper crossing of two boundaries puts every part of each area
        // on both sides of the other.
        match (dim_a, dim_b) {
            (Dimension::Area, Dimension::Area) => {
                if has_proper {
                    self.im.set_at_least_pattern("212101212")?;
                }
            }
            (Dimension::Area, Dimension::Line) => {
                if has_proper {
                    self.im.set_at_least_pattern("FFF0FFFF2")?;
                }
                if has_proper_interior {
                    self.im.set_at_least_pattern("1FFFFF1FF")?;
                }
            }
            (Dimension::Line, Dimension::Area) => {
                if has_proper {
                    self.im.set_at_least_pattern("F0FFFFFF2")?;
                }
                if has_proper_interior {
                    self.im.set_at_least_pattern("1F1FFFFFF")?;
                }
            }
            (Dimension::Line, Dimension::Line) => {
                if has_proper_interior {
                    self.im.set_at_least_pattern("0FFFFFFFF")?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Build the edge ends of every noded edge, bundle them at their nodes
    /// and label the bundles; then label the edges that meet nothing of the
    /// other argument.
    pub fn link_edge_ends(&mut self) -> Result<(), ModelError> {
        self.enter(Phase::LabelsCopied)?;
        if !self.disjoint {
            let mut ends = Vec::new();
            for gg in &mut self.arg {
                let arg = gg.arg_index();
                for edge in gg.edges_mut() {
                    edge.add_endpoint_intersections();
                }
                for (i, edge) in gg.edges().iter().enumerate() {
                    edge_ends(arg, EdgeId(i), edge, &mut ends)?;
                }
            }
            self.nodes.insert_edge_ends(ends);

            let geoms = [self.arg[0].geometry(), self.arg[1].geometry()];
            let rule = self.rule();
            for node in self.nodes.nodes_mut() {
                node.compute_labelling(geoms, rule)?;
            }
            self.label_isolated_edges(0, 1);
            self.label_isolated_edges(1, 0);
        }
        self.phase = Phase::EdgeEndsLinked;
        Ok(())
    }

    fn label_isolated_edges(&mut self, this: usize, target: usize) {
        let target_geom = self.arg[target].geometry();
        let target_dim = self.arg[target].dimension();
        let locator = self.locator;
        let gg = &mut self.arg[this];
        for i in 0..gg.edges().len() {
            let edge = gg.edge_mut(EdgeId(i));
            if !edge.is_isolated() {
                continue;
            }
            let loc = if target_dim > Dimension::Point {
                locator.locate(edge.coord(0), target_geom)
            } else {
                Location::Exterior
            };
            edge.label_mut().set_all(target, loc);
            self.isolated_edges.push((this, EdgeId(i)));
        }
    }

    /// Assemble the matrix from the isolated edges, the node labels and the
    /// bundle labels.
    pub fn compute_matrix(&mut self) -> Result<&IntersectionMatrix, ModelError> {
        self.enter(Phase::EdgeEndsLinked)?;
        if !self.disjoint {
            for &(arg, id) in &self.isolated_edges {
                update_im_from_label(self.arg[arg].graph().edge(id).label(), &mut self.im);
            }
            for node in self.nodes.nodes() {
                node.update_im(&mut self.im);
                node.update_im_from_edges(&mut self.im);
            }
        }
        self.phase = Phase::MatrixComputed;
        debug!(im = %self.im, "computed intersection matrix");
        Ok(&self.im)
    }

    /// Run the remaining phases and return the matrix.
    pub fn compute(mut self) -> Result<IntersectionMatrix, ModelError> {
        if self.phase == Phase::Unbuilt {
            self.compute_nodes()?;
        }
        if self.phase == Phase::NodesComputed {
            self.copy_labels()?;
        }
        if self.phase == Phase::LabelsCopied {
            self.link_edge_ends()?;
        }
        if self.phase == Phase::EdgeEndsLinked {
            self.compute_matrix()?;
        }
        Ok(self.im)
    }
}

/// Dimension of the boundary of a non-empty geometry, as it enters the
/// matrix of disjoint geometries.
fn boundary_dimension(gg: &GeometryGraph<'_>) -> Dimension {
    if !gg.has_boundary() {
        return Dimension::Empty;
    }
    match gg.dimension() {
        Dimension::Line => Dimension::Point,
        Dimension::Area => Dimension::Line,
        _ => Dimension::Empty,
    }
}

/// Computes DE-9IM intersection matrices.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelateEngine {
    config: TopologyConfig,
}

impl RelateEngine {
    pub fn new(config: TopologyConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline] pub fn config(&self) -> &TopologyConfig { &self.config }

    /// The intersection matrix of `a` and `b`.
    pub fn relate(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> Result<IntersectionMatrix, ModelError> {
        RelateComputer::new(a, b, &self.config)?.compute()
    }

    /// `true` if the matrix of `a` and `b` matches `pattern`.
    pub fn relate_pattern(&self, a: &Geometry<f64>, b: &Geometry<f64>, pattern: &str) -> Result<bool, ModelError> {
        self.relate(a, b)?.matches(pattern)
    }
}

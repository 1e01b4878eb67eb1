//! Stand-alone routing operations on existing members.
//!
//! Every operation resolves and computes its full result on copies first,
//! then writes the changed components back into the assembly, so a failed
//! call leaves the assembly as it was.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};
use pipe_place::{Assembly, PlacedComponent, PlacementEngine};
use pipe_types::geom::is_orthogonal;
use pipe_types::{ComponentFamily, Line3, PipeError, PipeResult, Plane};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::LineParams;

/// A straight edge in world coordinates, such as a sketch line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineEdge {
    /// First point.
    pub start: Point3<f64>,
    /// Last point.
    pub end: Point3<f64>,
}

impl LineEdge {
    /// Creates an edge.
    #[must_use]
    pub const fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Midpoint of the edge.
    #[must_use]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }
}

/// Something with a straight centerline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Thing {
    /// A straight member (pipe or beam) in the assembly, by ID.
    Member(String),
    /// A bare edge.
    Edge(LineEdge),
}

impl Thing {
    /// A member reference.
    #[must_use]
    pub fn member(id: impl Into<String>) -> Self {
        Self::Member(id.into())
    }
}

impl From<LineEdge> for Thing {
    fn from(edge: LineEdge) -> Self {
        Self::Edge(edge)
    }
}

/// Outcome of merging branches into a header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderReport {
    /// Header ID.
    pub header: String,
    /// Branches trimmed onto the header and merged into it.
    pub connected: Vec<String>,
    /// Branches that could not be connected and were left untouched.
    pub excluded: Vec<String>,
}

/// Routing operations between members.
///
/// # Example
///
/// ```
/// use pipe_fittings::PipeDims;
/// use pipe_place::{Assembly, PlacedComponent, PlacementEngine};
/// use pipe_route::{IntersectionRouter, LineParams, Thing};
/// use nalgebra::{Point3, Vector3};
///
/// let engine = PlacementEngine::default();
/// let mut doc = Assembly::new("plant");
/// let a = engine
///     .place_at("a", PipeDims::default().into(), Point3::new(-1000.0, 0.0, 0.0), Vector3::x())
///     .unwrap();
/// let b = engine
///     .place_at("b", PipeDims::default().into(), Point3::origin(), Vector3::y())
///     .unwrap();
/// doc.add(a).unwrap();
/// doc.add(b).unwrap();
///
/// let router = IntersectionRouter::default();
/// let elbow = router
///     .bend_between(&mut doc, &Thing::member("a"), &Thing::member("b"), &LineParams::default())
///     .unwrap();
/// assert_eq!(doc.get(&elbow).unwrap().spec().bend_angle().map(f64::round), Some(90.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionRouter {
    engine: PlacementEngine,
}

impl IntersectionRouter {
    /// Creates a router using `engine` for placement.
    #[must_use]
    pub const fn new(engine: PlacementEngine) -> Self {
        Self { engine }
    }

    /// Get the placement engine.
    #[must_use]
    pub const fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    // =========================================================================
    // Bends and intersections
    // =========================================================================

    /// Inserts an elbow at the intersection of two centerlines.
    ///
    /// Each thing's outward direction runs from the intersection to its
    /// midpoint; the bend angle is `180 - angle(dir1, dir2)` degrees. Members
    /// among the things are then extended or trimmed to the elbow port on
    /// their own axis. Returns the new elbow's ID.
    ///
    /// # Errors
    ///
    /// - [`PipeError::NonSolvableIntersection`] for parallel or skew
    ///   centerlines
    /// - [`PipeError::GeometricDegeneracy`] when a midpoint lies on the
    ///   intersection or the things are collinear
    /// - [`PipeError::InvalidSelection`] if a member is missing or not
    ///   straight
    pub fn bend_between(
        &self,
        doc: &mut Assembly,
        thing1: &Thing,
        thing2: &Thing,
        params: &LineParams,
    ) -> PipeResult<String> {
        if let (Thing::Member(a), Thing::Member(b)) = (thing1, thing2)
            && a == b
        {
            return Err(PipeError::invalid_selection(format!(
                "cannot bend '{a}' onto itself"
            )));
        }
        let (line1, mid1) = resolve(doc, thing1)?;
        let (line2, mid2) = resolve(doc, thing2)?;
        let p = self.intersect(&line1, &line2)?;

        let (d1, d2) = (mid1 - p, mid2 - p);
        if d1.norm() < self.engine.tolerances().coincidence
            || d2.norm() < self.engine.tolerances().coincidence
        {
            return Err(PipeError::degenerate(
                "a centerline midpoint lies on the intersection",
            ));
        }
        let angle = PI - d1.angle(&d2);
        if angle.sin().abs() < self.engine.tolerances().parallel {
            return Err(PipeError::degenerate("the things are collinear, no bend"));
        }

        let id = doc.unique_id("Elbow");
        let mut elbow = PlacedComponent::new(id.clone(), params.elbow(angle.to_degrees()).into())?
            .with_rating(params.rating());
        self.engine.place_bend(&mut elbow, &(-d1), &d2, Some(p))?;

        let mut trimmed = Vec::new();
        for thing in [thing1, thing2] {
            if let Thing::Member(member_id) = thing {
                let mut member = straight(doc, member_id)?.clone();
                let port = matching_port(&member, &elbow)?;
                self.engine.trim_to(&mut member, &port)?;
                trimmed.push(member);
            }
        }

        doc.add(elbow)?;
        for member in trimmed {
            debug!(id = member.id(), elbow = %id, "Trimmed member to elbow");
            doc.replace(member)?;
        }
        Ok(id)
    }

    /// Extends or trims the free ends of two members to the intersection of
    /// their centerlines; only the first member when `both` is false.
    /// Returns the intersection point.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::NonSolvableIntersection`] for parallel or skew
    /// members, or the trim error of either member.
    pub fn extend_to_intersection(
        &self,
        doc: &mut Assembly,
        id1: &str,
        id2: &str,
        both: bool,
    ) -> PipeResult<Point3<f64>> {
        let mut first = straight(doc, id1)?.clone();
        let mut second = straight(doc, id2)?.clone();
        let p = self.intersect(&centerline(&first)?, &centerline(&second)?)?;

        self.engine.trim_to(&mut first, &p)?;
        if both {
            self.engine.trim_to(&mut second, &p)?;
            doc.replace(second)?;
        }
        doc.replace(first)?;
        Ok(p)
    }

    /// Places an existing elbow at the intersection of two members and trims
    /// both to its nearest ports.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::NonSolvableIntersection`] for parallel or skew
    /// members, [`PipeError::InvalidSelection`] if `elbow` is not a bend, or
    /// the engine's error.
    pub fn flatten(&self, doc: &mut Assembly, id1: &str, id2: &str, elbow: &str) -> PipeResult<()> {
        let mut first = straight(doc, id1)?.clone();
        let mut second = straight(doc, id2)?.clone();
        let mut bend = doc.require(elbow)?.clone();
        let p = self.intersect(&centerline(&first)?, &centerline(&second)?)?;

        let (com1, com2) = (midpoint(&first), midpoint(&second));
        self.engine
            .place_bend(&mut bend, &(p - com1), &(com2 - p), Some(p))?;

        let port0 = bend.world_port_position(0)?;
        let port1 = bend.world_port_position(1)?;
        let (to_first, to_second) = if (com1 - port0).norm() < (com1 - port1).norm() {
            (port0, port1)
        } else {
            (port1, port0)
        };
        self.engine.trim_to(&mut first, &to_first)?;
        self.engine.trim_to(&mut second, &to_second)?;

        doc.replace(bend)?;
        doc.replace(first)?;
        doc.replace(second)?;
        Ok(())
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Merges branch pipes into a header.
    ///
    /// The first pipe in `ids` is the header; IDs that are not pipes are
    /// ignored. Each branch end nearest the header axis is trimmed to the
    /// closed-form depth `sqrt((OD_h / 2)^2 - r^2) - thk_h - OD_b / 2`, where
    /// `r` is the branch's offset from the header axis in the header's
    /// cross-section. Branches that are not orthogonal to the header, or pass
    /// outside it, are excluded and left as they were. Connected branches are
    /// recorded as a union group of the header.
    ///
    /// Running it again on a connected set changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] when fewer than two pipes are
    /// given.
    pub fn header(&self, doc: &mut Assembly, ids: &[&str]) -> PipeResult<HeaderReport> {
        let pipes: Vec<&str> = ids
            .iter()
            .copied()
            .filter(|id| {
                doc.get(id)
                    .is_some_and(|c| c.family() == ComponentFamily::Pipe)
            })
            .collect();
        let [header_id, branch_ids @ ..] = &pipes[..] else {
            return Err(PipeError::invalid_selection("no pipes selected"));
        };
        if branch_ids.is_empty() {
            return Err(PipeError::invalid_selection(
                "a header needs at least one branch pipe",
            ));
        }

        let header = doc.require(header_id)?;
        let to_world = *header.placement();
        let to_local = to_world.inverse();
        let radius = header.spec().outer_diameter().unwrap_or_default() / 2.0;
        let wall = header.spec().thickness().unwrap_or_default();

        let mut report = HeaderReport {
            header: (*header_id).to_string(),
            ..HeaderReport::default()
        };
        let mut trimmed = Vec::new();
        for &branch_id in branch_ids {
            if branch_id == *header_id {
                continue;
            }
            let branch = doc.require(branch_id)?;
            let local = branch.clone().with_placement(to_local * branch.placement());
            let solved = self
                .header_target(&local, radius, wall)
                .map(|target| to_world * target)
                .and_then(|target| {
                    let mut branch = branch.clone();
                    self.engine.trim_to(&mut branch, &target)?;
                    Ok(branch)
                });
            match solved {
                Ok(branch) => {
                    report.connected.push(branch_id.to_string());
                    trimmed.push(branch);
                }
                Err(error) => {
                    warn!(
                        header = %report.header,
                        branch = branch_id,
                        %error,
                        "Branch excluded from header"
                    );
                    report.excluded.push(branch_id.to_string());
                }
            }
        }

        for branch in trimmed {
            doc.replace(branch)?;
        }
        for branch in &report.connected {
            doc.record_union(&report.header, branch)?;
        }
        Ok(report)
    }

    /// Trim target of a branch expressed in the header's local frame.
    fn header_target(
        &self,
        branch: &PlacedComponent,
        radius: f64,
        wall: f64,
    ) -> PipeResult<Point3<f64>> {
        let Some(near) = branch.nearest_port(&Point3::origin()) else {
            return Err(PipeError::invalid_selection(format!(
                "'{}' has no ports",
                branch.id()
            )));
        };
        let p = branch.world_port_position(near)?;
        let axis = branch.axis().into_inner();
        let u = if near == 0 { axis } else { -axis };
        if u.z.abs() > self.engine.tolerances().parallel {
            return Err(PipeError::no_intersection(format!(
                "'{}' is not orthogonal to the header",
                branch.id()
            )));
        }

        let mut foot = p - u * p.coords.dot(&u);
        foot.z = 0.0;
        let radicand = radius * radius - foot.coords.norm_squared();
        if radicand < 0.0 {
            return Err(PipeError::no_intersection(format!(
                "'{}' passes outside the header",
                branch.id()
            )));
        }
        let branch_radius = branch.spec().outer_diameter().unwrap_or_default() / 2.0;
        let depth = radicand.sqrt() - wall - branch_radius;
        Ok(foot + u * depth)
    }

    // =========================================================================
    // Moves along members
    // =========================================================================

    /// Moves a pipe along the plane normal until its outer surface touches
    /// the plane, or moves `support` (the plane's owner) the opposite way to
    /// meet the pipe. Returns the translation applied.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] if the member has no outside
    /// diameter or its axis is not parallel to the plane.
    pub fn laydown(
        &self,
        doc: &mut Assembly,
        id: &str,
        plane: &Plane,
        support: Option<&str>,
    ) -> PipeResult<Vector3<f64>> {
        let pipe = straight(doc, id)?;
        let Some(od) = pipe.spec().outer_diameter() else {
            return Err(PipeError::invalid_selection(format!(
                "'{id}' has no outside diameter"
            )));
        };
        if !is_orthogonal(&plane.normal, &pipe.axis(), self.engine.tolerances().parallel) {
            return Err(PipeError::invalid_selection(format!(
                "axis of '{id}' is not parallel to the plane"
            )));
        }
        let n = plane.normal.into_inner();
        let dist = n * (n.dot(&(pipe.base() - plane.point)) - od / 2.0);

        let (target, shift) = match support {
            Some(support) => (support, dist),
            None => (id, -dist),
        };
        let mut moved = doc.require(target)?.clone();
        let mut placement = *moved.placement();
        placement.translation.vector += shift;
        moved.set_placement(placement);
        doc.replace(moved)?;
        Ok(shift)
    }

    /// Splits a pipe at `at` mm from its base, leaving `gap` before the
    /// second piece. Returns the new pipe's ID.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidSelection`] if `id` is not a pipe, or
    /// [`PipeError::DimensionInconsistency`] if either piece would have no
    /// length.
    pub fn break_pipe(&self, doc: &mut Assembly, id: &str, at: f64, gap: f64) -> PipeResult<String> {
        let mut first = doc.require(id)?.clone();
        if first.family() != ComponentFamily::Pipe {
            return Err(PipeError::invalid_selection(format!("'{id}' is not a pipe")));
        }
        let height = first.height().unwrap_or_default();
        let rest = height - at - gap;
        let min = self.engine.tolerances().min_length;
        if at <= min || gap < 0.0 || rest <= min {
            return Err(PipeError::dimension(
                "height",
                format!("cannot break '{id}' of length {height} at {at} with gap {gap}"),
            ));
        }

        let new_id = doc.unique_id("Tube");
        let mut spec = first.spec().clone();
        spec.set_height(rest)?;
        let mut placement = *first.placement();
        placement.translation.vector += first.axis().into_inner() * (at + gap);
        let mut second = PlacedComponent::new(new_id.clone(), spec)?.with_placement(placement);
        if let Some(rating) = first.rating() {
            second = second.with_rating(rating);
        }
        first.update_spec(|spec| spec.set_height(at))?;

        doc.replace(first)?;
        doc.add(second)?;
        debug!(id, new = %new_id, at, gap, "Broke pipe");
        Ok(new_id)
    }

    fn intersect(&self, a: &Line3, b: &Line3) -> PipeResult<Point3<f64>> {
        let tolerances = self.engine.tolerances();
        a.intersection(b, tolerances.parallel, tolerances.coincidence)
            .ok_or_else(|| PipeError::no_intersection("centerlines are parallel or skew"))
    }
}

fn straight<'a>(doc: &'a Assembly, id: &str) -> PipeResult<&'a PlacedComponent> {
    let member = doc.require(id)?;
    if member.family().is_straight() {
        Ok(member)
    } else {
        Err(PipeError::invalid_selection(format!(
            "'{id}' is a {}, not a straight member",
            member.family()
        )))
    }
}

fn centerline(member: &PlacedComponent) -> PipeResult<Line3> {
    Line3::new(member.base(), member.axis().into_inner())
}

fn midpoint(member: &PlacedComponent) -> Point3<f64> {
    member.base() + member.axis().into_inner() * (member.height().unwrap_or_default() / 2.0)
}

fn resolve(doc: &Assembly, thing: &Thing) -> PipeResult<(Line3, Point3<f64>)> {
    match thing {
        Thing::Member(id) => {
            let member = straight(doc, id)?;
            Ok((centerline(member)?, midpoint(member)))
        }
        Thing::Edge(edge) => Ok((Line3::through(edge.start, edge.end)?, edge.midpoint())),
    }
}

/// Elbow port lying on the member's centerline.
fn matching_port(member: &PlacedComponent, elbow: &PlacedComponent) -> PipeResult<Point3<f64>> {
    let axis = member.axis().into_inner();
    let mid = midpoint(member);
    let off_axis = |p: &Point3<f64>| (mid - p).cross(&axis).norm();
    elbow
        .world_ports()
        .map(|port| port.position)
        .min_by(|a, b| off_axis(a).total_cmp(&off_axis(b)))
        .ok_or_else(|| PipeError::invalid_selection("elbow has no ports"))
}

//! Turning host picks into attachments for the placement engine.

use nalgebra::{Point3, Unit, Vector3};
use pipe_place::{Assembly, Attachment, PlacedComponent};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The picked part of a component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubShape {
    /// A vertex.
    Vertex(Point3<f64>),
    /// A circular or otherwise curved edge.
    CurvedEdge {
        /// Center of curvature.
        center_of_curvature: Point3<f64>,
        /// Axis of the edge's circle.
        axis: Unit<Vector3<f64>>,
    },
    /// A straight edge.
    StraightEdge {
        /// Edge midpoint.
        center_of_mass: Point3<f64>,
    },
    /// A face.
    Face {
        /// Face centroid.
        center_of_mass: Point3<f64>,
    },
    /// The component as a whole.
    Whole,
}

impl SubShape {
    /// Point standing for the sub-shape, if it has one.
    #[must_use]
    pub const fn point(&self) -> Option<Point3<f64>> {
        match *self {
            Self::Vertex(p) => Some(p),
            Self::CurvedEdge {
                center_of_curvature,
                ..
            } => Some(center_of_curvature),
            Self::StraightEdge { center_of_mass } | Self::Face { center_of_mass } => {
                Some(center_of_mass)
            }
            Self::Whole => None,
        }
    }
}

/// One host pick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pick {
    /// Picked component, if the pick landed on one.
    pub component: Option<String>,
    /// Picked sub-shape; `None` when only the component was picked.
    pub sub: Option<SubShape>,
}

impl Pick {
    /// A pick of a whole component.
    #[must_use]
    pub fn whole(component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            sub: Some(SubShape::Whole),
        }
    }

    /// A pick of a sub-shape of a component.
    #[must_use]
    pub fn on(component: impl Into<String>, sub: SubShape) -> Self {
        Self {
            component: Some(component.into()),
            sub: Some(sub),
        }
    }

    /// A pick of geometry that is not a component.
    #[must_use]
    pub const fn free(sub: SubShape) -> Self {
        Self {
            component: None,
            sub: Some(sub),
        }
    }
}

/// Resolves a pick to an attachment, falling back to origin/+Z.
///
/// On a component with ports the attachment is the world port nearest the
/// pick point: the vertex, the center of curvature, or the center of mass,
/// or the component base when no sub-shape was picked. Picking the whole
/// component chooses its highest-index port. On anything else, only a
/// curved edge is usable; it attaches at its center of curvature along its
/// axis.
#[must_use]
pub fn resolve(doc: &Assembly, pick: &Pick) -> Attachment {
    usable(doc, pick).unwrap_or_default()
}

/// Resolves the first usable pick of a multi-selection, falling back to
/// origin/+Z.
#[must_use]
pub fn resolve_all(doc: &Assembly, picks: &[Pick]) -> Attachment {
    picks
        .iter()
        .find_map(|pick| usable(doc, pick))
        .unwrap_or_default()
}

fn usable(doc: &Assembly, pick: &Pick) -> Option<Attachment> {
    let component = match &pick.component {
        Some(id) => {
            let Some(component) = doc.get(id) else {
                debug!(id = %id, "Picked component is not in the assembly");
                return None;
            };
            Some(component)
        }
        None => None,
    };

    match component {
        Some(component) if component.port_count() > 0 => port_attachment(component, pick.sub),
        _ => match pick.sub {
            Some(SubShape::CurvedEdge {
                center_of_curvature,
                axis,
            }) => Some(Attachment {
                position: center_of_curvature,
                direction: axis,
                source: None,
            }),
            _ => None,
        },
    }
}

fn port_attachment(component: &PlacedComponent, sub: Option<SubShape>) -> Option<Attachment> {
    let index = match sub {
        Some(SubShape::Whole) => component.port_count().checked_sub(1)?,
        Some(sub) => component.nearest_port(&sub.point()?)?,
        None => component.nearest_port(&component.base())?,
    };
    Attachment::from_port(component, index).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pipe_fittings::{PipeDims, ShellDims};
    use pipe_place::PlacementEngine;

    fn doc() -> Assembly {
        let mut doc = Assembly::new("doc");
        let Ok(pipe) = PlacementEngine::default().place_at(
            "P",
            PipeDims::default().into(),
            Point3::new(0.0, 0.0, 100.0),
            Vector3::x(),
        ) else {
            panic!("pipe should build");
        };
        let Ok(shell) = PlacedComponent::new("S", ShellDims::default().into()) else {
            panic!("shell should build");
        };
        assert!(doc.add(pipe).is_ok());
        assert!(doc.add(shell).is_ok());
        doc
    }

    #[test]
    fn test_nearest_port_to_pick_point() {
        let doc = doc();
        let pick = Pick::on(
            "P",
            SubShape::Face {
                center_of_mass: Point3::new(900.0, 0.0, 130.0),
            },
        );
        let attachment = resolve(&doc, &pick);
        assert_eq!(attachment.source, Some(("P".to_string(), 1)));
        assert_relative_eq!(attachment.position, Point3::new(1000.0, 0.0, 100.0), epsilon = 1e-9);
        assert_relative_eq!(attachment.direction.into_inner(), Vector3::x(), epsilon = 1e-9);
    }

    #[test]
    fn test_whole_and_bare_component_picks() {
        let doc = doc();
        assert_eq!(resolve(&doc, &Pick::whole("P")).source, Some(("P".to_string(), 1)));
        let bare = Pick {
            component: Some("P".to_string()),
            sub: None,
        };
        assert_eq!(resolve(&doc, &bare).source, Some(("P".to_string(), 0)));
    }

    #[test]
    fn test_portless_curved_edge() {
        let doc = doc();
        let axis = Vector3::y_axis();
        let edge = SubShape::CurvedEdge {
            center_of_curvature: Point3::new(5.0, 6.0, 7.0),
            axis,
        };
        let attachment = resolve(&doc, &Pick::on("S", edge));
        assert_eq!(attachment.position, Point3::new(5.0, 6.0, 7.0));
        assert_eq!(attachment.direction, axis);
        assert!(attachment.source.is_none());
    }

    #[test]
    fn test_unusable_picks_fall_back() {
        let doc = doc();
        let face = SubShape::Face {
            center_of_mass: Point3::new(1.0, 1.0, 1.0),
        };
        assert_eq!(resolve(&doc, &Pick::on("S", face)), Attachment::default());
        assert_eq!(resolve(&doc, &Pick::whole("missing")), Attachment::default());

        let picks = [Pick::on("S", face), Pick::whole("P")];
        assert_eq!(resolve_all(&doc, &picks).source, Some(("P".to_string(), 1)));
        assert_eq!(resolve_all(&doc, &[]), Attachment::default());
    }
}

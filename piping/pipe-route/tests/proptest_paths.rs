//! Property-based tests for path assembly.
//!
//! Run with: cargo test -p pipe-route -- proptest

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pipe_fittings::ComponentSpec;
use pipe_route::{LineParams, Path, PathAssembler, PieceKind};
use pipe_types::{Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Two legs joined at a planar corner turning `angle` radians.
fn arb_corner() -> impl Strategy<Value = (f64, f64, f64)> {
    (500.0..3000.0f64, 500.0..3000.0f64, 0.2..2.4f64)
}

/// Bend radius within a realistic range for DN50.
fn arb_bend_radius() -> impl Strategy<Value = f64> {
    30.0..120.0f64
}

/// A direction that is not close to zero.
fn arb_direction() -> impl Strategy<Value = Vector3<f64>> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_filter("direction must have length", |[x, y, z]| {
            (x * x + y * y + z * z).sqrt() > 0.1
        })
        .prop_map(|[x, y, z]| Vector3::new(x, y, z).normalize())
}

/// A 3D polyline of 3 to 6 points. Legs are long enough for a bend at each
/// end, and every turn lies between 0.2 and 2.4 radians.
fn arb_polyline() -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec((700.0..3000.0f64, arb_direction()), 2..=5)
        .prop_filter("turns must be neither straight nor reversing", |legs| {
            legs.windows(2).all(|pair| {
                let turn = pair[0].1.angle(&pair[1].1);
                (0.2..=2.4).contains(&turn)
            })
        })
        .prop_map(|legs| {
            let mut points = vec![Point3::new(-200.0, 300.0, 50.0)];
            for (length, direction) in legs {
                let last = points[points.len() - 1];
                points.push(last + direction * length);
            }
            points
        })
}

fn turn_angles(points: &[Point3<f64>]) -> Vec<f64> {
    points
        .windows(3)
        .map(|w| (w[1] - w[0]).angle(&(w[2] - w[1])))
        .collect()
}

fn corner_path(a: f64, b: f64, angle: f64) -> Path {
    Path::from_points(&[
        Point3::origin(),
        Point3::new(a, 0.0, 0.0),
        Point3::new(a + b * angle.cos(), b * angle.sin(), 0.0),
    ])
    .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Tubes lose exactly the set-back of the bend at each corner.
    #[test]
    fn tubes_conserve_leg_length((a, b, angle) in arb_corner(), radius in arb_bend_radius()) {
        let params = LineParams::default().with_bend_radius(radius);
        let pieces = PathAssembler::default()
            .assemble(&corner_path(a, b, angle), &params, "P")
            .unwrap();
        prop_assert_eq!(pieces.len(), 3);

        let set_back = radius * (angle / 2.0).tan();
        let tubes: f64 = pieces
            .iter()
            .filter(|p| p.kind == PieceKind::Tube)
            .filter_map(|p| p.component.height())
            .sum();
        prop_assert!((tubes - (a + b - 2.0 * set_back)).abs() < 1e-6);

        let ComponentSpec::Elbow(elbow) = pieces[1].component.spec() else {
            return Err(TestCaseError::fail("middle piece is not an elbow"));
        };
        prop_assert!((elbow.bend_angle - angle.to_degrees()).abs() < 1e-6);
        prop_assert!((elbow.bend_radius - radius).abs() < 1e-9);
    }

    /// Consecutive pieces meet port to port with opposed directions.
    #[test]
    fn pieces_chain_port_to_port((a, b, angle) in arb_corner()) {
        let pieces = PathAssembler::default()
            .assemble(&corner_path(a, b, angle), &LineParams::default(), "P")
            .unwrap();
        for pair in pieces.windows(2) {
            let out = pair[0].component.world_port(1).unwrap();
            let inp = pair[1].component.world_port(0).unwrap();
            let gap = (out.position - inp.position).norm();
            let opposition = (out.direction.into_inner() + inp.direction.into_inner()).norm();
            prop_assert!(gap < 1e-6, "pieces {gap} apart");
            prop_assert!(opposition < 1e-6, "directions not opposed ({opposition})");
        }
    }

    /// Over any polyline, tube lengths plus twice each bend's set-back add up
    /// to the path length.
    #[test]
    fn polyline_length_is_conserved(points in arb_polyline(), radius in arb_bend_radius()) {
        let path = Path::from_points(&points).unwrap();
        let params = LineParams::default().with_bend_radius(radius);
        let pieces = PathAssembler::default().assemble(&path, &params, "P").unwrap();

        let angles = turn_angles(&points);
        prop_assert_eq!(pieces.len(), 2 * points.len() - 3);
        let tubes: f64 = pieces
            .iter()
            .filter(|p| p.kind == PieceKind::Tube)
            .filter_map(|p| p.component.height())
            .sum();
        let set_backs: f64 = angles.iter().map(|a| 2.0 * radius * (a / 2.0).tan()).sum();
        let total = tubes + set_backs;
        prop_assert!(
            (total - path.length()).abs() < 1e-6 * path.length(),
            "{total} against path length {}",
            path.length()
        );

        let bends = pieces.iter().filter(|p| p.kind == PieceKind::Corner);
        for (piece, angle) in bends.zip(&angles) {
            let ComponentSpec::Elbow(elbow) = piece.component.spec() else {
                return Err(TestCaseError::fail("corner piece is not an elbow"));
            };
            prop_assert!((elbow.bend_angle - angle.to_degrees()).abs() < 1e-6);
        }
    }

    /// Pieces along a non-planar polyline still meet port to port.
    #[test]
    fn polyline_pieces_chain(points in arb_polyline()) {
        let path = Path::from_points(&points).unwrap();
        let pieces = PathAssembler::default()
            .assemble(&path, &LineParams::default(), "P")
            .unwrap();
        let first = pieces[0].component.world_port_position(0).unwrap();
        prop_assert!((first - points[0]).norm() < 1e-9);
        for pair in pieces.windows(2) {
            let out = pair[0].component.world_port(1).unwrap();
            let inp = pair[1].component.world_port(0).unwrap();
            let gap = (out.position - inp.position).norm();
            let opposition = (out.direction.into_inner() + inp.direction.into_inner()).norm();
            prop_assert!(gap < 1e-6, "pieces {gap} apart");
            prop_assert!(opposition < 1e-6, "directions not opposed ({opposition})");
        }
        let last = pieces[pieces.len() - 1].component.world_port_position(1).unwrap();
        prop_assert!((last - points[points.len() - 1]).norm() < 1e-6);
    }
}

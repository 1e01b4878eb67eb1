//! Integration tests for the component builders.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use approx::assert_relative_eq;
use pipe_fittings::{
    measured_bend_angle, Catalog, ComponentBuilder, ComponentSpec, ElbowDims, FlangeDims,
    FlangeKind, OutletAngle, OutletDims, PipeDims, ReducerDims, SocketElbowDims, TeeDims,
};
use pipe_types::{ComponentFamily, Vector3};

const PIPES: &str = "\
PSize;OD;thk
DN25;33.4;3.38
DN50;60.3;3.91
DN80;88.9;5.49
";

#[test]
fn reducer_height_derived_from_diameters() {
    let built = ReducerDims::new("DN50", 60.3, 48.3, 3.0).build().unwrap();
    let p = built.ports.positions();
    assert_relative_eq!(p[0].z, 0.0);
    assert_relative_eq!(p[1].z, 36.0, epsilon = 1e-9);
    assert_relative_eq!(built.ports.directions()[1].into_inner(), Vector3::z());
}

#[test]
fn elbow_ports_report_requested_angle() {
    for angle in [15.0, 30.0, 45.0, 60.0, 90.0, 120.0, 150.0] {
        let elbow = ElbowDims::default().with_bend_angle(angle).build().unwrap();
        let measured = measured_bend_angle(&elbow.ports).unwrap();
        assert_relative_eq!(measured, angle, epsilon = 1e-9);

        let socket = SocketElbowDims::default()
            .with_bend_angle(angle)
            .build()
            .unwrap();
        assert_relative_eq!(measured_bend_angle(&socket.ports).unwrap(), angle, epsilon = 1e-9);
    }
}

#[test]
fn elbow_ports_lie_on_centerline_arc() {
    let dims = ElbowDims::default().with_bend_angle(60.0);
    let built = dims.build().unwrap();
    let center = dims.arc_center();
    for (p, d) in built.ports.positions().iter().zip(built.ports.directions()) {
        // Tangent lines of both ports meet at the local origin.
        assert_relative_eq!((p - d.into_inner() * dims.corner_distance()).coords.norm(), 0.0, epsilon = 1e-9);
        assert_relative_eq!((p - center).norm(), dims.bend_radius, epsilon = 1e-9);
        assert_relative_eq!((p - center).dot(d), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn flange_port_offsets_follow_type() {
    let welded = FlangeDims {
        trf: 2.0,
        drf: 102.0,
        t1: 45.0,
        twn: 25.0,
        dwn: 74.0,
        odp: 60.3,
        ..FlangeDims::default().with_kind(FlangeKind::WeldNeck)
    };
    assert_eq!(welded.port_offsets(), (-2.0, 43.0));
    let built = welded.build().unwrap();
    assert_relative_eq!(built.ports.positions()[1].z, 43.0);
    assert_eq!(built.profile.as_deref(), Some("WN"));

    let slip_on = FlangeDims::default().build().unwrap();
    assert_eq!(slip_on.ports.len(), 2);
    assert_relative_eq!(slip_on.ports.directions()[0].into_inner(), -Vector3::z());
}

#[test]
fn lateral_outlet_points_at_45_degrees() {
    let built = OutletDims::default()
        .with_angle(OutletAngle::Lateral)
        .build()
        .unwrap();
    let d = built.ports.directions()[0].into_inner();
    assert_relative_eq!(d.angle(&Vector3::z()).to_degrees(), 45.0, epsilon = 1e-9);
    assert!(d.y < 0.0);
}

#[test]
fn tee_ports_on_run_and_branch() {
    let built = TeeDims::default().build().unwrap();
    let p = built.ports.positions();
    assert_eq!(p.len(), 3);
    assert_relative_eq!(p[0].z, -178.0);
    assert_relative_eq!(p[1].z, 178.0);
    assert_relative_eq!(p[2].y, 178.0);
    assert_relative_eq!(built.ports.directions()[2].into_inner(), Vector3::y());
}

#[test]
fn catalog_rows_build_pipes() {
    let catalog = Catalog::from_reader(PIPES.as_bytes()).unwrap();
    assert_eq!(catalog.len(), 3);
    for size in catalog.sizes() {
        let row = catalog.get(size).unwrap();
        let spec = ComponentSpec::from(PipeDims::from_row(row, 250.0).unwrap());
        assert_eq!(spec.family(), ComponentFamily::Pipe);
        assert_eq!(spec.size(), size);
        let built = spec.build().unwrap();
        assert_relative_eq!(built.ports.positions()[1].z, 250.0);
    }
}

//! Recipe realization against a recording mock kernel.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use pipe_types::{
    realize, Circle3, CylinderSurface, EdgeProbe, EdgeSelector, FaceSelector, GeometryKernel,
    Isometry3, PathPiece, Plane, Point3, Profile, ShapeRequest, Unit, Vector3,
};

/// Kernel whose solids are textual descriptions of the operations applied.
struct MockKernel {
    edges: Vec<Point3<f64>>,
    fail_fillet: bool,
    fillets: RefCell<Vec<(f64, Vec<usize>)>>,
}

impl MockKernel {
    fn new(edges: Vec<Point3<f64>>) -> Self {
        Self {
            edges,
            fail_fillet: false,
            fillets: RefCell::new(Vec::new()),
        }
    }
}

impl GeometryKernel for MockKernel {
    type Solid = String;
    type Error = String;

    fn cylinder(&self, r: f64, h: f64, _: Point3<f64>, _: Unit<Vector3<f64>>) -> Result<String, String> {
        Ok(format!("cyl({r},{h})"))
    }
    fn cone(&self, r1: f64, r2: f64, h: f64, _: Point3<f64>, _: Unit<Vector3<f64>>) -> Result<String, String> {
        Ok(format!("cone({r1},{r2},{h})"))
    }
    fn sphere(&self, r: f64, _: Point3<f64>) -> Result<String, String> {
        Ok(format!("sphere({r})"))
    }
    fn torus(&self, a: f64, b: f64, _: Point3<f64>, _: Unit<Vector3<f64>>) -> Result<String, String> {
        Ok(format!("torus({a},{b})"))
    }
    fn cuboid(&self, _: Point3<f64>, _: Vector3<f64>) -> Result<String, String> {
        Ok("box".to_string())
    }
    fn prism(&self, p: &Profile, _: Vector3<f64>) -> Result<String, String> {
        Ok(format!("prism({})", p.holes.len()))
    }
    fn sweep(&self, r: f64, path: &[PathPiece]) -> Result<String, String> {
        Ok(format!("sweep({r},{})", path.len()))
    }
    fn loft(&self, sections: &[Circle3]) -> Result<String, String> {
        Ok(format!("loft({})", sections.len()))
    }
    fn union(&self, a: &String, b: &String) -> Result<String, String> {
        Ok(format!("({a}+{b})"))
    }
    fn difference(&self, a: &String, b: &String) -> Result<String, String> {
        Ok(format!("({a}-{b})"))
    }
    fn common(&self, a: &String, b: &String) -> Result<String, String> {
        Ok(format!("({a}&{b})"))
    }
    fn fillet(&self, s: &String, r: f64, edges: &[usize]) -> Result<String, String> {
        self.fillets.borrow_mut().push((r, edges.to_vec()));
        if self.fail_fillet {
            Err("fillet construction failed".to_string())
        } else {
            Ok(format!("fillet({s})"))
        }
    }
    fn hollow(&self, s: &String, t: f64, _: FaceSelector) -> Result<String, String> {
        Ok(format!("hollow({s},{t})"))
    }
    fn transform(&self, s: &String, _: &Isometry3<f64>) -> Result<String, String> {
        Ok(format!("moved({s})"))
    }
    fn mirror(&self, s: &String, _: &Plane) -> Result<String, String> {
        Ok(format!("mirror({s})"))
    }
    fn compound(&self, solids: &[String]) -> Result<String, String> {
        Ok(format!("[{}]", solids.join(",")))
    }
    fn edge_midpoints(&self, _: &String) -> Vec<EdgeProbe> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, midpoint)| EdgeProbe {
                index,
                midpoint: *midpoint,
            })
            .collect()
    }
}

/// Shared sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` and returns its result with every warning it logged.
fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}

fn tee_like(radius: f64) -> ShapeRequest {
    let run = CylinderSurface {
        axis_point: Point3::origin(),
        axis: Vector3::z_axis(),
        radius: 30.0,
    };
    let branch = CylinderSurface {
        axis_point: Point3::origin(),
        axis: Vector3::y_axis(),
        radius: 20.0,
    };
    ShapeRequest::z_cylinder(30.0, 100.0)
        .fuse(ShapeRequest::cylinder(20.0, 50.0, Point3::origin(), Vector3::y_axis()))
        .fillet(
            radius,
            EdgeSelector::OnBothCylinders {
                first: run,
                second: branch,
                tolerance: 0.5,
            },
        )
}

fn intersection_edge() -> Point3<f64> {
    Point3::new(20.0, (900.0f64 - 400.0).sqrt(), 0.0)
}

#[test]
fn fillet_applies_to_matching_edges_only() {
    let kernel = MockKernel::new(vec![
        Point3::new(30.0, 0.0, 100.0),
        intersection_edge(),
        Point3::new(0.0, 50.0, 20.0),
    ]);
    let solid = realize(&kernel, &tee_like(5.0)).unwrap();
    assert_eq!(solid, "fillet((cyl(30,100)+cyl(20,50)))");
    assert_eq!(kernel.fillets.borrow().as_slice(), &[(5.0, vec![1])]);
}

#[test]
fn fillet_without_matches_keeps_base() {
    let kernel = MockKernel::new(vec![Point3::new(30.0, 0.0, 100.0)]);
    let (solid, logs) = warnings_during(|| realize(&kernel, &tee_like(5.0)).unwrap());
    assert_eq!(solid, "(cyl(30,100)+cyl(20,50))");
    assert!(kernel.fillets.borrow().is_empty());
    assert!(logs.contains("WARN"), "no warning logged: {logs:?}");
    assert!(logs.contains("No edges matched fillet selector"));
}

#[test]
fn failed_fillet_falls_back_to_base() {
    let mut kernel = MockKernel::new(vec![intersection_edge()]);
    kernel.fail_fillet = true;
    let solid = realize(&kernel, &tee_like(5.0)).unwrap();
    assert_eq!(solid, "(cyl(30,100)+cyl(20,50))");
    assert_eq!(kernel.fillets.borrow().len(), 1);
}

#[test]
fn non_positive_fillet_radius_keeps_base() {
    let kernel = MockKernel::new(vec![intersection_edge()]);
    let (solid, logs) = warnings_during(|| realize(&kernel, &tee_like(-2.0)).unwrap());
    assert_eq!(solid, "(cyl(30,100)+cyl(20,50))");
    assert!(logs.contains("Fillet radius not positive"));
}

#[test]
fn nested_booleans_and_hollow() {
    let kernel = MockKernel::new(vec![]);
    let request = ShapeRequest::z_cylinder(10.0, 5.0)
        .cut(vec![ShapeRequest::z_cylinder(8.0, 5.0)])
        .hollow(1.5);
    assert_eq!(
        realize(&kernel, &request).unwrap(),
        "hollow((cyl(10,5)-cyl(8,5)),1.5)"
    );
}

#[test]
fn empty_union_is_an_error() {
    let kernel = MockKernel::new(vec![]);
    let err = realize(&kernel, &ShapeRequest::Union(vec![])).unwrap_err();
    assert!(err.is_degenerate());
}

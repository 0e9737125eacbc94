use crate::angles::{AngleResult, ViewerPoint};
use crate::error::GeometryError;
use crate::monitor::{MonitorId, MonitorSpec};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub point: Point,
    /// Angle between the line of sight and the screen normal, in degrees.
    /// Negative on the side of the normal nearer the viewer's left.
    pub incidence: f64,
}

/// A validated monitor placed in the viewer's frame.
///
/// Geometry is worked out in the monitor's local frame (chord on
/// `y = distance`, no rotation) and yawed into place on the way out.
#[derive(Debug, Clone)]
pub struct ScreenSurface {
    pub monitor_id: MonitorId,
    spec: MonitorSpec,
    origin: Point,
}

impl ScreenSurface {
    pub fn new(
        monitor_id: MonitorId,
        spec: MonitorSpec,
        viewer: &ViewerPoint,
    ) -> Result<Self, GeometryError> {
        spec.validate(monitor_id)?;
        Ok(Self {
            monitor_id,
            spec,
            origin: viewer.position(),
        })
    }

    pub fn spec(&self) -> &MonitorSpec {
        &self.spec
    }

    pub fn angles(&self) -> AngleResult {
        let MonitorSpec {
            distance,
            rotation,
            offset,
            ..
        } = self.spec;
        let half = self.spec.chord_width() / 2.0;
        let bearing = |x: f64, y: f64| rotation + (x / y).atan().to_degrees();

        AngleResult {
            monitor_id: self.monitor_id,
            left_edge_angle: bearing(offset - half, distance),
            right_edge_angle: bearing(offset + half, distance),
            center_angle: bearing(offset, distance + self.spec.depth()),
        }
    }

    /// Local point at `t` (0 = left edge, 1 = right edge) together with the
    /// bearing of the surface normal there.
    fn local_at(&self, t: f64) -> (Point, f64) {
        let spec = &self.spec;
        match (spec.curve_radius, spec.central_angle()) {
            (Some(radius), Some(central)) => {
                let center = self.local_circle_center(radius);
                let phi = central * (t - 0.5);
                let point = center + Point::new(radius * phi.sin(), radius * phi.cos());
                (point, phi.to_degrees())
            }
            _ => {
                let half = spec.width / 2.0;
                let x = spec.offset - half + t * spec.width;
                (Point::new(x, spec.distance), 0.0)
            }
        }
    }

    fn local_circle_center(&self, radius: f64) -> Point {
        Point::new(
            self.spec.offset,
            self.spec.distance + self.spec.depth() - radius,
        )
    }

    fn to_world(&self, local: Point) -> Point {
        self.origin + local.yaw(self.spec.rotation)
    }

    pub fn point_at(&self, t: f64) -> Point {
        self.to_world(self.local_at(t.clamp(0.0, 1.0)).0)
    }

    pub fn incidence_at(&self, t: f64) -> f64 {
        let (point, normal) = self.local_at(t.clamp(0.0, 1.0));
        point.bearing() - normal
    }

    pub fn left_end(&self) -> Point {
        self.point_at(0.0)
    }

    pub fn right_end(&self) -> Point {
        self.point_at(1.0)
    }

    pub fn center(&self) -> Point {
        self.point_at(0.5)
    }

    pub fn circle_center(&self) -> Option<Point> {
        self.spec
            .curve_radius
            .map(|radius| self.to_world(self.local_circle_center(radius)))
    }

    /// Evenly spaced samples from the left edge to the right edge.
    pub fn samples(&self, count: usize) -> Vec<SurfaceSample> {
        let count = count.max(2);
        (0..count)
            .map(|i| {
                let t = i as f64 / (count - 1) as f64;
                SurfaceSample {
                    point: self.point_at(t),
                    incidence: self.incidence_at(t),
                }
            })
            .collect()
    }
}

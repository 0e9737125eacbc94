use derive_more::{Add, Div, Mul, Sub};

/// A point on the desk plane, in centimetres.
///
/// `x` grows to the viewer's right and `y` grows away from the viewer, so the
/// forward axis is `+y`. Phases are measured counter-clockwise from `+x`;
/// bearings are measured in degrees clockwise from the forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub, Mul, Div)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_polar(radius: f64, phase: f64) -> Self {
        Self::new(radius * phase.cos(), radius * phase.sin())
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn phase(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn to_polar(&self) -> (f64, f64) {
        (self.length(), self.phase())
    }

    /// Rotates counter-clockwise about the origin by `angle` radians.
    pub fn rotate(&self, angle: f64) -> Self {
        let (radius, phase) = self.to_polar();
        Self::from_polar(radius, phase + angle)
    }

    /// Rotates clockwise about the origin by `degrees`, which moves a point on
    /// the forward axis towards the viewer's right.
    pub fn yaw(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos + self.y * sin, self.y * cos - self.x * sin)
    }

    pub fn bearing(&self) -> f64 {
        self.x.atan2(self.y).to_degrees()
    }

    pub fn lerp(self, other: Point, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_vector_ops() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        assert_eq!(a + b, Point::new(4.0, 1.0));
        assert_eq!(a - b, Point::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert_eq!(b / 2.0, Point::new(1.5, -0.5));
        assert_eq!(a.dot(b), 1.0);
    }

    #[test]
    fn test_polar_round_trip() {
        let p = Point::from_polar(2.0, FRAC_PI_2);
        assert!(close(p, Point::new(0.0, 2.0)));
        let (r, phase) = p.to_polar();
        assert!((r - 2.0).abs() < EPS);
        assert!((phase - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_rotate_is_counter_clockwise() {
        let p = Point::new(1.0, 0.0).rotate(PI / 2.0);
        assert!(close(p, Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_yaw_moves_forward_axis_right() {
        let p = Point::new(0.0, 10.0).yaw(90.0);
        assert!(close(p, Point::new(10.0, 0.0)));
        assert!((Point::new(0.0, 10.0).yaw(30.0).bearing() - 30.0).abs() < EPS);
    }

    #[test]
    fn test_bearing_sign() {
        assert!(Point::new(1.0, 1.0).bearing() > 0.0);
        assert!(Point::new(-1.0, 1.0).bearing() < 0.0);
        assert_eq!(Point::new(0.0, 5.0).bearing(), 0.0);
    }

    #[test]
    fn test_lerp() {
        let p = Point::new(0.0, 0.0).lerp(Point::new(10.0, 4.0), 0.25);
        assert!(close(p, Point::new(2.5, 1.0)));
    }
}

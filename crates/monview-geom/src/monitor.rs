use crate::error::{Fault, GeometryError};
use crate::units::LengthUnit;
use derive_more::{Display, From, Into};
use std::f64::consts::PI;

/// Position of a monitor within its setup, counted from the viewer's left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct MonitorId(usize);

crate::impl_index_newtype!(MonitorId);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub horizontal: f64,
    pub vertical: f64,
}

impl AspectRatio {
    pub const WIDESCREEN: AspectRatio = AspectRatio::new(16.0, 9.0);
    pub const ULTRAWIDE: AspectRatio = AspectRatio::new(21.0, 9.0);

    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Angle between the diagonal and the bottom edge, in radians.
    pub fn diagonal_angle(&self) -> f64 {
        self.vertical.atan2(self.horizontal)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// One screen, placed relative to the viewer.
///
/// The chord of the screen lies on the line `y = distance` between
/// `offset - chord/2` and `offset + chord/2`, and the whole monitor is then
/// yawed about the viewer by `rotation` degrees (positive to the right).
/// All lengths are in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSpec {
    /// Width along the screen surface.
    pub width: f64,
    pub distance: f64,
    pub rotation: f64,
    pub offset: f64,
    pub height: f64,
    /// `None` for a flat panel.
    pub curve_radius: Option<f64>,
}

impl Default for MonitorSpec {
    /// A flat 24" 16:9 panel, 60 cm in front of the viewer.
    fn default() -> Self {
        Self::from_diagonal(24.0, LengthUnit::Inch, AspectRatio::WIDESCREEN, 60.0)
    }
}

impl MonitorSpec {
    pub fn new(width: f64, distance: f64) -> Self {
        let aspect = AspectRatio::default();
        Self {
            width,
            distance,
            rotation: 0.0,
            offset: 0.0,
            height: width * aspect.vertical / aspect.horizontal,
            curve_radius: None,
        }
    }

    pub fn from_diagonal(
        diagonal: f64,
        unit: LengthUnit,
        aspect: AspectRatio,
        distance: f64,
    ) -> Self {
        let diagonal = unit.to_cm(diagonal);
        let angle = aspect.diagonal_angle();
        Self {
            height: diagonal * angle.sin(),
            ..Self::new(diagonal * angle.cos(), distance)
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_curve_radius(mut self, radius: Option<f64>) -> Self {
        self.curve_radius = radius;
        self
    }

    /// Rescales width and height to a new diagonal (in cm), keeping the
    /// current aspect ratio.
    pub fn with_diagonal(mut self, diagonal: f64) -> Self {
        let angle = self.height.atan2(self.width);
        self.width = diagonal * angle.cos();
        self.height = diagonal * angle.sin();
        self
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    pub fn display_area(&self) -> f64 {
        self.width * self.height
    }

    /// Angle spanned by a curved panel, seen from its centre of curvature.
    pub fn central_angle(&self) -> Option<f64> {
        self.curve_radius.map(|radius| self.width / radius)
    }

    /// Straight-line distance between the two edges of the screen.
    pub fn chord_width(&self) -> f64 {
        match self.curve_radius {
            Some(radius) => 2.0 * radius * (self.width / radius / 2.0).sin(),
            None => self.width,
        }
    }

    /// How far the middle of a curved panel sits behind its chord.
    pub fn depth(&self) -> f64 {
        match self.curve_radius {
            Some(radius) => radius * (1.0 - (self.width / radius / 2.0).cos()),
            None => 0.0,
        }
    }

    /// Angle between the chord and the tangent of the surface at `position`
    /// (0 = left edge, 1 = right edge), in radians.
    pub fn arc_angle(&self, position: f64) -> f64 {
        self.central_angle()
            .map_or(0.0, |central| (0.5 - position) * central)
    }

    pub fn validate(&self, monitor: MonitorId) -> Result<(), GeometryError> {
        let fault = |fault| Err(GeometryError::invalid(monitor, fault));

        let finite = [self.width, self.distance, self.rotation, self.offset]
            .iter()
            .chain(self.curve_radius.iter())
            .all(|v| v.is_finite());
        if !finite {
            return fault(Fault::NonFinite);
        }
        if self.width < 0.0 {
            return fault(Fault::NegativeWidth);
        }
        if self.distance <= 0.0 {
            return fault(Fault::NonPositiveDistance);
        }
        match self.curve_radius {
            Some(radius) if radius <= 0.0 => fault(Fault::NonPositiveRadius),
            Some(radius) if self.width > PI * radius => fault(Fault::CurveTooTight),
            _ => Ok(()),
        }
    }
}

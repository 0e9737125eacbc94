use super::SetupId;
use crate::config::{Bounds, Limits};
use derive_more::Display;
use monview_geom::{GeometryError, LengthUnit, MonitorSpec};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Per-monitor inputs. Lengths in cm except `Diagonal`, which is in inches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "snake_case")]
pub enum ParameterField {
    Width,
    Height,
    Diagonal,
    Distance,
    Rotation,
    Offset,
    CurveRadius,
}

impl ParameterField {
    /// Whether the field still matters once a chained arrangement places the
    /// monitor.
    pub fn is_placement(self) -> bool {
        matches!(self, Self::Distance | Self::Rotation | Self::Offset)
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Rotation => "°",
            Self::Diagonal => "in",
            _ => "cm",
        }
    }

    /// Checks `value` against the limits for this field.
    pub fn check(self, value: f64, limits: &Limits) -> Result<f64, Rejection> {
        match self {
            Self::Width => positive_within(value, limits.width),
            Self::Height => positive_within(value, limits.height),
            Self::Diagonal => positive_within(value, limits.diagonal),
            Self::Distance => positive_within(value, limits.distance),
            Self::Rotation => within(value, limits.rotation),
            Self::Offset => within(value, limits.offset),
            // zero switches back to a flat panel
            Self::CurveRadius if value == 0.0 => Ok(value),
            Self::CurveRadius => positive_within(value, limits.curve_radius),
        }
    }

    /// Writes an already checked value into `spec`.
    pub fn apply(self, spec: &mut MonitorSpec, value: f64) {
        match self {
            Self::Width => spec.width = value,
            Self::Height => spec.height = value,
            Self::Diagonal => *spec = spec.with_diagonal(LengthUnit::Inch.to_cm(value)),
            Self::Distance => spec.distance = value,
            Self::Rotation => spec.rotation = value,
            Self::Offset => spec.offset = value,
            Self::CurveRadius => spec.curve_radius = (value > 0.0).then_some(value),
        }
    }

    /// Current value as shown in the input, in the field's own unit.
    pub fn read(self, spec: &MonitorSpec) -> f64 {
        match self {
            Self::Width => spec.width,
            Self::Height => spec.height,
            Self::Diagonal => LengthUnit::Inch.from_cm(spec.diagonal()),
            Self::Distance => spec.distance,
            Self::Rotation => spec.rotation,
            Self::Offset => spec.offset,
            Self::CurveRadius => spec.curve_radius.unwrap_or(0.0),
        }
    }
}

pub fn within(value: f64, bounds: Bounds) -> Result<f64, Rejection> {
    if !value.is_finite() {
        Err(Rejection::NotFinite)
    } else if !bounds.contains(value) {
        Err(Rejection::OutOfRange {
            min: bounds.min,
            max: bounds.max,
        })
    } else {
        Ok(value)
    }
}

pub fn positive_within(value: f64, bounds: Bounds) -> Result<f64, Rejection> {
    if value.is_finite() && value <= 0.0 {
        return Err(Rejection::NotPositive);
    }
    within(value, bounds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InputField {
    #[display("{_0}")]
    Monitor(ParameterField),
    #[display("monitor count")]
    MonitorCount,
    #[display("viewing distance")]
    ViewingDistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum Rejection {
    #[display("must be a finite number")]
    NotFinite,
    #[display("must be positive")]
    NotPositive,
    #[display("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} = {value} rejected: {reason}")]
    InvalidInput {
        field: InputField,
        value: f64,
        reason: Rejection,
    },
    #[error("no setup with id {0}")]
    UnknownSetup(SetupId),
    #[error("setup {setup} has no monitor {monitor}")]
    UnknownMonitor { setup: SetupId, monitor: usize },
    #[error("at most {0} setups can be compared")]
    TooManySetups(usize),
    #[error("the last setup cannot be removed")]
    LastSetup,
    #[error("edit would leave the setup unplaceable: {0}")]
    Unplaceable(#[from] GeometryError),
    #[error("could not read the edit: {0}")]
    Malformed(String),
}

impl InputError {
    pub fn invalid(field: InputField, value: f64, reason: Rejection) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_fields_reject_zero() {
        let limits = Limits::default();
        for field in [
            ParameterField::Width,
            ParameterField::Height,
            ParameterField::Distance,
            ParameterField::Diagonal,
        ] {
            assert_eq!(field.check(0.0, &limits), Err(Rejection::NotPositive));
            assert_eq!(field.check(-5.0, &limits), Err(Rejection::NotPositive));
        }
    }

    #[test]
    fn test_range_checks() {
        let limits = Limits::default();
        assert_eq!(
            ParameterField::Rotation.check(181.0, &limits),
            Err(Rejection::OutOfRange {
                min: -180.0,
                max: 180.0
            })
        );
        assert_eq!(ParameterField::Rotation.check(-45.0, &limits), Ok(-45.0));
        assert_eq!(ParameterField::Offset.check(-12.0, &limits), Ok(-12.0));
        assert_eq!(
            ParameterField::Width.check(f64::INFINITY, &limits),
            Err(Rejection::NotFinite)
        );
    }

    #[test]
    fn test_curve_radius_zero_means_flat() {
        let limits = Limits::default();
        let mut spec = MonitorSpec::default().with_curve_radius(Some(150.0));
        let value = ParameterField::CurveRadius.check(0.0, &limits).unwrap();
        ParameterField::CurveRadius.apply(&mut spec, value);
        assert_eq!(spec.curve_radius, None);
        assert!(ParameterField::CurveRadius.check(10.0, &limits).is_err());
    }

    #[test]
    fn test_diagonal_round_trips_through_inches() {
        let mut spec = MonitorSpec::default();
        ParameterField::Diagonal.apply(&mut spec, 27.0);
        assert!((ParameterField::Diagonal.read(&spec) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ParameterField::CurveRadius.to_string(), "curve_radius");
        let field: ParameterField = "rotation".parse().unwrap();
        assert_eq!(field, ParameterField::Rotation);
        assert!(field.is_placement());
        assert!(!ParameterField::Width.is_placement());
    }

    #[test]
    fn test_error_messages() {
        let err = InputError::invalid(
            InputField::Monitor(ParameterField::Distance),
            0.0,
            Rejection::NotPositive,
        );
        assert_eq!(err.to_string(), "distance = 0 rejected: must be positive");
        assert_eq!(
            InputError::invalid(InputField::MonitorCount, 9.0, Rejection::OutOfRange {
                min: 1.0,
                max: 8.0
            })
            .to_string(),
            "monitor count = 9 rejected: must be between 1 and 8"
        );
    }
}

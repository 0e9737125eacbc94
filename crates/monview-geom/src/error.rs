use crate::monitor::MonitorId;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum Fault {
    #[strum(to_string = "values must be finite numbers")]
    NonFinite,
    #[strum(to_string = "width must not be negative")]
    NegativeWidth,
    #[strum(to_string = "distance must be positive")]
    NonPositiveDistance,
    #[strum(to_string = "curve radius must be positive")]
    NonPositiveRadius,
    #[strum(to_string = "curve is wider than a half circle")]
    CurveTooTight,
    #[strum(to_string = "screen ends up behind the viewer")]
    BehindViewer,
    #[strum(to_string = "screen is too wide to join its neighbour")]
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid geometry for monitor {monitor}: {fault}")]
    InvalidGeometry { monitor: MonitorId, fault: Fault },
    #[error("viewing distance must be a positive finite number, got {0}")]
    InvalidViewingDistance(f64),
}

impl GeometryError {
    pub fn invalid(monitor: MonitorId, fault: Fault) -> Self {
        Self::InvalidGeometry { monitor, fault }
    }
}

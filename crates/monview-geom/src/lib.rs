//! Viewing-angle geometry for multi-monitor desk setups.
//!
//! Everything is measured from the viewer's eye at the origin, in
//! centimetres and degrees.

pub mod angles;
pub mod error;
pub mod layout;
pub mod macros;
pub mod monitor;
pub mod point;
pub mod stats;
pub mod surface;
pub mod units;

pub use angles::{AngleResult, ViewerPoint, angles_of, compute_angles, surfaces_of};
pub use error::{Fault, GeometryError};
pub use layout::{Arrangement, Setup, arrange};
pub use monitor::{AspectRatio, MonitorId, MonitorSpec};
pub use point::Point;
pub use stats::SetupStats;
pub use surface::{ScreenSurface, SurfaceSample};
pub use units::LengthUnit;

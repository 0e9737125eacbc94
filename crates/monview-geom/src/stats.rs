use crate::angles::AngleResult;
use crate::monitor::MonitorSpec;

/// Summary figures for comparing setups against each other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetupStats {
    /// Sum of the screen widths along their surfaces, in cm.
    pub total_width: f64,
    pub max_height: f64,
    /// In cm².
    pub total_area: f64,
    /// From the leftmost edge to the rightmost edge, in degrees.
    pub field_of_view: f64,
}

impl SetupStats {
    pub fn from_monitors(monitors: &[MonitorSpec], angles: &[AngleResult]) -> Self {
        let leftmost = angles
            .iter()
            .map(|a| a.left_edge_angle)
            .fold(f64::INFINITY, f64::min);
        let rightmost = angles
            .iter()
            .map(|a| a.right_edge_angle)
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            total_width: monitors.iter().map(|m| m.width).sum(),
            max_height: monitors.iter().map(|m| m.height).fold(0.0, f64::max),
            total_area: monitors.iter().map(MonitorSpec::display_area).sum(),
            field_of_view: if angles.is_empty() {
                0.0
            } else {
                rightmost - leftmost
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::{ViewerPoint, angles_of};
    use crate::layout::{Arrangement, arrange};

    #[test]
    fn test_stats_of_two_panels() {
        let monitors = vec![
            MonitorSpec::new(50.0, 60.0).with_height(30.0),
            MonitorSpec::new(40.0, 60.0).with_height(35.0),
        ];
        let placed = arrange(&monitors, 60.0, Arrangement::Perpendicular).unwrap();
        let angles = angles_of(&placed, &ViewerPoint).unwrap();
        let stats = SetupStats::from_monitors(&placed, &angles);

        assert_eq!(stats.total_width, 90.0);
        assert_eq!(stats.max_height, 35.0);
        assert_eq!(stats.total_area, 50.0 * 30.0 + 40.0 * 35.0);
        let fov = angles[1].right_edge_angle - angles[0].left_edge_angle;
        assert!((stats.field_of_view - fov).abs() < 1e-12);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(SetupStats::from_monitors(&[], &[]), SetupStats::default());
    }
}

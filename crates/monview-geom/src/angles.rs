use crate::error::GeometryError;
use crate::layout::Setup;
use crate::monitor::{MonitorId, MonitorSpec};
use crate::point::Point;
use crate::surface::ScreenSurface;

/// The viewer's eye. It is the origin of every coordinate frame in this
/// crate and never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerPoint;

impl ViewerPoint {
    pub fn position(&self) -> Point {
        Point::ORIGIN
    }
}

/// Bearings of one monitor, in degrees clockwise from the forward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleResult {
    pub monitor_id: MonitorId,
    pub left_edge_angle: f64,
    pub right_edge_angle: f64,
    pub center_angle: f64,
}

impl AngleResult {
    pub fn span(&self) -> f64 {
        self.right_edge_angle - self.left_edge_angle
    }
}

/// Places every monitor of `setup` and returns its viewing angles, in
/// monitor order.
pub fn compute_angles(
    setup: &Setup,
    viewer: &ViewerPoint,
) -> Result<Vec<AngleResult>, GeometryError> {
    angles_of(&setup.placed()?, viewer)
}

/// Viewing angles of monitors that are already placed.
pub fn angles_of(
    monitors: &[MonitorSpec],
    viewer: &ViewerPoint,
) -> Result<Vec<AngleResult>, GeometryError> {
    let surfaces = surfaces_of(monitors, viewer)?;
    Ok(surfaces.iter().map(ScreenSurface::angles).collect())
}

pub fn surfaces_of(
    monitors: &[MonitorSpec],
    viewer: &ViewerPoint,
) -> Result<Vec<ScreenSurface>, GeometryError> {
    monitors
        .iter()
        .enumerate()
        .map(|(i, spec)| ScreenSurface::new(MonitorId::new(i), *spec, viewer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;

    fn single(spec: MonitorSpec) -> AngleResult {
        angles_of(&[spec], &ViewerPoint).unwrap()[0]
    }

    #[test]
    fn test_single_monitor_span() {
        let result = single(MonitorSpec::new(60.0, 70.0));
        let expected = 2.0 * (30.0_f64 / 70.0).atan().to_degrees();
        assert!((result.span() - expected).abs() < 1e-9);
        assert!(result.center_angle.abs() < 1e-12);
        assert!((result.left_edge_angle + result.right_edge_angle).abs() < 1e-12);
    }

    #[test]
    fn test_offset_shifts_towards_right() {
        let result = single(MonitorSpec::new(60.0, 70.0).with_offset(20.0));
        assert!(result.center_angle > 0.0);
        assert!(result.left_edge_angle < 0.0);
        assert!((result.center_angle - (20.0_f64 / 70.0).atan().to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_width_collapses() {
        let result = single(MonitorSpec::new(0.0, 70.0).with_rotation(12.0));
        assert_eq!(result.left_edge_angle, result.center_angle);
        assert_eq!(result.right_edge_angle, result.center_angle);
    }

    #[test]
    fn test_ids_follow_monitor_order() {
        let monitors = vec![MonitorSpec::default(); 3];
        let results = angles_of(&monitors, &ViewerPoint).unwrap();
        let ids: Vec<usize> = results.iter().map(|r| r.monitor_id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_invalid_monitor_is_named() {
        let monitors = vec![MonitorSpec::default(), MonitorSpec::new(50.0, 0.0)];
        assert_eq!(
            angles_of(&monitors, &ViewerPoint),
            Err(GeometryError::invalid(
                MonitorId::new(1),
                Fault::NonPositiveDistance
            ))
        );
    }
}

use super::SetupId;
use crate::config::PlotConfig;
use monview_geom::{
    AngleResult, GeometryError, MonitorSpec, Point, Setup, SetupStats, SurfaceSample,
    ViewerPoint, surfaces_of,
};

/// One placed monitor, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorFrame {
    pub placed: MonitorSpec,
    pub angles: AngleResult,
    pub samples: Vec<SurfaceSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupFrame {
    pub monitors: Vec<MonitorFrame>,
    pub stats: SetupStats,
}

impl SetupFrame {
    pub fn compute(
        setup: &Setup,
        viewer: &ViewerPoint,
        plot: &PlotConfig,
    ) -> Result<Self, GeometryError> {
        let placed = setup.placed()?;
        let surfaces = surfaces_of(&placed, viewer)?;

        let monitors: Vec<MonitorFrame> = surfaces
            .iter()
            .map(|surface| {
                let mut samples = surface.samples(plot.samples_per_monitor);
                if plot.abs_incidence {
                    samples.iter_mut().for_each(|s| s.incidence = s.incidence.abs());
                }
                MonitorFrame {
                    placed: *surface.spec(),
                    angles: surface.angles(),
                    samples,
                }
            })
            .collect();

        let angles: Vec<AngleResult> = monitors.iter().map(|m| m.angles).collect();
        let stats = SetupStats::from_monitors(&placed, &angles);
        Ok(Self { monitors, stats })
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.monitors
            .iter()
            .flat_map(|m| m.samples.iter().map(|s| s.point))
    }

    pub fn incidences(&self) -> impl Iterator<Item = f64> + '_ {
        self.monitors
            .iter()
            .flat_map(|m| m.samples.iter().map(|s| s.incidence))
    }
}

/// Backing data of one plot. A setup that cannot be placed still gets a
/// plot, carrying the error instead of geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub setup_id: SetupId,
    pub label: String,
    pub outcome: Result<SetupFrame, GeometryError>,
}

impl PlotData {
    pub fn frame(&self) -> Option<&SetupFrame> {
        self.outcome.as_ref().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monview_geom::Arrangement;

    #[test]
    fn test_frame_of_default_pair() {
        let setup = Setup::new(
            Arrangement::Perpendicular,
            60.0,
            vec![MonitorSpec::default(); 2],
        );
        let plot = PlotConfig::default();
        let frame = SetupFrame::compute(&setup, &ViewerPoint, &plot).unwrap();

        assert_eq!(frame.monitors.len(), 2);
        assert!(frame
            .monitors
            .iter()
            .all(|m| m.samples.len() == plot.samples_per_monitor));
        assert!(frame.incidences().all(|i| i >= 0.0));
        assert!(frame.stats.field_of_view > 0.0);
    }

    #[test]
    fn test_signed_incidence() {
        let setup = Setup::new(Arrangement::Free, 60.0, vec![MonitorSpec::new(60.0, 60.0)]);
        let plot = PlotConfig {
            abs_incidence: false,
            ..PlotConfig::default()
        };
        let frame = SetupFrame::compute(&setup, &ViewerPoint, &plot).unwrap();
        assert!(frame.incidences().any(|i| i < 0.0));
    }

    #[test]
    fn test_invalid_setup_keeps_error() {
        let setup = Setup::new(Arrangement::Free, 60.0, vec![MonitorSpec::new(50.0, -1.0)]);
        assert!(SetupFrame::compute(&setup, &ViewerPoint, &PlotConfig::default()).is_err());
    }
}

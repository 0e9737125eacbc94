use super::frame::{PlotData, SetupFrame};
use super::input::{InputError, InputField, ParameterField, Rejection, positive_within};
use super::SetupId;
use crate::config::{Config, Limits, MonitorDefaults, PlotConfig};
use crate::events::ViewEvent;
use monview_geom::{Arrangement, Setup, ViewerPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct SetupState {
    pub id: SetupId,
    pub label: String,
    pub setup: Setup,
}

/// Parameter store of one session. Every edit validates, applies to a draft
/// and recomputes; only a draft that can be placed replaces the live setup.
pub struct Controller {
    setups: Vec<SetupState>,
    next_id: usize,
    defaults: MonitorDefaults,
    limits: Limits,
    plot: PlotConfig,
    viewer: ViewerPoint,
    plots: Vec<PlotData>,
    last_error: Option<InputError>,
    revision: u64,
}

impl Controller {
    pub fn new(config: &Config) -> Self {
        let mut controller = Self {
            setups: Vec::new(),
            next_id: 0,
            defaults: config.defaults.clone(),
            limits: config.limits.clone(),
            plot: config.plot.clone(),
            viewer: ViewerPoint,
            plots: Vec::new(),
            last_error: None,
            revision: 0,
        };
        let setup = controller.defaults.setup();
        controller.push_setup(setup);
        controller.redraw();
        controller
    }

    pub fn setups(&self) -> &[SetupState] {
        &self.setups
    }

    pub fn setup(&self, id: SetupId) -> Option<&SetupState> {
        self.setups.iter().find(|s| s.id == id)
    }

    pub fn plots(&self) -> &[PlotData] {
        &self.plots
    }

    pub fn plot(&self, id: SetupId) -> Option<&PlotData> {
        self.plots.iter().find(|p| p.setup_id == id)
    }

    pub fn last_error(&self) -> Option<&InputError> {
        self.last_error.as_ref()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn plot_config(&self) -> &PlotConfig {
        &self.plot
    }

    /// Bumped on every successful edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn handle(&mut self, event: ViewEvent) -> Result<(), InputError> {
        log::debug!("view event: {:?}", event);
        match event {
            ViewEvent::ParameterChange {
                setup,
                monitor,
                field,
                value,
            } => self.on_parameter_change(setup, monitor, field, value),
            ViewEvent::MonitorCountChange { setup, count } => {
                self.on_monitor_count_change(setup, count)
            }
            ViewEvent::ArrangementChange { setup, arrangement } => {
                self.on_arrangement_change(setup, arrangement)
            }
            ViewEvent::ViewingDistanceChange { setup, value } => {
                self.on_viewing_distance_change(setup, value)
            }
            ViewEvent::AddSetup => self.add_setup_for_comparison().map(|_| ()),
            ViewEvent::RemoveSetup { setup } => self.remove_setup(setup),
        }
    }

    pub fn on_parameter_change(
        &mut self,
        setup: SetupId,
        monitor: usize,
        field: ParameterField,
        value: f64,
    ) -> Result<(), InputError> {
        let checked = field
            .check(value, &self.limits)
            .map_err(|reason| InputError::invalid(InputField::Monitor(field), value, reason));

        self.edit_setup(setup, |draft| {
            let checked = checked?;
            let spec = draft
                .monitors
                .get_mut(monitor)
                .ok_or(InputError::UnknownMonitor { setup, monitor })?;
            field.apply(spec, checked);
            Ok(())
        })
    }

    /// Appends default monitors or drops monitors from the right; the
    /// monitors that stay are untouched.
    pub fn on_monitor_count_change(
        &mut self,
        setup: SetupId,
        count: usize,
    ) -> Result<(), InputError> {
        let max = self.limits.max_monitors;
        let template = self.defaults.monitor();

        self.edit_setup(setup, |draft| {
            if !(1..=max).contains(&count) {
                return Err(InputError::invalid(
                    InputField::MonitorCount,
                    count as f64,
                    Rejection::OutOfRange {
                        min: 1.0,
                        max: max as f64,
                    },
                ));
            }
            draft.monitors.resize(count, template);
            Ok(())
        })
    }

    pub fn on_arrangement_change(
        &mut self,
        setup: SetupId,
        arrangement: Arrangement,
    ) -> Result<(), InputError> {
        self.edit_setup(setup, |draft| {
            draft.arrangement = arrangement;
            Ok(())
        })
    }

    pub fn on_viewing_distance_change(
        &mut self,
        setup: SetupId,
        value: f64,
    ) -> Result<(), InputError> {
        let checked = positive_within(value, self.limits.distance)
            .map_err(|reason| InputError::invalid(InputField::ViewingDistance, value, reason));

        self.edit_setup(setup, |draft| {
            draft.viewing_distance = checked?;
            Ok(())
        })
    }

    /// Adds a copy of the rightmost setup as a starting point for comparison.
    pub fn add_setup_for_comparison(&mut self) -> Result<SetupId, InputError> {
        let result = if self.setups.len() >= self.limits.max_setups {
            Err(InputError::TooManySetups(self.limits.max_setups))
        } else {
            let setup = self
                .setups
                .last()
                .map(|s| s.setup.clone())
                .unwrap_or_else(|| self.defaults.setup());
            Ok(self.push_setup(setup))
        };
        self.settle(result)
    }

    pub fn remove_setup(&mut self, id: SetupId) -> Result<(), InputError> {
        let result = self.position(id).and_then(|index| {
            if self.setups.len() == 1 {
                return Err(InputError::LastSetup);
            }
            self.setups.remove(index);
            Ok(())
        });
        self.settle(result)
    }

    /// Records an event that could not be decoded.
    pub fn reject_malformed(&mut self, reason: impl Into<String>) {
        let _ = self.settle::<()>(Err(InputError::Malformed(reason.into())));
    }

    /// Recomputes the plot data of every setup.
    pub fn redraw(&mut self) {
        self.plots = self
            .setups
            .iter()
            .map(|state| PlotData {
                setup_id: state.id,
                label: state.label.clone(),
                outcome: SetupFrame::compute(&state.setup, &self.viewer, &self.plot),
            })
            .collect();

        for plot in &self.plots {
            if let Err(e) = &plot.outcome {
                log::error!("{} cannot be drawn: {}", plot.label, e);
            }
        }
    }

    /// Picks up new defaults and limits; the setups themselves are kept.
    pub fn reconfigure(&mut self, config: &Config) {
        self.defaults = config.defaults.clone();
        self.limits = config.limits.clone();
        self.plot = config.plot.clone();
        self.redraw();
    }

    fn push_setup(&mut self, setup: Setup) -> SetupId {
        let id = SetupId::new(self.next_id);
        self.next_id += 1;
        self.setups.push(SetupState {
            id,
            label: format!("Setup {}", id.index() + 1),
            setup,
        });
        id
    }

    fn position(&self, id: SetupId) -> Result<usize, InputError> {
        self.setups
            .iter()
            .position(|s| s.id == id)
            .ok_or(InputError::UnknownSetup(id))
    }

    fn edit_setup(
        &mut self,
        id: SetupId,
        edit: impl FnOnce(&mut Setup) -> Result<(), InputError>,
    ) -> Result<(), InputError> {
        let result = self.position(id).and_then(|index| {
            let mut draft = self.setups[index].setup.clone();
            edit(&mut draft)?;
            SetupFrame::compute(&draft, &self.viewer, &self.plot)?;
            self.setups[index].setup = draft;
            Ok(())
        });
        self.settle(result)
    }

    fn settle<T>(&mut self, result: Result<T, InputError>) -> Result<T, InputError> {
        match &result {
            Ok(_) => {
                self.last_error = None;
                self.revision += 1;
                self.redraw();
            }
            Err(e) => {
                log::warn!("Rejected edit: {}", e);
                self.last_error = Some(e.clone());
            }
        }
        result
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_controller() -> Controller {
        let mut config = Config::default();
        config.defaults.arrangement = Arrangement::Free;
        Controller::new(&config)
    }

    #[test]
    fn test_starts_with_default_setup() {
        let controller = Controller::default();
        assert_eq!(controller.setups().len(), 1);
        assert_eq!(controller.setups()[0].label, "Setup 1");
        assert_eq!(controller.setups()[0].setup.monitors.len(), 2);
        assert_eq!(controller.plots().len(), 1);
        assert!(controller.plots()[0].frame().is_some());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_parameter_change_updates_plot() {
        let mut controller = free_controller();
        let id = controller.setups()[0].id;
        controller
            .on_parameter_change(id, 1, ParameterField::Rotation, 30.0)
            .unwrap();

        let frame = controller.plot(id).unwrap().frame().unwrap();
        assert!((frame.monitors[1].angles.center_angle - 30.0).abs() < 1e-9);
        assert_eq!(controller.revision(), 1);
    }

    #[test]
    fn test_zero_distance_is_rejected() {
        let mut controller = free_controller();
        let id = controller.setups()[0].id;
        let before_setup = controller.setups()[0].clone();
        let before_plot = controller.plot(id).unwrap().clone();

        let err = controller
            .on_parameter_change(id, 0, ParameterField::Distance, 0.0)
            .unwrap_err();

        assert_eq!(
            err,
            InputError::invalid(
                InputField::Monitor(ParameterField::Distance),
                0.0,
                Rejection::NotPositive
            )
        );
        assert_eq!(controller.setups()[0], before_setup);
        assert_eq!(controller.plot(id).unwrap(), &before_plot);
        assert_eq!(controller.last_error(), Some(&err));
        assert_eq!(controller.revision(), 0);
    }

    #[test]
    fn test_successful_edit_clears_error() {
        let mut controller = free_controller();
        let id = controller.setups()[0].id;
        let _ = controller.on_parameter_change(id, 0, ParameterField::Width, -1.0);
        assert!(controller.last_error().is_some());
        controller
            .on_parameter_change(id, 0, ParameterField::Width, 40.0)
            .unwrap();
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_count_change_appends_defaults() {
        let mut controller = free_controller();
        let id = controller.setups()[0].id;
        controller
            .on_parameter_change(id, 0, ParameterField::Width, 70.0)
            .unwrap();
        let before = controller.setups()[0].setup.monitors.clone();

        controller.on_monitor_count_change(id, 4).unwrap();

        let monitors = &controller.setups()[0].setup.monitors;
        assert_eq!(monitors.len(), 4);
        assert_eq!(&monitors[..2], &before[..]);
        let default = MonitorDefaults::default().monitor();
        assert_eq!(monitors[2], default);
        assert_eq!(monitors[3], default);

        controller.on_monitor_count_change(id, 1).unwrap();
        assert_eq!(controller.setups()[0].setup.monitors, before[..1].to_vec());
    }

    #[test]
    fn test_count_out_of_range() {
        let mut controller = Controller::default();
        let id = controller.setups()[0].id;
        assert!(controller.on_monitor_count_change(id, 0).is_err());
        assert!(controller.on_monitor_count_change(id, 9).is_err());
        assert_eq!(controller.setups()[0].setup.monitors.len(), 2);
    }

    #[test]
    fn test_unknown_targets() {
        let mut controller = Controller::default();
        let id = controller.setups()[0].id;
        assert_eq!(
            controller.on_parameter_change(id, 7, ParameterField::Width, 40.0),
            Err(InputError::UnknownMonitor { setup: id, monitor: 7 })
        );
        let missing = SetupId::new(42);
        assert_eq!(
            controller.on_arrangement_change(missing, Arrangement::Smooth),
            Err(InputError::UnknownSetup(missing))
        );
    }

    #[test]
    fn test_unplaceable_edit_is_rejected() {
        let mut controller = Controller::default();
        let id = controller.setups()[0].id;
        controller
            .on_parameter_change(id, 1, ParameterField::Width, 100.0)
            .unwrap();
        // a 100 cm panel cannot bend around a 20 cm radius
        let err = controller
            .on_parameter_change(id, 1, ParameterField::CurveRadius, 20.0)
            .unwrap_err();
        assert!(matches!(err, InputError::Unplaceable(_)), "{err:?}");
        assert_eq!(controller.setups()[0].setup.monitors[1].curve_radius, None);
    }

    #[test]
    fn test_add_and_remove_setups() {
        let mut controller = Controller::default();
        let first = controller.setups()[0].id;
        controller
            .on_arrangement_change(first, Arrangement::Smooth)
            .unwrap();

        let second = controller.add_setup_for_comparison().unwrap();
        assert_eq!(controller.setups().len(), 2);
        assert_eq!(controller.setup(second).unwrap().label, "Setup 2");
        assert_eq!(
            controller.setup(second).unwrap().setup,
            controller.setup(first).unwrap().setup
        );
        assert_eq!(controller.plots().len(), 2);

        controller.remove_setup(first).unwrap();
        assert_eq!(controller.setups().len(), 1);
        assert_eq!(controller.remove_setup(second), Err(InputError::LastSetup));
        assert_eq!(
            controller.remove_setup(first),
            Err(InputError::UnknownSetup(first))
        );
    }

    #[test]
    fn test_setup_limit() {
        let mut controller = Controller::default();
        for _ in 1..controller.limits().max_setups {
            controller.add_setup_for_comparison().unwrap();
        }
        assert_eq!(
            controller.add_setup_for_comparison(),
            Err(InputError::TooManySetups(4))
        );
    }

    #[test]
    fn test_viewing_distance_moves_arranged_monitors() {
        let mut controller = Controller::default();
        let id = controller.setups()[0].id;
        controller.on_viewing_distance_change(id, 90.0).unwrap();
        let frame = controller.plot(id).unwrap().frame().unwrap();
        assert!(frame
            .monitors
            .iter()
            .all(|m| (m.placed.distance - 90.0).abs() < 1e-9));
        assert!(controller.on_viewing_distance_change(id, 0.0).is_err());
    }

    #[test]
    fn test_broken_defaults_show_error_plot() {
        let mut config = Config::default();
        config.defaults.arrangement = Arrangement::Free;
        config.defaults.curve_radius = Some(1.0);
        let controller = Controller::new(&config);
        assert!(controller.plots()[0].outcome.is_err());
    }
}

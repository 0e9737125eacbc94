use crate::controller::{ParameterField, SetupId};
use monview_geom::Arrangement;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// Process-wide events, handled by the runtime loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
    SweepSessions,
    Shutdown,
}

/// One edit coming from the page. Numbers may arrive either as JSON numbers
/// or as the raw text of an input element.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEvent {
    ParameterChange {
        setup: SetupId,
        monitor: usize,
        field: ParameterField,
        #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
        value: f64,
    },
    MonitorCountChange {
        setup: SetupId,
        #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
        count: usize,
    },
    ArrangementChange {
        setup: SetupId,
        arrangement: Arrangement,
    },
    ViewingDistanceChange {
        setup: SetupId,
        #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
        value: f64,
    },
    AddSetup,
    RemoveSetup {
        setup: SetupId,
    },
}

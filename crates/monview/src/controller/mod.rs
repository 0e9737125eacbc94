use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

pub mod frame;
pub mod input;
pub mod model;

pub use frame::{MonitorFrame, PlotData, SetupFrame};
pub use input::{InputError, InputField, ParameterField, Rejection};
pub use model::{Controller, SetupState};

/// Stable id of a setup within a session; never reused after removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct SetupId(usize);

monview_geom::impl_index_newtype!(SetupId);

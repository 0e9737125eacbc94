use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Centimetres are the working unit of every geometry type in this crate.
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
#[strum(ascii_case_insensitive)]
pub enum LengthUnit {
    #[strum(to_string = "mm", serialize = "millimetre", serialize = "millimeter")]
    Millimetre,
    #[strum(to_string = "cm", serialize = "centimetre", serialize = "centimeter")]
    Centimetre,
    #[strum(to_string = "m", serialize = "metre", serialize = "meter")]
    Metre,
    #[strum(to_string = "in", serialize = "inch", serialize = "inches")]
    Inch,
    #[strum(to_string = "ft", serialize = "foot", serialize = "feet")]
    Foot,
}

impl LengthUnit {
    pub fn cm_factor(self) -> f64 {
        match self {
            Self::Millimetre => 0.1,
            Self::Centimetre => 1.0,
            Self::Metre => 100.0,
            Self::Inch => 2.54,
            Self::Foot => 30.48,
        }
    }

    pub fn to_cm(self, value: f64) -> f64 {
        value * self.cm_factor()
    }

    pub fn from_cm(self, value: f64) -> f64 {
        value / self.cm_factor()
    }
}

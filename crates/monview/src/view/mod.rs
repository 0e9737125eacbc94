use thiserror::Error;

pub mod plot;
pub mod theme;

pub use plot::{PlotScale, render_plot};
pub use theme::{Gradient, ThemeColors};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("SVG stream error: {0}")]
    Stream(String),
    #[error("SVG stream has an unexpected type")]
    UnexpectedStream,
}

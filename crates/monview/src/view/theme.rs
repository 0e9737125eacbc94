use cairo::Context;
use palette::{LinSrgb, Mix, Srgb, Srgba, WithAlpha};

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub guide: Srgba<f64>,
    pub edge_ray: Srgba<f64>,
    pub viewer: Srgba<f64>,
    pub text: Srgba<f64>,
    pub muted_text: Srgba<f64>,
    pub broken: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: Srgba::new(1.0, 1.0, 1.0, 1.0),
            guide: Srgba::new(0.2, 0.2, 0.2, 0.12),
            edge_ray: Srgba::new(0.25, 0.25, 0.25, 0.45),
            viewer: Srgba::new(0.15, 0.15, 0.15, 0.9),
            text: Srgba::new(0.1, 0.1, 0.1, 1.0),
            muted_text: Srgba::new(0.35, 0.35, 0.35, 1.0),
            broken: Srgba::new(0.8, 0.2, 0.2, 0.9),
        }
    }
}

pub fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Piecewise-linear colour ramp, blended in linear light.
pub struct Gradient {
    stops: Vec<LinSrgb<f64>>,
}

impl Gradient {
    pub fn new(stops: &[Srgb<f64>]) -> Self {
        Self {
            stops: stops.iter().map(|c| c.into_linear()).collect(),
        }
    }

    /// The perceptually uniform ramp used for incidence colouring.
    pub fn viridis() -> Self {
        Self::new(&[
            Srgb::new(0.267, 0.005, 0.329),
            Srgb::new(0.231, 0.322, 0.545),
            Srgb::new(0.129, 0.569, 0.549),
            Srgb::new(0.369, 0.788, 0.384),
            Srgb::new(0.992, 0.906, 0.145),
        ])
    }

    /// Colour at `t` in `0..=1`; values outside are clamped.
    pub fn at(&self, t: f64) -> Srgba<f64> {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return Srgba::new(0.0, 0.0, 0.0, 1.0);
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let position = t * last as f64;
        let index = (position.floor() as usize).min(last.saturating_sub(1));
        let color = match self.stops.get(index + 1) {
            Some(next) => self.stops[index].mix(*next, position - index as f64),
            None => self.stops[index],
        };
        Srgb::<f64>::from_linear(color).with_alpha(1.0)
    }
}

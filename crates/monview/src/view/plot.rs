use super::RenderError;
use super::theme::{Gradient, ThemeColors, set_source};
use crate::config::PlotConfig;
use crate::controller::{MonitorFrame, PlotData, SetupFrame};
use cairo::{Context, SvgSurface};
use monview_geom::{GeometryError, Point};
use std::f64::consts::PI;
use std::iter::once;

const MARGIN: f64 = 16.0;
const TITLE_HEIGHT: f64 = 32.0;
const CAPTION_HEIGHT: f64 = 44.0;
const COLOR_BAR_GUTTER: f64 = 64.0;
const COLOR_BAR_WIDTH: f64 = 12.0;
const COLOR_BAR_STEPS: usize = 48;
const SURFACE_WIDTH: f64 = 5.0;
const VIEWER_RADIUS: f64 = 4.0;
const LABEL_GAP: f64 = 16.0;
const GUIDE_STEP: f64 = 30.0;
const PADDING: f64 = 0.08;

/// Desk extent and incidence range shared by all plots of a session, so
/// that setups are drawn at the same scale and colour the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotScale {
    pub min: Point,
    pub max: Point,
    pub incidence_min: f64,
    pub incidence_max: f64,
}

impl Default for PlotScale {
    fn default() -> Self {
        Self {
            min: Point::new(-60.0, -10.0),
            max: Point::new(60.0, 80.0),
            incidence_min: 0.0,
            incidence_max: 60.0,
        }
    }
}

impl PlotScale {
    pub fn shared(plots: &[PlotData]) -> Self {
        let frames = || plots.iter().filter_map(PlotData::frame);
        if frames().next().is_none() {
            return Self::default();
        }

        let (mut min, mut max) = frames()
            .flat_map(SetupFrame::points)
            .chain(once(Point::ORIGIN))
            .fold(
                (
                    Point::new(f64::INFINITY, f64::INFINITY),
                    Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
                ),
                |(lo, hi), p| {
                    (
                        Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                        Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                    )
                },
            );
        let pad = ((max.x - min.x).max(max.y - min.y) * PADDING).max(1.0);
        min = min - Point::new(pad, pad);
        max = max + Point::new(pad, pad);

        let (mut incidence_min, mut incidence_max) = frames()
            .flat_map(SetupFrame::incidences)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), i| {
                (lo.min(i), hi.max(i))
            });
        if !(incidence_max - incidence_min).is_finite() {
            (incidence_min, incidence_max) = (0.0, 1.0);
        } else if incidence_max - incidence_min < 1.0 {
            incidence_min -= 0.5;
            incidence_max += 0.5;
        }

        Self {
            min,
            max,
            incidence_min,
            incidence_max,
        }
    }

    /// Position of `incidence` along the colour bar, `0` at the bottom.
    pub fn normalise(&self, incidence: f64) -> f64 {
        let range = self.incidence_max - self.incidence_min;
        if range > 0.0 {
            ((incidence - self.incidence_min) / range).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Maps desk coordinates onto the canvas, forward pointing up and with the
/// same scale on both axes.
struct Viewport {
    area: Rect,
    center: Point,
    scale: f64,
}

impl Viewport {
    fn fit(scale: &PlotScale, area: Rect) -> Self {
        let dx = (scale.max.x - scale.min.x).max(1e-6);
        let dy = (scale.max.y - scale.min.y).max(1e-6);
        Self {
            area,
            center: scale.min.lerp(scale.max, 0.5),
            scale: (area.width / dx).min(area.height / dy),
        }
    }

    fn to_canvas(&self, p: Point) -> (f64, f64) {
        (
            self.area.x + self.area.width / 2.0 + (p.x - self.center.x) * self.scale,
            self.area.y + self.area.height / 2.0 - (p.y - self.center.y) * self.scale,
        )
    }

    /// Longest distance from the viewer to a corner of the visible desk.
    fn reach(&self) -> f64 {
        let half = Point::new(self.area.width, self.area.height) * (0.5 / self.scale);
        [
            self.center + half,
            self.center - half,
            self.center + Point::new(half.x, -half.y),
            self.center + Point::new(-half.x, half.y),
        ]
        .iter()
        .map(Point::length)
        .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

fn draw_text(
    cr: &Context,
    text: &str,
    (x, y): (f64, f64),
    size: f64,
    weight: cairo::FontWeight,
    align: Align,
) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        let left = match align {
            Align::Left => x,
            Align::Center => x - ext.width() / 2.0 - ext.x_bearing(),
            Align::Right => x - ext.width() - ext.x_bearing(),
        };
        cr.move_to(left, y);
        cr.show_text(text)?;
    }
    Ok(())
}

struct PlotRenderer<'a> {
    plot: &'a PlotData,
    scale: &'a PlotScale,
    viewport: Viewport,
    width: f64,
    height: f64,
    gradient: Gradient,
}

impl<'a> PlotRenderer<'a> {
    fn new(plot: &'a PlotData, scale: &'a PlotScale, config: &PlotConfig) -> Self {
        let (width, height) = (f64::from(config.width), f64::from(config.height));
        let area = Rect {
            x: MARGIN,
            y: TITLE_HEIGHT,
            width: (width - MARGIN - COLOR_BAR_GUTTER).max(1.0),
            height: (height - TITLE_HEIGHT - CAPTION_HEIGHT).max(1.0),
        };
        Self {
            plot,
            scale,
            viewport: Viewport::fit(scale, area),
            width,
            height,
            gradient: Gradient::viridis(),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.background);
        cr.paint()?;

        set_source(cr, colors.text);
        draw_text(
            cr,
            &self.plot.label,
            (MARGIN, TITLE_HEIGHT - 12.0),
            15.0,
            cairo::FontWeight::Bold,
            Align::Left,
        )?;

        match &self.plot.outcome {
            Ok(frame) => self.draw_frame(cr, frame, colors),
            Err(e) => self.draw_broken(cr, e, colors),
        }
    }

    fn draw_frame(
        &self,
        cr: &Context,
        frame: &SetupFrame,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let area = self.viewport.area;
        cr.save()?;
        cr.rectangle(area.x, area.y, area.width, area.height);
        cr.clip();

        self.draw_guides(cr, colors)?;
        for monitor in &frame.monitors {
            self.draw_edge_rays(cr, monitor, colors)?;
        }
        for monitor in &frame.monitors {
            self.draw_surface(cr, monitor)?;
        }
        for (i, monitor) in frame.monitors.iter().enumerate() {
            self.draw_span_label(cr, i, monitor, colors)?;
        }
        self.draw_viewer(cr, colors)?;
        cr.restore()?;

        self.draw_caption(cr, frame, colors)?;
        self.draw_color_bar(cr, colors)
    }

    fn draw_guides(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let reach = self.viewport.reach();
        let (vx, vy) = self.viewport.to_canvas(Point::ORIGIN);
        set_source(cr, colors.guide);
        cr.set_line_width(1.0);

        let steps = (180.0 / GUIDE_STEP) as i32;
        for step in -steps..=steps {
            let bearing = f64::from(step) * GUIDE_STEP;
            let (x, y) = self
                .viewport
                .to_canvas(Point::new(0.0, reach).yaw(bearing));
            cr.move_to(vx, vy);
            cr.line_to(x, y);
        }
        cr.stroke()
    }

    fn draw_edge_rays(
        &self,
        cr: &Context,
        monitor: &MonitorFrame,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let (Some(left), Some(right)) = (monitor.samples.first(), monitor.samples.last()) else {
            return Ok(());
        };
        let (vx, vy) = self.viewport.to_canvas(Point::ORIGIN);

        set_source(cr, colors.edge_ray);
        cr.set_line_width(1.0);
        cr.set_dash(&[4.0, 3.0], 0.0);
        for end in [left.point, right.point] {
            let (x, y) = self.viewport.to_canvas(end);
            cr.move_to(vx, vy);
            cr.line_to(x, y);
        }
        cr.stroke()?;
        cr.set_dash(&[], 0.0);
        Ok(())
    }

    /// Each piece of the screen is coloured by the viewing incidence there.
    fn draw_surface(&self, cr: &Context, monitor: &MonitorFrame) -> Result<(), cairo::Error> {
        cr.set_line_width(SURFACE_WIDTH);
        cr.set_line_cap(cairo::LineCap::Round);
        for pair in monitor.samples.windows(2) {
            let incidence = (pair[0].incidence + pair[1].incidence) / 2.0;
            set_source(cr, self.gradient.at(self.scale.normalise(incidence)));
            let (x0, y0) = self.viewport.to_canvas(pair[0].point);
            let (x1, y1) = self.viewport.to_canvas(pair[1].point);
            cr.move_to(x0, y0);
            cr.line_to(x1, y1);
            cr.stroke()?;
        }
        Ok(())
    }

    fn draw_span_label(
        &self,
        cr: &Context,
        index: usize,
        monitor: &MonitorFrame,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let Some(middle) = monitor.samples.get(monitor.samples.len() / 2) else {
            return Ok(());
        };
        let (vx, vy) = self.viewport.to_canvas(Point::ORIGIN);
        let (mx, my) = self.viewport.to_canvas(middle.point);

        // push the label away from the viewer, past the screen
        let (dx, dy) = (mx - vx, my - vy);
        let length = dx.hypot(dy);
        let (ox, oy) = if length > 0.0 {
            (dx / length * LABEL_GAP, dy / length * LABEL_GAP)
        } else {
            (0.0, -LABEL_GAP)
        };

        set_source(cr, colors.text);
        draw_text(
            cr,
            &format!("{}: {:.1}°", index + 1, monitor.angles.span()),
            (mx + ox, my + oy + 4.0),
            11.0,
            cairo::FontWeight::Normal,
            Align::Center,
        )
    }

    fn draw_viewer(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (x, y) = self.viewport.to_canvas(Point::ORIGIN);
        set_source(cr, colors.viewer);
        cr.arc(x, y, VIEWER_RADIUS, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_caption(
        &self,
        cr: &Context,
        frame: &SetupFrame,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let stats = &frame.stats;
        let top = self.height - CAPTION_HEIGHT;
        set_source(cr, colors.muted_text);
        draw_text(
            cr,
            &format!(
                "Field of view {:.1}°   Screen width {:.1} cm",
                stats.field_of_view, stats.total_width
            ),
            (MARGIN, top + 18.0),
            12.0,
            cairo::FontWeight::Normal,
            Align::Left,
        )?;
        draw_text(
            cr,
            &format!(
                "Screen area {:.2} m²   Tallest {:.1} cm",
                stats.total_area / 10_000.0,
                stats.max_height
            ),
            (MARGIN, top + 36.0),
            12.0,
            cairo::FontWeight::Normal,
            Align::Left,
        )
    }

    fn draw_color_bar(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let area = self.viewport.area;
        let x = self.width - COLOR_BAR_GUTTER + MARGIN;
        let step = area.height / COLOR_BAR_STEPS as f64;

        for i in 0..COLOR_BAR_STEPS {
            let t = (i as f64 + 0.5) / COLOR_BAR_STEPS as f64;
            set_source(cr, self.gradient.at(t));
            // t runs upwards
            let y = area.y + area.height - (i + 1) as f64 * step;
            cr.rectangle(x, y, COLOR_BAR_WIDTH, step + 0.5);
            cr.fill()?;
        }

        set_source(cr, colors.muted_text);
        let label_x = x + COLOR_BAR_WIDTH + 4.0;
        draw_text(
            cr,
            &format!("{:.0}°", self.scale.incidence_max),
            (label_x, area.y + 10.0),
            10.0,
            cairo::FontWeight::Normal,
            Align::Left,
        )?;
        draw_text(
            cr,
            &format!("{:.0}°", self.scale.incidence_min),
            (label_x, area.y + area.height),
            10.0,
            cairo::FontWeight::Normal,
            Align::Left,
        )?;
        draw_text(
            cr,
            "incidence",
            (x + COLOR_BAR_WIDTH, area.y + area.height + 16.0),
            10.0,
            cairo::FontWeight::Normal,
            Align::Right,
        )
    }

    fn draw_broken(
        &self,
        cr: &Context,
        error: &GeometryError,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let center = (self.width / 2.0, self.height / 2.0);
        set_source(cr, colors.broken);
        draw_text(
            cr,
            "This setup cannot be drawn",
            center,
            14.0,
            cairo::FontWeight::Bold,
            Align::Center,
        )?;
        set_source(cr, colors.muted_text);
        draw_text(
            cr,
            &error.to_string(),
            (center.0, center.1 + 20.0),
            11.0,
            cairo::FontWeight::Normal,
            Align::Center,
        )
    }
}

/// Draws one setup as a standalone SVG document.
pub fn render_plot(
    plot: &PlotData,
    scale: &PlotScale,
    config: &PlotConfig,
    colors: &ThemeColors,
) -> Result<Vec<u8>, RenderError> {
    let surface = SvgSurface::for_stream(
        f64::from(config.width),
        f64::from(config.height),
        Vec::<u8>::new(),
    )?;
    {
        let cr = Context::new(&surface)?;
        PlotRenderer::new(plot, scale, config).draw(&cr, colors)?;
    }

    let stream = surface
        .finish_output_stream()
        .map_err(|e| RenderError::Stream(e.to_string()))?;
    stream
        .downcast::<Vec<u8>>()
        .map(|bytes| *bytes)
        .map_err(|_| RenderError::UnexpectedStream)
}

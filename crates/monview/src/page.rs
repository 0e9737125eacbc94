use crate::config::Bounds;
use crate::controller::{Controller, ParameterField, SetupState};
use monview_geom::Arrangement;
use std::fmt::{self, Display, Write};
use strum::IntoEnumIterator;

const SHELL: &str = include_str!("page.html");

/// Text with the HTML special characters escaped.
pub struct Escaped<'a>(pub &'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// Shortest decimal form, at most two places.
fn number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        t => t.to_string(),
    }
}

fn field_label(field: ParameterField) -> String {
    format!("{} ({})", field.to_string().replace('_', " "), field.unit())
}

/// The full page for a freshly opened session.
pub fn render_shell(session: &str, controller: &Controller) -> String {
    SHELL
        .replace("{{SESSION}}", &Escaped(session).to_string())
        .replace("{{VIEW}}", &render_view(session, controller))
}

/// The part of the page that is replaced after every edit.
pub fn render_view(session: &str, controller: &Controller) -> String {
    let mut html = String::new();
    // writing into a String cannot fail
    let _ = write_view(&mut html, session, controller);
    html
}

fn write_view(out: &mut String, session: &str, controller: &Controller) -> fmt::Result {
    writeln!(
        out,
        r#"<div id="setups" data-revision="{}">"#,
        controller.revision()
    )?;
    if let Some(error) = controller.last_error() {
        writeln!(out, r#"<div class="error">{}</div>"#, Escaped(&error.to_string()))?;
    }

    let removable = controller.setups().len() > 1;
    for state in controller.setups() {
        write_setup(out, session, controller, state, removable)?;
    }

    let full = controller.setups().len() >= controller.limits().max_setups;
    writeln!(
        out,
        r#"<button id="add-setup" data-kind="add_setup"{}>Add setup</button>"#,
        disabled(full)
    )?;
    writeln!(out, "</div>")
}

fn disabled(yes: bool) -> &'static str {
    if yes { " disabled" } else { "" }
}

fn write_setup(
    out: &mut String,
    session: &str,
    controller: &Controller,
    state: &SetupState,
    removable: bool,
) -> fmt::Result {
    let id = state.id;
    let setup = &state.setup;
    let limits = controller.limits();
    let plot = controller.plot_config();
    let arranged = setup.arrangement != Arrangement::Free;

    writeln!(out, r#"<section class="setup" data-setup="{id}">"#)?;
    writeln!(
        out,
        r#"<header><h2>{}</h2><button data-kind="remove_setup" data-setup="{id}"{}>Remove</button></header>"#,
        Escaped(&state.label),
        disabled(!removable)
    )?;
    writeln!(
        out,
        r#"<img class="plot" src="/plot/{id}.svg?session={}&amp;rev={}" width="{}" height="{}" alt="Viewing angles of {}">"#,
        Escaped(session),
        controller.revision(),
        plot.width,
        plot.height,
        Escaped(&state.label)
    )?;

    writeln!(out, r#"<div class="controls">"#)?;
    write!(
        out,
        r#"<label>Arrangement <select data-kind="arrangement_change" data-setup="{id}">"#
    )?;
    for arrangement in Arrangement::iter() {
        let selected = if arrangement == setup.arrangement { " selected" } else { "" };
        write!(out, r#"<option value="{arrangement}"{selected}>{arrangement}</option>"#)?;
    }
    writeln!(out, "</select></label>")?;
    writeln!(
        out,
        r#"<label>Viewing distance (cm) <input type="number" data-kind="viewing_distance_change" data-setup="{id}" value="{}" min="{}" max="{}" step="any"{}></label>"#,
        number(setup.viewing_distance),
        number(limits.distance.min),
        number(limits.distance.max),
        disabled(!arranged)
    )?;
    writeln!(
        out,
        r#"<label>Monitors <input type="number" data-kind="monitor_count_change" data-setup="{id}" value="{}" min="1" max="{}" step="1"></label>"#,
        setup.monitors.len(),
        limits.max_monitors
    )?;
    writeln!(out, "</div>")?;

    write_monitor_table(out, controller, state, arranged)?;
    writeln!(out, "</section>")
}

fn write_monitor_table(
    out: &mut String,
    controller: &Controller,
    state: &SetupState,
    arranged: bool,
) -> fmt::Result {
    let id = state.id;
    let limits = controller.limits();
    let frame = controller.plot(id).and_then(|p| p.frame());

    write!(out, r#"<table class="monitors"><tr><th>#</th>"#)?;
    for field in ParameterField::iter() {
        write!(out, "<th>{}</th>", field_label(field))?;
    }
    writeln!(out, "<th>left</th><th>centre</th><th>right</th><th>span</th></tr>")?;

    for (index, spec) in state.setup.monitors.iter().enumerate() {
        write!(out, "<tr><td>{}</td>", index + 1)?;
        for field in ParameterField::iter() {
            let bounds = match field {
                ParameterField::Width => limits.width,
                ParameterField::Height => limits.height,
                ParameterField::Diagonal => limits.diagonal,
                ParameterField::Distance => limits.distance,
                ParameterField::Rotation => limits.rotation,
                ParameterField::Offset => limits.offset,
                ParameterField::CurveRadius => Bounds::new(0.0, limits.curve_radius.max),
            };
            write!(
                out,
                r#"<td><input type="number" data-kind="parameter_change" data-setup="{id}" data-monitor="{index}" data-field="{field}" value="{}" min="{}" max="{}" step="any"{}></td>"#,
                number(field.read(spec)),
                number(bounds.min),
                number(bounds.max),
                disabled(arranged && field.is_placement())
            )?;
        }
        match frame.and_then(|f| f.monitors.get(index)) {
            Some(monitor) => {
                let angles = &monitor.angles;
                write!(
                    out,
                    r#"<td class="angle">{:.1}°</td><td class="angle">{:.1}°</td><td class="angle">{:.1}°</td><td class="angle">{:.1}°</td>"#,
                    angles.left_edge_angle,
                    angles.center_angle,
                    angles.right_edge_angle,
                    angles.span()
                )?;
            }
            None => write!(out, r#"<td class="angle" colspan="4">n/a</td>"#)?,
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</table>")
}

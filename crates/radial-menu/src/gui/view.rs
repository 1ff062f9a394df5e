use crate::gui::theme::{ThemeColors, set_source, set_source_colour};
use cairo::{Context, RadialGradient};
use radial::colour::Colour;
use radial::geometry::Point;
use radial::interaction::InteractionEngine;
use radial::model::ColourConfig;

const BASE_FONT_SIZE: f64 = 12.0;
const DESCRIPTION_GAP: f64 = 18.0;
const HOVER_LIGHTEN: f64 = 0.2;

/// Everything needed to paint one menu surface.
pub struct RingView<'a> {
    pub engine: &'a InteractionEngine,
    pub colour: &'a ColourConfig,
    pub smart: bool,
}

impl RingView<'_> {
    fn font_size(&self) -> f64 {
        BASE_FONT_SIZE * self.engine.metrics().scale * self.engine.size().text_scale
    }
}

fn wedge(cr: &Context, center: Point, inner: f64, outer: f64, start: f64, end: f64) {
    let (start, end) = (start.to_radians(), end.to_radians());
    cr.new_path();
    cr.arc(center.x, center.y, outer, start, end);
    cr.arc_negative(center.x, center.y, inner, end, start);
    cr.close_path();
}

fn outlined_text(
    cr: &Context,
    text: &str,
    fill: Colour,
    outline: Colour,
    thickness: f64,
) -> Result<(), cairo::Error> {
    let ext = cr.text_extents(text)?;
    cr.rel_move_to(-ext.width() / 2.0 - ext.x_bearing(), ext.height() / 2.0);
    cr.text_path(text);
    if thickness > 0.0 {
        set_source_colour(cr, outline);
        cr.set_line_width(thickness * 2.0);
        cr.stroke_preserve()?;
    }
    set_source_colour(cr, fill);
    cr.fill()
}

pub fn draw(cr: &Context, view: &RingView, theme: &ThemeColors) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(view.font_size());

    draw_inner_ring(cr, view, theme)?;
    draw_child_ring(cr, view)?;
    draw_caption(cr, view, theme)?;
    draw_description(cr, view, theme)
}

fn draw_inner_ring(cr: &Context, view: &RingView, theme: &ThemeColors) -> Result<(), cairo::Error> {
    let engine = view.engine;
    let metrics = engine.metrics();
    let center = engine.center();
    let angles = engine.angles();
    if angles.is_empty() {
        return Ok(());
    }
    let width = 360.0 / angles.len() as f64;
    let selection = engine.selection();
    let drop_target = selection.drag().and_then(|d| {
        d.parent
            .is_none()
            .then_some(d.hover_target.as_ref())
            .flatten()
    });
    let text_radius = (metrics.hole + metrics.inner_radius) / 2.0;

    for (label, angle) in angles.iter() {
        let (start, end) = (angle - width / 2.0, angle + width / 2.0);
        wedge(cr, center, metrics.hole, metrics.inner_radius, start, end);

        let fill = if selection.active_sector() == Some(label) {
            view.colour.inner_highlight_colour
        } else {
            view.colour.inner_colour
        };
        set_source_colour(cr, fill);
        cr.fill_preserve()?;

        if drop_target == Some(label) {
            set_source(cr, theme.drop_target);
            cr.set_line_width(3.0);
        } else {
            set_source_colour(cr, view.colour.inner_line_colour);
            cr.set_line_width(1.0);
        }
        cr.stroke()?;

        let rad = angle.to_radians();
        cr.move_to(
            center.x + text_radius * rad.cos(),
            center.y + text_radius * rad.sin(),
        );
        outlined_text(
            cr,
            label,
            view.colour.child_text_color,
            view.colour.child_text_outline_color,
            view.colour.child_outline_thickness,
        )?;
    }
    Ok(())
}

fn draw_child_ring(cr: &Context, view: &RingView) -> Result<(), cairo::Error> {
    let engine = view.engine;
    if engine.visible_children().is_none() {
        return Ok(());
    }
    let metrics = engine.metrics();
    let center = engine.center();
    let step = engine.child_step();
    let hovered = engine.selection().outer_active();
    let text_radius = (metrics.outer_inner + metrics.outer_outer) / 2.0;

    for (label, start) in engine.child_angles().iter() {
        wedge(cr, center, metrics.outer_inner, metrics.outer_outer, *start, start + step);

        if hovered == Some(label) {
            let gradient = RadialGradient::new(
                center.x,
                center.y,
                metrics.outer_inner,
                center.x,
                center.y,
                metrics.outer_outer,
            );
            let base = view.colour.child_colour.into_srgba();
            let light = view
                .colour
                .child_colour
                .lighten_toward_white(HOVER_LIGHTEN)
                .into_srgba();
            for (offset, colour) in [(0.0, light), (1.0, base)] {
                let (r, g, b, a) = colour.into_components();
                gradient.add_color_stop_rgba(offset, r, g, b, a);
            }
            cr.set_source(&gradient)?;
        } else {
            set_source_colour(cr, view.colour.child_colour);
        }
        cr.fill_preserve()?;

        set_source_colour(cr, view.colour.child_line_colour);
        cr.set_line_width(view.colour.child_outline_thickness.max(0.5));
        cr.stroke()?;

        // labels follow the arc and flip on the lower half to stay upright
        let mid = start + step / 2.0;
        let rad = mid.to_radians();
        let upside_down = rad.sin() > 0.0;
        cr.save()?;
        cr.translate(
            center.x + text_radius * rad.cos(),
            center.y + text_radius * rad.sin(),
        );
        cr.rotate(if upside_down { rad - std::f64::consts::FRAC_PI_2 } else { rad + std::f64::consts::FRAC_PI_2 });
        cr.move_to(0.0, 0.0);
        outlined_text(
            cr,
            label,
            view.colour.child_text_color,
            view.colour.child_text_outline_color,
            view.colour.child_outline_thickness,
        )?;
        cr.restore()?;
    }
    Ok(())
}

fn draw_caption(cr: &Context, view: &RingView, theme: &ThemeColors) -> Result<(), cairo::Error> {
    let center = view.engine.center();
    let name = view.engine.preset_name();
    let ext = cr.text_extents(name)?;
    set_source(
        cr,
        if view.smart {
            theme.smart_caption
        } else {
            theme.caption
        },
    );
    cr.move_to(
        center.x - ext.width() / 2.0 - ext.x_bearing(),
        center.y + ext.height() / 2.0,
    );
    cr.show_text(name)
}

fn draw_description(
    cr: &Context,
    view: &RingView,
    theme: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(text) = view.engine.description() else {
        return Ok(());
    };
    let center = view.engine.center();
    let metrics = view.engine.metrics();
    cr.set_font_size(view.font_size() * 0.9);
    let ext = cr.text_extents(text)?;
    set_source(cr, theme.description);
    cr.move_to(
        center.x - ext.width() / 2.0 - ext.x_bearing(),
        center.y + metrics.outer_outer + DESCRIPTION_GAP,
    );
    cr.show_text(text)
}

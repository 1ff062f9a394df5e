use cairo::Context;
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use radial::colour::Colour;

/// Colours taken from the GTK theme for text that is not part of a preset.
pub struct ThemeColors {
    pub caption: Srgba<f64>,
    pub smart_caption: Srgba<f64>,
    pub description: Srgba<f64>,
    pub drop_target: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            caption: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
            smart_caption: Self::lookup_color(
                context,
                "success_color",
                Srgba::new(0.3, 0.85, 0.4, 1.0),
                None,
            ),
            description: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 0.85),
                Some(0.85),
            ),
            drop_target: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.9),
                Some(0.9),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn set_source(cr: &Context, colour: Srgba<f64>) {
    let (r, g, b, a) = colour.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn set_source_colour(cr: &Context, colour: Colour) {
    set_source(cr, colour.into_srgba());
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.radial-popup {
    background: none;
    background-color: transparent;
}
.radial-preview {
    background-color: @theme_base_color;
}
.radial-viewport {
    background-color: #2b2b2b;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

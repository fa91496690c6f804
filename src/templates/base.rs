//! Shared drawing helpers for templates: boxed sections, rules, labels,
//! input cells and logo loading.
//!
//! All units are points. Helpers that take a `top` coordinate measure down
//! from it, matching how templates lay out pages from the top margin.

use tracing::{debug, warn};

use crate::core::error::Result;
use crate::pdf::{Canvas, Checkbox, Color, Logo, Paint, TextField, find_logos};
use crate::templates::RenderContext;

/// Title bar height for boxed sections
pub const SECTION_TITLE_HEIGHT: f32 = 22.0;

/// Light grey for blank entry cells and table grid lines
pub const CELL_BORDER: Color = Color::rgb(0xe5, 0xe7, 0xeb);

/// Fill for logo placeholders
pub const PLACEHOLDER_FILL: Color = Color::rgb(0xf1, 0xf5, 0xf9);

/// Author recorded in every generated document
pub const DOCUMENT_AUTHOR: &str = "PDF Template Generator";

/// Canvas sized and titled for this run
pub fn new_canvas(ctx: &RenderContext<'_>, default_title: &str) -> Canvas {
    let mut canvas = Canvas::new(ctx.config.layout.page_size);
    canvas.set_title(ctx.title_or(default_title));
    canvas.set_author(DOCUMENT_AUTHOR);
    canvas
}

/// Draw a bordered box with an optional branded title bar.
///
/// `top` is the upper edge; returns the y of the lower edge for stacking.
pub fn boxed_section(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
    title: Option<&str>,
) -> f32 {
    let branding = &ctx.config.branding;
    let bottom = top - height;

    canvas.set_stroke_color(branding.brand_dark);
    canvas.set_line_width(0.5);
    canvas.rect(x, bottom, width, height, Paint::Stroke);

    if let Some(title) = title {
        let title_bottom = top - SECTION_TITLE_HEIGHT;
        canvas.set_fill_color(branding.brand_blue);
        canvas.rect(x, title_bottom, width, SECTION_TITLE_HEIGHT, Paint::Fill);

        // the fill covers the top of the outline
        canvas.line(x, top, x + width, top);
        canvas.line(x, title_bottom, x + width, title_bottom);

        canvas.set_fill_color(Color::WHITE);
        canvas.set_font(branding.font, branding.font_size_heading);
        canvas.draw_centred_string(x + width / 2.0, title_bottom + 6.0, title);
    }

    bottom
}

/// Start a new page when a block of `height` below `y` would cross the
/// bottom margin. Returns the y to draw the block from.
pub fn ensure_space(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    y: f32,
    height: f32,
) -> Result<f32> {
    let layout = &ctx.config.layout;
    if y - height < layout.margin {
        debug!(page = canvas.page_count() + 1, "Starting new page");
        canvas.show_page()?;
        return Ok(layout.top());
    }
    Ok(y)
}

/// Suggested vertical space between sections
pub fn spacer_height(lines: f32) -> f32 {
    12.0 * lines
}

/// Horizontal separator line
pub fn horizontal_rule(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    x: f32,
    y: f32,
    width: f32,
    thickness: f32,
) {
    canvas.set_stroke_color(ctx.config.branding.brand_dark);
    canvas.set_line_width(thickness);
    canvas.line(x, y, x + width, y);
}

/// Form label in the label size, baseline at `baseline`
pub fn label(canvas: &mut Canvas, ctx: &RenderContext<'_>, x: f32, baseline: f32, text: &str) {
    let branding = &ctx.config.branding;
    canvas.set_font(branding.font, branding.font_size_label);
    canvas.set_fill_color(branding.brand_dark);
    canvas.draw_string(x, baseline, text);
}

/// Baseline that vertically centres a label in a row of `height` below `top`
pub fn centred_baseline(ctx: &RenderContext<'_>, top: f32, height: f32) -> f32 {
    // cap height of the base-14 sans fonts is ~0.7 em
    top - (height + 0.7 * ctx.config.branding.font_size_label) / 2.0
}

/// Text entry cell whose upper edge is `top`: an AcroForm field when the run
/// is fillable, otherwise a blank bordered box.
pub fn text_input(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    name: &str,
    x: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    if ctx.options.fillable {
        let field = TextField::new(name, x, top - height, width, height)
            .with_border(ctx.config.branding.accent);
        canvas.text_field(&field);
    } else {
        blank_cell(canvas, x, top, width, height);
    }
}

/// Checkbox whose upper edge is `top`, fillable or blank like [`text_input`]
pub fn checkbox_input(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    name: &str,
    x: f32,
    top: f32,
    size: f32,
) -> Result<()> {
    if ctx.options.fillable {
        let checkbox =
            Checkbox::new(name, x, top - size, size).with_border(ctx.config.branding.accent);
        canvas.checkbox(&checkbox)
    } else {
        blank_cell(canvas, x, top, size, size);
        Ok(())
    }
}

fn blank_cell(canvas: &mut Canvas, x: f32, top: f32, width: f32, height: f32) {
    canvas.set_fill_color(Color::WHITE);
    canvas.set_stroke_color(CELL_BORDER);
    canvas.set_line_width(0.25);
    canvas.rect(x, top - height, width, height, Paint::FillStroke);
}

/// Up to `limit` decodable logos from the configured logos directory.
///
/// Missing or unreadable assets are logged and skipped; the caller decides
/// how to degrade.
pub fn load_logos(ctx: &RenderContext<'_>, limit: usize) -> Vec<Logo> {
    let dir = ctx.config.paths.logos_dir();
    let paths = match find_logos(&dir, limit) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(error = %e, "Continuing without logo");
            return Vec::new();
        }
    };
    if paths.is_empty() {
        warn!(dir = %dir.display(), "No logo image found, continuing without logo");
    }

    paths
        .iter()
        .filter_map(|path| match Logo::load(path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                warn!(error = %e, "Could not draw logo");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::templates::TemplateOptions;
    use std::path::PathBuf;
    use tracing_test::traced_test;

    #[test]
    fn test_spacer_height() {
        assert_eq!(spacer_height(1.0), 12.0);
        assert_eq!(spacer_height(0.5), 6.0);
        assert_eq!(spacer_height(1.5), 18.0);
    }

    #[test]
    fn test_boxed_section_returns_bottom() {
        let config = Config::default();
        let options = TemplateOptions::default();
        let ctx = RenderContext::new(&config, &options);
        let mut canvas = new_canvas(&ctx, "Test");

        assert_eq!(
            boxed_section(&mut canvas, &ctx, 72.0, 700.0, 468.0, 100.0, Some("Title")),
            600.0
        );
        assert_eq!(
            boxed_section(&mut canvas, &ctx, 72.0, 500.0, 468.0, 40.0, None),
            460.0
        );
    }

    #[test]
    fn test_inputs_respect_fillable() {
        let config = Config::default();
        let fillable = TemplateOptions::default();
        let ctx = RenderContext::new(&config, &fillable);
        let mut canvas = new_canvas(&ctx, "Test");
        text_input(&mut canvas, &ctx, "a", 100.0, 500.0, 50.0, 16.0);
        checkbox_input(&mut canvas, &ctx, "b", 100.0, 480.0, 12.0).unwrap();
        assert_eq!(canvas.field_count(), 2);

        let static_options = TemplateOptions {
            fillable: false,
            ..Default::default()
        };
        let ctx = RenderContext::new(&config, &static_options);
        let mut canvas = new_canvas(&ctx, "Test");
        text_input(&mut canvas, &ctx, "a", 100.0, 500.0, 50.0, 16.0);
        checkbox_input(&mut canvas, &ctx, "b", 100.0, 480.0, 12.0).unwrap();
        assert_eq!(canvas.field_count(), 0);
    }

    #[test]
    fn test_ensure_space_breaks_only_when_needed() {
        let config = Config::default();
        let options = TemplateOptions::default();
        let ctx = RenderContext::new(&config, &options);
        let mut canvas = new_canvas(&ctx, "Test");

        assert_eq!(ensure_space(&mut canvas, &ctx, 300.0, 228.0).unwrap(), 300.0);
        assert_eq!(canvas.page_count(), 1);

        assert_eq!(
            ensure_space(&mut canvas, &ctx, 300.0, 229.0).unwrap(),
            config.layout.top()
        );
        assert_eq!(canvas.page_count(), 2);
    }

    #[traced_test]
    #[test]
    fn test_missing_logos_dir_warns_and_degrades() {
        let mut config = Config::default();
        config.paths.assets_dir = PathBuf::from("/no/such/assets");
        let options = TemplateOptions::default();
        let ctx = RenderContext::new(&config, &options);

        assert!(load_logos(&ctx, 2).is_empty());
        assert!(logs_contain("Continuing without logo"));
    }
}

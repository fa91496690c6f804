//! Membership form: member info, contact details, authorization, signature
//! and optional PAC/volunteer sections.
//!
//! Produces a fillable PDF suitable for mapping in form tools such as
//! Fillout or Acrobat.

use std::path::Path;

use tracing::debug;

use super::RenderContext;
use super::base::{
    SECTION_TITLE_HEIGHT, boxed_section, centred_baseline, checkbox_input, ensure_space,
    horizontal_rule, label, load_logos, new_canvas, spacer_height, text_input,
};
use crate::core::error::Result;

const TITLE: &str = "Membership Form";
const FIELD_HEIGHT: f32 = 18.0;
const LABEL_WIDTH: f32 = 120.0;
const SIGNATURE_HEIGHT: f32 = 28.0;
const CHECKBOX_SIZE: f32 = 14.0;
/// Space between a section's title bar and its first row
const PADDING: f32 = 8.0;
const ROW_GAP: f32 = 8.0;
const LOGO_MAX_WIDTH: f32 = 180.0;
const LOGO_HEIGHT: f32 = 40.0;

const MEMBER_HEIGHT: f32 = 108.0;
const CONTACT_HEIGHT: f32 = 78.0;
const AUTHORIZATION_HEIGHT: f32 = 80.0;
const SIGNATURE_SECTION_HEIGHT: f32 = 92.0;
const OPTIONAL_HEIGHT: f32 = 116.0;

/// Render the membership form to `output_path`
pub fn generate(output_path: &Path, ctx: &RenderContext<'_>) -> Result<()> {
    let layout = &ctx.config.layout;
    let branding = &ctx.config.branding;
    let margin = layout.margin;
    let content_width = layout.content_width();
    let field_x = margin + LABEL_WIDTH + 8.0;
    let full_width = content_width - (field_x - margin) - 6.0;
    let label_x = margin + 6.0;
    let text_row = |row: f32| centred_baseline(ctx, row, FIELD_HEIGHT);
    let check_row = |row: f32| centred_baseline(ctx, row, CHECKBOX_SIZE);

    let mut canvas = new_canvas(ctx, TITLE);
    let mut y = layout.top();

    // Logo, or the title as text when no logo is available
    match load_logos(ctx, 1).first() {
        Some(logo) => {
            let (w, h) = logo.fit_within(LOGO_MAX_WIDTH, LOGO_HEIGHT);
            canvas.draw_image(logo, margin, y - h, w, h);
        }
        None => {
            canvas.set_font(branding.font, 16.0);
            canvas.set_fill_color(branding.brand_dark);
            canvas.draw_string(margin, y - 20.0, ctx.title_or(TITLE));
        }
    }
    y -= LOGO_HEIGHT + spacer_height(1.5);
    horizontal_rule(&mut canvas, ctx, margin, y, content_width, 0.5);
    y -= spacer_height(1.0);

    debug!("Drawing member information");
    y = ensure_space(&mut canvas, ctx, y, MEMBER_HEIGHT)?;
    let bottom = boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        MEMBER_HEIGHT,
        Some("Member Information"),
    );
    let mut row = y - SECTION_TITLE_HEIGHT - PADDING;
    label(&mut canvas, ctx, label_x, text_row(row), "Full Name:");
    text_input(&mut canvas, ctx, "member_name", field_x, row, full_width, FIELD_HEIGHT);
    row -= FIELD_HEIGHT + ROW_GAP;
    label(&mut canvas, ctx, label_x, text_row(row), "Member ID:");
    text_input(&mut canvas, ctx, "member_id", field_x, row, 120.0, FIELD_HEIGHT);
    label(&mut canvas, ctx, field_x + 140.0, text_row(row), "Date:");
    text_input(&mut canvas, ctx, "member_date", field_x + 170.0, row, 100.0, FIELD_HEIGHT);
    row -= FIELD_HEIGHT + ROW_GAP;
    label(&mut canvas, ctx, label_x, text_row(row), "Address:");
    text_input(&mut canvas, ctx, "member_address", field_x, row, full_width, FIELD_HEIGHT);
    y = bottom - spacer_height(0.5);

    debug!("Drawing contact details");
    y = ensure_space(&mut canvas, ctx, y, CONTACT_HEIGHT)?;
    let bottom = boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        CONTACT_HEIGHT,
        Some("Contact Details"),
    );
    let mut row = y - SECTION_TITLE_HEIGHT - PADDING;
    let phone_x = field_x + 210.0;
    label(&mut canvas, ctx, label_x, text_row(row), "Email:");
    text_input(&mut canvas, ctx, "contact_email", field_x, row, 160.0, FIELD_HEIGHT);
    label(&mut canvas, ctx, field_x + 170.0, text_row(row), "Phone:");
    text_input(
        &mut canvas,
        ctx,
        "contact_phone",
        phone_x,
        row,
        content_width - (phone_x - margin) - 6.0,
        FIELD_HEIGHT,
    );
    row -= FIELD_HEIGHT + ROW_GAP;
    label(&mut canvas, ctx, label_x, check_row(row), "Preferred Contact:");
    for (offset, name, caption) in [
        (0.0, "contact_pref_email", "Email"),
        (80.0, "contact_pref_phone", "Phone"),
        (150.0, "contact_pref_mail", "Mail"),
    ] {
        checkbox_input(&mut canvas, ctx, name, field_x + offset, row, CHECKBOX_SIZE)?;
        label(&mut canvas, ctx, field_x + offset + 20.0, check_row(row), caption);
    }
    y = bottom - spacer_height(0.5);

    debug!("Drawing authorization");
    y = ensure_space(&mut canvas, ctx, y, AUTHORIZATION_HEIGHT)?;
    let bottom = boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        AUTHORIZATION_HEIGHT,
        Some("Authorization"),
    );
    let mut row = y - SECTION_TITLE_HEIGHT - 14.0;
    canvas.set_font(branding.font, branding.font_size_body);
    canvas.set_fill_color(branding.brand_dark);
    canvas.draw_string(
        label_x,
        row,
        "I authorize the organization to use my information for membership",
    );
    row -= 14.0;
    canvas.draw_string(
        label_x,
        row,
        "and communications. I have read and agree to the terms.",
    );
    row -= ROW_GAP;
    checkbox_input(&mut canvas, ctx, "authorization_agreed", label_x, row, CHECKBOX_SIZE)?;
    label(&mut canvas, ctx, label_x + 18.0, check_row(row), "I agree");
    y = bottom - spacer_height(0.5);

    debug!("Drawing signature");
    y = ensure_space(&mut canvas, ctx, y, SIGNATURE_SECTION_HEIGHT)?;
    let bottom = boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        SIGNATURE_SECTION_HEIGHT,
        Some("Signature"),
    );
    let mut row = y - SECTION_TITLE_HEIGHT - PADDING;
    label(&mut canvas, ctx, label_x, centred_baseline(ctx, row, SIGNATURE_HEIGHT), "Signature:");
    text_input(&mut canvas, ctx, "signature", field_x, row, 200.0, SIGNATURE_HEIGHT);
    row -= SIGNATURE_HEIGHT + ROW_GAP;
    label(&mut canvas, ctx, label_x, text_row(row), "Printed Name:");
    text_input(&mut canvas, ctx, "signature_printed_name", field_x, row, 180.0, FIELD_HEIGHT);
    label(&mut canvas, ctx, field_x + 200.0, text_row(row), "Date:");
    text_input(&mut canvas, ctx, "signature_date", field_x + 230.0, row, 90.0, FIELD_HEIGHT);
    y = bottom - spacer_height(0.5);

    debug!("Drawing optional section");
    y = ensure_space(&mut canvas, ctx, y, OPTIONAL_HEIGHT)?;
    boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        OPTIONAL_HEIGHT,
        Some("Optional"),
    );
    let mut row = y - SECTION_TITLE_HEIGHT - PADDING;
    label(&mut canvas, ctx, label_x, text_row(row), "PAC contribution:");
    text_input(&mut canvas, ctx, "pac_amount", field_x, row, 80.0, FIELD_HEIGHT);
    checkbox_input(&mut canvas, ctx, "pac_opt_out", field_x + 100.0, row - 2.0, CHECKBOX_SIZE)?;
    label(&mut canvas, ctx, field_x + 118.0, text_row(row), "Opt out");
    row -= FIELD_HEIGHT + ROW_GAP;
    label(&mut canvas, ctx, label_x, row - 9.0, "Volunteer interests (check all that apply):");
    row -= 12.0;
    for (offset, name, caption) in [
        (0.0, "volunteer_events", "Events"),
        (84.0, "volunteer_outreach", "Outreach"),
        (184.0, "volunteer_admin", "Admin"),
        (274.0, "volunteer_other", "Other"),
    ] {
        checkbox_input(&mut canvas, ctx, name, label_x + offset, row, CHECKBOX_SIZE)?;
        label(&mut canvas, ctx, label_x + offset + 18.0, check_row(row), caption);
    }
    row -= CHECKBOX_SIZE + ROW_GAP;
    label(&mut canvas, ctx, label_x, text_row(row), "Other (describe):");
    text_input(&mut canvas, ctx, "volunteer_other_desc", field_x, row, full_width, FIELD_HEIGHT);

    canvas.save(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::templates::TemplateOptions;
    use lopdf::Document;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn field_names(doc: &Document) -> Vec<String> {
        let root = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let catalog = doc.get_dictionary(root).unwrap();
        let Ok(acro_form) = catalog.get(b"AcroForm") else {
            return Vec::new();
        };
        acro_form
            .as_dict()
            .unwrap()
            .get(b"Fields")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|field| {
                let dict = doc.get_dictionary(field.as_reference().unwrap()).unwrap();
                String::from_utf8_lossy(dict.get(b"T").unwrap().as_str().unwrap()).to_string()
            })
            .collect()
    }

    fn config_without_assets() -> Config {
        let mut config = Config::default();
        config.paths.assets_dir = PathBuf::from("/no/such/assets");
        config
    }

    #[test]
    fn test_generates_fillable_form() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("membership_form.pdf");
        let config = config_without_assets();
        let options = TemplateOptions::default();

        generate(&path, &RenderContext::new(&config, &options)).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        let names = field_names(&doc);
        for expected in [
            "member_name",
            "contact_pref_mail",
            "authorization_agreed",
            "signature_date",
            "volunteer_other_desc",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing field {expected}");
        }
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn test_short_page_moves_sections_to_next_page() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("membership_form.pdf");
        let mut config =
            Config::from_toml_str("[layout]\npage_size = \"612x420\"\nmargin = 36.0\n").unwrap();
        config.paths.assets_dir = PathBuf::from("/no/such/assets");
        let options = TemplateOptions::default();

        generate(&path, &RenderContext::new(&config, &options)).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(field_names(&doc).len(), 20);

        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            for annot in page.get(b"Annots").unwrap().as_array().unwrap() {
                let widget = doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
                let rect = widget.get(b"Rect").unwrap().as_array().unwrap();
                let bottom = rect[1].as_float().unwrap();
                let top = rect[3].as_float().unwrap();
                assert!(bottom >= config.layout.margin, "widget below margin: {bottom}");
                assert!(top <= config.layout.top(), "widget above margin: {top}");
            }
        }
    }

    #[test]
    fn test_static_form_has_no_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("membership_form.pdf");
        let config = config_without_assets();
        let options = TemplateOptions {
            fillable: false,
            ..Default::default()
        };

        generate(&path, &RenderContext::new(&config, &options)).unwrap();

        let doc = Document::load(&path).unwrap();
        assert!(field_names(&doc).is_empty());
    }

    #[test]
    fn test_draws_logo_when_present() {
        let temp_dir = TempDir::new().unwrap();
        let logos = temp_dir.path().join("assets").join("logos");
        std::fs::create_dir_all(&logos).unwrap();
        image::RgbImage::from_pixel(90, 20, image::Rgb([0, 0, 255]))
            .save(logos.join("logo.png"))
            .unwrap();

        let mut config = Config::default();
        config.paths.assets_dir = temp_dir.path().join("assets");
        let options = TemplateOptions::default();
        let path = temp_dir.path().join("membership_form.pdf");

        generate(&path, &RenderContext::new(&config, &options)).unwrap();

        let doc = Document::load(&path).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.get(b"XObject").is_ok());
    }
}

//! PCCFCE 3922 union membership commitment.
//!
//! Sections: member information, contact information, membership
//! authorization with the commitment text, signature, and the optional
//! AFT-Oregon political action fund and volunteer interests. Every section
//! except the authorization text is a two-column label/value table.

use std::path::Path;

use tracing::debug;

use super::RenderContext;
use super::base::{
    CELL_BORDER, PLACEHOLDER_FILL, SECTION_TITLE_HEIGHT, boxed_section, checkbox_input,
    ensure_space, horizontal_rule, label, load_logos, new_canvas, spacer_height, text_input,
};
use crate::core::error::Result;
use crate::pdf::{Canvas, Paint};

const TITLE: &str = "Union Membership Commitment for PCCFCE 3922";

const COMMITMENT_TEXT: &str = "I commit to my union membership in Local 3922, Portland \
    Community College Federation of Classified Employees, AFT-Oregon, American Federation \
    of Teachers, AFL-CIO (PCCFCE). I agree to abide by its constitution and bylaws and I \
    authorize the union to act as my exclusive representative in collective bargaining over \
    wages, benefits, and other terms and conditions of employment with my employer.";

const LABEL_WIDTH: f32 = 158.0;
const VALUE_X_OFFSET: f32 = LABEL_WIDTH + 6.0;
const ROW_STEP: f32 = 20.0;
const FIELD_HEIGHT: f32 = 16.0;
const CHECKBOX_SIZE: f32 = 12.0;
const LOGO_HEIGHT: f32 = 79.2;
const PLACEHOLDER_WIDTH: f32 = 60.0;
const COMMITMENT_LINE_HEIGHT: f32 = 13.0;

/// Value cell type of a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Checkbox,
}

/// One table row: label, field name, kind
type Row = (&'static str, &'static str, FieldKind);

const MEMBER_INFORMATION: &[Row] = &[
    ("First Name", "first_name", FieldKind::Text),
    ("Preferred Name", "preferred_name", FieldKind::Text),
    ("Last Name", "last_name", FieldKind::Text),
    ("Pronouns", "pronouns", FieldKind::Text),
    ("Street Address", "street_address", FieldKind::Text),
    ("City", "city", FieldKind::Text),
    ("State", "state", FieldKind::Text),
    ("Zip Code", "zip_code", FieldKind::Text),
    ("Employee ID", "employee_id", FieldKind::Text),
];

const CONTACT_INFORMATION: &[Row] = &[
    ("Mobile Phone", "mobile_phone", FieldKind::Text),
    ("Home Phone", "home_phone", FieldKind::Text),
    ("Work Phone", "work_phone", FieldKind::Text),
    ("Personal Email", "personal_email", FieldKind::Text),
    ("Work Email", "work_email", FieldKind::Text),
];

const COMMITMENT: &[Row] = &[(
    "Commitment Confirmed",
    "commitment_confirmed",
    FieldKind::Checkbox,
)];

const SIGNATURE: &[Row] = &[
    ("Printed Name", "printed_name", FieldKind::Text),
    ("Signature", "signature", FieldKind::Text),
    ("Signature Date", "signature_date", FieldKind::Text),
];

const POLITICAL_ACTION_FUND: &[Row] = &[
    (
        "Selected Monthly Amount",
        "selected_monthly_amount",
        FieldKind::Text,
    ),
    (
        "Custom Amount (if Other)",
        "custom_amount_if_other",
        FieldKind::Text,
    ),
    ("PAC Authorization", "pac_authorization", FieldKind::Checkbox),
];

const VOLUNTEER_INTERESTS: &[Row] = &[
    ("Political Action", "volunteer_political_action", FieldKind::Checkbox),
    ("Communications", "volunteer_communications", FieldKind::Checkbox),
    (
        "Accounting & Bookkeeping",
        "volunteer_accounting_bookkeeping",
        FieldKind::Checkbox,
    ),
    ("Organizing Events", "volunteer_organizing_events", FieldKind::Checkbox),
    ("Training & Education", "volunteer_training_education", FieldKind::Checkbox),
    (
        "Address Co-Worker Concerns",
        "volunteer_address_coworker_concerns",
        FieldKind::Checkbox,
    ),
    ("Social Justice", "volunteer_social_justice", FieldKind::Checkbox),
    ("Data Input", "volunteer_data_input", FieldKind::Checkbox),
    ("Share Info with Co-Workers", "volunteer_share_info", FieldKind::Checkbox),
];

/// Render the membership commitment form to `output_path`
pub fn generate(output_path: &Path, ctx: &RenderContext<'_>) -> Result<()> {
    let layout = &ctx.config.layout;
    let branding = &ctx.config.branding;
    let margin = layout.margin;
    let content_width = layout.content_width();

    let mut canvas = new_canvas(ctx, TITLE);
    let mut y = layout.top();

    y = draw_logos(&mut canvas, ctx, y);
    y -= spacer_height(1.0);

    canvas.set_font(branding.font, 16.0);
    canvas.set_fill_color(branding.brand_blue);
    canvas.draw_centred_string(
        layout.page_size.width / 2.0,
        y - 6.0,
        ctx.title_or(TITLE),
    );
    y -= 18.0;
    horizontal_rule(&mut canvas, ctx, margin, y, content_width, 0.5);
    y -= spacer_height(1.0);

    y = section_fields(&mut canvas, ctx, y, Some("MEMBER INFORMATION"), MEMBER_INFORMATION)?;
    y -= spacer_height(0.5);
    y = section_fields(&mut canvas, ctx, y, Some("CONTACT INFORMATION"), CONTACT_INFORMATION)?;
    y -= spacer_height(0.5);

    // Commitment text, sized to however many lines it wraps to
    let text_width = content_width - 28.0;
    let lines = branding
        .font
        .wrap_text(COMMITMENT_TEXT, branding.font_size_body, text_width);
    let height = SECTION_TITLE_HEIGHT + lines.len() as f32 * COMMITMENT_LINE_HEIGHT + 10.0;
    y = ensure_space(&mut canvas, ctx, y, height)?;
    debug!(lines = lines.len(), "Drawing membership authorization");
    let bottom = boxed_section(
        &mut canvas,
        ctx,
        margin,
        y,
        content_width,
        height,
        Some("MEMBERSHIP AUTHORIZATION"),
    );
    canvas.set_font(branding.font, branding.font_size_body);
    canvas.set_fill_color(branding.brand_dark);
    let mut baseline = y - SECTION_TITLE_HEIGHT - COMMITMENT_LINE_HEIGHT;
    for line in &lines {
        canvas.draw_string(margin + 14.0, baseline, line);
        baseline -= COMMITMENT_LINE_HEIGHT;
    }
    y = bottom - spacer_height(0.5);

    y = section_fields(&mut canvas, ctx, y, None, COMMITMENT)?;
    y -= spacer_height(0.5);
    y = section_fields(&mut canvas, ctx, y, Some("SIGNATURE"), SIGNATURE)?;
    y -= spacer_height(0.5);
    y = section_fields(
        &mut canvas,
        ctx,
        y,
        Some("AFT-OREGON POLITICAL ACTION FUND (OPTIONAL)"),
        POLITICAL_ACTION_FUND,
    )?;
    y -= spacer_height(0.5);
    section_fields(
        &mut canvas,
        ctx,
        y,
        Some("VOLUNTEER INTERESTS (OPTIONAL)"),
        VOLUNTEER_INTERESTS,
    )?;

    canvas.save(output_path)
}

/// Up to two logos side by side, each centred in half the content width.
///
/// Without logos, two small placeholders keep the title position stable.
/// Returns the y below the logo band.
fn draw_logos(canvas: &mut Canvas, ctx: &RenderContext<'_>, y: f32) -> f32 {
    let margin = ctx.config.layout.margin;
    let half_width = ctx.config.layout.content_width() / 2.0;
    let logos = load_logos(ctx, 2);

    if logos.is_empty() {
        let placeholder_height = LOGO_HEIGHT.min(36.0);
        for slot in 0..2 {
            let x = margin + slot as f32 * half_width + (half_width - PLACEHOLDER_WIDTH) / 2.0;
            canvas.set_fill_color(PLACEHOLDER_FILL);
            canvas.set_stroke_color(CELL_BORDER);
            canvas.set_line_width(0.5);
            canvas.rect(
                x,
                y - placeholder_height,
                PLACEHOLDER_WIDTH,
                placeholder_height,
                Paint::FillStroke,
            );
            canvas.set_fill_color(ctx.config.branding.brand_dark);
            canvas.set_font(ctx.config.branding.font, 8.0);
            canvas.draw_centred_string(
                x + PLACEHOLDER_WIDTH / 2.0,
                y - placeholder_height / 2.0 - 3.0,
                "Logo",
            );
        }
    } else {
        for (slot, logo) in logos.iter().enumerate() {
            let (w, h) = logo.fit_within(half_width - 12.0, LOGO_HEIGHT);
            let x = margin + slot as f32 * half_width + (half_width - w) / 2.0;
            canvas.draw_image(logo, x, y - h, w, h);
        }
    }

    y - LOGO_HEIGHT
}

/// Draw a boxed label/value table with an optional title bar.
///
/// Returns the y of the box's lower edge.
fn section_fields(
    canvas: &mut Canvas,
    ctx: &RenderContext<'_>,
    y: f32,
    title: Option<&str>,
    rows: &[Row],
) -> Result<f32> {
    let margin = ctx.config.layout.margin;
    let width = ctx.config.layout.content_width();
    let title_height = if title.is_some() {
        SECTION_TITLE_HEIGHT
    } else {
        0.0
    };
    let height = title_height + rows.len() as f32 * ROW_STEP;

    let y = ensure_space(canvas, ctx, y, height)?;
    debug!(section = title.unwrap_or("untitled"), rows = rows.len(), "Drawing section");
    let bottom = boxed_section(canvas, ctx, margin, y, width, height, title);

    let inner_top = y - title_height;
    let value_x = margin + VALUE_X_OFFSET;
    let value_width = width - VALUE_X_OFFSET - 6.0;
    let baseline_offset = ROW_STEP / 2.0 + ctx.config.branding.font_size_label / 2.0;

    // column divider and row grid
    canvas.set_stroke_color(CELL_BORDER);
    canvas.set_line_width(0.25);
    canvas.line(margin + LABEL_WIDTH, inner_top, margin + LABEL_WIDTH, bottom);
    for i in 1..rows.len() {
        let line_y = inner_top - i as f32 * ROW_STEP;
        canvas.line(margin, line_y, margin + width, line_y);
    }

    let mut row_top = inner_top;
    for &(caption, name, kind) in rows {
        label(
            canvas,
            ctx,
            margin + 6.0,
            row_top - baseline_offset,
            &format!("{caption}:"),
        );
        match kind {
            FieldKind::Text => {
                let top = row_top - (ROW_STEP - FIELD_HEIGHT) / 2.0;
                text_input(canvas, ctx, name, value_x, top, value_width, FIELD_HEIGHT);
            }
            FieldKind::Checkbox => {
                let top = row_top - (ROW_STEP - CHECKBOX_SIZE) / 2.0;
                checkbox_input(canvas, ctx, name, value_x, top, CHECKBOX_SIZE)?;
            }
        }
        row_top -= ROW_STEP;
    }

    Ok(bottom)
}

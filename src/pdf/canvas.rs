//! A page-oriented drawing surface that writes one PDF file.
//!
//! `Canvas` records content-stream operations for the current page, keeps the
//! graphics state (colors, line width, font) across page breaks, and collects
//! AcroForm widgets. Nothing touches the filesystem until [`Canvas::save`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::core::config::PageSize;
use crate::core::error::Result;
use crate::pdf::fonts::{encode_win_ansi, text_string};
use crate::pdf::{Checkbox, Color, Logo, StandardFont, TextField};

/// How a closed path is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Stroke,
    Fill,
    FillStroke,
}

impl Paint {
    fn operator(&self) -> &'static str {
        match self {
            Self::Stroke => "S",
            Self::Fill => "f",
            Self::FillStroke => "B",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    line_width: f32,
    font: StandardFont,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            font: StandardFont::Helvetica,
            font_size: 12.0,
        }
    }
}

struct PageState {
    id: ObjectId,
    operations: Vec<Operation>,
    annots: Vec<Object>,
    fonts: BTreeSet<StandardFont>,
    xobjects: Dictionary,
    dirty: bool,
}

impl PageState {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            operations: Vec::new(),
            annots: Vec::new(),
            fonts: BTreeSet::new(),
            xobjects: Dictionary::new(),
            dirty: false,
        }
    }
}

pub struct Canvas {
    doc: Document,
    pages_id: ObjectId,
    page_size: PageSize,
    fonts: BTreeMap<StandardFont, ObjectId>,
    page: PageState,
    page_ids: Vec<ObjectId>,
    fields: Vec<ObjectId>,
    state: GraphicsState,
    image_count: usize,
    title: Option<String>,
    author: Option<String>,
}

impl Canvas {
    pub fn new(page_size: PageSize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let first_page = doc.new_object_id();
        let mut canvas = Self {
            doc,
            pages_id,
            page_size,
            fonts: BTreeMap::new(),
            page: PageState::new(first_page),
            page_ids: Vec::new(),
            fields: Vec::new(),
            state: GraphicsState::default(),
            image_count: 0,
            title: None,
            author: None,
        };
        canvas.restore_state();
        canvas
    }

    /// Number of pages finished so far plus the one being drawn
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = Some(author.into());
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
        self.push("rg", color.operands());
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
        self.push("RG", color.operands());
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
        self.push("w", vec![width.into()]);
    }

    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.state.font = font;
        self.state.font_size = size;
    }

    /// Width of `text` in the current font
    pub fn string_width(&self, text: &str) -> f32 {
        self.state.font.string_width(text, self.state.font_size)
    }

    /// Draw `text` with its baseline starting at (`x`, `y`)
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        let font = self.state.font;
        self.use_font(font);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![font.resource_name().into(), self.state.font_size.into()],
        );
        self.push("Td", vec![x.into(), y.into()]);
        self.push("Tj", vec![Object::string_literal(encode_win_ansi(text))]);
        self.push("ET", vec![]);
    }

    /// Draw `text` horizontally centred on `x`
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.string_width(text);
        self.draw_string(x - width / 2.0, y, text);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push("m", vec![x1.into(), y1.into()]);
        self.push("l", vec![x2.into(), y2.into()]);
        self.push("S", vec![]);
    }

    /// Rectangle with its bottom-left corner at (`x`, `y`)
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        self.push(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        );
        self.push(paint.operator(), vec![]);
    }

    /// Place `logo` scaled to `width` x `height` with its bottom-left at (`x`, `y`)
    pub fn draw_image(&mut self, logo: &Logo, x: f32, y: f32, width: f32, height: f32) {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let image_id = self.doc.add_object(logo.to_xobject());
        self.page.xobjects.set(name.as_str(), image_id);

        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                width.into(),
                0_i64.into(),
                0_i64.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        );
        self.push("Do", vec![name.as_str().into()]);
        self.push("Q", vec![]);
    }

    /// Add a fillable text field to the current page
    pub fn text_field(&mut self, field: &TextField) {
        self.use_font(StandardFont::Helvetica);
        let widget = field.widget(self.page.id);
        self.add_widget(widget);
    }

    /// Add a fillable checkbox to the current page
    pub fn checkbox(&mut self, checkbox: &Checkbox) -> Result<()> {
        let dingbats = self.font_id(StandardFont::ZapfDingbats);
        let on = self.doc.add_object(checkbox.appearance(dingbats, true)?);
        let off = self.doc.add_object(checkbox.appearance(dingbats, false)?);
        let widget = checkbox.widget(self.page.id, on, off);
        self.add_widget(widget);
        Ok(())
    }

    /// Number of AcroForm fields added so far
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Finish the current page and start a new one with the same graphics state
    pub fn show_page(&mut self) -> Result<()> {
        self.finish_page()?;
        let next = self.doc.new_object_id();
        self.page = PageState::new(next);
        self.restore_state();
        Ok(())
    }

    /// Finish the document and write it to `path`
    pub fn save(mut self, path: &Path) -> Result<()> {
        if self.page.dirty || self.page_ids.is_empty() {
            self.finish_page()?;
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        if !self.fields.is_empty() {
            let acro_form = self.acro_form();
            catalog.set("AcroForm", acro_form);
        }
        let catalog_id = self.doc.add_object(catalog);
        let info = self.info();
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        self.doc.save(path)?;
        debug!(
            path = %path.display(),
            pages = self.page_ids.len(),
            fields = self.fields.len(),
            "Saved PDF"
        );
        Ok(())
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.page.operations.push(Operation::new(operator, operands));
        self.page.dirty = true;
    }

    /// Re-emit colors and line width at the top of a fresh page
    fn restore_state(&mut self) {
        let state = self.state;
        self.page.operations.extend([
            Operation::new("rg", state.fill.operands()),
            Operation::new("RG", state.stroke.operands()),
            Operation::new("w", vec![state.line_width.into()]),
        ]);
    }

    fn use_font(&mut self, font: StandardFont) {
        self.font_id(font);
        self.page.fonts.insert(font);
    }

    fn font_id(&mut self, font: StandardFont) -> ObjectId {
        if let Some(id) = self.fonts.get(&font) {
            return *id;
        }
        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
        };
        if font != StandardFont::ZapfDingbats {
            dict.set("Encoding", "WinAnsiEncoding");
        }
        let id = self.doc.add_object(dict);
        self.fonts.insert(font, id);
        id
    }

    fn add_widget(&mut self, widget: Dictionary) {
        let id = self.doc.add_object(widget);
        self.page.annots.push(id.into());
        self.fields.push(id);
        self.page.dirty = true;
    }

    fn finish_page(&mut self) -> Result<()> {
        let operations = std::mem::take(&mut self.page.operations);
        let content = Content { operations }.encode()?;
        let content_id = self
            .doc
            .add_object(lopdf::Stream::new(Dictionary::new(), content));

        let mut font_resources = Dictionary::new();
        let fonts: Vec<StandardFont> = self.page.fonts.iter().copied().collect();
        for font in fonts {
            let id = self.font_id(font);
            font_resources.set(font.resource_name(), id);
        }
        let mut resources = dictionary! { "Font" => font_resources };
        if !self.page.xobjects.is_empty() {
            resources.set("XObject", std::mem::take(&mut self.page.xobjects));
        }

        let media_box: Vec<Object> = vec![
            0_i64.into(),
            0_i64.into(),
            self.page_size.width.into(),
            self.page_size.height.into(),
        ];
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => resources,
        };
        if !self.page.annots.is_empty() {
            page.set("Annots", std::mem::take(&mut self.page.annots));
        }
        self.doc.objects.insert(self.page.id, Object::Dictionary(page));
        self.page_ids.push(self.page.id);
        self.page.dirty = false;
        Ok(())
    }

    fn acro_form(&mut self) -> Dictionary {
        let helv = self.font_id(StandardFont::Helvetica);
        let dingbats = self.font_id(StandardFont::ZapfDingbats);
        let fields: Vec<Object> = self.fields.iter().map(|id| Object::from(*id)).collect();
        dictionary! {
            "Fields" => fields,
            "NeedAppearances" => true,
            "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
            "DR" => dictionary! {
                "Font" => dictionary! {
                    StandardFont::Helvetica.resource_name() => helv,
                    StandardFont::ZapfDingbats.resource_name() => dingbats,
                },
            },
        }
    }

    fn info(&self) -> Dictionary {
        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("formsmith ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(
                Local::now().format("D:%Y%m%d%H%M%S").to_string(),
            ),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        if let Some(author) = &self.author {
            info.set("Author", text_string(author));
        }
        info
    }
}

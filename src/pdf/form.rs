//! AcroForm widgets: fillable text fields and checkboxes.
//!
//! Every field is a merged field/widget annotation. The catalog's AcroForm
//! sets `NeedAppearances`, so viewers regenerate text field appearances.
//! Checkboxes carry explicit `Yes`/`Off` appearance streams.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};

use crate::core::error::Result;
use crate::pdf::fonts::text_string;
use crate::pdf::{Color, StandardFont};

/// Annotation flag: print the widget with the page
const FLAG_PRINT: i64 = 4;

/// ZapfDingbats glyph "4" is a check mark
const CHECK_GLYPH: &str = "4";

/// A fillable single-line text field. Coordinates are PDF user space
/// (origin bottom-left); `y` is the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Zero lets the viewer auto-size the text
    pub font_size: f32,
    pub border: Color,
}

impl TextField {
    pub fn new(name: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            font_size: 0.0,
            border: Color::BLACK,
        }
    }

    pub fn with_border(mut self, border: Color) -> Self {
        self.border = border;
        self
    }

    pub(crate) fn widget(&self, page: ObjectId) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(self.name.as_str()),
            "TU" => text_string(&self.name),
            "Rect" => rect(self.x, self.y, self.width, self.height),
            "F" => FLAG_PRINT,
            "P" => page,
            "DA" => Object::string_literal(format!(
                "/{} {} Tf 0 g",
                StandardFont::Helvetica.resource_name(),
                self.font_size
            )),
            "BS" => dictionary! { "W" => 1_i64, "S" => "I" },
        };
        dict.set("MK", appearance_characteristics(self.border, None));
        dict
    }
}

/// A fillable checkbox, unchecked until the user ticks it. `y` is the
/// bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkbox {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub border: Color,
}

impl Checkbox {
    pub fn new(name: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            size,
            border: Color::BLACK,
        }
    }

    pub fn with_border(mut self, border: Color) -> Self {
        self.border = border;
        self
    }

    pub(crate) fn widget(&self, page: ObjectId, on: ObjectId, off: ObjectId) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Btn",
            "T" => Object::string_literal(self.name.as_str()),
            "TU" => text_string(&self.name),
            "Rect" => rect(self.x, self.y, self.size, self.size),
            "F" => FLAG_PRINT,
            "P" => page,
            "V" => "Off",
            "AS" => "Off",
            "DA" => Object::string_literal(format!(
                "/{} 0 Tf 0 g",
                StandardFont::ZapfDingbats.resource_name()
            )),
            "BS" => dictionary! { "W" => 1_i64, "S" => "S" },
            "AP" => dictionary! {
                "N" => dictionary! { "Yes" => on, "Off" => off },
            },
        };
        dict.set("MK", appearance_characteristics(self.border, Some(CHECK_GLYPH)));
        dict
    }

    /// Form XObject drawn for one state of the box
    pub(crate) fn appearance(&self, dingbats: ObjectId, on: bool) -> Result<Stream> {
        let s = self.size;
        let [r, g, b] = self.border.components();
        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("g", vec![1_i64.into()]),
            Operation::new("re", vec![0_i64.into(), 0_i64.into(), s.into(), s.into()]),
            Operation::new("f", vec![]),
            Operation::new("w", vec![1_i64.into()]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "re",
                vec![0.5_f32.into(), 0.5_f32.into(), (s - 1.0).into(), (s - 1.0).into()],
            ),
            Operation::new("S", vec![]),
        ];
        if on {
            // 0.846 em wide, 0.7 em tall: ZapfDingbats check mark bounds
            let glyph_size = s * 0.8;
            let glyph_x = (s - glyph_size * 0.846) / 2.0;
            let glyph_y = (s - glyph_size * 0.7) / 2.0;
            operations.extend([
                Operation::new("g", vec![0_i64.into()]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        StandardFont::ZapfDingbats.resource_name().into(),
                        glyph_size.into(),
                    ],
                ),
                Operation::new("Td", vec![glyph_x.into(), glyph_y.into()]),
                Operation::new("Tj", vec![Object::string_literal(CHECK_GLYPH)]),
                Operation::new("ET", vec![]),
            ]);
        }
        operations.push(Operation::new("Q", vec![]));

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => rect(0.0, 0.0, s, s),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    StandardFont::ZapfDingbats.resource_name() => dingbats,
                },
            },
        };
        Ok(Stream::new(dict, Content { operations }.encode()?))
    }
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> Vec<Object> {
    vec![x.into(), y.into(), (x + width).into(), (y + height).into()]
}

fn appearance_characteristics(border: Color, caption: Option<&str>) -> Dictionary {
    let mut mk = dictionary! {
        "BC" => border.operands(),
        "BG" => Color::WHITE.operands(),
    };
    if let Some(caption) = caption {
        mk.set("CA", Object::string_literal(caption));
    }
    mk
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(dict: &Dictionary, key: &[u8]) -> Vec<u8> {
        dict.get(key).unwrap().as_name().unwrap().to_vec()
    }

    #[test]
    fn test_text_widget_shape() {
        let field = TextField::new("member_name", 10.0, 20.0, 100.0, 18.0);
        let dict = field.widget((7, 0));

        assert_eq!(name_of(&dict, b"FT"), b"Tx".to_vec());
        assert_eq!(dict.get(b"T").unwrap().as_str().unwrap(), b"member_name");
        assert_eq!(dict.get(b"TU").unwrap().as_str().unwrap(), b"member_name");
        assert_eq!(dict.get(b"P").unwrap().as_reference().unwrap(), (7, 0));
        let rect = dict.get(b"Rect").unwrap().as_array().unwrap();
        assert_eq!(rect.len(), 4);
        assert_eq!(rect[2].as_float().unwrap(), 110.0);
        assert_eq!(rect[3].as_float().unwrap(), 38.0);
    }

    #[test]
    fn test_border_color_comes_from_the_widget() {
        let teal = Color::rgb(0x00, 0x80, 0x80);
        let field = TextField::new("a", 0.0, 0.0, 50.0, 16.0).with_border(teal);
        let mk = field.widget((1, 0)).get(b"MK").unwrap().as_dict().unwrap().clone();
        let bc = mk.get(b"BC").unwrap().as_array().unwrap();
        assert_eq!(bc[1].as_float().unwrap(), teal.components()[1]);

        let checkbox = Checkbox::new("b", 0.0, 0.0, 12.0).with_border(teal);
        let mk = checkbox
            .widget((1, 0), (2, 0), (3, 0))
            .get(b"MK")
            .unwrap()
            .as_dict()
            .unwrap()
            .clone();
        let bc = mk.get(b"BC").unwrap().as_array().unwrap();
        assert_eq!(bc[2].as_float().unwrap(), teal.components()[2]);
    }

    #[test]
    fn test_checkbox_starts_unchecked() {
        let checkbox = Checkbox::new("agree", 0.0, 0.0, 12.0);
        let dict = checkbox.widget((3, 0), (4, 0), (5, 0));
        assert_eq!(name_of(&dict, b"FT"), b"Btn".to_vec());
        assert_eq!(name_of(&dict, b"V"), b"Off".to_vec());
        assert_eq!(name_of(&dict, b"AS"), b"Off".to_vec());
    }

    #[test]
    fn test_checkbox_appearance_draws_glyph_only_when_on() {
        let checkbox = Checkbox::new("agree", 0.0, 0.0, 12.0);
        let on = checkbox.appearance((9, 0), true).unwrap();
        let off = checkbox.appearance((9, 0), false).unwrap();

        let on_ops = Content::decode(&on.content).unwrap().operations;
        let off_ops = Content::decode(&off.content).unwrap().operations;
        assert!(on_ops.iter().any(|op| op.operator == "Tj"));
        assert!(!off_ops.iter().any(|op| op.operator == "Tj"));
    }
}

//! PDF drawing layer
//!
//! A thin, synchronous wrapper over `lopdf`: a [`Canvas`] that records
//! page content and AcroForm widgets, base-14 font metrics, colors and
//! logo images.

pub mod canvas;
pub mod color;
pub mod fonts;
pub mod form;
pub mod logo;

pub use canvas::{Canvas, Paint};
pub use color::Color;
pub use fonts::StandardFont;
pub use form::{Checkbox, TextField};
pub use logo::{Logo, find_logos};

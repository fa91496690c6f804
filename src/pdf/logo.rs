//! Logo assets loaded from the optional asset directory

use std::path::{Path, PathBuf};

use lopdf::{Stream, dictionary};
use tracing::debug;

use crate::core::error::{Error, Result};

/// Extensions searched, in priority order
pub const LOGO_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decoded RGB image ready to be embedded as an image XObject
#[derive(Debug, Clone)]
pub struct Logo {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
}

impl Logo {
    /// Decode a PNG or JPEG file. Any failure is reported as `AssetMissing`.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .map_err(|e| Error::asset_missing(format!("{}: {e}", path.display())))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::asset_missing(format!("{}: empty image", path.display())));
        }
        debug!(path = %path.display(), width, height, "Loaded logo");
        Ok(Self {
            width,
            height,
            rgb: rgb.into_raw(),
        })
    }

    /// Largest size with the image's aspect ratio that fits the box
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let scale = (max_width / self.width as f32).min(max_height / self.height as f32);
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    pub(crate) fn to_xobject(&self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(self.width),
            "Height" => i64::from(self.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        };
        Stream::new(dict, self.rgb.clone())
    }
}

/// Up to `limit` logo files in `dir`: all PNGs first, then JPGs, then
/// JPEGs, each group sorted by file name.
///
/// A missing directory is `AssetMissing`; an empty one is `Ok(vec![])`.
pub fn find_logos(dir: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::asset_missing(format!(
            "Logos directory not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut found = Vec::new();
    for ext in LOGO_EXTENSIONS {
        for path in &files {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext));
            if matches && found.len() < limit {
                found.push(path.clone());
            }
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_find_logos_missing_dir() {
        let result = find_logos(Path::new("/definitely/not/here"), 2);
        assert!(matches!(result, Err(Error::AssetMissing(_))));
    }

    #[test]
    fn test_find_logos_orders_by_extension_then_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.jpg", "z.png", "a.png", "notes.txt"] {
            fs::write(temp_dir.path().join(name), b"x").unwrap();
        }

        let found = find_logos(temp_dir.path(), 5).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "z.png", "b.jpg"]);

        assert_eq!(find_logos(temp_dir.path(), 1).unwrap().len(), 1);
    }

    #[test]
    fn test_load_and_fit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.png");
        write_png(&path, 200, 100);

        let logo = Logo::load(&path).unwrap();
        assert_eq!((logo.width, logo.height), (200, 100));
        assert_eq!(logo.fit_within(100.0, 100.0), (100.0, 50.0));
        assert_eq!(logo.fit_within(400.0, 40.0), (80.0, 40.0));
    }

    #[test]
    fn test_load_garbage_is_asset_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, b"not an image").unwrap();
        assert!(matches!(Logo::load(&path), Err(Error::AssetMissing(_))));
    }
}

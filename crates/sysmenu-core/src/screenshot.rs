//! Window captures: pixel layout, image files and clipboard bitmaps.

use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb};

use crate::{Error, Result};

const DIB_HEADER_LEN: usize = 40;

/// A captured window as top-down RGB rows without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Bytes per 24-bit DIB row, padded to a four-byte boundary.
fn dib_stride(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}

impl Screenshot {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(3)?;
        (width > 0 && height > 0 && pixels.len() == expected).then_some(Self { width, height, pixels })
    }

    /// Converts top-down 24-bit BGR rows, each padded to four bytes, as
    /// `GetDIBits` returns them for a negative height.
    pub fn from_bgr_rows(width: u32, height: u32, rows: &[u8]) -> Option<Self> {
        let stride = dib_stride(width);
        if stride == 0 || rows.len() < stride * height as usize {
            return None;
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for row in rows.chunks_exact(stride).take(height as usize) {
            for bgr in row[..width as usize * 3].chunks_exact(3) {
                pixels.extend_from_slice(&[bgr[2], bgr[1], bgr[0]]);
            }
        }
        Self::from_rgb(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Writes the capture, picking the format from the file extension.
    /// Unknown or missing extensions are written as PNG.
    pub fn save(&self, path: &Path) -> Result<()> {
        let buffer: ImageBuffer<Rgb<u8>, &[u8]> =
            ImageBuffer::from_raw(self.width, self.height, self.pixels.as_slice())
                .ok_or_else(|| Error::Image(format!("{}x{} capture is truncated", self.width, self.height)))?;
        buffer
            .save_with_format(path, format_for(path))
            .map_err(|e| Error::Image(format!("{}: {e}", path.display())))
    }

    /// A packed `CF_DIB` block: a `BITMAPINFOHEADER` followed by
    /// bottom-up, padded BGR rows.
    pub fn to_dib(&self) -> Vec<u8> {
        let stride = dib_stride(self.width);
        let image_len = stride * self.height as usize;
        let mut dib = Vec::with_capacity(DIB_HEADER_LEN + image_len);

        dib.extend_from_slice(&(DIB_HEADER_LEN as u32).to_le_bytes());
        dib.extend_from_slice(&(self.width as i32).to_le_bytes());
        dib.extend_from_slice(&(self.height as i32).to_le_bytes());
        dib.extend_from_slice(&1u16.to_le_bytes());
        dib.extend_from_slice(&24u16.to_le_bytes());
        dib.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        dib.extend_from_slice(&(image_len as u32).to_le_bytes());
        dib.extend_from_slice(&[0; 16]);

        let row_len = self.width as usize * 3;
        for row in self.pixels.chunks_exact(row_len).rev() {
            for rgb in row.chunks_exact(3) {
                dib.extend_from_slice(&[rgb[2], rgb[1], rgb[0]]);
            }
            dib.resize(dib.len() + stride - row_len, 0);
        }
        dib
    }
}

/// Suggested file name for a saved capture of a window titled `title`.
pub fn file_name_for(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' { c } else { '_' })
        .take(60)
        .collect();
    match stem.trim() {
        "" => "screenshot.png".to_string(),
        stem => format!("{stem}.png"),
    }
}

fn format_for(path: &Path) -> ImageFormat {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("bmp") => ImageFormat::Bmp,
        Some("gif") => ImageFormat::Gif,
        Some("jpg" | "jpeg") => ImageFormat::Jpeg,
        Some("tif" | "tiff") => ImageFormat::Tiff,
        _ => ImageFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Red then blue, one row.
    fn two_pixels() -> Screenshot {
        Screenshot::from_rgb(2, 1, vec![255, 0, 0, 0, 0, 255]).expect("valid")
    }

    #[test]
    fn padded_bgr_rows_become_rgb() {
        // Arrange
        // 1x2 image: stride is 4 bytes, the last one padding.
        let rows = [0x10, 0x20, 0x30, 0xEE, 0x01, 0x02, 0x03, 0xEE];

        // Act
        let shot = Screenshot::from_bgr_rows(1, 2, &rows).expect("valid");

        // Assert
        assert_eq!(shot.pixels(), &[0x30, 0x20, 0x10, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn short_buffers_are_rejected() {
        // Assert
        assert!(Screenshot::from_bgr_rows(2, 2, &[0; 8]).is_none());
        assert!(Screenshot::from_rgb(0, 1, Vec::new()).is_none());
        assert!(Screenshot::from_rgb(2, 1, vec![0; 5]).is_none());
    }

    #[test]
    fn clipboard_bitmap_is_bottom_up_and_padded() {
        // Arrange
        let shot = Screenshot::from_rgb(1, 2, vec![1, 2, 3, 4, 5, 6]).expect("valid");

        // Act
        let dib = shot.to_dib();

        // Assert
        assert_eq!(dib.len(), DIB_HEADER_LEN + 8);
        assert_eq!(&dib[4..8], &1i32.to_le_bytes());
        assert_eq!(&dib[8..12], &2i32.to_le_bytes());
        assert_eq!(&dib[14..16], &24u16.to_le_bytes());
        assert_eq!(&dib[DIB_HEADER_LEN..], &[6, 5, 4, 0, 3, 2, 1, 0]);
    }

    #[test]
    fn saved_file_format_follows_extension() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("sysmenu-shot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let shot = two_pixels();

        // Act
        shot.save(&dir.join("a.bmp")).expect("bmp");
        shot.save(&dir.join("b")).expect("no extension");

        // Assert
        let bmp = std::fs::read(dir.join("a.bmp")).expect("read bmp");
        let png = std::fs::read(dir.join("b")).expect("read png");
        assert_eq!(&bmp[..2], b"BM");
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::open(dir.join("a.bmp")).expect("decode").to_rgb8();
        assert_eq!(decoded.get_pixel(1, 0), &Rgb([0, 0, 255]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn suggested_names_drop_path_characters() {
        // Assert
        assert_eq!(file_name_for("C:\\a/b: notes"), "C__a_b_ notes.png");
        assert_eq!(file_name_for("   "), "screenshot.png");
    }
}

use image::{GrayImage, Luma};

use crate::builder::{Module, QR};
use crate::common::error::{QRError, QRResult};

// 256 MiB of 8 bit pixels
pub static MAX_IMAGE_PIXELS: u64 = 1 << 28;

// Render
//------------------------------------------------------------------------------

impl QR {
    /// Renders black modules on white. Each module becomes a `box_size` pixel square and
    /// the quiet zone is `border` modules wide on every side.
    pub fn render(&self, box_size: u32, border: u32) -> QRResult<GrayImage> {
        self.render_with_colors(box_size, border, Luma([0]), Luma([255]))
    }

    pub fn render_with_colors(
        &self,
        box_size: u32,
        border: u32,
        dark: Luma<u8>,
        light: Luma<u8>,
    ) -> QRResult<GrayImage> {
        if box_size == 0 {
            return Err(QRError::InvalidBoxSize);
        }

        let total_modules = u32::try_from(self.width())
            .ok()
            .and_then(|w| border.checked_mul(2)?.checked_add(w))
            .ok_or(QRError::ImageTooLarge)?;
        let total_sz = total_modules.checked_mul(box_size).ok_or(QRError::ImageTooLarge)?;
        if u64::from(total_sz) * u64::from(total_sz) > MAX_IMAGE_PIXELS {
            return Err(QRError::ImageTooLarge);
        }
        let qz_sz = border * box_size;
        let qr_sz = self.width() as u32 * box_size;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, light);
        for i in qz_sz..qz_sz + qr_sz {
            for j in qz_sz..qz_sz + qr_sz {
                let r = ((i - qz_sz) / box_size) as i16;
                let c = ((j - qz_sz) / box_size) as i16;

                let module = self.get(r, c);
                debug_assert!(module != Module::Empty, "Empty module found at: {r} {c}");
                canvas.put_pixel(j, i, module.select(dark, light));
            }
        }

        Ok(canvas)
    }
}

//! Packed monochrome framebuffer with per-pixel change detection.
//!
//! All screen drawing targets this 1-bit RAM bitmap instead of the panel.
//! After a frame completes, only the rectangular region containing changed
//! pixels is pushed to the downstream display in a single `fill_contiguous`
//! call, which keeps bus traffic on memory-in-pixel panels small.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

// The panel width is a multiple of 8, so rows pack without slack bytes.
const ROW_BYTES: usize = WIDTH / 8;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// 1 bpp framebuffer implementing `DrawTarget<Color = BinaryColor>`.
///
/// Bits are row-major, MSB first within each byte; a set bit is `On` (ink).
/// Out-of-bounds drawing is clipped, never an error.
pub struct FrameBuffer {
    bits: Vec<u8>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a framebuffer with every pixel off (background).
    pub fn new() -> Self {
        Self {
            bits: vec![0; ROW_BYTES * HEIGHT],
            dirty: None,
        }
    }

    /// Read back a single pixel. Out-of-bounds reads count as background.
    pub fn pixel(&self, x: usize, y: usize) -> BinaryColor {
        if x >= WIDTH || y >= HEIGHT {
            return BinaryColor::Off;
        }
        let set = self.bits[y * ROW_BYTES + x / 8] & (0x80 >> (x % 8)) != 0;
        if set { BinaryColor::On } else { BinaryColor::Off }
    }

    /// Write one pixel, expanding the dirty rect only if the bit changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let idx = y * ROW_BYTES + x / 8;
        let mask = 0x80 >> (x % 8);
        let next = if color.is_on() {
            self.bits[idx] | mask
        } else {
            self.bits[idx] & !mask
        };
        if next != self.bits[idx] {
            self.bits[idx] = next;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Push the dirty region to a downstream display, then reset the dirty
    /// state. If nothing changed since the last flush, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        trace!(
            "flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let bits = &self.bits;
        let colors = (rect.min_y..=rect.max_y).flat_map(move |y| {
            (rect.min_x..=rect.max_x).map(move |x| {
                let set = bits[y * ROW_BYTES + x / 8] & (0x80 >> (x % 8)) != 0;
                if set { BinaryColor::On } else { BinaryColor::Off }
            })
        });

        display.fill_contiguous(&area, colors)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let x_start = (area.top_left.x.max(0) as usize).min(WIDTH);
        let y_start = (area.top_left.y.max(0) as usize).min(HEIGHT);
        let x_end = ((area.top_left.x.max(0) as usize).saturating_add(area.size.width as usize))
            .min(WIDTH);
        let y_end = ((area.top_left.y.max(0) as usize).saturating_add(area.size.height as usize))
            .min(HEIGHT);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

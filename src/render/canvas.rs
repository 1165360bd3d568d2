/*
 *  render/canvas.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::palette::PanelColor;

/// A runtime-sized framebuffer in panel colors.
///
/// One render cycle produces one `Canvas`; the display sink consumes it
/// whole. Equality compares every pixel, which the tests lean on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    buf: Vec<PanelColor>,
    w: usize,
    h: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: PanelColor) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access
    pub fn pixels(&self) -> &[PanelColor] { &self.buf }

    pub fn get(&self, x: usize, y: usize) -> Option<PanelColor> {
        if x < self.w && y < self.h {
            Some(self.buf[y * self.w + x])
        } else {
            None
        }
    }

    /// Clear to a color
    pub fn clear_color(&mut self, color: PanelColor) {
        self.buf.fill(color);
    }

    /// Expand to interleaved RGB bytes (useful for sinks that preview or
    /// persist the frame rather than pushing palette indices).
    pub fn rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buf.len() * 3);
        for c in &self.buf {
            let (r, g, b) = c.rgb();
            out.push(r);
            out.push(g);
            out.push(b);
        }
        out
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = PanelColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let mut it = colors.into_iter();

        // fast path for the fully-on-canvas fills the primitives use
        let (x0, y0) = (area.top_left.x, area.top_left.y);
        if x0 >= 0
            && y0 >= 0
            && x0 as usize + width as usize <= self.w
            && y0 as usize + height as usize <= self.h
        {
            for row in 0..height as usize {
                let base = (y0 as usize + row) * self.w + x0 as usize;
                for col in 0..width as usize {
                    match it.next() {
                        Some(c) => self.buf[base + col] = c,
                        None => return Ok(()),
                    }
                }
            }
            return Ok(());
        }

        // clipped path: walk the whole area so the color stream stays
        // aligned with its row-major positions
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let Some(c) = it.next() else {
                    return Ok(());
                };
                if let Some(i) = self.idx(area.top_left + Point::new(col, row)) {
                    self.buf[i] = c;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut cv = Canvas::new(4, 4, PanelColor::White);
        cv.draw_iter([
            Pixel(Point::new(-1, 0), PanelColor::Red),
            Pixel(Point::new(1, 1), PanelColor::Red),
            Pixel(Point::new(4, 4), PanelColor::Red),
        ])
        .unwrap();
        assert_eq!(cv.get(1, 1), Some(PanelColor::Red));
        assert_eq!(cv.pixels().iter().filter(|c| **c == PanelColor::Red).count(), 1);
    }

    #[test]
    fn fills_past_the_right_edge_do_not_wrap() {
        let mut cv = Canvas::new(4, 4, PanelColor::White);
        cv.fill_contiguous(
            &Rectangle::new(Point::new(2, 0), Size::new(4, 2)),
            std::iter::repeat(PanelColor::Red).take(8),
        )
        .unwrap();
        assert_eq!(cv.get(2, 0), Some(PanelColor::Red));
        assert_eq!(cv.get(3, 1), Some(PanelColor::Red));
        // clipped columns must not spill onto the next row
        assert_eq!(cv.get(0, 1), Some(PanelColor::White));
        assert_eq!(cv.get(1, 0), Some(PanelColor::White));
        assert_eq!(cv.pixels().iter().filter(|c| **c == PanelColor::Red).count(), 4);
    }

    #[test]
    fn negative_origin_fills_keep_their_columns() {
        let mut cv = Canvas::new(4, 2, PanelColor::White);
        cv.fill_contiguous(
            &Rectangle::new(Point::new(-2, 0), Size::new(4, 1)),
            std::iter::repeat(PanelColor::Blue).take(4),
        )
        .unwrap();
        // only the on-canvas half of the rect lands, in place
        assert_eq!(cv.get(0, 0), Some(PanelColor::Blue));
        assert_eq!(cv.get(1, 0), Some(PanelColor::Blue));
        assert_eq!(cv.get(2, 0), Some(PanelColor::White));
        assert_eq!(cv.pixels().iter().filter(|c| **c == PanelColor::Blue).count(), 2);
    }

    #[test]
    fn equality_is_per_pixel() {
        let a = Canvas::new(8, 8, PanelColor::White);
        let mut b = Canvas::new(8, 8, PanelColor::White);
        assert_eq!(a, b);
        b.draw_iter([Pixel(Point::new(3, 3), PanelColor::Black)]).unwrap();
        assert_ne!(a, b);
    }
}

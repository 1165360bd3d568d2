use embedded_graphics::pixelcolor::{PixelColor, Rgb888, RgbColor};

/// The seven ink colors the UC8159-class panels can physically show.
///
/// The panel driver takes palette indices; everything upstream draws in
/// `PanelColor` and the sink quantizes on push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelColor {
    Black,
    White,
    Green,
    Blue,
    Red,
    Yellow,
    Orange,
}

impl PixelColor for PanelColor {
    type Raw = ();
}

impl PanelColor {
    /// Desaturated palette entry as rendered RGB, matching the panel
    /// vendor's lookup table.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PanelColor::Black => (0, 0, 0),
            PanelColor::White => (255, 255, 255),
            PanelColor::Green => (0, 255, 0),
            PanelColor::Blue => (0, 0, 255),
            PanelColor::Red => (255, 0, 0),
            PanelColor::Yellow => (255, 255, 0),
            PanelColor::Orange => (255, 140, 0),
        }
    }

    /// Palette index as the panel driver numbers them.
    pub fn index(self) -> u8 {
        match self {
            PanelColor::Black => 0,
            PanelColor::White => 1,
            PanelColor::Green => 2,
            PanelColor::Blue => 3,
            PanelColor::Red => 4,
            PanelColor::Yellow => 5,
            PanelColor::Orange => 6,
        }
    }

    const ALL: [PanelColor; 7] = [
        PanelColor::Black,
        PanelColor::White,
        PanelColor::Green,
        PanelColor::Blue,
        PanelColor::Red,
        PanelColor::Yellow,
        PanelColor::Orange,
    ];
}

impl From<Rgb888> for PanelColor {
    /// Nearest palette entry by squared RGB distance.
    fn from(c: Rgb888) -> Self {
        let (r, g, b) = (c.r() as i32, c.g() as i32, c.b() as i32);
        let mut best = PanelColor::Black;
        let mut best_d = i32::MAX;
        for cand in PanelColor::ALL {
            let (cr, cg, cb) = cand.rgb();
            let d = (r - cr as i32).pow(2) + (g - cg as i32).pow(2) + (b - cb as i32).pow(2);
            if d < best_d {
                best_d = d;
                best = cand;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_indices_are_stable() {
        assert_eq!(PanelColor::Black.index(), 0);
        assert_eq!(PanelColor::Orange.index(), 6);
    }

    #[test]
    fn nearest_palette_quantization() {
        assert_eq!(PanelColor::from(Rgb888::new(250, 250, 250)), PanelColor::White);
        assert_eq!(PanelColor::from(Rgb888::new(10, 10, 10)), PanelColor::Black);
        assert_eq!(PanelColor::from(Rgb888::new(255, 150, 20)), PanelColor::Orange);
    }
}

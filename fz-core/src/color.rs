//! Palettes and the mapping from escape counts to palette entries.

/// Index of an entry in a [Palette].
pub type PaletteIndex = u8;

/// Largest palette that can be addressed by a [PaletteIndex].
pub const MAX_COLORS: usize = PaletteIndex::MAX as usize + 1;

/// Packs 8-bit channels into a 24-bit `0xRRGGBB` color.
pub const fn rgb_to_int(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// An ordered list of 24-bit `0xRRGGBB` colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    /// Creates a palette from `0xRRGGBB` colors.
    ///
    /// There must be at least one color, and no more than [MAX_COLORS].
    pub fn new(colors: Vec<u32>) -> Result<Self, String> {
        if colors.is_empty() {
            return Err("palette must have at least one color".to_string());
        }
        if colors.len() > MAX_COLORS {
            return Err(format!(
                "palette has {} colors, at most {} are addressable",
                colors.len(),
                MAX_COLORS
            ));
        }
        if let Some(bad) = colors.iter().find(|c| **c > 0xFF_FF_FF) {
            return Err(format!("color {:#x} is not a 24-bit RGB value", bad));
        }
        Ok(Palette { colors })
    }

    /// Walks the edge of the RGB color cube, starting at pure red:
    /// red, yellow, green, cyan, blue, magenta, and back.
    ///
    /// Each entry moves one channel by `step`, saturating at 0 and 255.
    pub fn rainbow_walk(count: usize, step: u8) -> Result<Self, String> {
        let mut colors = Vec::with_capacity(count);
        let mut rgb: (i32, i32, i32) = (255, 0, 0);
        for _ in 0..count {
            colors.push(rgb_to_int(rgb.0 as u8, rgb.1 as u8, rgb.2 as u8));
            rgb = next_rainbow_color(rgb, step as i32);
        }
        Self::new(colors)
    }

    /// Evenly spaced hues around the color wheel, at full saturation and value.
    pub fn hue_wheel(count: usize) -> Result<Self, String> {
        let colors = (0..count)
            .map(|i| {
                let hue = (i * 360) as f64 / count as f64;
                let (r, g, b) = hsv::hsv_to_rgb(hue, 1.0, 1.0);
                rgb_to_int(r, g, b)
            })
            .collect();
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: PaletteIndex) -> Option<u32> {
        self.colors.get(index as usize).copied()
    }

    /// Splits the color at `index` into `[r, g, b]` channels.
    /// Out-of-range indices render as black.
    pub fn rgb(&self, index: PaletteIndex) -> [u8; 3] {
        let c = self.get(index).unwrap_or(0);
        [(c >> 16) as u8, (c >> 8) as u8, c as u8]
    }
}

fn next_rainbow_color((r, g, b): (i32, i32, i32), step: i32) -> (i32, i32, i32) {
    let (r, g, b) = if r == 255 && g < 255 && b == 0 {
        (r, g + step, b)
    } else if g == 255 && r > 0 {
        (r - step, g, b)
    } else if g == 255 && b < 255 {
        (r, g, b + step)
    } else if b == 255 && g > 0 {
        (r, g - step, b)
    } else if b == 255 && r < 255 {
        (r + step, g, b)
    } else if r == 255 && b > 0 {
        (r, g, b - step)
    } else {
        (r, g, b)
    };
    let clip = |v: i32| v.clamp(0, 255);
    (clip(r), clip(g), clip(b))
}

/// Maps escape counts linearly onto a palette.
///
/// Every `iter_step_size` iterations advance one palette entry;
/// counts past the end of the palette share the last entry.
#[derive(Clone, Debug)]
pub struct ColorMapper {
    palette: Palette,
    iter_step_size: u32,
}

impl ColorMapper {
    pub fn new(palette: Palette, iter_step_size: u32) -> Result<Self, String> {
        if iter_step_size == 0 {
            return Err("iteration step size must be at least 1".to_string());
        }
        Ok(ColorMapper {
            palette,
            iter_step_size,
        })
    }

    /// A mapper advancing one palette entry per iteration.
    pub fn linear(palette: Palette) -> Self {
        ColorMapper {
            palette,
            iter_step_size: 1,
        }
    }

    pub fn color_index(&self, iter_count: u32) -> PaletteIndex {
        let last = (self.num_colors() - 1) as u32;
        std::cmp::min(last, iter_count / self.iter_step_size) as PaletteIndex
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn num_colors(&self) -> usize {
        self.palette.len()
    }
}

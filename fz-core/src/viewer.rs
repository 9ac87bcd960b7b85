//! Incremental, column-at-a-time rendering of a fractal, with tap-to-zoom.
//!
//! A [FractalViewer] owns an indexed-color [PixelBuffer]. Each call to [FractalViewer::step]
//! fills in one column, so a driving loop can refresh the display or poll input between
//! columns. Zooming halves the visible span on each axis; the quadrant of the old image that
//! the new view covers is upscaled into the new buffer as a preview, and the pixels that land
//! exactly on old sample points are kept rather than recomputed.

use num::Integer;

use crate::{
    color::{ColorMapper, PaletteIndex},
    fractal::Fractal,
    numeric::Complex,
    viewport::{match_bounds_to_aspect_ratio, Bounds, Fencepost, Viewport},
    Pixel, Size,
};

/// A grid of palette indices, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    data: Vec<PaletteIndex>,
}

impl PixelBuffer {
    /// A buffer with every pixel set to palette entry 0.
    pub fn new(size: Size) -> Self {
        PixelBuffer {
            size,
            data: vec![0; size.width * size.height],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Panics if (x, y) is outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> PaletteIndex {
        self.data[self.offset(x, y)]
    }

    /// Panics if (x, y) is outside the buffer.
    pub fn set(&mut self, x: usize, y: usize, value: PaletteIndex) {
        let i = self.offset(x, y);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[PaletteIndex] {
        &self.data
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size.width && y < self.size.height,
            "pixel ({}, {}) outside {}x{} buffer",
            x,
            y,
            self.size.width,
            self.size.height
        );
        y * self.size.width + x
    }
}

/// Renders a fractal into a [PixelBuffer] one column at a time.
#[derive(Clone, Debug)]
pub struct FractalViewer {
    color_mapper: ColorMapper,
    fractal: &'static Fractal,
    max_iter: u32,
    viewport: Viewport,
    pixels: PixelBuffer,
    cursor: usize,
    first_render: bool,
    last_zoom_origin: Option<Pixel>,
}

impl FractalViewer {
    /// Creates a viewer with nothing rendered yet.
    ///
    /// Even dimensions are reduced by one, so there is always a center pixel.
    /// If `bounds` is None, the fractal's natural bounds are used.
    /// Either way, the bounds are widened to match the aspect ratio of the image.
    pub fn new(
        color_mapper: ColorMapper,
        max_iter: u32,
        fractal: &'static Fractal,
        size: Size,
        bounds: Option<Bounds>,
    ) -> Result<Self, String> {
        let size = Size::odd(size.width, size.height);
        if size.width < 3 || size.height < 3 {
            return Err(format!(
                "image of {}x{} pixels is too small to zoom",
                size.width, size.height
            ));
        }
        let bounds = bounds.unwrap_or_else(|| fractal.natural_bounds.clone());
        if !bounds.is_valid() {
            return Err(format!("invalid bounds: {:?}", bounds));
        }
        let bounds = match_bounds_to_aspect_ratio(&bounds, size);
        tracing::debug!(
            "new {} viewer: {}x{} over {:?}",
            fractal.name,
            size.width,
            size.height,
            bounds
        );

        Ok(FractalViewer {
            color_mapper,
            fractal,
            max_iter,
            viewport: Viewport::new(bounds, size),
            pixels: PixelBuffer::new(size),
            cursor: 0,
            first_render: true,
            last_zoom_origin: None,
        })
    }

    pub fn has_computation_left(&self) -> bool {
        self.cursor < self.viewport.size.width
    }

    /// Computes the next column of the image.
    ///
    /// After a zoom, pixels at even (x, y) already hold exact values carried over from
    /// the previous image, and are skipped.
    pub fn step(&mut self) {
        if !self.has_computation_left() {
            return;
        }
        let x = self.cursor;
        let limit = self.max_iter.saturating_sub(1);
        for y in 0..self.viewport.size.height {
            if !self.first_render && x.is_even() && y.is_even() {
                continue;
            }
            let point = self
                .viewport
                .pixel_to_complex(Pixel { x, y }, Fencepost::Center);
            let count = self.fractal.escape_count(point, limit);
            self.pixels.set(x, y, self.color_mapper.color_index(count));
        }
        tracing::trace!("computed column {}", x);
        self.cursor += 1;
    }

    /// Steps until the image is complete. Returns the number of columns computed.
    pub fn render_to_completion(&mut self) -> usize {
        let mut columns = 0;
        while self.has_computation_left() {
            self.step();
            columns += 1;
        }
        columns
    }

    /// Zooms in by a factor of two, centered on the clicked pixel where possible.
    ///
    /// The new window is snapped to a pixel of the current image and kept inside it,
    /// so that every other pixel of the new image coincides with a pixel of the old one.
    /// The new buffer is seeded with a 2x nearest-neighbor upscale of that region,
    /// and rendering restarts from the first column.
    ///
    /// Once the window is too small to halve at `f64` precision, the click is ignored
    /// and the current image is kept.
    pub fn register_click(&mut self, click: Pixel) {
        let size = self.viewport.size;
        let click_point = self.viewport.pixel_to_complex(click, Fencepost::Center);
        let rng_real = self.viewport.bounds.real_span() / 2.0;
        let rng_imag = self.viewport.bounds.imag_span() / 2.0;

        let corner = click_point - Complex::new(rng_real / 2.0, rng_imag / 2.0);
        let (corner_x, corner_y) = self.viewport.complex_to_pixel(corner);
        let origin = Pixel {
            x: snap(corner_x, zoom_origin_limit(size.width)),
            y: snap(corner_y, zoom_origin_limit(size.height)),
        };
        let corner = self.viewport.pixel_to_complex(origin, Fencepost::Center);

        let bounds = Bounds {
            real: corner.re..(corner.re + rng_real),
            imag: corner.im..(corner.im + rng_imag),
        };
        let halved = |span: f64, want: f64| (span - want).abs() <= want * HALVING_TOLERANCE;
        if !bounds.is_valid()
            || !halved(bounds.real_span(), rng_real)
            || !halved(bounds.imag_span(), rng_imag)
        {
            tracing::warn!(
                "cannot zoom further at ({}, {}): {:?} is at the limit of precision",
                click.x,
                click.y,
                self.viewport.bounds
            );
            return;
        }
        tracing::debug!(
            "zoom at ({}, {}): origin ({}, {}), new bounds {:?}",
            click.x,
            click.y,
            origin.x,
            origin.y,
            bounds
        );

        let mut pixels = PixelBuffer::new(size);
        for x in 0..size.width {
            for y in 0..size.height {
                pixels.set(x, y, self.pixels.get(x / 2 + origin.x, y / 2 + origin.y));
            }
        }

        self.viewport.bounds = bounds;
        self.pixels = pixels;
        self.cursor = 0;
        self.first_render = false;
        self.last_zoom_origin = Some(origin);
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn bounds(&self) -> &Bounds {
        &self.viewport.bounds
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn size(&self) -> Size {
        self.viewport.size
    }

    pub fn color_mapper(&self) -> &ColorMapper {
        &self.color_mapper
    }

    pub fn fractal(&self) -> &'static Fractal {
        self.fractal
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// The next column to be computed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_first_render(&self) -> bool {
        self.first_render
    }

    /// Top-left pixel, in the previous image, of the region the last zoom kept.
    pub fn last_zoom_origin(&self) -> Option<Pixel> {
        self.last_zoom_origin
    }
}

/// Relative error allowed in the span of a zoomed window before the zoom is refused.
const HALVING_TOLERANCE: f64 = 1e-3;

/// Largest top-left coordinate of a half-size window along an axis of `len` pixels.
fn zoom_origin_limit(len: usize) -> usize {
    (len - 1) / 2
}

fn snap(v: f64, max: usize) -> usize {
    num::clamp(v.round(), 0.0, max as f64) as usize
}

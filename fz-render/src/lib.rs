//! Display sinks for Fractal Zoom.
//!
//! The viewer produces indexed-color pixels; the sinks here resolve them through the palette
//! into RGB images, and write them out as PNG frames.

use std::path::{Path, PathBuf};

use fz_core::{
    session::{Background, DisplaySink},
    Palette, PixelBuffer, Pixel, Size,
};

/// Errors that can occur during execution.
#[derive(Clone, Debug)]
pub enum Error {
    InvalidArgument(String),
    Internal(String),
}

/// Resolve an indexed-color buffer into an RGB image.
pub fn to_rgb_image(pixels: &PixelBuffer, palette: &Palette) -> image::RgbImage {
    let size = pixels.size();
    let mut img =
        image::ImageBuffer::<image::Rgb<u8>, _>::new(size.width as u32, size.height as u32);
    img.pixels_mut()
        .zip(pixels.as_slice())
        .for_each(|(pixel, index)| {
            *pixel = image::Rgb(palette.rgb(*index));
        });
    img
}

/// Which presented frames a [PngSink] writes out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameMode {
    /// Only finished images.
    Completed,
    /// Every frame, including partial renders.
    EveryStep,
}

/// Writes frames as numbered PNG files in a directory.
pub struct PngSink {
    out_dir: PathBuf,
    mode: FrameMode,
    canvas: Option<Size>,
    last: Option<image::RgbImage>,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Creates the output directory if it does not exist.
    pub fn new(out_dir: impl Into<PathBuf>, mode: FrameMode) -> Result<Self, Error> {
        let out_dir = out_dir.into();
        if out_dir.exists() && !out_dir.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a directory",
                out_dir.display()
            )));
        }
        std::fs::create_dir_all(&out_dir).map_err(|err| {
            tracing::error!("cannot create {}: {}", out_dir.display(), err);
            Error::Internal(format!("cannot create output directory: {}", err))
        })?;
        Ok(PngSink {
            out_dir,
            mode,
            canvas: None,
            last: None,
            written: Vec::new(),
        })
    }

    /// Draw each frame onto a black canvas of the given size, at the frame's position,
    /// rather than writing the fractal image alone.
    pub fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Paths of the files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn compose(&self, pixels: &PixelBuffer, palette: &Palette, position: Pixel) -> image::RgbImage {
        let img = to_rgb_image(pixels, palette);
        match self.canvas {
            None => img,
            Some(size) => {
                let mut canvas = image::RgbImage::new(size.width as u32, size.height as u32);
                image::imageops::replace(&mut canvas, &img, position.x as i64, position.y as i64);
                canvas
            }
        }
    }

    fn write(&mut self, img: &image::RgbImage) -> Result<(), Error> {
        let path = self
            .out_dir
            .join(format!("frame_{:04}.png", self.written.len()));
        img.save(&path).map_err(|err| {
            tracing::error!("cannot write {}: {}", path.display(), err);
            Error::Internal(format!("image write error: {}", err))
        })?;
        tracing::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl DisplaySink for PngSink {
    type Error = Error;

    fn present(&mut self, background: Background<'_>) -> Result<(), Error> {
        match background {
            Background::Clear => {
                self.last = None;
                Ok(())
            }
            Background::Bitmap {
                pixels,
                palette,
                position,
            } => {
                let img = self.compose(pixels, palette, position);
                if self.mode == FrameMode::EveryStep {
                    self.write(&img)?;
                }
                self.last = Some(img);
                Ok(())
            }
        }
    }

    fn render_complete(&mut self) -> Result<(), Error> {
        if self.mode != FrameMode::Completed {
            return Ok(());
        }
        match self.last.take() {
            Some(img) => {
                let res = self.write(&img);
                self.last = Some(img);
                res
            }
            None => Err(Error::Internal("no frame to write".to_string())),
        }
    }
}

/// Discards everything it is shown; counts frames.
#[derive(Default, Debug)]
pub struct NullSink {
    pub frames: usize,
    pub completed: usize,
}

impl DisplaySink for NullSink {
    type Error = std::convert::Infallible;

    fn present(&mut self, background: Background<'_>) -> Result<(), Self::Error> {
        if let Background::Bitmap { .. } = background {
            self.frames += 1;
        }
        Ok(())
    }

    fn render_complete(&mut self) -> Result<(), Self::Error> {
        self.completed += 1;
        Ok(())
    }
}

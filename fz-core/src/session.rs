//! The interactive loop: render incrementally, show progress, wait for a tap, repeat.
//!
//! Displaying and input are left to the caller, through [DisplaySink] and [InputSource].

use crate::{
    color::Palette,
    fractal::Fractal,
    viewer::{FractalViewer, PixelBuffer},
    Pixel,
};

/// What the display should show behind everything else.
#[derive(Copy, Clone, Debug)]
pub enum Background<'a> {
    /// No background; remove whatever was shown before.
    Clear,
    /// An indexed-color image, placed with its top-left corner at `position`.
    Bitmap {
        pixels: &'a PixelBuffer,
        palette: &'a Palette,
        position: Pixel,
    },
}

/// Presents rendered images.
///
/// `present` is called before rendering starts and again after every column;
/// a sink that can't keep up should coalesce frames itself.
pub trait DisplaySink {
    type Error: std::fmt::Debug;

    fn present(&mut self, background: Background<'_>) -> Result<(), Self::Error>;

    /// Called when an image is complete and the session is waiting for input.
    fn render_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A user action.
#[derive(Copy, Clone, Debug)]
pub enum Command {
    /// Zoom in at a pixel, in the coordinates of the fractal image.
    Zoom(Pixel),
    /// Start over with a different fractal, at its natural bounds.
    Switch(&'static Fractal),
}

/// Produces user actions, blocking as needed. `None` ends the session.
pub trait InputSource {
    fn next_command(&mut self) -> Option<Command>;
}

impl<I> InputSource for I
where
    I: Iterator<Item = Command>,
{
    fn next_command(&mut self) -> Option<Command> {
        self.next()
    }
}

/// Drives a [FractalViewer] against a display and an input source.
pub struct Session {
    viewer: FractalViewer,
    position: Pixel,
}

impl Session {
    /// `position` is where the fractal image sits on the display.
    pub fn new(viewer: FractalViewer, position: Pixel) -> Self {
        Session { viewer, position }
    }

    pub fn viewer(&self) -> &FractalViewer {
        &self.viewer
    }

    /// Runs until the input source is exhausted.
    ///
    /// Returns the number of images rendered to completion.
    pub fn run<S, I>(&mut self, sink: &mut S, input: &mut I) -> Result<usize, S::Error>
    where
        S: DisplaySink,
        I: InputSource + ?Sized,
    {
        let span = tracing::info_span!("session");
        let _guard = span.enter();

        let mut renders = 0;
        loop {
            self.present(sink)?;
            while self.viewer.has_computation_left() {
                self.viewer.step();
                self.present(sink)?;
            }
            renders += 1;
            tracing::info!(
                "{} render {} complete: {:?}",
                self.viewer.fractal().name,
                renders,
                self.viewer.bounds()
            );
            sink.render_complete().map_err(log_display_error)?;

            if !self.apply_next_command(sink, input)? {
                return Ok(renders);
            }
        }
    }

    /// Waits for a command that changes the view.
    /// Returns false if the input source is exhausted.
    fn apply_next_command<S, I>(&mut self, sink: &mut S, input: &mut I) -> Result<bool, S::Error>
    where
        S: DisplaySink,
        I: InputSource + ?Sized,
    {
        let size = self.viewer.size();
        loop {
            match input.next_command() {
                None => return Ok(false),
                Some(Command::Zoom(click)) if click.x < size.width && click.y < size.height => {
                    self.viewer.register_click(click);
                    return Ok(true);
                }
                Some(Command::Zoom(click)) => {
                    tracing::warn!(
                        "ignoring click at ({}, {}) outside {}x{} image",
                        click.x,
                        click.y,
                        size.width,
                        size.height
                    );
                }
                Some(Command::Switch(fractal)) => {
                    let viewer = FractalViewer::new(
                        self.viewer.color_mapper().clone(),
                        self.viewer.max_iter(),
                        fractal,
                        size,
                        None,
                    );
                    match viewer {
                        Ok(viewer) => {
                            tracing::info!("switching to {}", fractal.name);
                            clear(sink)?;
                            self.viewer = viewer;
                            return Ok(true);
                        }
                        Err(err) => tracing::error!("cannot switch to {}: {}", fractal.name, err),
                    }
                }
            }
        }
    }

    fn present<S: DisplaySink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.present(Background::Bitmap {
            pixels: self.viewer.pixels(),
            palette: self.viewer.color_mapper().palette(),
            position: self.position,
        })
        .map_err(log_display_error)
    }
}

fn clear<S: DisplaySink>(sink: &mut S) -> Result<(), S::Error> {
    sink.present(Background::Clear).map_err(log_display_error)
}

fn log_display_error<E: std::fmt::Debug>(err: E) -> E {
    tracing::error!("display error: {:?}", err);
    err
}

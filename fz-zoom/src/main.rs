use std::path::PathBuf;

use clap::Parser;
use fz_core::{
    fractal,
    session::{Command, Session},
    ColorMapper, FractalViewer, Palette, Pixel, Size,
};
use fz_render::{FrameMode, PngSink};
use tracing_subscriber::EnvFilter;

/// Render a fractal, then replay a script of taps: zoom at "X,Y", or switch to a fractal by name.
#[derive(Debug, Parser)]
struct Args {
    /// Fractal to start with.
    #[arg(long, default_value = "mandelbrot", value_parser = parse_fractal)]
    fractal: &'static fractal::Fractal,

    /// Width of the fractal image; even values are rounded down.
    #[arg(long, default_value_t = 220)]
    width: usize,
    /// Height of the fractal image; even values are rounded down.
    #[arg(long, default_value_t = 240)]
    height: usize,

    #[arg(long, default_value_t = 16)]
    max_iter: u32,

    /// Start from a rectangle of the fractal's default view instead of the whole of it,
    /// as "X0,Y0,X1,Y1" pixels (end exclusive).
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Number of palette entries.
    #[arg(long, default_value_t = 16)]
    colors: usize,
    /// Channel increment between entries of the rainbow palette.
    #[arg(long, default_value_t = 75)]
    color_step: u8,
    /// Use evenly spaced hues instead of the rainbow palette.
    #[arg(long)]
    hue_wheel: bool,
    /// Iterations per palette entry.
    #[arg(long, default_value_t = 1)]
    iter_step: u32,

    /// Where the fractal sits on the canvas, as "X,Y".
    #[arg(long, default_value = "0,0", value_parser = parse_pixel)]
    position: Pixel,
    /// Draw frames onto a canvas of this size, as "WxH", instead of writing the fractal alone.
    #[arg(long, value_parser = parse_size)]
    canvas: Option<Size>,

    /// Write a frame after every column, not just completed images.
    #[arg(long)]
    every_step: bool,

    #[arg(long, default_value = "frames")]
    out_dir: PathBuf,

    /// Taps, in order: "X,Y" zooms in at a pixel of the fractal image, a fractal name switches.
    #[arg(value_parser = parse_command)]
    script: Vec<Command>,
}

/// A rectangle of pixels, from `start` (inclusive) to `end` (exclusive).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Region {
    start: Pixel,
    end: Pixel,
}

fn parse_fractal(s: &str) -> Result<&'static fractal::Fractal, String> {
    fractal::by_name(s).map_err(|err| {
        let known: Vec<_> = fractal::names().collect();
        format!("{}; expected one of {}", err, known.join(", "))
    })
}

fn parse_pair(s: &str, sep: char) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected two numbers separated by '{}': {}", sep, s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid number {:?}: {}", v, err))
    };
    Ok((parse(a)?, parse(b)?))
}

fn parse_pixel(s: &str) -> Result<Pixel, String> {
    let (x, y) = parse_pair(s, ',')?;
    Ok(Pixel { x, y })
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (width, height) = parse_pair(s, 'x')?;
    Ok(Size { width, height })
}

fn parse_region(s: &str) -> Result<Region, String> {
    let parts = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|err| format!("invalid number {:?}: {}", v, err))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x0, y0, x1, y1] => Ok(Region {
            start: Pixel { x: x0, y: y0 },
            end: Pixel { x: x1, y: y1 },
        }),
        _ => Err(format!("expected X0,Y0,X1,Y1: {}", s)),
    }
}

fn parse_command(s: &str) -> Result<Command, String> {
    if s.contains(',') {
        Ok(Command::Zoom(parse_pixel(s)?))
    } else {
        Ok(Command::Switch(parse_fractal(s)?))
    }
}

/// A viewer over the fractal's natural bounds, or over a region of them.
fn initial_viewer(
    mapper: ColorMapper,
    max_iter: u32,
    fractal: &'static fractal::Fractal,
    size: Size,
    region: Option<Region>,
) -> Result<FractalViewer, String> {
    let viewer = FractalViewer::new(mapper, max_iter, fractal, size, None)?;
    let Some(Region { start, end }) = region else {
        return Ok(viewer);
    };
    let bounds = viewer.viewport().pixel_region_to_bounds(start, end);
    tracing::info!("starting from pixels {:?}..{:?}: {:?}", start, end, bounds);
    FractalViewer::new(
        viewer.color_mapper().clone(),
        max_iter,
        fractal,
        viewer.size(),
        Some(bounds),
    )
}

fn run(args: Args) -> Result<(), String> {
    let palette = if args.hue_wheel {
        Palette::hue_wheel(args.colors)?
    } else {
        Palette::rainbow_walk(args.colors, args.color_step)?
    };
    let mapper = ColorMapper::new(palette, args.iter_step)?;
    let size = Size {
        width: args.width,
        height: args.height,
    };
    let viewer = initial_viewer(mapper, args.max_iter, args.fractal, size, args.region)?;

    let mode = if args.every_step {
        FrameMode::EveryStep
    } else {
        FrameMode::Completed
    };
    let mut sink = PngSink::new(&args.out_dir, mode).map_err(|err| format!("{:?}", err))?;
    if let Some(canvas) = args.canvas {
        sink = sink.with_canvas(canvas);
    }

    let mut session = Session::new(viewer, args.position);
    let renders = session
        .run(&mut sink, &mut args.script.into_iter())
        .map_err(|err| format!("{:?}", err))?;
    tracing::info!(
        "{} renders, {} frames written to {}",
        renders,
        sink.written().len(),
        sink.out_dir().display()
    );
    Ok(())
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["fz-zoom"]).unwrap();
        assert_eq!(args.fractal.name, "mandelbrot");
        assert_eq!((args.width, args.height), (220, 240));
        assert_eq!(args.max_iter, 16);
        assert_eq!(args.position, Pixel { x: 0, y: 0 });
        assert!(args.canvas.is_none());
        assert!(args.script.is_empty());
    }

    #[test]
    fn test_script() {
        let args = Args::try_parse_from([
            "fz-zoom",
            "--fractal",
            "burning-ship",
            "--canvas",
            "320x240",
            "100,50",
            "mandelbrot",
            " 3, 4",
        ])
        .unwrap();
        assert_eq!(args.fractal.name, "burning-ship");
        assert_eq!(
            args.canvas,
            Some(Size {
                width: 320,
                height: 240
            })
        );
        assert_eq!(args.script.len(), 3);
        assert!(matches!(args.script[0], Command::Zoom(Pixel { x: 100, y: 50 })));
        assert!(matches!(args.script[1], Command::Switch(f) if f.name == "mandelbrot"));
        assert!(matches!(args.script[2], Command::Zoom(Pixel { x: 3, y: 4 })));
    }

    #[test]
    fn test_region() {
        assert_eq!(
            parse_region("1, 2,30,40"),
            Ok(Region {
                start: Pixel { x: 1, y: 2 },
                end: Pixel { x: 30, y: 40 },
            })
        );
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("1,2,3,x").is_err());
    }

    fn mapper() -> ColorMapper {
        ColorMapper::linear(Palette::rainbow_walk(16, 75).unwrap())
    }

    #[test]
    fn test_initial_viewer_region() {
        let size = Size {
            width: 9,
            height: 7,
        };
        let whole = initial_viewer(mapper(), 16, &fz_core::MANDELBROT, size, None).unwrap();

        // The full image, end exclusive, maps back onto the same bounds.
        let all = Region {
            start: Pixel { x: 0, y: 0 },
            end: Pixel { x: 9, y: 7 },
        };
        let same = initial_viewer(mapper(), 16, &fz_core::MANDELBROT, size, Some(all)).unwrap();
        assert!((same.bounds().real.start - whole.bounds().real.start).abs() < 1e-9);
        assert!((same.bounds().real.end - whole.bounds().real.end).abs() < 1e-9);
        assert!((same.bounds().imag.end - whole.bounds().imag.end).abs() < 1e-9);

        // A 3x3 patch in the middle zooms in around its center: -2.4 + 4.5 * 0.4 on the
        // real axis, 0 on the imaginary one.
        let middle = Region {
            start: Pixel { x: 3, y: 2 },
            end: Pixel { x: 6, y: 5 },
        };
        let v = initial_viewer(mapper(), 16, &fz_core::MANDELBROT, size, Some(middle)).unwrap();
        assert!(v.bounds().real_span() < whole.bounds().real_span() / 2.0);
        assert!((v.bounds().center().re - -0.6).abs() < 1e-9);
        assert!(v.bounds().center().im.abs() < 1e-9);
        assert_eq!(v.size(), whole.size());

        let empty = Region {
            start: Pixel { x: 3, y: 3 },
            end: Pixel { x: 3, y: 3 },
        };
        assert!(initial_viewer(mapper(), 16, &fz_core::MANDELBROT, size, Some(empty)).is_err());
    }

    #[test]
    fn test_bad_script() {
        assert!(parse_command("julia").is_err());
        assert!(parse_command("1,").is_err());
        assert!(parse_size("320,240").is_err());
    }
}

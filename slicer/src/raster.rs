use image::{Rgba, RgbaImage};
use imageproc::drawing::BresenhamLineIter;
use nalgebra::Vector2;
use ordered_float::OrderedFloat;

use common::config::PrinterSettings;

use crate::{contour::Contour, error::SliceError, Pos};

/// Output mask resolution in pixels.
pub const LAYER_WIDTH: u32 = 1920;
pub const LAYER_HEIGHT: u32 = 1080;

/// The build area is scaled to leave a 10% margin around the image edge.
const MARGIN: f32 = 0.9;

/// Scanline edges flatter than this are skipped by the fill to keep the
/// interpolation away from a near-zero divisor.
const FLAT_EDGE_EPSILON: f32 = 1e-4;

/// 96 DPI expressed as pixels per meter, for the PNG pHYs chunk.
const PIXELS_PER_METER: u32 = 3780;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Uniform world-to-pixel mapping for the configured build volume. The
/// world origin lands on the image center, world +Y points up the image,
/// and the aspect ratio is preserved by taking the tighter axis scale.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    scale: f32,
    center: Vector2<f32>,
}

impl Projection {
    pub fn new(settings: &PrinterSettings) -> Self {
        let scale_x = LAYER_WIDTH as f32 / settings.build_volume.x;
        let scale_y = LAYER_HEIGHT as f32 / settings.build_volume.y;

        Self {
            scale: scale_x.min(scale_y) * MARGIN,
            center: Vector2::new(LAYER_WIDTH as f32 / 2.0, LAYER_HEIGHT as f32 / 2.0),
        }
    }

    /// Pixels per mm of the uniform scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Maps a transformed world point to pixel coordinates. No clamping,
    /// out-of-bounds points are clipped later by the fill and outline
    /// passes.
    pub fn project(&self, point: &Pos) -> Vector2<f32> {
        Vector2::new(
            self.center.x + point.x * self.scale,
            self.center.y - point.y * self.scale,
        )
    }
}

/// Source of blank layer surfaces. Environments where surface creation is
/// bound to one owning thread hide that dispatch behind this trait; the
/// default factory allocates directly, so every worker thread can
/// rasterize its own layers.
pub trait SurfaceFactory: Sync {
    fn create_surface(&self, width: u32, height: u32) -> Result<RgbaImage, SliceError>;
}

/// Allocates opaque white surfaces in-process.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectSurfaceFactory;

impl SurfaceFactory for DirectSurfaceFactory {
    fn create_surface(&self, width: u32, height: u32) -> Result<RgbaImage, SliceError> {
        let len = width as usize * height as usize * 4;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SliceError::ResourceExhausted)?;
        data.resize(len, 0xff);

        Ok(RgbaImage::from_raw(width, height, data).unwrap())
    }
}

/// Paints the contours into the surface: even-odd fill first, outlines
/// second, so outlines are never overwritten by the fill.
pub fn rasterize(surface: &mut RgbaImage, contours: &[Contour]) {
    fill_contours(surface, contours);
    draw_outlines(surface, contours);
}

/// Even-odd scanline fill: for every row, collect the X crossings of all
/// contour edges, sort them, and fill between successive pairs.
fn fill_contours(surface: &mut RgbaImage, contours: &[Contour]) {
    let (width, height) = surface.dimensions();
    let mut crossings = Vec::new();

    for y in 0..height {
        let yf = y as f32;
        crossings.clear();

        for contour in contours {
            let points = &contour.points;
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];

                if (b.y - a.y).abs() < FLAT_EDGE_EPSILON {
                    continue;
                }

                if a.y.min(b.y) <= yf && yf <= a.y.max(b.y) {
                    let t = (yf - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
        }

        crossings.sort_by_key(|&x| OrderedFloat(x));

        for span in crossings.chunks_exact(2) {
            let x1 = (span[0] as i32).max(0);
            let x2 = (span[1] as i32).min(width as i32 - 1);

            for x in x1..=x2 {
                surface.put_pixel(x as u32, y, BLACK);
            }
        }
    }
}

/// Draws every contour edge, wrapping last-to-first, with integer
/// Bresenham stepping. Pixels outside the surface are skipped.
fn draw_outlines(surface: &mut RgbaImage, contours: &[Contour]) {
    let (width, height) = surface.dimensions();

    for contour in contours {
        let points = &contour.points;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];

            let line = BresenhamLineIter::new((a.x, a.y), (b.x, b.y));
            for (x, y) in line {
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    surface.put_pixel(x as u32, y as u32, BLACK);
                }
            }
        }
    }
}

/// Encodes a finished surface as an RGBA PNG with 96 DPI metadata.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, SliceError> {
    let mut out = Vec::new();

    let mut encoder = png::Encoder::new(&mut out, surface.width(), surface.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: PIXELS_PER_METER,
        yppu: PIXELS_PER_METER,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(surface.as_raw())?;
    writer.finish()?;

    Ok(out)
}

//! Rasterizes placement records into per-side board maps.
//!
//! Each component whose footprint resolved is drawn as a rotated rectangle at
//! its board position, filled with the color of its designator class, with a
//! marker on pin 1 and its reference as a label. The bottom side is viewed
//! through the board, so bottom offsets are mirrored in X.

mod font;
mod palette;

use indexmap::{IndexMap, IndexSet};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use pnpcheck_centroid::{designator_class, PlacementRecord};
use pnpcheck_footprint::FootprintGeometry;

pub use palette::{assign_colors, Rgba};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create pixmap with dimensions {width}x{height}")]
    PixmapCreation { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Board side selector, matched against the centroid `Side` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }

    fn matches(self, value: &str) -> bool {
        value.eq_ignore_ascii_case(self.as_str())
    }

    /// Bottom-side placements are viewed through the board.
    fn mirrored(self) -> bool {
        matches!(self, Side::Bottom)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width of the output image in pixels.
    pub width: u32,
    /// Height of the output image in pixels.
    pub height: u32,
    /// Padding around the drawing in pixels.
    pub padding: u32,
    /// Outline stroke width in pixels.
    pub stroke_width: f32,
    /// Background color as RGBA.
    pub background: Rgba,
    /// Outline and pin-marker color as RGBA.
    pub stroke_color: Rgba,
    /// Label text color as RGBA.
    pub label_color: Rgba,
    /// Alpha applied to class colors when filling rectangles.
    pub fill_alpha: u8,
    /// Pin-1 marker radius in pixels.
    pub pin_marker_radius: f32,
    /// Whether to draw the class legend in the top-left corner.
    pub legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            padding: 24,
            stroke_width: 1.0,
            background: [255, 255, 255, 255], // white
            stroke_color: [32, 32, 32, 255],  // near-black
            label_color: [16, 16, 16, 255],
            fill_alpha: 176,
            pin_marker_radius: 3.0,
            legend: true,
        }
    }
}

/// What a single rendering pass did and did not draw.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Components drawn on the requested side.
    pub drawn: usize,
    /// Components on the requested side that were omitted: unresolved
    /// package or unusable position columns.
    pub skipped: usize,
}

struct Placed<'a> {
    reference: &'a str,
    class: &'a str,
    x: f64,
    y: f64,
    rotation: f64,
    geometry: &'a FootprintGeometry,
}

impl Placed<'_> {
    /// Rectangle corners in board millimeters. The bounding-box center is
    /// shifted by the print offset, then everything rotates about the
    /// placement origin. Mirroring (bottom side) flips X offsets and the
    /// rotation sense.
    fn corners(&self, mirrored: bool) -> [(f64, f64); 4] {
        let (w, h) = self.geometry.size;
        let (mut ox, oy) = self.geometry.print.unwrap_or((0.0, 0.0));
        if mirrored {
            ox = -ox;
        }
        let rotation = if mirrored { -self.rotation } else { self.rotation };
        let (hw, hh) = (w / 2.0, h / 2.0);

        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(dx, dy)| {
            let (rx, ry) = rotate(dx + ox, dy + oy, rotation);
            (self.x + rx, self.y + ry)
        })
    }

    /// Pin-1 marker position in board millimeters, if the footprint has one.
    fn pin(&self, mirrored: bool) -> Option<(f64, f64)> {
        let (mut px, py) = self.geometry.pin?;
        if mirrored {
            px = -px;
        }
        let rotation = if mirrored { -self.rotation } else { self.rotation };
        let (rx, ry) = rotate(px, py, rotation);
        Some((self.x + rx, self.y + ry))
    }
}

fn rotate(x: f64, y: f64, deg: f64) -> (f64, f64) {
    let (s, c) = deg.to_radians().sin_cos();
    (x * c - y * s, x * s + y * c)
}

/// Renders one board side to a pixmap.
pub fn render_side(
    records: &[PlacementRecord],
    geometries: &IndexMap<String, FootprintGeometry>,
    colors: &IndexMap<String, Rgba>,
    side: Side,
    opts: &RenderOptions,
) -> Result<(Pixmap, RenderReport), RenderError> {
    let mut pixmap =
        Pixmap::new(opts.width, opts.height).ok_or(RenderError::PixmapCreation {
            width: opts.width,
            height: opts.height,
        })?;
    pixmap.fill(color_from(opts.background));

    let mut report = RenderReport::default();
    let mut placed = Vec::new();

    for record in records {
        let Some(record_side) = record.side() else {
            continue;
        };
        if !side.matches(record_side) {
            continue;
        }

        let geometry = record.package().and_then(|p| geometries.get(p));
        let position = record.pos_x().zip(record.pos_y());
        match (geometry, position) {
            (Some(geometry), Some((x, y))) => {
                let reference = record.reference().unwrap_or("");
                placed.push(Placed {
                    reference,
                    class: designator_class(reference),
                    x,
                    y,
                    rotation: record.rotation().unwrap_or(0.0),
                    geometry,
                });
            }
            _ => {
                debug!(
                    reference = record.reference().unwrap_or("?"),
                    package = record.package().unwrap_or("?"),
                    "skipping component without resolved footprint or position"
                );
                report.skipped += 1;
            }
        }
    }

    if placed.is_empty() {
        return Ok((pixmap, report));
    }

    let mirrored = side.mirrored();

    // Fit the drawing into the viewport, exactly like the DXF rasterizer:
    // uniform scale, centered, Y flipped (board Y+ is up, image Y+ is down).
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for item in &placed {
        for (x, y) in item.corners(mirrored) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    let drawing_width = max_x - min_x;
    let drawing_height = max_y - min_y;
    let available_width = (opts.width.saturating_sub(2 * opts.padding)) as f64;
    let available_height = (opts.height.saturating_sub(2 * opts.padding)) as f64;

    let scale = if drawing_width == 0.0 && drawing_height == 0.0 {
        1.0
    } else if drawing_width == 0.0 {
        available_height / drawing_height
    } else if drawing_height == 0.0 {
        available_width / drawing_width
    } else {
        (available_width / drawing_width).min(available_height / drawing_height)
    };

    let offset_x = opts.padding as f64 + (available_width - drawing_width * scale) / 2.0;
    let offset_y = opts.padding as f64 + (available_height - drawing_height * scale) / 2.0;

    let to_px = |x: f64, y: f64| -> (f32, f32) {
        (
            ((x - min_x) * scale + offset_x) as f32,
            ((max_y - y) * scale + offset_y) as f32,
        )
    };

    let stroke = Stroke {
        width: opts.stroke_width,
        ..Stroke::default()
    };
    let stroke_paint = paint_from(opts.stroke_color);
    let label_scale = 1;

    let mut drawn_classes: IndexSet<&str> = IndexSet::new();

    for item in &placed {
        let corners = item.corners(mirrored);

        let mut pb = PathBuilder::new();
        let (x0, y0) = to_px(corners[0].0, corners[0].1);
        pb.move_to(x0, y0);
        for &(x, y) in &corners[1..] {
            let (px, py) = to_px(x, y);
            pb.line_to(px, py);
        }
        pb.close();

        if let Some(path) = pb.finish() {
            let mut fill = *colors.get(item.class).unwrap_or(&opts.stroke_color);
            fill[3] = opts.fill_alpha;
            pixmap.fill_path(
                &path,
                &paint_from(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
        }

        if let Some((px, py)) = item.pin(mirrored) {
            let (cx, cy) = to_px(px, py);
            if let Some(path) = circle_path(cx, cy, opts.pin_marker_radius) {
                pixmap.fill_path(
                    &path,
                    &stroke_paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }

        if !item.reference.is_empty() {
            let (cx, cy) = to_px(item.x, item.y);
            let tx = cx as i32 - (font::text_width(item.reference, label_scale) / 2) as i32;
            let ty = cy as i32 - (font::text_height(label_scale) / 2) as i32;
            font::draw_text(
                &mut pixmap,
                item.reference,
                tx,
                ty,
                label_scale,
                opts.label_color,
            );
        }

        drawn_classes.insert(item.class);
        report.drawn += 1;
    }

    if opts.legend {
        draw_legend(&mut pixmap, colors, &drawn_classes, opts);
    }

    Ok((pixmap, report))
}

/// One swatch and class name per drawn class, in assignment order.
fn draw_legend(
    pixmap: &mut Pixmap,
    colors: &IndexMap<String, Rgba>,
    drawn_classes: &IndexSet<&str>,
    opts: &RenderOptions,
) {
    const SWATCH: f32 = 9.0;
    const ROW_HEIGHT: i32 = 13;

    let x = 4.0;
    let mut y = 4;

    for (class, color) in colors {
        if !drawn_classes.contains(class.as_str()) {
            continue;
        }
        if let Some(rect) =
            tiny_skia::Rect::from_xywh(x, y as f32, SWATCH, SWATCH)
        {
            pixmap.fill_rect(rect, &paint_from(*color), Transform::identity(), None);
        }
        font::draw_text(
            pixmap,
            class,
            x as i32 + SWATCH as i32 + 4,
            y + 1,
            1,
            opts.label_color,
        );
        y += ROW_HEIGHT;
    }
}

/// Renders one side and writes it as PNG to `path`.
pub fn render_to_file(
    records: &[PlacementRecord],
    geometries: &IndexMap<String, FootprintGeometry>,
    colors: &IndexMap<String, Rgba>,
    side: Side,
    path: impl AsRef<std::path::Path>,
    opts: &RenderOptions,
) -> Result<RenderReport, RenderError> {
    let (pixmap, report) = render_side(records, geometries, colors, side, opts)?;
    let png = encode_png(&pixmap)?;
    std::fs::write(path, png)?;
    Ok(report)
}

/// Encodes a pixmap as PNG bytes, converting tiny-skia's premultiplied alpha
/// back to straight alpha.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    use image::{ImageBuffer, Rgba as ImageRgba};

    let width = pixmap.width();
    let height = pixmap.height();
    let data = pixmap.data();

    let mut img: ImageBuffer<ImageRgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let idx = (y * width + x) as usize * 4;
        let r = data[idx];
        let g = data[idx + 1];
        let b = data[idx + 2];
        let a = data[idx + 3];

        let (r, g, b) = if a == 0 {
            (0, 0, 0)
        } else if a == 255 {
            (r, g, b)
        } else {
            let af = a as f32 / 255.0;
            (
                (r as f32 / af).min(255.0) as u8,
                (g as f32 / af).min(255.0) as u8,
                (b as f32 / af).min(255.0) as u8,
            )
        };
        *pixel = ImageRgba([r, g, b, a]);
    }

    let mut out = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut out),
        image::ImageFormat::Png,
    )?;
    Ok(out)
}

fn color_from(rgba: Rgba) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn paint_from(rgba: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color_from(rgba));
    paint.anti_alias = true;
    paint
}

/// Circle approximated with four cubic beziers.
fn circle_path(cx: f32, cy: f32, r: f32) -> Option<tiny_skia::Path> {
    let k = 0.552_284_8; // (4/3) * tan(pi/8)
    let c = r * k;

    let mut pb = PathBuilder::new();
    pb.move_to(cx + r, cy);
    pb.cubic_to(cx + r, cy + c, cx + c, cy + r, cx, cy + r);
    pb.cubic_to(cx - c, cy + r, cx - r, cy + c, cx - r, cy);
    pb.cubic_to(cx - r, cy - c, cx - c, cy - r, cx, cy - r);
    pb.cubic_to(cx + c, cy - r, cx + r, cy - c, cx + r, cy);
    pb.close();
    pb.finish()
}

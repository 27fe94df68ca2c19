use std::path::Path;

use thiserror::Error;

use crate::resolve::FootprintLoader;
use crate::sexpr::{SExpr, SExprError};

/// Offsets smaller than this are treated as "centered on the origin".
const CENTER_EPS: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: SExprError },

    #[error("{path}: not a footprint definition")]
    NotAFootprint { path: String },

    #[error("{path}: footprint defines no pads or graphics")]
    NoGeometry { path: String },
}

/// Physical facts about one footprint, in board-plane millimeters relative to
/// the placement origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintGeometry {
    /// Bounding-box width and height.
    pub size: (f64, f64),
    /// Bounding-box center offset, `None` when the box is centered on the
    /// placement origin.
    pub print: Option<(f64, f64)>,
    /// Offset of pad "1", `None` when the footprint has no pad numbered 1.
    pub pin: Option<(f64, f64)>,
}

/// Loads footprints from `.pretty`-style directories of `.kicad_mod` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct KicadLoader;

impl FootprintLoader for KicadLoader {
    fn load(
        &mut self,
        container: &Path,
        package: &str,
    ) -> Result<Option<FootprintGeometry>, LibraryError> {
        let path = container.join(format!("{package}.kicad_mod"));
        if !path.is_file() {
            return Ok(None);
        }

        let display = path.display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|source| LibraryError::Io {
            path: display.clone(),
            source,
        })?;
        let expr = SExpr::parse(&contents).map_err(|source| LibraryError::Parse {
            path: display.clone(),
            source,
        })?;

        geometry_from_footprint(&expr, &display).map(Some)
    }
}

struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    any: bool,
}

impl Bounds {
    fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
            any: false,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.any = true;
    }
}

/// Extracts the bounding box and pin-1 offset from a parsed `.kicad_mod`.
///
/// Footprint files are Y-down; placement coordinates are Y-up, so every Y is
/// negated on the way in.
fn geometry_from_footprint(
    expr: &SExpr,
    path: &str,
) -> Result<FootprintGeometry, LibraryError> {
    if !matches!(expr.tag(), Some("footprint") | Some("module")) {
        return Err(LibraryError::NotAFootprint {
            path: path.to_string(),
        });
    }

    let mut bounds = Bounds::new();
    let mut pin: Option<(f64, f64)> = None;

    for item in expr.as_list().unwrap_or(&[]) {
        match item.tag() {
            Some("pad") => {
                let Some(at) = item.child("at") else { continue };
                let (Some(x), Some(y)) = (at.number(0), at.number(1)) else {
                    continue;
                };
                let y = -y;

                // The pin offset only needs a position; a pad without a size
                // still marks pin 1, it just contributes nothing to the box.
                if pin.is_none() && item.arg(0) == Some("1") {
                    pin = Some((x, y));
                }

                let Some(size) = item.child("size") else { continue };
                let (Some(w), Some(h)) = (size.number(0), size.number(1)) else {
                    continue;
                };

                // A pad rotated to 90/270 swaps its extents.
                let quarter_turned = at
                    .number(2)
                    .map(|rot| (rot.rem_euclid(180.0) - 90.0).abs() < 1e-9)
                    .unwrap_or(false);
                let (w, h) = if quarter_turned { (h, w) } else { (w, h) };

                bounds.include(x - w / 2.0, y - h / 2.0);
                bounds.include(x + w / 2.0, y + h / 2.0);
            }
            Some("fp_line") | Some("fp_rect") | Some("fp_arc") => {
                for endpoint in ["start", "end", "mid"] {
                    if let Some(point) = item.child(endpoint) {
                        if let (Some(x), Some(y)) = (point.number(0), point.number(1)) {
                            bounds.include(x, -y);
                        }
                    }
                }
            }
            Some("fp_circle") => {
                let center = item.child("center").and_then(|c| {
                    Some((c.number(0)?, c.number(1)?))
                });
                let end = item.child("end").and_then(|e| {
                    Some((e.number(0)?, e.number(1)?))
                });
                if let (Some((cx, cy)), Some((ex, ey))) = (center, end) {
                    let r = ((ex - cx).powi(2) + (ey - cy).powi(2)).sqrt();
                    bounds.include(cx - r, -cy - r);
                    bounds.include(cx + r, -cy + r);
                }
            }
            Some("fp_poly") => {
                if let Some(pts) = item.child("pts") {
                    for xy in pts.children("xy") {
                        if let (Some(x), Some(y)) = (xy.number(0), xy.number(1)) {
                            bounds.include(x, -y);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if !bounds.any {
        return Err(LibraryError::NoGeometry {
            path: path.to_string(),
        });
    }

    let size = (bounds.max_x - bounds.min_x, bounds.max_y - bounds.min_y);
    let center = (
        (bounds.min_x + bounds.max_x) / 2.0,
        (bounds.min_y + bounds.max_y) / 2.0,
    );
    let print =
        (center.0.abs() > CENTER_EPS || center.1.abs() > CENTER_EPS).then_some(center);

    Ok(FootprintGeometry { size, print, pin })
}

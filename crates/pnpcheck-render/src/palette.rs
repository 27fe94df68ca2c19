use indexmap::IndexMap;

/// RGBA color, straight (non-premultiplied) alpha.
pub type Rgba = [u8; 4];

/// Hand-picked perceptually-distinct base palette, used whenever it is large
/// enough for the class set.
const PALETTE: [Rgba; 10] = [
    [31, 119, 180, 255],  // blue
    [255, 127, 14, 255],  // orange
    [44, 160, 44, 255],   // green
    [214, 39, 40, 255],   // red
    [148, 103, 189, 255], // purple
    [140, 86, 75, 255],   // brown
    [227, 119, 194, 255], // pink
    [127, 127, 127, 255], // gray
    [188, 189, 34, 255],  // olive
    [23, 190, 207, 255],  // cyan
];

/// Assigns one distinct color per designator class.
///
/// Classes are sorted lexicographically before assignment, so two runs over
/// the same input always produce the same legend regardless of the caller's
/// iteration order. The palette is sized to the class count: no two classes
/// ever share a color.
pub fn assign_colors<I, S>(classes: I) -> IndexMap<String, Rgba>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut sorted: Vec<String> = classes.into_iter().map(Into::into).collect();
    sorted.sort();
    sorted.dedup();

    let colors = palette_for(sorted.len());
    sorted.into_iter().zip(colors).collect()
}

/// A palette of `count` distinct colors: the base set when it suffices,
/// otherwise evenly spaced hues with saturation/value alternating by parity
/// so neighbouring entries stay apart.
fn palette_for(count: usize) -> Vec<Rgba> {
    if count <= PALETTE.len() {
        return PALETTE[..count].to_vec();
    }
    (0..count)
        .map(|i| {
            let hue = i as f64 * 360.0 / count as f64;
            let (saturation, value) = if i % 2 == 0 { (0.85, 0.85) } else { (0.60, 0.95) };
            hsv_to_rgb(hue, saturation, value)
        })
        .collect()
}

/// `hue` in degrees `[0, 360)`, `saturation`/`value` in `[0, 1]`.
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgba {
    let c = value * saturation;
    let hp = hue / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
        255,
    ]
}

use indexmap::IndexMap;
use pnpcheck_centroid::{designator_class, distinct_packages, parse_str};
use pnpcheck_footprint::FootprintGeometry;
use pnpcheck_render::{
    assign_colors, encode_png, render_side, render_to_file, RenderOptions, Side,
};

const POS: &str = "\
# Ref PosX PosY Rot Side Package
R101 10.0 20.0 90 top 0603
R102 13.0 20.0 0 top 0603
C7 10.0 24.0 0 top 0603
U1 30.0 25.0 180 bottom QFN-32
X9 5.0 5.0 0 top GHOST-FP
";

fn geometries() -> IndexMap<String, FootprintGeometry> {
    IndexMap::from([
        (
            "0603".to_string(),
            FootprintGeometry {
                size: (1.5, 0.8),
                print: None,
                pin: None,
            },
        ),
        (
            "QFN-32".to_string(),
            FootprintGeometry {
                size: (5.0, 5.0),
                print: None,
                pin: Some((-2.1, 2.1)),
            },
        ),
    ])
}

fn colors_for(records: &[pnpcheck_centroid::PlacementRecord]) -> IndexMap<String, [u8; 4]> {
    assign_colors(
        records
            .iter()
            .filter_map(|r| r.reference())
            .map(designator_class),
    )
}

#[test]
fn draws_resolved_components_and_skips_unresolved_ones() {
    let records = parse_str(POS).expect("parse");
    let colors = colors_for(&records);

    let (pixmap, report) = render_side(
        &records,
        &geometries(),
        &colors,
        Side::Top,
        &RenderOptions::default(),
    )
    .expect("render top");

    // R101, R102, C7 drawn; GHOST-FP has no geometry entry.
    assert_eq!(report.drawn, 3);
    assert_eq!(report.skipped, 1);

    // Something other than the white background must have been inked.
    let background = pixmap.pixels()[0];
    assert!(pixmap.pixels().iter().any(|p| *p != background));
}

#[test]
fn bottom_side_only_draws_bottom_components() {
    let records = parse_str(POS).expect("parse");
    let colors = colors_for(&records);

    let (_, report) = render_side(
        &records,
        &geometries(),
        &colors,
        Side::Bottom,
        &RenderOptions::default(),
    )
    .expect("render bottom");

    assert_eq!(report.drawn, 1);
    assert_eq!(report.skipped, 0);
}

#[test]
fn empty_side_renders_a_blank_image_without_error() {
    let records = parse_str("# Ref PosX PosY Rot Side Package\n").expect("parse");
    let (pixmap, report) = render_side(
        &records,
        &IndexMap::new(),
        &IndexMap::new(),
        Side::Top,
        &RenderOptions::default(),
    )
    .expect("render empty");

    assert_eq!(report.drawn, 0);
    assert_eq!(report.skipped, 0);
    let background = pixmap.pixels()[0];
    assert!(pixmap.pixels().iter().all(|p| *p == background));
}

#[test]
fn identical_inputs_produce_identical_png_bytes() {
    let records = parse_str(POS).expect("parse");
    let colors = colors_for(&records);
    let opts = RenderOptions::default();

    let (first, _) =
        render_side(&records, &geometries(), &colors, Side::Top, &opts).expect("first");
    let (second, _) =
        render_side(&records, &geometries(), &colors, Side::Top, &opts).expect("second");

    assert_eq!(
        encode_png(&first).expect("encode first"),
        encode_png(&second).expect("encode second")
    );
}

#[test]
fn render_to_file_writes_a_png() {
    let records = parse_str(POS).expect("parse");
    let colors = colors_for(&records);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("top.png");

    let report = render_to_file(
        &records,
        &geometries(),
        &colors,
        Side::Top,
        &path,
        &RenderOptions::default(),
    )
    .expect("render to file");

    assert_eq!(report.drawn, 3);
    let bytes = std::fs::read(&path).expect("read png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn distinct_packages_feed_resolution_once_per_package() {
    let records = parse_str(POS).expect("parse");
    let distinct = distinct_packages(&records);
    let packages: Vec<&str> = distinct
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(packages, ["0603", "QFN-32", "GHOST-FP"]);
}

use std::path::Path;

use indexmap::IndexSet;
use pnpcheck_footprint::{resolve, FootprintLoader, KicadLoader};

const FP_0603: &str = "\
(footprint \"0603\"
  (layer \"F.Cu\")
  (fp_rect (start -0.75 -0.4) (end 0.75 0.4) (layer \"F.SilkS\") (width 0.12))
)
";

const FP_SOT23: &str = "\
(footprint \"SOT-23\"
  (layer \"F.Cu\")
  (pad \"1\" smd rect (at -0.95 1.1) (size 0.8 0.9) (layers \"F.Cu\" \"F.Mask\"))
  (pad \"2\" smd rect (at 0.95 1.1) (size 0.8 0.9) (layers \"F.Cu\" \"F.Mask\"))
  (pad \"3\" smd rect (at 0 -1.1) (size 0.8 0.9) (layers \"F.Cu\" \"F.Mask\"))
)
";

fn write_footprint(container: &Path, name: &str, contents: &str) {
    std::fs::create_dir_all(container).expect("create container");
    std::fs::write(container.join(format!("{name}.kicad_mod")), contents)
        .expect("write footprint");
}

fn package_set(names: &[&str]) -> IndexSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn loads_a_footprint_from_a_direct_container() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pretty = dir.path().join("chips.pretty");
    write_footprint(&pretty, "0603", FP_0603);

    let mut loader = KicadLoader;
    let resolved = resolve(&package_set(&["0603"]), &[pretty], &mut loader);

    let geo = resolved.get("0603").expect("0603 resolved");
    assert_eq!(geo.size, (1.5, 0.8));
    assert_eq!(geo.print, None);
    assert_eq!(geo.pin, None);
}

#[test]
fn loads_a_footprint_through_the_subdirectory_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let parent = dir.path().join("kicad-footprints");
    write_footprint(&parent.join("Package_TO_SOT_SMD.pretty"), "SOT-23", FP_SOT23);

    let mut loader = KicadLoader;
    let resolved = resolve(
        &package_set(&["SOT-23"]),
        &[parent],
        &mut loader,
    );

    let geo = resolved.get("SOT-23").expect("SOT-23 resolved");
    // Pad 1 at (-0.95, 1.1) in file coordinates, Y flipped into board space.
    assert_eq!(geo.pin, Some((-0.95, -1.1)));
    assert!((geo.size.0 - 2.7).abs() < 1e-9);
    assert!((geo.size.1 - 3.1).abs() < 1e-9);
    // Pads are symmetric about the origin, so there is no print offset.
    assert_eq!(geo.print, None);
}

#[test]
fn missing_footprint_yields_no_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pretty = dir.path().join("chips.pretty");
    write_footprint(&pretty, "0603", FP_0603);

    let mut loader = KicadLoader;
    let resolved = resolve(&package_set(&["0402"]), &[pretty], &mut loader);
    assert!(resolved.is_empty());
}

#[test]
fn corrupt_footprint_file_is_treated_as_no_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pretty = dir.path().join("broken.pretty");
    write_footprint(&pretty, "0603", "(footprint \"0603\" (fp_rect (start -1 -1)");

    let mut loader = KicadLoader;
    let resolved = resolve(&package_set(&["0603"]), &[pretty], &mut loader);
    assert!(resolved.is_empty());
}

#[test]
fn later_direct_container_beats_earlier_nested_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let direct = dir.path().join("local.pretty");
    write_footprint(&direct, "0603", FP_0603);
    let parent = dir.path().join("system");
    write_footprint(&parent.join("chips.pretty"), "0603", FP_SOT23);

    let mut loader = KicadLoader;
    let resolved = resolve(
        &package_set(&["0603"]),
        &[parent, direct],
        &mut loader,
    );

    // The direct container is second in the list but still wins, because
    // direct loads run across every location before any fallback.
    let geo = resolved.get("0603").expect("0603 resolved");
    assert_eq!(geo.size, (1.5, 0.8));
}

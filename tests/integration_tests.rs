use molecule_gallery_generator::{generate_gallery, GalleryConfig};
use std::fs;
use std::path::PathBuf;

const WATER: &str = "3\nwater\nO 0.0 0.0 0.0\nH 0.0 0.0 0.96\nH 0.93 0.0 -0.24\n";
const ETHANE_LIKE: &str = "2\nethane fragment\nC 0.0 0.0 0.0\nC 1.54 0.0 0.0\n";
const BROKEN: &str = "1\nbroken\nO x 0.0 0.0\n";

/// Builds an isolated working tree: index CSV plus a Structure directory.
fn setup(tag: &str, index_csv: &str, files: &[(&str, &str)]) -> PathBuf {
    let root = std::env::temp_dir().join(format!("mgg_it_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("Structure")).expect("create fixture tree");

    fs::write(root.join("lig_descriptor.csv"), index_csv).expect("write index");
    for (name, content) in files {
        fs::write(root.join("Structure").join(format!("{name}.xyz")), content)
            .expect("write structure file");
    }
    root
}

fn config_for(root: &PathBuf) -> GalleryConfig {
    let mut config = GalleryConfig::new();
    config.index_path = root.join("lig_descriptor.csv");
    config.structure_dir = root.join("Structure");
    config.gallery_output = root.join("molecule_viewer.html");
    config.viewer_output = root.join("molecule_3d_viewer.html");
    config
}

#[test]
fn missing_molecule_is_skipped_and_outputs_stay_aligned() {
    // Scenario: two index rows, one source file present.
    let root = setup(
        "missing",
        "name,mw\nwater,18.0\nmissing_mol,99.0\n",
        &[("water", WATER)],
    );
    let config = config_for(&root);

    let report = generate_gallery(&config).expect("batch must not abort");
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    // Viewer: exactly one entry at index 0, named water.
    let viewer = fs::read_to_string(config.viewer_output).unwrap();
    assert!(viewer.contains("id=\"molname_0\">water<"));
    assert!(!viewer.contains("molname_1"));
    assert!(!viewer.contains("missing_mol"));

    // Gallery: exactly one card.
    let gallery = fs::read_to_string(config.gallery_output).unwrap();
    assert_eq!(gallery.matches("molecule-card\">").count(), 1);
    assert!(gallery.contains(">water<"));

    // Augmented table: both rows survive, only water has an image cell.
    let augmented =
        fs::read_to_string(root.join("lig_descriptor_with_images.csv")).unwrap();
    let lines: Vec<&str> = augmented.lines().collect();
    assert_eq!(lines[0], "name,mw,structure_image");
    assert!(lines[1].starts_with("water,18.0,data:image/svg+xml;base64,"));
    assert_eq!(lines[2], "missing_mol,99.0,");

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn parse_failure_excludes_one_molecule_and_batch_continues() {
    let root = setup(
        "parsefail",
        "name\nbroken\nwater\n",
        &[("broken", BROKEN), ("water", WATER)],
    );
    let config = config_for(&root);

    let report = generate_gallery(&config).expect("batch must not abort");
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert!(report.exclusions.iter().any(|line| line.starts_with("broken:")));

    // Water still made it, re-indexed to 0 after the filter.
    let viewer = fs::read_to_string(config.viewer_output).unwrap();
    assert!(viewer.contains("id=\"molname_0\">water<"));
    assert!(!viewer.contains("broken"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn emission_order_preserves_filtered_table_order() {
    let root = setup(
        "order",
        "name\nalpha\nghost\nbeta\ngamma\n",
        &[("alpha", WATER), ("beta", ETHANE_LIKE), ("gamma", WATER)],
    );
    let config = config_for(&root);

    generate_gallery(&config).unwrap();
    let viewer = fs::read_to_string(config.viewer_output).unwrap();

    // ghost is filtered; survivors keep relative order with indices 0..2.
    assert!(viewer.contains("id=\"molname_0\">alpha<"));
    assert!(viewer.contains("id=\"molname_1\">beta<"));
    assert!(viewer.contains("id=\"molname_2\">gamma<"));
    assert!(!viewer.contains("ghost"));

    let a = viewer.find("molname_0").unwrap();
    let b = viewer.find("molname_1").unwrap();
    let c = viewer.find("molname_2").unwrap();
    assert!(a < b && b < c);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn viewer_switch_logic_clears_previous_model_and_selection() {
    let root = setup(
        "switch",
        "name\nwater\nethane\nthird\n",
        &[("water", WATER), ("ethane", ETHANE_LIKE), ("third", WATER)],
    );
    let config = config_for(&root);

    generate_gallery(&config).unwrap();
    let viewer = fs::read_to_string(config.viewer_output).unwrap();

    // Selecting any index first clears the canvas and every selection
    // highlight, then renders exactly one model and marks one name.
    let clear = viewer.find("viewer.clear();").unwrap();
    let add = viewer.find("viewer.addModel").unwrap();
    assert!(clear < add);
    assert!(viewer.contains("classList.remove(\"selected\")"));
    assert!(viewer.contains("classList.add(\"selected\")"));
    assert!(viewer.contains("if (xyzData.length > 0) showMol(0);"));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unreadable_index_is_the_only_batch_fatal_error() {
    let root = setup("fatal", "name\nwater\n", &[("water", WATER)]);
    let mut config = config_for(&root);
    config.index_path = root.join("does_not_exist.csv");

    assert!(generate_gallery(&config).is_err());
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn discovery_mode_runs_without_an_index() {
    let root = setup(
        "discover",
        "unused\n",
        &[("b_mol", ETHANE_LIKE), ("a_mol", WATER)],
    );
    let mut config = config_for(&root);
    config.discover = true;
    config.index_path = root.join("does_not_exist.csv");

    let report = generate_gallery(&config).unwrap();
    assert_eq!(report.processed, 2);

    // Sorted discovery order: a_mol before b_mol.
    let viewer = fs::read_to_string(config.viewer_output).unwrap();
    assert!(viewer.contains("id=\"molname_0\">a_mol<"));
    assert!(viewer.contains("id=\"molname_1\">b_mol<"));

    // No index table, so no augmented CSV.
    assert!(!root.join("does_not_exist_with_images.csv").exists());

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn raw_payloads_are_embedded_verbatim() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let root = setup("verbatim", "name\nwater\n", &[("water", WATER)]);
    let config = config_for(&root);
    generate_gallery(&config).unwrap();

    let viewer = fs::read_to_string(config.viewer_output).unwrap();
    let start = viewer.find("const xyzData = ").unwrap() + "const xyzData = ".len();
    let end = viewer[start..].find(';').unwrap() + start;
    let payloads: Vec<String> = serde_json::from_str(&viewer[start..end]).unwrap();
    assert_eq!(payloads.len(), 1);

    let decoded = String::from_utf8(STANDARD.decode(&payloads[0]).unwrap()).unwrap();
    // The interactive viewer ships the source text untouched, refined or not.
    assert_eq!(decoded, WATER);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn dump_xyz_exports_refined_geometries() {
    let root = setup("dump", "name\nethane\n", &[("ethane", ETHANE_LIKE)]);
    let mut config = config_for(&root);
    config.dump_xyz_dir = Some(root.join("refined"));

    generate_gallery(&config).unwrap();
    let dumped = fs::read_to_string(root.join("refined").join("ethane.xyz")).unwrap();
    assert!(dumped.starts_with("2\n"));
    assert!(dumped.contains('C'));

    fs::remove_dir_all(&root).unwrap();
}

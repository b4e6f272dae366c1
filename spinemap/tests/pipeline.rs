use std::fs;
use std::path::PathBuf;

use spinemap::backbone_format::{load_backbone, write_backbone_tsv};
use spinemap::frame::Frame;
use spinemap::model_points::read_model_points;
use spinemap::pose::{locate_on_spine, PoseInfo, ProjectedCoord};
use spinemap::spine::Spine;
use spinemap::SpineError;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spinemap-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const CURVED_TSV: &str = "\
0 60 90 6.5
0 52 70 7.0
0 58 50 7.5
0 66 32 7.0
0 60 15 5.0
";

#[test]
fn tsv_backbone_straightens_uniform_frame() {
    let path = temp_file("curved.tsv", CURVED_TSV);
    let bb = load_backbone(&path).unwrap();
    // Stored tail first; loading flips it.
    assert_eq!(bb.first().x, 15.0);

    let spine = Spine::from_backbone(&bb).unwrap();
    let frame = Frame::from_fn(128, 128, |_, _| 1000.25);
    let out = spine.straighten(&frame);

    assert_eq!(out.width, spine.traced().len());
    assert_eq!(out.height, 16);
    assert!(out.data.iter().all(|&v| v == 1000));
}

#[test]
fn restacked_pixels_match_located_points() {
    let path = temp_file("curved.json", r#"{"bbpoints": [
        [15, 60, 0, 6], [32, 66, 0, 6], [50, 58, 0, 6], [70, 52, 0, 6], [90, 60, 0, 6]
    ]}"#);
    let spine = Spine::from_backbone(&load_backbone(&path).unwrap()).unwrap();
    let frame = Frame::from_fn(128, 128, |r, c| 2.0 * r as f32 + 3.0 * c as f32);
    let out = spine.straighten(&frame);
    let base = out.base_row();
    let pose = PoseInfo::default();

    for s in (0..spine.traced().len() - 1).step_by(7) {
        for k in [0usize, 1, 3, 5] {
            let p = locate_on_spine(
                ProjectedCoord {
                    along: s as f64,
                    transverse: k as f64,
                },
                spine.traced(),
                &pose,
            )
            .unwrap();
            let expected = 2.0 * p.y + 3.0 * p.x;
            let actual = out.get(base - k, s).unwrap() as f64;
            assert!(
                (expected - actual).abs() < 1.0,
                "column {s}, offset {k}: {expected} vs {actual}"
            );
        }
    }
}

#[test]
fn neurons_are_placed_along_the_body() {
    let path = temp_file("straight.tsv", "0 40 10 5\n0 40 60 5\n");
    let spine = Spine::from_backbone(&load_backbone(&path).unwrap()).unwrap();
    let neurons = read_model_points(
        r#"{"neurons": [
            {"name": "A", "pos": [0.0, 10.0, 2.0], "diameter": 4.0},
            {"name": "B", "pos": [0.0, 80.0, 0.0], "diameter": 4.0},
            {"name": "C", "pos": [0.0, 20.0, -1.0], "diameter": 2.0}
        ]}"#
        .as_bytes(),
    )
    .unwrap();

    let placed = spine.place(&neurons, &PoseInfo::new(2.0, 3.0, 0.0));
    assert_eq!(placed.len(), 2);

    // A: spine coordinate 23, two zoomed units of z above the spine (towards row 0).
    assert_eq!(placed[0].name, "A");
    assert!((placed[0].col() - 33.0).abs() < 1e-9);
    assert!((placed[0].row() - 36.0).abs() < 1e-9);
    assert!((placed[0].radius - 4.0).abs() < 1e-12);

    // B falls past the tail at this zoom; C at spine 43, below the spine.
    assert_eq!(placed[1].name, "C");
    assert!((placed[1].col() - 53.0).abs() < 1e-9);
    assert!((placed[1].row() - 42.0).abs() < 1e-9);
}

#[test]
fn reversed_backbone_file_round_trips() {
    let path = temp_file("reverse.tsv", CURVED_TSV);
    let bb = load_backbone(&path).unwrap();

    let mut out = Vec::new();
    write_backbone_tsv(&mut out, &bb.reversed()).unwrap();
    let reversed_path = temp_file("reversed.tsv", &String::from_utf8(out).unwrap());

    // Loading orients canonically again.
    assert_eq!(load_backbone(&reversed_path).unwrap(), bb);
}

#[test]
fn degenerate_backbone_aborts() {
    let path = temp_file("point.tsv", "0 5 5 2\n0 5 5 2\n");
    let bb = load_backbone(&path).unwrap();
    assert!(matches!(
        Spine::from_backbone(&bb),
        Err(SpineError::DegenerateCurve { .. })
    ));
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("spinemap-does-not-exist.tsv");
    assert!(matches!(load_backbone(&path), Err(SpineError::Io(_))));
}

#[test]
fn infinite_edge_distance_is_a_parse_error() {
    let path = temp_file("infinite.tsv", "0 5 0 inf\n0 5 10 2\n");
    assert!(matches!(
        load_backbone(&path),
        Err(SpineError::Parse { line: 1, .. })
    ));
}

//! Integration tests: save/load histograms through the filesystem.

use hg_core::Error;
use hg_hist::{BinEdges, Histogram, Selector};
use hg_io::{SaveOptions, load, load_selected, save, save_with};
use ndarray::{ArrayD, IxDyn};

fn camera_like() -> Histogram {
    let edges = BinEdges::uniform(0.0, 100.0, 50).unwrap();
    let mut h = Histogram::new(edges, &[4, 6]);
    let samples = ArrayD::from_shape_fn(IxDyn(&[4, 6, 200]), |ix| {
        ((ix[0] * 37 + ix[1] * 11 + ix[2] * 3) % 130) as f32 - 10.0
    });
    h.fill(samples.view()).unwrap();
    h
}

#[test]
fn save_load_json_and_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let h = camera_like();

    for name in ["h.json", "h.json.gz"] {
        let path = dir.path().join(name);
        save(&h, &path).unwrap();
        let back = load(&path).unwrap();
        assert!(back.equals(&h).unwrap(), "{name}");
        assert_eq!(back.bins().edges(), h.bins().edges());
        assert_eq!(back.underflow(), h.underflow());
        assert_eq!(back.overflow(), h.overflow());
    }
}

#[test]
fn gzip_level_zero_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.json.gz");
    let h = camera_like();
    save_with(&h, &path, &SaveOptions { compression: 0 }).unwrap();
    assert!(load(&path).unwrap().equals(&h).unwrap());
}

#[test]
fn sub_range_load_matches_select() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.json");
    let h = camera_like();
    save(&h, &path).unwrap();

    let selector = [Selector::Index(2), Selector::range(1, 4)];
    let part = load_selected(&path, &selector).unwrap();
    assert_eq!(part.cell_shape(), &[3]);
    assert!(part.equals(&h.select(&selector).unwrap()).unwrap());

    let err = load_selected(&path, &[Selector::Index(9)]).unwrap_err();
    assert!(matches!(err, Error::IndexConstraint { axis: 0, value: 9, size: 4 }));
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.fits");
    assert!(matches!(save(&camera_like(), &path), Err(Error::UnsupportedFormat(_))));
    assert!(!path.exists());
    assert!(matches!(load(&path), Err(Error::UnsupportedFormat(_))));
}

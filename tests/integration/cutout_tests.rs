//! Cutout address integration tests.
//!
//! Tests verify:
//! - Range parsing and key lists for cutout paths
//! - Strict rejection of ranges that overlap the frame edge
//! - Range syntax errors

use boss_address::error::{AddressError, Axis};
use boss_address::RequestKind;

use super::test_utils::{fixture_catalog, parser};

#[test]
fn test_cutout_fields() {
    let catalog = fixture_catalog();
    let address = parser()
        .parse("/v1/cutout/col1/exp1/channel2/2/0:512/100:612/0:16/", &catalog)
        .unwrap();

    assert_eq!(address.kind(), RequestKind::Cutout);
    assert_eq!(address.boss_key(), "col1&exp1&channel2");
    assert_eq!(address.lookup_key(), "1&7&4");
    assert_eq!(address.orientation(), None);
    assert_eq!(address.tile_size(), None);
    assert_eq!((address.x_start(), address.x_stop()), (0, 512));
    assert_eq!((address.y_start(), address.y_stop()), (100, 612));
    assert_eq!(address.z_span(), 16);
    assert_eq!(address.time(), 0..1);
    assert_eq!(address.boss_key_list(), ["col1&exp1&channel2&2&0"]);
}

#[test]
fn test_cutout_time_range_keys() {
    let catalog = fixture_catalog();
    let address = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/0:10/2:5/", &catalog)
        .unwrap();

    let keys = address.boss_key_list();
    assert_eq!(keys.len() as u64, address.time().end - address.time().start);
    assert_eq!(
        keys,
        [
            "col1&exp1&channel1&0&2",
            "col1&exp1&channel1&0&3",
            "col1&exp1&channel1&0&4"
        ]
    );
}

#[test]
fn test_cutout_single_time_index() {
    let catalog = fixture_catalog();
    let address = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/0:10/7/", &catalog)
        .unwrap();

    assert_eq!(address.time(), 7..8);
    assert_eq!(address.boss_key_list(), ["col1&exp1&channel1&0&7"]);
}

#[test]
fn test_cutout_whole_frame_at_resolution() {
    let catalog = fixture_catalog();

    // res 3 on the anisotropic experiment: x/y 4096 >> 3, z 200 >> 2
    let address = parser()
        .parse("/v1/cutout/col1/exp1/channel1/3/0:512/0:512/0:50/", &catalog)
        .unwrap();
    assert_eq!(address.z_stop(), 50);

    // the isotropic experiment halves z a third time
    let err = parser()
        .parse("/v1/cutout/col1/exp_iso/channel1/3/0:512/0:512/0:50/", &catalog)
        .unwrap_err();
    assert_eq!(
        err,
        AddressError::OutOfBounds {
            axis: Axis::Z,
            start: 0,
            stop: 50,
            min: 0,
            max: 25,
            resolution: 3,
        }
    );
}

#[test]
fn test_cutout_partial_overlap_is_rejected() {
    let catalog = fixture_catalog();
    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/4000:4100/0:10/0:10/", &catalog)
        .unwrap_err();

    assert_eq!(
        err,
        AddressError::OutOfBounds {
            axis: Axis::X,
            start: 4000,
            stop: 4100,
            min: 0,
            max: 4096,
            resolution: 0,
        }
    );
}

#[test]
fn test_cutout_time_past_last_sample() {
    let catalog = fixture_catalog();
    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/0:10/0:12/", &catalog)
        .unwrap_err();

    assert!(matches!(
        err,
        AddressError::OutOfBounds {
            axis: Axis::Time,
            max: 11,
            ..
        }
    ));
}

#[test]
fn test_cutout_invalid_ranges() {
    let catalog = fixture_catalog();

    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/10:10/0:10/", &catalog)
        .unwrap_err();
    assert_eq!(
        err,
        AddressError::InvalidRange {
            axis: Axis::Y,
            start: 10,
            stop: 10
        }
    );

    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/9:3/", &catalog)
        .unwrap_err();
    assert!(matches!(err, AddressError::InvalidRange { axis: Axis::Z, .. }));
}

#[test]
fn test_cutout_range_syntax() {
    let catalog = fixture_catalog();

    for bad in ["10", "a:10", "0:b", "0:10:20", ":10"] {
        let path = format!("/v1/cutout/col1/exp1/channel1/0/{}/0:10/0:10/", bad);
        let err = parser().parse(&path, &catalog).unwrap_err();
        assert!(
            matches!(err, AddressError::TypeError { field: "x_range", .. }),
            "{} gave {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_cutout_wrong_segment_count() {
    let catalog = fixture_catalog();

    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/", &catalog)
        .unwrap_err();
    assert!(matches!(err, AddressError::MalformedPath { .. }));

    let err = parser()
        .parse("/v1/cutout/col1/exp1/channel1/0/0:10/0:10/0:10/0:1/extra/", &catalog)
        .unwrap_err();
    assert!(matches!(err, AddressError::MalformedPath { .. }));
}

#[test]
fn test_cutout_coerce_without_catalog() {
    let coerced = parser()
        .coerce("/v1/cutout/anything/at/all/1/0:10/0:20/0:30/")
        .unwrap();

    assert_eq!(coerced.resource.to_string(), "anything/at/all");
    assert_eq!(coerced.resolution, 1);
    assert_eq!(coerced.y.span(), 20);
}

use super::*;
use crate::animation::value::PropertyValue;

fn props(pairs: &[(&str, PropertyValue)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn num(v: f64) -> PropertyValue {
    PropertyValue::Number(v)
}

fn text(s: &str) -> PropertyValue {
    PropertyValue::from(s)
}

fn fade_and_slide() -> Vec<TrackKeyframe> {
    vec![
        TrackKeyframe::new(
            0.2,
            props(&[("opacity", num(0.0)), ("left", text("-100px"))]),
        ),
        TrackKeyframe::new(0.6, props(&[("opacity", num(0.8))])),
        TrackKeyframe::new(
            0.8,
            props(&[("opacity", num(1.0)), ("left", text("0px"))]),
        ),
    ]
}

#[test]
fn empty_track_is_empty_map() {
    assert!(resolve_at(&[], 0.5, Easing::Linear).is_empty());
}

#[test]
fn clamps_outside_the_keyframe_range() {
    let keys = fade_and_slide();
    for q in [-1.0, 0.0, 0.1, 0.2] {
        assert_eq!(resolve_at(&keys, q, Easing::Linear), keys[0].properties);
    }
    for q in [0.8, 0.95, 1.0, 3.0] {
        assert_eq!(resolve_at(&keys, q, Easing::Linear), keys[2].properties);
    }
}

#[test]
fn identity_at_keyframe_positions() {
    let keys = fade_and_slide();
    let track = Track::new(keys.clone(), Easing::EaseInOut);
    for k in &keys {
        let out = track.resolve_at(k.position);
        for (name, value) in &k.properties {
            assert_eq!(out.get(name), Some(value), "{name} at {}", k.position);
        }
    }
}

#[test]
fn interpolates_within_segment() {
    let out = resolve_at(&fade_and_slide(), 0.4, Easing::Linear);
    assert!((out["opacity"].as_number().unwrap() - 0.4).abs() < 1e-9);
    // `left` is missing at 0.6 so it spans 0.2..0.8: one third of the way.
    let left = out["left"].as_text().unwrap();
    assert_eq!(left, "-66.6667px");
}

#[test]
fn holds_when_only_one_side_defines_a_property() {
    let keys = vec![
        TrackKeyframe::new(0.0, props(&[("opacity", num(0.0)), ("color", text("red"))])),
        TrackKeyframe::new(1.0, props(&[("opacity", num(1.0))])),
    ];
    let out = resolve_at(&keys, 0.5, Easing::Linear);
    assert_eq!(out["color"], text("red"));
    assert_eq!(out["opacity"], num(0.5));
}

#[test]
fn track_easing_shapes_progress() {
    let keys = vec![
        TrackKeyframe::new(0.0, props(&[("x", num(0.0))])),
        TrackKeyframe::new(1.0, props(&[("x", num(100.0))])),
    ];
    let out = resolve_at(&keys, 0.5, Easing::InQuad);
    assert_eq!(out["x"], num(25.0));
}

#[test]
fn keyframe_easing_overrides_track_easing() {
    let mut first = TrackKeyframe::new(0.0, props(&[("x", num(0.0))]));
    first.easing = Some(Easing::Steps {
        count: 1,
        jump_start: false,
    });
    let keys = vec![first, TrackKeyframe::new(1.0, props(&[("x", num(100.0))]))];
    let out = resolve_at(&keys, 0.7, Easing::Linear);
    assert_eq!(out["x"], num(0.0));
}

#[test]
fn unsorted_input_is_sorted() {
    let keys = vec![
        TrackKeyframe::new(1.0, props(&[("x", num(10.0))])),
        TrackKeyframe::new(0.0, props(&[("x", num(0.0))])),
    ];
    let track = Track::new(keys, Easing::Linear);
    assert_eq!(track.positions().collect::<Vec<_>>(), vec![0.0, 1.0]);
    assert_eq!(track.resolve_at(0.5)["x"], num(5.0));
}

#[test]
fn duplicate_positions_use_first_occurrence() {
    let keys = vec![
        TrackKeyframe::new(0.0, props(&[("x", num(0.0))])),
        TrackKeyframe::new(0.5, props(&[("x", num(50.0))])),
        TrackKeyframe::new(0.5, props(&[("x", num(80.0))])),
        TrackKeyframe::new(1.0, props(&[("x", num(100.0))])),
    ];
    let track = Track::new(keys, Easing::Linear);
    // The first pair ending at 0.5 wins, so the earlier duplicate is reached exactly.
    assert_eq!(track.resolve_at(0.5)["x"], num(50.0));
    assert_eq!(track.resolve_at(0.25)["x"], num(25.0));
    // Past the duplicates the later one starts the next segment.
    assert_eq!(track.resolve_at(0.75)["x"], num(90.0));
}

#[test]
fn incompatible_property_is_omitted_not_fatal() {
    let keys = vec![
        TrackKeyframe::new(0.0, props(&[("opacity", num(0.0)), ("fill", num(1.0))])),
        TrackKeyframe::new(1.0, props(&[("opacity", num(1.0)), ("fill", text("blue"))])),
    ];
    let track = Track::new(keys, Easing::Linear);
    assert_eq!(track.inconsistent_properties().collect::<Vec<_>>(), vec!["fill"]);

    let out = track.resolve_at(0.5);
    assert_eq!(out["opacity"], num(0.5));
    assert!(!out.contains_key("fill"));
}

#[test]
fn colors_and_transforms_resolve() {
    let keys = vec![
        TrackKeyframe::new(
            0.0,
            props(&[("color", text("#000000")), ("transform", text("none"))]),
        ),
        TrackKeyframe::new(
            1.0,
            props(&[
                ("color", text("#ffffff")),
                ("transform", text("translateY(40px) rotate(90deg)")),
            ]),
        ),
    ];
    let out = resolve_at(&keys, 0.5, Easing::Linear);
    assert_eq!(out["color"], text("#808080"));
    assert_eq!(
        out["transform"],
        text("translate(0px, 20px) scale(1) rotate(45deg)")
    );
}

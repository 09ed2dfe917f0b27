use super::*;

#[test]
fn parses_common_functions() {
    let t = TransformBundle::parse("translate(10px, 20px) scale(1.5) rotate(45deg)").unwrap();
    assert_eq!(t.translate_x, Length::px(10.0));
    assert_eq!(t.translate_y, Length::px(20.0));
    assert_eq!((t.scale_x, t.scale_y), (1.5, 1.5));
    assert_eq!(t.rotate_deg, 45.0);

    let axis = TransformBundle::parse("translateX(-50%) translateY(10px) scaleY(50%)").unwrap();
    assert_eq!(axis.translate_x, Length::new(-50.0, Unit::Percent));
    assert_eq!(axis.translate_y, Length::px(10.0));
    assert_eq!((axis.scale_x, axis.scale_y), (1.0, 0.5));

    assert_eq!(
        TransformBundle::parse("rotate(0.5turn)").unwrap().rotate_deg,
        180.0
    );
    assert_eq!(TransformBundle::parse("none"), Some(TransformBundle::IDENTITY));
}

#[test]
fn repeated_functions_accumulate() {
    let t = TransformBundle::parse("translateX(10px) translateX(5px) scale(2) scale(3) rotate(10deg) rotate(5deg)")
        .unwrap();
    assert_eq!(t.translate_x, Length::px(15.0));
    assert_eq!(t.scale_x, 6.0);
    assert_eq!(t.rotate_deg, 15.0);
}

#[test]
fn rejects_unsupported_functions() {
    assert!(TransformBundle::parse("skewX(10deg)").is_none());
    assert!(TransformBundle::parse("matrix(1, 0, 0, 1, 0, 0)").is_none());
    assert!(TransformBundle::parse("translate(10px").is_none());
    assert!(TransformBundle::parse("rotate(10px)").is_none());
    assert!(TransformBundle::parse("").is_none());
}

#[test]
fn lerp_from_identity_recomposes_in_canonical_order() {
    let to = TransformBundle::parse("rotate(45deg) scale(1.5) translate(10px, 20px)").unwrap();
    let mid = TransformBundle::IDENTITY.lerp(&to, 0.5).unwrap();
    assert_eq!(
        mid.to_css(),
        "translate(5px, 10px) scale(1.25) rotate(22.5deg)"
    );
}

#[test]
fn lerp_rejects_mismatched_units() {
    let a = TransformBundle::parse("translateX(10px)").unwrap();
    let b = TransformBundle::parse("translateX(10%)").unwrap();
    assert!(a.lerp(&b, 0.5).is_none());
}

#[test]
fn non_uniform_scale_serializes_both_axes() {
    let t = TransformBundle::parse("scale(2, 0.5)").unwrap();
    assert_eq!(t.to_css(), "translate(0px, 0px) scale(2, 0.5) rotate(0deg)");
}

#[test]
fn affine_matches_components() {
    let t = TransformBundle::parse("translate(10px, 20px) scale(2)").unwrap();
    let m = t.to_affine().unwrap().as_coeffs();
    assert_eq!(m, [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);

    let relative = TransformBundle::parse("translateX(50%)").unwrap();
    assert!(relative.to_affine().is_none());
}

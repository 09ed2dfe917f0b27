use super::*;

const NAMED: [Easing; 32] = [
    Easing::Linear,
    Easing::Ease,
    Easing::EaseIn,
    Easing::EaseOut,
    Easing::EaseInOut,
    Easing::InQuad,
    Easing::OutQuad,
    Easing::InOutQuad,
    Easing::InCubic,
    Easing::OutCubic,
    Easing::InOutCubic,
    Easing::InQuart,
    Easing::OutQuart,
    Easing::InOutQuart,
    Easing::InSine,
    Easing::OutSine,
    Easing::InOutSine,
    Easing::InExpo,
    Easing::OutExpo,
    Easing::InOutExpo,
    Easing::InCirc,
    Easing::OutCirc,
    Easing::InOutCirc,
    Easing::InBack,
    Easing::OutBack,
    Easing::InOutBack,
    Easing::InElastic,
    Easing::OutElastic,
    Easing::InOutElastic,
    Easing::InBounce,
    Easing::OutBounce,
    Easing::InOutBounce,
];

#[test]
fn endpoints_are_stable() {
    for ease in NAMED {
        assert!((ease.apply(0.0) - 0.0).abs() < 1e-9, "{ease} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease} at 1");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::InQuad,
        Easing::OutQuart,
        Easing::InOutSine,
        Easing::OutExpo,
        Easing::InOutCirc,
    ] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn overshoot_is_not_clamped() {
    assert!(Easing::InBack.apply(0.2) < 0.0);
    assert!(Easing::OutBack.apply(0.8) > 1.0);
    assert!(Easing::OutElastic.apply(0.1) > 1.0);
    assert_eq!(Easing::Linear.apply(1.5), 1.5);
    assert_eq!(Easing::Linear.apply(-0.5), -0.5);
    assert_eq!(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0).apply(1.25), 1.25);
}

#[test]
fn parses_css_and_camel_names() {
    assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
    assert_eq!("ease-in".parse::<Easing>().unwrap(), Easing::EaseIn);
    assert_eq!("EaseInOut".parse::<Easing>().unwrap(), Easing::EaseInOut);
    assert_eq!("easeOutBack".parse::<Easing>().unwrap(), Easing::OutBack);
    assert_eq!("ease_in_out_quad".parse::<Easing>().unwrap(), Easing::InOutQuad);
    assert_eq!(
        "cubic-bezier(0.4, 0, 0.2, 1)".parse::<Easing>().unwrap(),
        Easing::CubicBezier(0.4, 0.0, 0.2, 1.0)
    );
    assert_eq!(
        "steps(4, start)".parse::<Easing>().unwrap(),
        Easing::Steps {
            count: 4,
            jump_start: true
        }
    );
    assert_eq!(
        "step-end".parse::<Easing>().unwrap(),
        Easing::Steps {
            count: 1,
            jump_start: false
        }
    );
}

#[test]
fn unknown_names_are_errors() {
    let err = "wobble".parse::<Easing>().unwrap_err();
    assert_eq!(err.name, "wobble");
    assert!(err.to_string().contains("wobble"));

    assert!("cubic-bezier(1.5, 0, 0.2, 1)".parse::<Easing>().is_err());
    assert!("cubic-bezier(0.1, 0.2)".parse::<Easing>().is_err());
    assert!("steps(0)".parse::<Easing>().is_err());
}

#[test]
fn display_round_trips_through_parse() {
    for ease in NAMED {
        let reparsed: Easing = ease.to_string().parse().unwrap();
        assert_eq!(reparsed, ease);
    }
}

#[test]
fn cubic_bezier_matches_reference_points() {
    // `ease` at half progress is ~0.8024 in browser implementations.
    let v = Easing::Ease.apply(0.5);
    assert!((v - 0.8024).abs() < 1e-3, "{v}");

    // A linear bezier is the identity.
    let lin = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0);
    for t in [0.1, 0.33, 0.5, 0.9] {
        assert!((lin.apply(t) - t).abs() < 1e-6);
    }
}

#[test]
fn steps_quantize() {
    let end = Easing::Steps {
        count: 4,
        jump_start: false,
    };
    assert_eq!(end.apply(0.1), 0.0);
    assert_eq!(end.apply(0.3), 0.25);
    assert_eq!(end.apply(1.0), 1.0);

    let start = Easing::Steps {
        count: 4,
        jump_start: true,
    };
    assert_eq!(start.apply(0.1), 0.25);
}

#[test]
fn easing_def_resolves_both_forms() {
    let named: EasingDef = serde_json::from_str("\"ease-out\"").unwrap();
    assert_eq!(named.resolve().unwrap(), Easing::EaseOut);

    let bezier: EasingDef = serde_json::from_str("[0.25, 0.1, 0.25, 1.0]").unwrap();
    assert_eq!(
        bezier.resolve().unwrap(),
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)
    );
}

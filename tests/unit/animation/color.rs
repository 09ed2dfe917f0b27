use super::*;

#[test]
fn parses_hex_forms() {
    let c = Color::parse("#ff0000").unwrap();
    assert_eq!((c.r, c.g, c.b, c.a), (255.0, 0.0, 0.0, 1.0));
    assert_eq!(c.notation, ColorNotation::Hex { alpha: false });

    let short = Color::parse("#0f8").unwrap();
    assert_eq!((short.r, short.g, short.b), (0.0, 255.0, 136.0));

    let with_alpha = Color::parse("#0000ff80").unwrap();
    assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-9);
    assert_eq!(with_alpha.notation, ColorNotation::Hex { alpha: true });

    assert!(Color::parse("#12345").is_none());
    assert!(Color::parse("#gg0000").is_none());
}

#[test]
fn parses_functional_forms() {
    let c = Color::parse("rgba(10, 20, 30, 0.5)").unwrap();
    assert_eq!((c.r, c.g, c.b, c.a), (10.0, 20.0, 30.0, 0.5));
    assert_eq!(c.notation, ColorNotation::Rgb { alpha: true });

    let spaced = Color::parse("rgb(255 128 0 / 25%)").unwrap();
    assert_eq!((spaced.r, spaced.g, spaced.b), (255.0, 128.0, 0.0));
    assert!((spaced.a - 0.25).abs() < 1e-9);

    let red = Color::parse("hsl(0, 100%, 50%)").unwrap();
    assert!((red.r - 255.0).abs() < 1e-9);
    assert!(red.g.abs() < 1e-9);
    assert!(red.b.abs() < 1e-9);
    assert_eq!(red.notation, ColorNotation::Hsl { alpha: false });

    assert!(Color::parse("rgb(1, 2)").is_none());
    assert!(Color::parse("Helvetica").is_none());
}

#[test]
fn parses_named_colors() {
    let t = Color::parse("transparent").unwrap();
    assert_eq!(t.a, 0.0);
    let white = Color::parse("WHITE").unwrap();
    assert_eq!((white.r, white.g, white.b), (255.0, 255.0, 255.0));

    for (name, rgb) in [
        ("darkblue", (0.0, 0.0, 139.0)),
        ("rebeccapurple", (102.0, 51.0, 153.0)),
        ("lightgoldenrodyellow", (250.0, 250.0, 210.0)),
        ("mediumseagreen", (60.0, 179.0, 113.0)),
    ] {
        let c = Color::parse(name).unwrap();
        assert_eq!((c.r, c.g, c.b), rgb, "{name}");
        assert_eq!(c.notation, ColorNotation::Named);
    }
}

#[test]
fn parses_hwb() {
    let red = Color::parse("hwb(0 0% 0%)").unwrap();
    assert_eq!((red.r, red.g, red.b), (255.0, 0.0, 0.0));
    assert_eq!(red.notation, ColorNotation::Hwb { alpha: false });

    let faded = Color::parse("hwb(120 20% 30% / 0.5)").unwrap();
    assert_eq!(faded.notation, ColorNotation::Hwb { alpha: true });
    assert!((faded.a - 0.5).abs() < 1e-9);
    assert_eq!(faded.to_css(), "hwb(120 20% 30% / 0.5)");
}

#[test]
fn bare_words_are_not_colors() {
    for s in ["none", "abc", "ffcc00", "Helvetica", "bold", ""] {
        assert!(Color::parse(s).is_none(), "{s}");
    }
}

#[test]
fn rgba_blend_keeps_rgba_notation() {
    let a = Color::parse("rgba(0, 0, 0, 0)").unwrap();
    let b = Color::parse("rgba(200, 100, 50, 1)").unwrap();
    assert_eq!(a.lerp(&b, 0.5).to_css(), "rgba(100, 50, 25, 0.5)");
}

#[test]
fn hex_blend_keeps_hex_notation() {
    let a = Color::parse("#000000").unwrap();
    let b = Color::parse("#ffffff").unwrap();
    assert_eq!(a.lerp(&b, 0.5).to_css(), "#808080");

    let translucent = Color::parse("#00000000").unwrap();
    assert_eq!(translucent.lerp(&b, 0.5).to_css(), "#80808080");
}

#[test]
fn opaque_rgb_gains_alpha_when_translucent() {
    let a = Color::parse("rgb(255, 0, 0)").unwrap();
    let b = Color::parse("transparent").unwrap();
    assert_eq!(a.lerp(&b, 0.5).to_css(), "rgba(128, 0, 0, 0.5)");
}

#[test]
fn hsl_serializes_as_hsl() {
    let a = Color::parse("hsl(210, 50%, 40%)").unwrap();
    assert_eq!(a.to_css(), "hsl(210, 50%, 40%)");
}

#[test]
fn untouched_colors_round_trip_canonically() {
    for c in [
        "#abc",
        "#a1b2c3",
        "#a1b2c380",
        "rgb(12, 34, 56)",
        "rgba(12, 34, 56, 0.25)",
        "hsl(210, 50%, 40%)",
        "hsla(33, 80%, 65%, 0.7)",
        "orange",
        "darkslategray",
        "hwb(200 10% 20%)",
        "transparent",
    ] {
        let parsed = Color::parse(c).unwrap();
        for t in [0.0, 0.3, 0.5, 1.0] {
            let out = parsed.lerp(&parsed, t).to_css();
            assert!(colors_equal(c, &out), "{c} -> {out}");
        }
    }
}

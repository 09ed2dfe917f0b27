use super::*;
use crate::foundation::ids::LayerId;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NovaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        NovaError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        NovaError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        NovaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn playout_errors_convert() {
    let err: NovaError = PlayoutError::UnknownLayer(LayerId::from("gfx-1")).into();
    let msg = err.to_string();
    assert!(msg.contains("playout error:"));
    assert!(msg.contains("gfx-1"));
}

#[test]
fn json_errors_become_serde() {
    let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = NovaError::from(bad);
    assert!(matches!(err, NovaError::Serde(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NovaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

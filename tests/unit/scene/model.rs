use super::*;

#[test]
fn phases_parse_and_display() {
    for phase in Phase::ALL {
        assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
    }
    assert_eq!(" LOOP ".parse::<Phase>().unwrap(), Phase::Loop);
    assert!("outro".parse::<Phase>().is_err());
    assert_eq!(serde_json::to_string(&Phase::Out).unwrap(), "\"out\"");
}

#[test]
fn phase_default_easings() {
    assert_eq!(Phase::In.default_easing(), Easing::EaseOut);
    assert_eq!(Phase::Loop.default_easing(), Easing::Linear);
    assert_eq!(Phase::Out.default_easing(), Easing::EaseIn);
}

#[test]
fn phase_durations_fill_missing_keys() {
    let pd: PhaseDurations = serde_json::from_str(r#"{"in": 1000}"#).unwrap();
    assert_eq!(pd.get(Phase::In), 1000.0);
    assert_eq!(pd.get(Phase::Loop), 5000.0);
    assert_eq!(pd.get(Phase::Out), 3000.0);

    let bad = PhaseDurations {
        out_ms: -1.0,
        ..PhaseDurations::default()
    };
    assert!(bad.validate("test").is_err());
}

#[test]
fn project_json_with_defaults() {
    let project = Project::from_json_str(
        r#"{
            "templates": [{
                "id": "lower-third",
                "elements": [{"id": "bg", "styles": {"opacity": 1}}],
                "animations": [{"id": "bg-in", "element_id": "bg", "phase": "in", "easing": [0.4, 0, 0.2, 1]}],
                "keyframes": [
                    {"animation_id": "bg-in", "position": 0, "properties": {"opacity": 0}},
                    {"animation_id": "bg-in", "position": 1, "properties": {"opacity": 1}, "easing": "ease-in"}
                ]
            }]
        }"#,
    )
    .unwrap();

    assert_eq!(project.phase_durations, PhaseDurations::default());
    let t = project.template(&TemplateId::from("lower-third")).unwrap();
    assert_eq!(t.animations[0].delay_ms, 0.0);
    assert_eq!(t.animations[0].duration_ms, None);
    assert_eq!(
        t.animations[0].easing,
        Some(EasingDef::Bezier([0.4, 0.0, 0.2, 1.0]))
    );
    assert_eq!(t.keyframes[1].easing, Some(EasingDef::from("ease-in")));
}

#[test]
fn bad_json_is_a_validation_error() {
    let err = Project::from_json_str("{\"templates\": 3}").unwrap_err();
    assert!(matches!(err, NovaError::Validation(_)));

    let err = Project::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open project JSON"));
}

use super::*;
use crate::animation::ease::EasingDef;
use crate::scene::model::{Project, Template};

fn anim(phase: Phase, delay_ms: f64, duration_ms: Option<f64>) -> Animation {
    Animation {
        id: AnimationId::from("a"),
        element_id: ElementId::from("box"),
        phase,
        delay_ms,
        duration_ms,
        easing: Some(EasingDef::from("linear")),
    }
}

fn fade_template(delay_ms: f64, duration_ms: Option<f64>) -> CompiledTemplate {
    let template: Template = serde_json::from_value(serde_json::json!({
        "id": "t",
        "elements": [{"id": "box"}, {"id": "static", "styles": {"color": "red"}}],
        "animations": [{
            "id": "a", "element_id": "box", "phase": "in",
            "delay_ms": delay_ms, "duration_ms": duration_ms, "easing": "linear"
        }],
        "keyframes": [
            {"animation_id": "a", "position": 0, "properties": {"opacity": 0}},
            {"animation_id": "a", "position": 1, "properties": {"opacity": 1}}
        ]
    }))
    .unwrap();
    CompiledTemplate::compile(&template).unwrap()
}

#[test]
fn position_tracks_elapsed_time() {
    let a = anim(Phase::In, 0.0, Some(500.0));
    let q = |t| EvalQuery::live(Phase::In, t, 3000.0);
    assert_eq!(animation_position(&a, &q(0.0)), 0.0);
    assert_eq!(animation_position(&a, &q(250.0)), 0.5);
    assert_eq!(animation_position(&a, &q(500.0)), 1.0);
    assert_eq!(animation_position(&a, &q(9000.0)), 1.0);
    assert_eq!(animation_position(&a, &q(-50.0)), 0.0);
}

#[test]
fn position_holds_before_delay() {
    let a = anim(Phase::In, 200.0, Some(500.0));
    let q = |t| EvalQuery::live(Phase::In, t, 3000.0);
    assert_eq!(animation_position(&a, &q(100.0)), 0.0);
    assert_eq!(animation_position(&a, &q(200.0)), 0.0);
    assert_eq!(animation_position(&a, &q(450.0)), 0.5);
}

#[test]
fn undefined_duration_uses_phase_duration() {
    let a = anim(Phase::Loop, 0.0, None);
    assert_eq!(
        animation_position(&a, &EvalQuery::live(Phase::Loop, 1000.0, 4000.0)),
        0.25
    );
    // Live time is capped at the phase duration.
    assert_eq!(
        animation_position(&a, &EvalQuery::live(Phase::Loop, 1e9, 4000.0)),
        1.0
    );
}

#[test]
fn instant_animation_completes_after_delay() {
    let a = anim(Phase::Out, 100.0, Some(0.0));
    assert_eq!(
        animation_position(&a, &EvalQuery::scrub(Phase::Out, 50.0, 3000.0)),
        0.0
    );
    assert_eq!(
        animation_position(&a, &EvalQuery::scrub(Phase::Out, 101.0, 3000.0)),
        1.0
    );
}

#[test]
fn scrub_uses_playhead_directly() {
    let a = anim(Phase::In, 0.0, Some(1000.0));
    assert_eq!(
        animation_position(&a, &EvalQuery::scrub(Phase::In, 750.0, 3000.0)),
        0.75
    );
    assert_eq!(
        animation_position(&a, &EvalQuery::scrub(Phase::In, f64::NAN, 3000.0)),
        0.0
    );
}

#[test]
fn animated_properties_sample_the_track() {
    let t = fade_template(0.0, Some(500.0));
    let out = Evaluator::animated_properties(
        &t,
        &ElementId::from("box"),
        &EvalQuery::live(Phase::In, 250.0, 3000.0),
    )
    .unwrap();
    assert_eq!(out["opacity"], PropertyValue::Number(0.5));

    let held = Evaluator::animated_properties(
        &fade_template(200.0, Some(500.0)),
        &ElementId::from("box"),
        &EvalQuery::live(Phase::In, 100.0, 3000.0),
    )
    .unwrap();
    assert_eq!(held["opacity"], PropertyValue::Number(0.0));
}

#[test]
fn missing_animation_is_an_empty_map() {
    let t = fade_template(0.0, Some(500.0));
    let q = EvalQuery::live(Phase::Loop, 100.0, 5000.0);
    assert!(
        Evaluator::animated_properties(&t, &ElementId::from("box"), &q)
            .unwrap()
            .is_empty()
    );
    assert!(
        Evaluator::animated_properties(&t, &ElementId::from("static"), &q)
            .unwrap()
            .is_empty()
    );
    assert!(Evaluator::animated_properties(&t, &ElementId::from("nope"), &q).is_err());
}

#[test]
fn eval_template_fans_out_one_clock() {
    let t = fade_template(0.0, Some(1000.0));
    let q = EvalQuery::live(Phase::In, 500.0, 3000.0);
    let frame = Evaluator::eval_template(&t, &q);
    assert_eq!(frame.elements.len(), 2);
    assert_eq!(frame.elements[0].position, Some(0.5));
    assert_eq!(frame.elements[1].position, None);
    assert!(frame.elements[1].properties.is_empty());

    // Pure: identical inputs give identical output.
    assert_eq!(frame, Evaluator::eval_template(&t, &q));
}

#[test]
fn transform_affine_reads_computed_transform() {
    let mut el = EvaluatedElement {
        element_id: ElementId::from("x"),
        position: Some(1.0),
        properties: PropertyMap::new(),
    };
    assert!(el.transform_affine().is_none());
    el.properties.insert(
        "transform".to_owned(),
        PropertyValue::from("translate(4px, 8px) scale(1) rotate(0deg)"),
    );
    assert_eq!(
        el.transform_affine().unwrap().as_coeffs(),
        [1.0, 0.0, 0.0, 1.0, 4.0, 8.0]
    );
}

#[test]
fn record_level_entry_point() {
    let project = Project::from_json_str(
        r#"{"templates": [{
            "id": "t",
            "elements": [{"id": "box"}],
            "animations": [{"id": "a", "element_id": "box", "phase": "in", "duration_ms": 500, "easing": "linear"}],
            "keyframes": [
                {"animation_id": "a", "position": 0, "properties": {"opacity": 0}},
                {"animation_id": "a", "position": 1, "properties": {"opacity": 1}}
            ]
        }]}"#,
    )
    .unwrap();
    let t = &project.templates[0];
    let mut by_anim: HashMap<AnimationId, Vec<Keyframe>> = HashMap::new();
    for k in &t.keyframes {
        by_anim.entry(k.animation_id.clone()).or_default().push(k.clone());
    }

    let q = EvalQuery::live(Phase::In, 250.0, 3000.0);
    let out = get_animated_properties(&t.elements[0], &t.animations, &by_anim, &q);
    assert_eq!(out["opacity"], PropertyValue::Number(0.5));

    let none = get_animated_properties(
        &t.elements[0],
        &t.animations,
        &by_anim,
        &EvalQuery::live(Phase::Out, 250.0, 3000.0),
    );
    assert!(none.is_empty());

    // Invalid records fail open.
    let mut broken = by_anim.clone();
    broken.get_mut(&AnimationId::from("a")).unwrap()[0].position = 2.0;
    assert!(get_animated_properties(&t.elements[0], &t.animations, &broken, &q).is_empty());
}

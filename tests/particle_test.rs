mod common;

use crate::common::test_utils::{RecordingListener, codes, compiler, obj, prop};
use flow_script::{CompileErrorCode, ObjectNode, ScriptCompiler, ScriptCompilerEvent};

fn compile(system: ObjectNode) -> ScriptCompiler {
    let mut compiler = compiler();
    compiler.compile(vec![system.into()], "Particles");
    compiler
}

#[test]
fn smoke_system() {
    let system = obj("particle_system", "Smoke")
        .with_child(prop("material", "SmokePuff"))
        .with_child(prop("quota", "500"))
        .with_child(prop("particle_width", "35"))
        .with_child(prop("particle_height", "35.5"))
        .with_child(prop("cull_each", "true"))
        .with_child(prop("sorted", "yes"))
        .with_child(prop("billboard_type", "oriented_self"))
        .with_child(
            obj("emitter", "Point")
                .with_child(prop("angle", "11"))
                .with_child(prop("emission_rate", "15"))
                .with_child(prop("direction", "0 1 0"))
                .with_child(prop("colour_range_start", "1 1 1 0.5")),
        )
        .with_child(obj("affector", "ColourFader").with_child(prop("alpha", "-0.05")))
        .with_child(obj("affector", "Rotator").with_child(prop("rotation_speed_range_end", "360")));
    let compiler = compile(system);
    assert!(compiler.errors().is_empty());

    let smoke = compiler.resources().particle_system("Smoke").unwrap();
    assert_eq!(smoke.group, "Particles");
    assert_eq!(smoke.origin, "test.material");
    assert_eq!(smoke.material_name, "SmokePuff");
    assert_eq!(smoke.quota, 500);
    assert_eq!(smoke.default_width, 35.0);
    assert_eq!(smoke.default_height, 35.5);
    assert!(smoke.cull_individually);
    assert!(smoke.sorted);
    assert!(!smoke.local_space);
    assert_eq!(smoke.renderer, "billboard");
    assert_eq!(smoke.renderer_parameters["billboard_type"], "oriented_self");

    assert_eq!(smoke.emitters.len(), 1);
    let emitter = &smoke.emitters[0];
    assert_eq!(emitter.kind, "Point");
    assert_eq!(emitter.parameter("angle"), Some("11"));
    assert_eq!(emitter.parameter("direction"), Some("0 1 0"));
    assert_eq!(emitter.parameter("colour_range_start"), Some("1 1 1 0.5"));
    assert_eq!(emitter.parameter("velocity"), None);

    let kinds: Vec<&str> = smoke.affectors.iter().map(|a| a.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ColourFader", "Rotator"]);
    assert_eq!(smoke.affectors[0].parameter("alpha"), Some("-0.05"));
    assert_eq!(smoke.affectors[1].parameter("rotation_speed_range_end"), Some("360"));
}

#[test]
fn defaults() {
    let compiler = compile(obj("particle_system", "Empty"));
    let empty = compiler.resources().particle_system("Empty").unwrap();
    assert_eq!(empty.quota, 10);
    assert_eq!(empty.default_width, 100.0);
    assert_eq!(empty.default_height, 100.0);
    assert_eq!(empty.renderer, "billboard");
    assert!(empty.material_name.is_empty());
    assert!(empty.emitters.is_empty());
    assert!(empty.affectors.is_empty());
}

#[test]
fn emitter_attributes_depend_on_type() {
    let system = obj("particle_system", "Rain")
        .with_child(
            obj("emitter", "Box")
                .with_child(prop("width", "200"))
                .with_child(prop("depth", "50"))
                .with_child(prop("inner_width", "0.5")),
        )
        .with_child(
            obj("emitter", "Ring")
                .with_child(prop("width", "10"))
                .with_child(prop("inner_width", "0.5")),
        )
        .with_child(obj("emitter", "Point").with_child(prop("width", "10")));
    let compiler = compile(system);

    assert_eq!(
        codes(&compiler),
        vec![CompileErrorCode::InvalidParameters, CompileErrorCode::InvalidParameters]
    );
    assert_eq!(compiler.errors()[0].message, "Box emitter has no attribute inner_width");
    assert_eq!(compiler.errors()[1].message, "Point emitter has no attribute width");

    let rain = compiler.resources().particle_system("Rain").unwrap();
    assert_eq!(rain.emitters.len(), 3);
    assert_eq!(rain.emitters[0].parameter("width"), Some("200"));
    assert_eq!(rain.emitters[0].parameter("inner_width"), None);
    assert_eq!(rain.emitters[1].parameter("inner_width"), Some("0.5"));
}

#[test]
fn emitter_type_from_value() {
    let system = obj("particle_system", "Sparks")
        .with_child(obj("emitter", "Left").with_value("Cylinder").with_child(prop("height", "4")))
        .with_child(obj("emitter", ""));
    let compiler = compile(system);

    assert_eq!(codes(&compiler), vec![CompileErrorCode::StringExpected]);
    assert_eq!(compiler.errors()[0].message, "emitter requires a type");
    let sparks = compiler.resources().particle_system("Sparks").unwrap();
    assert_eq!(sparks.emitters.len(), 1);
    assert_eq!(sparks.emitters[0].kind, "Cylinder");
    assert_eq!(sparks.emitters[0].parameter("height"), Some("4"));
}

#[test]
fn renderer_switch_drops_billboard_attributes() {
    let system = obj("particle_system", "Ribbons")
        .with_child(prop("billboard_type", "point"))
        .with_child(prop("renderer", "ribbon"))
        .with_child(prop("billboard_origin", "center"));
    let compiler = compile(system);

    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
    let ribbons = compiler.resources().particle_system("Ribbons").unwrap();
    assert_eq!(ribbons.renderer, "ribbon");
    assert!(ribbons.renderer_parameters.is_empty());
}

#[test]
fn system_errors() {
    let system = obj("particle_system", "Broken")
        .with_child(prop("quota", "lots"))
        .with_child(prop("sorted", "maybe"))
        .with_child(prop("gravity", "9.81"))
        .with_child(prop("material", "A B"))
        .with_child(obj("affector", ""))
        .with_child(obj("spawner", "Point"));
    let mut compiler = compiler();
    let script = vec![system.into(), obj("particle_system", "").into()];
    assert!(!compiler.compile(script, "General"));

    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::FewerParametersExpected,
            CompileErrorCode::StringExpected,
            CompileErrorCode::UnexpectedToken,
            CompileErrorCode::ObjectNameExpected,
        ]
    );
    assert_eq!(
        compiler.errors()[0].message,
        "invalid value \"lots\" for particle system attribute quota"
    );
    assert_eq!(
        compiler.errors()[1].message,
        "invalid value \"maybe\" for particle system attribute sorted"
    );
    assert_eq!(compiler.errors()[2].message, "unknown particle system attribute gravity");
    let broken = compiler.resources().particle_system("Broken").unwrap();
    assert_eq!(broken.quota, 10);
    assert!(broken.affectors.is_empty());
}

#[test]
fn redefinition_is_an_error() {
    let mut compiler = compiler();
    let script = vec![
        obj("particle_system", "Twice").with_child(prop("quota", "1")).into(),
        obj("particle_system", "Twice").with_child(prop("quota", "2")).into(),
    ];
    assert!(!compiler.compile(script, "General"));
    assert_eq!(codes(&compiler), vec![CompileErrorCode::ObjectAllocationError]);
    assert_eq!(compiler.resources().particle_system("Twice").unwrap().quota, 1);
}

#[test]
fn material_name_goes_through_the_listener() {
    let (mut listener, log) = RecordingListener::new();
    listener.renames.insert("Flare".to_string(), "Flare_low".to_string());
    let mut compiler = compiler();
    compiler.set_listener(listener);
    let system = obj("particle_system", "Fire").with_child(prop("material", "Flare"));
    assert!(compiler.compile(vec![system.into()], "General"));

    assert_eq!(compiler.resources().particle_system("Fire").unwrap().material_name, "Flare_low");
    let log = log.borrow();
    assert!(log.events.iter().any(|e| matches!(
        e,
        ScriptCompilerEvent::ProcessResourceName { name, .. } if name == "Flare_low"
    )));
}

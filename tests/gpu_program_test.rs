mod common;

use crate::common::test_utils::{RecordingListener, codes, compiler, limited_compiler, obj, prop};
use flow_script::data_structures::{
    auto_constants::AutoConstantType,
    gpu_params::{
        AutoConstantData, GpuProgramParameters, MAX_CONSTANT_COMPONENTS, MAX_REGISTERS,
        ParameterTarget,
    },
    gpu_program::GpuProgramType,
    material::ProgramSlot,
};
use flow_script::{CompileErrorCode, ObjectNode, ScriptCompiler};

fn program(cls: &str, name: &str, language: &str) -> ObjectNode {
    obj(cls, name).with_value(language)
}

fn defaults(params: &[(&str, &str)]) -> ObjectNode {
    params
        .iter()
        .fold(obj("default_params", ""), |o, (name, atoms)| o.with_child(prop(name, atoms)))
}

/// Compiles a glsl vertex program `P` with the given default parameters.
fn compile_defaults(params: &[(&str, &str)]) -> (ScriptCompiler, GpuProgramParameters) {
    let script = program("vertex_program", "P", "glsl")
        .with_child(prop("source", "p.vert"))
        .with_child(defaults(params));
    let mut compiler = compiler();
    compiler.compile(vec![script.into()], "General");
    let params = compiler.resources().gpu_program("P").unwrap().default_parameters.clone();
    (compiler, params)
}

fn named(name: &str) -> ParameterTarget {
    ParameterTarget::Named(name.to_string())
}

#[test]
fn declaration_properties() {
    let script = program("vertex_program", "Skin", "hlsl")
        .with_child(prop("source", "skin.hlsl"))
        .with_child(prop("includes_skeletal_animation", "true"))
        .with_child(prop("includes_pose_animation", "3"))
        .with_child(prop("uses_vertex_texture_fetch", "yes"))
        .with_child(prop("entry_point", "main_vs"))
        .with_child(prop("target", "vs_3_0"))
        .with_child(prop("preprocessor_defines", "BONES=4 SHADOWS"));
    let mut compiler = compiler();
    assert!(compiler.compile(vec![script.into()], "Characters"));

    let skin = compiler.resources().gpu_program("Skin").unwrap();
    assert_eq!(skin.kind, GpuProgramType::Vertex);
    assert_eq!(skin.language, "hlsl");
    assert_eq!(skin.group, "Characters");
    assert_eq!(skin.source_file, "skin.hlsl");
    assert!(skin.skeletal_animation);
    assert!(!skin.morph_animation);
    assert_eq!(skin.pose_animation, 3);
    assert!(skin.vertex_texture_fetch);
    assert!(skin.supported);
    assert_eq!(skin.custom_parameters["entry_point"], "main_vs");
    assert_eq!(skin.custom_parameters["target"], "vs_3_0");
    assert_eq!(skin.custom_parameters["preprocessor_defines"], "BONES=4 SHADOWS");
}

#[test]
fn declaration_errors() {
    let mut compiler = compiler();
    let script = vec![
        obj("fragment_program", "NoLanguage").into(),
        program("fragment_program", "", "glsl").into(),
        program("fragment_program", "Twice", "glsl").into(),
        program("fragment_program", "Twice", "glsl").into(),
    ];
    assert!(!compiler.compile(script, "General"));
    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::StringExpected,
            CompileErrorCode::ObjectNameExpected,
            CompileErrorCode::ObjectAllocationError,
        ]
    );
    assert!(!compiler.resources().has_gpu_program("NoLanguage"));
    assert!(compiler.resources().has_gpu_program("Twice"));
}

#[test]
fn program_support_follows_capabilities() {
    let script = vec![
        program("vertex_program", "Arb", "asm").with_child(prop("syntax", "arbvp1")).into(),
        program("vertex_program", "Dx", "asm").with_child(prop("syntax", "vs_3_0")).into(),
        program("fragment_program", "Cg", "cg").into(),
        program("fragment_program", "Gl", "glsl").into(),
    ];
    let mut compiler = limited_compiler();
    assert!(!compiler.compile(script, "General"));

    assert_eq!(codes(&compiler), vec![CompileErrorCode::UnsupportedByRenderSystem]);
    assert!(compiler.errors()[0].message.contains("vs_3_0"));
    let resources = compiler.resources();
    assert!(resources.gpu_program("Arb").unwrap().supported);
    assert!(!resources.gpu_program("Dx").unwrap().supported);
    assert!(!resources.gpu_program("Cg").unwrap().supported);
    assert!(resources.gpu_program("Gl").unwrap().supported);
    assert!(resources.is_program_supported("Gl"));
    assert!(!resources.is_program_supported("Missing"));
}

#[test]
fn unified_programs_resolve_through_delegates() {
    let script = vec![
        program("fragment_program", "Lit_cg", "cg").into(),
        program("fragment_program", "Lit_glsl", "glsl").into(),
        program("fragment_program", "Lit", "unified")
            .with_child(prop("delegate", "Lit_cg"))
            .with_child(prop("delegate", "Lit_glsl"))
            .into(),
        program("fragment_program", "Exotic", "unified")
            .with_child(prop("delegate", "Lit_cg"))
            .into(),
    ];
    let mut compiler = limited_compiler();
    compiler.compile(script, "General");

    let resources = compiler.resources();
    let lit = resources.gpu_program("Lit").unwrap();
    assert_eq!(lit.delegates, vec!["Lit_cg".to_string(), "Lit_glsl".to_string()]);
    assert!(lit.supported);
    assert!(resources.is_program_supported("Lit"));
    assert!(!resources.is_program_supported("Exotic"));
}

#[test]
fn named_and_indexed_parameters() {
    let (compiler, params) = compile_defaults(&[
        ("param_named", "tint float4 1 0.5 0.25 1"),
        ("param_named", "scale float 2"),
        ("param_named", "counts int2 3 4"),
        ("param_indexed", "2 float3 7 8 9"),
        ("param_named", "world matrix4x4 1 0 0 5 0 1 0 6 0 0 1 7 0 0 0 1"),
    ]);
    assert!(compiler.errors().is_empty());

    assert_eq!(params.named_floats("tint"), Some(&[1.0, 0.5, 0.25, 1.0][..]));
    assert_eq!(params.named_floats("scale"), Some(&[2.0][..]));
    assert_eq!(params.named_ints("counts"), Some(&[3, 4][..]));
    assert_eq!(params.named_floats("counts"), None);
    // indexed values are padded to a whole register
    assert_eq!(params.register_floats(2), Some(&[7.0, 8.0, 9.0, 0.0][..]));
    assert_eq!(params.register_floats(3), None);
    assert_eq!(
        params.named_floats("world"),
        Some(&[1.0, 0.0, 0.0, 5.0, 0.0, 1.0, 0.0, 6.0, 0.0, 0.0, 1.0, 7.0, 0.0, 0.0, 0.0, 1.0][..])
    );
    assert_eq!(params.named_constant("world").unwrap().element_size, 16);
}

#[test]
fn indexed_matrices_span_four_registers() {
    let (_, params) = compile_defaults(
        &[("param_indexed", "4 matrix4x4 1 0 0 5 0 1 0 6 0 0 1 7 0 0 0 1")],
    );
    assert_eq!(params.register_floats(4), Some(&[1.0, 0.0, 0.0, 5.0][..]));
    assert_eq!(params.register_floats(7), Some(&[0.0, 0.0, 0.0, 1.0][..]));
}

#[test]
fn parameter_errors() {
    let (compiler, params) = compile_defaults(&[
        ("param_named", "tint float4"),
        ("param_named", "tint vec4 1 2 3 4"),
        ("param_named", "tint float4 one two"),
        ("param_indexed", "first float4 1 2 3 4"),
        ("param_named", "bad matrix4x4 1 2 3"),
        ("source", "defaults.glsl"),
    ]);
    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::UnexpectedToken,
        ]
    );
    assert!(params.named_constant("tint").is_none());
}

#[test]
fn parameter_sizes_and_registers_are_bounded() {
    let (compiler, params) = compile_defaults(&[
        ("param_indexed", "4095 float4 1 2 3 4"),
        ("param_indexed", "4000000000 float4 1 2 3 4"),
        ("param_indexed", "4095 float8 1"),
        ("param_indexed_auto", "4000000000 world_matrix"),
        ("param_named", "huge float4000000000 1"),
        ("param_named", "wide float16385 1"),
    ]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters; 5]);
    assert_eq!(
        compiler.errors()[0].message,
        format!("register 4000000000 is out of range, only {MAX_REGISTERS} registers are available")
    );
    assert_eq!(
        compiler.errors()[3].message,
        format!("float4000000000 exceeds the limit of {MAX_CONSTANT_COMPONENTS} components")
    );
    assert_eq!(params.register_floats(MAX_REGISTERS - 1), Some(&[1.0, 2.0, 3.0, 4.0][..]));
    assert!(params.named_constant("huge").is_none());
    assert!(params.named_constant("wide").is_none());
}

#[test]
fn auto_constants() {
    let (compiler, params) = compile_defaults(&[
        ("param_named_auto", "wvp worldviewproj_matrix"),
        ("param_named_auto", "t time"),
        ("param_named_auto", "half_time time 0.5"),
        ("param_named_auto", "shadow texture_viewproj_matrix"),
        ("param_named_auto", "light1 light_diffuse_colour 1"),
        ("param_indexed_auto", "8 custom 3 2"),
    ]);
    assert!(compiler.errors().is_empty());

    let wvp = params.find_auto_constant(&named("wvp")).unwrap();
    assert_eq!(wvp.kind, AutoConstantType::WorldViewProjMatrix);
    assert_eq!(wvp.data, AutoConstantData::None);
    assert_eq!(wvp.element_count, 16);
    assert_eq!(params.named_constant("wvp").unwrap().len(), 16);

    assert_eq!(params.find_auto_constant(&named("t")).unwrap().data, AutoConstantData::Real(1.0));
    assert_eq!(
        params.find_auto_constant(&named("half_time")).unwrap().data,
        AutoConstantData::Real(0.5)
    );
    assert_eq!(params.find_auto_constant(&named("shadow")).unwrap().data, AutoConstantData::Int(0));
    assert_eq!(params.find_auto_constant(&named("light1")).unwrap().data, AutoConstantData::Int(1));

    let custom = params.find_auto_constant(&ParameterTarget::Indexed(8)).unwrap();
    assert_eq!(custom.kind, AutoConstantType::Custom);
    assert_eq!(custom.data, AutoConstantData::Int(3 | (2 << 16)));
    assert_eq!(params.auto_constants().len(), 6);
}

#[test]
fn animation_parametric_counts_per_block() {
    let (_, params) = compile_defaults(&[
        ("param_indexed_auto", "10 animation_parametric"),
        ("param_indexed_auto", "11 animation_parametric"),
        ("param_indexed_auto", "12 animation_parametric 7"),
    ]);
    let data: Vec<AutoConstantData> = (10..13)
        .map(|i| params.find_auto_constant(&ParameterTarget::Indexed(i)).unwrap().data)
        .collect();
    assert_eq!(
        data,
        vec![AutoConstantData::Int(0), AutoConstantData::Int(1), AutoConstantData::Int(2)]
    );
}

#[test]
fn auto_constant_errors() {
    let (compiler, params) = compile_defaults(&[
        ("param_named_auto", "wvp"),
        ("param_named_auto", "wvp worldview_magic"),
        ("param_named_auto", "light light_diffuse_colour"),
        ("param_named_auto", "t time fast"),
    ]);
    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::NumberExpected,
            CompileErrorCode::InvalidParameters,
        ]
    );
    assert_eq!(compiler.errors()[1].message, "auto constant worldview_magic is not recognized");
    assert_eq!(
        compiler.errors()[2].message,
        "extra parameters required by constant definition light_diffuse_colour"
    );
    assert!(params.auto_constants().is_empty());
}

#[test]
fn explicit_values_replace_auto_bindings() {
    let (_, params) = compile_defaults(&[
        ("param_named_auto", "scale time"),
        ("param_named", "scale float 3"),
    ]);
    assert!(params.find_auto_constant(&named("scale")).is_none());
    assert_eq!(params.named_floats("scale"), Some(&[3.0][..]));
}

#[test]
fn shared_parameter_sets() {
    let shared = obj("shared_params", "Lighting")
        .with_child(prop("shared_param_named", "sun_dir float3 0 -1 0"))
        .with_child(prop("shared_param_named", "lights int 4"))
        .with_child(prop("shared_param_named", "bones float4 [2]"));
    let script = vec![
        shared.into(),
        program("vertex_program", "P", "glsl")
            .with_child(defaults(&[("shared_params_ref", "Lighting")]))
            .into(),
    ];
    let mut compiler = compiler();
    assert!(compiler.compile(script, "General"));

    let set = compiler.resources().shared_parameters("Lighting").unwrap();
    assert_eq!(set.floats("sun_dir"), Some(&[0.0, -1.0, 0.0][..]));
    assert_eq!(set.ints("lights"), Some(&[4][..]));
    assert_eq!(set.floats("bones"), Some(&[0.0; 8][..]));

    let params = &compiler.resources().gpu_program("P").unwrap().default_parameters;
    assert!(params.is_using_shared_parameters("Lighting"));
    assert_eq!(params.shared_parameter_sets(), &["Lighting".to_string()]);
    assert_eq!(params.named_floats("sun_dir"), Some(&[0.0, -1.0, 0.0][..]));
    assert_eq!(params.named_ints("lights"), Some(&[4][..]));
}

#[test]
fn shared_parameter_errors() {
    let shared = obj("shared_params", "Broken")
        .with_child(prop("shared_param_named", "a"))
        .with_child(prop("shared_param_named", "b half4 1"))
        .with_child(prop("shared_param_named", "c float2 [x] 1 2"))
        .with_child(prop("shared_param_named", "d float2 1 2"))
        .with_child(prop("shared_param_named", "d float2 3 4"))
        .with_child(prop("colour", "1 0 0"));
    let script = vec![
        shared.into(),
        program("vertex_program", "P", "glsl")
            .with_child(defaults(&[
                ("shared_params_ref", "Missing"),
                ("shared_params_ref", "Broken Lighting"),
            ]))
            .into(),
    ];
    let mut compiler = compiler();
    compiler.compile(script, "General");

    let mut expected = vec![CompileErrorCode::InvalidParameters; 4];
    expected.push(CompileErrorCode::UnexpectedToken);
    expected.extend([CompileErrorCode::InvalidParameters; 2]);
    assert_eq!(codes(&compiler), expected);
    assert_eq!(compiler.errors()[5].message, "shared parameter set Missing does not exist");
    assert_eq!(
        compiler.resources().shared_parameters("Broken").unwrap().floats("d"),
        Some(&[1.0, 2.0][..])
    );
}

#[test]
fn shared_parameter_sizes_are_bounded() {
    let shared = obj("shared_params", "Huge")
        .with_child(prop("shared_param_named", "overflow float4 [18446744073709551615]"))
        .with_child(prop("shared_param_named", "big float4 [100000]"))
        .with_child(prop("shared_param_named", "pair float2 1 2 3"))
        .with_child(prop("shared_param_named", "fits float4 [4096]"));
    let mut compiler = compiler();
    compiler.compile(vec![shared.into()], "General");

    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::FewerParametersExpected,
        ]
    );
    assert_eq!(compiler.errors()[2].message, "pair holds 2 values, 3 given");
    let set = compiler.resources().shared_parameters("Huge").unwrap();
    assert_eq!(set.floats("overflow"), None);
    assert_eq!(set.floats("big"), None);
    assert_eq!(set.floats("pair"), Some(&[0.0, 0.0][..]));
    assert_eq!(set.floats("fits").map(<[f32]>::len), Some(MAX_CONSTANT_COMPONENTS));
}

fn pass_with(material: &str, reference: ObjectNode) -> ObjectNode {
    obj("material", material).with_child(
        obj("technique", "").with_child(obj("pass", "").with_child(reference)),
    )
}

#[test]
fn pass_program_references() {
    let script = vec![
        program("vertex_program", "Vs", "glsl")
            .with_child(defaults(&[("param_named", "scale float 1")]))
            .into(),
        pass_with(
            "M",
            obj("vertex_program_ref", "Vs")
                .with_child(prop("param_named", "tint float4 1 0 0 1"))
                .with_child(prop("param_named_auto", "wvp worldviewproj_matrix")),
        )
        .into(),
    ];
    let mut compiler = compiler();
    assert!(compiler.compile(script, "General"));

    let pass = &compiler.resources().material("M").unwrap().techniques[0].passes[0];
    let usage = pass.program(ProgramSlot::Vertex).unwrap();
    assert_eq!(usage.program_name, "Vs");
    assert_eq!(usage.kind, GpuProgramType::Vertex);
    // starts from the program defaults
    assert_eq!(usage.parameters.named_floats("scale"), Some(&[1.0][..]));
    assert_eq!(usage.parameters.named_floats("tint"), Some(&[1.0, 0.0, 0.0, 1.0][..]));
    assert!(usage.parameters.find_auto_constant(&named("wvp")).is_some());
    assert!(pass.program(ProgramSlot::Fragment).is_none());
    // the declaration keeps its own defaults
    let declared = &compiler.resources().gpu_program("Vs").unwrap().default_parameters;
    assert!(declared.named_constant("tint").is_none());
}

#[test]
fn pass_program_reference_errors() {
    let script = vec![
        program("vertex_program", "Vs", "glsl").into(),
        pass_with("A", obj("fragment_program_ref", "Vs")).into(),
        pass_with("B", obj("vertex_program_ref", "Ghost")).into(),
    ];
    let mut compiler = compiler();
    assert!(!compiler.compile(script, "General"));

    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::ReferenceToaNonExistingObject,
        ]
    );
    assert_eq!(compiler.errors()[1].message, "Ghost");
    let pass = &compiler.resources().material("A").unwrap().techniques[0].passes[0];
    assert!(pass.program(ProgramSlot::Fragment).is_none());
}

#[test]
fn unsupported_programs_skip_parameters() {
    let script = vec![
        program("vertex_program", "Cg", "cg").into(),
        pass_with(
            "M",
            obj("vertex_program_ref", "Cg").with_child(prop("param_named", "tint float4 1 0 0 1")),
        )
        .into(),
    ];
    let mut compiler = limited_compiler();
    assert!(compiler.compile(script, "General"));

    let pass = &compiler.resources().material("M").unwrap().techniques[0].passes[0];
    let usage = pass.program(ProgramSlot::Vertex).unwrap();
    assert!(usage.parameters.named_constant("tint").is_none());
}

#[test]
fn program_references_are_renamed_by_the_listener() {
    let (mut listener, _log) = RecordingListener::new();
    listener.renames.insert("Vs".to_string(), "Vs_v2".to_string());
    let script = vec![
        program("vertex_program", "Vs_v2", "glsl").into(),
        pass_with("M", obj("vertex_program_ref", "Vs")).into(),
    ];
    let mut compiler = compiler();
    compiler.set_listener(listener);
    assert!(compiler.compile(script, "General"));

    let pass = &compiler.resources().material("M").unwrap().techniques[0].passes[0];
    assert_eq!(pass.program(ProgramSlot::Vertex).unwrap().program_name, "Vs_v2");
}

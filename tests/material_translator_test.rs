mod common;

use crate::common::test_utils::{RecordingListener, codes, compiler, obj, prop};
use flow_script::data_structures::{
    colour::ColourValue,
    material::{
        CompareFunction, CullingMode, FogMode, IlluminationStage, LightType, LodStrategy,
        ManualCullingMode, Pass, PolygonMode, SceneBlendFactor, SceneBlendOperation, ShadeOptions,
        TrackVertexColour,
    },
    texture_unit::{
        BindingType, ContentType, EnvMapType, FilterOptions, LayerBlendOperationEx,
        LayerBlendSource, MAX_ANIMATION_FRAMES, PixelFormat, TextureAddressingMode, TextureEffect,
        TextureMipmaps, TextureTransformType, TextureType, TextureUnitState, WaveformType,
    },
};
use flow_script::script::translators::values::{get_colour, get_int, get_uint};
use flow_script::{
    AbstractNode, CompileErrorCode, PropertyNode, ScriptCompiler, ScriptCompilerEvent,
};

/// Compiles `material M { technique { pass { <props> } } }`.
fn compile_pass(props: Vec<PropertyNode>) -> (ScriptCompiler, Pass) {
    let mut pass = obj("pass", "");
    for p in props {
        pass = pass.with_child(p);
    }
    let material = obj("material", "M").with_child(obj("technique", "").with_child(pass));
    let mut compiler = compiler();
    compiler.compile(vec![material.into()], "General");
    let pass = compiler.resources().material("M").unwrap().techniques[0].passes[0].clone();
    (compiler, pass)
}

/// Compiles a single texture unit and returns it.
fn compile_unit(props: Vec<PropertyNode>) -> (ScriptCompiler, TextureUnitState) {
    let mut unit = obj("texture_unit", "");
    for p in props {
        unit = unit.with_child(p);
    }
    let material = obj("material", "M")
        .with_child(obj("technique", "").with_child(obj("pass", "").with_child(unit)));
    let mut compiler = compiler();
    compiler.compile(vec![material.into()], "General");
    let unit = compiler.resources().material("M").unwrap().techniques[0].passes[0]
        .texture_units[0]
        .clone();
    (compiler, unit)
}

#[test]
fn material_properties() {
    let script = obj("material", "Lod")
        .with_child(prop("lod_strategy", "pixel_count"))
        .with_child(prop("lod_values", "1000 500.5 10"))
        .with_child(prop("receive_shadows", "no"))
        .with_child(prop("transparency_casts_shadows", "true"));
    let mut compiler = compiler();
    assert!(compiler.compile(vec![script.into()], "General"));

    let material = compiler.resources().material("Lod").unwrap();
    assert_eq!(material.lod_strategy, LodStrategy::PixelCount);
    assert_eq!(material.lod_values, vec![1000.0, 500.5, 10.0]);
    assert!(!material.receive_shadows);
    assert!(material.transparency_casts_shadows);
}

#[test]
fn lod_distances_force_the_distance_strategy() {
    let script = obj("material", "Far")
        .with_child(prop("lod_strategy", "pixel_count"))
        .with_child(prop("lod_distances", "50 100"));
    let mut compiler = compiler();
    assert!(compiler.compile(vec![script.into()], "General"));

    let material = compiler.resources().material("Far").unwrap();
    assert_eq!(material.lod_strategy, LodStrategy::Distance);
    assert_eq!(material.lod_values, vec![50.0, 100.0]);
}

#[test]
fn material_errors() {
    let script = obj("material", "Bad")
        .with_child(prop("lod_values", "10 far"))
        .with_child(prop("receive_shadows", ""))
        .with_child(prop("receive_shadows", "on off"))
        .with_child(prop("receive_shadows", "maybe"))
        .with_child(prop("flavour", "sweet"));
    let mut compiler = compiler();
    assert!(!compiler.compile(vec![script.into()], "General"));

    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::StringExpected,
            CompileErrorCode::FewerParametersExpected,
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::UnexpectedToken,
        ]
    );
    assert_eq!(compiler.errors()[1].message, "receive_shadows must have at least 1 argument");
    assert_eq!(compiler.errors()[2].message, "receive_shadows must have at most 1 argument");
    assert_eq!(compiler.errors()[4].message, "token \"flavour\" is not recognized");
}

#[test]
fn redefining_a_material_is_an_allocation_error() {
    let mut compiler = compiler();
    let nodes = vec![obj("material", "Twice").into(), obj("material", "Twice").into()];
    assert!(!compiler.compile(nodes, "General"));
    assert_eq!(codes(&compiler), vec![CompileErrorCode::ObjectAllocationError]);
}

#[test]
fn technique_properties() {
    let technique = obj("technique", "hq")
        .with_child(prop("scheme", "HighQuality"))
        .with_child(prop("lod_index", "2"))
        .with_child(prop("shadow_caster_material", "Caster"))
        .with_child(prop("shadow_receiver_material", "Receiver"))
        .with_child(prop("gpu_vendor_rule", "include nvidia"))
        .with_child(prop("gpu_vendor_rule", "exclude nvidia"))
        .with_child(prop("gpu_device_rule", "exclude *880* true"));
    let mut compiler = compiler();
    let (mut listener, log) = RecordingListener::new();
    listener.renames.insert("Caster".to_string(), "CasterV2".to_string());
    compiler.set_listener(listener);

    assert!(compiler.compile(vec![obj("material", "T").with_child(technique).into()], "General"));

    let material = compiler.resources().material("T").unwrap();
    let technique = &material.techniques[0];
    assert_eq!(technique.name, "hq");
    assert_eq!(technique.scheme, "HighQuality");
    assert_eq!(technique.lod_index, 2);
    assert_eq!(technique.shadow_caster_material.as_deref(), Some("CasterV2"));
    assert_eq!(technique.shadow_receiver_material.as_deref(), Some("Receiver"));
    assert_eq!(technique.vendor_rules.len(), 1);
    assert!(!technique.vendor_rules[0].include);
    assert_eq!(technique.device_rules[0].pattern, "*880*");
    assert!(technique.device_rules[0].case_sensitive);
    assert_eq!(material.techniques_for_scheme("HighQuality").count(), 1);
    assert_eq!(material.techniques_for_scheme("Default").count(), 0);

    let log = log.borrow();
    assert!(log.events.iter().any(|e| matches!(
        e,
        ScriptCompilerEvent::ProcessResourceName { name, .. } if name == "CasterV2"
    )));
}

#[test]
fn technique_rule_errors() {
    let technique = obj("technique", "")
        .with_child(prop("gpu_vendor_rule", "maybe ati"))
        .with_child(prop("gpu_device_rule", "include"))
        .with_child(prop("lod_index", "-1"));
    let mut compiler = compiler();
    assert!(!compiler.compile(vec![obj("material", "T").with_child(technique).into()], "General"));
    assert_eq!(
        codes(&compiler),
        vec![
            CompileErrorCode::InvalidParameters,
            CompileErrorCode::StringExpected,
            CompileErrorCode::InvalidParameters,
        ]
    );
}

#[test]
fn pass_defaults() {
    let (compiler, pass) = compile_pass(vec![]);
    assert!(compiler.errors().is_empty());
    assert_eq!(pass.ambient, ColourValue::WHITE);
    assert_eq!(pass.diffuse, ColourValue::WHITE);
    assert_eq!(pass.specular, ColourValue::BLACK);
    assert!(pass.depth_check);
    assert!(pass.depth_write);
    assert_eq!(pass.depth_function, CompareFunction::LessEqual);
    assert_eq!(pass.culling_mode, CullingMode::Clockwise);
    assert_eq!(pass.manual_culling_mode, ManualCullingMode::Back);
    assert_eq!(pass.max_lights, 8);
    assert_eq!(pass.iteration.count, 1);
    assert!(!pass.is_transparent());
}

#[test]
fn pass_colours_and_vertex_tracking() {
    let (compiler, pass) = compile_pass(vec![
        prop("ambient", "0.5 0.5 0.5"),
        prop("diffuse", "vertexcolour"),
        prop("emissive", "0.1 0.2 0.3 0.4"),
        prop("specular", "1 1 1 1 64"),
    ]);
    assert!(compiler.errors().is_empty());
    assert_eq!(pass.ambient, ColourValue::new(0.5, 0.5, 0.5, 1.0));
    assert_eq!(pass.diffuse, ColourValue::WHITE);
    assert!(pass.tracking.contains(TrackVertexColour::DIFFUSE));
    assert!(!pass.tracking.contains(TrackVertexColour::AMBIENT));
    assert_eq!(pass.emissive, ColourValue::new(0.1, 0.2, 0.3, 0.4));
    assert_eq!(pass.specular, ColourValue::WHITE);
    assert_eq!(pass.shininess, 64.0);
}

#[test]
fn specular_short_forms() {
    let (_, pass) = compile_pass(vec![prop("specular", "0.5 0.5 0.5 12")]);
    assert_eq!(pass.specular, ColourValue::new(0.5, 0.5, 0.5, 1.0));
    assert_eq!(pass.shininess, 12.0);

    let (_, pass) = compile_pass(vec![prop("specular", "vertexcolour 20")]);
    assert!(pass.tracking.contains(TrackVertexColour::SPECULAR));
    assert_eq!(pass.shininess, 20.0);

    let (compiler, _) = compile_pass(vec![prop("specular", "1 1 1")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);

    let (compiler, _) = compile_pass(vec![prop("specular", "1 1 1 1 1 1")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::FewerParametersExpected]);
}

#[test]
fn scene_blending() {
    let (_, pass) = compile_pass(vec![prop("scene_blend", "alpha_blend")]);
    assert_eq!(pass.source_blend_factor, SceneBlendFactor::SourceAlpha);
    assert_eq!(pass.dest_blend_factor, SceneBlendFactor::OneMinusSourceAlpha);
    assert!(pass.is_transparent());

    let (_, pass) = compile_pass(vec![prop("scene_blend", "one one")]);
    assert_eq!(pass.source_blend_factor, SceneBlendFactor::One);
    assert_eq!(pass.dest_blend_factor, SceneBlendFactor::One);

    let (compiler, pass) = compile_pass(vec![
        prop("separate_scene_blend", "one zero src_alpha one_minus_src_alpha"),
        prop("separate_scene_blend_op", "add max"),
    ]);
    assert!(compiler.errors().is_empty());
    assert!(pass.separate_blend);
    assert_eq!(pass.source_blend_factor, SceneBlendFactor::One);
    assert_eq!(pass.dest_blend_factor_alpha, SceneBlendFactor::OneMinusSourceAlpha);
    assert!(pass.separate_blend_operation);
    assert_eq!(pass.alpha_blend_operation, SceneBlendOperation::Max);

    let (_, pass) = compile_pass(vec![prop("scene_blend_op", "reverse_subtract")]);
    assert_eq!(pass.blend_operation, SceneBlendOperation::ReverseSubtract);

    let (compiler, _) = compile_pass(vec![prop("scene_blend", "sideways")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
}

#[test]
fn depth_and_alpha_state() {
    let (compiler, pass) = compile_pass(vec![
        prop("depth_check", "off"),
        prop("depth_write", "off"),
        prop("depth_func", "greater_equal"),
        prop("depth_bias", "2 1.5"),
        prop("iteration_depth_bias", "0.25"),
        prop("alpha_rejection", "greater 128"),
        prop("alpha_to_coverage", "on"),
    ]);
    assert!(compiler.errors().is_empty());
    assert!(!pass.depth_check);
    assert!(!pass.depth_write);
    assert_eq!(pass.depth_function, CompareFunction::GreaterEqual);
    assert_eq!(pass.depth_bias_constant, 2.0);
    assert_eq!(pass.depth_bias_slope_scale, 1.5);
    assert_eq!(pass.depth_bias_per_iteration, 0.25);
    assert_eq!(pass.alpha_reject_function, CompareFunction::Greater);
    assert_eq!(pass.alpha_reject_value, 128);
    assert!(pass.alpha_to_coverage);

    let (compiler, _) = compile_pass(vec![prop("alpha_rejection", "greater 300")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
}

#[test]
fn lighting_and_raster_state() {
    let (compiler, pass) = compile_pass(vec![
        prop("light_scissor", "on"),
        prop("light_clip_planes", "on"),
        prop("transparent_sorting", "force"),
        prop("illumination_stage", "per_light"),
        prop("cull_hardware", "anticlockwise"),
        prop("cull_software", "front"),
        prop("normalise_normals", "on"),
        prop("lighting", "off"),
        prop("shading", "phong"),
        prop("polygon_mode", "wireframe"),
        prop("polygon_mode_overrideable", "off"),
        prop("colour_write", "off"),
        prop("max_lights", "3"),
        prop("start_light", "1"),
    ]);
    assert!(compiler.errors().is_empty());
    assert!(pass.light_scissoring);
    assert!(pass.light_clip_planes);
    assert!(pass.transparent_sorting);
    assert!(pass.transparent_sorting_forced);
    assert_eq!(pass.illumination_stage, IlluminationStage::PerLight);
    assert_eq!(pass.culling_mode, CullingMode::Anticlockwise);
    assert_eq!(pass.manual_culling_mode, ManualCullingMode::Front);
    assert!(pass.normalise_normals);
    assert!(!pass.lighting);
    assert_eq!(pass.shading, ShadeOptions::Phong);
    assert_eq!(pass.polygon_mode, PolygonMode::Wireframe);
    assert!(!pass.polygon_mode_overrideable);
    assert!(!pass.colour_write);
    assert_eq!(pass.max_lights, 3);
    assert_eq!(pass.start_light, 1);
}

#[test]
fn fog_override_reads_optional_values() {
    let (compiler, pass) = compile_pass(
        vec![prop("fog_override", "true exp 0.5 0.6 0.7 0.01 10 200")],
    );
    assert!(compiler.errors().is_empty());
    assert!(pass.fog.override_scene);
    assert_eq!(pass.fog.mode, FogMode::Exp);
    assert_eq!(pass.fog.colour, ColourValue::new(0.5, 0.6, 0.7, 1.0));
    assert_eq!(pass.fog.density, 0.01);
    assert_eq!(pass.fog.start, 10.0);
    assert_eq!(pass.fog.end, 200.0);

    let (_, pass) = compile_pass(vec![prop("fog_override", "true")]);
    assert!(pass.fog.override_scene);
    assert_eq!(pass.fog.density, 0.001);
    assert_eq!(pass.fog.start, 0.0);
    assert_eq!(pass.fog.end, 1.0);
}

#[test]
fn iteration_forms() {
    let (_, pass) = compile_pass(vec![prop("iteration", "once_per_light point")]);
    assert!(pass.iteration.per_light);
    assert_eq!(pass.iteration.only_light_type, Some(LightType::Point));

    let (_, pass) = compile_pass(vec![prop("iteration", "5")]);
    assert_eq!(pass.iteration.count, 5);
    assert!(!pass.iteration.per_light);

    let (_, pass) = compile_pass(vec![prop("iteration", "2 per_light spot")]);
    assert_eq!(pass.iteration.count, 2);
    assert!(pass.iteration.per_light);
    assert_eq!(pass.iteration.only_light_type, Some(LightType::Spotlight));

    let (_, pass) = compile_pass(vec![prop("iteration", "3 per_n_lights 4 directional")]);
    assert_eq!(pass.iteration.count, 3);
    assert_eq!(pass.iteration.lights_per_iteration, 4);
    assert_eq!(pass.iteration.only_light_type, Some(LightType::Directional));

    let (compiler, pass) = compile_pass(vec![prop("iteration", "2 per_light torch")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
    assert_eq!(pass.iteration.count, 1);
}

#[test]
fn point_sprite_settings() {
    let (compiler, pass) = compile_pass(vec![
        prop("point_size", "4"),
        prop("point_sprites", "on"),
        prop("point_size_attenuation", "on 1 0.5 0.25"),
        prop("point_size_min", "1"),
        prop("point_size_max", "64"),
    ]);
    assert!(compiler.errors().is_empty());
    assert_eq!(pass.point_size, 4.0);
    assert!(pass.point_sprites);
    assert!(pass.point_attenuation.enabled);
    assert_eq!(pass.point_attenuation.constant, 1.0);
    assert_eq!(pass.point_attenuation.linear, 0.5);
    assert_eq!(pass.point_attenuation.quadratic, 0.25);
    assert_eq!(pass.point_min_size, 1.0);
    assert_eq!(pass.point_max_size, 64.0);

    let (_, pass) = compile_pass(vec![prop("point_size_attenuation", "on")]);
    assert!(pass.point_attenuation.enabled);
    assert_eq!(pass.point_attenuation.constant, 0.0);
    assert_eq!(pass.point_attenuation.linear, 1.0);
    assert_eq!(pass.point_attenuation.quadratic, 0.0);
}

#[test]
fn texture_unit_texture_options() {
    let (compiler, unit) = compile_unit(vec![prop("texture", "wall.png 3d 4 alpha PF_A8R8G8B8")]);
    assert!(compiler.errors().is_empty());
    assert_eq!(unit.texture_name(), Some("wall.png"));
    assert_eq!(unit.texture_type, TextureType::ThreeD);
    assert_eq!(unit.mipmaps, TextureMipmaps::Count(4));
    assert!(unit.is_alpha);
    assert!(!unit.hardware_gamma);
    assert_eq!(unit.desired_format, PixelFormat::A8R8G8B8);

    let (compiler, unit) = compile_unit(vec![prop("texture", "sky.dds cubic unlimited gamma")]);
    assert!(compiler.errors().is_empty());
    assert_eq!(unit.texture_type, TextureType::CubeMap);
    assert_eq!(unit.mipmaps, TextureMipmaps::Unlimited);
    assert!(unit.hardware_gamma);

    let (compiler, _) = compile_unit(vec![prop("texture", "wall.png shiny")]);
    assert_eq!(compiler.errors()[0].message, "invalid texture option shiny");
}

#[test]
fn animated_and_cubic_textures() {
    let (_, unit) = compile_unit(vec![prop("anim_texture", "flame.png 3 1.5")]);
    assert_eq!(unit.frames, vec!["flame_0.png", "flame_1.png", "flame_2.png"]);
    assert_eq!(unit.animation_duration, 1.5);

    let (_, unit) = compile_unit(vec![prop("anim_texture", "a.png b.png c.png d.png 2")]);
    assert_eq!(unit.frames, vec!["a.png", "b.png", "c.png", "d.png"]);
    assert_eq!(unit.animation_duration, 2.0);

    let (compiler, _) = compile_unit(vec![prop("anim_texture", "a.png 2")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::StringExpected]);

    let (_, unit) = compile_unit(vec![prop("cubic_texture", "sky.jpg separateUV")]);
    assert_eq!(
        unit.frames,
        vec!["sky_fr.jpg", "sky_bk.jpg", "sky_lf.jpg", "sky_rt.jpg", "sky_up.jpg", "sky_dn.jpg"]
    );
    assert!(unit.is_cubic());

    let (_, unit) = compile_unit(vec![prop("cubic_texture", "sky.dds combinedUVW")]);
    assert_eq!(unit.frames, vec!["sky.dds"]);
    assert_eq!(unit.texture_type, TextureType::CubeMap);

    let (compiler, _) = compile_unit(vec![prop("cubic_texture", "a b c separateUV")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
}

#[test]
fn animated_frame_counts_are_bounded() {
    let (compiler, unit) = compile_unit(vec![prop("anim_texture", "flame.png 4000000000 1")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
    assert_eq!(
        compiler.errors()[0].message,
        "4000000000 animation frames given, at most 32 are supported"
    );
    assert!(unit.frames.is_empty());

    let names = |count: usize| {
        let names: Vec<String> = (0..count).map(|i| format!("f{i}.png")).collect();
        format!("{} 1", names.join(" "))
    };
    let (compiler, unit) = compile_unit(vec![prop("anim_texture", &names(MAX_ANIMATION_FRAMES))]);
    assert!(compiler.errors().is_empty());
    assert_eq!(unit.frames.len(), MAX_ANIMATION_FRAMES);

    let (compiler, unit) =
        compile_unit(vec![prop("anim_texture", &names(MAX_ANIMATION_FRAMES + 1))]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
    assert!(unit.frames.is_empty());
}

#[test]
fn sampling_state() {
    let (compiler, unit) = compile_unit(vec![
        prop("tex_coord_set", "1"),
        prop("tex_address_mode", "clamp mirror"),
        prop("tex_border_colour", "1 0 0"),
        prop("filtering", "anisotropic"),
        prop("max_anisotropy", "8"),
        prop("mipmap_bias", "-0.5"),
    ]);
    assert!(compiler.errors().is_empty());
    assert_eq!(unit.tex_coord_set, 1);
    assert_eq!(unit.address_mode.u, TextureAddressingMode::Clamp);
    assert_eq!(unit.address_mode.v, TextureAddressingMode::Mirror);
    assert_eq!(unit.address_mode.w, TextureAddressingMode::Clamp);
    assert_eq!(unit.border_colour, ColourValue::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(unit.min_filter, FilterOptions::Anisotropic);
    assert_eq!(unit.max_anisotropy, 8);
    assert_eq!(unit.mipmap_bias, -0.5);

    let (_, unit) = compile_unit(vec![prop("filtering", "point linear none")]);
    assert_eq!(unit.min_filter, FilterOptions::Point);
    assert_eq!(unit.mag_filter, FilterOptions::Linear);
    assert_eq!(unit.mip_filter, FilterOptions::None);

    let (compiler, _) = compile_unit(vec![prop("filtering", "point linear")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
}

#[test]
fn layer_blending() {
    let (compiler, unit) = compile_unit(vec![
        prop("colour_op_ex", "blend_manual src_manual src_current 0.25 1 0 0"),
        prop("alpha_op_ex", "modulate src_texture src_manual 0.5"),
        prop("colour_op_multipass_fallback", "one one_minus_dest_alpha"),
    ]);
    assert!(compiler.errors().is_empty());
    assert_eq!(unit.colour_blend.operation, LayerBlendOperationEx::BlendManual);
    assert_eq!(unit.colour_blend.source1, LayerBlendSource::Manual);
    assert_eq!(unit.colour_blend.factor, 0.25);
    assert_eq!(unit.colour_blend.colour_arg1, ColourValue::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(unit.alpha_blend.source2, LayerBlendSource::Manual);
    assert_eq!(unit.alpha_blend.alpha_arg2, 0.5);
    assert_eq!(
        unit.colour_blend_fallback,
        (SceneBlendFactor::One, SceneBlendFactor::OneMinusDestAlpha)
    );

    let (_, unit) = compile_unit(vec![prop("colour_op", "add")]);
    assert_eq!(unit.colour_blend.operation, LayerBlendOperationEx::Add);
    assert_eq!(unit.colour_blend_fallback, (SceneBlendFactor::One, SceneBlendFactor::One));

    let (compiler, _) = compile_unit(
        vec![prop("colour_op_ex", "add src_texture src_current 1 2 3")],
    );
    assert_eq!(codes(&compiler), vec![CompileErrorCode::FewerParametersExpected]);
}

#[test]
fn texture_coordinate_effects() {
    let (compiler, unit) = compile_unit(vec![
        prop("env_map", "cubic_reflection"),
        prop("scroll", "0.5 0.25"),
        prop("scroll_anim", "0.1 0"),
        prop("rotate", "90"),
        prop("rotate_anim", "0.5"),
        prop("scale", "2 4"),
        prop("wave_xform", "scale_x sine 1 0.2 0 5"),
    ]);
    assert!(compiler.errors().is_empty());
    assert!(unit.effects.contains(&TextureEffect::EnvironmentMap(EnvMapType::Reflection)));
    assert!(unit.effects.contains(&TextureEffect::UScroll(0.1)));
    assert!(!unit.effects.iter().any(|e| matches!(e, TextureEffect::VScroll(_))));
    assert!(unit.effects.contains(&TextureEffect::Rotate(0.5)));
    assert!(unit.effects.contains(&TextureEffect::Transform {
        transform: TextureTransformType::ScaleU,
        waveform: WaveformType::Sine,
        base: 1.0,
        frequency: 0.2,
        phase: 0.0,
        amplitude: 5.0,
    }));
    assert_eq!(unit.u_scroll, 0.5);
    assert_eq!(unit.v_scale, 4.0);
    assert!((unit.rotation.0 - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

    let (_, unit) = compile_unit(vec![prop("env_map", "spherical"), prop("env_map", "off")]);
    assert!(unit.effects.is_empty());

    let (_, unit) = compile_unit(vec![prop("scroll_anim", "0.3 0.3")]);
    assert_eq!(unit.effects, vec![TextureEffect::UvScroll(0.3)]);

    let (compiler, _) = compile_unit(vec![prop("scroll", "1 2 3")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::FewerParametersExpected]);
}

#[test]
fn explicit_transform_replaces_the_derived_matrix() {
    let (compiler, unit) = compile_unit(
        vec![prop("transform", "1 0 0 0.5 0 1 0 0.25 0 0 1 0 0 0 0 1")],
    );
    assert!(compiler.errors().is_empty());
    let m = unit.texture_matrix();
    // row-major input, translation ends up in the last column
    assert_eq!(m.w.x, 0.5);
    assert_eq!(m.w.y, 0.25);

    let (compiler, _) = compile_unit(vec![prop("transform", "1 0 0 1")]);
    assert_eq!(codes(&compiler), vec![CompileErrorCode::InvalidParameters]);
}

#[test]
fn binding_and_content_type() {
    let (_, unit) = compile_unit(
        vec![prop("binding_type", "vertex"), prop("content_type", "shadow")],
    );
    assert_eq!(unit.binding_type, BindingType::Vertex);
    assert_eq!(unit.content_type, ContentType::Shadow);

    let (compiler, unit) = compile_unit(vec![prop("content_type", "compositor Bloom rt0 1")]);
    assert!(compiler.errors().is_empty());
    assert_eq!(
        unit.content_type,
        ContentType::Compositor {
            compositor: "Bloom".to_string(),
            texture: "rt0".to_string(),
            mrt_index: 1,
        }
    );
}

#[test]
fn texture_source_is_recorded_on_the_unit() {
    let source = obj("texture_source", "")
        .with_value("ogg_video")
        .with_child(prop("filename", "intro.ogg"))
        .with_child(prop("play_mode", "play looped"));
    let unit = obj("texture_unit", "").with_child(source);
    let material = obj("material", "Video")
        .with_child(obj("technique", "").with_child(obj("pass", "").with_child(unit)));
    let mut compiler = compiler();
    assert!(compiler.compile(vec![material.into()], "General"));

    let pass = &compiler.resources().material("Video").unwrap().techniques[0].passes[0];
    let unit = &pass.texture_units[0];
    let source = unit.external_source.as_ref().unwrap();
    assert_eq!(source.plugin, "ogg_video");
    assert_eq!(source.parameters["filename"], "intro.ogg");
    assert_eq!(source.parameters["play_mode"], "play looped");
}

#[test]
fn texture_aliases_are_applied_after_the_listener_sees_them() {
    let unit = |alias: &str| {
        obj("texture_unit", "")
            .with_child(prop("texture_alias", alias))
            .with_child(prop("texture", "default.png"))
    };
    let material = obj("material", "Skinned")
        .with_child(prop("set_texture_alias", "DiffuseMap skin.png"))
        .with_child(
            obj("technique", "").with_child(
                obj("pass", "")
                    .with_child(unit("DiffuseMap"))
                    .with_child(unit("NormalMap"))
                    .with_child(unit("Untouched")),
            ),
        );
    let mut compiler = compiler();
    let (mut listener, log) = RecordingListener::new();
    listener
        .aliases
        .insert("NormalMap".to_string(), "skin_normal.png".to_string());
    compiler.set_listener(listener);

    assert!(compiler.compile(vec![material.into()], "General"));

    let pass = &compiler.resources().material("Skinned").unwrap().techniques[0].passes[0];
    let names: Vec<_> = pass.texture_units.iter().map(|u| u.texture_name().unwrap()).collect();
    assert_eq!(names, vec!["skin.png", "skin_normal.png", "default.png"]);
    assert!(log.borrow().events.iter().any(|e| matches!(
        e,
        ScriptCompilerEvent::PreApplyTextureAliases { material, .. } if material == "Skinned"
    )));
}

#[test]
fn texture_names_go_through_the_listener() {
    let mut compiler = compiler();
    let (mut listener, _log) = RecordingListener::new();
    listener.renames.insert("old.png".to_string(), "new.png".to_string());
    compiler.set_listener(listener);
    let pass = obj("pass", "")
        .with_child(obj("texture_unit", "").with_child(prop("texture", "old.png")))
        .with_child(obj("texture_unit", "").with_child(prop("anim_texture", "old.png b.png 2")))
        .with_child(obj("texture_unit", "").with_child(prop("anim_texture", "old.png 2 1")));
    let material = obj("material", "Renamed").with_child(obj("technique", "").with_child(pass));

    assert!(compiler.compile(vec![material.into()], "General"));
    let pass = &compiler.resources().material("Renamed").unwrap().techniques[0].passes[0];
    assert_eq!(pass.texture_units[0].texture_name(), Some("new.png"));
    assert_eq!(pass.texture_units[1].frames, vec!["new.png", "b.png"]);
    assert_eq!(pass.texture_units[1].animation_duration, 2.0);
    assert_eq!(pass.texture_units[2].frames, vec!["new_0.png", "new_1.png"]);
}

#[test]
fn misplaced_objects_are_unexpected() {
    let material = obj("material", "Odd").with_child(obj("pass", ""));
    let mut compiler = compiler();
    assert!(!compiler.compile(vec![material.into()], "General"));
    assert_eq!(codes(&compiler), vec![CompileErrorCode::UnexpectedToken]);
}

#[test]
fn value_coercion() {
    let atoms = |text: &str| -> Vec<AbstractNode> {
        text.split_whitespace().map(AbstractNode::from).collect()
    };

    assert_eq!(get_int(&"12".into()), Some(12));
    assert_eq!(get_int(&"1.5".into()), None);
    assert_eq!(get_uint(&"-3".into()), None);
    assert_eq!(get_colour(&atoms("0.2 0.4 0.6"), 4), Some(ColourValue::new(0.2, 0.4, 0.6, 1.0)));
    assert_eq!(get_colour(&atoms("0.2 0.4"), 4), None);
    assert_eq!(get_colour(&atoms("0.2 0.4 x"), 4), None);
}

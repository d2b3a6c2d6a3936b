//! The script vocabulary.
//!
//! Every word a translator reacts to has a [`Keyword`]. The compiler tags
//! objects, properties and atoms with their keyword before translation, so
//! translators match on enum variants instead of strings. Several spellings
//! can share one keyword (`on`, `true` and `yes` are all [`Keyword::On`]).

macro_rules! keywords {
    ($($variant:ident => $word:literal $(| $alias:literal)*),* $(,)?) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),*
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant),*];

            pub fn from_word(word: &str) -> Option<Self> {
                match word {
                    $($word $(| $alias)* => Some(Keyword::$variant),)*
                    _ => None,
                }
            }

            /// Canonical spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $word),*
                }
            }
        }
    };
}

keywords! {
    On => "on" | "true" | "yes",
    Off => "off" | "false" | "no",

    // material
    Material => "material",
    LodValues => "lod_values",
    LodDistances => "lod_distances",
    LodStrategy => "lod_strategy",
    ReceiveShadows => "receive_shadows",
    TransparencyCastsShadows => "transparency_casts_shadows",
    SetTextureAlias => "set_texture_alias",

    // gpu programs
    VertexProgram => "vertex_program",
    GeometryProgram => "geometry_program",
    FragmentProgram => "fragment_program",
    Source => "source",
    Syntax => "syntax",
    Delegate => "delegate",
    DefaultParams => "default_params",
    ParamIndexed => "param_indexed",
    ParamNamed => "param_named",
    ParamIndexedAuto => "param_indexed_auto",
    ParamNamedAuto => "param_named_auto",
    IncludesSkeletalAnimation => "includes_skeletal_animation",
    IncludesMorphAnimation => "includes_morph_animation",
    IncludesPoseAnimation => "includes_pose_animation",
    UsesVertexTextureFetch => "uses_vertex_texture_fetch",
    UsesAdjacencyInformation => "uses_adjacency_information",
    SharedParams => "shared_params",
    SharedParamNamed => "shared_param_named",
    SharedParamsRef => "shared_params_ref",

    // technique
    Technique => "technique",
    Scheme => "scheme",
    LodIndex => "lod_index",
    ShadowCasterMaterial => "shadow_caster_material",
    ShadowReceiverMaterial => "shadow_receiver_material",
    GpuVendorRule => "gpu_vendor_rule",
    GpuDeviceRule => "gpu_device_rule",
    Include => "include",
    Exclude => "exclude",

    // pass
    Pass => "pass",
    Ambient => "ambient",
    Diffuse => "diffuse",
    Specular => "specular",
    Emissive => "emissive",
    VertexColour => "vertexcolour" | "vertexcolor",
    SceneBlend => "scene_blend",
    SeparateSceneBlend => "separate_scene_blend",
    SceneBlendOp => "scene_blend_op",
    SeparateSceneBlendOp => "separate_scene_blend_op",
    ColourBlend => "colour_blend" | "color_blend",
    AlphaBlend => "alpha_blend",
    Add => "add",
    Modulate => "modulate",
    Replace => "replace",
    Subtract => "subtract",
    ReverseSubtract => "reverse_subtract",
    Min => "min",
    Max => "max",
    One => "one",
    Zero => "zero",
    DestColour => "dest_colour" | "dest_color",
    SrcColour => "src_colour" | "src_color",
    OneMinusDestColour => "one_minus_dest_colour" | "one_minus_dest_color",
    OneMinusSrcColour => "one_minus_src_colour" | "one_minus_src_color",
    DestAlpha => "dest_alpha",
    SrcAlpha => "src_alpha",
    OneMinusDestAlpha => "one_minus_dest_alpha",
    OneMinusSrcAlpha => "one_minus_src_alpha",
    DepthCheck => "depth_check",
    DepthWrite => "depth_write",
    DepthFunc => "depth_func",
    DepthBias => "depth_bias",
    IterationDepthBias => "iteration_depth_bias",
    AlwaysFail => "always_fail",
    AlwaysPass => "always_pass",
    LessEqual => "less_equal",
    Less => "less",
    Equal => "equal",
    NotEqual => "not_equal",
    GreaterEqual => "greater_equal",
    Greater => "greater",
    AlphaRejection => "alpha_rejection",
    AlphaToCoverage => "alpha_to_coverage",
    LightScissor => "light_scissor",
    LightClipPlanes => "light_clip_planes",
    TransparentSorting => "transparent_sorting",
    Force => "force",
    IlluminationStage => "illumination_stage",
    Decal => "decal",
    CullHardware => "cull_hardware",
    Clockwise => "clockwise",
    Anticlockwise => "anticlockwise",
    CullSoftware => "cull_software",
    Back => "back",
    Front => "front",
    NormaliseNormals => "normalise_normals" | "normalize_normals",
    Lighting => "lighting",
    Shading => "shading",
    Flat => "flat",
    Gouraud => "gouraud",
    Phong => "phong",
    PolygonMode => "polygon_mode",
    Solid => "solid",
    Wireframe => "wireframe",
    Points => "points",
    PolygonModeOverrideable => "polygon_mode_overrideable",
    FogOverride => "fog_override",
    None => "none",
    Linear => "linear",
    Exp => "exp",
    Exp2 => "exp2",
    ColourWrite => "colour_write" | "color_write",
    MaxLights => "max_lights",
    StartLight => "start_light",
    Iteration => "iteration",
    Once => "once",
    OncePerLight => "once_per_light",
    PerLight => "per_light",
    PerNLights => "per_n_lights",
    Point => "point",
    Spot => "spot",
    Directional => "directional",
    PointSize => "point_size",
    PointSprites => "point_sprites",
    PointSizeAttenuation => "point_size_attenuation",
    PointSizeMin => "point_size_min",
    PointSizeMax => "point_size_max",
    VertexProgramRef => "vertex_program_ref",
    GeometryProgramRef => "geometry_program_ref",
    FragmentProgramRef => "fragment_program_ref",
    ShadowCasterVertexProgramRef => "shadow_caster_vertex_program_ref",
    ShadowReceiverVertexProgramRef => "shadow_receiver_vertex_program_ref",
    ShadowReceiverFragmentProgramRef => "shadow_receiver_fragment_program_ref",

    // texture unit
    TextureUnit => "texture_unit",
    TextureAlias => "texture_alias",
    Texture => "texture",
    Tex1d => "1d",
    Tex2d => "2d",
    Tex3d => "3d",
    Cubic => "cubic",
    Unlimited => "unlimited",
    Alpha => "alpha",
    Gamma => "gamma",
    AnimTexture => "anim_texture",
    CubicTexture => "cubic_texture",
    SeparateUv => "separateUV" | "separate_uv",
    CombinedUvw => "combinedUVW" | "combined_uvw",
    TexCoordSet => "tex_coord_set",
    TexAddressMode => "tex_address_mode",
    Wrap => "wrap",
    Clamp => "clamp",
    Border => "border",
    Mirror => "mirror",
    TexBorderColour => "tex_border_colour" | "tex_border_color",
    Filtering => "filtering",
    Bilinear => "bilinear",
    Trilinear => "trilinear",
    Anisotropic => "anisotropic",
    MaxAnisotropy => "max_anisotropy",
    MipmapBias => "mipmap_bias",
    ColourOp => "colour_op" | "color_op",
    ColourOpEx => "colour_op_ex" | "color_op_ex",
    ColourOpMultipassFallback => "colour_op_multipass_fallback" | "color_op_multipass_fallback",
    AlphaOpEx => "alpha_op_ex",
    Source1 => "source1",
    Source2 => "source2",
    ModulateX2 => "modulate_x2",
    ModulateX4 => "modulate_x4",
    AddSigned => "add_signed",
    AddSmooth => "add_smooth",
    BlendDiffuseAlpha => "blend_diffuse_alpha",
    BlendTextureAlpha => "blend_texture_alpha",
    BlendCurrentAlpha => "blend_current_alpha",
    BlendManual => "blend_manual",
    DotProduct => "dotproduct",
    BlendDiffuseColour => "blend_diffuse_colour" | "blend_diffuse_color",
    SrcCurrent => "src_current",
    SrcTexture => "src_texture",
    SrcDiffuse => "src_diffuse",
    SrcSpecular => "src_specular",
    SrcManual => "src_manual",
    EnvMap => "env_map",
    Spherical => "spherical",
    Planar => "planar",
    CubicReflection => "cubic_reflection",
    CubicNormal => "cubic_normal",
    Scroll => "scroll",
    ScrollAnim => "scroll_anim",
    Rotate => "rotate",
    RotateAnim => "rotate_anim",
    Scale => "scale",
    WaveXform => "wave_xform",
    ScrollX => "scroll_x",
    ScrollY => "scroll_y",
    ScaleX => "scale_x",
    ScaleY => "scale_y",
    Sine => "sine",
    Triangle => "triangle",
    Square => "square",
    Sawtooth => "sawtooth",
    InverseSawtooth => "inverse_sawtooth",
    Pwm => "pwm",
    Transform => "transform",
    BindingType => "binding_type",
    Vertex => "vertex",
    Fragment => "fragment",
    ContentType => "content_type",
    Named => "named",
    Shadow => "shadow",
    TextureSource => "texture_source",

    // particles
    ParticleSystem => "particle_system",
    Emitter => "emitter",
    Affector => "affector",

    // compositor
    Compositor => "compositor",
    Target => "target",
    TargetOutput => "target_output",
    Input => "input",
    Previous => "previous",
    TargetWidth => "target_width",
    TargetHeight => "target_height",
    TargetWidthScaled => "target_width_scaled",
    TargetHeightScaled => "target_height_scaled",
    CompositorLogic => "compositor_logic",
    TextureRef => "texture_ref",
    ScopeLocal => "scope_local",
    ScopeChain => "chain_scope",
    ScopeGlobal => "global_scope",
    Pooled => "pooled",
    NoFsaa => "no_fsaa",
    OnlyInitial => "only_initial",
    VisibilityMask => "visibility_mask",
    LodBias => "lod_bias",
    MaterialScheme => "material_scheme",
    Shadows => "shadows",
    Identifier => "identifier",
    FirstRenderQueue => "first_render_queue",
    LastRenderQueue => "last_render_queue",
    QuadNormals => "quad_normals",
    CameraFarCornersViewSpace => "camera_far_corners_view_space",
    CameraFarCornersWorldSpace => "camera_far_corners_world_space",
    Buffers => "buffers",
    Colour => "colour" | "color",
    Depth => "depth",
    Stencil => "stencil",
    ColourValue => "colour_value" | "color_value",
    DepthValue => "depth_value",
    StencilValue => "stencil_value",
    Check => "check",
    CompFunc => "comp_func",
    RefValue => "ref_value",
    Mask => "mask",
    FailOp => "fail_op",
    DepthFailOp => "depth_fail_op",
    PassOp => "pass_op",
    TwoSided => "two_sided",
    Keep => "keep",
    Increment => "increment",
    Decrement => "decrement",
    IncrementWrap => "increment_wrap",
    DecrementWrap => "decrement_wrap",
    Invert => "invert",
}

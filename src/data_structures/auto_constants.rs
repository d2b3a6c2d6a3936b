//! Auto constants: shader parameters the engine fills in every frame.
//!
//! `param_named_auto` and `param_indexed_auto` bind a parameter to one of
//! these by name. The definition table records how many elements the
//! constant occupies and what kind of extra argument it accepts.

use super::gpu_params::ElementType;

/// Engine supplied value bound to a shader parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AutoConstantType {
    WorldMatrix,
    InverseWorldMatrix,
    TransposeWorldMatrix,
    InverseTransposeWorldMatrix,
    WorldMatrixArray3x4,
    WorldMatrixArray,
    ViewMatrix,
    InverseViewMatrix,
    TransposeViewMatrix,
    InverseTransposeViewMatrix,
    ProjectionMatrix,
    InverseProjectionMatrix,
    TransposeProjectionMatrix,
    InverseTransposeProjectionMatrix,
    ViewProjMatrix,
    InverseViewProjMatrix,
    TransposeViewProjMatrix,
    InverseTransposeViewProjMatrix,
    WorldViewMatrix,
    InverseWorldViewMatrix,
    TransposeWorldViewMatrix,
    InverseTransposeWorldViewMatrix,
    WorldViewProjMatrix,
    InverseWorldViewProjMatrix,
    TransposeWorldViewProjMatrix,
    InverseTransposeWorldViewProjMatrix,
    RenderTargetFlipping,
    VertexWinding,
    FogColour,
    FogParams,
    SurfaceAmbientColour,
    SurfaceDiffuseColour,
    SurfaceSpecularColour,
    SurfaceEmissiveColour,
    SurfaceShininess,
    LightCount,
    AmbientLightColour,
    LightDiffuseColour,
    LightSpecularColour,
    LightAttenuation,
    SpotLightParams,
    LightPosition,
    LightPositionObjectSpace,
    LightPositionViewSpace,
    LightDirection,
    LightDirectionObjectSpace,
    LightDirectionViewSpace,
    LightDistanceObjectSpace,
    LightPowerScale,
    LightDiffuseColourPowerScaled,
    LightSpecularColourPowerScaled,
    LightDiffuseColourArray,
    LightSpecularColourArray,
    LightDiffuseColourPowerScaledArray,
    LightSpecularColourPowerScaledArray,
    LightAttenuationArray,
    LightPositionArray,
    LightPositionObjectSpaceArray,
    LightPositionViewSpaceArray,
    LightDirectionArray,
    LightDirectionObjectSpaceArray,
    LightDirectionViewSpaceArray,
    LightDistanceObjectSpaceArray,
    LightPowerScaleArray,
    SpotLightParamsArray,
    DerivedAmbientLightColour,
    DerivedSceneColour,
    DerivedLightDiffuseColour,
    DerivedLightSpecularColour,
    DerivedLightDiffuseColourArray,
    DerivedLightSpecularColourArray,
    LightNumber,
    LightCastsShadows,
    ShadowExtrusionDistance,
    CameraPosition,
    CameraPositionObjectSpace,
    TextureViewProjMatrix,
    TextureViewProjMatrixArray,
    TextureWorldViewProjMatrix,
    TextureWorldViewProjMatrixArray,
    SpotLightViewProjMatrix,
    SpotLightWorldViewProjMatrix,
    Custom,
    Time,
    Time0X,
    CosTime0X,
    SinTime0X,
    TanTime0X,
    Time0XPacked,
    Time01,
    CosTime01,
    SinTime01,
    TanTime01,
    Time01Packed,
    Time02Pi,
    CosTime02Pi,
    SinTime02Pi,
    TanTime02Pi,
    Time02PiPacked,
    FrameTime,
    Fps,
    ViewportWidth,
    ViewportHeight,
    InverseViewportWidth,
    InverseViewportHeight,
    ViewportSize,
    ViewDirection,
    ViewSideVector,
    ViewUpVector,
    Fov,
    NearClipDistance,
    FarClipDistance,
    PassNumber,
    PassIterationNumber,
    AnimationParametric,
    TexelOffsets,
    SceneDepthRange,
    ShadowSceneDepthRange,
    ShadowColour,
    TextureSize,
    InverseTextureSize,
    PackedTextureSize,
    TextureMatrix,
    LodCameraPosition,
    LodCameraPositionObjectSpace,
    LightCustom,
}

/// Kind of extra argument an auto constant takes in scripts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoConstantDataType {
    /// No extra argument.
    None,
    /// An integer such as a light or texture index.
    Int,
    /// A real such as a time scale.
    Real,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoConstantDefinition {
    pub kind: AutoConstantType,
    pub name: &'static str,
    pub element_count: usize,
    pub element_type: ElementType,
    pub data_type: AutoConstantDataType,
}

const fn def(
    kind: AutoConstantType,
    name: &'static str,
    element_count: usize,
    data_type: AutoConstantDataType,
) -> AutoConstantDefinition {
    AutoConstantDefinition {
        kind,
        name,
        element_count,
        element_type: ElementType::Real,
        data_type,
    }
}

use AutoConstantDataType as D;
use AutoConstantType as A;

pub static AUTO_CONSTANT_DEFINITIONS: &[AutoConstantDefinition] = &[
    def(A::WorldMatrix, "world_matrix", 16, D::None),
    def(A::InverseWorldMatrix, "inverse_world_matrix", 16, D::None),
    def(A::TransposeWorldMatrix, "transpose_world_matrix", 16, D::None),
    def(A::InverseTransposeWorldMatrix, "inverse_transpose_world_matrix", 16, D::None),
    def(A::WorldMatrixArray3x4, "world_matrix_array_3x4", 12, D::None),
    def(A::WorldMatrixArray, "world_matrix_array", 16, D::None),
    def(A::ViewMatrix, "view_matrix", 16, D::None),
    def(A::InverseViewMatrix, "inverse_view_matrix", 16, D::None),
    def(A::TransposeViewMatrix, "transpose_view_matrix", 16, D::None),
    def(A::InverseTransposeViewMatrix, "inverse_transpose_view_matrix", 16, D::None),
    def(A::ProjectionMatrix, "projection_matrix", 16, D::None),
    def(A::InverseProjectionMatrix, "inverse_projection_matrix", 16, D::None),
    def(A::TransposeProjectionMatrix, "transpose_projection_matrix", 16, D::None),
    def(A::InverseTransposeProjectionMatrix, "inverse_transpose_projection_matrix", 16, D::None),
    def(A::ViewProjMatrix, "viewproj_matrix", 16, D::None),
    def(A::InverseViewProjMatrix, "inverse_viewproj_matrix", 16, D::None),
    def(A::TransposeViewProjMatrix, "transpose_viewproj_matrix", 16, D::None),
    def(A::InverseTransposeViewProjMatrix, "inverse_transpose_viewproj_matrix", 16, D::None),
    def(A::WorldViewMatrix, "worldview_matrix", 16, D::None),
    def(A::InverseWorldViewMatrix, "inverse_worldview_matrix", 16, D::None),
    def(A::TransposeWorldViewMatrix, "transpose_worldview_matrix", 16, D::None),
    def(A::InverseTransposeWorldViewMatrix, "inverse_transpose_worldview_matrix", 16, D::None),
    def(A::WorldViewProjMatrix, "worldviewproj_matrix", 16, D::None),
    def(A::InverseWorldViewProjMatrix, "inverse_worldviewproj_matrix", 16, D::None),
    def(A::TransposeWorldViewProjMatrix, "transpose_worldviewproj_matrix", 16, D::None),
    def(
        A::InverseTransposeWorldViewProjMatrix,
        "inverse_transpose_worldviewproj_matrix",
        16,
        D::None,
    ),
    def(A::RenderTargetFlipping, "render_target_flipping", 1, D::None),
    def(A::VertexWinding, "vertex_winding", 1, D::None),
    def(A::FogColour, "fog_colour", 4, D::None),
    def(A::FogParams, "fog_params", 4, D::None),
    def(A::SurfaceAmbientColour, "surface_ambient_colour", 4, D::None),
    def(A::SurfaceDiffuseColour, "surface_diffuse_colour", 4, D::None),
    def(A::SurfaceSpecularColour, "surface_specular_colour", 4, D::None),
    def(A::SurfaceEmissiveColour, "surface_emissive_colour", 4, D::None),
    def(A::SurfaceShininess, "surface_shininess", 1, D::None),
    def(A::LightCount, "light_count", 1, D::None),
    def(A::AmbientLightColour, "ambient_light_colour", 4, D::None),
    def(A::LightDiffuseColour, "light_diffuse_colour", 4, D::Int),
    def(A::LightSpecularColour, "light_specular_colour", 4, D::Int),
    def(A::LightAttenuation, "light_attenuation", 4, D::Int),
    def(A::SpotLightParams, "spotlight_params", 4, D::Int),
    def(A::LightPosition, "light_position", 4, D::Int),
    def(A::LightPositionObjectSpace, "light_position_object_space", 4, D::Int),
    def(A::LightPositionViewSpace, "light_position_view_space", 4, D::Int),
    def(A::LightDirection, "light_direction", 4, D::Int),
    def(A::LightDirectionObjectSpace, "light_direction_object_space", 4, D::Int),
    def(A::LightDirectionViewSpace, "light_direction_view_space", 4, D::Int),
    def(A::LightDistanceObjectSpace, "light_distance_object_space", 1, D::Int),
    def(A::LightPowerScale, "light_power", 1, D::Int),
    def(A::LightDiffuseColourPowerScaled, "light_diffuse_colour_power_scaled", 4, D::Int),
    def(A::LightSpecularColourPowerScaled, "light_specular_colour_power_scaled", 4, D::Int),
    def(A::LightDiffuseColourArray, "light_diffuse_colour_array", 4, D::Int),
    def(A::LightSpecularColourArray, "light_specular_colour_array", 4, D::Int),
    def(
        A::LightDiffuseColourPowerScaledArray,
        "light_diffuse_colour_power_scaled_array",
        4,
        D::Int,
    ),
    def(
        A::LightSpecularColourPowerScaledArray,
        "light_specular_colour_power_scaled_array",
        4,
        D::Int,
    ),
    def(A::LightAttenuationArray, "light_attenuation_array", 4, D::Int),
    def(A::LightPositionArray, "light_position_array", 4, D::Int),
    def(A::LightPositionObjectSpaceArray, "light_position_object_space_array", 4, D::Int),
    def(A::LightPositionViewSpaceArray, "light_position_view_space_array", 4, D::Int),
    def(A::LightDirectionArray, "light_direction_array", 4, D::Int),
    def(A::LightDirectionObjectSpaceArray, "light_direction_object_space_array", 4, D::Int),
    def(A::LightDirectionViewSpaceArray, "light_direction_view_space_array", 4, D::Int),
    def(A::LightDistanceObjectSpaceArray, "light_distance_object_space_array", 1, D::Int),
    def(A::LightPowerScaleArray, "light_power_array", 1, D::Int),
    def(A::SpotLightParamsArray, "spotlight_params_array", 4, D::Int),
    def(A::DerivedAmbientLightColour, "derived_ambient_light_colour", 4, D::None),
    def(A::DerivedSceneColour, "derived_scene_colour", 4, D::None),
    def(A::DerivedLightDiffuseColour, "derived_light_diffuse_colour", 4, D::Int),
    def(A::DerivedLightSpecularColour, "derived_light_specular_colour", 4, D::Int),
    def(A::DerivedLightDiffuseColourArray, "derived_light_diffuse_colour_array", 4, D::Int),
    def(A::DerivedLightSpecularColourArray, "derived_light_specular_colour_array", 4, D::Int),
    def(A::LightNumber, "light_number", 1, D::Int),
    def(A::LightCastsShadows, "light_casts_shadows", 1, D::Int),
    def(A::ShadowExtrusionDistance, "shadow_extrusion_distance", 1, D::Int),
    def(A::CameraPosition, "camera_position", 3, D::None),
    def(A::CameraPositionObjectSpace, "camera_position_object_space", 3, D::None),
    def(A::TextureViewProjMatrix, "texture_viewproj_matrix", 16, D::Int),
    def(A::TextureViewProjMatrixArray, "texture_viewproj_matrix_array", 16, D::Int),
    def(A::TextureWorldViewProjMatrix, "texture_worldviewproj_matrix", 16, D::Int),
    def(A::TextureWorldViewProjMatrixArray, "texture_worldviewproj_matrix_array", 16, D::Int),
    def(A::SpotLightViewProjMatrix, "spotlight_viewproj_matrix", 16, D::Int),
    def(A::SpotLightWorldViewProjMatrix, "spotlight_worldviewproj_matrix", 16, D::Int),
    def(A::Custom, "custom", 4, D::Int),
    def(A::Time, "time", 1, D::Real),
    def(A::Time0X, "time_0_x", 4, D::Real),
    def(A::CosTime0X, "costime_0_x", 4, D::Real),
    def(A::SinTime0X, "sintime_0_x", 4, D::Real),
    def(A::TanTime0X, "tantime_0_x", 4, D::Real),
    def(A::Time0XPacked, "time_0_x_packed", 4, D::Real),
    def(A::Time01, "time_0_1", 4, D::Real),
    def(A::CosTime01, "costime_0_1", 4, D::Real),
    def(A::SinTime01, "sintime_0_1", 4, D::Real),
    def(A::TanTime01, "tantime_0_1", 4, D::Real),
    def(A::Time01Packed, "time_0_1_packed", 4, D::Real),
    def(A::Time02Pi, "time_0_2pi", 4, D::Real),
    def(A::CosTime02Pi, "costime_0_2pi", 4, D::Real),
    def(A::SinTime02Pi, "sintime_0_2pi", 4, D::Real),
    def(A::TanTime02Pi, "tantime_0_2pi", 4, D::Real),
    def(A::Time02PiPacked, "time_0_2pi_packed", 4, D::Real),
    def(A::FrameTime, "frame_time", 1, D::Real),
    def(A::Fps, "fps", 1, D::None),
    def(A::ViewportWidth, "viewport_width", 1, D::None),
    def(A::ViewportHeight, "viewport_height", 1, D::None),
    def(A::InverseViewportWidth, "inverse_viewport_width", 1, D::None),
    def(A::InverseViewportHeight, "inverse_viewport_height", 1, D::None),
    def(A::ViewportSize, "viewport_size", 4, D::None),
    def(A::ViewDirection, "view_direction", 3, D::None),
    def(A::ViewSideVector, "view_side_vector", 3, D::None),
    def(A::ViewUpVector, "view_up_vector", 3, D::None),
    def(A::Fov, "fov", 1, D::None),
    def(A::NearClipDistance, "near_clip_distance", 1, D::None),
    def(A::FarClipDistance, "far_clip_distance", 1, D::None),
    def(A::PassNumber, "pass_number", 1, D::None),
    def(A::PassIterationNumber, "pass_iteration_number", 1, D::None),
    def(A::AnimationParametric, "animation_parametric", 4, D::Int),
    def(A::TexelOffsets, "texel_offsets", 4, D::None),
    def(A::SceneDepthRange, "scene_depth_range", 4, D::None),
    def(A::ShadowSceneDepthRange, "shadow_scene_depth_range", 4, D::Int),
    def(A::ShadowColour, "shadow_colour", 4, D::None),
    def(A::TextureSize, "texture_size", 4, D::Int),
    def(A::InverseTextureSize, "inverse_texture_size", 4, D::Int),
    def(A::PackedTextureSize, "packed_texture_size", 4, D::Int),
    def(A::TextureMatrix, "texture_matrix", 16, D::Int),
    def(A::LodCameraPosition, "lod_camera_position", 3, D::None),
    def(A::LodCameraPositionObjectSpace, "lod_camera_position_object_space", 3, D::None),
    def(A::LightCustom, "light_custom", 4, D::Int),
];

impl AutoConstantType {
    /// Case-insensitive lookup by script name.
    pub fn from_name(name: &str) -> Option<&'static AutoConstantDefinition> {
        AUTO_CONSTANT_DEFINITIONS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn definition(self) -> &'static AutoConstantDefinition {
        AUTO_CONSTANT_DEFINITIONS
            .iter()
            .find(|d| d.kind == self)
            .unwrap_or(&AUTO_CONSTANT_DEFINITIONS[0])
    }

    /// Texture and spotlight projection constants default their index to 0
    /// when the script omits it.
    pub fn defaults_extra_to_zero(self) -> bool {
        matches!(
            self,
            AutoConstantType::TextureViewProjMatrix
                | AutoConstantType::TextureWorldViewProjMatrix
                | AutoConstantType::SpotLightViewProjMatrix
                | AutoConstantType::SpotLightWorldViewProjMatrix
        )
    }

    /// Time based constants scale by 1 when no factor is given.
    pub fn defaults_extra_to_one(self) -> bool {
        matches!(self, AutoConstantType::Time | AutoConstantType::FrameTime)
    }
}

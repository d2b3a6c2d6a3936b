use crate::data_structures::{
    compositor::{StencilOperation, StencilState},
    material::{
        CompareFunction, CullingMode, Pass, PolygonMode, SceneBlendFactor, SceneBlendOperation,
    },
    texture_unit::{FilterOptions, PixelFormat, TextureAddressingMode},
};

impl From<CompareFunction> for wgpu::CompareFunction {
    fn from(f: CompareFunction) -> Self {
        match f {
            CompareFunction::AlwaysFail => wgpu::CompareFunction::Never,
            CompareFunction::AlwaysPass => wgpu::CompareFunction::Always,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
        }
    }
}

impl From<SceneBlendFactor> for wgpu::BlendFactor {
    fn from(f: SceneBlendFactor) -> Self {
        match f {
            SceneBlendFactor::One => wgpu::BlendFactor::One,
            SceneBlendFactor::Zero => wgpu::BlendFactor::Zero,
            SceneBlendFactor::DestColour => wgpu::BlendFactor::Dst,
            SceneBlendFactor::SourceColour => wgpu::BlendFactor::Src,
            SceneBlendFactor::OneMinusDestColour => wgpu::BlendFactor::OneMinusDst,
            SceneBlendFactor::OneMinusSourceColour => wgpu::BlendFactor::OneMinusSrc,
            SceneBlendFactor::DestAlpha => wgpu::BlendFactor::DstAlpha,
            SceneBlendFactor::SourceAlpha => wgpu::BlendFactor::SrcAlpha,
            SceneBlendFactor::OneMinusDestAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
            SceneBlendFactor::OneMinusSourceAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        }
    }
}

impl From<SceneBlendOperation> for wgpu::BlendOperation {
    fn from(op: SceneBlendOperation) -> Self {
        match op {
            SceneBlendOperation::Add => wgpu::BlendOperation::Add,
            SceneBlendOperation::Subtract => wgpu::BlendOperation::Subtract,
            SceneBlendOperation::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
            SceneBlendOperation::Min => wgpu::BlendOperation::Min,
            SceneBlendOperation::Max => wgpu::BlendOperation::Max,
        }
    }
}

impl From<PolygonMode> for wgpu::PolygonMode {
    fn from(mode: PolygonMode) -> Self {
        match mode {
            PolygonMode::Points => wgpu::PolygonMode::Point,
            PolygonMode::Wireframe => wgpu::PolygonMode::Line,
            PolygonMode::Solid => wgpu::PolygonMode::Fill,
        }
    }
}

impl From<StencilOperation> for wgpu::StencilOperation {
    fn from(op: StencilOperation) -> Self {
        match op {
            StencilOperation::Keep => wgpu::StencilOperation::Keep,
            StencilOperation::Zero => wgpu::StencilOperation::Zero,
            StencilOperation::Replace => wgpu::StencilOperation::Replace,
            StencilOperation::Increment => wgpu::StencilOperation::IncrementClamp,
            StencilOperation::Decrement => wgpu::StencilOperation::DecrementClamp,
            StencilOperation::IncrementWrap => wgpu::StencilOperation::IncrementWrap,
            StencilOperation::DecrementWrap => wgpu::StencilOperation::DecrementWrap,
            StencilOperation::Invert => wgpu::StencilOperation::Invert,
        }
    }
}

impl From<TextureAddressingMode> for wgpu::AddressMode {
    fn from(mode: TextureAddressingMode) -> Self {
        match mode {
            TextureAddressingMode::Wrap => wgpu::AddressMode::Repeat,
            TextureAddressingMode::Mirror => wgpu::AddressMode::MirrorRepeat,
            TextureAddressingMode::Clamp => wgpu::AddressMode::ClampToEdge,
            TextureAddressingMode::Border => wgpu::AddressMode::ClampToBorder,
        }
    }
}

impl From<FilterOptions> for wgpu::FilterMode {
    fn from(filter: FilterOptions) -> Self {
        match filter {
            FilterOptions::None | FilterOptions::Point => wgpu::FilterMode::Nearest,
            FilterOptions::Linear | FilterOptions::Anisotropic => wgpu::FilterMode::Linear,
        }
    }
}

impl From<FilterOptions> for wgpu::MipmapFilterMode {
    fn from(filter: FilterOptions) -> Self {
        match filter {
            FilterOptions::None | FilterOptions::Point => wgpu::MipmapFilterMode::Nearest,
            FilterOptions::Linear | FilterOptions::Anisotropic => wgpu::MipmapFilterMode::Linear,
        }
    }
}

impl PixelFormat {
    /// Closest `wgpu` texture format. Packed and 24 bit formats have no
    /// direct equivalent and yield `None`.
    pub fn to_wgpu(self) -> Option<wgpu::TextureFormat> {
        use wgpu::TextureFormat as T;
        let format = match self {
            PixelFormat::L8 | PixelFormat::A8 => T::R8Unorm,
            PixelFormat::A8L8 => T::Rg8Unorm,
            PixelFormat::A8B8G8R8 | PixelFormat::R8G8B8A8 | PixelFormat::X8B8G8R8 => T::Rgba8Unorm,
            PixelFormat::A8R8G8B8 | PixelFormat::B8G8R8A8 | PixelFormat::X8R8G8B8 => T::Bgra8Unorm,
            PixelFormat::A2R10G10B10 => T::Rgb10a2Unorm,
            PixelFormat::FloatR16 => T::R16Float,
            PixelFormat::FloatGR16 => T::Rg16Float,
            PixelFormat::FloatRGB16 | PixelFormat::FloatRGBA16 => T::Rgba16Float,
            PixelFormat::FloatR32 => T::R32Float,
            PixelFormat::FloatGR32 => T::Rg32Float,
            PixelFormat::FloatRGB32 | PixelFormat::FloatRGBA32 => T::Rgba32Float,
            PixelFormat::Depth => T::Depth32Float,
            PixelFormat::Unknown
            | PixelFormat::L16
            | PixelFormat::R5G6B5
            | PixelFormat::R8G8B8
            | PixelFormat::B8G8R8 => return None,
        };
        Some(format)
    }
}

impl Pass {
    /// `None` for passes that overwrite the target, which lets the
    /// pipeline skip blending altogether.
    pub fn blend_state(&self) -> Option<wgpu::BlendState> {
        if !self.is_transparent()
            && self.blend_operation == SceneBlendOperation::Add
            && self.alpha_blend_operation == SceneBlendOperation::Add
        {
            return None;
        }
        Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: self.source_blend_factor.into(),
                dst_factor: self.dest_blend_factor.into(),
                operation: self.blend_operation.into(),
            },
            alpha: wgpu::BlendComponent {
                src_factor: self.source_blend_factor_alpha.into(),
                dst_factor: self.dest_blend_factor_alpha.into(),
                operation: self.alpha_blend_operation.into(),
            },
        })
    }

    pub fn colour_writes(&self) -> wgpu::ColorWrites {
        if self.colour_write {
            wgpu::ColorWrites::ALL
        } else {
            wgpu::ColorWrites::empty()
        }
    }

    /// Clockwise culling removes triangles wound clockwise on screen, so the
    /// front faces are the counter clockwise ones.
    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        let (front_face, cull_mode) = match self.culling_mode {
            CullingMode::None => (wgpu::FrontFace::Ccw, None),
            CullingMode::Clockwise => (wgpu::FrontFace::Ccw, Some(wgpu::Face::Back)),
            CullingMode::Anticlockwise => (wgpu::FrontFace::Cw, Some(wgpu::Face::Back)),
        };
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face,
            cull_mode,
            polygon_mode: self.polygon_mode.into(),
            unclipped_depth: false,
            conservative: false,
        }
    }

    pub fn depth_bias_state(&self) -> wgpu::DepthBiasState {
        wgpu::DepthBiasState {
            constant: self.depth_bias_constant.round() as i32,
            slope_scale: self.depth_bias_slope_scale,
            clamp: 0.0,
        }
    }

    pub fn depth_stencil_state(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        let depth_compare = if self.depth_check {
            self.depth_function.into()
        } else {
            wgpu::CompareFunction::Always
        };
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(self.depth_write),
            depth_compare: Some(depth_compare),
            stencil: wgpu::StencilState::default(),
            bias: self.depth_bias_state(),
        }
    }

    pub fn multisample_state(&self, count: u32) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count,
            mask: !0,
            alpha_to_coverage_enabled: self.alpha_to_coverage,
        }
    }
}

impl StencilState {
    pub fn face_state(&self) -> wgpu::StencilFaceState {
        wgpu::StencilFaceState {
            compare: self.function.into(),
            fail_op: self.fail_op.into(),
            depth_fail_op: self.depth_fail_op.into(),
            pass_op: self.pass_op.into(),
        }
    }

    /// Two sided stencilling inverts the operations for back faces.
    pub fn to_wgpu(&self) -> wgpu::StencilState {
        let front = self.face_state();
        let back = if self.two_sided {
            wgpu::StencilFaceState {
                compare: front.compare,
                fail_op: invert_stencil_op(self.fail_op).into(),
                depth_fail_op: invert_stencil_op(self.depth_fail_op).into(),
                pass_op: invert_stencil_op(self.pass_op).into(),
            }
        } else {
            front
        };
        wgpu::StencilState {
            front,
            back,
            read_mask: self.mask,
            write_mask: self.mask,
        }
    }
}

fn invert_stencil_op(op: StencilOperation) -> StencilOperation {
    match op {
        StencilOperation::Increment => StencilOperation::Decrement,
        StencilOperation::Decrement => StencilOperation::Increment,
        StencilOperation::IncrementWrap => StencilOperation::DecrementWrap,
        StencilOperation::DecrementWrap => StencilOperation::IncrementWrap,
        other => other,
    }
}

use crate::data_structures::{
    colour::ColourValue,
    texture_unit::{FilterOptions, TextureAddressingMode, TextureUnitState},
};

impl TextureUnitState {
    /// Sampler settings for this unit. Anisotropic filtering needs linear
    /// minification and magnification, which [`FilterOptions::Anisotropic`]
    /// maps to. A mip filter of [`FilterOptions::None`] samples the base
    /// level only.
    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        let anisotropic = self.min_filter == FilterOptions::Anisotropic
            || self.mag_filter == FilterOptions::Anisotropic;
        let anisotropy_clamp = if anisotropic {
            self.max_anisotropy.clamp(1, 16) as u16
        } else {
            1
        };
        let lod_max_clamp = if self.mip_filter == FilterOptions::None { 0.0 } else { 100.0 };
        let uses_border = [self.address_mode.u, self.address_mode.v, self.address_mode.w]
            .contains(&TextureAddressingMode::Border);

        wgpu::SamplerDescriptor {
            label: None,
            address_mode_u: self.address_mode.u.into(),
            address_mode_v: self.address_mode.v.into(),
            address_mode_w: self.address_mode.w.into(),
            mag_filter: self.mag_filter.into(),
            min_filter: self.min_filter.into(),
            mipmap_filter: self.mip_filter.into(),
            lod_min_clamp: 0.0,
            lod_max_clamp,
            anisotropy_clamp,
            border_color: uses_border.then(|| border_colour(self.border_colour)),
            ..Default::default()
        }
    }
}

/// `wgpu` only offers a few fixed border colours.
fn border_colour(colour: ColourValue) -> wgpu::SamplerBorderColor {
    if colour.a < 0.5 {
        wgpu::SamplerBorderColor::TransparentBlack
    } else if colour.r + colour.g + colour.b > 1.5 {
        wgpu::SamplerBorderColor::OpaqueWhite
    } else {
        wgpu::SamplerBorderColor::OpaqueBlack
    }
}

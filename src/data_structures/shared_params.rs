use std::collections::BTreeMap;

use anyhow::{Result, bail};

use super::gpu_params::{ElementType, GpuConstantDefinition, constant_len};
use crate::math::Real;

/// Type of a constant declared with `shared_param_named`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GpuConstantType {
    Float1,
    Float2,
    Float3,
    Float4,
    Matrix2x2,
    Matrix2x3,
    Matrix2x4,
    Matrix3x2,
    Matrix3x3,
    Matrix3x4,
    Matrix4x2,
    Matrix4x3,
    Matrix4x4,
    Int1,
    Int2,
    Int3,
    Int4,
}

impl GpuConstantType {
    pub fn from_name(name: &str) -> Option<Self> {
        use GpuConstantType::*;
        let t = match name {
            "float" | "float1" => Float1,
            "float2" => Float2,
            "float3" => Float3,
            "float4" => Float4,
            "matrix2x2" => Matrix2x2,
            "matrix2x3" => Matrix2x3,
            "matrix2x4" => Matrix2x4,
            "matrix3x2" => Matrix3x2,
            "matrix3x3" => Matrix3x3,
            "matrix3x4" => Matrix3x4,
            "matrix4x2" => Matrix4x2,
            "matrix4x3" => Matrix4x3,
            "matrix4x4" => Matrix4x4,
            "int" | "int1" => Int1,
            "int2" => Int2,
            "int3" => Int3,
            "int4" => Int4,
            _ => return None,
        };
        Some(t)
    }

    pub fn element_size(self) -> usize {
        use GpuConstantType::*;
        match self {
            Float1 | Int1 => 1,
            Float2 | Int2 => 2,
            Float3 | Int3 => 3,
            Float4 | Int4 | Matrix2x2 => 4,
            Matrix2x3 | Matrix3x2 => 6,
            Matrix2x4 | Matrix4x2 => 8,
            Matrix3x3 => 9,
            Matrix3x4 | Matrix4x3 => 12,
            Matrix4x4 => 16,
        }
    }

    pub fn element_type(self) -> ElementType {
        use GpuConstantType::*;
        match self {
            Int1 | Int2 | Int3 | Int4 => ElementType::Int,
            _ => ElementType::Real,
        }
    }
}

/// A named block of constants that several programs can link to with
/// `shared_params_ref`.
#[derive(Clone, Debug, Default)]
pub struct GpuSharedParameters {
    name: String,
    pub group: String,
    pub origin: String,
    definitions: BTreeMap<String, GpuConstantDefinition>,
    float_constants: Vec<Real>,
    int_constants: Vec<i32>,
}

impl GpuSharedParameters {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_constant_definition(
        &mut self,
        name: &str,
        constant_type: GpuConstantType,
        array_size: usize,
    ) -> Result<()> {
        if self.definitions.contains_key(name) {
            bail!(
                "constant {name} already exists in shared parameter set {}",
                self.name
            );
        }
        let element_size = constant_type.element_size();
        let array_size = array_size.max(1);
        let len = constant_len(element_size, array_size)?;
        let element_type = constant_type.element_type();
        let physical_index = match element_type {
            ElementType::Real => {
                let index = self.float_constants.len();
                self.float_constants.resize(index + len, 0.0);
                index
            }
            ElementType::Int => {
                let index = self.int_constants.len();
                self.int_constants.resize(index + len, 0);
                index
            }
        };
        self.definitions.insert(
            name.to_string(),
            GpuConstantDefinition {
                element_type,
                physical_index,
                element_size,
                array_size,
            },
        );
        Ok(())
    }

    pub fn constant_definitions(&self) -> impl Iterator<Item = (&String, &GpuConstantDefinition)> {
        self.definitions.iter()
    }

    pub fn set_named_constant_f32(&mut self, name: &str, values: &[Real]) -> Result<()> {
        let def = self.writable(name, ElementType::Real, values.len())?;
        self.float_constants[def.physical_index..def.physical_index + values.len()]
            .copy_from_slice(values);
        Ok(())
    }

    pub fn set_named_constant_i32(&mut self, name: &str, values: &[i32]) -> Result<()> {
        let def = self.writable(name, ElementType::Int, values.len())?;
        self.int_constants[def.physical_index..def.physical_index + values.len()]
            .copy_from_slice(values);
        Ok(())
    }

    pub fn floats(&self, name: &str) -> Option<&[Real]> {
        let def = self.definitions.get(name)?;
        (def.element_type == ElementType::Real)
            .then(|| &self.float_constants[def.physical_index..def.physical_index + def.len()])
    }

    pub fn ints(&self, name: &str) -> Option<&[i32]> {
        let def = self.definitions.get(name)?;
        (def.element_type == ElementType::Int)
            .then(|| &self.int_constants[def.physical_index..def.physical_index + def.len()])
    }

    fn writable(
        &self,
        name: &str,
        element_type: ElementType,
        count: usize,
    ) -> Result<GpuConstantDefinition> {
        let Some(def) = self.definitions.get(name) else {
            bail!("shared parameter set {} has no constant {name}", self.name);
        };
        if def.element_type != element_type {
            bail!("constant {name} is of type {:?}", def.element_type);
        }
        if count > def.len() {
            bail!("constant {name} holds {} values, {count} given", def.len());
        }
        Ok(def.clone())
    }
}

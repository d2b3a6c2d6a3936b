//! Shader constant storage.
//!
//! [`GpuProgramParameters`] keeps the constants a program reads: values set
//! by name or by register index, bindings to engine auto constants and the
//! shared parameter sets it links to. Float and int values live in two flat
//! buffers that can be uploaded as they are (see [`GpuProgramParameters::float_bytes`]).

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use super::auto_constants::{AutoConstantDataType, AutoConstantType};
use super::shared_params::GpuSharedParameters;
use crate::math::{Matrix4, Real, matrix4_to_row_major};

/// Components per register slot.
pub const REGISTER_SIZE: usize = 4;

/// Largest constant, in components, that fits a 64 KiB uniform binding.
pub const MAX_CONSTANT_COMPONENTS: usize = 16 * 1024;

/// Registers addressable by `param_indexed`.
pub const MAX_REGISTERS: usize = MAX_CONSTANT_COMPONENTS / REGISTER_SIZE;

/// Components taken by `array_size` elements of `element_size`, if that
/// stays within [`MAX_CONSTANT_COMPONENTS`].
pub fn constant_len(element_size: usize, array_size: usize) -> Result<usize> {
    match element_size.checked_mul(array_size.max(1)) {
        Some(len) if len <= MAX_CONSTANT_COMPONENTS => Ok(len),
        _ => bail!(
            "{array_size} elements of {element_size} components exceed the limit of \
             {MAX_CONSTANT_COMPONENTS}"
        ),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    Real,
    Int,
}

/// Location of a named constant inside the float or int buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuConstantDefinition {
    pub element_type: ElementType,
    pub physical_index: usize,
    /// Components per array element.
    pub element_size: usize,
    pub array_size: usize,
}

impl GpuConstantDefinition {
    pub fn len(&self) -> usize {
        self.element_size * self.array_size
    }
}

/// A parameter is addressed either by its name in the shader or by register.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterTarget {
    Named(String),
    Indexed(usize),
}

/// Extra argument stored with an auto constant binding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AutoConstantData {
    None,
    Int(u32),
    Real(Real),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoConstantEntry {
    pub target: ParameterTarget,
    pub kind: AutoConstantType,
    pub data: AutoConstantData,
    pub element_count: usize,
}

#[derive(Clone, Debug, Default)]
pub struct GpuProgramParameters {
    float_constants: Vec<Real>,
    int_constants: Vec<i32>,
    named: BTreeMap<String, GpuConstantDefinition>,
    float_registers: BTreeMap<usize, usize>,
    int_registers: BTreeMap<usize, usize>,
    auto_constants: Vec<AutoConstantEntry>,
    shared_parameter_sets: Vec<String>,
    /// Upload matrices column-major instead of row-major.
    pub transpose_matrices: bool,
}

impl GpuProgramParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named_constant(&self, name: &str) -> Option<&GpuConstantDefinition> {
        self.named.get(name)
    }

    pub fn named_constants(&self) -> impl Iterator<Item = (&String, &GpuConstantDefinition)> {
        self.named.iter()
    }

    /// Declares a named constant, allocating zeroed storage for it. Declaring
    /// the same name again with the same layout is a no-op.
    pub fn add_constant_definition(
        &mut self,
        name: &str,
        element_type: ElementType,
        element_size: usize,
        array_size: usize,
    ) -> Result<&GpuConstantDefinition> {
        if let Some(existing) = self.named.get(name) {
            if existing.element_type != element_type
                || existing.element_size != element_size
                || existing.array_size != array_size
            {
                bail!("constant {name} is already declared with a different layout");
            }
        } else {
            let len = constant_len(element_size, array_size)?;
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
            self.named.insert(
                name.to_string(),
                GpuConstantDefinition {
                    element_type,
                    physical_index,
                    element_size,
                    array_size: array_size.max(1),
                },
            );
        }
        self.named
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("constant {name} could not be declared"))
    }

    /// Writes reals to a named constant. Undeclared names are declared with
    /// one element of `values.len()` components.
    pub fn set_named_constant_f32(&mut self, name: &str, values: &[Real]) -> Result<()> {
        let def = self
            .add_or_get_definition(name, ElementType::Real, values.len())?
            .clone();
        if def.element_type != ElementType::Real {
            bail!("constant {name} holds ints, not reals");
        }
        if values.len() > def.len() {
            bail!(
                "constant {name} holds {} values, {} given",
                def.len(),
                values.len()
            );
        }
        self.float_constants[def.physical_index..def.physical_index + values.len()]
            .copy_from_slice(values);
        Ok(())
    }

    pub fn set_named_constant_i32(&mut self, name: &str, values: &[i32]) -> Result<()> {
        let def = self
            .add_or_get_definition(name, ElementType::Int, values.len())?
            .clone();
        if def.element_type != ElementType::Int {
            bail!("constant {name} holds reals, not ints");
        }
        if values.len() > def.len() {
            bail!(
                "constant {name} holds {} values, {} given",
                def.len(),
                values.len()
            );
        }
        self.int_constants[def.physical_index..def.physical_index + values.len()]
            .copy_from_slice(values);
        Ok(())
    }

    pub fn set_named_matrix4(&mut self, name: &str, m: &Matrix4) -> Result<()> {
        let values = self.matrix_values(m);
        self.set_named_constant_f32(name, &values)
    }

    /// Writes reals starting at a register. Values fill whole registers and a
    /// trailing partial register is padded with zeros.
    pub fn set_constant_f32(&mut self, register: usize, values: &[Real]) -> Result<()> {
        check_registers(register, values.len())?;
        for (i, chunk) in values.chunks(REGISTER_SIZE).enumerate() {
            let physical = match self.float_registers.get(&(register + i)) {
                Some(&p) => p,
                None => {
                    let p = self.float_constants.len();
                    self.float_constants.resize(p + REGISTER_SIZE, 0.0);
                    self.float_registers.insert(register + i, p);
                    p
                }
            };
            let slot = &mut self.float_constants[physical..physical + REGISTER_SIZE];
            slot.fill(0.0);
            slot[..chunk.len()].copy_from_slice(chunk);
        }
        Ok(())
    }

    pub fn set_constant_i32(&mut self, register: usize, values: &[i32]) -> Result<()> {
        check_registers(register, values.len())?;
        for (i, chunk) in values.chunks(REGISTER_SIZE).enumerate() {
            let physical = match self.int_registers.get(&(register + i)) {
                Some(&p) => p,
                None => {
                    let p = self.int_constants.len();
                    self.int_constants.resize(p + REGISTER_SIZE, 0);
                    self.int_registers.insert(register + i, p);
                    p
                }
            };
            let slot = &mut self.int_constants[physical..physical + REGISTER_SIZE];
            slot.fill(0);
            slot[..chunk.len()].copy_from_slice(chunk);
        }
        Ok(())
    }

    /// A matrix spans four registers.
    pub fn set_constant_matrix4(&mut self, register: usize, m: &Matrix4) -> Result<()> {
        let values = self.matrix_values(m);
        self.set_constant_f32(register, &values)
    }

    pub fn named_floats(&self, name: &str) -> Option<&[Real]> {
        let def = self.named.get(name)?;
        (def.element_type == ElementType::Real)
            .then(|| &self.float_constants[def.physical_index..def.physical_index + def.len()])
    }

    pub fn named_ints(&self, name: &str) -> Option<&[i32]> {
        let def = self.named.get(name)?;
        (def.element_type == ElementType::Int)
            .then(|| &self.int_constants[def.physical_index..def.physical_index + def.len()])
    }

    pub fn register_floats(&self, register: usize) -> Option<&[Real]> {
        let p = *self.float_registers.get(&register)?;
        Some(&self.float_constants[p..p + REGISTER_SIZE])
    }

    pub fn register_ints(&self, register: usize) -> Option<&[i32]> {
        let p = *self.int_registers.get(&register)?;
        Some(&self.int_constants[p..p + REGISTER_SIZE])
    }

    /// Binds a named parameter to an auto constant, replacing any previous
    /// binding of that name.
    pub fn set_named_auto_constant(
        &mut self,
        name: &str,
        kind: AutoConstantType,
        data: AutoConstantData,
    ) -> Result<()> {
        let def = kind.definition();
        check_auto_data(kind, data)?;
        let element_size = def.element_count;
        self.add_or_get_definition(name, def.element_type, element_size)?;
        self.bind_auto(ParameterTarget::Named(name.to_string()), kind, data);
        Ok(())
    }

    pub fn set_indexed_auto_constant(
        &mut self,
        register: usize,
        kind: AutoConstantType,
        data: AutoConstantData,
    ) -> Result<()> {
        check_registers(register, REGISTER_SIZE)?;
        check_auto_data(kind, data)?;
        self.bind_auto(ParameterTarget::Indexed(register), kind, data);
        Ok(())
    }

    pub fn clear_named_auto_constant(&mut self, name: &str) {
        self.auto_constants
            .retain(|e| e.target != ParameterTarget::Named(name.to_string()));
    }

    pub fn clear_indexed_auto_constant(&mut self, register: usize) {
        self.auto_constants
            .retain(|e| e.target != ParameterTarget::Indexed(register));
    }

    pub fn auto_constants(&self) -> &[AutoConstantEntry] {
        &self.auto_constants
    }

    pub fn find_auto_constant(&self, target: &ParameterTarget) -> Option<&AutoConstantEntry> {
        self.auto_constants.iter().find(|e| &e.target == target)
    }

    /// Links a shared parameter set. Every constant of the set is declared
    /// here as well and receives the set's current values.
    pub fn add_shared_parameters(&mut self, shared: &GpuSharedParameters) -> Result<()> {
        for (name, def) in shared.constant_definitions() {
            self.add_constant_definition(name, def.element_type, def.element_size, def.array_size)?;
            match def.element_type {
                ElementType::Real => {
                    if let Some(values) = shared.floats(name) {
                        self.set_named_constant_f32(name, values)?;
                    }
                }
                ElementType::Int => {
                    if let Some(values) = shared.ints(name) {
                        self.set_named_constant_i32(name, values)?;
                    }
                }
            }
        }
        if !self.is_using_shared_parameters(shared.name()) {
            self.shared_parameter_sets.push(shared.name().to_string());
        }
        Ok(())
    }

    pub fn is_using_shared_parameters(&self, name: &str) -> bool {
        self.shared_parameter_sets.iter().any(|n| n == name)
    }

    pub fn shared_parameter_sets(&self) -> &[String] {
        &self.shared_parameter_sets
    }

    pub fn float_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.float_constants)
    }

    pub fn int_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.int_constants)
    }

    fn matrix_values(&self, m: &Matrix4) -> [Real; 16] {
        if self.transpose_matrices {
            let columns: [[Real; 4]; 4] = (*m).into();
            bytemuck::cast(columns)
        } else {
            matrix4_to_row_major(m)
        }
    }

    fn add_or_get_definition(
        &mut self,
        name: &str,
        element_type: ElementType,
        element_size: usize,
    ) -> Result<&GpuConstantDefinition> {
        if self.named.contains_key(name) {
            return self
                .named
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("constant {name} vanished"));
        }
        self.add_constant_definition(name, element_type, element_size.max(1), 1)
    }

    fn bind_auto(
        &mut self,
        target: ParameterTarget,
        kind: AutoConstantType,
        data: AutoConstantData,
    ) {
        let element_count = kind.definition().element_count;
        let entry = AutoConstantEntry {
            target,
            kind,
            data,
            element_count,
        };
        match self.auto_constants.iter_mut().find(|e| e.target == entry.target) {
            Some(existing) => *existing = entry,
            None => self.auto_constants.push(entry),
        }
    }
}

fn check_registers(register: usize, components: usize) -> Result<()> {
    let last = register.saturating_add(components.div_ceil(REGISTER_SIZE).max(1));
    if last > MAX_REGISTERS {
        bail!("register {register} is out of range, only {MAX_REGISTERS} registers are available");
    }
    Ok(())
}

fn check_auto_data(kind: AutoConstantType, data: AutoConstantData) -> Result<()> {
    let expected = kind.definition().data_type;
    let ok = matches!(
        (expected, data),
        (AutoConstantDataType::None, AutoConstantData::None)
            | (AutoConstantDataType::Int, AutoConstantData::Int(_))
            | (AutoConstantDataType::Real, AutoConstantData::Real(_))
    );
    if !ok {
        bail!(
            "auto constant {} expects {:?} extra data",
            kind.definition().name,
            expected
        );
    }
    Ok(())
}

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::math::Real;

/// Attributes shared by every emitter type.
const EMITTER_ATTRIBUTES: &[&str] = &[
    "angle",
    "colour",
    "colour_range_start",
    "colour_range_end",
    "direction",
    "up",
    "emission_rate",
    "position",
    "velocity",
    "velocity_min",
    "velocity_max",
    "time_to_live",
    "time_to_live_min",
    "time_to_live_max",
    "duration",
    "duration_min",
    "duration_max",
    "repeat_delay",
    "repeat_delay_min",
    "repeat_delay_max",
    "name",
    "emit_emitter",
];

const AREA_EMITTER_ATTRIBUTES: &[&str] = &["width", "height", "depth"];
const HOLLOW_EMITTER_ATTRIBUTES: &[&str] = &["inner_width", "inner_height", "inner_depth"];

const BILLBOARD_RENDERER_ATTRIBUTES: &[&str] = &[
    "billboard_type",
    "billboard_origin",
    "billboard_rotation_type",
    "common_direction",
    "common_up_vector",
    "point_rendering",
    "accurate_facing",
    "texture_sheet_size",
];

/// A particle source. Attributes are kept as their script text.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleEmitter {
    pub kind: String,
    pub parameters: BTreeMap<String, String>,
}

impl ParticleEmitter {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// Returns `false` for attributes the emitter type does not have.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> bool {
        let area = matches!(
            self.kind.as_str(),
            "Box" | "Cylinder" | "Ellipsoid" | "HollowEllipsoid" | "Ring"
        );
        let hollow = matches!(self.kind.as_str(), "HollowEllipsoid" | "Ring");
        let known = EMITTER_ATTRIBUTES.contains(&name)
            || (area && AREA_EMITTER_ATTRIBUTES.contains(&name))
            || (hollow && HOLLOW_EMITTER_ATTRIBUTES.contains(&name));
        if known {
            self.parameters.insert(name.to_string(), value.to_string());
        }
        known
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// A particle modifier. Affector attributes depend on plugins and are
/// accepted as given.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleAffector {
    pub kind: String,
    pub parameters: BTreeMap<String, String>,
}

impl ParticleAffector {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn set_parameter(&mut self, name: &str, value: &str) {
        self.parameters.insert(name.to_string(), value.to_string());
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// Particle system template declared by `particle_system`.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    pub name: String,
    pub group: String,
    pub origin: String,
    pub material_name: String,
    pub quota: u32,
    pub default_width: Real,
    pub default_height: Real,
    pub cull_individually: bool,
    pub sorted: bool,
    pub local_space: bool,
    pub iteration_interval: Real,
    pub nonvisible_update_timeout: Real,
    pub renderer: String,
    pub renderer_parameters: BTreeMap<String, String>,
    pub emitters: Vec<ParticleEmitter>,
    pub affectors: Vec<ParticleAffector>,
}

impl ParticleSystem {
    pub fn new(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            origin: String::new(),
            material_name: String::new(),
            quota: 10,
            default_width: 100.0,
            default_height: 100.0,
            cull_individually: false,
            sorted: false,
            local_space: false,
            iteration_interval: 0.0,
            nonvisible_update_timeout: 0.0,
            renderer: "billboard".to_string(),
            renderer_parameters: BTreeMap::new(),
            emitters: Vec::new(),
            affectors: Vec::new(),
        }
    }

    /// Sets a system attribute, falling back to the billboard renderer's
    /// attributes.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let parsed = match name {
            "quota" => parse_into(value, &mut self.quota),
            "particle_width" => parse_into(value, &mut self.default_width),
            "particle_height" => parse_into(value, &mut self.default_height),
            "cull_each" => parse_bool_into(value, &mut self.cull_individually),
            "sorted" => parse_bool_into(value, &mut self.sorted),
            "local_space" => parse_bool_into(value, &mut self.local_space),
            "iteration_interval" => parse_into(value, &mut self.iteration_interval),
            "nonvisible_update_timeout" => parse_into(value, &mut self.nonvisible_update_timeout),
            "renderer" => {
                self.renderer = value.to_string();
                self.renderer_parameters.clear();
                true
            }
            _ if self.renderer == "billboard" && BILLBOARD_RENDERER_ATTRIBUTES.contains(&name) => {
                self.renderer_parameters
                    .insert(name.to_string(), value.to_string());
                true
            }
            _ => bail!("unknown particle system attribute {name}"),
        };
        if !parsed {
            bail!("invalid value \"{value}\" for particle system attribute {name}");
        }
        Ok(())
    }
}

fn parse_into<T: std::str::FromStr>(value: &str, target: &mut T) -> bool {
    match value.trim().parse() {
        Ok(v) => {
            *target = v;
            true
        }
        Err(_) => false,
    }
}

fn parse_bool_into(value: &str, target: &mut bool) -> bool {
    match value.trim() {
        "true" | "on" | "yes" => *target = true,
        "false" | "off" | "no" => *target = false,
        _ => return false,
    }
    true
}

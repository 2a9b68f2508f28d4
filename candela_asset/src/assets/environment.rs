//! Environment resources feed image-based lighting into the deferred pass.
//!
//! An [`Environment`] owns up to three cube maps: the base environment, a
//! prefiltered (specular) variant and an irradiance (diffuse) variant. The
//! derived maps are products of the base map and may be absent even when the
//! base is present. Renderers receive borrowed views and must treat a missing
//! map as "no environment contribution".

use crate::assets::Cubemap;
use crate::assets::cubemap::mip_chain_len;
use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

pub const DEFAULT_FILE_TYPE: &str = ".tga";

const IRRADIANCE_FACE_SIZE: u32 = 32;

/// Owner of the cube maps used for image-based lighting.
///
/// Each sub-map is exclusively owned by one `Environment` at a time; the
/// accessors hand out borrows that live only as long as the resource itself.
#[derive(Debug)]
pub struct Environment {
    environment: Option<Cubemap>,
    prefiltered: Option<Cubemap>,
    irradiance: Option<Cubemap>,

    mip_count: u32,
    width: u32,
    height: u32,
    file_path: String,
    file_type: String,

    gen_prefilter: bool,
    gen_irradiance: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            environment: None,
            prefiltered: None,
            irradiance: None,
            mip_count: 0,
            width: 0,
            height: 0,
            file_path: String::new(),
            file_type: DEFAULT_FILE_TYPE.to_string(),
            gen_prefilter: true,
            gen_irradiance: true,
        }
    }
}

impl Environment {
    /// Wraps an already built base map. The derived slots stay empty.
    pub fn from_map(environment: Cubemap) -> Self {
        Self {
            environment: Some(environment),
            gen_prefilter: false,
            gen_irradiance: false,
            ..Self::default()
        }
    }

    /// Wraps an already built base map plus its irradiance variant.
    pub fn from_maps(environment: Cubemap, irradiance: Cubemap) -> Self {
        Self {
            environment: Some(environment),
            irradiance: Some(irradiance),
            gen_prefilter: false,
            gen_irradiance: false,
            ..Self::default()
        }
    }

    /// Loads an environment from disk, optionally generating the derived maps.
    ///
    /// An unreadable source leaves the resource empty; consuming render passes
    /// then simply apply no environment.
    pub fn open(file_path: &str, gen_prefilter: bool, gen_irradiance: bool) -> Self {
        let mut env = Self {
            file_path: file_path.to_string(),
            gen_prefilter,
            gen_irradiance,
            ..Self::default()
        };
        env.load();
        env
    }

    /// Reconstructs an environment from persisted source fields and loads it.
    pub fn with_source(
        name: &str,
        mip_count: u32,
        width: u32,
        height: u32,
        file_type: &str,
    ) -> Self {
        let mut env = Self::default();
        env.load_from(name, mip_count, width, height, file_type);
        env
    }

    /// Re-invokes the load using the persisted source fields.
    ///
    /// No-op when the file path is empty; this is the restoration path used
    /// after deserializing a scene.
    pub fn load(&mut self) {
        if self.file_path.is_empty() {
            return;
        }

        let base = Cubemap::load_faces(&self.file_path, &self.file_type).or_else(|face_err| {
            trace!("No per-face sources for {:?}: {face_err}", self.file_path);
            Cubemap::load_equirect(&format!("{}{}", self.file_path, self.file_type))
        });

        let base = match base {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Environment source {:?} could not be loaded, applying none: {e}",
                    self.file_path
                );
                self.environment = None;
                self.prefiltered = None;
                self.irradiance = None;
                return;
            }
        };

        self.width = base.width;
        self.height = base.height;
        if self.mip_count == 0 {
            self.mip_count = mip_chain_len(base.width);
        }

        self.prefiltered = self
            .gen_prefilter
            .then(|| base.prefiltered(self.mip_count));
        self.irradiance = self
            .gen_irradiance
            .then(|| base.irradiance(IRRADIANCE_FACE_SIZE));
        self.environment = Some(base);
    }

    /// Replaces the persisted source fields and loads from them.
    pub fn load_from(
        &mut self,
        name: &str,
        mip_count: u32,
        width: u32,
        height: u32,
        file_type: &str,
    ) {
        self.file_path = name.to_string();
        self.mip_count = mip_count;
        self.width = width;
        self.height = height;
        self.file_type = file_type.to_string();
        self.load();
    }

    pub fn environment_map(&self) -> Option<&Cubemap> {
        self.environment.as_ref()
    }

    pub fn prefiltered_map(&self) -> Option<&Cubemap> {
        self.prefiltered.as_ref()
    }

    pub fn irradiance_map(&self) -> Option<&Cubemap> {
        self.irradiance.as_ref()
    }

    /// Replaces the base map; the previously owned map is released.
    pub fn set_environment(&mut self, environment: Cubemap) {
        self.environment = Some(environment);
    }

    /// Replaces the prefiltered map; the previously owned map is released.
    pub fn set_prefiltered_environment(&mut self, prefiltered: Cubemap) {
        self.prefiltered = Some(prefiltered);
    }

    /// Replaces the irradiance map; the previously owned map is released.
    pub fn set_irradiance_map(&mut self, irradiance: Cubemap) {
        self.irradiance = Some(irradiance);
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_file_path(&mut self, path: &str) {
        self.file_path = path.to_string();
    }

    pub fn set_file_type(&mut self, file_type: &str) {
        self.file_type = file_type.to_string();
    }

    pub fn set_mip_count(&mut self, mip_count: u32) {
        self.mip_count = mip_count;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }
}

// The persisted form carries the five source fields in fixed order and never
// the texel data; maps are regenerated on load.
impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Environment", 5)?;
        state.serialize_field("file_path", &self.file_path)?;
        state.serialize_field("mip_count", &self.mip_count)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("file_type", &self.file_type)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct PersistedEnvironment {
    file_path: String,
    mip_count: u32,
    width: u32,
    height: u32,
    #[serde(default = "default_file_type")]
    file_type: String,
}

fn default_file_type() -> String {
    DEFAULT_FILE_TYPE.to_string()
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let persisted = PersistedEnvironment::deserialize(deserializer)?;
        let mut env = Environment {
            file_path: persisted.file_path,
            mip_count: persisted.mip_count,
            width: persisted.width,
            height: persisted.height,
            file_type: persisted.file_type,
            ..Environment::default()
        };
        if !env.file_path.is_empty() {
            env.load();
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_load_is_a_no_op() {
        let mut env = Environment::default();
        assert!(env.environment_map().is_none());
        assert!(env.prefiltered_map().is_none());
        assert!(env.irradiance_map().is_none());

        env.load();

        assert!(env.environment_map().is_none());
        assert!(env.prefiltered_map().is_none());
        assert!(env.irradiance_map().is_none());
    }

    #[test]
    fn single_map_injection_leaves_derived_slots_empty() {
        let env = Environment::from_map(Cubemap::fallback());
        assert!(env.environment_map().is_some());
        assert!(env.prefiltered_map().is_none());
        assert!(env.irradiance_map().is_none());
    }

    #[test]
    fn dual_map_injection_fills_base_and_irradiance() {
        let env = Environment::from_maps(Cubemap::fallback(), Cubemap::fallback());
        assert!(env.environment_map().is_some());
        assert!(env.irradiance_map().is_some());
        assert!(env.prefiltered_map().is_none());
    }

    #[test]
    fn unreadable_source_degrades_to_empty() {
        let env = Environment::open("/definitely/not/here/sky", true, true);
        assert!(env.environment_map().is_none());
        assert!(env.prefiltered_map().is_none());
        assert!(env.irradiance_map().is_none());
        assert_eq!(env.file_path(), "/definitely/not/here/sky");
    }

    #[test]
    fn setters_replace_owned_maps() {
        let mut env = Environment::from_map(Cubemap::fallback());
        let mut replacement = Cubemap::fallback();
        replacement.width = 2;
        replacement.height = 2;

        env.set_environment(replacement);
        assert_eq!(env.environment_map().unwrap().width, 2);

        env.set_prefiltered_environment(Cubemap::fallback());
        env.set_irradiance_map(Cubemap::fallback());
        assert!(env.prefiltered_map().is_some());
        assert!(env.irradiance_map().is_some());
    }
}

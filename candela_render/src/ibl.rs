use candela_asset::{Cubemap, Environment};

/// Borrowed views of a scene environment for the deferred lighting pass.
///
/// Valid only while the owning [`Environment`] is alive. Any map may be
/// absent; an absent map contributes nothing to the lit result.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentBindings<'a> {
    pub environment: Option<&'a Cubemap>,
    pub prefiltered: Option<&'a Cubemap>,
    pub irradiance: Option<&'a Cubemap>,
}

impl<'a> EnvironmentBindings<'a> {
    pub fn of(environment: &'a Environment) -> Self {
        Self {
            environment: environment.environment_map(),
            prefiltered: environment.prefiltered_map(),
            irradiance: environment.irradiance_map(),
        }
    }

    pub fn contributes(&self) -> bool {
        self.environment.is_some() || self.prefiltered.is_some() || self.irradiance.is_some()
    }
}

//! Configuration of [`FilteredEnv`](crate::FilteredEnv).
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Identifier of the environment with a built-in override.
pub const REACHER_V1: &str = "Reacher-v1";

/// Environment-specific constants replacing the ones derived from the declared bounds.
///
/// Some environments declare bounds that are far from the range their observations
/// and rewards actually take. An override fixes the observation scale of selected
/// dimensions and the affine map of the reward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvOverride {
    /// Observation scales by dimension.
    pub obs_scale: BTreeMap<usize, f32>,

    /// Reward scale.
    pub reward_scale: f32,

    /// Reward center.
    pub reward_center: f32,
}

impl Default for EnvOverride {
    fn default() -> Self {
        Self {
            obs_scale: BTreeMap::new(),
            reward_scale: 1.0,
            reward_center: 0.0,
        }
    }
}

impl EnvOverride {
    /// Sets the observation scale of dimension `index`.
    pub fn obs_scale(mut self, index: usize, scale: f32) -> Self {
        self.obs_scale.insert(index, scale);
        self
    }

    /// Sets the reward scale.
    pub fn reward_scale(mut self, v: f32) -> Self {
        self.reward_scale = v;
        self
    }

    /// Sets the reward center.
    pub fn reward_center(mut self, v: f32) -> Self {
        self.reward_center = v;
        self
    }

    /// Override for `Reacher-v1`.
    ///
    /// Distances to the target (dimensions 6 and 7) are rescaled by 40 and 20,
    /// and rewards by 200.
    pub fn reacher_v1() -> Self {
        Self::default()
            .obs_scale(6, 40.0)
            .obs_scale(7, 20.0)
            .reward_scale(200.0)
            .reward_center(0.0)
    }
}

/// Configuration of the normalization applied by [`FilteredEnv`](crate::FilteredEnv).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// If `true`, the exposed spaces are left as they are and observations are
    /// not normalized. Actions are still clipped to the true action bounds.
    pub skip_space_norm: bool,

    /// If `true`, the exposed action space is a
    /// [`SimBoxSpace`](filtenv_core::SimBoxSpace) for action-embedding agents.
    pub wolpertinger: bool,

    /// If `true`, observations returned by `reset` are normalized like those
    /// returned by `step`. By default they are passed through as they are.
    #[serde(default)]
    pub normalize_reset: bool,

    /// Environment-specific overrides keyed by environment identifier.
    pub overrides: BTreeMap<String, EnvOverride>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_space_norm: false,
            wolpertinger: false,
            normalize_reset: false,
            overrides: BTreeMap::from([(REACHER_V1.to_string(), EnvOverride::reacher_v1())]),
        }
    }
}

impl FilterConfig {
    /// Sets `skip_space_norm`.
    pub fn skip_space_norm(mut self, v: bool) -> Self {
        self.skip_space_norm = v;
        self
    }

    /// Sets `wolpertinger`.
    pub fn wolpertinger(mut self, v: bool) -> Self {
        self.wolpertinger = v;
        self
    }

    /// Sets `normalize_reset`.
    pub fn normalize_reset(mut self, v: bool) -> Self {
        self.normalize_reset = v;
        self
    }

    /// Adds an override for the environment `env_id`, replacing an existing one.
    pub fn add_override(mut self, env_id: impl Into<String>, v: EnvOverride) -> Self {
        self.overrides.insert(env_id.into(), v);
        self
    }

    /// Removes all overrides, including the built-in ones.
    pub fn clear_overrides(mut self) -> Self {
        self.overrides.clear();
        self
    }

    /// Returns the override for `env_id`, if any.
    pub fn get_override(&self, env_id: &str) -> Option<&EnvOverride> {
        self.overrides.get(env_id)
    }

    /// Constructs [`FilterConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FilterConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Configuration of [`FilteredEnv`](crate::FilteredEnv) together with the
/// environment it wraps, used by [`Env::build`](filtenv_core::Env::build).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilteredEnvConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Configuration of the filter.
    pub filter: FilterConfig,
}

impl<C> FilteredEnvConfig<C> {
    /// Creates a configuration with the default filter.
    pub fn new(env: C) -> Self {
        Self {
            env,
            filter: FilterConfig::default(),
        }
    }

    /// Sets the configuration of the filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }
}

impl<C> FilteredEnvConfig<C>
where
    C: Serialize + DeserializeOwned,
{
    /// Constructs [`FilteredEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FilteredEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use filtenv_core::dummy::DummyEnvConfig;
    use tempdir::TempDir;
    use test_log::test;

    #[test]
    fn default_contains_reacher_override() {
        let config = FilterConfig::default();
        assert!(!config.skip_space_norm);
        assert!(!config.wolpertinger);
        assert!(!config.normalize_reset);

        let o = config.get_override(REACHER_V1).unwrap();
        assert_eq!(o.obs_scale.get(&6), Some(&40.0));
        assert_eq!(o.obs_scale.get(&7), Some(&20.0));
        assert_eq!(o.reward_scale, 200.0);
        assert_eq!(o.reward_center, 0.0);

        assert!(config.clear_overrides().get_override(REACHER_V1).is_none());
    }

    #[test]
    fn save_and_load_filter_config() -> Result<()> {
        let dir = TempDir::new("filter_config")?;
        let path = dir.path().join("filter.yaml");
        let config = FilterConfig::default()
            .skip_space_norm(true)
            .normalize_reset(true)
            .add_override("Pendulum-v1", EnvOverride::default().reward_scale(0.125));
        config.save(&path)?;
        assert_eq!(FilterConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn normalize_reset_defaults_to_false_in_yaml() -> Result<()> {
        let config: FilterConfig =
            serde_yaml::from_str("skip_space_norm: false\nwolpertinger: true\noverrides: {}\n")?;
        assert!(config.wolpertinger);
        assert!(!config.normalize_reset);
        assert!(config.overrides.is_empty());
        Ok(())
    }

    #[test]
    fn save_and_load_filtered_env_config() -> Result<()> {
        let dir = TempDir::new("filtered_env_config")?;
        let path = dir.path().join("filtered_env.yaml");
        let config = FilteredEnvConfig::new(DummyEnvConfig::default().id("Reacher-v1"))
            .filter(FilterConfig::default().wolpertinger(true));
        config.save(&path)?;
        assert_eq!(FilteredEnvConfig::<DummyEnvConfig>::load(&path)?, config);
        Ok(())
    }
}

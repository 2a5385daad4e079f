//! Environment wrapper normalizing observations and actions.
use crate::{FilterConfig, FilterError, FilteredEnvConfig, Normalizer};
use anyhow::Result;
use filtenv_core::{
    record::{Record, RecordValue},
    BoxSpace, Env, SimBoxSpace, Space, Step,
};
use log::{info, trace};
use ndarray::Array1;

/// An environment whose observations and actions are normalized to `[-1, 1]`.
///
/// [`FilteredEnv`] holds the wrapped environment and a [`Normalizer`] computed
/// once from the bounds the wrapped environment declares. It exposes
/// normalized spaces and performs the conversions in [`Env::step`]:
///
/// * actions given to [`Env::step`] are mapped to the raw range with
///   [`FilteredEnv::filter_action`], then clipped to the true action bounds before
///   being sent to the wrapped environment,
/// * observations returned by the wrapped environment are mapped with
///   [`FilteredEnv::filter_observation`].
///
/// When `skip_space_norm` is set, actions are only clipped and observations are
/// returned as they are.
///
/// [`Env::reset`] returns the observation of the wrapped environment as it is,
/// as does [`Step::init_obs`]. Set `normalize_reset` in [`FilterConfig`] to
/// normalize them too.
///
/// Rewards are never rescaled in [`Env::step`]. Apply
/// [`FilteredEnv::filter_reward`] explicitly, since rescaled rewards are not
/// comparable with thresholds defined on the raw reward (e.g., the reward at
/// which an environment is regarded as solved).
///
/// ```rust
/// use filtenv::FilteredEnv;
/// use filtenv_core::{dummy::{DummyEnv, DummyEnvConfig}, Env, ArrayAct};
/// use ndarray::array;
///
/// let config = DummyEnvConfig::default()
///     .act_bounds(vec![-2.0, -1.0], vec![2.0, 1.0])
///     .obs_bounds(vec![0.0, 0.0], vec![10.0, 4.0]);
/// let env = DummyEnv::build(&config, 0).unwrap();
/// let mut env = FilteredEnv::new(env, &Default::default()).unwrap();
///
/// assert_eq!(env.filter_action(&array![1.0, 1.0]), array![2.0, 1.0]);
/// assert_eq!(env.filter_observation(&array![5.0, 2.0]), array![0.0, 0.0]);
///
/// env.reset().unwrap();
/// let (_step, _record) = env.step(&ArrayAct(array![0.5, -0.5]));
/// assert_eq!(env.inner().last_act(), Some(&array![1.0, -0.5]));
/// ```
pub struct FilteredEnv<E: Env> {
    env: E,
    normalizer: Normalizer,
    skip_space_norm: bool,
    normalize_reset: bool,
    true_observation_space: BoxSpace,
    true_action_space: BoxSpace,
    observation_space: Space,
    action_space: Space,
}

impl<E> FilteredEnv<E>
where
    E: Env,
    E::Obs: From<Array1<f32>> + Into<Array1<f32>>,
    E::Act: From<Array1<f32>> + Into<Array1<f32>>,
{
    /// Wraps `env`.
    ///
    /// Fails if the spaces of `env` are not bounded continuous spaces, if the
    /// bounds of a `SimBox` action space differ in dimension, if an
    /// override for `env` is inconsistent with its observation space, if the
    /// normalized action bounds are not mapped back to the true action bounds
    /// exactly, or if `config.wolpertinger` is set and the action space of `env`
    /// carries no branching factor.
    pub fn new(env: E, config: &FilterConfig) -> Result<Self> {
        let acsp = match env.action_space() {
            Space::Box(b) => b.clone(),
            Space::SimBox(s) if s.bounds.dim() != s.raw.dim() => {
                return Err(FilterError::ShapeMismatch {
                    env_id: env.id().to_string(),
                    bounds: s.bounds.dim(),
                    raw: s.raw.dim(),
                }
                .into())
            }
            Space::SimBox(s) => s.bounds.clone(),
            s => return Err(FilterError::NonContinuousActionSpace(s.to_string()).into()),
        };
        let obsp = match env.observation_space() {
            Space::Box(b) => b.clone(),
            s => {
                return Err(FilterError::NonContinuousObservationSpace(s.to_string()).into())
            }
        };

        let env_override = config.get_override(env.id()).map(|o| (env.id(), o));
        let normalizer = Normalizer::new(&obsp, &acsp, env_override)?;

        let (observation_space, action_space) = if config.skip_space_norm {
            (env.observation_space().clone(), env.action_space().clone())
        } else {
            let observation_space = BoxSpace::new(
                normalizer.filter_observation(obsp.low()),
                normalizer.filter_observation(obsp.high()),
            )?;
            let unit = BoxSpace::symmetric_unit(acsp.dim());
            normalizer.check_action_round_trip(&unit, &acsp)?;

            let action_space = if config.wolpertinger {
                let top_n = match env.action_space() {
                    Space::SimBox(s) => s.top_n,
                    s => return Err(FilterError::MissingBranchingFactor(s.to_string()).into()),
                };
                Space::SimBox(SimBoxSpace {
                    bounds: unit,
                    raw: acsp.clone(),
                    env_id: env.id().to_string(),
                    top_n,
                })
            } else {
                Space::Box(unit)
            };

            (Space::Box(observation_space), action_space)
        };

        info!("True action space: {}", acsp);
        info!("True state space: {}", obsp);
        info!("Filtered action space: {}", action_space);
        info!("Filtered state space: {}", observation_space);

        Ok(Self {
            env,
            normalizer,
            skip_space_norm: config.skip_space_norm,
            normalize_reset: config.normalize_reset,
            true_observation_space: obsp,
            true_action_space: acsp,
            observation_space,
            action_space,
        })
    }

    fn filter_obs_value(&self, obs: E::Obs) -> E::Obs {
        if self.skip_space_norm {
            obs
        } else {
            self.normalizer.filter_observation(&obs.into()).into()
        }
    }

    fn reset_obs_value(&self, obs: E::Obs) -> E::Obs {
        if self.normalize_reset {
            self.filter_obs_value(obs)
        } else {
            obs
        }
    }
}

impl<E: Env> FilteredEnv<E> {
    /// Maps a raw observation to `[-1, 1]`.
    pub fn filter_observation(&self, obs: &Array1<f32>) -> Array1<f32> {
        self.normalizer.filter_observation(obs)
    }

    /// Maps a normalized action to the raw action range of the wrapped environment.
    pub fn filter_action(&self, act: &Array1<f32>) -> Array1<f32> {
        self.normalizer.filter_action(act)
    }

    /// Rescales a raw reward.
    ///
    /// This is not applied in [`Env::step`].
    pub fn filter_reward(&self, reward: f32) -> f32 {
        self.normalizer.filter_reward(reward)
    }

    /// The constants of the normalization.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Returns `true` if the spaces are not normalized.
    pub fn skip_space_norm(&self) -> bool {
        self.skip_space_norm
    }

    /// Observation bounds declared by the wrapped environment.
    pub fn true_observation_space(&self) -> &BoxSpace {
        &self.true_observation_space
    }

    /// Action bounds declared by the wrapped environment.
    pub fn true_action_space(&self) -> &BoxSpace {
        &self.true_action_space
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// The wrapped environment.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwraps the environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E> Env for FilteredEnv<E>
where
    E: Env,
    E::Obs: From<Array1<f32>> + Into<Array1<f32>>,
    E::Act: From<Array1<f32>> + Into<Array1<f32>>,
{
    type Config = FilteredEnvConfig<E::Config>;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env, seed)?;
        Self::new(env, &config.filter)
    }

    fn id(&self) -> &str {
        self.env.id()
    }

    fn observation_space(&self) -> &Space {
        &self.observation_space
    }

    fn action_space(&self) -> &Space {
        &self.action_space
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let act: Array1<f32> = a.clone().into();
        let act = if self.skip_space_norm {
            act
        } else {
            self.normalizer.filter_action(&act)
        };
        let act_f = self.true_action_space.clip(&act);
        trace!("FilteredEnv::step(): {} -> {}", act, act_f);

        let (step, record) = self.env.step(&act_f.clone().into());
        let record = record.merge(Record::from_slice(&[(
            "act_filtered",
            RecordValue::Array1(act_f.to_vec()),
        )]));

        let init_obs = step.init_obs.map(|o| self.reset_obs_value(o));
        let step = Step {
            act: a.clone(),
            obs: self.filter_obs_value(step.obs),
            reward: step.reward,
            is_terminated: step.is_terminated,
            is_truncated: step.is_truncated,
            info: step.info,
            init_obs,
        };

        (step, record)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        trace!("FilteredEnv::reset()");
        let obs = self.env.reset()?;
        Ok(self.reset_obs_value(obs))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        trace!("FilteredEnv::reset_with_index({})", ix);
        let obs = self.env.reset_with_index(ix)?;
        Ok(self.reset_obs_value(obs))
    }
}

/// Wraps `env` with the default overrides.
pub fn make_filtered_env<E>(
    env: E,
    skip_space_norm: bool,
    wolpertinger: bool,
) -> Result<FilteredEnv<E>>
where
    E: Env,
    E::Obs: From<Array1<f32>> + Into<Array1<f32>>,
    E::Act: From<Array1<f32>> + Into<Array1<f32>>,
{
    let config = FilterConfig::default()
        .skip_space_norm(skip_space_norm)
        .wolpertinger(wolpertinger);
    FilteredEnv::new(env, &config)
}

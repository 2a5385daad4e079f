//! A simple continuous environment used for tests and demos.
//!
//! [`DummyEnv`] moves a point inside its observation box: the action is added to the
//! first coordinates of the state, the state is clipped to the observation bounds
//! and the reward is the negative L1 norm of the state. Episodes are truncated
//! after [`DummyEnvConfig::max_steps`] steps. The last action received is kept so
//! that wrappers can check what was actually sent to the environment.
use crate::{
    record::{Record, RecordValue},
    ArrayAct, ArrayObs, BoxSpace, Env, SimBoxSpace, Space, Step,
};
use anyhow::Result;
use log::trace;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DummyEnvConfig {
    /// Identifier of the environment.
    pub id: String,

    /// Lower bound of observations.
    pub obs_low: Vec<f32>,

    /// Upper bound of observations.
    pub obs_high: Vec<f32>,

    /// Lower bound of actions.
    pub act_low: Vec<f32>,

    /// Upper bound of actions.
    pub act_high: Vec<f32>,

    /// If set, the action space is a [`SimBoxSpace`] with this branching factor.
    pub top_n: Option<usize>,

    /// The maximum number of steps in an episode.
    pub max_steps: usize,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            id: "Dummy-v0".to_string(),
            obs_low: vec![-1.0, -1.0],
            obs_high: vec![1.0, 1.0],
            act_low: vec![-1.0, -1.0],
            act_high: vec![1.0, 1.0],
            top_n: None,
            max_steps: 200,
        }
    }
}

impl DummyEnvConfig {
    /// Sets the identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the bounds of observations.
    pub fn obs_bounds(mut self, low: Vec<f32>, high: Vec<f32>) -> Self {
        self.obs_low = low;
        self.obs_high = high;
        self
    }

    /// Sets the bounds of actions.
    pub fn act_bounds(mut self, low: Vec<f32>, high: Vec<f32>) -> Self {
        self.act_low = low;
        self.act_high = high;
        self
    }

    /// Sets the branching factor of the action space.
    pub fn top_n(mut self, v: Option<usize>) -> Self {
        self.top_n = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Constructs [`DummyEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DummyEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Dummy env.
pub struct DummyEnv {
    id: String,
    observation_space: Space,
    action_space: Space,
    obs_bounds: BoxSpace,
    state: Array1<f32>,
    last_act: Option<Array1<f32>>,
    count_steps: usize,
    max_steps: usize,
    rng: fastrand::Rng,
}

impl DummyEnv {
    /// The last action given to [`Env::step`].
    pub fn last_act(&self) -> Option<&Array1<f32>> {
        self.last_act.as_ref()
    }

    /// The current state, which is also the observation.
    pub fn state(&self) -> &Array1<f32> {
        &self.state
    }

    /// Overwrites the current state, clipped to the observation bounds.
    pub fn set_state(&mut self, state: Array1<f32>) {
        self.state = self.obs_bounds.clip(&state);
    }

    fn reward(&self) -> f32 {
        -self
            .state
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| v.abs())
            .sum::<f32>()
    }
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = ArrayObs;
    type Act = ArrayAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let obs_bounds = BoxSpace::from_slices(&config.obs_low, &config.obs_high)?;
        let act_bounds = BoxSpace::from_slices(&config.act_low, &config.act_high)?;
        let action_space = match config.top_n {
            None => Space::Box(act_bounds),
            Some(top_n) => Space::SimBox(SimBoxSpace {
                bounds: act_bounds.clone(),
                raw: act_bounds,
                env_id: config.id.clone(),
                top_n,
            }),
        };

        Ok(Self {
            id: config.id.clone(),
            observation_space: Space::Box(obs_bounds.clone()),
            action_space,
            state: Array1::zeros(obs_bounds.dim()),
            obs_bounds,
            last_act: None,
            count_steps: 0,
            max_steps: config.max_steps,
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn observation_space(&self) -> &Space {
        &self.observation_space
    }

    fn action_space(&self) -> &Space {
        &self.action_space
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        trace!("DummyEnv::step(): {:?}", a);
        let mut state = self.state.clone();
        for (s, v) in state.iter_mut().zip(a.0.iter()) {
            *s += v;
        }
        self.state = self.obs_bounds.clip(&state);
        self.last_act = Some(a.0.clone());
        self.count_steps += 1;

        let reward = self.reward();
        let is_truncated = self.count_steps >= self.max_steps;
        let record = Record::from_slice(&[
            ("act", RecordValue::Array1(a.0.to_vec())),
            ("reward", RecordValue::Scalar(reward)),
        ]);
        let step = Step::new(
            ArrayObs(self.state.clone()),
            a.clone(),
            reward,
            false,
            is_truncated,
            (),
        );

        (step, record)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        trace!("DummyEnv::reset()");
        self.count_steps = 0;
        self.state = self.obs_bounds.sample(&mut self.rng);
        Ok(ArrayObs(self.state.clone()))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = fastrand::Rng::with_seed(ix as u64);
        self.reset()
    }
}

#![warn(missing_docs)]
//! Normalization of observations, actions and rewards of continuous environments.
//!
//! [`FilteredEnv`] wraps an [`Env`](filtenv_core::Env) with bounded continuous
//! spaces and exposes the same interface with observations and actions in
//! `[-1, 1]`. The affine maps are computed once from the bounds declared by the
//! wrapped environment and held in a [`Normalizer`].
//!
//! Environments whose declared bounds do not reflect the actual range of their
//! observations or rewards can be handled with an [`EnvOverride`] registered in
//! [`FilterConfig`]. The default configuration contains the override for
//! `Reacher-v1`.
//!
//! ```rust
//! use filtenv::{EnvOverride, FilterConfig, FilteredEnvConfig, FilteredEnv};
//! use filtenv_core::{dummy::{DummyEnv, DummyEnvConfig}, Env};
//!
//! let config = FilteredEnvConfig::new(DummyEnvConfig::default().id("Point-v0"))
//!     .filter(FilterConfig::default().add_override(
//!         "Point-v0",
//!         EnvOverride::default().reward_scale(0.5),
//!     ));
//! let env = FilteredEnv::<DummyEnv>::build(&config, 42).unwrap();
//! assert_eq!(env.filter_reward(-4.0), -2.0);
//! ```
mod config;
mod error;
mod filtered_env;
mod normalizer;

pub use config::{EnvOverride, FilterConfig, FilteredEnvConfig, REACHER_V1};
pub use error::FilterError;
pub use filtered_env::{make_filtered_env, FilteredEnv};
pub use normalizer::Normalizer;

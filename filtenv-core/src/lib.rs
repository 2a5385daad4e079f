#![warn(missing_docs)]
//! Core abstractions of environments with bounded continuous spaces.
//!
//! An [`Env`] declares its observation and action [`Space`]s and an identifier,
//! and interacts with agents through [`Env::step`] and [`Env::reset`]. Wrappers,
//! such as the normalizer in the `filtenv` crate, are themselves [`Env`]s holding
//! the wrapped environment.
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Act, ArrayAct, ArrayObs, Env, Info, Obs, Step};

mod space;
pub use space::{BoxSpace, SimBoxSpace, Space, UNBOUNDED_THRESHOLD};

//! Core functionalities.
mod env;
mod step;
pub use env::Env;
pub use step::{Info, Step};

use ndarray::Array1;
use std::fmt::Debug;

/// An observation of an environment.
pub trait Obs: Clone + Debug {}

/// An action of an environment.
pub trait Act: Clone + Debug {}

#[derive(Clone, Debug, PartialEq)]
/// Observation represented as a 1-dimensional array.
pub struct ArrayObs(pub Array1<f32>);

impl Obs for ArrayObs {}

impl From<Array1<f32>> for ArrayObs {
    fn from(obs: Array1<f32>) -> Self {
        Self(obs)
    }
}

impl From<ArrayObs> for Array1<f32> {
    fn from(obs: ArrayObs) -> Self {
        obs.0
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Action represented as a 1-dimensional array.
pub struct ArrayAct(pub Array1<f32>);

impl Act for ArrayAct {}

impl From<Array1<f32>> for ArrayAct {
    fn from(act: Array1<f32>) -> Self {
        Self(act)
    }
}

impl From<ArrayAct> for Array1<f32> {
    fn from(act: ArrayAct) -> Self {
        act.0
    }
}

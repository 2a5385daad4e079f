//! Observation and action spaces.
//!
//! Continuous spaces are bounded intervals [`BoxSpace`]: a pair of equal-length
//! vectors `(low, high)` with `low <= high` elementwise. [`SimBoxSpace`] is a
//! [`BoxSpace`] with extra information used by action-embedding agents
//! (Wolpertinger), which search the `top_n` nearest discrete actions around a
//! continuous proto-action.
use crate::error::CoreError;
use anyhow::Result;
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Magnitude from which a bound is regarded as unbounded.
///
/// Gym-style environments often declare `±1e10` or `f32::MAX` instead of infinity.
pub const UNBOUNDED_THRESHOLD: f32 = 1e10;

/// A bounded interval in `R^n`.
///
/// Deserialized values are checked as in [`BoxSpace::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoxSpaceBounds")]
pub struct BoxSpace {
    low: Array1<f32>,
    high: Array1<f32>,
}

#[derive(Deserialize)]
struct BoxSpaceBounds {
    low: Array1<f32>,
    high: Array1<f32>,
}

impl TryFrom<BoxSpaceBounds> for BoxSpace {
    type Error = anyhow::Error;

    fn try_from(b: BoxSpaceBounds) -> Result<Self> {
        Self::new(b.low, b.high)
    }
}

impl BoxSpace {
    /// Creates a space with the given bounds.
    ///
    /// Fails if the bounds have different lengths, or if `low > high` or either
    /// bound is NaN in some dimension.
    pub fn new(low: Array1<f32>, high: Array1<f32>) -> Result<Self> {
        if low.len() != high.len() {
            return Err(CoreError::ShapeMismatch {
                low: low.len(),
                high: high.len(),
            }
            .into());
        }

        for (dim, (&l, &h)) in low.iter().zip(high.iter()).enumerate() {
            if l.is_nan() || h.is_nan() || l > h {
                return Err(CoreError::InvalidBounds { dim, low: l, high: h }.into());
            }
        }

        Ok(Self { low, high })
    }

    /// Creates a space from slices.
    pub fn from_slices(low: &[f32], high: &[f32]) -> Result<Self> {
        Self::new(Array1::from(low.to_vec()), Array1::from(high.to_vec()))
    }

    /// Creates `[-1, 1]^dim`.
    pub fn symmetric_unit(dim: usize) -> Self {
        Self {
            low: Array1::from_elem(dim, -1.0),
            high: Array1::from_elem(dim, 1.0),
        }
    }

    /// Lower bound.
    pub fn low(&self) -> &Array1<f32> {
        &self.low
    }

    /// Upper bound.
    pub fn high(&self) -> &Array1<f32> {
        &self.high
    }

    /// The number of dimensions.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if both bounds of dimension `i` are finite and below
    /// [`UNBOUNDED_THRESHOLD`] in magnitude.
    pub fn is_bounded(&self, i: usize) -> bool {
        let bounded = |v: f32| v.is_finite() && v.abs() < UNBOUNDED_THRESHOLD;
        bounded(self.low[i]) && bounded(self.high[i])
    }

    /// Returns `true` if `x` has the same length as the space and lies within
    /// the bounds.
    pub fn contains(&self, x: &Array1<f32>) -> bool {
        x.len() == self.dim()
            && Zip::from(x)
                .and(&self.low)
                .and(&self.high)
                .all(|&v, &l, &h| l <= v && v <= h)
    }

    /// Clamps `x` elementwise to the bounds.
    pub fn clip(&self, x: &Array1<f32>) -> Array1<f32> {
        Zip::from(x)
            .and(&self.low)
            .and(&self.high)
            .map_collect(|&v, &l, &h| v.max(l).min(h))
    }

    /// Samples a point uniformly in bounded dimensions; unbounded dimensions are 0.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Array1<f32> {
        Array1::from_shape_fn(self.dim(), |i| {
            if self.is_bounded(i) {
                let (l, h) = (self.low[i], self.high[i]);
                l + (h - l) * rng.f32()
            } else {
                0.0
            }
        })
    }
}

impl fmt::Display for BoxSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.low, self.high)
    }
}

/// A continuous action space for action-embedding (Wolpertinger) agents.
///
/// `bounds` is the space the agent acts in. `raw` and `env_id` refer back to
/// the environment the actions are finally sent to, and `top_n` is the number of
/// nearest neighbors the agent evaluates around each proto-action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimBoxSpace {
    /// Bounds in which the agent acts.
    pub bounds: BoxSpace,

    /// Bounds of the actions accepted by the environment.
    pub raw: BoxSpace,

    /// Identifier of the environment.
    pub env_id: String,

    /// Branching factor.
    pub top_n: usize,
}

impl fmt::Display for SimBoxSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (top_n = {})", self.bounds, self.top_n)
    }
}

/// A space of observations or actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Space {
    /// Bounded continuous space.
    Box(BoxSpace),

    /// Bounded continuous space for action-embedding agents.
    SimBox(SimBoxSpace),

    /// `n` discrete values.
    Discrete(usize),
}

impl Space {
    /// Returns the bounds of a continuous space.
    pub fn bounds(&self) -> Option<&BoxSpace> {
        match self {
            Self::Box(b) => Some(b),
            Self::SimBox(s) => Some(&s.bounds),
            Self::Discrete(_) => None,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box(b) => write!(f, "{}", b),
            Self::SimBox(s) => write!(f, "{}", s),
            Self::Discrete(n) => write!(f, "Discrete({})", n),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;
    use test_log::test;

    #[test]
    fn new_rejects_bad_bounds() {
        let err = BoxSpace::from_slices(&[0.0, 0.0], &[1.0]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CoreError>(),
            Some(&CoreError::ShapeMismatch { low: 2, high: 1 })
        );

        let err = BoxSpace::from_slices(&[0.0, 2.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CoreError>(),
            Some(&CoreError::InvalidBounds {
                dim: 1,
                low: 2.0,
                high: 1.0
            })
        );

        assert!(BoxSpace::from_slices(&[f32::NAN], &[1.0]).is_err());
    }

    #[test]
    fn clip_and_contains() {
        let space = BoxSpace::from_slices(&[-2.0, -1.0], &[2.0, 1.0]).unwrap();
        let x = array![3.0, -0.5];
        assert!(!space.contains(&x));

        let y = space.clip(&x);
        assert_eq!(y, array![2.0, -0.5]);
        assert!(space.contains(&y));
        assert!(!space.contains(&array![0.0]));
    }

    #[test]
    fn bounded_dimensions() {
        let space =
            BoxSpace::from_slices(&[0.0, f32::NEG_INFINITY, -1e10], &[1.0, 0.0, 1e10]).unwrap();
        assert!(space.is_bounded(0));
        assert!(!space.is_bounded(1));
        assert!(!space.is_bounded(2));
    }

    #[test]
    fn sample_stays_in_bounds() {
        let space = BoxSpace::from_slices(&[-3.0, 0.0, 0.0], &[-1.0, 5.0, f32::INFINITY]).unwrap();
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..100 {
            let x = space.sample(&mut rng);
            assert!(space.contains(&x));
            assert_eq!(x[2], 0.0);
        }
    }

    #[test]
    fn bounds_of_spaces() {
        let unit = BoxSpace::symmetric_unit(2);
        assert_eq!(unit.low(), &array![-1.0, -1.0]);

        let sim = Space::SimBox(SimBoxSpace {
            bounds: unit.clone(),
            raw: BoxSpace::from_slices(&[0.0, 0.0], &[4.0, 4.0]).unwrap(),
            env_id: "Dummy-v0".to_string(),
            top_n: 3,
        });
        assert_eq!(sim.bounds(), Some(&unit));
        assert_eq!(Space::Discrete(3).bounds(), None);
        assert_eq!(Space::Discrete(3).to_string(), "Discrete(3)");
    }

    #[test]
    fn deserialize_checks_bounds() -> Result<()> {
        let space = Space::Box(BoxSpace::from_slices(&[-2.0, 0.0], &[2.0, 1.0])?);
        let yaml = serde_yaml::to_string(&space)?;
        assert_eq!(serde_yaml::from_str::<Space>(&yaml)?, space);

        // Upper bound taken from a space with fewer dimensions.
        let mut bounds = serde_yaml::to_value(&BoxSpace::symmetric_unit(3))?;
        let high = serde_yaml::to_value(&BoxSpace::symmetric_unit(2))?
            .get("high")
            .cloned()
            .unwrap();
        bounds
            .as_mapping_mut()
            .unwrap()
            .insert(serde_yaml::Value::from("high"), high);
        let err = serde_yaml::from_value::<BoxSpace>(bounds).unwrap_err();
        assert!(err.to_string().contains("low has 3, high has 2"), "{}", err);

        // Bounds swapped.
        let mut bounds = serde_yaml::to_value(&BoxSpace::from_slices(&[0.0], &[1.0])?)?;
        let (low, high) = (
            bounds.get("low").cloned().unwrap(),
            bounds.get("high").cloned().unwrap(),
        );
        let m = bounds.as_mapping_mut().unwrap();
        m.insert(serde_yaml::Value::from("low"), high);
        m.insert(serde_yaml::Value::from("high"), low);
        let err = serde_yaml::from_value::<BoxSpace>(bounds).unwrap_err();
        assert!(err.to_string().contains("Invalid bounds at dimension 0"), "{}", err);
        Ok(())
    }
}

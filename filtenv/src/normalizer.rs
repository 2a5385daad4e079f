//! Affine maps between raw and normalized values.
use crate::{EnvOverride, FilterError};
use filtenv_core::BoxSpace;
use log::debug;
use ndarray::Array1;

/// Constants of the affine maps applied to observations, actions and rewards.
///
/// Observations are mapped from their declared bounds to `[-1, 1]` with
/// `(obs - o_c) / o_sc`. Actions go in the opposite direction, from `[-1, 1]` to
/// the declared bounds, with `a_sc * act + a_c`. Rewards are mapped with
/// `r_sc * reward + r_c`.
///
/// Observation dimensions without finite bounds (see [`BoxSpace::is_bounded`])
/// or with `low == high` are left as they are (`o_c = 0`, `o_sc = 1`).
///
/// The methods taking arrays panic if the length of the array differs from the
/// dimension of the corresponding space, as arithmetic on arrays of different
/// shapes does in `ndarray`.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalizer {
    o_c: Array1<f32>,
    o_sc: Array1<f32>,
    a_c: Array1<f32>,
    a_sc: Array1<f32>,
    r_c: f32,
    r_sc: f32,
}

impl Normalizer {
    /// Computes the constants from the declared bounds.
    ///
    /// `env_override` is applied after the constants are derived from the bounds.
    pub fn new(
        obs: &BoxSpace,
        act: &BoxSpace,
        env_override: Option<(&str, &EnvOverride)>,
    ) -> Result<Self, FilterError> {
        let (mut o_c, mut o_sc) = (Array1::zeros(obs.dim()), Array1::ones(obs.dim()));
        for i in 0..obs.dim() {
            let (l, h) = (obs.low()[i], obs.high()[i]);
            if obs.is_bounded(i) && h > l {
                o_c[i] = (h + l) / 2.0;
                o_sc[i] = (h - l) / 2.0;
            }
        }

        let a_c = (act.high() + act.low()) / 2.0;
        let a_sc = (act.high() - act.low()) / 2.0;

        let (mut r_c, mut r_sc) = (0.0, 1.0);

        if let Some((env_id, o)) = env_override {
            debug!("Apply override for {}: {:?}", env_id, o);
            for (&index, &scale) in o.obs_scale.iter() {
                if index >= obs.dim() {
                    return Err(FilterError::OverrideIndex {
                        env_id: env_id.to_string(),
                        index,
                        dim: obs.dim(),
                    });
                }
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(FilterError::OverrideScale {
                        env_id: env_id.to_string(),
                        scale,
                    });
                }
                o_sc[index] = scale;
            }
            r_sc = o.reward_scale;
            r_c = o.reward_center;
        }

        Ok(Self {
            o_c,
            o_sc,
            a_c,
            a_sc,
            r_c,
            r_sc,
        })
    }

    /// Maps a raw observation to the normalized range.
    pub fn filter_observation(&self, obs: &Array1<f32>) -> Array1<f32> {
        (obs - &self.o_c) / &self.o_sc
    }

    /// Maps a normalized action to the raw range of the environment.
    pub fn filter_action(&self, act: &Array1<f32>) -> Array1<f32> {
        &self.a_sc * act + &self.a_c
    }

    /// Maps a raw action to the normalized range; the inverse of [`Self::filter_action`].
    pub fn unfilter_action(&self, act: &Array1<f32>) -> Array1<f32> {
        (act - &self.a_c) / &self.a_sc
    }

    /// Maps a raw reward.
    pub fn filter_reward(&self, reward: f32) -> f32 {
        self.r_sc * reward + self.r_c
    }

    /// Checks that `filtered` is mapped onto `raw` by [`Self::filter_action`],
    /// comparing bounds exactly.
    pub fn check_action_round_trip(
        &self,
        filtered: &BoxSpace,
        raw: &BoxSpace,
    ) -> Result<(), FilterError> {
        let pairs = [
            ("low", filtered.low(), raw.low()),
            ("high", filtered.high(), raw.high()),
        ];
        for (bound, f, r) in pairs.iter() {
            let actual = self.filter_action(f);
            if actual != **r {
                return Err(FilterError::RoundTrip {
                    bound: *bound,
                    expected: r.to_vec(),
                    actual: actual.to_vec(),
                });
            }
        }
        Ok(())
    }

    /// Observation center.
    pub fn obs_center(&self) -> &Array1<f32> {
        &self.o_c
    }

    /// Observation scale.
    pub fn obs_scale(&self) -> &Array1<f32> {
        &self.o_sc
    }

    /// Action center.
    pub fn act_center(&self) -> &Array1<f32> {
        &self.a_c
    }

    /// Action scale.
    pub fn act_scale(&self) -> &Array1<f32> {
        &self.a_sc
    }

    /// Reward center.
    pub fn reward_center(&self) -> f32 {
        self.r_c
    }

    /// Reward scale.
    pub fn reward_scale(&self) -> f32 {
        self.r_sc
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{array, s};
    use test_log::test;

    fn boxed(low: &[f32], high: &[f32]) -> BoxSpace {
        BoxSpace::from_slices(low, high).unwrap()
    }

    #[test]
    fn action_constants() {
        let n = Normalizer::new(
            &boxed(&[0.0], &[1.0]),
            &boxed(&[-2.0, -1.0], &[2.0, 1.0]),
            None,
        )
        .unwrap();
        assert_eq!(n.act_center(), &array![0.0, 0.0]);
        assert_eq!(n.act_scale(), &array![2.0, 1.0]);
        assert_eq!(n.filter_action(&array![1.0, 1.0]), array![2.0, 1.0]);
        assert_eq!(n.filter_action(&array![-1.0, -1.0]), array![-2.0, -1.0]);
        assert_eq!(n.unfilter_action(&array![1.0, -0.5]), array![0.5, -0.5]);
    }

    #[test]
    fn observation_constants() {
        let n = Normalizer::new(
            &boxed(&[0.0, 0.0], &[10.0, 4.0]),
            &boxed(&[-1.0], &[1.0]),
            None,
        )
        .unwrap();
        assert_eq!(n.obs_center(), &array![5.0, 2.0]);
        assert_eq!(n.obs_scale(), &array![5.0, 2.0]);
        assert_eq!(n.filter_observation(&array![5.0, 2.0]), array![0.0, 0.0]);
        assert_eq!(n.filter_observation(&array![10.0, 4.0]), array![1.0, 1.0]);
        assert_eq!(n.filter_observation(&array![0.0, 0.0]), array![-1.0, -1.0]);
    }

    #[test]
    fn unbounded_observation_is_identity() {
        let n = Normalizer::new(
            &boxed(&[0.0, 0.0, -1e10], &[2.0, f32::INFINITY, 1e10]),
            &boxed(&[-1.0], &[1.0]),
            None,
        )
        .unwrap();
        assert_eq!(n.obs_center(), &array![1.0, 0.0, 0.0]);
        assert_eq!(n.obs_scale(), &array![1.0, 1.0, 1.0]);

        let obs = array![2.0, 3.5, -1.0e6];
        assert_eq!(n.filter_observation(&obs), array![1.0, 3.5, -1.0e6]);
    }

    #[test]
    fn degenerate_observation_is_identity() {
        let n = Normalizer::new(
            &boxed(&[3.0, -1.0], &[3.0, 1.0]),
            &boxed(&[-1.0], &[1.0]),
            None,
        )
        .unwrap();
        assert_eq!(n.filter_observation(&array![3.0, 0.5]), array![3.0, 0.5]);
    }

    #[test]
    fn reward_default_and_override() {
        let obs = boxed(&[-1.0; 8], &[1.0; 8]);
        let act = boxed(&[-1.0, -1.0], &[1.0, 1.0]);

        let n = Normalizer::new(&obs, &act, None).unwrap();
        assert_eq!(n.filter_reward(-0.25), -0.25);

        let o = EnvOverride::reacher_v1();
        let n = Normalizer::new(&obs, &act, Some(("Reacher-v1", &o))).unwrap();
        assert_eq!(n.filter_reward(-0.25), -50.0);
        assert_eq!(n.reward_center(), 0.0);
        assert_eq!(n.obs_scale()[6], 40.0);
        assert_eq!(n.obs_scale()[7], 20.0);
        assert_eq!(n.obs_scale()[5], 1.0);
        assert_eq!(n.obs_center()[6], 0.0);

        let obs = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 20.0, -10.0];
        assert_eq!(
            n.filter_observation(&obs).slice(s![6..8]),
            array![0.5, -0.5]
        );
    }

    #[test]
    fn override_errors() {
        let obs = boxed(&[-1.0; 4], &[1.0; 4]);
        let act = boxed(&[-1.0], &[1.0]);

        let o = EnvOverride::reacher_v1();
        assert_eq!(
            Normalizer::new(&obs, &act, Some(("Reacher-v1", &o))).unwrap_err(),
            FilterError::OverrideIndex {
                env_id: "Reacher-v1".to_string(),
                index: 6,
                dim: 4
            }
        );

        let o = EnvOverride::default().obs_scale(0, 0.0);
        assert!(matches!(
            Normalizer::new(&obs, &act, Some(("Zero-v0", &o))),
            Err(FilterError::OverrideScale { .. })
        ));
    }

    #[test]
    fn round_trip_check() {
        let raw = boxed(&[-2.0, 0.0], &[2.0, 1.0]);
        let n = Normalizer::new(&boxed(&[0.0], &[1.0]), &raw, None).unwrap();
        let unit = BoxSpace::symmetric_unit(2);
        assert!(n.check_action_round_trip(&unit, &raw).is_ok());

        let other = boxed(&[-2.0, 0.0], &[2.0, 2.0]);
        assert_eq!(
            n.check_action_round_trip(&unit, &other).unwrap_err(),
            FilterError::RoundTrip {
                bound: "high",
                expected: vec![2.0, 2.0],
                actual: vec![2.0, 1.0],
            }
        );
    }
}

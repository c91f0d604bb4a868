//! Discretisation of the model dynamics.
//!
//! For each path and component, in the component's update space:
//!
//! ```text
//! y_{k+1} = y_k + mu(t_k, X_k) dt_k + lambda(t_k, X_k) . dW_k
//! ```
//!
//! The predictor-corrector variant replaces `mu(t_k, X_k)` by the average of
//! the drift at `X_k` and at the Euler predictor, except for models whose
//! single step is already exact ([`TermStructureModel::exact_step`]). No
//! flooring is applied: a non-finite result aborts the step.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tenor_core::types::SimulationError;
use tenor_models::models::TermStructureModel;

use crate::rng::BrownianDriver;

/// Drift evaluation of the scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeKind {
    /// Drift at the start of the step.
    #[default]
    Euler,
    /// Drift averaged between the start state and the Euler predictor.
    PredictorCorrector,
}

/// Per-thread buffers for one path update.
struct Scratch {
    drift: Vec<f64>,
    predicted_drift: Vec<f64>,
    diffusion: Vec<f64>,
    update: Vec<f64>,
    loading: Vec<f64>,
}

impl Scratch {
    fn new(n_components: usize, n_factors: usize) -> Self {
        Self {
            drift: vec![0.0; n_components],
            predicted_drift: vec![0.0; n_components],
            diffusion: vec![0.0; n_components],
            update: vec![0.0; n_components],
            loading: vec![0.0; n_factors],
        }
    }
}

/// Euler scheme over all paths of a driver.
///
/// # Examples
///
/// ```rust
/// use tenor_pricing::mc::{EulerScheme, SchemeKind};
///
/// let scheme = EulerScheme::default();
/// assert_eq!(scheme.kind(), SchemeKind::Euler);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EulerScheme {
    kind: SchemeKind,
}

impl EulerScheme {
    /// Scheme with the given drift evaluation.
    #[inline]
    pub fn new(kind: SchemeKind) -> Self {
        Self { kind }
    }

    /// Drift evaluation in use.
    #[inline]
    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    /// Advance every path over step `time_index`.
    ///
    /// `current` and `next` hold the states of all paths, path-major with
    /// `model.n_components()` values per path.
    ///
    /// # Errors
    ///
    /// `NumericalInstability` for the lowest path index whose new state has
    /// a non-finite component.
    pub fn step<M>(
        &self,
        model: &M,
        driver: &BrownianDriver,
        time_index: usize,
        current: &[f64],
        next: &mut [f64],
    ) -> Result<(), SimulationError>
    where
        M: TermStructureModel + ?Sized,
    {
        let n = model.n_components();
        let f = model.n_factors();
        let dt = model.time_grid().dt(time_index);
        let correct = self.kind == SchemeKind::PredictorCorrector && !model.exact_step();

        next.par_chunks_mut(n)
            .zip(current.par_chunks(n))
            .enumerate()
            .for_each_init(
                || Scratch::new(n, f),
                |scratch, (path, (out, state))| {
                    let dw = driver.increments(path, time_index);
                    model.drift(time_index, state, &mut scratch.drift);

                    for c in 0..n {
                        model.factor_loading(time_index, c, state, &mut scratch.loading);
                        scratch.diffusion[c] = scratch.loading.iter().zip(dw).map(|(l, w)| l * w).sum();
                        scratch.update[c] = model.state_space(c).to_update_space(state[c]);
                        out[c] = model.state_space(c).from_update_space(
                            scratch.update[c] + scratch.drift[c] * dt + scratch.diffusion[c],
                        );
                    }

                    if correct {
                        model.drift(time_index, out, &mut scratch.predicted_drift);
                        for c in 0..n {
                            let mean_drift = 0.5 * (scratch.drift[c] + scratch.predicted_drift[c]);
                            out[c] = model.state_space(c).from_update_space(
                                scratch.update[c] + mean_drift * dt + scratch.diffusion[c],
                            );
                        }
                    }
                },
            );

        let unstable = next
            .par_chunks(n)
            .enumerate()
            .find_first(|(_, s)| s.iter().any(|v| !v.is_finite()));
        if let Some((path, s)) = unstable {
            let value = s.iter().copied().find(|v| !v.is_finite()).unwrap_or(f64::NAN);
            return Err(SimulationError::NumericalInstability {
                time_index: time_index + 1,
                path,
                quantity: "state",
                value,
            });
        }
        Ok(())
    }
}

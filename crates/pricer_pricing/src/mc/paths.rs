//! Heston path simulation.
//!
//! Variance follows the configured Euler discretisation (full truncation by
//! default) and the asset follows a log-Euler step driven by the pre-update
//! truncated variance:
//!
//! ```text
//! v'    = max(v + kappa (theta - v⁺) dt + sigma_v sqrt(v⁺) w2 sqrt(dt), 0)
//! ln S' = ln S + (r - q - v⁺/2) dt + sqrt(v⁺) w1 sqrt(dt)
//! ```
//!
//! # Antithetic coupling
//!
//! Each outer iteration draws one normal pair `(z1, z2)`. The first leg uses
//! it for its first step, the antithetic leg uses `(-z1, -z2)`; every later
//! step of either leg draws a fresh pair. Random numbers are consumed in the
//! order: pair, first leg steps 2..n, second leg steps 2..n.

use pricer_models::models::{HestonModel, HestonState};

use crate::rng::PricerRng;

/// Simulates terminal Heston states for one set of market inputs.
///
/// # Examples
///
/// ```rust
/// use pricer_models::models::{HestonModel, HestonParams, VarianceScheme};
/// use pricer_pricing::mc::HestonPathSimulator;
/// use pricer_pricing::rng::PricerRng;
///
/// let params = HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap();
/// let model = HestonModel::new(params, VarianceScheme::FullTruncation).unwrap();
/// let simulator = HestonPathSimulator::new(model, 100.0, 0.01, 0.0, 0.5, 40);
///
/// let mut rng = PricerRng::from_seed(42);
/// let mut terminals = Vec::new();
/// simulator.simulate(&mut rng, 10, true, |state| terminals.push(state.spot()));
/// assert_eq!(terminals.len(), 20);
/// assert!(terminals.iter().all(|s| *s > 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct HestonPathSimulator {
    model: HestonModel,
    spot: f64,
    carry_drift: f64,
    n_steps: usize,
    dt: f64,
    sqrt_dt: f64,
}

impl HestonPathSimulator {
    /// Creates a simulator for spot `spot`, rate `rate`, carry yield `carry`
    /// and a horizon of `maturity` years split into `n_steps` equal steps.
    ///
    /// Inputs are assumed validated by the caller (positive spot and
    /// maturity, `n_steps >= 1`).
    pub fn new(
        model: HestonModel,
        spot: f64,
        rate: f64,
        carry: f64,
        maturity: f64,
        n_steps: usize,
    ) -> Self {
        let dt = maturity / n_steps as f64;
        Self {
            model,
            spot,
            carry_drift: rate - carry,
            n_steps,
            dt,
            sqrt_dt: dt.sqrt(),
        }
    }

    /// The underlying model.
    #[inline]
    pub fn model(&self) -> &HestonModel {
        &self.model
    }

    /// Time step `T / n_steps`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of steps per leg.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Path state at t = 0, with the initial variance floored.
    #[inline]
    pub fn initial_state(&self) -> HestonState {
        HestonState::new(self.spot, self.model.params().v0)
    }

    /// Runs `outer_iterations` outer iterations and hands every terminal state
    /// to `terminal`, in generation order.
    pub fn simulate<F>(
        &self,
        rng: &mut PricerRng,
        outer_iterations: usize,
        antithetic: bool,
        terminal: F,
    ) where
        F: FnMut(&HestonState),
    {
        self.simulate_with_observer(rng, outer_iterations, antithetic, |_, _| {}, terminal);
    }

    /// Like [`simulate`](Self::simulate), additionally reporting every
    /// intermediate state to `observer` as `(step, state)`.
    ///
    /// Step 0 is the initial state; step `n_steps` is the terminal state.
    pub fn simulate_with_observer<O, F>(
        &self,
        rng: &mut PricerRng,
        outer_iterations: usize,
        antithetic: bool,
        mut observer: O,
        mut terminal: F,
    ) where
        O: FnMut(usize, &HestonState),
        F: FnMut(&HestonState),
    {
        for _ in 0..outer_iterations {
            let (z1, z2) = rng.gen_normal_pair();

            let state = self.run_leg(rng, (z1, z2), &mut observer);
            terminal(&state);

            if antithetic {
                let state = self.run_leg(rng, (-z1, -z2), &mut observer);
                terminal(&state);
            }
        }
    }

    /// Evolves one leg; `first` drives step 1, later steps draw fresh shocks.
    fn run_leg<O>(&self, rng: &mut PricerRng, first: (f64, f64), observer: &mut O) -> HestonState
    where
        O: FnMut(usize, &HestonState),
    {
        let mut state = self.initial_state();
        observer(0, &state);

        let (mut z1, mut z2) = first;
        for step in 1..=self.n_steps {
            if step > 1 {
                (z1, z2) = rng.gen_normal_pair();
            }
            state = self
                .model
                .step(state, self.carry_drift, self.dt, self.sqrt_dt, z1, z2);
            observer(step, &state);
        }
        state
    }
}

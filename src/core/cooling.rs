//! Cooling schedules for the annealer.
//!
//! A schedule maps the current iteration onto a temperature, given the
//! run's initial temperature, final temperature, and iteration budget.
//! All three schedules start at the initial temperature and approach
//! the final temperature as the budget runs out; they differ in the
//! shape of the descent.

/// Temperature schedule shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoolingSchedule {
    /// Geometric decay: `T(k) = T0 * (Tf / T0)^(k / n)`.
    ///
    /// Equal multiplicative steps; drops quickly in absolute terms
    /// early on.
    Exponential,

    /// Reciprocal descent: `T(k) = a / (k + 1) + b` with
    /// `a = (T0 - Tf) * (n + 1) / n` and `b = T0 - a`.
    ///
    /// Spends most of the budget at low temperatures.
    Sigmoid,

    /// Half-cosine ramp: `T(k) = Tf + (T0 - Tf) * (1 + cos(pi * k / n)) / 2`.
    ///
    /// Slow at both ends, steepest in the middle of the run.
    Cosine,
}

impl CoolingSchedule {
    /// All schedules, in the order the sweep iterates them.
    pub const ALL: &'static [CoolingSchedule] = &[
        CoolingSchedule::Exponential,
        CoolingSchedule::Sigmoid,
        CoolingSchedule::Cosine,
    ];

    /// Short stable name, used in sweep output file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exponential => "exp",
            Self::Sigmoid => "sigmoid",
            Self::Cosine => "cos",
        }
    }

    /// Temperature at iteration `k` of a run cooling from `initial` to
    /// `final_t` over `total_iters` iterations.
    ///
    /// `k` past the budget is clamped to the budget, so the schedule
    /// bottoms out instead of overshooting.
    pub fn temperature_at(
        &self,
        initial: f64,
        final_t: f64,
        total_iters: usize,
        k: usize,
    ) -> f64 {
        let n = total_iters.max(1) as f64;
        let k = (k.min(total_iters)) as f64;

        match self {
            Self::Exponential => initial * (final_t / initial).powf(k / n),
            Self::Sigmoid => {
                let delta = initial - final_t;
                let a = delta * (n + 1.0) / n;
                let b = initial - a;
                a / (k + 1.0) + b
            }
            Self::Cosine => {
                let delta = initial - final_t;
                final_t + delta * (1.0 + (std::f64::consts::PI * k / n).cos()) / 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: f64 = 800.0;
    const TF: f64 = 1e-6;
    const N: usize = 10_000;

    #[test]
    fn test_names_are_stable() {
        assert_eq!(CoolingSchedule::Exponential.name(), "exp");
        assert_eq!(CoolingSchedule::Sigmoid.name(), "sigmoid");
        assert_eq!(CoolingSchedule::Cosine.name(), "cos");
    }

    #[test]
    fn test_all_lists_every_schedule() {
        assert_eq!(CoolingSchedule::ALL.len(), 3);
    }

    #[test]
    fn test_starts_at_initial_temperature() {
        for schedule in CoolingSchedule::ALL {
            let t = schedule.temperature_at(T0, TF, N, 0);
            assert!(
                (t - T0).abs() < 1e-9,
                "{} starts at {} instead of {}",
                schedule.name(),
                t,
                T0
            );
        }
    }

    #[test]
    fn test_approaches_final_temperature() {
        for schedule in CoolingSchedule::ALL {
            let t = schedule.temperature_at(T0, TF, N, N);
            // Loose bound so floating-point rounding differences
            // between the three forms do not matter.
            assert!(
                t < T0 * 1e-3,
                "{} ends at {} which is not near {}",
                schedule.name(),
                t,
                TF
            );
        }
    }

    #[test]
    fn test_cosine_hits_final_exactly() {
        let t = CoolingSchedule::Cosine.temperature_at(T0, TF, N, N);
        assert!((t - TF).abs() < 1e-9);
    }

    #[test]
    fn test_exponential_hits_final_exactly() {
        let t = CoolingSchedule::Exponential.temperature_at(T0, TF, N, N);
        assert!((t - TF).abs() / TF < 1e-6);
    }

    #[test]
    fn test_monotone_non_increasing() {
        for schedule in CoolingSchedule::ALL {
            let mut prev = f64::INFINITY;
            for k in (0..=N).step_by(97) {
                let t = schedule.temperature_at(T0, TF, N, k);
                assert!(
                    t <= prev + 1e-9,
                    "{} increased at k={}",
                    schedule.name(),
                    k
                );
                prev = t;
            }
        }
    }

    #[test]
    fn test_clamps_past_budget() {
        for schedule in CoolingSchedule::ALL {
            let at_end = schedule.temperature_at(T0, TF, N, N);
            let past_end = schedule.temperature_at(T0, TF, N, N * 2);
            assert_eq!(at_end, past_end, "{} overshoots", schedule.name());
        }
    }

    #[test]
    fn test_sigmoid_matches_closed_form() {
        // Spot-check the reciprocal form against its definition.
        let n = 100usize;
        let k = 24usize;
        let delta = T0 - TF;
        let a = delta * (n as f64 + 1.0) / n as f64;
        let b = T0 - a;
        let expected = a / (k as f64 + 1.0) + b;
        let got = CoolingSchedule::Sigmoid.temperature_at(T0, TF, n, k);
        assert!((got - expected).abs() < 1e-12);
    }
}

//! Simulated-annealing TSP solver.
//!
//! The solver walks a swap neighborhood over tours: each step perturbs
//! the current tour with a handful of random position swaps, accepts
//! improvements unconditionally and worsenings with probability
//! `exp(-delta / T)`, and re-derives the temperature from the cooling
//! schedule on a fixed iteration cadence. Every step yields one
//! [`RunSample`], which is exactly what the run log format stores.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::cooling::CoolingSchedule;
use super::run_log::RunSample;

/// Configuration for one annealing run.
///
/// Built with the `with_*` methods and checked by [`validate`] before
/// the run starts.
///
/// [`validate`]: AnnealerConfig::validate
#[derive(Debug, Clone)]
pub struct AnnealerConfig {
    /// Starting temperature. Higher values accept more worsening moves early on.
    pub initial_temperature: f64,

    /// Temperature floor. Below this no worsening move is accepted.
    pub final_temperature: f64,

    /// Total iteration budget for the run.
    pub total_iterations: usize,

    /// How many iterations run at each temperature level before the
    /// schedule is consulted again.
    pub iterations_per_temperature: usize,

    /// Upper bound on random position swaps per proposed move (at least 1).
    pub max_swaps_per_move: usize,

    /// Temperature descent shape.
    pub cooling: CoolingSchedule,

    /// Random seed for reproducibility. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Emit every n-th sample when driving a full run to a sink.
    /// 1 logs every step.
    pub log_every: usize,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 200.0,
            final_temperature: 1e-5,
            total_iterations: 1_000_000,
            iterations_per_temperature: 10,
            max_swaps_per_move: 5,
            cooling: CoolingSchedule::Exponential,
            seed: None,
            log_every: 1,
        }
    }
}

impl AnnealerConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_total_iterations(mut self, n: usize) -> Self {
        self.total_iterations = n;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.final_temperature <= 0.0 {
            return Err("final_temperature must be positive".into());
        }
        if self.final_temperature >= self.initial_temperature {
            return Err("final_temperature must be less than initial_temperature".into());
        }
        if self.total_iterations == 0 {
            return Err("total_iterations must be positive".into());
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be positive".into());
        }
        if self.max_swaps_per_move == 0 {
            return Err("max_swaps_per_move must be at least 1".into());
        }
        if self.log_every == 0 {
            return Err("log_every must be at least 1".into());
        }
        Ok(())
    }
}

/// Cyclic tour length over a distance matrix: the last city connects
/// back to the first.
pub fn tour_distance(matrix: &[Vec<f64>], tour: &[usize]) -> f64 {
    let size = tour.len();
    let mut dist = 0.0;
    for from_index in 0..size {
        let from = tour[from_index];
        let to = tour[(from_index + 1) % size];
        dist += matrix[from][to];
    }
    dist
}

/// A running simulated-annealing search over one distance matrix.
pub struct Annealer {
    matrix: Vec<Vec<f64>>,
    tour: Vec<usize>,
    current_distance: f64,
    temperature: f64,
    iteration: usize,
    iters_on_temp: usize,
    config: AnnealerConfig,
    rng: StdRng,
}

impl Annealer {
    /// Create a solver over the given distance matrix, starting from a
    /// randomly shuffled tour.
    ///
    /// Fails on an invalid configuration or a matrix that is not
    /// square with at least two cities.
    pub fn new(matrix: Vec<Vec<f64>>, config: AnnealerConfig) -> Result<Self, String> {
        config.validate()?;
        if matrix.len() < 2 {
            return Err("distance matrix needs at least two cities".into());
        }
        if matrix.iter().any(|row| row.len() != matrix.len()) {
            return Err("distance matrix must be square".into());
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut tour: Vec<usize> = (0..matrix.len()).collect();
        tour.shuffle(&mut rng);
        let current_distance = tour_distance(&matrix, &tour);
        let temperature = config.initial_temperature;

        Ok(Self {
            matrix,
            tour,
            current_distance,
            temperature,
            iteration: 0,
            iters_on_temp: 0,
            config,
            rng,
        })
    }

    /// Perform one annealing step.
    ///
    /// Returns the sample describing the state after the step, or
    /// `None` once the iteration budget is exhausted. The sample's
    /// temperature is the one the acceptance decision was made at.
    pub fn step(&mut self) -> Option<RunSample> {
        if self.is_finished() {
            return None;
        }

        let step_temperature = self.temperature;
        let swaps = self.rng.gen_range(1..=self.config.max_swaps_per_move);
        let candidate = self.permuted_tour(swaps);
        let candidate_distance = tour_distance(&self.matrix, &candidate);

        if candidate_distance < self.current_distance || self.should_accept(candidate_distance) {
            self.current_distance = candidate_distance;
            self.tour = candidate;
        }

        let k = self.iteration;
        self.iteration += 1;
        self.iters_on_temp += 1;
        if self.iters_on_temp >= self.config.iterations_per_temperature {
            self.iters_on_temp = 0;
            self.temperature = self.config.cooling.temperature_at(
                self.config.initial_temperature,
                self.config.final_temperature,
                self.config.total_iterations,
                self.iteration,
            );
        }

        Some(RunSample::new(
            k as u64,
            self.current_distance,
            step_temperature,
        ))
    }

    /// Drive the run to the end of its budget.
    ///
    /// `on_sample` receives every `log_every`-th sample; the final
    /// distance is returned regardless of the stride.
    pub fn run<F: FnMut(RunSample)>(&mut self, mut on_sample: F) -> Option<RunSample> {
        let every = self.config.log_every as u64;
        let mut last = None;
        while let Some(sample) = self.step() {
            if sample.iteration % every == 0 || self.is_finished() {
                on_sample(sample);
            }
            last = Some(sample);
        }
        if let Some(sample) = last {
            log::debug!(
                "annealing finished after {} iterations, distance {:.3}",
                sample.iteration + 1,
                sample.distance
            );
        }
        last
    }

    /// Whether the iteration budget is exhausted.
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.config.total_iterations
    }

    /// Tour length of the current solution.
    pub fn current_distance(&self) -> f64 {
        self.current_distance
    }

    /// Temperature the next step will run at.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Iterations performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current tour, as matrix indices.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    fn should_accept(&mut self, candidate_distance: f64) -> bool {
        if self.temperature <= self.config.final_temperature {
            return false;
        }
        let delta = candidate_distance - self.current_distance;
        let prob = (-delta / self.temperature).exp();
        self.rng.gen_range(0.0..=1.0) <= prob
    }

    /// Copy of the current tour with `swaps` random pair swaps applied.
    fn permuted_tour(&mut self, swaps: usize) -> Vec<usize> {
        let size = self.tour.len();
        let mut candidate = self.tour.clone();

        for _ in 0..swaps {
            let first = self.rng.gen_range(0..size);
            let second = loop {
                let index = self.rng.gen_range(0..size);
                if index != first {
                    break index;
                }
            };
            candidate.swap(first, second);
        }

        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square: optimal tour length is 4.0.
    fn square_matrix() -> Vec<Vec<f64>> {
        let points: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut matrix = vec![vec![0.0; 4]; 4];
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate() {
                let (dx, dy) = (b.0 - a.0, b.1 - a.1);
                matrix[i][j] = (dx * dx + dy * dy).sqrt();
            }
        }
        matrix
    }

    fn small_config() -> AnnealerConfig {
        AnnealerConfig::default()
            .with_initial_temperature(10.0)
            .with_final_temperature(0.001)
            .with_total_iterations(2_000)
            .with_iterations_per_temperature(10)
            .with_seed(42)
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperatures() {
        assert!(AnnealerConfig::default()
            .with_initial_temperature(-1.0)
            .validate()
            .is_err());
        assert!(AnnealerConfig::default()
            .with_initial_temperature(1.0)
            .with_final_temperature(2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(AnnealerConfig::default()
            .with_total_iterations(0)
            .validate()
            .is_err());
        assert!(AnnealerConfig::default()
            .with_iterations_per_temperature(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_tour_distance_square() {
        let matrix = square_matrix();
        assert!((tour_distance(&matrix, &[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
        // Crossing diagonals is longer.
        let crossed = tour_distance(&matrix, &[0, 2, 1, 3]);
        assert!(crossed > 4.0);
    }

    #[test]
    fn test_new_rejects_bad_matrix() {
        assert!(Annealer::new(vec![], small_config()).is_err());
        assert!(Annealer::new(vec![vec![0.0; 2]; 1], small_config()).is_err());
        assert!(Annealer::new(vec![vec![0.0; 3], vec![0.0; 2]], small_config()).is_err());
    }

    #[test]
    fn test_step_exhausts_budget() {
        let config = small_config().with_total_iterations(5);
        let mut annealer = Annealer::new(square_matrix(), config).unwrap();

        for expected in 0..5u64 {
            let sample = annealer.step().unwrap();
            assert_eq!(sample.iteration, expected);
        }
        assert!(annealer.is_finished());
        assert!(annealer.step().is_none());
    }

    #[test]
    fn test_tour_stays_a_permutation() {
        let mut annealer = Annealer::new(square_matrix(), small_config()).unwrap();
        for _ in 0..200 {
            annealer.step();
        }
        let mut tour = annealer.tour().to_vec();
        tour.sort_unstable();
        assert_eq!(tour, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut first = Annealer::new(square_matrix(), small_config()).unwrap();
        let mut second = Annealer::new(square_matrix(), small_config()).unwrap();

        for _ in 0..500 {
            assert_eq!(first.step(), second.step());
        }
        assert_eq!(first.tour(), second.tour());
    }

    #[test]
    fn test_temperature_never_increases() {
        let mut annealer = Annealer::new(square_matrix(), small_config()).unwrap();
        let mut prev = f64::INFINITY;
        while let Some(sample) = annealer.step() {
            assert!(sample.temperature <= prev + 1e-9);
            prev = sample.temperature;
        }
    }

    #[test]
    fn test_converges_on_tiny_instance() {
        // 2000 seeded iterations on a unit square reliably find the
        // optimal 4.0 tour.
        let mut annealer = Annealer::new(square_matrix(), small_config()).unwrap();
        let last = annealer.run(|_| {}).unwrap();
        assert!((last.distance - 4.0).abs() < 1e-9);
        assert!((annealer.current_distance() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_applies_log_stride() {
        let config = small_config().with_total_iterations(100).with_log_every(10);
        let mut annealer = Annealer::new(square_matrix(), config).unwrap();

        let mut logged = Vec::new();
        annealer.run(|s| logged.push(s.iteration));

        // Iterations 0, 10, ..., 90 plus the final sample (99).
        assert_eq!(logged.len(), 11);
        assert_eq!(logged[0], 0);
        assert_eq!(*logged.last().unwrap(), 99);
    }

    #[test]
    fn test_distance_matches_tour() {
        let mut annealer = Annealer::new(square_matrix(), small_config()).unwrap();
        for _ in 0..100 {
            annealer.step();
        }
        let recomputed = tour_distance(&square_matrix(), annealer.tour());
        assert!((annealer.current_distance() - recomputed).abs() < 1e-9);
    }
}

//! Run log data structures.
//!
//! This module defines the core data structures for representing
//! simulated-annealing run logs: the per-iteration sample triple and
//! labeled distance collections used for configuration comparison.

use std::path::Path;

/// One parsed sample from a run log.
///
/// A sample records the state of the annealing process at a single
/// simulation step. Samples are constructed once per parsed line and
/// never mutated afterwards. Files are assumed to store samples in
/// non-decreasing iteration order; nothing in this crate sorts or
/// verifies that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSample {
    /// Simulation step at which the sample was taken
    pub iteration: u64,
    /// Tour length (cost metric) at that step
    pub distance: f64,
    /// Annealing temperature at that step
    pub temperature: f64,
}

impl RunSample {
    /// Create a new sample.
    pub fn new(iteration: u64, distance: f64, temperature: f64) -> Self {
        Self {
            iteration,
            distance,
            temperature,
        }
    }
}

/// Inclusive iteration range covered by a sample sequence.
///
/// Returns `None` for an empty sequence. Assumes file order; the result
/// is `(first, last)`, not `(min, max)`.
pub fn iteration_bounds(samples: &[RunSample]) -> Option<(u64, u64)> {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => Some((first.iteration, last.iteration)),
        _ => None,
    }
}

/// Minimum and maximum distance over a sample sequence.
pub fn distance_bounds(samples: &[RunSample]) -> Option<(f64, f64)> {
    value_bounds(samples.iter().map(|s| s.distance))
}

/// Minimum and maximum temperature over a sample sequence.
pub fn temperature_bounds(samples: &[RunSample]) -> Option<(f64, f64)> {
    value_bounds(samples.iter().map(|s| s.temperature))
}

/// Index of the sample with the lowest distance.
///
/// Ties resolve to the earliest sample.
pub fn best_sample_index(samples: &[RunSample]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, sample) in samples.iter().enumerate() {
        match best {
            Some((_, d)) if sample.distance >= d => {}
            _ => best = Some((i, sample.distance)),
        }
    }
    best.map(|(i, _)| i)
}

fn value_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for v in values {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(v), max.max(v)),
            None => (v, v),
        });
    }
    bounds
}

/// A labeled collection of final distances from repeated runs of one
/// experiment configuration.
///
/// Groups are what the comparison view box-plots against each other.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceGroup {
    /// Display label for this configuration
    pub label: String,
    /// Final distance of each repeated run
    pub values: Vec<f64>,
}

impl DistanceGroup {
    /// Create a group with an explicit label.
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Create a group labeled after the file it was loaded from.
    ///
    /// The label is the file stem (`data/inst_51_exp_on_temp_10.txt`
    /// becomes `inst_51_exp_on_temp_10`), falling back to the full path
    /// text when there is no stem.
    pub fn from_path(path: &Path, values: Vec<f64>) -> Self {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { label, values }
    }

    /// Number of runs in this group.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the group holds no runs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_run() -> Vec<RunSample> {
        vec![
            RunSample::new(0, 900.0, 10.0),
            RunSample::new(10, 450.0, 8.0),
            RunSample::new(20, 600.0, 6.0),
            RunSample::new(30, 450.0, 4.0),
        ]
    }

    #[test]
    fn test_iteration_bounds_uses_file_order() {
        let samples = sample_run();
        assert_eq!(iteration_bounds(&samples), Some((0, 30)));
        assert_eq!(iteration_bounds(&[]), None);
    }

    #[test]
    fn test_distance_bounds() {
        let samples = sample_run();
        assert_eq!(distance_bounds(&samples), Some((450.0, 900.0)));
    }

    #[test]
    fn test_temperature_bounds() {
        let samples = sample_run();
        assert_eq!(temperature_bounds(&samples), Some((4.0, 10.0)));
    }

    #[test]
    fn test_best_sample_index_prefers_earliest_tie() {
        let samples = sample_run();
        // 450.0 occurs at indices 1 and 3; the earlier one wins.
        assert_eq!(best_sample_index(&samples), Some(1));
        assert_eq!(best_sample_index(&[]), None);
    }

    #[test]
    fn test_group_label_from_path() {
        let path = PathBuf::from("data/runs/inst_51_exp_on_temp_10.txt");
        let group = DistanceGroup::from_path(&path, vec![1.0, 2.0]);
        assert_eq!(group.label, "inst_51_exp_on_temp_10");
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
    }
}

//! Filter state for chart series visibility.
//!
//! This module defines the filter state used to control which of the
//! two run series (distance, temperature) are displayed in the chart
//! view.

/// The two series a run log carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Series {
    /// Tour length over iterations
    Distance,
    /// Annealing temperature over iterations
    Temperature,
}

/// Filter state for controlling series visibility in the run view.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Whether to show the distance panel
    pub show_distance: bool,
    /// Whether to show the temperature panel
    pub show_temperature: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_distance: true,
            show_temperature: true,
        }
    }
}

impl FilterState {
    /// Create a new filter state with both series visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the filter to show both series.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if a series is visible.
    pub fn is_visible(&self, series: Series) -> bool {
        match series {
            Series::Distance => self.show_distance,
            Series::Temperature => self.show_temperature,
        }
    }

    /// Count how many series are currently enabled.
    pub fn enabled_count(&self) -> u32 {
        let mut count = 0;
        if self.show_distance {
            count += 1;
        }
        if self.show_temperature {
            count += 1;
        }
        count
    }

    /// Check if a specific series can be disabled.
    /// Returns false if this is the last enabled series (to prevent an empty view).
    pub fn can_disable(&self, series: Series) -> bool {
        !self.is_visible(series) || self.enabled_count() > 1
    }

    /// Set the visibility of a specific series.
    /// Returns true if the change was applied, false if it would leave no series enabled.
    pub fn set_visible(&mut self, series: Series, visible: bool) -> bool {
        // Always allow enabling
        if visible {
            match series {
                Series::Distance => self.show_distance = true,
                Series::Temperature => self.show_temperature = true,
            }
            return true;
        }

        if !self.can_disable(series) {
            return false;
        }

        match series {
            Series::Distance => self.show_distance = false,
            Series::Temperature => self.show_temperature = false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_state() {
        let filter = FilterState::default();
        assert!(filter.show_distance);
        assert!(filter.show_temperature);
        assert_eq!(filter.enabled_count(), 2);
    }

    #[test]
    fn test_is_visible() {
        let mut filter = FilterState::new();
        assert!(filter.is_visible(Series::Distance));
        assert!(filter.is_visible(Series::Temperature));

        filter.show_temperature = false;
        assert!(filter.is_visible(Series::Distance));
        assert!(!filter.is_visible(Series::Temperature));
    }

    #[test]
    fn test_cannot_disable_last_series() {
        let mut filter = FilterState::new();

        assert!(filter.set_visible(Series::Distance, false));
        assert!(!filter.show_distance);

        // Temperature is the only series left; disabling it must fail.
        assert!(!filter.set_visible(Series::Temperature, false));
        assert!(filter.show_temperature);
    }

    #[test]
    fn test_can_disable_reports_enabled_state() {
        let mut filter = FilterState::new();
        assert!(filter.can_disable(Series::Distance));
        assert!(filter.can_disable(Series::Temperature));

        filter.show_distance = false;
        assert!(!filter.can_disable(Series::Temperature));
        // A disabled series can always be "disabled" (no-op) per the
        // enable-anytime rule.
        assert!(filter.can_disable(Series::Distance));
    }

    #[test]
    fn test_reenable_after_disable() {
        let mut filter = FilterState::new();
        filter.set_visible(Series::Temperature, false);
        assert!(filter.set_visible(Series::Temperature, true));
        assert_eq!(filter.enabled_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut filter = FilterState::new();
        filter.set_visible(Series::Distance, false);
        filter.reset();
        assert!(filter.show_distance);
        assert!(filter.show_temperature);
    }
}

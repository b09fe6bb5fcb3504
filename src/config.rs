//! Configuration management for roster queries

use crate::error::{RosterError, RosterResult};
use crate::model::SchoolYear;
use crate::ordering::OrderKey;

/// Main configuration structure for roster queries
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// Rule to order the listing by (id when unset)
    pub order: Option<OrderKey>,
    /// Descending instead of ascending order
    pub reverse: bool,
    /// Inclusive bounds on the start of the first school year
    pub starting_between: Option<(i32, i32)>,
    /// Inclusive bounds on the end of the last school year
    pub finishing_between: Option<(i32, i32)>,
    /// Group students by their start year
    pub group_by_start_year: bool,
    /// Count course lengths among students starting in this year
    pub course_lengths_for: Option<SchoolYear>,
    /// Count country codes among students starting in this year
    pub country_codes_for: Option<SchoolYear>,
    /// Check whether the roster is already ordered instead of ordering it
    pub check: bool,
    /// Sort in parallel once this many records are involved
    pub parallel_threshold: Option<usize>,
    /// Number of worker threads for parallel sorting
    pub parallel_threads: Option<usize>,
    /// Debug mode (verbose logging)
    pub debug: bool,
}

impl QueryConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering key
    pub fn with_order(mut self, order: Option<OrderKey>) -> Self {
        self.order = order;
        self
    }

    /// Enable reverse ordering
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Filter by start year range
    pub fn with_starting_between(mut self, range: Option<(i32, i32)>) -> Self {
        self.starting_between = range;
        self
    }

    /// Filter by end year range
    pub fn with_finishing_between(mut self, range: Option<(i32, i32)>) -> Self {
        self.finishing_between = range;
        self
    }

    /// Enable grouping by start year
    pub fn with_group_by_start_year(mut self, group: bool) -> Self {
        self.group_by_start_year = group;
        self
    }

    /// Count course lengths for a start year
    pub fn with_course_lengths_for(mut self, year: Option<SchoolYear>) -> Self {
        self.course_lengths_for = year;
        self
    }

    /// Count country codes for a start year
    pub fn with_country_codes_for(mut self, year: Option<SchoolYear>) -> Self {
        self.country_codes_for = year;
        self
    }

    /// Enable check mode
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Set parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: Option<usize>) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set parallel threads
    pub fn with_parallel_threads(mut self, threads: Option<usize>) -> Self {
        self.parallel_threads = threads;
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> RosterResult<()> {
        if self.reverse && self.order.is_none() {
            return Err(RosterError::conflicting_options(
                "--reverse requires --order",
            ));
        }

        if self.check && self.order.is_none() {
            return Err(RosterError::conflicting_options(
                "--check requires --order",
            ));
        }

        if self.check
            && (self.starting_between.is_some()
                || self.finishing_between.is_some()
                || self.group_by_start_year
                || self.course_lengths_for.is_some()
                || self.country_codes_for.is_some())
        {
            return Err(RosterError::conflicting_options(
                "--check cannot be combined with filters, grouping or counts",
            ));
        }

        if let Some(threshold) = self.parallel_threshold {
            if threshold < 2 {
                return Err(RosterError::conflicting_options(
                    "parallel threshold must be at least 2",
                ));
            }
        }

        // Validate thread count
        if let Some(threads) = self.parallel_threads {
            if threads == 0 {
                return Err(RosterError::thread_pool_error(
                    "thread count must be positive",
                ));
            }
            if threads > 1024 {
                return Err(RosterError::thread_pool_error(
                    "too many threads (maximum 1024)",
                ));
            }
        }

        Ok(())
    }

    /// Whether any query beyond the default listing was requested
    pub fn has_query(&self) -> bool {
        self.order.is_some()
            || self.starting_between.is_some()
            || self.finishing_between.is_some()
            || self.group_by_start_year
            || self.course_lengths_for.is_some()
            || self.country_codes_for.is_some()
    }

    /// Get effective thread count
    pub fn effective_thread_count(&self) -> usize {
        self.parallel_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Builder pattern for creating configurations
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: QueryConfig::default(),
        }
    }

    /// Set ordering key
    pub fn order(mut self, order: OrderKey) -> Self {
        self.config.order = Some(order);
        self
    }

    /// Enable reverse ordering
    pub fn reverse(mut self) -> Self {
        self.config.reverse = true;
        self
    }

    /// Enable check mode
    pub fn check(mut self) -> Self {
        self.config.check = true;
        self
    }

    /// Filter by start year range
    pub fn starting_between(mut self, from: i32, to: i32) -> Self {
        self.config.starting_between = Some((from, to));
        self
    }

    /// Filter by end year range
    pub fn finishing_between(mut self, from: i32, to: i32) -> Self {
        self.config.finishing_between = Some((from, to));
        self
    }

    /// Enable grouping by start year
    pub fn group_by_start_year(mut self) -> Self {
        self.config.group_by_start_year = true;
        self
    }

    /// Count course lengths for a start year
    pub fn course_lengths_for(mut self, year: SchoolYear) -> Self {
        self.config.course_lengths_for = Some(year);
        self
    }

    /// Count country codes for a start year
    pub fn country_codes_for(mut self, year: SchoolYear) -> Self {
        self.config.country_codes_for = Some(year);
        self
    }

    /// Set parallel threshold
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = Some(threshold);
        self
    }

    /// Enable debug mode
    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> RosterResult<QueryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for QueryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset configurations for common use cases
pub mod presets {
    use super::*;

    /// Listing ordered by id
    pub fn by_id() -> QueryConfig {
        QueryConfig::new().with_order(Some(OrderKey::Id))
    }

    /// Listing ordered by name, ties broken by id
    pub fn by_name() -> QueryConfig {
        QueryConfig::new().with_order(Some(OrderKey::NameThenId))
    }

    /// Per-year breakdown: grouping plus both counts for `year`
    pub fn year_summary(year: SchoolYear) -> QueryConfig {
        QueryConfig::new()
            .with_group_by_start_year(true)
            .with_course_lengths_for(Some(year))
            .with_country_codes_for(Some(year))
    }

    /// Parallel ordering for large rosters
    pub fn parallel(order: OrderKey) -> QueryConfig {
        QueryConfig::new()
            .with_order(Some(order))
            .with_parallel_threshold(Some(8192))
    }
}

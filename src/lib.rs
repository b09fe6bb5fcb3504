//! Query and ordering utilities over a fixed student roster
//!
//! A [`Students`] collection is built once and answers range filters,
//! grouping and counting queries in a single pass each. Ordering goes
//! through a stable top-down merge sort parametrized by an
//! [`OrderingRule`].

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod config;
pub mod model;
pub mod ordering;
pub mod merge_sort;
pub mod roster;
pub mod report;
pub mod sample;

// Re-export commonly used types
pub use error::{RosterError, RosterResult};
pub use config::{QueryConfig, QueryConfigBuilder};
pub use model::{SchoolYear, Student, StudentBuilder};
pub use ordering::{ById, ByNameThenId, OrderKey, OrderingRule, Reversed};
pub use roster::Students;

use std::io::Write;
use tracing::{debug, warn};

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const USAGE_FAILURE: i32 = 2;

/// Run every query `config` asks for against `students`, writing the
/// results to `out`.
///
/// In check mode nothing is ordered; the exit code is [`EXIT_FAILURE`] when
/// the roster is out of order.
pub fn run<W: Write>(config: &QueryConfig, students: &Students, out: &mut W) -> RosterResult<i32> {
    config.validate()?;
    debug!(records = students.len(), ?config, "running roster queries");

    if config.check {
        return match students.first_disorder(config)? {
            Some(position) => {
                writeln!(out, "disorder at record {position}")?;
                Ok(EXIT_FAILURE)
            }
            None => Ok(EXIT_SUCCESS),
        };
    }

    if let Some((from, to)) = config.starting_between {
        if from > to {
            warn!(from, to, "inverted start year range matches nothing");
        }
        let matches = students.starting_between(from, to);
        report::write_students(out, &format!("starting between {from} and {to}"), &matches)?;
    }

    if let Some((from, to)) = config.finishing_between {
        if from > to {
            warn!(from, to, "inverted end year range matches nothing");
        }
        let matches = students.finishing_between(from, to);
        report::write_students(out, &format!("finishing between {from} and {to}"), &matches)?;
    }

    if config.group_by_start_year {
        report::write_groups(out, &students.grouped_by_start_year())?;
    }

    if let Some(year) = config.course_lengths_for {
        let counts = students.count_of_course_length_for_start_year(year);
        report::write_counts(out, &format!("course lengths for start year {year}"), &counts)?;
    }

    if let Some(year) = config.country_codes_for {
        let counts = students.count_of_country_code_for_start_year(year);
        report::write_counts(out, &format!("country codes for start year {year}"), &counts)?;
    }

    if config.order.is_some() || !config.has_query() {
        let key = config.order.unwrap_or(OrderKey::Id);
        let direction = if config.reverse { "descending" } else { "ascending" };
        let ordered = students.ordered(config)?;
        report::write_students(out, &format!("ordered by {key}, {direction}"), &ordered)?;
    }

    out.flush()?;
    Ok(EXIT_SUCCESS)
}

//! Plain-text rendering of query results
//!
//! Maps are printed in ascending key order so that output does not depend
//! on hash iteration order.

use crate::model::{SchoolYear, Student};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::io::{self, Write};

/// Write a titled listing, one student per line
pub fn write_students<W: Write>(out: &mut W, title: &str, students: &[&Student]) -> io::Result<()> {
    writeln!(out, "# {title} ({})", students.len())?;
    for student in students {
        writeln!(out, "{student}")?;
    }
    Ok(())
}

/// Write students grouped by start year, earliest year first
pub fn write_groups<W: Write>(
    out: &mut W,
    groups: &HashMap<SchoolYear, Vec<&Student>>,
) -> io::Result<()> {
    writeln!(out, "# grouped by start year ({} groups)", groups.len())?;
    for (year, members) in groups.iter().sorted_by_key(|(year, _)| **year) {
        writeln!(out, "{year}:")?;
        for student in members {
            writeln!(out, "  {student}")?;
        }
    }
    Ok(())
}

/// Write a `key<TAB>count` table in ascending key order
pub fn write_counts<W, K>(out: &mut W, title: &str, counts: &HashMap<K, usize>) -> io::Result<()>
where
    W: Write,
    K: Display + Ord + Hash,
{
    writeln!(out, "# {title}")?;
    for (key, count) in counts.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        writeln!(out, "{key}\t{count}")?;
    }
    Ok(())
}

//! The fixed student collection and the queries it answers

use crate::config::QueryConfig;
use crate::error::RosterResult;
use crate::merge_sort;
use crate::model::{SchoolYear, Student};
use crate::ordering::{ById, ByNameThenId, OrderKey, OrderingRule, Reversed};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::debug;

/// A collection of students fixed at construction.
///
/// Every query returns a fresh container of shared references into the
/// collection; there is no way to add, remove or change a record.
#[derive(Debug, Clone, Default)]
pub struct Students {
    records: Vec<Student>,
}

impl Students {
    pub fn new(records: Vec<Student>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.records.iter()
    }

    /// Students whose first school year starts within `from..=to`.
    /// An inverted range (`from > to`) matches nothing.
    pub fn starting_between(&self, from: i32, to: i32) -> Vec<&Student> {
        self.filter(|s| year_between(from, to, s.start_year().start()))
    }

    /// Students whose last school year ends within `from..=to`.
    /// An inverted range (`from > to`) matches nothing.
    pub fn finishing_between(&self, from: i32, to: i32) -> Vec<&Student> {
        self.filter(|s| year_between(from, to, s.end_year().end()))
    }

    pub fn grouped_by_start_year(&self) -> HashMap<SchoolYear, Vec<&Student>> {
        self.records
            .iter()
            .map(|s| (s.start_year(), s))
            .into_group_map()
    }

    /// Number of students per course length, among those starting in `year`
    pub fn count_of_course_length_for_start_year(&self, year: SchoolYear) -> HashMap<i64, usize> {
        self.starting_in(year).map(Student::course_length).counts()
    }

    /// Number of students per country code, among those starting in `year`
    pub fn count_of_country_code_for_start_year(&self, year: SchoolYear) -> HashMap<&str, usize> {
        self.starting_in(year).map(Student::country_code).counts()
    }

    pub fn ordered_by_id(&self) -> RosterResult<Vec<&Student>> {
        self.ordered_by(&ById)
    }

    pub fn ordered_by_name_then_id(&self) -> RosterResult<Vec<&Student>> {
        self.ordered_by(&ByNameThenId::default())
    }

    /// All students ordered by an arbitrary rule
    pub fn ordered_by<R>(&self, rule: &R) -> RosterResult<Vec<&Student>>
    where
        R: OrderingRule<Student> + ?Sized,
    {
        merge_sort::sort(&self.refs(), rule)
    }

    /// All students ordered as `config` asks: its key (id by default), its
    /// direction, and in parallel once the collection reaches the
    /// configured threshold.
    pub fn ordered(&self, config: &QueryConfig) -> RosterResult<Vec<&Student>> {
        let key = config.order.unwrap_or(OrderKey::Id);
        match (key, config.reverse) {
            (OrderKey::Id, false) => self.ordered_with(&ById, config),
            (OrderKey::Id, true) => self.ordered_with(&Reversed(ById), config),
            (OrderKey::NameThenId, false) => self.ordered_with(&ByNameThenId::default(), config),
            (OrderKey::NameThenId, true) => {
                self.ordered_with(&Reversed(ByNameThenId::default()), config)
            }
        }
    }

    /// 1-based position of the first student that is out of order under the
    /// configured rule, keeping collection order
    pub fn first_disorder(&self, config: &QueryConfig) -> RosterResult<Option<usize>> {
        let refs = self.refs();
        let key = config.order.unwrap_or(OrderKey::Id);
        let position = match (key, config.reverse) {
            (OrderKey::Id, false) => merge_sort::first_disorder(&refs, &ById)?,
            (OrderKey::Id, true) => merge_sort::first_disorder(&refs, &Reversed(ById))?,
            (OrderKey::NameThenId, false) => {
                merge_sort::first_disorder(&refs, &ByNameThenId::default())?
            }
            (OrderKey::NameThenId, true) => {
                merge_sort::first_disorder(&refs, &Reversed(ByNameThenId::default()))?
            }
        };
        Ok(position.map(|index| index + 1))
    }

    fn ordered_with<R>(&self, rule: &R, config: &QueryConfig) -> RosterResult<Vec<&Student>>
    where
        R: OrderingRule<Student> + Sync,
    {
        let refs = self.refs();
        match config.parallel_threshold {
            Some(threshold) if refs.len() >= threshold => {
                debug!(len = refs.len(), threshold, "ordering in parallel");
                merge_sort::par_sort(&refs, rule, threshold)
            }
            _ => merge_sort::sort(&refs, rule),
        }
    }

    fn refs(&self) -> Vec<&Student> {
        self.records.iter().collect()
    }

    fn filter<F>(&self, predicate: F) -> Vec<&Student>
    where
        F: Fn(&Student) -> bool,
    {
        self.records.iter().filter(|s| predicate(s)).collect()
    }

    fn starting_in(&self, year: SchoolYear) -> impl Iterator<Item = &Student> {
        self.records.iter().filter(move |s| s.start_year() == year)
    }
}

impl FromIterator<Student> for Students {
    fn from_iter<I: IntoIterator<Item = Student>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Students {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Inclusive range check; empty when `from > to`
fn year_between(from: i32, to: i32, year: i32) -> bool {
    (from..=to).contains(&year)
}

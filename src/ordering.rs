//! Ordering rules that parametrize the merge sort

use crate::error::{RosterError, RosterResult};
use crate::model::Student;
use std::cmp::Ordering;
use std::str::FromStr;

/// A total preorder over `T`.
///
/// Comparison is fallible so that a rule reading an absent field fails with
/// an attributable error instead of picking an arbitrary side.
pub trait OrderingRule<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> RosterResult<Ordering>;

    /// True when `a` may be placed before `b`; ties count as "not after"
    /// so that merging keeps the left element first.
    #[inline]
    fn not_after(&self, a: &T, b: &T) -> RosterResult<bool> {
        Ok(self.compare(a, b)? != Ordering::Greater)
    }
}

impl<T: ?Sized, R: OrderingRule<T> + ?Sized> OrderingRule<T> for &R {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> RosterResult<Ordering> {
        (**self).compare(a, b)
    }
}

/// Ascending by id, lexicographically
#[derive(Debug, Clone, Copy, Default)]
pub struct ById;

impl OrderingRule<Student> for ById {
    #[inline]
    fn compare(&self, a: &Student, b: &Student) -> RosterResult<Ordering> {
        Ok(a.require_id()?.cmp(b.require_id()?))
    }
}

/// Ascending by name, then by id when names are equal
#[derive(Debug, Clone, Copy, Default)]
pub struct ByNameThenId {
    tie_break: ById,
}

impl OrderingRule<Student> for ByNameThenId {
    #[inline]
    fn compare(&self, a: &Student, b: &Student) -> RosterResult<Ordering> {
        match a.require_name()?.cmp(b.require_name()?) {
            Ordering::Equal => self.tie_break.compare(a, b),
            other => Ok(other),
        }
    }
}

/// Flips the wrapped rule. Ties stay ties, so a stable sort stays stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversed<R>(pub R);

impl<T: ?Sized, R: OrderingRule<T>> OrderingRule<T> for Reversed<R> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> RosterResult<Ordering> {
        Ok(self.0.compare(a, b)?.reverse())
    }
}

/// Which rule a query orders by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    /// [`ById`]
    Id,
    /// [`ByNameThenId`]
    NameThenId,
}

impl FromStr for OrderKey {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(OrderKey::Id),
            "name" | "name-then-id" => Ok(OrderKey::NameThenId),
            _ => Err(RosterError::parse_error(&format!("unknown order key: {s}"))),
        }
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderKey::Id => "id",
            OrderKey::NameThenId => "name",
        };
        write!(f, "{name}")
    }
}

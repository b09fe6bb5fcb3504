//! Top-down merge sort over borrowed records
//!
//! The sorter never moves or clones records; it orders shared references.
//! One scratch buffer the size of the input is allocated per sort and the
//! recursion alternates which buffer is the source and which the
//! destination, so auxiliary space stays O(n) across all levels.
//!
//! Merging is left-biased: when the rule reports a tie the element from the
//! left half goes first, which keeps the sort stable.

use crate::error::RosterResult;
use crate::ordering::OrderingRule;
use std::cmp::Ordering;
use tracing::debug;

/// Return `items` in non-decreasing order under `rule`.
///
/// The input slice is left untouched. Fails with the rule's error the first
/// time a comparison cannot be made.
pub fn sort<'a, T, R>(items: &[&'a T], rule: &R) -> RosterResult<Vec<&'a T>>
where
    T: ?Sized,
    R: OrderingRule<T> + ?Sized,
{
    debug!(len = items.len(), "merge sort");

    let mut output = items.to_vec();
    if output.len() < 2 {
        return Ok(output);
    }

    let mut scratch = output.clone();
    sort_run(&mut scratch, &mut output, rule)?;
    Ok(output)
}

/// Same result as [`sort`], but halves of at least `threshold` records are
/// sorted concurrently on the rayon pool.
pub fn par_sort<'a, T, R>(items: &[&'a T], rule: &R, threshold: usize) -> RosterResult<Vec<&'a T>>
where
    T: ?Sized + Sync,
    R: OrderingRule<T> + Sync + ?Sized,
{
    debug!(len = items.len(), threshold, "parallel merge sort");

    let mut output = items.to_vec();
    if output.len() < 2 {
        return Ok(output);
    }

    let mut scratch = output.clone();
    par_sort_run(&mut scratch, &mut output, rule, threshold.max(2))?;
    Ok(output)
}

/// Index of the first record that sorts strictly before its predecessor
pub fn first_disorder<T, R>(items: &[&T], rule: &R) -> RosterResult<Option<usize>>
where
    T: ?Sized,
    R: OrderingRule<T> + ?Sized,
{
    for (i, pair) in items.windows(2).enumerate() {
        if rule.compare(pair[0], pair[1])? == Ordering::Greater {
            return Ok(Some(i + 1));
        }
    }
    Ok(None)
}

/// Sort the contents of `src` into `dst`.
///
/// On entry both slices hold the same records in the same positions; `src`
/// is clobbered and used as scratch.
fn sort_run<'a, T, R>(src: &mut [&'a T], dst: &mut [&'a T], rule: &R) -> RosterResult<()>
where
    T: ?Sized,
    R: OrderingRule<T> + ?Sized,
{
    debug_assert_eq!(src.len(), dst.len());

    match dst.len() {
        0 | 1 => return Ok(()),
        2 => {
            if rule.compare(dst[0], dst[1])? == Ordering::Greater {
                dst.swap(0, 1);
            }
            return Ok(());
        }
        _ => {}
    }

    let mid = dst.len() / 2;
    {
        let (src_left, src_right) = src.split_at_mut(mid);
        let (dst_left, dst_right) = dst.split_at_mut(mid);
        // Roles swap one level down: the sorted halves land in `src`.
        sort_run(dst_left, src_left, rule)?;
        sort_run(dst_right, src_right, rule)?;
    }

    merge(&src[..mid], &src[mid..], dst, rule)
}

fn par_sort_run<'a, T, R>(
    src: &mut [&'a T],
    dst: &mut [&'a T],
    rule: &R,
    threshold: usize,
) -> RosterResult<()>
where
    T: ?Sized + Sync,
    R: OrderingRule<T> + Sync + ?Sized,
{
    if dst.len() < threshold {
        return sort_run(src, dst, rule);
    }

    let mid = dst.len() / 2;
    {
        let (src_left, src_right) = src.split_at_mut(mid);
        let (dst_left, dst_right) = dst.split_at_mut(mid);
        let (left, right) = rayon::join(
            || par_sort_run(dst_left, src_left, rule, threshold),
            || par_sort_run(dst_right, src_right, rule, threshold),
        );
        left?;
        right?;
    }

    merge(&src[..mid], &src[mid..], dst, rule)
}

/// Merge two sorted runs into `out`, preferring `left` on ties
fn merge<'a, T, R>(
    left: &[&'a T],
    right: &[&'a T],
    out: &mut [&'a T],
    rule: &R,
) -> RosterResult<()>
where
    T: ?Sized,
    R: OrderingRule<T> + ?Sized,
{
    debug_assert_eq!(left.len() + right.len(), out.len());

    // Already in order across the seam
    if let (Some(last), Some(first)) = (left.last(), right.first()) {
        if rule.not_after(last, first)? {
            out[..left.len()].copy_from_slice(left);
            out[left.len()..].copy_from_slice(right);
            return Ok(());
        }
    }

    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        if rule.not_after(left[i], right[j])? {
            out[k] = left[i];
            i += 1;
        } else {
            out[k] = right[j];
            j += 1;
        }
        k += 1;
    }

    // At most one side has records left; [cursor, len) is empty for the other.
    let rest = if i < left.len() { &left[i..] } else { &right[j..] };
    out[k..].copy_from_slice(rest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::model::{SchoolYear, Student};
    use crate::ordering::{ById, ByNameThenId, Reversed};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::cell::Cell;

    /// Record with a sort key and a tag recording input position
    #[derive(Debug)]
    struct Item {
        key: u32,
        tag: usize,
    }

    struct ByKey;

    impl OrderingRule<Item> for ByKey {
        fn compare(&self, a: &Item, b: &Item) -> RosterResult<Ordering> {
            Ok(a.key.cmp(&b.key))
        }
    }

    struct Counting<'c, R> {
        inner: R,
        calls: &'c Cell<usize>,
    }

    impl<T, R: OrderingRule<T>> OrderingRule<T> for Counting<'_, R> {
        fn compare(&self, a: &T, b: &T) -> RosterResult<Ordering> {
            self.calls.set(self.calls.get() + 1);
            self.inner.compare(a, b)
        }
    }

    fn student(id: &str, name: &str) -> Student {
        let year = SchoolYear::new(2020, 2021);
        Student::new(id, name, year, year, "GB")
    }

    fn items(keys: &[u32]) -> Vec<Item> {
        keys.iter()
            .enumerate()
            .map(|(tag, &key)| Item { key, tag })
            .collect()
    }

    fn random_items(rng: &mut StdRng, len: usize, key_range: u32) -> Vec<Item> {
        (0..len)
            .map(|tag| Item {
                key: rng.gen_range(0..key_range),
                tag,
            })
            .collect()
    }

    fn assert_sorted_and_stable(input: &[&Item], output: &[&Item]) {
        assert_eq!(input.len(), output.len());
        for pair in output.windows(2) {
            assert!(pair[0].key <= pair[1].key, "inversion: {pair:?}");
            if pair[0].key == pair[1].key {
                assert!(pair[0].tag < pair[1].tag, "unstable: {pair:?}");
            }
        }
        let mut tags: Vec<usize> = output.iter().map(|item| item.tag).collect();
        tags.sort_unstable();
        assert_eq!(tags, (0..input.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_by_id() {
        let records = [student("3", "B"), student("1", "A"), student("2", "A")];
        let refs: Vec<&Student> = records.iter().collect();

        let sorted = sort(&refs, &ById).expect("Failed to sort by id");
        let ids: Vec<_> = sorted.iter().filter_map(|s| s.id()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sort_by_name_then_id() {
        let records = [student("3", "B"), student("2", "A"), student("1", "A")];
        let refs: Vec<&Student> = records.iter().collect();

        let sorted = sort(&refs, &ByNameThenId::default()).expect("Failed to sort by name");
        let pairs: Vec<_> = sorted
            .iter()
            .map(|s| (s.id().unwrap_or_default(), s.name().unwrap_or_default()))
            .collect();
        assert_eq!(pairs, vec![("1", "A"), ("2", "A"), ("3", "B")]);
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<&Student> = Vec::new();
        assert!(sort(&empty, &ById).expect("empty sort").is_empty());
        assert!(sort(&empty, &ByNameThenId::default())
            .expect("empty sort")
            .is_empty());

        let only = student("1", "A");
        let sorted = sort(&[&only], &ById).expect("single sort");
        assert_eq!(sorted.len(), 1);
        assert!(std::ptr::eq(sorted[0], &only));
    }

    #[test]
    fn test_two_elements_single_comparison() {
        let data = items(&[2, 1]);
        let refs: Vec<&Item> = data.iter().collect();
        let calls = Cell::new(0);
        let rule = Counting { inner: ByKey, calls: &calls };

        let sorted = sort(&refs, &rule).expect("Failed to sort pair");
        assert_eq!(calls.get(), 1);
        assert_eq!(sorted[0].key, 1);
        assert_eq!(sorted[1].key, 2);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let data = items(&[5, 3, 9, 1]);
        let refs: Vec<&Item> = data.iter().collect();
        let _ = sort(&refs, &ByKey).expect("Failed to sort");
        let keys: Vec<u32> = refs.iter().map(|item| item.key).collect();
        assert_eq!(keys, vec![5, 3, 9, 1]);
    }

    #[test]
    fn test_output_is_permutation_by_identity() {
        let data = items(&[4, 4, 1, 7, 0, 4, 2]);
        let refs: Vec<&Item> = data.iter().collect();
        let sorted = sort(&refs, &ByKey).expect("Failed to sort");

        for record in &data {
            let hits = sorted.iter().filter(|s| std::ptr::eq(**s, record)).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_all_equal_keys_keep_input_order() {
        let data = items(&[7; 33]);
        let refs: Vec<&Item> = data.iter().collect();
        let sorted = sort(&refs, &ByKey).expect("Failed to sort");
        let tags: Vec<usize> = sorted.iter().map(|item| item.tag).collect();
        assert_eq!(tags, (0..33).collect::<Vec<_>>());
    }

    #[test]
    fn test_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = random_items(&mut rng, 200, 50);
        let refs: Vec<&Item> = data.iter().collect();

        let once = sort(&refs, &ByKey).expect("Failed to sort");
        let twice = sort(&once, &ByKey).expect("Failed to sort again");
        assert!(once.iter().zip(&twice).all(|(a, b)| std::ptr::eq(*a, *b)));
    }

    #[test]
    fn test_random_inputs_sorted_and_stable() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [0, 1, 2, 3, 4, 5, 7, 8, 16, 31, 64, 100, 257, 1000] {
            let data = random_items(&mut rng, len, 10);
            let refs: Vec<&Item> = data.iter().collect();
            let sorted = sort(&refs, &ByKey).expect("Failed to sort");
            assert_sorted_and_stable(&refs, &sorted);
            assert_eq!(first_disorder(&sorted, &ByKey).expect("compare"), None);
        }
    }

    fn random_roster(rng: &mut StdRng, len: usize) -> Vec<Student> {
        let names = ["Ada", "Bea", "Cy", "Dana"];
        let year = SchoolYear::new(2020, 2021);
        (0..len)
            .map(|_| {
                let id = rng.gen_range(0..len / 2 + 1).to_string();
                let name = names[rng.gen_range(0..names.len())];
                Student::new(id, name, year, year, "GB")
            })
            .collect()
    }

    /// Position of each record in `records`, by identity
    fn position(records: &[Student], student: &Student) -> usize {
        records
            .iter()
            .position(|r| std::ptr::eq(r, student))
            .expect("record comes from the input")
    }

    #[test]
    fn test_random_roster_by_id_and_name() {
        let mut rng = StdRng::seed_from_u64(2024);
        for len in [0, 1, 2, 3, 9, 50, 301] {
            let records = random_roster(&mut rng, len);
            let refs: Vec<&Student> = records.iter().collect();

            let by_id = sort(&refs, &ById).expect("Failed to sort by id");
            assert_eq!(by_id.len(), len);
            for pair in by_id.windows(2) {
                let (a, b) = (pair[0].id(), pair[1].id());
                assert!(a <= b, "id inversion: {a:?} {b:?}");
                if a == b {
                    assert!(position(&records, pair[0]) < position(&records, pair[1]));
                }
            }

            let by_name = sort(&refs, &ByNameThenId::default()).expect("Failed to sort by name");
            assert_eq!(by_name.len(), len);
            for pair in by_name.windows(2) {
                let a = (pair[0].name(), pair[0].id());
                let b = (pair[1].name(), pair[1].id());
                assert!(a <= b, "name/id inversion: {a:?} {b:?}");
                if a == b {
                    assert!(position(&records, pair[0]) < position(&records, pair[1]));
                }
            }

            for record in &records {
                let hits = by_name.iter().filter(|s| std::ptr::eq(**s, record)).count();
                assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn test_reversed_rule_is_stable() {
        let data = items(&[1, 3, 2, 3, 1]);
        let refs: Vec<&Item> = data.iter().collect();
        let sorted = sort(&refs, &Reversed(ByKey)).expect("Failed to sort");
        let pairs: Vec<(u32, usize)> = sorted.iter().map(|i| (i.key, i.tag)).collect();
        assert_eq!(pairs, vec![(3, 1), (3, 3), (2, 2), (1, 0), (1, 4)]);
    }

    #[test]
    fn test_comparison_count_is_n_log_n() {
        let mut rng = StdRng::seed_from_u64(3);
        let len = 1 << 12;
        let mut keys: Vec<u32> = (0..len as u32).collect();
        keys.shuffle(&mut rng);
        let data = items(&keys);
        let refs: Vec<&Item> = data.iter().collect();

        let calls = Cell::new(0);
        let rule = Counting { inner: ByKey, calls: &calls };
        let sorted = sort(&refs, &rule).expect("Failed to sort");

        assert_sorted_and_stable(&refs, &sorted);
        // n * log2(n) upper bound for merge sort
        assert!(calls.get() <= len * 12, "comparisons: {}", calls.get());
    }

    #[test]
    fn test_par_sort_matches_sort() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = random_items(&mut rng, 5000, 100);
        let refs: Vec<&Item> = data.iter().collect();

        let sequential = sort(&refs, &ByKey).expect("Failed to sort");
        for threshold in [0, 2, 64, 1024, 10_000] {
            let parallel = par_sort(&refs, &ByKey, threshold).expect("Failed to par sort");
            assert!(sequential
                .iter()
                .zip(&parallel)
                .all(|(a, b)| std::ptr::eq(*a, *b)));
        }
    }

    #[test]
    fn test_missing_field_propagates() {
        let year = SchoolYear::new(2020, 2021);
        let mut records: Vec<Student> = (0..20).map(|i| student(&i.to_string(), "N")).collect();
        records.push(Student::builder(year, year).id("ghost").build());
        let refs: Vec<&Student> = records.iter().collect();

        let err = sort(&refs, &ByNameThenId::default()).unwrap_err();
        assert!(matches!(
            err,
            RosterError::MissingField { field: "name", ref record } if record == "ghost"
        ));

        let err = par_sort(&refs, &ByNameThenId::default(), 4).unwrap_err();
        assert!(matches!(err, RosterError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_first_disorder() {
        let data = items(&[1, 2, 2, 1, 5]);
        let refs: Vec<&Item> = data.iter().collect();
        assert_eq!(first_disorder(&refs, &ByKey).expect("compare"), Some(3));

        let empty: Vec<&Item> = Vec::new();
        assert_eq!(first_disorder(&empty, &ByKey).expect("compare"), None);
    }
}

//! Sorting driver
//!
//! Ten comparison and distribution sorts written against two instrumented
//! primitives:
//! - [`SortingDriver::compare`]: tags both elements `Comparing`, records a
//!   step, waits, and reports whether the left element is greater
//! - [`SortingDriver::swap`]: tags both elements `Swapping`, records a step,
//!   waits, exchanges them and restores the default tag
//!
//! Every sort resolves with the array non-decreasing and every element tagged
//! [`Tag::Sorted`]. Inputs of length 0 or 1 finish immediately with a single
//! notify and no comparisons.

use crate::config::EngineConfig;
use crate::engine::{Driver, EngineError, Result, RunToken, StateContainer, Visualization};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Widest value range the counting and bucket sorts will allocate for
const MAX_DISTRIBUTION_RANGE: u64 = 1 << 20;

/// Visual state of one array element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Default,
    Comparing,
    Swapping,
    Sorted,
    Pivot,
    Current,
    Subarray,
    Heap,
    Counting,
    Bucket,
    Radix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub value: i64,
    pub tag: Tag,
}

impl Element {
    pub fn new(value: i64) -> Self {
        Element {
            value,
            tag: Tag::Default,
        }
    }
}

/// Live array plus the counters shown next to it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortView {
    pub array: Vec<Element>,
    /// Auxiliary storage of the distribution sorts (counts, buckets, digit bins)
    pub aux: Vec<Vec<i64>>,
    pub comparisons: usize,
    /// Exchanges plus element writes
    pub swaps: usize,
}

impl SortView {
    pub fn from_values(values: &[i64]) -> Self {
        SortView {
            array: values.iter().copied().map(Element::new).collect(),
            ..Default::default()
        }
    }

    pub fn values(&self) -> Vec<i64> {
        self.array.iter().map(|e| e.value).collect()
    }

    pub fn is_sorted(&self) -> bool {
        self.array.windows(2).all(|w| w[0].value <= w[1].value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Compare,
    Swap,
    Write,
    Mark,
    Complete,
}

impl SortKind {
    pub fn label(self) -> &'static str {
        match self {
            SortKind::Compare => "compare",
            SortKind::Swap => "swap",
            SortKind::Write => "write",
            SortKind::Mark => "mark",
            SortKind::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sorting;

impl Visualization for Sorting {
    type Kind = SortKind;
    type Snapshot = SortView;
    type Output = ();
    type Solution = Vec<i64>;
    type View = SortView;
}

enum MergeTask {
    Split(usize, usize),
    Merge(usize, usize, usize),
}

pub struct SortingDriver {
    state: StateContainer<Sorting>,
    bucket_size: i64,
    rng: StdRng,
}

impl SortingDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        SortingDriver {
            state: StateContainer::new(SortView::default(), config.delay),
            bucket_size: config.bucket_size.max(1),
            rng,
        }
    }

    pub fn view(&self) -> &SortView {
        self.state.view()
    }

    pub fn values(&self) -> Vec<i64> {
        self.state.view().values()
    }

    /// Replace the array with `size` values drawn from `min..=max`
    pub fn generate_random_array(&mut self, size: usize, min: i64, max: i64) -> Result<Vec<i64>> {
        if min > max {
            return Err(EngineError::invalid(format!(
                "empty range {}..={}",
                min, max
            )));
        }
        let values: Vec<i64> = (0..size)
            .map(|_| self.rng.random_range(min..=max))
            .collect();
        self.set_array(&values);
        Ok(values)
    }

    /// Replace the array; clears history and invalidates any run in flight
    pub fn set_array(&mut self, values: &[i64]) {
        self.state.reset();
        *self.state.view_mut() = SortView::from_values(values);
        self.state.notify("Array updated");
    }

    pub async fn bubble_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Bubble sort") else {
            return Ok(());
        };
        let n = self.len();

        for i in 0..n - 1 {
            let mut swapped = false;
            for j in 0..n - i - 1 {
                if self.compare(&run, j, j + 1).await? {
                    self.swap(&run, j, j + 1).await?;
                    swapped = true;
                }
                self.tag(j, Tag::Default);
                self.tag(j + 1, Tag::Default);
            }
            self.tag(n - i - 1, Tag::Sorted);

            if !swapped {
                for k in 0..n - i - 1 {
                    self.tag(k, Tag::Sorted);
                }
                self.record(SortKind::Mark, "No swaps in this pass, array is sorted");
                self.state.wait(&run).await?;
                break;
            }
            let value = self.value(n - i - 1);
            self.record(
                SortKind::Mark,
                format!("Pass {} complete, {} is in place", i + 1, value),
            );
            self.state.wait(&run).await?;
        }

        self.complete("Bubble sort complete")
    }

    pub async fn selection_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Selection sort") else {
            return Ok(());
        };
        let n = self.len();

        for i in 0..n - 1 {
            let mut min = i;
            self.tag(i, Tag::Current);
            for j in i + 1..n {
                let smaller = self.compare(&run, min, j).await?;
                self.tag(j, Tag::Default);
                self.tag(min, Tag::Default);
                if smaller {
                    min = j;
                }
                self.tag(min, Tag::Current);
            }
            if min != i {
                self.swap(&run, i, min).await?;
            }
            self.tag(i, Tag::Sorted);
            let value = self.value(i);
            self.record(
                SortKind::Mark,
                format!("Position {} holds {}", i, value),
            );
            self.state.wait(&run).await?;
        }

        self.complete("Selection sort complete")
    }

    pub async fn insertion_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Insertion sort") else {
            return Ok(());
        };
        let n = self.len();
        self.tag(0, Tag::Sorted);

        for i in 1..n {
            let current = self.value(i);
            self.tag(i, Tag::Current);
            self.record(SortKind::Mark, format!("Insert {}", current));
            self.state.wait(&run).await?;

            let mut hole = i;
            while hole > 0 {
                if !self.probe(&run, hole - 1, current).await? {
                    self.tag(hole - 1, Tag::Sorted);
                    break;
                }
                let shifted = self.value(hole - 1);
                self.write(&run, hole, shifted, Tag::Sorted).await?;
                self.tag(hole - 1, Tag::Current);
                hole -= 1;
            }
            if hole != i {
                self.write(&run, hole, current, Tag::Sorted).await?;
            }
            for k in 0..=i {
                self.tag(k, Tag::Sorted);
            }
        }

        self.complete("Insertion sort complete")
    }

    pub async fn shell_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Shell sort") else {
            return Ok(());
        };
        let n = self.len();
        let mut gap = n / 2;

        while gap > 0 {
            self.record(SortKind::Mark, format!("Gap {}", gap));
            self.state.wait(&run).await?;

            for i in gap..n {
                let temp = self.value(i);
                for k in (i % gap..n).step_by(gap) {
                    self.tag(k, Tag::Subarray);
                }
                self.tag(i, Tag::Current);
                self.record(
                    SortKind::Mark,
                    format!("Insert {} into its gap-{} chain", temp, gap),
                );
                self.state.wait(&run).await?;

                let mut j = i;
                while j >= gap {
                    if !self.probe(&run, j - gap, temp).await? {
                        break;
                    }
                    let shifted = self.value(j - gap);
                    self.write(&run, j, shifted, Tag::Subarray).await?;
                    j -= gap;
                }
                if j != i {
                    self.write(&run, j, temp, Tag::Current).await?;
                }
                self.clear_tags();
            }
            gap /= 2;
        }

        self.complete("Shell sort complete")
    }

    pub async fn quick_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Quick sort") else {
            return Ok(());
        };
        let mut ranges = vec![(0, self.len() - 1)];

        while let Some((lo, hi)) = ranges.pop() {
            if lo == hi {
                self.tag(lo, Tag::Sorted);
                continue;
            }
            let p = self.partition(&run, lo, hi).await?;
            // Left range is popped first
            if p < hi {
                ranges.push((p + 1, hi));
            }
            if p > lo {
                ranges.push((lo, p - 1));
            }
        }

        self.complete("Quick sort complete")
    }

    /// Lomuto partition around the last element
    async fn partition(&mut self, run: &RunToken, lo: usize, hi: usize) -> Result<usize> {
        let pivot = self.value(hi);
        self.tag(hi, Tag::Pivot);
        self.record(SortKind::Mark, format!("Pivot {}", pivot));
        self.state.wait(run).await?;

        let mut store = lo;
        for j in lo..hi {
            self.state.view_mut().comparisons += 1;
            self.tag(j, Tag::Comparing);
            let value = self.value(j);
            self.record(
                SortKind::Compare,
                format!("Compare {} with pivot {}", value, pivot),
            );
            self.state.wait(run).await?;

            if value < pivot {
                if store != j {
                    self.swap(run, store, j).await?;
                }
                store += 1;
            }
            self.tag(j, Tag::Default);
        }
        if store != hi {
            self.swap(run, store, hi).await?;
        }
        self.tag(store, Tag::Sorted);
        self.record(
            SortKind::Mark,
            format!("Pivot {} placed at index {}", pivot, store),
        );
        self.state.wait(run).await?;
        Ok(store)
    }

    pub async fn merge_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Merge sort") else {
            return Ok(());
        };
        let mut tasks = vec![MergeTask::Split(0, self.len() - 1)];

        while let Some(task) = tasks.pop() {
            match task {
                MergeTask::Split(l, r) if l < r => {
                    let mid = l + (r - l) / 2;
                    for k in l..=r {
                        self.tag(k, Tag::Subarray);
                    }
                    self.record(SortKind::Mark, format!("Split [{}..{}]", l, r));
                    self.state.wait(&run).await?;
                    tasks.push(MergeTask::Merge(l, mid, r));
                    tasks.push(MergeTask::Split(mid + 1, r));
                    tasks.push(MergeTask::Split(l, mid));
                }
                MergeTask::Split(..) => {}
                MergeTask::Merge(l, mid, r) => self.merge(&run, l, mid, r).await?,
            }
        }

        self.complete("Merge sort complete")
    }

    async fn merge(&mut self, run: &RunToken, l: usize, mid: usize, r: usize) -> Result<()> {
        let left: Vec<i64> = (l..=mid).map(|k| self.value(k)).collect();
        let right: Vec<i64> = (mid + 1..=r).map(|k| self.value(k)).collect();
        for k in l..=mid {
            self.tag(k, Tag::Current);
        }
        for k in mid + 1..=r {
            self.tag(k, Tag::Comparing);
        }
        self.record(
            SortKind::Mark,
            format!("Merge [{}..{}] with [{}..{}]", l, mid, mid + 1, r),
        );
        self.state.wait(run).await?;

        let (mut i, mut j, mut k) = (0, 0, l);
        while i < left.len() && j < right.len() {
            self.state.view_mut().comparisons += 1;
            let next = if left[i] <= right[j] {
                i += 1;
                left[i - 1]
            } else {
                j += 1;
                right[j - 1]
            };
            self.write(run, k, next, Tag::Sorted).await?;
            k += 1;
        }
        for &value in left[i..].iter().chain(right[j..].iter()) {
            self.write(run, k, value, Tag::Sorted).await?;
            k += 1;
        }
        Ok(())
    }

    pub async fn heap_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Heap sort") else {
            return Ok(());
        };
        let n = self.len();

        self.record(SortKind::Mark, "Build max heap");
        self.state.wait(&run).await?;
        for root in (0..n / 2).rev() {
            self.sift_down(&run, n, root).await?;
        }

        for end in (1..n).rev() {
            let top = self.value(0);
            self.tag(0, Tag::Current);
            self.record(
                SortKind::Mark,
                format!("Move heap top {} to index {}", top, end),
            );
            self.state.wait(&run).await?;
            self.swap(&run, 0, end).await?;
            self.tag(end, Tag::Sorted);
            self.sift_down(&run, end, 0).await?;
        }

        self.complete("Heap sort complete")
    }

    /// Restore the max-heap property below `root` within `array[..size]`
    async fn sift_down(&mut self, run: &RunToken, size: usize, mut root: usize) -> Result<()> {
        loop {
            let mut largest = root;
            let left = 2 * root + 1;
            let right = 2 * root + 2;

            if left < size && self.compare(run, left, largest).await? {
                largest = left;
            }
            if right < size && self.compare(run, right, largest).await? {
                largest = right;
            }
            for k in [root, left, right] {
                if k < size {
                    self.tag(k, Tag::Heap);
                }
            }
            if largest == root {
                return Ok(());
            }
            self.swap(run, root, largest).await?;
            self.tag(root, Tag::Heap);
            root = largest;
        }
    }

    pub async fn counting_sort(&mut self) -> Result<()> {
        let (min, max) = self.bounds();
        let range = Self::distribution_range(min, max, 1)?;
        let Some(run) = self.begin("Counting sort") else {
            return Ok(());
        };
        let n = self.len();
        self.scan_range(&run).await?;

        self.state.view_mut().aux = vec![vec![0; range]];
        for i in 0..n {
            let value = self.value(i);
            let slot = (value - min) as usize;
            self.state.view_mut().aux[0][slot] += 1;
            self.tag(i, Tag::Counting);
            let count = self.state.view().aux[0][slot];
            self.record(SortKind::Mark, format!("Count {}: {}", value, count));
            self.state.wait(&run).await?;
        }

        let counts = std::mem::take(&mut self.state.view_mut().aux[0]);
        let mut k = 0;
        for (slot, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                self.write(&run, k, min + slot as i64, Tag::Sorted).await?;
                k += 1;
            }
        }
        self.state.view_mut().aux.clear();

        self.complete("Counting sort complete")
    }

    pub async fn bucket_sort(&mut self) -> Result<()> {
        let (min, max) = self.bounds();
        let bucket_count = Self::distribution_range(min, max, self.bucket_size)?;
        let Some(run) = self.begin("Bucket sort") else {
            return Ok(());
        };
        let n = self.len();
        self.scan_range(&run).await?;

        self.state.view_mut().aux = vec![Vec::new(); bucket_count];
        for i in 0..n {
            let value = self.value(i);
            let bucket = ((value - min) / self.bucket_size) as usize;
            self.state.view_mut().aux[bucket].push(value);
            self.tag(i, Tag::Bucket);
            self.record(
                SortKind::Mark,
                format!("Put {} in bucket {}", value, bucket),
            );
            self.state.wait(&run).await?;
        }

        let mut k = 0;
        for bucket in 0..bucket_count {
            if self.state.view().aux[bucket].is_empty() {
                continue;
            }
            let mut items = self.state.view().aux[bucket].clone();
            self.state.view_mut().comparisons += insertion_sort_counting(&mut items);
            self.state.view_mut().aux[bucket] = items.clone();
            self.record(SortKind::Mark, format!("Sort bucket {}", bucket));
            self.state.wait(&run).await?;

            for value in items {
                self.write(&run, k, value, Tag::Sorted).await?;
                k += 1;
            }
        }
        self.state.view_mut().aux.clear();

        self.complete("Bucket sort complete")
    }

    /// LSD radix sort on `value - min` when the array holds negatives
    pub async fn radix_sort(&mut self) -> Result<()> {
        let Some(run) = self.begin("Radix sort") else {
            return Ok(());
        };
        let n = self.len();
        let (min, max) = self.scan_range(&run).await?;
        let offset = min.min(0) as i128;
        let max_key = max as i128 - offset;

        let mut exp: i128 = 1;
        loop {
            self.record(SortKind::Mark, format!("Sort by digit place {}", exp));
            self.state.wait(&run).await?;

            self.state.view_mut().aux = vec![Vec::new(); 10];
            for i in 0..n {
                let value = self.value(i);
                let digit = ((value as i128 - offset) / exp % 10) as usize;
                self.state.view_mut().aux[digit].push(value);
                self.tag(i, Tag::Radix);
                self.record(
                    SortKind::Mark,
                    format!("{} has digit {} at place {}", value, digit, exp),
                );
                self.state.wait(&run).await?;
            }

            let bins = std::mem::take(&mut self.state.view_mut().aux);
            let mut k = 0;
            for value in bins.into_iter().flatten() {
                self.write(&run, k, value, Tag::Default).await?;
                k += 1;
            }

            match exp.checked_mul(10) {
                Some(next) if max_key >= next => exp = next,
                _ => break,
            }
        }

        self.complete("Radix sort complete")
    }

    /// Record a comparison of `array[i]` and `array[j]`; true when `array[i] > array[j]`
    pub async fn compare(&mut self, run: &RunToken, i: usize, j: usize) -> Result<bool> {
        self.state.view_mut().comparisons += 1;
        self.tag(i, Tag::Comparing);
        self.tag(j, Tag::Comparing);
        let (a, b) = (self.value(i), self.value(j));
        self.record(SortKind::Compare, format!("Compare {} and {}", a, b));
        self.state.wait(run).await?;
        Ok(a > b)
    }

    /// Record and perform an exchange of `array[i]` and `array[j]`
    pub async fn swap(&mut self, run: &RunToken, i: usize, j: usize) -> Result<()> {
        self.state.view_mut().swaps += 1;
        self.tag(i, Tag::Swapping);
        self.tag(j, Tag::Swapping);
        let (a, b) = (self.value(i), self.value(j));
        self.record(SortKind::Swap, format!("Swap {} and {}", a, b));
        self.state.wait(run).await?;

        let array = &mut self.state.view_mut().array;
        array.swap(i, j);
        array[i].tag = Tag::Default;
        array[j].tag = Tag::Default;
        self.state.publish();
        Ok(())
    }

    /// Compare `array[index]` against a value held outside the array
    async fn probe(&mut self, run: &RunToken, index: usize, against: i64) -> Result<bool> {
        self.state.view_mut().comparisons += 1;
        self.tag(index, Tag::Comparing);
        let value = self.value(index);
        self.record(
            SortKind::Compare,
            format!("Compare {} with {}", value, against),
        );
        self.state.wait(run).await?;
        Ok(value > against)
    }

    async fn write(&mut self, run: &RunToken, index: usize, value: i64, tag: Tag) -> Result<()> {
        let view = self.state.view_mut();
        view.swaps += 1;
        view.array[index] = Element { value, tag };
        self.record(
            SortKind::Write,
            format!("Write {} at index {}", value, index),
        );
        self.state.wait(run).await
    }

    /// Walk the array once to find its range; returns (min, max)
    async fn scan_range(&mut self, run: &RunToken) -> Result<(i64, i64)> {
        let mut min = self.value(0);
        let mut max = min;
        for i in 1..self.len() {
            let value = self.value(i);
            min = min.min(value);
            max = max.max(value);
            self.tag(i, Tag::Current);
            self.record(
                SortKind::Mark,
                format!("Scan {}, range is {}..{}", value, min, max),
            );
            self.state.wait(run).await?;
            self.tag(i, Tag::Default);
        }
        Ok((min, max))
    }

    fn bounds(&self) -> (i64, i64) {
        let values = self.values();
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    /// Number of slots of width `width` covering `min..=max`
    fn distribution_range(min: i64, max: i64, width: i64) -> Result<usize> {
        let span = (max as i128 - min as i128) / width as i128 + 1;
        if span > MAX_DISTRIBUTION_RANGE as i128 {
            return Err(EngineError::invalid(format!(
                "value range {}..={} is too wide to distribute",
                min, max
            )));
        }
        Ok(span as usize)
    }

    /// Start a run; returns `None` once a trivially sorted input has been finished
    fn begin(&mut self, name: &str) -> Option<RunToken> {
        let run = self.state.start_run();
        let view = self.state.view_mut();
        view.comparisons = 0;
        view.swaps = 0;
        view.aux.clear();
        for element in view.array.iter_mut() {
            element.tag = Tag::Default;
        }

        if view.array.len() <= 1 {
            for element in view.array.iter_mut() {
                element.tag = Tag::Sorted;
            }
            let values = self.values();
            self.state
                .finish(Some(values), format!("{} complete", name));
            return None;
        }
        Some(run)
    }

    fn complete(&mut self, message: &str) -> Result<()> {
        for element in self.state.view_mut().array.iter_mut() {
            element.tag = Tag::Sorted;
        }
        debug_assert!(self.state.view().is_sorted());
        self.record(SortKind::Complete, message);
        let values = self.values();
        self.state.finish(Some(values), message);
        Ok(())
    }

    fn record(&mut self, kind: SortKind, description: impl Into<String>) {
        let snapshot = self.state.view().clone();
        self.state.add_step(kind, 0, snapshot, description, None);
    }

    fn clear_tags(&mut self) {
        for element in self.state.view_mut().array.iter_mut() {
            element.tag = Tag::Default;
        }
    }

    fn len(&self) -> usize {
        self.state.view().array.len()
    }

    fn value(&self, index: usize) -> i64 {
        self.state.view().array[index].value
    }

    fn tag(&mut self, index: usize, tag: Tag) {
        self.state.view_mut().array[index].tag = tag;
    }
}

impl Default for SortingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for SortingDriver {
    type Family = Sorting;

    fn container(&self) -> &StateContainer<Sorting> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<Sorting> {
        &mut self.state
    }
}

/// Sort a bucket in place; returns the number of comparisons made
fn insertion_sort_counting(items: &mut [i64]) -> usize {
    let mut comparisons = 0;
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 {
            comparisons += 1;
            if items[j - 1] <= items[j] {
                break;
            }
            items.swap(j - 1, j);
            j -= 1;
        }
    }
    comparisons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(values: &[i64]) -> SortingDriver {
        let mut driver = SortingDriver::with_config(&EngineConfig::instant());
        driver.set_array(values);
        driver
    }

    fn assert_sorted(driver: &SortingDriver, expected: &[i64]) {
        let state = driver.get_state();
        assert!(state.is_complete);
        assert_eq!(driver.values(), expected);
        assert!(driver.view().array.iter().all(|e| e.tag == Tag::Sorted));
        assert_eq!(state.solution.as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn test_bubble_sort_example() {
        let mut d = driver(&[5, 3, 4, 1, 2]);
        d.bubble_sort().await.unwrap();
        assert_sorted(&d, &[1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_bubble_sort_stops_after_clean_pass() {
        let mut d = driver(&[1, 2, 3, 4]);
        d.bubble_sort().await.unwrap();

        let state = d.get_state();
        assert_eq!(state.log.count_kind(SortKind::Compare), 3);
        assert_eq!(state.log.count_kind(SortKind::Swap), 0);
        assert_sorted(&d, &[1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_trivial_inputs_skip_comparisons() {
        for values in [vec![], vec![7]] {
            let mut d = driver(&values);
            let calls = std::rc::Rc::new(std::cell::Cell::new(0));
            let counter = std::rc::Rc::clone(&calls);
            let _sub = d.subscribe(move |_| counter.set(counter.get() + 1));

            d.quick_sort().await.unwrap();

            assert_eq!(calls.get(), 1);
            assert!(d.get_state().log.is_empty());
            assert_sorted(&d, &values);
        }
    }

    #[tokio::test]
    async fn test_every_sort_orders_duplicates_and_negatives() {
        let input = [9, -3, 5, 0, 5, -12, 7, 1, 1, 42, -3];
        let mut expected = input.to_vec();
        expected.sort();

        let mut d = driver(&input);
        d.selection_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.insertion_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.shell_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.merge_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.heap_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.counting_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.bucket_sort().await.unwrap();
        assert_sorted(&d, &expected);
        d.set_array(&input);
        d.radix_sort().await.unwrap();
        assert_sorted(&d, &expected);
    }

    #[tokio::test]
    async fn test_counters_reset_between_runs() {
        let mut d = driver(&[3, 2, 1]);
        d.bubble_sort().await.unwrap();
        assert_eq!(d.view().comparisons, 3);
        assert_eq!(d.view().swaps, 3);

        d.bubble_sort().await.unwrap();
        assert_eq!(d.view().comparisons, 2);
        assert_eq!(d.view().swaps, 0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = EngineConfig::instant().with_seed(7);
        let mut a = SortingDriver::with_config(&config);
        let mut b = SortingDriver::with_config(&config);

        let first = a.generate_random_array(20, -5, 5).unwrap();
        assert_eq!(first, b.generate_random_array(20, -5, 5).unwrap());
        assert!(first.iter().all(|v| (-5..=5).contains(v)));
        assert_eq!(a.values(), first);
    }

    #[test]
    fn test_generation_rejects_empty_range() {
        let mut d = SortingDriver::with_config(&EngineConfig::instant());
        assert!(d.generate_random_array(3, 5, 1).is_err());
    }

    #[tokio::test]
    async fn test_counting_sort_rejects_huge_range() {
        let mut d = driver(&[i64::MIN, i64::MAX]);
        let err = d.counting_sort().await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(d.get_state().log.is_empty());
    }
}

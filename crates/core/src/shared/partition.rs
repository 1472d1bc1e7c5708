use std::ops::Range;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PartitionError {
    #[error("pod count must be at least 1")]
    NoPods,
    #[error("pod index {index} out of range for {count} pods")]
    IndexOutOfRange { index: usize, count: usize },
}

/// One pod's position in an externally scheduled job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PodAssignment {
    index: usize,
    count: usize,
}

impl PodAssignment {
    pub fn new(index: usize, count: usize) -> Result<Self, PartitionError> {
        if count == 0 {
            return Err(PartitionError::NoPods);
        }
        if index >= count {
            return Err(PartitionError::IndexOutOfRange { index, count });
        }
        Ok(Self { index, count })
    }

    /// Single pod owning everything.
    pub fn solo() -> Self {
        Self { index: 0, count: 1 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Half-open range of item positions owned by this pod.
    pub fn range_for(&self, len: usize) -> Range<usize> {
        chunk_range(len, self.count, self.index)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range_for(items.len())]
    }
}

/// Splits `len` items into `parts` contiguous ranges whose sizes differ by
/// at most one. The first `len % parts` ranges carry the extra item.
pub fn chunks(len: usize, parts: usize) -> Vec<Range<usize>> {
    (0..parts).map(|i| chunk_range(len, parts, i)).collect()
}

fn chunk_range(len: usize, parts: usize, i: usize) -> Range<usize> {
    debug_assert!(parts > 0 && i < parts);
    let base = len / parts;
    let rem = len % parts;
    let start = i * base + i.min(rem);
    let size = base + usize::from(i < rem);
    start..start + size
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_rejects_zero_pods() {
        assert_eq!(PodAssignment::new(0, 0), Err(PartitionError::NoPods));
    }

    #[test]
    fn test_new_rejects_index_past_count() {
        assert_eq!(
            PodAssignment::new(3, 3),
            Err(PartitionError::IndexOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_solo_owns_everything() {
        assert_eq!(PodAssignment::solo().range_for(17), 0..17);
    }

    #[test]
    fn test_remainder_goes_to_leading_pods() {
        assert_eq!(chunks(10, 3), vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_more_pods_than_items() {
        let ranges = chunks(2, 4);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn test_slice_returns_owned_items() {
        let items = ["a", "b", "c", "d", "e"];
        let pod = PodAssignment::new(1, 2).unwrap();
        assert_eq!(pod.slice(&items), &["d", "e"]);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(7, 3)]
    #[case(10, 10)]
    #[case(11, 10)]
    #[case(3, 8)]
    #[case(1001, 16)]
    fn test_chunks_cover_every_item_once(#[case] len: usize, #[case] parts: usize) {
        let mut seen = vec![0u32; len];
        for range in chunks(len, parts) {
            for i in range {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[rstest]
    #[case(9, 4)]
    #[case(100, 7)]
    fn test_chunks_are_balanced(#[case] len: usize, #[case] parts: usize) {
        let sizes: Vec<usize> = chunks(len, parts).iter().map(|r| r.len()).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1);
    }
}

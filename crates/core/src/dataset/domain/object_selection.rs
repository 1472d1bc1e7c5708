use crate::dataset::domain::dataset_error::DatasetError;
use crate::shared::constants::IGNORED_OBJECT_SUFFIXES;

/// Keeps entries that look like objects, sorted for a stable pod split.
pub fn filter_object_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut objects: Vec<String> = names
        .into_iter()
        .filter(|name| {
            !IGNORED_OBJECT_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(suffix))
        })
        .collect();
    objects.sort();
    objects
}

/// Objects whose numeric id lies in `start..end`, in id order.
///
/// Both bounds must fall within the observed ids. An id from the range
/// is selected only if an object with exactly that name exists.
pub fn select_by_range(
    objects: &[String],
    start: i64,
    end: i64,
) -> Result<Vec<String>, DatasetError> {
    let ids = numeric_ids(objects)?;
    let min = ids.iter().copied().min().ok_or(DatasetError::NothingToProcess)?;
    let max = ids.iter().copied().max().ok_or(DatasetError::NothingToProcess)?;

    if start < min {
        return Err(DatasetError::RangeStartTooLow { start, min });
    }
    if end > max {
        return Err(DatasetError::RangeEndTooHigh { end, max });
    }

    Ok((start..end)
        .map(|id| id.to_string())
        .filter(|name| objects.contains(name))
        .collect())
}

/// Drops objects whose numeric id falls in `lo..=hi`. Non-numeric names stay.
pub fn exclude_id_range(objects: Vec<String>, lo: i64, hi: i64) -> Vec<String> {
    objects
        .into_iter()
        .filter(|name| {
            name.parse::<i64>()
                .map_or(true, |id| !(lo..=hi).contains(&id))
        })
        .collect()
}

fn numeric_ids(objects: &[String]) -> Result<Vec<i64>, DatasetError> {
    objects
        .iter()
        .map(|name| {
            name.parse::<i64>()
                .map_err(|_| DatasetError::NonNumericObject(name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_drops_metadata_and_sorts() {
        let objects = filter_object_names(names(&["200", "meta.json", "100", "list.txt", "150"]));
        assert_eq!(objects, names(&["100", "150", "200"]));
    }

    #[test]
    fn test_filter_matches_bare_suffix() {
        // Names merely ending in the suffix are treated as metadata too.
        let objects = filter_object_names(names(&["100", "backupjson"]));
        assert_eq!(objects, names(&["100"]));
    }

    #[test]
    fn test_select_by_range_is_end_exclusive() {
        let objects = names(&["100", "101", "102", "103"]);
        let selected = select_by_range(&objects, 100, 103).unwrap();
        assert_eq!(selected, names(&["100", "101", "102"]));
    }

    #[test]
    fn test_select_by_range_skips_missing_ids() {
        let objects = names(&["100", "102", "104"]);
        let selected = select_by_range(&objects, 100, 104).unwrap();
        assert_eq!(selected, names(&["100", "102"]));
    }

    #[test]
    fn test_select_by_range_orders_numerically() {
        let objects = filter_object_names(names(&["9", "10", "11"]));
        let selected = select_by_range(&objects, 9, 11).unwrap();
        assert_eq!(selected, names(&["9", "10"]));
    }

    #[test]
    fn test_select_by_range_rejects_low_start() {
        let objects = names(&["100", "101"]);
        assert!(matches!(
            select_by_range(&objects, 99, 101),
            Err(DatasetError::RangeStartTooLow { start: 99, min: 100 })
        ));
    }

    #[test]
    fn test_select_by_range_rejects_high_end() {
        let objects = names(&["100", "101"]);
        assert!(matches!(
            select_by_range(&objects, 100, 102),
            Err(DatasetError::RangeEndTooHigh { end: 102, max: 101 })
        ));
    }

    #[test]
    fn test_select_by_range_requires_numeric_names() {
        let objects = names(&["100", "abc"]);
        assert!(matches!(
            select_by_range(&objects, 100, 100),
            Err(DatasetError::NonNumericObject(name)) if name == "abc"
        ));
    }

    #[test]
    fn test_exclude_id_range_is_inclusive() {
        let objects = names(&["10000", "10001", "50000", "100500", "100501", "x"]);
        let kept = exclude_id_range(objects, 10001, 100500);
        assert_eq!(kept, names(&["10000", "100501", "x"]));
    }
}

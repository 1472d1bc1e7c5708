use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::detection::domain::detection_record::DetectionRecord;
use crate::shared::constants::{DATA_SHARD_PREFIX, FULL_DATA_SHARD_PREFIX};

/// `{image_or_fragment_name: record}` for one camera.
pub type CameraResults = BTreeMap<String, DetectionRecord>;

/// `{camera: {name: record}}` for one object.
pub type ObjectResult = BTreeMap<String, CameraResults>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShardKind {
    /// Output of the merge utility.
    Data,
    /// Output of the full-data runner.
    FullData,
}

impl ShardKind {
    pub fn file_name(self, pod_index: usize) -> String {
        let prefix = match self {
            ShardKind::Data => DATA_SHARD_PREFIX,
            ShardKind::FullData => FULL_DATA_SHARD_PREFIX,
        };
        format!("{prefix}{pod_index}.json")
    }
}

/// One pod's `{object: {camera: {name: record}}}` mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shard(BTreeMap<String, ObjectResult>);

impl Shard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_object(&mut self, object: String, result: ObjectResult) {
        self.0.insert(object, result);
    }

    /// Absorbs another shard. Object ranges are disjoint, so no keys collide.
    pub fn extend(&mut self, other: Shard) {
        debug_assert!(other.0.keys().all(|k| !self.0.contains_key(k)));
        self.0.extend(other.0);
    }

    pub fn objects(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn object(&self, name: &str) -> Option<&ObjectResult> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of records across all objects and cameras.
    pub fn record_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|cams| cams.values())
            .map(|images| images.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_with(camera: &str, names: &[&str]) -> ObjectResult {
        let images = names
            .iter()
            .map(|n| (n.to_string(), DetectionRecord::empty()))
            .collect();
        BTreeMap::from([(camera.to_string(), images)])
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ShardKind::Data.file_name(3), "data_part_3.json");
        assert_eq!(ShardKind::FullData.file_name(0), "full_data_part_0.json");
    }

    #[test]
    fn test_extend_merges_disjoint_objects() {
        let mut a = Shard::new();
        a.insert_object("100".into(), object_with("cam0", &["a.json"]));
        let mut b = Shard::new();
        b.insert_object("101".into(), object_with("cam0", &["a.json", "b.json"]));

        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.record_count(), 3);
        assert_eq!(a.objects().collect::<Vec<_>>(), vec!["100", "101"]);
    }

    #[test]
    fn test_serializes_nested() {
        let mut shard = Shard::new();
        shard.insert_object("7".into(), object_with("c", &["x.json"]));
        assert_eq!(
            serde_json::to_string(&shard).unwrap(),
            r#"{"7":{"c":{"x.json":{}}}}"#
        );
    }
}

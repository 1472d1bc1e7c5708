use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::detection::domain::detected_face::{DetectedFace, RawValue};

/// Integer-coerced value of one detection field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Seq(Vec<i64>),
}

impl From<&RawValue> for FieldValue {
    /// Truncates toward zero; tuples keep their length.
    fn from(value: &RawValue) -> Self {
        match value {
            RawValue::Scalar(v) => FieldValue::Int(*v as i64),
            RawValue::Tuple(vs) => FieldValue::Seq(vs.iter().map(|v| *v as i64).collect()),
        }
    }
}

/// Persisted result for one image: `{}` when no face was found.
///
/// Keys serialize in sorted order, so equal records produce equal bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionRecord(BTreeMap<String, FieldValue>);

impl DetectionRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_face(face: &DetectedFace) -> Self {
        Self(
            face.fields()
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from(value)))
                .collect(),
        )
    }

    /// Record for the top-ranked face, or an empty record.
    pub fn from_first_face(faces: &[DetectedFace]) -> Self {
        faces.first().map(Self::from_face).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

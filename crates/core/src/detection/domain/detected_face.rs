use std::collections::BTreeMap;

/// Native value of one detector output field.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Scalar(f64),
    Tuple(Vec<f64>),
}

/// Landmark field names, in the order face models emit the five points.
pub const LANDMARK_NAMES: [&str; 5] = ["left_eye", "right_eye", "nose", "left_lip", "right_lip"];

/// One face as reported by a detector: named fields plus the confidence
/// used to rank faces within an image.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFace {
    fields: BTreeMap<String, RawValue>,
    confidence: f64,
}

impl DetectedFace {
    pub fn new(confidence: f64) -> Self {
        Self {
            fields: BTreeMap::new(),
            confidence,
        }
    }

    /// Corner box `(x1, y1, x2, y2)`, the five landmarks as `(x, y)` tuples
    /// and the detector `score`.
    pub fn from_box_and_landmarks(
        bbox: [f64; 4],
        landmarks: [(f64, f64); 5],
        confidence: f64,
    ) -> Self {
        let mut face = Self::new(confidence)
            .with_field("x1", RawValue::Scalar(bbox[0]))
            .with_field("y1", RawValue::Scalar(bbox[1]))
            .with_field("x2", RawValue::Scalar(bbox[2]))
            .with_field("y2", RawValue::Scalar(bbox[3]))
            .with_field("score", RawValue::Scalar(confidence));
        for (name, (x, y)) in LANDMARK_NAMES.iter().zip(landmarks) {
            face = face.with_field(name, RawValue::Tuple(vec![x, y]));
        }
        face
    }

    pub fn with_field(mut self, name: &str, value: RawValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, RawValue> {
        &self.fields
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_box_and_landmarks_field_set() {
        let face = DetectedFace::from_box_and_landmarks([1.0, 2.0, 3.0, 4.0], [(0.0, 0.0); 5], 0.9);
        let names: Vec<&str> = face.fields().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "left_eye", "left_lip", "nose", "right_eye", "right_lip", "score", "x1", "x2",
                "y1", "y2"
            ]
        );
        assert_eq!(face.fields()["x2"], RawValue::Scalar(3.0));
        assert_eq!(face.fields()["score"], RawValue::Scalar(0.9));
        assert_eq!(face.confidence(), 0.9);
    }

    #[test]
    fn test_landmarks_are_pairs() {
        let landmarks = [(1.0, 2.0), (3.0, 4.0), (5.0, 6.0), (7.0, 8.0), (9.0, 10.0)];
        let face = DetectedFace::from_box_and_landmarks([0.0; 4], landmarks, 0.5);
        assert_eq!(face.fields()["nose"], RawValue::Tuple(vec![5.0, 6.0]));
        assert_eq!(face.fields()["right_lip"], RawValue::Tuple(vec![9.0, 10.0]));
    }
}

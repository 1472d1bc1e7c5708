use regex::Regex;

use crate::shared::constants::{REPAIRABLE_FRAGMENT_PATTERN, SELECTED_FRAME_PATTERN};

/// Matches file names that embed a frame index in their first capture group.
#[derive(Clone, Debug)]
pub struct FramePattern {
    regex: Regex,
}

impl FramePattern {
    /// `NN05_img.jpg` frames sampled by the full-data runner.
    pub fn selected_frames() -> Self {
        Self::compile(SELECTED_FRAME_PATTERN)
    }

    /// `<digits>_img.json` fragments whose source image can be located.
    pub fn repairable_fragments() -> Self {
        Self::compile(REPAIRABLE_FRAGMENT_PATTERN)
    }

    fn compile(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("frame pattern must be a valid regex"),
        }
    }

    /// Digits of the frame index exactly as written in the name.
    pub fn frame_digits<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.regex
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn frame_index(&self, name: &str) -> Option<u64> {
        self.frame_digits(name).and_then(|d| d.parse().ok())
    }

    /// Matches the pattern and sits at offset 5 within its hundred.
    pub fn is_selected(&self, name: &str) -> bool {
        self.frame_index(name).is_some_and(|i| i % 100 == 5)
    }
}

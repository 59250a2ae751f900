use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonMode {
    // Existence, modify time and size
    #[default]
    Standard,
    // Standard + byte-for-byte content
    Thorough,
}

impl From<bool> for ComparisonMode {
    fn from(check_file_content: bool) -> Self {
        if check_file_content {
            ComparisonMode::Thorough
        } else {
            ComparisonMode::Standard
        }
    }
}

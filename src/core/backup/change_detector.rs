use crate::core::io_manager::IOManager;
use crate::model::comparison_mode::ComparisonMode;
use crate::model::error::Error;
use crate::model::error::io::IOError;
use std::fs;
use std::path::Path;

/// Why a file differs from its baseline counterpart, cheapest check first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDecision {
    New,
    ModifiedByTime,
    ModifiedBySize,
    ModifiedByContent,
    Unchanged,
}

impl ChangeDecision {
    pub fn is_included(self) -> bool {
        self != ChangeDecision::Unchanged
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    comparison_mode: ComparisonMode,
}

impl ChangeDetector {
    pub fn new(comparison_mode: ComparisonMode) -> Self {
        Self { comparison_mode }
    }

    pub fn should_include(&self, current: &Path, baseline: &Path) -> Result<bool, Error> {
        Ok(self.detect(current, baseline)?.is_included())
    }

    pub fn detect(&self, current: &Path, baseline: &Path) -> Result<ChangeDecision, Error> {
        let baseline_metadata = match fs::metadata(baseline) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Ok(ChangeDecision::New),
        };
        let current_metadata =
            fs::metadata(current).map_err(|err| IOError::get_metadata_failed(current, err))?;

        let current_modified = current_metadata
            .modified()
            .map_err(|err| IOError::get_metadata_failed(current, err))?;
        let baseline_modified = baseline_metadata
            .modified()
            .map_err(|err| IOError::get_metadata_failed(baseline, err))?;

        if current_modified > baseline_modified {
            return Ok(ChangeDecision::ModifiedByTime);
        }
        if current_metadata.len() != baseline_metadata.len() {
            return Ok(ChangeDecision::ModifiedBySize);
        }
        if self.comparison_mode == ComparisonMode::Thorough
            && IOManager::contents_differ(current, baseline)?
        {
            return Ok(ChangeDecision::ModifiedByContent);
        }

        Ok(ChangeDecision::Unchanged)
    }
}

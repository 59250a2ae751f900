use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Entries whose age in whole days reaches this value are expired.
    pub expiration_days: u32,
    /// Upper bound on archives kept per BackupRoot after age pruning.
    pub max_count: Option<usize>,
}

impl RetentionPolicy {
    /// Today's baseline is never expired, whatever `expiration_days` says.
    pub fn is_baseline_expired(&self, age_days: i64) -> bool {
        age_days > 0 && age_days >= i64::from(self.expiration_days)
    }

    /// A modify time in the future never expires.
    pub fn is_archive_expired(&self, age_days: i64) -> bool {
        age_days >= 0 && age_days >= i64::from(self.expiration_days)
    }
}

use crate::model::log::system::SystemLog;
use macros::log;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Fastest,
    Fast,
    #[default]
    Normal,
    Maximum,
    Ultra,
}

impl CompressionLevel {
    pub fn deflate_level(self) -> i64 {
        match self {
            CompressionLevel::Fastest => 1,
            CompressionLevel::Fast => 3,
            CompressionLevel::Normal => 6,
            CompressionLevel::Maximum => 8,
            CompressionLevel::Ultra => 9,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fastest" => Some(CompressionLevel::Fastest),
            "fast" => Some(CompressionLevel::Fast),
            "normal" => Some(CompressionLevel::Normal),
            "maximum" => Some(CompressionLevel::Maximum),
            "ultra" => Some(CompressionLevel::Ultra),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveParameters {
    pub compression_level: CompressionLevel,
}

impl ArchiveParameters {
    /// Unknown levels degrade to `Normal` with a warning instead of failing the load.
    pub fn from_config_value(value: &str) -> Self {
        let compression_level = CompressionLevel::parse(value).unwrap_or_else(|| {
            log!(SystemLog::UnknownCompressionLevel {
                value: value.to_string()
            });
            CompressionLevel::Normal
        });
        Self { compression_level }
    }
}

use crate::error::{DocragError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the chunking engine.
///
/// All parameters are explicit, caller-supplied configuration with
/// documented defaults. Validation happens before any chunking work
/// begins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target words per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Word overlap between consecutive windows of a split block
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Multiplier on `chunk_size` above which a block is split rather
    /// than kept whole
    #[serde(default = "default_oversize_factor")]
    pub oversize_factor: f32,
}

fn default_chunk_size() -> usize {
    100
}

fn default_overlap() -> usize {
    20
}

fn default_oversize_factor() -> f32 {
    1.5
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            oversize_factor: default_oversize_factor(),
        }
    }
}

impl ChunkingConfig {
    /// Validate the configuration.
    ///
    /// `overlap >= chunk_size` would make the sliding window step
    /// non-positive, so it is rejected here rather than detected
    /// mid-loop.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DocragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }

        if self.overlap >= self.chunk_size {
            return Err(DocragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    self.overlap, self.chunk_size
                ),
            });
        }

        if self.oversize_factor < 1.0 || !self.oversize_factor.is_finite() {
            return Err(DocragError::ConfigInvalid {
                key: "oversize_factor".to_string(),
                reason: format!(
                    "oversize_factor ({}) must be a finite value >= 1.0",
                    self.oversize_factor
                ),
            });
        }

        Ok(())
    }

    /// Word count above which a block is split.
    pub fn oversize_threshold(&self) -> f32 {
        self.chunk_size as f32 * self.oversize_factor
    }
}

/// Configuration for the retrieval orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of hits to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Also include the immediately preceding/following chunk when a
    /// whole-block hit is expanded. Produced too much context in
    /// practice, so it defaults to off.
    #[serde(default)]
    pub neighbor_window: bool,
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: default_top_k(), neighbor_window: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.overlap, 20);
        assert_eq!(config.oversize_factor, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = ChunkingConfig { chunk_size: 0, overlap: 0, oversize_factor: 1.5 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_at_least_chunk_size_rejected() {
        let config = ChunkingConfig { chunk_size: 50, overlap: 50, oversize_factor: 1.5 };
        assert!(config.validate().is_err());

        let config = ChunkingConfig { chunk_size: 50, overlap: 80, oversize_factor: 1.5 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversize_factor_below_one_rejected() {
        let config = ChunkingConfig { chunk_size: 100, overlap: 20, oversize_factor: 0.5 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversize_threshold() {
        let config = ChunkingConfig { chunk_size: 100, overlap: 20, oversize_factor: 1.2 };
        assert!((config.oversize_threshold() - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_retrieval_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.top_k, 5);
        assert!(!config.neighbor_window);
    }
}

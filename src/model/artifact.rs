//! The persisted model artifact.
//!
//! On-disk layout (little-endian):
//!
//! ```text
//! +--------+---------+----------+-------------+-----------------+
//! | "MDLN" | version | crc32    | payload len | bincode payload |
//! | 4 B    | u32     | u32      | u64         | len bytes       |
//! +--------+---------+----------+-------------+-----------------+
//! ```
//!
//! The payload carries the normalizer settings, both fitted vectorizers, the
//! classifier parameters and training metadata. Saving writes a sibling
//! temporary file and renames it over the target, so an interrupted save
//! never leaves a truncated artifact behind.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::normalizer::{NormalizerConfig, TextNormalizer};
use crate::error::{MoodlensError, Result};
use crate::ml::classifier::{LogisticRegression, Prediction, TrainingStats};
use crate::ml::features::{FeatureExtractor, FeatureExtractorState};

/// File signature.
pub const ARTIFACT_MAGIC: &[u8; 4] = b"MDLN";

/// Current format version.
pub const ARTIFACT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Descriptive information stored alongside the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// When training finished.
    pub created_at: DateTime<Utc>,
    /// Library version that produced the artifact.
    pub library_version: String,
    /// Number of corpus rows the model was fitted on.
    pub training_rows: usize,
    /// Known labels, sorted.
    pub labels: Vec<String>,
    /// Optimizer outcome.
    pub training: TrainingStats,
}

#[derive(Serialize, Deserialize)]
struct ArtifactPayload {
    metadata: ArtifactMetadata,
    normalizer: NormalizerConfig,
    features: FeatureExtractorState,
    classifier: LogisticRegression,
}

/// A trained, ready-to-use emotion model.
///
/// Immutable once built; share it behind an `Arc` across threads.
#[derive(Debug)]
pub struct ModelArtifact {
    metadata: ArtifactMetadata,
    normalizer: TextNormalizer,
    extractor: FeatureExtractor,
    classifier: LogisticRegression,
}

impl ModelArtifact {
    /// Assemble an artifact from fitted parts.
    pub fn new(
        normalizer: TextNormalizer,
        extractor: FeatureExtractor,
        classifier: LogisticRegression,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        if extractor.dim() != classifier.n_features() {
            return Err(MoodlensError::training(format!(
                "extractor produces {} features but classifier expects {}",
                extractor.dim(),
                classifier.n_features()
            )));
        }
        Ok(ModelArtifact {
            metadata,
            normalizer,
            extractor,
            classifier,
        })
    }

    /// Classify a raw comment: normalize, extract features, predict.
    ///
    /// Text with no known n-gram still gets a label, decided by the
    /// intercepts alone.
    pub fn predict(&self, text: &str) -> Prediction {
        let normalized = self.normalizer.normalize(text);
        let features = self.extractor.transform(&normalized);
        self.classifier.predict_with_confidence(&features)
    }

    /// Training metadata.
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Labels the model can emit.
    pub fn labels(&self) -> &[String] {
        self.classifier.classes()
    }

    /// The normalizer used for training and inference.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// The fitted feature extractor.
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// The fitted classifier.
    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Encode the artifact into its binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = ArtifactPayload {
            metadata: self.metadata.clone(),
            normalizer: self.normalizer.config().clone(),
            features: self.extractor.state(),
            classifier: self.classifier.clone(),
        };
        let body = bincode::serialize(&payload)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.write_all(ARTIFACT_MAGIC)?;
        bytes.write_u32::<LittleEndian>(ARTIFACT_VERSION)?;
        bytes.write_u32::<LittleEndian>(crc32fast::hash(&body))?;
        bytes.write_u64::<LittleEndian>(body.len() as u64)?;
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Decode an artifact. Any structural problem is reported as corrupt.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(MoodlensError::artifact_corrupt(format!(
                "artifact is {} bytes, shorter than its header",
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic)?;
        if &magic != ARTIFACT_MAGIC {
            return Err(MoodlensError::artifact_corrupt("bad file signature"));
        }
        let version = cursor.read_u32::<LittleEndian>()?;
        if version != ARTIFACT_VERSION {
            return Err(MoodlensError::artifact_corrupt(format!(
                "unsupported artifact version {version}"
            )));
        }
        let checksum = cursor.read_u32::<LittleEndian>()?;
        let len = cursor.read_u64::<LittleEndian>()?;

        let body = &bytes[HEADER_LEN..];
        if body.len() as u64 != len {
            return Err(MoodlensError::artifact_corrupt(format!(
                "payload length mismatch: header says {len}, found {}",
                body.len()
            )));
        }
        if crc32fast::hash(body) != checksum {
            return Err(MoodlensError::artifact_corrupt("checksum mismatch"));
        }

        let payload: ArtifactPayload = bincode::deserialize(body)
            .map_err(|e| MoodlensError::artifact_corrupt(format!("cannot decode payload: {e}")))?;
        Self::from_payload(payload)
    }

    fn from_payload(payload: ArtifactPayload) -> Result<Self> {
        let corrupt = |e: MoodlensError| MoodlensError::artifact_corrupt(e.to_string());

        let normalizer = TextNormalizer::from_config(payload.normalizer).map_err(corrupt)?;
        let extractor = FeatureExtractor::from_state(payload.features).map_err(corrupt)?;
        payload.classifier.validate().map_err(corrupt)?;

        Self::new(normalizer, extractor, payload.classifier, payload.metadata).map_err(corrupt)
    }

    /// Write the artifact to `path`, replacing any existing file atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let tmp = temporary_path(path);
        fs::write(&tmp, &bytes)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(path = %path.display(), bytes = bytes.len(), "saved model artifact");
        Ok(())
    }

    /// Read an artifact from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MoodlensError::artifact_missing(format!(
                    "no model at {}",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(MoodlensError::artifact_corrupt(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        Self::from_bytes(&bytes)
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

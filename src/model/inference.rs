//! Online emotion prediction.
//!
//! [`InferenceService`] never fails: with no model it answers
//! [`DEFAULT_LABEL`], and a model that cannot be loaded is logged once when
//! the service is built.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::ml::classifier::Prediction;
use crate::model::artifact::ModelArtifact;

/// Label reported when no prediction can be made.
pub const DEFAULT_LABEL: &str = "Neutral";

/// Thread-safe prediction front end over an optional model.
#[derive(Debug, Clone, Default)]
pub struct InferenceService {
    model: Option<Arc<ModelArtifact>>,
}

impl InferenceService {
    /// Wrap an already-loaded model, or none for degraded mode.
    pub fn new(model: Option<Arc<ModelArtifact>>) -> Self {
        InferenceService { model }
    }

    /// Load the artifact at `path`; degrade to the default label on failure.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match ModelArtifact::load(path) {
            Ok(artifact) => {
                debug!(path = %path.display(), labels = ?artifact.labels(), "loaded emotion model");
                Self::new(Some(Arc::new(artifact)))
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    "emotion model unavailable, predictions default to {DEFAULT_LABEL}: {e}"
                );
                Self::new(None)
            }
        }
    }

    /// Whether a model is loaded.
    pub fn is_degraded(&self) -> bool {
        self.model.is_none()
    }

    /// The loaded model, if any.
    pub fn model(&self) -> Option<&Arc<ModelArtifact>> {
        self.model.as_ref()
    }

    /// Predict the emotion label of a comment.
    pub fn predict(&self, text: &str) -> String {
        self.predict_detailed(text)
            .map(|prediction| prediction.label)
            .unwrap_or_else(|| DEFAULT_LABEL.to_string())
    }

    /// Predict with the model's confidence; `None` when the default label applies.
    pub fn predict_detailed(&self, text: &str) -> Option<Prediction> {
        let Some(model) = self.model.as_ref() else {
            debug!("no emotion model loaded, using {DEFAULT_LABEL}");
            return None;
        };
        let prediction = model.predict(text);
        debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            "predicted emotion"
        );
        Some(prediction)
    }
}

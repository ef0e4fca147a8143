// ============================================================
// Layer 2 - Prediction
// ============================================================
// ModelContext is the one object a prediction process needs:
// the training-time encoder and the frozen classifier, loaded
// together exactly once.
//
//   let ctx = ModelContext::load("artifacts")?;   // fail fast
//   let res = ctx.predict(&PredictionRequest::new(url))?;
//
// Nothing is mutated after construction. The model's parameters
// are `Send` but not `Sync`, so a context is not shared by
// reference across threads: each worker takes its own clone,
// and all clones read the same frozen weights without locking.
//
//   let worker = ctx.clone();
//   std::thread::spawn(move || worker.predict(&req));

use anyhow::{bail, Result};
use std::path::Path;

use crate::data::encoder::SequenceEncoder;
use crate::domain::prediction::{PredictError, PredictionRequest, PredictionResponse};
use crate::domain::traits::UrlScorer;
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::inferencer::Inferencer;

#[derive(Clone)]
pub struct ModelContext {
    encoder:    SequenceEncoder,
    inferencer: Inferencer,
}

impl ModelContext {
    /// Load vocabulary and classifier from an artifact directory.
    /// Any missing, corrupt or mismatched artifact is an error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let store      = ArtifactStore::new(dir.as_ref());
        let encoder    = store.load_encoder()?;
        let inferencer = Inferencer::from_store(&store)?;
        Self::from_parts(encoder, inferencer)
    }

    pub fn from_parts(encoder: SequenceEncoder, inferencer: Inferencer) -> Result<Self> {
        if encoder.max_len() != inferencer.max_len() {
            bail!(
                "Vocabulary encodes {} positions but the model expects {}",
                encoder.max_len(),
                inferencer.max_len(),
            );
        }
        if encoder.vocab().size() != inferencer.vocab_size() {
            bail!(
                "Vocabulary has {} entries but the model was trained with {}",
                encoder.vocab().size(),
                inferencer.vocab_size(),
            );
        }
        Ok(Self { encoder, inferencer })
    }

    /// Validate, encode, score and label one request.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, PredictError> {
        predict_with(self, request)
    }
}

impl UrlScorer for ModelContext {
    fn score(&self, url: &str) -> Result<f32> {
        let sequence = self.encoder.encode(url);
        self.inferencer.score_sequence(&sequence)
    }
}

/// Request handling against any scorer. Empty URLs are rejected
/// here and never reach the scorer.
pub fn predict_with<S: UrlScorer + ?Sized>(
    scorer:  &S,
    request: &PredictionRequest,
) -> Result<PredictionResponse, PredictError> {
    if request.url.is_empty() {
        return Err(PredictError::EmptyUrl);
    }
    let score = scorer
        .score(&request.url)
        .map_err(|e| PredictError::Scoring(format!("{e:#}")))?;
    Ok(PredictionResponse::from_score(request.url.clone(), score))
}

// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Runs an already-trained classifier over encoded sequences.
// Holds the model on the plain NdArray backend: no autodiff,
// dropout never applied, nothing mutated after construction.
//
// Burn parameters are `Send` but not `Sync`, so an Inferencer
// cannot be borrowed across threads. Cloning is cheap: tensor
// storage is reference counted, so every clone reads the same
// frozen weights.

use anyhow::{anyhow, bail, Result};
use burn::{backend::ndarray::NdArrayDevice, prelude::*};

use crate::infra::artifact_store::ArtifactStore;
use crate::ml::model::UrlCnn;
use crate::ml::trainer::EvalBackend;

#[derive(Clone)]
pub struct Inferencer {
    model:   UrlCnn<EvalBackend>,
    max_len: usize,
    device:  NdArrayDevice,
}

impl Inferencer {
    pub fn new(model: UrlCnn<EvalBackend>, max_len: usize) -> Self {
        Self { model, max_len, device: NdArrayDevice::default() }
    }

    /// Load the frozen model described by the store's manifest.
    pub fn from_store(store: &ArtifactStore) -> Result<Self> {
        let (model, cfg) = store.load_model::<EvalBackend>(&NdArrayDevice::default())?;
        Ok(Self::new(model, cfg.max_len))
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Rows in the embedding table; encoded indices must stay below it.
    pub fn vocab_size(&self) -> usize {
        self.model.embedding.weight.val().dims()[0]
    }

    /// Probabilities for a batch of encoded URLs, in input order.
    pub fn score_sequences(&self, sequences: &[Vec<u32>]) -> Result<Vec<f32>> {
        if sequences.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = sequences.iter().find(|s| s.len() != self.max_len) {
            bail!("Encoded sequence has length {}, model expects {}", bad.len(), self.max_len);
        }

        let flat: Vec<i32> = sequences
            .iter()
            .flat_map(|s| s.iter().map(|&x| x as i32))
            .collect();
        let input = Tensor::<EvalBackend, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([sequences.len(), self.max_len]);

        self.model
            .score(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read scores: {e:?}"))
    }

    pub fn score_sequence(&self, sequence: &[u32]) -> Result<f32> {
        let scores = self.score_sequences(&[sequence.to_vec()])?;
        scores.first().copied().ok_or_else(|| anyhow!("Model returned no score"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::UrlCnnConfig;

    fn inferencer() -> Inferencer {
        let model = UrlCnnConfig::new(6).with_max_len(10).init(&Default::default());
        Inferencer::new(model, 10)
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let inf = inferencer();
        let scores = inf
            .score_sequences(&[vec![0; 10], vec![5; 10], (0..10).map(|i| i % 6).collect()])
            .unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(inferencer().score_sequence(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_vocab_size_from_embedding() {
        assert_eq!(inferencer().vocab_size(), 6);
    }

    #[test]
    fn test_empty_batch() {
        assert!(inferencer().score_sequences(&[]).unwrap().is_empty());
    }
}

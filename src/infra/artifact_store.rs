// ============================================================
// Layer 6 - Artifact Store
// ============================================================
// Persists everything a prediction process needs, and nothing
// it would have to guess:
//
//   artifacts/
//     vocab.json          ← format_version, lowercase, max_len, chars
//     manifest.json       ← format_version, UrlCnnConfig
//     model.mpk.gz        ← Burn parameters, MessagePack + gzip
//     train_config.json   ← the TrainConfig of the run
//     metrics.csv         ← per-epoch metrics (MetricsLogger)
//
// Both JSON artifacts carry FORMAT_VERSION. A file written by a
// different format version is rejected on load instead of being
// decoded into a silently different encoder or model.
//
// Parameters are recorded at full precision so a reloaded model
// scores exactly like the one that was saved.
//
// The vocabulary stores its characters in index order, so index
// i + 1 is chars[i] and the map is rebuilt exactly.

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    encoder::SequenceEncoder,
    vocabulary::{Vocabulary, VocabularyRecord},
};
use crate::ml::model::{UrlCnn, UrlCnnConfig};

/// Bumped whenever the on-disk layout of an artifact changes.
pub const FORMAT_VERSION: u32 = 1;

const VOCAB_FILE:    &str = "vocab.json";
const MANIFEST_FILE: &str = "manifest.json";
const MODEL_FILE:    &str = "model";
const CONFIG_FILE:   &str = "train_config.json";

type ModelRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Serialize, Deserialize)]
struct VocabArtifact {
    format_version: u32,
    max_len:        usize,
    #[serde(flatten)]
    vocab:          VocabularyRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelManifest {
    format_version: u32,
    model:          UrlCnnConfig,
}

/// Reads and writes the artifacts of one training run.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))
    }

    // ─── Vocabulary ───────────────────────────────────────────────────────────

    pub fn save_encoder(&self, encoder: &SequenceEncoder) -> Result<()> {
        self.ensure_dir()?;
        let artifact = VocabArtifact {
            format_version: FORMAT_VERSION,
            max_len:        encoder.max_len(),
            vocab:          VocabularyRecord::from(encoder.vocab()),
        };
        self.write_json(VOCAB_FILE, &artifact)?;
        tracing::debug!("Saved vocabulary ({} entries)", encoder.vocab().size());
        Ok(())
    }

    /// Rebuild the exact encoder used at training time.
    pub fn load_encoder(&self) -> Result<SequenceEncoder> {
        let artifact: VocabArtifact = self.read_json(VOCAB_FILE)?;
        check_version(VOCAB_FILE, artifact.format_version)?;
        let vocab = Vocabulary::from(artifact.vocab);
        tracing::info!("Vocabulary loaded ({} entries)", vocab.size());
        Ok(SequenceEncoder::new(vocab, artifact.max_len))
    }

    // ─── Classifier ───────────────────────────────────────────────────────────

    /// Save parameters plus the architecture needed to rebuild them.
    pub fn save_model<B: Backend>(&self, model: &UrlCnn<B>, config: &UrlCnnConfig) -> Result<()> {
        self.ensure_dir()?;
        let manifest = ModelManifest { format_version: FORMAT_VERSION, model: config.clone() };
        self.write_json(MANIFEST_FILE, &manifest)?;

        // The recorder appends its own `.mpk.gz` extension
        let path = self.dir.join(MODEL_FILE);
        ModelRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::debug!("Saved model parameters to '{}'", path.display());
        Ok(())
    }

    /// Rebuild the architecture from the manifest and load the
    /// trained parameters into it.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<(UrlCnn<B>, UrlCnnConfig)> {
        let manifest: ModelManifest = self.read_json(MANIFEST_FILE)?;
        check_version(MANIFEST_FILE, manifest.format_version)?;

        let path   = self.dir.join(MODEL_FILE);
        let record = ModelRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained the model first?", path.display())
            })?;

        let model = manifest.model.init::<B>(device).load_record(record);
        tracing::info!("Model loaded (vocab_size={})", manifest.model.vocab_size);
        Ok((model, manifest.model))
    }

    // ─── Training config ──────────────────────────────────────────────────────

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        self.write_json(CONFIG_FILE, cfg)
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("Cannot write '{}'", path.display()))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Make sure you have run 'train' first.", path.display())
        })?;
        serde_json::from_str(&json).with_context(|| format!("Corrupt artifact '{}'", path.display()))
    }
}

fn check_version(name: &str, found: u32) -> Result<()> {
    if found != FORMAT_VERSION {
        bail!("'{name}' has format version {found}, this build reads version {FORMAT_VERSION}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn encoder() -> SequenceEncoder {
        SequenceEncoder::new(Vocabulary::build(&["http://a.com/x?y=z"], true), 200)
    }

    #[test]
    fn test_encoder_round_trip() {
        let dir   = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let enc   = encoder();
        store.save_encoder(&enc).unwrap();

        let loaded = store.load_encoder().unwrap();
        assert_eq!(loaded.vocab(), enc.vocab());
        assert_eq!(loaded.max_len(), 200);
        assert_eq!(loaded.encode("http://a.com"), enc.encode("http://a.com"));
    }

    #[test]
    fn test_model_round_trip_keeps_scores() {
        let dir    = tempfile::TempDir::new().unwrap();
        let store  = ArtifactStore::new(dir.path());
        let device = Default::default();
        let cfg    = UrlCnnConfig::new(8).with_max_len(16);
        let model: UrlCnn<NdArray> = cfg.init(&device);
        store.save_model(&model, &cfg).unwrap();

        let (loaded, loaded_cfg) = store.load_model::<NdArray>(&device).unwrap();
        assert_eq!(loaded_cfg.vocab_size, 8);

        let input = Tensor::<NdArray, 1, Int>::from_ints([1; 16], &device).reshape([1, 16]);
        let a: Vec<f32> = model.score(input.clone()).into_data().to_vec().unwrap();
        let b: Vec<f32> = loaded.score(input).into_data().to_vec().unwrap();
        assert!((a[0] - b[0]).abs() < 1e-6);
    }

    #[test]
    fn test_missing_artifacts_fail() {
        let dir   = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.load_encoder().is_err());
        assert!(store.load_model::<NdArray>(&Default::default()).is_err());
    }

    #[test]
    fn test_wrong_format_version_is_rejected() {
        let dir   = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save_encoder(&encoder()).unwrap();

        let path = dir.path().join(VOCAB_FILE);
        let json = fs::read_to_string(&path).unwrap().replace(
            "\"format_version\": 1",
            "\"format_version\": 99",
        );
        fs::write(&path, json).unwrap();

        let err = store.load_encoder().unwrap_err();
        assert!(err.to_string().contains("format version 99"));
    }
}

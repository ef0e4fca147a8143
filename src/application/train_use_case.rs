// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one training run, in order:
//
//   Step 1: Load labelled rows          (Layer 4 - data)
//   Step 2: Balance the two classes     (Layer 4 - data)
//   Step 3: Build the vocabulary        (Layer 4 - data)
//   Step 4: Encode every URL            (Layer 4 - data)
//   Step 5: Stratified train/test split (Layer 4 - data)
//   Step 6: Carve validation from train (Layer 4 - data)
//   Step 7: Save config                 (Layer 6 - infra)
//   Step 8: Fit the model               (Layer 5 - ml)
//   Step 9: Evaluate on held-out test   (Layer 5 - ml)
//   Step 10: Persist vocab + model      (Layer 6 - infra)
//
// A corpus that cannot be read stops the run at Step 1, before
// any training work happens.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    balancer::{balance_classes, class_counts},
    dataset::{UrlDataset, UrlSample},
    encoder::{SequenceEncoder, MAX_LEN},
    loader::CsvCorpusLoader,
    splitter::{split_train_val, stratified_split},
    vocabulary::Vocabulary,
};
use crate::domain::traits::CorpusSource;
use crate::infra::{artifact_store::ArtifactStore, metrics::MetricsLogger};
use crate::ml::{
    model::UrlCnnConfig,
    trainer::{eval_loader, evaluate, run_training, EvalBackend, Evaluation},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Saved next to the artifacts so a run
// can be inspected or repeated later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:   String,
    pub artifact_dir:  String,
    pub max_len:       usize,
    pub batch_size:    usize,
    pub epochs:        usize,
    pub lr:            f64,
    pub embed_dim:     usize,
    pub filters:       usize,
    pub kernel_size:   usize,
    pub hidden:        usize,
    pub dropout:       f64,
    /// Share of the balanced corpus held out for the final test
    pub test_fraction: f64,
    /// Share of the training split used for per-epoch validation
    pub val_fraction:  f64,
    pub lowercase:     bool,
    pub seed:          u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:   "benign_vs_defacement_urls.csv".to_string(),
            artifact_dir:  "artifacts".to_string(),
            max_len:       MAX_LEN,
            batch_size:    64,
            epochs:        5,
            lr:            1e-3,
            embed_dim:     64,
            filters:       128,
            kernel_size:   3,
            hidden:        64,
            dropout:       0.5,
            test_fraction: 0.2,
            val_fraction:  0.1,
            lowercase:     true,
            seed:          42,
        }
    }
}

impl TrainConfig {
    /// Architecture for a vocabulary of `vocab_size` entries.
    pub fn model_config(&self, vocab_size: usize) -> UrlCnnConfig {
        UrlCnnConfig::new(vocab_size)
            .with_max_len(self.max_len)
            .with_embed_dim(self.embed_dim)
            .with_filters(self.filters)
            .with_kernel_size(self.kernel_size)
            .with_hidden(self.hidden)
            .with_dropout(self.dropout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.epochs == 0 {
            bail!("batch_size and epochs must be positive");
        }
        if self.max_len < self.kernel_size {
            bail!("max_len ({}) must be at least kernel_size ({})", self.max_len, self.kernel_size);
        }
        for (name, f) in [("test_fraction", self.test_fraction), ("val_fraction", self.val_fraction)] {
            if !(0.0..1.0).contains(&f) {
                bail!("{name} must be in [0, 1), got {f}");
            }
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        Ok(())
    }
}

/// What a finished run reports back to the CLI.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Rows per class after balancing
    pub per_class:  usize,
    pub train_rows: usize,
    pub val_rows:   usize,
    pub test_rows:  usize,
    pub vocab_size: usize,
    pub test:       Evaluation,
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline against the configured CSV corpus.
    pub fn execute(&self) -> Result<TrainReport> {
        let loader = CsvCorpusLoader::new(&self.config.corpus_path);
        self.execute_with(&loader)
    }

    /// Run the full pipeline against any corpus source.
    pub fn execute_with(&self, source: &dyn CorpusSource) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let rows = source.load_all()?;
        let (benign, defacement) = class_counts(&rows);
        tracing::info!("Corpus: {} benign, {} defacement", benign, defacement);
        if benign == 0 || defacement == 0 {
            bail!("Corpus needs both classes to train (benign={benign}, defacement={defacement})");
        }

        let mut rng = StdRng::seed_from_u64(cfg.seed);

        // ── Step 2: Balance ───────────────────────────────────────────────────
        let balanced  = balance_classes(rows, &mut rng);
        let per_class = balanced.len() / 2;
        tracing::info!("Balanced to {} rows per class", per_class);

        // ── Step 3: Vocabulary ────────────────────────────────────────────────
        let urls: Vec<&str> = balanced.iter().map(|r| r.url.as_str()).collect();
        let vocab   = Vocabulary::build(&urls, cfg.lowercase);
        let encoder = SequenceEncoder::new(vocab, cfg.max_len);
        tracing::info!("Vocabulary built: {} entries", encoder.vocab().size());

        // ── Step 4: Encode ────────────────────────────────────────────────────
        let samples: Vec<UrlSample> = encoder
            .encode_batch(&urls)
            .into_iter()
            .zip(&balanced)
            .map(|(indices, r)| UrlSample::new(indices, r.label.as_target()))
            .collect();

        // ── Step 5 + 6: Splits ────────────────────────────────────────────────
        let (train, test) =
            stratified_split(samples, 1.0 - cfg.test_fraction, &mut rng, |s| s.target);
        let (fit, val) = split_train_val(train, 1.0 - cfg.val_fraction, &mut rng);
        tracing::info!(
            "Split: {} train, {} validation, {} test",
            fit.len(), val.len(), test.len(),
        );
        let (train_rows, val_rows, test_rows) = (fit.len(), val.len(), test.len());

        // ── Step 7: Save config ───────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.artifact_dir);
        store.save_config(cfg)?;
        let metrics = MetricsLogger::new(store.dir())?;

        // ── Step 8: Fit ───────────────────────────────────────────────────────
        let model_cfg = cfg.model_config(encoder.vocab().size());
        let model = run_training(
            cfg,
            &model_cfg,
            UrlDataset::new(fit),
            UrlDataset::new(val),
            &metrics,
        )?;
        tracing::info!("Epoch metrics written to '{}'", metrics.csv_path().display());

        // ── Step 9: Held-out evaluation ───────────────────────────────────────
        let test_loader = eval_loader::<EvalBackend>(
            UrlDataset::new(test),
            cfg.batch_size,
            Default::default(),
        );
        let test_eval = evaluate(&model, test_loader.as_ref());
        tracing::info!(
            "Test accuracy {:.2}% | test loss {:.4}",
            test_eval.accuracy * 100.0, test_eval.loss,
        );

        // ── Step 10: Persist ──────────────────────────────────────────────────
        store.save_encoder(&encoder)?;
        store.save_model(&model, &model_cfg)?;
        tracing::info!("Artifacts saved to '{}'", store.dir().display());

        Ok(TrainReport {
            per_class,
            train_rows,
            val_rows,
            test_rows,
            vocab_size: encoder.vocab().size(),
            test: test_eval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::labeled_url::{Label, LabeledUrl};

    struct FixedCorpus(Vec<LabeledUrl>);

    impl CorpusSource for FixedCorpus {
        fn load_all(&self) -> Result<Vec<LabeledUrl>> {
            Ok(self.0.clone())
        }
    }

    fn small_config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            artifact_dir: dir.display().to_string(),
            batch_size:   4,
            epochs:       2,
            ..TrainConfig::default()
        }
    }

    fn six_rows() -> Vec<LabeledUrl> {
        vec![
            LabeledUrl::new("http://www.google.com", Label::Benign),
            LabeledUrl::new("https://github.com/rust-lang", Label::Benign),
            LabeledUrl::new("http://en.wikipedia.org/wiki/Rust", Label::Benign),
            LabeledUrl::new("http://victim.org/index.php?option=com_content&view=article", Label::Defacement),
            LabeledUrl::new("http://hacked.net/index.php?option=com_user&task=register", Label::Defacement),
            LabeledUrl::new("http://site.br/index.php?option=com_mailto&tmpl=component", Label::Defacement),
        ]
    }

    #[test]
    fn test_end_to_end_small_corpus() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = TrainUseCase::new(small_config(dir.path()))
            .execute_with(&FixedCorpus(six_rows()))
            .unwrap();

        assert_eq!(report.per_class, 3);
        assert_eq!(report.train_rows + report.val_rows + report.test_rows, 6);
        assert_eq!(report.test_rows, 2);
        assert_eq!(report.val_rows, 1);
        assert!((0.0..=1.0).contains(&report.test.accuracy));

        let metrics = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(metrics.lines().count(), 3);
        assert!(!metrics.contains("NaN"));

        for file in ["vocab.json", "manifest.json", "model.mpk.gz", "train_config.json", "metrics.csv"] {
            assert!(dir.path().join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn test_csv_corpus_end_to_end() {
        let dir  = tempfile::TempDir::new().unwrap();
        let csv  = dir.path().join("corpus.csv");
        let mut text = String::from("url,type\n");
        for r in six_rows() {
            let ty = if r.label == Label::Benign { "benign" } else { "defacement" };
            text.push_str(&format!("{},{}\n", r.url, ty));
        }
        text.push_str("broken,row,here\n");
        std::fs::write(&csv, text).unwrap();

        let cfg = TrainConfig {
            corpus_path: csv.display().to_string(),
            ..small_config(&dir.path().join("out"))
        };
        let report = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.per_class, 3);
    }

    #[test]
    fn test_missing_corpus_aborts_before_training() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = TrainConfig {
            corpus_path: dir.path().join("nope.csv").display().to_string(),
            ..small_config(&dir.path().join("out"))
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_single_class_corpus_is_rejected() {
        let dir  = tempfile::TempDir::new().unwrap();
        let rows = vec![LabeledUrl::new("http://a.com", Label::Benign)];
        let err  = TrainUseCase::new(small_config(dir.path()))
            .execute_with(&FixedCorpus(rows))
            .unwrap_err();
        assert!(err.to_string().contains("both classes"));
    }

    #[test]
    fn test_config_validation() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig { batch_size: 0, ..TrainConfig::default() }.validate().is_err());
        assert!(TrainConfig { test_fraction: 1.0, ..TrainConfig::default() }.validate().is_err());
        assert!(TrainConfig { max_len: 2, ..TrainConfig::default() }.validate().is_err());
    }

    #[test]
    fn test_model_config_follows_train_config() {
        let m = TrainConfig::default().model_config(37);
        assert_eq!(m.vocab_size, 37);
        assert_eq!(m.max_len, 200);
        assert_eq!(m.filters, 128);
    }
}

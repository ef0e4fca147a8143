// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Fits the URL classifier with Adam + binary cross-entropy.
//
//   - Training runs on Autodiff<NdArray> with Mode::Train, so
//     dropout is active and gradients are tracked
//   - model.valid() drops autodiff; validation and the final
//     held-out evaluation run on plain NdArray with Mode::Infer
//   - Losses are averaged per sample, not per batch, so a short
//     final batch does not skew the epoch mean

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::activation,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{UrlBatch, UrlBatcher},
    dataset::UrlDataset,
};
use crate::domain::prediction::DECISION_THRESHOLD;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{Mode, UrlCnn, UrlCnnConfig};

pub type TrainBackend = Autodiff<NdArray>;
pub type EvalBackend  = NdArray;

/// Loss and accuracy of a model over one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Mean BCE per sample; NaN when there were no samples
    pub loss:     f64,
    /// Fraction classified correctly, in [0.0, 1.0]
    pub accuracy: f64,
    pub samples:  usize,
}

/// Train a fresh model and return it frozen on the inference backend.
pub fn run_training(
    cfg:         &TrainConfig,
    model_cfg:   &UrlCnnConfig,
    train_data:  UrlDataset,
    val_data:    UrlDataset,
    metrics:     &MetricsLogger,
) -> Result<UrlCnn<EvalBackend>> {
    let device = NdArrayDevice::default();
    TrainBackend::seed(cfg.seed);

    let mut model: UrlCnn<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: vocab={}, embed={}, filters={}x{}, hidden={}",
        model_cfg.vocab_size, model_cfg.embed_dim, model_cfg.filters,
        model_cfg.kernel_size, model_cfg.hidden,
    );

    let mut optim = AdamConfig::new().init();

    let train_loader = DataLoaderBuilder::new(UrlBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_data);

    let val_loader = eval_loader::<EvalBackend>(val_data, cfg.batch_size, device.clone());

    let mut best_val_loss = f64::INFINITY;

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let n = batch.targets.dims()[0];
            let (loss, _) = model.forward_loss(batch.indices, batch.targets, Mode::Train);

            loss_sum += loss.clone().into_scalar().elem::<f64>() * n as f64;
            seen     += n;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if seen > 0 { loss_sum / seen as f64 } else { f64::NAN };
        let val        = evaluate(&model.valid(), val_loader.as_ref());
        let m          = EpochMetrics::new(epoch, train_loss, val.loss, val.accuracy);

        tracing::info!(
            "Epoch {:>2}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, train_loss, val.loss, val.accuracy * 100.0,
        );
        if m.is_improvement(best_val_loss) {
            best_val_loss = m.val_loss;
            tracing::debug!("New best validation loss {:.4}", best_val_loss);
        }
        metrics.log(&m)?;
    }

    Ok(model.valid())
}

/// Loader for evaluation: fixed order, no shuffling.
pub fn eval_loader<B: Backend>(
    dataset:    UrlDataset,
    batch_size: usize,
    device:     B::Device,
) -> Arc<dyn DataLoader<UrlBatch<B>>> {
    DataLoaderBuilder::new(UrlBatcher::<B>::new(device))
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset)
}

/// Mean loss and accuracy of `model` over every batch in `loader`,
/// in inference mode.
pub fn evaluate<B: Backend>(model: &UrlCnn<B>, loader: &dyn DataLoader<UrlBatch<B>>) -> Evaluation {
    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut samples  = 0usize;

    for batch in loader.iter() {
        let n = batch.targets.dims()[0];
        let (loss, logits) = model.forward_loss(batch.indices, batch.targets.clone(), Mode::Infer);

        let predicted = activation::sigmoid(logits)
            .greater_elem(DECISION_THRESHOLD)
            .int();
        let hits: i64 = predicted
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();

        loss_sum += loss.into_scalar().elem::<f64>() * n as f64;
        correct  += hits as usize;
        samples  += n;
    }

    if samples == 0 {
        return Evaluation { loss: f64::NAN, accuracy: 0.0, samples };
    }
    Evaluation {
        loss:     loss_sum / samples as f64,
        accuracy: correct as f64 / samples as f64,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::UrlSample;

    fn toy_samples() -> Vec<UrlSample> {
        // Class is fully determined by which index fills the tail
        (0..16)
            .map(|i| {
                let target = (i % 2) as u8;
                let fill   = if target == 1 { 3 } else { 1 };
                let mut seq = vec![0u32; 8];
                seq[4..].iter_mut().for_each(|x| *x = fill);
                UrlSample::new(seq, target)
            })
            .collect()
    }

    #[test]
    fn test_evaluate_empty_loader() {
        let model: UrlCnn<EvalBackend> = UrlCnnConfig::new(4).with_max_len(8).init(&Default::default());
        let loader = eval_loader::<EvalBackend>(UrlDataset::new(Vec::new()), 4, Default::default());
        let e = evaluate(&model, loader.as_ref());
        assert_eq!(e.samples, 0);
        assert!(e.loss.is_nan());
        assert_eq!(e.accuracy, 0.0);
    }

    #[test]
    fn test_evaluate_reports_bounded_accuracy() {
        let model: UrlCnn<EvalBackend> = UrlCnnConfig::new(4).with_max_len(8).init(&Default::default());
        let loader = eval_loader::<EvalBackend>(UrlDataset::new(toy_samples()), 5, Default::default());
        let e = evaluate(&model, loader.as_ref());
        assert_eq!(e.samples, 16);
        assert!((0.0..=1.0).contains(&e.accuracy));
        assert!(e.loss.is_finite());
    }

    #[test]
    fn test_training_logs_every_epoch() {
        let dir = tempfile::TempDir::new().unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();
        let cfg = TrainConfig { epochs: 3, batch_size: 4, ..TrainConfig::default() };
        let model_cfg = UrlCnnConfig::new(4)
            .with_max_len(8)
            .with_embed_dim(8)
            .with_filters(8)
            .with_hidden(8);

        let samples = toy_samples();
        let (val, train) = samples.split_at(4);
        run_training(
            &cfg,
            &model_cfg,
            UrlDataset::new(train.to_vec()),
            UrlDataset::new(val.to_vec()),
            &metrics,
        )
        .unwrap();

        let text = std::fs::read_to_string(metrics.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1 + 3);
    }
}

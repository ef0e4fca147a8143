// ============================================================
// Layer 4 - URL Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks N encoded samples of
// equal length S into tensors the model can consume.
//
//   indices: [N, S]  Int
//   targets: [N]     Int  (0 = benign, 1 = defacement)
//
// Every sample is already padded to the same length by the
// SequenceEncoder, so stacking is a flatten + reshape.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::UrlSample;

#[derive(Debug, Clone)]
pub struct UrlBatch<B: Backend> {
    /// Encoded URLs, shape [batch_size, seq_len]
    pub indices: Tensor<B, 2, Int>,

    /// Ground truth classes, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the device tensors are created on.
#[derive(Clone, Debug)]
pub struct UrlBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> UrlBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<UrlSample, UrlBatch<B>> for UrlBatcher<B> {
    fn batch(&self, items: Vec<UrlSample>) -> UrlBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|s| s.indices.len()).unwrap_or(0);

        // Burn Int tensors are built from i32 slices
        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.indices.iter().map(|&x| x as i32))
            .collect();
        let targets: Vec<i32> = items.iter().map(|s| s.target as i32).collect();

        let indices = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        UrlBatch { indices, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = UrlBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            UrlSample::new(vec![0, 0, 1, 2], 0),
            UrlSample::new(vec![3, 1, 2, 2], 1),
            UrlSample::new(vec![0, 0, 0, 4], 1),
        ]);
        assert_eq!(batch.indices.dims(), [3, 4]);
        assert_eq!(batch.targets.dims(), [3]);

        let targets: Vec<i64> = batch
            .targets
            .into_data()
            .iter::<i64>()
            .collect();
        assert_eq!(targets, vec![0, 1, 1]);
    }
}

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded URL with its 0/1 target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSample {
    pub indices: Vec<u32>,
    pub target:  u8,
}

impl UrlSample {
    pub fn new(indices: Vec<u32>, target: u8) -> Self {
        Self { indices, target }
    }
}

pub struct UrlDataset {
    samples: Vec<UrlSample>,
}

impl UrlDataset {
    pub fn new(samples: Vec<UrlSample>) -> Self { Self { samples } }
}

impl Dataset<UrlSample> for UrlDataset {
    fn get(&self, index: usize) -> Option<UrlSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

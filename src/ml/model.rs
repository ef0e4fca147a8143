use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::BinaryCrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation,
};

/// Whether the forward pass is part of fitting or of scoring.
/// Dropout is only applied in `Train`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Infer,
}

// #[derive(Config)] supplies Clone + Serialize/Deserialize and the
// `new(vocab_size)` / `with_*` builder.
#[derive(Config, Debug)]
pub struct UrlCnnConfig {
    /// Embedding rows: distinct characters + 1 for padding
    pub vocab_size:  usize,
    #[config(default = 200)]
    pub max_len:     usize,
    #[config(default = 64)]
    pub embed_dim:   usize,
    #[config(default = 128)]
    pub filters:     usize,
    #[config(default = 3)]
    pub kernel_size: usize,
    #[config(default = 64)]
    pub hidden:      usize,
    #[config(default = 0.5)]
    pub dropout:     f64,
}

impl UrlCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> UrlCnn<B> {
        UrlCnn {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embed_dim).init(device),
            conv:      Conv1dConfig::new(self.embed_dim, self.filters, self.kernel_size).init(device),
            dense:     LinearConfig::new(self.filters, self.hidden).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            output:    LinearConfig::new(self.hidden, 1).init(device),
        }
    }
}

/// Character-level CNN:
///
///   indices [B, L]
///     → embedding        [B, L, E]
///     → conv1d + relu    [B, F, L-k+1]
///     → global max pool  [B, F]
///     → dense + relu     [B, H]
///     → dropout (Train only)
///     → dense            [B]   (logit)
#[derive(Module, Debug)]
pub struct UrlCnn<B: Backend> {
    pub embedding: Embedding<B>,
    pub conv:      Conv1d<B>,
    pub dense:     Linear<B>,
    pub dropout:   Dropout,
    pub output:    Linear<B>,
}

impl<B: Backend> UrlCnn<B> {
    /// indices: [batch, seq_len] → logits: [batch]
    pub fn forward(&self, indices: Tensor<B, 2, Int>, mode: Mode) -> Tensor<B, 1> {
        let [batch_size, _] = indices.dims();

        let x = self.embedding.forward(indices);
        // Conv1d wants channels before the sequence axis
        let x = x.swap_dims(1, 2);
        let x = activation::relu(self.conv.forward(x));

        let [_, filters, _] = x.dims();
        let x = x.max_dim(2).reshape([batch_size, filters]);

        let x = activation::relu(self.dense.forward(x));
        let x = match mode {
            Mode::Train => self.dropout.forward(x),
            Mode::Infer => x,
        };

        self.output.forward(x).reshape([batch_size])
    }

    /// Probabilities in [0, 1], always in inference mode.
    pub fn score(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        activation::sigmoid(self.forward(indices, Mode::Infer))
    }

    /// Binary cross-entropy against 0/1 targets. Returns the
    /// scalar loss and the logits it was computed from.
    pub fn forward_loss(
        &self,
        indices: Tensor<B, 2, Int>,
        targets: Tensor<B, 1, Int>,
        mode:    Mode,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward(indices, mode);
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), targets);
        (loss, logits)
    }
}

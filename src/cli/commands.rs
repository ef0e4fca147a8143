// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// `train`   - fit the classifier on a labelled CSV corpus
// `predict` - classify URLs with previously saved artifacts

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the URL classifier on a `url,type` CSV corpus
    Train(TrainArgs),

    /// Classify URLs using saved artifacts
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with `url` and `type` (benign/defacement) columns
    #[arg(long, default_value = "benign_vs_defacement_urls.csv")]
    pub corpus: String,

    /// Directory to write vocabulary, model and metrics into
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Encoded sequence length; longer URLs keep their tail
    #[arg(long, default_value_t = 200)]
    pub max_len: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Full passes over the training split
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Character embedding width
    #[arg(long, default_value_t = 64)]
    pub embed_dim: usize,

    /// Number of convolution filters
    #[arg(long, default_value_t = 128)]
    pub filters: usize,

    /// Convolution window, in characters
    #[arg(long, default_value_t = 3)]
    pub kernel_size: usize,

    /// Width of the hidden dense layer
    #[arg(long, default_value_t = 64)]
    pub hidden: usize,

    /// Dropout rate applied during training only
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Share of the balanced corpus held out for testing
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Share of the training split used for per-epoch validation
    #[arg(long, default_value_t = 0.1)]
    pub val_fraction: f64,

    /// Keep letter case instead of lowercasing URLs
    #[arg(long)]
    pub case_sensitive: bool,

    /// Seed for balancing, shuffling, splitting and weight init
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:   a.corpus,
            artifact_dir:  a.artifact_dir,
            max_len:       a.max_len,
            batch_size:    a.batch_size,
            epochs:        a.epochs,
            lr:            a.lr,
            embed_dim:     a.embed_dim,
            filters:       a.filters,
            kernel_size:   a.kernel_size,
            hidden:        a.hidden,
            dropout:       a.dropout,
            test_fraction: a.test_fraction,
            val_fraction:  a.val_fraction,
            lowercase:     !a.case_sensitive,
            seed:          a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// URLs to classify; a small built-in sample list is used if none are given
    pub urls: Vec<String>,

    /// Directory the `train` command wrote its artifacts to
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Print one JSON response object per line
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["url-guard", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();
        assert_eq!(cfg.max_len, def.max_len);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.corpus_path, def.corpus_path);
        assert!(cfg.lowercase);
    }

    #[test]
    fn test_predict_collects_urls() {
        let cli = Cli::try_parse_from(["url-guard", "predict", "--json", "http://a.com", "http://b.org"])
            .unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.urls, vec!["http://a.com", "http://b.org"]);
        assert!(args.json);
        assert_eq!(args.artifact_dir, "artifacts");
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LfError, Result};
use crate::eval::driver::{EvalOptions, DEFAULT_TOP_K};
use crate::eval::sink::{METRICS_FILE, RESULTS_FILE};
use crate::retrieval::candidates::DateWindow;
use crate::text::tfidf::{TfidfOptions, DEFAULT_MIN_DOC_FREQ};
use crate::text::tokenize::NgramRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub candidates: CandidatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            candidates: CandidatesConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with the usual layering: defaults, then the
    /// global file, then the project file, then `LFMATCH_*` environment
    /// overrides. An explicit path (flag or `LFMATCH_CONFIG`) replaces
    /// both files.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("LFMATCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Evaluation options implied by this configuration.
    #[must_use]
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            tfidf: TfidfOptions {
                ngrams: self.vectorizer.ngrams,
                min_doc_freq: self.vectorizer.min_doc_freq,
            },
            window: self.candidates.days_window,
            top_k: self.output.top_k,
        }
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(base) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&base.join("lfmatch/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join("lfmatch.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| LfError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| LfError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.vectorizer {
            self.vectorizer.merge(patch);
        }
        if let Some(patch) = patch.candidates {
            self.candidates.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("LFMATCH_NGRAMS") {
            self.vectorizer.ngrams = parse_ngrams(&value)?;
        }
        if let Some(value) = env_u32("LFMATCH_MIN_DOC_FREQ")? {
            self.vectorizer.min_doc_freq = value;
        }
        if let Some(value) = env_string("LFMATCH_DAYS_WINDOW") {
            self.candidates.days_window = value.parse().map_err(LfError::Config)?;
        }
        if let Some(value) = env_usize("LFMATCH_TOP_K")? {
            self.output.top_k = value;
        }
        if let Some(value) = env_string("LFMATCH_RESULTS_FILE") {
            self.output.results_file = value;
        }
        if let Some(value) = env_string("LFMATCH_METRICS_FILE") {
            self.output.metrics_file = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.vectorizer.min_doc_freq == 0 {
            return Err(LfError::Config(
                "vectorizer.min_doc_freq must be at least 1".to_string(),
            ));
        }
        if self.output.top_k == 0 {
            return Err(LfError::Config(
                "output.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    #[serde(default)]
    pub ngrams: NgramRange,
    #[serde(default = "default_min_doc_freq")]
    pub min_doc_freq: u32,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngrams: NgramRange::default(),
            min_doc_freq: DEFAULT_MIN_DOC_FREQ,
        }
    }
}

impl VectorizerConfig {
    fn merge(&mut self, patch: VectorizerPatch) {
        if let Some(value) = patch.ngrams {
            self.ngrams = value;
        }
        if let Some(value) = patch.min_doc_freq {
            self.min_doc_freq = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesConfig {
    #[serde(default)]
    pub days_window: DateWindow,
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            days_window: DateWindow::default(),
        }
    }
}

impl CandidatesConfig {
    fn merge(&mut self, patch: CandidatesPatch) {
        if let Some(value) = patch.days_window {
            self.days_window = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_results_file")]
    pub results_file: String,
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            results_file: RESULTS_FILE.to_string(),
            metrics_file: METRICS_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.top_k {
            self.top_k = value;
        }
        if let Some(value) = patch.results_file {
            self.results_file = value;
        }
        if let Some(value) = patch.metrics_file {
            self.metrics_file = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub vectorizer: Option<VectorizerPatch>,
    pub candidates: Option<CandidatesPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct VectorizerPatch {
    pub ngrams: Option<NgramRange>,
    pub min_doc_freq: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidatesPatch {
    pub days_window: Option<DateWindow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub top_k: Option<usize>,
    pub results_file: Option<String>,
    pub metrics_file: Option<String>,
}

fn default_min_doc_freq() -> u32 {
    DEFAULT_MIN_DOC_FREQ
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_results_file() -> String {
    RESULTS_FILE.to_string()
}

fn default_metrics_file() -> String {
    METRICS_FILE.to_string()
}

fn parse_ngrams(value: &str) -> Result<NgramRange> {
    match value.to_lowercase().as_str() {
        "unigram" => Ok(NgramRange::Unigram),
        "unigram_bigram" | "unigram-bigram" | "unigrambigram" => Ok(NgramRange::UnigramBigram),
        _ => Err(LfError::Config(format!(
            "invalid ngrams {value} (expected unigram|unigram_bigram)"
        ))),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| LfError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| LfError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

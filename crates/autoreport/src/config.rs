//! YAML configuration files.
//!
//! Two files drive a run: the pipeline configuration (`config/config.yml`)
//! naming the input data and the expected columns, and the LLM configuration
//! (`config/llm_config.yml`) holding provider settings and prompt templates.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::llm::{LlmConfig, PromptTemplates, ProviderKind};
use crate::validation::ValidationConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yml";
pub const DEFAULT_LLM_CONFIG_PATH: &str = "config/llm_config.yml";

/// Read and deserialize a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReportError::Config(format!(
            "Config file not found at: {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    serde_yaml::from_str(&text).map_err(|source| ReportError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Contents of `config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data: DataSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    pub input_path: PathBuf,
    /// Path of the HTML report; only its file name is used.
    #[serde(default = "default_report_path")]
    pub output_path: PathBuf,
    /// Columns the input must provide.
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("output/report.html")
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Minimal configuration for a single input file.
    pub fn for_input(input_path: impl Into<PathBuf>) -> Self {
        Self {
            data: DataSection {
                input_path: input_path.into(),
                output_path: default_report_path(),
                columns: Vec::new(),
            },
            output: OutputSection::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// File name for the HTML report.
    pub fn report_file_name(&self) -> String {
        self.data
            .output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::report::DEFAULT_HTML_FILE.to_string())
    }
}

/// Contents of `llm_config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub llm: LlmSection,
    pub prompts: PromptTemplates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Falls back to the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: usize,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_temperature() -> f64 {
    LlmConfig::default().temperature
}

fn default_max_output_tokens() -> usize {
    LlmConfig::default().max_tokens
}

impl LlmSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Generation settings for the configured provider.
    pub fn llm_config(&self) -> LlmConfig {
        let model = self
            .llm
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.llm.provider.default_model().to_string());
        LlmConfig {
            model,
            max_tokens: self.llm.max_output_tokens,
            temperature: self.llm.temperature,
        }
    }
}

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};

/// Main configuration structure for interview_gen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AI provider configurations
    #[serde(default)]
    pub ai_providers: AIProvidersConfig,

    /// Question generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIProvidersConfig {
    /// Gemini configuration
    pub gemini: Option<ProviderConfig>,

    /// OpenRouter configuration
    pub openrouter: Option<ProviderConfig>,

    /// Ollama configuration
    pub ollama: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,

    /// Model to use
    pub model: String,

    /// Temperature setting
    pub temperature: Option<f32>,

    /// Override for the API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of questions across all sections
    #[serde(default = "default_total_questions")]
    pub total_questions: usize,

    /// Difficulty used when none is given on the command line
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format ("terminal", "plain", "json")
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colorful output
    #[serde(default = "default_colorful")]
    pub colorful: bool,

    /// Directory the raw question text is saved to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Save the raw question text after every run
    #[serde(default = "default_save_raw")]
    pub save_raw: bool,
}

// Default value functions
fn default_total_questions() -> usize { 28 }
fn default_difficulty() -> String { "Intermediate".to_string() }
fn default_format() -> String { "terminal".to_string() }
fn default_colorful() -> bool { true }
fn default_output_dir() -> String { ".".to_string() }
fn default_save_raw() -> bool { false }

impl Default for AIProvidersConfig {
    fn default() -> Self {
        AIProvidersConfig {
            gemini: Some(ProviderConfig {
                enabled: true,
                model: "gemini-2.5-flash".to_string(),
                temperature: Some(0.7),
                base_url: None,
            }),
            openrouter: Some(ProviderConfig {
                enabled: false,
                model: "google/gemini-2.5-flash".to_string(),
                temperature: Some(0.7),
                base_url: None,
            }),
            ollama: Some(ProviderConfig {
                enabled: false,
                model: "qwen3:8b".to_string(),
                temperature: Some(0.7),
                base_url: None,
            }),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            total_questions: default_total_questions(),
            difficulty: default_difficulty(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: default_format(),
            colorful: default_colorful(),
            output_dir: default_output_dir(),
            save_raw: default_save_raw(),
        }
    }
}

impl AIProvidersConfig {
    /// Look up a provider section by name.
    pub fn get(&self, name: &str) -> Option<&ProviderConfig> {
        match name.to_lowercase().as_str() {
            "gemini" => self.gemini.as_ref(),
            "openrouter" => self.openrouter.as_ref(),
            "ollama" => self.ollama.as_ref(),
            _ => None,
        }
    }

    /// Name of the first enabled provider, in preference order.
    pub fn first_enabled(&self) -> Option<&'static str> {
        ["gemini", "openrouter", "ollama"]
            .into_iter()
            .find(|name| self.get(name).is_some_and(|p| p.enabled))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Load configuration from command line argument or default locations.
    /// Returns the config together with the path it was read from.
    pub fn load(config_path: &Option<String>) -> Result<(Self, Option<String>)> {
        if let Some(path) = config_path {
            let expanded_path = shellexpand::tilde(path);
            return Ok((Self::from_file(expanded_path.as_ref())?, Some(path.clone())));
        }

        let default_paths = vec![
            "interview_gen.toml",
            ".interview_gen.toml",
            "~/.config/interview_gen/config.toml",
        ];

        for path in default_paths {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                match Self::from_file(expanded_path.as_ref()) {
                    Ok(config) => return Ok((config, Some(path.to_string()))),
                    Err(e) => log::warn!("Failed to load config from {}: {:#}", path, e),
                }
            }
        }

        Ok((Self::default(), None))
    }

    /// Merge with command-line arguments (CLI args take precedence)
    pub fn merge_with_args(&mut self, overrides: &ArgOverrides) {
        if let Some(total) = overrides.total_questions {
            self.generation.total_questions = total;
        }
        if let Some(difficulty) = &overrides.difficulty {
            self.generation.difficulty = difficulty.clone();
        }
        if let Some(format) = &overrides.format {
            self.output.format = format.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.output_dir = dir.clone();
        }
        if overrides.save {
            self.output.save_raw = true;
        }
        if overrides.headless {
            self.output.colorful = false;
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ArgOverrides {
    pub total_questions: Option<usize>,
    pub difficulty: Option<String>,
    pub format: Option<String>,
    pub output_dir: Option<String>,
    pub save: bool,
    pub headless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generation.total_questions, 28);
        assert_eq!(config.generation.difficulty, "Intermediate");
        assert_eq!(config.output.format, "terminal");
        assert_eq!(config.ai_providers.first_enabled(), Some("gemini"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[generation]
total_questions = 30

[ai_providers.ollama]
enabled = true
model = "llama3.2"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.generation.total_questions, 30);
        assert_eq!(config.generation.difficulty, "Intermediate");
        assert!(config.output.colorful);
        assert!(config.ai_providers.gemini.is_none());
        assert_eq!(config.ai_providers.first_enabled(), Some("ollama"));
        assert_eq!(config.ai_providers.get("Ollama").unwrap().model, "llama3.2");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generation = 3").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_args_take_precedence() {
        let mut config = Config::default();
        config.merge_with_args(&ArgOverrides {
            total_questions: Some(12),
            difficulty: Some("Advanced".to_string()),
            format: Some("json".to_string()),
            output_dir: None,
            save: true,
            headless: true,
        });
        assert_eq!(config.generation.total_questions, 12);
        assert_eq!(config.generation.difficulty, "Advanced");
        assert_eq!(config.output.format, "json");
        assert_eq!(config.output.output_dir, ".");
        assert!(config.output.save_raw);
        assert!(!config.output.colorful);
    }
}

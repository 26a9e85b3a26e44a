use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::pipeline::{LanguageSelection, TranslationOptions};
use crate::translation::{AUTO_DETECT, validate_language, validate_source_language};
use crate::ui::Style;

/// Default settings in the `[mdtl]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdtlConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Source language code, or `auto`.
    pub from: Option<String>,
    /// Target language for single-language runs.
    pub to: Option<String>,
    /// Target languages for multi-language runs.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Use `languages` even when `--multi` is not given.
    #[serde(default)]
    pub multi_language: bool,
    /// Use the translation cache (default: true).
    pub cache: Option<bool>,
}

/// Configuration for a translation provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/mdtl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub mdtl: MdtlConfig,
    /// Pipeline options.
    #[serde(default)]
    pub options: TranslationOptions,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The selected provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model to use for translation.
    pub model: String,
    /// The API key (if required).
    pub api_key: Option<String>,
    /// Source language code or `auto`.
    pub source_language: String,
    /// Target language(s).
    pub languages: LanguageSelection,
    /// Whether the translation cache is used.
    pub use_cache: bool,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Provider name override.
    pub provider: Option<String>,
    /// Model name override.
    pub model: Option<String>,
    /// Source language override.
    pub from: Option<String>,
    /// Target languages; more than one selects multi-language mode.
    pub to: Vec<String>,
    /// Force multi-language mode.
    pub multi: bool,
}

fn resolve_languages(options: &ResolveOptions, config: &MdtlConfig) -> Result<LanguageSelection> {
    let selection = if !options.to.is_empty() {
        if options.multi || options.to.len() > 1 {
            LanguageSelection::Multi(options.to.clone())
        } else {
            LanguageSelection::Single(options.to[0].clone())
        }
    } else if options.multi || config.multi_language {
        LanguageSelection::Multi(config.languages.clone())
    } else {
        let to = config.to.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'to' (target language)\n\n\
                 Please provide it via:\n  \
                 - CLI option: mdtl --to <lang>\n  \
                 - Config file: ~/.config/mdtl/config.toml"
            )
        })?;
        LanguageSelection::Single(to)
    };

    for language in selection.languages()? {
        validate_language(&language)?;
    }
    Ok(selection)
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values.
///
/// # Errors
///
/// Returns an error if required configuration (provider, model, target language)
/// is missing, a language code is unknown, or the specified provider is not found.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    // Resolve provider
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.mdtl.provider.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'provider'\n\n\
                 Please provide it via:\n  \
                 - CLI option: mdtl --provider <name>\n  \
                 - Config file: ~/.config/mdtl/config.toml"
            )
        })?;

    // Get provider config
    let provider_config = config_file.providers.get(&provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 No providers configured. Add providers to ~/.config/mdtl/config.toml"
            )
        } else {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/mdtl/config.toml",
                available.join("\n  - ")
            )
        }
    })?;

    // Resolve model
    let model = options
        .model
        .as_ref()
        .or(config_file.mdtl.model.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'model'\n\n\
                 Please provide it via:\n  \
                 - CLI option: mdtl --model <name>\n  \
                 - Config file: ~/.config/mdtl/config.toml"
            )
        })?;

    // Warn if model is not in provider's models list
    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        crate::warn!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    let source_language = options
        .from
        .as_ref()
        .or(config_file.mdtl.from.as_ref())
        .cloned()
        .unwrap_or_else(|| AUTO_DETECT.to_string());
    validate_source_language(&source_language)?;

    let languages = resolve_languages(options, &config_file.mdtl)?;

    // Get API key
    let api_key = provider_config.get_api_key();

    // Check if API key is required but missing
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/mdtl/config.toml"
        );
    }

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint.clone(),
        model,
        api_key,
        source_language,
        languages,
        use_cache: config_file.mdtl.cache.unwrap_or(true),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/mdtl/config.toml`
    /// or `~/.config/mdtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            r#"
[mdtl]
provider = "ollama"
model = "gemma3:12b"
to = "ja"
languages = ["ja", "fr"]

[options]
remove_chars = "♪"

[providers.ollama]
endpoint = "http://localhost:11434"
models = ["gemma3:12b", "llama3.2"]
"#,
        )
        .unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.mdtl.provider, Some("ollama".to_string()));
        assert_eq!(loaded.mdtl.model, Some("gemma3:12b".to_string()));
        assert_eq!(loaded.mdtl.to, Some("ja".to_string()));
        assert_eq!(loaded.mdtl.languages, vec!["ja", "fr"]);
        assert_eq!(loaded.options.remove_chars, "♪");
        assert_eq!(loaded.options.retry_count, 3);
        assert_eq!(
            loaded.providers["ollama"].models,
            vec!["gemma3:12b", "llama3.2"]
        );
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().providers.is_empty());
    }

    #[test]
    fn test_load_or_default_rejects_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[mdtl\nprovider =").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    fn test_parse_options_section() {
        let config: ConfigFile = toml::from_str(
            r#"
            [mdtl]
            provider = "ollama"

            [options]
            translate_latex = true
            context_mode = true
            retry_count = 5
            "#,
        )
        .unwrap();

        assert!(config.options.markdown.translate_latex);
        assert!(config.options.markdown.translate_link_text);
        assert!(config.options.effective_raw_mode());
        assert_eq!(config.options.retry_count, 5);
        assert_eq!(config.options.max_concurrency, 8);
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::set_var("MDTL_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("MDTL_TEST_API_KEY".to_string()),
            models: vec![],
        };

        // Environment variable takes priority
        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("MDTL_TEST_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_fallback() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::remove_var("MDTL_NONEXISTENT_KEY");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("MDTL_NONEXISTENT_KEY".to_string()),
            models: vec![],
        };

        // Falls back to api_key when env var not set
        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_provider_requires_api_key() {
        let provider_with_key = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("key".to_string()),
            api_key_env: None,
            models: vec![],
        };
        assert!(provider_with_key.requires_api_key());

        let provider_without = ProviderConfig {
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            api_key_env: None,
            models: vec![],
        };
        assert!(!provider_without.requires_api_key());
    }

    // resolve_config tests

    fn create_test_options() -> ResolveOptions {
        ResolveOptions {
            provider: Some("ollama".to_string()),
            model: Some("gemma3:12b".to_string()),
            to: vec!["ja".to_string()],
            ..ResolveOptions::default()
        }
    }

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemma3:12b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("MDTL_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec!["gpt-4o".to_string()],
            },
        );

        ConfigFile {
            mdtl: MdtlConfig {
                provider: Some("ollama".to_string()),
                model: Some("gemma3:12b".to_string()),
                to: Some("ja".to_string()),
                languages: vec!["fr".to_string(), "de".to_string()],
                ..MdtlConfig::default()
            },
            options: TranslationOptions::default(),
            providers,
        }
    }

    #[test]
    fn test_resolve_config_with_cli_options() {
        let resolved = resolve_config(&create_test_options(), &create_test_config()).unwrap();

        assert_eq!(resolved.provider_name, "ollama");
        assert_eq!(resolved.endpoint, "http://localhost:11434");
        assert_eq!(resolved.model, "gemma3:12b");
        assert_eq!(resolved.languages, LanguageSelection::Single("ja".to_string()));
        assert_eq!(resolved.source_language, "auto");
        assert!(resolved.use_cache);
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_resolve_config_cli_overrides_file() {
        let mut options = create_test_options();
        options.to = vec!["en".to_string()];
        options.model = Some("llama3".to_string());
        options.from = Some("ja".to_string());

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.languages, LanguageSelection::Single("en".to_string()));
        assert_eq!(resolved.model, "llama3");
        assert_eq!(resolved.source_language, "ja");
    }

    #[test]
    fn test_resolve_config_falls_back_to_file() {
        let resolved =
            resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.provider_name, "ollama");
        assert_eq!(resolved.model, "gemma3:12b");
        assert_eq!(resolved.languages, LanguageSelection::Single("ja".to_string()));
    }

    #[test]
    fn test_several_targets_select_multi_mode() {
        let mut options = create_test_options();
        options.to = vec!["ja".to_string(), "ko".to_string()];

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(
            resolved.languages,
            LanguageSelection::Multi(vec!["ja".to_string(), "ko".to_string()])
        );
    }

    #[test]
    fn test_multi_flag_uses_config_languages() {
        let mut options = create_test_options();
        options.to = vec![];
        options.multi = true;

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(
            resolved.languages,
            LanguageSelection::Multi(vec!["fr".to_string(), "de".to_string()])
        );
    }

    #[test]
    fn test_multi_with_empty_language_list() {
        let mut options = create_test_options();
        options.to = vec![];
        options.multi = true;
        let mut config = create_test_config();
        config.mdtl.languages.clear();

        let err = resolve_config(&options, &config).unwrap_err();
        assert!(err.to_string().contains("No target language selected"));
    }

    #[test]
    fn test_resolve_config_invalid_language() {
        let mut options = create_test_options();
        options.to = vec!["ja".to_string(), "xx".to_string()];

        let err = resolve_config(&options, &create_test_config()).unwrap_err();
        assert!(err.to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_resolve_config_missing_provider() {
        let options = ResolveOptions {
            provider: None,
            ..create_test_options()
        };

        let result = resolve_config(&options, &ConfigFile::default());

        assert!(result.unwrap_err().to_string().contains("provider"));
    }

    #[test]
    fn test_resolve_config_provider_not_found() {
        let mut options = create_test_options();
        options.provider = Some("nonexistent".to_string());

        let result = resolve_config(&options, &create_test_config());

        let message = result.unwrap_err().to_string();
        assert!(message.contains("not found"));
        assert!(message.contains("ollama"));
    }

    #[test]
    fn test_resolve_config_missing_model() {
        let mut options = create_test_options();
        options.model = None;

        let mut config = create_test_config();
        config.mdtl.model = None;

        let result = resolve_config(&options, &config);

        assert!(result.unwrap_err().to_string().contains("model"));
    }

    #[test]
    fn test_resolve_config_missing_target_language() {
        let mut options = create_test_options();
        options.to = vec![];

        let mut config = create_test_config();
        config.mdtl.to = None;

        let result = resolve_config(&options, &config);

        assert!(result.unwrap_err().to_string().contains("'to'"));
    }

    #[test]
    #[serial]
    fn test_resolve_config_api_key_required_but_missing() {
        let mut options = create_test_options();
        options.provider = Some("openrouter".to_string());
        options.model = Some("gpt-4o".to_string());

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_cache_can_be_disabled_in_file() {
        let mut config = create_test_config();
        config.mdtl.cache = Some(false);

        let resolved = resolve_config(&create_test_options(), &config).unwrap();
        assert!(!resolved.use_cache);
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::schema::{Config, RenameConfig, TargetConfig};
use crate::error::ConfigError;
use crate::matcher::Matcher;
use crate::paths::{anchor_pattern, literal_prefix, normalize_path};
use crate::target::{AffixRename, FixedName, RegexRename, RenameRule, Target};

/// Configuration with every path made absolute and every pattern validated.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub public_dir: PathBuf,
    pub theme_root: PathBuf,
    pub theme_assets_dir: PathBuf,
    pub silent: bool,
    /// When false the session neither reconciles nor dispatches.
    pub enabled: bool,
    pub targets: Vec<Target>,
}

/// Loads a YAML config file. Relative paths resolve against its directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoadedConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let base_dir = match path.parent() {
        Some(parent) if parent.is_absolute() => parent.to_path_buf(),
        parent => std::env::current_dir()
            .map_err(|e| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?
            .join(parent.unwrap_or_else(|| Path::new(""))),
    };

    load_config_from_str(&content, &base_dir)
}

pub fn load_config_from_str(content: &str, base_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let config: Config = serde_yaml::from_str(content)?;
    resolve_config(&config, base_dir, &Matcher::default())
}

/// Normalizes a parsed config against `base_dir`.
pub fn resolve_config(
    config: &Config,
    base_dir: &Path,
    matcher: &Matcher,
) -> Result<LoadedConfig, ConfigError> {
    let base_dir = normalize_path(base_dir);
    let theme_root = resolve_dir(&base_dir, &config.theme_root);
    let theme_assets_dir = resolve_dir(&theme_root, &config.theme_assets_dir);
    let public_dir = resolve_dir(&base_dir, &config.public_dir);

    let targets = config
        .targets
        .iter()
        .enumerate()
        .map(|(index, target)| resolve_target(index, target, &base_dir, &theme_assets_dir, matcher))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Loaded {} target(s), theme assets at {}",
        targets.len(),
        theme_assets_dir.display()
    );

    Ok(LoadedConfig {
        public_dir,
        theme_root,
        theme_assets_dir,
        silent: config.silent,
        enabled: config.on_serve,
        targets,
    })
}

fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    normalize_path(&base.join(dir))
}

fn resolve_target(
    index: usize,
    config: &TargetConfig,
    base_dir: &Path,
    theme_assets_dir: &Path,
    matcher: &Matcher,
) -> Result<Target, ConfigError> {
    let sources: Vec<String> = config
        .src
        .to_vec()
        .iter()
        .map(|p| anchor_pattern(base_dir, p))
        .collect();
    if sources.is_empty() {
        return Err(ConfigError::Validation {
            message: format!("target {} has no source patterns", index),
        });
    }

    let ignore: Vec<String> = config
        .ignore
        .iter()
        .map(|p| anchor_pattern(base_dir, p))
        .collect();

    let destination_dir = config
        .dest
        .as_deref()
        .map(|dest| resolve_dir(base_dir, dest))
        .unwrap_or_else(|| theme_assets_dir.to_path_buf());

    let clean_pattern = config
        .clean_match
        .as_deref()
        .map(|p| anchor_pattern(base_dir, p));

    for pattern in sources.iter().chain(&ignore).chain(&clean_pattern) {
        matcher
            .compile(pattern)
            .map_err(|e| ConfigError::InvalidPattern {
                target: index,
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
    }

    if let Some(clean) = &clean_pattern {
        let prefix = normalize_path(Path::new(&literal_prefix(clean)));
        if !prefix.starts_with(&destination_dir) {
            return Err(ConfigError::InvalidPattern {
                target: index,
                pattern: clean.clone(),
                reason: format!(
                    "clean pattern must stay inside the destination {}",
                    destination_dir.display()
                ),
            });
        }
    }

    let rename_rule = config
        .rename
        .as_ref()
        .map(|rename| build_rename(index, rename))
        .transpose()?;

    Ok(Target {
        source_patterns: sources,
        ignore_patterns: ignore,
        destination_dir,
        rename_rule,
        clean_pattern,
    })
}

fn build_rename(index: usize, config: &RenameConfig) -> Result<Arc<dyn RenameRule>, ConfigError> {
    let rule: Arc<dyn RenameRule> = match config {
        RenameConfig::Name(to) | RenameConfig::Fixed { to } => {
            if to.is_empty() || to.contains('/') || to.contains('\\') {
                return Err(ConfigError::InvalidRename {
                    target: index,
                    reason: format!("'{}' is not a plain file name", to),
                });
            }
            Arc::new(FixedName(to.clone()))
        }
        RenameConfig::Regex {
            pattern,
            replacement,
        } => Arc::new(RegexRename::new(pattern, replacement.clone()).map_err(|e| {
            ConfigError::InvalidRename {
                target: index,
                reason: e.to_string(),
            }
        })?),
        RenameConfig::Affix(affix) => Arc::new(AffixRename {
            prefix: affix.prefix.clone(),
            suffix: affix.suffix.clone(),
        }),
    };
    Ok(rule)
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    #[serde(default = "default_theme_root")]
    pub theme_root: String,
    /// Relative to `theme_root`.
    #[serde(default = "default_theme_assets_dir")]
    pub theme_assets_dir: String,
    #[serde(default)]
    pub silent: bool,
    #[serde(default = "default_true")]
    pub on_serve: bool,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_theme_root() -> String {
    ".".to_string()
}

fn default_theme_assets_dir() -> String {
    "assets".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    pub src: Patterns,
    /// Defaults to the theme assets directory.
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub clean_match: Option<String>,
    #[serde(default)]
    pub rename: Option<RenameConfig>,
}

/// A single pattern or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Patterns {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Patterns::One(pattern) => vec![pattern.clone()],
            Patterns::Many(patterns) => patterns.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenameConfig {
    /// `rename: sprite.svg`
    Name(String),
    /// `rename: { to: sprite.svg }`
    Fixed { to: String },
    /// `rename: { pattern: "^(.+)\\.svg$", replacement: "icon-$1.svg" }`
    Regex { pattern: String, replacement: String },
    /// `rename: { prefix: "theme-", suffix: ".min" }`
    Affix(AffixConfig),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AffixConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

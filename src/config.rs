//! Generation targets and input source.
//!
//! Loaded from a TOML file, every field can be omitted:
//! ```toml
//! [source]
//! url = "https://core.telegram.org/bots/api"
//! cache = "core.telegram.org-bots-api.html"
//!
//! [[targets]]
//! lang = "typescript"
//! path = "javascript/index.d.ts"
//! check_syntax = true
//!
//! [[targets]]
//! lang = "flow"
//! path = "javascript/index.js.flow"
//! printer = { module = "telegram-typings" }
//! ```

use crate::error::Result;
use crate::printer::PrinterOptions;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const TELEGRAM_URL: &str = "https://core.telegram.org";
pub const BOT_API_URL: &str = "https://core.telegram.org/bots/api";
pub const FLOW_MODULE: &str = "telegram-typings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[value(name = "typescript")]
    TypeScript,
    Flow,
    Rust,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Local copy of the page, read instead of fetching when it exists
    #[serde(default)]
    pub cache: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub lang: Lang,
    pub path: PathBuf,

    #[serde(default)]
    pub check_syntax: bool,

    #[serde(default)]
    pub printer: PrinterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfig {
    #[serde(default = "default_comment_line_max_length")]
    pub comment_line_max_length: usize,

    #[serde(default = "default_indent")]
    pub indent: String,

    /// Module name of the Flow declaration wrapper
    #[serde(default)]
    pub module: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        Ok(toml::from_str(&content)?)
    }

    pub fn only(mut self, langs: &[Lang]) -> Self {
        if !langs.is_empty() {
            self.targets.retain(|target| langs.contains(&target.lang));
        }

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            targets: default_targets(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            cache: None,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            comment_line_max_length: default_comment_line_max_length(),
            indent: default_indent(),
            module: None,
        }
    }
}

impl PrinterConfig {
    pub fn options(&self) -> PrinterOptions {
        PrinterOptions {
            comment_line_max_length: self.comment_line_max_length,
            indent: self.indent.clone(),
        }
    }

    pub fn module(&self) -> &str {
        self.module.as_deref().unwrap_or(FLOW_MODULE)
    }
}

fn default_url() -> String {
    BOT_API_URL.to_string()
}

fn default_comment_line_max_length() -> usize {
    72
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_targets() -> Vec<Target> {
    vec![
        Target {
            lang: Lang::TypeScript,
            path: PathBuf::from("javascript/index.d.ts"),
            check_syntax: true,
            printer: PrinterConfig::default(),
        },
        Target {
            lang: Lang::Flow,
            path: PathBuf::from("javascript/index.js.flow"),
            check_syntax: false,
            printer: PrinterConfig {
                module: Some(FLOW_MODULE.to_string()),
                ..PrinterConfig::default()
            },
        },
        Target {
            lang: Lang::Rust,
            path: PathBuf::from("rust/src/lib.rs"),
            check_syntax: false,
            printer: PrinterConfig::default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn it_defaults_to_stock_targets() {
        let config = Config::default();

        assert_eq!(BOT_API_URL, config.source.url);
        assert_eq!(
            vec![Lang::TypeScript, Lang::Flow, Lang::Rust],
            config.targets.iter().map(|t| t.lang).collect::<Vec<_>>()
        );
        assert!(config.targets[0].check_syntax);
        assert_eq!("telegram-typings", config.targets[1].printer.module());
    }

    #[test]
    fn it_loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[source]
cache = "api.html"

[[targets]]
lang = "flow"
path = "out/index.js.flow"
printer = {{ module = "my-typings", comment_line_max_length = 80 }}
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(BOT_API_URL, config.source.url);
        assert_eq!(Some(PathBuf::from("api.html")), config.source.cache);
        assert_eq!(1, config.targets.len());

        let target = &config.targets[0];
        assert_eq!(Lang::Flow, target.lang);
        assert!(!target.check_syntax);
        assert_eq!("my-typings", target.printer.module());
        assert_eq!(80, target.printer.options().comment_line_max_length);
        assert_eq!("  ", target.printer.options().indent);
    }

    #[test]
    fn it_rejects_unknown_lang() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[targets]]\nlang = \"python\"\npath = \"x.py\"\n").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(crate::error::Error::Config(_))
        ));
    }

    #[test]
    fn it_filters_targets_by_lang() {
        let config = Config::default().only(&[Lang::Rust]);

        assert_eq!(1, config.targets.len());
        assert_eq!(Lang::Rust, config.targets[0].lang);
        assert_eq!(3, Config::default().only(&[]).targets.len());
    }
}

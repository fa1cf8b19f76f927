//! Configuration module for `docpress`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory
const DIR_VARIABLE: &str = "$DOCPRESS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory generated documents are written to
    #[serde(default)]
    pub out_dir: String,
    /// Directory for temporary diagram images
    #[serde(default)]
    pub work_dir: String,
}

/// Graphviz configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphvizConfig {
    /// Path of the `dot` binary; empty to search for it
    #[serde(default)]
    pub binary: String,
    /// Extra directories searched for `dot`
    #[serde(default)]
    pub search_dirs: Vec<String>,
    /// Leave rendered diagram images in the work directory
    #[serde(default)]
    pub keep_diagrams: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Graphviz settings
    #[serde(default)]
    pub graphviz: GraphvizConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override output directory
    pub out_dir: Option<String>,
    /// Override work directory
    pub work_dir: Option<String>,
    /// Override the `dot` binary
    pub dot: Option<String>,
}

impl Config {
    /// Get the `$DOCPRESS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/docpress`
    /// - macOS: `~/Library/Application Support/docpress`
    /// - Windows: `%APPDATA%\docpress`
    #[must_use]
    pub fn get_docpress_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docpress")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Fields added in a newer release are empty in an older config file;
    /// they are filled from `defaults`. Non-empty values are never replaced.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        let pairs = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.out_dir, &defaults.paths.out_dir),
            (&mut self.paths.work_dir, &defaults.paths.work_dir),
            (&mut self.graphviz.binary, &defaults.graphviz.binary),
        ];
        for (value, default) in pairs {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the configuration file is untouched.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     out_dir: Some("build/docs".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
        if let Some(work_dir) = &overrides.work_dir {
            self.paths.work_dir.clone_from(work_dir);
        }

        if let Some(dot) = &overrides.dot {
            self.graphviz.binary.clone_from(dot);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds and `dconfig.toml` for debug builds,
    /// inside [`get_docpress_dir`](Self::get_docpress_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_docpress_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$DOCPRESS` in a string to the configuration directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_docpress_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$DOCPRESS` variables
    /// in the values. Missing fields will use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);
        config.paths.work_dir = Self::expand_variables(&config.paths.work_dir);
        config.graphviz.binary = Self::expand_variables(&config.graphviz.binary);
        for dir in &mut config.graphviz.search_dirs {
            *dir = Self::expand_variables(dir);
        }

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|e| {
            logger::error!("Compiled-in default configuration is invalid: {e}");
            Self::default()
        })
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults and save it back when something was added
    /// - On first run: create the config directory and save the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            match fs::read_to_string(&config_file) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(mut config) => {
                        if config.merge_defaults(&defaults) {
                            if let Err(e) = config.save() {
                                logger::warn!("Could not update {}: {e}", config_file.display());
                            }
                        }
                        return config;
                    }
                    Err(e) => {
                        logger::warn!("Ignoring invalid {}: {e}", config_file.display());
                    }
                },
                Err(e) => logger::warn!("Cannot read {}: {e}", config_file.display()),
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// The saved file looks like:
    /// ```toml
    /// [logging]
    /// level = "warn"
    /// file = ""
    /// verbose = false
    ///
    /// [paths]
    /// out_dir = "."
    /// work_dir = "."
    ///
    /// [graphviz]
    /// binary = ""
    /// search_dirs = []
    /// keep_diagrams = false
    /// ```
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`
    /// - `out_dir`, `work_dir`
    /// - `dot`, `search_dirs` (comma separated), `keep_diagrams`
    ///
    /// Dashed spellings (`out-dir`) are accepted too.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "out_dir" | "out-dir" => Some(self.paths.out_dir.clone()),
            "work_dir" | "work-dir" => Some(self.paths.work_dir.clone()),
            "dot" | "binary" => Some(self.graphviz.binary.clone()),
            "search_dirs" | "search-dirs" => Some(self.graphviz.search_dirs.join(",")),
            "keep_diagrams" | "keep-diagrams" => Some(self.graphviz.keep_diagrams.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Booleans accept `true` or `false`. `search_dirs` takes a comma
    /// separated list; an empty value clears it. Call [`save()`](Config::save)
    /// to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "out_dir" | "out-dir" => self.paths.out_dir = value.to_string(),
            "work_dir" | "work-dir" => self.paths.work_dir = value.to_string(),
            "dot" | "binary" => self.graphviz.binary = value.to_string(),
            "search_dirs" | "search-dirs" => {
                self.graphviz.search_dirs = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            "keep_diagrams" | "keep-diagrams" => {
                self.graphviz.keep_diagrams = parse_bool(key, value)?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "out_dir" | "out-dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            "work_dir" | "work-dir" => self.paths.work_dir.clone_from(&defaults.paths.work_dir),
            "dot" | "binary" => self.graphviz.binary.clone_from(&defaults.graphviz.binary),
            "search_dirs" | "search-dirs" => self
                .graphviz
                .search_dirs
                .clone_from(&defaults.graphviz.search_dirs),
            "keep_diagrams" | "keep-diagrams" => {
                self.graphviz.keep_diagrams = defaults.graphviz.keep_diagrams;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;
        writeln!(f, "  work_dir = \"{}\"", self.paths.work_dir)?;

        writeln!(f, "\n[graphviz]")?;
        writeln!(f, "  binary = \"{}\"", self.graphviz.binary)?;
        let dirs: Vec<String> = self
            .graphviz
            .search_dirs
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect();
        writeln!(f, "  search_dirs = [{}]", dirs.join(", "))?;
        writeln!(f, "  keep_diagrams = {}", self.graphviz.keep_diagrams)?;

        Ok(())
    }
}

//! Reader for the operator-facing `config.ini`.
//!
//! File format:
//!
//! ```ini
//! ; comments start with a semicolon
//! [backup]
//! path=D:\backups
//!
//! [paths]
//! ; one entry per line, directory or individual file
//! ; optional backup flag after a comma: "path, yes" or "path, no"
//! C:\temp\old, yes
//! \\server\share\incoming, no
//! ```
//!
//! Malformed path lines are logged as WARN and skipped so a single typo does
//! not block a scheduled run; missing sections and keys are hard errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use relic_telemetry::Logger;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{MaintenanceConfig, RootEntry};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.ini";

const UTF8_BOM: &str = "\u{feff}";

/// Sample configuration written by `write_sample_config`.
const SAMPLE_CONFIG: &str = r"; Maintenance configuration
;
; [backup]
;   path  - destination directory for dated backups (required)
;
; [paths]
;   One entry per line. Each entry may be a directory or a single file.
;   Optional backup flag after a comma:
;     path            backup enabled (default)
;     path, yes       backup enabled
;     path, no        delete without backup

[backup]
path=

[paths]
; C:\temp\old, yes
; \\server\share\incoming, no
";

/// Read and parse `<config_dir>/config.ini`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line falls outside any
/// section, the `[backup]` section or its `path` key is missing, or no
/// usable path entries remain after skipping malformed lines.
pub fn load_config(config_dir: &Path, logger: &Logger) -> ConfigResult<MaintenanceConfig> {
    let config_file = config_dir.join(CONFIG_FILE);

    let raw = std::fs::read_to_string(&config_file).map_err(|source| ConfigError::Read {
        path: config_file.clone(),
        source,
    })?;
    let content = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let document = parse_sections(content, &config_file)?;

    let backup_root = document
        .sections
        .get("backup")
        .ok_or_else(|| ConfigError::MissingBackupSection {
            path: config_file.clone(),
        })?
        .get("path")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ConfigError::MissingBackupPath {
            path: config_file.clone(),
        })?;

    let roots = parse_paths_section(&document, logger);
    if roots.is_empty() {
        return Err(ConfigError::NoPaths { path: config_file });
    }

    Ok(MaintenanceConfig { backup_root, roots })
}

/// Write a commented sample `config.ini` into the config directory, creating
/// the directory as needed.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
pub fn write_sample_config(config_dir: &Path) -> ConfigResult<PathBuf> {
    let config_file = config_dir.join(CONFIG_FILE);
    if config_file.exists() {
        return Err(ConfigError::SampleExists { path: config_file });
    }

    std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
        path: config_file.clone(),
        source,
    })?;
    std::fs::write(&config_file, SAMPLE_CONFIG).map_err(|source| ConfigError::Write {
        path: config_file.clone(),
        source,
    })?;

    Ok(config_file)
}

/// Parsed INI document: keyed values plus the standalone lines per section.
struct IniDocument {
    sections: HashMap<String, HashMap<String, String>>,
    standalone: HashMap<String, Vec<String>>,
}

fn parse_sections(content: &str, config_file: &Path) -> ConfigResult<IniDocument> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut standalone: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            if name.is_empty() {
                return Err(ConfigError::EmptySectionName {
                    path: config_file.to_path_buf(),
                });
            }
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let Some(section) = &current else {
            return Err(ConfigError::LineOutsideSection {
                path: config_file.to_path_buf(),
                line: line.to_string(),
            });
        };

        if let Some((key, value)) = line.split_once('=') {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        } else {
            standalone
                .entry(section.clone())
                .or_default()
                .push(line.to_string());
        }
    }

    Ok(IniDocument {
        sections,
        standalone,
    })
}

/// Collect path entries from the `[paths]` section.
///
/// Both layouts are accepted: standalone lines directly under the header, or
/// a multi-line value under a `paths` key.
fn parse_paths_section(document: &IniDocument, logger: &Logger) -> Vec<RootEntry> {
    let keyed = document
        .sections
        .get("paths")
        .and_then(|section| section.get("paths"))
        .filter(|value| !value.is_empty());

    let lines: Vec<&str> = keyed.map_or_else(
        || {
            document
                .standalone
                .get("paths")
                .map(|lines| lines.iter().map(String::as_str).collect())
                .unwrap_or_default()
        },
        |value| value.lines().collect(),
    );

    let mut roots = Vec::with_capacity(lines.len());
    for raw_line in lines {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        match parse_path_line(line) {
            Some(entry) => roots.push(entry),
            None => {
                logger.warn(&format!(
                    "Skipping malformed line in {CONFIG_FILE} [paths]: {line}"
                ));
            }
        }
    }

    roots
}

/// Parse one path entry: `path` or `path, yes|no`.
///
/// Unrecognized flag values default to backup enabled; an empty path is
/// malformed.
fn parse_path_line(line: &str) -> Option<RootEntry> {
    let (path, backup_enabled) = match line.split_once(',') {
        Some((path, flag)) => {
            let backup = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "no" | "n" | "false" | "0"
            );
            (path.trim(), backup)
        }
        None => (line, true),
    };

    if path.is_empty() {
        return None;
    }

    Some(RootEntry {
        path: PathBuf::from(path),
        backup_enabled,
    })
}

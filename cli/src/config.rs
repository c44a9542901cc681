//! Configuration loading for procclean.
//!
//! Precedence: command-line flags > config file > built-in defaults.

use crate::cli::ViewArgs;
use anyhow::{anyhow, Context, Result};
use backend::{validate_cwd_pattern, FilterKind, SortKey, ViewConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV_VAR: &str = "PROCCLEAN_CONFIG";

/// Reads the TOML config at `path`, or at `$PROCCLEAN_CONFIG` when no path is
/// given. No file at all yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ViewConfig> {
    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let Some(path) = path else {
        return Ok(ViewConfig::default());
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let mut config: ViewConfig = toml::from_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    config.cwd = normalize_cwd(config.cwd.take());
    if let Some(cwd) = &config.cwd {
        validate_cwd_pattern(cwd)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("invalid cwd in config file {}", path.display()))?;
    }
    info!("Loaded TOML configuration from: {}", path.display());
    Ok(config)
}

/// Trims a cwd pattern; a blank one means no cwd filter.
fn normalize_cwd(cwd: Option<String>) -> Option<String> {
    cwd.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

/// Applies command-line overrides. Shorthand preset flags win over `--filter`.
pub fn resolve_view(mut config: ViewConfig, args: &ViewArgs) -> ViewConfig {
    if let Some(sort) = &args.sort {
        config.sort = SortKey::from_name(sort);
    }
    if args.ascending {
        config.ascending = true;
    }
    if let Some(threshold) = args.high_memory_threshold {
        config.high_memory_threshold_mb = threshold;
    }
    if let Some(min_memory) = args.min_memory {
        config.min_memory_mb = min_memory;
    }
    if let Some(cwd) = &args.cwd {
        config.cwd = Some(cwd.clone());
    }
    config.cwd = normalize_cwd(config.cwd.take());
    if let Some(user) = &args.user {
        config.user = Some(user.clone());
    }

    if args.killable {
        config.filter = FilterKind::Killable;
    } else if args.orphans {
        config.filter = FilterKind::Orphans;
    } else if args.high_memory {
        config.filter = FilterKind::HighMemory;
    } else if let Some(filter) = args.filter {
        config.filter = filter;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "min-memory-mb = 50.0\nsort = \"cpu\"\nfilter = \"high-memory\"\ncwd = \"/srv/*\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.min_memory_mb, 50.0);
        assert_eq!(config.sort, SortKey::Cpu);
        assert_eq!(config.filter, FilterKind::HighMemory);
        assert_eq!(config.cwd.as_deref(), Some("/srv/*"));
        assert_eq!(config.high_memory_threshold_mb, 500.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filter = \"everything\"").unwrap();
        assert!(load_config(Some(file.path())).is_err());
        assert!(load_config(Some(Path::new("/nonexistent/procclean.toml"))).is_err());
    }

    #[test]
    fn blank_cwd_in_file_means_no_cwd_filter() {
        for blank in ["\"\"", "\"   \""] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "cwd = {blank}").unwrap();
            let config = load_config(Some(file.path())).unwrap();
            assert_eq!(config.cwd, None);
        }

        let file_config = ViewConfig {
            cwd: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(resolve_view(file_config, &ViewArgs::default()).cwd, None);
    }

    #[test]
    fn malformed_cwd_glob_in_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cwd = \"/tmp/[a\"").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("invalid glob"));
    }

    #[test]
    fn flags_override_file() {
        let file_config = ViewConfig {
            sort: SortKey::Cpu,
            filter: FilterKind::Stale,
            ..Default::default()
        };
        let args = ViewArgs {
            sort: Some("name".into()),
            orphans: true,
            filter: Some(FilterKind::HighMemory),
            min_memory: Some(0.0),
            ..Default::default()
        };
        let config = resolve_view(file_config, &args);
        assert_eq!(config.sort, SortKey::Name);
        assert_eq!(config.filter, FilterKind::Orphans);
        assert_eq!(config.min_memory_mb, 0.0);
    }

    #[test]
    fn unknown_sort_flag_falls_back_to_memory() {
        let args = ViewArgs {
            sort: Some("colour".into()),
            ..Default::default()
        };
        assert_eq!(resolve_view(ViewConfig::default(), &args).sort, SortKey::Memory);
    }
}

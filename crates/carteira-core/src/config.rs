use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_files: Vec<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(rc_override))]
    pub fn load(rc_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_files: vec![],
        };

        cfg.map.insert("color".to_string(), "on".to_string());
        cfg.map.insert("seed.sample".to_string(), "on".to_string());
        cfg.map
            .insert("screen.default".to_string(), "clients".to_string());

        let rc_path = resolve_rc_path(rc_override)?;
        if let Some(path) = rc_path {
            info!(carteirarc = %path.display(), "loading carteirarc");
            cfg.load_file(&path)?;
        } else {
            warn!("no carteirarc found; using defaults");
        }

        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.strip_prefix("rc.").unwrap_or(&k).to_string();
            debug!(key = %key, value = %v, "applying override");
            self.map.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).map(|v| parse_bool(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.map.iter()
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = expand_tilde(path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        self.loaded_files.push(path.clone());

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        for (line_num, raw_line) in text.lines().enumerate() {
            let mut line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((before, _)) = line.split_once('#') {
                line = before.trim();
            }

            if line.is_empty() {
                continue;
            }

            if let Some(include_rest) = line.strip_prefix("include ") {
                let include_path = resolve_include_path(&base_dir, include_rest.trim())?;
                debug!(
                    file = %path.display(),
                    include = %include_path.display(),
                    line = line_num + 1,
                    "processing include"
                );

                if include_path.exists() {
                    self.load_file(&include_path)?;
                } else {
                    warn!(include = %include_path.display(), "include file does not exist; skipping");
                }
                continue;
            }

            let (k, v) = line.split_once('=').ok_or_else(|| {
                anyhow!(
                    "invalid config line {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    raw_line
                )
            })?;

            let key = k.trim().to_string();
            let value = v.trim().to_string();
            trace!(key = %key, value = %value, "loaded config key");
            self.map.insert(key, value);
        }

        Ok(())
    }
}

#[tracing::instrument(skip(override_path))]
fn resolve_rc_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(rc_env) = std::env::var("CARTEIRARC") {
        if rc_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(rc_env)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    let candidate = home.join(".carteirarc");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

fn resolve_include_path(base_dir: &Path, include: &str) -> anyhow::Result<PathBuf> {
    if include.trim().is_empty() {
        return Err(anyhow!("include path cannot be empty"));
    }

    let raw = PathBuf::from(include);
    let expanded = expand_tilde(&raw);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base_dir.join(expanded))
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "on" | "true"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_survive_an_empty_rc_file() {
        let file = tempfile::NamedTempFile::new().expect("temp rc");
        let cfg = Config::load(Some(file.path())).expect("load");

        assert_eq!(cfg.get("color").as_deref(), Some("on"));
        assert_eq!(cfg.get_bool("seed.sample"), Some(true));
        assert_eq!(cfg.get("screen.default").as_deref(), Some("clients"));
        assert_eq!(cfg.loaded_files.len(), 1);
    }

    #[test]
    fn rc_file_overrides_defaults_and_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().expect("temp rc");
        writeln!(file, "# carteira settings").expect("write");
        writeln!(file, "color = off  # monochrome terminal").expect("write");
        writeln!(file, "seed.sample=no").expect("write");
        writeln!(file).expect("write");
        writeln!(file, "screen.default = appointments").expect("write");

        let cfg = Config::load(Some(file.path())).expect("load");
        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.get_bool("seed.sample"), Some(false));
        assert_eq!(cfg.get("screen.default").as_deref(), Some("appointments"));
    }

    #[test]
    fn includes_merge_relative_to_the_including_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let shared = dir.path().join("shared.rc");
        fs::write(&shared, "color=off\n").expect("write shared");
        let main = dir.path().join("main.rc");
        fs::write(&main, "include shared.rc\nseed.sample=off\n").expect("write main");

        let cfg = Config::load(Some(&main)).expect("load");
        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.get_bool("seed.sample"), Some(false));
        assert_eq!(cfg.loaded_files.len(), 2);
    }

    #[test]
    fn missing_include_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let main = dir.path().join("main.rc");
        fs::write(&main, "include nowhere.rc\ncolor=off\n").expect("write main");

        let cfg = Config::load(Some(&main)).expect("load");
        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.loaded_files.len(), 1);
    }

    #[test]
    fn malformed_lines_are_reported_with_position() {
        let mut file = tempfile::NamedTempFile::new().expect("temp rc");
        writeln!(file, "color off").expect("write");

        let err = Config::load(Some(file.path())).expect_err("bad line");
        assert!(err.to_string().contains(":1:"));
    }

    #[test]
    fn overrides_strip_the_rc_prefix() {
        let file = tempfile::NamedTempFile::new().expect("temp rc");
        let mut cfg = Config::load(Some(file.path())).expect("load");
        cfg.apply_overrides(vec![
            ("rc.color".to_string(), "off".to_string()),
            ("screen.default".to_string(), "properties".to_string()),
        ]);

        assert_eq!(cfg.get("color").as_deref(), Some("off"));
        assert_eq!(cfg.get("screen.default").as_deref(), Some("properties"));
    }

    #[test]
    fn parse_bool_accepts_the_usual_spellings() {
        for yes in ["1", "y", "YES", "on", "True", " true "] {
            assert!(parse_bool(yes), "{yes}");
        }
        for no in ["0", "off", "false", "nope", ""] {
            assert!(!parse_bool(no), "{no}");
        }
    }
}

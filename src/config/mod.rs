use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_SCHEDULE_CSV: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQK-V9ZNN6S14OYLQGFQJ_si0sR7r1kSFmJCgrBC1k6MtCoJuk8ObmJTwiCAeBTbUirne-R-G8d9mqx/pub?gid=0&single=true&output=csv";
pub const DEFAULT_NEWS: &str = "assets/data/noticias.json";
pub const DEFAULT_JURY: &str = "assets/data/jurado.json";
pub const DEFAULT_COMPETITION: &str = "assets/data/competencia.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub base: Option<String>,
    #[serde(alias = "parrilla")]
    pub schedule_csv: Option<String>,
    #[serde(alias = "noticias")]
    pub news: Option<String>,
    #[serde(alias = "jurado")]
    pub jury: Option<String>,
    #[serde(alias = "competencia")]
    pub competition: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub no_color: Option<bool>,
    pub news_site: Option<String>,
    pub news_tag: Option<String>,
    pub news_limit: Option<usize>,
    pub news_output: Option<String>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".cartelera").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    format!(
        r#"# Cartelera config
#
# Location (default):
#   ~/.cartelera/config.yml

# Where relative catalog references resolve from: a site URL or a directory.
# base: https://example.github.io/vina2026/
base: ./

# Catalog sources (absolute URLs or paths relative to base)
schedule_csv: "{DEFAULT_SCHEDULE_CSV}"
news: {DEFAULT_NEWS}
jury: {DEFAULT_JURY}
competition: {DEFAULT_COMPETITION}

# Snapshot output (optional, format inferred from the extension)
# output: ./snapshot.html
# output_format: html

# HTTP
timeout: 10
# user_agent: "Mozilla/5.0"

# News feed generation
news_site: https://www.epicentrochile.com
news_tag: olmue2026
news_limit: 10
news_output: {DEFAULT_NEWS}

# Output styling
no_color: false
"#
    )
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_back() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.jury.as_deref(), Some(DEFAULT_JURY));
        assert_eq!(cfg.schedule_csv.as_deref(), Some(DEFAULT_SCHEDULE_CSV));
        assert_eq!(cfg.news_limit, Some(10));
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn spanish_keys_are_accepted() {
        let cfg: ConfigFile =
            serde_yaml::from_str("jurado: j.json\ncompetencia: c.json\nparrilla: p.csv\n").unwrap();
        assert_eq!(cfg.jury.as_deref(), Some("j.json"));
        assert_eq!(cfg.competition.as_deref(), Some("c.json"));
        assert_eq!(cfg.schedule_csv.as_deref(), Some("p.csv"));
    }

    #[test]
    fn missing_config_is_allowed_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yml");
        ensure_default_config_file(&path).unwrap();
        std::fs::write(&path, "timeout: 3\n").unwrap();
        ensure_default_config_file(&path).unwrap();
        assert_eq!(load_config(&path, false).unwrap().timeout, Some(3));
    }
}

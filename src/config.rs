use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CLIENT_NAME: &str = "cdfapi-rs";

/// Connection settings: service principal, cluster and project.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub cluster: String,
    pub project: String,
    /// Sent as `x-cdp-app`.
    pub client_name: String,
}

impl Settings {
    /// Loads settings from the environment, falling back to a `.cdfapirc` file.
    ///
    /// Each field is taken from its environment variable (`CLIENT_ID`,
    /// `CLIENT_SECRET`, `TENANT_ID`, `CDF_CLUSTER`, `CDF_PROJECT`,
    /// `CDF_CLIENT_NAME`) or, when unset, from the first rc file found in
    /// `$CDFAPI_RC`, `./.cdfapirc` or `~/.cdfapirc`.
    pub fn from_env() -> Result<Self> {
        resolve(|k| std::env::var(k).ok(), &rc_candidates())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("cluster", &self.cluster)
            .field("project", &self.project)
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// (env var, rc key) per required field, in `Settings` order.
const REQUIRED: [(&str, &str); 5] = [
    ("CLIENT_ID", "client_id"),
    ("CLIENT_SECRET", "client_secret"),
    ("TENANT_ID", "tenant_id"),
    ("CDF_CLUSTER", "cluster"),
    ("CDF_PROJECT", "project"),
];

const RC_KEYS: [&str; 6] = [
    "client_id",
    "client_secret",
    "tenant_id",
    "cluster",
    "project",
    "client_name",
];

pub(crate) fn resolve<F>(env: F, rc_candidates: &[PathBuf]) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let mut rc = HashMap::new();
    if REQUIRED.iter().any(|(var, _)| env(var).is_none()) {
        for rc_path in rc_candidates {
            if rc_path.exists() {
                rc = read_rc(rc_path)?;
                break;
            }
        }
    }

    let get = |var: &str, key: &str| env(var).or_else(|| rc.get(key).cloned());
    let require = |(var, key): (&str, &str)| {
        get(var, key).ok_or_else(|| missing(var, key, rc_candidates))
    };

    Ok(Settings {
        client_id: require(REQUIRED[0])?,
        client_secret: require(REQUIRED[1])?,
        tenant_id: require(REQUIRED[2])?,
        cluster: require(REQUIRED[3])?,
        project: require(REQUIRED[4])?,
        client_name: get("CDF_CLIENT_NAME", "client_name")
            .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
    })
}

fn missing(var: &str, key: &str, rc_candidates: &[PathBuf]) -> Error {
    if rc_candidates.is_empty() {
        return Error::Config(format!(
            "Missing configuration: {} (set {} or create .cdfapirc)",
            key, var
        ));
    }
    Error::Config(format!(
        "Missing configuration: {} (set {} or put `{}:` in one of: {})",
        key,
        var,
        key,
        rc_candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn read_rc(path: &Path) -> Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> HashMap<String, String> {
    let mut cfg = HashMap::new();

    // A key may be followed by its value on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                cfg.insert(pk.to_string(), strip_quotes(line).to_string());
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            if !RC_KEYS.contains(&k) {
                continue;
            }
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                cfg.insert(k.to_string(), v.to_string());
            }
        }
    }

    cfg
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) CDFAPI_RC (explicit)
    // 2) ./.cdfapirc
    // 3) ~/.cdfapirc
    if let Ok(p) = std::env::var("CDFAPI_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".cdfapirc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".cdfapirc"));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const FULL_ENV: [(&str, &str); 5] = [
        ("CLIENT_ID", "id"),
        ("CLIENT_SECRET", "secret"),
        ("TENANT_ID", "tenant"),
        ("CDF_CLUSTER", "westeurope-1"),
        ("CDF_PROJECT", "demo"),
    ];

    #[test]
    fn environment_alone_is_enough() {
        let s = resolve(env_from(&FULL_ENV), &[]).unwrap();
        assert_eq!(s.client_id, "id");
        assert_eq!(s.cluster, "westeurope-1");
        assert_eq!(s.project, "demo");
        assert_eq!(s.client_name, DEFAULT_CLIENT_NAME);
    }

    #[test]
    fn rc_file_fills_gaps() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# service principal\nclient_secret: 'from-file'\nproject:\n  \"rc-project\"\nclient_name: demo-app\nunknown: ignored"
        )
        .unwrap();

        let env = env_from(&[
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", ""),
            ("TENANT_ID", "tenant"),
            ("CDF_CLUSTER", "c"),
        ]);
        let s = resolve(env, &[file.path().to_path_buf()]).unwrap();
        assert_eq!(s.client_secret, "from-file");
        assert_eq!(s.project, "rc-project");
        assert_eq!(s.client_name, "demo-app");
    }

    #[test]
    fn environment_wins_over_rc_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project: other\ncluster: other").unwrap();
        let env = env_from(&[
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "secret"),
            ("TENANT_ID", "tenant"),
            ("CDF_CLUSTER", "c"),
        ]);
        let s = resolve(env, &[file.path().to_path_buf()]).unwrap();
        assert_eq!(s.cluster, "c");
        assert_eq!(s.project, "other");
    }

    #[test]
    fn missing_field_names_env_var_and_files() {
        let err = resolve(env_from(&FULL_ENV[..4]), &[PathBuf::from("/nonexistent/.cdfapirc")])
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("CDF_PROJECT"));
        assert!(text.contains("/nonexistent/.cdfapirc"));
    }

    #[test]
    fn parse_rc_handles_quotes_and_continuations() {
        let cfg = parse_rc("cluster: \"c1\"\nclient_id:\nabc\n\n# comment\ntenant_id: 't'\n");
        assert_eq!(cfg["cluster"], "c1");
        assert_eq!(cfg["client_id"], "abc");
        assert_eq!(cfg["tenant_id"], "t");
    }

    #[test]
    fn debug_hides_secret() {
        let s = resolve(env_from(&FULL_ENV), &[]).unwrap();
        assert!(!format!("{s:?}").contains("secret\""));
        assert!(format!("{s:?}").contains("<redacted>"));
    }
}

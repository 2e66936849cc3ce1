//! Configuration

use std::{env, path::PathBuf};

use anyhow::{bail, Context, Result};
use paypool_core::Cycle;
use serde::{Deserialize, Serialize};

/// Committer configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct CommitterConfig {
    /// JSON file holding the cumulative payment list
    pub(crate) payment_list: PathBuf,
    /// Payment cycle the proofs are issued for
    pub(crate) cycle: Cycle,
    /// Where to write the report, stdout when unset
    pub(crate) report_path: Option<PathBuf>,
    /// Pretty-print the JSON report
    pub(crate) pretty: bool,
}

impl CommitterConfig {
    /// Load from environment variables. A first command line argument
    /// overrides `PAYMENT_LIST`.
    pub(crate) fn from_env() -> Result<Self> {
        let arg = env::args().nth(1);
        Self::from_lookup(|key| match (key, &arg) {
            ("PAYMENT_LIST", Some(path)) => Some(path.clone()),
            _ => env::var(key).ok(),
        })
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(payment_list) = get("PAYMENT_LIST").filter(|s| !s.is_empty()) else {
            bail!("PAYMENT_LIST is not set (path to a JSON payment list)");
        };

        let cycle = match get("PAYMENT_CYCLE") {
            Some(s) => s.parse::<Cycle>().with_context(|| format!("invalid PAYMENT_CYCLE {s:?}"))?,
            None => 1,
        };

        Ok(Self {
            payment_list: PathBuf::from(payment_list),
            cycle,
            report_path: get("REPORT_PATH").filter(|s| !s.is_empty()).map(PathBuf::from),
            pretty: get("PRETTY_REPORT").map(|s| s == "true" || s == "1").unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CommitterConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        CommitterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("PAYMENT_LIST", "payments.json")]).unwrap();
        assert_eq!(
            config,
            CommitterConfig {
                payment_list: PathBuf::from("payments.json"),
                cycle: 1,
                report_path: None,
                pretty: false,
            }
        );
    }

    #[test]
    fn test_all_vars() {
        let config = load(&[
            ("PAYMENT_LIST", "in.json"),
            ("PAYMENT_CYCLE", "42"),
            ("REPORT_PATH", "out.json"),
            ("PRETTY_REPORT", "1"),
        ])
        .unwrap();

        assert_eq!(config.cycle, 42);
        assert_eq!(config.report_path, Some(PathBuf::from("out.json")));
        assert!(config.pretty);
    }

    #[test]
    fn test_missing_payment_list() {
        assert!(load(&[("PAYMENT_CYCLE", "2")]).is_err());
    }

    #[test]
    fn test_bad_cycle() {
        assert!(load(&[("PAYMENT_LIST", "in.json"), ("PAYMENT_CYCLE", "two")]).is_err());
    }
}

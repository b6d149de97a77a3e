//! Optional TOML configuration: layout choice, weight overrides, per-key
//! metadata overrides.
//!
//! ```toml
//! layout = "qwerty"
//!
//! [weights]
//! same_key = -0.1
//!
//! [[keys]]
//! key = "Space"
//! hand = "right"
//! finger = "Rt"
//! base_cost = 0.5
//! ```
//!
//! Everything is optional; omitted fields keep the layout's values.

use anyhow::{bail, Context, Result};
use core_keyboard::{Finger, Hand, Key, KeyInfo};
use core_optimizer::{Analyzer, LayoutKind};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub layout: Option<String>,
    pub weights: Option<WeightOverrides>,
    #[serde(default)]
    pub keys: Vec<KeyOverride>,
}

/// Partial weight overrides layered on the layout defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightOverrides {
    pub key: Option<f64>,
    pub same_finger: Option<f64>,
    pub same_key: Option<f64>,
    pub alternation: Option<f64>,
    pub run_penalty: Option<f64>,
    pub roll_good: Option<f64>,
    pub roll_bad: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyOverride {
    pub key: String,
    pub hand: Option<String>,
    pub finger: Option<String>,
    pub base_cost: f64,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("can't read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("bad config {}", path.display()))
}

fn parse_key(name: &str) -> Result<Key> {
    for key in Key::ALL {
        if format!("{key:?}") == name {
            return Ok(key);
        }
    }
    bail!("unknown key name '{name}'");
}

fn parse_hand(name: &str) -> Result<Hand> {
    match name {
        "left" | "Left" => Ok(Hand::Left),
        "right" | "Right" => Ok(Hand::Right),
        other => bail!("unknown hand '{other}'"),
    }
}

fn parse_finger(name: &str) -> Result<Finger> {
    let fingers = [
        ("Lp", Finger::Lp),
        ("Lr", Finger::Lr),
        ("Lm", Finger::Lm),
        ("Li", Finger::Li),
        ("Lt", Finger::Lt),
        ("Rt", Finger::Rt),
        ("Ri", Finger::Ri),
        ("Rm", Finger::Rm),
        ("Rr", Finger::Rr),
        ("Rp", Finger::Rp),
    ];
    fingers
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| anyhow::anyhow!("unknown finger '{name}'"))
}

/// Build an analyzer from a CLI layout name plus an optional config file.
/// The config's layout wins over the flag only when the flag is absent.
pub fn build_analyzer(cli_layout: Option<&str>, config: &Config) -> Result<Analyzer> {
    let layout_name = cli_layout.or(config.layout.as_deref()).unwrap_or("uniform");
    let layout = LayoutKind::parse(layout_name)
        .with_context(|| format!("unknown layout '{layout_name}'"))?;
    let mut analyzer = Analyzer::new(layout);

    if let Some(w) = &config.weights {
        let mut weights = analyzer.model().weights;
        if let Some(v) = w.key {
            weights.key = v;
        }
        if let Some(v) = w.same_finger {
            weights.same_finger = v;
        }
        if let Some(v) = w.same_key {
            weights.same_key = v;
        }
        if let Some(v) = w.alternation {
            weights.alternation = v;
        }
        if let Some(v) = w.run_penalty {
            weights.run_penalty = v;
        }
        if let Some(v) = w.roll_good {
            weights.roll_good = v;
        }
        if let Some(v) = w.roll_bad {
            weights.roll_bad = v;
        }
        analyzer.set_weights(weights);
    }

    for over in &config.keys {
        let key = parse_key(&over.key)?;
        let current: KeyInfo = *analyzer.model().info(key);
        let info = KeyInfo {
            hand: match &over.hand {
                Some(h) => Some(parse_hand(h)?),
                None => current.hand,
            },
            finger: match &over.finger {
                Some(f) => Some(parse_finger(f)?),
                None => current.finger,
            },
            base_cost: over.base_cost,
        };
        analyzer.set_key(key, info);
    }

    Ok(analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_uniform() {
        let analyzer = build_analyzer(None, &Config::default()).unwrap();
        assert_eq!(analyzer.model().info(Key::W).base_cost, 1.0);
    }

    #[test]
    fn parses_and_applies_overrides() {
        let toml_text = r#"
layout = "qwerty"

[weights]
same_key = -0.5

[[keys]]
key = "Space"
base_cost = 0.1
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml_text.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        let analyzer = build_analyzer(None, &config).unwrap();
        assert_eq!(analyzer.model().weights.same_key, -0.5);
        assert_eq!(analyzer.model().info(Key::Space).base_cost, 0.1);
        // Layout values retained where not overridden.
        assert_eq!(analyzer.model().info(Key::F).base_cost, 1.0);
    }

    #[test]
    fn cli_layout_beats_config_layout() {
        let config = Config {
            layout: Some("qwerty".to_string()),
            ..Default::default()
        };
        let analyzer = build_analyzer(Some("uniform"), &config).unwrap();
        assert!(analyzer.model().info(Key::Q).hand.is_none());
    }

    #[test]
    fn unknown_names_fail_loudly() {
        let config = Config {
            layout: Some("dvorak".to_string()),
            ..Default::default()
        };
        assert!(build_analyzer(None, &config).is_err());
        let config = Config {
            keys: vec![KeyOverride {
                key: "NoSuchKey".to_string(),
                hand: None,
                finger: None,
                base_cost: 1.0,
            }],
            ..Default::default()
        };
        assert!(build_analyzer(None, &config).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let toml_text = "layot = \"qwerty\"\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml_text.as_bytes()).unwrap();
        assert!(load_config(file.path()).is_err());
    }
}

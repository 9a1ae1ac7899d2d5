use anyhow::{bail, Context, Result};

use crate::matching::ranker::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables.
/// Only malformed values are fatal; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Without a key the competency extractor is disabled and every match
    /// request falls back to zero scores.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub rank_top_n: usize,
    pub score_unlisted_required: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            rank_top_n: parse_top_n(optional_env("RANK_TOP_N").as_deref())?,
            score_unlisted_required: parse_flag(
                "SCORE_UNLISTED_REQUIRED",
                optional_env("SCORE_UNLISTED_REQUIRED").as_deref(),
            )?,
        })
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_top_n(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOP_N);
    };
    let top_n = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("RANK_TOP_N must be a positive integer, got '{raw}'"))?;
    if top_n == 0 {
        bail!("RANK_TOP_N must be at least 1");
    }
    Ok(top_n)
}

fn parse_flag(key: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} must be a boolean (true/false), got '{v}'"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_defaults_to_ten() {
        assert_eq!(parse_top_n(None).unwrap(), 10);
    }

    #[test]
    fn test_top_n_parses_value() {
        assert_eq!(parse_top_n(Some(" 25 ")).unwrap(), 25);
    }

    #[test]
    fn test_top_n_rejects_zero_and_garbage() {
        assert!(parse_top_n(Some("0")).is_err());
        assert!(parse_top_n(Some("ten")).is_err());
    }

    #[test]
    fn test_flag_accepts_common_spellings() {
        assert!(parse_flag("X", Some("TRUE")).unwrap());
        assert!(parse_flag("X", Some("on")).unwrap());
        assert!(!parse_flag("X", Some("0")).unwrap());
        assert!(!parse_flag("X", None).unwrap());
    }

    #[test]
    fn test_flag_rejects_unknown_value() {
        let err = parse_flag("SCORE_UNLISTED_REQUIRED", Some("maybe")).unwrap_err();
        assert!(err.to_string().contains("SCORE_UNLISTED_REQUIRED"));
    }
}

use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::catalog::display::DEFAULT_COVERS_URL;
use crate::cli::Cli;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_url: Url,
    pub covers_url: Url,
    pub data_dir: PathBuf,
    pub search_limit: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let catalog_url = var("BOOKNOOK_CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_owned());
        let covers_url = var("BOOKNOOK_COVERS_URL").unwrap_or_else(|| DEFAULT_COVERS_URL.to_owned());
        let data_dir = var("BOOKNOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let search_limit = match var("BOOKNOOK_SEARCH_LIMIT") {
            Some(raw) => parse_limit(&raw)
                .with_context(|| format!("invalid BOOKNOOK_SEARCH_LIMIT={raw:?}"))?,
            None => DEFAULT_SEARCH_LIMIT,
        };

        Ok(Self {
            catalog_url: parse_http_url(&catalog_url)
                .with_context(|| format!("invalid BOOKNOOK_CATALOG_URL={catalog_url:?}"))?,
            covers_url: parse_http_url(&covers_url)
                .with_context(|| format!("invalid BOOKNOOK_COVERS_URL={covers_url:?}"))?,
            data_dir,
            search_limit,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(raw) = &cli.catalog_url {
            self.catalog_url = parse_http_url(raw).context("parse --catalog-url")?;
        }
        if let Some(raw) = &cli.covers_url {
            self.covers_url = parse_http_url(raw).context("parse --covers-url")?;
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        Ok(self)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("booknook"))
        .unwrap_or_else(|| PathBuf::from(".booknook"))
}

fn parse_http_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).context("parse url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url must be http/https: {url}");
    }
    Ok(url)
}

fn parse_limit(raw: &str) -> anyhow::Result<usize> {
    let limit = raw.parse::<usize>().context("parse number")?;
    if limit == 0 {
        anyhow::bail!("search limit must be > 0");
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser as _;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_open_library() -> anyhow::Result<()> {
        let config = Config::from_lookup(lookup(&[]))?;
        assert_eq!(config.catalog_url.as_str(), "https://openlibrary.org/");
        assert_eq!(config.covers_url.as_str(), "https://covers.openlibrary.org/");
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(config.data_dir.ends_with("booknook") || config.data_dir.ends_with(".booknook"));
        Ok(())
    }

    #[test]
    fn environment_overrides_defaults() -> anyhow::Result<()> {
        let config = Config::from_lookup(lookup(&[
            ("BOOKNOOK_CATALOG_URL", "http://127.0.0.1:8080"),
            ("BOOKNOOK_DATA_DIR", "/tmp/booknook-test"),
            ("BOOKNOOK_SEARCH_LIMIT", " 5 "),
            ("BOOKNOOK_COVERS_URL", ""),
        ]))?;
        assert_eq!(config.catalog_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.covers_url.as_str(), "https://covers.openlibrary.org/");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/booknook-test"));
        assert_eq!(config.search_limit, 5);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("BOOKNOOK_SEARCH_LIMIT", "0")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("BOOKNOOK_SEARCH_LIMIT"));

        let err = Config::from_lookup(lookup(&[("BOOKNOOK_CATALOG_URL", "ftp://example.com")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("must be http/https"));
    }

    #[test]
    fn flags_override_environment() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "booknook",
            "--data-dir",
            "/tmp/flag-dir",
            "--catalog-url",
            "http://localhost:9000",
            "favorites",
            "list",
        ])?;
        let config = Config::from_lookup(lookup(&[("BOOKNOOK_DATA_DIR", "/tmp/env-dir")]))?
            .with_overrides(&cli)?;
        assert_eq!(config.data_dir, PathBuf::from("/tmp/flag-dir"));
        assert_eq!(config.catalog_url.as_str(), "http://localhost:9000/");
        Ok(())
    }
}

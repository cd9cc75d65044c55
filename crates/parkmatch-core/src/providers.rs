use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    /// Provider JSON search API reached over HTTP.
    JsonApi,
    /// Captured listings read from a local JSON file.
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub kind: ConnectorKind,
    pub base_url: Option<String>,
    pub path: Option<PathBuf>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProvidersFile {
    pub providers: Vec<ProviderConfig>,
}

impl ProvidersFile {
    /// Providers that should be queried, in file order.
    pub fn enabled(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

/// Load and validate the provider connector definitions from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let providers_file: ProvidersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProvidersFileParse)?;

    validate_providers(&providers_file)?;

    Ok(providers_file)
}

fn validate_providers(providers_file: &ProvidersFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &providers_file.providers {
        if !seen.insert(entry.provider) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider entry: '{}'",
                entry.provider
            )));
        }

        match entry.kind {
            ConnectorKind::JsonApi => {
                let has_url = entry
                    .base_url
                    .as_deref()
                    .is_some_and(|u| u.starts_with("http://") || u.starts_with("https://"));
                if !has_url {
                    return Err(ConfigError::Validation(format!(
                        "provider '{}' is json_api but has no http(s) base_url",
                        entry.provider
                    )));
                }
            }
            ConnectorKind::Fixture => {
                if entry.path.is_none() {
                    return Err(ConfigError::Validation(format!(
                        "provider '{}' is fixture but has no path",
                        entry.provider
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<ProvidersFile, ConfigError> {
        let file: ProvidersFile =
            serde_yaml::from_str(yaml).map_err(ConfigError::ProvidersFileParse)?;
        validate_providers(&file)?;
        Ok(file)
    }

    #[test]
    fn parses_mixed_connector_kinds() {
        let file = parse(
            "providers:\n  \
             - provider: spothero\n    kind: json_api\n    base_url: https://api.example.com\n  \
             - provider: parkwhiz\n    kind: fixture\n    path: ./fixtures/parkwhiz.json\n",
        )
        .unwrap();
        assert_eq!(file.providers.len(), 2);
        assert_eq!(file.providers[0].kind, ConnectorKind::JsonApi);
        assert!(file.providers[1].enabled);
    }

    #[test]
    fn disabled_entries_are_skipped_by_enabled() {
        let file = parse(
            "providers:\n  \
             - provider: way\n    kind: fixture\n    path: way.json\n    enabled: false\n  \
             - provider: parkwhiz\n    kind: fixture\n    path: pw.json\n",
        )
        .unwrap();
        let enabled: Vec<Provider> = file.enabled().map(|p| p.provider).collect();
        assert_eq!(enabled, vec![Provider::ParkWhiz]);
    }

    #[test]
    fn duplicate_provider_is_rejected() {
        let err = parse(
            "providers:\n  \
             - provider: way\n    kind: fixture\n    path: a.json\n  \
             - provider: way\n    kind: fixture\n    path: b.json\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn json_api_without_base_url_is_rejected() {
        let err = parse("providers:\n  - provider: spothero\n    kind: json_api\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("base_url")));
    }

    #[test]
    fn fixture_without_path_is_rejected() {
        let err = parse("providers:\n  - provider: spothero\n    kind: fixture\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("path")));
    }

    #[test]
    fn unknown_provider_tag_is_parse_error() {
        let err = parse("providers:\n  - provider: valetnow\n    kind: fixture\n    path: x\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProvidersFileParse(_)));
    }
}

//! Offer catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::retention::{CatalogError, OfferCatalog};

/// Where the offer catalog comes from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// YAML file replacing the built-in offers
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Reads the configured file, or returns the built-in catalog when no path is set.
    pub fn load(&self) -> Result<OfferCatalog, CatalogError> {
        match &self.path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)?;
                let catalog = OfferCatalog::from_yaml_str(&yaml)?;
                tracing::info!(path = %path.display(), offers = catalog.len(), "Loaded offer catalog");
                Ok(catalog)
            }
            None => Ok(OfferCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_without_path_uses_builtin() {
        let catalog = CatalogConfig::default().load().unwrap();
        assert_eq!(catalog, OfferCatalog::builtin());
    }

    #[test]
    fn test_loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "offers:\n  - id: discount20\n    name: 20% off\n    description: 20% off for 6 months\n    target_reasons: [price]"
        )
        .unwrap();

        let config = CatalogConfig {
            path: Some(file.path().to_path_buf()),
        };
        let catalog = config.load().unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("discount20").unwrap().name, "20% off");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            path: Some(dir.path().join("missing.yaml")),
        };
        assert!(matches!(config.load(), Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "offers: []").unwrap();

        let config = CatalogConfig {
            path: Some(file.path().to_path_buf()),
        };
        assert!(matches!(config.load(), Err(CatalogError::Invalid(_))));
    }
}

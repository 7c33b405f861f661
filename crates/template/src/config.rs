//! Template lookup configuration
//!
//! Templates are plain PDF files resolved through an ordered list of
//! directories: the primary `plantillas/` directory, an optional override
//! directory taken from the `TEMPLATES_DIR` environment variable, and a
//! shared `../plantillas/` fallback. The first existing file wins.

use crate::{Result, TemplateError};
use std::path::{Path, PathBuf};

/// Environment variable naming the override template directory.
pub const TEMPLATES_DIR_ENV: &str = "TEMPLATES_DIR";

/// Search directories and assets for document generation.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    /// Primary template directory
    pub primary_dir: PathBuf,
    /// Deployment-specific override, searched after the primary directory
    pub override_dir: Option<PathBuf>,
    /// Shared fallback directory, searched last
    pub fallback_dir: PathBuf,
    /// Logo embedded by the generic layout; absence is non-fatal
    pub logo_path: Option<PathBuf>,
}

impl TemplateConfig {
    /// Configuration rooted at `root`, with the override directory taken
    /// from the environment.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            primary_dir: root.join("plantillas"),
            override_dir: std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from),
            fallback_dir: root.join("..").join("plantillas"),
            logo_path: Some(root.join("logo.jpg")),
        }
    }

    /// Configuration rooted at the current working directory.
    pub fn from_env() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Ordered candidate paths for a template identifier.
    pub fn candidates(&self, template_id: &str) -> Vec<PathBuf> {
        let mut paths = vec![self.primary_dir.join(template_id)];
        if let Some(dir) = &self.override_dir {
            paths.push(dir.join(template_id));
        }
        paths.push(self.fallback_dir.join(template_id));
        paths
    }

    /// Resolve a template identifier to the first existing candidate.
    pub fn resolve(&self, template_id: &str) -> Result<PathBuf> {
        let candidates = self.candidates(template_id);
        for candidate in &candidates {
            if candidate.is_file() {
                return Ok(candidate.clone());
            }
        }

        Err(TemplateError::TemplateNotFound {
            template: template_id.to_string(),
            candidates,
        })
    }

    /// Load the configured logo, if any. A missing or unreadable logo is
    /// logged and reported as absent.
    pub fn load_logo(&self) -> Option<Vec<u8>> {
        let path = self.logo_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(_) => {
                tracing::warn!(target: "template", "logo not found at {}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_env(root: &Path) -> TemplateConfig {
        TemplateConfig {
            primary_dir: root.join("plantillas"),
            override_dir: None,
            fallback_dir: root.join("..").join("plantillas"),
            logo_path: None,
        }
    }

    #[test]
    fn test_candidate_order() {
        let config = TemplateConfig {
            primary_dir: PathBuf::from("/srv/app/plantillas"),
            override_dir: Some(PathBuf::from("/etc/clinidoc/plantillas")),
            fallback_dir: PathBuf::from("/srv/plantillas"),
            logo_path: None,
        };

        let candidates = config.candidates("receta.pdf");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/srv/app/plantillas/receta.pdf"),
                PathBuf::from("/etc/clinidoc/plantillas/receta.pdf"),
                PathBuf::from("/srv/plantillas/receta.pdf"),
            ]
        );
    }

    #[test]
    fn test_candidates_skip_missing_override() {
        let config = config_without_env(Path::new("/srv/app"));
        assert_eq!(config.candidates("x.pdf").len(), 2);
    }

    #[test]
    fn test_resolve_not_found_lists_candidates() {
        let config = config_without_env(Path::new("/nonexistent"));
        match config.resolve("receta.pdf") {
            Err(TemplateError::TemplateNotFound {
                template,
                candidates,
            }) => {
                assert_eq!(template, "receta.pdf");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_logo_absent_is_none() {
        let config = TemplateConfig {
            logo_path: Some(PathBuf::from("/nonexistent/logo.jpg")),
            ..config_without_env(Path::new("/tmp"))
        };
        assert!(config.load_logo().is_none());

        let no_logo = config_without_env(Path::new("/tmp"));
        assert!(no_logo.load_logo().is_none());
    }
}

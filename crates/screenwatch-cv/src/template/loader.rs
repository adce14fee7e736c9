//! Template loading utilities

use super::{Template, TemplateConfig};
use crate::Result;
use crate::error::WatchError;
use anyhow::Context;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Recursive template loader rooted at one directory
pub struct TemplateLoader {
    root: PathBuf,
    config: TemplateConfig,
}

impl TemplateLoader {
    /// Create new template loader
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config: TemplateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    /// Every supported file under the root, in sorted path order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(WatchError::TemplateRootMissing(self.root.clone()).into());
        }

        let mut files = Vec::new();
        self.walk(&self.root, &mut files)?;
        files.sort();

        Ok(files)
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            // file_type does not follow symlinks
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat: {:?}", path))?;

            if file_type.is_dir() {
                self.walk(&path, files)?;
            } else if file_type.is_symlink() && path.is_dir() {
                debug!("Not following directory link {:?}", path);
            } else if self.config.is_supported(&path) {
                files.push(path);
            } else {
                warn!("Skipping {:?}: extension not in supported_extensions", path);
            }
        }

        Ok(())
    }

    /// Decode every discovered template. Any decode failure aborts the load.
    pub fn load_all(&self) -> Result<Vec<Template>> {
        let files = self.discover()?;
        if files.is_empty() {
            return Err(WatchError::NoTemplates(self.root.clone()).into());
        }

        files.iter().map(|path| self.load_file(path)).collect()
    }

    /// Decode a single template file to RGBA
    pub fn load_file(&self, path: &Path) -> Result<Template> {
        info!("Loading {}", path.display());

        let image = image::open(path)
            .map_err(|source| WatchError::TemplateDecode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let name = path.to_string_lossy().to_string();
        let tolerance = self.config.tolerance_for(&name, path);

        Ok(Template::new(name, image)
            .with_path(path)
            .with_tolerance(tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, rgba: [u8; 4]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        RgbaImage::from_pixel(2, 2, Rgba(rgba)).save(path)?;
        Ok(())
    }

    #[test]
    fn test_recursive_sorted_discovery() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_png(&dir.path().join("b.png"), [1, 1, 1, 255])?;
        write_png(&dir.path().join("a/nested/c.png"), [2, 2, 2, 255])?;
        write_png(&dir.path().join("a/d.png"), [3, 3, 3, 255])?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;
        fs::write(dir.path().join("a/no_extension"), b"\x89PNG")?;

        let files = TemplateLoader::new(dir.path()).discover()?;
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a/d.png"),
                PathBuf::from("a/nested/c.png"),
                PathBuf::from("b.png"),
            ]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_link_cycle_not_followed() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_png(&dir.path().join("a.png"), [5, 5, 5, 255])?;
        fs::create_dir_all(dir.path().join("sub"))?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop"))?;

        let files = TemplateLoader::new(dir.path()).discover()?;
        assert_eq!(files, vec![dir.path().join("a.png")]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_file_link_is_loaded() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let shared = tempfile::tempdir()?;
        write_png(&shared.path().join("real.png"), [5, 5, 5, 255])?;
        std::os::unix::fs::symlink(
            shared.path().join("real.png"),
            dir.path().join("alias.png"),
        )?;

        let templates = TemplateLoader::new(dir.path()).load_all()?;
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].path, dir.path().join("alias.png"));
        Ok(())
    }

    #[test]
    fn test_load_applies_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_png(&dir.path().join("icon.png"), [9, 8, 7, 255])?;
        write_png(&dir.path().join("other.png"), [9, 8, 7, 255])?;

        let mut config = TemplateConfig {
            tolerance: 3,
            ..Default::default()
        };
        config.tolerance_overrides.insert("icon.png".to_string(), 12);

        let templates = TemplateLoader::new(dir.path()).with_config(config).load_all()?;
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].tolerance, 12);
        assert_eq!(templates[1].tolerance, 3);
        assert_eq!(templates[0].image.get_pixel(1, 1), &Rgba([9, 8, 7, 255]));
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let err = TemplateLoader::new("/definitely/not/here").load_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WatchError>(),
            Some(WatchError::TemplateRootMissing(_))
        ));
    }

    #[test]
    fn test_empty_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let err = TemplateLoader::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WatchError>(),
            Some(WatchError::NoTemplates(_))
        ));
        Ok(())
    }

    #[test]
    fn test_corrupt_template_is_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_png(&dir.path().join("good.png"), [0, 0, 0, 255])?;
        fs::write(dir.path().join("broken.png"), b"not a png")?;

        let err = TemplateLoader::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WatchError>(),
            Some(WatchError::TemplateDecode { .. })
        ));
        Ok(())
    }
}

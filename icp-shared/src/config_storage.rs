//! Configuration storage for alignment tools.
//!
//! Keeps run parameters and named input curves between sessions.
//! All config is stored in ~/.icp_config/ by default. Alignment results are
//! never written here; a run is always recomputed from its inputs.

use std::path::{Path, PathBuf};

use icp_math::{IcpParams, Point};

use crate::point_io::{self, PointIoError};

/// Configuration storage manager for alignment parameters and saved curves.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    /// Root directory for all configuration (e.g., ~/.icp_config)
    root_path: PathBuf,
}

impl ConfigStorage {
    /// Create a new config storage with default path (~/.icp_config)
    pub fn new() -> std::io::Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
        let root_path = PathBuf::from(home).join(".icp_config");
        Ok(Self { root_path })
    }

    /// Create a new config storage with custom root path
    pub fn with_path(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Get the root configuration path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    // =========================================================================
    // Run parameters
    // =========================================================================

    fn params_path(&self) -> PathBuf {
        self.root_path.join("params.json")
    }

    /// Get the stored run parameters.
    ///
    /// Returns None if nothing has been saved.
    /// Returns Some(Err) if the file exists but cannot be loaded.
    pub fn get_params(&self) -> Option<std::io::Result<IcpParams>> {
        let path = self.params_path();

        if !path.exists() {
            return None;
        }

        Some(load_params_file(&path))
    }

    /// Save run parameters, creating the config directory if needed.
    ///
    /// Returns the path where the parameters were saved.
    pub fn save_params(&self, params: &IcpParams) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.root_path)?;

        let path = self.params_path();
        save_params_file(&path, params)?;
        Ok(path)
    }

    /// Delete the stored run parameters.
    ///
    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_params(&self) -> std::io::Result<bool> {
        remove_if_exists(&self.params_path())
    }

    // =========================================================================
    // Saved curves
    // =========================================================================

    fn curves_dir(&self) -> PathBuf {
        self.root_path.join("curves")
    }

    fn curve_filename(&self, name: &str) -> std::io::Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid curve name {name:?}"),
            ));
        }

        Ok(self.curves_dir().join(format!("{name}.tsv")))
    }

    /// Get a saved curve by name.
    ///
    /// Returns None if no curve with that name exists.
    /// Returns Some(Err) if the name is invalid or the file cannot be loaded.
    pub fn get_curve(&self, name: &str) -> Option<Result<Vec<Point>, PointIoError>> {
        let path = match self.curve_filename(name) {
            Ok(path) => path,
            Err(e) => return Some(Err(e.into())),
        };

        if !path.exists() {
            return None;
        }

        Some(point_io::load_curve(&path))
    }

    /// Save a curve under `name`, creating the curves directory if needed.
    pub fn save_curve(&self, name: &str, points: &[Point]) -> Result<PathBuf, PointIoError> {
        let path = self.curve_filename(name)?;
        std::fs::create_dir_all(self.curves_dir())?;

        point_io::save_curve(&path, points)?;
        log::debug!("saved curve {name:?} ({} points)", points.len());
        Ok(path)
    }

    /// List the names of all saved curves, sorted.
    pub fn list_curves(&self) -> std::io::Result<Vec<String>> {
        let dir = self.curves_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) == Some("tsv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete a saved curve.
    ///
    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_curve(&self, name: &str) -> std::io::Result<bool> {
        remove_if_exists(&self.curve_filename(name)?)
    }
}

/// Load run parameters from a JSON file
pub fn load_params_file(path: &Path) -> std::io::Result<IcpParams> {
    let json = std::fs::read_to_string(path)?;
    let params: IcpParams = serde_json::from_str(&json)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    params
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(params)
}

/// Save run parameters to a JSON file
pub fn save_params_file(path: &Path, params: &IcpParams) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(params)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_file(path)?;
    Ok(true)
}

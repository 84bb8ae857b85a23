// File system operations for storing presets
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use super::preset::{Preset, PresetSummary};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to get app data directory")]
    NoAppDataDir,
    #[error("Preset not found: {0}")]
    NotFound(Uuid),
}

pub type PresetResult<T> = Result<T, PresetError>;

/// Get the app data directory for Beatloom
pub fn get_app_data_dir() -> PresetResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or(PresetError::NoAppDataDir)?;
    let app_dir = data_dir.join("beatloom");
    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Get the default presets directory
pub fn get_preset_dir() -> PresetResult<PathBuf> {
    let preset_dir = get_app_data_dir()?.join("presets");
    fs::create_dir_all(&preset_dir)?;
    Ok(preset_dir)
}

pub fn preset_path(dir: &Path, id: &Uuid) -> PathBuf {
    dir.join(format!("{}.json", id))
}

/// Store a preset in `dir` and return its path and SHA256 hash
pub fn save_preset(dir: &Path, preset: &Preset) -> PresetResult<(PathBuf, String)> {
    fs::create_dir_all(dir)?;
    let data = serde_json::to_vec_pretty(preset)?;

    let file_path = preset_path(dir, &preset.id);
    let mut file = fs::File::create(&file_path)?;
    file.write_all(&data)?;

    log::info!("Saved preset '{}' to {}", preset.name, file_path.display());
    Ok((file_path, calculate_sha256(&data)))
}

/// Read a preset file from disk
pub fn load_preset(path: &Path) -> PresetResult<Preset> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

pub fn get_preset(dir: &Path, id: &Uuid) -> PresetResult<Preset> {
    let path = preset_path(dir, id);
    if !path.is_file() {
        return Err(PresetError::NotFound(*id));
    }
    load_preset(&path)
}

/// List presets in `dir`, newest first.
///
/// Files that do not parse as presets are skipped.
pub fn list_presets(dir: &Path) -> PresetResult<Vec<PresetSummary>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut presets = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match load_preset(&path) {
            Ok(preset) => presets.push(preset.summary()),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    presets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(presets)
}

pub fn delete_preset(dir: &Path, id: &Uuid) -> PresetResult<()> {
    let path = preset_path(dir, id);
    if !path.is_file() {
        return Err(PresetError::NotFound(*id));
    }
    fs::remove_file(path)?;
    Ok(())
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

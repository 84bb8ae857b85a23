// State management module
// Handles preset models and their file system storage

pub mod preset;
pub mod storage;

pub use preset::{Preset, PresetSummary};
pub use storage::{
    calculate_sha256, delete_preset, get_app_data_dir, get_preset, get_preset_dir, list_presets,
    load_preset, preset_path, save_preset, PresetError, PresetResult,
};

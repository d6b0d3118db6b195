use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cursor::{CursorConfig, LayerMask};

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub cursor: CursorConfigData,
    pub save: SaveConfigData,
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config
            let _ = config.save(path);
            config
        })
    }
}

/// Placement cursor tuning (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfigData {
    pub rotation_speed: f32,
    pub snap_distance: f32,
    pub tile_size: f32,
    pub tile_offset: Vec3,
    pub layer_mask: LayerMask,
    pub ray_range: f32,
}

impl Default for CursorConfigData {
    fn default() -> Self {
        CursorConfig::default().into()
    }
}

impl From<CursorConfigData> for CursorConfig {
    fn from(data: CursorConfigData) -> Self {
        Self {
            rotation_speed: data.rotation_speed,
            snap_distance: data.snap_distance,
            tile_size: data.tile_size,
            tile_offset: data.tile_offset,
            layer_mask: data.layer_mask,
            ray_range: data.ray_range,
        }
    }
}

impl From<CursorConfig> for CursorConfigData {
    fn from(config: CursorConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
            snap_distance: config.snap_distance,
            tile_size: config.tile_size,
            tile_offset: config.tile_offset,
            layer_mask: config.layer_mask,
            ray_range: config.ray_range,
        }
    }
}

/// Save-file settings (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigData {
    pub file_name: String,
    pub encrypt: bool,
    pub pretty: bool,
}

impl Default for SaveConfigData {
    fn default() -> Self {
        Self {
            file_name: "game_data.save".to_string(),
            encrypt: true,
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.cursor.snap_distance, 6.0);
        assert_eq!(config.cursor.tile_size, 1.0);
        assert!(config.save.encrypt);
    }

    #[test]
    fn test_save_load() {
        let config = EngineConfig::default();
        let path = std::env::temp_dir().join(format!("shopfloor_config_{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();

        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();

        assert_eq!(loaded.cursor.snap_distance, config.cursor.snap_distance);
        assert_eq!(loaded.save.file_name, config.save.file_name);

        // Cleanup
        let _ = fs::remove_file(&path);
    }
}

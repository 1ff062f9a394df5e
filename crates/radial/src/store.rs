//! Durable storage of the menu document.
//!
//! Every mutation goes through [`PresetStore::update`], which reads the
//! whole document, applies the change and writes the whole document back.

use crate::colour::Colour;
use crate::error::{EditResult, PresetError, StoreError, StoreResult};
use crate::model::{
    ColourConfig, ColourSlot, DEFAULT_PRESET, MenuDocument, PresetName, SizeConfig, SmartMode,
};
use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const DOCUMENT_FILE: &str = "menu.json";

#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

/// Directory holding the document and the shell settings.
pub fn config_dir() -> StoreResult<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("org", "radial", "radial-menu").ok_or(StoreError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> StoreResult<PathBuf> {
        Ok(config_dir()?.join(DOCUMENT_FILE))
    }

    pub fn open_default() -> StoreResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document, migrating and backfilling as needed. Anything
    /// normalized on the way in is written straight back. A missing file is
    /// seeded with a fresh document.
    pub fn load(&self) -> StoreResult<MenuDocument> {
        if !self.path.exists() {
            let doc = MenuDocument::default();
            self.save(&doc)?;
            log::info!("Created menu document at {}", self.path.display());
            return Ok(doc);
        }

        let text = fs_err::read_to_string(&self.path)?;
        let raw: Value = serde_json::from_str(&text)?;
        let (doc, rewritten) = decode(raw)?;
        if rewritten {
            log::info!("Normalized menu document at {}", self.path.display());
            self.save(&doc)?;
        }
        Ok(doc)
    }

    /// Overwrites the whole document. Written to a sibling file first and
    /// renamed over the target so readers never see a partial document.
    pub fn save(&self, doc: &MenuDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs_err::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs_err::write(&tmp, json)?;
        fs_err::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load, mutate, save. Nothing is written when `f` fails.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut MenuDocument) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }

    pub fn list_presets(&self) -> StoreResult<Vec<PresetName>> {
        Ok(self.load()?.preset_names())
    }

    pub fn active_preset(&self) -> StoreResult<PresetName> {
        Ok(self.load()?.active_preset)
    }

    pub fn set_active_preset(&self, name: &str) -> EditResult<()> {
        self.update(|doc| {
            doc.set_active_preset(name).inspect_err(|e| log::warn!("{e}"))?;
            log::info!("Active preset is now '{name}'");
            Ok(())
        })
    }

    pub fn is_preset_enabled(&self, name: &str) -> StoreResult<bool> {
        Ok(self.load()?.is_preset_enabled(name))
    }

    pub fn set_preset_enabled(&self, name: &str, enabled: bool) -> EditResult<()> {
        self.update(|doc| Ok(doc.set_preset_enabled(name, enabled)?))
    }

    pub fn create_preset(&self, name: &str, clone_from: Option<&str>) -> EditResult<PresetName> {
        self.update(|doc| Ok(doc.create_preset(name, clone_from)?))
    }

    pub fn delete_preset(&self, name: &str) -> EditResult<()> {
        self.update(|doc| Ok(doc.delete_preset(name)?))
    }

    pub fn smart_mode(&self) -> StoreResult<SmartMode> {
        Ok(self.load()?.ui.smart_mode)
    }

    pub fn set_smart_mode(&self, mode: SmartMode) -> StoreResult<()> {
        self.update(|doc| {
            doc.ui.smart_mode = mode;
            Ok(())
        })
    }

    pub fn set_size(&self, size: SizeConfig) -> StoreResult<SizeConfig> {
        self.update(|doc| {
            doc.ui.size = size.sanitized();
            Ok(doc.ui.size)
        })
    }

    pub fn set_colour(&self, preset: &str, colour: ColourConfig) -> EditResult<()> {
        self.update(|doc| {
            let target = doc
                .preset_mut(preset)
                .ok_or_else(|| PresetError::NotFound(PresetName::new(preset)))?;
            target.colour = colour;
            Ok(())
        })
    }

    pub fn set_colour_slot(&self, preset: &str, slot: ColourSlot, colour: Colour) -> EditResult<()> {
        self.update(|doc| {
            let target = doc
                .preset_mut(preset)
                .ok_or_else(|| PresetError::NotFound(PresetName::new(preset)))?;
            target.colour.set(slot, colour);
            Ok(())
        })
    }
}

/// Turns raw JSON into a current-schema document. The flag reports whether
/// the result differs from the input and should be written back.
pub fn decode(mut raw: Value) -> StoreResult<(MenuDocument, bool)> {
    let mut migrated = false;

    if let Value::Object(obj) = &mut raw
        && !obj.contains_key("presets")
    {
        *obj = migrate_legacy(std::mem::take(obj));
        log::info!("Migrated single-menu document into the '{DEFAULT_PRESET}' preset");
        migrated = true;
    }

    if let Value::Object(obj) = &mut raw {
        migrated |= adopt_legacy_size(obj);
    }

    let mut doc: MenuDocument = serde_json::from_value(raw.clone())?;
    doc.normalize();
    let rewritten = migrated || serde_json::to_value(&doc)? != raw;
    Ok((doc, rewritten))
}

fn migrate_legacy(mut legacy: Map<String, Value>) -> Map<String, Value> {
    let mut preset = Map::new();
    let sections = legacy
        .remove("inner_section")
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Map::new()));
    preset.insert("inner_section".to_string(), sections);
    if let Some(colour) = legacy.remove("colour") {
        preset.insert("colour".to_string(), colour);
    }
    if let Some(size) = legacy.remove("size") {
        preset.insert("size".to_string(), size);
    }

    let mut presets = Map::new();
    presets.insert(DEFAULT_PRESET.to_string(), Value::Object(preset));

    let mut doc = Map::new();
    doc.insert("active_preset".to_string(), Value::from(DEFAULT_PRESET));
    doc.insert("presets".to_string(), Value::Object(presets));
    if let Some(ui) = legacy.remove("ui") {
        doc.insert("ui".to_string(), ui);
    }
    doc
}

/// Older documents kept the size block per preset. When there is no global
/// block yet, the active preset's one seeds it.
fn adopt_legacy_size(doc: &mut Map<String, Value>) -> bool {
    let has_global = doc
        .get("ui")
        .and_then(|ui| ui.get("size"))
        .is_some_and(Value::is_object);
    if has_global {
        return false;
    }
    let active = doc
        .get("active_preset")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PRESET)
        .to_string();
    let Some(size) = doc
        .get("presets")
        .and_then(|p| p.get(&active))
        .and_then(|p| p.get("size"))
        .filter(|s| s.is_object())
        .cloned()
    else {
        return false;
    };

    let ui = doc
        .entry("ui")
        .or_insert_with(|| Value::Object(Map::new()));
    if !ui.is_object() {
        *ui = Value::Object(Map::new());
    }
    if let Value::Object(ui) = ui {
        ui.insert("size".to_string(), size);
    }
    true
}

use crate::events::AppEvent;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use radial::store::{self, PresetStore};
use radial::StoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.toml";

/// Shell settings. The menu document itself lives in the preset store.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides the default document location.
    pub document: Option<PathBuf>,
    /// Whether the detector starts enabled.
    pub enabled: bool,
    pub smart_preset: bool,
    /// Overrides the platform double-click interval.
    pub double_click_ms: Option<u64>,
    pub script_shell: String,
    /// Widgets whose name starts with this count as the 3D viewport.
    pub viewport_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: None,
            enabled: true,
            smart_preset: false,
            double_click_ms: None,
            script_shell: "sh".to_string(),
            viewport_prefix: "viewport".to_string(),
        }
    }
}

impl Settings {
    pub fn double_click(&self, platform_ms: u64) -> Duration {
        Duration::from_millis(self.double_click_ms.unwrap_or(platform_ms))
    }

    pub fn document_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.document {
            Some(path) => Ok(path.clone()),
            None => Ok(PresetStore::default_path()?),
        }
    }

    pub fn document_store(&self) -> Result<PresetStore, SettingsError> {
        Ok(PresetStore::new(self.document_path()?))
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_settings_path() -> Result<PathBuf, SettingsError> {
    Ok(store::config_dir()?.join(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("RADIAL").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Settings {
    let loaded = get_settings_path().and_then(|path| load_settings_from(&path));
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        }
    }
}

/// Posts [`AppEvent::DocumentChanged`] whenever the document file changes.
pub async fn run_async_watcher(document: PathBuf, tx: Sender<AppEvent>) {
    let watch_dir = match document.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = fs_err::create_dir_all(&watch_dir) {
        log::error!("Failed to create document directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch document directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &document)
                    && tx.send(AppEvent::DocumentChanged).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.script_shell, "sh");
        assert_eq!(settings.double_click(400), Duration::from_millis(400));
    }

    #[test]
    fn test_file_overrides_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs_err::write(
            &path,
            "smart_preset = true\ndouble_click_ms = 300\nviewport_prefix = \"modelPanel\"\n",
        )
        .unwrap();
        let settings = load_settings_from(&path).unwrap();
        assert!(settings.smart_preset);
        assert!(settings.enabled);
        assert_eq!(settings.viewport_prefix, "modelPanel");
        assert_eq!(settings.double_click(500), Duration::from_millis(300));
    }

    #[test]
    fn test_document_override() {
        let settings = Settings {
            document: Some(PathBuf::from("/tmp/menu.json")),
            ..Settings::default()
        };
        assert_eq!(
            settings.document_store().unwrap().path(),
            Path::new("/tmp/menu.json")
        );
    }
}

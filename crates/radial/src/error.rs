use crate::model::{Label, PresetName};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed menu document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PresetError {
    #[error("Preset '{0}' not found")]
    NotFound(PresetName),
    #[error("Preset '{0}' already exists")]
    AlreadyExists(PresetName),
    #[error("The 'Default' preset cannot be deleted or deactivated")]
    ProtectedDefault,
    #[error("Preset name cannot be empty")]
    InvalidName,
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Nothing selected")]
    NothingSelected,
    #[error("Inner section '{0}' not found")]
    SectorNotFound(Label),
    #[error("Child '{child}' not found under '{parent}'")]
    ChildNotFound { parent: Label, child: Label },
    #[error("Label cannot be empty")]
    EmptyLabel,
    #[error("Label '{0}' is already used by a sibling")]
    LabelTaken(Label),
    #[error("Clipboard holds nothing that can be pasted here")]
    ClipboardEmpty,
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type EditResult<T> = Result<T, EditError>;

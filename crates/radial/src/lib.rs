mod macros;

pub mod colour;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod interaction;
pub mod model;
pub mod ordered;
pub mod popup;
pub mod script;
pub mod selection;
pub mod smart;
pub mod store;

pub use error::{EditError, PresetError, StoreError};
pub use model::{MenuDocument, Preset, PresetName, SectionNode};
pub use store::PresetStore;

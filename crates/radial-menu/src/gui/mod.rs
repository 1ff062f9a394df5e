pub mod editor;
pub mod host;
pub mod theme;
pub mod view;

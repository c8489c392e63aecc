//! Live-scene state owned by the render context

pub mod content;
pub mod settings;
pub mod transform;

pub use content::ViewerContent;
pub use settings::{QualityLevel, ViewSettings, ViewerSettings};
pub use transform::{unit_cube_transform, update_root_transform};

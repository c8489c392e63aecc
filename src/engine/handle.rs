//! Opaque handles into the rendering engine's object arena
//!
//! The core never holds references to live engine objects. Every engine
//! object is addressed through an index-like handle the engine alone can
//! resolve, so a destroyed-and-replaced object can never dangle here.

/// A loaded model asset (geometry, materials, animation data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u64);

/// A GPU texture (equirect source, cubemap, prefiltered reflections)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// An indirect-light (image-based lighting) object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndirectLightHandle(pub u64);

/// A skybox object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkyboxHandle(pub u64);

/// A GPU synchronization fence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FenceHandle(pub u64);

/// A material shared by one or more renderable primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// A scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity(pub u64);

// Scene layout engine: static placement templates and the helper that
// applies them to a scene's illustrations. Pure and deterministic.

pub mod handlers;
pub mod illustrations;
pub mod templates;

pub use templates::LayoutType;

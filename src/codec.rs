pub mod png;
pub mod texture;

pub mod render;
pub mod search;
pub mod validate;

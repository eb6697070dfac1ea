pub mod bindings;
pub mod drag;
pub mod mapping;

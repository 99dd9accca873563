pub mod app;
pub mod keys;
pub mod overlay;
pub mod surface;
pub mod theme;
pub mod window;

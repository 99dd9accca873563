pub mod config;
pub mod draw;
pub mod element;
pub mod events;
pub mod geometry;
pub mod gui;
pub mod input;
pub mod keybind;
pub mod manager;
pub mod ring;
pub mod sys;

#[macro_export]
macro_rules! impl_string_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

pub mod color;
pub mod item;

pub use color::{Color, Hsv};
pub use item::{Item, UserId, default_label, resolve_label};

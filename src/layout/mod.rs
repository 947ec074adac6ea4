//! Keyboard layout mapping: buttons, their symbols and standard presets

mod map;
mod presets;

pub use map::{Binding, ButtonMap, ConflictPolicy, LayoutError};
pub use presets::{
    standard_layout, ButtonGroups, KeyboardKind, Language, LayoutOptions, StandardLayout,
};

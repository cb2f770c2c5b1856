//! Output formatting and theming.

pub mod theme;

pub use theme::Theme;

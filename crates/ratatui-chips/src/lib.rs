//! Keyboard-navigable chip widgets for [ratatui](https://ratatui.rs).
//!
//! - [`chip_grid::ChipGrid`]: removable chips (tags). Arrow keys move through a 2D grid where
//!   every chip is a row and its label and remove button are cells.
//! - [`chip_listbox::ChipListbox`]: selectable chips with single or multiple selection.
//!
//! Both widgets are event-loop agnostic: feed them [`input::InputEvent`]s (enable the `crossterm`
//! feature for [`crossterm_input`]) and call `render` with a buffer. Navigation state lives in the
//! key managers re-exported from `ratatui-chips-core`.
pub use ratatui_chips_core::change;
#[cfg(feature = "crossterm")]
pub use ratatui_chips_core::crossterm_input;
pub use ratatui_chips_core::direction;
pub use ratatui_chips_core::focus;
pub use ratatui_chips_core::grid_key_manager;
pub use ratatui_chips_core::input;
pub use ratatui_chips_core::keymap;
pub use ratatui_chips_core::list_key_manager;

pub mod theme;

pub mod render;

pub mod chip;
pub mod chip_grid;
pub mod chip_listbox;

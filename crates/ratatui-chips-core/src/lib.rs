//! `ratatui-chips-core` provides the keyboard-navigation core behind the chip widgets.
//!
//! Nothing in this crate renders. It tracks which cell of a grid (or item of a list) is active,
//! moves that cursor in response to key events, and tells you when it moved. The widgets in
//! `ratatui-chips` build on it, and you can use it directly for any grid of focusable things.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you feed [`input::KeyEvent`]s in and read the active position out.
//! - Single-threaded and synchronous: change notifications run before the call that caused them
//!   returns.
//! - Never fails: navigating to something that does not exist is a no-op, not an error.
//!
//! ## Entry points
//!
//! - [`grid_key_manager::GridKeyManager`]: 2D cursor with row-wrapping column moves.
//! - [`grid_key_manager::GridFocusKeyManager`]: the same, focusing each cell it activates.
//! - [`list_key_manager::ListFocusKeyManager`]: flat variant with wrap-around and skipping.
//!
//! ## Focus follow
//!
//! `set_active_cell` notifies subscribers and (for the focus managers) focuses the cell.
//! `update_active_cell` does neither, so a widget can mirror focus changes that happened
//! elsewhere without bouncing focus back.
pub mod change;
pub mod direction;
pub mod focus;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod grid_key_manager;
pub mod input;
pub mod keymap;
pub mod list_key_manager;

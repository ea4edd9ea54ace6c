//! The chip model shared by [`crate::chip_grid::ChipGrid`] and
//! [`crate::chip_listbox::ChipListbox`].
//!
//! A chip is one grid row. Its cells are the things you can focus inside it: the chip's primary
//! action, and its remove button when it is removable. Focus itself lives in a [`FocusScope`]
//! shared by every chip of one widget, so focusing a cell implicitly blurs the previous one.

use crate::render;
use ratatui_chips_core::focus::Focusable;
use ratatui_chips_core::focus::Skippable;
use ratatui_chips_core::grid_key_manager::GridRow;
use std::cell::Cell;
use std::rc::Rc;

pub const REMOVE_ICON: &str = "×";
pub const SELECTED_ICON: &str = "✓";

/// Identifies a chip within the widget that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChipId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChipCellKind {
    Primary,
    Remove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FocusedCell {
    pub chip: ChipId,
    pub kind: ChipCellKind,
}

/// Focus owner and id source for one widget's chips.
#[derive(Debug, Default)]
pub struct FocusScope {
    focused: Cell<Option<FocusedCell>>,
    next_id: Cell<u64>,
}

impl FocusScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<FocusedCell> {
        self.focused.get()
    }

    pub fn set_focused(&self, cell: Option<FocusedCell>) {
        self.focused.set(cell);
    }

    pub fn clear(&self) {
        self.focused.set(None);
    }

    fn next_id(&self) -> ChipId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ChipId(id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChipConfig {
    pub removable: bool,
    pub disabled: bool,
    pub selected: bool,
}

/// A focusable part of a chip.
#[derive(Debug)]
pub struct ChipCell {
    chip: ChipId,
    kind: ChipCellKind,
    disabled: bool,
    scope: Rc<FocusScope>,
}

impl ChipCell {
    pub fn chip_id(&self) -> ChipId {
        self.chip
    }

    pub fn kind(&self) -> ChipCellKind {
        self.kind
    }

    pub fn is_focused(&self) -> bool {
        self.scope.focused()
            == Some(FocusedCell {
                chip: self.chip,
                kind: self.kind,
            })
    }
}

impl Focusable for ChipCell {
    fn focus(&self) {
        if self.disabled {
            return;
        }
        self.scope.set_focused(Some(FocusedCell {
            chip: self.chip,
            kind: self.kind,
        }));
    }
}

#[derive(Debug)]
pub struct Chip {
    id: ChipId,
    label: String,
    removable: bool,
    disabled: bool,
    selected: Cell<bool>,
    cells: Vec<Rc<ChipCell>>,
    scope: Rc<FocusScope>,
}

impl Chip {
    /// Creates a chip with a fresh id from `scope`.
    pub fn new(scope: &Rc<FocusScope>, label: impl Into<String>, config: ChipConfig) -> Self {
        let id = scope.next_id();
        let mut kinds = vec![ChipCellKind::Primary];
        if config.removable {
            kinds.push(ChipCellKind::Remove);
        }
        let cells = kinds
            .into_iter()
            .map(|kind| {
                Rc::new(ChipCell {
                    chip: id,
                    kind,
                    disabled: config.disabled,
                    scope: scope.clone(),
                })
            })
            .collect();

        Self {
            id,
            label: label.into(),
            removable: config.removable,
            disabled: config.disabled,
            selected: Cell::new(config.selected),
            cells,
            scope: scope.clone(),
        }
    }

    pub fn id(&self) -> ChipId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_removable(&self) -> bool {
        self.removable
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn set_selected(&self, selected: bool) {
        self.selected.set(selected);
    }

    pub fn is_focused(&self) -> bool {
        self.scope.focused().is_some_and(|f| f.chip == self.id)
    }

    pub fn cell(&self, kind: ChipCellKind) -> Option<&Rc<ChipCell>> {
        self.cells.iter().find(|c| c.kind == kind)
    }

    /// Rendered text, e.g. `[rust ×]` or `[✓ rust]`.
    pub fn display_text(&self) -> String {
        let mut s = String::from("[");
        if self.is_selected() {
            s.push_str(SELECTED_ICON);
            s.push(' ');
        }
        s.push_str(&self.label);
        if self.removable {
            s.push(' ');
            s.push_str(REMOVE_ICON);
        }
        s.push(']');
        s
    }

    pub fn display_width(&self) -> u16 {
        render::str_width(&self.display_text())
    }
}

impl GridRow for Chip {
    type Cell = ChipCell;

    fn cells(&self) -> &[Rc<ChipCell>] {
        &self.cells
    }
}

/// Focusing a chip as a whole focuses its primary action.
impl Focusable for Chip {
    fn focus(&self) {
        if let Some(primary) = self.cell(ChipCellKind::Primary) {
            primary.focus();
        }
    }
}

impl Skippable for Chip {
    fn is_skipped(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_per_scope() {
        let a = Rc::new(FocusScope::new());
        let b = Rc::new(FocusScope::new());
        assert_eq!(Chip::new(&a, "x", ChipConfig::default()).id(), ChipId(0));
        assert_eq!(Chip::new(&a, "y", ChipConfig::default()).id(), ChipId(1));
        assert_eq!(Chip::new(&b, "z", ChipConfig::default()).id(), ChipId(0));
    }

    #[test]
    fn removable_chip_has_two_cells() {
        let scope = Rc::new(FocusScope::new());
        let plain = Chip::new(&scope, "a", ChipConfig::default());
        let removable = Chip::new(
            &scope,
            "b",
            ChipConfig {
                removable: true,
                ..Default::default()
            },
        );
        assert_eq!(plain.cells().len(), 1);
        assert_eq!(removable.cells().len(), 2);
        assert_eq!(removable.display_text(), "[b ×]");
        assert_eq!(removable.display_width(), 5);
    }

    #[test]
    fn focusing_one_cell_blurs_the_other() {
        let scope = Rc::new(FocusScope::new());
        let cfg = ChipConfig {
            removable: true,
            ..Default::default()
        };
        let a = Chip::new(&scope, "a", cfg);
        let b = Chip::new(&scope, "b", cfg);

        a.focus();
        assert!(a.is_focused());
        assert!(a.cells()[0].is_focused());

        b.cells()[1].focus();
        assert!(!a.is_focused());
        assert!(b.cells()[1].is_focused());
        assert!(!b.cells()[0].is_focused());
    }

    #[test]
    fn disabled_chip_refuses_focus() {
        let scope = Rc::new(FocusScope::new());
        let chip = Chip::new(
            &scope,
            "off",
            ChipConfig {
                disabled: true,
                ..Default::default()
            },
        );
        chip.focus();
        assert!(!chip.is_focused());
        assert!(chip.is_skipped());
    }
}

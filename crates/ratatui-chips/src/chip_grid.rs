use crate::chip::Chip;
use crate::chip::ChipCell;
use crate::chip::ChipCellKind;
use crate::chip::ChipConfig;
use crate::chip::ChipId;
use crate::chip::FocusScope;
use crate::chip::FocusedCell;
use crate::render;
use crate::render::ChipStyles;
use crate::render::HitArea;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui_chips_core::direction::Direction;
use ratatui_chips_core::focus::Focusable;
use ratatui_chips_core::grid_key_manager::GridFocusKeyManager;
use ratatui_chips_core::grid_key_manager::GridKeyManager;
use ratatui_chips_core::grid_key_manager::GridPosition;
use ratatui_chips_core::grid_key_manager::GridRow;
use ratatui_chips_core::input::InputEvent;
use ratatui_chips_core::input::KeyCode;
use ratatui_chips_core::input::KeyEvent;
use ratatui_chips_core::input::MouseButton;
use ratatui_chips_core::input::MouseEvent;
use ratatui_chips_core::input::MouseEventKind;
use ratatui_chips_core::keymap;
use ratatui_chips_core::keymap::Binding;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChipGridAction {
    None,
    Redraw,
    Removed { id: ChipId, label: String },
}

/// Options for [`ChipGrid`].
#[derive(Clone, Debug)]
pub struct ChipGridOptions {
    /// Columns between chips on the same line.
    pub gap: u16,
    pub direction: Direction,
    /// Whether [`ChipGrid::add_chip`] creates removable chips.
    pub removable: bool,
    pub style: Style,
    pub focused_style: Style,
    pub disabled_style: Style,
}

impl Default for ChipGridOptions {
    fn default() -> Self {
        Self {
            gap: 1,
            direction: Direction::Ltr,
            removable: true,
            style: Style::default(),
            focused_style: Style::default().add_modifier(Modifier::REVERSED),
            disabled_style: Style::default(),
        }
    }
}

/// Keys the grid handles on top of the arrow keys.
#[derive(Clone, Debug)]
pub struct ChipGridBindings {
    pub first: Vec<KeyEvent>,
    pub last: Vec<KeyEvent>,
    pub remove: Vec<KeyEvent>,
    /// Activates the focused cell; on a remove button that removes the chip.
    pub activate: Vec<KeyEvent>,
}

impl Default for ChipGridBindings {
    fn default() -> Self {
        Self {
            first: vec![keymap::key(KeyCode::Home)],
            last: vec![keymap::key(KeyCode::End)],
            remove: vec![keymap::key(KeyCode::Backspace), keymap::key(KeyCode::Delete)],
            activate: vec![keymap::key(KeyCode::Enter), keymap::key_char(' ')],
        }
    }
}

impl ChipGridBindings {
    /// Key hints for a help line, arrows included.
    pub fn help(&self) -> Vec<Binding> {
        vec![
            Binding::new("←↑↓→", "move", Vec::new()),
            Binding::new(
                "home/end",
                "first/last",
                [self.first.clone(), self.last.clone()].concat(),
            ),
            Binding::new("del", "remove", self.remove.clone()),
        ]
    }
}

/// A grid of removable chips, e.g. the tags of a tag input.
///
/// Each chip is a grid row whose cells are its label and (if removable) its remove button. Up and
/// Down move between chips, Left and Right move between cells and continue into the neighbouring
/// chip. Disabled chips are drawn but never become active. Chips flow left to right (right to
/// left with [`Direction::Rtl`]) and wrap to new lines.
///
/// Drive it from your app loop with [`ChipGrid::handle_event`] and [`ChipGrid::render`].
pub struct ChipGrid {
    options: ChipGridOptions,
    bindings: ChipGridBindings,
    scope: Rc<FocusScope>,
    chips: Vec<Rc<Chip>>,
    keys: GridFocusKeyManager<Chip>,
    hit_areas: Vec<HitArea>,
    has_focus: bool,
}

impl Default for ChipGrid {
    fn default() -> Self {
        Self::with_options(ChipGridOptions::default())
    }
}

impl ChipGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ChipGridOptions) -> Self {
        let keys = GridFocusKeyManager::new(Vec::new()).with_direction(options.direction);
        Self {
            options,
            bindings: ChipGridBindings::default(),
            scope: Rc::new(FocusScope::new()),
            chips: Vec::new(),
            keys,
            hit_areas: Vec::new(),
            has_focus: false,
        }
    }

    pub fn options(&self) -> &ChipGridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ChipGridOptions) {
        self.keys.set_direction(options.direction);
        self.options = options;
    }

    pub fn bindings(&self) -> &ChipGridBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: ChipGridBindings) {
        self.bindings = bindings;
    }

    pub fn key_manager(&self) -> &GridKeyManager<Chip> {
        &self.keys
    }

    pub fn key_manager_mut(&mut self) -> &mut GridKeyManager<Chip> {
        &mut self.keys
    }

    pub fn chips(&self) -> &[Rc<Chip>] {
        &self.chips
    }

    pub fn chip(&self, id: ChipId) -> Option<&Rc<Chip>> {
        self.chips.iter().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn focused(&self) -> Option<FocusedCell> {
        self.scope.focused()
    }

    pub fn active_chip(&self) -> Option<&Rc<Chip>> {
        self.keys.active_row()
    }

    pub fn add_chip(&mut self, label: impl Into<String>) -> ChipId {
        let config = ChipConfig {
            removable: self.options.removable,
            ..Default::default()
        };
        self.add_chip_with(label, config)
    }

    pub fn add_chip_with(&mut self, label: impl Into<String>, config: ChipConfig) -> ChipId {
        let chip = Rc::new(Chip::new(&self.scope, label, config));
        let id = chip.id();
        tracing::debug!(id = id.0, label = chip.label(), "chip added");
        self.chips.push(chip);
        self.sync_rows();
        id
    }

    /// Removes a chip. If it held the active cell, the chip that takes its place (or the new last
    /// chip) becomes active, keeping the column when that chip has one.
    pub fn remove_chip(&mut self, id: ChipId) -> Option<Rc<Chip>> {
        let index = self.chips.iter().position(|c| c.id() == id)?;
        let column = self.keys.active_column_index().max(0);
        let active_row = self
            .keys
            .active_row()
            .filter(|r| r.id() == id)
            .map(|_| self.keys.active_row_index());

        let chip = self.chips.remove(index);
        if chip.is_focused() {
            self.scope.clear();
        }
        self.sync_rows();
        tracing::debug!(id = id.0, label = chip.label(), "chip removed");

        if let Some(row) = active_row {
            self.activate_after_removal(row, column);
        }
        Some(chip)
    }

    /// Focuses the grid, restoring the previously active cell or starting at the first one.
    ///
    /// A grid without enabled chips only records that it has focus; the first arrow key after
    /// chips are added activates the first cell.
    pub fn focus(&mut self) {
        self.has_focus = true;
        if self.keys.rows().is_empty() {
            return;
        }
        let current = self.keys.active_cell().cloned();
        match current {
            Some(cell) => self.keys.set_active_cell(cell),
            None => self.keys.set_first_cell_active(),
        }
    }

    /// Drops focus. The active cell is kept so [`ChipGrid::focus`] can return to it.
    pub fn blur(&mut self) {
        self.has_focus = false;
        self.scope.clear();
    }

    /// Follows focus that moved to a chip cell by other means, without focusing it again.
    pub fn on_chip_focused(&mut self, id: ChipId, kind: ChipCellKind) {
        let Some(chip) = self.chip(id) else {
            return;
        };
        if chip.is_disabled() {
            return;
        }
        let Some(cell) = chip.cell(kind).cloned() else {
            return;
        };
        self.has_focus = true;
        self.keys.update_active_cell(cell);
    }

    /// Follows focus that left a chip by other means. If that chip held focus the grid loses it;
    /// the active cell stays put so [`ChipGrid::focus`] returns to it.
    pub fn on_chip_blurred(&mut self, id: ChipId) {
        if self.scope.focused().is_some_and(|f| f.chip == id) {
            self.scope.clear();
            self.has_focus = false;
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> ChipGridAction {
        match event {
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::FocusLost => {
                self.blur();
                ChipGridAction::Redraw
            }
            InputEvent::FocusGained | InputEvent::Paste(_) => ChipGridAction::None,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.hit_areas.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        let disabled = if self.options.disabled_style == Style::default() {
            theme.text_muted
        } else {
            self.options.disabled_style
        };
        let styles = ChipStyles {
            base,
            focused: self.options.focused_style.patch(theme.accent),
            disabled,
            selected: base,
            remove: theme.danger,
        };

        buf.set_style(area, base);
        let widths: Vec<u16> = self.chips.iter().map(|c| c.display_width()).collect();
        let rects = render::flow_layout(
            area,
            &widths,
            self.options.gap,
            self.options.direction.is_rtl(),
        );
        for (chip, rect) in self.chips.iter().zip(rects) {
            render::render_chip(chip, rect, buf, &styles, &mut self.hit_areas);
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ChipGridAction {
        if self.keys.rows().is_empty() {
            return ChipGridAction::None;
        }
        let action = self.dispatch_key(key);
        if action != ChipGridAction::None {
            self.has_focus = true;
        }
        action
    }

    fn dispatch_key(&mut self, key: &KeyEvent) -> ChipGridAction {
        if keymap::any_matches(&self.bindings.first, key) {
            self.keys.set_first_cell_active();
            return ChipGridAction::Redraw;
        }
        if keymap::any_matches(&self.bindings.last, key) {
            self.keys.set_last_cell_active();
            return ChipGridAction::Redraw;
        }
        if keymap::any_matches(&self.bindings.remove, key) {
            return self.remove_active();
        }
        if keymap::any_matches(&self.bindings.activate, key) {
            let on_remove = self
                .keys
                .active_cell()
                .is_some_and(|c| c.kind() == ChipCellKind::Remove);
            if on_remove {
                return self.remove_active();
            }
            return ChipGridAction::None;
        }

        if self.keys.on_keydown(key).is_consumed() {
            ChipGridAction::Redraw
        } else {
            ChipGridAction::None
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> ChipGridAction {
        if m.kind != MouseEventKind::Down(MouseButton::Left) {
            return ChipGridAction::None;
        }
        let Some(cell) = render::hit_test(&self.hit_areas, m.x, m.y).cloned() else {
            return ChipGridAction::None;
        };
        if self.chip(cell.chip_id()).is_none_or(|c| c.is_disabled()) {
            return ChipGridAction::None;
        }

        if cell.kind() == ChipCellKind::Remove {
            if let Some(action) = self.remove_by_cell(&cell) {
                return action;
            }
        }

        cell.focus();
        self.on_chip_focused(cell.chip_id(), cell.kind());
        ChipGridAction::Redraw
    }

    fn remove_active(&mut self) -> ChipGridAction {
        let Some(cell) = self.keys.active_cell().cloned() else {
            return ChipGridAction::None;
        };
        self.remove_by_cell(&cell).unwrap_or(ChipGridAction::None)
    }

    fn remove_by_cell(&mut self, cell: &Rc<ChipCell>) -> Option<ChipGridAction> {
        let chip = self.chip(cell.chip_id())?;
        if !chip.is_removable() || chip.is_disabled() {
            return None;
        }
        let removed = self.remove_chip(cell.chip_id())?;
        Some(ChipGridAction::Removed {
            id: removed.id(),
            label: removed.label().to_string(),
        })
    }

    fn activate_after_removal(&mut self, row: isize, column: isize) {
        let rows = self.keys.rows().len() as isize;
        if rows == 0 {
            self.keys.update_active_cell(GridPosition::NONE);
            return;
        }
        let row = row.min(rows - 1);
        let cells = self.keys.rows()[row as usize].cells().len() as isize;
        let column = if column < cells { column } else { 0 };
        let target = GridPosition::new(row, column);
        if self.has_focus {
            self.keys.set_active_cell(target);
        } else {
            self.keys.update_active_cell(target);
        }
    }

    /// Hands the enabled chips to the key manager as its rows.
    fn sync_rows(&mut self) {
        let rows = self
            .chips
            .iter()
            .filter(|c| !c.is_disabled())
            .cloned()
            .collect();
        self.keys.on_rows_changed(rows);
    }
}

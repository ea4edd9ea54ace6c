use crate::chip::Chip;
use crate::chip::ChipConfig;
use crate::chip::ChipId;
use crate::chip::FocusScope;
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
use ratatui_chips_core::input::InputEvent;
use ratatui_chips_core::input::KeyCode;
use ratatui_chips_core::input::KeyEvent;
use ratatui_chips_core::input::MouseButton;
use ratatui_chips_core::input::MouseEventKind;
use ratatui_chips_core::keymap;
use ratatui_chips_core::list_key_manager::ListFocusKeyManager;
use ratatui_chips_core::list_key_manager::ListKeyManager;
use ratatui_chips_core::list_key_manager::ListKeyManagerOptions;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipListboxAction {
    None,
    Redraw,
    SelectionChanged,
}

#[derive(Clone, Debug)]
pub struct ChipListboxOptions {
    /// Allow more than one selected chip.
    pub multiple: bool,
    pub gap: u16,
    pub direction: Direction,
    pub style: Style,
    pub focused_style: Style,
    pub disabled_style: Style,
    pub selected_style: Style,
    pub toggle: Vec<KeyEvent>,
}

impl Default for ChipListboxOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            gap: 1,
            direction: Direction::Ltr,
            style: Style::default(),
            focused_style: Style::default().add_modifier(Modifier::REVERSED),
            disabled_style: Style::default(),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            toggle: vec![keymap::key_char(' '), keymap::key(KeyCode::Enter)],
        }
    }
}

/// A row of selectable chips (filters, single/multiple choice).
///
/// Arrow keys move between chips and wrap at both ends; disabled chips are skipped. Space/Enter
/// toggles the focused chip.
pub struct ChipListbox {
    options: ChipListboxOptions,
    scope: Rc<FocusScope>,
    chips: Vec<Rc<Chip>>,
    keys: ListFocusKeyManager<Chip>,
    hit_areas: Vec<HitArea>,
}

impl Default for ChipListbox {
    fn default() -> Self {
        Self::with_options(ChipListboxOptions::default())
    }
}

impl ChipListbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ChipListboxOptions) -> Self {
        let keys = ListFocusKeyManager::new(Vec::new(), key_options(options.direction));
        Self {
            options,
            scope: Rc::new(FocusScope::new()),
            chips: Vec::new(),
            keys,
            hit_areas: Vec::new(),
        }
    }

    pub fn options(&self) -> &ChipListboxOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ChipListboxOptions) {
        self.keys.set_options(key_options(options.direction));
        self.options = options;
    }

    pub fn key_manager(&self) -> &ListKeyManager<Chip> {
        &self.keys
    }

    pub fn chips(&self) -> &[Rc<Chip>] {
        &self.chips
    }

    pub fn chip(&self, id: ChipId) -> Option<&Rc<Chip>> {
        self.chips.iter().find(|c| c.id() == id)
    }

    pub fn add_chip(&mut self, label: impl Into<String>) -> ChipId {
        self.add_chip_with(label, ChipConfig::default())
    }

    pub fn add_chip_with(&mut self, label: impl Into<String>, config: ChipConfig) -> ChipId {
        let config = ChipConfig {
            removable: false,
            ..config
        };
        let chip = Rc::new(Chip::new(&self.scope, label, config));
        let id = chip.id();
        tracing::debug!(id = id.0, label = chip.label(), "chip added");
        if chip.is_selected() && !self.options.multiple {
            self.deselect_all();
        }
        self.chips.push(chip);
        self.keys.on_items_changed(self.chips.clone());
        id
    }

    /// Removes a chip. If it was the active chip, the nearest enabled chip at or after its
    /// position (or else before it) becomes active, and takes focus if the removed chip had it.
    pub fn remove_chip(&mut self, id: ChipId) -> Option<Rc<Chip>> {
        let index = self.chips.iter().position(|c| c.id() == id)?;
        let was_active = self.keys.active_item().is_some_and(|c| c.id() == id);

        let chip = self.chips.remove(index);
        let had_focus = chip.is_focused();
        if had_focus {
            self.scope.clear();
        }
        self.keys.on_items_changed(self.chips.clone());
        tracing::debug!(id = id.0, label = chip.label(), "chip removed");

        if was_active {
            self.activate_after_removal(index, had_focus);
        }
        Some(chip)
    }

    pub fn selected(&self) -> Vec<ChipId> {
        self.chips
            .iter()
            .filter(|c| c.is_selected())
            .map(|c| c.id())
            .collect()
    }

    /// Selects a chip, deselecting the others unless `multiple` is set. Disabled chips are left
    /// alone.
    pub fn select(&mut self, id: ChipId) -> bool {
        let Some(chip) = self.chip(id).cloned() else {
            return false;
        };
        if chip.is_disabled() || chip.is_selected() {
            return false;
        }
        if !self.options.multiple {
            self.deselect_all();
        }
        chip.set_selected(true);
        true
    }

    pub fn deselect_all(&mut self) {
        for c in &self.chips {
            c.set_selected(false);
        }
    }

    pub fn focus(&mut self) {
        let current = self.keys.active_item().cloned();
        match current {
            Some(chip) => self.keys.set_active_item(chip),
            None => self.keys.set_first_item_active(),
        }
    }

    pub fn blur(&mut self) {
        self.scope.clear();
    }

    pub fn has_focus(&self) -> bool {
        self.scope.focused().is_some()
    }

    pub fn focused_chip(&self) -> Option<ChipId> {
        self.scope.focused().map(|f| f.chip)
    }

    /// Follows focus that moved to a chip by other means, without focusing it again.
    pub fn on_chip_focused(&mut self, id: ChipId) {
        if let Some(chip) = self.chip(id).cloned() {
            self.keys.update_active_item(chip);
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> ChipListboxAction {
        match event {
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::Mouse(m) => {
                if m.kind != MouseEventKind::Down(MouseButton::Left) {
                    return ChipListboxAction::None;
                }
                let Some(cell) = render::hit_test(&self.hit_areas, m.x, m.y).cloned() else {
                    return ChipListboxAction::None;
                };
                cell.focus();
                self.on_chip_focused(cell.chip_id());
                self.toggle(cell.chip_id())
            }
            InputEvent::FocusLost => {
                self.blur();
                ChipListboxAction::Redraw
            }
            InputEvent::FocusGained | InputEvent::Paste(_) => ChipListboxAction::None,
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
            selected: base.patch(theme.selected).patch(self.options.selected_style),
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

    fn handle_key(&mut self, key: &KeyEvent) -> ChipListboxAction {
        if keymap::any_matches(&self.options.toggle, key) {
            let Some(id) = self.keys.active_item().map(|c| c.id()) else {
                return ChipListboxAction::None;
            };
            return self.toggle(id);
        }
        if self.keys.on_keydown(key).is_consumed() {
            ChipListboxAction::Redraw
        } else {
            ChipListboxAction::None
        }
    }

    fn activate_after_removal(&mut self, index: usize, focus: bool) {
        let target = (index..self.chips.len())
            .chain((0..index.min(self.chips.len())).rev())
            .find(|&i| !self.chips[i].is_disabled())
            .map_or(-1, |i| i as isize);
        if focus && target >= 0 {
            self.keys.set_active_item(target);
        } else {
            self.keys.update_active_item(target);
        }
    }

    fn toggle(&mut self, id: ChipId) -> ChipListboxAction {
        let Some(chip) = self.chip(id).cloned() else {
            return ChipListboxAction::None;
        };
        if chip.is_disabled() {
            return ChipListboxAction::Redraw;
        }
        if chip.is_selected() {
            chip.set_selected(false);
        } else {
            self.select(id);
        }
        ChipListboxAction::SelectionChanged
    }
}

fn key_options(direction: Direction) -> ListKeyManagerOptions {
    ListKeyManagerOptions {
        wrap: true,
        vertical: true,
        horizontal: Some(direction),
        home_and_end: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_chips_core::input::MouseEvent;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn listbox(options: ChipListboxOptions, labels: &[(&str, bool)]) -> ChipListbox {
        let mut lb = ChipListbox::with_options(options);
        for &(label, disabled) in labels {
            lb.add_chip_with(
                label,
                ChipConfig {
                    disabled,
                    ..Default::default()
                },
            );
        }
        lb
    }

    #[test]
    fn arrows_wrap_and_skip_disabled() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("a", false), ("b", true), ("c", false)],
        );
        lb.focus();
        assert_eq!(lb.focused_chip(), Some(ChipId(0)));

        lb.handle_event(key(KeyCode::Right));
        assert_eq!(lb.focused_chip(), Some(ChipId(2)));

        lb.handle_event(key(KeyCode::Right));
        assert_eq!(lb.focused_chip(), Some(ChipId(0)));

        lb.handle_event(key(KeyCode::End));
        assert_eq!(lb.focused_chip(), Some(ChipId(2)));
    }

    #[test]
    fn single_selection_replaces() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("a", false), ("b", false)],
        );
        lb.focus();
        assert_eq!(
            lb.handle_event(key(KeyCode::Char(' '))),
            ChipListboxAction::SelectionChanged
        );
        lb.handle_event(key(KeyCode::Right));
        lb.handle_event(key(KeyCode::Enter));
        assert_eq!(lb.selected(), vec![ChipId(1)]);

        lb.handle_event(key(KeyCode::Enter));
        assert!(lb.selected().is_empty());
    }

    #[test]
    fn multiple_selection_accumulates() {
        let mut lb = listbox(
            ChipListboxOptions {
                multiple: true,
                ..Default::default()
            },
            &[("a", false), ("b", false)],
        );
        assert!(lb.select(ChipId(0)));
        assert!(lb.select(ChipId(1)));
        assert!(!lb.select(ChipId(1)));
        assert_eq!(lb.selected(), vec![ChipId(0), ChipId(1)]);
    }

    #[test]
    fn rtl_left_moves_forward() {
        let mut lb = listbox(
            ChipListboxOptions {
                direction: Direction::Rtl,
                ..Default::default()
            },
            &[("a", false), ("b", false)],
        );
        lb.focus();
        lb.handle_event(key(KeyCode::Left));
        assert_eq!(lb.focused_chip(), Some(ChipId(1)));
    }

    #[test]
    fn click_focuses_and_toggles() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("one", false), ("two", false)],
        );
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        lb.render(area, &mut buf, &Theme::default());

        let action = lb.handle_event(InputEvent::Mouse(MouseEvent::left_down(7, 0)));
        assert_eq!(action, ChipListboxAction::SelectionChanged);
        assert_eq!(lb.focused_chip(), Some(ChipId(1)));
        assert_eq!(lb.key_manager().active_index(), 1);
        assert_eq!(lb.selected(), vec![ChipId(1)]);

        lb.render(area, &mut buf, &Theme::default());
        let text: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(text.trim_end(), "[one] [✓ two]");
    }

    #[test]
    fn removal_keeps_active_item() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("a", false), ("b", false), ("c", false)],
        );
        lb.focus();
        lb.handle_event(key(KeyCode::End));
        lb.remove_chip(ChipId(0));
        assert_eq!(lb.key_manager().active_index(), 1);
        assert_eq!(lb.focused_chip(), Some(ChipId(2)));
    }

    #[test]
    fn removing_active_chip_moves_focus_on() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("a", false), ("b", false), ("c", true)],
        );
        lb.focus();
        lb.handle_event(key(KeyCode::Right));
        assert_eq!(lb.focused_chip(), Some(ChipId(1)));

        lb.remove_chip(ChipId(1));
        assert_eq!(lb.key_manager().active_index(), 0);
        assert_eq!(lb.focused_chip(), Some(ChipId(0)));

        lb.remove_chip(ChipId(0));
        assert_eq!(lb.key_manager().active_index(), -1);
        assert_eq!(lb.focused_chip(), None);
        assert!(lb.key_manager().active_item().is_none());
    }

    #[test]
    fn removing_unfocused_active_chip_does_not_refocus() {
        let mut lb = listbox(
            ChipListboxOptions::default(),
            &[("a", false), ("b", false)],
        );
        lb.focus();
        lb.blur();
        lb.remove_chip(ChipId(0));
        assert_eq!(lb.key_manager().active_index(), 0);
        assert_eq!(
            lb.key_manager().active_item().map(|c| c.id()),
            Some(ChipId(1))
        );
        assert_eq!(lb.focused_chip(), None);
    }
}

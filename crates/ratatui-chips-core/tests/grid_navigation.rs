use ratatui_chips_core::direction::Direction;
use ratatui_chips_core::focus::Focusable;
use ratatui_chips_core::grid_key_manager::GridFocusKeyManager;
use ratatui_chips_core::grid_key_manager::GridKeyManager;
use ratatui_chips_core::grid_key_manager::GridPosition;
use ratatui_chips_core::grid_key_manager::GridRow;
use ratatui_chips_core::grid_key_manager::Row;
use ratatui_chips_core::input::KeyCode;
use ratatui_chips_core::input::KeyEvent;
use ratatui_chips_core::input::KeyModifiers;
use ratatui_chips_core::input::KeyResult;
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct Chip {
    name: &'static str,
    focus_calls: Cell<u32>,
}

impl Focusable for Chip {
    fn focus(&self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
    }
}

fn chip(name: &'static str) -> Rc<Chip> {
    Rc::new(Chip {
        name,
        focus_calls: Cell::new(0),
    })
}

fn rows(names: &[&[&'static str]]) -> Vec<Rc<Row<Chip>>> {
    names
        .iter()
        .map(|r| Rc::new(Row::new(r.iter().map(|&n| chip(n)).collect())))
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

fn pos(row: isize, column: isize) -> GridPosition {
    GridPosition::new(row, column)
}

fn active_name(m: &GridKeyManager<Row<Chip>>) -> Option<&'static str> {
    m.active_cell().map(|c| c.name)
}

fn record_changes(m: &mut GridKeyManager<Row<Chip>>) -> Rc<RefCell<Vec<GridPosition>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    m.subscribe(move |p| sink.borrow_mut().push(p));
    seen
}

#[test]
fn first_cell_is_top_left() {
    for shape in [
        &[&["a"][..]][..],
        &[&["a", "b", "c"][..], &["d", "e", "f"][..]][..],
    ] {
        let grid = rows(shape);
        let mut m = GridKeyManager::new(grid.clone());
        m.set_first_cell_active();
        assert!(Rc::ptr_eq(m.active_cell().unwrap(), &grid[0].cells()[0]));
    }
}

#[test]
fn last_cell_is_bottom_right() {
    let grid = rows(&[&["a", "b", "c"], &["d", "e", "f"]]);
    let mut m = GridKeyManager::new(grid.clone());
    m.set_last_cell_active();
    assert_eq!(m.active_position(), pos(1, 2));
    assert!(Rc::ptr_eq(m.active_cell().unwrap(), &grid[1].cells()[2]));
}

#[test]
fn setting_the_same_position_emits_once() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"], &["c", "d"]]));
    let seen = record_changes(&mut m);
    m.set_active_cell(pos(1, 0));
    m.set_active_cell(pos(1, 0));
    assert_eq!(*seen.borrow(), vec![pos(1, 0)]);
}

#[test]
fn update_never_emits() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"], &["c", "d"]]));
    let seen = record_changes(&mut m);
    m.update_active_cell(pos(1, 1));
    assert_eq!(m.active_position(), pos(1, 1));
    assert!(seen.borrow().is_empty());
}

#[test]
fn column_moves_wrap_to_adjacent_rows() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"], &["c", "d"]]));
    m.set_active_cell(pos(0, 1));
    m.set_next_column_active();
    assert_eq!(m.active_position(), pos(1, 0));

    m.set_previous_column_active();
    assert_eq!(m.active_position(), pos(0, 1));
}

#[test]
fn previous_row_at_top_is_rejected() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"], &["c", "d"]]));
    let seen = record_changes(&mut m);
    m.set_first_cell_active();
    m.set_previous_row_active();
    assert_eq!(m.active_position(), pos(0, 0));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn rtl_right_arrow_moves_backwards() {
    let mut m =
        GridKeyManager::new(rows(&[&["a", "b"], &["c", "d"]])).with_direction(Direction::Rtl);

    m.set_active_cell(pos(1, 0));
    assert_eq!(m.on_keydown(&key(KeyCode::Right)), KeyResult::Consumed);
    assert_eq!(m.active_position(), pos(0, 1));

    m.set_first_cell_active();
    assert_eq!(m.on_keydown(&key(KeyCode::Right)), KeyResult::Consumed);
    assert_eq!(m.active_position(), pos(0, 0));

    assert_eq!(m.on_keydown(&key(KeyCode::Left)), KeyResult::Consumed);
    assert_eq!(m.active_position(), pos(0, 1));
}

#[test]
fn unhandled_keys_are_ignored() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"]]));
    let seen = record_changes(&mut m);
    for code in [KeyCode::Home, KeyCode::Tab, KeyCode::Enter, KeyCode::Char('j')] {
        assert_eq!(m.on_keydown(&key(code)), KeyResult::Ignored);
    }
    assert_eq!(m.active_position(), GridPosition::NONE);
    assert!(seen.borrow().is_empty());
}

#[test]
fn modifiers_do_not_change_arrow_handling() {
    let mut m = GridKeyManager::new(rows(&[&["a", "b"]]));
    let shift_right = key(KeyCode::Right).with_modifiers(KeyModifiers::shift());
    assert_eq!(m.on_keydown(&shift_right), KeyResult::Consumed);
    assert_eq!(m.active_position(), pos(0, 0));
}

#[test]
fn focus_manager_focuses_on_set_but_not_on_update() {
    let grid = rows(&[&["a", "b"], &["c", "d"]]);
    let mut m = GridFocusKeyManager::new(grid.clone());

    m.set_active_cell(pos(0, 1));
    assert_eq!(grid[0].cells()[1].focus_calls.get(), 1);

    m.update_active_cell(pos(0, 1));
    assert_eq!(grid[0].cells()[1].focus_calls.get(), 1);

    m.on_keydown(&key(KeyCode::Down));
    assert_eq!(grid[1].cells()[1].focus_calls.get(), 1);
}

#[test]
fn resync_follows_active_row_by_identity() {
    let grid = rows(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
    let mut m = GridKeyManager::new(grid.clone());
    let seen = record_changes(&mut m);
    m.set_active_cell(pos(2, 1));
    seen.borrow_mut().clear();

    let remaining = vec![grid[1].clone(), grid[2].clone()];
    m.on_rows_changed(remaining);

    assert_eq!(m.active_row_index(), 1);
    assert_eq!(m.active_column_index(), 1);
    assert_eq!(active_name(&m), Some("f"));
    assert!(seen.borrow().is_empty());
}

#[test]
fn walkthrough_two_by_two() {
    let mut m = GridKeyManager::new(rows(&[&["A", "B"], &["C", "D"]]));

    m.set_first_cell_active();
    assert_eq!((m.active_position(), active_name(&m)), (pos(0, 0), Some("A")));

    m.on_keydown(&key(KeyCode::Down));
    assert_eq!((m.active_position(), active_name(&m)), (pos(1, 0), Some("C")));

    m.on_keydown(&key(KeyCode::Right));
    assert_eq!((m.active_position(), active_name(&m)), (pos(1, 1), Some("D")));

    m.on_keydown(&key(KeyCode::Right));
    assert_eq!((m.active_position(), active_name(&m)), (pos(1, 1), Some("D")));
}

#[test]
fn set_by_cell_reference() {
    let grid = rows(&[&["a", "b"], &["c", "d"]]);
    let mut m = GridKeyManager::new(grid.clone());
    m.set_active_cell(&grid[1].cells()[0]);
    assert_eq!(m.active_position(), pos(1, 0));
    assert_eq!(active_name(&m), Some("c"));
}

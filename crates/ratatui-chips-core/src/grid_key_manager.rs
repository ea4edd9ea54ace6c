//! Active-cell tracking for a 2D grid of focusable cells.
//!
//! [`GridKeyManager`] keeps a `(row, column)` cursor over rows of shared cells and moves it in
//! response to arrow keys or explicit calls. It never owns the cells: rows and cells are `Rc`
//! handles shared with the widget that renders them, and identity lookups use `Rc::ptr_eq`.
//!
//! Navigation never fails. Moving to a position that does not exist leaves the cursor where it
//! was, so key-repeat at the edge of the grid is harmless.
//!
//! Column movement wraps to the adjacent row (past the end of a row goes to the first cell of the
//! next row, before the start goes to the last cell of the previous row). Nothing wraps around
//! the whole grid, and row movement never wraps.

use crate::change::ChangeEmitter;
use crate::change::SubscriptionId;
use crate::direction::Direction;
use crate::focus::Focusable;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyResult;
use std::ops::Deref;
use std::ops::DerefMut;
use std::rc::Rc;

/// One row of a grid.
///
/// All rows of a grid are expected to have the same number of cells. This is not checked, but
/// column wrapping at row boundaries assumes it.
pub trait GridRow {
    type Cell;

    fn cells(&self) -> &[Rc<Self::Cell>];
}

/// A plain row of cells.
#[derive(Debug)]
pub struct Row<C> {
    cells: Vec<Rc<C>>,
}

impl<C> Row<C> {
    pub fn new(cells: Vec<Rc<C>>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C> GridRow for Row<C> {
    type Cell = C;

    fn cells(&self) -> &[Rc<C>] {
        &self.cells
    }
}

/// A `(row, column)` address. `-1` in either field means "no active cell".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub row: isize,
    pub column: isize,
}

impl GridPosition {
    pub const NONE: GridPosition = GridPosition {
        row: -1,
        column: -1,
    };

    pub fn new(row: isize, column: isize) -> Self {
        Self { row, column }
    }
}

/// Argument to [`GridKeyManager::set_active_cell`] and [`GridKeyManager::update_active_cell`].
pub enum ActiveCellRef<C> {
    Position(GridPosition),
    Cell(Rc<C>),
}

impl<C> From<GridPosition> for ActiveCellRef<C> {
    fn from(p: GridPosition) -> Self {
        ActiveCellRef::Position(p)
    }
}

impl<C> From<Rc<C>> for ActiveCellRef<C> {
    fn from(c: Rc<C>) -> Self {
        ActiveCellRef::Cell(c)
    }
}

impl<C> From<&Rc<C>> for ActiveCellRef<C> {
    fn from(c: &Rc<C>) -> Self {
        ActiveCellRef::Cell(c.clone())
    }
}

type ActivateHook<C> = Box<dyn FnMut(&Rc<C>)>;

pub struct GridKeyManager<R: GridRow> {
    rows: Vec<Rc<R>>,
    active_row_index: isize,
    active_column_index: isize,
    active_row: Option<Rc<R>>,
    active_cell: Option<Rc<R::Cell>>,
    direction: Direction,
    change: ChangeEmitter<GridPosition>,
    on_activate: Option<ActivateHook<R::Cell>>,
}

impl<R: GridRow> GridKeyManager<R> {
    pub fn new(rows: Vec<Rc<R>>) -> Self {
        Self {
            rows,
            active_row_index: -1,
            active_column_index: -1,
            active_row: None,
            active_cell: None,
            direction: Direction::Ltr,
            change: ChangeEmitter::new(),
            on_activate: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Installs a callback run by [`GridKeyManager::set_active_cell`] (and every navigation helper)
    /// whenever it leaves a cell active. [`GridKeyManager::update_active_cell`] never runs it.
    pub fn set_activate_hook(&mut self, hook: impl FnMut(&Rc<R::Cell>) + 'static) {
        self.on_activate = Some(Box::new(hook));
    }

    pub fn rows(&self) -> &[Rc<R>] {
        &self.rows
    }

    /// Replaces the row collection after the owner changed it.
    ///
    /// If a row is active and still present, the active row index follows it to its new position
    /// (found by identity). The column is untouched and no change event fires. If the active row
    /// is gone, the index is left as is until the next navigation call.
    pub fn on_rows_changed(&mut self, rows: Vec<Rc<R>>) {
        self.rows = rows;
        let Some(active_row) = self.active_row.as_ref() else {
            return;
        };
        if let Some(index) = self.rows.iter().position(|r| Rc::ptr_eq(r, active_row)) {
            let index = index as isize;
            if index != self.active_row_index {
                tracing::trace!(
                    from = self.active_row_index,
                    to = index,
                    "active row moved after rows changed"
                );
                self.active_row_index = index;
            }
        }
    }

    /// Subscribes to active-cell changes. Only [`GridKeyManager::set_active_cell`] and the
    /// navigation helpers emit, and only when the row or column index actually changed.
    pub fn subscribe(&mut self, f: impl FnMut(GridPosition) + 'static) -> SubscriptionId {
        self.change.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.change.unsubscribe(id)
    }

    pub fn active_row_index(&self) -> isize {
        self.active_row_index
    }

    pub fn active_column_index(&self) -> isize {
        self.active_column_index
    }

    pub fn active_position(&self) -> GridPosition {
        GridPosition::new(self.active_row_index, self.active_column_index)
    }

    pub fn active_row(&self) -> Option<&Rc<R>> {
        self.active_row.as_ref()
    }

    pub fn active_cell(&self) -> Option<&Rc<R::Cell>> {
        self.active_cell.as_ref()
    }

    /// Handles the arrow keys. Modifiers are ignored; any other key is left alone.
    pub fn on_keydown(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Down => self.set_next_row_active(),
            KeyCode::Up => self.set_previous_row_active(),
            KeyCode::Right => match self.direction {
                Direction::Ltr => self.set_next_column_active(),
                Direction::Rtl => self.set_previous_column_active(),
            },
            KeyCode::Left => match self.direction {
                Direction::Ltr => self.set_previous_column_active(),
                Direction::Rtl => self.set_next_column_active(),
            },
            _ => return KeyResult::Ignored,
        }
        KeyResult::Consumed
    }

    pub fn set_first_cell_active(&mut self) {
        self.set_active_cell(GridPosition::new(0, 0));
    }

    /// Does nothing when there are no rows.
    pub fn set_last_cell_active(&mut self) {
        let Some(last_row) = self.rows.last() else {
            return;
        };
        let row = self.rows.len() as isize - 1;
        let column = last_row.cells().len() as isize - 1;
        self.set_active_cell(GridPosition::new(row, column));
    }

    pub fn set_next_row_active(&mut self) {
        if self.active_row_index < 0 {
            self.set_first_cell_active();
        } else {
            self.set_active_cell_by_delta(1, 0);
        }
    }

    pub fn set_previous_row_active(&mut self) {
        self.set_active_cell_by_delta(-1, 0);
    }

    pub fn set_next_column_active(&mut self) {
        if self.active_row_index < 0 {
            self.set_first_cell_active();
        } else {
            self.set_active_cell_by_delta(0, 1);
        }
    }

    pub fn set_previous_column_active(&mut self) {
        self.set_active_cell_by_delta(0, -1);
    }

    /// Moves the cursor and notifies subscribers if the position changed, then runs the activate
    /// hook if a cell is active.
    pub fn set_active_cell(&mut self, cell: impl Into<ActiveCellRef<R::Cell>>) {
        let before = self.active_position();
        self.update_active_cell(cell);

        let after = self.active_position();
        if after != before {
            tracing::trace!(row = after.row, column = after.column, "active cell changed");
            self.change.emit(after);
        }

        if let (Some(hook), Some(cell)) = (self.on_activate.as_mut(), self.active_cell.as_ref()) {
            hook(cell);
        }
    }

    /// Moves the cursor without notifying subscribers or running the activate hook.
    ///
    /// Use this to follow focus that moved for some other reason (a mouse click, the app focusing
    /// a chip directly) without focusing the cell a second time.
    pub fn update_active_cell(&mut self, cell: impl Into<ActiveCellRef<R::Cell>>) {
        match cell.into() {
            ActiveCellRef::Position(p) => {
                self.active_row_index = p.row;
                self.active_column_index = p.column;
                self.active_row = self.row_at(p.row).cloned();
                self.active_cell = self
                    .active_row
                    .as_ref()
                    .and_then(|r| cell_at(r.cells(), p.column))
                    .cloned();
            }
            ActiveCellRef::Cell(target) => {
                for (row_index, row) in self.rows.iter().enumerate() {
                    let Some(column) = row.cells().iter().position(|c| Rc::ptr_eq(c, &target))
                    else {
                        continue;
                    };
                    self.active_row_index = row_index as isize;
                    self.active_column_index = column as isize;
                    self.active_row = Some(row.clone());
                    self.active_cell = Some(target);
                    return;
                }
            }
        }
    }

    fn set_active_cell_by_delta(&mut self, row_delta: isize, column_delta: isize) {
        let next_column = self.active_column_index + column_delta;
        let past_end = self
            .active_row
            .as_ref()
            .is_some_and(|r| next_column >= r.cells().len() as isize);

        let (row, column) = if past_end {
            (self.active_row_index + 1, 0)
        } else if next_column < 0 {
            let previous = self.active_row_index - 1;
            let Some(previous_row) = self.row_at(previous) else {
                return;
            };
            (previous, previous_row.cells().len() as isize - 1)
        } else {
            (self.active_row_index + row_delta, next_column)
        };

        self.set_active_cell_by_index(row, column);
    }

    fn set_active_cell_by_index(&mut self, row: isize, column: isize) {
        let exists = self
            .row_at(row)
            .is_some_and(|r| cell_at(r.cells(), column).is_some());
        if exists {
            self.set_active_cell(GridPosition::new(row, column));
        }
    }

    fn row_at(&self, index: isize) -> Option<&Rc<R>> {
        usize::try_from(index).ok().and_then(|i| self.rows.get(i))
    }
}

fn cell_at<C>(cells: &[Rc<C>], index: isize) -> Option<&Rc<C>> {
    usize::try_from(index).ok().and_then(|i| cells.get(i))
}

/// A [`GridKeyManager`] that focuses the active cell every time it is set.
///
/// Everything else is the plain manager, reached through `Deref`. Focus happens on
/// `set_active_cell` and the navigation helpers; `update_active_cell` stays silent.
pub struct GridFocusKeyManager<R: GridRow> {
    inner: GridKeyManager<R>,
}

impl<R> GridFocusKeyManager<R>
where
    R: GridRow + 'static,
    R::Cell: Focusable,
{
    pub fn new(rows: Vec<Rc<R>>) -> Self {
        let mut inner = GridKeyManager::new(rows);
        inner.set_activate_hook(|cell: &Rc<R::Cell>| cell.focus());
        Self { inner }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.inner.set_direction(direction);
        self
    }

    pub fn into_inner(self) -> GridKeyManager<R> {
        self.inner
    }
}

impl<R: GridRow> Deref for GridFocusKeyManager<R> {
    type Target = GridKeyManager<R>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<R: GridRow> DerefMut for GridFocusKeyManager<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

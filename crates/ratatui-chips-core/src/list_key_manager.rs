//! Active-item tracking for a flat list (one row of chips, a menu, a listbox).
//!
//! Same contract shape as [`crate::grid_key_manager`]: `set_active_item` notifies and runs the
//! activate hook, `update_active_item` does neither, and invalid moves are no-ops. Unlike the
//! grid, a list can wrap around both ends and skips items that report
//! [`Skippable::is_skipped`].

use crate::change::ChangeEmitter;
use crate::change::SubscriptionId;
use crate::direction::Direction;
use crate::focus::Focusable;
use crate::focus::Skippable;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyResult;
use std::ops::Deref;
use std::ops::DerefMut;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListKeyManagerOptions {
    /// Moving past either end continues from the other end.
    pub wrap: bool,
    /// Up/Down move to the previous/next item.
    pub vertical: bool,
    /// Left/Right move to the previous/next item, in the given direction. `None` ignores them.
    pub horizontal: Option<Direction>,
    /// Home/End jump to the first/last item.
    pub home_and_end: bool,
}

impl Default for ListKeyManagerOptions {
    fn default() -> Self {
        Self {
            wrap: false,
            vertical: true,
            horizontal: None,
            home_and_end: false,
        }
    }
}

/// Argument to [`ListKeyManager::set_active_item`] and [`ListKeyManager::update_active_item`].
pub enum ActiveItemRef<C> {
    Index(isize),
    Item(Rc<C>),
}

impl<C> From<isize> for ActiveItemRef<C> {
    fn from(i: isize) -> Self {
        ActiveItemRef::Index(i)
    }
}

impl<C> From<Rc<C>> for ActiveItemRef<C> {
    fn from(c: Rc<C>) -> Self {
        ActiveItemRef::Item(c)
    }
}

impl<C> From<&Rc<C>> for ActiveItemRef<C> {
    fn from(c: &Rc<C>) -> Self {
        ActiveItemRef::Item(c.clone())
    }
}

type ActivateHook<C> = Box<dyn FnMut(&Rc<C>)>;

pub struct ListKeyManager<C> {
    items: Vec<Rc<C>>,
    options: ListKeyManagerOptions,
    active_index: isize,
    active_item: Option<Rc<C>>,
    change: ChangeEmitter<isize>,
    on_activate: Option<ActivateHook<C>>,
}

impl<C: Skippable> ListKeyManager<C> {
    pub fn new(items: Vec<Rc<C>>) -> Self {
        Self::with_options(items, ListKeyManagerOptions::default())
    }

    pub fn with_options(items: Vec<Rc<C>>, options: ListKeyManagerOptions) -> Self {
        Self {
            items,
            options,
            active_index: -1,
            active_item: None,
            change: ChangeEmitter::new(),
            on_activate: None,
        }
    }

    pub fn options(&self) -> &ListKeyManagerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ListKeyManagerOptions) {
        self.options = options;
    }

    pub fn set_activate_hook(&mut self, hook: impl FnMut(&Rc<C>) + 'static) {
        self.on_activate = Some(Box::new(hook));
    }

    pub fn items(&self) -> &[Rc<C>] {
        &self.items
    }

    /// Replaces the items, keeping the active index pointed at the active item if it survived.
    pub fn on_items_changed(&mut self, items: Vec<Rc<C>>) {
        self.items = items;
        let Some(active) = self.active_item.as_ref() else {
            return;
        };
        if let Some(index) = self.items.iter().position(|i| Rc::ptr_eq(i, active)) {
            let index = index as isize;
            if index != self.active_index {
                tracing::trace!(from = self.active_index, to = index, "active item moved");
                self.active_index = index;
            }
        }
    }

    pub fn subscribe(&mut self, f: impl FnMut(isize) + 'static) -> SubscriptionId {
        self.change.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.change.unsubscribe(id)
    }

    pub fn active_index(&self) -> isize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&Rc<C>> {
        self.active_item.as_ref()
    }

    pub fn on_keydown(&mut self, key: &KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Down if self.options.vertical => self.set_next_item_active(),
            KeyCode::Up if self.options.vertical => self.set_previous_item_active(),
            KeyCode::Right => match self.options.horizontal {
                Some(Direction::Ltr) => self.set_next_item_active(),
                Some(Direction::Rtl) => self.set_previous_item_active(),
                None => return KeyResult::Ignored,
            },
            KeyCode::Left => match self.options.horizontal {
                Some(Direction::Ltr) => self.set_previous_item_active(),
                Some(Direction::Rtl) => self.set_next_item_active(),
                None => return KeyResult::Ignored,
            },
            KeyCode::Home if self.options.home_and_end => self.set_first_item_active(),
            KeyCode::End if self.options.home_and_end => self.set_last_item_active(),
            _ => return KeyResult::Ignored,
        }
        KeyResult::Consumed
    }

    pub fn set_first_item_active(&mut self) {
        self.set_active_item_by_index(0, 1);
    }

    pub fn set_last_item_active(&mut self) {
        self.set_active_item_by_index(self.items.len() as isize - 1, -1);
    }

    pub fn set_next_item_active(&mut self) {
        if self.active_index < 0 {
            self.set_first_item_active();
        } else {
            self.set_active_item_by_delta(1);
        }
    }

    pub fn set_previous_item_active(&mut self) {
        if self.active_index < 0 && self.options.wrap {
            self.set_last_item_active();
        } else {
            self.set_active_item_by_delta(-1);
        }
    }

    pub fn set_active_item(&mut self, item: impl Into<ActiveItemRef<C>>) {
        let before = self.active_item.clone();
        self.update_active_item(item);

        let changed = match (&before, &self.active_item) {
            (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        if changed {
            tracing::trace!(index = self.active_index, "active item changed");
            self.change.emit(self.active_index);
        }

        if let (Some(hook), Some(item)) = (self.on_activate.as_mut(), self.active_item.as_ref()) {
            hook(item);
        }
    }

    /// An item that is not in the list resolves to index `-1`, clearing the active item.
    pub fn update_active_item(&mut self, item: impl Into<ActiveItemRef<C>>) {
        let index = match item.into() {
            ActiveItemRef::Index(i) => i,
            ActiveItemRef::Item(target) => self
                .items
                .iter()
                .position(|i| Rc::ptr_eq(i, &target))
                .map_or(-1, |i| i as isize),
        };
        self.active_index = index;
        self.active_item = self.item_at(index).cloned();
    }

    fn set_active_item_by_delta(&mut self, delta: isize) {
        if self.options.wrap {
            self.set_active_in_wrap_mode(delta);
        } else {
            self.set_active_item_by_index(self.active_index + delta, delta);
        }
    }

    fn set_active_in_wrap_mode(&mut self, delta: isize) {
        let len = self.items.len() as isize;
        for step in 1..=len {
            let index = (self.active_index + delta * step).rem_euclid(len);
            if !self.items[index as usize].is_skipped() {
                self.set_active_item(index);
                return;
            }
        }
    }

    fn set_active_item_by_index(&mut self, mut index: isize, fallback_delta: isize) {
        loop {
            let Some(item) = self.item_at(index) else {
                return;
            };
            if !item.is_skipped() {
                break;
            }
            index += fallback_delta;
        }
        self.set_active_item(index);
    }

    fn item_at(&self, index: isize) -> Option<&Rc<C>> {
        usize::try_from(index).ok().and_then(|i| self.items.get(i))
    }
}

/// A [`ListKeyManager`] that focuses the active item every time it is set.
pub struct ListFocusKeyManager<C> {
    inner: ListKeyManager<C>,
}

impl<C: Skippable + Focusable + 'static> ListFocusKeyManager<C> {
    pub fn new(items: Vec<Rc<C>>, options: ListKeyManagerOptions) -> Self {
        let mut inner = ListKeyManager::with_options(items, options);
        inner.set_activate_hook(|item: &Rc<C>| item.focus());
        Self { inner }
    }

    pub fn into_inner(self) -> ListKeyManager<C> {
        self.inner
    }
}

impl<C> Deref for ListFocusKeyManager<C> {
    type Target = ListKeyManager<C>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<C> DerefMut for ListFocusKeyManager<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Handle returned by [`ChangeEmitter::subscribe`]; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A synchronous, single-threaded notification stream.
///
/// Subscribers run in subscription order, on the caller's stack, before `emit` returns. They stay
/// registered until [`ChangeEmitter::unsubscribe`] is called; nothing is torn down implicitly.
pub struct ChangeEmitter<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(E)>)>,
}

impl<E> Default for ChangeEmitter<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E: Copy> ChangeEmitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: E) {
        for (_, f) in self.subscribers.iter_mut() {
            f(event);
        }
    }
}

impl<E> std::fmt::Debug for ChangeEmitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_order_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut em = ChangeEmitter::<u32>::new();

        let a = {
            let seen = seen.clone();
            em.subscribe(move |v| seen.borrow_mut().push(("a", v)))
        };
        {
            let seen = seen.clone();
            em.subscribe(move |v| seen.borrow_mut().push(("b", v)));
        }

        em.emit(1);
        assert!(em.unsubscribe(a));
        assert!(!em.unsubscribe(a));
        em.emit(2);

        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("b", 2)]);
    }
}

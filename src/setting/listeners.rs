/// Listener registry for setting change notifications
///
/// Callbacks are stored behind `Rc` so a notification pass can work on a
/// snapshot of the list while listeners subscribe or unsubscribe.
use std::fmt;
use std::rc::Rc;

/// Identifies one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type Listener<T> = Rc<dyn Fn(&T)>;

pub struct ListenerRegistry<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<T>)>,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        ListenerRegistry {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns false if the id was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the current listeners in registration order
    pub fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_ids_are_unique_after_removal() {
        let mut registry: ListenerRegistry<i32> = ListenerRegistry::new();
        let a = registry.add(Rc::new(|_| {}));
        registry.remove(a);
        let b = registry.add(Rc::new(|_| {}));
        assert_ne!(a, b);
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut registry: ListenerRegistry<i32> = ListenerRegistry::new();
        let id = registry.add(Rc::new(|_| {}));
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut registry: ListenerRegistry<i32> = ListenerRegistry::new();
        for tag in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            registry.add(Rc::new(move |v| calls.borrow_mut().push(format!("{}:{}", tag, v))));
        }

        for listener in registry.snapshot() {
            listener(&7);
        }

        assert_eq!(*calls.borrow(), vec!["first:7", "second:7", "third:7"]);
    }
}

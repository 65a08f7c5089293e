/// Handle returned by [`Listeners::subscribe`], used to deregister.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered listener registry.
///
/// Listeners are invoked in registration order. Ids are never reused, so a
/// stale handle cannot remove a newer listener.
pub struct Listeners<L: ?Sized> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<L>)>,
}

impl<L: ?Sized> Default for Listeners<L> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<L: ?Sized> std::fmt::Debug for Listeners<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<L: ?Sized> Listeners<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit every listener in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut L)) {
        for (_, listener) in &mut self.entries {
            f(listener);
        }
    }

    /// Move listeners registered on `other` (e.g. while `self` was detached
    /// for dispatch) to the end of `self`, keeping their order.
    pub fn append(&mut self, other: &mut Listeners<L>) {
        self.next_id = self.next_id.max(other.next_id);
        self.entries.append(&mut other.entries);
    }
}

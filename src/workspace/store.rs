/// Handle returned by [`Store::subscribe`].
pub type SubscriptionId = usize;

type Listener<S> = Box<dyn Fn(&S)>;

/// Single-owner state cell with synchronous change notification.
///
/// State is only ever replaced as a whole. Listeners run in subscription
/// order right after each replacement, on the caller's stack.
pub struct Store<S> {
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: SubscriptionId,
}

impl<S> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get_state(&self) -> &S {
        &self.state
    }

    /// Replace the state and notify every listener.
    pub fn set_state(&mut self, next: S) {
        self.state = next;
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&S) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

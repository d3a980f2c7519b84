use crate::color::{ColorState, Hsl};

/// Derived colors published to anything drawing themed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Hsl,
    pub text: Hsl,
    pub text_hover: Hsl,
}

impl Theme {
    pub fn derive(state: ColorState) -> Self {
        Self {
            background: state.background(),
            text: state.text(),
            text_hover: state.text_hover(),
        }
    }
}

type Subscriber = Box<dyn FnMut(ColorState, &Theme)>;

/// Single owner of the picked color and its derived theme.
///
/// Replaces ambient document-level writes with an explicit contract:
/// interested parties subscribe, the gesture path calls [`update`], and
/// each subscriber observes the initial state once plus every actual
/// change afterwards. The store is owned by the event loop and never
/// shared across threads.
///
/// [`update`]: ThemeStore::update
pub struct ThemeStore {
    state: ColorState,
    theme: Theme,
    subscribers: Vec<Subscriber>,
}

impl ThemeStore {
    pub fn new(initial: ColorState) -> Self {
        Self {
            state: initial,
            theme: Theme::derive(initial),
            subscribers: Vec::new(),
        }
    }

    pub fn color(&self) -> ColorState {
        self.state
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Registers a subscriber and immediately feeds it the current state
    /// so late registrants never render stale colors.
    pub fn subscribe(&mut self, mut subscriber: impl FnMut(ColorState, &Theme) + 'static) {
        subscriber(self.state, &self.theme);
        self.subscribers.push(Box::new(subscriber));
    }

    /// Replaces the state, notifying subscribers only when it actually
    /// changed. Returns whether a notification happened.
    pub fn update(&mut self, next: ColorState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        self.theme = Theme::derive(next);
        for subscriber in &mut self.subscribers {
            subscriber(self.state, &self.theme);
        }
        true
    }
}

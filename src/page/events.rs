use std::collections::HashMap;

/// Position of a card as rendered: container, displayed index and the store
/// generation the index was handed out under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRef {
    pub container: String,
    pub index: usize,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Card(CardRef),
    Element(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    pub fn parse(value: &str) -> Self {
        match value {
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Input { id: String, value: String },
    Click { target: Target },
    KeyDown { key: Key, target: Option<Target> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Click,
    KeyDown,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Input { .. } => EventKind::Input,
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub handled: bool,
    pub default_prevented: bool,
}

impl Dispatch {
    pub const IGNORED: Dispatch = Dispatch {
        handled: false,
        default_prevented: false,
    };

    pub const HANDLED: Dispatch = Dispatch {
        handled: true,
        default_prevented: false,
    };
}

pub type Handler<S> = fn(&mut S, &Event) -> Dispatch;

/// Event kind to handler, filled once at startup.
pub struct EventTable<S> {
    handlers: HashMap<EventKind, Handler<S>>,
}

impl<S> Default for EventTable<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<S> EventTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, kind: EventKind, handler: Handler<S>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handler(&self, kind: EventKind) -> Option<Handler<S>> {
        self.handlers.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

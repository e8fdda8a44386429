//! Movement intents and the sources that produce them.
//!
//! The frame loop polls exactly once per frame; a source with nothing to
//! report returns `None` and never blocks.

mod scancode;

pub use scancode::{Key, ScancodeDecoder, ScancodeInput};

/// One discrete action, applied once per frame at most.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    MoveForward,
    MoveBackward,
    TurnLeft,
    TurnRight,
    StrafeLeft,
    StrafeRight,
}

pub trait InputSource {
    /// Next pending event, or `None` if nothing arrived since the last poll.
    fn poll(&mut self) -> Option<InputEvent>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn poll(&mut self) -> Option<InputEvent> {
        (**self).poll()
    }
}

/// Replays a fixed script, one entry per poll. `None` entries are idle
/// frames; an exhausted script stays idle.
#[derive(Clone, Debug)]
pub struct Scripted<I> {
    events: I,
}

impl<I: Iterator<Item = Option<InputEvent>>> Scripted<I> {
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Option<InputEvent>>> InputSource for Scripted<I> {
    fn poll(&mut self) -> Option<InputEvent> {
        self.events.next().flatten()
    }
}

use std::convert::Infallible;

use crate::{
    input::{InputEvent, InputSource},
    renderer::{Display, Pixel},
};

/// A host with no screen: scanout only counts frames, input comes from the
/// wrapped source. Used for replays and tests.
#[derive(Clone, Debug)]
pub struct Headless<I> {
    input: I,
    shown: u64,
}

impl<I: InputSource> Headless<I> {
    pub fn new(input: I) -> Self {
        Self { input, shown: 0 }
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl<I> Display for Headless<I> {
    type Error = Infallible;

    fn scanout(&mut self, _front: &[Pixel], _stride: usize, _height: usize) -> Result<(), Infallible> {
        self.shown += 1;
        Ok(())
    }
}

impl<I: InputSource> InputSource for Headless<I> {
    fn poll(&mut self) -> Option<InputEvent> {
        self.input.poll()
    }
}

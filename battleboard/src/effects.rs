// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Presentation effects bound to tile transitions.
//!
//! The engine never depends on what an [`EffectSink`] does with a notification. Sinks
//! are called after a transition has been committed, and any error they return is
//! logged and dropped.

use std::fmt;

use thiserror::Error;

/// Opaque handle identifying the presentation resource bound to a tile, such as a
/// sound loop or a light.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Trigger(usize);

impl Trigger {
    /// Construct a trigger from its raw value.
    pub fn new(raw: usize) -> Self {
        Trigger(raw)
    }

    /// The raw value of this trigger.
    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "trigger {}", self.0)
    }
}

/// Notification emitted when a tile with a bound trigger changes state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Effect {
    /// The tile became a deck.
    DeckStart,
    /// The tile went back to sea.
    DeckStop,
    /// A deck on the tile was hit.
    HitIntensify,
}

/// Error reported by an [`EffectSink`]. The engine only logs it.
#[derive(Debug, Error)]
#[error("effect sink failed: {0}")]
pub struct EffectError(String);

impl EffectError {
    /// Construct an effect error with the given message.
    pub fn new<M: Into<String>>(message: M) -> Self {
        EffectError(message.into())
    }

    /// The message describing the failure.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Receiver of presentation effects.
pub trait EffectSink {
    /// A deck was placed on the tile bound to `trigger`.
    fn deck_start(&mut self, trigger: Trigger) -> Result<(), EffectError>;

    /// The tile bound to `trigger` went back to sea.
    fn deck_stop(&mut self, trigger: Trigger) -> Result<(), EffectError>;

    /// The deck on the tile bound to `trigger` was hit.
    fn hit_intensify(&mut self, trigger: Trigger) -> Result<(), EffectError>;

    /// Dispatch an [`Effect`] to the matching method.
    fn dispatch(&mut self, effect: Effect, trigger: Trigger) -> Result<(), EffectError> {
        match effect {
            Effect::DeckStart => self.deck_start(trigger),
            Effect::DeckStop => self.deck_stop(trigger),
            Effect::HitIntensify => self.hit_intensify(trigger),
        }
    }
}

impl<S: EffectSink + ?Sized> EffectSink for Box<S> {
    fn deck_start(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        (**self).deck_start(trigger)
    }

    fn deck_stop(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        (**self).deck_stop(trigger)
    }

    fn hit_intensify(&mut self, trigger: Trigger) -> Result<(), EffectError> {
        (**self).hit_intensify(trigger)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    /// Sink that records every effect it receives, optionally failing each call.
    #[derive(Clone, Default)]
    pub(crate) struct Recorder {
        pub(crate) log: Rc<RefCell<Vec<(Effect, Trigger)>>>,
        pub(crate) fail: bool,
    }

    impl Recorder {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub(crate) fn take(&self) -> Vec<(Effect, Trigger)> {
            self.log.borrow_mut().drain(..).collect()
        }

        fn record(&mut self, effect: Effect, trigger: Trigger) -> Result<(), EffectError> {
            self.log.borrow_mut().push((effect, trigger));
            if self.fail {
                Err(EffectError::new("device unplugged"))
            } else {
                Ok(())
            }
        }
    }

    impl EffectSink for Recorder {
        fn deck_start(&mut self, trigger: Trigger) -> Result<(), EffectError> {
            self.record(Effect::DeckStart, trigger)
        }

        fn deck_stop(&mut self, trigger: Trigger) -> Result<(), EffectError> {
            self.record(Effect::DeckStop, trigger)
        }

        fn hit_intensify(&mut self, trigger: Trigger) -> Result<(), EffectError> {
            self.record(Effect::HitIntensify, trigger)
        }
    }

    #[test]
    fn dispatch_routes_to_matching_method() {
        let mut sink = Recorder::default();
        sink.dispatch(Effect::HitIntensify, Trigger::new(3)).unwrap();
        sink.dispatch(Effect::DeckStart, Trigger::new(4)).unwrap();
        assert_eq!(
            sink.take(),
            vec![
                (Effect::HitIntensify, Trigger::new(3)),
                (Effect::DeckStart, Trigger::new(4)),
            ]
        );
    }

    #[test]
    fn boxed_sink_forwards() {
        let recorder = Recorder::failing();
        let mut boxed: Box<dyn EffectSink> = Box::new(recorder.clone());
        let err = boxed.deck_stop(Trigger::new(1)).unwrap_err();
        assert_eq!(err.message(), "device unplugged");
        assert_eq!(recorder.take(), vec![(Effect::DeckStop, Trigger::new(1))]);
    }
}

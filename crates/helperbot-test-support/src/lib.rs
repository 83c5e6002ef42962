//! Shared test mocks and utilities for the Helperbot chat bot.

mod lookup;
mod reply;
mod rng;
mod store;

pub use lookup::{FailingLookup, StubAnswerSource, StubEarthquakeSource, StubWeatherSource};
pub use reply::{FailingReplySender, RecordingReplySender, SentReply};
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingConversationStore, RecordingConversationStore};

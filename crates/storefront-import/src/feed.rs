//! Incremental decoding of the product feed.
//!
//! The feed is one large JSON array. It is walked element by element through a
//! serde [`SeqAccess`] so only the current record is held in memory.

use std::fmt;
use std::io::Read;

use serde::de::{self, Deserializer as _, IgnoredAny, SeqAccess, Visitor};
use storefront_core::RawProduct;

/// Returned by a feed sink when it no longer accepts records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Result of walking a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Records handed to the sink.
    pub delivered: usize,
    /// `true` when the feed held more than `cap` records.
    pub truncated: bool,
}

/// Decodes a JSON array of [`RawProduct`] from `reader`, handing each record to
/// `sink` until `cap` records have been delivered.
///
/// Once the cap is reached the rest of the feed is not read.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the input is not a JSON array, an element
/// does not decode as a product, the underlying reader fails, or the sink
/// reports [`SinkClosed`].
pub fn decode_feed<R, F>(
    reader: R,
    cap: usize,
    mut sink: F,
) -> Result<FeedOutcome, serde_json::Error>
where
    R: Read,
    F: FnMut(RawProduct) -> Result<(), SinkClosed>,
{
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let mut outcome = FeedOutcome::default();

    let result = (&mut deserializer).deserialize_seq(FeedVisitor {
        cap,
        sink: &mut sink,
        outcome: &mut outcome,
    });

    match result {
        Ok(()) => {
            deserializer.end()?;
            Ok(outcome)
        }
        // Leaving the array early makes serde_json report the unread tail.
        Err(_) if outcome.truncated => Ok(outcome),
        Err(e) => Err(e),
    }
}

struct FeedVisitor<'a, F> {
    cap: usize,
    sink: &'a mut F,
    outcome: &'a mut FeedOutcome,
}

impl<'de, F> Visitor<'de> for FeedVisitor<'_, F>
where
    F: FnMut(RawProduct) -> Result<(), SinkClosed>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of products")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while self.outcome.delivered < self.cap {
            let Some(raw) = seq.next_element::<RawProduct>()? else {
                return Ok(());
            };
            (self.sink)(raw).map_err(|SinkClosed| {
                <A::Error as de::Error>::custom("catalog writer stopped accepting products")
            })?;
            self.outcome.delivered += 1;
        }

        if seq.next_element::<IgnoredAny>()?.is_some() {
            self.outcome.truncated = true;
        }
        Ok(())
    }
}

//! Parser for the world happenings feed.
//!
//! The feed is a short, newest-first batch of events:
//!
//! ```text
//! <WORLD>
//!   <HAPPENINGS>
//!     <EVENT id="1">
//!       <TIMESTAMP>1710043200</TIMESTAMP>
//!       <TEXT><![CDATA[@@testlandia@@ was ranked in the Top 5% ...]]></TEXT>
//!     </EVENT>
//!   </HAPPENINGS>
//! </WORLD>
//! ```
//!
//! An event reveals update progress when its text mentions a change in
//! influence or a new ranking, both of which the world only hands out while
//! the actor's region is updating. The actor is the nation named between the
//! first pair of `@@` delimiters.

use serde::Deserialize;

use crate::error::FeedError;

/// Text markers that only appear in events generated during an update.
pub const QUALIFYING_MARKERS: [&str; 2] = ["influence", "ranked"];

const ACTOR_DELIMITER: &str = "@@";

/// An event that reveals when its actor's region updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingEvent {
    /// Unix timestamp of the event.
    pub timestamp: i64,
    /// API identifier of the nation the event is about.
    pub actor: String,
    /// Which marker matched.
    pub marker: &'static str,
}

/// One feed record after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEntry {
    /// The event carries a marker and names an actor.
    Qualifying(QualifyingEvent),
    /// A well-formed event that says nothing about update progress.
    MarkerAbsent,
    /// The record could not be interpreted.
    Malformed {
        /// What was wrong with the record.
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct WorldDoc {
    #[serde(rename = "HAPPENINGS")]
    happenings: HappeningsDoc,
}

#[derive(Debug, Deserialize)]
struct HappeningsDoc {
    #[serde(rename = "EVENT", default)]
    events: Vec<EventDoc>,
}

#[derive(Debug, Deserialize)]
struct EventDoc {
    #[serde(rename = "TIMESTAMP")]
    timestamp: Option<String>,
    #[serde(rename = "TEXT")]
    text: Option<String>,
}

/// Parse a happenings document into classified entries, in feed order.
///
/// # Errors
///
/// Returns [`FeedError::Data`] if the document itself is not a happenings
/// feed. Individual bad records do not fail the batch; they come back as
/// [`FeedEntry::Malformed`].
pub fn parse_happenings(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let doc: WorldDoc = quick_xml::de::from_str(xml)?;
    Ok(doc.happenings.events.iter().map(classify).collect())
}

fn classify(event: &EventDoc) -> FeedEntry {
    let Some(text) = event.text.as_deref() else {
        return malformed("event has no TEXT");
    };
    let Some(raw_timestamp) = event.timestamp.as_deref() else {
        return malformed("event has no TIMESTAMP");
    };
    let timestamp = match raw_timestamp.trim().parse::<i64>() {
        Ok(ts) => ts,
        Err(e) => return malformed(format!("bad TIMESTAMP {raw_timestamp:?}: {e}")),
    };
    classify_text(timestamp, text)
}

/// Classify one event's text.
pub fn classify_text(timestamp: i64, text: &str) -> FeedEntry {
    let Some(marker) = QUALIFYING_MARKERS.into_iter().find(|m| text.contains(m)) else {
        return FeedEntry::MarkerAbsent;
    };
    match extract_actor(text) {
        Some(actor) => FeedEntry::Qualifying(QualifyingEvent {
            timestamp,
            actor: actor.to_owned(),
            marker,
        }),
        None => malformed(format!("no @@-delimited actor in {text:?}")),
    }
}

/// The text between the first two `@@` delimiters, if non-empty.
fn extract_actor(text: &str) -> Option<&str> {
    let (_, rest) = text.split_once(ACTOR_DELIMITER)?;
    let (actor, _) = rest.split_once(ACTOR_DELIMITER)?;
    let actor = actor.trim();
    (!actor.is_empty()).then_some(actor)
}

fn malformed(reason: impl Into<String>) -> FeedEntry {
    FeedEntry::Malformed {
        reason: reason.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FEED: &str = r#"<WORLD>
<HAPPENINGS>
<EVENT id="3"><TIMESTAMP>1710043300</TIMESTAMP><TEXT><![CDATA[@@alpha@@ changed its national motto to "Ranked".]]></TEXT></EVENT>
<EVENT id="2"><TIMESTAMP>1710043250</TIMESTAMP><TEXT><![CDATA[@@beta_land@@ was ranked in the Top 5% of the world for Most Cheerful Citizens.]]></TEXT></EVENT>
<EVENT id="1"><TIMESTAMP>1710043200</TIMESTAMP><TEXT><![CDATA[@@gamma@@'s influence in %%the_pacific%% rose from "Zero" to "Unproven".]]></TEXT></EVENT>
</HAPPENINGS>
</WORLD>"#;

    #[test]
    fn classifies_feed_in_order() {
        let entries = parse_happenings(FEED).unwrap();
        assert_eq!(
            entries,
            vec![
                FeedEntry::MarkerAbsent,
                FeedEntry::Qualifying(QualifyingEvent {
                    timestamp: 1_710_043_250,
                    actor: "beta_land".to_owned(),
                    marker: "ranked",
                }),
                FeedEntry::Qualifying(QualifyingEvent {
                    timestamp: 1_710_043_200,
                    actor: "gamma".to_owned(),
                    marker: "influence",
                }),
            ]
        );
    }

    #[test]
    fn empty_batch() {
        let entries = parse_happenings("<WORLD><HAPPENINGS></HAPPENINGS></WORLD>").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn non_feed_document_is_data_error() {
        let err = parse_happenings("<NATION><REGION>x</REGION></NATION>").unwrap_err();
        assert!(matches!(err, FeedError::Data { .. }));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let xml = "<WORLD><HAPPENINGS><EVENT><TIMESTAMP>soon</TIMESTAMP>\
                   <TEXT>@@a@@ was ranked</TEXT></EVENT></HAPPENINGS></WORLD>";
        let entries = parse_happenings(xml).unwrap();
        assert!(matches!(entries.as_slice(), [FeedEntry::Malformed { .. }]));
    }

    #[test]
    fn marker_without_actor_is_malformed() {
        assert!(matches!(
            classify_text(1, "someone was ranked somewhere"),
            FeedEntry::Malformed { .. }
        ));
        assert!(matches!(
            classify_text(1, "@@@@ was ranked"),
            FeedEntry::Malformed { .. }
        ));
    }

    #[test]
    fn actor_is_first_delimited_span() {
        let entry = classify_text(7, "@@first@@ endorsed @@second@@, gaining influence");
        assert_eq!(
            entry,
            FeedEntry::Qualifying(QualifyingEvent {
                timestamp: 7,
                actor: "first".to_owned(),
                marker: "influence",
            })
        );
    }
}

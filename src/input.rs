//! Input parsing for serialized crawl outcomes

use serde::Deserialize;

use crate::document::RawCrawlOutcome;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<RawCrawlOutcome>),
    One(Box<RawCrawlOutcome>),
}

/// Parse a JSON document holding one crawl outcome or an array of them.
///
/// # Errors
///
/// Returns the serde error when the input is not a crawl outcome object
/// or an array of them.
pub fn parse_outcomes(json: &str) -> Result<Vec<RawCrawlOutcome>, serde_json::Error> {
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(outcomes) => outcomes,
        OneOrMany::One(outcome) => vec![*outcome],
    })
}

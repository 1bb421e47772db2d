//! Pagination cursor tokens.
//!
//! A cursor is the canonical serialization of a notification's creation
//! timestamp: RFC 3339 in UTC with a fixed six-digit fraction
//! (`2026-08-22T10:15:30.123456Z`). The fixed width keeps tokens lexically
//! sortable, and the microsecond precision matches what stores persist, so
//! a token parses back to exactly the timestamp it was built from. Callers
//! must treat tokens as opaque and only replay a previously returned
//! `endCursor`; the token is an exclusive upper time-bound for the next
//! page.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::{ErrorKind, FeedError};
use crate::result::FeedResult;

/// Encode a creation timestamp as a cursor token.
pub fn encode(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a cursor token back into a timestamp.
///
/// Fails with a validation error when the token does not parse back to a
/// timestamp.
pub fn decode(token: &str) -> FeedResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(token)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            FeedError::with_source(
                ErrorKind::Validation,
                format!("Malformed cursor: '{token}'"),
                e,
            )
        })
}

/// Truncate a timestamp to the microsecond precision cursors carry.
pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

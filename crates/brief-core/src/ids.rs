//! Insight id generation

use rand::distr::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 9;

/// Generate a new opaque insight id
///
/// Format is `<epoch millis>-<9 lower-case alphanumerics>`. Ids only need to
/// be unique within a single process run.
pub fn new_insight_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}", millis, suffix)
}

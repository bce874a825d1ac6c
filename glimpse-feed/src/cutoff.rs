//! Parsing of cutoff parameters and upstream IDs.

/// Parse a decimal `i64`, falling back to `default` with a warning.
pub fn parse_or_default(value: &str, default: i64) -> i64 {
    match value.parse::<i64>() {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(value, default, error = %err, "invalid integer, using default");
            default
        }
    }
}

/// Numeric story ID from a composite `<storyId>_<userId>` identifier.
///
/// Everything before the first underscore is parsed; an ID without a
/// separator is parsed whole.
pub fn story_numeric_id(composite: &str) -> i64 {
    let prefix = composite
        .split_once('_')
        .map_or(composite, |(prefix, _)| prefix);
    parse_or_default(prefix, 0)
}

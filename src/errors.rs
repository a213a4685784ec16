/// Represents errors that can occur while parsing and evaluating cron expressions.
///
/// `CronError` is used throughout the `cronline` crate and is exported for consuming
/// programs to use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CronError {
    /// The expression could not be parsed.
    ///
    /// Raised at construction time when the text does not decompose into five valid
    /// fields after macro expansion, or when a field token violates its grammar or
    /// range. The message names the offending field or token, such as
    /// "minute: 60 is out of range (0-59)".
    #[error("Invalid cron expression: {0}")]
    InvalidExpression(String),

    /// The search for a matching time exhausted its iteration limit.
    ///
    /// This is typically encountered with expressions that never match a real date,
    /// like `0 0 31 2 *`, or with a search limit too small for a rare combination.
    #[error("No occurrence found within the search limit.")]
    NoOccurrenceFound,
}

impl CronError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CronError::InvalidExpression(msg.into())
    }
}

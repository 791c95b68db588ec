use serde::{Deserialize, Serialize};

/// 一則台詞與說出它的角色
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// The quoted line, kept exactly as the API returns it.
    pub quote: String,
    /// Name of the character the line is attributed to.
    pub author: String,
}

#[cfg(test)]
impl Quote {
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Self {
        Quote {
            quote: quote.into(),
            author: author.into(),
        }
    }
}

/// Decodes a response body into an ordered list of quotes.
///
/// The decode is all-or-nothing: one object without `quote` or `author`
/// rejects the whole body.
pub fn decode_quotes(body: &[u8]) -> Result<Vec<Quote>, serde_json::Error> {
    serde_json::from_slice::<Vec<Quote>>(body)
}

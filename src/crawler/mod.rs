/// Stranger Things 台詞 API
pub mod strangerthings;

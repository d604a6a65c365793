use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer};

pub fn first_page() -> usize {
    1
}

// `?page=abc` falls back to the first page, `?page=-3` to page 0, which lists nothing.
// Numbers too large for an integer land past the last page.
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(page)) => Ok(usize::try_from(page).unwrap_or(0)),
        Some(Err(err)) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(usize::MAX),
            IntErrorKind::NegOverflow => Ok(0),
            _ => Ok(first_page()),
        },
        None => Ok(first_page()),
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: usize,
}

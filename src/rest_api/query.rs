//! Query-string parameters of the `/cards` endpoints

use serde::Deserialize;

use super::errors::{RestError, RestResult};

/// `?user=<owner>&cardID=<id>`
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardQuery {
    pub user: Option<String>,
    #[serde(rename = "cardID")]
    pub card_id: Option<String>,
}

impl CardQuery {
    /// The owner, if one was given
    pub fn owner(&self) -> Option<&str> {
        self.user.as_deref().filter(|s| !s.is_empty())
    }

    /// The owner, or `MissingParam("user")`
    pub fn require_owner(&self) -> RestResult<&str> {
        self.owner().ok_or(RestError::MissingParam("user"))
    }

    /// The parsed local id, if one was given
    pub fn local_id(&self) -> RestResult<Option<i64>> {
        match self.card_id.as_deref().filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
                RestError::InvalidQueryParam(format!("cardID must be an integer, got '{}'", raw))
            }),
        }
    }

    /// The parsed local id, or `MissingParam("cardID")`
    pub fn require_local_id(&self) -> RestResult<i64> {
        self.local_id()?.ok_or(RestError::MissingParam("cardID"))
    }
}

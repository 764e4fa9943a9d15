//! Query DTOs - query string parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paginazione: `before` is the `created_at` of the oldest row already shown
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PageQuery {
    #[serde(default)]
    pub before: Option<DateTime<Utc>>,
}

/// Calendar month shown by the scheduling screen, `YYYY-MM`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AvailabilityQuery {
    pub month: Option<String>,
}

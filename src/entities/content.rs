//! Routine and recipe entities, both published inside a visibility window

use super::enums::TrainingEnvironment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Routine {
    pub routine_id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub environment: Option<TrainingEnvironment>,
    pub image_path: Option<String>,
    pub visible_from: DateTime<Utc>,
    pub visible_until: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub recipe_id: i64,
    pub author_id: i64,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub image_path: Option<String>,
    pub visible_from: DateTime<Utc>,
    pub visible_until: Option<DateTime<Utc>>,
}

/// True when `now` falls inside `[from, until)`; an open `until` never expires.
pub fn is_visible_at(
    from: &DateTime<Utc>,
    until: Option<&DateTime<Utc>>,
    now: &DateTime<Utc>,
) -> bool {
    from <= now && until.is_none_or(|until| now < until)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn visibility_window_bounds() {
        let now = Utc::now();
        let hour = Duration::hours(1);
        assert!(is_visible_at(&(now - hour), None, &now));
        assert!(is_visible_at(&now, Some(&(now + hour)), &now));
        assert!(!is_visible_at(&(now + hour), None, &now));
        assert!(!is_visible_at(&(now - hour), Some(&now), &now));
    }
}

//! Feedback business logic.

use crate::{
    entities::{Feedback, feedback},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Stores a piece of feedback.
///
/// # Errors
/// Returns an error if the text is empty or whitespace-only, or the insert fails.
pub async fn submit_feedback(db: &DatabaseConnection, text: &str) -> Result<feedback::Model> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("Feedback cannot be empty"));
    }

    let feedback = feedback::ActiveModel {
        text: Set(text.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(feedback_id = feedback.id, "Feedback submitted");
    Ok(feedback)
}

/// Lists all feedback, newest first.
pub async fn list_feedback(db: &DatabaseConnection) -> Result<Vec<feedback::Model>> {
    Feedback::find()
        .order_by_desc(feedback::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_submit_feedback_rejects_empty() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = submit_feedback(&db, " \n ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_and_list_feedback() -> Result<()> {
        let db = setup_test_db().await?;

        submit_feedback(&db, "Great service").await?;
        let second = submit_feedback(&db, "  Please stock more tea  ").await?;
        assert_eq!(second.text, "Please stock more tea");

        let all = list_feedback(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], second);
        assert_eq!(all[1].text, "Great service");

        Ok(())
    }
}

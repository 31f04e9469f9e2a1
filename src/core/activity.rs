//! Audit trail - append-only record of secretariat actions.

use crate::{
    entities::{ActivityLog, activity_log, activity_log::ActivityKind},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Set, prelude::*};

/// Appends one audit row. Callers pass the open transaction when the audit
/// entry must live or die with the operation it describes.
pub async fn log_action<C>(
    conn: &C,
    action: &str,
    kind: ActivityKind,
) -> Result<activity_log::Model>
where
    C: ConnectionTrait,
{
    activity_log::ActiveModel {
        action: Set(action.to_string()),
        kind: Set(kind),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Lists the most recent audit rows, newest first.
pub async fn recent_activity(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<activity_log::Model>> {
    ActivityLog::find()
        .order_by_desc(activity_log::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_log_and_list() -> Result<()> {
        let db = setup_test_db().await?;

        log_action(&db, "first", ActivityKind::Info).await?;
        log_action(&db, "second", ActivityKind::Success).await?;

        let recent = recent_activity(&db, 10).await?;
        assert_eq!(recent.len(), 2);

        let capped = recent_activity(&db, 1).await?;
        assert_eq!(capped.len(), 1);

        Ok(())
    }
}

//! Registration window gate - controls when self-service auto-assignment runs.
//!
//! Administrators open a time-boxed window; while it is in force, member
//! applications resolve into assignments without manual approval. Window
//! rows are append-only history; the row currently in force is tracked by a
//! singleton pointer updated transactionally on open and close, so status
//! reads never have to recompute "current" by sorting the history.

use crate::{
    entities::{Window, WindowState, window, window_state},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};

/// Snapshot of the gate as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    /// Whether auto-assignment is currently permitted
    pub is_open: bool,
    /// Start of the window in force, if one exists
    pub start_at: Option<DateTime<Utc>>,
    /// End of the window in force, if one exists
    pub end_at: Option<DateTime<Utc>>,
}

/// Opens a new registration window.
///
/// Fails with `InvalidRange` when the end does not come after the start.
/// All previously open windows are closed in the same transaction, so at
/// most one row is ever in force.
pub async fn open_window(
    db: &DatabaseConnection,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Result<window::Model> {
    if end_at <= start_at {
        return Err(Error::InvalidRange {
            message: format!("window end {end_at} must come after start {start_at}"),
        });
    }

    let txn = db.begin().await?;

    close_open_rows(&txn).await?;

    let created = window::ActiveModel {
        start_at: Set(start_at),
        end_at: Set(end_at),
        is_open: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    set_current_window(&txn, Some(created.id)).await?;

    txn.commit().await?;
    Ok(created)
}

/// Closes the window currently in force; a no-op when nothing is open.
pub async fn close_window(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;
    close_open_rows(&txn).await?;
    set_current_window(&txn, None).await?;
    txn.commit().await?;
    Ok(())
}

/// Reports the gate's current status.
///
/// Open means the pointed-at window exists, its flag is still set, and now
/// falls inside its time range. A pointed-at window whose end has passed
/// reports as if no window existed.
pub async fn window_status<C>(conn: &C) -> Result<WindowStatus>
where
    C: ConnectionTrait,
{
    let closed = WindowStatus {
        is_open: false,
        start_at: None,
        end_at: None,
    };

    let Some(state) = WindowState::find_by_id(window_state::SINGLETON_ID)
        .one(conn)
        .await?
    else {
        return Ok(closed);
    };
    let Some(window_id) = state.current_window_id else {
        return Ok(closed);
    };
    let Some(current) = Window::find_by_id(window_id).one(conn).await? else {
        return Ok(closed);
    };

    let now = Utc::now();
    if !current.is_open || current.end_at < now {
        return Ok(closed);
    }

    Ok(WindowStatus {
        is_open: current.start_at <= now && now <= current.end_at,
        start_at: Some(current.start_at),
        end_at: Some(current.end_at),
    })
}

/// Whether the gate currently permits auto-assignment.
pub async fn is_window_open<C>(conn: &C) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(window_status(conn).await?.is_open)
}

async fn close_open_rows<C>(conn: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    Window::update_many()
        .col_expr(window::Column::IsOpen, Expr::value(false))
        .filter(window::Column::IsOpen.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

async fn set_current_window<C>(conn: &C, window_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = WindowState::find_by_id(window_state::SINGLETON_ID)
        .one(conn)
        .await?;

    if let Some(state) = existing {
        let mut active: window_state::ActiveModel = state.into();
        active.current_window_id = Set(window_id);
        active.updated_at = Set(Utc::now());
        active.update(conn).await?;
    } else {
        window_state::ActiveModel {
            id: Set(window_state::SINGLETON_ID),
            current_window_id: Set(window_id),
            updated_at: Set(Utc::now()),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    #[tokio::test]
    async fn test_status_with_no_window() -> Result<()> {
        let db = setup_test_db().await?;

        let status = window_status(&db).await?;
        assert!(!status.is_open);
        assert!(status.start_at.is_none());
        assert!(status.end_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_open_window_reports_open() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        let created = open_window(&db, now - Duration::minutes(5), now + Duration::hours(1)).await?;
        assert!(created.is_open);

        let status = window_status(&db).await?;
        assert!(status.is_open);
        assert_eq!(status.start_at, Some(created.start_at));
        assert_eq!(status.end_at, Some(created.end_at));

        Ok(())
    }

    #[tokio::test]
    async fn test_open_window_invalid_range() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        let result = open_window(&db, now, now).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidRange { .. }));

        let result = open_window(&db, now, now - Duration::hours(1)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidRange { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_future_window_not_yet_open() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        open_window(&db, now + Duration::hours(1), now + Duration::hours(2)).await?;

        let status = window_status(&db).await?;
        assert!(!status.is_open);
        // The window exists and is reported, it just has not started
        assert!(status.start_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_window_reports_as_absent() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        open_window(&db, now - Duration::hours(2), now - Duration::hours(1)).await?;

        let status = window_status(&db).await?;
        assert!(!status.is_open);
        assert!(status.start_at.is_none());
        assert!(status.end_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_opening_new_window_closes_previous() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        let first = open_window(&db, now - Duration::hours(1), now + Duration::hours(1)).await?;
        let second = open_window(&db, now - Duration::minutes(5), now + Duration::hours(2)).await?;

        let first_refreshed = Window::find_by_id(first.id).one(&db).await?.unwrap();
        assert!(!first_refreshed.is_open);

        let status = window_status(&db).await?;
        assert!(status.is_open);
        assert_eq!(status.end_at, Some(second.end_at));

        Ok(())
    }

    #[tokio::test]
    async fn test_close_window() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        open_window(&db, now - Duration::minutes(5), now + Duration::hours(1)).await?;
        close_window(&db).await?;

        let status = window_status(&db).await?;
        assert!(!status.is_open);
        assert!(status.start_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_close_window_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        // Nothing open; closing is a no-op
        close_window(&db).await?;
        close_window(&db).await?;

        assert!(!is_window_open(&db).await?);

        Ok(())
    }
}

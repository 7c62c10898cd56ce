//! Introduction Storage
//! Mission: Persist self-introduction documents, always scoped by owner for listings

use crate::api::pagination::{Page, PageMetadata, PageRequest};
use crate::db::Database;
use crate::introductions::models::{Introduction, IntroductionDraft};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

const COLUMNS: &str = "id, owner, introduction_title,
    title1, content1, title2, content2, title3, content3, title4, content4, title5, content5,
    created_at, updated_at";

pub struct IntroductionStore {
    db: Database,
}

impl IntroductionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Introduction> {
        Ok(Introduction {
            id: row.get(0)?,
            owner: row.get(1)?,
            introduction_title: row.get(2)?,
            title1: row.get(3)?,
            content1: row.get(4)?,
            title2: row.get(5)?,
            content2: row.get(6)?,
            title3: row.get(7)?,
            content3: row.get(8)?,
            title4: row.get(9)?,
            content4: row.get(10)?,
            title5: row.get(11)?,
            content5: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    pub fn create(&self, owner: &str, draft: &IntroductionDraft) -> Result<Introduction> {
        let now = Utc::now().to_rfc3339();
        let conn = self.db.conn();

        conn.execute(
            "INSERT INTO introductions (owner, introduction_title,
                title1, content1, title2, content2, title3, content3,
                title4, content4, title5, content5, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                owner,
                draft.introduction_title,
                draft.title1,
                draft.content1,
                draft.title2,
                draft.content2,
                draft.title3,
                draft.content3,
                draft.title4,
                draft.content4,
                draft.title5,
                draft.content5,
                now,
            ],
        )
        .context("Failed to insert introduction")?;

        let id = conn.last_insert_rowid();
        debug!(id, owner, "Introduction stored");

        Ok(Introduction {
            id,
            owner: owner.to_string(),
            introduction_title: draft.introduction_title.clone(),
            title1: draft.title1.clone(),
            content1: draft.content1.clone(),
            title2: draft.title2.clone(),
            content2: draft.content2.clone(),
            title3: draft.title3.clone(),
            content3: draft.content3.clone(),
            title4: draft.title4.clone(),
            content4: draft.content4.clone(),
            title5: draft.title5.clone(),
            content5: draft.content5.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Introduction>> {
        let conn = self.db.conn();
        conn.query_row(
            &format!("SELECT {} FROM introductions WHERE id = ?1", COLUMNS),
            params![id],
            Self::from_row,
        )
        .optional()
        .context("Failed to load introduction")
    }

    /// One page of the owner's documents, oldest first.
    pub fn list_by_owner(&self, owner: &str, request: PageRequest) -> Result<Page<Introduction>> {
        let conn = self.db.conn();

        let total: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM introductions WHERE owner = ?1",
                params![owner],
                |row| row.get(0),
            )
            .context("Failed to count introductions")?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM introductions WHERE owner = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
            COLUMNS
        ))?;

        let items = stmt
            .query_map(
                params![owner, request.limit(), request.offset()],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list introductions")?;

        Ok(Page {
            items,
            metadata: PageMetadata::new(request, total.max(0) as u64),
        })
    }

    /// Replace the document contents. Returns `None` when the id does not exist.
    pub fn update(&self, id: i64, draft: &IntroductionDraft) -> Result<Option<Introduction>> {
        let now = Utc::now().to_rfc3339();
        let rows_affected = {
            let conn = self.db.conn();
            conn.execute(
                "UPDATE introductions SET introduction_title = ?2,
                    title1 = ?3, content1 = ?4, title2 = ?5, content2 = ?6,
                    title3 = ?7, content3 = ?8, title4 = ?9, content4 = ?10,
                    title5 = ?11, content5 = ?12, updated_at = ?13
                 WHERE id = ?1",
                params![
                    id,
                    draft.introduction_title,
                    draft.title1,
                    draft.content1,
                    draft.title2,
                    draft.content2,
                    draft.title3,
                    draft.content3,
                    draft.title4,
                    draft.content4,
                    draft.title5,
                    draft.content5,
                    now,
                ],
            )
            .context("Failed to update introduction")?
        };

        if rows_affected == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Returns whether a row was deleted.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.conn();
        let rows_affected = conn
            .execute("DELETE FROM introductions WHERE id = ?1", params![id])
            .context("Failed to delete introduction")?;
        Ok(rows_affected > 0)
    }
}

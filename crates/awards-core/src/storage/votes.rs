//! Vote recording and results aggregation.

use std::collections::HashMap;

use tracing::debug;

use crate::db::{DatabaseError, new_id, unix_timestamp};

use super::db::AwardsDatabase;
use super::models::{Nominee, NomineeTally, RecordedVote, Vote, VoteAction};

/// Why a vote was not recorded.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("Category not found")]
    CategoryNotFound,

    #[error("Voting is locked for this category")]
    VotingLocked,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Replaces the voter's previous choice in place; the UNIQUE
/// `(category_id, voter_ip)` index makes this the only row for the pair.
const UPSERT_VOTE_SQL: &str = "INSERT INTO votes (id, nominee_id, category_id, voter_ip, created_at) \
     VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT(category_id, voter_ip) DO UPDATE SET \
         nominee_id = excluded.nominee_id, \
         created_at = excluded.created_at \
     RETURNING id, nominee_id, category_id, voter_ip, created_at";

#[derive(sqlx::FromRow)]
struct TallyRow {
    nominee_id: String,
    vote_count: i64,
}

impl AwardsDatabase {
    /// Record `voter_ip`'s choice of `nominee_id` in `category_id`.
    ///
    /// The category must exist and be unlocked. `nominee_id` is stored as given
    /// and is not checked against the category's nominees. The write is a
    /// single conditional upsert, so concurrent votes from one voter can never
    /// leave two rows behind.
    pub async fn record_vote(
        &self,
        category_id: &str,
        nominee_id: &str,
        voter_ip: &str,
    ) -> Result<RecordedVote, VoteError> {
        let category = match self.get_category(category_id).await {
            Ok(category) => category,
            Err(DatabaseError::NotFound(_)) => return Err(VoteError::CategoryNotFound),
            Err(e) => return Err(e.into()),
        };

        if category.voting_locked {
            return Err(VoteError::VotingLocked);
        }

        let candidate_id = new_id();
        let vote = sqlx::query_as::<_, Vote>(UPSERT_VOTE_SQL)
            .bind(&candidate_id)
            .bind(nominee_id)
            .bind(category_id)
            .bind(voter_ip)
            .bind(unix_timestamp())
            .fetch_one(self.pool())
            .await
            .map_err(DatabaseError::from)?;

        // The insert branch keeps our fresh id; the update branch keeps the old row's.
        let action = if vote.id == candidate_id {
            VoteAction::Created
        } else {
            VoteAction::Updated
        };

        debug!(vote_id = %vote.id, category_id, ?action, "Vote recorded");

        Ok(RecordedVote { vote, action })
    }

    /// The voter's current vote in a category, if any.
    pub async fn get_vote(
        &self,
        category_id: &str,
        voter_ip: &str,
    ) -> Result<Option<Vote>, DatabaseError> {
        let vote =
            sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE category_id = ? AND voter_ip = ?")
                .bind(category_id)
                .bind(voter_ip)
                .fetch_optional(self.pool())
                .await?;

        Ok(vote)
    }

    /// Count votes in a category.
    pub async fn count_votes(&self, category_id: &str) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM votes WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(self.pool())
            .await?;

        Ok(row.0)
    }

    /// Ranked vote counts for a category, most votes first.
    ///
    /// Only nominees with at least one vote appear. Ties are ordered by
    /// nominee ID. Each row carries the nominee's current metadata, or `None`
    /// if the nominee has since been deleted.
    pub async fn tally_results(&self, category_id: &str) -> Result<Vec<NomineeTally>, DatabaseError> {
        let rows = sqlx::query_as::<_, TallyRow>(
            "SELECT nominee_id, COUNT(*) AS vote_count FROM votes WHERE category_id = ? \
             GROUP BY nominee_id ORDER BY vote_count DESC, nominee_id ASC",
        )
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;

        let mut nominees: HashMap<String, Nominee> = sqlx::query_as::<_, Nominee>(
            "SELECT * FROM nominees WHERE id IN \
             (SELECT DISTINCT nominee_id FROM votes WHERE category_id = ?)",
        )
        .bind(category_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(|n| (n.id.clone(), n))
        .collect();

        Ok(rows
            .into_iter()
            .map(|row| NomineeTally {
                nominee: nominees.remove(&row.nominee_id),
                nominee_id: row.nominee_id,
                vote_count: row.vote_count,
            })
            .collect())
    }
}

//! Governance persistence: elections, candidates, laws, impeachments.
//!
//! Seats are stored as a (kind, id) pair so one election table covers
//! both town mayoralties and kingdom crowns.

use chrono::{DateTime, NaiveDate, Utc};
use daybreak_types::{
    Candidate, CharacterId, Election, ElectionId, ElectionPhase, Impeachment, ImpeachmentId,
    KingdomId, Law, LawId, LawStatus, Seat, TownId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::codec::{
    impeachment_status_from_db, impeachment_status_to_db, law_status_from_db, law_status_to_db,
    phase_from_db, phase_to_db,
};
use crate::error::DbError;

/// Operations on the governance tables.
pub struct GovernanceStore<'a> {
    pool: &'a PgPool,
}

fn seat_to_db(seat: Seat) -> (&'static str, Uuid) {
    match seat {
        Seat::Town(id) => ("town", id.into_inner()),
        Seat::Kingdom(id) => ("kingdom", id.into_inner()),
    }
}

fn seat_from_db(kind: &str, id: Uuid) -> Result<Seat, DbError> {
    match kind {
        "town" => Ok(Seat::Town(TownId::from(id))),
        "kingdom" => Ok(Seat::Kingdom(KingdomId::from(id))),
        other => Err(DbError::Decode(format!("unknown seat kind {other:?}"))),
    }
}

/// A raw row from `elections`.
#[derive(Debug, sqlx::FromRow)]
struct ElectionRow {
    id: Uuid,
    seat_kind: String,
    seat_id: Uuid,
    term: i32,
    phase: String,
    started_on: NaiveDate,
    winner: Option<Uuid>,
}

impl ElectionRow {
    fn into_domain(self) -> Result<Election, DbError> {
        Ok(Election {
            id: ElectionId::from(self.id),
            seat: seat_from_db(&self.seat_kind, self.seat_id)?,
            term: u32::try_from(self.term).unwrap_or(0),
            phase: phase_from_db(&self.phase)?,
            started_on: self.started_on,
            winner: self.winner.map(CharacterId::from),
        })
    }
}

impl<'a> GovernanceStore<'a> {
    /// Create a new governance store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // -------------------------------------------------------------------
    // Elections
    // -------------------------------------------------------------------

    /// All elections that have not completed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn open_elections(&self) -> Result<Vec<Election>, DbError> {
        let rows = sqlx::query_as::<_, ElectionRow>(
            r"SELECT id, seat_kind, seat_id, term, phase, started_on, winner
              FROM elections
              WHERE phase <> 'completed'
              ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(ElectionRow::into_domain).collect()
    }

    /// The declared candidates of one election.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn candidates(&self, election: ElectionId) -> Result<Vec<Candidate>, DbError> {
        let rows: Vec<(Uuid, DateTime<Utc>, i32)> = sqlx::query_as(
            r"SELECT character_id, nominated_at, votes
              FROM election_candidates
              WHERE election_id = $1
              ORDER BY nominated_at",
        )
        .bind(election.into_inner())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(character_id, nominated_at, votes)| Candidate {
                character_id: CharacterId::from(character_id),
                nominated_at,
                votes: u32::try_from(votes).unwrap_or(0),
            })
            .collect())
    }

    /// Move an election to a new phase.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_phase(
        &self,
        election: ElectionId,
        phase: ElectionPhase,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE elections SET phase = $2 WHERE id = $1")
            .bind(election.into_inner())
            .bind(phase_to_db(phase))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Complete an election, recording the winner (if anyone ran).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn complete_election(
        &self,
        election: ElectionId,
        winner: Option<CharacterId>,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE elections SET phase = 'completed', winner = $2 WHERE id = $1")
            .bind(election.into_inner())
            .bind(winner.map(CharacterId::into_inner))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Open a fresh election for a seat.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn spawn_election(
        &self,
        seat: Seat,
        term: u32,
        started_on: NaiveDate,
    ) -> Result<ElectionId, DbError> {
        let id = ElectionId::new();
        let (seat_kind, seat_id) = seat_to_db(seat);
        sqlx::query(
            r"INSERT INTO elections (id, seat_kind, seat_id, term, phase, started_on, winner)
              VALUES ($1, $2, $3, $4, 'nominations', $5, NULL)",
        )
        .bind(id.into_inner())
        .bind(seat_kind)
        .bind(seat_id)
        .bind(i32::try_from(term).unwrap_or(i32::MAX))
        .bind(started_on)
        .execute(self.pool)
        .await?;
        Ok(id)
    }

    /// Seats (every town and kingdom) with no open election, paired
    /// with the latest term number seen for that seat.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn seats_without_open_election(&self) -> Result<Vec<(Seat, u32)>, DbError> {
        let rows: Vec<(String, Uuid, i32)> = sqlx::query_as(
            r"SELECT s.seat_kind, s.seat_id, COALESCE(MAX(e.term), 0)
              FROM (
                  SELECT 'town' AS seat_kind, id AS seat_id FROM towns
                  UNION ALL
                  SELECT 'kingdom' AS seat_kind, id AS seat_id FROM kingdoms
              ) s
              LEFT JOIN elections e
                  ON e.seat_kind = s.seat_kind AND e.seat_id = s.seat_id
              GROUP BY s.seat_kind, s.seat_id
              HAVING COUNT(*) FILTER (WHERE e.phase <> 'completed') = 0",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(kind, id, term)| {
                Ok((
                    seat_from_db(&kind, id)?,
                    u32::try_from(term).unwrap_or(0),
                ))
            })
            .collect()
    }

    // -------------------------------------------------------------------
    // Laws
    // -------------------------------------------------------------------

    /// Insert a freshly proposed law.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn propose_law(&self, law: &Law) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO laws
                  (id, town_id, proposer, title, votes_for, votes_against,
                   status, vote_expires_on, active_expires_on)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(law.id.into_inner())
        .bind(law.town_id.into_inner())
        .bind(law.proposer.into_inner())
        .bind(&law.title)
        .bind(i32::try_from(law.votes_for).unwrap_or(0))
        .bind(i32::try_from(law.votes_against).unwrap_or(0))
        .bind(law_status_to_db(law.status))
        .bind(law.vote_expires_on)
        .bind(law.active_expires_on)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Laws whose vote or active period has expired as of the given day.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn due_laws(&self, day: NaiveDate) -> Result<Vec<Law>, DbError> {
        let rows: Vec<(
            Uuid,
            Uuid,
            Uuid,
            String,
            i32,
            i32,
            String,
            NaiveDate,
            NaiveDate,
        )> = sqlx::query_as(
            r"SELECT id, town_id, proposer, title, votes_for, votes_against,
                     status, vote_expires_on, active_expires_on
              FROM laws
              WHERE (status = 'proposed' AND vote_expires_on <= $1)
                 OR (status = 'active' AND active_expires_on <= $1)
              ORDER BY id",
        )
        .bind(day)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(
                |(id, town_id, proposer, title, votes_for, votes_against, status, vote_exp, active_exp)| {
                    Ok(Law {
                        id: LawId::from(id),
                        town_id: TownId::from(town_id),
                        proposer: CharacterId::from(proposer),
                        title,
                        votes_for: u32::try_from(votes_for).unwrap_or(0),
                        votes_against: u32::try_from(votes_against).unwrap_or(0),
                        status: law_status_from_db(&status)?,
                        vote_expires_on: vote_exp,
                        active_expires_on: active_exp,
                    })
                },
            )
            .collect()
    }

    /// Set a law's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_law_status(&self, law: LawId, status: LawStatus) -> Result<(), DbError> {
        sqlx::query(r"UPDATE laws SET status = $2 WHERE id = $1")
            .bind(law.into_inner())
            .bind(law_status_to_db(status))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Impeachments
    // -------------------------------------------------------------------

    /// Impeachment motions whose voting window closed as of the day.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn due_impeachments(&self, day: NaiveDate) -> Result<Vec<Impeachment>, DbError> {
        let rows: Vec<(Uuid, String, Uuid, Uuid, i32, i32, String, NaiveDate)> = sqlx::query_as(
            r"SELECT id, seat_kind, seat_id, target, votes_for, votes_against, status, ends_on
              FROM impeachments
              WHERE status = 'active' AND ends_on <= $1
              ORDER BY id",
        )
        .bind(day)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(
                |(id, seat_kind, seat_id, target, votes_for, votes_against, status, ends_on)| {
                    Ok(Impeachment {
                        id: ImpeachmentId::from(id),
                        seat: seat_from_db(&seat_kind, seat_id)?,
                        target: CharacterId::from(target),
                        votes_for: u32::try_from(votes_for).unwrap_or(0),
                        votes_against: u32::try_from(votes_against).unwrap_or(0),
                        status: impeachment_status_from_db(&status)?,
                        ends_on,
                    })
                },
            )
            .collect()
    }

    /// Set an impeachment motion's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_impeachment_status(
        &self,
        motion: ImpeachmentId,
        status: daybreak_types::ImpeachmentStatus,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE impeachments SET status = $2 WHERE id = $1")
            .bind(motion.into_inner())
            .bind(impeachment_status_to_db(status))
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

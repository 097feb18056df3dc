//! The election phase machine and vote tally.
//!
//! Phases are a pure function of elapsed game days since the election
//! opened: three days of nominations, then three of voting, then the
//! election completes. The governance step reconciles stored phases to
//! the computed one and installs winners.

use chrono::NaiveDate;
use daybreak_types::{Candidate, CharacterId, Election, ElectionPhase};

/// Days the nomination window stays open.
pub const NOMINATION_DAYS: i64 = 3;

/// Days the voting window stays open after nominations close.
pub const VOTING_DAYS: i64 = 3;

/// The phase an election should be in on a given day.
pub fn phase_for(started_on: NaiveDate, today: NaiveDate) -> ElectionPhase {
    let elapsed = today.signed_duration_since(started_on).num_days();
    if elapsed < NOMINATION_DAYS {
        ElectionPhase::Nominations
    } else if elapsed < NOMINATION_DAYS.saturating_add(VOTING_DAYS) {
        ElectionPhase::Voting
    } else {
        ElectionPhase::Completed
    }
}

/// The phase an election should transition to, if any.
///
/// `None` means the stored phase already matches the calendar. Completed
/// elections never move again. An empty field has nothing to vote on, so
/// a zero-candidate election completes when nominations close instead of
/// entering the voting window.
pub fn next_phase(
    election: &Election,
    today: NaiveDate,
    candidate_count: usize,
) -> Option<ElectionPhase> {
    if election.phase == ElectionPhase::Completed {
        return None;
    }
    let mut due = phase_for(election.started_on, today);
    if due == ElectionPhase::Voting && candidate_count == 0 {
        due = ElectionPhase::Completed;
    }
    (due != election.phase).then_some(due)
}

/// Tally an election: most votes wins, ties broken by the earliest
/// nomination time. An empty field produces no winner.
pub fn tally(candidates: &[Candidate]) -> Option<CharacterId> {
    candidates
        .iter()
        .max_by(|a, b| {
            a.votes
                .cmp(&b.votes)
                // Earlier nomination wins a tie, so it must compare greater.
                .then_with(|| b.nominated_at.cmp(&a.nominated_at))
        })
        .map(|winner| winner.character_id)
}

/// The term number for the follow-up election a seat auto-spawns.
pub const fn next_term(election: &Election) -> u32 {
    election.term.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Days, Utc};
    use daybreak_types::{ElectionId, Seat, TownId};

    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
    }

    fn candidate(votes: u32, nominated_at: DateTime<Utc>) -> Candidate {
        Candidate {
            character_id: CharacterId::new(),
            nominated_at,
            votes,
        }
    }

    fn sample_election(phase: ElectionPhase, started_on: NaiveDate) -> Election {
        Election {
            id: ElectionId::new(),
            seat: Seat::Town(TownId::new()),
            term: 4,
            phase,
            started_on,
            winner: None,
        }
    }

    #[test]
    fn phase_windows() {
        let opened = day("2026-08-01");
        assert_eq!(phase_for(opened, day("2026-08-01")), ElectionPhase::Nominations);
        assert_eq!(phase_for(opened, day("2026-08-03")), ElectionPhase::Nominations);
        assert_eq!(phase_for(opened, day("2026-08-04")), ElectionPhase::Voting);
        assert_eq!(phase_for(opened, day("2026-08-06")), ElectionPhase::Voting);
        assert_eq!(phase_for(opened, day("2026-08-07")), ElectionPhase::Completed);
    }

    #[test]
    fn transitions_only_when_calendar_moved_on() {
        let opened = day("2026-08-01");
        let e = sample_election(ElectionPhase::Nominations, opened);
        assert_eq!(next_phase(&e, day("2026-08-02"), 2), None);
        assert_eq!(
            next_phase(&e, day("2026-08-05"), 2),
            Some(ElectionPhase::Voting)
        );
        // A stalled election jumps straight to completion.
        assert_eq!(
            next_phase(&e, day("2026-08-10"), 2),
            Some(ElectionPhase::Completed)
        );
    }

    #[test]
    fn zero_candidate_election_completes_at_nominations_close() {
        let opened = day("2026-08-01");
        let e = sample_election(ElectionPhase::Nominations, opened);
        // Day 4 would open voting, but nobody stood for the seat.
        assert_eq!(
            next_phase(&e, day("2026-08-04"), 0),
            Some(ElectionPhase::Completed)
        );
        // One nominee keeps the voting window.
        assert_eq!(
            next_phase(&e, day("2026-08-04"), 1),
            Some(ElectionPhase::Voting)
        );
    }

    #[test]
    fn completed_elections_never_move() {
        let e = sample_election(ElectionPhase::Completed, day("2026-08-01"));
        assert_eq!(next_phase(&e, day("2026-09-01"), 0), None);
    }

    #[test]
    fn tally_picks_most_votes() {
        let now = Utc::now();
        let a = candidate(3, now);
        let b = candidate(7, now);
        let winner = tally(&[a, b.clone()]);
        assert_eq!(winner, Some(b.character_id));
    }

    #[test]
    fn ties_break_to_earliest_nomination() {
        let now = Utc::now();
        let earlier = now.checked_sub_days(Days::new(1)).unwrap_or(now);
        let late = candidate(5, now);
        let early = candidate(5, earlier);
        let winner = tally(&[late, early.clone()]);
        assert_eq!(winner, Some(early.character_id));
    }

    #[test]
    fn empty_field_has_no_winner() {
        assert_eq!(tally(&[]), None);
    }

    #[test]
    fn term_counter_increments() {
        let e = sample_election(ElectionPhase::Completed, day("2026-08-01"));
        assert_eq!(next_term(&e), 5);
    }
}

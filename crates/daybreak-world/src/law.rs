//! Law and impeachment resolution.
//!
//! Both are deadline-driven: nothing moves until the stored expiry day
//! arrives, then the vote totals decide the outcome. A strict majority
//! in favor is required; a tie fails.

use chrono::NaiveDate;
use daybreak_types::{Impeachment, ImpeachmentStatus, Law, LawStatus};

/// The status a law should transition to on a given day, if any.
pub fn resolve_law(law: &Law, today: NaiveDate) -> Option<LawStatus> {
    match law.status {
        LawStatus::Proposed if today >= law.vote_expires_on => {
            if law.votes_for > law.votes_against {
                Some(LawStatus::Active)
            } else {
                Some(LawStatus::Rejected)
            }
        }
        LawStatus::Active if today >= law.active_expires_on => Some(LawStatus::Expired),
        LawStatus::Proposed | LawStatus::Active | LawStatus::Rejected | LawStatus::Expired => None,
    }
}

/// The status an impeachment should transition to on a given day, if any.
pub fn resolve_impeachment(motion: &Impeachment, today: NaiveDate) -> Option<ImpeachmentStatus> {
    match motion.status {
        ImpeachmentStatus::Active if today >= motion.ends_on => {
            if motion.votes_for > motion.votes_against {
                Some(ImpeachmentStatus::Passed)
            } else {
                Some(ImpeachmentStatus::Failed)
            }
        }
        ImpeachmentStatus::Active | ImpeachmentStatus::Passed | ImpeachmentStatus::Failed => None,
    }
}

/// Whether an impeachment outcome vacates the office.
pub const fn vacates_office(status: ImpeachmentStatus) -> bool {
    matches!(status, ImpeachmentStatus::Passed)
}

#[cfg(test)]
mod tests {
    use daybreak_types::{CharacterId, ImpeachmentId, LawId, Seat, TownId};

    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
    }

    fn sample_law(status: LawStatus, votes_for: u32, votes_against: u32) -> Law {
        Law {
            id: LawId::new(),
            town_id: TownId::new(),
            proposer: CharacterId::new(),
            title: String::from("Curfew on night markets"),
            votes_for,
            votes_against,
            status,
            vote_expires_on: day("2026-08-20"),
            active_expires_on: day("2026-09-20"),
        }
    }

    fn sample_motion(votes_for: u32, votes_against: u32) -> Impeachment {
        Impeachment {
            id: ImpeachmentId::new(),
            seat: Seat::Town(TownId::new()),
            target: CharacterId::new(),
            votes_for,
            votes_against,
            status: ImpeachmentStatus::Active,
            ends_on: day("2026-08-20"),
        }
    }

    #[test]
    fn proposed_law_waits_for_its_deadline() {
        let law = sample_law(LawStatus::Proposed, 10, 2);
        assert_eq!(resolve_law(&law, day("2026-08-19")), None);
        assert_eq!(resolve_law(&law, day("2026-08-20")), Some(LawStatus::Active));
    }

    #[test]
    fn majority_passes_tie_fails() {
        let passed = sample_law(LawStatus::Proposed, 5, 4);
        assert_eq!(
            resolve_law(&passed, day("2026-08-21")),
            Some(LawStatus::Active)
        );
        let tied = sample_law(LawStatus::Proposed, 4, 4);
        assert_eq!(
            resolve_law(&tied, day("2026-08-21")),
            Some(LawStatus::Rejected)
        );
    }

    #[test]
    fn active_law_lapses_at_expiry() {
        let law = sample_law(LawStatus::Active, 5, 0);
        assert_eq!(resolve_law(&law, day("2026-09-19")), None);
        assert_eq!(
            resolve_law(&law, day("2026-09-20")),
            Some(LawStatus::Expired)
        );
    }

    #[test]
    fn terminal_laws_never_move() {
        assert_eq!(
            resolve_law(&sample_law(LawStatus::Rejected, 0, 9), day("2027-01-01")),
            None
        );
        assert_eq!(
            resolve_law(&sample_law(LawStatus::Expired, 9, 0), day("2027-01-01")),
            None
        );
    }

    #[test]
    fn impeachment_carries_on_strict_majority() {
        let carried = sample_motion(6, 5);
        assert_eq!(
            resolve_impeachment(&carried, day("2026-08-20")),
            Some(ImpeachmentStatus::Passed)
        );
        let tied = sample_motion(5, 5);
        assert_eq!(
            resolve_impeachment(&tied, day("2026-08-20")),
            Some(ImpeachmentStatus::Failed)
        );
        assert_eq!(resolve_impeachment(&carried, day("2026-08-19")), None);
    }

    #[test]
    fn only_passed_motions_vacate() {
        assert!(vacates_office(ImpeachmentStatus::Passed));
        assert!(!vacates_office(ImpeachmentStatus::Failed));
        assert!(!vacates_office(ImpeachmentStatus::Active));
    }
}

//! Incentive ledger math. The ledger is append-only; a user's balance is
//! always the sum over their rows at fetch time.

use crate::schema::Incentive;

pub const TRAINING_COMPLETED_POINTS: i64 = 50;
pub const TRAINING_COMPLETED_REASON: &str = "Training module completed";

pub const REPORT_SUBMITTED_POINTS: i64 = 25;
pub const REPORT_SUBMITTED_REASON: &str = "Waste report submitted";

pub fn total_points(ledger: &[Incentive]) -> i64 {
    ledger.iter().map(|incentive| incentive.points).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(points: i64) -> Incentive {
        Incentive {
            id: "i".into(),
            user_id: "u1".into(),
            points,
            reason: TRAINING_COMPLETED_REASON.into(),
            source_ref: "m1".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn empty_ledger_totals_zero() {
        assert_eq!(total_points(&[]), 0);
    }

    #[test]
    fn total_is_the_sum_of_all_rows() {
        let ledger = vec![entry(50), entry(25), entry(50)];
        assert_eq!(total_points(&ledger), 125);
    }
}

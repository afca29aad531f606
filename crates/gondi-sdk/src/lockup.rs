//! Refinance lockup of the newest loan tranche
//!
//! A tranche cannot be refinanced before a share of its remaining term has
//! elapsed. The share is `minLockPeriod` basis points of the time between
//! the tranche start and the loan end.

use gondi_types::{GondiError, Loan, Result, U256};

const BPS: u64 = 10_000;

/// Seconds left before the newest tranche of `loan` can be refinanced.
///
/// `now` is a unix timestamp in seconds. Returns 0 once the lockup is over.
pub fn remaining_lockup_seconds(loan: &Loan, min_lock_period_bps: U256, now: u64) -> Result<u64> {
    let newest = loan
        .newest_source()
        .ok_or_else(|| GondiError::invalid_input("loan.source", "loan has no sources"))?;

    let tranche_term = loan.end_time().saturating_sub(newest.start_time);
    let lockup = tranche_term
        .saturating_mul(min_lock_period_bps)
        .saturating_add(U256::from(BPS - 1))
        / U256::from(BPS);
    let elapsed = U256::from(now).saturating_sub(newest.start_time);

    let remaining = lockup.saturating_sub(elapsed);
    Ok(u64::try_from(remaining).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gondi_types::{Address, LoanSource, SECONDS_IN_DAY};

    fn loan(start: u64, duration: u64, newest_start: u64) -> Loan {
        let source = |loan_id: u64, start_time: u64| LoanSource {
            loan_id: U256::from(loan_id),
            lender: Address::repeat_byte(1),
            principal_amount: U256::from(1_000u64),
            accrued_interest: U256::ZERO,
            start_time: U256::from(start_time),
            apr_bps: U256::from(1_000u64),
        };
        Loan {
            borrower: Address::repeat_byte(2),
            nft_collateral_token_id: U256::from(7u64),
            nft_collateral_address: Address::repeat_byte(3),
            principal_address: Address::repeat_byte(4),
            principal_amount: U256::from(1_000u64),
            start_time: U256::from(start),
            duration: U256::from(duration),
            source: vec![source(2, newest_start), source(1, start)],
            extra: Default::default(),
        }
    }

    #[test]
    fn lockup_runs_from_newest_tranche() {
        // 10 day tranche term, 10% lock => 1 day
        let loan = loan(0, 20 * SECONDS_IN_DAY, 10 * SECONDS_IN_DAY);
        let now = 10 * SECONDS_IN_DAY + 3_600;
        let left = remaining_lockup_seconds(&loan, U256::from(1_000u64), now).unwrap();
        assert_eq!(left, SECONDS_IN_DAY - 3_600);
    }

    #[test]
    fn lockup_rounds_up() {
        // 7 second term, 1 bps => ceil(0.0007) = 1
        let loan = loan(100, 7, 100);
        assert_eq!(remaining_lockup_seconds(&loan, U256::from(1u64), 100).unwrap(), 1);
    }

    #[test]
    fn elapsed_lockup_is_zero() {
        let loan = loan(0, 10 * SECONDS_IN_DAY, 0);
        let left = remaining_lockup_seconds(&loan, U256::from(500u64), 9 * SECONDS_IN_DAY).unwrap();
        assert_eq!(left, 0);
    }

    #[test]
    fn loan_without_sources_is_rejected() {
        let mut loan = loan(0, 1, 0);
        loan.source.clear();
        let err = remaining_lockup_seconds(&loan, U256::from(1u64), 0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

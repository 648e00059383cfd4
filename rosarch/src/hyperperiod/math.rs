/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! GCD and checked LCM over target-model time units.

use super::HyperperiodError;

/// Euclid, iterative.  `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// LCM of two periods, `Err(Overflow)` if it does not fit in `u64`.
/// Zero is absorbing.
pub fn lcm(a: u64, b: u64) -> Result<u64, HyperperiodError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// LCM of every period in `periods`; `Ok(0)` when empty.
pub fn lcm_of_slice(periods: &[u64]) -> Result<u64, HyperperiodError> {
    let Some((&first, rest)) = periods.split_first() else {
        return Ok(0);
    };
    rest.iter().try_fold(first, |acc, &p| lcm(acc, p))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_cases() {
        assert_eq!(gcd(50, 100), 50);
        assert_eq!(gcd(40, 100), 20);
        assert_eq!(gcd(17, 13), 1);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(9, 0), 9);
    }

    #[test]
    fn lcm_of_sensor_periods() {
        assert_eq!(lcm(50, 100).unwrap(), 100);
        assert_eq!(lcm(40, 100).unwrap(), 200);
        assert_eq!(lcm(0, 100).unwrap(), 0);
    }

    #[test]
    fn lcm_overflow_is_reported_with_operands() {
        let a = u64::MAX / 2 + 1;
        let b = a + 2;
        assert_eq!(lcm(a, b), Err(HyperperiodError::Overflow { a, b }));
    }

    #[test]
    fn lcm_of_slice_folds_all_periods() {
        assert_eq!(lcm_of_slice(&[]).unwrap(), 0);
        assert_eq!(lcm_of_slice(&[30]).unwrap(), 30);
        assert_eq!(lcm_of_slice(&[50, 100, 40]).unwrap(), 200);
        assert!(lcm_of_slice(&[u64::MAX / 2 + 1, u64::MAX / 2]).is_err());
    }
}

//! State space sanitizer - bounds values for Kani exploration

use model_safety::state::*;

pub const MAX_STEPS: u8 = 4;

/// Bounds for tractable verification
const MAX_BALANCE: u128 = 10_000_000u128;
const MAX_CREDIT: u128 = 1_000_000u128;
const MAX_PROFIT: u128 = 1_000_000u128;

pub trait Sanitize {
    fn sanitize(self) -> Self;
}

impl Sanitize for Treasury {
    fn sanitize(mut self) -> Treasury {
        if self.balance > MAX_BALANCE {
            self.balance %= MAX_BALANCE;
        }
        if self.backstop_credit > MAX_CREDIT {
            self.backstop_credit %= MAX_CREDIT;
        }
        self
    }
}

impl Sanitize for Pool {
    fn sanitize(mut self) -> Pool {
        if self.profit_balance > MAX_PROFIT {
            self.profit_balance %= MAX_PROFIT;
        }
        // Reserve can never exceed what the pool holds
        if self.profit_reserved > self.profit_balance {
            self.profit_reserved = self.profit_balance;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reserve_clamped() {
        let p = Pool {
            profit_balance: 10,
            profit_reserved: 50,
            ..Pool::default()
        }
        .sanitize();
        assert_eq!(p.profit_reserved, 10);
    }

    #[test]
    fn test_treasury_balance_bounded() {
        let s = Treasury {
            balance: u128::MAX,
            ..Treasury::default()
        }
        .sanitize();
        assert!(s.balance < MAX_BALANCE);
    }
}

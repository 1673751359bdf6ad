//! Pure state model for Kani verification

/// Small fixed bounds for Kani
pub const MAX_LOCKS: usize = 6;
pub const MAX_STRATEGIES: usize = 3;
pub const MAX_DEPOSITORS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lock {
    pub strategy: usize,
    pub negative: u128,  // Pool's worst case, counted in total_locked while locked
    pub positive: u128,  // Premium reserved while locked
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Treasury {
    pub balance: u128,
    pub backstop_credit: u128,
    pub total_locked: u128,
    pub reserved_premium: u128,
    pub locked_by_strategy: [u128; MAX_STRATEGIES],
    pub strategy_caps: [u128; MAX_STRATEGIES],
    pub locks: arrayvec::ArrayVec<Lock, MAX_LOCKS>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Depositor {
    pub shares: u128,
    pub last_point: u128,
    pub buffered: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    pub total_shares: u128,
    pub point: u128,
    /// Settlement tokens held by the pool
    pub profit_balance: u128,
    /// Portion of `profit_balance` owed to depositors
    pub profit_reserved: u128,
    pub depositors: arrayvec::ArrayVec<Depositor, MAX_DEPOSITORS>,
}

impl Default for Lock {
    fn default() -> Self {
        Self {
            strategy: 0,
            negative: 0,
            positive: 0,
            locked: false,
        }
    }
}

impl Default for Treasury {
    fn default() -> Self {
        Self {
            balance: 0,
            backstop_credit: 0,
            total_locked: 0,
            reserved_premium: 0,
            locked_by_strategy: [0; MAX_STRATEGIES],
            strategy_caps: [u128::MAX; MAX_STRATEGIES],
            locks: arrayvec::ArrayVec::new(),
        }
    }
}

impl Default for Depositor {
    fn default() -> Self {
        Self {
            shares: 0,
            last_point: 0,
            buffered: 0,
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            total_shares: 0,
            point: 0,
            profit_balance: 0,
            profit_reserved: 0,
            depositors: arrayvec::ArrayVec::new(),
        }
    }
}

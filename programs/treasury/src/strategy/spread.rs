//! Cash-settled capped call spread
//!
//! Pays `amount * (min(price, cap) - strike)` when above the strike, where
//! `cap = strike * (1 + width)`. The cap makes the worst case known at
//! creation, so it is locked in full. The premium is a flat fraction of it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bulwark_common::{BulwarkError, OrOverflow};
use model_safety::math::{min_u128, mul_div_floor};
use serde::{Deserialize, Serialize};

use super::{PriceFeed, Quote, QuoteRequest, Strategy, PRICE_SCALE};
use crate::state::LockedPosition;

const BPS: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadParams {
    /// Upper strike distance above the strike, in basis points
    pub width_bps: u32,
    /// Premium as a fraction of the worst-case payout, in basis points
    pub premium_bps: u32,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            width_bps: 1_000,
            premium_bps: 2_000,
        }
    }
}

pub struct CappedCallSpread {
    name: String,
    params: SpreadParams,
    feed: Arc<dyn PriceFeed>,
}

impl CappedCallSpread {
    pub fn new(name: impl Into<String>, params: SpreadParams, feed: Arc<dyn PriceFeed>) -> Result<Self, BulwarkError> {
        if params.width_bps == 0 {
            return Err(BulwarkError::InvalidConfig("spread width must be non-zero".into()));
        }
        if u128::from(params.premium_bps) > BPS {
            return Err(BulwarkError::InvalidConfig("premium above 100%".into()));
        }
        Ok(Self {
            name: name.into(),
            params,
            feed,
        })
    }

    pub fn params(&self) -> &SpreadParams {
        &self.params
    }

    fn cap_price(&self, strike: u128) -> Result<u128, BulwarkError> {
        let width = mul_div_floor(strike, u128::from(self.params.width_bps), BPS).or_overflow()?;
        strike.checked_add(width).or_overflow()
    }
}

impl Strategy for CappedCallSpread {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote(&self, req: &QuoteRequest) -> Result<Quote, BulwarkError> {
        let strike = if req.aux == 0 {
            self.feed.price(req.now)?
        } else {
            req.aux
        };
        if strike == 0 {
            return Err(BulwarkError::Strategy("no reference price".into()));
        }
        let cap = self.cap_price(strike)?;
        let negative = mul_div_floor(req.amount, cap - strike, PRICE_SCALE).or_overflow()?;
        if negative == 0 {
            return Err(BulwarkError::Strategy(format!(
                "{}: amount {} too small to carry exposure",
                self.name, req.amount
            )));
        }
        let positive = mul_div_floor(negative, u128::from(self.params.premium_bps), BPS).or_overflow()?;
        Ok(Quote {
            expiration: req.now.checked_add(req.period).or_overflow()?,
            negative_exposure: negative,
            positive_exposure: positive,
            aux: strike,
        })
    }

    fn realized_payoff(&self, position: &LockedPosition, now: u64) -> Result<u128, BulwarkError> {
        if now > position.expiration {
            return Ok(0);
        }
        let strike = position.aux;
        let price = min_u128(self.feed.price(now)?, self.cap_price(strike)?);
        if price <= strike {
            return Ok(0);
        }
        mul_div_floor(position.amount, price - strike, PRICE_SCALE).or_overflow()
    }
}

/// Price set by hand; used by the keeper's local run and by tests
#[derive(Debug, Default)]
pub struct ManualPrice {
    price: AtomicU64,
}

impl ManualPrice {
    pub fn new(price: u64) -> Self {
        Self {
            price: AtomicU64::new(price),
        }
    }

    pub fn set(&self, price: u64) {
        self.price.store(price, Ordering::Relaxed);
    }
}

impl PriceFeed for ManualPrice {
    fn price(&self, _now: u64) -> Result<u128, BulwarkError> {
        match self.price.load(Ordering::Relaxed) {
            0 => Err(BulwarkError::Strategy("price unavailable".into())),
            p => Ok(u128::from(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PositionState;
    use bulwark_common::{AccountId, PositionId, StrategyId};

    const USD: u64 = 100_000_000;

    fn spread(feed: Arc<ManualPrice>) -> CappedCallSpread {
        CappedCallSpread::new("eth-call-10", SpreadParams::default(), feed).unwrap()
    }

    fn position(quote: &Quote, amount: u128) -> LockedPosition {
        LockedPosition {
            id: PositionId(1),
            strategy: StrategyId(1),
            holder: AccountId::new_unique(),
            state: PositionState::Locked,
            negative_exposure: quote.negative_exposure,
            positive_exposure: quote.positive_exposure,
            expiration: quote.expiration,
            created_at: 0,
            amount,
            aux: quote.aux,
        }
    }

    #[test]
    fn test_quote_at_the_money() {
        let feed = Arc::new(ManualPrice::new(2_000 * USD));
        let s = spread(feed);
        let q = s
            .quote(&QuoteRequest {
                holder: AccountId::new_unique(),
                amount: 10,
                period: 86_400,
                aux: 0,
                now: 100,
            })
            .unwrap();

        // cap 2200: 10 units * 200 = 2000 worst case, 20% premium
        assert_eq!(q.aux, 2_000 * u128::from(USD));
        assert_eq!(q.negative_exposure, 2_000);
        assert_eq!(q.positive_exposure, 400);
        assert_eq!(q.expiration, 86_500);
    }

    #[test]
    fn test_payoff_is_capped_and_expires() {
        let feed = Arc::new(ManualPrice::new(1_000 * USD));
        let s = spread(feed.clone());
        let q = s
            .quote(&QuoteRequest {
                holder: AccountId::new_unique(),
                amount: 3,
                period: 1_000,
                aux: 0,
                now: 0,
            })
            .unwrap();
        let p = position(&q, 3);

        assert_eq!(s.realized_payoff(&p, 10).unwrap(), 0);
        feed.set(1_050 * USD);
        assert_eq!(s.realized_payoff(&p, 10).unwrap(), 150);
        feed.set(5_000 * USD);
        assert_eq!(s.realized_payoff(&p, 10).unwrap(), q.negative_exposure);
        assert_eq!(s.realized_payoff(&p, 1_001).unwrap(), 0);
    }

    #[test]
    fn test_missing_price_is_a_strategy_error() {
        let s = spread(Arc::new(ManualPrice::new(0)));
        let err = s
            .quote(&QuoteRequest {
                holder: AccountId::new_unique(),
                amount: 1,
                period: 1,
                aux: 0,
                now: 0,
            })
            .unwrap_err();
        assert!(matches!(err, BulwarkError::Strategy(_)));
    }

    #[test]
    fn test_rejects_bad_params() {
        let feed: Arc<dyn PriceFeed> = Arc::new(ManualPrice::new(1));
        let zero_width = SpreadParams { width_bps: 0, premium_bps: 1 };
        assert!(CappedCallSpread::new("x", zero_width, feed.clone()).is_err());
        let pricey = SpreadParams { width_bps: 1, premium_bps: 10_001 };
        assert!(CappedCallSpread::new("x", pricey, feed).is_err());
    }
}

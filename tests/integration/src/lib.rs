//! Bulwark Integration Tests
//!
//! Shared harness wiring a treasury to a backstop pool over one token
//! ledger, with a manual clock. Scenario tests live in `tests/`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use bulwark_backstop::{BackstopConfig, BackstopPool};
pub use bulwark_common::*;
pub use bulwark_treasury::*;

pub const T0: u64 = 1_700_000_000;
pub const USD: u64 = 100_000_000;

/// Strategy with scripted terms: locks `amount`, charges `premium_pct`% of
/// it, and pays whatever the test sets
pub struct Scripted {
    premium_pct: u128,
    payoff: AtomicU64,
}

impl Scripted {
    pub fn new(premium_pct: u128) -> Arc<Self> {
        Arc::new(Self {
            premium_pct,
            payoff: AtomicU64::new(0),
        })
    }

    pub fn set_payoff(&self, payoff: u64) {
        self.payoff.store(payoff, Ordering::Relaxed);
    }
}

impl Strategy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn quote(&self, req: &QuoteRequest) -> Result<Quote, BulwarkError> {
        Ok(Quote {
            expiration: req.now + req.period,
            negative_exposure: req.amount,
            positive_exposure: req.amount * self.premium_pct / 100,
            aux: req.aux,
        })
    }

    fn realized_payoff(&self, _position: &LockedPosition, _now: u64) -> Result<u128, BulwarkError> {
        Ok(u128::from(self.payoff.load(Ordering::Relaxed)))
    }
}

pub const SCRIPTED: StrategyId = StrategyId(1);
pub const SPREAD: StrategyId = StrategyId(2);

pub struct Harness {
    pub now: u64,
    pub ledger: TokenLedger,
    pub treasury: Treasury,
    pub treasury_admin: AdminCap,
    pub backstop: BackstopPool,
    pub backstop_admin: AdminCap,
    pub scripted: Arc<Scripted>,
    pub feed: Arc<ManualPrice>,
    pub converter: AccountId,
}

impl Harness {
    /// Treasury holding `treasury_funds`, a backstop with a funded converter,
    /// a scripted strategy and an ETH call spread at $2000
    pub fn new(treasury: TreasuryConfig, treasury_funds: u128, premium_pct: u128) -> Self {
        let converter = AccountId::new_unique();
        let backstop_config = BackstopConfig {
            converter: Some(converter),
            ..BackstopConfig::default()
        };
        Self::with_configs(treasury, backstop_config, treasury_funds, premium_pct)
    }

    pub fn with_configs(
        treasury_config: TreasuryConfig,
        backstop_config: BackstopConfig,
        treasury_funds: u128,
        premium_pct: u128,
    ) -> Self {
        let now = T0;
        let mut ledger = TokenLedger::new();
        let converter = backstop_config.converter.unwrap_or_else(AccountId::new_unique);
        ledger
            .mint(Token::Settlement, &converter, 1_000_000_000)
            .expect("mint converter");

        let (backstop, backstop_admin, payout) =
            BackstopPool::new(backstop_config, AccountId::new_unique(), now).expect("backstop");
        let (mut treasury, treasury_admin) =
            Treasury::new(treasury_config, AccountId::new_unique(), payout).expect("treasury");
        ledger
            .mint(Token::Settlement, treasury.account(), treasury_funds)
            .expect("mint treasury");

        let scripted = Scripted::new(premium_pct);
        treasury
            .accept_strategy(&treasury_admin, SCRIPTED, scripted.clone(), DAY, 30 * DAY, now)
            .expect("accept scripted");

        let feed = Arc::new(ManualPrice::new(2_000 * USD));
        let spread = CappedCallSpread::new("eth-call-spread-10", SpreadParams::default(), feed.clone())
            .expect("spread");
        treasury
            .accept_strategy(&treasury_admin, SPREAD, Arc::new(spread), DAY, 30 * DAY, now)
            .expect("accept spread");

        Self {
            now,
            ledger,
            treasury,
            treasury_admin,
            backstop,
            backstop_admin,
            scripted,
            feed,
            converter,
        }
    }

    pub fn advance(&mut self, secs: u64) {
        self.now += secs;
    }

    /// New account holding `settlement` and `risk` tokens
    pub fn account(&mut self, settlement: u128, risk: u128) -> AccountId {
        let who = AccountId::new_unique();
        self.ledger.mint(Token::Settlement, &who, settlement).expect("mint");
        self.ledger.mint(Token::Risk, &who, risk).expect("mint");
        who
    }

    pub fn settlement(&self, who: &AccountId) -> u128 {
        self.ledger.balance(Token::Settlement, who)
    }

    pub fn risk(&self, who: &AccountId) -> u128 {
        self.ledger.balance(Token::Risk, who)
    }

    pub fn treasury_balance(&self) -> u128 {
        self.treasury.total_balance(&self.ledger)
    }

    pub fn create(
        &mut self,
        strategy: StrategyId,
        holder: &AccountId,
        amount: u128,
        period: u64,
    ) -> Result<PositionId, BulwarkError> {
        self.treasury
            .create(&mut self.ledger, strategy, holder, amount, period, 0, self.now)
    }

    pub fn settle(&mut self, id: PositionId, holder: &AccountId) -> Result<u128, BulwarkError> {
        self.treasury
            .settle(&mut self.ledger, &mut self.backstop, id, holder, holder, self.now)
    }

    pub fn unlock(&mut self, id: PositionId) -> Result<(), BulwarkError> {
        self.treasury.unlock(id, self.now)
    }

    pub fn provide(&mut self, who: &AccountId, depositor: DepositorId, amount: u128) -> Result<DepositorId, BulwarkError> {
        self.backstop
            .provide(&mut self.ledger, who, depositor, amount, self.now)
    }

    pub fn withdraw(&mut self, who: &AccountId, depositor: DepositorId, shares: u128) -> Result<u128, BulwarkError> {
        self.backstop
            .withdraw(&mut self.ledger, who, depositor, shares, self.now)
    }

    pub fn claim(&mut self, who: &AccountId, depositor: DepositorId) -> Result<u128, BulwarkError> {
        self.backstop.claim(&mut self.ledger, who, depositor, self.now)
    }

    pub fn fix_profit(&mut self) -> Result<EpochId, BulwarkError> {
        self.backstop.fix_profit(&self.ledger, self.now)
    }

    /// Both components' bookkeeping agrees with their positions and the ledger
    pub fn assert_invariants(&self) {
        if let Err(e) = self.treasury.check_invariants() {
            panic!("treasury invariant broken: {e}");
        }
        if let Err(e) = self.backstop.check_invariants(&self.ledger) {
            panic!("backstop invariant broken: {e}");
        }
    }
}

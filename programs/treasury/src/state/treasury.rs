//! Treasury state and read-only views

use std::sync::Arc;

use bulwark_common::{
    AccountId, AdminCap, BulwarkError, EntryLock, Event, Issuer, Journal, PayoutCap, PositionId,
    ShortfallCover, StrategyId, Token, TokenLedger,
};

use super::{LimitController, LockedPosition, PositionTable, StrategyRegistry, TreasuryConfig, Vault};
use crate::instructions;
use crate::strategy::Strategy;

pub struct Treasury {
    /// Account holding the treasury's settlement tokens
    pub(crate) account: AccountId,
    pub(crate) issuer: Issuer,
    /// Capability for drawing on the backstop
    pub(crate) payout: PayoutCap,
    pub(crate) benchmark: u128,
    pub(crate) replenish_on_shortfall: bool,
    pub(crate) vault: Vault,
    pub(crate) positions: PositionTable,
    pub(crate) strategies: StrategyRegistry,
    pub(crate) limits: LimitController,
    pub(crate) lock: EntryLock,
    pub(crate) journal: Journal,
}

impl Treasury {
    /// Create a treasury that escalates shortfalls with `payout`.
    ///
    /// Returns the treasury and its administrative capability.
    pub fn new(
        config: TreasuryConfig,
        account: AccountId,
        payout: PayoutCap,
    ) -> Result<(Self, AdminCap), BulwarkError> {
        config.validate()?;
        let issuer = Issuer::fresh();
        let admin = issuer.admin_cap();
        log::info!(
            "treasury {} opened: benchmark {}, credit {}, total cap {:?}",
            account,
            config.benchmark,
            config.backstop_credit,
            config.total_cap
        );
        let treasury = Self {
            account,
            issuer,
            payout,
            benchmark: config.benchmark,
            replenish_on_shortfall: config.replenish_on_shortfall,
            vault: Vault::new(config.backstop_credit),
            positions: PositionTable::default(),
            strategies: StrategyRegistry::default(),
            limits: LimitController::new(config.total_cap),
            lock: EntryLock::new(),
            journal: Journal::default(),
        };
        Ok((treasury, admin))
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn position(&self, id: PositionId) -> Result<&LockedPosition, BulwarkError> {
        self.positions.get(id)
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn limits(&self) -> &LimitController {
        &self.limits
    }

    pub fn total_locked(&self) -> u128 {
        self.vault.total_locked
    }

    pub fn locked_by_strategy(&self, strategy: StrategyId) -> u128 {
        self.vault.locked_by(strategy)
    }

    pub fn reserved_premium(&self) -> u128 {
        self.vault.reserved_premium
    }

    pub fn backstop_credit(&self) -> u128 {
        self.vault.backstop_credit
    }

    pub fn benchmark(&self) -> u128 {
        self.benchmark
    }

    pub fn total_balance(&self, ledger: &TokenLedger) -> u128 {
        ledger.balance(Token::Settlement, &self.account)
    }

    /// Balance free to back new locks
    pub fn available(&self, ledger: &TokenLedger) -> u128 {
        self.vault.available(self.total_balance(ledger))
    }

    /// Locked positions whose expiration has passed, earliest first
    pub fn expired_locked(&self, now: u64) -> Vec<(PositionId, u64)> {
        let mut expired: Vec<_> = self
            .positions
            .locked()
            .filter(|p| now > p.expiration)
            .map(|p| (p.id, p.expiration))
            .collect();
        expired.sort_by_key(|(id, expiration)| (*expiration, *id));
        expired
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.journal.take()
    }

    /// Totals agree with the Locked positions they summarize
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut locked = 0u128;
        let mut premium = 0u128;
        let mut by_strategy = std::collections::BTreeMap::<StrategyId, u128>::new();
        for p in self.positions.locked() {
            locked = locked.saturating_add(p.negative_exposure);
            premium = premium.saturating_add(p.positive_exposure);
            let slot = by_strategy.entry(p.strategy).or_insert(0);
            *slot = slot.saturating_add(p.negative_exposure);
        }
        if locked != self.vault.total_locked {
            return Err(format!("total_locked {} != sum {}", self.vault.total_locked, locked));
        }
        if premium != self.vault.reserved_premium {
            return Err(format!(
                "reserved_premium {} != sum {}",
                self.vault.reserved_premium, premium
            ));
        }
        let recorded: std::collections::BTreeMap<_, _> = self.vault.locked_by_strategy().collect();
        if recorded != by_strategy {
            return Err(format!("locked_by_strategy {:?} != sums {:?}", recorded, by_strategy));
        }
        Ok(())
    }

    pub fn create(
        &mut self,
        ledger: &mut TokenLedger,
        strategy: StrategyId,
        holder: &AccountId,
        amount: u128,
        period: u64,
        aux: u128,
        now: u64,
    ) -> Result<PositionId, BulwarkError> {
        instructions::process_create(self, ledger, strategy, holder, amount, period, aux, now)
    }

    pub fn settle(
        &mut self,
        ledger: &mut TokenLedger,
        cover: &mut dyn ShortfallCover,
        id: PositionId,
        caller: &AccountId,
        recipient: &AccountId,
        now: u64,
    ) -> Result<u128, BulwarkError> {
        instructions::process_settle(self, ledger, cover, id, caller, recipient, now)
    }

    pub fn unlock(&mut self, id: PositionId, now: u64) -> Result<(), BulwarkError> {
        instructions::process_unlock(self, id, now)
    }

    pub fn replenish(
        &mut self,
        ledger: &mut TokenLedger,
        cover: &mut dyn ShortfallCover,
        now: u64,
    ) -> Result<u128, BulwarkError> {
        instructions::process_replenish(self, ledger, cover, now)
    }

    pub fn withdraw_surplus(
        &mut self,
        cap: &AdminCap,
        ledger: &mut TokenLedger,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), BulwarkError> {
        instructions::process_withdraw_surplus(self, cap, ledger, to, amount)
    }

    pub fn accept_strategy(
        &mut self,
        cap: &AdminCap,
        id: StrategyId,
        module: Arc<dyn Strategy>,
        min_period: u64,
        max_period: u64,
        now: u64,
    ) -> Result<(), BulwarkError> {
        instructions::process_accept_strategy(self, cap, id, module, min_period, max_period, now)
    }

    pub fn retire_strategy(&mut self, cap: &AdminCap, id: StrategyId) -> Result<(), BulwarkError> {
        instructions::process_retire_strategy(self, cap, id)
    }

    pub fn set_strategy_periods(
        &mut self,
        cap: &AdminCap,
        id: StrategyId,
        min_period: u64,
        max_period: u64,
    ) -> Result<(), BulwarkError> {
        instructions::process_set_strategy_periods(self, cap, id, min_period, max_period)
    }

    pub fn set_strategy_limit(&mut self, cap: &AdminCap, id: StrategyId, limit: Option<u128>) -> Result<(), BulwarkError> {
        instructions::process_set_strategy_limit(self, cap, id, limit)
    }

    pub fn set_total_limit(&mut self, cap: &AdminCap, limit: Option<u128>) -> Result<(), BulwarkError> {
        instructions::process_set_total_limit(self, cap, limit)
    }

    pub fn set_benchmark(&mut self, cap: &AdminCap, amount: u128) -> Result<(), BulwarkError> {
        instructions::process_set_benchmark(self, cap, amount)
    }

    pub fn set_backstop_credit(&mut self, cap: &AdminCap, amount: u128) -> Result<(), BulwarkError> {
        instructions::process_set_backstop_credit(self, cap, amount)
    }
}

impl core::fmt::Debug for Treasury {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Treasury")
            .field("account", &self.account)
            .field("vault", &self.vault)
            .field("benchmark", &self.benchmark)
            .field("positions", &self.positions.len())
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

//! Backstop pool state and read-only views

use std::collections::VecDeque;

use bulwark_common::{
    AccountId, AdminCap, BulwarkError, DepositorId, EntryLock, EpochId, Event, Issuer, Journal,
    OrOverflow, PayoutCap, ShortfallCover, Token, TokenLedger, RATE_SCALE,
};
use model_safety::math::{mul_div_floor, sub_u128};

use super::{BackstopConfig, DepositorPosition, Epoch, ShareLedger};
use crate::instructions;

pub struct BackstopPool {
    pub(crate) config: BackstopConfig,
    /// Account holding the pool's risk and settlement tokens
    pub(crate) account: AccountId,
    pub(crate) issuer: Issuer,
    /// Oldest first; the back entry is the current epoch
    pub(crate) epochs: VecDeque<Epoch>,
    pub(crate) next_rate: Option<u128>,
    pub(crate) total_shares: u128,
    /// Settlement tokens in the pool account already owed to depositors
    pub(crate) profit_reserved: u128,
    pub(crate) shares: ShareLedger,
    pub(crate) lock: EntryLock,
    pub(crate) journal: Journal,
}

impl BackstopPool {
    /// Create a pool whose first epoch starts at `now`.
    ///
    /// Returns the pool with its administrative capability and the payout
    /// capability to hand to the treasury.
    pub fn new(
        config: BackstopConfig,
        account: AccountId,
        now: u64,
    ) -> Result<(Self, AdminCap, PayoutCap), BulwarkError> {
        config.validate()?;
        let issuer = Issuer::fresh();
        let admin = issuer.admin_cap();
        let payout = issuer.payout_cap();

        let mut epochs = VecDeque::with_capacity(config.history_len);
        epochs.push_back(Epoch::open(EpochId(1), now, config.initial_rate, 0));

        log::info!(
            "backstop {} opened: epoch 1 at {}, rate {}, window {}s",
            account,
            now,
            config.initial_rate,
            config.window
        );

        let pool = Self {
            config,
            account,
            issuer,
            epochs,
            next_rate: None,
            total_shares: 0,
            profit_reserved: 0,
            shares: ShareLedger::new(),
            lock: EntryLock::new(),
            journal: Journal::default(),
        };
        Ok((pool, admin, payout))
    }

    pub fn config(&self) -> &BackstopConfig {
        &self.config
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn current_epoch(&self) -> &Epoch {
        // Never empty: `new` opens epoch 1 and rollover pushes before evicting.
        &self.epochs[self.epochs.len() - 1]
    }

    pub(crate) fn current_epoch_mut(&mut self) -> &mut Epoch {
        let last = self.epochs.len() - 1;
        &mut self.epochs[last]
    }

    /// Epoch `id` if it is still in the retained history
    pub fn epoch(&self, id: EpochId) -> Option<&Epoch> {
        self.epochs.iter().find(|e| e.id == id)
    }

    pub fn epochs(&self) -> impl Iterator<Item = &Epoch> {
        self.epochs.iter()
    }

    pub fn cumulative_point(&self) -> u128 {
        self.current_epoch().cumulative_point
    }

    pub fn is_window_open(&self, now: u64) -> bool {
        self.current_epoch().window_open(now, self.config.window)
    }

    pub fn epoch_elapsed(&self, now: u64) -> bool {
        self.current_epoch().elapsed(now, self.config.epoch_duration)
    }

    pub fn next_rate(&self) -> Option<u128> {
        self.next_rate
    }

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    pub fn profit_reserved(&self) -> u128 {
        self.profit_reserved
    }

    pub fn depositor(&self, id: DepositorId) -> Result<&DepositorPosition, BulwarkError> {
        self.shares.get(id)
    }

    pub fn depositors(&self) -> impl Iterator<Item = &DepositorPosition> {
        self.shares.iter()
    }

    pub fn share_ledger(&self) -> &ShareLedger {
        &self.shares
    }

    /// Profit `id` would receive from `claim` right now
    pub fn pending_profit(&self, id: DepositorId) -> Result<u128, BulwarkError> {
        self.shares.pending_profit(id, self.cumulative_point())
    }

    pub fn risk_balance(&self, ledger: &TokenLedger) -> u128 {
        ledger.balance(Token::Risk, &self.account)
    }

    /// Settlement tokens held by the pool and not owed to depositors
    pub fn available_profit(&self, ledger: &TokenLedger) -> u128 {
        sub_u128(ledger.balance(Token::Settlement, &self.account), self.profit_reserved)
    }

    /// Risk tokens `shares` would redeem for right now (rounded down)
    pub fn share_value(&self, shares: u128, ledger: &TokenLedger) -> Result<u128, BulwarkError> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        mul_div_floor(shares, self.risk_balance(ledger), self.total_shares).or_overflow()
    }

    /// Settlement tokens the converter would deliver for the whole risk balance
    pub(crate) fn convertible(&self, ledger: &TokenLedger) -> u128 {
        let Some(converter) = self.config.converter else {
            return 0;
        };
        let rate = self.current_epoch().conversion_rate;
        let from_risk =
            mul_div_floor(self.risk_balance(ledger), rate, RATE_SCALE).unwrap_or(u128::MAX);
        from_risk.min(ledger.balance(Token::Settlement, &converter))
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.journal.take()
    }

    /// Bookkeeping consistency: share totals, exit rows and profit reserve
    pub fn check_invariants(&self, ledger: &TokenLedger) -> Result<(), String> {
        if self.shares.total_shares() != self.total_shares {
            return Err(format!(
                "total_shares {} != sum of positions {}",
                self.total_shares,
                self.shares.total_shares()
            ));
        }
        for epoch in &self.epochs {
            let rows = self.shares.out_share_total(epoch.id);
            if rows != epoch.total_share_out {
                return Err(format!(
                    "epoch {} total_share_out {} != rows {}",
                    epoch.id.0, epoch.total_share_out, rows
                ));
            }
        }
        let point = self.cumulative_point();
        let mut owed = 0u128;
        for p in self.shares.iter() {
            owed = owed.saturating_add(self.shares.pending_profit(p.id, point).map_err(|e| e.to_string())?);
        }
        if owed > self.profit_reserved {
            return Err(format!("owed {} exceeds reserve {}", owed, self.profit_reserved));
        }
        let held = ledger.balance(Token::Settlement, &self.account);
        if self.profit_reserved > held {
            return Err(format!("reserve {} exceeds held {}", self.profit_reserved, held));
        }
        let mut prev = 0u128;
        for epoch in &self.epochs {
            if epoch.cumulative_point < prev {
                return Err(format!("point decreased at epoch {}", epoch.id.0));
            }
            prev = epoch.cumulative_point;
        }
        Ok(())
    }

    pub fn provide(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &AccountId,
        depositor: DepositorId,
        amount: u128,
        now: u64,
    ) -> Result<DepositorId, BulwarkError> {
        instructions::process_provide(self, ledger, caller, depositor, amount, now)
    }

    pub fn withdraw(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &AccountId,
        depositor: DepositorId,
        shares: u128,
        now: u64,
    ) -> Result<u128, BulwarkError> {
        instructions::process_withdraw(self, ledger, caller, depositor, shares, now)
    }

    pub fn withdraw_amount(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &AccountId,
        depositor: DepositorId,
        risk_amount: u128,
        now: u64,
    ) -> Result<u128, BulwarkError> {
        instructions::process_withdraw_amount(self, ledger, caller, depositor, risk_amount, now)
    }

    pub fn claim(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &AccountId,
        depositor: DepositorId,
        now: u64,
    ) -> Result<u128, BulwarkError> {
        instructions::process_claim(self, ledger, caller, depositor, now)
    }

    pub fn fix_profit(&mut self, ledger: &TokenLedger, now: u64) -> Result<EpochId, BulwarkError> {
        instructions::process_fix_profit(self, ledger, now)
    }

    pub fn set_next_rate(&mut self, cap: &AdminCap, rate: u128) -> Result<(), BulwarkError> {
        instructions::process_set_next_rate(self, cap, rate)
    }

    pub fn set_converter(&mut self, cap: &AdminCap, converter: Option<AccountId>) -> Result<(), BulwarkError> {
        instructions::process_set_converter(self, cap, converter)
    }
}

impl ShortfallCover for BackstopPool {
    fn pay_out(
        &mut self,
        cap: &PayoutCap,
        ledger: &mut TokenLedger,
        to: &AccountId,
        amount: u128,
        now: u64,
    ) -> Result<(), BulwarkError> {
        instructions::process_pay_out(self, cap, ledger, to, amount, now)
    }

    fn coverage(&self, ledger: &TokenLedger) -> u128 {
        self.available_profit(ledger).saturating_add(self.convertible(ledger))
    }
}

impl core::fmt::Debug for BackstopPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackstopPool")
            .field("account", &self.account)
            .field("epoch", &self.current_epoch().id)
            .field("total_shares", &self.total_shares)
            .field("profit_reserved", &self.profit_reserved)
            .field("depositors", &self.shares.len())
            .finish()
    }
}

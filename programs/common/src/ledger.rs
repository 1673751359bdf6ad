//! Token balances for every account the protocol touches
//!
//! The ledger is the only place value lives. Programs keep bookkeeping
//! (locked amounts, shares, reserves) and move tokens through `transfer`,
//! which either moves the full amount or nothing.

use std::collections::HashMap;

use crate::error::{BulwarkError, OrOverflow};
use crate::types::{AccountId, Token};

#[derive(Debug, Default, Clone)]
pub struct TokenLedger {
    balances: HashMap<(Token, AccountId), u128>,
    supply: HashMap<Token, u128>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, token: Token, account: &AccountId) -> u128 {
        self.balances.get(&(token, *account)).copied().unwrap_or(0)
    }

    pub fn total_supply(&self, token: Token) -> u128 {
        self.supply.get(&token).copied().unwrap_or(0)
    }

    /// Create tokens out of thin air (funding accounts in local runs and tests)
    pub fn mint(&mut self, token: Token, to: &AccountId, amount: u128) -> Result<(), BulwarkError> {
        let supply = self.total_supply(token).checked_add(amount).or_overflow()?;
        let balance = self.balance(token, to).checked_add(amount).or_overflow()?;
        self.supply.insert(token, supply);
        self.balances.insert((token, *to), balance);
        Ok(())
    }

    /// Fail unless `account` holds at least `amount`
    pub fn ensure(&self, token: Token, account: &AccountId, amount: u128) -> Result<(), BulwarkError> {
        let available = self.balance(token, account);
        if available < amount {
            return Err(BulwarkError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Move `amount` from one account to another, all or nothing
    pub fn transfer(
        &mut self,
        token: Token,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), BulwarkError> {
        if amount == 0 || from == to {
            return self.ensure(token, from, amount);
        }
        self.ensure(token, from, amount)?;
        let credited = self.balance(token, to).checked_add(amount).or_overflow()?;
        let debited = self.balance(token, from) - amount;

        self.balances.insert((token, *from), debited);
        self.balances.insert((token, *to), credited);
        log::trace!("transfer {:?} {} {} -> {}", token, amount, from, to);
        Ok(())
    }
}

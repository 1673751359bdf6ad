//! Capability tokens
//!
//! A capability is proof that the holder was handed it by the component that
//! minted it. Fields are private and the types are neither `Clone` nor
//! `Copy`, so the only way to obtain one is from a constructor.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::error::BulwarkError;

static NEXT_ISSUER: AtomicU64 = AtomicU64::new(1);

/// Minting authority owned by a single component instance
#[derive(Debug, PartialEq, Eq)]
pub struct Issuer {
    nonce: u64,
}

/// Grants administrative operations on the issuing component
#[derive(Debug)]
pub struct AdminCap {
    issuer: u64,
}

/// Grants the right to draw shortfall coverage from the issuing backstop
#[derive(Debug)]
pub struct PayoutCap {
    issuer: u64,
}

impl Issuer {
    pub fn fresh() -> Self {
        Self {
            nonce: NEXT_ISSUER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn admin_cap(&self) -> AdminCap {
        AdminCap { issuer: self.nonce }
    }

    pub fn payout_cap(&self) -> PayoutCap {
        PayoutCap { issuer: self.nonce }
    }

    pub fn check_admin(&self, cap: &AdminCap) -> Result<(), BulwarkError> {
        if cap.issuer != self.nonce {
            log::warn!("admin capability from issuer {} rejected by {}", cap.issuer, self.nonce);
            return Err(BulwarkError::Unauthorized);
        }
        Ok(())
    }

    pub fn check_payout(&self, cap: &PayoutCap) -> Result<(), BulwarkError> {
        if cap.issuer != self.nonce {
            log::warn!("payout capability from issuer {} rejected by {}", cap.issuer, self.nonce);
            return Err(BulwarkError::Unauthorized);
        }
        Ok(())
    }
}

impl AdminCap {
    pub fn issuer(&self) -> u64 {
        self.issuer
    }
}

impl PayoutCap {
    pub fn issuer(&self) -> u64 {
        self.issuer
    }
}

//! Safe arithmetic helpers - no unwrap, no panics, no as casts

use primitive_types::U256;

/// Add u128 with saturation at MAX
pub fn add_u128(a: u128, b: u128) -> u128 {
    a.saturating_add(b)
}

/// Subtract u128 with saturation at 0
pub fn sub_u128(a: u128, b: u128) -> u128 {
    a.saturating_sub(b)
}

/// Multiply u128 with saturation
pub fn mul_u128(a: u128, b: u128) -> u128 {
    a.saturating_mul(b)
}

/// Divide u128 (returns 0 if divisor is 0)
pub fn div_u128(a: u128, b: u128) -> u128 {
    if b == 0 {
        0
    } else {
        a / b
    }
}

/// Minimum of two u128
pub fn min_u128(a: u128, b: u128) -> u128 {
    if a < b { a } else { b }
}

/// Maximum of two u128
pub fn max_u128(a: u128, b: u128) -> u128 {
    if a > b { a } else { b }
}

/// floor(a * b / d) with a 256-bit product.
///
/// `None` on zero divisor or when the quotient does not fit in u128.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    let (q, _) = mul_div(a, b, d)?;
    narrow(q)
}

/// ceil(a * b / d) with a 256-bit product.
///
/// `None` on zero divisor or when the quotient does not fit in u128.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Option<u128> {
    let (q, exact) = mul_div(a, b, d)?;
    let q = narrow(q)?;
    if exact {
        Some(q)
    } else {
        q.checked_add(1)
    }
}

fn mul_div(a: u128, b: u128, d: u128) -> Option<(U256, bool)> {
    if d == 0 {
        return None;
    }
    let p = U256::from(a).checked_mul(U256::from(b))?;
    let d = U256::from(d);
    let q = p.checked_div(d)?;
    let exact = (p % d).is_zero();
    Some((q, exact))
}

fn narrow(v: U256) -> Option<u128> {
    if v > U256::from(u128::MAX) {
        None
    } else {
        Some(v.low_u128())
    }
}

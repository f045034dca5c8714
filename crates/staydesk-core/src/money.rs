//! # Money Module
//!
//! Provides the `Money` type for room rates, stay amounts and GST.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    7500.10 × 3 × 0.09 = 2025.0269999999998  ❌                          │
//! │                                                                         │
//! │  CGST + SGST and IGST are computed on different branches. With floats   │
//! │  the two branches can drift apart by a paisa on the same stay.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    750010 × 3 = 2250030 paise, tax rounded once, explicitly             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use staydesk_core::money::Money;
//!
//! let rate = Money::from_major(8000);       // ₹8000.00 per night
//! let stay = rate.multiply_quantity(2);     // ₹16000.00
//! assert_eq!(stay.minor(), 1_600_000);
//!
//! let parsed = Money::parse_decimal("7500.50").unwrap();
//! assert_eq!(parsed.minor(), 750_050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::TaxRate;

/// Minor units per major unit (paise per rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Where Money is Used
/// ```text
/// Room.rate ──► × nights ──► PriceBreakdown.base_amount
///                                 │
///                                 ├──► calculate_tax(slab) ──► CGST/SGST/IGST
///                                 │
///                                 └──► + tax ──► PriceBreakdown.total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (paise).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units (rupees).
    ///
    /// ```rust
    /// use staydesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(7500).minor(), 750_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Parses a plain decimal amount such as `"8000"`, `"7500.5"` or
    /// `"7500.50"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two fractional digits (no silent rounding of rates)
    /// - No thousands separators, no currency symbol
    pub fn parse_decimal(input: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidAmount(input.to_string());

        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty()
            || !major_str.bytes().all(|b| b.is_ascii_digit())
            || minor_str.len() > 2
            || !minor_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| invalid())?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor_str.parse().map_err(|_| invalid())?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -total } else { total }))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at `rate`, rounding half away from zero to the paisa.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount × bps ± 5000) / 10000`
    ///
    /// ```rust
    /// use staydesk_core::money::Money;
    /// use staydesk_core::types::TaxRate;
    ///
    /// let base = Money::from_major(16000);
    /// let cgst = base.calculate_tax(TaxRate::from_bps(900)); // 9%
    /// assert_eq!(cgst, Money::from_major(1440));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_minor(rounded as i64)
    }

    /// Multiplies money by a count (nights, rooms).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the amount as a plain decimal string, e.g. `"18880.00"`.
    ///
    /// This is the wire representation the booking service expects.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the rupee amount. Locale-aware grouping is a screen concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

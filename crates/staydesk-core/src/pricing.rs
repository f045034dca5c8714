//! # Stay Pricing
//!
//! The single place where a stay's price and GST are computed.
//!
//! ## GST Slabs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Nightly rate        Combined   WithGst (intra-state)   WithIgst        │
//! │  ─────────────────   ────────   ─────────────────────   ─────────       │
//! │  rate <  ₹7500         12%      CGST 6%  + SGST 6%      IGST 12%        │
//! │  rate >= ₹7500         18%      CGST 9%  + SGST 9%      IGST 18%        │
//! │                                                                         │
//! │  WithoutGst: no tax component at all                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The slab is chosen from the **nightly rate**, never from the stay total.
//!
//! ## Rounding
//! The per-component (half-slab) tax is rounded once to the paisa. CGST and
//! SGST are both that value and IGST is twice it, so the intra-state and
//! inter-state totals are always identical for the same stay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{GstOption, TaxRate};

/// Nightly rate at or above which the higher GST slab applies.
pub const GST_THRESHOLD: Money = Money::from_major(7500);

/// Combined GST rate for rooms at or above [`GST_THRESHOLD`].
pub const HIGH_SLAB: TaxRate = TaxRate::from_percent(18);

/// Combined GST rate for rooms below [`GST_THRESHOLD`].
pub const LOW_SLAB: TaxRate = TaxRate::from_percent(12);

// =============================================================================
// Price Breakdown
// =============================================================================

/// Tax components of a stay. Exactly one shape applies per regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxComponents {
    None,
    Split { cgst: Money, sgst: Money },
    Integrated { igst: Money },
}

impl TaxComponents {
    pub fn total(&self) -> Money {
        match *self {
            TaxComponents::None => Money::zero(),
            TaxComponents::Split { cgst, sgst } => cgst + sgst,
            TaxComponents::Integrated { igst } => igst,
        }
    }
}

/// Full price of a stay.
///
/// ## Invariant
/// `total_amount == base_amount + tax.total()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nights: u32,
    pub rate: Money,
    pub base_amount: Money,
    pub gst_option: GstOption,
    /// Rate shown next to each tax line: 9/6 per CGST/SGST component,
    /// 18/12 for IGST, 0 without GST.
    pub gst_rate: TaxRate,
    pub tax: TaxComponents,
    pub total_amount: Money,
}

impl PriceBreakdown {
    /// Whole GST percent shown on the invoice line.
    pub fn gst_percent(&self) -> u32 {
        self.gst_rate.percent()
    }

    pub fn tax_amount(&self) -> Money {
        self.tax.total()
    }

    pub fn cgst(&self) -> Money {
        match self.tax {
            TaxComponents::Split { cgst, .. } => cgst,
            _ => Money::zero(),
        }
    }

    pub fn sgst(&self) -> Money {
        match self.tax {
            TaxComponents::Split { sgst, .. } => sgst,
            _ => Money::zero(),
        }
    }

    pub fn igst(&self) -> Money {
        match self.tax {
            TaxComponents::Integrated { igst } => igst,
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Calculations
// =============================================================================

/// Nights between two dates, clamped at zero.
///
/// A check-out on or before check-in yields 0; the validator rejects such
/// stays, this function does not.
///
/// ```rust
/// use chrono::NaiveDate;
/// use staydesk_core::pricing::nights;
///
/// let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
/// assert_eq!(nights(d("2026-10-20"), d("2026-10-23")), 3);
/// assert_eq!(nights(d("2026-10-20"), d("2026-10-20")), 0);
/// assert_eq!(nights(d("2026-10-20"), d("2026-10-18")), 0);
/// ```
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Combined GST slab for a nightly rate.
pub fn gst_slab(rate: Money) -> TaxRate {
    if rate >= GST_THRESHOLD {
        HIGH_SLAB
    } else {
        LOW_SLAB
    }
}

/// Computes the price of `nights` at `rate` under `gst_option`.
///
/// ```rust
/// use staydesk_core::money::Money;
/// use staydesk_core::pricing::compute_price;
/// use staydesk_core::types::GstOption;
///
/// let price = compute_price(Money::from_major(8000), 2, GstOption::WithGst);
/// assert_eq!(price.base_amount, Money::from_major(16000));
/// assert_eq!(price.gst_percent(), 9);
/// assert_eq!(price.cgst(), Money::from_major(1440));
/// assert_eq!(price.total_amount, Money::from_major(18880));
/// ```
///
/// Amounts are unchecked: `rate × nights` plus tax must fit in an i64 of
/// paise (about ₹7.8 × 10^16 at 18%). Use [`try_compute_price`] for rates
/// that arrive from outside.
pub fn compute_price(rate: Money, nights: u32, gst_option: GstOption) -> PriceBreakdown {
    let base_amount = rate * nights;
    let slab = gst_slab(rate);
    let component = base_amount.calculate_tax(slab.half());

    let (gst_rate, tax) = match gst_option {
        GstOption::WithoutGst => (TaxRate::zero(), TaxComponents::None),
        GstOption::WithGst => (
            slab.half(),
            TaxComponents::Split {
                cgst: component,
                sgst: component,
            },
        ),
        GstOption::WithIgst => (
            slab,
            TaxComponents::Integrated {
                igst: component * 2i64,
            },
        ),
    };

    PriceBreakdown {
        nights,
        rate,
        base_amount,
        gst_option,
        gst_rate,
        tax,
        total_amount: base_amount + tax.total(),
    }
}

/// [`compute_price`] with the arithmetic checked for overflow.
pub fn try_compute_price(rate: Money, nights: u32, gst_option: GstOption) -> CoreResult<PriceBreakdown> {
    let overflow = || CoreError::PriceOverflow { rate, nights };

    let base = rate
        .minor()
        .checked_mul(i64::from(nights))
        .ok_or_else(overflow)?;
    // Tax never exceeds twice the half-slab component, so this bounds the total.
    let component = Money::from_minor(base).calculate_tax(gst_slab(rate).half());
    component
        .minor()
        .checked_mul(2)
        .and_then(|tax| tax.checked_add(base))
        .ok_or_else(overflow)?;

    Ok(compute_price(rate, nights, gst_option))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: [GstOption; 3] = [GstOption::WithoutGst, GstOption::WithGst, GstOption::WithIgst];

    fn rates() -> Vec<Money> {
        vec![
            Money::from_major(1),
            Money::from_major(2500),
            Money::from_minor(749_999),
            GST_THRESHOLD,
            Money::from_minor(750_001),
            Money::from_major(8000),
            Money::from_minor(1_234_567),
        ]
    }

    #[test]
    fn test_high_slab_with_gst() {
        let price = compute_price(Money::from_major(8000), 2, GstOption::WithGst);
        assert_eq!(price.nights, 2);
        assert_eq!(price.base_amount, Money::from_major(16000));
        assert_eq!(price.gst_percent(), 9);
        assert_eq!(price.cgst(), Money::from_major(1440));
        assert_eq!(price.sgst(), Money::from_major(1440));
        assert_eq!(price.igst(), Money::zero());
        assert_eq!(price.total_amount, Money::from_major(18880));
    }

    #[test]
    fn test_low_slab_with_igst() {
        let price = compute_price(Money::from_major(5000), 3, GstOption::WithIgst);
        assert_eq!(price.base_amount, Money::from_major(15000));
        assert_eq!(price.gst_percent(), 12);
        assert_eq!(price.igst(), Money::from_major(1800));
        assert_eq!(price.cgst(), Money::zero());
        assert_eq!(price.total_amount, Money::from_major(16800));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(gst_slab(GST_THRESHOLD), HIGH_SLAB);
        assert_eq!(gst_slab(Money::from_minor(749_999)), LOW_SLAB);
    }

    #[test]
    fn test_without_gst_total_is_base() {
        for rate in rates() {
            for n in 0..=10 {
                let price = compute_price(rate, n, GstOption::WithoutGst);
                assert_eq!(price.total_amount, rate * n);
                assert_eq!(price.tax_amount(), Money::zero());
                assert_eq!(price.gst_percent(), 0);
            }
        }
    }

    #[test]
    fn test_with_gst_multiplier() {
        // Whole-rupee rates: tax is exact, no rounding involved.
        for major in [1000, 5000, 7499, 7500, 8000, 20000] {
            let rate = Money::from_major(major);
            for n in 1..=7u32 {
                let price = compute_price(rate, n, GstOption::WithGst);
                let base = major * n as i64;
                let expected = if major >= 7500 { base * 118 } else { base * 112 };
                assert_eq!(price.total_amount.minor(), expected, "rate {major} nights {n}");
            }
        }
    }

    #[test]
    fn test_with_gst_within_rounding_epsilon() {
        for rate in rates() {
            for n in 1..=5u32 {
                let price = compute_price(rate, n, GstOption::WithGst);
                let multiplier = if rate >= GST_THRESHOLD { 118 } else { 112 };
                let exact_x100 = price.base_amount.minor() as i128 * multiplier;
                let diff = (price.total_amount.minor() as i128 * 100 - exact_x100).abs();
                // Each of the two components can be off by at most half a paisa.
                assert!(diff <= 100, "rate {rate} nights {n}: diff {diff}");
            }
        }
    }

    #[test]
    fn test_cgst_equals_sgst() {
        for rate in rates() {
            for n in 0..=5 {
                let price = compute_price(rate, n, GstOption::WithGst);
                assert_eq!(price.cgst(), price.sgst());
            }
        }
    }

    #[test]
    fn test_igst_total_equals_split_total() {
        for rate in rates() {
            for n in 0..=5 {
                let split = compute_price(rate, n, GstOption::WithGst);
                let integrated = compute_price(rate, n, GstOption::WithIgst);
                assert_eq!(split.total_amount, integrated.total_amount);
                assert_eq!(split.tax_amount(), integrated.igst());
            }
        }
    }

    #[test]
    fn test_total_is_base_plus_tax() {
        for rate in rates() {
            for option in OPTIONS {
                let price = compute_price(rate, 3, option);
                assert_eq!(price.total_amount, price.base_amount + price.tax_amount());
            }
        }
    }

    #[test]
    fn test_slab_follows_rate_not_total() {
        // 10 nights at ₹1000 is ₹10000 total but still the 12% slab.
        let price = compute_price(Money::from_major(1000), 10, GstOption::WithIgst);
        assert_eq!(price.gst_percent(), 12);
    }

    #[test]
    fn test_try_compute_price_rejects_overflow() {
        let extreme = Money::from_minor(i64::MAX / 2);
        assert!(matches!(
            try_compute_price(extreme, 3, GstOption::WithGst),
            Err(CoreError::PriceOverflow { nights: 3, .. })
        ));
        assert!(try_compute_price(Money::from_minor(i64::MAX / 100), 1, GstOption::WithIgst).is_ok());

        let price = try_compute_price(Money::from_major(8000), 2, GstOption::WithGst).unwrap();
        assert_eq!(price, compute_price(Money::from_major(8000), 2, GstOption::WithGst));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let price = compute_price(Money::from_major(8000), 1, GstOption::WithGst);
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json["baseAmount"], 800_000);
        assert_eq!(json["tax"]["kind"], "split");
        assert_eq!(json["gstOption"], "withGST");
    }
}

//! Merges live exchange quotes into stored listings.
//!
//! Pure and idempotent: the caller decides when the result is persisted.

use crate::domain::entities::{Company, Good, QuoteBook};
use crate::domain::pricing;

/// Overwrite live prices and recompute guild pay for every good that has a
/// quote; goods without one are returned unchanged, previous values intact.
pub fn apply_quotes(goods: &[Good], quotes: &QuoteBook) -> Vec<Good> {
    goods
        .iter()
        .map(|good| match quotes.get(&good.produced_good) {
            Some(quote) => {
                let mut updated = good.clone();
                updated.live_exc_price = whole_units(quote.current_price);
                updated.live_avg_price = whole_units(quote.average_price);
                updated.guildees_pay = pricing::guildees_pay(
                    updated.live_exc_price,
                    updated.discount_percent,
                    updated.guild_min,
                    updated.guild_max,
                );
                updated
            }
            None => good.clone(),
        })
        .collect()
}

/// A company with its goods repriced against the quote book.
pub fn price_company(company: &Company, quotes: &QuoteBook) -> Company {
    Company {
        goods: apply_quotes(&company.goods, quotes),
        ..company.clone()
    }
}

/// The whole dataset repriced, company order preserved.
pub fn price_dataset(companies: &[Company], quotes: &QuoteBook) -> Vec<Company> {
    companies
        .iter()
        .map(|company| price_company(company, quotes))
        .collect()
}

/// Quotes arrive in whole currency units but may still carry a fractional
/// part after the cents conversion; listing prices truncate it.
fn whole_units(price: f64) -> u32 {
    if price.is_finite() {
        price.max(0.0).trunc() as u32
    } else {
        0
    }
}

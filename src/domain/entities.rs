use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of a produced good; identity key within one company's listings.
pub type GoodName = String;

/// One sell offer: a single good a company sells at a guild-negotiated price.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Good {
    pub produced_good: GoodName,
    /// Provenance tag; empty when the sheet held the "Select Planet" placeholder.
    #[serde(default)]
    pub planet_produced: String,
    /// Latest exchange price in whole currency units; 0 until reconciled.
    pub live_exc_price: u32,
    pub live_avg_price: u32,
    /// Price ceiling the company opted into; 0 means unset.
    pub guild_max: u32,
    /// Price floor the company opted into; 0 means unset.
    pub guild_min: u32,
    pub discount_percent: u32,
    /// Flat discount; stored and exported but not part of the computed price.
    pub discount_fixed: u32,
    /// What guild members pay. Derived from the live price; never hand-edited.
    pub guildees_pay: f64,
}

/// A player company and the listings it offers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// Single label from the sheet's industry column.
    pub industry: String,
    /// Ordered and duplicate-free; falls back to `[industry]` when the sheet
    /// yields nothing usable.
    pub professions: Vec<String>,
    /// UTC offset in minutes; local time is derived on demand, never stored.
    pub timezone_offset_minutes: i32,
    pub goods: Vec<Good>,
}

/// Live market quote for one good, in whole currency units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current_price: f64,
    pub average_price: f64,
}

/// Quote lookup keyed by good name, as returned by the exchange client.
pub type QuoteBook = HashMap<GoodName, Quote>;

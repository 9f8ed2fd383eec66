//! Guild price math: percent discount, tiered ceiling rounding, min/max bounds.

/// Round a discounted price up to the granularity of its magnitude tier.
///
/// The tier is keyed on the discounted value itself, and rounding is always
/// a ceiling: after quantization the guild never pays less than the
/// discount formula implies.
pub fn round_up_tiered(price: f64) -> f64 {
    if price < 50.0 {
        (price * 2.0).ceil() / 2.0
    } else if price < 100.0 {
        price.ceil()
    } else if price < 1000.0 {
        (price / 10.0).ceil() * 10.0
    } else if price < 5000.0 {
        (price / 50.0).ceil() * 50.0
    } else if price < 10_000.0 {
        (price / 100.0).ceil() * 100.0
    } else if price < 50_000.0 {
        (price / 500.0).ceil() * 500.0
    } else {
        (price / 1000.0).ceil() * 1000.0
    }
}

/// Clamp a computed price into the company's opted-in floor/ceiling.
/// A bound of 0 means "unset" and never clamps.
pub fn apply_price_bounds(price: f64, guild_min: u32, guild_max: u32) -> f64 {
    if guild_min > 0 && price < f64::from(guild_min) {
        f64::from(guild_min)
    } else if guild_max > 0 && price > f64::from(guild_max) {
        f64::from(guild_max)
    } else {
        price
    }
}

/// What guild members pay for a good: live exchange price minus the percent
/// discount, tier-rounded upward, then bounded.
///
/// Discounts outside [0, 100] are clamped before use.
pub fn guildees_pay(
    live_exc_price: u32,
    discount_percent: u32,
    guild_min: u32,
    guild_max: u32,
) -> f64 {
    let discount = f64::from(discount_percent.min(100));
    let discounted = f64::from(live_exc_price) * (1.0 - discount / 100.0);
    apply_price_bounds(round_up_tiered(discounted), guild_min, guild_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_units_below_fifty() {
        assert_eq!(round_up_tiered(34.4), 34.5);
        assert_eq!(round_up_tiered(34.5), 34.5);
        assert_eq!(round_up_tiered(34.6), 35.0);
        assert_eq!(round_up_tiered(0.0), 0.0);
    }

    #[test]
    fn rounds_each_tier_upward() {
        assert_eq!(round_up_tiered(62.1), 63.0);
        assert_eq!(round_up_tiered(101.0), 110.0);
        assert_eq!(round_up_tiered(1201.0), 1250.0);
        assert_eq!(round_up_tiered(5050.0), 5100.0);
        assert_eq!(round_up_tiered(10_001.0), 10_500.0);
        assert_eq!(round_up_tiered(50_001.0), 51_000.0);
    }

    #[test]
    fn already_quantized_values_stay_put() {
        assert_eq!(round_up_tiered(90.0), 90.0);
        assert_eq!(round_up_tiered(100.0), 100.0);
        assert_eq!(round_up_tiered(4500.0), 4500.0);
        assert_eq!(round_up_tiered(85_000.0), 85_000.0);
    }

    #[test]
    fn no_decrease_across_tier_boundaries() {
        // Widening granularity must never make the rounded price drop as the
        // discounted value crosses into the next tier.
        for boundary in [50.0, 100.0, 1000.0, 5000.0, 10_000.0, 50_000.0] {
            let below = round_up_tiered(boundary - 0.25);
            let at = round_up_tiered(boundary);
            assert!(at >= below, "tier boundary {boundary} decreased: {below} -> {at}");
        }
    }

    #[test]
    fn ten_percent_off_one_hundred_is_ninety() {
        assert_eq!(guildees_pay(100, 10, 0, 0), 90.0);
    }

    #[test]
    fn twenty_percent_off_forty_three_rounds_to_half_unit() {
        // 43 * 0.8 = 34.4, tier granularity 0.5, ceiling to 34.5.
        assert_eq!(guildees_pay(43, 20, 0, 0), 34.5);
    }

    #[test]
    fn zero_discount_is_identity_under_rounding() {
        assert_eq!(guildees_pay(100, 0, 0, 0), 100.0);
        assert_eq!(guildees_pay(23, 0, 0, 0), 23.0);
    }

    #[test]
    fn floor_lifts_price_when_set() {
        assert_eq!(apply_price_bounds(40.0, 50, 150), 50.0);
        assert_eq!(guildees_pay(100, 50, 60, 0), 60.0);
    }

    #[test]
    fn ceiling_caps_price_when_set() {
        assert_eq!(apply_price_bounds(200.0, 50, 150), 150.0);
        assert_eq!(guildees_pay(1000, 0, 0, 900), 900.0);
    }

    #[test]
    fn zero_bounds_never_clamp() {
        assert_eq!(apply_price_bounds(100.0, 0, 0), 100.0);
        assert_eq!(apply_price_bounds(0.5, 0, 0), 0.5);
    }

    #[test]
    fn price_stays_within_consistent_bounds() {
        for live in [10_u32, 43, 100, 999, 4321, 87_654] {
            for discount in [0_u32, 5, 20, 99] {
                let price = guildees_pay(live, discount, 30, 90_000);
                assert!(price >= 30.0);
                assert!(price <= 90_000.0);
            }
        }
    }

    #[test]
    fn out_of_range_discount_is_clamped() {
        // 150% would go negative; clamped to 100% -> price 0.
        assert_eq!(guildees_pay(100, 150, 0, 0), 0.0);
    }
}

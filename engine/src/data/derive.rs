// Derived economics of a quote: tenor, markup, P&L and side.
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days from quote to maturity, rounded up. A maturity before the quote
/// is treated as invalid rather than as a negative tenor.
pub fn tenor_days(rfq_timestamp: Option<DateTime<Utc>>, maturity_date: Option<DateTime<Utc>>) -> Option<i64> {
    let (rfq, maturity) = (rfq_timestamp?, maturity_date?);
    let diff_millis = (maturity - rfq).num_milliseconds();
    let days = (diff_millis as f64 / MILLIS_PER_DAY).ceil();
    if days >= 0.0 {
        Some(days as i64)
    } else {
        None
    }
}

/// Client spread in basis points. The forward-rate formula wins whenever it is
/// usable; the yield differential is only a fallback.
pub fn markup_bps(
    fwd_client: Option<f64>,
    fwd: Option<f64>,
    yield_client: Option<f64>,
    yield_ccy: Option<f64>,
) -> Option<f64> {
    if let (Some(fwd_client), Some(fwd)) = (fwd_client, fwd) {
        if fwd != 0.0 {
            return Some((fwd_client - fwd) / fwd * 10_000.0);
        }
    }
    match (yield_client, yield_ccy) {
        (Some(yield_client), Some(yield_ccy)) => Some((yield_client - yield_ccy) * 10_000.0),
        _ => None,
    }
}

/// P&L in home currency.
///
/// When the parity does not mention the home currency, the quote-currency P&L
/// is multiplied by the spot rate. This is an approximation, not a cross-rate
/// conversion.
pub fn pl_home_currency(
    is_buy: bool,
    fwd_client: Option<f64>,
    fwd: Option<f64>,
    notional: f64,
    parity: &str,
    spot_fx: Option<f64>,
    home_currency: &str,
) -> Option<f64> {
    let (fwd_client, fwd) = (fwd_client?, fwd?);
    let pl_quote = if is_buy {
        (fwd_client - fwd) * notional
    } else {
        (fwd - fwd_client) * notional
    };

    let is_home_pair = parity
        .to_uppercase()
        .contains(&home_currency.to_uppercase());
    match spot_fx {
        Some(spot) if !is_home_pair && spot != 0.0 => Some(pl_quote * spot),
        _ => Some(pl_quote),
    }
}

pub fn is_buy_side(side: &str) -> bool {
    let normalized = side.trim().to_uppercase();
    normalized == "COMPRA" || normalized == "BUY"
}

/// Falls back to the blotter side when the side cell is blank or absent. With
/// neither column present the quote counts as a buy.
pub fn resolve_is_buy(side: Option<&str>, side_blotter: Option<&str>) -> bool {
    match (side, side_blotter) {
        (Some(side), _) if !side.trim().is_empty() => is_buy_side(side),
        (_, Some(blotter)) => is_buy_side(blotter),
        (Some(side), None) => is_buy_side(side),
        (None, None) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_tenor_rounds_partial_days_up() {
        assert_eq!(tenor_days(at(2024, 1, 15, 10), at(2024, 2, 15, 0)), Some(31));
        assert_eq!(tenor_days(at(2024, 1, 15, 0), at(2024, 2, 15, 0)), Some(31));
        assert_eq!(tenor_days(at(2024, 1, 15, 0), at(2024, 1, 15, 0)), Some(0));
    }

    #[test]
    fn test_tenor_same_day_maturity_earlier_hour_is_zero() {
        // -10h rounds up to -0, which is still a valid zero tenor
        assert_eq!(tenor_days(at(2024, 1, 15, 10), at(2024, 1, 15, 0)), Some(0));
    }

    #[test]
    fn test_tenor_past_maturity_is_none() {
        assert_eq!(tenor_days(at(2024, 2, 15, 0), at(2024, 1, 15, 0)), None);
    }

    #[test]
    fn test_tenor_missing_dates_is_none() {
        assert_eq!(tenor_days(None, at(2024, 1, 15, 0)), None);
        assert_eq!(tenor_days(at(2024, 1, 15, 0), None), None);
    }

    #[test]
    fn test_markup_primary_formula() {
        let markup = markup_bps(Some(101.0), Some(100.0), Some(0.05), Some(0.04)).unwrap();
        assert!((markup - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_falls_back_to_yields_when_fwd_is_zero() {
        let markup = markup_bps(Some(101.0), Some(0.0), Some(0.05), Some(0.04)).unwrap();
        assert!((markup - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_falls_back_when_a_forward_is_missing() {
        let markup = markup_bps(None, Some(5.0), Some(0.06), Some(0.05)).unwrap();
        assert!((markup - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_none_without_inputs() {
        assert_eq!(markup_bps(Some(1.0), Some(0.0), None, Some(0.04)), None);
        assert_eq!(markup_bps(None, None, None, None), None);
    }

    #[test]
    fn test_pl_sign_flips_with_side() {
        let buy = pl_home_currency(true, Some(5.10), Some(5.00), 1000.0, "USD/BRL", None, "BRL").unwrap();
        let sell = pl_home_currency(false, Some(5.10), Some(5.00), 1000.0, "USD/BRL", None, "BRL").unwrap();
        assert!((buy - 100.0).abs() < 1e-9);
        assert!((sell + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pl_converts_non_home_pair_with_spot() {
        let pl = pl_home_currency(true, Some(1.10), Some(1.08), 1000.0, "EUR/USD", Some(5.0), "BRL").unwrap();
        assert!((pl - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pl_home_pair_match_is_case_insensitive() {
        let pl = pl_home_currency(true, Some(5.10), Some(5.00), 1000.0, "usd/brl", Some(5.0), "BRL").unwrap();
        assert!((pl - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pl_non_home_pair_without_usable_spot_is_unconverted() {
        let no_spot = pl_home_currency(true, Some(1.10), Some(1.08), 1000.0, "EUR/USD", None, "BRL").unwrap();
        let zero_spot = pl_home_currency(true, Some(1.10), Some(1.08), 1000.0, "EUR/USD", Some(0.0), "BRL").unwrap();
        assert!((no_spot - 20.0).abs() < 1e-9);
        assert!((zero_spot - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_pl_requires_both_forwards() {
        assert_eq!(pl_home_currency(true, None, Some(5.0), 1000.0, "USD/BRL", None, "BRL"), None);
        assert_eq!(pl_home_currency(true, Some(5.0), None, 1000.0, "USD/BRL", None, "BRL"), None);
    }

    #[test]
    fn test_side_text() {
        assert!(is_buy_side("compra"));
        assert!(is_buy_side(" BUY "));
        assert!(!is_buy_side("Venda"));
        assert!(!is_buy_side("SELL"));
        assert!(!is_buy_side(""));
        assert!(!is_buy_side("B"));
    }

    #[test]
    fn test_resolve_is_buy_fallbacks() {
        assert!(resolve_is_buy(Some("BUY"), Some("SELL")));
        assert!(resolve_is_buy(Some(""), Some("Compra")));
        assert!(!resolve_is_buy(None, Some("Venda")));
        assert!(!resolve_is_buy(Some(""), None));
        assert!(resolve_is_buy(None, None));
    }
}

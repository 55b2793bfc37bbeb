//! Integration tests for the analytics facade.
//!
//! NIFTY-style weekly contracts exercised through the public API: single
//! legs, straddles, strangles and the fallback chain.

use options_analytics::pricing::{price_and_greeks, years_from_days};
use options_analytics::{
    ContractInput, MultiLegCombinator, OptionType, RiskLevel, SingleLegAnalyzer,
    VolatilitySource,
};
use proptest::prelude::*;

const SPOT: f64 = 26100.0;
const RATE: f64 = 0.07;

fn contract(strike: f64, premium: f64, kind: OptionType, days: f64) -> ContractInput {
    ContractInput::new(SPOT, strike, premium, kind, days, RATE)
}

#[test]
fn test_atm_weekly_call() {
    let analyzer = SingleLegAnalyzer::default();
    let result = analyzer
        .analyze(&contract(26100.0, 150.0, OptionType::Call, 5.0))
        .unwrap();

    for value in [
        result.delta,
        result.gamma,
        result.theta,
        result.vega,
        result.rho,
    ] {
        assert!(value.is_finite());
    }
    assert!(result.theoretical_price > 0.0);
    assert!(result.implied_volatility.is_some());
    assert!(result.volatility_used > 0.0);
    assert!(result.delta > 0.0 && result.delta < 1.0);
}

#[test]
fn test_atm_straddle() {
    let combinator = MultiLegCombinator::default();
    let result = combinator
        .straddle(
            &contract(26100.0, 150.0, OptionType::Call, 5.0),
            &contract(26100.0, 120.0, OptionType::Put, 5.0),
        )
        .unwrap();

    assert!(result.combined.delta.abs() < 0.5);
    assert_eq!(result.combined.market_price, 270.0);
    assert_eq!(
        result.combined.risk_level,
        result.ce.risk_level.max(result.pe.risk_level)
    );
}

#[test]
fn test_strangle_vs_straddle() {
    let combinator = MultiLegCombinator::default();
    let straddle = combinator
        .straddle(
            &contract(26100.0, 150.0, OptionType::Call, 5.0),
            &contract(26100.0, 120.0, OptionType::Put, 5.0),
        )
        .unwrap();
    let strangle = combinator
        .strangle(
            &contract(26200.0, 120.0, OptionType::Call, 5.0),
            &contract(26000.0, 100.0, OptionType::Put, 5.0),
        )
        .unwrap();

    assert!(strangle.combined.market_price < straddle.combined.market_price);
    assert!(strangle.combined.gamma < straddle.combined.gamma);
}

#[test]
fn test_expiry_drives_risk() {
    let analyzer = SingleLegAnalyzer::default();
    let monthly = analyzer
        .analyze(&contract(26100.0, 450.0, OptionType::Call, 30.0))
        .unwrap();
    let near = analyzer
        .analyze(&contract(26100.0, 90.0, OptionType::Call, 2.0))
        .unwrap();

    assert_ne!(near.risk_level, RiskLevel::Safe);
    assert_eq!(near.risk_level, RiskLevel::Danger);
    assert!(near.risk_level >= monthly.risk_level);
}

#[test]
fn test_same_contract_riskier_near_expiry() {
    // Only days to expiry changes between the two runs.
    let analyzer = SingleLegAnalyzer::default();
    let monthly = analyzer
        .analyze(&contract(26100.0, 450.0, OptionType::Call, 30.0))
        .unwrap();
    let near = analyzer
        .analyze(&contract(26100.0, 450.0, OptionType::Call, 2.0))
        .unwrap();

    assert_eq!(monthly.risk_level, RiskLevel::Safe);
    assert_eq!(near.risk_level, RiskLevel::Danger);
    assert!(near.risk_level > monthly.risk_level);
}

#[test]
fn test_premium_above_arbitrage_bound() {
    let analyzer = SingleLegAnalyzer::default();
    let result = analyzer
        .analyze(&contract(26100.0, 30000.0, OptionType::Call, 5.0))
        .unwrap();

    assert!(!result.iv_converged);
    assert!(result.iv_used_fallback);
    assert!(result.volatility_used > 0.0);
    assert_eq!(result.volatility_source, VolatilitySource::Default);
}

#[test]
fn test_history_backs_failed_solve() {
    let history = vec![25900.0, 26050.0, 25980.0, 26120.0, 26100.0, 26210.0];
    let input = contract(26100.0, 30000.0, OptionType::Call, 5.0).with_history(history);
    let result = SingleLegAnalyzer::default().analyze(&input).unwrap();

    assert!(result.iv_used_fallback);
    assert_eq!(result.volatility_source, VolatilitySource::Historical);
    assert_eq!(result.historical_volatility, Some(result.volatility_used));
}

#[test]
fn test_put_call_parity_at_solved_volatilities() {
    // Priced at one shared vol, call minus put equals S - K e^(-rT).
    let t = years_from_days(5.0);
    let call = price_and_greeks(SPOT, 26100.0, t, RATE, 0.11, OptionType::Call);
    let put = price_and_greeks(SPOT, 26100.0, t, RATE, 0.11, OptionType::Put);
    let forward_gap = SPOT - 26100.0 * (-RATE * t).exp();
    assert!((call.price - put.price - forward_gap).abs() < 1e-8);
}

proptest! {
    #[test]
    fn prop_price_difference_identity(
        moneyness in 0.8f64..1.2,
        premium in 0.0f64..2000.0,
        days in 0.0f64..90.0,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionType::Call } else { OptionType::Put };
        let input = contract(SPOT * moneyness, premium, kind, days);
        let result = SingleLegAnalyzer::default().analyze(&input).unwrap();

        prop_assert_eq!(result.price_difference, result.market_price - result.theoretical_price);
        prop_assert!(result.volatility_used > 0.0);
        prop_assert!(result.delta >= -1.0 && result.delta <= 1.0);
        prop_assert!(result.gamma >= 0.0);
        prop_assert_eq!(result.iv_used_fallback, !result.iv_converged);
    }

    #[test]
    fn prop_combination_sums_legs(
        ce_strike in 25500.0f64..26700.0,
        pe_strike in 25500.0f64..26700.0,
        ce_premium in 20.0f64..800.0,
        pe_premium in 20.0f64..800.0,
        days in 1.0f64..30.0,
    ) {
        let combinator = MultiLegCombinator::default();
        let result = combinator
            .strangle(
                &contract(ce_strike, ce_premium, OptionType::Call, days),
                &contract(pe_strike, pe_premium, OptionType::Put, days),
            )
            .unwrap();
        let (ce, pe, combined) = (&result.ce, &result.pe, &result.combined);

        prop_assert!((combined.delta - (ce.delta + pe.delta)).abs() < 1e-12);
        prop_assert!((combined.gamma - (ce.gamma + pe.gamma)).abs() < 1e-12);
        prop_assert!((combined.theta - (ce.theta + pe.theta)).abs() < 1e-9);
        prop_assert!((combined.vega - (ce.vega + pe.vega)).abs() < 1e-9);
        prop_assert!((combined.rho - (ce.rho + pe.rho)).abs() < 1e-9);
        prop_assert_eq!(combined.market_price, ce.market_price + pe.market_price);
        prop_assert_eq!(combined.theoretical_price, ce.theoretical_price + pe.theoretical_price);
        prop_assert_eq!(combined.risk_level, ce.risk_level.max(pe.risk_level));
        prop_assert_eq!(combined.iv_converged, ce.iv_converged && pe.iv_converged);
    }

    #[test]
    fn prop_implied_volatility_round_trip(
        moneyness in 0.9f64..1.1,
        days in 30.0f64..365.0,
        sigma in 0.15f64..1.0,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionType::Call } else { OptionType::Put };
        let strike = SPOT * moneyness;
        let premium = price_and_greeks(SPOT, strike, years_from_days(days), RATE, sigma, kind).price;

        let result = SingleLegAnalyzer::default()
            .analyze(&contract(strike, premium, kind, days))
            .unwrap();

        prop_assert!(result.iv_converged);
        let iv = result.implied_volatility.unwrap_or_default();
        prop_assert!((iv - sigma).abs() < 1e-3, "iv {} vs sigma {}", iv, sigma);
    }
}

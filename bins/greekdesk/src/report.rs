//! Plain-text rendering of engine results

use common::{
    Greeks, LiveOptionSnapshot, OptionContract, PortfolioGreeksRisk, RiskLevel,
    TradingRecommendation,
};
use market_data::TickReport;
use serde::Serialize;

/// Everything the price command shows, in display units
#[derive(Debug, Serialize)]
pub struct PriceReport {
    pub contract: OptionContract,
    pub greeks: Greeks,
    pub theta_per_day: f64,
    pub vega_per_vol_point: f64,
    pub risk_level: RiskLevel,
    pub trading_recommendation: TradingRecommendation,
}

impl PriceReport {
    pub fn new(
        contract: OptionContract,
        greeks: Greeks,
        risk_level: RiskLevel,
        trading_recommendation: TradingRecommendation,
    ) -> Self {
        Self {
            contract,
            greeks,
            theta_per_day: greeks.theta_per_day(),
            vega_per_vol_point: greeks.vega_per_vol_point(),
            risk_level,
            trading_recommendation,
        }
    }
}

pub fn print_price(report: &PriceReport) {
    let c = &report.contract;
    let g = &report.greeks;

    println!();
    println!(
        "{} S={} K={} T={:.4}y r={:.2}% vol={:.2}%",
        c.option_type,
        c.spot_price,
        c.strike_price,
        c.time_to_expiry,
        c.risk_free_rate * 100.0,
        c.volatility * 100.0
    );
    println!();
    println!("  Price           {:>14.4}", g.price);
    println!("  Delta           {:>14.4}", g.delta);
    println!("  Gamma           {:>14.6}", g.gamma);
    println!("  Theta / day     {:>14.4}", report.theta_per_day);
    println!("  Vega / 1% vol   {:>14.4}", report.vega_per_vol_point);
    println!("  Rho             {:>14.4}", g.rho);
    println!();
    println!("  Risk level      {:>14}", report.risk_level.to_string());
    println!("  Signal          {:>14}", report.trading_recommendation.to_string());
    println!();
}

pub fn print_portfolio(risk: &PortfolioGreeksRisk) {
    println!();
    println!("=== Portfolio Risk ===");
    println!();
    println!("  Net delta          {:>14.2}", risk.total_delta);
    println!("  Net gamma          {:>14.6}", risk.total_gamma);
    println!("  Net theta / day    {:>14.2}", risk.total_theta / common::DAYS_PER_YEAR);
    println!("  Net vega / 1% vol  {:>14.2}", risk.total_vega / 100.0);
    println!("  Portfolio value    {:>14.2}", risk.portfolio_value);
    println!("  Max drawdown (1d)  {:>14.2}", risk.max_drawdown_risk);
    println!("  Gamma exposure     {:>14}", risk.gamma_exposure.to_string());
    println!("  Risk score         {:>10}/100", risk.risk_score);
    println!();

    if risk.hedging_recommendations.is_empty() {
        println!("[ok] No hedging action needed");
    } else {
        println!("Hedging ({}):", risk.hedging_recommendations.len());
        for (i, rec) in risk.hedging_recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, rec);
        }
    }
    println!();
}

fn print_snapshot_row(s: &LiveOptionSnapshot) {
    println!(
        "  {:<18} {:>10.2} {:>7.2}% {:>8.3} {:>9.2} {:>8} {:>11}",
        s.symbol,
        s.last_price,
        s.implied_volatility * 100.0,
        s.greeks.delta,
        s.greeks.theta_per_day(),
        s.risk_level.to_string(),
        s.trading_recommendation.to_string()
    );
}

pub fn print_tick(report: &TickReport) {
    println!(
        "--- tick {} @ {} ({} contracts, source {}, vol {:?}) ---",
        report.sequence,
        report.as_of.format("%H:%M:%S"),
        report.snapshots.len(),
        report.source,
        report.vol_regime
    );

    if !report.scan.opportunities.is_empty() {
        println!("Opportunities ({}):", report.scan.opportunities.len());
        for s in &report.scan.opportunities {
            print_snapshot_row(s);
        }
    }

    if !report.scan.high_risk.is_empty() {
        println!("High risk ({}):", report.scan.high_risk.len());
        for s in &report.scan.high_risk {
            print_snapshot_row(s);
        }
    }

    for rejected in &report.rejected {
        println!("  [warn] {} rejected: {}", rejected.symbol, rejected.reason);
    }
    for symbol in &report.missing_holdings {
        println!("  [warn] holding {} has no quote", symbol);
    }

    print_portfolio(&report.portfolio);
}

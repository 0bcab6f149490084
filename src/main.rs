use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ringbook::book::MarketBook;
use ringbook::config::Config;
use ringbook::engine::odds::format_odds;
use ringbook::engine::pool::build_pool;
use ringbook::sim::{self, ResultFeed, SimulatedResults};
use ringbook::types::{BetStatus, EventType, FighterRecord, Market};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ringbook=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(Path::new("config.toml"))?;
    let sim_config = config.simulation.clone().unwrap_or_default();

    println!();
    println!("  Ringbook Betting Engine v0.1.0");
    println!("  ==============================");
    println!();

    let mut rng = StdRng::seed_from_u64(sim_config.seed);
    let roster = sim::generate_roster(sim_config.roster_size, &mut rng);
    let card = sim::fight_card(&roster, sim_config.bouts);

    let pool = build_pool(
        "event-1",
        Utc::now(),
        EventType::Regular,
        &card,
        &roster,
        &[],
        &config.betting,
        &config.payout,
    );
    println!(
        "  Card: {} bouts | minimum bet ${:.2} | vig {:.1}% | fee {:.1}%",
        pool.markets.len(),
        pool.min_bet,
        config.betting.vig_percent,
        config.payout.platform_fee_percent,
    );
    println!();
    println!("  Opening lines:");
    for market in &pool.markets {
        println!("    {}", describe_market(market, &roster));
    }
    println!();

    let book = Arc::new(MarketBook::from_pool(pool, roster.clone(), config.betting.clone()));

    // --- Betting window ---
    let report = sim::run_bettors(book.clone(), &sim_config).await;
    println!(
        "  Betting window closed: {} bets accepted, {} rejected",
        report.accepted, report.rejected
    );
    book.close();
    println!();

    println!("  Closing lines:");
    let mut fight_ids = book.fight_ids();
    fight_ids.sort();
    for fight_id in &fight_ids {
        if let Some(market) = book.market(fight_id).await {
            println!("    {}", describe_market(&market, &roster));
        }
    }
    println!();

    // --- Results come in, fights settle one by one ---
    let mut feed = SimulatedResults::new(&roster, &card, &mut rng);
    println!("  Results:");
    while let Some(result) = feed.next_result().await? {
        let settled = book.settle_fight(&result.fight_id, &result.winner_id).await?;
        let winner = fighter_name(&roster, &result.winner_id);
        let paid_out: f64 = settled
            .iter()
            .filter(|bet| bet.status == BetStatus::Won)
            .filter_map(|bet| bet.actual_payout)
            .sum();
        println!(
            "    {}: {} wins | {} bets settled | ${:.2} paid out",
            result.fight_id,
            winner,
            settled.len(),
            paid_out
        );
    }
    println!();

    // --- Card summary ---
    let snapshot = book.pool_snapshot().await;
    let bets = book.all_bets().await;
    let handle: f64 = bets.iter().map(|bet| bet.stake).sum();
    let fee_revenue: f64 = bets
        .iter()
        .filter_map(|bet| bet.breakdown.as_ref())
        .map(|b| b.platform_fee)
        .sum();
    let house_profit: f64 = bets
        .iter()
        .filter_map(|bet| bet.breakdown.as_ref())
        .map(|b| b.house_profit)
        .sum();

    println!("  Card summary ({:?}):", snapshot.status);
    println!("    Handle:       ${handle:>12.2}");
    println!("    Bets:         {:>13}", snapshot.bet_count);
    println!("    House P&L:    ${house_profit:>12.2}");
    println!("    Platform fee: ${fee_revenue:>12.2}");

    if let Some(revenue) = &config.revenue {
        println!();
        println!("  Fee revenue split:");
        println!(
            "    Trainer wages:       ${:>10.2}",
            fee_revenue * revenue.trainer_wage_percent / 100.0
        );
        println!(
            "    Event fund:          ${:>10.2}",
            fee_revenue * revenue.event_cut_percent / 100.0
        );
        println!(
            "    Manager commissions: ${:>10.2}",
            fee_revenue * revenue.manager_commission_percent / 100.0
        );
    }
    println!();

    Ok(())
}

fn fighter_name(roster: &[FighterRecord], fighter_id: &str) -> String {
    roster
        .iter()
        .find(|f| f.id == fighter_id)
        .map(|f| f.display_name())
        .unwrap_or_else(|| fighter_id.to_string())
}

fn describe_market(market: &Market, roster: &[FighterRecord]) -> String {
    format!(
        "{}: {} {} vs {} {} | pool ${:.2}",
        market.fight_id,
        fighter_name(roster, &market.fighter1_id),
        format_odds(
            market.fighter1_odds,
            market.format,
            Some(market.fighter1_probability)
        ),
        fighter_name(roster, &market.fighter2_id),
        format_odds(
            market.fighter2_odds,
            market.format,
            Some(market.fighter2_probability)
        ),
        market.total_pool,
    )
}

//! Performance benchmark for the growth advisor engines.
//!
//! Generates a long synthetic ARPU history with injected drops, a batch of
//! campaign plans and a large synthetic campaign catalog, then times each
//! engine and checks that the injected drops are recovered.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example benchmark --release -p growth-advisor

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use growth_advisor::{
    AnomalyDetector, Campaign, CapacityTable, CaseRetriever, ContentRatio, DailyMetricRow,
    EffectSimulator, MetricSeries, ResourcePosition, ResourceUsage, RetrievalConfig,
};
use growth_engine::TokenizerKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_DAYS: usize = 3_650;
const NUM_DROPS: usize = 40;
const NUM_PLANS: usize = 100_000;
const NUM_CAMPAIGNS: usize = 20_000;
const SEED: u64 = 42;

const SEGMENTS: &[&str] = &["family", "anime", "variety", "kids", "silent", "vip", "female"];
const FACTORS: &[&str] = &[
    "friday", "peak", "holiday", "hotspot", "launch", "coupon", "ip", "summer", "weekend",
    "precision", "combo", "slot",
];

fn main() {
    env_logger::init();

    println!("=== Growth Advisor Performance Benchmark ===");
    println!();

    // -----------------------------------------------------------------------
    // 1. Anomaly detection
    // -----------------------------------------------------------------------
    println!("Generating {} days with {} injected drops...", NUM_DAYS, NUM_DROPS);
    let mut rng = StdRng::seed_from_u64(SEED);
    let (rows, injected) = generate_daily_rows(&mut rng);
    let series = match MetricSeries::new(rows) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("synthetic series rejected: {}", e);
            return;
        }
    };

    let detector = AnomalyDetector::default();
    let detect_start = Instant::now();
    let flagged: BTreeSet<NaiveDate> = detector.anomaly_dates(&series).into_iter().collect();
    let detect_elapsed = detect_start.elapsed();

    let recovered = injected.iter().filter(|d| flagged.contains(d)).count();
    println!(
        "  Detection: {:.3}s ({:.0} rows/s)",
        detect_elapsed.as_secs_f64(),
        NUM_DAYS as f64 / detect_elapsed.as_secs_f64()
    );
    println!(
        "  Flagged days: {} | injected drops recovered: {}/{}",
        flagged.len(),
        recovered,
        injected.len()
    );
    if let Some(rate) = series.latest_summary().conversion_rate {
        println!("  Latest conversion rate: {:.2}%", rate);
    }
    println!();

    // -----------------------------------------------------------------------
    // 2. Effect simulation
    // -----------------------------------------------------------------------
    println!("Simulating {} campaign plans...", NUM_PLANS);
    let capacity = match CapacityTable::new(capacity_rows()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("capacity table rejected: {}", e);
            return;
        }
    };
    let simulator = EffectSimulator::default();
    let plans: Vec<(ContentRatio, ResourceUsage)> =
        (0..NUM_PLANS).map(|_| generate_plan(&mut rng)).collect();

    let sim_start = Instant::now();
    let mut warnings = 0usize;
    let mut best_roi = 0.0f64;
    for (content, usage) in &plans {
        match simulator.simulate(content, usage, &capacity) {
            Ok(result) => {
                if result.capacity_warning {
                    warnings += 1;
                }
                best_roi = best_roi.max(result.roi);
            }
            Err(e) => eprintln!("plan rejected: {}", e),
        }
    }
    let sim_elapsed = sim_start.elapsed();
    println!(
        "  Simulation: {:.3}s ({:.0} plans/s)",
        sim_elapsed.as_secs_f64(),
        NUM_PLANS as f64 / sim_elapsed.as_secs_f64()
    );
    println!(
        "  Capacity warnings: {} ({:.1}%) | best ROI: {:.2}",
        warnings,
        warnings as f64 / NUM_PLANS as f64 * 100.0,
        best_roi
    );
    println!();

    // -----------------------------------------------------------------------
    // 3. Case retrieval
    // -----------------------------------------------------------------------
    println!("Indexing {} synthetic campaigns...", NUM_CAMPAIGNS);
    let catalog: Vec<Campaign> = (0..NUM_CAMPAIGNS)
        .map(|i| generate_campaign(&mut rng, i))
        .collect();
    let probe = catalog[NUM_CAMPAIGNS / 2].clone();

    let retriever = CaseRetriever::new(RetrievalConfig {
        tokenizer: TokenizerKind::WordBoundary,
        ..RetrievalConfig::default()
    });
    let index_start = Instant::now();
    if let Err(e) = retriever.build_index(catalog) {
        eprintln!("index build failed: {}", e);
        return;
    }
    println!("  Index build: {:.3}s", index_start.elapsed().as_secs_f64());

    let search_start = Instant::now();
    let results = match retriever.search(&probe.success_factors, Some(5)) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("search failed: {}", e);
            return;
        }
    };
    println!(
        "  Search time: {:.4}s across {} campaigns",
        search_start.elapsed().as_secs_f64(),
        NUM_CAMPAIGNS
    );
    println!("  Query: {:?} (from {})", probe.success_factors, probe.campaign_id);
    for r in &results {
        println!(
            "    #{}: {} score={:.4} raw={:.3} tag={}",
            r.rank, r.campaign_id, r.similarity_score, r.raw_score, r.strategy_tag
        );
    }

    println!();
    println!("=== Benchmark complete ===");
}

// ---------------------------------------------------------------------------
// Synthetic data generation
// ---------------------------------------------------------------------------

fn generate_daily_rows(rng: &mut StdRng) -> (Vec<DailyMetricRow>, Vec<NaiveDate>) {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default();
    let mut drop_days = BTreeSet::new();
    while drop_days.len() < NUM_DROPS {
        // Leave a full week of history before each drop.
        drop_days.insert(rng.gen_range(14..NUM_DAYS));
    }

    let rows = (0..NUM_DAYS)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            let is_holiday = i % 7 >= 5;
            let dau: u64 = rng.gen_range(4_600_000..4_800_000);
            let base = if is_holiday { 0.11 } else { 0.092 };
            let mut arpu = base + rng.gen_range(-0.0005..0.0005);
            if drop_days.contains(&i) {
                arpu *= 0.85;
            }
            DailyMetricRow {
                date,
                daily_active_users: dau,
                revenue: arpu * dau as f64,
                is_holiday,
                new_members: Some(rng.gen_range(18_000..25_000)),
                renew_members: Some(rng.gen_range(58_000..68_000)),
            }
        })
        .collect();

    let injected = drop_days
        .into_iter()
        .map(|i| start + Duration::days(i as i64))
        .collect();
    (rows, injected)
}

fn capacity_rows() -> Vec<ResourcePosition> {
    [
        ("首页位1", 0.8, 150.0, 0.12),
        ("首页位3", 0.7, 100.0, 0.10),
        ("详情页推荐", 0.6, 60.0, 0.08),
    ]
    .into_iter()
    .map(|(name, cap, cost, elasticity)| ResourcePosition {
        name: name.to_string(),
        max_capacity_fraction: cap,
        cost_per_10k_reach: cost,
        elasticity,
    })
    .collect()
}

fn generate_plan(rng: &mut StdRng) -> (ContentRatio, ResourceUsage) {
    let drama = rng.gen_range(0.0..100.0);
    let anime = rng.gen_range(0.0..(100.0 - drama));
    let content = ContentRatio::from([
        ("家庭剧".to_string(), drama),
        ("动漫".to_string(), anime),
        ("综艺".to_string(), 100.0 - drama - anime),
    ]);
    let mut usage = ResourceUsage::new();
    for name in ["首页位1", "首页位3", "详情页推荐", "开屏"] {
        if rng.gen_bool(0.6) {
            usage.insert(name.to_string(), rng.gen_range(0.0..=1.0));
        }
    }
    (content, usage)
}

fn pick(rng: &mut StdRng, words: &[&str], n: usize) -> String {
    (0..n)
        .map(|_| words[rng.gen_range(0..words.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_campaign(rng: &mut StdRng, i: usize) -> Campaign {
    Campaign {
        campaign_id: format!("CMP-{:06}", i),
        strategy_tag: pick(rng, SEGMENTS, 2),
        target_segment: pick(rng, SEGMENTS, 1),
        content_mix: pick(rng, SEGMENTS, 2),
        resource_positions: "首页位1".to_string(),
        discount: "coupon".to_string(),
        roi: rng.gen_range(0.8..1.6),
        arpu_lift: rng.gen_range(0.005..0.03),
        success_factors: format!("{} case{}", pick(rng, FACTORS, 3), i),
        start_date: None,
        end_date: None,
        revenue_lift: None,
        budget_used: Some(rng.gen_range(10_000.0..200_000.0)),
    }
}

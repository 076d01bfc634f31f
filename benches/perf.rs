use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use valorant_predictor::catalog::AGENTS;
use valorant_predictor::config::DEFAULT_ROW_SELECTOR;
use valorant_predictor::dataset::AgentStatRecord;
use valorant_predictor::features::preprocess_data;
use valorant_predictor::model::fit_model;
use valorant_predictor::predict::predict_winner;
use valorant_predictor::scrape::{SelectorParser, StatsPageParser};

const TEAM1: [&str; 5] = ["Jett", "Sage", "Omen", "Sova", "Killjoy"];
const TEAM2: [&str; 5] = ["Raze", "Skye", "Viper", "Cypher", "Reyna"];

fn sample_records(per_agent: usize) -> Vec<AgentStatRecord> {
    let mut out = Vec::new();
    for (i, agent) in AGENTS.iter().enumerate() {
        for j in 0..per_agent {
            out.push(AgentStatRecord {
                rank: format!("{}", out.len() + 1),
                agent: agent.to_string(),
                kills: Some(12.0 + (i % 7) as f64),
                deaths: Some(13.0 + (j % 3) as f64),
                assists: Some(4.0 + (i % 4) as f64),
                win_rate: Some(0.44 + 0.01 * ((i * 3 + j * 5) % 13) as f64),
                pick_rate: Some(0.02 + 0.005 * (i % 9) as f64),
                avg_score: format!("{}", 180 + i * 3 + j),
                first_blood_rate: Some(0.1),
                matches: format!("{}", 500 + 17 * i + j),
            });
        }
    }
    out
}

fn bench_page_parse(c: &mut Criterion) {
    let parser = SelectorParser::new(DEFAULT_ROW_SELECTOR).expect("default selector");
    c.bench_function("stats_page_parse", |b| {
        b.iter(|| {
            let rows = parser.parse(black_box(AGENTS_PAGE_HTML)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_predict_pipeline(c: &mut Criterion) {
    let records = sample_records(8);
    c.bench_function("predict_pipeline", |b| {
        b.iter(|| {
            let table = preprocess_data(black_box(&records));
            let model = fit_model(&table).unwrap();
            let prediction = predict_winner(&model, &TEAM1, &TEAM2);
            black_box(prediction.team1_probability);
        })
    });
}

criterion_group!(perf, bench_page_parse, bench_predict_pipeline);
criterion_main!(perf);

static AGENTS_PAGE_HTML: &str = include_str!("../tests/fixtures/agents_page.html");

//! Performance benchmarks for skill rebuilds and roster shuffles

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skill_shuffle::balance::find_best_split;
use skill_shuffle::config::{BalanceSettings, SkillSettings};
use skill_shuffle::history::InMemoryHistoryStore;
use skill_shuffle::service::ShuffleService;
use skill_shuffle::skill::{PlayerSkill, SkillModel};
use skill_shuffle::types::{Faction, Round, ShuffleRequest};
use std::sync::Arc;

/// Round history for `players` players, each with `rounds_each` rounds
fn synthetic_rounds(players: i64, rounds_each: i64) -> Vec<Round> {
    let mut rounds = Vec::new();
    for round_id in 0..rounds_each {
        for player_id in 0..players {
            let faction = if (round_id + player_id) % 3 == 0 {
                Faction::Alien
            } else {
                Faction::Marine
            };
            rounds.push(Round {
                round_id: 2000 + round_id,
                player_id,
                skill: 800 + (player_id * 53) % 1700,
                player_name: format!("bench-{}", player_id),
                faction,
                won: (round_id * 7 + player_id) % 5 < 2,
            });
        }
    }
    rounds
}

fn bench_skill_model(c: &mut Criterion) {
    let model = SkillModel::new(SkillSettings::default());
    let rounds = synthetic_rounds(400, 100);

    c.bench_function("skill_model_build_40k_rounds", |b| {
        b.iter(|| black_box(model.build(black_box(&rounds))))
    });
}

fn bench_find_best_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_best_split");
    group.sample_size(10);

    let model = SkillModel::new(SkillSettings::default());
    let snapshot = model.build(&synthetic_rounds(40, 60));

    for roster_size in [8_i64, 12, 16, 20] {
        let seats: Vec<PlayerSkill> = (0..roster_size)
            .map(|id| snapshot.resolve(id, 900 + id * 61))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(roster_size),
            &seats,
            |b, seats| b.iter(|| black_box(find_best_split(black_box(seats), 100.0))),
        );
    }

    group.finish();
}

fn bench_service_shuffle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let store = Arc::new(InMemoryHistoryStore::new(synthetic_rounds(200, 80)));
    let service = ShuffleService::new(
        store,
        SkillSettings::default(),
        BalanceSettings::default(),
        4,
    );

    let request = ShuffleRequest {
        player_ids: (0..12).collect(),
        ratings: (0..12).map(|id| 1000 + id * 45).collect(),
    };

    c.bench_function("service_shuffle_6v6", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(
                    service
                        .shuffle(request.clone())
                        .await
                        .expect("Shuffle failed"),
                )
            })
        })
    });
}

criterion_group!(
    benches,
    bench_skill_model,
    bench_find_best_split,
    bench_service_shuffle
);
criterion_main!(benches);

//! Benchmarks for pricer_optimiser.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::OptionKind;
use pricer_models::calibration::MarketQuote;
use pricer_models::models::{HestonParams, HestonStepSizes};
use pricer_optimiser::bayesian::{MarketInputs, MetropolisHastings, RandomWalkProposal, SamplerConfig};
use pricer_pricing::engine::BlackScholesPricer;
use pricer_pricing::rng::{PricerRng, SAMPLER_STREAM};

fn quotes() -> Vec<MarketQuote> {
    [(80.0, 20.6), (90.0, 11.9), (100.0, 5.4), (110.0, 1.9), (120.0, 0.6)]
        .into_iter()
        .map(|(k, p)| MarketQuote::new(k, 0.5, p, OptionKind::Call).unwrap())
        .collect()
}

fn market() -> MarketInputs {
    MarketInputs::new(100.0, 0.01, 0.0)
}

fn benchmark_proposal(c: &mut Criterion) {
    let proposal = RandomWalkProposal::new(HestonStepSizes::default());
    let current = HestonParams::default();
    let mut rng = PricerRng::for_stream(123, SAMPLER_STREAM);

    c.bench_function("random_walk_proposal", |b| {
        b.iter(|| proposal.propose(black_box(&current), &mut rng))
    });
}

fn benchmark_log_posterior(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_posterior");
    group.sample_size(20);

    for n_paths in [500, 3000] {
        let config = SamplerConfig {
            n_paths,
            ..Default::default()
        };
        let sampler = MetropolisHastings::with_mc_pricer(market(), quotes(), config).unwrap();
        let params = HestonParams::new(2.0, 0.04, 0.6, -0.6, 0.04).unwrap();

        group.bench_with_input(BenchmarkId::new("mc", n_paths), &params, |b, p| {
            b.iter(|| sampler.log_posterior(black_box(p)))
        });
    }

    group.finish();
}

fn benchmark_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("metropolis_hastings");

    for n_iter in [100, 1000] {
        let config = SamplerConfig {
            n_iter,
            burn_in: n_iter / 5,
            ..Default::default()
        };
        let sampler = MetropolisHastings::new(market(), quotes(), config, BlackScholesPricer).unwrap();
        let initial = HestonParams::default();
        let steps = HestonStepSizes::default();

        group.bench_with_input(BenchmarkId::new("black_scholes", n_iter), &n_iter, |b, _| {
            b.iter(|| sampler.run(black_box(&initial), &steps))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_proposal, benchmark_log_posterior, benchmark_chain);
criterion_main!(benches);

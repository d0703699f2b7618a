//! Benchmarks for the matchbook matching engine.
//!
//! ## Running
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run a specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::time::Duration;

use matchbook::{BookConfig, Order, OrderBook, Side};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

/// A book that discards fills, so the sink cost never shows in the numbers.
fn quiet_book() -> OrderBook {
    OrderBook::with_sink(BookConfig::default(), matchbook::null_sink())
}

/// Rest `count` sell orders at ascending price levels starting at `base_price`.
/// Ids start at `first_id` and increment.
fn populate_asks(book: &mut OrderBook, count: usize, first_id: u64, base_price: f64, step: f64, quantity: u64) {
    for i in 0..count {
        let price = base_price + i as f64 * step;
        book.add_order(Order::sell(first_id + i as u64, price, quantity, i as u64))
            .expect("resting ask must validate");
    }
}

/// Rest `count` buy orders at descending price levels starting at `base_price`.
fn populate_bids(book: &mut OrderBook, count: usize, first_id: u64, base_price: f64, step: f64, quantity: u64) {
    for i in 0..count {
        let price = base_price - i as f64 * step;
        book.add_order(Order::buy(first_id + i as u64, price, quantity, i as u64))
            .expect("resting bid must validate");
    }
}

/// Deterministic mixed flow for throughput runs. Same seed = same orders.
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut orders = Vec::with_capacity(count);

    for i in 0..count {
        let is_buy = rng.gen_bool(0.5);
        let price = (rng.gen_range(9_500..=10_500) as f64) / 100.0;
        let quantity: u64 = rng.gen_range(1..=1_000);

        orders.push(Order::new(
            (i + 1) as u64,
            if is_buy { Side::Buy } else { Side::Sell },
            price,
            quantity,
            i as u64,
        ));
    }

    orders
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(1000);

    // Match one crossing buy against a 1k-deep ask book
    group.bench_function("against_1k_orders", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_asks(&mut book, 1000, 1, 100.00, 0.01, 100);
                (book, Order::buy(999_999, 100.00, 100, 2000))
            },
            |(mut book, buy)| {
                black_box(book.add_order(buy)).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    // A buy large enough to sweep ~10 levels
    group.bench_function("multi_level_sweep", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_asks(&mut book, 100, 1, 100.00, 0.01, 10);
                (book, Order::buy(999_999, 100.10, 100, 2000))
            },
            |(mut book, buy)| {
                black_box(book.add_order(buy)).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    // No match: the order rests on the book
    group.bench_function("no_match_rest_on_book", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_asks(&mut book, 1000, 1, 100.00, 0.01, 100);
                (book, Order::buy(999_999, 99.00, 100, 2000))
            },
            |(mut book, buy)| {
                black_box(book.add_order(buy)).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Order Operations
// ============================================================================

fn bench_order_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_operations");

    group.measurement_time(Duration::from_secs(5));

    group.bench_function("add_to_empty", |b| {
        b.iter_batched(
            quiet_book,
            |mut book| {
                black_box(book.add_order(Order::buy(1, 100.00, 100, 1))).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("add_to_1k_book", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_asks(&mut book, 500, 1, 100.01, 0.01, 100);
                populate_bids(&mut book, 500, 501, 100.00, 0.01, 100);
                book
            },
            |mut book| {
                black_box(book.add_order(Order::buy(999_999, 95.00, 100, 2000))).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_order", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_bids(&mut book, 1000, 1, 100.00, 0.01, 100);
                book
            },
            |mut book| {
                // Middle of the book
                black_box(book.cancel_order(500)).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("amend_same_price", |b| {
        b.iter_batched(
            || {
                let mut book = quiet_book();
                populate_bids(&mut book, 1000, 1, 100.00, 0.01, 100);
                let price = book.order(500).expect("resting order").price;
                (book, price)
            },
            |(mut book, price)| {
                black_box(book.amend_order(500, price, 250)).ok();
                book.order_count()
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("orders", batch_size),
            &batch_size,
            |b, &size| {
                let orders = generate_order_batch(size, 42);

                b.iter_batched(
                    || orders.clone(),
                    |orders| {
                        let mut book = quiet_book();
                        for order in orders {
                            black_box(book.add_order(order)).ok();
                        }
                        book.order_count()
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Large Book
// ============================================================================

fn bench_large_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_book");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    // Matching against a book holding 100k resting orders
    group.bench_function("match_in_100k_book", |b| {
        let mut book = quiet_book();
        populate_asks(&mut book, 50_000, 1, 100.01, 0.0001, 10);
        populate_bids(&mut book, 50_000, 50_001, 100.00, 0.0001, 10);
        let mut next_id: u64 = 1_000_000;

        b.iter(|| {
            next_id += 1;
            black_box(book.add_order(Order::buy(next_id, 100.01, 10, next_id))).ok();
            book.order_count()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_match,
    bench_order_operations,
    bench_throughput,
    bench_large_book
);

criterion_main!(benches);

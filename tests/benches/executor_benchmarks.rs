//! # Phi-Chain Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | pc-04 Executor | Optimistic batch vs sequential replay |
//! | pc-02 Ledger | Proof-of-work sealing at low difficulty |
//! | shared-crypto | Ed25519 verification of signing bytes |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use pc_01_fibonacci::FibState;
use pc_02_ledger::BlockMining;
use pc_04_executor::{execute_sequential, ExecutorConfig, OptimisticExecutor, TransferProcessor};
use shared_crypto::{Ed25519KeyPair, Ed25519Verifier, SignatureVerifier, TransactionSigner};
use shared_types::{Block, ExecutionState, Transaction, ZERO_HASH};

// ============================================================================
// PC-04: Executor Benchmarks
// ============================================================================

/// `size` transfers over `accounts` accounts; fewer accounts means more
/// conflicts.
fn random_batch(size: usize, accounts: usize, seed: u64) -> (Vec<Transaction>, ExecutionState) {
    let mut rng = StdRng::seed_from_u64(seed);
    let base: ExecutionState = (0..accounts)
        .map(|i| (format!("acct-{i}"), 1_000_000))
        .collect();
    let batch = (0..size)
        .map(|n| {
            let from = rng.gen_range(0..accounts);
            let to = rng.gen_range(0..accounts);
            Transaction::transfer(
                format!("acct-{from}"),
                format!("acct-{to}"),
                rng.gen_range(1..100),
                n as u64,
            )
        })
        .collect();
    (batch, base)
}

fn bench_executor(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-04-executor");
    group.measurement_time(Duration::from_secs(5));

    let executor = OptimisticExecutor::default();
    let always_serial = OptimisticExecutor::new(ExecutorConfig {
        parallel_threshold: usize::MAX,
    });

    for (size, accounts) in [(64, 1_024), (256, 1_024), (256, 16), (1_024, 4_096)] {
        let (batch, base) = random_batch(size, accounts, 42);
        let label = format!("{size}tx/{accounts}acct");
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("optimistic", &label), &batch, |b, batch| {
            b.iter(|| black_box(executor.execute_batch(batch, &base)))
        });
        group.bench_with_input(
            BenchmarkId::new("optimistic_serial_phase", &label),
            &batch,
            |b, batch| b.iter(|| black_box(always_serial.execute_batch(batch, &base))),
        );
        group.bench_with_input(BenchmarkId::new("sequential", &label), &batch, |b, batch| {
            b.iter(|| black_box(execute_sequential(&TransferProcessor, batch, &base)))
        });
    }

    group.finish();
}

// ============================================================================
// PC-02: Mining Benchmarks
// ============================================================================

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-02-mining");
    group.sample_size(20);

    let (batch, _) = random_batch(16, 32, 7);
    for difficulty in [1u32, 2, 3] {
        group.bench_with_input(
            BenchmarkId::new("seal_block", difficulty),
            &difficulty,
            |b, &difficulty| {
                b.iter(|| {
                    let mut block = Block::new(
                        1,
                        3_524_578,
                        ZERO_HASH,
                        "validator-1",
                        batch.clone(),
                        FibState::GENESIS,
                    );
                    black_box(block.mine(difficulty))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Signature Verification Benchmarks
// ============================================================================

fn bench_signature_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-crypto-ed25519");

    let key = Ed25519KeyPair::from_seed([9u8; 32]);
    let tx = Transaction::transfer(key.identity(), "bob", 10, 0);
    let message = tx.signing_bytes();
    let signature = key.sign(&message);
    let identity = key.identity();

    group.bench_function("verify_transfer", |b| {
        b.iter(|| black_box(Ed25519Verifier.verify(&message, &signature, &identity).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_executor,
    bench_mining,
    bench_signature_verification
);
criterion_main!(benches);

// crates/itsuku-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use clap::Subcommand;
use itsuku_core::{ChallengeId, Config, Memory};
use itsuku_merkle::MerkleTree;
use itsuku_prove::io::{read_proof_auto, write_proof_auto};
use itsuku_prove::{search, verify};
use rand::RngCore;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "itsuku",
    about = "Itsuku memory-hard proof-of-work reference CLI",
    long_about = "Build memory, commit a Merkle tree, search for a nonce meeting a difficulty target, and verify the resulting proof.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Build memory, search for a nonce, and write a proof.
    Prove {
        /// Chunk size ℓ, in 64-byte elements.
        #[arg(long, default_value_t = Config::default().ell)]
        length: u64,

        /// Chunk count P.
        #[arg(long, default_value_t = Config::default().p)]
        chunks: u64,

        /// Antecedent count n (>= 2).
        #[arg(long, default_value_t = Config::default().n)]
        antecedents: u32,

        /// Required leading-zero bits of Omega.
        #[arg(long, default_value_t = Config::default().d)]
        difficulty: u32,

        /// Search length L (leaves selected per proof).
        #[arg(long, default_value_t = Config::default().l)]
        search_length: u32,

        /// Challenge id as a hex string.
        #[arg(long, conflicts_with = "random_challenge")]
        challenge: Option<String>,

        /// Generate a random 64-byte challenge id instead.
        #[arg(long)]
        random_challenge: bool,

        /// Build memory and sweep nonces across rayon's thread pool.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Give up after this many nonces (unbounded if omitted).
        #[arg(long)]
        max_nonce: Option<u64>,

        /// Output path for the proof (.json or .cbor).
        #[arg(long, default_value = "proof.json")]
        out: PathBuf,
    },

    /// Verify a previously produced proof.
    Verify {
        /// Input path to the proof (.json or .cbor).
        #[arg(long)]
        proof: PathBuf,
    },

    /// Illustrative timing of the memory build and a bounded nonce sweep.
    Bench {
        /// Chunk size ℓ, in 64-byte elements.
        #[arg(long, default_value_t = Config::default().ell)]
        length: u64,

        /// Chunk count P.
        #[arg(long, default_value_t = Config::default().p)]
        chunks: u64,

        /// Antecedent count n (>= 2).
        #[arg(long, default_value_t = Config::default().n)]
        antecedents: u32,

        /// Build memory and sweep nonces across rayon's thread pool.
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Prove {
            length,
            chunks,
            antecedents,
            difficulty,
            search_length,
            challenge,
            random_challenge,
            parallel,
            max_nonce,
            out,
        } => prove(
            length,
            chunks,
            antecedents,
            difficulty,
            search_length,
            challenge,
            random_challenge,
            parallel,
            max_nonce,
            out,
        ),

        Cmd::Verify { proof } => verify_cmd(proof),

        Cmd::Bench {
            length,
            chunks,
            antecedents,
            parallel,
        } => bench(length, chunks, antecedents, parallel),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn resolve_challenge(challenge: Option<String>, random_challenge: bool) -> Result<ChallengeId> {
    if random_challenge {
        let mut bytes = vec![0u8; 64];
        rand::thread_rng().fill_bytes(&mut bytes);
        return Ok(ChallengeId::new(bytes));
    }
    let hex_str = challenge.unwrap_or_else(|| "00".repeat(64));
    let bytes = hex::decode(&hex_str).context("challenge id is not valid hex")?;
    Ok(ChallengeId::new(bytes))
}

#[allow(clippy::too_many_arguments)]
fn prove(
    length: u64,
    chunks: u64,
    antecedents: u32,
    difficulty: u32,
    search_length: u32,
    challenge: Option<String>,
    random_challenge: bool,
    parallel: bool,
    max_nonce: Option<u64>,
    out: PathBuf,
) -> Result<()> {
    let config = Config {
        ell: length,
        p: chunks,
        n: antecedents,
        d: difficulty,
        l: search_length,
    };
    let challenge_id = resolve_challenge(challenge, random_challenge)?;

    info!(?config, challenge = %hex::encode(challenge_id.bytes()), parallel, "building memory");
    let memory = Memory::build(&config, &challenge_id, parallel).context("building memory")?;

    info!("committing merkle tree");
    let tree = MerkleTree::build(&memory, &challenge_id);

    info!("searching for a nonce");
    let started = Instant::now();
    let proof = search(&config, &challenge_id, &memory, &tree, parallel, max_nonce)
        .context("nonce space exhausted without a solution")?;
    let elapsed = started.elapsed();

    info!(nonce = proof.nonce, elapsed_ms = elapsed.as_millis(), "found a solution");

    verify(&proof).context("self-check on the freshly produced proof failed")?;

    write_proof_auto(&out, &proof).with_context(|| format!("writing proof to {}", out.display()))?;

    println!(
        "Proved: nonce={}, leaves={}, opening_nodes={} -> {}",
        proof.nonce,
        proof.leaf_antecedents.len(),
        proof.tree_opening.len(),
        out.display()
    );
    Ok(())
}

fn verify_cmd(proof: PathBuf) -> Result<()> {
    info!(proof = %proof.display(), "reading proof");
    let proof = read_proof_auto(&proof).with_context(|| format!("reading {}", proof.display()))?;

    match verify(&proof) {
        Ok(()) => {
            println!("OK: proof verified");
            Ok(())
        }
        Err(err) => bail!("verification failed: {err}"),
    }
}

fn bench(length: u64, chunks: u64, antecedents: u32, parallel: bool) -> Result<()> {
    let config = Config {
        ell: length,
        p: chunks,
        n: antecedents,
        ..Config::default()
    };
    let challenge_id = ChallengeId::new(vec![0u8; 64]);

    let started = Instant::now();
    let memory = Memory::build(&config, &challenge_id, parallel).context("building memory")?;
    let build_elapsed = started.elapsed();

    let started = Instant::now();
    let tree = MerkleTree::build(&memory, &challenge_id);
    let commit_elapsed = started.elapsed();

    println!(
        "memory build ({} elements, parallel={}): {:?}; merkle commit: {:?}",
        memory.total_elements(),
        parallel,
        build_elapsed,
        commit_elapsed
    );
    println!("root: {}", hex::encode(tree.root()));
    Ok(())
}

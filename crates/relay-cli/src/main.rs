//! Root Relay CLI - Command-line tool for attesting and relaying tree roots
//!
//! This tool provides commands for:
//! - Generating attester keys
//! - Signing batches of observed root transitions
//! - Initializing a relay state file from a deployment config
//! - Applying signed transitions to the relay state
//! - Querying root history and validity
//! - Owner administration (validity window, owner set)
//!
//! Relay state lives in a JSON file that every command loads and, for
//! mutating commands, writes back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relay_ledger::SystemClock;
use relay_manager::{IdentityManager, ManagerState, RelayConfig};
use relay_primitives::{
    AttestationBatch, AttesterKey, Principal, Root, SignedBatch, Transition, TransitionProof,
};
use relay_verifier::{GroupMembershipVerifier, MembershipClaim, MembershipError};

/// The CLI carries no membership verifier; only root gating is available
#[derive(Debug, Clone, Copy)]
struct NoMembershipVerifier;

impl GroupMembershipVerifier for NoMembershipVerifier {
    fn verify_proof(&self, _root: &Root, _claim: &MembershipClaim) -> Result<(), MembershipError> {
        Err(MembershipError::rejected("no membership verifier configured"))
    }
}

type Manager = IdentityManager<NoMembershipVerifier, SystemClock>;

/// Root Relay - relay identity tree roots with attested transitions
#[derive(Parser)]
#[command(name = "root-relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Attest, relay and query identity tree roots", long_about = None)]
struct Cli {
    /// Emit structured logs to stderr (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an attester key
    Keygen {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sign a batch of root transitions
    Attest {
        /// Attester secret key (hex) or path to a keygen output file
        #[arg(short, long)]
        key: String,

        /// Source deployment the leaves are bound to
        #[arg(long)]
        origin: Principal,

        /// Transition as PREV:POST:REPLACED_AT (repeatable)
        #[arg(short, long = "transition", value_parser = parse_transition, required = true)]
        transitions: Vec<Transition>,

        /// Output file for the signed batch (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a relay state file from a deployment config
    Init {
        #[arg(short, long)]
        state: PathBuf,

        /// Path to the relay config JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Initializing principal (becomes an owner)
        #[arg(long)]
        caller: Principal,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Apply transitions from a signed batch
    Apply {
        #[arg(short, long)]
        state: PathBuf,

        /// Path to the signed batch JSON
        #[arg(short, long)]
        batch: PathBuf,

        /// Only apply the transition with this destination root
        #[arg(long)]
        post: Option<Root>,
    },

    /// Show the history entry for a root
    Info {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        root: Root,
    },

    /// Show the current head
    Latest {
        #[arg(short, long)]
        state: PathBuf,
    },

    /// Check whether a root would pass the proof gate
    #[command(name = "check-root")]
    CheckRoot {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(short, long)]
        root: Root,
    },

    /// Change the validity window (owners only)
    #[command(name = "set-window")]
    SetWindow {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(long)]
        caller: Principal,

        /// New window in seconds
        #[arg(long)]
        secs: u64,
    },

    /// Add owners (owners only)
    #[command(name = "add-owners")]
    AddOwners {
        #[arg(short, long)]
        state: PathBuf,

        #[arg(long)]
        caller: Principal,

        #[arg(long = "owner", required = true)]
        owners: Vec<Principal>,
    },

    /// Decode a base64 transition proof
    #[command(name = "decode-proof")]
    DecodeProof {
        /// Base64 proof, or path to a file containing it
        proof: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging();
    }

    match cli.command {
        Commands::Keygen { output } => keygen(output),

        Commands::Attest {
            key,
            origin,
            transitions,
            output,
        } => attest(&key, origin, transitions, output),

        Commands::Init {
            state,
            config,
            caller,
            force,
        } => init(&state, &config, caller, force),

        Commands::Apply { state, batch, post } => apply(&state, &batch, post),

        Commands::Info { state, root } => info(&state, root),

        Commands::Latest { state } => latest(&state),

        Commands::CheckRoot { state, root } => check_root(&state, root),

        Commands::SetWindow {
            state,
            caller,
            secs,
        } => set_window(&state, caller, secs),

        Commands::AddOwners {
            state,
            caller,
            owners,
        } => add_owners(&state, caller, owners),

        Commands::DecodeProof { proof } => decode_proof(&proof),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "root_relay=debug,relay_manager=info,relay_ledger=info,relay_verifier=debug".into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_transition(s: &str) -> std::result::Result<Transition, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [prev, post, at] = parts.as_slice() else {
        return Err(format!("expected PREV:POST:REPLACED_AT, got '{}'", s));
    };
    Ok(Transition {
        prev_root: parse_root(prev)?,
        post_root: parse_root(post)?,
        replaced_at: at
            .parse()
            .map_err(|e| format!("invalid replaced_at '{}': {}", at, e))?,
    })
}

/// Accept either a 32-byte hex digest or a small decimal integer
fn parse_root(s: &str) -> std::result::Result<Root, String> {
    if let Ok(n) = s.parse::<u64>() {
        return Ok(Root::from_u64(n));
    }
    Root::from_hex(s).map_err(|e| format!("invalid root '{}': {}", s, e))
}

fn write_output(output: Option<PathBuf>, contents: &str) -> Result<()> {
    if let Some(path) = output {
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        eprintln!("Written to: {}", path.display());
    } else {
        println!("{}", contents);
    }
    Ok(())
}

fn load_manager(path: &Path) -> Result<Manager> {
    let state = ManagerState::load(path)
        .with_context(|| format!("Failed to load relay state: {}", path.display()))?;
    let manager = IdentityManager::from_state(state, NoMembershipVerifier, SystemClock)
        .context("Failed to restore relay state")?;
    debug!(
        path = %path.display(),
        records = manager.ledger().len(),
        initialized = manager.is_initialized(),
        "Loaded relay state"
    );
    Ok(manager)
}

fn save_manager(path: &Path, manager: &Manager) -> Result<()> {
    manager
        .to_state()
        .save(path)
        .with_context(|| format!("Failed to save relay state: {}", path.display()))
}

fn load_key(key: &str) -> Result<AttesterKey> {
    let path = Path::new(key);
    if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;
        let json: serde_json::Value =
            serde_json::from_str(&contents).context("Failed to parse key file JSON")?;
        let secret = json["secret"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing secret field in key file"))?;
        return AttesterKey::from_hex(secret).context("Invalid secret key");
    }
    AttesterKey::from_hex(key).context("Invalid secret key")
}

fn keygen(output: Option<PathBuf>) -> Result<()> {
    let key = AttesterKey::generate();
    let json = serde_json::json!({
        "secret": key.secret_hex(),
        "principal": key.principal(),
    });
    eprintln!("Attester principal: {}", key.principal());
    write_output(output, &serde_json::to_string_pretty(&json)?)
}

fn attest(
    key: &str,
    origin: Principal,
    transitions: Vec<Transition>,
    output: Option<PathBuf>,
) -> Result<()> {
    let key = load_key(key)?;
    let mut batch = AttestationBatch::new(origin);
    batch.transitions = transitions;

    let signed = batch.sign(&key).context("Failed to sign batch")?;

    eprintln!("Batch signed");
    eprintln!("  Batch ID: {}", signed.batch_id);
    eprintln!("  Attester: {}", key.principal());
    eprintln!("  Origin: {}", signed.origin_id);
    eprintln!("  Transitions: {}", signed.transitions.len());
    eprintln!("  Batch root: {}", signed.batch_root);

    write_output(output, &signed.to_json()?)
}

fn init(state: &Path, config: &Path, caller: Principal, force: bool) -> Result<()> {
    if state.exists() && !force {
        anyhow::bail!(
            "State file {} already exists (use --force to overwrite)",
            state.display()
        );
    }

    let config = RelayConfig::from_file(config)
        .with_context(|| format!("Failed to load config: {}", config.display()))?;
    let manager = IdentityManager::from_config(&config, caller, NoMembershipVerifier, SystemClock)
        .context("Failed to initialize relay")?;
    save_manager(state, &manager)?;

    eprintln!("Relay initialized");
    eprintln!("  Chain: {}", config.chain_label);
    eprintln!("  Attester: {}", config.attester);
    eprintln!("  Origin: {}", config.origin_id);
    eprintln!("  Validity window: {}s", config.validity_window_secs);
    Ok(())
}

fn apply(state: &Path, batch: &Path, post: Option<Root>) -> Result<()> {
    let mut manager = load_manager(state)?;
    let contents = fs::read_to_string(batch)
        .with_context(|| format!("Failed to read batch file: {}", batch.display()))?;
    let signed = SignedBatch::from_json(&contents).context("Failed to parse signed batch")?;

    let selected: Vec<_> = match post {
        Some(root) => vec![signed
            .find(&root)
            .ok_or_else(|| anyhow::anyhow!("Batch has no transition to {}", root))?],
        None => signed.transitions.iter().collect(),
    };

    let mut events = Vec::with_capacity(selected.len());
    for transition in selected {
        let event = manager.apply_signed(transition).with_context(|| {
            format!(
                "Failed to apply {} -> {}",
                transition.prev_root, transition.post_root
            )
        })?;
        eprintln!(
            "Applied {} -> {} (latest: {})",
            event.prev_root, event.post_root, event.latest_root
        );
        events.push(event);
        // persist after each success so a later failure keeps earlier work
        save_manager(state, &manager)?;
    }

    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

fn info(state: &Path, root: Root) -> Result<()> {
    let manager = load_manager(state)?;
    let info = manager.root_info(&root);
    let json = serde_json::json!({
        "root": root,
        "exists": manager.root_exists(&root),
        "recorded": manager.is_recorded(&root),
        "replaced_by": info.replaced_by,
        "replaced_at": info.replaced_at,
        "is_latest": info.is_latest,
        "is_valid": info.is_valid,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn latest(state: &Path) -> Result<()> {
    let manager = load_manager(state)?;
    let json = match manager.latest_root() {
        Some((root, accepted_at)) => serde_json::json!({
            "root": root,
            "accepted_at": accepted_at,
            "validity_window": manager.validity_window(),
        }),
        None => serde_json::json!({
            "root": null,
            "validity_window": manager.validity_window(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn check_root(state: &Path, root: Root) -> Result<()> {
    let manager = load_manager(state)?;
    manager
        .check_root(&root)
        .with_context(|| format!("Root {} rejected", root))?;
    println!("Root {} accepted", root);
    Ok(())
}

fn set_window(state: &Path, caller: Principal, secs: u64) -> Result<()> {
    let mut manager = load_manager(state)?;
    let old = manager.validity_window();
    manager
        .set_validity_window(&caller, secs)
        .context("Failed to set validity window")?;
    save_manager(state, &manager)?;
    eprintln!("Validity window: {}s -> {}s", old, secs);
    Ok(())
}

fn add_owners(state: &Path, caller: Principal, owners: Vec<Principal>) -> Result<()> {
    let mut manager = load_manager(state)?;
    let added = manager
        .add_owners(&caller, owners)
        .context("Failed to add owners")?;
    save_manager(state, &manager)?;
    eprintln!("Added {} owner(s)", added);
    Ok(())
}

fn decode_proof(proof: &str) -> Result<()> {
    let path = Path::new(proof);
    let encoded = if path.exists() {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read proof file: {}", path.display()))?
    } else {
        proof.to_string()
    };
    let proof = TransitionProof::from_base64(&encoded).context("Failed to decode proof")?;

    let json = serde_json::json!({
        "version": TransitionProof::VERSION,
        "encoded_len": proof.encoded_len(),
        "siblings": proof.siblings,
        "signature": proof.signature,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

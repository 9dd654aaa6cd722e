//! ZKCA CLI — commitment-based authentication and certificate issuance
//!
//! Commands:
//!   zkca prove     — run one commit → reveal → verify session
//!   zkca stress    — run the adversarial forgery simulation on a commitment
//!   zkca issue     — issue a certificate and persist the registry
//!   zkca auth      — authenticate a client against its certificate
//!   zkca list      — list issued certificates
//!   zkca selftest  — run the built-in expected pass/fail table
//!   zkca demo      — walk through sessions, stress tests and issuance

use std::env;
use std::path::Path;
use std::process::ExitCode;

use zkca_core::protocol::{AdversarialSimulator, Prover, Session, VerificationStrategy, Verifier};
use zkca_core::{
    commit, CertificateAuthority, Commitment, Nonce, Opening, ProtocolConfig, ProtocolError,
    RegistryError, Secret, VerificationMode,
};

const REGISTRY_FILE: &str = "zkca-registry.json";
const CONFIG_FILE: &str = "zkca-config.json";

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        ZKCA v0.1 — Commitment-Based Authentication           ║
║        Commit → Reveal → Verify + Certificate Authority      ║
╚══════════════════════════════════════════════════════════════╝

Usage: zkca <command> [options]

Commands:
  prove     <secret>                     Run one verification session
  stress    <secret> [trials]            Adversarial forgery simulation
  issue     <client_id> <name> <secret>  Issue a certificate
  auth      <client_id> <secret> <nonce> Authenticate against a certificate
  list                                   List issued certificates
  selftest                               Run the expected pass/fail table
  demo                                   Run the full walkthrough

Config is read from {CONFIG_FILE} (or $ZKCA_CONFIG) when present.
Note: verification discloses the secret to the verifier; this is a
commit/reveal scheme, not a zero-knowledge proof.
"#
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let Some(config) = load_config() else {
        return ExitCode::FAILURE;
    };

    let ok = match args[1].as_str() {
        "prove" => cmd_prove(&config, &args[2..]),
        "stress" => cmd_stress(&config, &args[2..]),
        "issue" => cmd_issue(&config, &args[2..]),
        "auth" => cmd_auth(&config, &args[2..]),
        "list" => cmd_list(&config),
        "selftest" => cmd_selftest(&config),
        "demo" => cmd_demo(&config),
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            false
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Config file if present, defaults otherwise
fn load_config() -> Option<ProtocolConfig> {
    let path = env::var("ZKCA_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
    if !Path::new(&path).exists() {
        return Some(ProtocolConfig::default());
    }
    match ProtocolConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path);
            Some(config)
        }
        Err(e) => {
            eprintln!("  Invalid config {}: {}", path, e);
            None
        }
    }
}

/// Load or create the authority
fn load_authority(config: &ProtocolConfig) -> Option<CertificateAuthority> {
    if Path::new(REGISTRY_FILE).exists() {
        match CertificateAuthority::load(REGISTRY_FILE, config) {
            Ok(ca) => {
                println!("  Loaded {} certificates from {}", ca.len(), REGISTRY_FILE);
                return Some(ca);
            }
            Err(e) => {
                eprintln!("  Failed to load {}: {}", REGISTRY_FILE, e);
                return None;
            }
        }
    }
    println!("  No existing registry found, starting fresh");
    match CertificateAuthority::new(config) {
        Ok(ca) => Some(ca),
        Err(e) => {
            eprintln!("  {}", e);
            None
        }
    }
}

fn save_authority(ca: &CertificateAuthority) -> bool {
    match ca.save(REGISTRY_FILE) {
        Ok(()) => {
            println!("  Saved to {}", REGISTRY_FILE);
            true
        }
        Err(e) => {
            eprintln!("  Failed to save: {}", e);
            false
        }
    }
}

fn run_session(config: &ProtocolConfig, secret: &str) -> bool {
    let prover = match Prover::from_config(secret, config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let mut session = match Session::from_config(prover, config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    match session.execute() {
        Ok(outcome) => {
            println!("  Session:    {}", outcome.session_id);
            println!("  Strategy:   {}", outcome.strategy);
            println!("  Commitment: {}", outcome.commitment);
            println!("  Outcome:    {}", outcome.state);
            outcome.is_verified()
        }
        Err(e) => {
            eprintln!("  Session error: {}", e);
            false
        }
    }
}

fn cmd_prove(config: &ProtocolConfig, args: &[String]) -> bool {
    let Some(secret) = args.first() else {
        eprintln!("Usage: zkca prove <secret>");
        return false;
    };
    println!();
    let verified = run_session(config, secret);
    if verified {
        println!("  Verification successful! Secret is valid.");
    } else {
        println!("  Verification failed! Secret is invalid.");
    }
    verified
}

fn cmd_stress(config: &ProtocolConfig, args: &[String]) -> bool {
    let Some(secret) = args.first() else {
        eprintln!("Usage: zkca stress <secret> [trials]");
        return false;
    };
    let trials: u32 = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.simulator_trials);

    let mut prover = match Prover::from_config(secret.as_str(), config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let commitment = prover.commit();
    let nonce = match prover.open() {
        Ok(opening) => opening.nonce,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let mut simulator = match AdversarialSimulator::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };

    let report = simulator.run(&commitment, nonce, trials);
    println!("\n  Commitment:      {}", commitment);
    println!(
        "  Candidate space: {:.1} bits ({} trials, {} hash evaluations)",
        simulator.candidate_space_bits(),
        report.trials_requested,
        report.hash_evaluations
    );
    println!(
        "  P(detect):       {:.3e}  (false-negative rate {:.12})",
        simulator.detection_probability(trials),
        simulator.false_negative_rate(trials)
    );
    if report.is_resistant() {
        println!("  No forgery found. This is a heuristic, not a soundness proof.");
        true
    } else {
        println!("  Forgery found: commitment opened by a random candidate.");
        false
    }
}

fn cmd_issue(config: &ProtocolConfig, args: &[String]) -> bool {
    if args.len() < 3 {
        eprintln!("Usage: zkca issue <client_id> <name> <secret>");
        return false;
    }
    let Some(ca) = load_authority(config) else {
        return false;
    };
    match ca.issue_with_opening(&args[0], &args[1], args[2].as_str()) {
        Ok((cert, opening)) => {
            println!("\n  Certificate for {}: {}", cert.client_name, cert.commitment);
            println!("  {}", cert.summary());
            println!("  Keep this nonce to authenticate later: {}", opening.nonce);
            save_authority(&ca)
        }
        Err(e) => {
            eprintln!("  Issuance failed: {}", e);
            false
        }
    }
}

fn cmd_auth(config: &ProtocolConfig, args: &[String]) -> bool {
    if args.len() < 3 {
        eprintln!("Usage: zkca auth <client_id> <secret> <nonce>");
        return false;
    }
    let nonce: Nonce = match args[2].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("  nonce must be a number");
            return false;
        }
    };
    let Some(ca) = load_authority(config) else {
        return false;
    };
    let opening = Opening::new(Secret::from(args[1].as_str()), nonce);
    match ca.authenticate(&args[0], &opening) {
        Ok(true) => {
            println!("  Client {} authenticated.", args[0]);
            true
        }
        Ok(false) => {
            println!("  Client {} failed authentication.", args[0]);
            false
        }
        Err(e) => {
            eprintln!("  {}", e);
            false
        }
    }
}

fn cmd_list(config: &ProtocolConfig) -> bool {
    let Some(ca) = load_authority(config) else {
        return false;
    };
    if ca.is_empty() {
        println!("\n  No certificates. Use 'zkca issue' or 'zkca demo' to get started.");
        return true;
    }
    println!("\n  Certificates ({}):", ca.len());
    println!("  {}", "-".repeat(80));
    for cert in ca.list() {
        println!("  {}", cert.summary());
    }
    true
}

/// Checks openings against a decoy commitment, so honest openings fail
struct ForcedMismatch(Verifier);

impl VerificationStrategy for ForcedMismatch {
    fn name(&self) -> &'static str {
        "forced_mismatch"
    }

    fn evaluate(&mut self, _commitment: &Commitment, opening: &Opening) -> bool {
        let decoy = commit(b"non_matching_commitment", opening.nonce);
        self.0.verify(&decoy, &opening.secret, opening.nonce)
    }
}

const SELFTEST_CASES: [(&str, bool); 4] = [
    ("my_secret_value", true),
    ("another_secret", false),
    ("secure_secret", true),
    ("fake_secret", false),
];

/// Run one self-test session. Cases expected to fail go through
/// `ForcedMismatch`; returns whether the session verified.
fn selftest_case(
    config: &ProtocolConfig,
    secret: &str,
    expected: bool,
) -> Result<bool, ProtocolError> {
    let prover = Prover::from_config(secret, config)?;
    let mut session = if expected {
        Session::new(prover, Verifier::new())
    } else {
        Session::new(prover, ForcedMismatch(Verifier::new()))
    };
    Ok(session.execute()?.is_verified())
}

fn cmd_selftest(config: &ProtocolConfig) -> bool {
    println!("\n  Self-test ({} cases)", SELFTEST_CASES.len());
    println!("  {}", "-".repeat(60));
    let mut passed = 0;
    for (secret, expected) in SELFTEST_CASES {
        let verified = match selftest_case(config, secret, expected) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("  {}: session error {}", secret, e);
                false
            }
        };
        let ok = verified == expected;
        if ok {
            passed += 1;
        }
        println!(
            "  [{}] {:<16} expected={:<5} got={:<5}",
            if ok { "PASS" } else { "FAIL" },
            secret,
            expected,
            verified
        );
    }
    println!("  {}/{} cases behaved as expected", passed, SELFTEST_CASES.len());
    passed == SELFTEST_CASES.len()
}

fn cmd_demo(config: &ProtocolConfig) -> bool {
    let mut ok = true;

    println!("\nStep 1: Baseline session...");
    println!("{}", "-".repeat(60));
    let baseline = ProtocolConfig {
        verification: VerificationMode::Equality,
        ..config.clone()
    };
    ok &= run_session(&baseline, "my_secret_value");

    println!("\nStep 2: Verifier with right and wrong secrets...");
    println!("{}", "-".repeat(60));
    match Prover::from_config("my_secret_value", config) {
        Ok(mut prover) => {
            let d = prover.commit();
            match prover.open() {
                Ok(opening) => {
                    let verifier = Verifier::new();
                    let right = verifier.verify(&d, &opening.secret, opening.nonce);
                    let wrong = verifier.verify(&d, "wrong_secret", opening.nonce);
                    println!("  digest={}…", d.short());
                    println!(
                        "  revealed: secret={:?} nonce={}",
                        opening.secret.reveal_lossy(),
                        opening.nonce
                    );
                    println!("  verify(revealed secret) = {}", right);
                    println!("  verify(\"wrong_secret\") = {}", wrong);
                    ok &= right && !wrong;
                }
                Err(e) => {
                    eprintln!("  {}", e);
                    ok = false;
                }
            }
        }
        Err(e) => {
            eprintln!("  {}", e);
            ok = false;
        }
    }

    println!("\nStep 3: Stress-tested session...");
    println!("{}", "-".repeat(60));
    let stressed = ProtocolConfig {
        verification: VerificationMode::StressTested,
        ..config.clone()
    };
    if run_session(&stressed, "my_enhanced_secret_value") {
        println!("  Enhanced verification successful!");
    } else {
        println!("  Enhanced verification failed!");
        ok = false;
    }

    println!("\nStep 4: Certificate management...");
    println!("{}", "-".repeat(60));
    match CertificateAuthority::new(config) {
        Ok(ca) => {
            for (id, name, secret) in [
                ("001", "Client1", "client_secret_1"),
                ("002", "Client2", "client_secret_2"),
                ("001", "Client1", "client_secret_1"),
            ] {
                match ca.issue(id, name, secret) {
                    Ok(cert) => println!("  Certificate for {}: {}", cert.client_name, cert.commitment),
                    Err(RegistryError::DuplicateClient(id)) => {
                        println!("  Rejected duplicate client id {}", id)
                    }
                    Err(e) => {
                        eprintln!("  {}", e);
                        ok = false;
                    }
                }
            }
            println!("  {}", ca.summary());
        }
        Err(e) => {
            eprintln!("  {}", e);
            ok = false;
        }
    }

    println!("\nStep 5: Self-test table...");
    println!("{}", "-".repeat(60));
    ok &= cmd_selftest(config);

    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║              ZKCA v0.1 Demo Complete!                        ║
║                                                              ║
║  - Commit → reveal → verify sessions (equality + stress)     ║
║  - Bounded adversarial forgery simulation                    ║
║  - Certificate authority with duplicate-id rejection         ║
║                                                              ║
║  Run 'zkca issue' to persist certificates.                   ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    ok
}

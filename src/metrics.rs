use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use crate::rings::RingInfo;
use crate::smarts::parse_smarts;

/// Structural statistics of an environment token, used to order tokens of
/// the same radius deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMetrics {
    pub radius: u32,
    pub num_atoms: u32,
    pub num_bonds: u32,
    pub has_ring: u8,
    pub num_hetero: u32,
    pub has_unsat: u8,
    pub token: String,
}

/// Total order over tokens: radius first, then size, ring membership,
/// heteroatom count, unsaturation, and finally the token string itself as
/// the tie-break.
pub type ComplexityKey = (u32, u32, u32, u8, u32, u8, String);

/// Radius encoded in a token's `r{layer}:` prefix; 0 when the prefix is
/// missing or malformed.
pub fn token_radius(token: &str) -> u32 {
    if token.len() < 3 || !token.starts_with('r') {
        return 0;
    }
    let Some(pos) = token.find(':') else {
        return 0;
    };
    if pos <= 1 {
        return 0;
    }
    token[1..pos].parse().unwrap_or(0)
}

/// SMARTS payload of a token: everything after the first `:`, or the whole
/// token when there is none.
pub fn token_smarts(token: &str) -> &str {
    match token.split_once(':') {
        Some((_, rest)) => rest,
        None => token,
    }
}

fn compute_metrics(token: &str) -> TokenMetrics {
    let mut metrics = TokenMetrics {
        radius: token_radius(token),
        token: token.to_string(),
        ..TokenMetrics::default()
    };

    let query = match parse_smarts(token_smarts(token)) {
        Ok(q) => q,
        // Unparseable payloads still sort, just with zero structure.
        Err(_) => return metrics,
    };

    metrics.num_atoms = query.atom_count() as u32;
    metrics.num_bonds = query.bond_count() as u32;
    metrics.has_ring = u8::from(RingInfo::sssr(&query).num_rings() > 0);
    metrics.num_hetero = query
        .atoms()
        .filter(|&i| query.atom(i).is_hetero())
        .count() as u32;
    metrics.has_unsat = u8::from(query.bonds().any(|e| query.bond(e).is_unsaturated()));

    metrics
}

static CACHE: LazyLock<Mutex<HashMap<String, TokenMetrics>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Metrics for a token, memoised process-wide.
///
/// The metrics are a pure function of the token string, so the cache is
/// content-addressed and entries never change. Computation happens outside
/// the lock; a racing insert of the same key lands the identical value.
pub fn token_metrics(token: &str) -> TokenMetrics {
    if let Some(metrics) = CACHE.lock().expect("metrics cache poisoned").get(token) {
        return metrics.clone();
    }

    let computed = compute_metrics(token);
    CACHE
        .lock()
        .expect("metrics cache poisoned")
        .entry(token.to_string())
        .or_insert(computed)
        .clone()
}

pub fn complexity_key(token: &str) -> ComplexityKey {
    let metrics = token_metrics(token);
    (
        metrics.radius,
        metrics.num_atoms,
        metrics.num_bonds,
        metrics.has_ring,
        metrics.num_hetero,
        metrics.has_unsat,
        metrics.token,
    )
}

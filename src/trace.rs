use std::collections::BTreeMap;
use std::fmt::Write;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::element::Element;
use crate::env::{environment_tokens, EnvConfig, PerCenter};
use crate::metrics::complexity_key;
use crate::mol::Mol;
use crate::morgan::morgan_fingerprint_bits;
use crate::smarts::FragmentError;
use crate::smiles::parse_smiles;

/// Default fingerprint width in bits.
pub const FINGERPRINT_SIZE: usize = 2048;

// U+00D7 MULTIPLICATION SIGN and U+2192 RIGHTWARDS ARROW; both are part of
// the wire format and must stay exactly these code points.
const COUNT_SEPARATOR: char = '\u{00D7}';
const CHAIN_ARROW: &str = " \u{2192} ";

/// Options for [`trace_from_smiles`].
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Morgan radius.
    pub radius: u32,
    /// Chirality-aware tokens and fingerprint.
    pub isomeric: bool,
    /// Attempt kekulisation before enumerating environments.
    pub kekulize: bool,
    /// Append the per-center chain section.
    pub include_per_center: bool,
    /// Fingerprint width in bits.
    pub fp_nbits: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            isomeric: true,
            kekulize: false,
            include_per_center: true,
            fp_nbits: FINGERPRINT_SIZE,
        }
    }
}

/// A reasoning trace and the fingerprint it explains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub text: String,
    pub fingerprint: Vec<u8>,
}

/// Generate the ECFP reasoning trace and fingerprint for a SMILES string.
///
/// Unparseable input is a soft failure: the result is an empty trace and
/// an all-zero fingerprint of the configured width. Internal serialisation
/// failures propagate.
pub fn trace_from_smiles(smiles: &str, cfg: &TraceConfig) -> Result<TraceResult, FragmentError> {
    let mol = match parse_smiles(smiles) {
        Ok(mol) => mol,
        Err(_) => {
            return Ok(TraceResult {
                text: String::new(),
                fingerprint: vec![0; cfg.fp_nbits],
            })
        }
    };

    let per_center = environment_tokens(
        &mol,
        &EnvConfig {
            radius: cfg.radius,
            isomeric: cfg.isomeric,
            kekulize: cfg.kekulize,
            include_radius_tag: true,
            mark_root: true,
        },
    )?;
    let fingerprint = morgan_fingerprint_bits(&mol, cfg.radius, cfg.fp_nbits, cfg.isomeric);
    let text = compose_trace(&mol, &per_center, cfg.include_per_center);

    Ok(TraceResult { text, fingerprint })
}

/// Render the per-center token map as the multi-line trace text.
pub fn compose_trace(
    mol: &Mol<Atom, Bond>,
    per_center: &PerCenter,
    include_per_center: bool,
) -> String {
    let mut by_radius: BTreeMap<u32, BTreeMap<String, u32>> = BTreeMap::new();
    for layers in per_center.values() {
        for (&layer, token) in layers {
            *by_radius
                .entry(layer)
                .or_default()
                .entry(token.clone())
                .or_default() += 1;
        }
    }

    let mut lines: Vec<String> = Vec::new();
    for (&layer, counts) in &by_radius {
        let mut tokens: Vec<(&String, u32)> =
            counts.iter().map(|(token, &count)| (token, count)).collect();
        tokens.sort_by_cached_key(|(token, _)| complexity_key(token.as_str()));

        let mut line = format!("r{layer}: ");
        for (i, (token, count)) in tokens.iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            write!(line, "{token}{COUNT_SEPARATOR}{count}").expect("writing to a string");
        }
        lines.push(line);
    }

    if include_per_center && !per_center.is_empty() {
        lines.push(String::new());
        lines.push("# per-center chains".to_string());

        for (&center, layers) in per_center {
            let symbol = Element::from_atomic_num(mol.atom(NodeIndex::new(center)).atomic_num)
                .map_or("*", |e| e.symbol());
            let chain: Vec<&str> = layers.values().map(String::as_str).collect();
            lines.push(format!("{symbol}{center}: {}", chain.join(CHAIN_ARROW)));
        }
    }

    lines.join("\n")
}

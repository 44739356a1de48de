pub mod atom;
pub mod batch;
pub mod bond;
pub mod descriptors;
pub mod element;
pub mod env;
pub mod graph_ops;
pub mod kekulize;
pub mod metrics;
pub mod mol;
pub mod morgan;
pub mod rings;
pub mod smarts;
pub mod smiles;
pub mod trace;

pub use atom::{Atom, Chirality};
pub use batch::{trace_batch, BatchError, TraceBatch};
pub use bond::{Bond, BondOrder};
pub use element::Element;
pub use env::{environment_tokens, EnvConfig, PerCenter};
pub use kekulize::{kekulize, KekulizeError};
pub use metrics::{complexity_key, token_metrics, token_radius, token_smarts, TokenMetrics};
pub use mol::Mol;
pub use morgan::{atom_environment_of_radius, morgan_bit_info, morgan_fingerprint_bits, BitInfo};
pub use rings::RingInfo;
pub use smarts::{fragment_to_smarts, parse_smarts, FragmentError, SmartsError};
pub use smiles::{parse_smiles, to_smiles, SmilesError};
pub use trace::{trace_from_smiles, TraceConfig, TraceResult, FINGERPRINT_SIZE};

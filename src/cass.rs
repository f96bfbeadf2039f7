//! Context-aware semantic structure (CASS) parsing and featurization.
//!
//! A CASS file stores one flattened syntax tree per line. This module
//! deserializes those records, rebuilds the trees, resolves variable and
//! function use chains, and extracts contextual features from the leaves.

pub mod builder;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod node;
pub mod testing;
pub mod token;
pub mod tree;

pub use builder::parse_record;
pub use config::{
    AnnotMode, CompoundMode, Config, ConfigError, FunSigMode, GlobalFunMode, GlobalVarMode,
};
pub use error::{LoadError, RecordError};
pub use features::{Context, Feature};
pub use loader::{load_file, load_str, Forest, Loader};
pub use node::{Node, NodeId, NodeKind};
pub use tree::{LeafRange, Tree};

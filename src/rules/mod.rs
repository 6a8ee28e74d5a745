//! Rule tables driving attack resolution
//!
//! Hit-count and jam tables are data, not code: they ship as TOML files
//! under data/ and can be overridden from a directory at startup. The
//! builtin copies are compiled in so the engine always has a valid set.

pub mod loader;
pub mod tables;

pub use loader::{load_rules, RulesData};
pub use tables::{ClusterTable, JamTable};

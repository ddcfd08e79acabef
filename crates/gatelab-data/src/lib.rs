//! Data-file loading for challenge packs.
//!
//! Challenge packs are RON, JSON, or TOML files describing a list of
//! challenges: layout, metadata, and a declarative test specification.
//! [`schema`] holds the on-disk serde structs; [`loader`] detects formats,
//! parses, validates, and resolves them into [`gatelab_challenge::Challenge`]
//! values. Code-defined predicate tests have no on-disk form by design.

pub mod loader;
pub mod schema;

pub use loader::{
    DataLoadError, Format, detect_format, find_pack_file, load_pack, parse_pack, resolve_pack,
};

//! # Assets
//!
//! Fetching and parsing of the displayed model. Loading never fails from the
//! caller's point of view: any fetch or parse error is logged and replaced by
//! a placeholder cube, so the scene always has exactly one object to show.

pub mod loader;
pub mod source;

pub use loader::{load_primary_asset, parse_obj, AssetError, LoadedAsset, PLACEHOLDER_NAME};
pub use source::{AssetSource, FileAssetSource};

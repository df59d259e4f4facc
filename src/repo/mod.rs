//! Maintenance tools for the extension repository
//!
//! These cover the chores around publishing built extensions: collecting
//! release APKs from the build tree, generating the repository index,
//! listing raw download links for workflow files and printing the layout of
//! the source tree.

pub mod apks;
pub mod index;
pub mod links;
pub mod tree;

pub use apks::{find_release_apks, organize_apks, CopiedApk};
pub use index::{generate_index, parse_apk_file_name, ExtensionEntry, IndexReport};
pub use links::{generate_links, render_links, RawLinkList};
pub use tree::{render_tree, TreeOptions, TreeSummary};

/// Bytes per megabyte when reporting file sizes
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

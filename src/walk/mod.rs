// src/walk/mod.rs
// =============================================================================
// Repository traversal.
//
// Features:
// - Depth-first walk in the order the contents API lists entries
// - Ignored names (.git, node_modules, ...) prune whole subtrees
// - Lazy: one listing request per directory, only when reached
// - Fails fast: a broken listing aborts the walk
// =============================================================================

mod traversal;

pub use traversal::{FileDescriptor, Walker};

//! Hardening limits for decoding engine output.
//!
//! The encoded tree is produced by an external evaluation engine and is
//! treated as untrusted: recursion is bounded so a malformed, deeply
//! self-nested container cannot blow the stack.

/// Maximum nesting depth of the encoded tree.
///
/// Real object hierarchies are a handful of levels deep; 64 leaves
/// generous headroom while keeping recursion bounded.
pub const MAX_TREE_DEPTH: usize = 64;

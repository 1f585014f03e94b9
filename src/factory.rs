//! The factory contract: creating nodes and marshaling trees.

use crate::{Data, Result};
use std::io;

/// Creates empty nodes of one concrete [`Data`] implementation and moves
/// trees of that implementation to and from byte streams.
///
/// The byte layout is private to each implementation. The only guarantee is
/// that `deserialize` restores a tree structurally equal to the one given to
/// `serialize`.
pub trait DataFactory {
    type Node: Data;

    /// Returns a fresh, mutable, empty node.
    fn create_data(&self) -> Self::Node;

    /// Writes `data` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree exceeds the encoder limits or if writing
    /// fails; stream errors are returned unchanged.
    fn serialize<W: io::Write>(&self, data: &Self::Node, writer: W) -> Result<()>;

    /// Reads one tree from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or truncated, or if reading
    /// fails.
    fn deserialize<R: io::Read>(&self, reader: R) -> Result<Self::Node>;
}

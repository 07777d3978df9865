//! Print sheet imposition.

/// Grid planning and cut-guide placement.
pub mod layout;
/// Sheet rendering and incremental packing.
pub mod packer;

use std::{fmt, hash};

/// A raw entity ID.
///
/// Types implementing this trait are used as keys in allocators and storages.
pub trait Raw: Sized + Send + Sync + Copy + fmt::Debug + Eq + Ord + hash::Hash + 'static {
    /// Converts the primitive scalar to the ID.
    ///
    /// Panics if the scalar does not fit in the ID type.
    fn from_primitive(i: Primitive) -> Self;

    /// Converts the ID to a scalar.
    ///
    /// The returned scalar is used for indexing in Vec-based storages,
    /// so IDs should be allocated from small numbers upwards.
    fn to_primitive(self) -> Primitive;
}

/// The primitive scalar type.
pub type Primitive = usize;

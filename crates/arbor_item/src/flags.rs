//! Packed state bits for records, fields and numbers.

use bitflags::bitflags;

bitflags! {
    /// Handle state of a [`Record`](crate::Record).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct RecordFlags: u8 {
        /// Storage is shared with another handle. The next mutation forks it.
        const ALIASED = 1 << 0;
        /// Committed. Every mutator fails.
        const IMMUTABLE = 1 << 1;
    }
}

bitflags! {
    /// State of a [`Field`](crate::Field).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FieldFlags: u8 {
        /// Committed. `set_value` fails.
        const IMMUTABLE = 1 << 0;
    }
}

bitflags! {
    /// Provenance hints carried by a [`Num`](crate::Num).
    ///
    /// Hints only affect rendering; they never take part in equality,
    /// ordering or hashing.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NumFlags: u8 {
        const UINT32 = 1 << 0;
        const UINT64 = 1 << 1;
    }
}

//! Stored things with an identity.
//!
//! An entity is the same record for as long as its identifier is the same,
//! whatever its other fields hold. Orders only get one once storage assigns it.

pub trait Entity {
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

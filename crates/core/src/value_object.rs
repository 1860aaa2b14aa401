//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two value objects holding the same values
//! are the same thing. In this workspace they are also the place where input
//! validation lives: a value object can only be constructed from a valid value,
//! so holding one is proof the check already ran.

/// Marker trait for value objects.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct CustomerCode(i64);
///
/// impl ValueObject for CustomerCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

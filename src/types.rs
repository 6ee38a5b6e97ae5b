//! Comparable handles to runtime types
//!
//! A [`Type`] is the atomic unit of the whole model: an opaque, totally
//! ordered handle to a runtime type. Ordering is by canonical type name so
//! that graph traversal and set membership are deterministic across runs.

use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::{InjectError, Result};

/// The universal root of every registered inheritance chain.
///
/// Plays the role of the host object model's base type: every chain in the
/// [`TypeRegistry`](crate::TypeRegistry) terminates here, and the base object
/// itself can never be configured as a component type.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseObject;

#[derive(Debug, Clone, Copy)]
enum Repr {
    Empty,
    Described { id: TypeId, name: &'static str },
}

/// A comparable handle to a runtime type.
///
/// A handle is *empty* (no descriptor), the *base object*
/// ([`Type::base_object`]), or *valid* (anything else). Most of the engine
/// requires valid handles; public entry points validate and reject the other
/// two states.
///
/// Equality is by runtime [`TypeId`]; ordering is by canonical name, which is
/// stable across runs.
#[derive(Debug, Clone, Copy)]
pub struct Type {
    repr: Repr,
}

impl Type {
    /// Create an empty type handle
    #[inline]
    pub fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Create the handle for a runtime type
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            repr: Repr::Described {
                id: TypeId::of::<T>(),
                name: std::any::type_name::<T>(),
            },
        }
    }

    /// The handle of the universal base object
    #[inline]
    pub fn base_object() -> Self {
        Self::of::<BaseObject>()
    }

    /// True if this handle carries no descriptor
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// True if this handle denotes the base object
    #[inline]
    pub fn is_base_object(&self) -> bool {
        match self.repr {
            Repr::Empty => false,
            Repr::Described { id, .. } => id == TypeId::of::<BaseObject>(),
        }
    }

    /// True if this handle is neither empty nor the base object
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && !self.is_base_object()
    }

    /// Canonical name of the type, if any
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        match self.repr {
            Repr::Empty => None,
            Repr::Described { name, .. } => Some(name),
        }
    }

    /// Name for diagnostics; empty handles render as `<empty>`
    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.name().unwrap_or("<empty>")
    }

    /// Runtime id of the type, if any
    #[inline]
    pub(crate) fn id(&self) -> Option<TypeId> {
        match self.repr {
            Repr::Empty => None,
            Repr::Described { id, .. } => Some(id),
        }
    }
}

/// Reject handles that cannot name a configured component.
///
/// Fails with [`InjectError::EmptyType`] for empty handles and
/// [`InjectError::BaseObjectType`] for the base object.
pub(crate) fn validate(t: &Type) -> Result<()> {
    if t.is_empty() {
        return Err(InjectError::EmptyType);
    }
    if t.is_base_object() {
        return Err(InjectError::BaseObjectType);
    }
    Ok(())
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => true,
            (Repr::Described { id: a, .. }, Repr::Described { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Type {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => Ordering::Equal,
            (Repr::Empty, _) => Ordering::Less,
            (_, Repr::Empty) => Ordering::Greater,
            (Repr::Described { id: a, name: an }, Repr::Described { id: b, name: bn }) => {
                // Name first for run-to-run stability, id as a tie-breaker so
                // the order stays consistent with equality.
                an.cmp(bn).then_with(|| a.cmp(b))
            }
        }
    }
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.repr {
            Repr::Empty => 0u8.hash(state),
            Repr::Described { id, .. } => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    #[test]
    fn test_empty_type_state() {
        let t = Type::empty();
        assert!(t.is_empty());
        assert!(!t.is_base_object());
        assert!(!t.is_valid());
        assert_eq!(t.name(), None);
        assert_eq!(t.display_name(), "<empty>");
    }

    #[test]
    fn test_base_object_state() {
        let t = Type::base_object();
        assert!(!t.is_empty());
        assert!(t.is_base_object());
        assert!(!t.is_valid());
    }

    #[test]
    fn test_valid_type_state() {
        let t = Type::of::<Alpha>();
        assert!(t.is_valid());
        assert!(t.name().unwrap().ends_with("Alpha"));
    }

    #[test]
    fn test_equality_by_runtime_type() {
        assert_eq!(Type::of::<Alpha>(), Type::of::<Alpha>());
        assert_ne!(Type::of::<Alpha>(), Type::of::<Beta>());
        assert_eq!(Type::empty(), Type::empty());
        assert_ne!(Type::empty(), Type::of::<Alpha>());
    }

    #[test]
    fn test_ordering_by_name() {
        let a = Type::of::<Alpha>();
        let b = Type::of::<Beta>();
        assert!(a < b);
        assert!(Type::empty() < a);
    }

    #[test]
    fn test_validate_rejects_empty_and_base() {
        assert_eq!(validate(&Type::empty()), Err(InjectError::EmptyType));
        assert_eq!(
            validate(&Type::base_object()),
            Err(InjectError::BaseObjectType)
        );
        assert_eq!(validate(&Type::of::<Alpha>()), Ok(()));
    }
}

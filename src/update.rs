/// Persistent-record updates.
///
/// Game values are never mutated after construction.  A value that needs a
/// different field is rebuilt by structural copy with that one field swapped,
/// leaving the original untouched.  Each record names its replaceable fields
/// with an enum so a patch is a plain list of those variants.

/// A value type that can produce a copy of itself with some fields replaced.
pub trait WithFields: Clone {
    /// One replaceable field together with its new value.
    type Field;

    /// Return a copy of `self` with a single field replaced.
    fn with_field(&self, field: Self::Field) -> Self;

    /// Return a copy of `self` with every field in `patch` replaced.
    ///
    /// Later entries win when the same field appears twice.
    fn with_fields<I>(&self, patch: I) -> Self
    where
        I: IntoIterator<Item = Self::Field>,
    {
        patch
            .into_iter()
            .fold(self.clone(), |acc, field| acc.with_field(field))
    }
}

/// Replaceable fields shared by every arena body.
///
/// Width and height are fixed per entity kind, so only the position can be
/// patched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyField {
    X(f32),
    Y(f32),
}

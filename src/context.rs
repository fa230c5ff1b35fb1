use crate::schema::{FieldDescriptor, FieldRef};
use crate::{Error, ErrorKind, Result};

/// A decoded fixed-width value, kept so later fields can use it as a size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    /// Interprets the value as a byte count. Non-negative integers and
    /// finite, non-negative, whole floats qualify.
    pub fn as_length(self) -> Option<usize> {
        match self {
            Scalar::UInt(v) => usize::try_from(v).ok(),
            Scalar::Int(v) => usize::try_from(v).ok(),
            Scalar::Float(v) => {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                    usize::try_from(v as u64).ok()
                } else {
                    None
                }
            }
            Scalar::Bool(_) => None,
        }
    }
}

struct Scope {
    fields: &'static [FieldDescriptor],
    values: Vec<Option<Scalar>>,
}

/// Scalar values decoded so far, one scope per record being walked.
#[derive(Default)]
pub(crate) struct Context {
    scopes: Vec<Scope>,
}

impl Context {
    pub(crate) fn enter(&mut self, fields: &'static [FieldDescriptor]) {
        self.scopes.push(Scope {
            fields,
            values: vec![None; fields.len()],
        });
    }

    pub(crate) fn exit(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Descriptor of the field at `index` in the innermost record.
    pub(crate) fn field(&self, index: usize) -> Result<&'static FieldDescriptor> {
        self.scopes
            .last()
            .and_then(|scope| scope.fields.get(index))
            .ok_or_else(|| Error::new(ErrorKind::UnknownField { index }))
    }

    pub(crate) fn store(&mut self, index: usize, value: Scalar) -> Result<()> {
        let slot = self
            .scopes
            .last_mut()
            .and_then(|scope| scope.values.get_mut(index))
            .ok_or_else(|| Error::new(ErrorKind::UnknownField { index }))?;
        *slot = Some(value);
        Ok(())
    }

    fn lookup(&self, reference: FieldRef) -> Option<Scalar> {
        let (current, enclosing) = self.scopes.split_last()?;
        if let Some(index) = reference.sibling {
            return current.values.get(index).copied().flatten();
        }
        enclosing.iter().rev().find_map(|scope| {
            let index = scope
                .fields
                .iter()
                .position(|f| f.name == reference.name)?;
            scope.values[index]
        })
    }

    /// Resolves the byte count `field` declares through `reference`.
    pub(crate) fn resolve_length(
        &self,
        field: &'static FieldDescriptor,
        reference: FieldRef,
    ) -> Result<usize> {
        let value = self.lookup(reference).ok_or_else(|| {
            Error::new(ErrorKind::UnresolvedSizeReference {
                field: field.name,
                reference: reference.name,
            })
        })?;
        value.as_length().ok_or_else(|| {
            Error::new(ErrorKind::InvalidSizeValue {
                field: field.name,
                reference: reference.name,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, Scalar};
    use crate::schema::{Annotation, FieldDescriptor, FieldRef, Kind};
    use crate::{Error, ErrorKind};

    static OUTER: [FieldDescriptor; 2] = [
        FieldDescriptor::new("count", Kind::UInt8, Annotation::None),
        FieldDescriptor::new("items", Kind::RecordSequence, Annotation::None),
    ];

    static INNER: [FieldDescriptor; 2] = [
        FieldDescriptor::new("count", Kind::Int16, Annotation::None),
        FieldDescriptor::new(
            "name",
            Kind::String,
            Annotation::SizeRef(FieldRef::sibling("count", 0)),
        ),
    ];

    #[test]
    fn test_as_length() {
        assert_eq!(Scalar::UInt(7).as_length(), Some(7));
        assert_eq!(Scalar::Int(7).as_length(), Some(7));
        assert_eq!(Scalar::Int(-1).as_length(), None);
        assert_eq!(Scalar::Bool(true).as_length(), None);
        assert_eq!(Scalar::Float(12.0).as_length(), Some(12));
        assert_eq!(Scalar::Float(1.5).as_length(), None);
        assert_eq!(Scalar::Float(-1.0).as_length(), None);
        assert_eq!(Scalar::Float(f64::NAN).as_length(), None);
        assert_eq!(Scalar::Float(f64::INFINITY).as_length(), None);
    }

    #[test]
    fn test_sibling_shadows_enclosing() {
        let mut context = Context::default();
        context.enter(&OUTER);
        context.store(0, Scalar::UInt(9)).unwrap();
        context.enter(&INNER);
        context.store(0, Scalar::Int(3)).unwrap();

        let field = context.field(1).unwrap();
        assert_eq!(
            context.resolve_length(field, FieldRef::sibling("count", 0)),
            Ok(3)
        );
        assert_eq!(
            context.resolve_length(field, FieldRef::enclosing("count")),
            Ok(9)
        );

        context.exit();
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn test_unresolved() {
        let mut context = Context::default();
        context.enter(&INNER);
        let field = context.field(1).unwrap();
        assert_eq!(
            context.resolve_length(field, FieldRef::sibling("count", 0)),
            Err(Error::new(ErrorKind::UnresolvedSizeReference {
                field: "name",
                reference: "count"
            }))
        );
        assert_eq!(
            context.resolve_length(field, FieldRef::enclosing("missing")),
            Err(Error::new(ErrorKind::UnresolvedSizeReference {
                field: "name",
                reference: "missing"
            }))
        );
    }

    #[test]
    fn test_negative_length() {
        let mut context = Context::default();
        context.enter(&INNER);
        context.store(0, Scalar::Int(-4)).unwrap();
        let field = context.field(1).unwrap();
        assert_eq!(
            context.resolve_length(field, FieldRef::sibling("count", 0)),
            Err(Error::new(ErrorKind::InvalidSizeValue {
                field: "name",
                reference: "count"
            }))
        );
    }

    #[test]
    fn test_unknown_field() {
        let mut context = Context::default();
        assert_eq!(
            context.field(0),
            Err(Error::new(ErrorKind::UnknownField { index: 0 }))
        );
        assert_eq!(
            context.store(0, Scalar::UInt(1)),
            Err(Error::new(ErrorKind::UnknownField { index: 0 }))
        );

        context.enter(&INNER);
        assert!(context.field(1).is_ok());
        assert_eq!(
            context.field(2),
            Err(Error::new(ErrorKind::UnknownField { index: 2 }))
        );
        assert_eq!(
            context.store(5, Scalar::UInt(1)),
            Err(Error::new(ErrorKind::UnknownField { index: 5 }))
        );
    }
}

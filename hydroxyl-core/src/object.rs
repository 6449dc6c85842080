use crate::slot::Attach;

/// A visitor over the optional fields of an object.
pub trait OptionalVisitor {
    /// Visits one optional field with its slot name.
    fn visit(&mut self, field: &str, optional: &mut dyn Attach);
}

impl<F: FnMut(&str, &mut dyn Attach)> OptionalVisitor for F {
    fn visit(&mut self, field: &str, optional: &mut dyn Attach) {
        self(field, optional)
    }
}

/// A persistable object declaring optional scalar fields.
///
/// Usually derived with `#[derive(Object)]`, which visits every
/// `OptionalScalar` field under its field name.
pub trait Object {
    /// Visits every optional field of this object.
    fn visit_optionals(&mut self, visitor: &mut dyn OptionalVisitor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionalScalar, ScalarType};

    struct Dog {
        age: OptionalScalar<i32>,
        weight: OptionalScalar<f64>,
        name: String,
    }

    impl Object for Dog {
        fn visit_optionals(&mut self, visitor: &mut dyn OptionalVisitor) {
            visitor.visit("age", &mut self.age);
            visitor.visit("weight", &mut self.weight);
        }
    }

    #[test]
    fn closure_visitor_sees_fields() {
        let mut dog = Dog {
            age: OptionalScalar::new(Some(3)),
            weight: OptionalScalar::default(),
            name: "Rex".to_string(),
        };

        let mut seen = Vec::new();
        dog.visit_optionals(&mut |field: &str, optional: &mut dyn Attach| {
            seen.push((field.to_string(), optional.scalar_type()));
        });

        assert_eq!(
            seen,
            vec![
                ("age".to_string(), ScalarType::I32),
                ("weight".to_string(), ScalarType::F64),
            ]
        );
        assert_eq!(dog.name, "Rex");
    }
}

macro_rules! define_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

define_id_type!(
    /// Handle to a decision variable.
    VariableId
);
define_id_type!(
    /// Handle to a linear constraint row.
    ConstraintId
);
define_id_type!(
    /// Handle to a generalized (log/exp) constraint.
    GeneralConstraintId
);

#[cfg(test)]
mod tests {
    use super::{ConstraintId, GeneralConstraintId, VariableId};

    #[test]
    fn ids_keep_their_value() {
        assert_eq!(VariableId::new(7).inner(), 7);
        assert_eq!(ConstraintId::new(11).inner(), 11);
        assert_eq!(GeneralConstraintId::new(3).inner(), 3);
    }

    #[test]
    fn ids_order_by_value() {
        assert!(VariableId::new(1) < VariableId::new(2));
        assert!(ConstraintId::new(9) > ConstraintId::new(4));
    }
}

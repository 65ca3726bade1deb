//! Macros for ergonomic state declarations.

/// Generate a state enum and its `State` implementation.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and
/// serde's `Serialize`/`Deserialize` (serialized by variant name), and gets
/// an `ALL` constant listing the variants in declaration order.
///
/// # Example
///
/// ```
/// use transitory::state_enum;
/// use transitory::core::State;
///
/// state_enum! {
///     pub enum OrderState {
///         Pending,
///         Shipped,
///         Delivered,
///     }
/// }
///
/// assert_eq!(OrderState::Shipped.name(), "Shipped");
/// assert_eq!(OrderState::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Complete.to_string(), "Complete");
    }

    #[test]
    fn state_enum_lists_variants_in_order() {
        assert_eq!(
            TestState::ALL,
            &[TestState::Initial, TestState::Processing, TestState::Complete]
        );
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::B.name(), "B");
    }

    #[test]
    fn state_enum_serializes_by_variant_name() {
        let json = serde_json::to_string(&TestState::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
    }
}

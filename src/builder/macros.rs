//! Macros for declaring machine states.

/// Declare a state enum and implement [`State`](crate::core::State) for it.
///
/// Besides the trait, the macro generates an `ALL` constant listing the
/// variants in declaration order, and a `Display` impl printing the state
/// name.
///
/// # Example
///
/// ```
/// use effect_logic::core::State;
/// use effect_logic::state_enum;
///
/// state_enum! {
///     pub enum Greeting {
///         Init,
///         Ok,
///         Exception,
///         Error,
///         Done,
///     }
///     final: [Done]
/// }
///
/// assert_eq!(Greeting::ALL.len(), 5);
/// assert!(Greeting::Done.is_final());
/// assert_eq!(Greeting::Exception.to_string(), "Exception");
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
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
            /// Every state, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
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

//! String-valued enumerations shared by operators, values and rule fields.

/// A closed (or open, for free text) set of string values.
pub trait Domain: Sized + Clone + PartialEq + std::fmt::Debug {
    /// Every legal value; empty when any string is accepted.
    const ALLOWED: &'static [&'static str];

    fn parse(s: &str) -> Option<Self>;

    fn as_str(&self) -> &str;
}

impl Domain for String {
    const ALLOWED: &'static [&'static str] = &[];

    fn parse(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn as_str(&self) -> &str {
        self
    }
}

/// Declare a fieldless enum backed by fixed wire strings.
///
/// Generates `as_str`, `ALL`, `Display`, `FromStr` and a [`Domain`] impl.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [&'static str] = &[$($text),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: '{}'", stringify!($name), other)),
                }
            }
        }

        impl $crate::domain::Domain for $name {
            const ALLOWED: &'static [&'static str] = $name::ALL;

            fn parse(s: &str) -> Option<Self> {
                s.parse().ok()
            }

            fn as_str(&self) -> &str {
                $name::as_str(self)
            }
        }
    };
}

/// Parse `raw` into `T`, reporting a domain violation against `variant.field`.
pub(crate) fn parse_in<T: Domain>(
    raw: &str,
    variant: &str,
    field: &str,
) -> monconf_core::Result<T> {
    T::parse(raw).ok_or_else(|| {
        monconf_core::CodecError::validation(
            variant,
            field,
            format!("'{raw}' is not one of {}", T::ALLOWED.join(", ")),
        )
    })
}

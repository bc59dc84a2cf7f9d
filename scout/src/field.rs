//! Field capability shared by every index schema.
//!
//! Each schema declares a closed set of fields with [`index_fields!`]; the
//! compilers only ever see the [`FieldName`] trait and never branch on which
//! schema they are working with.

use std::fmt::Debug;
use std::hash::Hash;

/// A field identifier with a stable wire-level name.
pub trait FieldName: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn field_name(&self) -> &'static str;
}

/// Declares a closed field enum for an index schema.
///
/// Generates the enum itself, an `ALL` slice in declaration order, the
/// [`FieldName`] impl, `Display`, and a `FromStr` that fails with
/// [`Error::UnknownField`](crate::Error::UnknownField).
///
/// ```
/// scout::index_fields! {
///     pub enum ArticleField {
///         Title => "title",
///         Author => "author",
///     }
/// }
///
/// use scout::FieldName;
/// assert_eq!(ArticleField::Title.field_name(), "title");
/// assert_eq!("author".parse::<ArticleField>().unwrap(), ArticleField::Author);
/// ```
#[macro_export]
macro_rules! index_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];
        }

        impl $crate::field::FieldName for $name {
            fn field_name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::field::FieldName::field_name(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err($crate::Error::UnknownField(other.to_string())),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    crate::index_fields! {
        enum Sample {
            Company => "company",
            /// Free text
            Title => "title",
            MinYears => "min_years",
        }
    }

    #[test]
    fn test_field_names_are_stable() {
        assert_eq!(Sample::Company.field_name(), "company");
        assert_eq!(Sample::MinYears.field_name(), "min_years");
        assert_eq!(Sample::Title.to_string(), "title");
    }

    #[test]
    fn test_all_preserves_declaration_order() {
        assert_eq!(
            Sample::ALL,
            &[Sample::Company, Sample::Title, Sample::MinYears]
        );
    }

    #[test]
    fn test_parse_round_trips_every_field() {
        for field in Sample::ALL {
            let parsed: Sample = field.field_name().parse().unwrap();
            assert_eq!(parsed, *field);
        }
    }

    #[test]
    fn test_parse_unknown_field() {
        match "salary".parse::<Sample>() {
            Err(Error::UnknownField(name)) => assert_eq!(name, "salary"),
            other => panic!("Expected UnknownField, got {:?}", other),
        }
    }
}

//! Parser and lexer feature flags.
//!
//! A [`Features`] value is a `u64` bit set over [`Feature`]. Callers
//! enable user-level behaviour (keeping comments, `||` as concatenation);
//! dialects contribute their defaults through
//! [`Dialect::default_features`](crate::dialect::Dialect::default_features).
//! Both sets are OR-ed when a parser is created, and every flag can be
//! queried at any point, including inside dialect hooks.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

macro_rules! features {
    ($($variant:ident = $bit:literal, $doc:literal;)*) => {
        /// A single toggleable behaviour.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Feature {
            $(
                #[doc = $doc]
                $variant,
            )*
        }

        impl Feature {
            /// Every feature, in bit order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the bit of this feature.
            #[must_use]
            pub const fn mask(self) -> u64 {
                match self {
                    $(Self::$variant => 1 << $bit,)*
                }
            }

            /// Returns the feature's name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

features! {
    KeepComments = 0, "Record comments and attach them to the parsed statement.";
    SkipComments = 1, "Drop comments while lexing.";
    PipesAsConcat = 2, "Parse `||` as string concatenation at the additive level.";
    IgnoreNameQuotes = 3, "Strip identifier quotes from parsed names.";
    SupportUnicodeCodePoint = 4, "Decode `\\uXXXX` escapes in backslash-escaped strings.";
    EnableBinaryOpGroup = 5, "Flatten chains of `AND`/`OR` into a single group node.";
    EnableCurrentUserExpr = 6, "Parse bare `CURRENT_USER` as a dedicated node.";
    SelectItemGenerateAlias = 7, "Generate an alias for unaliased select items.";
    DateLiteral = 16, "`DATE '...'` is a typed literal.";
    TimestampLiteral = 17, "`TIMESTAMP '...'` is a typed literal.";
    PrimaryVariantColon = 18, "`:name` joins into a single named variable.";
    PrimaryBangBang = 19, "`!!x` is a double negation instead of an error.";
    OdbcEscape = 20, "`{d '..'}`, `{ts '..'}`, `{fn ..}` ODBC escapes.";
    InRestSpecificOperation = 21, "`IN` accepts a non-parenthesised single operand.";
    TableAliasPartition = 22, "`partition` may be used as a table alias.";
    UserDefinedJoin = 23, "User defined join syntax.";
    ScanStringDoubleBackslash = 24, "Keep `\\\\` as two characters in escaped strings.";
    PrimaryRestCommaAfterLparen = 25, "Tolerate `(,` inside `GROUPING SETS` items.";
}

impl Feature {
    /// Alias of [`Feature::UserDefinedJoin`].
    pub const UDJ: Self = Self::UserDefinedJoin;

    /// Alias of [`Feature::ScanStringDoubleBackslash`].
    pub const SCAN_STRING2_PUT_DOUBLE_BACKSLASH: Self = Self::ScanStringDoubleBackslash;
}

/// Error returned when parsing an unknown feature name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature '{0}'")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("udj") {
            return Ok(Self::UDJ);
        }
        if name.eq_ignore_ascii_case("ScanString2PutDoubleBackslash") {
            return Ok(Self::SCAN_STRING2_PUT_DOUBLE_BACKSLASH);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownFeature(name.to_string()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of enabled [`Feature`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Features(u64);

impl Features {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from a slice.
    #[must_use]
    pub const fn of(features: &[Feature]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < features.len() {
            bits |= features[i].mask();
            i += 1;
        }
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if `feature` is enabled.
    #[must_use]
    pub const fn is_enabled(self, feature: Feature) -> bool {
        self.0 & feature.mask() != 0
    }

    /// Returns a copy with `feature` enabled.
    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.mask())
    }

    /// Returns a copy with `feature` disabled.
    #[must_use]
    pub const fn without(self, feature: Feature) -> Self {
        Self(self.0 & !feature.mask())
    }

    /// Enables or disables `feature` in place.
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        *self = if enabled {
            self.with(feature)
        } else {
            self.without(feature)
        };
    }

    /// Returns the union of both sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterates over the enabled features.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(move |f| self.is_enabled(*f))
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<Feature> for Features {
    fn from(feature: Feature) -> Self {
        Self(feature.mask())
    }
}

/// Parses a comma-separated list of feature names.
impl FromStr for Features {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Feature::from_str)
            .collect()
    }
}

impl Serialize for Features {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_unique() {
        let mut seen = 0;
        for f in Feature::ALL {
            assert_eq!(seen & f.mask(), 0, "{f}");
            seen |= f.mask();
        }
    }

    #[test]
    fn test_user_defined_join_alias() {
        assert_eq!(Feature::UDJ.mask(), Feature::UserDefinedJoin.mask());

        let mut features = Features::empty();
        assert!(!features.is_enabled(Feature::UDJ));
        features.set(Feature::UserDefinedJoin, true);
        assert!(features.is_enabled(Feature::UDJ));
        features.set(Feature::UDJ, false);
        assert!(!features.is_enabled(Feature::UserDefinedJoin));
    }

    #[test]
    fn test_double_backslash_alias() {
        let features = Features::empty().with(Feature::ScanStringDoubleBackslash);
        assert!(features.is_enabled(Feature::SCAN_STRING2_PUT_DOUBLE_BACKSLASH));
        let features = features.without(Feature::SCAN_STRING2_PUT_DOUBLE_BACKSLASH);
        assert!(!features.is_enabled(Feature::ScanStringDoubleBackslash));
    }

    #[test]
    fn test_parse_list() {
        let features: Features = "keepcomments, PipesAsConcat,udj".parse().unwrap();
        assert!(features.is_enabled(Feature::KeepComments));
        assert!(features.is_enabled(Feature::PipesAsConcat));
        assert!(features.is_enabled(Feature::UserDefinedJoin));
        assert!(!features.is_enabled(Feature::SkipComments));
        assert_eq!("".parse::<Features>(), Ok(Features::empty()));
        assert!("Bogus".parse::<Features>().is_err());
    }

    #[test]
    fn test_union_and_iter() {
        let a = Features::of(&[Feature::DateLiteral]);
        let b = Features::from(Feature::TimestampLiteral);
        let all: Vec<_> = a.union(b).iter().collect();
        assert_eq!(all, vec![Feature::DateLiteral, Feature::TimestampLiteral]);
    }
}

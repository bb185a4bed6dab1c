//! 64-bit FNV-1a hashing used for case-insensitive keyword and name
//! dispatch.
//!
//! Every hash is computed over the ASCII-lower-cased UTF-8 bytes of a
//! name, so `fnv1a_64_lower("COUNT") == fnv1a_64_lower("count")`. All
//! functions are `const` so that name constants are computed at compile
//! time.

use std::hash::Hasher;

/// FNV-1a 64-bit offset basis.
pub const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
pub const PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes `text` byte for byte.
#[must_use]
pub const fn fnv1a_64(text: &str) -> u64 {
    hash_bytes(OFFSET_BASIS, text.as_bytes(), false)
}

/// Hashes `text` after folding ASCII upper-case letters to lower-case.
#[must_use]
pub const fn fnv1a_64_lower(text: &str) -> u64 {
    hash_bytes(OFFSET_BASIS, text.as_bytes(), true)
}

/// Continues a lower-cased hash from `basis` over `text`.
#[must_use]
pub const fn fnv1a_64_lower_from(basis: u64, text: &str) -> u64 {
    hash_bytes(basis, text.as_bytes(), true)
}

#[allow(clippy::cast_lossless)]
const fn hash_bytes(basis: u64, bytes: &[u8], fold: bool) -> u64 {
    let mut hash = basis;
    let mut i = 0;
    while i < bytes.len() {
        let mut b = bytes[i];
        if fold && b.is_ascii_uppercase() {
            b += 32;
        }
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }
    hash
}

/// Strips one level of identifier quoting: `` `x` ``, `"x"` or `[x]`.
#[must_use]
pub fn unquote(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'`' && last == b'`')
            || (first == b'"' && last == b'"')
            || (first == b'[' && last == b']')
        {
            return &name[1..name.len() - 1];
        }
    }
    name
}

/// Hash of a possibly quoted name: quotes are stripped, then the name is
/// lower-cased and hashed.
#[must_use]
pub fn name_hash(name: &str) -> u64 {
    fnv1a_64_lower(unquote(name))
}

/// A [`Hasher`] over FNV-1a, used for structural hashing of AST nodes.
///
/// Unlike the standard library's default hasher, the output is stable
/// across processes and platforms.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

impl FnvHasher {
    /// Creates a hasher seeded with `basis`.
    #[must_use]
    pub const fn with_basis(basis: u64) -> Self {
        Self(basis)
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self(OFFSET_BASIS)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = hash_bytes(self.0, bytes, false);
    }
}

/// Pre-computed hashes of bare identifiers that the grammar treats
/// specially without making them reserved keywords.
pub mod names {
    use super::fnv1a_64_lower;

    macro_rules! name_hashes {
        ($($ident:ident = $text:literal),* $(,)?) => {
            $(
                #[doc = concat!("Hash of `", $text, "`.")]
                pub const $ident: u64 = fnv1a_64_lower($text);
            )*

            /// Every name constant paired with its source text.
            pub const ALL: &[(&str, u64)] = &[$(($text, $ident)),*];
        };
    }

    name_hashes! {
        AGAINST = "against",
        ARRAY = "array",
        AT = "at",
        BINARY = "binary",
        BOOLEAN = "boolean",
        BOTH = "both",
        BOX = "box",
        CHAR = "char",
        CHARACTER = "character",
        CHARSET = "charset",
        CIDR = "cidr",
        CIRCLE = "circle",
        CLUSTER = "cluster",
        COLLATE = "collate",
        CROSS = "cross",
        CURRENT = "current",
        CURRENT_USER = "current_user",
        CURRVAL = "currval",
        D = "d",
        DATE = "date",
        DATETIME = "datetime",
        DECIMAL = "decimal",
        DISTRIBUTE = "distribute",
        DIV = "div",
        DOUBLE = "double",
        E = "e",
        EXPANSION = "expansion",
        EXTRACT = "extract",
        FILTER = "filter",
        FIRST = "first",
        FN = "fn",
        FOLLOWING = "following",
        GLOB = "glob",
        GLOBAL = "global",
        GROUPING = "grouping",
        IGNORE = "ignore",
        INET = "inet",
        INT4 = "int4",
        LANGUAGE = "language",
        LAST = "last",
        LATERAL = "lateral",
        LEADING = "leading",
        LSEG = "lseg",
        MACADDR = "macaddr",
        MAP = "map",
        MATCH = "match",
        MOD = "mod",
        MODE = "mode",
        NATIONAL = "national",
        NATURAL = "natural",
        NEXTVAL = "nextval",
        NULLS = "nulls",
        OF = "of",
        POINT = "point",
        POLYGON = "polygon",
        PRECEDING = "preceding",
        PRECISION = "precision",
        PREVVAL = "prevval",
        QUERY = "query",
        RANGE = "range",
        RECURSIVE = "recursive",
        REGEXP = "regexp",
        RESPECT = "respect",
        ROLLUP = "rollup",
        ROWS = "rows",
        SEPARATOR = "separator",
        SETS = "sets",
        SIGNED = "signed",
        SIMILAR = "similar",
        SORT = "sort",
        SOUNDS = "sounds",
        STRUCT = "struct",
        T = "t",
        TIME = "time",
        TIMESTAMP = "timestamp",
        TIMESTAMPTZ = "timestamptz",
        TRAILING = "trailing",
        TRIM = "trim",
        TRY_CAST = "try_cast",
        TS = "ts",
        UNBOUNDED = "unbounded",
        UNSIGNED = "unsigned",
        VARBIT = "varbit",
        VARCHAR = "varchar",
        VARYING = "varying",
        WITHIN = "within",
        WITHOUT = "without",
        ZEROFILL = "zerofill",
        ZONE = "zone",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(fnv1a_64(""), OFFSET_BASIS);
        assert_eq!(fnv1a_64("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_64("foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_lower_folds_ascii_only() {
        assert_eq!(fnv1a_64_lower("SeLeCt"), fnv1a_64("select"));
        assert_ne!(fnv1a_64_lower("É"), fnv1a_64("é"));
    }

    #[test]
    fn test_continue_from_basis() {
        let split = fnv1a_64_lower_from(fnv1a_64_lower("group_"), "CONCAT");
        assert_eq!(split, fnv1a_64_lower("group_concat"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("`a b`"), "a b");
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("[t]"), "t");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("`"), "`");
    }

    #[test]
    fn test_name_hash_ignores_quotes_and_case() {
        assert_eq!(name_hash("`Users`"), name_hash("users"));
        assert_eq!(name_hash("\"TRY_CAST\""), names::TRY_CAST);
    }

    #[test]
    fn test_hasher_matches_const_fn() {
        let mut hasher = FnvHasher::default();
        hasher.write(b"select");
        assert_eq!(hasher.finish(), fnv1a_64("select"));
    }

    #[test]
    fn test_name_constants_unique() {
        let mut hashes: Vec<u64> = names::ALL.iter().map(|(_, h)| *h).collect();
        hashes.sort_unstable();
        hashes.dedup();
        assert_eq!(hashes.len(), names::ALL.len());
    }
}

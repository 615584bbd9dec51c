//! SQL fragments for comparison lookups.
//!
//! Fragments are written with `%s` for the right-hand side and `%%` for a
//! literal percent sign, ready to be spliced into statement text before
//! placeholder rewriting.

/// A comparison between a column and a right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    Gt,
    Gte,
    Lt,
    Lte,
    StartsWith,
    EndsWith,
    IStartsWith,
    IEndsWith,
}

impl Lookup {
    pub const ALL: [Lookup; 12] = [
        Lookup::Exact,
        Lookup::IExact,
        Lookup::Contains,
        Lookup::IContains,
        Lookup::Gt,
        Lookup::Gte,
        Lookup::Lt,
        Lookup::Lte,
        Lookup::StartsWith,
        Lookup::EndsWith,
        Lookup::IStartsWith,
        Lookup::IEndsWith,
    ];

    fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith
        )
    }
}

/// Escapes `\`, `%` and `_` in a right-hand side computed by the database.
/// `{}` is replaced with the expression.
pub const PATTERN_ESCAPE: &str = r"REPLACE(REPLACE(REPLACE({}, '\', '\\'), '%%', '\%%'), '_', '\_')";

/// The flavour of `LIKE` a session supports.
///
/// Sessions whose national character set conversion works use
/// `LIKE TRANSLATE(... USING NCHAR_CS)`; the others fall back to `LIKEC`.
/// Decided once per connection when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSet {
    Standard,
    Likec,
}

impl OperatorSet {
    /// Fragment applied to a bound right-hand side.
    pub fn operator(self, lookup: Lookup) -> &'static str {
        match (self, lookup) {
            (_, Lookup::Exact) => "= %s",
            (_, Lookup::IExact) => "= UPPER(%s)",
            (_, Lookup::Gt) => "> %s",
            (_, Lookup::Gte) => ">= %s",
            (_, Lookup::Lt) => "< %s",
            (_, Lookup::Lte) => "<= %s",
            (OperatorSet::Standard, Lookup::Contains | Lookup::StartsWith | Lookup::EndsWith) => {
                r"LIKE TRANSLATE(%s USING NCHAR_CS) ESCAPE TRANSLATE('\' USING NCHAR_CS)"
            }
            (OperatorSet::Standard, Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith) => {
                r"LIKE UPPER(TRANSLATE(%s USING NCHAR_CS)) ESCAPE TRANSLATE('\' USING NCHAR_CS)"
            }
            (OperatorSet::Likec, Lookup::Contains | Lookup::StartsWith | Lookup::EndsWith) => {
                r"LIKEC %s ESCAPE '\'"
            }
            (OperatorSet::Likec, Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith) => {
                r"LIKEC UPPER(%s) ESCAPE '\'"
            }
        }
    }

    /// Fragment for a `LIKE` lookup whose right-hand side is an expression
    /// rather than a bound string. `rhs` is spliced in as-is; wrap it with
    /// [`escape_pattern`] when its wildcards must match literally.
    ///
    /// Returns `None` for lookups that are not pattern matches.
    pub fn pattern_operator(self, lookup: Lookup, rhs: &str) -> Option<String> {
        let rhs = if lookup.is_case_insensitive() {
            format!("UPPER({rhs})")
        } else {
            rhs.to_string()
        };
        let pattern = match lookup {
            Lookup::Contains | Lookup::IContains => format!("'%%' || {rhs} || '%%'"),
            Lookup::StartsWith | Lookup::IStartsWith => format!("{rhs} || '%%'"),
            Lookup::EndsWith | Lookup::IEndsWith => format!("'%%' || {rhs}"),
            _ => return None,
        };
        Some(match self {
            OperatorSet::Standard => {
                format!(r"LIKE TRANSLATE( {pattern} USING NCHAR_CS) ESCAPE TRANSLATE('\' USING NCHAR_CS)")
            }
            OperatorSet::Likec => format!(r"LIKEC {pattern} ESCAPE '\'"),
        })
    }

    /// Statement that fails on sessions where the standard `LIKE` cannot be
    /// used. Executed with the single parameter `"X"`.
    pub fn like_check_sql() -> String {
        format!(
            "SELECT 1 FROM DUAL WHERE DUMMY {}",
            OperatorSet::Standard.operator(Lookup::Contains)
        )
    }
}

/// Applies [`PATTERN_ESCAPE`] to an expression.
pub fn escape_pattern(expr: &str) -> String {
    PATTERN_ESCAPE.replacen("{}", expr, 1)
}

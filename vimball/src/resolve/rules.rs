//! Ordered regex rewrite rules.
//!
//! Rules are applied in sequence and cumulatively: each rule sees the output
//! of the previous one. Every match of a rule's pattern is replaced.

use regex::Regex;

use crate::error::{VimballError, VimballResult};

/// A single `pattern -> replacement` rewrite.
///
/// The replacement uses `regex` syntax (`$1`, `${name}`). The legacy `\1`
/// back-reference spelling is accepted and translated.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns [`VimballError::InvalidRewriteRule`] if `pattern` is not a valid
    /// regular expression.
    pub fn new(pattern: &str, replacement: &str) -> VimballResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| VimballError::InvalidRewriteRule {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self {
            pattern: regex,
            replacement: translate_backrefs(replacement),
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The replacement in `regex` syntax.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match of the pattern in `input`.
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

/// An ordered list of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RewriteRules {
    rules: Vec<RewriteRule>,
}

impl RewriteRules {
    /// An empty rule list; [`apply`](Self::apply) is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile rules from `(pattern, replacement)` pairs, keeping their order.
    pub fn from_pairs<I, P, R>(pairs: I) -> VimballResult<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .into_iter()
            .map(|(p, r)| RewriteRule::new(p.as_ref(), r.as_ref()))
            .collect::<VimballResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Append a rule.
    pub fn push(&mut self, rule: RewriteRule) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in order.
    pub fn iter(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter()
    }

    /// Apply every rule in order to `input`.
    pub fn apply(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |acc, rule| rule.apply(&acc))
    }
}

/// Translate `\N` back-references into `${N}`; `\\` stays a literal backslash.
///
/// `$N` and `${name}` keep their `regex` meaning. Any other `$` is literal,
/// so `$HOME` or a trailing `$` survive unchanged.
fn translate_backrefs(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    chars.next();
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            '$' => match chars.peek().copied() {
                Some('{') => out.push('$'),
                Some(d) if d.is_ascii_digit() => {
                    out.push_str("${");
                    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                        chars.next();
                        out.push(d);
                    }
                    out.push('}');
                }
                _ => out.push_str("$$"),
            },
            _ => out.push(c),
        }
    }

    out
}

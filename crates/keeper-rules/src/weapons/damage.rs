//! Damage expressions as written in the weapon table.
//!
//! Damage is reported, never rolled here. A catalog entry may list several
//! options separated by `/` (range bands for shotguns, ammunition types), each
//! with an optional parenthesised label: `"4D6/2D6/1D6"`, `"1D10+2 (slug)"`.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*((?:\d*[dD]\d+|\d+|½?[dD][bB])(?:\s*[+\-]\s*(?:\d*[dD]\d+|\d+|½?[dD][bB]))*)\s*(?:\(([^()]*)\))?\s*$",
    )
    .expect("valid regex")
});

/// One way a weapon can deal damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOption {
    /// The dice expression, e.g. "1D10+2".
    pub expression: String,
    /// What the option applies to, e.g. "slug" or "10 yards".
    pub label: Option<String>,
}

impl std::fmt::Display for DamageOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({label})", self.expression),
            None => write!(f, "{}", self.expression),
        }
    }
}

/// A weapon's damage, split into its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageExpression {
    /// The options in table order. Never empty.
    pub options: Vec<DamageOption>,
}

impl DamageExpression {
    /// Parse a damage string strictly.
    pub fn parse(text: &str) -> RulesResult<Self> {
        let options = text
            .split('/')
            .map(|part| {
                let caps = OPTION_RE
                    .captures(part)
                    .ok_or_else(|| RulesError::MalformedDamageExpression(text.to_string()))?;
                let expression = caps
                    .get(1)
                    .map(|m| m.as_str().split_whitespace().collect::<String>())
                    .unwrap_or_default();
                let label = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|l| !l.is_empty());
                Ok(DamageOption { expression, label })
            })
            .collect::<RulesResult<Vec<_>>>()?;
        Ok(Self { options })
    }

    /// Parse a damage string, keeping the whole text as one unlabeled option
    /// if it does not parse.
    pub fn parse_lenient(text: &str) -> Self {
        match Self::parse(text) {
            Ok(expr) => expr,
            Err(err) => {
                tracing::debug!(%err, "keeping damage text as written");
                Self {
                    options: vec![DamageOption {
                        expression: text.trim().to_string(),
                        label: None,
                    }],
                }
            }
        }
    }

    /// The first option, used when no range or ammunition is specified.
    pub fn primary(&self) -> Option<&DamageOption> {
        self.options.first()
    }
}

impl std::fmt::Display for DamageExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{option}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_option() {
        let expr = DamageExpression::parse("1D10").unwrap();
        assert_eq!(expr.options.len(), 1);
        assert_eq!(expr.options[0].expression, "1D10");
        assert_eq!(expr.options[0].label, None);
    }

    #[test]
    fn range_bands() {
        let expr = DamageExpression::parse("4D6/2D6/1D6").unwrap();
        let exprs: Vec<_> = expr.options.iter().map(|o| o.expression.as_str()).collect();
        assert_eq!(exprs, ["4D6", "2D6", "1D6"]);
    }

    #[test]
    fn labelled_option() {
        let expr = DamageExpression::parse("1D10+2 (slug)").unwrap();
        assert_eq!(expr.options[0].expression, "1D10+2");
        assert_eq!(expr.options[0].label.as_deref(), Some("slug"));
        assert_eq!(expr.to_string(), "1D10+2 (slug)");
    }

    #[test]
    fn damage_bonus_terms() {
        assert!(DamageExpression::parse("1D6+DB").is_ok());
        assert!(DamageExpression::parse("1D4 + ½DB").is_ok());
        assert_eq!(
            DamageExpression::parse("1D4 + ½DB").unwrap().options[0].expression,
            "1D4+½DB"
        );
    }

    #[test]
    fn malformed_is_an_error() {
        assert!(matches!(
            DamageExpression::parse("stun"),
            Err(RulesError::MalformedDamageExpression(_))
        ));
        assert!(DamageExpression::parse("").is_err());
        assert!(DamageExpression::parse("1D6/").is_err());
    }

    #[test]
    fn lenient_keeps_text() {
        let expr = DamageExpression::parse_lenient("Burn 1D6 per round");
        assert_eq!(expr.options.len(), 1);
        assert_eq!(expr.options[0].expression, "Burn 1D6 per round");
        assert_eq!(expr.primary().map(|o| o.label.is_none()), Some(true));
    }
}

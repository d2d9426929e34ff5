//! License expression tree
//!
//! A [`LicenseExpression`] is either empty, a single [`License`] leaf, or a
//! binary AND/OR statement over two sub-expressions.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A single license leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct License {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl License {
    /// Create license leaf from its identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            common_name: None,
            text: None,
        }
    }

    /// Set the human readable name
    #[inline]
    #[must_use]
    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    /// Set the full license text
    #[inline]
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// License identifier (usually an SPDX id)
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name, if known
    #[inline]
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    /// License text, if known
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Common name, falling back to the id
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.id)
    }
}

/// Binary operator of a license statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseOperator {
    /// All licenses apply
    #[default]
    And,
    /// A choice between licenses
    Or,
}

impl LicenseOperator {
    /// Keyword used in rendered expressions
    #[inline]
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl Display for LicenseOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Boolean AND/OR expression over license leaves
///
/// `Empty` means "no license known" and is distinct from a single leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LicenseExpression {
    /// No license information
    #[default]
    Empty,
    /// A single license
    Leaf(License),
    /// Binary statement
    Statement {
        /// Operator joining both sides
        operator: LicenseOperator,
        /// Left operand
        left: Box<LicenseExpression>,
        /// Right operand
        right: Box<LicenseExpression>,
    },
}

impl LicenseExpression {
    /// Expression for a single license id
    #[inline]
    #[must_use]
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::Leaf(License::new(id))
    }

    /// Binary statement over two expressions, without simplification
    #[inline]
    #[must_use]
    pub fn statement(operator: LicenseOperator, left: Self, right: Self) -> Self {
        Self::Statement {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True when no license leaf is reachable
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Leaf(_) => false,
            Self::Statement { left, right, .. } => left.is_empty() && right.is_empty(),
        }
    }

    /// Operator of the top-level statement, if any
    #[inline]
    #[must_use]
    pub fn operator(&self) -> Option<LicenseOperator> {
        match self {
            Self::Statement { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    /// Canonical infix rendering using license ids
    ///
    /// Leaves render verbatim, statements as `( L OP R )`, empty as `""`.
    #[must_use]
    pub fn evaluate(&self) -> String {
        self.render(&|license: &License| license.id().to_string())
    }

    /// Infix rendering using common names, falling back to ids
    #[must_use]
    pub fn evaluate_long(&self) -> String {
        self.render(&|license: &License| license.display_name().to_string())
    }

    fn render(&self, name: &dyn Fn(&License) -> String) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Leaf(license) => name(license),
            Self::Statement {
                operator,
                left,
                right,
            } => {
                let left = left.render(name);
                let right = right.render(name);
                match (left.is_empty(), right.is_empty()) {
                    (true, _) => right,
                    (_, true) => left,
                    _ => format!("( {left} {operator} {right} )"),
                }
            }
        }
    }

    /// All leaves, left to right
    #[must_use]
    pub fn licenses(&self) -> Vec<&License> {
        let mut out = Vec::new();
        self.collect_licenses(&mut out);
        out
    }

    fn collect_licenses<'a>(&'a self, out: &mut Vec<&'a License>) {
        match self {
            Self::Empty => {}
            Self::Leaf(license) => out.push(license),
            Self::Statement { left, right, .. } => {
                left.collect_licenses(out);
                right.collect_licenses(out);
            }
        }
    }

    /// Conjunction; an empty side yields the other side unchanged
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.combine(LicenseOperator::And, other)
    }

    /// Disjunction; an empty side yields the other side unchanged
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.combine(LicenseOperator::Or, other)
    }

    fn combine(self, operator: LicenseOperator, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self::statement(operator, self, other)
    }

    /// Rebuild the tree with every leaf passed through `f`
    ///
    /// The shape of the tree is preserved.
    #[must_use]
    pub fn map_licenses<F>(self, f: &mut F) -> Self
    where
        F: FnMut(License) -> License,
    {
        match self {
            Self::Empty => Self::Empty,
            Self::Leaf(license) => Self::Leaf(f(license)),
            Self::Statement {
                operator,
                left,
                right,
            } => {
                let left = left.map_licenses(f);
                let right = right.map_licenses(f);
                Self::statement(operator, left, right)
            }
        }
    }
}

impl From<License> for LicenseExpression {
    fn from(license: License) -> Self {
        Self::Leaf(license)
    }
}

impl Display for LicenseExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.evaluate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apache_and_epl() -> LicenseExpression {
        let apache = License::new("Apache-2.0").with_common_name("Apache License 2.0");
        let epl = License::new("EPL-2.0").with_common_name("Eclipse Public License 2.0");
        LicenseExpression::from(apache).and(epl.into())
    }

    #[test]
    fn evaluate_renders_ids() {
        assert_eq!(apache_and_epl().evaluate(), "( Apache-2.0 AND EPL-2.0 )");
    }

    #[test]
    fn evaluate_long_renders_common_names() {
        assert_eq!(
            apache_and_epl().evaluate_long(),
            "( Apache License 2.0 AND Eclipse Public License 2.0 )"
        );
    }

    #[test]
    fn evaluate_long_falls_back_to_id() {
        let expr = LicenseExpression::leaf("MIT");
        assert_eq!(expr.evaluate_long(), "MIT");
    }

    #[test]
    fn empty_evaluates_to_empty_string() {
        assert_eq!(LicenseExpression::Empty.evaluate(), "");
        assert!(LicenseExpression::Empty.is_empty());
        assert!(!LicenseExpression::leaf("MIT").is_empty());
    }

    #[test]
    fn and_with_empty_is_identity() {
        let mit = LicenseExpression::leaf("MIT");
        assert_eq!(mit.clone().and(LicenseExpression::Empty), mit);
        assert_eq!(LicenseExpression::Empty.or(mit.clone()), mit);
    }

    #[test]
    fn or_builds_statement() {
        let expr = LicenseExpression::leaf("MIT").or(LicenseExpression::leaf("Apache-2.0"));
        assert_eq!(expr.operator(), Some(LicenseOperator::Or));
        assert_eq!(expr.to_string(), "( MIT OR Apache-2.0 )");
    }

    #[test]
    fn licenses_are_left_to_right() {
        let expr = apache_and_epl().or(LicenseExpression::leaf("MIT"));
        let ids: Vec<_> = expr.licenses().into_iter().map(License::id).collect();
        assert_eq!(ids, vec!["Apache-2.0", "EPL-2.0", "MIT"]);
    }

    #[test]
    fn map_licenses_keeps_shape() {
        let expr = apache_and_epl();
        let mapped = expr
            .clone()
            .map_licenses(&mut |license| license.with_text("text"));
        assert_eq!(mapped.evaluate(), expr.evaluate());
        assert!(mapped.licenses().iter().all(|l| l.text() == Some("text")));
    }

    #[test]
    fn serde_json_roundtrip_preserves_structure() {
        let expr = apache_and_epl();
        let json = serde_json::to_string(&expr).unwrap();
        let decoded: LicenseExpression = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, expr);
    }
}

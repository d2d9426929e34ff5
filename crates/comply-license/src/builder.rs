//! Construction of license expressions from flat license lists
//!
//! Every builder here produces a right-nested chain: the first license is
//! the left operand of the outermost statement and the rest of the chain is
//! its right operand. Input order is preserved, so callers collecting names
//! into an unordered set get an order-dependent tree shape.

use crate::expression::{License, LicenseExpression, LicenseOperator};

/// Build an AND chain from license ids
///
/// - zero names yield [`LicenseExpression::Empty`]
/// - one name yields a bare leaf
/// - `[a, b, c]` yields `( a AND ( b AND c ) )`
#[must_use]
pub fn build_license_expression<I, S>(names: I) -> LicenseExpression
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    build_license_expression_with(names, LicenseOperator::And)
}

/// Build a chain from license ids joined by `operator`
#[must_use]
pub fn build_license_expression_with<I, S>(names: I, operator: LicenseOperator) -> LicenseExpression
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    chain_licenses(names.into_iter().map(License::new), operator)
}

/// Build a chain from fully populated license leaves
#[must_use]
pub fn chain_licenses<I>(licenses: I, operator: LicenseOperator) -> LicenseExpression
where
    I: IntoIterator<Item = License>,
{
    let mut leaves: Vec<LicenseExpression> =
        licenses.into_iter().map(LicenseExpression::Leaf).collect();

    let Some(mut chain) = leaves.pop() else {
        return LicenseExpression::Empty;
    };
    while let Some(left) = leaves.pop() {
        chain = LicenseExpression::statement(operator, left, chain);
    }
    chain
}

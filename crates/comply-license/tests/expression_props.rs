//! Property tests for license chain construction

use comply_license::{
    build_license_expression, build_license_expression_with, parse_spdx, LicenseExpression,
    LicenseOperator,
};
use proptest::prelude::*;

fn license_id() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9.-]{0,10}".prop_filter("operators are not ids", |s| {
        !matches!(s.to_uppercase().as_str(), "AND" | "OR" | "WITH")
    })
}

/// Depth of the right spine of a statement chain
fn right_spine(expr: &LicenseExpression) -> usize {
    match expr {
        LicenseExpression::Statement { right, .. } => 1 + right_spine(right),
        _ => 0,
    }
}

proptest! {
    #[test]
    fn chain_preserves_order_and_count(names in prop::collection::vec(license_id(), 0..8)) {
        let expr = build_license_expression(names.clone());
        let ids: Vec<String> = expr.licenses().iter().map(|l| l.id().to_string()).collect();
        prop_assert_eq!(ids, names);
    }

    #[test]
    fn chain_is_right_nested(names in prop::collection::vec(license_id(), 1..8)) {
        let expr = build_license_expression(names.clone());
        prop_assert_eq!(right_spine(&expr), names.len() - 1);
    }

    #[test]
    fn chain_rendering_reparses(names in prop::collection::vec(license_id(), 1..6)) {
        let expr = build_license_expression_with(names, LicenseOperator::Or);
        let reparsed = parse_spdx(&expr.evaluate()).unwrap();
        prop_assert_eq!(reparsed.evaluate(), expr.evaluate());
    }

    #[test]
    fn single_name_is_never_wrapped(name in license_id()) {
        let expr = build_license_expression([name.clone()]);
        prop_assert_eq!(expr, LicenseExpression::leaf(name));
    }
}

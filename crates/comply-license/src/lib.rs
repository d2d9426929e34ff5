//! Comply License Algebra
//!
//! Boolean AND/OR expressions over licenses, built from flat license lists
//! or parsed from SPDX syntax, plus a knowledge base for names and texts.
//!
//! # Core Concepts
//!
//! - [`LicenseExpression`]: Empty, a single [`License`] leaf, or an AND/OR statement
//! - [`build_license_expression`]: Right-nested AND chain from license ids
//! - [`parse_spdx`]: SPDX expression parser (`WITH` is rejected)
//! - [`LicenseKnowledgeBase`]: Id to name/text lookup with cache-on-first-use texts
//!
//! # Example
//!
//! ```rust,ignore
//! use comply_license::{build_license_expression, enrich, DirectoryKnowledgeBase};
//!
//! let expr = build_license_expression(["Apache-2.0", "EPL-2.0"]);
//! assert_eq!(expr.evaluate(), "( Apache-2.0 AND EPL-2.0 )");
//!
//! let kb = DirectoryKnowledgeBase::open("licenses")?;
//! println!("{}", enrich(expr, &kb).evaluate_long());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builder;
mod error;
mod expression;
mod knowledge_base;
mod spdx;

// Re-exports
pub use builder::{build_license_expression, build_license_expression_with, chain_licenses};
pub use error::{LicenseError, LicenseResult};
pub use expression::{License, LicenseExpression, LicenseOperator};
pub use knowledge_base::{
    enrich, DirectoryKnowledgeBase, InMemoryKnowledgeBase, LicenseEntry, LicenseKnowledgeBase,
    INDEX_FILE, TEXTS_DIR,
};
pub use spdx::{parse_spdx, parse_spdx_lenient};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn built_and_parsed_chains_render_alike() {
        let built = build_license_expression(["A", "B"]);
        let parsed = parse_spdx("A AND B").unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn enrich_after_parse_keeps_rendering() {
        let kb = InMemoryKnowledgeBase::new().with_license("MIT", Some("MIT License"), None);
        let expr = enrich(parse_spdx_lenient("MIT OR GPL-2.0+"), &kb);
        assert_eq!(expr.evaluate(), "( MIT OR GPL-2.0+ )");
        assert_eq!(expr.evaluate_long(), "( MIT License OR GPL-2.0+ )");
    }
}

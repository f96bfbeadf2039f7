//! # cass-parser
//!
//! A parser and feature extractor for CASS (context-aware semantic
//! structure) files: tab-separated records that each flatten one syntax
//! tree into a preorder node table.
//!
//! The typical pipeline is [`cass::Loader`] to read a file into a
//! [`cass::Forest`], then [`cass::Tree::featurize`] on each tree.

pub mod cass;

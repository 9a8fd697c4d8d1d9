// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Documentation extraction utilities.
//!
//! Field doc comments become the `description` metadata of the generated
//! attribute unless `#[field(description = "...")]` is given.
//!
//! # Doc Comment Format
//!
//! In Rust, doc comments (`///` and `/** */`) are stored as `#[doc = "..."]`
//! attributes. Lines of one paragraph are joined with a space; paragraphs
//! are separated by a blank line.
//!
//! ```rust,ignore
//! /// Headline shown in
//! /// article lists.
//! ///
//! /// Plain text only.
//! pub title: String,
//!
//! // Extracts to: "Headline shown in article lists.\n\nPlain text only."
//! ```

use syn::Attribute;

/// Extract doc comments from attributes.
///
/// Returns `None` if there are no doc comments or they are blank.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| {
            if let syn::Meta::NameValue(meta) = &attr.meta
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                return Some(lit_str.value());
            }
            None
        })
        .collect();

    let paragraphs: Vec<String> = lines
        .split(|line| line.trim().is_empty())
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            paragraph
                .iter()
                .map(|line| line.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

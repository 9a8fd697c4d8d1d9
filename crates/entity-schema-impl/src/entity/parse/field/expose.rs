// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema exposure configuration for entity fields.
//!
//! `#[field(...)]` options become attribute metadata and defaults:
//!
//! | Option | Effect |
//! |--------|--------|
//! | `skip` | excluded from every schema |
//! | `create`, `create = bool` | `include_in_create` metadata |
//! | `update`, `update = bool` | `include_in_update` metadata |
//! | `response`, `response = bool` | `include_in_response` metadata |
//! | `description = "..."` | `description` metadata |
//! | `default = <literal>` | attribute default, makes the field optional on create |
//! | `ty = "..."` | forward placeholder instead of the Rust type |
//!
//! A bare flag means `true`. Flags set to `true` do not widen the default
//! policy; only `false` excludes.

use syn::{Attribute, Expr, ExprLit, ExprUnary, Lit, LitBool, LitStr, UnOp, meta::ParseNestedMeta};

/// Parsed `#[field(...)]` options.
#[derive(Debug, Default, Clone)]
pub struct ExposeConfig {
    /// Exclude from every schema.
    pub skip: bool,

    /// `include_in_create` override.
    pub create: Option<bool>,

    /// `include_in_update` override.
    pub update: Option<bool>,

    /// `include_in_response` override.
    pub response: Option<bool>,

    /// Explicit description.
    pub description: Option<String>,

    /// Default value literal.
    pub default: Option<Expr>,

    /// Forward placeholder replacing the Rust type.
    pub placeholder: Option<LitStr>
}

impl ExposeConfig {
    /// Parse a `#[field(...)]` attribute.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown options and values of the wrong kind.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let mut config = Self::default();

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                config.skip = true;
            } else if meta.path.is_ident("create") {
                config.create = Some(parse_flag(&meta)?);
            } else if meta.path.is_ident("update") {
                config.update = Some(parse_flag(&meta)?);
            } else if meta.path.is_ident("response") {
                config.response = Some(parse_flag(&meta)?);
            } else if meta.path.is_ident("description") {
                config.description = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("default") {
                let expr: Expr = meta.value()?.parse()?;
                if !is_literal(&expr) {
                    return Err(syn::Error::new_spanned(
                        expr,
                        "default must be a literal, e.g. `default = 0` or `default = \"draft\"`"
                    ));
                }
                config.default = Some(expr);
            } else if meta.path.is_ident("ty") {
                config.placeholder = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "unknown field option; expected one of: skip, create, update, response, \
                     description, default, ty"
                ));
            }
            Ok(())
        })?;

        Ok(config)
    }

    /// Effective override for the create schema.
    #[must_use]
    pub fn in_create(&self) -> Option<bool> {
        if self.skip { Some(false) } else { self.create }
    }

    /// Effective override for the update schema.
    #[must_use]
    pub fn in_update(&self) -> Option<bool> {
        if self.skip { Some(false) } else { self.update }
    }

    /// Effective override for the response schema.
    #[must_use]
    pub fn in_response(&self) -> Option<bool> {
        if self.skip { Some(false) } else { self.response }
    }
}

fn parse_flag(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        Ok(meta.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

fn is_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_),
            ..
        }) => true,
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => matches!(
            &**expr,
            Expr::Lit(ExprLit {
                lit: Lit::Int(_) | Lit::Float(_),
                ..
            })
        ),
        _ => false
    }
}

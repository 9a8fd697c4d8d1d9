// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[extra(...)]` parsing.
//!
//! Extra fields are output-only fields declared on the struct, not stored:
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[extra(word_count: i64, related: "List['ArticleRef']")]
//! pub struct Article { /* ... */ }
//! ```
//!
//! A Rust type maps through `SemanticType`; a string literal is a forward
//! placeholder resolved at synthesis time. The attribute may be repeated.

use syn::{
    Attribute, Ident, LitStr, Token, Type,
    parse::{Parse, ParseStream},
    punctuated::Punctuated
};

/// Declared type of an extra field.
#[derive(Debug)]
pub enum ExtraType {
    /// Rust type mapped through `SemanticType`.
    Rust(Box<Type>),
    /// Forward placeholder expression.
    Forward(LitStr)
}

/// One `name: Type` entry.
#[derive(Debug)]
pub struct ExtraDef {
    /// Field name.
    pub name: Ident,

    /// Declared type.
    pub ty: ExtraType
}

impl Parse for ExtraDef {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty = if input.peek(LitStr) {
            ExtraType::Forward(input.parse()?)
        } else {
            ExtraType::Rust(Box::new(input.parse()?))
        };
        Ok(Self {
            name,
            ty
        })
    }
}

/// Collect every entry of every `#[extra(...)]` attribute.
pub fn parse_extra_attrs(attrs: &[Attribute]) -> syn::Result<Vec<ExtraDef>> {
    let mut extras = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("extra")) {
        let entries =
            attr.parse_args_with(Punctuated::<ExtraDef, Token![,]>::parse_terminated)?;
        extras.extend(entries);
    }
    Ok(extras)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(item: syn::ItemStruct) -> Vec<Attribute> {
        item.attrs
    }

    #[test]
    fn rust_and_forward_types() {
        let extras = parse_extra_attrs(&attrs(syn::parse_quote! {
            #[extra(word_count: i64, tags: Vec<String>, article: "ArticleRef")]
            struct Comment;
        }))
        .unwrap();
        let names: Vec<_> = extras.iter().map(|e| e.name.to_string()).collect();
        assert_eq!(names, ["word_count", "tags", "article"]);
        assert!(matches!(extras[1].ty, ExtraType::Rust(_)));
        match &extras[2].ty {
            ExtraType::Forward(lit) => assert_eq!(lit.value(), "ArticleRef"),
            ExtraType::Rust(_) => panic!("expected placeholder")
        }
    }

    #[test]
    fn repeated_attributes_accumulate() {
        let extras = parse_extra_attrs(&attrs(syn::parse_quote! {
            #[extra(a: i32)]
            #[derive(Debug)]
            #[extra(b: bool,)]
            struct Comment;
        }))
        .unwrap();
        assert_eq!(extras.len(), 2);
    }

    #[test]
    fn missing_type_is_an_error() {
        assert!(
            parse_extra_attrs(&attrs(syn::parse_quote! {
                #[extra(word_count)]
                struct Comment;
            }))
            .is_err()
        );
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Forward-reference resolution.
//!
//! A field type written as [`FieldType::Forward`] holds a placeholder
//! expression naming a type that did not exist at declaration time, or that
//! would otherwise need a circular import:
//!
//! ```text
//! ArticleRef
//! List['ArticleRef']
//! Dict[str, "Tag"]
//! Optional[Tuple[int, AuthorRef]]
//! ```
//!
//! # Namespace
//!
//! Names are looked up in a namespace built per call:
//!
//! 1. Built-in containers and scalar aliases (`List`, `Sequence`, `Dict`,
//!    `Mapping`, `Optional`, `Any`, `Set`, `FrozenSet`, `Tuple`, their
//!    lowercase forms, and `str`, `int`, `float`, `bool`)
//! 2. The caller's [`ForwardRefs`], overlaid on top (caller wins)
//!
//! # Failure Handling
//!
//! Resolution never fails. A field whose placeholder cannot be rebuilt keeps
//! its placeholder type and yields diagnostics naming every undefined name;
//! every other field is resolved. Values taken from the namespace are used
//! as they are, without resolving them again, so mutually referencing
//! schemas cannot loop.

use std::{collections::BTreeMap, fmt, iter::Peekable, str::CharIndices};

use crate::{
    error::Diagnostic,
    schema::SchemaField,
    ty::{FieldType, Scalar}
};

/// Caller-supplied mapping from placeholder name to actual type.
pub type ForwardRefs = BTreeMap<String, FieldType>;

/// Outcome of [`resolve_fields`].
#[derive(Debug, Default, PartialEq)]
pub struct Resolution {
    /// Whether any placeholder was present, so a rebuild ran.
    pub rebuilt:     bool,
    /// Unresolved and malformed references.
    pub diagnostics: Vec<Diagnostic>
}

/// Check whether any field type holds a placeholder.
pub fn needs_rebuild(fields: &[SchemaField]) -> bool {
    fields.iter().any(|f| f.ty().has_forward())
}

/// Resolve every placeholder in `fields` against built-ins plus `refs`.
///
/// Skips all work when no placeholder is present.
pub fn resolve_fields(fields: &mut [SchemaField], refs: &ForwardRefs) -> Resolution {
    if !needs_rebuild(fields) {
        return Resolution::default();
    }

    let namespace = Namespace::new(refs);
    let mut diagnostics = Vec::new();

    for field in fields.iter_mut().filter(|f| f.ty().has_forward()) {
        let mut failures = Vec::new();
        match rebuild(field.ty(), &namespace, &mut failures) {
            Some(resolved) if failures.is_empty() => *field.ty_mut() = resolved,
            _ => {
                let mut reported: Vec<&str> = Vec::new();
                for failure in &failures {
                    let diagnostic = match failure {
                        Failure::NotDefined(name) => {
                            if reported.contains(&name.as_str()) {
                                continue;
                            }
                            reported.push(name);
                            Diagnostic::unresolved(field.name(), name.clone())
                        }
                        Failure::Malformed {
                            expression,
                            reason
                        } => Diagnostic::MalformedReference {
                            field:      field.name().to_string(),
                            expression: expression.clone(),
                            reason:     reason.clone()
                        }
                    };
                    tracing::warn!(field = field.name(), "{failure}");
                    diagnostics.push(diagnostic);
                }
            }
        }
    }

    Resolution {
        rebuilt: true,
        diagnostics
    }
}

/// Why one placeholder could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    NotDefined(String),
    Malformed { expression: String, reason: String }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDefined(name) => write!(f, "name `{name}` is not defined"),
            Self::Malformed {
                expression,
                reason
            } => write!(f, "malformed reference `{expression}`: {reason}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    List,
    Dict,
    Optional,
    Set,
    Tuple,
    Any,
    Scalar(Scalar)
}

impl Builtin {
    fn lookup(name: &str) -> Option<Self> {
        let builtin = match name {
            "List" | "list" | "Sequence" => Self::List,
            "Dict" | "dict" | "Mapping" => Self::Dict,
            "Optional" => Self::Optional,
            "Set" | "set" | "FrozenSet" | "frozenset" => Self::Set,
            "Tuple" | "tuple" => Self::Tuple,
            "Any" => Self::Any,
            "str" => Self::Scalar(Scalar::String),
            "int" => Self::Scalar(Scalar::Integer),
            "float" => Self::Scalar(Scalar::Float),
            "bool" => Self::Scalar(Scalar::Boolean),
            _ => return None
        };
        Some(builtin)
    }

    fn bare(self) -> FieldType {
        match self {
            Self::List => FieldType::list(FieldType::Any),
            Self::Dict => FieldType::map(FieldType::Any, FieldType::Any),
            Self::Optional => FieldType::optional(FieldType::Any),
            Self::Set => FieldType::Set(Box::new(FieldType::Any)),
            Self::Tuple => FieldType::Tuple(Vec::new()),
            Self::Any => FieldType::Any,
            Self::Scalar(scalar) => FieldType::Scalar(scalar)
        }
    }

    fn apply(self, mut args: Vec<FieldType>) -> Result<FieldType, String> {
        let arity = |expected: usize, args: &[FieldType]| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(format!(
                    "expected {expected} type argument(s), found {}",
                    args.len()
                ))
            }
        };
        match self {
            Self::List | Self::Optional | Self::Set => {
                arity(1, &args)?;
                let inner = Box::new(args.remove(0));
                Ok(match self {
                    Self::List => FieldType::List(inner),
                    Self::Optional => FieldType::Optional(inner),
                    _ => FieldType::Set(inner)
                })
            }
            Self::Dict => {
                arity(2, &args)?;
                let value = args.remove(1);
                let key = args.remove(0);
                Ok(FieldType::map(key, value))
            }
            Self::Tuple if args.is_empty() => Err("expected at least one type argument".to_string()),
            Self::Tuple => Ok(FieldType::Tuple(args)),
            Self::Any | Self::Scalar(_) => Err("type does not take type arguments".to_string())
        }
    }
}

enum Binding<'a> {
    Builtin(Builtin),
    Type(&'a FieldType)
}

/// Combined lookup scope: caller entries over built-ins.
struct Namespace<'a> {
    caller: &'a ForwardRefs
}

impl<'a> Namespace<'a> {
    const fn new(caller: &'a ForwardRefs) -> Self {
        Self {
            caller
        }
    }

    fn lookup(&self, name: &str) -> Option<Binding<'a>> {
        if let Some(ty) = self.caller.get(name) {
            return Some(Binding::Type(ty));
        }
        // `typing.List` and friends resolve through their last segment.
        let short = name.rsplit('.').next().unwrap_or(name);
        Builtin::lookup(short).map(Binding::Builtin)
    }
}

fn rebuild(ty: &FieldType, ns: &Namespace<'_>, failures: &mut Vec<Failure>) -> Option<FieldType> {
    match ty {
        FieldType::Forward(expression) => match TypeExpr::parse(expression) {
            Ok(expr) => bind(&expr, expression, ns, failures),
            Err(reason) => {
                failures.push(Failure::Malformed {
                    expression: expression.clone(),
                    reason
                });
                None
            }
        },
        FieldType::List(inner) => rebuild(inner, ns, failures).map(FieldType::list),
        FieldType::Optional(inner) => rebuild(inner, ns, failures).map(FieldType::optional),
        FieldType::Set(inner) => rebuild(inner, ns, failures).map(|t| FieldType::Set(Box::new(t))),
        FieldType::Map(key, value) => {
            let key = rebuild(key, ns, failures);
            let value = rebuild(value, ns, failures);
            Some(FieldType::map(key?, value?))
        }
        FieldType::Tuple(items) => {
            let items: Vec<_> = items.iter().map(|t| rebuild(t, ns, failures)).collect();
            items.into_iter().collect::<Option<Vec<_>>>().map(FieldType::Tuple)
        }
        FieldType::Scalar(_) | FieldType::Any | FieldType::Schema(_) | FieldType::Named(_) => {
            Some(ty.clone())
        }
    }
}

fn bind(
    expr: &TypeExpr,
    source: &str,
    ns: &Namespace<'_>,
    failures: &mut Vec<Failure>
) -> Option<FieldType> {
    match expr {
        TypeExpr::Name(name) => match ns.lookup(name) {
            Some(Binding::Type(ty)) => Some(ty.clone()),
            Some(Binding::Builtin(builtin)) => Some(builtin.bare()),
            None => {
                failures.push(Failure::NotDefined(name.clone()));
                None
            }
        },
        TypeExpr::Apply {
            name,
            args
        } => {
            // Bind every argument first so all undefined names get reported.
            let bound: Vec<_> = args
                .iter()
                .map(|arg| bind(arg, source, ns, failures))
                .collect();
            let malformed = |reason: String| Failure::Malformed {
                expression: source.to_string(),
                reason
            };
            match ns.lookup(name) {
                None => {
                    failures.push(Failure::NotDefined(name.clone()));
                    None
                }
                Some(Binding::Type(_)) => {
                    failures.push(malformed(format!("`{name}` does not take type arguments")));
                    None
                }
                Some(Binding::Builtin(builtin)) => {
                    let args = bound.into_iter().collect::<Option<Vec<_>>>()?;
                    builtin
                        .apply(args)
                        .map_err(|reason| failures.push(malformed(format!("`{name}`: {reason}"))))
                        .ok()
                }
            }
        }
    }
}

/// Parsed placeholder expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr {
    Name(String),
    Apply { name: String, args: Vec<TypeExpr> }
}

impl TypeExpr {
    fn parse(source: &str) -> Result<Self, String> {
        let mut parser = Parser {
            source,
            chars: source.char_indices().peekable()
        };
        let expr = parser.expr()?;
        parser.skip_whitespace();
        match parser.chars.next() {
            None => Ok(expr),
            Some((pos, c)) => Err(format!("unexpected `{c}` at offset {pos}"))
        }
    }
}

struct Parser<'s> {
    source: &'s str,
    chars:  Peekable<CharIndices<'s>>
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn expr(&mut self) -> Result<TypeExpr, String> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            Some((start, quote @ ('\'' | '"'))) => {
                self.chars.next();
                let end = loop {
                    match self.chars.next() {
                        Some((pos, c)) if c == quote => break pos,
                        Some(_) => {}
                        None => return Err(format!("unterminated quote at offset {start}"))
                    }
                };
                TypeExpr::parse(&self.source[start + 1..end])
            }
            Some((start, c)) if is_name_char(c) => {
                let mut end = start;
                while let Some((pos, c)) = self.chars.next_if(|(_, c)| is_name_char(*c)) {
                    end = pos + c.len_utf8();
                }
                let name = self.source[start..end].to_string();
                self.skip_whitespace();
                if self.chars.next_if(|(_, c)| *c == '[').is_none() {
                    return Ok(TypeExpr::Name(name));
                }
                let mut args = vec![self.expr()?];
                loop {
                    self.skip_whitespace();
                    match self.chars.next() {
                        Some((_, ',')) => args.push(self.expr()?),
                        Some((_, ']')) => break,
                        Some((pos, c)) => {
                            return Err(format!("unexpected `{c}` at offset {pos}"));
                        }
                        None => return Err("missing closing `]`".to_string())
                    }
                }
                Ok(TypeExpr::Apply {
                    name,
                    args
                })
            }
            Some((pos, c)) => Err(format!("unexpected `{c}` at offset {pos}")),
            None => Err("empty type expression".to_string())
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

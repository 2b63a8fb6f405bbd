//! Utility functions for macro implementations

use syn::{Attribute, Result};

/// Per-method settings from `#[rpc(...)]`
#[derive(Debug, Default, PartialEq)]
pub struct MethodMeta {
    pub name: Option<String>,
    pub skip: bool,
}

pub fn extract_method_meta(attrs: &[Attribute]) -> Result<MethodMeta> {
    let mut meta = MethodMeta::default();

    for attr in attrs {
        if attr.path().is_ident("rpc") {
            attr.parse_nested_meta(|nested_meta| {
                if nested_meta.path.is_ident("name") {
                    let value = nested_meta.value()?;
                    let s: syn::LitStr = value.parse()?;
                    if s.value().is_empty() {
                        return Err(syn::Error::new_spanned(s, "method name must not be empty"));
                    }
                    meta.name = Some(s.value());
                } else if nested_meta.path.is_ident("skip") {
                    meta.skip = true;
                } else {
                    return Err(nested_meta.error("expected `name = \"...\"` or `skip`"));
                }
                Ok(())
            })?;
        }
    }

    Ok(meta)
}

/// Wire-name convention applied to every method without an explicit name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameRule {
    /// The Rust identifier as written
    #[default]
    None,
    PascalCase,
    CamelCase,
}

impl RenameRule {
    pub fn parse(lit: &syn::LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" | "none" => Ok(RenameRule::None),
            _ => Err(syn::Error::new_spanned(
                lit,
                "rename_all must be \"PascalCase\", \"camelCase\" or \"snake_case\"",
            )),
        }
    }

    pub fn apply(&self, ident: &str) -> String {
        match self {
            RenameRule::None => ident.to_string(),
            RenameRule::PascalCase => capitalize(ident),
            RenameRule::CamelCase => {
                let pascal = capitalize(ident);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Convert snake_case to PascalCase
pub fn capitalize(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    let mut result = first.to_uppercase().collect::<String>();
                    result.push_str(chars.as_str());
                    result
                }
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

/// How a parameter receives the request context, if it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextParam {
    Owned,
    Borrowed,
}

/// Check if a type is `RequestContext` or `&RequestContext`
/// (the last path segment decides, so qualified paths work too).
pub fn context_param(ty: &syn::Type) -> Option<ContextParam> {
    match ty {
        syn::Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .filter(|segment| segment.ident == "RequestContext")
            .map(|_| ContextParam::Owned),
        syn::Type::Reference(reference) if reference.mutability.is_none() => {
            match context_param(&reference.elem) {
                Some(ContextParam::Owned) => Some(ContextParam::Borrowed),
                _ => None,
            }
        }
        syn::Type::Paren(paren) => context_param(&paren.elem),
        _ => None,
    }
}

/// Strip the `#[rpc(...)]` helper attributes so the impl block compiles as-is.
pub fn strip_rpc_attrs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !attr.path().is_ident("rpc"));
}

//! Unit tests for the #[rpc_methods] expansion

use crate::service_attr::{generate_registration, rpc_methods_impl};
use syn::{ImplItemFn, ItemImpl, Meta, Token, parse_quote, punctuated::Punctuated};

/// Whitespace-insensitive view of generated code
fn normalize_generated_code(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn contains_pattern(code: &str, pattern: &str) -> bool {
    normalize_generated_code(code).contains(&normalize_generated_code(pattern))
}

fn expand(args: Punctuated<Meta, Token![,]>, input: ItemImpl) -> syn::Result<String> {
    rpc_methods_impl(args, input).map(|tokens| tokens.to_string())
}

#[test]
fn test_plain_method_registration() {
    let method: ImplItemFn = parse_quote! {
        pub fn add(&self, a: i64, b: i64) -> i64 { a + b }
    };
    let code = generate_registration(&method, "Add").unwrap().to_string();
    assert!(contains_pattern(&code, ".method(\"Add\""));
    assert!(contains_pattern(&code, "move |__arg0: i64, __arg1: i64|"));
    assert!(contains_pattern(&code, "this.add(__arg0, __arg1)"));
    assert!(!contains_pattern(&code, ".await"));
}

#[test]
fn test_context_method_registration() {
    let method: ImplItemFn = parse_quote! {
        pub async fn subtract(&self, ctx: RequestContext, a: f64, b: f64) -> f64 { a - b }
    };
    let code = generate_registration(&method, "Subtract").unwrap().to_string();
    assert!(contains_pattern(&code, ".method_with_context(\"Subtract\""));
    assert!(contains_pattern(&code, "__ctx: ::jrpc_server::RequestContext,"));
    assert!(contains_pattern(&code, "this.subtract(__ctx, __arg0, __arg1).await"));
}

#[test]
fn test_borrowed_context_registration() {
    let method: ImplItemFn = parse_quote! {
        pub fn peer(&self, ctx: &RequestContext) -> Option<String> { None }
    };
    let code = generate_registration(&method, "peer").unwrap().to_string();
    assert!(contains_pattern(&code, "this.peer(&__ctx,)"));
}

#[test]
fn test_registration_errors() {
    let by_value: ImplItemFn = parse_quote! { pub fn take(self) {} };
    assert!(generate_registration(&by_value, "take").is_err());

    let mutable: ImplItemFn = parse_quote! { pub fn bump(&mut self) {} };
    assert!(generate_registration(&mutable, "bump").is_err());

    let generic: ImplItemFn = parse_quote! { pub fn echo<T>(&self, value: T) -> T { value } };
    assert!(generate_registration(&generic, "echo").is_err());

    let borrowed: ImplItemFn = parse_quote! { pub fn len(&self, value: &str) -> usize { value.len() } };
    assert!(generate_registration(&borrowed, "len").is_err());

    let late_ctx: ImplItemFn = parse_quote! {
        pub fn late(&self, a: i64, ctx: RequestContext) -> i64 { a }
    };
    assert!(generate_registration(&late_ctx, "late").is_err());
}

#[test]
fn test_impl_expansion_selects_public_receiver_methods() {
    let input: ItemImpl = parse_quote! {
        impl Calculator {
            pub fn new() -> Self { Calculator }
            pub fn add(&self, a: i64, b: i64) -> i64 { a + b }
            fn private(&self) {}
            #[rpc(skip)]
            pub fn hidden(&self) {}
            #[rpc(name = "math.div")]
            pub fn divide(&self, a: f64, b: f64) -> f64 { a / b }
        }
    };
    let code = expand(Punctuated::new(), input).unwrap();
    assert!(contains_pattern(&code, "impl ::jrpc_server::RpcService for Calculator"));
    assert!(contains_pattern(&code, ".method(\"add\""));
    assert!(contains_pattern(&code, ".method(\"math.div\""));
    assert!(!contains_pattern(&code, ".method(\"new\""));
    assert!(!contains_pattern(&code, ".method(\"private\""));
    assert!(!contains_pattern(&code, ".method(\"hidden\""));
    assert!(!contains_pattern(&code, "#[rpc"));
}

#[test]
fn test_rename_all_argument() {
    let args: Punctuated<Meta, Token![,]> = parse_quote!(rename_all = "PascalCase");
    let input: ItemImpl = parse_quote! {
        impl Calculator {
            pub fn get_data(&self) -> (String, i64) { ("hello".to_string(), 5) }
        }
    };
    let code = expand(args, input).unwrap();
    assert!(contains_pattern(&code, ".method(\"GetData\""));
}

#[test]
fn test_expansion_errors() {
    let unknown: Punctuated<Meta, Token![,]> = parse_quote!(prefix = "calc.");
    let input: ItemImpl = parse_quote! { impl Calculator { pub fn add(&self) {} } };
    assert!(expand(unknown, input).is_err());

    let trait_impl: ItemImpl = parse_quote! { impl Default for Calculator { fn default() -> Self { Calculator } } };
    assert!(expand(Punctuated::new(), trait_impl).is_err());

    let empty: ItemImpl = parse_quote! { impl Calculator { fn private(&self) {} } };
    assert!(expand(Punctuated::new(), empty).is_err());

    let duplicate: ItemImpl = parse_quote! {
        impl Calculator {
            pub fn add(&self) {}
            #[rpc(name = "add")]
            pub fn plus(&self) {}
        }
    };
    assert!(expand(Punctuated::new(), duplicate).is_err());
}

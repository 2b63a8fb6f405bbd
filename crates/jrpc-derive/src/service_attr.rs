//! Implementation of #[rpc_methods] attribute macro

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    FnArg, ImplItem, ImplItemFn, ItemImpl, Lit, Meta, Result, Token, Visibility,
    punctuated::Punctuated,
};

use crate::utils::{
    ContextParam, RenameRule, context_param, extract_method_meta, strip_rpc_attrs,
};

pub fn rpc_methods_impl(args: Punctuated<Meta, Token![,]>, mut input: ItemImpl) -> Result<TokenStream> {
    let mut rename_all = RenameRule::default();

    for arg in args {
        match arg {
            Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                if let syn::Expr::Lit(expr_lit) = &nv.value
                    && let Lit::Str(s) = &expr_lit.lit
                {
                    rename_all = RenameRule::parse(s)?;
                } else {
                    return Err(syn::Error::new_spanned(
                        &nv.value,
                        "rename_all expects a string literal",
                    ));
                }
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown argument, expected `rename_all = \"...\"`",
                ));
            }
        }
    }

    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[rpc_methods] must be placed on an inherent impl block",
        ));
    }

    let mut registrations = Vec::new();
    let mut names = HashSet::new();

    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let meta = extract_method_meta(&method.attrs)?;
        strip_rpc_attrs(&mut method.attrs);

        // Associated functions (no receiver) and private helpers are not exposed.
        if meta.skip
            || !matches!(method.vis, Visibility::Public(_))
            || method.sig.receiver().is_none()
        {
            continue;
        }

        let wire_name = meta
            .name
            .unwrap_or_else(|| rename_all.apply(&method.sig.ident.to_string()));
        if !names.insert(wire_name.clone()) {
            return Err(syn::Error::new_spanned(
                &method.sig.ident,
                format!("method name '{}' is registered more than once", wire_name),
            ));
        }
        registrations.push(generate_registration(method, &wire_name)?);
    }

    if registrations.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "#[rpc_methods] found no public methods taking &self",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::jrpc_server::RpcService for #self_ty #where_clause {
            fn register(
                self: ::std::sync::Arc<Self>,
                builder: ::jrpc_server::RegistryBuilder,
            ) -> ::jrpc_server::RegistryBuilder {
                builder
                    #(#registrations)*
            }
        }
    })
}

/// One `.method(..)` / `.method_with_context(..)` call for a single method.
pub fn generate_registration(method: &ImplItemFn, wire_name: &str) -> Result<TokenStream> {
    let sig = &method.sig;

    if let Some(receiver) = sig.receiver()
        && (receiver.reference.is_none() || receiver.mutability.is_some())
    {
        return Err(syn::Error::new_spanned(
            receiver,
            "registered methods must take &self",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic methods cannot be registered, mark them #[rpc(skip)]",
        ));
    }

    let mut context = None;
    let mut param_idents = Vec::new();
    let mut param_types = Vec::new();

    let typed_inputs = sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => Some(pat_type),
        FnArg::Receiver(_) => None,
    });
    for (position, pat_type) in typed_inputs.enumerate() {
        let ty = pat_type.ty.as_ref();

        if let Some(kind) = context_param(ty) {
            if position != 0 {
                return Err(syn::Error::new_spanned(
                    ty,
                    "the request context must be the first parameter",
                ));
            }
            context = Some(kind);
            continue;
        }

        if matches!(ty, syn::Type::Reference(_) | syn::Type::ImplTrait(_)) {
            return Err(syn::Error::new_spanned(
                ty,
                "parameters are decoded from JSON and must be owned types",
            ));
        }

        param_idents.push(format_ident!("__arg{}", param_idents.len()));
        param_types.push(ty);
    }

    let method_ident = &sig.ident;
    let await_call = sig.asyncness.map(|_| quote! { .await });
    let (register, ctx_decl, ctx_arg) = match context {
        None => (quote! { method }, quote! {}, quote! {}),
        Some(ContextParam::Owned) => (
            quote! { method_with_context },
            quote! { __ctx: ::jrpc_server::RequestContext, },
            quote! { __ctx, },
        ),
        Some(ContextParam::Borrowed) => (
            quote! { method_with_context },
            quote! { __ctx: ::jrpc_server::RequestContext, },
            quote! { &__ctx, },
        ),
    };

    Ok(quote! {
        .#register(#wire_name, {
            let this = ::std::sync::Arc::clone(&self);
            move |#ctx_decl #(#param_idents: #param_types),*| {
                let this = ::std::sync::Arc::clone(&this);
                async move { this.#method_ident(#ctx_arg #(#param_idents),*) #await_call }
            }
        })
    })
}

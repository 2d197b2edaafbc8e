// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use quote::*;

use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use syn::ext::IdentExt;
use syn::spanned::Spanned;

mod attr_data;
use attr_data::*;

/// Declares a `static` `Binding` for every function in an `extern` block.
///
/// Each binding is named after its function and resolves the symbol of the
/// same name, unless `#[link_name = "..."]` gives another one. The binding's
/// type is the function's signature as an `unsafe` function pointer with the
/// block's ABI.
///
/// Arguments:
/// - `crate = <path>`: path to the `dlshim` crate, `::dlshim` by default.
#[proc_macro_attribute]
pub fn declare(args: TokenStream1, input: TokenStream1) -> TokenStream1 {
    let args = TokenStream2::from(args);
    let input = TokenStream2::from(input);
    let foreign_mod = match syn::parse2::<syn::ItemForeignMod>(input) {
        Ok(foreign_mod) => foreign_mod,
        Err(e) => return e.into_compile_error().into(),
    };
    let attr_data = match AttrData::try_from(args) {
        Ok(attr) => attr,
        Err(e) => return e.into_compile_error().into(),
    };

    let mut ret = TokenStream2::new();
    for item in foreign_mod.items {
        use syn::ForeignItem;
        let abi = &foreign_mod.abi;
        match item {
            ForeignItem::Fn(fn_item) => ret.extend(parse_fn(abi, fn_item, &attr_data)),
            other => ret.extend(quote!(#abi {#other})),
        }
    }
    TokenStream1::from(ret)
}

fn link_name(attr: &syn::Attribute) -> Option<syn::Result<syn::LitStr>> {
    if !attr.path().is_ident("link_name") {
        return None;
    }
    Some(match &attr.meta {
        syn::Meta::NameValue(syn::MetaNameValue {
            value:
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(name),
                    ..
                }),
            ..
        }) => Ok(name.clone()),
        meta => Err(syn::Error::new(meta.span(), "Expected `link_name = \"<symbol>\"`.")),
    })
}

fn parse_fn(abi: &syn::Abi, fn_item: syn::ForeignItemFn, attr_data: &AttrData) -> TokenStream2 {
    let krate = &attr_data.krate;
    let fn_name = &fn_item.sig.ident;
    let vis = &fn_item.vis;
    let output = &fn_item.sig.output;

    if let Some(variadic) = &fn_item.sig.variadic {
        return syn::Error::new(variadic.span(), "variadic functions are unsupported")
            .into_compile_error();
    }
    if !fn_item.sig.generics.params.is_empty() {
        return syn::Error::new(fn_item.sig.generics.span(), "generic functions are unsupported")
            .into_compile_error();
    }

    let mut symbol = None;
    let mut fn_attrs = Vec::new();
    for attr in fn_item.attrs.iter() {
        match link_name(attr) {
            Some(Ok(name)) => symbol = Some(name),
            Some(Err(e)) => return e.into_compile_error(),
            None => fn_attrs.push(attr),
        }
    }
    let symbol =
        symbol.unwrap_or_else(|| syn::LitStr::new(&fn_name.unraw().to_string(), fn_name.span()));

    let mut param_ty_list = Vec::new();
    for arg in fn_item.sig.inputs.iter() {
        match arg {
            syn::FnArg::Typed(pat_type) => param_ty_list.push(pat_type.ty.to_token_stream()),
            syn::FnArg::Receiver(rec) => {
                return syn::Error::new(rec.span(), "`self` arguments are unsupported")
                    .into_compile_error();
            }
        }
    }

    // According to "The Rustonomicon" foreign functions are assumed unsafe,
    // so the pointer type is always `unsafe`.
    quote! {
        #(#fn_attrs)*
        #[allow(non_upper_case_globals)]
        #vis static #fn_name: #krate::Binding<unsafe #abi fn (#(#param_ty_list),*) #output>
            = #krate::Binding::new(#symbol);
    }
}

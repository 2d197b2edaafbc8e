// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parser;

pub struct AttrData {
    /// Path used to reach the runtime crate in generated code.
    pub krate: syn::Path,
}

impl Default for AttrData {
    fn default() -> Self {
        Self {
            krate: syn::parse_quote!(::dlshim),
        }
    }
}

impl TryFrom<TokenStream2> for AttrData {
    type Error = syn::Error;
    fn try_from(args: TokenStream2) -> syn::Result<Self> {
        let mut data = Self::default();
        let mut has_krate = false;
        let parser = syn::meta::parser(|meta| {
            // Branch for syntax: #[declare(crate = <path>)]
            if meta.path.is_ident("crate") {
                if has_krate {
                    return Err(meta.error("crate is already defined"));
                }
                has_krate = true;
                data.krate = meta.value()?.parse()?;
                Ok(())
            } else {
                let path = &meta.path;
                Err(meta.error(format!(
                    "unknown argument `{}`. Expected `crate`.",
                    quote!(#path)
                )))
            }
        });
        parser.parse2(args)?;
        Ok(data)
    }
}

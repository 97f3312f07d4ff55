use matches2::option_match;
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Error, Result};

use crate::util::{self, Attr, Named};

pub(crate) fn imp(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let args: Attr<FnOpt> = Attr::parse_args(args)?;
    let crate_name = args.crate_name(|opt| option_match!(opt, FnOpt::SparsecAs(_, ts) => ts))?;

    let input: syn::ItemStruct = syn::parse2(input)?;
    if !matches!(input.fields, syn::Fields::Unit) {
        return Err(Error::new_spanned(&input.fields, "prototype must be a unit struct"));
    }
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(&input.generics, "prototype cannot be generic"));
    }

    let syn::ItemStruct { attrs, vis, ident, .. } = &input;

    let args_ty = match args.find_one(|opt| option_match!(opt, FnOpt::Args(_, ty) => ty))? {
        Some((_, ty)) => quote!(#ty),
        None => quote!(()),
    };

    let base = args.find_one(|opt| option_match!(opt, FnOpt::Base(_, ty) => ty))?;
    let base_args = args.find_one(|opt| option_match!(opt, FnOpt::BaseArgs(_, expr) => expr))?;

    let assemble_base = match (base, base_args) {
        (Some((_, base)), base_args) => {
            let base_args = match base_args {
                Some((_, expr)) => quote!(#expr),
                None => quote!(::std::default::Default::default()),
            };
            quote_spanned! { base.span() =>
                <#base as #crate_name::Prototype>::assemble(assembler, #base_args)?;
            }
        }
        (None, Some((span, _))) => {
            return Err(Error::new(span, "`base_args` requires `base` to be specified"));
        }
        (None, None) => quote!(),
    };

    let assemble = args.find_one(|opt| option_match!(opt, FnOpt::Assemble(_, path) => path))?;
    let assemble_self = match assemble {
        Some((_, path)) => quote!(#path(assembler, args)),
        None => quote! {
            let () = args;
            ::std::result::Result::Ok(())
        },
    };

    Ok(quote! {
        #(#attrs)*
        #vis struct #ident {
            entity: #crate_name::entity::Local,
        }

        impl #crate_name::Prototype for #ident {
            type Args = #args_ty;

            fn from_entity(entity: #crate_name::entity::Local) -> Self { Self { entity } }

            fn entity(&self) -> #crate_name::entity::Local { self.entity }

            fn assemble(
                assembler: &mut #crate_name::Assembler<'_>,
                args: Self::Args,
            ) -> #crate_name::Result<()> {
                #assemble_base
                #assemble_self
            }
        }
    })
}

enum FnOpt {
    SparsecAs(syn::token::Paren, TokenStream),
    Assemble(syn::Token![=], syn::Path),
    Args(syn::Token![=], syn::Type),
    Base(syn::Token![=], syn::Type),
    BaseArgs(syn::Token![=], syn::Expr),
}

impl Parse for Named<FnOpt> {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<syn::Ident>()?;

        let value = match name.to_string().as_str() {
            "sparsec_as" => {
                let (paren, path) = util::parse_crate_path(input)?;
                FnOpt::SparsecAs(paren, path)
            }
            "assemble" => FnOpt::Assemble(input.parse()?, input.parse()?),
            "args" => FnOpt::Args(input.parse()?, input.parse()?),
            "base" => FnOpt::Base(input.parse()?, input.parse()?),
            "base_args" => FnOpt::BaseArgs(input.parse()?, input.parse()?),
            _ => return Err(util::unknown_option(&name)),
        };

        Ok(Named { name, value })
    }
}

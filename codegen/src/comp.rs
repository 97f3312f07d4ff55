use matches2::option_match;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::Result;

use crate::util::{self, Attr, Named};

pub(crate) fn imp(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let args: Attr<FnOpt> = Attr::parse_args(args)?;
    let crate_name = args.crate_name(|opt| option_match!(opt, FnOpt::SparsecAs(_, ts) => ts))?;

    let input: syn::DeriveInput = syn::parse2(input)?;
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics #crate_name::Component for #ident #ty_generics #where_clause {}
    })
}

enum FnOpt {
    SparsecAs(syn::token::Paren, TokenStream),
}

impl Parse for Named<FnOpt> {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<syn::Ident>()?;

        let value = match name.to_string().as_str() {
            "sparsec_as" => {
                let (paren, path) = util::parse_crate_path(input)?;
                FnOpt::SparsecAs(paren, path)
            }
            _ => return Err(util::unknown_option(&name)),
        };

        Ok(Named { name, value })
    }
}

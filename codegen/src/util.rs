use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Result};

/// A comma-separated list of options in an attribute.
pub(crate) struct Attr<T> {
    pub(crate) items: Punctuated<Named<T>, syn::Token![,]>,
}

impl<T> Default for Attr<T> {
    fn default() -> Self { Self { items: Punctuated::new() } }
}

impl<T> Parse for Attr<T>
where
    Named<T>: Parse,
{
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(Self { items: Punctuated::parse_terminated(input)? })
    }
}

impl<T> Attr<T> {
    /// Parses the attribute arguments, allowing them to be empty.
    pub(crate) fn parse_args(args: TokenStream) -> Result<Self>
    where
        Named<T>: Parse,
    {
        if args.is_empty() {
            Ok(Self::default())
        } else {
            syn::parse2(args)
        }
    }

    /// Finds the only option matched by `matcher`.
    ///
    /// Returns an error if the option is specified more than once.
    pub(crate) fn find_one<'t, U>(
        &'t self,
        matcher: impl Fn(&'t T) -> Option<&'t U>,
    ) -> Result<Option<(Span, &'t U)>> {
        let mut found: Option<(&syn::Ident, &U)> = None;

        for item in &self.items {
            if let Some(value) = matcher(&item.value) {
                if let Some((first, _)) = found {
                    let mut err = Error::new(item.name.span(), "duplicate option");
                    err.combine(Error::new(first.span(), "first specified here"));
                    return Err(err);
                }
                found = Some((&item.name, value));
            }
        }

        Ok(found.map(|(name, value)| (name.span(), value)))
    }

    /// Returns the path to the sparsec crate, which may be overridden by `sparsec_as(...)`.
    pub(crate) fn crate_name(
        &self,
        matcher: impl Fn(&T) -> Option<&TokenStream>,
    ) -> Result<TokenStream> {
        Ok(match self.find_one(matcher)? {
            Some((_, ts)) => ts.clone(),
            None => quote!(::sparsec),
        })
    }
}

/// An option in the form `name`, `name = value` or `name(value)`.
pub(crate) struct Named<T> {
    pub(crate) name:  syn::Ident,
    pub(crate) value: T,
}

/// Parses the parenthesized tokens of `sparsec_as(...)`.
pub(crate) fn parse_crate_path(input: ParseStream) -> Result<(syn::token::Paren, TokenStream)> {
    let inner;
    let paren = syn::parenthesized!(inner in input);
    let path = inner.parse()?;
    Ok((paren, path))
}

/// Returns an error for an option name that is not recognized.
pub(crate) fn unknown_option(name: &syn::Ident) -> Error {
    Error::new_spanned(name, format!("Unknown argument `{}`", name))
}

use proc_macro::TokenStream;

mod comp;
mod prototype;
mod util;

#[proc_macro_attribute]
pub fn comp(args: TokenStream, input: TokenStream) -> TokenStream {
    comp::imp(args.into(), input.into()).unwrap_or_else(|err| err.to_compile_error()).into()
}

#[proc_macro_attribute]
pub fn prototype(args: TokenStream, input: TokenStream) -> TokenStream {
    prototype::imp(args.into(), input.into()).unwrap_or_else(|err| err.to_compile_error()).into()
}

mod log;
mod loggable;
mod traceable;
mod variant;

use proc_macro::TokenStream;

/// Emits a `traceable!`/`loggable!` value at its own level, optionally with a context field.
#[proc_macro]
pub fn log(input: TokenStream) -> TokenStream {
    log::log_impl(input)
}

/// Declares an operational log event enum.
#[proc_macro]
pub fn loggable(input: TokenStream) -> TokenStream {
    loggable::loggable_impl(input)
}

/// Declares an error enum whose variants carry a level and, unless `#[no_source]`, a source message.
#[proc_macro]
pub fn traceable(input: TokenStream) -> TokenStream {
    traceable::traceable_impl(input)
}

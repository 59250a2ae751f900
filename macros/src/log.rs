use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Token, parse_macro_input};

struct LogInput {
    event: Expr,
    context: Option<Expr>,
}

impl Parse for LogInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let event = input.parse::<Expr>()?;

        let context = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            Some(input.parse::<Expr>()?)
        } else {
            None
        };

        Ok(LogInput { event, context })
    }
}

pub fn log_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LogInput);

    let event = &input.event;

    let dispatch = match &input.context {
        Some(context) => quote! {
            let context = #context;
            match level {
                tracing::Level::ERROR => tracing::error!(context = %context, "{}", message),
                tracing::Level::WARN => tracing::warn!(context = %context, "{}", message),
                tracing::Level::INFO => tracing::info!(context = %context, "{}", message),
                tracing::Level::DEBUG => tracing::debug!(context = %context, "{}", message),
                tracing::Level::TRACE => tracing::trace!(context = %context, "{}", message),
            }
        },
        None => quote! {
            match level {
                tracing::Level::ERROR => tracing::error!("{}", message),
                tracing::Level::WARN => tracing::warn!("{}", message),
                tracing::Level::INFO => tracing::info!("{}", message),
                tracing::Level::DEBUG => tracing::debug!("{}", message),
                tracing::Level::TRACE => tracing::trace!("{}", message),
            }
        },
    };

    quote! {
        {
            let event = &#event;
            let level = event.level();
            let message = event.to_string();
            #dispatch
        }
    }
    .into()
}

use crate::variant::EnumInput;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

pub fn loggable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EnumInput);

    let enum_name = &input.enum_name;

    let enum_variants = input.variants.iter().map(|variant| {
        let docs = &variant.docs;
        let name = &variant.name;
        let error_msg = &variant.error_msg;

        if variant.fields.is_empty() {
            quote! {
                #(#docs)*
                #[error(#error_msg)]
                #name
            }
        } else {
            let fields = variant.fields.iter().map(|(name, ty)| quote! { #name: #ty });
            quote! {
                #(#docs)*
                #[error(#error_msg)]
                #name { #(#fields,)* }
            }
        }
    });

    let level_match_arms = input.variants.iter().map(|variant| {
        let name = &variant.name;
        let level = &variant.level;

        if variant.fields.is_empty() {
            quote! { Self::#name => #level }
        } else {
            quote! { Self::#name { .. } => #level }
        }
    });

    quote! {
        #[allow(dead_code)]
        #[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
        pub enum #enum_name {
            #(#enum_variants,)*
        }

        impl #enum_name {
            #[allow(dead_code)]
            pub fn level(&self) -> tracing::Level {
                match self {
                    #(#level_match_arms,)*
                }
            }

            #[allow(dead_code)]
            pub fn log(&self) {
                let message = self.to_string();
                match self.level() {
                    tracing::Level::ERROR => tracing::error!("{}", message),
                    tracing::Level::WARN => tracing::warn!("{}", message),
                    tracing::Level::INFO => tracing::info!("{}", message),
                    tracing::Level::DEBUG => tracing::debug!("{}", message),
                    tracing::Level::TRACE => tracing::trace!("{}", message),
                }
            }
        }
    }
    .into()
}

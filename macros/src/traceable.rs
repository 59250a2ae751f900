use crate::variant::{EnumInput, Variant};
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

fn enum_variant(variant: &Variant) -> proc_macro2::TokenStream {
    let docs = &variant.docs;
    let name = &variant.name;
    let error_msg = &variant.error_msg;
    let field_definitions = variant.fields.iter().map(|(name, ty)| quote! { #name: #ty });

    match (variant.no_source, variant.fields.is_empty()) {
        (true, true) => quote! {
            #(#docs)*
            #[error(#error_msg)]
            #name
        },
        (true, false) => quote! {
            #(#docs)*
            #[error(#error_msg)]
            #name { #(#field_definitions,)* }
        },
        (false, _) => quote! {
            #(#docs)*
            #[error(#error_msg)]
            #name {
                #(#field_definitions,)*
                err: String
            }
        },
    }
}

fn level_arm(variant: &Variant) -> proc_macro2::TokenStream {
    let name = &variant.name;
    let level = &variant.level;

    if variant.no_source && variant.fields.is_empty() {
        quote! { Self::#name => #level }
    } else {
        quote! { Self::#name { .. } => #level }
    }
}

fn constructor(variant: &Variant) -> Option<proc_macro2::TokenStream> {
    if variant.no_source && variant.fields.is_empty() {
        return None;
    }

    let name = &variant.name;
    let constructor_name = variant.constructor_name();
    let params = variant
        .fields
        .iter()
        .map(|(field_name, field_type)| quote! { #field_name: impl Into<#field_type> });
    let field_assignments = variant
        .fields
        .iter()
        .map(|(field_name, _)| quote! { #field_name: #field_name.into() });

    if variant.no_source {
        Some(quote! {
            pub fn #constructor_name(#(#params),*) -> Self {
                Self::#name {
                    #(#field_assignments,)*
                }
            }
        })
    } else {
        Some(quote! {
            pub fn #constructor_name(#(#params,)* source: impl std::fmt::Display) -> Self {
                Self::#name {
                    #(#field_assignments,)*
                    err: source.to_string()
                }
            }
        })
    }
}

pub fn traceable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EnumInput);

    let enum_name = &input.enum_name;
    let enum_variants = input.variants.iter().map(enum_variant);
    let level_match_arms = input.variants.iter().map(level_arm);
    let constructors = input.variants.iter().filter_map(constructor);

    let expanded = quote! {
        #[allow(dead_code)]
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
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

            #(#constructors)*
        }
    };

    TokenStream::from(expanded)
}

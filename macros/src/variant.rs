use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, Error, Expr, Ident, LitStr, Result, Token, Type};

pub struct Variant {
    pub docs: Vec<Attribute>,
    pub error_msg: LitStr,
    pub no_source: bool,
    pub name: Ident,
    pub fields: Vec<(Ident, Type)>,
    pub level: Expr,
}

pub struct EnumInput {
    pub enum_name: Ident,
    pub variants: Vec<Variant>,
}

impl Parse for EnumInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let enum_name = input.parse::<Ident>()?;

        let content;
        syn::braced!(content in input);

        let mut variants = Vec::new();
        while !content.is_empty() {
            variants.push(content.parse::<Variant>()?);
        }

        Ok(EnumInput {
            enum_name,
            variants,
        })
    }
}

impl Parse for Variant {
    fn parse(content: ParseStream) -> Result<Self> {
        let attributes = content.call(Attribute::parse_outer)?;

        let error_attr = attributes
            .iter()
            .find(|attr| attr.path().is_ident("error"))
            .ok_or_else(|| Error::new(content.span(), "Missing #[error] attribute"))?;
        let error_msg = match &error_attr.meta {
            syn::Meta::List(list) => syn::parse2::<LitStr>(list.tokens.clone())?,
            _ => {
                return Err(Error::new(
                    error_attr.span(),
                    "Invalid error attribute format",
                ));
            }
        };

        let no_source = attributes
            .iter()
            .any(|attr| attr.path().is_ident("no_source"));

        let docs = attributes
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .cloned()
            .collect();

        let name = content.parse::<Ident>()?;

        let mut fields = Vec::new();
        if content.peek(syn::token::Brace) {
            let fields_content;
            syn::braced!(fields_content in content);

            while !fields_content.is_empty() {
                let field_name = fields_content.parse::<Ident>()?;
                fields_content.parse::<Token![:]>()?;
                let field_type = fields_content.parse::<Type>()?;
                fields.push((field_name, field_type));

                if !fields_content.is_empty() {
                    fields_content.parse::<Token![,]>()?;
                }
            }
        }

        content.parse::<Token![=>]>()?;
        let level = content.parse::<Expr>()?;

        if !content.is_empty() {
            content.parse::<Token![,]>()?;
        }

        Ok(Variant {
            docs,
            error_msg,
            no_source,
            name,
            fields,
            level,
        })
    }
}

impl Variant {
    /// `CopyFileFailed` -> `copy_file_failed`
    pub fn constructor_name(&self) -> Ident {
        let mut snake = String::new();
        for (index, ch) in self.name.to_string().chars().enumerate() {
            if ch.is_uppercase() {
                if index != 0 {
                    snake.push('_');
                }
                snake.extend(ch.to_lowercase());
            } else {
                snake.push(ch);
            }
        }
        Ident::new(&snake, self.name.span())
    }
}

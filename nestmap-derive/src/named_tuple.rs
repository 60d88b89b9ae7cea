//! Implementation of the `#[derive(NamedTuple)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, FieldsNamed, Ident, Type, parse_macro_input, parse_quote};

/// Main implementation of the `NamedTuple` derive macro.
pub fn derive_named_tuple_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    TokenStream::from(expand(&input))
}

fn expand(input: &DeriveInput) -> TokenStream2 {
    let name = &input.ident;
    match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => generate(input, fields),
            Fields::Unnamed(_) => syn::Error::new_spanned(
                name,
                "NamedTuple can only be derived for structs with named fields, not tuple structs.",
            )
            .to_compile_error(),
            Fields::Unit => syn::Error::new_spanned(
                name,
                "NamedTuple cannot be derived for unit structs (structs with no fields).",
            )
            .to_compile_error(),
        },
        Data::Enum(_) => {
            syn::Error::new_spanned(name, "NamedTuple can only be derived for structs, not enums.")
                .to_compile_error()
        }
        Data::Union(_) => {
            syn::Error::new_spanned(name, "NamedTuple cannot be derived for unions.")
                .to_compile_error()
        }
    }
}

fn field_parts(fields: &FieldsNamed) -> (Vec<&Ident>, Vec<String>, Vec<&Type>) {
    let idents: Vec<&Ident> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .collect();
    let labels = idents.iter().map(|ident| unraw(ident)).collect();
    let types = fields.named.iter().map(|field| &field.ty).collect();
    (idents, labels, types)
}

/// Field names as they appear in the record, without any `r#` prefix.
fn unraw(ident: &Ident) -> String {
    let text = ident.to_string();
    text.strip_prefix("r#").map_or_else(|| text.clone(), str::to_string)
}

fn generate(input: &DeriveInput, fields: &FieldsNamed) -> TokenStream2 {
    let name = &input.ident;
    let type_name = unraw(name);
    let (idents, labels, types) = field_parts(fields);
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let mut into_generics = input.generics.clone();
    let into_where = into_generics.make_where_clause();
    for ty in &types {
        into_where
            .predicates
            .push(parse_quote!(#ty: ::nestmap::IntoValue));
    }

    let mut from_generics = input.generics.clone();
    let from_where = from_generics.make_where_clause();
    for ty in &types {
        from_where
            .predicates
            .push(parse_quote!(#ty: ::nestmap::FromValue));
    }

    quote! {
        impl #impl_generics #name #type_generics #where_clause {
            /// Returns the record type values of this struct convert into.
            #[must_use]
            pub fn record_type() -> ::nestmap::RecordType {
                static RECORD_TYPE: ::std::sync::OnceLock<::nestmap::RecordType> =
                    ::std::sync::OnceLock::new();
                RECORD_TYPE
                    .get_or_init(|| ::nestmap::RecordType::new(#type_name, [#(#labels),*]))
                    .clone()
            }
        }

        impl #impl_generics ::nestmap::IntoValue for #name #type_generics #into_where {
            fn into_value(self) -> ::nestmap::Value {
                ::nestmap::Value::Record(::nestmap::Record::__from_derived(
                    Self::record_type(),
                    ::std::vec![#(::nestmap::IntoValue::into_value(self.#idents)),*],
                ))
            }
        }

        impl #impl_generics ::nestmap::FromValue for #name #type_generics #from_where {
            fn from_value(
                value: ::nestmap::Value,
            ) -> ::std::result::Result<Self, ::nestmap::FromValueError> {
                let mut values = ::nestmap::Record::__destructure(
                    value,
                    #type_name,
                    &[#(#labels),*],
                )?
                .into_iter();
                ::std::result::Result::Ok(Self {
                    #(
                        #idents: ::nestmap::FromValue::from_value(
                            values.next().unwrap_or_default(),
                        )
                        .map_err(|error| error.in_field(#labels))?,
                    )*
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn labels_follow_declaration_order() {
        let input: DeriveInput = parse_quote! {
            struct Sample { r#type: String, count: i64 }
        };
        let Data::Struct(data) = &input.data else {
            panic!("expected a struct");
        };
        let Fields::Named(fields) = &data.fields else {
            panic!("expected named fields");
        };
        let (_, labels, _) = field_parts(fields);
        assert_eq!(labels, vec!["type".to_string(), "count".to_string()]);
    }

    #[rstest]
    #[case(parse_quote! { enum Shape { Circle } }, "not enums")]
    #[case(parse_quote! { struct Pair(i64, i64); }, "not tuple structs")]
    #[case(parse_quote! { struct Marker; }, "unit structs")]
    fn unsupported_inputs_produce_errors(#[case] input: DeriveInput, #[case] message: &str) {
        let output = expand(&input).to_string();
        assert!(output.contains("compile_error"));
        assert!(output.contains(message));
    }

    #[rstest]
    fn generics_gain_field_bounds() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> { inner: T }
        };
        let output = expand(&input).to_string();
        assert_eq!(output.matches("where T :").count(), 2);
    }
}

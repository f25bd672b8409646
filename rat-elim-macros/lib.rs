//! Internal macros for rat-elim

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Ident, Index};

/// Default implementation of [HeapSpace](../rat_elim_common/memory/trait.HeapSpace.html).
/// Use by adding `#[derive(HeapSpace)]` to your struct. Enums are plain
/// `Copy` data here and use the blanket implementation instead.
///
/// Fields annotated with `#[heap_space(skip)]` are not counted.
#[proc_macro_derive(HeapSpace, attributes(heap_space))]
pub fn heap_space(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let type_name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();
    let block = match &ast.data {
        Data::Struct(data_struct) => struct_sum(&data_struct.fields),
        Data::Enum(_) | Data::Union(_) => {
            return syn::Error::new(type_name.span(), "HeapSpace can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };
    let implementation = quote!(
        impl #impl_generics
        HeapSpace for #type_name #type_generics #where_clause {
            fn heap_space(&self) -> usize {
                #block
            }
        }
    );
    implementation.into()
}

fn is_skipped(field: &Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path.is_ident("heap_space")
            && attr
                .parse_args::<Ident>()
                .map_or(false, |argument| argument == "skip")
    })
}

fn sum(terms: impl Iterator<Item = TokenStream>) -> TokenStream {
    terms.fold(quote!(0), |a, b| quote!(#a + #b))
}

fn struct_sum(fields: &Fields) -> TokenStream {
    sum(fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !is_skipped(field))
        .map(|(position, field)| match &field.ident {
            Some(name) => quote!(self.#name.heap_space()),
            None => {
                let index = Index::from(position);
                quote!(self.#index.heap_space())
            }
        }))
}

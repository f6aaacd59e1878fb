//! `#[derive(Model)]`.
//!
//! ```ignore
//! #[derive(Model)]
//! #[model(table = "users")]
//! struct User {
//!     #[model(primary_key)]
//!     id: i64,
//!     name: String,
//!     address: Option<String>,
//! }
//! ```
//!
//! Fields are columns in declaration order, named after the field.  `Option<_>` fields are nullable columns; primary keys may not be
//! nullable.
use darling::{ast::Data, util::Ignored, FromDeriveInput};
use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, parse_macro_input, DeriveInput};

#[derive(darling::FromDeriveInput)]
#[darling(attributes(model), supports(struct_named))]
struct ModelMacroInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<Ignored, ModelField>,
    table: String,
}

#[derive(darling::FromField)]
#[darling(attributes(model))]
struct ModelField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    primary_key: bool,
}

fn is_option(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(p) if p.qself.is_none() => p
            .path
            .segments
            .last()
            .map(|s| s.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let derive_input: DeriveInput = parse_macro_input!(input);
    let input = match ModelMacroInput::from_derive_input(&derive_input) {
        Err(e) => return e.write_errors().into(),
        Ok(x) => x,
    };

    let ModelMacroInput {
        ident,
        generics,
        data,
        table,
    } = input;

    // `supports(struct_named)` already rejected everything else.
    let fields = match data {
        Data::Struct(s) => s.fields,
        Data::Enum(_) => unreachable!("Enums are rejected by darling"),
    };

    if table.is_empty() {
        return darling::Error::custom("Table names may not be empty")
            .with_span(&ident)
            .write_errors()
            .into();
    }

    let mut errors = vec![];
    let mut idents = vec![];
    let mut columns = vec![];
    let mut pk_names = vec![];

    for f in fields.iter() {
        let field_ident = match f.ident.clone() {
            Some(i) => i,
            None => continue,
        };
        // `r#type` is the column `type`.
        let name = field_ident.unraw().to_string();
        let nullable = is_option(&f.ty);
        if f.primary_key && nullable {
            errors.push(
                darling::Error::custom(format!("{}: primary key columns may not be nullable", name))
                    .with_span(&f.ty),
            );
        }

        let pk = f.primary_key;
        columns.push(quote! {
            ::lite_datastore::ColumnDescriptor::new(#name, #pk, #nullable)
        });
        if pk {
            pk_names.push(name);
        }
        idents.push(field_ident);
    }

    if !errors.is_empty() {
        return darling::Error::multiple(errors).write_errors().into();
    }

    let indices = (0..idents.len()).collect::<Vec<usize>>();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        impl #impl_generics ::lite_datastore::Model for #ident #ty_generics #where_clause {
            const TABLE: ::lite_datastore::TableDescriptor = {
                const COLUMNS: &[::lite_datastore::ColumnDescriptor] = &[#(#columns),*];
                ::lite_datastore::TableDescriptor::new(#table, COLUMNS, &[#(#pk_names),*])
            };

            fn values(&self) -> ::std::vec::Vec<::lite_datastore::Value> {
                ::std::vec![
                    #(::lite_datastore::Value::from(::std::clone::Clone::clone(&self.#idents))),*
                ]
            }

            fn from_row(
                row: &::lite_datastore::rusqlite::Row<'_>,
            ) -> ::lite_datastore::rusqlite::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#idents: row.get(#indices)?),*
                })
            }
        }
    };

    out.into()
}

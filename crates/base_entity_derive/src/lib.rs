//! `#[base_entity]` adds the columns every table in the board shares
//! (a UUID primary key plus creation/update timestamps) to a sea-orm model
//! and wires the helper traits the DAO layer relies on.

use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Field, Fields, FieldsNamed, ItemStruct, Token, parse_macro_input, parse_quote,
    punctuated::Punctuated,
};

/// Prepends the shared columns that the struct does not declare itself.
fn inject_columns(fields: &mut FieldsNamed) {
    let declared: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
        .collect();

    let shared: [(&str, Field); 3] = [
        (
            "id",
            parse_quote! {
                #[sea_orm(primary_key, auto_increment = false)]
                pub id: uuid::Uuid
            },
        ),
        (
            "created_at",
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
        (
            "updated_at",
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
    ];

    let mut merged: Punctuated<Field, Token![,]> = shared
        .into_iter()
        .filter(|(name, _)| !declared.contains(*name))
        .map(|(_, field)| field)
        .collect();
    merged.extend(fields.named.iter().cloned());
    fields.named = merged;
}

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "base_entity takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut model = parse_macro_input!(item as ItemStruct);
    let Fields::Named(fields) = &mut model.fields else {
        return syn::Error::new_spanned(&model, "base_entity needs a struct with named fields")
            .to_compile_error()
            .into();
    };
    inject_columns(fields);

    quote! {
        #model

        impl crate::db::dao::base_traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl crate::db::dao::base_traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl crate::db::dao::base_traits::HasOrderColumns for Entity {
            fn id_column() -> Column {
                Column::Id
            }

            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }
    }
    .into()
}

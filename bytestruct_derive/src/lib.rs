use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(ByteStruct, attributes(bytestruct))]
pub fn derive_bytestruct(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive_bytestruct_expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_bytestruct_expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic record types are not supported",
        ));
    }

    match &input.data {
        Data::Struct(data_struct) => impl_bytestruct(name, data_struct),
        Data::Enum(_) | Data::Union(_) => Err(syn::Error::new_spanned(
            name,
            "ByteStruct can only be derived for structs",
        )),
    }
}

enum FieldAttr {
    None,
    SizeRef(syn::Ident),
    FixedSize(usize),
    PayloadOf(syn::Ident),
}

struct FieldInfo {
    ident: syn::Ident,
    ty: syn::Type,
    attr: FieldAttr,
}

fn wire_name(ident: &syn::Ident) -> String {
    ident.unraw().to_string()
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<(FieldAttr, bool)> {
    let mut attr = FieldAttr::None;
    let mut skip = false;

    for a in &field.attrs {
        if !a.path().is_ident("bytestruct") {
            continue;
        }

        a.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                return Ok(());
            }

            let parsed = if meta.path.is_ident("size_ref") {
                FieldAttr::SizeRef(meta.value()?.parse()?)
            } else if meta.path.is_ident("payload_of") {
                FieldAttr::PayloadOf(meta.value()?.parse()?)
            } else if meta.path.is_ident("size") {
                let lit: syn::LitInt = meta.value()?.parse()?;
                FieldAttr::FixedSize(lit.base10_parse()?)
            } else {
                return Err(meta.error("expected `size_ref`, `payload_of`, `size` or `skip`"));
            };

            if !matches!(attr, FieldAttr::None) {
                return Err(meta.error(
                    "a field takes at most one of `size_ref`, `payload_of` and `size`",
                ));
            }
            attr = parsed;
            Ok(())
        })?;
    }

    if skip && !matches!(attr, FieldAttr::None) {
        return Err(syn::Error::new_spanned(
            field,
            "a skipped field cannot carry a size annotation",
        ));
    }

    Ok((attr, skip))
}

fn impl_bytestruct(
    name: &syn::Ident,
    data: &syn::DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Only named fields are supported",
            ));
        }
    };

    let mut field_info = Vec::new();
    let mut skipped_fields = Vec::new();

    for field in fields {
        let ident = field.ident.clone().unwrap();
        let (attr, skip) = parse_field_attrs(field)?;

        if skip {
            skipped_fields.push(ident);
        } else {
            field_info.push(FieldInfo {
                ident,
                ty: field.ty.clone(),
                attr,
            });
        }
    }

    let position = |target: &syn::Ident| {
        field_info
            .iter()
            .position(|f| wire_name(&f.ident) == wire_name(target))
    };

    // payload target position -> prefix position
    let mut payload_prefixes: Vec<Option<usize>> = vec![None; field_info.len()];
    let mut annotations = Vec::new();

    for (index, info) in field_info.iter().enumerate() {
        let annotation = match &info.attr {
            FieldAttr::None => quote! { bytestruct::Annotation::None },
            FieldAttr::FixedSize(size) => quote! { bytestruct::Annotation::FixedSize(#size) },
            FieldAttr::SizeRef(target) => {
                let target_name = wire_name(target);
                match position(target) {
                    Some(p) if p >= index => {
                        return Err(syn::Error::new_spanned(
                            target,
                            format!(
                                "`size_ref` must name a field declared before `{}`",
                                wire_name(&info.ident)
                            ),
                        ));
                    }
                    Some(p) => quote! {
                        bytestruct::Annotation::SizeRef(
                            bytestruct::FieldRef::sibling(#target_name, #p)
                        )
                    },
                    None if skipped_fields.iter().any(|s| wire_name(s) == target_name) => {
                        return Err(syn::Error::new_spanned(
                            target,
                            format!("`size_ref` names the skipped field `{target_name}`"),
                        ));
                    }
                    None => quote! {
                        bytestruct::Annotation::SizeRef(
                            bytestruct::FieldRef::enclosing(#target_name)
                        )
                    },
                }
            }
            FieldAttr::PayloadOf(target) => {
                let target_name = wire_name(target);
                let Some(p) = position(target) else {
                    return Err(syn::Error::new_spanned(
                        target,
                        format!("`payload_of` names no sibling field `{target_name}`"),
                    ));
                };
                if p != index + 1 {
                    return Err(syn::Error::new_spanned(
                        target,
                        format!(
                            "`payload_of` must name the field declared right after `{}`",
                            wire_name(&info.ident)
                        ),
                    ));
                }
                if payload_prefixes[p].is_some() {
                    return Err(syn::Error::new_spanned(
                        target,
                        format!("`{target_name}` already has a length prefix"),
                    ));
                }
                payload_prefixes[p] = Some(index);
                quote! {
                    bytestruct::Annotation::PayloadOf(
                        bytestruct::FieldRef::sibling(#target_name, #p)
                    )
                }
            }
        };
        annotations.push(annotation);
    }

    for (index, info) in field_info.iter().enumerate() {
        if matches!(info.attr, FieldAttr::PayloadOf(_)) && payload_prefixes[index].is_some() {
            return Err(syn::Error::new_spanned(
                &info.ident,
                "a length prefix cannot itself be the payload of another field",
            ));
        }
    }

    let descriptors = field_info.iter().zip(&annotations).map(|(info, annotation)| {
        let field_name = wire_name(&info.ident);
        let ty = &info.ty;
        quote! {
            bytestruct::FieldDescriptor::new(
                #field_name,
                <#ty as bytestruct::Field>::KIND,
                #annotation,
            )
        }
    });

    // `size` and `size_ref` are rejected on fixed-width types at compile time.
    let size_checks = field_info.iter().filter_map(|info| {
        if !matches!(info.attr, FieldAttr::SizeRef(_) | FieldAttr::FixedSize(_)) {
            return None;
        }
        let ty = &info.ty;
        let message = format!(
            "field `{}` has a fixed-width type and cannot take `size` or `size_ref`",
            wire_name(&info.ident)
        );
        Some(quote! {
            const _: () = ::core::assert!(
                <#ty as bytestruct::Field>::KIND.fixed_width().is_none(),
                #message,
            );
        })
    });

    let field_writes = field_info.iter().enumerate().filter_map(|(index, info)| {
        if payload_prefixes[index].is_some() {
            // written by its prefix
            return None;
        }
        let ident = &info.ident;
        let ty = &info.ty;
        Some(match &info.attr {
            FieldAttr::PayloadOf(target) => {
                let target_index = position(target).unwrap();
                let target_info = &field_info[target_index];
                let target_ident = &target_info.ident;
                let target_ty = &target_info.ty;
                quote! {
                    writer.write_length_prefixed::<#ty, #target_ty>(
                        &Self::FIELDS[#index],
                        &Self::FIELDS[#target_index],
                        &self.#target_ident,
                    )?;
                }
            }
            _ => quote! {
                writer.write_field::<#ty>(&Self::FIELDS[#index], &self.#ident)?;
            },
        })
    });

    let locals: Vec<_> = field_info
        .iter()
        .map(|info| format_ident!("__field_{}", info.ident.unraw()))
        .collect();

    let field_reads = field_info.iter().zip(&locals).enumerate().map(|(index, (info, local))| {
        let ty = &info.ty;
        quote! {
            let #local = reader.read_field::<#ty>(#index)?;
        }
    });

    let field_inits = field_info.iter().zip(&locals).map(|(info, local)| {
        let ident = &info.ident;
        quote! { #ident: #local }
    });

    let skipped_field_init = skipped_fields.iter().map(|ident| {
        quote! {
            #ident: Default::default()
        }
    });

    let expanded = quote! {
        #(#size_checks)*

        impl bytestruct::ByteStruct for #name {
            const FIELDS: &'static [bytestruct::FieldDescriptor] = &[
                #(#descriptors,)*
            ];

            fn write_record(&self, writer: &mut bytestruct::Writer) -> bytestruct::Result<()> {
                #(#field_writes)*
                Ok(())
            }

            fn read_record<__R: ::std::io::Read>(
                reader: &mut bytestruct::Reader<'_, __R>,
            ) -> bytestruct::Result<Self> {
                reader.enter_record(<Self as bytestruct::ByteStruct>::FIELDS);
                #(#field_reads)*
                reader.exit_record();

                Ok(Self {
                    #(#field_inits,)*
                    #(#skipped_field_init,)*
                })
            }
        }

        impl bytestruct::Field for #name {
            const KIND: bytestruct::Kind = bytestruct::Kind::Record;

            fn write_value(
                &self,
                writer: &mut bytestruct::Writer,
                _field: &'static bytestruct::FieldDescriptor,
            ) -> bytestruct::Result<()> {
                bytestruct::ByteStruct::write_record(self, writer)
            }

            fn read_value<__R: ::std::io::Read>(
                reader: &mut bytestruct::Reader<'_, __R>,
                field: &'static bytestruct::FieldDescriptor,
                size: Option<usize>,
            ) -> bytestruct::Result<Self> {
                reader.read_nested::<Self>(field, size)
            }
        }
    };

    Ok(expanded)
}

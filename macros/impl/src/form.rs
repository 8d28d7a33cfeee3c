//! Expansion of `#[derive(Form)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    ext::IdentExt, parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Generics,
    Lit, Meta, Type,
};

/// Hook directions requested by a container attribute.
#[derive(Default)]
struct Hooks {
    marshal: bool,
    unmarshal: bool,
}

impl Hooks {
    fn any(&self) -> bool {
        self.marshal || self.unmarshal
    }
}

/// A named field and its raw tag.
struct Field {
    ident: syn::Ident,
    ty: Type,
    tag: Option<String>,
}

impl Field {
    /// Whether the tag excludes the field from both directions (`-`, `-,...` or `...,ignore`).
    fn ignored(&self) -> bool {
        let Some(tag) = &self.tag else {
            return false;
        };
        let mut parts = tag.split(',');
        parts.next() == Some("-") || parts.any(|flag| flag == "ignore")
    }
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let hooks = container_hooks(&input.attrs)?;
    if hooks.any() {
        return Ok(expand_hooked(&input, &hooks));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .map(|field| {
                    let Some(ident) = field.ident.clone() else {
                        return Err(syn::Error::new_spanned(field, "expected a named field"));
                    };
                    Ok(Field {
                        ident,
                        ty: field.ty.clone(),
                        tag: field_tag(&field.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Form can only be derived for structs with named fields (or with #[form(hook)])",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Form can only be derived for structs (or with #[form(hook)])",
            ))
        }
    };
    Ok(expand_record(&input, &fields))
}

/// Reads `#[form(hook)]`, `#[form(marshal)]` and `#[form(unmarshal)]`.
fn container_hooks(attrs: &[Attribute]) -> syn::Result<Hooks> {
    let mut hooks = Hooks::default();
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        if !matches!(attr.meta, Meta::List(_)) {
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[form(hook)], #[form(marshal)] or #[form(unmarshal)]",
            ));
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("hook") {
                hooks.marshal = true;
                hooks.unmarshal = true;
            } else if meta.path.is_ident("marshal") {
                hooks.marshal = true;
            } else if meta.path.is_ident("unmarshal") {
                hooks.unmarshal = true;
            } else {
                return Err(meta.error("unsupported form attribute"));
            }
            Ok(())
        })?;
    }
    Ok(hooks)
}

/// Reads the `#[form = "..."]` tag of a field.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag = None;
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        let Meta::NameValue(name_value) = &attr.meta else {
            return Err(syn::Error::new_spanned(attr, "expected #[form = \"...\"]"));
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = &name_value.value
        else {
            return Err(syn::Error::new_spanned(
                &name_value.value,
                "form tag must be a string literal",
            ));
        };
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate form tag"));
        }
        tag = Some(value.value());
    }
    Ok(tag)
}

/// Adds `bound` for every field type to the where clause of `generics`.
fn bounded(generics: &Generics, fields: &[&Field], bound: TokenStream) -> Generics {
    let mut generics = generics.clone();
    let where_clause = generics.make_where_clause();
    for field in fields {
        let ty = &field.ty;
        where_clause.predicates.push(parse_quote!(#ty: #bound));
    }
    generics
}

fn expand_record(input: &DeriveInput, fields: &[Field]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let table = fields.iter().map(|field| {
        let declared = field.ident.unraw().to_string();
        match &field.tag {
            Some(tag) => quote! { (#declared, ::core::option::Option::Some(#tag)) },
            None => quote! { (#declared, ::core::option::Option::None) },
        }
    });

    // Ignored fields keep their descriptor but are never borrowed, so their type is unconstrained.
    let (positions, active): (Vec<usize>, Vec<&Field>) = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.ignored())
        .unzip();
    let idents: Vec<_> = active.iter().map(|field| &field.ident).collect();
    let count = active.len();

    let encode_generics = bounded(&input.generics, &active, quote!(::webform_codec::Encode));
    let (_, _, encode_where) = encode_generics.split_for_impl();
    let decode_generics = bounded(&input.generics, &active, quote!(::webform_codec::Decode));
    let (_, _, decode_where) = decode_generics.split_for_impl();

    quote! {
        impl #impl_generics ::webform_codec::Record for #name #ty_generics #where_clause {
            fn descriptors() -> &'static [::webform_codec::Descriptor] {
                static TABLE: ::webform_codec::tags::Table =
                    ::webform_codec::tags::Table::new(&[#(#table),*]);
                TABLE.descriptors()
            }
        }

        impl #impl_generics ::webform_codec::Form for #name #ty_generics #where_clause {
            #[inline]
            fn kind(&self) -> ::webform_codec::Kind {
                ::webform_codec::Kind::Record
            }
        }

        impl #impl_generics ::webform_codec::Encode for #name #ty_generics #encode_where {
            fn fields(
                &self,
            ) -> ::std::vec::Vec<(&'static ::webform_codec::Descriptor, &dyn ::webform_codec::Encode)> {
                const POSITIONS: [usize; #count] = [#(#positions),*];
                let descriptors = <Self as ::webform_codec::Record>::descriptors();
                let values: [&dyn ::webform_codec::Encode; #count] = [#(&self.#idents),*];
                POSITIONS
                    .iter()
                    .map(|&position| &descriptors[position])
                    .zip(values)
                    .collect()
            }
        }

        impl #impl_generics ::webform_codec::Decode for #name #ty_generics #decode_where {
            fn fields_mut(
                &mut self,
            ) -> ::std::vec::Vec<(&'static ::webform_codec::Descriptor, &mut dyn ::webform_codec::Decode)> {
                const POSITIONS: [usize; #count] = [#(#positions),*];
                let descriptors = <Self as ::webform_codec::Record>::descriptors();
                let values: [&mut dyn ::webform_codec::Decode; #count] = [#(&mut self.#idents),*];
                POSITIONS
                    .iter()
                    .map(|&position| &descriptors[position])
                    .zip(values)
                    .collect()
            }
        }
    }
}

fn expand_hooked(input: &DeriveInput, hooks: &Hooks) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let form = quote! {
        impl #impl_generics ::webform_codec::Form for #name #ty_generics #where_clause {
            #[inline]
            fn kind(&self) -> ::webform_codec::Kind {
                ::webform_codec::Kind::Hooked
            }
        }
    };

    let encode = hooks.marshal.then(|| {
        let mut generics = input.generics.clone();
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: ::webform_codec::Marshaler));
        let (_, _, where_clause) = generics.split_for_impl();
        quote! {
            impl #impl_generics ::webform_codec::Encode for #name #ty_generics #where_clause {
                #[inline]
                fn marshaler(&self) -> ::core::option::Option<&dyn ::webform_codec::Marshaler> {
                    ::core::option::Option::Some(self)
                }
            }
        }
    });

    let decode = hooks.unmarshal.then(|| {
        let mut generics = input.generics.clone();
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: ::webform_codec::Unmarshaler));
        let (_, _, where_clause) = generics.split_for_impl();
        quote! {
            impl #impl_generics ::webform_codec::Decode for #name #ty_generics #where_clause {
                #[inline]
                fn unmarshaler(&mut self) -> ::core::option::Option<&mut dyn ::webform_codec::Unmarshaler> {
                    ::core::option::Option::Some(self)
                }
            }
        }
    });

    quote! {
        #form
        #encode
        #decode
    }
}

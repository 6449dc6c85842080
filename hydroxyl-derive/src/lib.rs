use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for the `Object` trait.
///
/// Generates `visit_optionals()`, visiting every `OptionalScalar` field under
/// its field name so an engine can attach it to a slot.
///
/// # Example
///
/// ```ignore
/// use hydroxyl_core::{Object, OptionalScalar};
///
/// #[derive(Object)]
/// struct Dog {
///     name: String,
///     age: OptionalScalar<i32>,
///     #[hydroxyl(rename = "kg")]
///     weight: OptionalScalar<f64>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[hydroxyl(skip)]` - Do not visit this field
/// - `#[hydroxyl(rename = "name")]` - Use a custom slot name
/// - `#[hydroxyl(optional)]` - Visit a field whose type is an alias of `OptionalScalar`
#[proc_macro_derive(Object, attributes(hydroxyl))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_object_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_object_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Object can only be derived for structs with named fields",
                ))
            }
        },
        syn::Data::Enum(_) => return Err(syn::Error::new_spanned(input, "Object cannot be derived for enums")),
        syn::Data::Union(_) => return Err(syn::Error::new_spanned(input, "Object cannot be derived for unions")),
    };

    let mut visits = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip || !(attrs.optional || is_optional_scalar(&field.ty)) {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let slot_name = attrs.rename.unwrap_or_else(|| unraw(ident));
        visits.push(quote! {
            visitor.visit(#slot_name, &mut self.#ident);
        });
    }

    Ok(quote! {
        impl #impl_generics ::hydroxyl_core::Object for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn visit_optionals(&mut self, visitor: &mut dyn ::hydroxyl_core::OptionalVisitor) {
                #(#visits)*
            }
        }
    })
}

/// Returns true if the type's last path segment is `OptionalScalar`.
fn is_optional_scalar(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "OptionalScalar";
        }
    }
    false
}

/// Field name without a raw identifier prefix (`r#type` becomes `type`).
fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    optional: bool,
    rename: Option<String>,
}

fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("hydroxyl") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("optional") {
                result.optional = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else {
                return Err(meta.error("expected `skip`, `optional` or `rename = \"...\"`"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

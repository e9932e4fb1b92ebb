use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, FieldsNamed, GenericArgument, Lit,
    PathArguments, Type,
};

/// A field marked `#[autowired]`: injected as `Arc<Inner>`, optionally raising
/// the minimum required state of its provider via `with_state = "..."`.
struct AutowiredField {
    field: Field,
    inner_type: Type,
    min_state: TokenStream,
}

/// A field marked `#[config(name = "...", default = "...")]`.
struct ConfigField {
    field: Field,
    key: String,
    default: String,
}

pub(crate) fn impl_component_derive(ast: &DeriveInput) -> TokenStream {
    let struct_name = &ast.ident;

    let fields = match validate_struct_input(ast) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error(),
    };

    match process_fields(fields, struct_name, &ast.attrs) {
        Ok(expanded) => expanded,
        Err(err) => err.to_compile_error(),
    }
}

fn process_fields(
    fields: &FieldsNamed,
    struct_name: &Ident,
    attrs: &[Attribute],
) -> Result<TokenStream, Error> {
    let mut autowired = Vec::new();
    let mut configured = Vec::new();
    let mut plain = Vec::new();

    for field in &fields.named {
        if has_attribute(&field.attrs, "autowired") {
            let inner_type = extract_arc_inner_type(&field.ty)?;
            let min_state = extract_with_state(&field.attrs)?;
            autowired.push(AutowiredField {
                field: field.clone(),
                inner_type,
                min_state,
            });
        } else if has_attribute(&field.attrs, "config") {
            let (key, default) = extract_config_attr(&field.attrs, field)?;
            configured.push(ConfigField {
                field: field.clone(),
                key,
                default,
            });
        } else {
            plain.push(field.clone());
        }
    }

    let scope = find_scope_attribute(attrs);
    let (inject_keys, extra_keys_tokens) = find_inject_keys(attrs)?;
    let _ = inject_keys;

    let dependency_inner_types: Vec<_> = autowired.iter().map(|a| a.inner_type.clone()).collect();
    let dependency_min_states: Vec<_> = autowired.iter().map(|a| a.min_state.clone()).collect();
    let autowired_names: Vec<_> = autowired
        .iter()
        .map(|a| a.field.ident.as_ref().unwrap().clone())
        .collect();

    let plain_initializers: Vec<_> = plain
        .iter()
        .map(|f| {
            let name = f.ident.as_ref().unwrap();
            if is_optional_field(&f.ty) {
                quote! { #name: None }
            } else {
                quote! { #name: Default::default() }
            }
        })
        .collect();

    let config_names: Vec<_> = configured
        .iter()
        .map(|c| c.field.ident.as_ref().unwrap().clone())
        .collect();
    let config_types: Vec<_> = configured.iter().map(|c| c.field.ty.clone()).collect();
    let config_keys: Vec<_> = configured.iter().map(|c| c.key.clone()).collect();
    let config_defaults: Vec<_> = configured.iter().map(|c| c.default.clone()).collect();

    let dependencies_ctor = quote! {
        || vec![ #( (std::any::TypeId::of::<#dependency_inner_types>(), #dependency_min_states), )* ]
    };

    let config_points_ctor = quote! {
        || vec![ #( ::loomwork::ConfigPointDef { name: #config_keys, default: #config_defaults }, )* ]
    };

    let expanded = quote! {
        impl ::loomwork::ComponentInitializer for #struct_name {
            type Dependencies = ( #( std::sync::Arc<#dependency_inner_types>, )* );

            fn __new(deps: Self::Dependencies) -> Self {
                let ( #( #autowired_names, )* ) = deps;

                Self {
                    #( #autowired_names, )*
                    #( #plain_initializers, )*
                    #( #config_names: Default::default(), )*
                }
            }

            fn __scope() -> ::loomwork::ComponentScope {
                #scope
            }
        }

        impl ::loomwork::Injectable for #struct_name {
            fn inject_fields(&mut self, _container: &::loomwork::Container) {
                #(
                    if let Some(value) = ::loomwork::ComponentFactory::get_component::<#dependency_inner_types>(_container) {
                        self.#autowired_names = value;
                    }
                )*
            }
        }

        inventory::submit! {
            ::loomwork::ComponentDefinition {
                type_id: || std::any::TypeId::of::<#struct_name>(),
                type_name: stringify!(#struct_name),
                scope: || <#struct_name as ::loomwork::ComponentInitializer>::__scope(),
                dependencies: #dependencies_ctor,
                keys: || vec![ #extra_keys_tokens ],
                config_points: #config_points_ctor,
                creator: |deps: &std::collections::HashMap<std::any::TypeId, ::loomwork::ComponentInstance>,
                          config: &dyn ::loomwork::ConfigLookup|
                          -> Result<::loomwork::ComponentInstance, ::loomwork::ComponentError> {
                    #(
                        let #autowired_names: std::sync::Arc<#dependency_inner_types> = deps
                            .get(&std::any::TypeId::of::<#dependency_inner_types>())
                            .ok_or_else(|| ::loomwork::ComponentError::DependencyNotFound(
                                format!("dependency '{}' not found", stringify!(#dependency_inner_types))
                            ))?
                            .clone()
                            .downcast::<#dependency_inner_types>()
                            .map_err(|_| ::loomwork::ComponentError::DowncastFailed(
                                format!("failed to downcast dependency '{}'", stringify!(#dependency_inner_types))
                            ))?;
                    )*

                    let mut instance = <#struct_name as ::loomwork::ComponentInitializer>::__new(
                        ( #( #autowired_names, )* )
                    );

                    #(
                        instance.#config_names = ::loomwork::config::coerce_field::<#config_types>(
                            config.lookup(#config_keys),
                            #config_defaults,
                        )?;
                    )*

                    Ok(std::sync::Arc::new(instance))
                },
            }
        }
    };

    Ok(expanded)
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn find_scope_attribute(attrs: &[Attribute]) -> TokenStream {
    for attr in attrs {
        if attr.path().is_ident("component") {
            if let Ok(list) = attr.meta.require_list() {
                let mut found = None;
                let _ = list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("scope") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        let ident = Ident::new(&value.value(), value.span());
                        found = Some(quote! { ::loomwork::ComponentScope::#ident });
                    }
                    Ok(())
                });
                if let Some(scope) = found {
                    return scope;
                }
            }
        }
    }
    quote! { ::loomwork::ComponentScope::Singleton }
}

/// Parses every `#[component(inject_key(key = "...", overwrite = true|false))]`
/// declaration on the struct into the `keys()` vec literal.
fn find_inject_keys(attrs: &[Attribute]) -> Result<(Vec<(String, bool)>, TokenStream), Error> {
    let mut keys = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("component") {
            if let Ok(list) = attr.meta.require_list() {
                let _ = list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("inject_key") {
                        let mut key = None;
                        let mut overwrite = true;
                        meta.parse_nested_meta(|inner| {
                            if inner.path.is_ident("key") {
                                let value: syn::LitStr = inner.value()?.parse()?;
                                key = Some(value.value());
                            } else if inner.path.is_ident("overwrite") {
                                let value: Lit = inner.value()?.parse()?;
                                if let Lit::Bool(b) = value {
                                    overwrite = b.value();
                                }
                            }
                            Ok(())
                        })?;
                        if let Some(k) = key {
                            keys.push((k, overwrite));
                        }
                    }
                    Ok(())
                });
            }
        }
    }

    let tokens = keys
        .iter()
        .map(|(k, o)| quote! { (#k, #o), })
        .collect::<TokenStream>();

    Ok((keys, tokens))
}

fn extract_with_state(attrs: &[Attribute]) -> Result<TokenStream, Error> {
    for attr in attrs {
        if attr.path().is_ident("autowired") {
            if let Ok(list) = attr.meta.require_list() {
                let mut state = None;
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("with_state") {
                        let value: syn::LitStr = meta.value()?.parse()?;
                        let state_name = value.value();
                        let ident = Ident::new(&state_name, value.span());
                        state = Some(quote! { ::loomwork::State::#ident });
                    }
                    Ok(())
                })?;
                if let Some(s) = state {
                    return Ok(s);
                }
            }
        }
    }
    Ok(quote! { ::loomwork::State::Created })
}

fn extract_config_attr(attrs: &[Attribute], field: &Field) -> Result<(String, String), Error> {
    for attr in attrs {
        if attr.path().is_ident("config") {
            let list = attr.meta.require_list()?;
            let mut name = None;
            let mut default = String::new();
            list.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    name = Some(value.value());
                } else if meta.path.is_ident("default") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    default = value.value();
                }
                Ok(())
            })?;
            let name = name.unwrap_or_else(|| field.ident.as_ref().unwrap().to_string());
            return Ok((name, default));
        }
    }
    Err(Error::new_spanned(field, "expected #[config(name = .., default = ..)]"))
}

fn extract_arc_inner_type(ty: &Type) -> Result<Type, Error> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident != "Arc" {
                return Err(Error::new_spanned(
                    ty,
                    "fields with #[autowired] must be of type Arc<T>",
                ));
            }
            if let PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(GenericArgument::Type(inner_ty)) = args.args.first() {
                    return Ok(inner_ty.clone());
                }
            }
        }
    }
    Err(Error::new_spanned(
        ty,
        "fields with #[autowired] must be of type Arc<T>",
    ))
}

fn is_optional_field(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}

fn validate_struct_input(ast: &DeriveInput) -> Result<&FieldsNamed, Error> {
    match &ast.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(Error::new_spanned(
                ast,
                "Component derive macro only supports structs with named fields",
            )),
        },
        _ => Err(Error::new_spanned(
            ast,
            "Component derive macro can only be used on structs",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn simple_struct_expands_without_error() {
        let input: DeriveInput = parse_quote! {
            #[derive(Component)]
            #[component(scope = "Singleton")]
            struct SimpleStruct {
                #[autowired]
                field1: std::sync::Arc<DemoStruct>,
                field2: u32,
                field3: i32,
            }
        };

        let generated = impl_component_derive(&input);
        let text = generated.to_string();
        assert!(text.contains("ComponentInitializer"));
        assert!(text.contains("ComponentDefinition"));
    }

    #[test]
    fn config_field_is_not_treated_as_autowired() {
        let input: DeriveInput = parse_quote! {
            #[derive(Component)]
            struct ConfiguredStruct {
                #[config(name = "port", default = "8080")]
                port: u16,
            }
        };

        let generated = impl_component_derive(&input);
        let text = generated.to_string();
        assert!(text.contains("coerce_field"));
    }
}

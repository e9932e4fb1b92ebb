use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Expr, Fields, Lit};

pub(crate) fn impl_configuration_derive(input: &DeriveInput) -> TokenStream {
    let struct_name = &input.ident;
    let config_module_key = match parse_config_module_key(&input.attrs) {
        Some(key) => key,
        None => {
            return Error::new_spanned(
                input,
                "missing required #[configuration(\"...\")] attribute",
            )
            .to_compile_error();
        }
    };

    let field_setters = generate_field_setters(&input.data, &config_module_key);
    let struct_init = generate_struct_initialization(&input.data);

    quote! {
        impl ::loomwork::config::ConfigComponent for #struct_name {
            fn from_config_manager(config_manager: &::loomwork::config::ConfigManager) -> ::loomwork::ContextResult<Self> {
                let mut instance = Self {
                    #(#struct_init)*
                };
                #(#field_setters)*
                Ok(instance)
            }

            fn config_module_key() -> &'static str {
                #config_module_key
            }
        }

        inventory::submit! {
            ::loomwork::config::ConfigFactory {
                type_id: || std::any::TypeId::of::<#struct_name>(),
                create_fn: |config_manager: &::loomwork::config::ConfigManager| -> ::loomwork::ContextResult<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
                    let instance = <#struct_name as ::loomwork::config::ConfigComponent>::from_config_manager(config_manager)?;
                    Ok(std::sync::Arc::new(instance) as std::sync::Arc<dyn std::any::Any + Send + Sync>)
                },
            }
        }
    }
}

fn generate_struct_initialization(data: &Data) -> Vec<TokenStream> {
    let mut initializers = Vec::new();

    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                let field_ident = field.ident.as_ref().unwrap();

                let mut default_value: Option<TokenStream> = None;

                for attr in &field.attrs {
                    if attr.path().is_ident("config_default") {
                        if let Ok(lit) = attr.parse_args::<Lit>() {
                            default_value = Some(match lit {
                                Lit::Int(int_lit) => quote! { Some(#int_lit) },
                                Lit::Str(str_lit) => quote! { Some(#str_lit.to_string()) },
                                Lit::Bool(bool_lit) => quote! { Some(#bool_lit) },
                                Lit::Float(float_lit) => quote! { Some(#float_lit) },
                                other => quote! { Some(#other) },
                            });
                        }
                    } else if attr.path().is_ident("config_default_t") {
                        if let Ok(expr) = attr.parse_args::<Expr>() {
                            default_value = Some(quote! { #expr });
                        }
                    }
                }

                let field_init = match default_value {
                    Some(default_val) => quote! { #field_ident: #default_val, },
                    None => quote! { #field_ident: None, },
                };

                initializers.push(field_init);
            }
        }
    }

    initializers
}

fn generate_field_setters(data: &Data, config_module_key: &str) -> Vec<TokenStream> {
    let mut setters = Vec::new();
    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                let field_ident = field.ident.as_ref().unwrap();
                let field_name = field_ident.to_string();
                let config_key = format!("{config_module_key}.{field_name}");
                let inner_type = option_inner_type(&field.ty);

                let setter = match inner_type {
                    Some(inner) => quote! {
                        if let Some(raw) = config_manager.get_raw(#config_key) {
                            if let Some(parsed) = ::loomwork::config::coerce_optional::<#inner>(raw) {
                                instance.#field_ident = Some(parsed);
                            }
                        }
                    },
                    None => quote! {},
                };
                setters.push(setter);
            }
        }
    }
    setters
}

fn option_inner_type(ty: &syn::Type) -> Option<syn::Type> {
    if let syn::Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident != "Option" {
            return None;
        }
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                return Some(inner.clone());
            }
        }
    }
    None
}

fn parse_config_module_key(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("configuration") {
            if let Ok(meta_list) = attr.meta.require_list() {
                if let Ok(Lit::Str(lit_str)) = syn::parse2::<Lit>(meta_list.tokens.clone()) {
                    return Some(lit_str.value());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn generates_config_component_impl() {
        let input: DeriveInput = parse_quote! {
            #[derive(Configuration)]
            #[configuration("server")]
            struct ServerConfig {
                #[config_default_t(8080)]
                port: Option<u16>,
                host: Option<String>,
            }
        };

        let generated = impl_configuration_derive(&input).to_string();
        assert!(generated.contains("ConfigComponent"));
        assert!(generated.contains("ConfigFactory"));
    }

    #[test]
    fn missing_configuration_attribute_is_a_compile_error() {
        let input: DeriveInput = parse_quote! {
            #[derive(Configuration)]
            struct NoKey {
                port: Option<u16>,
            }
        };

        let generated = impl_configuration_derive(&input).to_string();
        assert!(generated.contains("compile_error"));
    }
}

use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, Ident, ImplItem, ItemImpl, Pat, PatType, Type};

/// Processes `impl Type { #[lifecycle_hook(state = "...")] fn ... }` blocks:
/// strips the marker attribute (the compiler does not otherwise know it) and
/// emits one `LifecycleHookDefinition` submission per marked method.
pub(crate) fn impl_hooks_attribute(mut item: ItemImpl) -> TokenStream {
    let owner_type = item.self_ty.clone();
    let owner_name = match &*owner_type {
        Type::Path(p) => p
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut submissions = Vec::new();

    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            let state_attr_idx = method
                .attrs
                .iter()
                .position(|attr| attr.path().is_ident("lifecycle_hook"));

            let Some(idx) = state_attr_idx else { continue };
            let attr = method.attrs.remove(idx);

            let state = match parse_state(&attr) {
                Ok(s) => s,
                Err(e) => return e.to_compile_error(),
            };

            let hook_name = method.sig.ident.clone();
            let hook_name_str = hook_name.to_string();

            let param_types: Vec<Type> = method
                .sig
                .inputs
                .iter()
                .filter_map(|arg| match arg {
                    FnArg::Typed(PatType { ty, .. }) => extract_arc_inner(ty),
                    FnArg::Receiver(_) => None,
                })
                .collect();

            let param_names: Vec<Ident> = method
                .sig
                .inputs
                .iter()
                .filter_map(|arg| match arg {
                    FnArg::Typed(PatType { pat, .. }) => match &**pat {
                        Pat::Ident(p) => Some(p.ident.clone()),
                        _ => None,
                    },
                    FnArg::Receiver(_) => None,
                })
                .collect();

            submissions.push(quote! {
                inventory::submit! {
                    ::loomwork::LifecycleHookDefinition {
                        owner: || std::any::TypeId::of::<#owner_type>(),
                        owner_name: #owner_name,
                        hook_name: #hook_name_str,
                        target_state: ::loomwork::State::#state,
                        dependencies: || vec![
                            #( (std::any::TypeId::of::<#param_types>(), ::loomwork::State::Created), )*
                        ],
                        invoke: |instance, deps| {
                            let owner = instance
                                .clone()
                                .downcast::<#owner_type>()
                                .map_err(|_| ::loomwork::ComponentError::DowncastFailed(
                                    #owner_name.to_string()
                                ))?;
                            #(
                                let #param_names: std::sync::Arc<#param_types> = deps
                                    .get(&std::any::TypeId::of::<#param_types>())
                                    .ok_or_else(|| ::loomwork::ComponentError::DependencyNotFound(
                                        format!("hook dependency '{}' not found", stringify!(#param_types))
                                    ))?
                                    .clone()
                                    .downcast::<#param_types>()
                                    .map_err(|_| ::loomwork::ComponentError::DowncastFailed(
                                        stringify!(#param_types).to_string()
                                    ))?;
                            )*
                            owner.#hook_name( #( #param_names, )* )
                        },
                    }
                }
            });
        }
    }

    quote! {
        #item
        #( #submissions )*
    }
}

fn parse_state(attr: &syn::Attribute) -> syn::Result<Ident> {
    let list = attr.meta.require_list()?;
    let mut state = None;
    list.parse_nested_meta(|meta| {
        if meta.path.is_ident("state") {
            let value: syn::LitStr = meta.value()?.parse()?;
            state = Some(Ident::new(&value.value(), value.span()));
        }
        Ok(())
    })?;
    state.ok_or_else(|| syn::Error::new_spanned(attr, "expected #[lifecycle_hook(state = \"...\")]"))
}

fn extract_arc_inner(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident != "Arc" {
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

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn strips_marker_attribute_and_emits_submission() {
        let input: ItemImpl = parse_quote! {
            impl DatabaseService {
                #[lifecycle_hook(state = "Started")]
                fn on_started(&self) -> Result<(), ::loomwork::ComponentError> {
                    Ok(())
                }
            }
        };

        let output = impl_hooks_attribute(input).to_string();
        assert!(!output.contains("lifecycle_hook"));
        assert!(output.contains("LifecycleHookDefinition"));
        assert!(output.contains("on_started"));
    }
}

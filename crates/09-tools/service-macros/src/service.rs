//! `#[derive(Service)]` 实现

use crate::lifecycle::{generate_lifecycle_impl, LifecycleHooks};
use crate::utils::{field_label, find_attribute, is_inject_type, parse_inject_attribute};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Ident, Index, LitStr, Member, Result};

/// 结构体级 `#[service(...)]` 参数
#[derive(Debug, Default)]
struct ServiceArgs {
    lifecycle: bool,
    container_aware: bool,
    hooks: LifecycleHooks,
}

impl ServiceArgs {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();
        let Some(attr) = find_attribute(&input.attrs, "service")? else {
            return Ok(args);
        };

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("lifecycle") {
                args.lifecycle = true;
            } else if meta.path.is_ident("container_aware") {
                args.container_aware = true;
            } else if meta.path.is_ident("start") {
                let method: LitStr = meta.value()?.parse()?;
                args.hooks.start = Some(method.parse::<Ident>()?);
            } else if meta.path.is_ident("stop") {
                let method: LitStr = meta.value()?.parse()?;
                args.hooks.stop = Some(method.parse::<Ident>()?);
            } else {
                return Err(meta.error(
                    "不支持的 service 参数，可用参数: lifecycle, container_aware, start, stop",
                ));
            }
            Ok(())
        })?;

        Ok(args)
    }
}

/// 一个注入点的生成信息
struct InjectField {
    label: String,
    service_id: String,
    member: Member,
}

fn collect_inject_fields(input: &DeriveInput) -> Result<Vec<InjectField>> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "#[derive(Service)] 只能用于结构体",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "#[derive(Service)] 只能用于结构体",
            ))
        }
    };

    let mut inject_fields = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let Some(attr) = find_attribute(&field.attrs, "inject")? else {
            continue;
        };

        if !is_inject_type(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[inject] 只能用于 Inject<T> 类型的字段",
            ));
        }

        let label = field_label(field, index);
        let service_id = match (parse_inject_attribute(attr)?, &field.ident) {
            (Some(id), _) => id,
            (None, Some(ident)) => ident.to_string(),
            (None, None) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "元组结构体字段必须显式给出服务标识，例如 #[inject(\"seed\")]",
                ))
            }
        };

        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        };

        inject_fields.push(InjectField {
            label,
            service_id,
            member,
        });
    }

    Ok(inject_fields)
}

/// 生成 `Service` 实现以及可选的 `Lifecycle` 实现
pub fn derive_service_impl(input: DeriveInput) -> Result<TokenStream> {
    let args = ServiceArgs::from_input(&input)?;
    let inject_fields = collect_inject_fields(&input)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let points = inject_fields.iter().map(|field| {
        let label = &field.label;
        let service_id = &field.service_id;
        let member = &field.member;
        quote! {
            ::infrastructure_common::InjectionPoint::new(#label, #service_id, &self.#member)
        }
    });

    let generated_lifecycle = if args.hooks.is_empty() {
        None
    } else {
        Some(generate_lifecycle_impl(&input, &args.hooks))
    };

    let as_lifecycle = if args.lifecycle || generated_lifecycle.is_some() {
        quote! {
            fn as_lifecycle(&self) -> ::core::option::Option<&dyn ::infrastructure_common::Lifecycle> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let as_container_aware = if args.container_aware {
        quote! {
            fn as_container_aware(&self) -> ::core::option::Option<&dyn ::infrastructure_common::ContainerAware> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::infrastructure_common::Service for #name #ty_generics #where_clause {
            fn injection_points(&self) -> ::std::vec::Vec<::infrastructure_common::InjectionPoint<'_>> {
                ::std::vec![#(#points),*]
            }

            #as_lifecycle

            #as_container_aware
        }

        #generated_lifecycle
    })
}

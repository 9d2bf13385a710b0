//! 生命周期实现生成

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident};

/// `#[service(start = "...", stop = "...")]` 指定的方法
#[derive(Debug, Default)]
pub struct LifecycleHooks {
    pub start: Option<Ident>,
    pub stop: Option<Ident>,
}

impl LifecycleHooks {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }
}

fn hook_call(method: Option<&Ident>) -> TokenStream {
    match method {
        Some(method) => quote! {
            self.#method().await.map_err(::core::convert::Into::into)
        },
        None => quote! {
            ::core::result::Result::Ok(())
        },
    }
}

/// 生成调用指定方法的 `Lifecycle` 实现
///
/// 方法需要是 `async fn(&self) -> Result<(), E>`，其中 `E: Into<BoxError>`。
/// 未指定的一侧直接返回 `Ok(())`。
pub fn generate_lifecycle_impl(input: &DeriveInput, hooks: &LifecycleHooks) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let start = hook_call(hooks.start.as_ref());
    let stop = hook_call(hooks.stop.as_ref());

    quote! {
        #[::infrastructure_common::async_trait]
        impl #impl_generics ::infrastructure_common::Lifecycle for #name #ty_generics #where_clause {
            async fn start(&self) -> ::core::result::Result<(), ::infrastructure_common::BoxError> {
                #start
            }

            async fn stop(&self) -> ::core::result::Result<(), ::infrastructure_common::BoxError> {
                #stop
            }
        }
    }
}

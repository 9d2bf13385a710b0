//! 宏工具函数

use syn::{Attribute, Expr, Field, Lit, LitStr, Meta, Result, Type};

/// 查找指定名称的属性，出现多次时报错
pub fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Result<Option<&'a Attribute>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(name)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, format!("重复的 #[{}] 注解", name)));
        }
        found = Some(attr);
    }
    Ok(found)
}

/// 解析 `#[inject]` 注解中的服务标识
///
/// 支持 `#[inject]`、`#[inject("id")]`、`#[inject(name = "id")]` 和
/// `#[inject = "id"]`，未给出标识时返回 `None`。
pub fn parse_inject_attribute(attr: &Attribute) -> Result<Option<String>> {
    let id = match &attr.meta {
        Meta::Path(_) => return Ok(None),
        Meta::NameValue(nv) => expect_str(&nv.value)?,
        Meta::List(list) => {
            if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
                lit
            } else {
                let mut name = None;
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        name = Some(meta.value()?.parse::<LitStr>()?);
                        Ok(())
                    } else {
                        Err(meta.error("不支持的 inject 参数，可用参数: name"))
                    }
                })?;
                match name {
                    Some(lit) => lit,
                    None => return Ok(None),
                }
            }
        }
    };

    if id.value().is_empty() {
        return Err(syn::Error::new_spanned(id, "服务标识不能为空"));
    }
    Ok(Some(id.value()))
}

fn expect_str(expr: &Expr) -> Result<LitStr> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.clone()),
            other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
        },
        other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
    }
}

/// 检查类型是否为 `Inject<T>`
pub fn is_inject_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| {
                segment.ident == "Inject"
                    && matches!(segment.arguments, syn::PathArguments::AngleBracketed(_))
            })
            .unwrap_or(false),
        _ => false,
    }
}

/// 字段在错误信息中使用的名称，元组字段使用下标
pub fn field_label(field: &Field, index: usize) -> String {
    field
        .ident
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| index.to_string())
}

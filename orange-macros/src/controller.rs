//! The `#[controller]` attribute.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[controller]` macro.
struct ControllerArgs {
    name: Option<String>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ControllerArgs { name })
    }
}

/// One generated action.
struct Action {
    name: String,
    method: Ident,
    params: Vec<Type>,
}

/// Implementation of the `#[controller]` macro.
pub fn controller_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let mut input = parse_macro_input!(item as ItemImpl);

    match expand(&args, &mut input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &ControllerArgs, input: &mut ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[controller] must be placed on an inherent impl block",
        ));
    }

    let mut actions = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let skip = take_action_attr(&mut method.attrs)?;
        if skip || !matches!(method.vis, Visibility::Public(_)) {
            continue;
        }

        if let Some(action) = action(method)? {
            actions.push(action);
        }
    }

    let controller_name = match &args.name {
        Some(name) => name.clone(),
        None => type_name(&input.self_ty)?,
    };

    let action_names: Vec<&str> = actions.iter().map(|a| a.name.as_str()).collect();

    let arms = actions.iter().map(|action| {
        let name = &action.name;
        let method = &action.method;
        let bindings: Vec<Ident> = (0..action.params.len())
            .map(|i| Ident::new(&format!("__arg{}", i), Span::call_site()))
            .collect();
        let parses = action.params.iter().zip(&bindings).enumerate().map(|(i, (ty, binding))| {
            quote! {
                let #binding: #ty = ::orange::parse_arg(__args.next(), action, #i)?;
            }
        });

        quote! {
            #name => {
                #(#parses)*
                ::orange::IntoBody::into_body(self.#method(#(#bindings),*))
            }
        }
    });

    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    let self_ty = &input.self_ty;

    Ok(quote! {
        #input

        impl #impl_generics #self_ty #where_clause {
            /// Actions exposed by this controller.
            pub const ACTIONS: &'static [&'static str] = &[#(#action_names),*];

            /// Reference name of this controller.
            pub const NAME: &'static str = #controller_name;
        }

        impl #impl_generics ::orange::Controller for #self_ty #where_clause {
            #[allow(unused_mut, unused_variables)]
            fn invoke(
                &mut self,
                action: &str,
                args: ::std::vec::Vec<::std::string::String>,
            ) -> ::core::result::Result<
                ::core::option::Option<::std::string::String>,
                ::orange::DispatchError,
            > {
                let mut __args = args.into_iter();
                match action {
                    #(#arms)*
                    _ => ::core::result::Result::Err(
                        ::orange::DispatchError::ControllerMethodNotFound(action.to_owned()),
                    ),
                }
            }
        }
    })
}

fn action(method: &ImplItemFn) -> syn::Result<Option<Action>> {
    let sig = &method.sig;

    let Some(FnArg::Receiver(receiver)) = sig.inputs.first() else {
        // Associated functions such as constructors are not actions.
        return Ok(None);
    };

    if receiver.reference.is_none() {
        return Err(syn::Error::new_spanned(
            receiver,
            "controller actions must take `&self` or `&mut self`",
        ));
    }

    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            sig.asyncness,
            "controller actions cannot be async",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "controller actions cannot be generic",
        ));
    }

    let mut params = Vec::new();
    for arg in sig.inputs.iter().skip(1) {
        let FnArg::Typed(pat_type) = arg else {
            continue;
        };

        if let Type::Reference(_) = &*pat_type.ty {
            return Err(syn::Error::new_spanned(
                &pat_type.ty,
                "action arguments are parsed from the route and must be owned types",
            ));
        }
        params.push((*pat_type.ty).clone());
    }

    let ident = sig.ident.clone();
    let name = ident.to_string().trim_start_matches("r#").to_owned();

    Ok(Some(Action {
        name,
        method: ident,
        params,
    }))
}

/// Remove `#[action(...)]` from a method, returning true for `#[action(skip)]`.
fn take_action_attr(attrs: &mut Vec<Attribute>) -> syn::Result<bool> {
    let mut skip = false;
    let mut error = None;

    attrs.retain(|attr| {
        if !attr.path().is_ident("action") {
            return true;
        }

        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown action option, expected `skip`"))
            }
        });
        if let Err(err) = parsed {
            error.get_or_insert(err);
        }
        false
    });

    match error {
        Some(err) => Err(err),
        None => Ok(skip),
    }
}

fn type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a named type")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "cannot derive a controller name; use #[controller(name = \"...\")]",
        )),
    }
}

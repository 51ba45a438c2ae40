//! Procedural macros for Orange.
//!
//! - `#[controller]` - turns an inherent `impl` block into a controller

use proc_macro::TokenStream;

mod controller;

/// Implement `Controller` for a type from its inherent `impl` block.
///
/// Every `pub fn` taking `&self` or `&mut self` becomes an action named after
/// the method. Arguments are parsed from the route captures with `FromStr`,
/// in order, and the return value is converted with `IntoBody`.
///
/// The block also gains two constants: `ACTIONS`, the action names, and
/// `NAME`, the controller reference (the type name unless
/// `#[controller(name = "...")]` says otherwise).
///
/// Mark a public helper with `#[action(skip)]` to keep it out of the table.
///
/// # Example
///
/// ```rust,ignore
/// #[orange::controller]
/// impl<'a> Product<'a> {
///     pub fn show(&mut self, slug: String, id: u32) -> String {
///         format!("{slug} #{id}")
///     }
/// }
///
/// registry.register(Product::NAME, Product::ACTIONS, |ctx| Box::new(Product::new(ctx)));
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_impl(attr, item)
}

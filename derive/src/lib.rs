extern crate proc_macro;

mod common;
mod migrate;

use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Embeds every `version_<ID>.rs` file of a directory as a migration.
///
/// ```ignore
/// creed_migrations::migrations!(pub MIGRATIONS, "migrations");
/// ```
///
/// Each file must define `fn up(&mut SqlBuffer, &mut Schema) -> Result<()>`
/// and may define `down`, `pre_up`, `post_up`, `pre_down`, `post_down`,
/// `description` and `is_transactional`. The macro expands to a module per
/// file and a `&[MigrationDefinition]` constant sorted by version.
#[proc_macro]
pub fn migrations(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as migrate::MigrateInput);
    match migrate::expand_migrations_from_lit_dir(input) {
        Ok(ts) => ts.into(),
        Err(e) => {
            if let Some(parse_err) = e.downcast_ref::<syn::Error>() {
                parse_err.to_compile_error().into()
            } else {
                let msg = e.to_string();
                quote!(::std::compile_error!(#msg)).into()
            }
        }
    }
}

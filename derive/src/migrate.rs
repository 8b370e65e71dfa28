use crate::common::{resolve_path, Result};
use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens, TokenStreamExt};
use std::cmp::Ordering;
use std::fs::{metadata, read_dir, read_to_string};
use std::path::Path;
use syn::parse::Parse;
use syn::{Item, LitStr, Token};

pub(crate) struct MigrateInput {
    pub_token: Option<Token![pub]>,
    ident: Ident,
    _comma: Token![,],
    path: LitStr,
}

impl Parse for MigrateInput {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let pub_token = if input.peek(Token![pub]) {
            Some(input.parse()?)
        } else {
            None
        };

        Ok(Self {
            pub_token,
            ident: input.parse()?,
            _comma: input.parse()?,
            path: input.parse()?,
        })
    }
}

#[derive(Default)]
struct QuotedMigration {
    version: String,

    has_description: bool,
    has_is_transactional: bool,
    has_pre_up: bool,
    has_post_up: bool,
    has_pre_down: bool,
    has_down: bool,
    has_post_down: bool,
}

impl QuotedMigration {
    fn mod_name(&self) -> Ident {
        Ident::new(&format!("version_{}", self.version), proc_macro2::Span::call_site())
    }

    fn register(&mut self, func_name: &str) {
        match func_name {
            "description" => self.has_description = true,
            "is_transactional" => self.has_is_transactional = true,
            "pre_up" => self.has_pre_up = true,
            "post_up" => self.has_post_up = true,
            "pre_down" => self.has_pre_down = true,
            "down" => self.has_down = true,
            "post_down" => self.has_post_down = true,
            _ => {}
        }
    }

    fn implementation(&self) -> TokenStream {
        let sql_buffer = quote! { ::creed_migrations::migrate::SqlBuffer };
        let schema = quote! { ::creed_migrations::schema::Schema };
        let result = quote! { ::creed_migrations::Result<()> };

        let hook = |present: bool, name: &str, mutable: bool| -> TokenStream {
            if !present {
                return quote! {};
            }

            let name = Ident::new(name, proc_macro2::Span::call_site());
            let schema_ty = if mutable {
                quote! { &mut #schema }
            } else {
                quote! { &#schema }
            };

            quote! {
                fn #name(&self, sql: &mut #sql_buffer, schema: #schema_ty) -> #result {
                    #name(sql, schema)
                }
            }
        };

        let description = if self.has_description {
            quote! {
                fn description(&self) -> &str {
                    description()
                }
            }
        } else {
            quote! {}
        };
        let is_transactional = if self.has_is_transactional {
            quote! {
                fn is_transactional(&self) -> bool {
                    is_transactional()
                }
            }
        } else {
            quote! {}
        };

        let up = hook(true, "up", true);
        let pre_up = hook(self.has_pre_up, "pre_up", false);
        let post_up = hook(self.has_post_up, "post_up", false);
        let down = hook(self.has_down, "down", true);
        let pre_down = hook(self.has_pre_down, "pre_down", false);
        let post_down = hook(self.has_post_down, "post_down", false);

        quote! {
            pub(super) struct MigrationImpl;

            impl ::creed_migrations::migrate::Migration for MigrationImpl {
                #description
                #is_transactional
                #pre_up
                #up
                #post_up
                #pre_down
                #down
                #post_down
            }
        }
    }
}

impl ToTokens for QuotedMigration {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let version = &self.version;
        let version_mod_name = self.mod_name();

        tokens.append_all(quote! {
            ::creed_migrations::migrate::MigrationDefinition {
                version: #version,
                migration: &#version_mod_name::MigrationImpl,
            }
        });
    }
}

/// Orders identifiers made of digits numerically and before every other
/// identifier, others as strings.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let numeric = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
    match (numeric(a), numeric(b)) {
        (true, true) => {
            let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
            ta.len()
                .cmp(&tb.len())
                .then_with(|| ta.cmp(tb))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

pub(crate) fn expand_migrations_from_lit_dir(migrate_input: MigrateInput) -> Result<TokenStream> {
    let path = resolve_path(migrate_input.path.value(), migrate_input.path.span())?;
    expand_migrations(&path, &migrate_input.ident, &migrate_input.pub_token)
}

pub(crate) fn expand_migrations(
    path: &Path,
    const_name: &Ident,
    pub_token: &Option<Token![pub]>,
) -> Result<TokenStream> {
    let mut migrations = Vec::new();

    for entry in read_dir(path)? {
        let entry = entry?;
        if !metadata(entry.path())?.is_file() {
            // not a file; ignore
            continue;
        }

        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();

        if !file_name.starts_with("version_") || !file_name.ends_with(".rs") {
            // not of the format: version_<VERSION>.rs; ignore
            continue;
        }

        let version = file_name[8..file_name.len() - 3].to_string();
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("invalid migration version in file name {}", file_name).into());
        }

        let file_path = entry.path().canonicalize()?;
        let migration_file = read_to_string(&file_path)?;
        let program = syn::parse_file(&migration_file)?;

        let mut quoted_migration = QuotedMigration {
            version,
            ..Default::default()
        };

        let mut has_up = false;
        for item in program.items.iter() {
            if let Item::Fn(func) = item {
                let func_name = func.sig.ident.to_string();
                has_up |= func_name == "up";
                quoted_migration.register(&func_name);
            }
        }

        if !has_up {
            return Err(format!("migration {} does not define an `up` function", file_name).into());
        }

        migrations.push((quoted_migration, program, file_path));
    }

    migrations.sort_by(|(a, _, _), (b, _, _)| compare_versions(&a.version, &b.version));

    let migrations_mods = migrations.iter().map(|(migration, program, file_path)| {
        let version_mod_name = migration.mod_name();
        let implementation = migration.implementation();
        let file_path = file_path.to_string_lossy();

        quote! {
            mod #version_mod_name {
                // this tells the compiler to watch this path for changes
                const _: &str = include_str!(#file_path);

                #program

                #implementation
            }
        }
    });
    let definitions = migrations.iter().map(|(migration, _, _)| migration);

    Ok(quote! {
        #pub_token const #const_name: &[::creed_migrations::migrate::MigrationDefinition] = &[
            #(#definitions),*
        ];

        #(#migrations_mods)*
    })
}

#[cfg(test)]
mod tests {
    use super::{compare_versions, expand_migrations, MigrateInput};
    use std::cmp::Ordering;
    use std::path::Path;

    #[test]
    fn versions_are_ordered_numerically() {
        assert_eq!(compare_versions("9", "10"), Ordering::Less);
        assert_eq!(compare_versions("20240115002100", "20240110204830"), Ordering::Greater);
        assert_eq!(compare_versions("abc", "abd"), Ordering::Less);
        assert_eq!(compare_versions("10", "1a"), Ordering::Less);
        assert_eq!(compare_versions("9", "1a"), Ordering::Less);
        assert_eq!(compare_versions("1a", "100"), Ordering::Greater);
    }

    #[test]
    fn input_is_parsed() {
        let input: MigrateInput = syn::parse_str(r#"pub MIGRATIONS, "tests/migrations""#).unwrap();
        assert!(input.pub_token.is_some());
        assert_eq!(input.ident, "MIGRATIONS");
        assert_eq!(input.path.value(), "tests/migrations");

        let input: MigrateInput = syn::parse_str(r#"MIGRATIONS, "tests/migrations""#).unwrap();
        assert!(input.pub_token.is_none());
    }

    #[test]
    fn directory_is_expanded_in_version_order() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/migrations");
        let ident = syn::parse_str("MIGRATIONS").unwrap();
        let tokens = expand_migrations(&path, &ident, &None).unwrap().to_string();

        let first = tokens.find("\"20240110204830\"").unwrap();
        let second = tokens.find("\"20240115002100\"").unwrap();
        assert!(first < second);
        assert!(tokens.contains("fn pre_up"));
    }
}

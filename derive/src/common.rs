use proc_macro2::Span;
use std::env;
use std::path::{Path, PathBuf};

/// Resolves a migrations directory against the manifest of the crate
/// invoking the macro.
pub(crate) fn resolve_path(path: impl AsRef<Path>, err_span: Span) -> syn::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Err(syn::Error::new(
            err_span,
            "migrations directory must be relative to the crate manifest",
        ));
    }

    let base_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        syn::Error::new(
            err_span,
            "CARGO_MANIFEST_DIR is not set; please use Cargo to build",
        )
    })?;

    let resolved = Path::new(&base_dir).join(path);
    if !resolved.is_dir() {
        return Err(syn::Error::new(
            err_span,
            format!("migrations directory {} does not exist", resolved.display()),
        ));
    }

    Ok(resolved)
}

pub(crate) type Error = Box<dyn std::error::Error>;
pub(crate) type Result<T> = std::result::Result<T, Error>;

//! Import command implementation.

use super::Context;
use crate::importers::{importer_for, ImportFormat};
use crate::Error;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the import command
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// File to read contacts from
    pub input: PathBuf,

    /// Input format; guessed from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<ImportFormat>,
}

/// Pick the import format from the flag or the file extension
pub fn resolve_format(explicit: Option<ImportFormat>, input: &Path) -> crate::Result<ImportFormat> {
    explicit
        .or_else(|| ImportFormat::from_path(input))
        .ok_or_else(|| Error::UnsupportedFormat {
            format: input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(no extension)")
                .to_string(),
        })
}

/// Run the import command
pub fn run(args: ImportArgs, ctx: &Context) -> Result<()> {
    let format = resolve_format(args.format, &args.input)?;
    let contacts = importer_for(format).import_contacts(&args.input)?;

    let mut store = ctx.open_store()?;
    let summary = store.import(contacts)?;
    if store.is_dirty() {
        store.save()?;
    }

    println!(
        "Imported {} contacts into '{}' from {}",
        summary.added,
        store.name(),
        args.input.display()
    );
    if summary.skipped > 0 {
        println!("Skipped {} contacts that were already present", summary.skipped);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::temp_context;
    use std::fs;

    #[test]
    fn test_resolve_format() {
        assert_eq!(
            resolve_format(None, Path::new("in.csv")).ok(),
            Some(ImportFormat::Csv)
        );
        assert_eq!(
            resolve_format(Some(ImportFormat::Json), Path::new("in.txt")).ok(),
            Some(ImportFormat::Json)
        );
        assert!(matches!(
            resolve_format(None, Path::new("in.vcf")),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_import_twice_skips_duplicates() -> Result<()> {
        let (temp_dir, ctx) = temp_context()?;
        let input = temp_dir.path().join("people.csv");
        fs::write(
            &input,
            "id,name,email\n\
             0b5b1c4e-8d53-4a7c-9f3c-2f0e1d6a7b8c,Ada,ada@example.org\n\
             1c6c2d5f-9e64-4b8d-8a4d-3a1f2e7b8c9d,Alan,\n",
        )?;

        let args = ImportArgs {
            input,
            format: None,
        };
        run(args.clone(), &ctx)?;
        run(args, &ctx)?;

        let store = ctx.open_store()?;
        assert_eq!(store.len(), 2);
        assert_eq!(store.contacts()[1].name, "Alan");
        Ok(())
    }

    #[test]
    fn test_missing_input_is_reported() -> Result<()> {
        let (temp_dir, ctx) = temp_context()?;
        let err = run(
            ImportArgs {
                input: temp_dir.path().join("absent.json"),
                format: None,
            },
            &ctx,
        )
        .expect_err("missing file must fail");

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NonexistentFile { .. })
        ));
        Ok(())
    }
}

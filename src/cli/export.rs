//! Export command implementation.

use super::Context;
use crate::exporters::ExportFormat;
use anyhow::{Context as _, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the export command
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Destination file
    pub output: PathBuf,

    /// Output format; guessed from the file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,
}

/// Pick the export format: explicit flag, then extension, then config default
pub fn resolve_format(
    explicit: Option<ExportFormat>,
    output: &Path,
    fallback: ExportFormat,
) -> ExportFormat {
    explicit
        .or_else(|| ExportFormat::from_path(output))
        .unwrap_or(fallback)
}

/// Run the export command
pub fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let format = resolve_format(
        args.format,
        &args.output,
        ctx.config.export.default_format,
    );

    store
        .export(&args.output, format)
        .with_context(|| format!("failed to export to {}", args.output.display()))?;

    println!(
        "Exported {} contacts from '{}' to {} ({})",
        store.len(),
        store.name(),
        args.output.display(),
        format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::temp_context;
    use crate::contact::Contact;
    use crate::Error;

    #[test]
    fn test_resolve_format() {
        let csv = ExportFormat::Csv;
        assert_eq!(
            resolve_format(Some(ExportFormat::Json), Path::new("out.vcf"), csv),
            ExportFormat::Json
        );
        assert_eq!(
            resolve_format(None, Path::new("out.vcf"), csv),
            ExportFormat::Vcf
        );
        assert_eq!(
            resolve_format(None, Path::new("out.txt"), ExportFormat::Json),
            ExportFormat::Json
        );
    }

    #[test]
    fn test_export_writes_file() -> Result<()> {
        let (temp_dir, ctx) = temp_context()?;
        let mut store = ctx.open_store()?;
        store.add(Contact::new("Ada Lovelace"))?;
        store.save()?;

        let output = temp_dir.path().join("contacts.json");
        run(
            ExportArgs {
                output: output.clone(),
                format: None,
            },
            &ctx,
        )?;

        let exported: Vec<Contact> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(exported, ctx.open_store()?.contacts());
        Ok(())
    }

    #[test]
    fn test_export_failure_is_io_error() -> Result<()> {
        let (temp_dir, ctx) = temp_context()?;
        let output = temp_dir.path().join("no-such-dir").join("out.csv");

        let err = run(
            ExportArgs {
                output,
                format: None,
            },
            &ctx,
        )
        .expect_err("missing directory must fail");

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Io(_))));
        Ok(())
    }
}

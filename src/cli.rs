use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// OpenAPI from pages - Generate OpenAPI documentation for the REST endpoints of an application's pages
#[derive(Parser, Debug)]
#[command(name = "openapi-from-pages")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the application directory (descriptor and message catalogs)
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Locale used to look up titles, summaries and descriptions
    #[arg(short = 'l', long = "locale", default_value = "en")]
    pub locale: String,

    /// Base name of the message catalog files (`<name>.properties`, `<name>_<locale>.properties`)
    #[arg(long = "catalog", default_value = "app")]
    pub catalog_name: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    info!("Locale: {}", args.locale);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::application::catalog::CatalogSet;
    use crate::application::descriptor::{ApplicationDescriptor, StaticApplication};
    use crate::generator::OpenApiGenerator;
    use crate::scanner::ProjectScanner;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use std::sync::Arc;

    info!("Starting OpenAPI document generation...");

    // Step 1: Scan the project for the descriptor and message catalogs
    info!("Scanning project directory...");
    let scan_result = ProjectScanner::new(args.project_path.clone()).scan()?;
    for warning in &scan_result.warnings {
        log::warn!("{}", warning);
    }

    let Some(descriptor_path) = scan_result.descriptor() else {
        anyhow::bail!(
            "No application descriptor (application.yaml, application.yml or application.json) found in {}",
            args.project_path.display()
        );
    };
    if scan_result.descriptors.len() > 1 {
        log::warn!(
            "Found {} descriptors, using {}",
            scan_result.descriptors.len(),
            descriptor_path.display()
        );
    }

    // Step 2: Assemble the application
    info!("Loading application from {}", descriptor_path.display());
    let descriptor = ApplicationDescriptor::load(descriptor_path)?;
    let application = Arc::new(StaticApplication::from_descriptor(&descriptor));

    // Step 3: Load message catalogs
    info!("Found {} message catalog file(s)", scan_result.catalogs.len());
    let catalogs = CatalogSet::load(&args.catalog_name, &scan_result.catalogs)?;

    // Step 4: Generate
    let generator = OpenApiGenerator::for_application(application, Arc::new(catalogs));
    let document = generator.generate(&args.locale)?;

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Pages described: {}", descriptor.pages.len());
    info!("  - Pages skipped: {}", generator.failed_pages().len());
    info!("  - Paths documented: {}", document.paths.len());
    info!("  - Tags: {}", document.tags.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(path: PathBuf) -> CliArgs {
        CliArgs::parse_from(["openapi-from-pages".into(), path.into_os_string()])
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let args = args_for(temp_dir.path().to_path_buf());

        assert!(matches!(args.output_format, OutputFormat::Yaml));
        assert_eq!(args.locale, "en");
        assert_eq!(args.catalog_name, "app");
        assert!(args.output_path.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_flags() {
        let args = CliArgs::parse_from([
            "openapi-from-pages",
            "./app",
            "-f",
            "json",
            "-o",
            "out.json",
            "-l",
            "fr_CA",
            "--catalog",
            "messages",
            "-v",
        ]);

        assert!(matches!(args.output_format, OutputFormat::Json));
        assert_eq!(args.output_path, Some(PathBuf::from("out.json")));
        assert_eq!(args.locale, "fr_CA");
        assert_eq!(args.catalog_name, "messages");
        assert!(args.verbose);
    }

    #[test]
    fn test_missing_project_path_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = parse_args_from_parsed(args_for(temp_dir.path().join("nope"))).unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_file_project_path_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("application.yaml");
        std::fs::write(&file, "").unwrap();

        let err = parse_args_from_parsed(args_for(file)).unwrap_err();

        assert!(err.to_string().contains("not a directory"));
    }
}

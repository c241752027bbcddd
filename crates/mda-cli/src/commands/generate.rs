use super::collect;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use cathmda::core::io::writers::check_targets;
use cathmda::engine::error::EngineError;
use cathmda::workflows::output;
use tracing::info;

pub fn run(args: GenerateArgs, quiet: bool) -> Result<()> {
    let (config, result) = collect(&args.selection, args.write_mode, quiet)?;
    let mode = config.output.write_mode;

    match (&args.destination.out, &args.destination.basedir) {
        (Some(out), _) => {
            check_targets([out.as_path()], mode).map_err(EngineError::from)?;
            let reference = config.generate.reference_architecture();
            let rows =
                output::write_domain_table(&result.registry, reference.as_deref(), out, mode)?;
            println!("✓ Wrote {} domain rows to: {}", rows, out.display());
        }
        (None, Some(base_dir)) => {
            info!("Writing project files to {:?}", base_dir);
            let files = output::write_project_files(
                &result.registry,
                &config.generate,
                &config.output,
                base_dir,
            )?;
            println!(
                "✓ Wrote {} project(s) to: {}",
                files.plan.projects.len(),
                base_dir.display()
            );
            println!("  {}", files.projects_file.display());
            println!("  {}", files.mda_file.display());
            println!("  {}", files.domain_table_file.display());
        }
        (None, None) => {
            return Err(CliError::Config(
                "One of --out or --basedir is required.".to_string(),
            ));
        }
    }
    Ok(())
}

use super::collect;
use crate::cli::SummaryArgs;
use crate::error::Result;
use cathmda::engine::partition::Project;
use cathmda::engine::summary::MdaSummary;
use cathmda::workflows::output::ProjectPlan;

pub fn run(args: SummaryArgs, quiet: bool) -> Result<()> {
    let (config, result) = collect(&args.selection, None, quiet)?;
    let plan = ProjectPlan::build(&result.registry, &config.generate)?;

    let mut summaries: Vec<&MdaSummary> = plan.summaries.values().collect();
    summaries.sort_by(|a, b| b.domain_count().cmp(&a.domain_count()));

    println!();
    println!(
        "{:<50} {:>8} {:>8} {}",
        "mda", "proteins", "domains", "min/max/mean"
    );
    for summary in summaries {
        println!("{}", summary_row(summary));
    }

    println!();
    println!("{}", Project::summary_header());
    for project in &plan.projects {
        println!("{}", project.summary_line());
    }
    Ok(())
}

fn summary_row(summary: &MdaSummary) -> String {
    let stats = summary
        .length_stats()
        .map_or_else(|| "-/-/-".to_string(), |s| s.to_string());
    format!(
        "{:<50} {:>8} {:>8} {}",
        summary.architecture_key,
        summary.protein_count,
        summary.domain_count(),
        stats
    )
}

use cathmda::core::io::table::TableRowSource;
use cathmda::core::io::writers::WriteMode;
use cathmda::engine::config::{GenerateConfigBuilder, OutputConfig};
use cathmda::engine::error::EngineError;
use cathmda::engine::progress::{Progress, ProgressReporter};
use cathmda::workflows::{generate, output};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

const SEQ: &str = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWERVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWUAAAAAAAA";

fn table() -> String {
    let rows = [
        ("Q1", "1.10.8.10", "1-50"),
        ("Q1", "3.40.50.300", "55-120"),
        ("Q1", "2.60.40.10", "150-200"),
        ("Q2", "1.10.8.10", "10-60"),
        ("Q2", "3.40.50.300", "62-110,115-130"),
        ("Q3", "1.10.8.10", "1-40"),
        ("Q4", "2.60.40.10", "1-90"),
    ];
    let mut text = String::from("accession\tsequence_md5\tsuperfamily_id\tsequence\tresolved\ttaxon_id\n");
    for (acc, sfam, resolved) in rows {
        text.push_str(&format!("{acc}\tmd5{acc}\t{sfam}\t{SEQ}\t{resolved}\t9606\n"));
    }
    text
}

#[test]
fn superfamily_run_produces_project_files() {
    let mut source = TableRowSource::from_reader(table().as_bytes()).unwrap();
    let config = GenerateConfigBuilder::new()
        .add_superfamily_id("1.10.8.10")
        .add_superfamily_id("3.40.50.300")
        .min_partition_size(Some(1))
        .build()
        .unwrap();

    let batches = Mutex::new(0);
    let reporter = ProgressReporter::with_callback(Box::new(|event| {
        if let Progress::BatchFinished = event {
            *batches.lock().unwrap() += 1;
        }
    }));
    let result = generate::run(&mut source, &config, &reporter).unwrap();
    assert_eq!(*batches.lock().unwrap(), 1);

    // Q4 carries neither target superfamily and never enters the run.
    assert_eq!(result.registry.accessions(), vec!["Q1", "Q2", "Q3"]);
    assert_eq!(result.assembly.domains_fused, 2);
    let q2 = result.registry.get("Q2").unwrap();
    assert!(q2.has_domain("Q2/10-130"));

    let dir = tempdir().unwrap();
    let files =
        output::write_project_files(&result.registry, &config, &OutputConfig::default(), dir.path())
            .unwrap();

    let prefix = "1.10.8.10-3.40.50.300";
    assert_eq!(files.plan.prefix, prefix);
    assert_eq!(
        fs::read_to_string(&files.projects_file).unwrap(),
        format!("{prefix}-mda-1\n{prefix}-mda-2\n")
    );

    // Q2 and Q3 share an architecture; only Q2 holds a fused reference domain.
    let first = &files.plan.projects[0];
    assert_eq!(first.member_architectures, vec!["1.10.8.10"]);
    assert_eq!(first.protein_count, 2);
    assert_eq!(first.domain_count, 1);
    let second = &files.plan.projects[1];
    assert_eq!(second.member_architectures, vec!["1.10.8.10-2.60.40.10"]);

    let table = fs::read_to_string(&files.domain_table_file).unwrap();
    assert_eq!(table.lines().count(), 2);
    assert!(table.contains("Q1\tQ1/1-120\t1.10.8.10-2.60.40.10\t"));

    for fasta in &files.sequence_files {
        assert!(fasta.exists());
    }

    // A second run into the same directory must refuse to touch anything.
    let again =
        output::write_project_files(&result.registry, &config, &OutputConfig::default(), dir.path());
    assert!(matches!(again, Err(EngineError::OutputConflict { .. })));
}

#[test]
fn taxon_run_writes_flat_table_of_all_domains() {
    let mut source = TableRowSource::from_reader(table().as_bytes()).unwrap();
    let config = GenerateConfigBuilder::new()
        .taxon_id(Some("9606".to_string()))
        .partition_by_architecture(false)
        .build()
        .unwrap();
    let result = generate::run(&mut source, &config, &ProgressReporter::new()).unwrap();
    assert_eq!(result.registry.len(), 4);

    let dir = tempdir().unwrap();
    let out = dir.path().join("all.tsv");
    let rows = output::write_domain_table(&result.registry, None, &out, WriteMode::None).unwrap();
    assert_eq!(rows, 7);

    let first = fs::read_to_string(&out).unwrap();
    let fields: Vec<&str> = first.lines().next().unwrap().split('\t').collect();
    assert_eq!(fields[0], "Q1");
    assert_eq!(fields[1], "Q1/1-50");
    assert_eq!(fields[2], "1.10.8.10-3.40.50.300-2.60.40.10");
    assert_eq!(fields[3], &SEQ[0..50]);
}

use samplesheet::testing::*;
use samplesheet::*;
use std::fs;

#[test]
fn writes_one_file_per_requested_profile() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("rnaseq,viralrecon");

    let report = run_configured(&sample_entries(), &ProfileRegistry::builtin(), &config);

    assert!(report.is_success());
    let written: Vec<_> = report.written().map(|(p, _, rows)| (p, rows)).collect();
    assert_eq!(written, vec![("rnaseq", 3), ("viralrecon", 3)]);
    assert!(tmp.path().join("rnaseq.csv").exists());
    assert!(tmp.path().join("viralrecon.csv").exists());
    assert!(!tmp.path().join("taxprofiler.csv").exists());
    Ok(())
}

#[test]
fn rnaseq_profile_shape() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let config = SamplesheetConfig::new(tmp.path())
        .with_format(FormatSpec::Tsv)
        .with_fastq_dir("/results/fastq");

    let report = generate_downstream_samplesheets(
        &sample_entries(),
        &["rnaseq"],
        &ProfileRegistry::builtin(),
        &config,
    );

    assert!(report.is_success());
    assert_samplesheet_lines(
        tmp.path().join("rnaseq.tsv"),
        &[
            "sample\tfastq_1\tfastq_2\tstrandedness",
            "SRX001\t/results/fastq/SRR001_1.fastq.gz\t\tauto",
            "SRX002\t/results/fastq/SRR002_1.fastq.gz\t/results/fastq/SRR002_2.fastq.gz\tauto",
            "SRX003\t/results/fastq/SRR003.fastq.gz\t\tauto",
        ],
    );
    Ok(())
}

#[test]
fn taxprofiler_profile_shape() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let config = SamplesheetConfig::new(tmp.path());

    let report = generate_downstream_samplesheets(
        &sample_entries(),
        &["taxprofiler"],
        &ProfileRegistry::builtin(),
        &config,
    );

    assert!(report.is_success());
    assert_samplesheet_lines(
        tmp.path().join("taxprofiler.csv"),
        &[
            "sample,run_accession,instrument_platform,fastq_1,fastq_2,fasta",
            "SRX001,SRR001,ILLUMINA,/raw/SRR001_1.fastq.gz,,",
            "SRX002,SRR002,ILLUMINA,/raw/SRR002_1.fastq.gz,/raw/SRR002_2.fastq.gz,",
            "SRX003,SRX003,OXFORD_NANOPORE,/raw/SRR003.fastq.gz,,/raw/SRR003.fasta",
        ],
    );
    Ok(())
}

#[test]
fn failing_profile_does_not_block_siblings() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut registry = ProfileRegistry::builtin();
    registry.register(failing_profile("broken"));
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("broken,rnaseq");

    let report = run_configured(&sample_entries(), &registry, &config);

    assert!(!report.is_success());
    let failed: Vec<_> = report.failed().map(|(p, _)| p).collect();
    assert_eq!(failed, vec!["broken"]);
    assert!(matches!(
        report.get("broken"),
        Some(ProfileOutcome::Failed {
            error: SamplesheetError::Shaping { .. }
        })
    ));
    assert!(!tmp.path().join("broken.csv").exists());
    assert_eq!(fs::read_to_string(tmp.path().join("rnaseq.csv"))?.lines().count(), 4);
    Ok(())
}

#[test]
fn unwritable_profile_does_not_block_siblings() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    fs::write(tmp.path().join("blocker"), "not a directory")?;
    let mut registry = ProfileRegistry::builtin();
    registry.register(
        ProfileStrategy::new("stuck", samplesheet::profiles::shape_viralrecon)
            .with_output_stem("blocker/stuck"),
    );
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("stuck,rnaseq");

    let report = run_configured(&sample_entries(), &registry, &config);

    match report.get("stuck") {
        Some(ProfileOutcome::Failed { error }) => assert!(error.is_io(), "{error}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(matches!(
        report.get("rnaseq"),
        Some(ProfileOutcome::Written { rows: 3, .. })
    ));
    assert_eq!(fs::read_to_string(tmp.path().join("rnaseq.csv"))?.lines().count(), 4);
    Ok(())
}

#[test]
fn missing_platform_fails_only_taxprofiler() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut samples = sample_entries();
    samples.push(SampleEntry::single("SRX004", "/raw/SRR004.fastq.gz"));
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("taxprofiler,viralrecon");

    let report = run_configured(&samples, &ProfileRegistry::builtin(), &config);

    match report.get("taxprofiler") {
        Some(ProfileOutcome::Failed {
            error: SamplesheetError::Shaping { sample, .. },
        }) => assert_eq!(sample, "SRX004"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(matches!(
        report.get("viralrecon"),
        Some(ProfileOutcome::Written { rows: 4, .. })
    ));
    Ok(())
}

#[test]
fn unknown_profile_is_a_silent_no_op() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("sarek");

    let report = run_configured(&sample_entries(), &ProfileRegistry::builtin(), &config);

    assert!(report.is_success());
    assert_eq!(report.skipped().collect::<Vec<_>>(), vec!["sarek"]);
    assert_eq!(report.written().count(), 0);
    assert_eq!(fs::read_dir(tmp.path())?.count(), 0);
    Ok(())
}

#[test]
fn empty_input_follows_config_policy() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let strict = SamplesheetConfig::new(tmp.path().join("strict")).with_profiles("rnaseq");
    let lenient = SamplesheetConfig::new(tmp.path().join("lenient"))
        .with_profiles("rnaseq")
        .with_on_empty(EmptyPolicy::EmptyFile);
    let registry = ProfileRegistry::builtin();

    let strict_report = run_configured(&[], &registry, &strict);
    let lenient_report = run_configured(&[], &registry, &lenient);

    assert!(matches!(
        strict_report.get("rnaseq"),
        Some(ProfileOutcome::Failed {
            error: SamplesheetError::EmptyInput
        })
    ));
    assert!(lenient_report.is_success());
    assert_eq!(fs::read_to_string(tmp.path().join("lenient/rnaseq.csv"))?, "");
    Ok(())
}

#[test]
fn custom_output_stem() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut registry = ProfileRegistry::new();
    registry.register(
        ProfileStrategy::new("ids", |e: &SampleEntry, _: &ShapeContext| {
            Record::new().with("sample", e.id.as_str())
        })
        .with_output_stem("sample_ids"),
    );
    let config = SamplesheetConfig::new(tmp.path()).with_format(FormatSpec::Txt);

    let report = generate_downstream_samplesheets(&sample_entries(), &["IDS"], &registry, &config);

    assert!(report.is_success());
    assert_samplesheet_lines(
        tmp.path().join("sample_ids.txt"),
        &["sample", "SRX001", "SRX002", "SRX003"],
    );
    Ok(())
}

#[cfg(feature = "parallel-io")]
#[test]
fn parallel_report_keeps_request_order() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut registry = ProfileRegistry::builtin();
    registry.register(failing_profile("broken"));
    let requested = parse_profile_list("viralrecon,broken,unknown,rnaseq,taxprofiler");
    let config = SamplesheetConfig::new(tmp.path());

    let report =
        generate_downstream_samplesheets_par(&sample_entries(), &requested, &registry, &config);

    let order: Vec<&str> = report.runs().iter().map(|r| r.profile.as_str()).collect();
    assert_eq!(order, requested);
    assert_eq!(report.written().count(), 3);
    assert_eq!(report.failed().count(), 1);
    Ok(())
}

#[test]
fn report_serializes_outcomes() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut registry = ProfileRegistry::builtin();
    registry.register(failing_profile("broken"));
    let config = SamplesheetConfig::new(tmp.path()).with_profiles("rnaseq,broken,nope");

    let report = run_configured(&sample_entries(), &registry, &config);
    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    let runs = json["runs"].as_array().expect("runs array");
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0]["profile"], "rnaseq");
    assert_eq!(runs[0]["status"], "written");
    assert_eq!(runs[0]["rows"], 3);
    assert_eq!(runs[1]["status"], "failed");
    assert!(runs[1]["error"].as_str().unwrap().contains("broken"));
    assert_eq!(runs[2]["status"], "skipped");

    let text = report.to_string();
    assert!(text.contains("FAILED"));
    assert!(text.contains("unknown profile"));
    Ok(())
}

use samplesheet::*;
use std::fs;

#[cfg(feature = "io-csv")]
#[test]
fn read_csv_entries_with_optional_columns() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("samples.csv");
    fs::write(
        &path,
        "sample,single_end,fastq_1,fastq_2,instrument_platform\n\
         A,true,/x/a_1.fq,,ILLUMINA\n\
         B,false,/x/b_1.fq,/x/b_2.fq,\n",
    )?;

    let entries = read_sample_entries(&path)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "A");
    assert!(entries[0].single_end);
    assert_eq!(entries[0].fastq_2, None);
    assert_eq!(entries[0].instrument_platform.as_deref(), Some("ILLUMINA"));
    assert_eq!(entries[1].mate(), Some("/x/b_2.fq"));
    assert_eq!(entries[1].instrument_platform, None);
    assert_eq!(entries[1].run_accession, None);
    Ok(())
}

#[cfg(feature = "io-csv")]
#[test]
fn read_tsv_entries() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("samples.tsv");
    fs::write(&path, "id\tfastq_1\nS1\t/r/s1.fq\nS2\t/r/s2.fq\n")?;

    let entries = read_sample_entries(&path)?;

    assert_eq!(
        entries,
        vec![
            SampleEntry {
                single_end: false,
                ..SampleEntry::single("S1", "/r/s1.fq")
            },
            SampleEntry {
                single_end: false,
                ..SampleEntry::single("S2", "/r/s2.fq")
            },
        ]
    );
    Ok(())
}

#[cfg(feature = "io-csv")]
#[test]
fn bad_csv_row_reports_row_number() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("bad.csv");
    fs::write(&path, "sample,single_end,fastq_1\nA,true,/a.fq\nB,maybe,/b.fq\n")?;

    let err = read_sample_entries(&path).unwrap_err();

    assert!(format!("{err:#}").contains("row #2"), "{err:#}");
    Ok(())
}

#[cfg(feature = "io-jsonl")]
#[test]
fn read_jsonl_entries_skips_blank_lines() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("samples.jsonl");
    fs::write(
        &path,
        concat!(
            r#"{"id":"A","single_end":true,"fastq_1":"/x/a.fq"}"#,
            "\n\n",
            r#"{"sample":"B","fastq_1":"/x/b_1.fq","fastq_2":"/x/b_2.fq","run_accession":"SRR2"}"#,
            "\n",
        ),
    )?;

    let entries = read_sample_entries(&path)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].mate(), None);
    assert_eq!(entries[1].id, "B");
    assert_eq!(entries[1].run_accession.as_deref(), Some("SRR2"));
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("samples.xlsx");
    fs::write(&path, "")?;

    let err = read_sample_entries(&path).unwrap_err();

    assert!(err.to_string().contains("unsupported"));
    Ok(())
}

#[test]
fn missing_input_file_names_path() {
    let err = read_sample_entries("/definitely/not/here.csv").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.csv"));
}

use assert_cmd::Command;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn command_orthologs() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("orthologs")
        .arg("tests/ppit/hits.csv")
        .arg("tests/ppit/human.fa")
        .arg("tests/ppit/yeast.fa")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    // header, P1/Q1, P2/Q2, P3/Q3
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.starts_with("A,B,E-Value,Alignment_Length,"));
    assert!(stdout.lines().next().unwrap().ends_with(",Coverage_A,Coverage_B"));
    assert!(stdout.contains("P1,Q1,1e-20,10,1,10,1,10,50,10,10,0,0,0.9,0.9\n"));
    assert!(stdout.contains(",0.9,0.889\n"), "coverage of Q2");
    // low coverage
    assert!(!stdout.contains("P3,Q1,"));
    // ambiguous residue in P4
    assert!(!stdout.contains("P4,"));
    // missing from FASTA
    assert!(!stdout.contains("P9,"));

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("P9"), "missing protein reported");

    Ok(())
}

#[test]
fn command_orthologs_options() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("orthologs.csv");

    let mut cmd = Command::cargo_bin("ppit")?;
    cmd.arg("orthologs")
        .arg("tests/ppit/hits.csv")
        .arg("tests/ppit/human.fa")
        .arg("tests/ppit/yeast.fa")
        .arg("--ambiguous")
        .arg("--coverage")
        .arg("0.2")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().success();

    let content = fs::read_to_string(&outfile)?;
    assert_eq!(content.lines().count(), 6);
    assert!(content.contains("P3,Q1,"));
    assert!(content.contains("P4,Q4,"));

    Ok(())
}

#[test]
fn command_orthologs_gz() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let fasta = temp.path().join("human.fa.gz");

    let mut gz = flate2::write::GzEncoder::new(
        fs::File::create(&fasta)?,
        flate2::Compression::default(),
    );
    gz.write_all(&fs::read("tests/ppit/human.fa")?)?;
    gz.finish()?;

    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("orthologs")
        .arg("tests/ppit/hits.csv")
        .arg(&fasta)
        .arg("tests/ppit/yeast.fa")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 4);

    Ok(())
}

#[test]
fn command_orthologs_zero_length() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let fasta = temp.path().join("empty.fa");
    fs::write(&fasta, ">P1\n\n")?;
    let hits = temp.path().join("hits.csv");
    fs::write(
        &hits,
        "A,B,E-Value,Alignment_Length,Start_A,End_A,Start_B,End_B,Bitscore,Identical_Count,Positive_Count,Mismatch_Count,Gap\n\
         P1,Q1,1e-20,10,1,10,1,10,50,10,10,0,0\n",
    )?;

    let mut cmd = Command::cargo_bin("ppit")?;
    cmd.arg("orthologs")
        .arg(&hits)
        .arg(&fasta)
        .arg("tests/ppit/yeast.fa");
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("zero-length"));

    Ok(())
}

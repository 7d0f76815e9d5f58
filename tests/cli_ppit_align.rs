use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

#[test]
fn command_align() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("align")
        .arg("tests/ppit/orthologs.csv")
        .arg("tests/ppit/human.fa")
        .arg("tests/ppit/yeast.fa")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 4);
    assert_eq!(
        stdout.lines().next().unwrap(),
        "A,B,Alignment1,Alignment2,Score,Length"
    );
    assert!(stdout.contains("P1,Q1,MKVLAGHEQR,MKVLAGHEQR,51,10\n"));
    // two co-optimal places for the gap, the smaller text wins
    assert!(stdout.contains("P2,Q2,MAVIKLLPGE,MAVIK-LPGE,34,10\n"));

    Ok(())
}

#[test]
fn command_align_parallel() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("alignments.csv");

    let mut cmd = Command::cargo_bin("ppit")?;
    cmd.arg("align")
        .arg("tests/ppit/orthologs.csv")
        .arg("tests/ppit/human.fa")
        .arg("tests/ppit/yeast.fa")
        .arg("--interfaces")
        .arg("tests/ppit/interfaces.tsv")
        .arg("--parallel")
        .arg("2")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().success();

    let content = fs::read_to_string(&outfile)?;
    let rows: Vec<&str> = content.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    // input order is kept
    assert!(rows[0].starts_with("P1,Q1,"));
    assert!(rows[1].starts_with("P2,Q2,"));
    assert!(rows[2].starts_with("P3,Q3,"));

    Ok(())
}

#[test]
fn command_align_gap_penalties() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("align")
        .arg("tests/ppit/orthologs.csv")
        .arg("tests/ppit/human.fa")
        .arg("tests/ppit/yeast.fa")
        .arg("--gap-open")
        .arg("-4")
        .arg("--gap-extend")
        .arg("-1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("P2,Q2,MAVIKLLPGE,MAVIK-LPGE,40,10\n"));

    Ok(())
}

#[test]
fn command_align_missing_sequence() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let fasta = temp.path().join("yeast.fa");
    fs::write(&fasta, ">Q1\nMKVLAGHEQR\n")?;

    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("align")
        .arg("tests/ppit/orthologs.csv")
        .arg("tests/ppit/human.fa")
        .arg(&fasta)
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 2);

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Q2"));

    Ok(())
}

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

// value of `column` in a data row
fn field<'a>(header: &str, row: &'a str, column: &str) -> Option<&'a str> {
    let i = header.split(',').position(|h| h == column)?;
    row.split(',').nth(i)
}

fn interologs(temp: &TempDir) -> anyhow::Result<std::path::PathBuf> {
    let outfile = temp.path().join("interologs.csv");
    let mut cmd = Command::cargo_bin("ppit")?;
    cmd.arg("interologs")
        .arg("tests/ppit/orthologs.csv")
        .arg("tests/ppit/interactome_a.tsv")
        .arg("tests/ppit/interactome_b.tsv")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().success();
    Ok(outfile)
}

#[test]
fn command_interface() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let infile = interologs(&temp)?;

    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("interface")
        .arg(&infile)
        .arg("tests/ppit/interfaces.tsv")
        .arg("tests/ppit/alignments.csv")
        .arg("tests/ppit/human.fa")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    // only P2-P1 has an interface
    assert_eq!(lines.len(), 2);
    let header = lines[0];
    assert!(header.starts_with("A1,B1,A2,B2,"));
    assert!(header.ends_with(",Interface_Database,Label"));
    assert_eq!(header.split(',').count(), lines[1].split(',').count());
    assert_eq!(header.matches("Label").count(), 1);

    assert!(lines[1].starts_with("P2,Q2,P1,Q1,"));
    assert!(lines[1].ends_with(",PDB,1"));

    // P2 side: residues 2 and 4
    assert_eq!(
        field(header, lines[1], "Interface_Matching_Count_Pair_1"),
        Some("2")
    );
    assert_eq!(
        field(header, lines[1], "Interface_Residues_Length_Pair_1"),
        Some("2")
    );
    // P1 side: residues 1-3
    assert_eq!(
        field(header, lines[1], "Interface_Matching_Count_Pair_2"),
        Some("3")
    );
    assert_eq!(
        field(header, lines[1], "Interface_Gap_Score_Pair_2"),
        Some("0")
    );

    Ok(())
}

#[test]
fn command_interface_annotations() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let infile = interologs(&temp)?;
    let outfile = temp.path().join("interface.csv");

    let mut cmd = Command::cargo_bin("ppit")?;
    cmd.arg("interface")
        .arg(&infile)
        .arg("tests/ppit/interfaces.tsv")
        .arg("tests/ppit/alignments.csv")
        .arg("tests/ppit/human.fa")
        .arg("--domains")
        .arg("tests/ppit/domains.tsv")
        .arg("--sites")
        .arg("tests/ppit/sites.csv")
        .arg("--seed")
        .arg("7")
        .arg("-o")
        .arg(&outfile);
    cmd.assert().success();

    let content = fs::read_to_string(&outfile)?;
    let lines: Vec<&str> = content.lines().collect();
    let header = lines[0];

    // overlaps are counted against A1, P2, which has no annotations
    assert_eq!(
        field(header, lines[1], "Interface_Overlapping_Domain_Count_Pair_2"),
        Some("0")
    );
    assert_eq!(
        field(
            header,
            lines[1],
            "Interface_Overlapping_Special-Sites_Count_Pair_2"
        ),
        Some("0")
    );

    Ok(())
}

#[test]
fn command_interface_missing_alignment() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let infile = interologs(&temp)?;
    let alignments = temp.path().join("alignments.csv");
    fs::write(
        &alignments,
        "A,B,Alignment1,Alignment2,Score,Length\nP1,Q1,MKVLAGHEQR,MKVLAGHEQR,51,10\n",
    )?;

    let mut cmd = Command::cargo_bin("ppit")?;
    let output = cmd
        .arg("interface")
        .arg(&infile)
        .arg("tests/ppit/interfaces.tsv")
        .arg(&alignments)
        .arg("tests/ppit/human.fa")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 1);

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("No alignment"));

    Ok(())
}

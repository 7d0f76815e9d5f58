use clap::*;
use ppit::libs::align::{read_alignments, GlobalAlignment};
use ppit::libs::error::PpiError;
use ppit::libs::features::{InterfaceFeatures, InterologFeatures};
use ppit::libs::gap_pattern::{GapPatternModel, SampleParams};
use ppit::libs::indices::parse_zipped;
use ppit::libs::store::{load_fasta, Domains, InterfaceTable, SpecialSites};
use ppit::libs::tables::Tables;
use rayon::prelude::*;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("interface")
        .about("Interface residue divergence of interologs")
        .after_help(
            r###"
Keeps the interologs whose A proteins have a known interface and compares
the interface residues of each side along the side's global alignment.

Output columns (CSV):
    <interolog columns without Label>,
    Interface_*_Pair_1,Interface_*_Pair_2,Interface_Database,Label

Each side gets the Matching/Mismatching/Gap counts, the BLOSUM score, 12
physicochemical properties, 3 secondary structure propensities, the
interface length, the overlaps with the special sites and the domain of
protein A1, and the gap pattern score.

Notes:
* interfaces.tsv has `P1`, `P2`, `Source`, `P1_IRES` and `P2_IRES`
* The gap pattern model is built from a sample of the sequences in a.fa,
  one in --every, with a random phase drawn from --seed
* Interologs without an alignment on either side are skipped with a warning

Examples:
1. Default:
   ppit interface interologs.csv insider.tsv alignments.csv human.fa -o interface.csv

2. With annotations and another sample:
   ppit interface interologs.csv insider.tsv alignments.csv human.fa \
       --domains pfam.tsv --sites sites.csv --seed 7

"###,
        )
        .arg(
            Arg::new("interologs")
                .required(true)
                .index(1)
                .help("Interologs, CSV"),
        )
        .arg(
            Arg::new("interfaces")
                .required(true)
                .index(2)
                .help("Interface residues of organism A, TSV"),
        )
        .arg(
            Arg::new("alignments")
                .required(true)
                .index(3)
                .help("Global alignments, CSV"),
        )
        .arg(
            Arg::new("fasta_a")
                .required(true)
                .index(4)
                .help("Protein sequences of organism A"),
        )
        .arg(
            Arg::new("domains")
                .long("domains")
                .num_args(1)
                .help("Domains of organism A, TSV"),
        )
        .arg(
            Arg::new("sites")
                .long("sites")
                .num_args(1)
                .help("Special sites of organism A, CSV"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .num_args(1)
                .default_value("42")
                .help("Seed of the sequence sampling"),
        )
        .arg(
            Arg::new("every")
                .long("every")
                .value_parser(value_parser!(usize))
                .num_args(1)
                .default_value("30")
                .help("Sample one in this many sequences for the gap pattern model"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .value_parser(value_parser!(usize))
                .num_args(1)
                .default_value("1")
                .help("Number of threads for parallel processing"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// One interolog row with an interface
struct Row {
    fields: Vec<String>,
    a1: String,
    b1: String,
    a2: String,
    b2: String,
    label: u8,
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let sample = SampleParams {
        every: *args.get_one::<usize>("every").unwrap(),
        seed: *args.get_one::<u64>("seed").unwrap(),
    };
    let outfile = args.get_one::<String>("outfile").unwrap();

    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    //----------------------------
    // Loading
    //----------------------------
    let tables = Tables::new()?;
    let interfaces = InterfaceTable::load(args.get_one::<String>("interfaces").unwrap())?;
    let alignments = read_alignments(args.get_one::<String>("alignments").unwrap())?;
    let seqs_a = load_fasta(args.get_one::<String>("fasta_a").unwrap())?;
    let domains = match args.get_one::<String>("domains") {
        Some(file) => Domains::load(file)?,
        None => Domains::new(),
    };
    let sites = match args.get_one::<String>("sites") {
        Some(file) => SpecialSites::load(file)?,
        None => SpecialSites::new(),
    };

    let mut reader = ppit::table_reader(args.get_one::<String>("interologs").unwrap(), b',')?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| -> anyhow::Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PpiError::Format(format!("interologs lack column {}", name)).into())
    };
    let (i_a1, i_b1, i_a2, i_b2, i_label) = (
        column("A1")?,
        column("B1")?,
        column("A2")?,
        column("B2")?,
        column("Label")?,
    );

    let mut rows: Vec<Row> = vec![];
    let mut n_interologs = 0;
    for result in reader.records() {
        let record = result?;
        n_interologs += 1;

        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        let (a1, a2) = (field(i_a1), field(i_a2));
        if !interfaces.contains(&a1, &a2) {
            continue;
        }
        let label = field(i_label)
            .parse::<u8>()
            .map_err(|_| PpiError::Format(format!("bad label in row of {} and {}", a1, a2)))?;
        let fields = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != i_label)
            .map(|(_, f)| f.to_string())
            .collect();
        rows.push(Row {
            fields,
            b1: field(i_b1),
            b2: field(i_b2),
            a1,
            a2,
            label,
        });
    }
    tracing::info!(
        "{} of {} interologs have interfaces",
        rows.len(),
        n_interologs
    );

    //----------------------------
    // Operating
    //----------------------------
    let sequences: Vec<&[u8]> = seqs_a.values().map(|s| s.as_slice()).collect();
    let model = GapPatternModel::build(&sequences, &sample)?;

    let features: Vec<(&Row, InterologFeatures)> = rows
        .par_iter()
        .filter_map(|row| {
            let interface = interfaces.get(&row.a1, &row.a2)?;
            let (aln1, aln2) = match (
                alignments.get(&(row.a1.clone(), row.b1.clone())),
                alignments.get(&(row.a2.clone(), row.b2.clone())),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    tracing::warn!(
                        "No alignment of {}/{} or {}/{}, skipped",
                        row.a1,
                        row.b1,
                        row.a2,
                        row.b2
                    );
                    return None;
                }
            };

            let side = |indices: &str, aln: &GlobalAlignment| {
                InterfaceFeatures::compute(
                    &parse_zipped(indices),
                    aln,
                    &row.a1,
                    &domains,
                    &sites,
                    &model,
                    &tables,
                )
            };
            Some((
                row,
                InterologFeatures {
                    side1: side(&interface.indices1, aln1),
                    side2: side(&interface.indices2, aln2),
                    source: interface.source.clone(),
                    label: row.label,
                },
            ))
        })
        .collect();
    tracing::info!("Finished interface features of {} interologs", features.len());

    //----------------------------
    // Output
    //----------------------------
    let mut writer = ppit::table_writer(outfile)?;
    let mut out_headers: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != i_label)
        .map(|(_, h)| h.to_string())
        .collect();
    out_headers.extend(InterologFeatures::headers());
    out_headers.push("Label".to_string());
    writer.write_record(&out_headers)?;

    for (row, f) in &features {
        let mut values = row.fields.clone();
        values.extend(f.values());
        values.push(f.label.to_string());
        writer.write_record(&values)?;
    }
    writer.flush()?;

    Ok(())
}

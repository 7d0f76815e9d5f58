use clap::*;
use ppit::libs::ortholog::{filter_orthologs, read_orthologs, write_orthologs, OrthologFilter};
use ppit::libs::store::load_fasta;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("orthologs")
        .about("Filters similarity-search hits into ortholog pairs")
        .after_help(
            r###"
Reads protein hits of organism A against organism B and keeps the pairs
whose aligned region covers enough of both proteins.

Input columns (CSV, with header):
    A,B,E-Value,Alignment_Length,Start_A,End_A,Start_B,End_B,
    Bitscore,Identical_Count,Positive_Count,Mismatch_Count,Gap

Output adds Coverage_A and Coverage_B.

Notes:
* Coverage = (End - Start) / sequence length, rounded to 3 decimals
* A pair is kept when both coverages reach --coverage
* Repeated (A, B) hits keep the first one
* Proteins with ambiguous residues (B, U, X, Z) are skipped unless --ambiguous
* FASTA files may be gzipped

Examples:
1. Default threshold 0.5:
   ppit orthologs hits.csv human.fa yeast.fa -o orthologs.csv

2. Stricter coverage:
   ppit orthologs hits.csv human.fa yeast.fa --coverage 0.8

"###,
        )
        .arg(
            Arg::new("hits")
                .required(true)
                .index(1)
                .help("Similarity-search hits, CSV"),
        )
        .arg(
            Arg::new("fasta_a")
                .required(true)
                .index(2)
                .help("Protein sequences of organism A"),
        )
        .arg(
            Arg::new("fasta_b")
                .required(true)
                .index(3)
                .help("Protein sequences of organism B"),
        )
        .arg(
            Arg::new("coverage")
                .long("coverage")
                .short('c')
                .value_parser(value_parser!(f64))
                .num_args(1)
                .default_value("0.5")
                .help("Minimal coverage on both proteins"),
        )
        .arg(
            Arg::new("ambiguous")
                .long("ambiguous")
                .action(ArgAction::SetTrue)
                .help("Keep proteins containing ambiguous residues"),
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

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let filter = OrthologFilter {
        threshold: *args.get_one::<f64>("coverage").unwrap(),
        keep_ambiguous: args.get_flag("ambiguous"),
    };
    let outfile = args.get_one::<String>("outfile").unwrap();

    //----------------------------
    // Loading
    //----------------------------
    let hits = read_orthologs(args.get_one::<String>("hits").unwrap())?;
    let seqs_a = load_fasta(args.get_one::<String>("fasta_a").unwrap())?;
    let seqs_b = load_fasta(args.get_one::<String>("fasta_b").unwrap())?;

    //----------------------------
    // Operating
    //----------------------------
    let n_hits = hits.len();
    let orthologs = filter_orthologs(hits, &seqs_a, &seqs_b, &filter)?;
    tracing::info!("Filtered orthologs: {} of {} hits", orthologs.len(), n_hits);

    //----------------------------
    // Output
    //----------------------------
    write_orthologs(&orthologs, outfile)?;

    Ok(())
}

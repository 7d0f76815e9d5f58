use clap::*;
use ppit::libs::align::{global_alignment, write_alignments, AlignParams, GlobalAlignment};
use ppit::libs::ortholog::read_orthologs;
use ppit::libs::store::{load_fasta, InterfaceTable};
use ppit::libs::tables::SubstitutionMatrix;
use rayon::prelude::*;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("align")
        .about("Best global alignment of each ortholog pair")
        .after_help(
            r###"
Aligns every ortholog pair globally with affine gaps and keeps one of the
score-optimal alignments.

Output columns (CSV):
    A,B,Alignment1,Alignment2,Score,Length

Notes:
* All co-optimal alignments are enumerated, up to --max-alignments
* The kept alignment has the most identical residues; ties go to the most
  identical interface residues (--interfaces), then to the
  lexicographically smallest alignment text
* Length spans the first to the last column without a gap
* End gaps are penalised like internal gaps
* --matrix takes `blosum62` or a matrix file in NCBI format
* Pairs without a sequence or an alignment are skipped with a warning

Examples:
1. Default parameters:
   ppit align orthologs.csv human.fa yeast.fa -o alignments.csv

2. Prefer alignments conserving interface residues, 4 threads:
   ppit align orthologs.csv human.fa yeast.fa --interfaces human.tsv -p 4

"###,
        )
        .arg(
            Arg::new("orthologs")
                .required(true)
                .index(1)
                .help("Ortholog pairs, CSV"),
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
            Arg::new("interfaces")
                .long("interfaces")
                .num_args(1)
                .help("Interface residues of organism A, TSV"),
        )
        .arg(
            Arg::new("matrix")
                .long("matrix")
                .num_args(1)
                .default_value("blosum62")
                .help("Substitution matrix"),
        )
        .arg(
            Arg::new("gap_open")
                .long("gap-open")
                .value_parser(value_parser!(f64))
                .default_value("-10")
                .allow_negative_numbers(true)
                .help("Gap opening penalty"),
        )
        .arg(
            Arg::new("gap_extend")
                .long("gap-extend")
                .value_parser(value_parser!(f64))
                .default_value("-0.5")
                .allow_negative_numbers(true)
                .help("Gap extension penalty"),
        )
        .arg(
            Arg::new("max_alignments")
                .long("max-alignments")
                .value_parser(value_parser!(usize))
                .default_value("1000")
                .help("Maximal number of co-optimal alignments to consider"),
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

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let params = AlignParams {
        gap_open: *args.get_one::<f64>("gap_open").unwrap(),
        gap_extend: *args.get_one::<f64>("gap_extend").unwrap(),
        max_alignments: *args.get_one::<usize>("max_alignments").unwrap(),
    };
    let outfile = args.get_one::<String>("outfile").unwrap();

    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    //----------------------------
    // Loading
    //----------------------------
    let matrix = SubstitutionMatrix::from_name(args.get_one::<String>("matrix").unwrap())?;
    let orthologs = read_orthologs(args.get_one::<String>("orthologs").unwrap())?;
    let seqs_a = load_fasta(args.get_one::<String>("fasta_a").unwrap())?;
    let seqs_b = load_fasta(args.get_one::<String>("fasta_b").unwrap())?;
    let interfaces = match args.get_one::<String>("interfaces") {
        Some(file) => Some(InterfaceTable::load(file)?),
        None => None,
    };

    //----------------------------
    // Operating
    //----------------------------
    tracing::info!(
        "Global alignments of {} ortholog pairs with {}",
        orthologs.len(),
        matrix.name()
    );
    let alignments: Vec<GlobalAlignment> = orthologs
        .par_iter()
        .filter_map(|o| {
            let (seq_a, seq_b) = match (seqs_a.get(&o.a), seqs_b.get(&o.b)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    tracing::warn!("Sequence of {} or {} not found, skipped", o.a, o.b);
                    return None;
                }
            };
            let priority = interfaces
                .as_ref()
                .map(|t| t.residues(&o.a))
                .unwrap_or_default();

            match global_alignment(&o.a, &o.b, seq_a, seq_b, &matrix, &params, &priority) {
                Ok(aln) => Some(aln),
                Err(e) => {
                    tracing::warn!("{}, skipped", e);
                    None
                }
            }
        })
        .collect();
    tracing::info!("Finished {} global alignments", alignments.len());

    //----------------------------
    // Output
    //----------------------------
    write_alignments(&alignments, outfile)?;

    Ok(())
}

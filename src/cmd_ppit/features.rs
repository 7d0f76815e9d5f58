use clap::*;
use ppit::libs::align::read_alignments;
use ppit::libs::features::OrthologFeatures;
use ppit::libs::ortholog::read_orthologs;
use ppit::libs::store::{Domains, SpecialSites};
use ppit::libs::tables::Tables;
use rayon::prelude::*;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("features")
        .about("Global, domain and special-site divergence of orthologs")
        .after_help(
            r###"
Compares each ortholog pair along its global alignment, over the whole
alignment, over the domain of protein A and over its special sites.

Output columns (CSV):
    A,B,<ortholog statistics>,Global_Score,Global_Length,
    Global_*,Domain_*,Domain_Length,Special-Sites_*,Special-Sites_Length

Each region gets the Matching/Mismatching/Gap counts and the BLOSUM
substitution score against the expected score.

Notes:
* --domains is a TSV with `seq id`, `envelope start` and `envelope end`
* --sites is a CSV with `Entry` and any number of residue-list columns
* Proteins without annotations give zeros
* Orthologs without an alignment are skipped with a warning

Examples:
1. Whole alignments only:
   ppit features orthologs.csv alignments.csv

2. With annotations:
   ppit features orthologs.csv alignments.csv --domains pfam.tsv --sites sites.csv -o features.csv

"###,
        )
        .arg(
            Arg::new("orthologs")
                .required(true)
                .index(1)
                .help("Ortholog pairs, CSV"),
        )
        .arg(
            Arg::new("alignments")
                .required(true)
                .index(2)
                .help("Global alignments, CSV"),
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
    let outfile = args.get_one::<String>("outfile").unwrap();

    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    //----------------------------
    // Loading
    //----------------------------
    let tables = Tables::new()?;
    let orthologs = read_orthologs(args.get_one::<String>("orthologs").unwrap())?;
    let alignments = read_alignments(args.get_one::<String>("alignments").unwrap())?;
    let domains = match args.get_one::<String>("domains") {
        Some(file) => Domains::load(file)?,
        None => Domains::new(),
    };
    let sites = match args.get_one::<String>("sites") {
        Some(file) => SpecialSites::load(file)?,
        None => SpecialSites::new(),
    };

    //----------------------------
    // Operating
    //----------------------------
    tracing::info!("Features of {} ortholog pairs", orthologs.len());
    let features: Vec<OrthologFeatures> = orthologs
        .par_iter()
        .filter_map(|o| match alignments.get(&(o.a.clone(), o.b.clone())) {
            Some(aln) => Some(OrthologFeatures::compute(
                o, aln, &domains, &sites, &tables,
            )),
            None => {
                tracing::warn!("No alignment of {} and {}, skipped", o.a, o.b);
                None
            }
        })
        .collect();
    tracing::info!("Finished features of {} pairs", features.len());

    //----------------------------
    // Output
    //----------------------------
    let mut writer = ppit::table_writer(outfile)?;
    writer.write_record(OrthologFeatures::headers())?;
    for f in &features {
        writer.write_record(f.values())?;
    }
    writer.flush()?;

    Ok(())
}

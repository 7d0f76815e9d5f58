use clap::*;
use ppit::libs::interolog;
use ppit::libs::ortholog::read_ortholog_table;
use ppit::libs::store::InteractionGraph;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("interologs")
        .about("Enumerate and label interologs from both interactomes")
        .after_help(
            r###"
Pairs up every two ortholog rows. A pair is an interolog when its two
A proteins interact in organism A; it is labelled 1 when its two B
proteins also interact in organism B, 0 otherwise.

Output columns (CSV):
    A1,B1,A2,B2,<ortholog columns>_Pair_1,<ortholog columns>_Pair_2,Label

Every column of the ortholog table besides A and B is carried through, so
a `ppit features` table gives interologs with both sides' features.

Notes:
* Interactomes are TSV files with `Uniprot_A` and `Uniprot_B` columns
* Every unordered pair of rows is examined once: n orthologs give
  n*(n-1)/2 candidates
* Rows are computed in parallel batches and written as they arrive
* The label counts are reported on stderr

Examples:
1. Default:
   ppit interologs orthologs.csv human_hint.tsv yeast_hint.tsv -o interologs.csv

2. 8 threads:
   ppit interologs orthologs.csv human_hint.tsv yeast_hint.tsv -p 8

"###,
        )
        .arg(
            Arg::new("orthologs")
                .required(true)
                .index(1)
                .help("Ortholog pairs or ortholog features, CSV"),
        )
        .arg(
            Arg::new("interactome_a")
                .required(true)
                .index(2)
                .help("Interactome of organism A, TSV"),
        )
        .arg(
            Arg::new("interactome_b")
                .required(true)
                .index(3)
                .help("Interactome of organism B, TSV"),
        )
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_parser(value_parser!(usize))
                .num_args(1)
                .default_value("256")
                .help("Ortholog rows per batch"),
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
    let opt_rows = *args.get_one::<usize>("rows").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();

    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    //----------------------------
    // Loading
    //----------------------------
    let table = read_ortholog_table(args.get_one::<String>("orthologs").unwrap())?;
    let orthologs = &table.rows;
    let graph_a = InteractionGraph::load(args.get_one::<String>("interactome_a").unwrap())?;
    let graph_b = InteractionGraph::load(args.get_one::<String>("interactome_b").unwrap())?;

    //----------------------------
    // Operating
    //----------------------------
    tracing::info!(
        "Interologs among {} candidates",
        interolog::pair_count(orthologs.len())
    );

    let mut writer = ppit::table_writer(outfile)?;
    writer.write_record(interolog::headers(&table))?;
    let summary = interolog::stream(orthologs, &graph_a, &graph_b, opt_rows, |it| {
        writer.write_record(interolog::values(orthologs, it))?;
        Ok(())
    })?;
    writer.flush()?;

    tracing::info!("{}", summary);

    Ok(())
}

extern crate clap;
use clap::*;
use tracing_subscriber::EnvFilter;

mod cmd_ppit;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("ppit=info"))?,
        )
        .init();

    let app = Command::new("ppit")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`ppit` - Protein-Protein Interaction Transfer via interologs")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_ppit::orthologs::make_subcommand())
        .subcommand(cmd_ppit::align::make_subcommand())
        .subcommand(cmd_ppit::features::make_subcommand())
        .subcommand(cmd_ppit::interologs::make_subcommand())
        .subcommand(cmd_ppit::interface::make_subcommand())
        .subcommand(cmd_ppit::range::make_subcommand())
        .after_help(
            r###"Pipeline, organism A to organism B:

* orthologs  - Filter similarity-search hits by coverage
* align      - Best global alignment of each ortholog pair
* features   - Global, domain and special-site divergence of orthologs
* interologs - Enumerate and label interologs from both interactomes
* interface  - Interface residue divergence of interologs

* Utilities:
    * range - Decode and encode residue index lists

Diagnostics go to stderr; set RUST_LOG (e.g. `ppit=debug`) to adjust.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("orthologs", sub_matches)) => cmd_ppit::orthologs::execute(sub_matches),
        Some(("align", sub_matches)) => cmd_ppit::align::execute(sub_matches),
        Some(("features", sub_matches)) => cmd_ppit::features::execute(sub_matches),
        Some(("interologs", sub_matches)) => cmd_ppit::interologs::execute(sub_matches),
        Some(("interface", sub_matches)) => cmd_ppit::interface::execute(sub_matches),
        Some(("range", sub_matches)) => cmd_ppit::range::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}

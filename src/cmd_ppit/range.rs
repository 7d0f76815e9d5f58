use clap::*;
use ppit::libs::gap::{extract, shift_for};
use ppit::libs::indices::{decode, decrement, encode};
use itertools::Itertools;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("range")
        .about("Decode and encode residue index lists")
        .after_help(
            r###"
Reads compressed residue index lists, such as `[1,2,8,7,3,4,5-8,15-17]`,
and writes their canonical form, one line per list.

With --decrement or --shift, a second column lists the indices, comma
separated. With --shift, a third column holds the residues at the shifted
columns.

Notes:
* Whitespace is ignored and brackets are optional
* Malformed entries are skipped with a warning
* --decrement converts 1-based positions to 0-based; 0 is dropped
* --shift maps the indices onto a gapped sequence, e.g. `--A-B--CDE-`;
  indices beyond its end are dropped with a warning

Examples:
1. Canonical form:
   ppit range "[3,1,2,5]"

2. 1-based annotations on a gapped track:
   ppit range "[1-3]" "[7]" --decrement --shift "MK--VLAG"

"###,
        )
        .arg(
            Arg::new("ranges")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Residue index lists"),
        )
        .arg(
            Arg::new("decrement")
                .long("decrement")
                .action(ArgAction::SetTrue)
                .help("Convert 1-based positions to 0-based"),
        )
        .arg(
            Arg::new("shift")
                .long("shift")
                .num_args(1)
                .allow_hyphen_values(true)
                .help("Gapped sequence to shift the indices onto"),
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
    let is_decrement = args.get_flag("decrement");
    let opt_shift = args.get_one::<String>("shift").map(|s| s.as_bytes());
    let mut writer = ppit::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Operating
    //----------------------------
    for text in args.get_many::<String>("ranges").unwrap() {
        let set = decode(text);
        let mut line = encode(&set);

        if is_decrement || opt_shift.is_some() {
            let mut indices = if is_decrement {
                decrement(set.indices())
            } else {
                set.into_vec()
            };
            if let Some(gapped) = opt_shift {
                indices = shift_for(text, gapped, &indices);
            }

            line.push('\t');
            line.push_str(&indices.iter().join(","));

            if let Some(gapped) = opt_shift {
                line.push('\t');
                line.push_str(&String::from_utf8_lossy(&extract(gapped, &indices)));
            }
        }

        //----------------------------
        // Output
        //----------------------------
        writer.write_fmt(format_args!("{}\n", line))?;
    }

    Ok(())
}

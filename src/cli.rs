use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, arg, command, value_parser};

fn generation_args(cmd: Command) -> Command {
    cmd.arg(arg!(--tags "Wrap actors, activities and conditions in tags"))
        .arg(
            arg!(--lexicon <FILE> "JSON word table replacing the built-in English one")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--passes <N> "Maximum number of reference resolution passes")
                .value_parser(value_parser!(usize))
                .default_value("20"),
        )
}

pub(crate) fn cli() -> ArgMatches {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More logging, repeat for more"),
        )
        .subcommand(generation_args(
            command!("rules")
                .about("Generate rules and vocabulary for one shape tree")
                .arg(arg!(-i --input <INPUT> "Raw input (inline)"))
                .arg(
                    arg!(-f --file <INPUT> "Shape tree JSON file")
                        .value_parser(value_parser!(PathBuf)),
                )
                .group(
                    ArgGroup::new("input-source")
                        .args(["input", "file"])
                        .required(true)
                        .multiple(false),
                ),
        ))
        .subcommand(generation_args(
            command!("batch")
                .about("Generate rules for every model record of a JSON-lines file")
                .arg(
                    arg!(-f --file <INPUT> "Model records, one JSON object per line")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    arg!(-o --output <OUTPUT> "Output file, standard output if omitted")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(arg!(--strict "Reject models using unsupported stencils")),
        ))
        .get_matches()
}

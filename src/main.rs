extern crate clap;

use std::fs::File;
use std::io::prelude::*;
use std::io::stdin;
use std::path::Path;

use clap::{App, Arg};

use automata::machine::MachineCase;
use automata::regex::Pattern;

fn main() {
    let matches = App::new("Automata workbench")
        .version("0.1")
        .about(
            "Match the five-operator regular-expression language by compiling \
             it to an NFA, or run machine descriptions from a JSON file.",
        )
        .arg(
            Arg::with_name("pattern")
                .help(
                    "The pattern to match: literals, concatenation, `|` and `*` \
                     only.",
                )
                .required_unless("machine-file")
                .conflicts_with("machine-file"),
        )
        .arg(
            Arg::with_name("input")
                .help("Input strings to test. If none is specified, STDIN lines are used.")
                .multiple(true),
        )
        .arg(
            Arg::with_name("machine-file")
                .long("machine-file")
                .help("Run every machine case from a file in JSON syntax.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("count")
                .short("c")
                .long("count")
                .help("Display the number of accepted inputs instead."),
        )
        .arg(
            Arg::with_name("dot")
                .long("dot")
                .takes_value(true)
                .help("Write the compiled automaton to a file in Graphviz DOT syntax."),
        )
        .get_matches();

    if let Some(filename) = matches.value_of("machine-file") {
        let cases = MachineCase::read_from_file(Path::new(filename))
            .expect("Could not read the machine file.");

        print!("[");
        let mut first = true;
        for case in cases {
            println!("{}", if first { "" } else { "," });
            print!("{}", serde_json::to_string_pretty(&case.run()).unwrap());
            first = false;
        }
        println!("\n]");
        return;
    }

    let pattern_str = matches.value_of("pattern").unwrap();
    let pattern = match Pattern::parse(pattern_str) {
        Ok(pattern) => pattern,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    let design = pattern.to_nfa_design();

    if let Some(filename) = matches.value_of("dot") {
        let file = File::create(filename).expect("Could not create the dotfile.");
        design.to_dot(file).expect("Could not write the dotfile.");
    }

    let inputs: Vec<String> = match matches.values_of("input") {
        Some(values) => values.map(str::to_string).collect(),
        None => {
            let mut text = String::new();
            stdin()
                .read_to_string(&mut text)
                .expect("Could not read STDIN.");
            text.lines().map(str::to_string).collect()
        }
    };

    if matches.is_present("count") {
        let count = inputs.iter().filter(|input| design.accepts(input)).count();
        println!("{}", count);
    } else {
        for input in &inputs {
            println!("{}: {}", input, design.accepts(input));
        }
    }
}

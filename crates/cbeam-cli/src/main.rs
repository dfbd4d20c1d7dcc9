use std::process::ExitCode;

use cbeam_io::{ModalReport, load_deck, write_report};

fn usage() {
    eprintln!("usage: cbeam-cli modes <deck.json> [report.json]");
}

fn print_summary(report: &ModalReport) {
    if let Some(name) = &report.name {
        println!("name: {name}");
    }
    println!("element: {}", report.element);
    println!("elements: {}", report.num_elements);
    println!("dofs: {}", report.num_dofs);
    println!("reduced_dofs: {}", report.num_reduced_dofs);
    println!("modes: {}", report.modes.len());
    print!("{}", report.frequency_table());
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if !(3..=4).contains(&args.len()) || args[1] != "modes" {
        usage();
        return ExitCode::from(2);
    }

    let deck = match load_deck(&args[2]) {
        Ok(deck) => deck,
        Err(err) => {
            eprintln!("deck error: {err}");
            return ExitCode::from(1);
        }
    };
    let model = match deck.run() {
        Ok(model) => model,
        Err(err) => {
            eprintln!("solver error: {err}");
            return ExitCode::from(1);
        }
    };

    let report = ModalReport::from_model(deck.name.as_deref(), &model);
    print_summary(&report);

    if let Some(path) = args.get(3) {
        if let Err(err) = write_report(path, &report) {
            eprintln!("write error: {err}");
            return ExitCode::from(1);
        }
        println!("report: {path}");
    }
    ExitCode::SUCCESS
}

//! lanyard - batch name-badge generator

use std::process::ExitCode;

use clap::Parser;

use lanyard::{Document, LayoutOptions, Roster, layout_cards, read_docx, write_docx};

#[derive(Parser)]
#[command(name = "lanyard")]
#[command(version, about = "Printable name-badge generator", long_about = None)]
#[command(after_help = "EXAMPLES:
    lanyard names.txt badges.docx -e \"2024 Retreat\" -t template.docx
    lanyard names.txt badges.docx --event \"Open House\" --style Badge

The roster is a tab-delimited UTF-8 file whose first row is a header:
each following row is name<TAB>affiliation.")]
struct Cli {
    /// Tab-delimited roster file (header row, then name/affiliation pairs)
    #[arg(value_name = "ROSTER")]
    roster: String,

    /// Output .docx path
    #[arg(value_name = "OUTPUT")]
    output: String,

    /// Event title shown on every badge
    #[arg(short, long)]
    event: String,

    /// Table style applied to badge tables
    #[arg(short, long, default_value = "Badge")]
    style: String,

    /// Template document supplying styles and page setup
    #[arg(short, long)]
    template: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> lanyard::Result<()> {
    let roster = Roster::from_path(&cli.roster)?;

    let mut doc = match &cli.template {
        Some(path) => read_docx(path)?,
        None => {
            let mut doc = Document::new();
            doc.define_table_style(&cli.style);
            doc
        }
    };

    layout_cards(&mut doc, &roster, &cli.event, &cli.style)?;
    write_docx(&doc, &cli.output)?;

    if !cli.quiet {
        let pages = roster.len().div_ceil(LayoutOptions::default().cards_per_page);
        println!(
            "Wrote {} badges ({} pages) to {}",
            roster.len(),
            pages,
            cli.output
        );
    }

    Ok(())
}

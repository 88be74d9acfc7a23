//! pdfmarks - PDF bookmark editor

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use pdfmarks::{
    EditError, Error, MetadataDocument, Mutation, NodeId, NodePath, Outline, Pdftk, Session,
};

#[derive(Parser)]
#[command(name = "pdfmarks")]
#[command(version, about = "Edit PDF bookmarks via pdftk", long_about = None)]
#[command(after_help = "Bookmarks are addressed by 1-based dotted paths: `2.1` is the first
child of the second top-level bookmark, `root` is the top level itself.

EXAMPLES:
    pdfmarks list book.pdf                       Show the outline
    pdfmarks rename book.pdf 2.1 'Background'    Rename a bookmark in place
    pdfmarks move book.pdf 3 root 0 -o out.pdf   Move bookmark 3 to the top
    pdfmarks dump book.pdf > marks.txt           Export metadata for editing
    pdfmarks import book.pdf marks.txt           Apply an edited export")]
struct Cli {
    /// pdftk executable
    #[arg(long, global = true, env = "PDFTK", default_value = pdfmarks::pdftk::DEFAULT_PROGRAM)]
    pdftk: PathBuf,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bookmark outline
    List {
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// Print the metadata stream that would be written back
    Dump {
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Insert a bookmark under PARENT at INDEX (0-based)
    Add {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "PARENT")]
        parent: NodePath,
        #[arg(value_name = "INDEX")]
        index: usize,
        #[arg(long, default_value = pdfmarks::outline::edit::PLACEHOLDER_TITLE)]
        title: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Change a bookmark's title
    Rename {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "NODE")]
        node: NodePath,
        #[arg(value_name = "TITLE")]
        title: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Change a bookmark's target page
    SetPage {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "NODE")]
        node: NodePath,
        #[arg(value_name = "PAGE")]
        page: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Delete a bookmark and everything nested under it
    Delete {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "NODE")]
        node: NodePath,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Move a bookmark to INDEX (0-based) under PARENT
    Move {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "NODE")]
        node: NodePath,
        #[arg(value_name = "PARENT")]
        parent: NodePath,
        #[arg(value_name = "INDEX")]
        index: usize,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Replace all bookmarks with those of an edited dump file
    Import {
        #[arg(value_name = "PDF")]
        input: PathBuf,
        #[arg(value_name = "FILE")]
        metadata: PathBuf,
        #[command(flatten)]
        save: SaveArgs,
    },
}

#[derive(clap::Args)]
struct SaveArgs {
    /// Write to this file instead of updating the input in place
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ListEntry {
    path: String,
    level: usize,
    page: u32,
    title: String,
}

fn init_tracing(cli: &Cli) {
    // --quiet always wins; RUST_LOG only applies together with --verbose.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let pdftk = Pdftk::new(&cli.pdftk);
    match run(&pdftk, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(pdftk: &Pdftk, command: Command) -> Result<(), Error> {
    match command {
        Command::List { input, json } => list(pdftk, &input, json),
        Command::Dump { input } => {
            let session = Session::open(pdftk, input)?;
            print!("{}", session.render());
            Ok(())
        }
        Command::Add {
            input,
            parent,
            index,
            title,
            page,
            save,
        } => edit(pdftk, input, save, |outline| {
            let parent = resolve(outline, &parent)?;
            outline.insert_with(parent, index, title, page)
        }),
        Command::Rename {
            input,
            node,
            title,
            save,
        } => edit(pdftk, input, save, |outline| {
            let node = resolve(outline, &node)?;
            outline.rename(node, title)
        }),
        Command::SetPage {
            input,
            node,
            page,
            save,
        } => edit(pdftk, input, save, |outline| {
            let node = resolve(outline, &node)?;
            outline.set_page(node, &page)
        }),
        Command::Delete { input, node, save } => edit(pdftk, input, save, |outline| {
            let node = resolve(outline, &node)?;
            outline.delete(node)
        }),
        Command::Move {
            input,
            node,
            parent,
            index,
            save,
        } => edit(pdftk, input, save, |outline| {
            let node = resolve(outline, &node)?;
            let parent = resolve(outline, &parent)?;
            outline.move_node(node, parent, index)
        }),
        Command::Import {
            input,
            metadata,
            save,
        } => {
            let text = std::fs::read_to_string(&metadata)?;
            let edited = MetadataDocument::parse(&text)?;

            let mut session = Session::open(pdftk, input)?;
            session.replace_outline(Outline::from_records(&edited.bookmarks));
            warn_out_of_range(&session);
            finish(pdftk, &mut session, save)
        }
    }
}

fn list(pdftk: &Pdftk, input: &Path, json: bool) -> Result<(), Error> {
    let session = Session::open(pdftk, input)?;
    let outline = session.outline();

    let entries: Vec<ListEntry> = outline
        .iter_dfs()
        .filter_map(|(id, depth)| {
            let node = outline.node(id)?;
            Some(ListEntry {
                path: outline.path_of(id)?.to_string(),
                level: depth,
                page: node.page,
                title: node.title.clone(),
            })
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&entries).map_err(std::io::Error::from)?;
        println!("{text}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("(no bookmarks)");
    }
    let width = entries.iter().map(|e| e.path.len()).max().unwrap_or(0);
    for entry in &entries {
        println!(
            "{:width$}  {}{}  (p. {})",
            entry.path,
            "  ".repeat(entry.level - 1),
            entry.title,
            entry.page,
        );
    }
    warn_out_of_range(&session);
    Ok(())
}

fn edit<F>(pdftk: &Pdftk, input: PathBuf, save: SaveArgs, f: F) -> Result<(), Error>
where
    F: FnOnce(&mut Outline) -> Result<Mutation, EditError>,
{
    let mut session = Session::open(pdftk, input)?;
    let mutation = session.apply(f)?;
    if let Some(path) = session.outline().path_of(mutation.node) {
        eprintln!("{} {}", mutation.kind, path);
    } else {
        eprintln!("{}", mutation.kind);
    }
    warn_out_of_range(&session);
    finish(pdftk, &mut session, save)
}

fn finish(pdftk: &Pdftk, session: &mut Session, save: SaveArgs) -> Result<(), Error> {
    match save.output {
        Some(output) => session.save_as(pdftk, &output),
        None => session.save(pdftk),
    }
}

fn resolve(outline: &Outline, path: &NodePath) -> Result<NodeId, EditError> {
    outline
        .resolve(path)
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))
}

/// Pages past the end are written as-is; pdftk decides what to do with them.
fn warn_out_of_range(session: &Session) {
    let Some(pages) = session.original().number_of_pages() else {
        return;
    };
    let outline = session.outline();
    for (id, _) in outline.iter_dfs() {
        if let Some(node) = outline.node(id)
            && node.page > pages
            && let Some(path) = outline.path_of(id)
        {
            eprintln!(
                "warning: bookmark {path} ({}) targets page {} of {pages}",
                node.title, node.page
            );
        }
    }
}

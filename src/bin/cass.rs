//! Command-line interface for cass-parser
//! This binary inspects CASS files: extracts contextual features, reports
//! corpus statistics, and validates record syntax.
//!
//! Usage:
//!   cass features `<path>` [mode flags] [--lossy]  - Extract features as JSON lines
//!   cass stats `<path>`...                       - Report per-file tree statistics
//!   cass check `<path>`                          - Report every malformed record
use clap::{Arg, ArgAction, ArgMatches, Command};

use cass_parser::cass::{Config, Loader, Tree};

fn mode_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("annot-mode")
            .long("annot-mode")
            .help("Annotation labels: 0=plain, 1=full, 2=selective")
            .default_value("0"),
    )
    .arg(
        Arg::new("compound-mode")
            .long("compound-mode")
            .help("Compound statements: 0=keep, 1=drop, 2=braces")
            .default_value("0"),
    )
    .arg(
        Arg::new("gvar-mode")
            .long("gvar-mode")
            .help("Global variables: 0=keep, 1=drop, 2=$GVAR, 3=$VAR")
            .default_value("0"),
    )
    .arg(
        Arg::new("gfun-mode")
            .long("gfun-mode")
            .help("Global functions: 0=keep, 1=drop, 2=$GFUN, 3=variable")
            .default_value("0"),
    )
    .arg(
        Arg::new("fsig-mode")
            .long("fsig-mode")
            .help("Function signatures: 0=ignore, 1=emit")
            .default_value("0"),
    )
}

fn build_cli() -> Command {
    Command::new("cass")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting CASS flattened-tree files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            mode_args(
                Command::new("features")
                    .about("Extract contextual features, one JSON array per tree")
                    .arg(
                        Arg::new("path")
                            .help("Path to the CASS file")
                            .required(true)
                            .index(1),
                    )
                    .arg(
                        Arg::new("lossy")
                            .long("lossy")
                            .help("Skip malformed records instead of aborting")
                            .action(ArgAction::SetTrue),
                    ),
            ),
        )
        .subcommand(
            Command::new("stats")
                .about("Report tree, node, and leaf counts, one JSON object per file")
                .arg(
                    Arg::new("path")
                        .help("Paths to the CASS files")
                        .required(true)
                        .num_args(1..),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate every record, reporting each error with its line number")
                .arg(
                    Arg::new("path")
                        .help("Path to the CASS file")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("features", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let config = parse_config(sub);
            let lossy = sub.get_flag("lossy");
            handle_features_command(path, config, lossy);
        }
        Some(("stats", sub)) => {
            let paths: Vec<&String> = sub.get_many::<String>("path").unwrap().collect();
            handle_stats_command(&paths);
        }
        Some(("check", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        _ => unreachable!(),
    }
}

/// Read the five mode flags into a normalization config.
fn parse_config(matches: &ArgMatches) -> Config {
    let mode = |name: &str| -> u8 {
        let raw = matches.get_one::<String>(name).unwrap();
        raw.parse::<u8>().unwrap_or_else(|_| {
            eprintln!("Error: --{} expects a small integer, got '{}'", name, raw);
            std::process::exit(2);
        })
    };

    Config::from_modes(
        mode("annot-mode"),
        mode("compound-mode"),
        mode("gvar-mode"),
        mode("gfun-mode"),
        mode("fsig-mode"),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    })
}

/// Handle the features command
fn handle_features_command(path: &str, config: Config, lossy: bool) {
    let loader = Loader::from_path(path, config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let forest = if lossy {
        let (forest, errors) = loader.forest_lossy();
        for (line, error) in &errors {
            eprintln!("Warning: line {}: {}", line, error);
        }
        forest
    } else {
        loader.forest().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
    };

    for tree in &forest {
        let features = tree.featurize();
        let line = serde_json::to_string(&features).unwrap_or_else(|e| {
            eprintln!("Error serializing features: {}", e);
            std::process::exit(1);
        });
        println!("{}", line);
    }
}

/// Per-file corpus statistics, serialized as one JSON object per file.
#[derive(serde::Serialize)]
struct FileStats {
    path: String,
    trees: usize,
    nodes: usize,
    leaves: usize,
    min_nodes: usize,
    max_nodes: usize,
    mean_nodes: f64,
    median_nodes: f64,
}

fn file_stats(path: &str, forest: &[Tree]) -> FileStats {
    let mut sizes: Vec<usize> = forest.iter().map(Tree::len).collect();
    sizes.sort_unstable();

    let nodes: usize = sizes.iter().sum();
    let leaves: usize = forest.iter().map(Tree::num_leaves).sum();
    let mean = if sizes.is_empty() {
        0.0
    } else {
        nodes as f64 / sizes.len() as f64
    };
    let median = match sizes.len() {
        0 => 0.0,
        n if n % 2 == 1 => sizes[n / 2] as f64,
        n => (sizes[n / 2 - 1] + sizes[n / 2]) as f64 / 2.0,
    };

    FileStats {
        path: path.to_string(),
        trees: sizes.len(),
        nodes,
        leaves,
        min_nodes: sizes.first().copied().unwrap_or(0),
        max_nodes: sizes.last().copied().unwrap_or(0),
        mean_nodes: mean,
        median_nodes: median,
    }
}

/// Handle the stats command
fn handle_stats_command(paths: &[&String]) {
    for path in paths {
        let forest = cass_parser::cass::load_file(path, Config::default()).unwrap_or_else(|e| {
            eprintln!("Error: {}: {}", path, e);
            std::process::exit(1);
        });

        match serde_json::to_string(&file_stats(path, &forest)) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing stats: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Handle the check command
fn handle_check_command(path: &str) {
    let (forest, errors) = Loader::from_path(path, Config::default())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
        .forest_lossy();

    if errors.is_empty() {
        println!("{}: ok ({} trees)", path, forest.len());
    } else {
        for (line, error) in &errors {
            eprintln!("{}:{}: {}", path, line, error);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cass_parser::cass::load_str;

    #[test]
    fn test_stats_accepts_multiple_paths() {
        let matches = build_cli()
            .try_get_matches_from(["cass", "stats", "a.cas", "b.cas", "c.cas"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let paths: Vec<&String> = sub.get_many::<String>("path").unwrap().collect();
        assert_eq!(paths, ["a.cas", "b.cas", "c.cas"]);
    }

    #[test]
    fn test_stats_requires_at_least_one_path() {
        assert!(build_cli()
            .try_get_matches_from(["cass", "stats"])
            .is_err());
    }

    #[test]
    fn test_mode_flags_default_to_zero() {
        let matches = build_cli()
            .try_get_matches_from(["cass", "features", "a.cas"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(parse_config(sub), Config::default());
        assert!(!sub.get_flag("lossy"));
    }

    #[test]
    fn test_file_stats_summarizes_a_forest() {
        // Three trees of 2, 5, and 3 nodes.
        let source = "2\tI#a#x\t1\tN1\n\
                      5\tI#a#x\t2\tI#b#y\t2\tN1\tN2\tN3\n\
                      3\tI#a#x\t2\tN1\tN2\n";
        let forest = load_str(source, Config::default()).unwrap();
        let stats = file_stats("corpus.cas", &forest);

        assert_eq!(stats.path, "corpus.cas");
        assert_eq!(stats.trees, 3);
        assert_eq!(stats.nodes, 10);
        assert_eq!(stats.leaves, 6);
        assert_eq!(stats.min_nodes, 2);
        assert_eq!(stats.max_nodes, 5);
        assert!((stats.mean_nodes - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.median_nodes, 3.0);
    }
}

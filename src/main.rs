//! Influence maximization CLI - run the genetic search from a JSON
//! configuration, an edge-list file, and a ranked seed file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use influmax::evolve::GaEngine;
use influmax::graph::Network;
use influmax::schema::GaConfig;

/// Run description: graph directedness plus the GA parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunConfig {
    /// Treat the edge list as directed arcs instead of undirected edges.
    #[serde(default)]
    directed: bool,
    ga: GaConfig,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 4 {
        eprintln!("Usage: {} <config.json> <edges.txt> <seeds.txt>", args[0]);
        eprintln!();
        eprintln!("Search a network for an influence-maximizing seed set.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Run configuration (print a template with --example)");
        eprintln!("  edges.txt    Whitespace edge list, one 'u v' pair per line");
        eprintln!("  seeds.txt    Ranked candidate node ids, best first");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });
    let config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let edges = load_edges(&args[2]);
    let seeds = load_seeds(&args[3]);

    let network = if config.directed {
        Network::directed(0, &edges)
    } else {
        Network::undirected(0, &edges)
    };

    println!("Influence Maximization");
    println!("======================");
    println!(
        "Network: {} nodes, {} edge lines ({})",
        network.node_count(),
        edges.len(),
        if config.directed {
            "directed"
        } else {
            "undirected"
        }
    );
    println!("Seed pool: {} candidates", seeds.len());
    println!(
        "Model: {:?}, genes: {}, population: {}, generations: {}",
        config.ga.model, config.ga.genes, config.ga.population_size, config.ga.ngen
    );
    println!();

    let start = Instant::now();
    let mut engine = GaEngine::new(network, seeds, config.ga).unwrap_or_else(|e| {
        eprintln!("Error setting up run: {}", e);
        std::process::exit(1);
    });

    println!("{}", engine.population());

    let report = engine
        .run_with_callback(|progress| {
            if progress.generation == 0 {
                return;
            }
            println!("-- Generation {} --", progress.generation);
            println!("{}", progress.summary);
        })
        .unwrap_or_else(|e| {
            eprintln!("Error during evolution: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Final population");
    println!("{}", report.population);

    let mut distinct_bests = report.history.clone();
    distinct_bests.sort_by(f64::total_cmp);
    distinct_bests.dedup();
    println!("Generation-best values: {:?}", distinct_bests);
    println!();

    println!("Best individual");
    println!(
        "{:<24}    {:<10} {:<6} {:<6} {:>8} {:>6}",
        "seeds", "mean", "min", "max", "stddev", "gen"
    );
    println!("{}", report.best);
    println!();
    println!(
        "Stopped after {} generations ({:?}) in {:.2}s",
        report.generations,
        report.stop_reason,
        start.elapsed().as_secs_f32()
    );
}

/// Parse a whitespace edge list; empty lines and `#` comments are skipped.
fn load_edges(path: &str) -> Vec<(usize, usize)> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading edge list {}: {}", path, e);
        std::process::exit(1);
    });

    let mut edges = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let edge = match (parts.next(), parts.next()) {
            (Some(u), Some(v)) => u.parse().ok().zip(v.parse().ok()),
            _ => None,
        };
        match edge {
            Some(pair) => edges.push(pair),
            None => {
                eprintln!("Error in edge list {} line {}: {:?}", path, lineno + 1, line);
                std::process::exit(1);
            }
        }
    }
    edges
}

/// Parse a ranked seed file: whitespace-separated node ids, best first.
fn load_seeds(path: &str) -> Vec<usize> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading seed file {}: {}", path, e);
        std::process::exit(1);
    });

    content
        .split_whitespace()
        .map(|token| {
            token.parse().unwrap_or_else(|_| {
                eprintln!("Error in seed file {}: invalid node id {:?}", path, token);
                std::process::exit(1);
            })
        })
        .collect()
}

fn print_example_config() {
    let config = RunConfig {
        directed: false,
        ga: GaConfig::with_genes(10),
    };
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}

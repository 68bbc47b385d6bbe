use std::fmt;
use std::fs;
use std::path::Path;

use qsynth::io::{qasm, qc, zx_text};
use qsynth::zx::{extraction_loop, OptimizeLevel};
use qsynth::{convert, optimizer};

use crate::app::App;

/// What a processed line did: every command returns one
/// of {done, error, quit, no_op}; only error prevents a subsequent
/// do-file from continuing."
pub enum Outcome {
    Done,
    Error(String),
    Quit,
    NoOp,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Error(msg) => write!(f, "error: {msg}"),
            _ => Ok(()),
        }
    }
}

pub const HELP: &str = "qsynth-i - interactive quantum-circuit synthesis shell

USAGE:
    <root> [args...]

ROOT COMMANDS:
    qcir      manage circuit instances (new, read, write, print, list, checkout, remove, copy)
    zx        manage ZX-diagram instances (new, read, write, simplify, list, checkout, remove, copy)
    tableau   manage tableau-container instances (new, from-qcir, to-qcir, optimize, list, checkout, remove, copy)
    extract   configure and run ZX extraction into a fresh qcir
    tensor    compare two qcir instances for equivalence
    device    (interface only, out of scope)
    duostra   (interface only, out of scope)
    argparse  (interface only, out of scope)
    help      show this reference
    quit      exit the shell

Every root command accepts -h/--help for per-command usage.
";

fn from_str_error<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

fn guess_format(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("qc") => "qc",
        Some("zx") => "zx",
        _ => "qasm",
    }
}

/// Dispatch one whitespace-tokenized line against `app`'s state.
pub fn process(app: &mut App, line: &str) -> Outcome {
    let mut tokens = line.split_whitespace();
    let root = match tokens.next() {
        Some(t) => t,
        None => return Outcome::NoOp,
    };
    let rest: Vec<&str> = tokens.collect();

    let result = match root {
        "help" | "h" | "?" => {
            println!("{HELP}");
            return Outcome::Done;
        }
        "quit" | "exit" | "q" => return Outcome::Quit,
        "qcir" => qcir(app, &rest),
        "zx" => zx(app, &rest),
        "tableau" => tableau(app, &rest),
        "extract" => extract(app, &rest),
        "tensor" => tensor(app, &rest),
        "device" | "duostra" | "argparse" => {
            println!("{root}: interface only, not implemented in this build\n");
            return Outcome::NoOp;
        }
        other => Err(format!("unknown root command {other:?}")),
    };

    match result {
        Ok(()) => Outcome::Done,
        Err(msg) => Outcome::Error(msg),
    }
}

fn want_help(args: &[&str]) -> bool {
    args.first().map(|a| *a == "-h" || *a == "--help").unwrap_or(false)
}

fn qcir(app: &mut App, args: &[&str]) -> Result<(), String> {
    if want_help(args) {
        println!("qcir new [n_qubits] | read <path> [qasm|qc] | write <path> [qasm|qc] | print | list | checkout <id> | remove <id> | copy [id]\n");
        return Ok(());
    }
    match args {
        ["new", n] => {
            let n: usize = n.parse().map_err(from_str_error)?;
            let id = app.qcir.add(None, qsynth::circuit::Circuit::new(n)).map_err(from_str_error)?;
            println!("qcir[{id}] created with {n} qubits\n");
        }
        ["new"] => {
            let id = app.qcir.add(None, qsynth::circuit::Circuit::new(0)).map_err(from_str_error)?;
            println!("qcir[{id}] created with 0 qubits\n");
        }
        ["read", path] | ["read", path, _] => {
            let text = fs::read_to_string(path).map_err(from_str_error)?;
            let fmt = if args.len() == 3 { args[2] } else { guess_format(path) };
            let circuit = match fmt {
                "qasm" => qasm::parse(&text),
                "qc" => qc::parse(&text),
                other => return Err(format!("unrecognized circuit format {other:?}")),
            }
            .map_err(from_str_error)?;
            let id = app.qcir.add(None, circuit).map_err(from_str_error)?;
            println!("qcir[{id}] loaded from {path}\n");
        }
        ["write", path] | ["write", path, _] => {
            let circuit = app.qcir.focused().map_err(from_str_error)?;
            let fmt = if args.len() == 3 { args[2] } else { guess_format(path) };
            let text = match fmt {
                "qasm" => qasm::write(circuit),
                "qc" => qc::write(circuit),
                other => return Err(format!("unrecognized circuit format {other:?}")),
            };
            fs::write(path, text).map_err(from_str_error)?;
            println!("qcir[{}] written to {path}\n", app.qcir.focus().unwrap());
        }
        ["print"] => {
            let circuit = app.qcir.focused().map_err(from_str_error)?;
            print!("{}", qasm::write(circuit));
            println!();
        }
        ["list"] => {
            for (id, c) in app.qcir.iter() {
                println!("qcir[{id}]: {} qubits, {} gates", c.n_qubits(), c.len());
            }
            println!();
        }
        ["checkout", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.qcir.checkout(id).map_err(from_str_error)?;
        }
        ["remove", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.qcir.remove(id).map_err(from_str_error)?;
        }
        ["copy"] => {
            let id = app.qcir.copy(None).map_err(from_str_error)?;
            println!("qcir[{id}] created\n");
        }
        ["copy", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            let new_id = app.qcir.copy(Some(id)).map_err(from_str_error)?;
            println!("qcir[{new_id}] created\n");
        }
        _ => return Err("usage: qcir new|read|write|print|list|checkout|remove|copy".to_string()),
    }
    Ok(())
}

fn zx(app: &mut App, args: &[&str]) -> Result<(), String> {
    if want_help(args) {
        println!("zx new | read <path> | write <path> | simplify | list | checkout <id> | remove <id> | copy [id]\n");
        return Ok(());
    }
    match args {
        ["new"] => {
            let id = app.zx.add(None, qsynth::zx::ZxGraph::new()).map_err(from_str_error)?;
            println!("zx[{id}] created\n");
        }
        ["read", path] => {
            let text = fs::read_to_string(path).map_err(from_str_error)?;
            let graph = zx_text::parse(&text).map_err(from_str_error)?;
            let id = app.zx.add(None, graph).map_err(from_str_error)?;
            println!("zx[{id}] loaded from {path}\n");
        }
        ["write", path] => {
            let graph = app.zx.focused().map_err(from_str_error)?;
            fs::write(path, zx_text::write(graph)).map_err(from_str_error)?;
            println!("zx[{}] written to {path}\n", app.zx.focus().unwrap());
        }
        ["simplify"] => {
            let graph = app.zx.focused_mut().map_err(from_str_error)?;
            let before = graph.num_vertices();
            loop {
                let next_match = qsynth::zx::match_identity_removal(graph)
                    .into_iter()
                    .next()
                    .or_else(|| qsynth::zx::match_fusion(graph).into_iter().next())
                    .or_else(|| qsynth::zx::match_local_complementation(graph).into_iter().next())
                    .or_else(|| qsynth::zx::match_pivot(graph).into_iter().next());
                match next_match {
                    Some(m) => qsynth::zx::apply(graph, &m),
                    None => break,
                }
            }
            let after = graph.num_vertices();
            println!("zx[{}] simplified {} -> {} vertices\n", app.zx.focus().unwrap(), before, after);
        }
        ["list"] => {
            for (id, g) in app.zx.iter() {
                println!("zx[{id}]: {} vertices", g.num_vertices());
            }
            println!();
        }
        ["checkout", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.zx.checkout(id).map_err(from_str_error)?;
        }
        ["remove", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.zx.remove(id).map_err(from_str_error)?;
        }
        ["copy"] => {
            let id = app.zx.copy(None).map_err(from_str_error)?;
            println!("zx[{id}] created\n");
        }
        ["copy", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            let new_id = app.zx.copy(Some(id)).map_err(from_str_error)?;
            println!("zx[{new_id}] created\n");
        }
        _ => return Err("usage: zx new|read|write|simplify|list|checkout|remove|copy".to_string()),
    }
    Ok(())
}

fn tableau(app: &mut App, args: &[&str]) -> Result<(), String> {
    if want_help(args) {
        println!("tableau new [n_qubits] | from-qcir [id] | to-qcir | optimize | list | checkout <id> | remove <id> | copy [id]\n");
        return Ok(());
    }
    match args {
        ["new", n] => {
            let n: usize = n.parse().map_err(from_str_error)?;
            let id = app.tableau.add(None, qsynth::tableau::TableauContainer::new(n)).map_err(from_str_error)?;
            println!("tableau[{id}] created with {n} qubits\n");
        }
        ["from-qcir"] | ["from-qcir", _] => {
            let circuit = match args.get(1) {
                Some(id) => {
                    let id: usize = id.parse().map_err(from_str_error)?;
                    app.qcir.get(id).map_err(from_str_error)?.clone()
                }
                None => app.qcir.focused().map_err(from_str_error)?.clone(),
            };
            let container = convert::tableau_qcir::qcir_to_container(&circuit).map_err(from_str_error)?;
            let id = app.tableau.add(None, container).map_err(from_str_error)?;
            println!("tableau[{id}] created\n");
        }
        ["to-qcir"] => {
            let container = app.tableau.focused().map_err(from_str_error)?;
            let circuit = convert::tableau_qcir::container_to_qcir(container).map_err(from_str_error)?;
            let id = app.qcir.add(None, circuit).map_err(from_str_error)?;
            println!("qcir[{id}] created\n");
        }
        ["optimize"] => {
            let container = app.tableau.focused_mut().map_err(from_str_error)?;
            optimizer::full_optimize(container);
            println!("tableau[{}] optimized\n", app.tableau.focus().unwrap());
        }
        ["list"] => {
            for (id, c) in app.tableau.iter() {
                println!("tableau[{id}]: {} qubits", c.n_qubits());
            }
            println!();
        }
        ["checkout", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.tableau.checkout(id).map_err(from_str_error)?;
        }
        ["remove", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            app.tableau.remove(id).map_err(from_str_error)?;
        }
        ["copy"] => {
            let id = app.tableau.copy(None).map_err(from_str_error)?;
            println!("tableau[{id}] created\n");
        }
        ["copy", id] => {
            let id: usize = id.parse().map_err(from_str_error)?;
            let new_id = app.tableau.copy(Some(id)).map_err(from_str_error)?;
            println!("tableau[{new_id}] created\n");
        }
        _ => return Err("usage: tableau new|from-qcir|to-qcir|optimize|list|checkout|remove|copy".to_string()),
    }
    Ok(())
}

const EXTRACT_CONFIG_KEYS: &[&str] = &["sort_frontier", "sort_neighbors", "permute_qubits", "filter_duplicate_cxs", "reduce_czs", "dynamic_order", "block_size", "optimize_level", "pred_coeff"];

/// Resolve `prefix` to a unique option name: options may be abbreviated to
/// any unique prefix (case-insensitive).
fn resolve_option(prefix: &str) -> Result<&'static str, String> {
    let prefix = prefix.to_ascii_lowercase();
    let matches: Vec<&'static str> = EXTRACT_CONFIG_KEYS.iter().copied().filter(|k| k.starts_with(&prefix)).collect();
    match matches.as_slice() {
        [one] => Ok(one),
        [] => Err(format!("no extract config option matches {prefix:?}")),
        _ => Err(format!("{prefix:?} is ambiguous among {matches:?}")),
    }
}

fn extract(app: &mut App, args: &[&str]) -> Result<(), String> {
    if want_help(args) {
        println!("extract config [<option> <value>] | run [max_iterations]\n");
        return Ok(());
    }
    match args {
        ["config"] => {
            let c = &app.extract_config;
            println!(
                "sort_frontier={} sort_neighbors={} permute_qubits={} filter_duplicate_cxs={} reduce_czs={} dynamic_order={} block_size={} optimize_level={:?} pred_coeff={}\n",
                c.sort_frontier, c.sort_neighbors, c.permute_qubits, c.filter_duplicate_cxs, c.reduce_czs, c.dynamic_order, c.block_size, c.optimize_level, c.pred_coeff
            );
        }
        ["config", key, value] => {
            let key = resolve_option(key)?;
            set_extract_option(&mut app.extract_config, key, value)?;
        }
        ["run"] | ["run", _] => {
            let max_iterations = match args.get(1) {
                Some(n) => n.parse().map_err(from_str_error)?,
                None => 10_000,
            };
            let graph = app.zx.focused_mut().map_err(from_str_error)?;
            let circuit = extraction_loop(graph, &app.extract_config, max_iterations).map_err(from_str_error)?;
            let id = app.qcir.add(None, circuit).map_err(from_str_error)?;
            println!("qcir[{id}] extracted\n");
        }
        _ => return Err("usage: extract config [<option> <value>] | run [max_iterations]".to_string()),
    }
    Ok(())
}

fn set_extract_option(config: &mut qsynth::zx::ExtractConfig, key: &str, value: &str) -> Result<(), String> {
    let parse_bool = |v: &str| v.parse::<bool>().map_err(from_str_error);
    match key {
        "sort_frontier" => config.sort_frontier = parse_bool(value)?,
        "sort_neighbors" => config.sort_neighbors = parse_bool(value)?,
        "permute_qubits" => config.permute_qubits = parse_bool(value)?,
        "filter_duplicate_cxs" => config.filter_duplicate_cxs = parse_bool(value)?,
        "reduce_czs" => config.reduce_czs = parse_bool(value)?,
        "dynamic_order" => config.dynamic_order = parse_bool(value)?,
        "block_size" => config.block_size = value.parse().map_err(from_str_error)?,
        "pred_coeff" => config.pred_coeff = value.parse().map_err(from_str_error)?,
        "optimize_level" => {
            config.optimize_level = match value {
                "fixed_block" => OptimizeLevel::FixedBlock,
                "sweep_block_sizes" => OptimizeLevel::SweepBlockSizes,
                "greedy_reduction" => OptimizeLevel::GreedyReduction,
                "min_of_sweep_and_greedy" => OptimizeLevel::MinOfSweepAndGreedy,
                other => return Err(format!("unrecognized optimize_level {other:?}")),
            }
        }
        other => return Err(format!("unrecognized extract config option {other:?}")),
    }
    Ok(())
}

fn tensor(app: &mut App, args: &[&str]) -> Result<(), String> {
    if want_help(args) {
        println!("tensor equiv <id_a> <id_b>\n");
        return Ok(());
    }
    match args {
        ["equiv", a, b] => {
            let a: usize = a.parse().map_err(from_str_error)?;
            let b: usize = b.parse().map_err(from_str_error)?;
            let circuit_a = app.qcir.get(a).map_err(from_str_error)?;
            let circuit_b = app.qcir.get(b).map_err(from_str_error)?;
            let verdict = convert::is_equivalent(circuit_a, circuit_b).map_err(from_str_error)?;
            println!("{verdict:?}\n");
        }
        _ => return Err("usage: tensor equiv <id_a> <id_b>".to_string()),
    }
    Ok(())
}

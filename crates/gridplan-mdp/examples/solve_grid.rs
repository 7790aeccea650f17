use std::path::PathBuf;

use env_logger::Env;
use gridplan_core::{PolicyIteration, SolverConfig, ValueIteration, extract_policy};
use gridplan_mdp::{Action, CellKind, GridModel, GridSnapshot, load_spec};

fn render(snapshot: &GridSnapshot) -> String {
    let mut out = String::new();
    for row in snapshot.rows() {
        for cell in row {
            let text = match (cell.kind, cell.value, cell.action) {
                (CellKind::Obstacle, _, _) => "   ####  ".to_string(),
                (_, Some(value), Some(Action::Move(direction))) => {
                    format!(" {value:>6.2} {}", direction.arrow())
                }
                (_, Some(value), _) => format!(" {value:>6.2} *"),
                _ => "    ?    ".to_string(),
            };
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}

fn value_iteration(model: &mut GridModel, config: SolverConfig) {
    let steps = ValueIteration::new(&*model, config)
        .steps(model.values())
        .expect("grid mappings always fit the grid")
        .collect::<Result<Vec<_>, _>>()
        .expect("value iteration failed");

    for step in steps {
        let policy = extract_policy(&*model, &step.values).expect("policy extraction failed");
        model.commit(step.values, policy).expect("commit failed");
        println!("value iteration step {} (l1 delta {:.6})", step.iteration, step.l1_delta);
        println!("{}", render(&model.snapshot()));
        if step.converged {
            println!("value iteration converged in {} steps", step.iteration);
        }
    }
}

fn policy_iteration(model: &mut GridModel, config: SolverConfig) {
    let steps = PolicyIteration::new(&*model, config)
        .steps(model.policy(), model.values())
        .expect("grid mappings always fit the grid")
        .collect::<Result<Vec<_>, _>>()
        .expect("policy iteration failed");

    for step in steps {
        model.commit(step.values, step.policy).expect("commit failed");
        println!(
            "policy iteration step {} ({} states changed)",
            step.iteration, step.changed_states
        );
        println!("{}", render(&model.snapshot()));
        if step.converged {
            println!("policy iteration converged in {} steps", step.iteration);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/gridplan-mdp/examples/sample.grid.json"));
    let solver = args.next().unwrap_or_else(|| "value".to_string());
    let seed = args
        .next()
        .map(|raw| raw.parse::<u64>().expect("seed must be an unsigned integer"))
        .unwrap_or(12345);

    let spec = load_spec(&path).expect("failed to load grid config");
    let mut model = spec.compile(seed).expect("invalid grid config");
    let config = SolverConfig::from_default_yaml().expect("default solver config is valid");

    let weights = model.transition_distribution();
    println!(
        "initial grid (value {}, weights f={} l={} r={} b={})",
        model.initial_value(),
        weights.forward,
        weights.left,
        weights.right,
        weights.backward
    );
    println!("{}", render(&model.snapshot()));

    match solver.as_str() {
        "value" => value_iteration(&mut model, config),
        "policy" => policy_iteration(&mut model, config),
        other => panic!("unknown solver '{other}'; expected 'value' or 'policy'"),
    }

    println!(
        "{}",
        model.snapshot().to_json().expect("snapshot serializes")
    );
}

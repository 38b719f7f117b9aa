//! `kiln diff`: file-set changes between consecutive rounds.

use crate::scenario::load_rounds;
use crate::ScenarioArgs;
use kiln_config::ResolvedRound;
use kiln_source::{diff, RoundSnapshot};

/// Prints created (`+`) and deleted (`-`) paths for every round.
pub fn run(args: &ScenarioArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_, rounds) = load_rounds(&args.scenario)?;
    print!("{}", render(&rounds));
    Ok(0)
}

fn render(rounds: &[ResolvedRound]) -> String {
    let mut out = String::new();
    let mut previous = RoundSnapshot::new();
    for round in rounds {
        out.push_str(&format!("ROUND {} {}\n", round.index, round.name));
        let changes = diff(&previous, &round.snapshot);
        for path in &changes.deleted {
            out.push_str(&format!("  - {path}\n"));
        }
        for path in &changes.created {
            out.push_str(&format!("  + {path}\n"));
        }
        previous = round.snapshot.clone();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::{load_config_from_str, resolve_rounds};

    #[test]
    fn lists_deleted_then_created() {
        let config = load_config_from_str(
            r#"
root_files = ["/a.ts"]

[files]
"/a.ts" = "export const A = 1;\n"
"/b.ts" = "export const B = 1;\n"

[[rounds]]
name = "initial"

[[rounds]]
name = "swap"
remove = ["/b.ts"]

[rounds.add]
"/c.ts" = "export const C = 1;\n"
"#,
        )
        .unwrap();
        let rounds = resolve_rounds(&config).unwrap();
        assert_eq!(
            render(&rounds),
            "ROUND 0 initial\n  + /a.ts\n  + /b.ts\nROUND 1 swap\n  - /b.ts\n  + /c.ts\n"
        );
    }
}

//! End-to-end pipeline tests: raw history in, alias assignment out.

use keychord_core::table::{parse_weight_table, render_encoding_table};
use pretty_assertions::assert_eq;
use keychord_core::{
	Alphabet, Assignment, ConflictOracle, Resolver, Result, apply_min_count, count_occurrences, sanitize_lines,
};

struct SetOracle {
	taken: Vec<&'static str>,
}

impl ConflictOracle for SetOracle {
	fn is_taken(&self, name: &str) -> Result<bool> {
		Ok(self.taken.contains(&name))
	}
}

fn alphabet(symbols: &str) -> Alphabet {
	Alphabet::new(symbols.chars().map(|c| c.to_string()).collect()).expect("alphabet should be valid")
}

#[test]
fn history_to_assignment() {
	let history = "
git status
git status \\
cargo build
git status
docker compose up
git status
cargo build
cargo build
cargo build
docker compose up
docker compose up
docker compose up
git status
";
	let lines = sanitize_lines(history.lines());
	let weights = apply_min_count(count_occurrences(&lines), 4);
	assert_eq!(weights.len(), 3);

	let oracle = SetOracle { taken: vec![] };
	let resolver = Resolver::new(alphabet("jf"), &oracle);
	let assignments = resolver.resolve(weights).expect("resolution should succeed");

	assert_eq!(assignments.len(), 3);
	// Heaviest first, and never a code that is half the target or longer.
	assert!(assignments.windows(2).all(|w| w[0].weight >= w[1].weight));
	for assignment in &assignments {
		assert!(2 * assignment.code.len() < assignment.target.chars().count());
	}
}

#[test]
fn taken_names_are_repaired_not_dropped() {
	let weights = count_occurrences([
		"git status",
		"git status",
		"git status",
		"cargo build",
		"cargo build",
		"docker compose up",
	]);
	// Whatever single-symbol name the heaviest command gets is taken.
	let oracle = SetOracle { taken: vec!["j", "f"] };
	let resolver = Resolver::new(alphabet("jf"), &oracle);
	let assignments = resolver.resolve(weights).expect("resolution should succeed");

	assert_eq!(assignments.len(), 3);
	for assignment in &assignments {
		let name = assignment.code.concat();
		assert_ne!(name, "j");
		assert_ne!(name, "f");
	}
}

#[test]
fn weight_table_round_trips_through_encoding_table() {
	let table = "target,count\ngit status,12\ncargo build,9\ndocker compose up,5\n";
	let weights = parse_weight_table(table, "target", "count").expect("table should parse");

	let oracle = SetOracle { taken: vec![] };
	let assignments = Resolver::new(alphabet("jfk"), &oracle)
		.resolve(weights)
		.expect("resolution should succeed");
	let rendered = render_encoding_table(&assignments);

	let mut lines = rendered.lines();
	assert_eq!(lines.next(), Some("sequence,target,count"));
	let first = lines.next().expect("heaviest row should be present");
	assert!(first.ends_with(",git status,12"), "unexpected first row: {first}");
	assert_eq!(rendered.lines().count(), 4);
}

#[test]
fn assignment_fields_survive_rendering_order() {
	let oracle = SetOracle { taken: vec![] };
	let weights = parse_weight_table(
		"target,count\nterraform apply,3\nkubectl get pods,11\n",
		"target",
		"count",
	)
	.expect("table should parse");
	let assignments: Vec<Assignment> = Resolver::new(alphabet("jf"), &oracle)
		.resolve(weights)
		.expect("resolution should succeed");

	assert_eq!(assignments[0].target, "kubectl get pods");
	assert_eq!(assignments[1].target, "terraform apply");
}

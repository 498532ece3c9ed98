//! Alias-declaration rendering.

use keychord_core::Assignment;

/// Emits one `alias name='target'` line per assignment, in the order given.
pub fn alias_lines(assignments: &[Assignment]) -> String {
	let mut out = String::new();
	for assignment in assignments {
		out.push_str("alias ");
		out.push_str(&assignment.code.concat());
		out.push('=');
		out.push_str(&sh_quote(&assignment.target));
		out.push('\n');
	}
	out
}

/// Single-quotes a string for the shell, escaping embedded single quotes.
pub fn sh_quote(s: &str) -> String {
	format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
	use keychord_core::Code;
	use pretty_assertions::assert_eq;

	use super::*;

	fn assignment(code: &[&str], target: &str, weight: u64) -> Assignment {
		Assignment {
			code: code.iter().map(|s| s.to_string()).collect::<Code>(),
			target: target.to_string(),
			weight,
		}
	}

	#[test]
	fn renders_alias_declarations() {
		let lines = alias_lines(&[
			assignment(&["j"], "git status", 10),
			assignment(&["f", "j"], "docker ps", 5),
		]);
		assert_eq!(lines, "alias j='git status'\nalias fj='docker ps'\n");
	}

	#[test]
	fn escapes_embedded_single_quotes() {
		let lines = alias_lines(&[assignment(&["j", "f"], "echo 'hi there'", 4)]);
		assert_eq!(lines, "alias jf='echo '\\''hi there'\\'''\n");
	}
}

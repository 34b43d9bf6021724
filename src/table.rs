use super::{AutomatonError, State};

/// Label of an empty target set.
pub const EMPTY_SET: &str = "∅";

/// Joins state names as `{a, b}`, sorted by name. An empty set becomes [`EMPTY_SET`].
pub(crate) fn set_label<'a, I>(names: I) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	let mut names: Vec<&str> = names.into_iter().collect();
	if names.is_empty() {
		return EMPTY_SET.to_owned();
	}
	names.sort_unstable();
	format!("{{{}}}", names.join(", "))
}

fn width(text: &str) -> usize {
	text.chars().count()
}

fn line<'a, I>(cells: I, widths: &[usize]) -> String
where
	I: Iterator<Item = &'a str>,
{
	let mut line: String = cells
		.zip(widths)
		.map(|(cell, width)| format!("| {:<width$} ", cell, width = *width))
		.collect();
	line.push('|');
	line
}

/// Renders a fixed-width transition table, one row per state sorted by name.
pub(crate) fn render(
	title: &str,
	symbols: &[String],
	mut rows: Vec<(&State, Vec<String>)>,
) -> Result<String, AutomatonError> {
	if rows.is_empty() {
		return Err(AutomatonError::EmptyAutomaton);
	}
	rows.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));

	// non-starting states are shifted to line up with the `>` marker
	let labels: Vec<String> = rows
		.iter()
		.map(|(state, _)| {
			if state.is_starting() {
				state.to_string()
			} else {
				format!(" {}", state)
			}
		})
		.collect();

	let mut widths = Vec::with_capacity(symbols.len() + 1);
	widths.push(
		labels
			.iter()
			.map(|label| width(label))
			.chain(Some(width("State")))
			.max()
			.unwrap_or_default(),
	);
	for (position, symbol) in symbols.iter().enumerate() {
		widths.push(
			rows.iter()
				.filter_map(|(_, cells)| cells.get(position))
				.map(|cell| width(cell))
				.chain(Some(width(symbol)))
				.max()
				.unwrap_or_default(),
		);
	}

	let divider: String = widths
		.iter()
		.map(|width| format!("+{}", "-".repeat(width + 2)))
		.chain(Some("+".to_owned()))
		.collect();
	let mut out = String::new();
	let total = width(&divider);
	if total > width(title) + 4 {
		out.push_str(&"=".repeat(total));
		out.push('\n');
		out.push_str(&format!("|{:^width$}|\n", title, width = total - 2));
	} else {
		out.push_str(title);
		out.push('\n');
	}
	out.push_str(&divider);
	out.push('\n');
	let header = Some("State")
		.into_iter()
		.chain(symbols.iter().map(String::as_str));
	out.push_str(&line(header, &widths));
	out.push('\n');
	out.push_str(&divider);
	out.push('\n');
	for (label, (_, cells)) in labels.iter().zip(&rows) {
		let row = Some(label.as_str())
			.into_iter()
			.chain(cells.iter().map(String::as_str));
		out.push_str(&line(row, &widths));
		out.push('\n');
		out.push_str(&divider);
		out.push('\n');
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn label() {
		assert_eq!("∅", set_label(Vec::<&str>::new()));
		assert_eq!("{q0, q1}", set_label(vec!["q1", "q0"]));
	}

	#[test]
	fn layout() {
		let start = State::new("a", true, false);
		let other = State::new("long_name", false, true);
		let rows = vec![
			(&other, vec!["a".to_owned()]),
			(&start, vec!["long_name".to_owned()]),
		];
		let table = render("Test", &["x".to_owned()], rows).unwrap();
		let lines: Vec<&str> = table.lines().collect();
		assert_eq!(
			vec![
				"===========================",
				"|          Test           |",
				"+-------------+-----------+",
				"| State       | x         |",
				"+-------------+-----------+",
				"| >a          | long_name |",
				"+-------------+-----------+",
				"|  long_name* | a         |",
				"+-------------+-----------+",
			],
			lines
		);
	}

	#[test]
	fn empty() {
		assert_eq!(
			Err(AutomatonError::EmptyAutomaton),
			render("Test", &[], Vec::new())
		);
	}
}

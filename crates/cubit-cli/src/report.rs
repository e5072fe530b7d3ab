use std::fmt::Display;

/// Lines of a diagnostic which are highlighted when colors are enabled.
const HEADINGS: [&str; 2] = ["traceback on:", "Error name:"];

/// Prints a diagnostic to stderr.
pub fn print_diagnostic(diagnostic: &impl Display, color: bool) {
    eprintln!("{}", render(&diagnostic.to_string(), color));
}

fn render(report: &str, color: bool) -> String {
    if !color {
        return report.to_string();
    }

    report
        .split('\n')
        .map(|line| match HEADINGS.iter().any(|heading| line.starts_with(heading)) {
            true => format!("\x1b[1;31m{line}\x1b[0m"),
            false => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

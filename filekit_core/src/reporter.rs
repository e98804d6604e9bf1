use filekit_common::ComparisonResult;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Renders a [`ComparisonResult`] for people (summary or itemized) or as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReporter {
    use_color: bool,
}

impl ResultReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color the verdict line with ANSI escapes
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.use_color = enabled;
        self
    }

    /// Summary counts, or every recorded difference when `verbose` is set
    pub fn format(&self, result: &ComparisonResult, verbose: bool) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.verdict(result));

        if verbose {
            self.format_itemized(result, &mut out);
        } else {
            self.format_summary(result, &mut out);
        }
        out
    }

    pub fn format_json(&self, result: &ComparisonResult) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(result)
    }

    fn verdict(&self, result: &ComparisonResult) -> String {
        let (text, color) = if result.identical {
            ("✅ Directories are identical!", GREEN)
        } else {
            ("❌ Directories have differences:", RED)
        };

        if self.use_color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn format_summary(&self, result: &ComparisonResult, out: &mut String) {
        if !result.identical {
            let counts = [
                (result.only_in_first.len(), "items only in first directory"),
                (result.only_in_second.len(), "items only in second directory"),
                (
                    result.mismatched_mod_times.len(),
                    "files with different modification times",
                ),
            ];
            for (count, label) in counts {
                if count > 0 {
                    push_line(out, &format!("  - {count} {label}"));
                }
            }
            push_line(out, "Use --verbose flag for detailed comparison");
        }
        push_line(out, &totals(result));
    }

    fn format_itemized(&self, result: &ComparisonResult, out: &mut String) {
        push_line(out, &totals(result));
        if result.identical {
            return;
        }
        out.push('\n');

        let sections = [
            ("📁 Files/directories only in first directory:", &result.only_in_first),
            ("📁 Files/directories only in second directory:", &result.only_in_second),
            ("⏰ Files with different modification times:", &result.mismatched_mod_times),
        ];
        for (heading, items) in sections {
            if items.is_empty() {
                continue;
            }
            push_line(out, heading);
            for item in items {
                push_line(out, &format!("  - {item}"));
            }
            out.push('\n');
        }
    }
}

fn totals(result: &ComparisonResult) -> String {
    format!(
        "Total files: {}, Total directories: {}",
        result.total_files, result.total_dirs
    )
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

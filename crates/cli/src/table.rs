use std::io::{self, Write};

use dirsize_core::human::{count, megabytes_grouped};
use dirsize_core::ResultSet;

const HEADERS: [&str; 3] = ["Directory", "Number of Files", "Size (MB)"];

/// Prints the records largest first, a totals footer, and the elapsed time.
pub fn render(results: &ResultSet, mut w: impl Write) -> io::Result<()> {
    let rows: Vec<[String; 3]> = results
        .sorted()
        .iter()
        .map(|r| {
            [
                r.path.display().to_string(),
                count(r.files),
                megabytes_grouped(r.bytes),
            ]
        })
        .collect();
    let totals = results.totals();
    let footer = [
        "Totals".to_string(),
        count(totals.files),
        megabytes_grouped(totals.bytes),
    ];

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows.iter().chain(std::iter::once(&footer)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{rule}+");

    writeln!(w, "{rule}")?;
    writeln!(
        w,
        "| {:<a$} | {:<b$} | {:<c$} |",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        a = widths[0],
        b = widths[1],
        c = widths[2]
    )?;
    writeln!(w, "{rule}")?;
    for row in &rows {
        write_row(&mut w, &widths, row)?;
    }
    writeln!(w, "{rule}")?;
    write_row(&mut w, &widths, &footer)?;
    writeln!(w, "{rule}")?;

    writeln!(w)?;
    writeln!(w, "Total Time Taken (ms): {}", results.elapsed().as_millis())
}

fn write_row(w: &mut impl Write, widths: &[usize; 3], row: &[String; 3]) -> io::Result<()> {
    writeln!(
        w,
        "| {:<a$} | {:>b$} | {:>c$} |",
        row[0],
        row[1],
        row[2],
        a = widths[0],
        b = widths[1],
        c = widths[2]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsize_core::DirectoryAggregator;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn table_lists_largest_first_with_totals() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.txt"), vec![0u8; 1_048_576]).unwrap();
        fs::create_dir(root.join("logs")).unwrap();
        fs::write(root.join("logs/l1.log"), vec![0u8; 2_097_152]).unwrap();
        fs::write(root.join("logs/l2.log"), vec![0u8; 1_048_576]).unwrap();

        let results = DirectoryAggregator::initialize(root).unwrap().run();
        let mut out = Vec::new();
        render(&results, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].contains("Directory"));
        assert!(lines[1].contains("Number of Files"));
        assert!(lines[1].contains("Size (MB)"));

        let logs = root.join("logs").display().to_string();
        assert!(lines[3].starts_with(&format!("| {logs}")));
        assert!(lines[3].ends_with(" 2 |      3.00 |"));
        assert!(lines[4].ends_with(" 1 |      1.00 |"));
        assert!(lines[6].starts_with("| Totals"));
        assert!(lines[6].ends_with(" 3 |      4.00 |"));
        assert!(lines.last().unwrap().starts_with("Total Time Taken (ms): "));
    }

    #[test]
    fn large_counts_are_grouped() {
        let tmp = TempDir::new().unwrap();
        let many = tmp.path().join("many");
        fs::create_dir(&many).unwrap();
        for i in 0..1_200 {
            fs::write(many.join(format!("f{i}")), b"").unwrap();
        }

        let results = DirectoryAggregator::initialize(tmp.path()).unwrap().run();
        let mut out = Vec::new();
        render(&results, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let many_row = text
            .lines()
            .find(|l| l.starts_with(&format!("| {} ", many.display())))
            .unwrap();
        assert!(many_row.ends_with(" 1,200 |      0.00 |"));
    }
}

use crate::human::megabytes;
use crate::model::*;

/// Sorted records as `path,files,bytes,size_mb` rows.
pub fn to_csv(results: &ResultSet, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["path", "files", "bytes", "size_mb"])?;
    for r in results.sorted() {
        writer.write_record([
            r.path.display().to_string(),
            r.files.to_string(),
            r.bytes.to_string(),
            megabytes(r.bytes),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(results: &ResultSet) -> serde_json::Value {
    let totals = results.totals();
    serde_json::json!({
        "root": results.root().display().to_string(),
        "generated_at": chrono::Local::now().to_rfc3339(),
        "elapsed_ms": u64::try_from(results.elapsed().as_millis()).unwrap_or(u64::MAX),
        "totals": totals,
        "records": results.sorted().iter().map(|r| serde_json::json!({
            "path": r.path.display().to_string(),
            "files": r.files,
            "bytes": r.bytes,
            "size_mb": megabytes(r.bytes),
        })).collect::<Vec<_>>(),
        "skipped": results.skipped().iter().map(|s| serde_json::json!({
            "path": s.path.display().to_string(),
            "reason": s.reason,
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new(PathBuf::from("/data"));
        rs.insert(DirectoryRecord {
            path: PathBuf::from("/data"),
            bytes: 1_048_576,
            files: 1,
        });
        rs.insert(DirectoryRecord {
            path: PathBuf::from("/data/logs"),
            bytes: 3_145_728,
            files: 2,
        });
        rs
    }

    #[test]
    fn csv_rows_follow_display_order() {
        let mut buf = Vec::new();
        to_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "path,files,bytes,size_mb",
                "/data/logs,2,3145728,3.00",
                "/data,1,1048576,1.00",
            ]
        );
    }

    #[test]
    fn json_carries_totals_and_records() {
        let v = to_json(&sample());
        assert_eq!(v["root"], "/data");
        assert_eq!(v["totals"]["files"], 3);
        assert_eq!(v["totals"]["bytes"], 4_194_304u64);
        assert_eq!(v["totals"]["dirs"], 1);
        assert_eq!(v["records"][0]["path"], "/data/logs");
        assert_eq!(v["records"][1]["size_mb"], "1.00");
        assert!(v["generated_at"].is_string());
    }
}

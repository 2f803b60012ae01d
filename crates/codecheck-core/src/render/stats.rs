//! Per-column summary statistics for CSV outputs.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{ReportError, ReportResult};

/// Statistics of one numeric column. Empty cells are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Describe every numeric column of the CSV at `path`.
///
/// A column is numeric when every non-empty cell parses as a float and at least one
/// cell is non-empty. Other columns are left out.
pub fn describe_csv(path: &Path) -> ReportResult<Vec<ColumnStats>> {
    let wrap = |err: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(wrap)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(wrap)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Option<Vec<f64>>> = vec![Some(Vec::new()); headers.len()];
    for record in reader.records() {
        let record = record.map_err(wrap)?;
        for (i, column) in columns.iter_mut().enumerate() {
            let Some(values) = column else { continue };
            let cell = record.get(i).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => *column = None,
            }
        }
    }

    Ok(headers
        .into_iter()
        .zip(columns)
        .filter_map(|(name, values)| describe(name, values?))
        .collect())
}

fn describe(name: String, mut values: Vec<f64>) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    };

    Some(ColumnStats {
        name,
        count,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[count - 1],
    })
}

/// Linear interpolation between closest ranks of sorted `values`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Markdown table, counts as integers and everything else to four decimals.
pub fn stats_table(stats: &[ColumnStats]) -> String {
    let mut lines = vec![
        "| | count | mean | std | min | 25% | 50% | 75% | max |".to_string(),
        "|:--|--:|--:|--:|--:|--:|--:|--:|--:|".to_string(),
    ];
    for s in stats {
        lines.push(format!(
            "| {} | {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |",
            s.name, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_quantiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.75), 3.25);
    }

    #[test]
    fn test_describe_skips_text_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "label,x,y\na,1,10\nb,2,\nc,3,30\nd,4,20\n").unwrap();

        let stats = describe_csv(file.path()).unwrap();
        assert_eq!(stats.len(), 2);

        let x = &stats[0];
        assert_eq!(x.name, "x");
        assert_eq!(x.count, 4);
        assert_eq!(x.mean, 2.5);
        assert!((x.std - 1.2910).abs() < 1e-4);
        assert_eq!((x.min, x.median, x.max), (1.0, 2.5, 4.0));

        assert_eq!(stats[1].count, 3);
        assert_eq!(stats[1].median, 20.0);
    }

    #[test]
    fn test_single_value_std_is_nan() {
        let stats = describe("v".into(), vec![5.0]).unwrap();
        assert!(stats.std.is_nan());
        assert_eq!(stats.q25, 5.0);
    }

    #[test]
    fn test_missing_file_is_csv_error() {
        let err = describe_csv(Path::new("/nonexistent/table.csv")).unwrap_err();
        assert!(matches!(err, ReportError::Csv { .. }));
    }
}

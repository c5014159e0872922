use super::Writer;
use anyhow::Context;
use holo_sdk::Sample;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

/// Header-bearing CSV sink. Missing values are written as empty cells.
/// The file is kept even when no rows were written, so downstream readers
/// always find the header.
pub struct CsvWriter {
    writer: ::csv::Writer<File>,
    columns: Vec<String>,
    rows_written: usize,
}

impl CsvWriter {
    pub fn new(path: &Path, columns: Vec<String>) -> anyhow::Result<Self> {
        let mut writer = ::csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file {:?}", path))?;
        writer.write_record(&columns)?;
        Ok(Self {
            writer,
            columns,
            rows_written: 0,
        })
    }
}

/// Render a cell. Floats use the shortest round-trip form, with a trailing
/// `.0` on integral values so `1981.0` stays distinguishable from `"1981"`.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.is_f64() => n.as_f64().map(format_float).unwrap_or_default(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Shortest round-trip digits. Positional for decimal exponents in `-4..16`,
/// otherwise `d.ddde±XX` with at least two exponent digits.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", value);
    let parts = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)));
    match parts {
        Some((mantissa, exp)) if !(-4..16).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        _ => {
            let plain = value.to_string();
            if plain.contains('.') {
                plain
            } else {
                format!("{}.0", plain)
            }
        }
    }
}

impl Writer for CsvWriter {
    fn write_sample(&mut self, sample: Sample) -> anyhow::Result<()> {
        let row: Vec<String> = self
            .columns
            .iter()
            .map(|col| format_cell(sample.get(col)))
            .collect();
        self.writer.write_record(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> anyhow::Result<bool> {
        self.writer.flush()?;
        Ok(self.rows_written > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_floats_like_a_dataframe_would() {
        assert_eq!(format_float(1981.0), "1981.0");
        assert_eq!(format_float(-500.0), "-500.0");
        assert_eq!(format_float(169.75574), "169.75574");
        assert_eq!(format_float(1958.5), "1958.5");
        assert_eq!(format_float(-0.0), "-0.0");
    }

    #[test]
    fn large_and_tiny_floats_use_exponent_form() {
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.2345678901234568e17), "1.2345678901234568e+17");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(2.20462e-5), "2.20462e-05");
        assert_eq!(format_float(-3e-300), "-3e-300");
        assert_eq!(format_float(1e100), "1e+100");
    }

    #[test]
    fn non_finite_floats_are_spelled_out() {
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn formats_cells_by_json_type() {
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(&Value::Null)), "");
        assert_eq!(format_cell(Some(&json!("1,358"))), "1,358");
        assert_eq!(format_cell(Some(&json!(77.0))), "77.0");
        assert_eq!(format_cell(Some(&json!(3))), "3");
    }

    #[test]
    fn writes_header_and_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let columns = vec!["name".to_string(), "mass".to_string(), "mass_lb".to_string()];

        let mut writer: Box<dyn Writer> = Box::new(CsvWriter::new(&path, columns).unwrap());
        let sample =
            Sample::from_value(json!({"name": "Jabba", "mass": "1,358", "mass_lb": null}))
                .unwrap();
        writer.write_sample(sample).unwrap();
        assert!(writer.close().unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,mass,mass_lb\nJabba,\"1,358\",\n");
    }

    #[test]
    fn empty_output_still_has_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let writer: Box<dyn Writer> =
            Box::new(CsvWriter::new(&path, vec!["name".to_string()]).unwrap());
        assert!(!writer.close().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name\n");
    }
}

use serde_json::Value;
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("matrix") => {
                write_grid_csv(&mut wtr, result);
            }
            Some(Value::Object(result)) => {
                // Two-column CSV: field, value
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
            _ => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        },
        // Schedules and yearly roll-ups
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Sensitivity matrix: first column holds variable_1, header holds variable_2.
fn write_grid_csv(wtr: &mut StdoutWriter<'_>, result: &serde_json::Map<String, Value>) {
    let corner = format!(
        "{}\\{}",
        result.get("variable_1").map(format_csv_value).unwrap_or_default(),
        result.get("variable_2").map(format_csv_value).unwrap_or_default()
    );
    let columns = array_of(result.get("variable_2_values"));
    let rows = array_of(result.get("variable_1_values"));
    let matrix = array_of(result.get("matrix"));

    let mut header = vec![corner];
    header.extend(columns.iter().map(format_csv_value));
    let _ = wtr.write_record(&header);

    for (label, cells) in rows.iter().zip(matrix) {
        let mut record = vec![format_csv_value(label)];
        record.extend(array_of(Some(cells)).iter().map(format_csv_value));
        let _ = wtr.write_record(&record);
    }
}

fn array_of(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

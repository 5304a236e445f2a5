//! CSV loading for the order-line dataset.
//!
//! Reads the flat export (one row per order line) into an [`OrderDataset`].
//! Columns are looked up by header name, so extra columns and column order
//! do not matter. Any row that cannot be parsed rejects the whole file.

use std::io::Read;
use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::OrderLine;
use dashboard_core::time_utils::parse_timestamp;
use tracing::{debug, info};

use crate::dataset::OrderDataset;

pub const ORDER_ID_COLUMN: &str = "order_id";
pub const TIMESTAMP_COLUMN: &str = "order_purchase_timestamp";
pub const PRICE_COLUMN: &str = "price";
pub const QTY_COLUMN: &str = "qty";

/// Category columns in order of preference.
pub const CATEGORY_COLUMNS: &[&str] = &["product_category_name_english", "product_category_name"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the dataset at `path`.
pub fn load_orders(path: &Path) -> Result<OrderDataset> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = load_orders_from_reader(std::io::BufReader::new(file))?;

    info!(
        "Loaded {} order lines from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any CSV byte source.
pub fn load_orders_from_reader<R: Read>(reader: R) -> Result<OrderDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| malformed_from_csv(&e))?
        .clone();
    let columns = ColumnMap::resolve(&headers)?;
    debug!("Dataset columns: {:?}", headers.iter().collect::<Vec<_>>());

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| malformed_from_csv(&e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(columns.parse_row(&record, line)?);
    }

    Ok(OrderDataset::new(rows))
}

// ── Column resolution ─────────────────────────────────────────────────────────

/// Field positions of the required columns within a record.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    order_id: usize,
    timestamp: usize,
    category: usize,
    price: usize,
    qty: usize,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Option<usize> {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };
        let require =
            |name: &str| find(name).ok_or_else(|| DashboardError::MissingColumn(name.to_string()));

        let category = CATEGORY_COLUMNS
            .iter()
            .find_map(|&name| find(name))
            .ok_or_else(|| DashboardError::MissingColumn(CATEGORY_COLUMNS[0].to_string()))?;

        Ok(Self {
            order_id: require(ORDER_ID_COLUMN)?,
            timestamp: require(TIMESTAMP_COLUMN)?,
            category,
            price: require(PRICE_COLUMN)?,
            qty: require(QTY_COLUMN)?,
        })
    }

    fn parse_row(&self, record: &csv::StringRecord, line: u64) -> Result<OrderLine> {
        let field = |idx: usize| field_at(record, idx);

        let raw_ts = field(self.timestamp);
        let order_purchase_timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
            malformed(line, format!("unparseable {TIMESTAMP_COLUMN} \"{raw_ts}\""))
        })?;

        let raw_price = field(self.price);
        let price = raw_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| malformed(line, format!("unparseable {PRICE_COLUMN} \"{raw_price}\"")))?;

        let raw_qty = field(self.qty);
        let qty = parse_quantity(raw_qty)
            .ok_or_else(|| malformed(line, format!("unparseable {QTY_COLUMN} \"{raw_qty}\"")))?;

        let category = Some(field(self.category))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(OrderLine {
            order_id: field(self.order_id).to_string(),
            order_purchase_timestamp,
            category,
            price,
            qty,
        })
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Field `idx` of `record`, or `""` when the row is too short.
fn field_at(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Whole, non-negative quantity. Accepts float spellings such as `"2.0"`.
fn parse_quantity(s: &str) -> Option<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn malformed(line: u64, message: String) -> DashboardError {
    DashboardError::MalformedInput { line, message }
}

fn malformed_from_csv(e: &csv::Error) -> DashboardError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    malformed(line, e.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "\
,order_id,order_purchase_timestamp,product_category_name,product_category_name_english,price,qty
0,B,2023-02-01 09:30:00,livros,books,20.0,1
1,A,2023-01-05 10:00:00,brinquedos,toys,10.0,2
2,A,2023-01-05 10:00:00,brinquedos,toys,10.0,1
";

    #[test]
    fn test_load_sample_csv() {
        let ds = load_orders_from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.rows()[0];
        assert_eq!(first.order_id, "A");
        assert_eq!(first.category.as_deref(), Some("toys"));
        assert!((first.price - 10.0).abs() < 1e-9);
        assert_eq!(first.qty, 2);
    }

    #[test]
    fn test_rows_sorted_by_timestamp() {
        let ds = load_orders_from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let ids: Vec<&str> = ds.rows().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "A", "B"]);
    }

    #[test]
    fn test_falls_back_to_native_category_column() {
        let csv = "\
order_id,order_purchase_timestamp,product_category_name,price,qty
X,2023-01-05 10:00:00,brinquedos,10.0,1
";
        let ds = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.rows()[0].category.as_deref(), Some("brinquedos"));
    }

    #[test]
    fn test_empty_category_is_missing() {
        let csv = "\
order_id,order_purchase_timestamp,product_category_name_english,price,qty
X,2023-01-05 10:00:00,,10.0,1
";
        let ds = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert!(ds.rows()[0].category.is_none());
    }

    #[test]
    fn test_headers_matched_case_insensitively_with_bom() {
        let csv = "\u{feff}ORDER_ID,Order_Purchase_Timestamp,Product_Category_Name_English,Price,QTY\n\
                   X,2023-01-05 10:00:00,toys,1.5,3\n";
        let ds = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.rows()[0].order_id, "X");
        assert_eq!(ds.rows()[0].qty, 3);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "order_id,order_purchase_timestamp,product_category_name,qty\n";
        let err = load_orders_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == "price"));
    }

    #[test]
    fn test_missing_category_column_is_reported() {
        let csv = "order_id,order_purchase_timestamp,price,qty\n";
        let err = load_orders_from_reader(csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, DashboardError::MissingColumn(ref c) if c == "product_category_name_english")
        );
    }

    #[test]
    fn test_bad_timestamp_rejects_whole_load() {
        let csv = "\
order_id,order_purchase_timestamp,product_category_name_english,price,qty
X,2023-01-05 10:00:00,toys,10.0,1
Y,not-a-date,toys,10.0,1
";
        let err = load_orders_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            DashboardError::MalformedInput { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("not-a-date"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_price_is_malformed() {
        let csv = "\
order_id,order_purchase_timestamp,product_category_name_english,price,qty
X,2023-01-05 10:00:00,toys,ten,1
";
        let err = load_orders_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let csv = "\
order_id,order_purchase_timestamp,product_category_name_english,price,qty
X,2023-01-05 10:00:00
";
        let err = load_orders_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedInput { .. }));
    }

    #[test]
    fn test_parse_quantity_variants() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity("2.0"), Some(2));
        assert_eq!(parse_quantity("0"), Some(0));
        assert_eq!(parse_quantity("1.5"), None);
        assert_eq!(parse_quantity("-1"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_load_orders_from_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE_CSV.as_bytes()).expect("write");

        let ds = load_orders(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_load_orders_missing_file() {
        let err = load_orders(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_dataset() {
        let csv = "order_id,order_purchase_timestamp,product_category_name_english,price,qty\n";
        let ds = load_orders_from_reader(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
    }
}

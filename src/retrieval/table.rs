//! Decoded tables
//!
//! Each object decodes into a [`Table`]: an ordered column list plus rows
//! stored as tagged maps (column name -> JSON value). Tables decoded from
//! different objects may have different columns; a row that lacks a column
//! simply has no entry for it.

use std::sync::Arc;

use arrow::array::{make_array, ArrayRef};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::json::ArrayWriter;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value};

/// A single tagged row
pub type Row = Map<String, Value>;

/// An in-memory table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Decode Parquet bytes into a [`Table`].
///
/// Errors are returned as plain messages; the caller decides whether the
/// object is skipped or the failure surfaces.
pub fn decode_parquet(data: Bytes) -> Result<Table, String> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(data).map_err(|e| e.to_string())?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let reader = builder.build().map_err(|e| e.to_string())?;
    let batches = reader
        .collect::<Result<Vec<RecordBatch>, _>>()
        .map_err(|e| e.to_string())?;

    let rows = batches_to_rows(&batches)?;
    Ok(Table::new(columns, rows))
}

fn batches_to_rows(batches: &[RecordBatch]) -> Result<Vec<Row>, String> {
    if batches.iter().all(|b| b.num_rows() == 0) {
        return Ok(Vec::new());
    }

    let batches = batches
        .iter()
        .map(drop_timezones)
        .collect::<Result<Vec<_>, _>>()?;

    let mut writer = ArrayWriter::new(Vec::new());
    let refs: Vec<&RecordBatch> = batches.iter().collect();
    writer.write_batches(&refs).map_err(|e| e.to_string())?;
    writer.finish().map_err(|e| e.to_string())?;

    serde_json::from_slice(&writer.into_inner()).map_err(|e| e.to_string())
}

/// Relabel zoned timestamp columns as zone-less.
///
/// Arrow timestamp values are UTC instants whatever the zone label, so only
/// the rendering changes: cells come out as naive UTC date-times.
fn drop_timezones(batch: &RecordBatch) -> Result<RecordBatch, String> {
    let schema = batch.schema();
    if !schema
        .fields()
        .iter()
        .any(|f| matches!(f.data_type(), DataType::Timestamp(_, Some(_))))
    {
        return Ok(batch.clone());
    }

    let mut fields: Vec<Field> = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        match field.data_type() {
            DataType::Timestamp(unit, Some(_)) => {
                let target = DataType::Timestamp(*unit, None);
                let data = column
                    .to_data()
                    .into_builder()
                    .data_type(target.clone())
                    .build()
                    .map_err(|e| e.to_string())?;
                columns.push(make_array(data));
                fields.push(field.as_ref().clone().with_data_type(target));
            }
            _ => {
                columns.push(Arc::clone(column));
                fields.push(field.as_ref().clone());
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::test_util::{date_batch, ohlcv_batch, parquet_bytes, timestamp_batch};
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::TimeUnit;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_decode_roundtrip_columns_and_values() {
        let batch = ohlcv_batch(&["2024-03-10T09:15:00Z", "2024-03-10T09:30:00Z"]);
        let table = decode_parquet(parquet_bytes(&batch)).unwrap();

        assert_eq!(table.columns, vec!["timestamp", "close", "volume"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["timestamp"], "2024-03-10T09:15:00Z");
        assert_eq!(table.rows[1]["volume"], 1001);
    }

    #[test]
    fn test_decode_null_cells_are_absent() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("ts", DataType::Utf8, true),
            Field::new("close", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("2024-03-10"), None])),
                Arc::new(Float64Array::from(vec![None, Some(1.5)])),
            ],
        )
        .unwrap();

        let table = decode_parquet(parquet_bytes(&batch)).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows[0].get("close").map_or(true, Value::is_null));
        assert!(table.rows[1].get("ts").map_or(true, Value::is_null));
    }

    #[test]
    fn test_decode_empty_file() {
        let schema = Arc::new(Schema::new(vec![Field::new("volume", DataType::Int64, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(Vec::<i64>::new()))])
            .unwrap();

        let table = decode_parquet(parquet_bytes(&batch)).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("volume"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_parquet(Bytes::from_static(b"definitely not parquet")).is_err());
    }

    #[test]
    fn test_decode_zoned_timestamps_as_naive_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap();
        for tz in [None, Some("UTC"), Some("Asia/Kolkata"), Some("+05:30")] {
            for unit in [TimeUnit::Nanosecond, TimeUnit::Microsecond] {
                let batch = timestamp_batch(unit, tz, &[instant]);
                let table = decode_parquet(parquet_bytes(&batch)).unwrap();

                assert_eq!(table.columns, vec!["timestamp", "close"]);
                assert_eq!(
                    table.rows[0]["timestamp"], "2024-03-10T09:15:00",
                    "tz {:?} unit {:?}",
                    tz, unit
                );
                assert_eq!(table.rows[0]["close"], 100.0);
            }
        }
    }

    #[test]
    fn test_decode_date32() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let table = decode_parquet(parquet_bytes(&date_batch(&[day]))).unwrap();
        assert_eq!(table.rows[0]["date"], "2024-03-10");
    }
}

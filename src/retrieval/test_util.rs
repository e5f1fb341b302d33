//! Fixtures shared by retrieval and API tests.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Array, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
    TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use parquet::arrow::ArrowWriter;

/// `timestamp` (utf8), `close` (f64), `volume` (i64) with one row per timestamp
pub fn ohlcv_batch(timestamps: &[&str]) -> RecordBatch {
    let n = timestamps.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Utf8, true),
        Field::new("close", DataType::Float64, true),
        Field::new("volume", DataType::Int64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(timestamps.to_vec())),
        Arc::new(Float64Array::from((0..n).map(|i| 100.0 + i as f64).collect::<Vec<_>>())),
        Arc::new(Int64Array::from((0..n).map(|i| 1000 + i as i64).collect::<Vec<_>>())),
    ];
    RecordBatch::try_new(schema, columns).expect("valid batch")
}

/// Single utf8 column batch, for schema-drift fixtures
pub fn string_batch(column: &str, values: &[&str]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new(column, DataType::Utf8, true)]));
    RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(values.to_vec()))])
        .expect("valid batch")
}

/// `timestamp` as a native Arrow timestamp (`ns` or `us`, optional zone label)
/// plus `close` (f64)
pub fn timestamp_batch(unit: TimeUnit, tz: Option<&str>, instants: &[DateTime<Utc>]) -> RecordBatch {
    let n = instants.len();
    let tz: Option<Arc<str>> = tz.map(Arc::from);
    let timestamps: ArrayRef = match unit {
        TimeUnit::Nanosecond => Arc::new(
            TimestampNanosecondArray::from(
                instants
                    .iter()
                    .map(|t| t.timestamp_nanos_opt().expect("in nanosecond range"))
                    .collect::<Vec<_>>(),
            )
            .with_timezone_opt(tz.clone()),
        ),
        TimeUnit::Microsecond => Arc::new(
            TimestampMicrosecondArray::from(
                instants.iter().map(|t| t.timestamp_micros()).collect::<Vec<_>>(),
            )
            .with_timezone_opt(tz.clone()),
        ),
        other => panic!("unsupported fixture unit {:?}", other),
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Timestamp(unit, tz), true),
        Field::new("close", DataType::Float64, true),
    ]));
    let close: ArrayRef =
        Arc::new(Float64Array::from((0..n).map(|i| 100.0 + i as f64).collect::<Vec<_>>()));
    RecordBatch::try_new(schema, vec![timestamps, close]).expect("valid batch")
}

/// Single `date` column stored as Date32
pub fn date_batch(days: &[NaiveDate]) -> RecordBatch {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch");
    let values: Vec<i32> = days
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();
    let schema = Arc::new(Schema::new(vec![Field::new("date", DataType::Date32, true)]));
    RecordBatch::try_new(schema, vec![Arc::new(Date32Array::from(values))]).expect("valid batch")
}

pub fn parquet_bytes(batch: &RecordBatch) -> Bytes {
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).expect("writer");
    writer.write(batch).expect("write batch");
    writer.close().expect("close writer");
    Bytes::from(buf)
}

/// Store `data` under a raw key (no percent-encoding applied to the key)
pub async fn put_raw(store: &InMemory, key: &str, data: Bytes) {
    let path = Path::parse(key).expect("valid key");
    store
        .put(&path, PutPayload::from(data))
        .await
        .expect("put object");
}

pub fn memory_store() -> Arc<InMemory> {
    Arc::new(InMemory::new())
}

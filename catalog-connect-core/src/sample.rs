//! Data samples collected from source datasets.

use crate::reference::ItemIdentifier;
use crate::validation;
use crate::{ConnectorError, ConnectorResult};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::Write as _;

const BINARY_PREVIEW_LENGTH: usize = 5;
const INVALID_JSON: &str = "<Invalid JSON>";
const UNKNOWN: &str = "<Unknown>";

/// A single cell of a data sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Null,
    /// A value the connector could not represent
    Unknown,
    String(String),
    Boolean(bool),
    Long(i64),
    Double(f64),
    /// Raw bytes; only the total size and the first few bytes are kept.
    Binary { size: usize, head: Vec<u8> },
    Date(NaiveDate),
    Time(NaiveTime),
    Instant(DateTime<Utc>),
    Json(serde_json::Value),
    List(Vec<SampleValue>),
    /// Named members, serialized in insertion order.
    Struct(Vec<(String, SampleValue)>),
}

impl SampleValue {
    pub fn binary(bytes: &[u8]) -> Self {
        SampleValue::Binary {
            size: bytes.len(),
            head: bytes.iter().take(BINARY_PREVIEW_LENGTH).copied().collect(),
        }
    }

    /// Parse a JSON document; unparseable input becomes the `<Invalid JSON>` marker.
    pub fn json(document: &str) -> Self {
        match serde_json::from_str(document) {
            Ok(value) => SampleValue::Json(value),
            Err(_) => SampleValue::String(INVALID_JSON.to_string()),
        }
    }

    pub fn list(values: impl IntoIterator<Item = SampleValue>) -> Self {
        SampleValue::List(values.into_iter().collect())
    }

    pub fn structure<K: Into<String>>(members: impl IntoIterator<Item = (K, SampleValue)>) -> Self {
        SampleValue::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    fn binary_preview(size: usize, head: &[u8]) -> String {
        let mut out = format!("Binary ({} bytes) [", size);
        for (i, byte) in head.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "0x{:02x}", byte);
        }
        if size > BINARY_PREVIEW_LENGTH {
            out.push_str(", ...");
        }
        out.push(']');
        out
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SampleValue::Null => serializer.serialize_none(),
            SampleValue::Unknown => serializer.serialize_str(UNKNOWN),
            SampleValue::String(s) => serializer.serialize_str(s),
            SampleValue::Boolean(b) => serializer.serialize_bool(*b),
            SampleValue::Long(n) => serializer.serialize_i64(*n),
            SampleValue::Double(n) => serializer.serialize_f64(*n),
            SampleValue::Binary { size, head } => {
                serializer.serialize_str(&Self::binary_preview(*size, head))
            }
            SampleValue::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            SampleValue::Time(t) => {
                serializer.serialize_str(&t.format("%H:%M:%S%.f").to_string())
            }
            SampleValue::Instant(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            SampleValue::Json(value) => value.serialize(serializer),
            SampleValue::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            SampleValue::Struct(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (name, value) in members {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for SampleValue {
    fn from(value: &str) -> Self {
        SampleValue::String(value.to_string())
    }
}

impl From<String> for SampleValue {
    fn from(value: String) -> Self {
        SampleValue::String(value)
    }
}

impl From<bool> for SampleValue {
    fn from(value: bool) -> Self {
        SampleValue::Boolean(value)
    }
}

macro_rules! sample_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for SampleValue {
            fn from(value: $t) -> Self {
                SampleValue::Long(i64::from(value))
            }
        })*
    };
}

sample_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for SampleValue {
    fn from(value: f32) -> Self {
        SampleValue::Double(f64::from(value))
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        SampleValue::Double(value)
    }
}

impl From<NaiveDate> for SampleValue {
    fn from(value: NaiveDate) -> Self {
        SampleValue::Date(value)
    }
}

impl From<NaiveTime> for SampleValue {
    fn from(value: NaiveTime) -> Self {
        SampleValue::Time(value)
    }
}

impl From<DateTime<Utc>> for SampleValue {
    fn from(value: DateTime<Utc>) -> Self {
        SampleValue::Instant(value)
    }
}

impl<T: Into<SampleValue>> From<Option<T>> for SampleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SampleValue::Null, Into::into)
    }
}

/// Rows of values sampled from a dataset, one column per field identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSample {
    fields: Vec<ItemIdentifier>,
    samples: Vec<Vec<SampleValue>>,
}

impl DataSample {
    pub fn builder(fields: impl IntoIterator<Item = ItemIdentifier>) -> DataSampleBuilder {
        DataSampleBuilder {
            fields: fields.into_iter().collect(),
            samples: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[ItemIdentifier] {
        &self.fields
    }

    pub fn samples(&self) -> &[Vec<SampleValue>] {
        &self.samples
    }

    /// Render as `{"fields":[...],"samples":[[...],...]}`.
    pub fn to_json(&self) -> ConnectorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct DataSampleBuilder {
    fields: Vec<ItemIdentifier>,
    samples: Vec<Vec<SampleValue>>,
}

impl DataSampleBuilder {
    /// Append a row; it must hold exactly one value per field.
    pub fn add_row<V>(mut self, row: impl IntoIterator<Item = V>) -> ConnectorResult<Self>
    where
        V: Into<SampleValue>,
    {
        let row: Vec<SampleValue> = row.into_iter().map(Into::into).collect();
        if row.len() != self.fields.len() {
            return Err(ConnectorError::invalid_data(format!(
                "sample row {} has {} values but {} fields are declared",
                self.samples.len(),
                row.len(),
                self.fields.len()
            )));
        }
        self.samples.push(row);
        Ok(self)
    }

    pub fn build(self) -> ConnectorResult<DataSample> {
        validation::non_empty_list("fields", &self.fields)?;
        Ok(DataSample {
            fields: self.fields,
            samples: self.samples,
        })
    }
}

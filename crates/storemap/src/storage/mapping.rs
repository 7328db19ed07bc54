//! Immutable type-mapping descriptors.

use chrono::Timelike;

use crate::model::types::LogicalType;

use super::converter::ValueConverter;
use super::value::Value;

/// Literal-rendering rule for a concrete store type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralFormat {
    /// Rendered bare, e.g. `42`.
    Plain,
    /// Rendered single-quoted with embedded quotes doubled.
    Quoted,
    /// Rendered as a hex blob, e.g. `0xDEADBEEF`.
    Hex,
    /// Rendered as `TIMESTAMP 'YYYY-MM-DD HH:MM:SS.fff...'` with a fixed
    /// number of fractional-second digits.
    Timestamp { digits: u8 },
}

/// Immutable descriptor telling the storage layer how to encode, decode,
/// and render values of one logical type for one concrete store type.
///
/// Never mutated: [`with_facets`](Self::with_facets) and
/// [`with_converter`](Self::with_converter) return new instances. A
/// mapping with a non-empty converter chain exposes the outermost
/// converter's source type while the physically stored type is the
/// innermost chain target.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    logical_type: LogicalType,
    store_type: String,
    size: Option<i32>,
    literal_format: LiteralFormat,
    /// Converter chain, outermost first.
    converters: Vec<ValueConverter>,
}

impl TypeMapping {
    /// Create a direct mapping with no converters.
    pub fn new(
        logical_type: LogicalType,
        store_type: impl Into<String>,
        literal_format: LiteralFormat,
    ) -> Self {
        Self {
            logical_type,
            store_type: store_type.into(),
            size: None,
            literal_format,
            converters: Vec::new(),
        }
    }

    /// Attach a size facet (builder form, used by providers).
    #[must_use]
    pub fn with_size(mut self, size: Option<i32>) -> Self {
        self.size = size;
        self
    }

    /// The application-facing type this mapping exposes.
    pub fn logical_type(&self) -> &LogicalType {
        &self.logical_type
    }

    /// The concrete store type name, e.g. `"nvarchar(450)"`.
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// The configured size facet, if any.
    pub fn size(&self) -> Option<i32> {
        self.size
    }

    /// The literal-rendering rule for this store type.
    pub fn literal_format(&self) -> &LiteralFormat {
        &self.literal_format
    }

    /// The converter chain, outermost (application-facing) first.
    pub fn converters(&self) -> &[ValueConverter] {
        &self.converters
    }

    /// The type physically written to the store: the innermost converter
    /// target, or the exposed type when the chain is empty.
    pub fn store_logical_type(&self) -> &LogicalType {
        self.converters
            .last()
            .map(ValueConverter::target)
            .unwrap_or(&self.logical_type)
    }

    /// Copy this mapping with a different store type and size.
    #[must_use]
    pub fn with_facets(&self, store_type: impl Into<String>, size: Option<i32>) -> Self {
        let mut clone = self.clone();
        clone.store_type = store_type.into();
        clone.size = size;
        clone
    }

    /// Copy this mapping with `converter` stacked on the outside.
    ///
    /// The new mapping exposes the converter's source type; on write the
    /// added converter runs first, then the existing chain.
    #[must_use]
    pub fn with_converter(&self, converter: ValueConverter) -> Self {
        let mut clone = self.clone();
        clone.logical_type = converter.source().clone();
        clone.converters.insert(0, converter);
        clone
    }

    /// Run the converter chain on write: exposed type down to the store
    /// representation.
    pub fn encode(&self, value: &Value) -> Value {
        let mut current = value.clone();
        for converter in &self.converters {
            current = converter.encode(&current);
        }
        current
    }

    /// Run the converter chain in reverse on read.
    pub fn decode(&self, value: &Value) -> Value {
        let mut current = value.clone();
        for converter in self.converters.iter().rev() {
            current = converter.decode(&current);
        }
        current
    }

    /// Render a value as a store literal, encoding it through the chain
    /// first.
    pub fn literal(&self, value: &Value) -> String {
        let stored = self.encode(value);
        if stored.is_null() {
            return "NULL".to_string();
        }
        match &self.literal_format {
            LiteralFormat::Plain => render_plain(&stored),
            LiteralFormat::Quoted => format!("'{}'", render_plain(&stored).replace('\'', "''")),
            LiteralFormat::Hex => render_hex(&stored),
            LiteralFormat::Timestamp { digits } => render_timestamp(&stored, *digits),
        }
    }
}

fn render_plain(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::UInt8(x) => x.to_string(),
        Value::Int16(x) => x.to_string(),
        Value::Int32(x) => x.to_string(),
        Value::Int64(x) => x.to_string(),
        Value::Float32(x) => x.to_string(),
        Value::Float64(x) => x.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Text(s) => s.clone(),
        Value::Bytes(b) => render_hex(&Value::Bytes(b.clone())),
        Value::Uuid(u) => u.hyphenated().to_string(),
        Value::DateTime(dt) => dt.to_string(),
        Value::DateTimeOffset(dt) => dt.to_string(),
        Value::Date(d) => d.to_string(),
        Value::Time(t) => t.to_string(),
    }
}

fn render_hex(value: &Value) -> String {
    match value {
        Value::Bytes(bytes) => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("0x");
            for b in bytes {
                out.push_str(&format!("{b:02X}"));
            }
            out
        }
        other => render_plain(other),
    }
}

/// Render `TIMESTAMP 'YYYY-MM-DD HH:MM:SS.f…'` with exactly `digits`
/// fractional digits (sub-second precision in 100ns units for the
/// default seven digits).
fn render_timestamp(value: &Value, digits: u8) -> String {
    let (naive, offset) = match value {
        Value::DateTime(dt) => (*dt, None),
        Value::DateTimeOffset(dt) => (dt.naive_local(), Some(*dt.offset())),
        other => return format!("'{}'", render_plain(other)),
    };
    let digits = digits.min(9) as u32;
    let mut literal = if digits == 0 {
        format!("TIMESTAMP '{}", naive.format("%Y-%m-%d %H:%M:%S"))
    } else {
        let fraction = naive.nanosecond() / 10u32.pow(9 - digits);
        format!(
            "TIMESTAMP '{}.{:0width$}",
            naive.format("%Y-%m-%d %H:%M:%S"),
            fraction,
            width = digits as usize
        )
    };
    if let Some(offset) = offset {
        literal.push_str(&offset.to_string());
    }
    literal.push('\'');
    literal
}

//! Reversible value converters and the converter selection strategy.
//!
//! A [`ValueConverter`] bridges two logical types with a pair of
//! encode/decode closures. The engine never inspects values at runtime to
//! pick one; instead a [`ConverterSelector`] returns an ordered, finite
//! list of [`ConverterCandidate`]s and the resolver tries them strictly
//! in that order, stopping at the first that reaches a store mapping.
//!
//! # Design Rationale
//!
//! - **No global state**: converters live in an explicitly constructed
//!   selector, registered in priority order.
//! - **Restartable selection**: every `select` call returns an
//!   independently owned snapshot, safe for concurrent callers.
//! - **Lazy construction**: candidates carry a factory; the converter is
//!   only built once a candidate actually wins.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::model::types::LogicalType;

use super::value::Value;

type ConvertFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A reversible transform between two logical types.
///
/// `encode` runs on write (source → target), `decode` on read
/// (target → source). For every value `x` a converter accepts,
/// `decode(encode(x)) == x` must hold. Decoding a stored value the
/// converter cannot interpret (unparseable text, out-of-range numbers,
/// malformed byte slices) yields [`Value::Null`]; callers cannot
/// distinguish that from a stored NULL, so the round-trip guarantee
/// covers accepted values only.
#[derive(Clone)]
pub struct ValueConverter {
    source: LogicalType,
    target: LogicalType,
    encode: ConvertFn,
    decode: ConvertFn,
}

impl ValueConverter {
    /// Create a converter from an encode/decode closure pair.
    pub fn new(
        source: LogicalType,
        target: LogicalType,
        encode: impl Fn(&Value) -> Value + Send + Sync + 'static,
        decode: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            target,
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// The exposed (application-facing) type.
    pub fn source(&self) -> &LogicalType {
        &self.source
    }

    /// The type this converter produces on write.
    pub fn target(&self) -> &LogicalType {
        &self.target
    }

    /// Transform a value for storage.
    pub fn encode(&self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        (self.encode)(value)
    }

    /// Transform a stored value back to the exposed type.
    pub fn decode(&self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        (self.decode)(value)
    }
}

impl std::fmt::Debug for ValueConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValueConverter({} -> {})", self.source, self.target)
    }
}

/// A candidate conversion offered by a [`ConverterSelector`].
///
/// Carries the source/target pair, optional facet hints the rebased
/// mapping key should pick up (e.g. a UUID rendered as text needs 36
/// characters), and a factory that builds the converter on demand.
#[derive(Clone)]
pub struct ConverterCandidate {
    source: LogicalType,
    target: LogicalType,
    size_hint: Option<i32>,
    precision_hint: Option<i32>,
    scale_hint: Option<i32>,
    factory: Arc<dyn Fn() -> ValueConverter + Send + Sync>,
}

impl ConverterCandidate {
    /// Create a candidate with a lazy converter factory.
    pub fn new(
        source: LogicalType,
        target: LogicalType,
        factory: impl Fn() -> ValueConverter + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            target,
            size_hint: None,
            precision_hint: None,
            scale_hint: None,
            factory: Arc::new(factory),
        }
    }

    /// Attach a size facet hint for the converted representation.
    #[must_use]
    pub fn with_size_hint(mut self, size: i32) -> Self {
        self.size_hint = Some(size);
        self
    }

    /// Attach precision/scale facet hints for the converted representation.
    #[must_use]
    pub fn with_precision_hint(mut self, precision: i32, scale: i32) -> Self {
        self.precision_hint = Some(precision);
        self.scale_hint = Some(scale);
        self
    }

    pub fn source(&self) -> &LogicalType {
        &self.source
    }

    pub fn target(&self) -> &LogicalType {
        &self.target
    }

    pub fn size_hint(&self) -> Option<i32> {
        self.size_hint
    }

    pub fn precision_hint(&self) -> Option<i32> {
        self.precision_hint
    }

    pub fn scale_hint(&self) -> Option<i32> {
        self.scale_hint
    }

    /// Build the converter this candidate describes.
    pub fn build(&self) -> ValueConverter {
        (self.factory)()
    }
}

impl std::fmt::Debug for ConverterCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConverterCandidate({} -> {})", self.source, self.target)
    }
}

/// Ordered-strategy capability returning candidate converters.
///
/// - `select(Some(src), Some(tgt))`: candidates converting from `src`,
///   with exact `src -> tgt` matches promoted to the front.
/// - `select(Some(src), None)`: all candidates converting from `src`.
/// - `select(None, Some(tgt))`: source-agnostic; all candidates
///   converting *into* `tgt` (used by the second-level search when only
///   a provider type override is known).
///
/// Ordering otherwise reflects registration priority. Each call returns
/// an independently owned vector, so concurrent callers never share
/// iteration state.
pub trait ConverterSelector: Send + Sync {
    fn select(
        &self,
        source: Option<&LogicalType>,
        target: Option<&LogicalType>,
    ) -> Vec<ConverterCandidate>;
}

/// Registry-backed selector with the built-in reversible conversions.
///
/// Registration order is priority order: exact numeric widenings first,
/// structured representations next, to-text fallbacks last.
pub struct DefaultConverterSelector {
    entries: Vec<ConverterCandidate>,
}

impl DefaultConverterSelector {
    /// Create a selector with no registered conversions.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a candidate. Later registrations have lower priority.
    pub fn register(&mut self, candidate: ConverterCandidate) {
        self.entries.push(candidate);
    }
}

impl Default for DefaultConverterSelector {
    fn default() -> Self {
        let mut selector = Self::empty();

        // Exact numeric widenings.
        selector.register(widening(LogicalType::UInt8, LogicalType::Int16));
        selector.register(widening(LogicalType::UInt8, LogicalType::Int32));
        selector.register(widening(LogicalType::Int16, LogicalType::Int32));
        selector.register(widening(LogicalType::Int16, LogicalType::Int64));
        selector.register(widening(LogicalType::Int32, LogicalType::Int64));
        selector.register(ConverterCandidate::new(
            LogicalType::Float32,
            LogicalType::Float64,
            || {
                ValueConverter::new(
                    LogicalType::Float32,
                    LogicalType::Float64,
                    |v| match v {
                        Value::Float32(x) => Value::Float64(f64::from(*x)),
                        other => other.clone(),
                    },
                    |v| match v {
                        Value::Float64(x) => {
                            let narrowed = *x as f32;
                            if narrowed.is_finite() || !x.is_finite() {
                                Value::Float32(narrowed)
                            } else {
                                Value::Null
                            }
                        }
                        other => other.clone(),
                    },
                )
            },
        ));

        // Bool as a stored integer.
        selector.register(ConverterCandidate::new(
            LogicalType::Bool,
            LogicalType::Int32,
            || {
                ValueConverter::new(
                    LogicalType::Bool,
                    LogicalType::Int32,
                    |v| match v {
                        Value::Bool(b) => Value::Int32(i32::from(*b)),
                        other => other.clone(),
                    },
                    |v| match v {
                        Value::Int32(i) => Value::Bool(*i != 0),
                        other => other.clone(),
                    },
                )
            },
        ));

        // Structured representations.
        selector.register(
            ConverterCandidate::new(LogicalType::Uuid, LogicalType::String, || {
                ValueConverter::new(
                    LogicalType::Uuid,
                    LogicalType::String,
                    |v| match v {
                        Value::Uuid(u) => Value::Text(u.hyphenated().to_string()),
                        other => other.clone(),
                    },
                    |v| match v {
                        Value::Text(s) => s
                            .parse::<Uuid>()
                            .map(Value::Uuid)
                            .unwrap_or(Value::Null),
                        other => other.clone(),
                    },
                )
            })
            .with_size_hint(36),
        );
        selector.register(
            ConverterCandidate::new(LogicalType::Uuid, LogicalType::Bytes, || {
                ValueConverter::new(
                    LogicalType::Uuid,
                    LogicalType::Bytes,
                    |v| match v {
                        Value::Uuid(u) => Value::Bytes(u.as_bytes().to_vec()),
                        other => other.clone(),
                    },
                    |v| match v {
                        Value::Bytes(b) => Uuid::from_slice(b)
                            .map(Value::Uuid)
                            .unwrap_or(Value::Null),
                        other => other.clone(),
                    },
                )
            })
            .with_size_hint(16),
        );
        selector.register(ConverterCandidate::new(
            LogicalType::DateTime,
            LogicalType::Int64,
            || {
                ValueConverter::new(
                    LogicalType::DateTime,
                    LogicalType::Int64,
                    |v| match v {
                        Value::DateTime(dt) => Value::Int64(dt.and_utc().timestamp_micros()),
                        other => other.clone(),
                    },
                    |v| match v {
                        Value::Int64(us) => chrono::DateTime::from_timestamp_micros(*us)
                            .map(|dt| Value::DateTime(dt.naive_utc()))
                            .unwrap_or(Value::Null),
                        other => other.clone(),
                    },
                )
            },
        ));
        selector.register(
            ConverterCandidate::new(LogicalType::Char, LogicalType::String, || {
                ValueConverter::new(
                    LogicalType::Char,
                    LogicalType::String,
                    |v| match v {
                        Value::Text(s) => Value::Text(s.clone()),
                        other => other.clone(),
                    },
                    |v| v.clone(),
                )
            })
            .with_size_hint(1),
        );

        // To-text fallbacks, lowest priority.
        selector.register(text_fallback(LogicalType::Int32, |v| match v {
            Value::Text(s) => s.parse().map(Value::Int32).unwrap_or(Value::Null),
            other => other.clone(),
        }));
        selector.register(text_fallback(LogicalType::Int64, |v| match v {
            Value::Text(s) => s.parse().map(Value::Int64).unwrap_or(Value::Null),
            other => other.clone(),
        }));
        selector.register(text_fallback(LogicalType::Float64, |v| match v {
            Value::Text(s) => s.parse().map(Value::Float64).unwrap_or(Value::Null),
            other => other.clone(),
        }));
        selector.register(text_fallback(LogicalType::Decimal, |v| match v {
            Value::Text(s) => s.parse::<Decimal>().map(Value::Decimal).unwrap_or(Value::Null),
            other => other.clone(),
        }));
        selector.register(text_fallback(LogicalType::Bool, |v| match v {
            Value::Text(s) => match s.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::Null,
            },
            other => other.clone(),
        }));

        selector
    }
}

impl ConverterSelector for DefaultConverterSelector {
    fn select(
        &self,
        source: Option<&LogicalType>,
        target: Option<&LogicalType>,
    ) -> Vec<ConverterCandidate> {
        match (source, target) {
            (Some(src), Some(tgt)) => {
                let mut exact = Vec::new();
                let mut rest = Vec::new();
                for entry in self.entries.iter().filter(|e| e.source() == src) {
                    if entry.target() == tgt {
                        exact.push(entry.clone());
                    } else {
                        rest.push(entry.clone());
                    }
                }
                exact.extend(rest);
                exact
            }
            (Some(src), None) => self
                .entries
                .iter()
                .filter(|e| e.source() == src)
                .cloned()
                .collect(),
            (None, Some(tgt)) => self
                .entries
                .iter()
                .filter(|e| e.target() == tgt)
                .cloned()
                .collect(),
            (None, None) => Vec::new(),
        }
    }
}

fn widening(source: LogicalType, target: LogicalType) -> ConverterCandidate {
    let (src, tgt) = (source.clone(), target.clone());
    ConverterCandidate::new(source, target, move || {
        let tgt_for_encode = tgt.clone();
        let src_for_decode = src.clone();
        ValueConverter::new(
            src.clone(),
            tgt.clone(),
            move |v| narrow_or_widen(v, &tgt_for_encode),
            move |v| narrow_or_widen(v, &src_for_decode),
        )
    })
}

/// Coerce an integer value into the exact integer variant for `ty`.
/// Values outside the narrower type's range decode to `Value::Null`.
fn narrow_or_widen(value: &Value, ty: &LogicalType) -> Value {
    let as_i64 = match value {
        Value::UInt8(x) => i64::from(*x),
        Value::Int16(x) => i64::from(*x),
        Value::Int32(x) => i64::from(*x),
        Value::Int64(x) => *x,
        other => return other.clone(),
    };
    match ty {
        LogicalType::UInt8 => u8::try_from(as_i64).map(Value::UInt8).unwrap_or(Value::Null),
        LogicalType::Int16 => i16::try_from(as_i64)
            .map(Value::Int16)
            .unwrap_or(Value::Null),
        LogicalType::Int32 => i32::try_from(as_i64)
            .map(Value::Int32)
            .unwrap_or(Value::Null),
        LogicalType::Int64 => Value::Int64(as_i64),
        _ => value.clone(),
    }
}

fn text_fallback(
    source: LogicalType,
    decode: impl Fn(&Value) -> Value + Send + Sync + Clone + 'static,
) -> ConverterCandidate {
    let src = source.clone();
    ConverterCandidate::new(source, LogicalType::String, move || {
        let decode = decode.clone();
        ValueConverter::new(
            src.clone(),
            LogicalType::String,
            |v| match v {
                Value::Bool(b) => Value::Text(b.to_string()),
                Value::Int32(x) => Value::Text(x.to_string()),
                Value::Int64(x) => Value::Text(x.to_string()),
                Value::Float64(x) => Value::Text(x.to_string()),
                Value::Decimal(d) => Value::Text(d.to_string()),
                other => other.clone(),
            },
            move |v| decode(v),
        )
    })
}

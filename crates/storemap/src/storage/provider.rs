//! Provider-specific direct primitive lookup.
//!
//! A [`MappingProvider`] answers the question the resolver cannot answer
//! generically: does this store have a native type for this request? It
//! works both type-first (logical type plus facets → store type string)
//! and store-name-first (`"nvarchar(450)"` → logical type plus facets).

use crate::config::ProviderConfig;
use crate::model::types::LogicalType;

use super::key::MappingKey;
use super::mapping::{LiteralFormat, TypeMapping};

/// Direct primitive lookup for one concrete store.
///
/// Implementations map a key with no unresolved facets straight to a
/// store type, or return `None` so the resolver can try converter
/// composition. A miss is not an error.
pub trait MappingProvider: Send + Sync {
    /// Provider identifier, e.g. `"sqlserver"`.
    fn name(&self) -> &str;

    /// Find a direct mapping for the key, or `None`.
    fn find_mapping(&self, key: &MappingKey) -> Option<TypeMapping>;
}

/// SQL-Server-flavored provider covering the standard primitive types.
#[derive(Debug, Clone, Default)]
pub struct SqlProvider {
    config: ProviderConfig,
}

impl SqlProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn timestamp_format(&self) -> LiteralFormat {
        LiteralFormat::Timestamp {
            digits: self.config.timestamp_literal_digits,
        }
    }

    fn find_by_type(&self, ty: &LogicalType, key: &MappingKey) -> Option<TypeMapping> {
        let mapping = match ty.unwrap_optional() {
            LogicalType::Bool => TypeMapping::new(LogicalType::Bool, "bit", LiteralFormat::Plain),
            LogicalType::UInt8 => {
                TypeMapping::new(LogicalType::UInt8, "tinyint", LiteralFormat::Plain)
            }
            LogicalType::Int16 => {
                TypeMapping::new(LogicalType::Int16, "smallint", LiteralFormat::Plain)
            }
            LogicalType::Int32 => TypeMapping::new(LogicalType::Int32, "int", LiteralFormat::Plain),
            LogicalType::Int64 => {
                TypeMapping::new(LogicalType::Int64, "bigint", LiteralFormat::Plain)
            }
            LogicalType::Float32 => {
                TypeMapping::new(LogicalType::Float32, "real", LiteralFormat::Plain)
            }
            LogicalType::Float64 => {
                TypeMapping::new(LogicalType::Float64, "float", LiteralFormat::Plain)
            }
            LogicalType::Decimal => {
                let precision = key
                    .precision
                    .unwrap_or(self.config.default_decimal_precision);
                let scale = key.scale.unwrap_or(self.config.default_decimal_scale);
                TypeMapping::new(
                    LogicalType::Decimal,
                    format!("decimal({precision},{scale})"),
                    LiteralFormat::Plain,
                )
            }
            LogicalType::Char => {
                TypeMapping::new(LogicalType::Char, "nchar(1)", LiteralFormat::Quoted)
                    .with_size(Some(1))
            }
            LogicalType::String => self.string_mapping(key),
            LogicalType::Bytes => self.bytes_mapping(key),
            LogicalType::DateTime => {
                TypeMapping::new(LogicalType::DateTime, "datetime2", self.timestamp_format())
            }
            LogicalType::DateTimeOffset => TypeMapping::new(
                LogicalType::DateTimeOffset,
                "datetimeoffset",
                self.timestamp_format(),
            ),
            LogicalType::Date => TypeMapping::new(LogicalType::Date, "date", LiteralFormat::Quoted),
            LogicalType::Time => TypeMapping::new(LogicalType::Time, "time", LiteralFormat::Quoted),
            LogicalType::Uuid => TypeMapping::new(
                LogicalType::Uuid,
                "uniqueidentifier",
                LiteralFormat::Quoted,
            ),
            // Model-level and collection types never map to a primitive.
            LogicalType::Optional(_)
            | LogicalType::Sequence(_)
            | LogicalType::Structural(_)
            | LogicalType::Interface(_) => return None,
        };
        Some(mapping)
    }

    fn string_mapping(&self, key: &MappingKey) -> TypeMapping {
        let unicode = key.unicode.unwrap_or(self.config.unicode_by_default);
        let fixed = key.fixed_length.unwrap_or(false);
        let size = key.size.or_else(|| {
            key.key_or_index.then(|| {
                if unicode {
                    self.config.key_string_size_unicode
                } else {
                    self.config.key_string_size_ansi
                }
            })
        });
        let size = size.filter(|n| *n > 0 && *n <= self.config.max_string_size);

        let base = match (unicode, fixed && size.is_some()) {
            (true, true) => "nchar",
            (true, false) => "nvarchar",
            (false, true) => "char",
            (false, false) => "varchar",
        };
        let store_type = match size {
            Some(n) => format!("{base}({n})"),
            None => format!("{base}(max)"),
        };
        TypeMapping::new(LogicalType::String, store_type, LiteralFormat::Quoted).with_size(size)
    }

    fn bytes_mapping(&self, key: &MappingKey) -> TypeMapping {
        if key.row_version.unwrap_or(false) {
            return TypeMapping::new(LogicalType::Bytes, "rowversion", LiteralFormat::Hex)
                .with_size(Some(8));
        }
        let size = key.size.filter(|n| *n > 0 && *n <= self.config.max_string_size);
        let store_type = match size {
            Some(n) => format!("varbinary({n})"),
            None => "varbinary(max)".to_string(),
        };
        TypeMapping::new(LogicalType::Bytes, store_type, LiteralFormat::Hex).with_size(size)
    }

    fn find_by_store_type(&self, name: &str) -> Option<TypeMapping> {
        let parsed = parse_store_type(name)?;
        let mapping = match parsed.base.as_str() {
            "bit" => TypeMapping::new(LogicalType::Bool, name, LiteralFormat::Plain),
            "tinyint" => TypeMapping::new(LogicalType::UInt8, name, LiteralFormat::Plain),
            "smallint" => TypeMapping::new(LogicalType::Int16, name, LiteralFormat::Plain),
            "int" | "integer" => TypeMapping::new(LogicalType::Int32, name, LiteralFormat::Plain),
            "bigint" => TypeMapping::new(LogicalType::Int64, name, LiteralFormat::Plain),
            "real" => TypeMapping::new(LogicalType::Float32, name, LiteralFormat::Plain),
            "float" | "double precision" => {
                TypeMapping::new(LogicalType::Float64, name, LiteralFormat::Plain)
            }
            "decimal" | "numeric" => {
                TypeMapping::new(LogicalType::Decimal, name, LiteralFormat::Plain)
            }
            "nvarchar" | "varchar" | "nchar" | "char" => {
                TypeMapping::new(LogicalType::String, name, LiteralFormat::Quoted)
                    .with_size(parsed.size)
            }
            "varbinary" | "binary" => {
                TypeMapping::new(LogicalType::Bytes, name, LiteralFormat::Hex)
                    .with_size(parsed.size)
            }
            "rowversion" => {
                TypeMapping::new(LogicalType::Bytes, name, LiteralFormat::Hex).with_size(Some(8))
            }
            "datetime2" | "datetime" | "smalldatetime" => {
                TypeMapping::new(LogicalType::DateTime, name, self.timestamp_format())
            }
            "datetimeoffset" => {
                TypeMapping::new(LogicalType::DateTimeOffset, name, self.timestamp_format())
            }
            "date" => TypeMapping::new(LogicalType::Date, name, LiteralFormat::Quoted),
            "time" => TypeMapping::new(LogicalType::Time, name, LiteralFormat::Quoted),
            "uniqueidentifier" => {
                TypeMapping::new(LogicalType::Uuid, name, LiteralFormat::Quoted)
            }
            _ => return None,
        };
        Some(mapping)
    }
}

impl MappingProvider for SqlProvider {
    fn name(&self) -> &str {
        "sqlserver"
    }

    fn find_mapping(&self, key: &MappingKey) -> Option<TypeMapping> {
        if let Some(store_type) = &key.store_type_name {
            let named = self.find_by_store_type(store_type)?;
            // A named store type must agree with the requested logical
            // type; a mismatch forces the converter search instead.
            return match &key.logical_type {
                None => Some(named),
                Some(ty) if ty.unwrap_optional() == named.logical_type() => Some(named),
                Some(_) => None,
            };
        }
        let ty = key.logical_type.as_ref()?;
        self.find_by_type(ty, key)
    }
}

struct ParsedStoreType {
    base: String,
    size: Option<i32>,
}

/// Parse `"name"`, `"name(n)"`, `"name(max)"`, or `"name(p,s)"`.
fn parse_store_type(raw: &str) -> Option<ParsedStoreType> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (base, args) = match raw.find('(') {
        Some(open) => {
            let close = raw.rfind(')')?;
            if close < open {
                return None;
            }
            (&raw[..open], Some(&raw[open + 1..close]))
        }
        None => (raw, None),
    };
    let base = base.trim().to_lowercase();
    let size = match args.map(str::trim) {
        None => None,
        Some(args) if args.eq_ignore_ascii_case("max") => None,
        Some(args) => {
            // Only the first argument is a size; precision/scale pairs
            // stay embedded in the store type name.
            let first = args.split(',').next()?.trim();
            Some(first.parse::<i32>().ok()?)
        }
    };
    Some(ParsedStoreType { base, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SqlProvider {
        SqlProvider::default()
    }

    #[test]
    fn test_primitive_totality() {
        let primitives = [
            LogicalType::Bool,
            LogicalType::UInt8,
            LogicalType::Int16,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::Float32,
            LogicalType::Float64,
            LogicalType::Decimal,
            LogicalType::Char,
            LogicalType::String,
            LogicalType::Bytes,
            LogicalType::DateTime,
            LogicalType::DateTimeOffset,
            LogicalType::Date,
            LogicalType::Time,
            LogicalType::Uuid,
        ];
        for ty in primitives {
            let key = MappingKey::for_type(&ty);
            let mapping = provider().find_mapping(&key).unwrap();
            assert_eq!(mapping.logical_type(), &ty, "mapping for {ty}");
        }
    }

    #[test]
    fn test_int_maps_to_int() {
        let mapping = provider()
            .find_mapping(&MappingKey::for_type(&LogicalType::Int32))
            .unwrap();
        assert_eq!(mapping.store_type(), "int");
    }

    #[test]
    fn test_string_facets() {
        let mut key = MappingKey::for_type(&LogicalType::String);
        key.size = Some(450);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "nvarchar(450)"
        );

        key.unicode = Some(false);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "varchar(450)"
        );

        key.fixed_length = Some(true);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "char(450)"
        );

        let bare = MappingKey::for_type(&LogicalType::String);
        assert_eq!(
            provider().find_mapping(&bare).unwrap().store_type(),
            "nvarchar(max)"
        );
    }

    #[test]
    fn test_key_or_index_string_defaults() {
        let mut key = MappingKey::for_type(&LogicalType::String);
        key.key_or_index = true;
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "nvarchar(450)"
        );

        key.unicode = Some(false);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "varchar(900)"
        );
    }

    #[test]
    fn test_oversized_string_falls_back_to_max() {
        let mut key = MappingKey::for_type(&LogicalType::String);
        key.size = Some(100_000);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "nvarchar(max)"
        );
    }

    #[test]
    fn test_decimal_facets() {
        let mut key = MappingKey::for_type(&LogicalType::Decimal);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "decimal(18,2)"
        );
        key.precision = Some(10);
        key.scale = Some(4);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "decimal(10,4)"
        );
    }

    #[test]
    fn test_row_version_bytes() {
        let mut key = MappingKey::for_type(&LogicalType::Bytes);
        key.row_version = Some(true);
        assert_eq!(
            provider().find_mapping(&key).unwrap().store_type(),
            "rowversion"
        );
    }

    #[test]
    fn test_store_name_first_lookup() {
        let mapping = provider()
            .find_mapping(&MappingKey::for_store_type("nvarchar(450)"))
            .unwrap();
        assert_eq!(mapping.logical_type(), &LogicalType::String);
        assert_eq!(mapping.store_type(), "nvarchar(450)");
        assert_eq!(mapping.size(), Some(450));

        let decimal = provider()
            .find_mapping(&MappingKey::for_store_type("decimal(18,2)"))
            .unwrap();
        assert_eq!(decimal.logical_type(), &LogicalType::Decimal);

        assert!(provider()
            .find_mapping(&MappingKey::for_store_type("geometry"))
            .is_none());
    }

    #[test]
    fn test_store_name_case_insensitive() {
        let mapping = provider()
            .find_mapping(&MappingKey::for_store_type("NVARCHAR(MAX)"))
            .unwrap();
        assert_eq!(mapping.logical_type(), &LogicalType::String);
    }

    #[test]
    fn test_store_name_conflicting_type_is_a_miss() {
        let mut key = MappingKey::for_store_type("int");
        key.logical_type = Some(LogicalType::String);
        assert!(provider().find_mapping(&key).is_none());

        key.logical_type = Some(LogicalType::Int32);
        assert!(provider().find_mapping(&key).is_some());
    }

    #[test]
    fn test_structural_types_have_no_primitive_mapping() {
        for ty in [
            LogicalType::Structural("Order".into()),
            LogicalType::Interface("IList".into()),
            LogicalType::Int32.sequence(),
        ] {
            assert!(provider().find_mapping(&MappingKey::for_type(&ty)).is_none());
        }
    }
}

//! Typed configuration registry (spec.md §9 design note).
//!
//! Every tunable field is registered up front with its default value (which
//! also fixes its type), and a `config <module> <field> <value>` statement
//! performs a typed lookup + parse against that registration. An unknown
//! `(module, field)` pair is an init error, never a silent no-op — an
//! explicit, validated struct of settings rather than stringly-typed
//! reflection into operation classes.

use fnv::FnvHashMap;

use crate::error::InitError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Int(i64),
    Bool(bool),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    fn parse_like(&self, raw: &str) -> Result<ConfigValue, InitError> {
        match self {
            ConfigValue::Int(_) => raw
                .parse::<i64>()
                .map(ConfigValue::Int)
                .map_err(|_| InitError(format!("expected an integer, got {:?}", raw))),
            ConfigValue::Bool(_) => match raw {
                "true" | "True" | "1" => Ok(ConfigValue::Bool(true)),
                "false" | "False" | "0" => Ok(ConfigValue::Bool(false)),
                _ => Err(InitError(format!("expected a boolean, got {:?}", raw))),
            },
            ConfigValue::Float(_) => raw
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|_| InitError(format!("expected a float, got {:?}", raw))),
            ConfigValue::Str(_) => Ok(ConfigValue::Str(raw.to_string())),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            ConfigValue::Int(v) => *v,
            _ => panic!("config value is not an int"),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            ConfigValue::Bool(v) => *v,
            _ => panic!("config value is not a bool"),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            ConfigValue::Float(v) => *v,
            _ => panic!("config value is not a float"),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfigValue::Str(v) => v,
            _ => panic!("config value is not a string"),
        }
    }
}

/// A registry of `module.field -> value`, pre-seeded with every tunable
/// named in spec.md §4.6 at its default, then mutated by `config`
/// statements during header processing.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    values: FnvHashMap<(String, String), ConfigValue>,
}

impl ConfigRegistry {
    pub fn with_defaults() -> Self {
        let mut values = FnvHashMap::default();
        let mut put = |module: &str, field: &str, v: ConfigValue| {
            values.insert((module.to_string(), field.to_string()), v);
        };

        put("Related", "MIN_RELATEDNESS", ConfigValue::Float(0.45));
        put("Related", "MAX_RELATED", ConfigValue::Int(5));
        put("Related", "TOPN", ConfigValue::Int(10));

        put("IsWalk", "LAYOUT", ConfigValue::Str("KEYBOARD_DE".to_string()));
        put("IsWalk", "MIN_WALK_LENGTH", ConfigValue::Float(3.0));
        put("IsWalk", "MIN_SUB_WALK_LENGTH", ConfigValue::Float(3.0));

        put("Segments", "MIN_LENGTH", ConfigValue::Int(1));

        put("MangleDates", "START_YEAR_20TH", ConfigValue::Int(75));
        put("MangleDates", "END_YEAR_21ST", ConfigValue::Int(25));

        put("MultiReplace", "APPLY_UP_TO_N_REPLACEMENTS", ConfigValue::Int(2));

        put("IsPartOf", "ENTRY_MIN_LENGTH", ConfigValue::Int(3));
        put("IsPartOf", "MIN_SEQUENCE_LENGTH", ConfigValue::Int(3));
        put("IsPartOf", "WRAP_AROUND", ConfigValue::Bool(true));

        put(
            "CorrectSpelling",
            "FILTER_CORRECTIONS_WITH_SPACE",
            ConfigValue::Bool(true),
        );

        put("GListDrop", "MIN_LENGTH", ConfigValue::Int(4));

        ConfigRegistry { values }
    }

    /// Applies a `config <module> <field> <value>` statement, type-checking
    /// `raw` against the registered default's type.
    pub fn set(&mut self, module: &str, field: &str, raw: &str) -> Result<(), InitError> {
        let key = (module.to_string(), field.to_string());
        let default = self
            .values
            .get(&key)
            .ok_or_else(|| InitError(format!("unknown config field {}.{}", module, field)))?;
        let parsed = default.parse_like(raw)?;
        self.values.insert(key, parsed);
        Ok(())
    }

    pub fn get(&self, module: &str, field: &str) -> &ConfigValue {
        self.values
            .get(&(module.to_string(), field.to_string()))
            .unwrap_or_else(|| panic!("unregistered config field {}.{}", module, field))
    }

    pub fn int(&self, module: &str, field: &str) -> i64 {
        self.get(module, field).as_int()
    }

    pub fn float(&self, module: &str, field: &str) -> f64 {
        self.get(module, field).as_float()
    }

    pub fn bool(&self, module: &str, field: &str) -> bool {
        self.get(module, field).as_bool()
    }

    pub fn string(&self, module: &str, field: &str) -> &str {
        self.get(module, field).as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_field() {
        let mut cfg = ConfigRegistry::with_defaults();
        assert!(cfg.set("Related", "NOT_A_FIELD", "1").is_err());
    }

    #[test]
    fn type_checks_against_default() {
        let mut cfg = ConfigRegistry::with_defaults();
        assert!(cfg.set("Related", "MAX_RELATED", "not a number").is_err());
        cfg.set("Related", "MAX_RELATED", "7").unwrap();
        assert_eq!(cfg.int("Related", "MAX_RELATED"), 7);
    }
}

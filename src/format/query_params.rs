//! Request parameter shaping.

use std::fmt;

/// A loosely typed parameter value as screens hand it over.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Unset or null; always omitted.
    Absent,
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Whether the parameter should be left out of the request.
    ///
    /// Zero is a real value and is kept.
    pub fn is_omitted(&self) -> bool {
        match self {
            ParamValue::Absent | ParamValue::Bool(false) => true,
            ParamValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Absent => Ok(()),
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Bool(value) => write!(f, "{}", value),
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Absent, Into::into)
    }
}

/// Turn `fields` into ordered `(name, value)` pairs.
///
/// Absent values, empty strings and `false` are dropped; everything else is
/// stringified. Input order is preserved. `None` yields no pairs.
///
/// ```ignore
/// use green_plate::format::{build_query_params, ParamValue};
///
/// let params = build_query_params(Some([
///     ("q", ParamValue::from("bread")),
///     ("vegan", ParamValue::from(false)),
///     ("limit", ParamValue::from(20)),
/// ]));
/// assert_eq!(params, vec![("q".into(), "bread".into()), ("limit".into(), "20".into())]);
/// ```
pub fn build_query_params<I, K, V>(fields: Option<I>) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    fields
        .into_iter()
        .flatten()
        .filter_map(|(name, value)| {
            let value = value.into();
            (!value.is_omitted()).then(|| (name.into(), value.to_string()))
        })
        .collect()
}

/// Percent-encode `params` as `a=1&b=two`.
pub fn to_query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_build_query_params_drops_empty_values() {
        let params = build_query_params(Some([
            ("a", ParamValue::from("")),
            ("b", ParamValue::from(false)),
            ("c", ParamValue::Absent),
            ("d", ParamValue::from(None::<String>)),
            ("e", ParamValue::from("x")),
            ("f", ParamValue::from(5)),
            ("g", ParamValue::from(true)),
        ]));

        assert_eq!(params, pairs(&[("e", "x"), ("f", "5"), ("g", "true")]));
    }

    #[test]
    fn test_build_query_params_none() {
        let params = build_query_params(None::<Vec<(String, ParamValue)>>);
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_query_params_keeps_zero_and_floats() {
        let params = build_query_params(Some(vec![
            ("page", ParamValue::from(0)),
            ("max_price", ParamValue::from(7.5)),
            ("min_price", ParamValue::from(3.0)),
        ]));
        assert_eq!(
            params,
            pairs(&[("page", "0"), ("max_price", "7.5"), ("min_price", "3")])
        );
    }

    #[test]
    fn test_to_query_string_encodes() {
        let query = to_query_string(&pairs(&[("q", "fresh bread"), ("city", "São Paulo")]));
        assert_eq!(query, "q=fresh%20bread&city=S%C3%A3o%20Paulo");
        assert_eq!(to_query_string(&[]), "");
    }
}

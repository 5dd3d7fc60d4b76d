// src/common/query.rs

// Peças compartilhadas pelas listagens: paginação, ordenação por allow-list
// e leitura dos filtros da query string.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Normaliza os parâmetros recebidos: limit em [1, MAX_LIMIT], offset >= 0.
    pub fn clamp(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Self {
        Self {
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

/// Lista fechada de ordenações aceitas por um endpoint.
///
/// Cada entrada liga o valor aceito no parâmetro `sort` ao trecho literal do
/// ORDER BY. Só esses literais chegam ao SQL; qualquer outro valor cai no
/// padrão sem erro.
pub struct SortAllowList {
    pub default: &'static str,
    pub allowed: &'static [(&'static str, &'static str)],
}

impl SortAllowList {
    pub fn resolve(&self, requested: Option<&str>) -> &'static str {
        let Some(raw) = requested else {
            return self.default;
        };

        let wanted = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();

        match self.allowed.iter().find(|(param, _)| *param == wanted) {
            Some((_, order_by)) => *order_by,
            None => {
                tracing::debug!("Ordenação '{}' não permitida, usando '{}'", raw, self.default);
                self.default
            }
        }
    }
}

/// Filtro de query string em que `?campo=` vale o mesmo que omitir o campo.
///
/// Usar com `#[serde(default, deserialize_with = "blank_as_none")]`. Valores
/// não vazios passam por `FromStr`, então `?limit=abc` continua sendo 400.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => value.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Flag booleana da query string: ausente ou vazia vale `false`.
pub fn blank_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(|flag| flag.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTS: SortAllowList = SortAllowList {
        default: "name ASC",
        allowed: &[("name asc", "name ASC"), ("name desc", "name DESC")],
    };

    #[test]
    fn pagination_uses_defaults_when_absent() {
        assert_eq!(
            Pagination::clamp(None, None, DEFAULT_LIMIT),
            Pagination { limit: 50, offset: 0 }
        );
        assert_eq!(Pagination::clamp(None, None, 100).limit, 100);
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(Pagination::clamp(Some(0), Some(-5), 50), Pagination { limit: 1, offset: 0 });
        assert_eq!(Pagination::clamp(Some(-3), None, 50).limit, 1);
        assert_eq!(Pagination::clamp(Some(5000), Some(20), 50), Pagination { limit: 1000, offset: 20 });
        assert_eq!(Pagination::clamp(Some(1000), None, 50).limit, 1000);
    }

    #[test]
    fn sort_accepts_allowed_values() {
        assert_eq!(SORTS.resolve(Some("name desc")), "name DESC");
        assert_eq!(SORTS.resolve(Some("  NAME   Desc ")), "name DESC");
    }

    #[test]
    fn sort_falls_back_silently() {
        assert_eq!(SORTS.resolve(None), "name ASC");
        assert_eq!(SORTS.resolve(Some("name; DROP TABLE customers")), "name ASC");
        assert_eq!(SORTS.resolve(Some("email asc")), "name ASC");
        assert_eq!(SORTS.resolve(Some("")), "name ASC");
    }

    #[derive(Debug, Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "blank_as_none")]
        channel: Option<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        only_open: Option<bool>,
        #[serde(default, deserialize_with = "blank_as_none")]
        limit: Option<i64>,
    }

    fn filters(query: &str) -> Result<Filters, axum::extract::rejection::QueryRejection> {
        let uri: axum::http::Uri = format!("/lista?{}", query).parse().unwrap();
        axum::extract::Query::<Filters>::try_from_uri(&uri).map(|q| q.0)
    }

    #[test]
    fn blank_filter_counts_as_absent() {
        let f = filters("channel=&only_open=&limit=").unwrap();
        assert_eq!(f.channel, None);
        assert_eq!(f.only_open, None);
        assert_eq!(f.limit, None);

        let f = filters("channel=%20%20").unwrap();
        assert_eq!(f.channel, None);

        let f = filters("").unwrap();
        assert_eq!(f.channel, None);
    }

    #[test]
    fn filled_filter_is_parsed() {
        let f = filters("channel=email&only_open=true&limit=20").unwrap();
        assert_eq!(f.channel.as_deref(), Some("email"));
        assert_eq!(f.only_open, Some(true));
        assert_eq!(f.limit, Some(20));
    }

    #[test]
    fn unparseable_filter_is_still_rejected() {
        assert!(filters("limit=muitos").is_err());
        assert!(filters("only_open=talvez").is_err());
    }
}

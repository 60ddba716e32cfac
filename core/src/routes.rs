//! Client Routes
//!
//! Every screen of the client is addressable by a path. A route written out
//! with [`Route::to_path`] and read back with [`Route::parse`] yields the
//! same route, so a path reproduces the selection it encodes.
//!
//! | Path | Route |
//! |------|-------|
//! | `/` | [`Route::Home`] |
//! | `/curriculum/{pathId}?level={code}` | [`Route::Curriculum`] |
//! | `/read/curriculum/{itemId}?level={code}` | [`Route::ReadCurriculumItem`] |
//! | `/read/{articleId}` | [`Route::Article`] |
//! | `/profile` | [`Route::Profile`] |

use thiserror::Error;

/// A client screen and its parameters
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Selection wizard
    Home,
    /// Learning path overview
    Curriculum {
        /// Learning path id
        path_id: String,
        /// Level code from the `level` query parameter
        level: Option<String>,
    },
    /// Article for a curriculum item at a level
    ReadCurriculumItem {
        /// Curriculum item id
        item_id: String,
        /// Level code from the `level` query parameter
        level: Option<String>,
    },
    /// Article by id
    Article {
        /// Article id
        id: String,
    },
    /// Reading progress
    Profile,
}

/// A path that names no route
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("no route matches {0:?}")]
pub struct RouteError(pub String);

impl Route {
    /// Path form, with ids and query values percent-encoded
    #[must_use]
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Curriculum { path_id, level } => {
                with_level(format!("/curriculum/{}", urlencoding::encode(path_id)), level)
            }
            Self::ReadCurriculumItem { item_id, level } => with_level(
                format!("/read/curriculum/{}", urlencoding::encode(item_id)),
                level,
            ),
            Self::Article { id } => format!("/read/{}", urlencoding::encode(id)),
            Self::Profile => "/profile".to_string(),
        }
    }

    /// Parse a path (with optional query string)
    ///
    /// Unknown query parameters are ignored; an empty `level` value counts
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the path matches no route.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let input = input.trim();
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect::<Option<_>>()
            .ok_or_else(|| RouteError(input.to_string()))?;
        let level = query_param(query, "level").filter(|l| !l.is_empty());

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["profile"] => Ok(Self::Profile),
            ["curriculum", path_id] => Ok(Self::Curriculum {
                path_id: (*path_id).to_string(),
                level,
            }),
            ["read", "curriculum", item_id] => Ok(Self::ReadCurriculumItem {
                item_id: (*item_id).to_string(),
                level,
            }),
            ["read", id] => Ok(Self::Article {
                id: (*id).to_string(),
            }),
            _ => Err(RouteError(input.to_string())),
        }
    }

    /// Level code carried by the route
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        match self {
            Self::Curriculum { level, .. } | Self::ReadCurriculumItem { level, .. } => {
                level.as_deref()
            }
            _ => None,
        }
    }

    /// Same route with the level parameter replaced
    #[must_use]
    pub fn with_level(&self, code: Option<String>) -> Self {
        match self {
            Self::Curriculum { path_id, .. } => Self::Curriculum {
                path_id: path_id.clone(),
                level: code,
            },
            Self::ReadCurriculumItem { item_id, .. } => Self::ReadCurriculumItem {
                item_id: item_id.clone(),
                level: code,
            },
            other => other.clone(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn with_level(path: String, level: &Option<String>) -> String {
    match level {
        Some(code) if !code.is_empty() => format!("{path}?level={}", urlencoding::encode(code)),
        _ => path,
    }
}

fn decode(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|s| s.into_owned())
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| decode(&v.replace('+', " ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_curriculum_path() {
        let route = Route::Curriculum {
            path_id: "p1".to_string(),
            level: Some("intermediate".to_string()),
        };
        assert_eq!(route.to_path(), "/curriculum/p1?level=intermediate");
        assert_eq!(Route::parse("/curriculum/p1?level=intermediate").unwrap(), route);
    }

    #[test]
    fn test_read_curriculum_item_path() {
        let route = Route::parse("/read/curriculum/c-9?level=beginner").unwrap();
        assert_eq!(
            route,
            Route::ReadCurriculumItem {
                item_id: "c-9".to_string(),
                level: Some("beginner".to_string())
            }
        );
        assert_eq!(route.level(), Some("beginner"));
    }

    #[test]
    fn test_missing_or_empty_level() {
        assert_eq!(Route::parse("/curriculum/p1").unwrap().level(), None);
        assert_eq!(Route::parse("/curriculum/p1?level=").unwrap().level(), None);
        assert_eq!(
            Route::parse("/curriculum/p1?tab=x&level=expert").unwrap().level(),
            Some("expert")
        );
    }

    #[test]
    fn test_encoding_round_trips() {
        let route = Route::Curriculum {
            path_id: "path with/slash".to_string(),
            level: Some("a&b".to_string()),
        };
        let path = route.to_path();
        assert_eq!(path, "/curriculum/path%20with%2Fslash?level=a%26b");
        assert_eq!(Route::parse(&path).unwrap(), route);
    }

    #[test]
    fn test_simple_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("").unwrap(), Route::Home);
        assert_eq!(Route::parse("/profile").unwrap(), Route::Profile);
        assert_eq!(
            Route::parse("/read/a1").unwrap(),
            Route::Article {
                id: "a1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_path() {
        assert!(Route::parse("/settings").is_err());
        assert!(Route::parse("/curriculum").is_err());
    }

    #[test]
    fn test_with_level_replaces_parameter() {
        let route = Route::parse("/curriculum/p1?level=beginner").unwrap();
        assert_eq!(
            route.with_level(Some("expert".to_string())).to_path(),
            "/curriculum/p1?level=expert"
        );
        assert_eq!(Route::Profile.with_level(Some("x".to_string())), Route::Profile);
    }
}

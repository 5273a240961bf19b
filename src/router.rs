//! Static route table mapping paths to screens

use crate::config::Config;
use std::fmt;
use thiserror::Error;

/// Route resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("No screen at {0}")]
    NotFound(String),
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),
}

/// A resolved screen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    List { collection: String },
    Purchase { collection: String, identifier: String },
}

impl Route {
    /// Canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::List { collection } => format!("/{}", collection),
            Route::Purchase {
                collection,
                identifier,
            } => format!("/{}/{}/purchase", collection, identifier),
        }
    }

    /// Where "back" leads from this screen
    pub fn back(&self) -> Route {
        match self {
            Route::Home | Route::List { .. } => Route::Home,
            Route::Purchase { collection, .. } => Route::List {
                collection: collection.clone(),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Resolves paths against the configured collections
#[derive(Debug, Clone)]
pub struct Router {
    collections: Vec<String>,
    default_collection: String,
}

impl Router {
    pub fn new<I, S>(collections: I, default_collection: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collections: collections.into_iter().map(Into::into).collect(),
            default_collection: default_collection.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.collections.iter().map(|c| c.name.clone()),
            config.purchase.default_collection.clone(),
        )
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    fn known(&self, collection: &str) -> Result<String, RouteError> {
        if self.collections.iter().any(|c| c == collection) {
            Ok(collection.to_string())
        } else {
            Err(RouteError::UnknownCollection(collection.to_string()))
        }
    }

    /// Resolve a path such as `/beverages/7/purchase`
    pub fn resolve(&self, path: &str) -> Result<Route, RouteError> {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            [collection] => self
                .known(collection)
                .map(|collection| Route::List { collection })
                .map_err(|_| RouteError::NotFound(path.to_string())),
            [identifier, "purchase"] => Ok(Route::Purchase {
                collection: self.known(&self.default_collection)?,
                identifier: identifier.to_string(),
            }),
            [collection, identifier, "purchase"] => Ok(Route::Purchase {
                collection: self.known(collection)?,
                identifier: identifier.to_string(),
            }),
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    /// Every path pattern with a short description
    pub fn table(&self) -> Vec<(String, String)> {
        let mut table = vec![("/".to_string(), "home".to_string())];
        for collection in &self.collections {
            table.push((format!("/{}", collection), format!("{} list", collection)));
            table.push((
                format!("/{}/{{id}}/purchase", collection),
                format!("purchase from {}", collection),
            ));
        }
        table.push((
            "/{id}/purchase".to_string(),
            format!("purchase from {}", self.default_collection),
        ));
        table
    }
}

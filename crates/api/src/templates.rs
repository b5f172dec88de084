//! Handlebars template cache.
//!
//! Every `*.page.hbs` file in the template directory is registered under its
//! name minus the extension (`home.page`). `*.layout.hbs` and `*.partial.hbs`
//! files become partials named by their first segment (`base`, `footer`), so
//! a page wraps itself in the layout with `{{#> base}}...{{/base}}`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use snippetbox_core::forms::FormData;
use snippetbox_db::models::snippet::Snippet;
use snippetbox_db::models::user::User;

const TEMPLATE_EXT: &str = ".hbs";

#[derive(Debug, thiserror::Error)]
pub enum TemplateLoadError {
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Data handed to every page.
///
/// The request-independent defaults (year, flash, user, CSRF token) are filled
/// in by [`RequestContext::template_data`]; handlers add the rest.
///
/// [`RequestContext::template_data`]: crate::context::RequestContext::template_data
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub authenticated_user: Option<User>,
    pub csrf_token: String,
    pub current_year: i32,
    pub flash: Option<String>,
    pub form: Option<FormData>,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
}

// Formats an RFC 3339 timestamp as "02 Jan 2006 at 15:04" in UTC. Anything
// else renders as an empty string.
handlebars_helper!(human_date: |value: Json| {
    value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|t| t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string())
        .unwrap_or_default()
});

/// Parsed templates, built once at startup and shared read-only.
pub struct TemplateCache {
    registry: Handlebars<'static>,
}

impl TemplateCache {
    /// Parse every template in `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateLoadError> {
        let mut registry = Handlebars::new();
        registry.register_helper("human_date", Box::new(human_date));

        let read_err = |source| TemplateLoadError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = std::fs::read_dir(dir)
            .map_err(read_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        paths.sort();

        for path in paths {
            let Some(stem) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(TEMPLATE_EXT))
                .map(str::to_string)
            else {
                continue;
            };

            let source = std::fs::read_to_string(&path).map_err(|source| TemplateLoadError::Io {
                path: path.clone(),
                source,
            })?;

            let parse_err = |source| TemplateLoadError::Parse {
                name: stem.clone(),
                source: Box::new(source),
            };
            if stem.ends_with(".page") {
                registry
                    .register_template_string(&stem, source)
                    .map_err(parse_err)?;
            } else if stem.ends_with(".layout") || stem.ends_with(".partial") {
                let name = stem.split('.').next().unwrap_or(&stem);
                registry.register_partial(name, source).map_err(parse_err)?;
            } else {
                tracing::warn!(path = %path.display(), "Skipping template with unknown kind");
            }
        }

        tracing::info!(
            dir = %dir.display(),
            pages = registry.get_templates().len(),
            "Templates loaded"
        );
        Ok(Self { registry })
    }

    /// Render a page. A missing page name is a render error.
    pub fn render(
        &self,
        name: &str,
        data: &TemplateData,
    ) -> Result<String, handlebars::RenderError> {
        self.registry.render(name, data)
    }
}

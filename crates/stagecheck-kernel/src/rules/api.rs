//! Backend API matching.
//!
//! The frontend must talk to the backend the API document describes:
//!
//! 1. `.env` sets `VITE_API_BASE_URL` to the document's backend URL.
//! 2. `src/config/api.config.ts` reads that variable instead of hardcoding it.
//! 3. Every `src/services/*.service.ts` goes through the shared `api` client,
//!    and every endpoint literal it passes exists in the document's paths.
//!
//! Endpoint comparison tolerates trailing slashes, normalizes `${id}` to
//! `{id}`, and honors a path already carried by a hardcoded `baseURL`.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{Category, Rule, RuleOutcome};
use crate::context::AnalysisContext;
use crate::syntax::{line_of, pattern, strip_comments};

pub const ENV_FILE: &str = ".env";
pub const API_CONFIG_FILE: &str = "src/config/api.config.ts";
pub const SERVICES_DIR: &str = "src/services";

const ENV_VARIABLE: &str = "VITE_API_BASE_URL";

/// Most backend paths listed in one message.
const LISTED_PATHS: usize = 10;

static ENV_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?m)^\s*VITE_API_BASE_URL\s*=\s*(.+)$"));
static BASE_URL_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"baseURL\s*:\s*['"`]([^'"`]+)['"`]"#));
static CLIENT_CALL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bapi\.(?:get|post|put|patch|delete)\("));
static AXIOS_CALL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\baxios\.(?:get|post|put|patch|delete)\("));
static HARDCODED_URL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"['"`](https?://[^'"`]+)['"`]"#));
static ENDPOINT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"\bapi\.\w+\(\s*['"`](/[^'"` ]*)['"`]"#));
static TEMPLATE_PARAM: LazyLock<Regex> = LazyLock::new(|| pattern(r"\$\{(\w+)\}"));

/// `/users/${id}/` → `/users/{id}`
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    TEMPLATE_PARAM.replace_all(trimmed, "{${1}}").into_owned()
}

/// Path component of a URL literal, without a trailing slash.
///
/// `http://host:8000/api/` → `/api`; `/api` → `/api`; `http://host` → ``.
pub fn url_path(url: &str) -> &str {
    let rest = match url.split_once("://") {
        Some((_, after_scheme)) => match after_scheme.find('/') {
            Some(slash) => &after_scheme[slash..],
            None => "",
        },
        None => url,
    };
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    rest.trim_end_matches('/')
}

/// Value of `VITE_API_BASE_URL` in `.env` text, unquoted and without a
/// trailing slash.
fn env_base_url(text: &str) -> Option<&str> {
    let value = ENV_ASSIGNMENT.captures(text)?.get(1)?.as_str().trim();
    Some(value.trim_matches(|c| c == '"' || c == '\'').trim_end_matches('/'))
}

/// The shared prefix of every backend path, when it is `/api`.
fn common_prefix(paths: &BTreeSet<String>) -> Option<&'static str> {
    paths
        .iter()
        .all(|p| p == "/api" || p.starts_with("/api/"))
        .then_some("/api")
}

fn listing<'a>(paths: impl IntoIterator<Item = &'a String>, limit: usize) -> String {
    paths
        .into_iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What the backend expects for the endpoints of one service file.
struct EndpointMatcher<'a> {
    paths: &'a BTreeSet<String>,
    base_path: &'a str,
    prefix: Option<&'static str>,
}

impl EndpointMatcher<'_> {
    fn known(&self, path: &str) -> bool {
        self.paths.contains(path) || self.paths.contains(&format!("{path}/"))
    }

    /// `None` when the endpoint matches, otherwise why it does not.
    fn check(&self, endpoint: &str, line: usize) -> Option<String> {
        let normalized = normalize_endpoint(endpoint);
        let full = format!("{}{normalized}", self.base_path);
        if self.known(&full) || self.known(&normalized) {
            return None;
        }

        if let Some(prefix) = self.prefix.filter(|p| !normalized.starts_with(p)) {
            let expected = format!("{prefix}{normalized}");
            return Some(if self.known(&expected) {
                format!("line {line}: endpoint '{endpoint}' is missing the '{prefix}' prefix; use '{expected}'")
            } else {
                format!(
                    "line {line}: endpoint '{endpoint}' not found in the API document; backend paths use prefix '{prefix}' (available: {})",
                    listing(self.paths, LISTED_PATHS)
                )
            });
        }

        if !self.base_path.is_empty() && normalized.starts_with(self.base_path) {
            let expected = &normalized[self.base_path.len()..];
            return Some(format!(
                "line {line}: endpoint '{endpoint}' repeats the baseURL prefix '{}'; use '{expected}'",
                self.base_path
            ));
        }

        let last = normalized.rsplit('/').next().unwrap_or_default();
        let similar: Vec<&String> = if last.is_empty() {
            Vec::new()
        } else {
            self.paths.iter().filter(|p| p.contains(last)).collect()
        };
        Some(if similar.is_empty() {
            format!(
                "line {line}: endpoint '{endpoint}' (as '{full}') not found in the API document (available: {})",
                listing(self.paths, LISTED_PATHS)
            )
        } else {
            format!(
                "line {line}: endpoint '{endpoint}' (as '{full}') not found in the API document (similar: {})",
                listing(similar, 5)
            )
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BackendApiRule;

impl Rule for BackendApiRule {
    fn name(&self) -> &str {
        "Backend API Matching"
    }

    fn category(&self) -> Category {
        Category::Wiring
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let api = &ctx.config().api;

        let Some(backend_url) = api.backend_url.as_deref() else {
            outcome.warning(
                None,
                "no backend URL in the API document (checked servers[].url, url, host+basePath)",
            );
            return outcome;
        };

        check_env(ctx, backend_url, &mut outcome);
        let base_path = check_api_config(ctx, &mut outcome);

        if api.paths.is_empty() {
            outcome.error(None, "no API paths in the API document; service endpoints cannot be checked");
            return outcome;
        }

        let matcher = EndpointMatcher {
            paths: &api.paths,
            base_path: &base_path,
            prefix: common_prefix(&api.paths),
        };
        check_services(ctx, &matcher, &mut outcome);
        outcome
    }
}

fn check_env(ctx: &AnalysisContext, backend_url: &str, outcome: &mut RuleOutcome) {
    let Some(env) = ctx.file(ENV_FILE) else {
        outcome.error(Some(ENV_FILE), "file not found");
        return;
    };
    let text = match env.text() {
        Ok(text) => text,
        Err(e) => {
            outcome.file_error(&e);
            return;
        }
    };
    match env_base_url(text) {
        None => outcome.error(Some(ENV_FILE), format!("missing {ENV_VARIABLE}")),
        Some(url) if url != backend_url => outcome.error(
            Some(ENV_FILE),
            format!("{ENV_VARIABLE} is '{url}' but the API document expects '{backend_url}'"),
        ),
        Some(_) => {}
    }
}

/// Check the client config and return the path its `baseURL` carries.
fn check_api_config(ctx: &AnalysisContext, outcome: &mut RuleOutcome) -> String {
    let Some(config) = ctx.file(API_CONFIG_FILE) else {
        return String::new();
    };
    let text = match config.text() {
        Ok(text) => strip_comments(text),
        Err(e) => {
            outcome.file_error(&e);
            return String::new();
        }
    };
    if !text.contains("import.meta.env.VITE_API_BASE_URL") {
        outcome.error(
            Some(API_CONFIG_FILE),
            format!("base URL does not come from import.meta.env.{ENV_VARIABLE}"),
        );
    }
    BASE_URL_LITERAL
        .captures(&text)
        .and_then(|c| c.get(1))
        .map(|m| url_path(m.as_str()).to_string())
        .unwrap_or_default()
}

fn check_services(ctx: &AnalysisContext, matcher: &EndpointMatcher<'_>, outcome: &mut RuleOutcome) {
    let services = ctx
        .tree()
        .files_in(SERVICES_DIR)
        .filter(|f| f.file_name().ends_with(".service.ts"));

    for service in services {
        let path = service.path.as_str();
        let text = match service.text() {
            Ok(text) => strip_comments(text),
            Err(e) => {
                outcome.file_error(&e);
                continue;
            }
        };

        let uses_client = ctx.symbols().get(path).is_some_and(|s| {
            s.references
                .iter()
                .any(|r| r.specifier == "./api" || r.specifier.starts_with("../config/api"))
        });
        if !uses_client {
            outcome.error(Some(path), "missing API client import (import { api } from './api')");
            continue;
        }
        if !CLIENT_CALL.is_match(&text) {
            outcome.error(Some(path), "imports the API client but never calls api.get/post/put/patch/delete");
            continue;
        }
        if AXIOS_CALL.is_match(&text) {
            outcome.error(Some(path), "calls axios directly; use the api client so baseURL applies");
        }
        let hardcoded: Vec<&str> = HARDCODED_URL
            .captures_iter(&text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        if !hardcoded.is_empty() {
            outcome.error(
                Some(path),
                format!("hardcoded URL(s) {}; pass relative paths to the api client", hardcoded.join(", ")),
            );
        }

        let mut seen = HashSet::new();
        let endpoints: Vec<(&str, usize)> = ENDPOINT
            .captures_iter(&text)
            .filter_map(|c| c.get(1))
            .filter(|m| seen.insert(m.as_str()))
            .map(|m| (m.as_str(), line_of(&text, m.start())))
            .collect();
        if endpoints.is_empty() {
            outcome.warning(Some(path), "uses the api client but no endpoint literals were found");
            continue;
        }
        tracing::debug!(path, endpoints = endpoints.len(), "service endpoints extracted");

        for (endpoint, line) in endpoints {
            if let Some(message) = matcher.check(endpoint, line) {
                outcome.error(Some(path), message);
            }
        }
    }
}

//! Presence rules: required files and the textual markers they must carry.
//!
//! Each rule is one [`RequiredFile`] entry. Markers are checked in order and
//! every missing marker is its own finding, so one run reports everything
//! wrong with a file at once. Module files are comment-stripped before
//! matching; stylesheets and markup are matched as written.

use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{Category, Rule, RuleOutcome};
use crate::config::ProjectConfig;
use crate::context::AnalysisContext;
use crate::scanner::FileCategory;
use crate::syntax::{pattern, strip_comments};

use serde_json::Value;

/// One textual expectation on a required file.
#[derive(Debug, Clone)]
pub enum Marker {
    /// Missing pattern is an error.
    Required {
        pattern: &'static str,
        message: &'static str,
    },
    /// Missing pattern is a warning.
    Advised {
        pattern: &'static str,
        message: &'static str,
    },
    /// Present pattern is an error.
    Forbidden {
        pattern: &'static str,
        message: &'static str,
    },
    /// Compound check; returns an error message when it fails.
    Check(fn(&str) -> Option<String>),
    /// Compound check; every returned message is a warning.
    Lint(fn(&str) -> Vec<String>),
}

impl Marker {
    fn apply(&self, text: &str, path: &str, outcome: &mut RuleOutcome) {
        match self {
            Self::Required { pattern: p, message } => {
                if !pattern(p).is_match(text) {
                    outcome.error(Some(path), *message);
                }
            }
            Self::Advised { pattern: p, message } => {
                if !pattern(p).is_match(text) {
                    outcome.warning(Some(path), *message);
                }
            }
            Self::Forbidden { pattern: p, message } => {
                if pattern(p).is_match(text) {
                    outcome.error(Some(path), *message);
                }
            }
            Self::Check(check) => {
                if let Some(message) = check(text) {
                    outcome.error(Some(path), message);
                }
            }
            Self::Lint(lint) => {
                for message in lint(text) {
                    outcome.warning(Some(path), message);
                }
            }
        }
    }
}

/// A file that must exist, when it must exist, and what it must contain.
#[derive(Debug, Clone)]
pub struct RequiredFile {
    pub rule: &'static str,
    pub path: &'static str,
    pub active: fn(&ProjectConfig) -> bool,
    /// Why the file is required, for conditionally required files.
    pub because: Option<fn(&ProjectConfig) -> String>,
    pub markers: fn(&ProjectConfig) -> Vec<Marker>,
}

/// A rule backed by one [`RequiredFile`].
#[derive(Debug, Clone)]
pub struct PresenceRule {
    required: RequiredFile,
}

impl PresenceRule {
    pub fn new(required: RequiredFile) -> Self {
        Self { required }
    }
}

impl Rule for PresenceRule {
    fn name(&self) -> &str {
        self.required.rule
    }

    fn category(&self) -> Category {
        Category::Presence
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        let config = ctx.config();
        if !(self.required.active)(config) {
            return outcome;
        }

        let path = self.required.path;
        let Some(file) = ctx.file(path) else {
            let message = match self.required.because {
                Some(because) => format!("file not found (required because {})", because(config)),
                None => "file not found".to_string(),
            };
            outcome.error(Some(path), message);
            return outcome;
        };
        let text = match file.text() {
            Ok(text) => text,
            Err(e) => {
                outcome.file_error(&e);
                return outcome;
            }
        };
        let text: Cow<'_, str> = if file.category == FileCategory::Module {
            Cow::Owned(strip_comments(text))
        } else {
            Cow::Borrowed(text)
        };

        for marker in (self.required.markers)(config) {
            marker.apply(&text, path, &mut outcome);
        }
        outcome
    }
}

/// Files earlier pipeline stages produced and later stages must not remove.
pub const CRITICAL_FILES: &[&str] = &[
    "src/router/index.tsx",
    "src/router/routes.ts",
    "src/components/Layout.tsx",
    "src/components/Navbar.tsx",
    "src/services/api.ts",
];

/// Every critical file of earlier stages still exists.
#[derive(Debug, Clone, Copy)]
pub struct CriticalFilesRule;

impl Rule for CriticalFilesRule {
    fn name(&self) -> &str {
        "No Previous Stage Modifications"
    }

    fn category(&self) -> Category {
        Category::Presence
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(self.name(), self.category());
        for path in CRITICAL_FILES.iter().copied() {
            if !ctx.tree().contains(path) {
                outcome.error(Some(path), "critical file missing or moved");
            }
        }
        outcome
    }
}

const REACT_IMPORT: Marker = Marker::Required {
    pattern: r#"import\b[^;]*?\bReact\b[^;]*?from\s*['"]react['"]"#,
    message: "missing React import",
};

fn always(_: &ProjectConfig) -> bool {
    true
}

fn auth_enabled(config: &ProjectConfig) -> bool {
    config.auth_enabled
}

fn needs_sidebar(config: &ProjectConfig) -> bool {
    config.needs_sidebar()
}

fn auth_reason(_: &ProjectConfig) -> String {
    "auth is enabled".to_string()
}

fn sidebar_reason(config: &ProjectConfig) -> String {
    format!("the project has {} entities", config.entities.len())
}

static APP_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?:const|function)\s+App\b"));
static APP_INLINE_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"export\s+default\s+(?:function|const)\s+App\b"));
static APP_NAMED: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"export\s+(?:const|function)\s+App\b"));
static APP_DEFAULT_IDENT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"export\s+default\s+App\b"));
static TRAILING_EXPORT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"export\s+default\s+$"));

/// The App component is exported exactly one way.
fn app_export(text: &str) -> Option<String> {
    let inline = APP_INLINE_DEFAULT.is_match(text);
    let separate_definition = APP_DEFINITION
        .find_iter(text)
        .any(|m| !TRAILING_EXPORT_DEFAULT.is_match(&text[..m.start()]));

    if separate_definition && inline {
        return Some(
            "invalid App export: both a 'const/function App' definition and 'export default function App'; \
             use either 'const App = () => {}; export default App;' or 'export default function App() {}'"
                .to_string(),
        );
    }
    let named = APP_NAMED.is_match(text);
    let default_ident = APP_DEFAULT_IDENT.is_match(text);
    if named || (separate_definition && default_ident) || inline {
        None
    } else {
        Some("missing App component export".to_string())
    }
}

fn app_markers(config: &ProjectConfig) -> Vec<Marker> {
    let mut markers = vec![
        REACT_IMPORT,
        Marker::Check(app_export),
        Marker::Required {
            pattern: r#"import\b[^;]*?\bAppRouter\b[^;]*?from\s*['"][^'"]*router"#,
            message: "missing AppRouter import from router",
        },
        Marker::Required {
            pattern: r#"import\s*['"]\./App\.css['"]"#,
            message: "missing App.css import",
        },
        Marker::Required {
            pattern: r"<AppRouter\s*/?>",
            message: "AppRouter component not used",
        },
    ];
    if config.auth_enabled {
        markers.push(Marker::Required {
            pattern: r"import\b[^;]*?\bAuthProvider\b[^;]*?from",
            message: "auth enabled but missing AuthProvider import",
        });
        markers.push(Marker::Required {
            pattern: r"<AuthProvider>",
            message: "auth enabled but AuthProvider not wrapping AppRouter",
        });
    }
    markers
}

fn main_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        REACT_IMPORT,
        Marker::Required {
            pattern: r#"import\b[^;]*?\bReactDOM\b[^;]*?from\s*['"]react-dom/client['"]"#,
            message: "missing ReactDOM import from 'react-dom/client'",
        },
        Marker::Required {
            pattern: r#"import\b[^;]*?\bApp\b[^;]*?from\s*['"][^'"]*App['"]"#,
            message: "missing App component import",
        },
        Marker::Required {
            pattern: r#"import\s*['"]\./index\.css['"]"#,
            message: "missing index.css import",
        },
        Marker::Required {
            pattern: r"ReactDOM\.createRoot",
            message: "not using React 18 createRoot API",
        },
        Marker::Required {
            pattern: r#"getElementById\(\s*['"]root['"]"#,
            message: "missing root element selection",
        },
        Marker::Advised {
            pattern: r"<React\.StrictMode>",
            message: "should wrap App in React.StrictMode",
        },
    ]
}

fn app_css_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"\.app\s*\{",
            message: "missing styles for '.app'",
        },
        Marker::Required {
            pattern: r"\.layout\s*\{",
            message: "missing styles for '.layout'",
        },
        Marker::Required {
            pattern: r"\.navbar\s*\{",
            message: "missing styles for '.navbar'",
        },
        Marker::Required {
            pattern: r"button\s*\{",
            message: "missing styles for 'button'",
        },
    ]
}

fn index_css_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"box-sizing\s*:\s*border-box",
            message: "missing box-sizing reset",
        },
        Marker::Required {
            pattern: r"body\s*\{",
            message: "missing body styles",
        },
        Marker::Advised {
            pattern: r"(?::root|html)\s*\{",
            message: "should include :root or html styles",
        },
    ]
}

fn auth_context_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r#"import\b[^;]*?\bcreateContext\b[^;]*?from\s*['"]react['"]"#,
            message: "missing createContext import from React",
        },
        Marker::Required {
            pattern: r#"import\b[^;]*?\buseContext\b[^;]*?from\s*['"]react['"]"#,
            message: "missing useContext import from React",
        },
        Marker::Required {
            pattern: r"const\s+AuthContext\b[^=]*=\s*createContext",
            message: "missing AuthContext creation with createContext",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+AuthProvider\b",
            message: "missing AuthProvider export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+useAuth\b",
            message: "missing useAuth hook export",
        },
        Marker::Required {
            pattern: r"\blogin\s*[:=]",
            message: "missing login method",
        },
        Marker::Required {
            pattern: r"\blogout\s*[:=]",
            message: "missing logout method",
        },
    ]
}

fn html_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"(?i)<!DOCTYPE\s+html>",
            message: "missing DOCTYPE declaration",
        },
        Marker::Required {
            pattern: r#"(?i)<meta\s+charset=["']UTF-8["']"#,
            message: "missing charset meta tag",
        },
        Marker::Required {
            pattern: r#"(?i)<meta\s+name=["']viewport["']"#,
            message: "missing viewport meta tag",
        },
        Marker::Required {
            pattern: r#"<div\s+id=["']root["']"#,
            message: "missing root div element",
        },
        Marker::Required {
            pattern: r#"<script[^>]*\ssrc=["'][^"']*main\.tsx["']"#,
            message: "missing script tag for main.tsx",
        },
    ]
}

fn routes_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"export\s+const\s+ROUTES\b",
            message: "missing ROUTES constant export",
        },
        Marker::Required {
            pattern: r#"\bHOME\s*:\s*['"]/['"]"#,
            message: "missing HOME route definition",
        },
        Marker::Required {
            pattern: r#"\bNOT_FOUND\s*:\s*['"]?\*['"]?"#,
            message: "missing NOT_FOUND route definition",
        },
    ]
}

fn router_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r#"import\s*\{[^}]*\bBrowserRouter\b[^}]*\}\s*from\s*['"]react-router-dom['"]"#,
            message: "missing BrowserRouter import from react-router-dom",
        },
        Marker::Required {
            pattern: r#"import\s*\{[^}]*\bRoutes\b[^}]*\}\s*from\s*['"]react-router-dom['"]"#,
            message: "missing Routes import from react-router-dom",
        },
        Marker::Required {
            pattern: r#"import\s*\{[^}]*\bRoute\b[^}]*\}\s*from\s*['"]react-router-dom['"]"#,
            message: "missing Route import from react-router-dom",
        },
        Marker::Required {
            pattern: r"import\b[^;]*?\bLayout\b[^;]*?from",
            message: "missing Layout component import",
        },
        Marker::Required {
            pattern: r"import\b[^;]*?\bHome\b[^;]*?from",
            message: "missing Home view import",
        },
        Marker::Required {
            pattern: r"import\b[^;]*?\bNotFound\b[^;]*?from",
            message: "missing NotFound view import",
        },
        Marker::Required {
            pattern: r#"import\b[^;]*?\bROUTES\b[^;]*?from\s*['"][^'"]*routes['"]"#,
            message: "missing ROUTES import from routes.ts",
        },
        Marker::Forbidden {
            pattern: r"<Switch\b",
            message: "uses React Router v5 Switch; use v6 Routes",
        },
        Marker::Required {
            pattern: r"<Routes>",
            message: "missing <Routes> component (React Router v6)",
        },
        Marker::Required {
            pattern: r"<Route\b[^>]*?\bpath=[^>]*?\belement=",
            message: "missing Route with element prop (React Router v6 syntax)",
        },
        Marker::Required {
            pattern: r"<BrowserRouter>",
            message: "missing <BrowserRouter> wrapper",
        },
        Marker::Required {
            pattern: r"<Layout>",
            message: "missing <Layout> wrapper around routes",
        },
    ]
}

fn layout_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        REACT_IMPORT,
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+Layout\b",
            message: "missing Layout component export",
        },
        Marker::Required {
            pattern: r"children\??\s*:\s*React\.ReactNode",
            message: "missing children prop with React.ReactNode type",
        },
        Marker::Required {
            pattern: r"import\b[^;]*?\bNavbar\b[^;]*?from",
            message: "missing Navbar import",
        },
        Marker::Required {
            pattern: r"<Navbar\s*/?>",
            message: "Navbar component not used in Layout",
        },
    ]
}

const LINK_IMPORT: Marker = Marker::Required {
    pattern: r#"import\b[^;]*?\bLink\b[^;]*?from\s*['"]react-router-dom['"]"#,
    message: "missing Link import from react-router-dom",
};

fn navbar_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        REACT_IMPORT,
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+Navbar\b",
            message: "missing Navbar component export",
        },
        LINK_IMPORT,
        Marker::Required {
            pattern: r"<Link\s+to=",
            message: "no Link components found; should link to entity views",
        },
        Marker::Advised {
            pattern: r#"import\b[^;]*?\bROUTES\b[^;]*?from\s*['"][^'"]*routes['"]"#,
            message: "should import ROUTES from router/routes",
        },
    ]
}

fn sidebar_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        REACT_IMPORT,
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+Sidebar\b",
            message: "missing Sidebar component export",
        },
        LINK_IMPORT,
        Marker::Advised {
            pattern: r#"import\b[^;]*?\buseLocation\b[^;]*?from\s*['"]react-router-dom['"]"#,
            message: "should use useLocation for active route highlighting",
        },
    ]
}

fn home_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![Marker::Required {
        pattern: r"export\s+(?:const|function)\s+Home\b|export\s+default\b",
        message: "missing Home component export",
    }]
}

fn not_found_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![Marker::Required {
        pattern: r"export\s+(?:const|function)\s+NotFound\b|export\s+default\b",
        message: "missing NotFound component export",
    }]
}

fn api_client_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r#"import\b[^;]*?\baxios\b[^;]*?from\s*['"]axios['"]"#,
            message: "missing axios import",
        },
        Marker::Required {
            pattern: r"axios\.create\s*\(",
            message: "missing axios.create() instance",
        },
        Marker::Required {
            pattern: r"baseURL\s*:",
            message: "missing baseURL configuration",
        },
        Marker::Required {
            pattern: r"\binterceptors\.request\.use\b",
            message: "missing request interceptor",
        },
        Marker::Required {
            pattern: r"\binterceptors\.response\.use\b",
            message: "missing response interceptor",
        },
        Marker::Required {
            pattern: r"export\s+default\b",
            message: "missing default export of the client",
        },
        Marker::Advised {
            pattern: r"import\.meta\.env\.VITE_API_BASE_URL|\bAPI_CONFIG\b",
            message: "baseURL should come from import.meta.env.VITE_API_BASE_URL or API_CONFIG",
        },
    ]
}

fn formatting_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+formatDate\b",
            message: "missing formatDate export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+formatDateTime\b",
            message: "missing formatDateTime export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+formatCurrency\b",
            message: "missing formatCurrency export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+formatNumber\b",
            message: "missing formatNumber export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+truncate\b",
            message: "missing truncate export",
        },
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+capitalize\b",
            message: "missing capitalize export",
        },
    ]
}

fn storage_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"export\s+const\s+storage\s*=",
            message: "missing storage object export",
        },
        Marker::Required {
            pattern: r"\bget\s*[:(=<]",
            message: "missing storage method 'get'",
        },
        Marker::Required {
            pattern: r"\bset\s*[:(=<]",
            message: "missing storage method 'set'",
        },
        Marker::Required {
            pattern: r"\bremove\s*[:(=<]",
            message: "missing storage method 'remove'",
        },
        Marker::Required {
            pattern: r"\bclear\s*[:(=<]",
            message: "missing storage method 'clear'",
        },
        Marker::Advised {
            pattern: r"<T>",
            message: "storage methods should be generic over the stored type",
        },
    ]
}

const REACT_HOOKS_IMPORT: Marker = Marker::Required {
    pattern: r#"import\b[^;]*?from\s*['"]react['"]"#,
    message: "missing import from 'react'",
};

fn use_api_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+useApi\b|export\s+default\s+useApi\b",
            message: "missing useApi export",
        },
        REACT_HOOKS_IMPORT,
        Marker::Advised {
            pattern: r"<T[,>]",
            message: "useApi should be generic over the response type",
        },
    ]
}

fn use_pagination_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r"export\s+(?:const|function)\s+usePagination\b|export\s+default\s+usePagination\b",
            message: "missing usePagination export",
        },
        REACT_HOOKS_IMPORT,
    ]
}

/// Variables Vite hands to client code without the `VITE_` prefix.
const UNPREFIXED_ENV: &[&str] = &["NODE_ENV", "PORT"];

static ENV_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*="));

fn env_prefix(text: &str) -> Vec<String> {
    ENV_NAME
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.starts_with("VITE_") && !UNPREFIXED_ENV.contains(name))
        .map(|name| format!("'{name}' is invisible to client code; use the VITE_ prefix"))
        .collect()
}

fn env_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![Marker::Lint(env_prefix)]
}

fn vite_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![
        Marker::Required {
            pattern: r#"import\b[^;]*?\bdefineConfig\b[^;]*?from\s*['"]vite['"]"#,
            message: "missing defineConfig import from 'vite'",
        },
        Marker::Required {
            pattern: r#"import\b[^;]*?\breact\b[^;]*?from\s*['"]@vitejs/plugin-react['"]"#,
            message: "missing React plugin import from '@vitejs/plugin-react'",
        },
        Marker::Advised {
            pattern: r"\bproxy\s*:",
            message: "missing dev server proxy configuration",
        },
        Marker::Advised {
            pattern: r#"['"]/api['"]"#,
            message: "dev server should proxy '/api' requests",
        },
    ]
}

/// `compilerOptions` of a tsconfig, tolerating comments.
fn compiler_options(text: &str) -> Result<Value, String> {
    let config: Value = serde_json::from_str(&strip_comments(text)).map_err(|e| e.to_string())?;
    Ok(config.get("compilerOptions").cloned().unwrap_or(Value::Null))
}

fn tsconfig_jsx(text: &str) -> Option<String> {
    let options = match compiler_options(text) {
        Ok(options) => options,
        Err(e) => return Some(format!("invalid JSON: {e}")),
    };
    match options.get("jsx").and_then(Value::as_str) {
        Some("react" | "react-jsx") => None,
        Some(other) => Some(format!("compilerOptions.jsx is '{other}'; use 'react-jsx'")),
        None => Some("compilerOptions.jsx is not set; use 'react-jsx'".to_string()),
    }
}

fn tsconfig_advice(text: &str) -> Vec<String> {
    let Ok(options) = compiler_options(text) else {
        return Vec::new();
    };
    let mut advice = Vec::new();
    if options.get("strict").and_then(Value::as_bool) != Some(true) {
        advice.push("compilerOptions.strict should be enabled".to_string());
    }
    if options.get("moduleResolution").is_none() {
        advice.push("compilerOptions.moduleResolution should be set".to_string());
    }
    advice
}

fn tsconfig_markers(_: &ProjectConfig) -> Vec<Marker> {
    vec![Marker::Check(tsconfig_jsx), Marker::Lint(tsconfig_advice)]
}

/// The default presence rules.
pub fn presence_catalogue() -> Vec<Arc<dyn Rule>> {
    let files = [
        RequiredFile {
            rule: "App Component",
            path: "src/App.tsx",
            active: always,
            because: None,
            markers: app_markers,
        },
        RequiredFile {
            rule: "Main Entry Point",
            path: "src/main.tsx",
            active: always,
            because: None,
            markers: main_markers,
        },
        RequiredFile {
            rule: "App.css Styles",
            path: "src/App.css",
            active: always,
            because: None,
            markers: app_css_markers,
        },
        RequiredFile {
            rule: "index.css Reset",
            path: "src/index.css",
            active: always,
            because: None,
            markers: index_css_markers,
        },
        RequiredFile {
            rule: "Auth Context",
            path: "src/context/AuthContext.tsx",
            active: auth_enabled,
            because: Some(auth_reason),
            markers: auth_context_markers,
        },
        RequiredFile {
            rule: "HTML Template",
            path: "index.html",
            active: always,
            because: None,
            markers: html_markers,
        },
        RequiredFile {
            rule: "Route Definitions",
            path: "src/router/routes.ts",
            active: always,
            because: None,
            markers: routes_markers,
        },
        RequiredFile {
            rule: "Router Setup",
            path: "src/router/index.tsx",
            active: always,
            because: None,
            markers: router_markers,
        },
        RequiredFile {
            rule: "Layout Component",
            path: "src/components/Layout.tsx",
            active: always,
            because: None,
            markers: layout_markers,
        },
        RequiredFile {
            rule: "Navbar Component",
            path: "src/components/Navbar.tsx",
            active: always,
            because: None,
            markers: navbar_markers,
        },
        RequiredFile {
            rule: "Sidebar Component",
            path: "src/components/Sidebar.tsx",
            active: needs_sidebar,
            because: Some(sidebar_reason),
            markers: sidebar_markers,
        },
        RequiredFile {
            rule: "Home View",
            path: "src/views/Home.tsx",
            active: always,
            because: None,
            markers: home_markers,
        },
        RequiredFile {
            rule: "NotFound View",
            path: "src/views/NotFound.tsx",
            active: always,
            because: None,
            markers: not_found_markers,
        },
        RequiredFile {
            rule: "API Client",
            path: "src/services/api.ts",
            active: always,
            because: None,
            markers: api_client_markers,
        },
        RequiredFile {
            rule: "Formatting Utilities",
            path: "src/utils/formatting.ts",
            active: always,
            because: None,
            markers: formatting_markers,
        },
        RequiredFile {
            rule: "Storage Utilities",
            path: "src/utils/storage.ts",
            active: always,
            because: None,
            markers: storage_markers,
        },
        RequiredFile {
            rule: "useApi Hook",
            path: "src/hooks/useApi.ts",
            active: always,
            because: None,
            markers: use_api_markers,
        },
        RequiredFile {
            rule: "usePagination Hook",
            path: "src/hooks/usePagination.ts",
            active: always,
            because: None,
            markers: use_pagination_markers,
        },
        RequiredFile {
            rule: "Environment Variables",
            path: ".env",
            active: always,
            because: None,
            markers: env_markers,
        },
        RequiredFile {
            rule: "Vite Config",
            path: "vite.config.ts",
            active: always,
            because: None,
            markers: vite_markers,
        },
        RequiredFile {
            rule: "TypeScript Config",
            path: "tsconfig.json",
            active: always,
            because: None,
            markers: tsconfig_markers,
        },
    ];

    let mut rules: Vec<Arc<dyn Rule>> = files
        .into_iter()
        .map(|required| Arc::new(PresenceRule::new(required)) as Arc<dyn Rule>)
        .collect();
    rules.push(Arc::new(CriticalFilesRule));
    rules
}

//! Test utilities for stagecheck.
//!
//! [`FixtureTree`] is a temporary directory laid out the way the pipeline
//! lays out its workspace:
//!
//! ```text
//! <tmp>/input/erd.json
//! <tmp>/input/openapi.json
//! <tmp>/generated_project/...
//! ```
//!
//! [`FixtureTree::healthy`] writes a complete project that passes every
//! default rule; tests then break exactly the thing they are about.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Entities of the healthy fixture. Two, so no sidebar is required.
pub const FIXTURE_ENTITIES: &[&str] = &["Customer", "Order"];

/// Operations every fixture entity declares in the ERD.
pub const FIXTURE_OPERATIONS: &[&str] = &["list", "read", "create"];

/// Backend URL of the healthy fixture's API document and `.env`.
pub const FIXTURE_BACKEND_URL: &str = "http://localhost:8000";

/// An artifact tree plus schema documents in a temporary directory.
pub struct FixtureTree {
    dir: TempDir,
}

impl Default for FixtureTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureTree {
    /// An empty workspace with an empty `generated_project/`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("create temp dir: {e}"));
        let fixture = Self { dir };
        fixture.mkdir("");
        fixture
    }

    /// A workspace holding a project every default rule accepts.
    pub fn healthy(auth: bool) -> Self {
        let fixture = Self::new();
        fixture.write_erd(auth, FIXTURE_ENTITIES);
        fixture.write_openapi(&default_openapi());
        for (path, content) in HEALTHY_FILES {
            fixture.write(path, content);
        }
        if auth {
            for (path, content) in AUTH_FILES {
                fixture.write(path, content);
            }
        }
        fixture
    }

    /// Workspace directory containing `input/` and `generated_project/`.
    pub fn workspace(&self) -> &Path {
        self.dir.path()
    }

    /// The artifact root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("generated_project")
    }

    pub fn erd_path(&self) -> PathBuf {
        self.dir.path().join("input").join("erd.json")
    }

    pub fn openapi_path(&self) -> PathBuf {
        self.dir.path().join("input").join("openapi.json")
    }

    /// Create a directory (and parents) under the artifact root.
    pub fn mkdir(&self, rel: &str) -> &Self {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).unwrap_or_else(|e| panic!("mkdir {}: {e}", path.display()));
        self
    }

    /// Write a file under the artifact root, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        self.write_bytes(rel, content.as_bytes())
    }

    pub fn write_bytes(&self, rel: &str, content: &[u8]) -> &Self {
        write_file(&self.root().join(rel), content);
        self
    }

    /// Read a file under the artifact root.
    pub fn read(&self, rel: &str) -> String {
        let path = self.root().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }

    /// Replace the first occurrence of `from` in a file under the root.
    pub fn edit(&self, rel: &str, from: &str, to: &str) -> &Self {
        let text = self.read(rel);
        assert!(text.contains(from), "{rel} does not contain {from:?}");
        self.write(rel, &text.replacen(from, to, 1))
    }

    /// Remove a file under the artifact root.
    pub fn remove(&self, rel: &str) -> &Self {
        let path = self.root().join(rel);
        fs::remove_file(&path).unwrap_or_else(|e| panic!("remove {}: {e}", path.display()));
        self
    }

    /// Write `input/erd.json` with the given auth flag and entity names.
    pub fn write_erd(&self, auth: bool, entities: &[&str]) -> PathBuf {
        let path = self.erd_path();
        write_json(&path, &erd_document(auth, entities));
        path
    }

    /// Write `input/openapi.json`.
    pub fn write_openapi(&self, doc: &Value) -> PathBuf {
        let path = self.openapi_path();
        write_json(&path, doc);
        path
    }

    /// Write an arbitrary file relative to the workspace (not the root).
    pub fn write_input(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        write_file(&path, content.as_bytes());
        path
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir {}: {e}", parent.display()));
    }
    fs::write(path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

fn write_json(path: &Path, value: &Value) {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|e| panic!("serialize: {e}"));
    write_file(path, text.as_bytes());
}

/// An ERD document in the pipeline's shape.
pub fn erd_document(auth: bool, entities: &[&str]) -> Value {
    let entities: Vec<Value> = entities
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "attributes": [{ "name": "id", "type": "integer" }],
                "operations": FIXTURE_OPERATIONS,
            })
        })
        .collect();
    json!({
        "entities": entities,
        "relationships": [],
        "business_logic": { "authentication": { "enabled": auth } }
    })
}

/// The OpenAPI document matching the healthy fixture's services.
pub fn default_openapi() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Fixture API", "version": "1.0.0" },
        "servers": [{ "url": FIXTURE_BACKEND_URL }],
        "paths": {
            "/customers": { "get": {}, "post": {} },
            "/customers/{id}": { "get": {} },
            "/orders": { "get": {}, "post": {} },
            "/orders/{id}": { "get": {} }
        }
    })
}

const PACKAGE_JSON: &str = r#"{
  "name": "generated-project",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "tsc && vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "axios": "^1.6.0",
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "react-router-dom": "^6.20.0"
  },
  "devDependencies": {
    "@types/react": "^18.2.0",
    "@types/react-dom": "^18.2.0",
    "@vitejs/plugin-react": "^4.2.0",
    "typescript": "^5.2.0",
    "vite": "^5.0.0"
  }
}
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Generated Project</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>
"#;

const VITE_CONFIG: &str = "import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';
import path from 'path';

export default defineConfig({
  plugins: [react()],
  resolve: { alias: { '@': path.resolve(__dirname, 'src') } },
  server: {
    proxy: {
      '/api': {
        target: 'http://localhost:8000',
        changeOrigin: true,
      },
    },
  },
});
";

const TSCONFIG_JSON: &str = r#"{
  "compilerOptions": {
    "target": "ES2020",
    "lib": ["ES2020", "DOM", "DOM.Iterable"],
    "module": "ESNext",
    "skipLibCheck": true,

    /* Bundler mode */
    "moduleResolution": "bundler",
    "isolatedModules": true,
    "noEmit": true,
    "jsx": "react-jsx",

    "strict": true
  },
  "include": ["src"]
}
"#;

const MAIN_TSX: &str = "import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './index.css';

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
);
";

const APP_TSX: &str = "import React from 'react';
import { AppRouter } from './router';
import './App.css';

const App: React.FC = () => {
  return (
    <div className=\"app\">
      <AppRouter />
    </div>
  );
};

export default App;
";

const APP_CSS: &str = ".app {
  min-height: 100vh;
}

.layout {
  display: flex;
  flex-direction: column;
}

.navbar {
  display: flex;
  gap: 1rem;
  padding: 1rem;
}

button {
  cursor: pointer;
}
";

const INDEX_CSS: &str = "*,
*::before,
*::after {
  box-sizing: border-box;
}

:root {
  font-family: system-ui, sans-serif;
}

body {
  margin: 0;
}
";

const ROUTES_TS: &str = "export const ROUTES = {
  HOME: '/',
  CUSTOMER_LIST: '/customers',
  ORDER_LIST: '/orders',
  NOT_FOUND: '*',
} as const;
";

const ROUTER_TSX: &str = "import React from 'react';
import { BrowserRouter, Routes, Route } from 'react-router-dom';
import { Layout } from '../components';
import { Home, NotFound, CustomerView, OrderView } from '../views';
import { ROUTES } from './routes';

export const AppRouter: React.FC = () => (
  <BrowserRouter>
    <Layout>
      <Routes>
        <Route path={ROUTES.HOME} element={<Home />} />
        <Route path={ROUTES.CUSTOMER_LIST} element={<CustomerView />} />
        <Route path={ROUTES.ORDER_LIST} element={<OrderView />} />
        <Route path={ROUTES.NOT_FOUND} element={<NotFound />} />
      </Routes>
    </Layout>
  </BrowserRouter>
);
";

const LAYOUT_TSX: &str = "import React from 'react';
import { Navbar } from './Navbar';

interface LayoutProps {
  children: React.ReactNode;
}

export const Layout: React.FC<LayoutProps> = ({ children }) => (
  <div className=\"layout\">
    <Navbar />
    <main>{children}</main>
  </div>
);
";

const NAVBAR_TSX: &str = "import React from 'react';
import { Link } from 'react-router-dom';
import { ROUTES } from '../router/routes';

export const Navbar: React.FC = () => (
  <nav className=\"navbar\">
    <Link to={ROUTES.HOME}>Home</Link>
    <Link to={ROUTES.CUSTOMER_LIST}>Customers</Link>
    <Link to={ROUTES.ORDER_LIST}>Orders</Link>
  </nav>
);
";

const COMPONENTS_INDEX: &str = "export * from './Layout';
export * from './Navbar';
export * from './CustomerList';
export * from './CustomerForm';
export * from './OrderList';
export * from './OrderForm';
";

const CUSTOMER_LIST_TSX: &str = "import React from 'react';
import { Customer } from '../types';

interface CustomerListProps {
  items: Customer[];
}

export const CustomerList: React.FC<CustomerListProps> = ({ items }) => (
  <ul>
    {items.map((c) => (
      <li key={c.id}>{c.name}</li>
    ))}
  </ul>
);
";

const CUSTOMER_FORM_TSX: &str = "import React, { useState } from 'react';
import { CustomerCreate } from '../types';

interface CustomerFormProps {
  onSubmit: (value: CustomerCreate) => void;
}

export const CustomerForm: React.FC<CustomerFormProps> = ({ onSubmit }) => {
  const [name, setName] = useState('');
  return (
    <form
      onSubmit={(e) => {
        e.preventDefault();
        onSubmit({ name });
      }}
    >
      <input value={name} onChange={(e) => setName(e.target.value)} />
      <button type=\"submit\">Save</button>
    </form>
  );
};
";

const ORDER_LIST_TSX: &str = "import React from 'react';
import { Order } from '../types';

interface OrderListProps {
  items: Order[];
}

export const OrderList: React.FC<OrderListProps> = ({ items }) => (
  <ul>
    {items.map((o) => (
      <li key={o.id}>#{o.id}</li>
    ))}
  </ul>
);
";

const ORDER_FORM_TSX: &str = "import React, { useState } from 'react';
import { OrderCreate } from '../types';

interface OrderFormProps {
  onSubmit: (value: OrderCreate) => void;
}

export const OrderForm: React.FC<OrderFormProps> = ({ onSubmit }) => {
  const [customerId, setCustomerId] = useState(0);
  return (
    <form
      onSubmit={(e) => {
        e.preventDefault();
        onSubmit({ customerId });
      }}
    >
      <input
        type=\"number\"
        value={customerId}
        onChange={(e) => setCustomerId(Number(e.target.value))}
      />
      <button type=\"submit\">Save</button>
    </form>
  );
};
";

const HOME_TSX: &str = "import React from 'react';

export const Home: React.FC = () => <h1>Home</h1>;
";

const NOT_FOUND_TSX: &str = "import React from 'react';

export const NotFound: React.FC = () => <h1>Page not found</h1>;
";

const CUSTOMER_VIEW_TSX: &str = "import React, { useEffect, useState } from 'react';
import { customerService } from '../services/customer.service';
import { Customer, CustomerCreate } from '../types';
import { CustomerForm, CustomerList } from '../components';

export const CustomerView: React.FC = () => {
  const [items, setItems] = useState<Customer[]>([]);

  useEffect(() => {
    customerService.getAll().then(setItems);
  }, []);

  const add = (value: CustomerCreate) =>
    customerService.create(value).then((c) => setItems([...items, c]));

  return (
    <section>
      <CustomerForm onSubmit={add} />
      <CustomerList items={items} />
    </section>
  );
};
";

const ORDER_VIEW_TSX: &str = "import React, { useEffect, useState } from 'react';
import { orderService } from '../services/order.service';
import { Order, OrderCreate } from '../types';
import { OrderForm, OrderList } from '../components';

export const OrderView: React.FC = () => {
  const [items, setItems] = useState<Order[]>([]);

  useEffect(() => {
    orderService.getAll().then(setItems);
  }, []);

  const add = (value: OrderCreate) =>
    orderService.create(value).then((o) => setItems([...items, o]));

  return (
    <section>
      <OrderForm onSubmit={add} />
      <OrderList items={items} />
    </section>
  );
};
";

const VIEWS_INDEX: &str = "export * from './Home';
export * from './NotFound';
export * from './CustomerView';
export * from './OrderView';
";

const API_CONFIG_TS: &str = "export const API_CONFIG = {
  baseURL: import.meta.env.VITE_API_BASE_URL,
  timeout: 10000,
};
";

const API_TS: &str = "import axios from 'axios';
import { API_CONFIG } from '../config/api.config';

export const api = axios.create({
  baseURL: API_CONFIG.baseURL,
  timeout: API_CONFIG.timeout,
});

api.interceptors.request.use((config) => config);

api.interceptors.response.use(
  (response) => response,
  (error) => Promise.reject(error),
);

export default api;
";

const CUSTOMER_SERVICE_TS: &str = "import { api } from './api';
import { Customer, CustomerCreate } from '../types';

export const customerService = {
  getAll: (): Promise<Customer[]> => api.get('/customers').then((r) => r.data),
  getById: (id: number): Promise<Customer> => api.get(`/customers/${id}`).then((r) => r.data),
  create: (c: CustomerCreate): Promise<Customer> => api.post('/customers', c).then((r) => r.data),
};
";

const ORDER_SERVICE_TS: &str = "import { api } from './api';
import { Order, OrderCreate } from '../types';

export const orderService = {
  getAll: (): Promise<Order[]> => api.get('/orders').then((r) => r.data),
  getById: (id: number): Promise<Order> => api.get(`/orders/${id}`).then((r) => r.data),
  create: (o: OrderCreate): Promise<Order> => api.post('/orders', o).then((r) => r.data),
};
";

const CUSTOMER_TYPES_TS: &str = "export interface Customer {
  id: number;
  name: string;
}

export interface CustomerCreate {
  name: string;
}

export interface CustomerUpdate {
  name?: string;
}

export interface CustomerResponse {
  data: Customer[];
  total: number;
}
";

const ORDER_TYPES_TS: &str = "export interface Order {
  id: number;
  customerId: number;
}

export interface OrderCreate {
  customerId: number;
}

export interface OrderUpdate {
  customerId?: number;
}

export interface OrderResponse {
  data: Order[];
  total: number;
}
";

const TYPES_INDEX: &str = "export * from './Customer.types';
export * from './Order.types';
";

const FORMATTING_TS: &str = "export const formatDate = (value: string | Date): string =>
  new Date(value).toLocaleDateString();

export const formatDateTime = (value: string | Date): string =>
  new Date(value).toLocaleString();

export const formatCurrency = (value: number, currency = 'USD'): string =>
  new Intl.NumberFormat(undefined, { style: 'currency', currency }).format(value);

export const formatNumber = (value: number): string => new Intl.NumberFormat().format(value);

export const truncate = (text: string, length = 50): string =>
  text.length > length ? `${text.slice(0, length)}...` : text;

export const capitalize = (text: string): string =>
  text.charAt(0).toUpperCase() + text.slice(1);
";

const STORAGE_TS: &str = "export const storage = {
  get: <T>(key: string): T | null => {
    const raw = localStorage.getItem(key);
    return raw === null ? null : (JSON.parse(raw) as T);
  },
  set: <T>(key: string, value: T): void => {
    localStorage.setItem(key, JSON.stringify(value));
  },
  remove: (key: string): void => {
    localStorage.removeItem(key);
  },
  clear: (): void => {
    localStorage.clear();
  },
};
";

const UTILS_INDEX: &str = "export * from './formatting';
export * from './storage';
";

const USE_API_TS: &str = "import { useCallback, useEffect, useState } from 'react';

export const useApi = <T,>(fetcher: () => Promise<T>) => {
  const [data, setData] = useState<T | null>(null);
  const [error, setError] = useState<Error | null>(null);
  const [loading, setLoading] = useState(true);

  const load = useCallback(() => {
    setLoading(true);
    fetcher()
      .then(setData)
      .catch(setError)
      .finally(() => setLoading(false));
  }, [fetcher]);

  useEffect(load, [load]);

  return { data, error, loading, reload: load };
};
";

const USE_PAGINATION_TS: &str = "import { useMemo, useState } from 'react';

export const usePagination = (total: number, pageSize = 10) => {
  const [page, setPage] = useState(1);
  const pages = useMemo(() => Math.max(1, Math.ceil(total / pageSize)), [total, pageSize]);

  return {
    page,
    pages,
    next: () => setPage((p) => Math.min(p + 1, pages)),
    prev: () => setPage((p) => Math.max(p - 1, 1)),
  };
};
";

const HOOKS_INDEX: &str = "export * from './useApi';
export * from './usePagination';
";

const HEALTHY_FILES: &[(&str, &str)] = &[
    ("package.json", PACKAGE_JSON),
    ("index.html", INDEX_HTML),
    (".env", "VITE_API_BASE_URL=http://localhost:8000\n"),
    ("vite.config.ts", VITE_CONFIG),
    ("tsconfig.json", TSCONFIG_JSON),
    ("src/main.tsx", MAIN_TSX),
    ("src/App.tsx", APP_TSX),
    ("src/App.css", APP_CSS),
    ("src/index.css", INDEX_CSS),
    ("src/router/routes.ts", ROUTES_TS),
    ("src/router/index.tsx", ROUTER_TSX),
    ("src/components/Layout.tsx", LAYOUT_TSX),
    ("src/components/Navbar.tsx", NAVBAR_TSX),
    ("src/components/CustomerList.tsx", CUSTOMER_LIST_TSX),
    ("src/components/CustomerForm.tsx", CUSTOMER_FORM_TSX),
    ("src/components/OrderList.tsx", ORDER_LIST_TSX),
    ("src/components/OrderForm.tsx", ORDER_FORM_TSX),
    ("src/components/index.ts", COMPONENTS_INDEX),
    ("src/views/Home.tsx", HOME_TSX),
    ("src/views/NotFound.tsx", NOT_FOUND_TSX),
    ("src/views/CustomerView.tsx", CUSTOMER_VIEW_TSX),
    ("src/views/OrderView.tsx", ORDER_VIEW_TSX),
    ("src/views/index.ts", VIEWS_INDEX),
    ("src/config/api.config.ts", API_CONFIG_TS),
    ("src/services/api.ts", API_TS),
    ("src/services/customer.service.ts", CUSTOMER_SERVICE_TS),
    ("src/services/order.service.ts", ORDER_SERVICE_TS),
    ("src/types/Customer.types.ts", CUSTOMER_TYPES_TS),
    ("src/types/Order.types.ts", ORDER_TYPES_TS),
    ("src/types/index.ts", TYPES_INDEX),
    ("src/utils/formatting.ts", FORMATTING_TS),
    ("src/utils/storage.ts", STORAGE_TS),
    ("src/utils/index.ts", UTILS_INDEX),
    ("src/hooks/useApi.ts", USE_API_TS),
    ("src/hooks/usePagination.ts", USE_PAGINATION_TS),
    ("src/hooks/index.ts", HOOKS_INDEX),
];

const AUTH_APP_TSX: &str = "import React from 'react';
import { AppRouter } from './router';
import { AuthProvider } from './context';
import './App.css';

const App: React.FC = () => {
  return (
    <AuthProvider>
      <div className=\"app\">
        <AppRouter />
      </div>
    </AuthProvider>
  );
};

export default App;
";

const AUTH_CONTEXT_TSX: &str = "import React, { createContext, useContext, useState } from 'react';

interface AuthContextValue {
  user: string | null;
  login: (user: string) => void;
  logout: () => void;
}

const AuthContext = createContext<AuthContextValue | undefined>(undefined);

export const AuthProvider: React.FC<{ children: React.ReactNode }> = ({ children }) => {
  const [user, setUser] = useState<string | null>(null);
  const login = (name: string) => setUser(name);
  const logout = () => setUser(null);
  return <AuthContext.Provider value={{ user, login, logout }}>{children}</AuthContext.Provider>;
};

export const useAuth = () => {
  const ctx = useContext(AuthContext);
  if (!ctx) {
    throw new Error('useAuth must be used within AuthProvider');
  }
  return ctx;
};
";

const AUTH_FILES: &[(&str, &str)] = &[
    ("src/App.tsx", AUTH_APP_TSX),
    ("src/context/AuthContext.tsx", AUTH_CONTEXT_TSX),
    ("src/context/index.ts", "export * from './AuthContext';\n"),
];

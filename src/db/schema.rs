//! SQL DDL for initializing the marketplace storage.
//! SQLite-first design; embedded lists live in JSON text columns.

/// SQLite schema with:
/// - INTEGER PRIMARY KEY AUTOINCREMENT ids on every table
/// - `category_name_key` (lowercased name) UNIQUE, so same-name inserts are
///   rejected in any letter case, non-ASCII included
/// - JSON text columns for images, policy, need-to-know and inclusion points
/// - timestamps as RFC3339 text; session expiry as unix seconds for range checks
/// - no foreign keys: references are checked by the handlers
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name TEXT NOT NULL,
    category_name_key TEXT NOT NULL UNIQUE, -- lowercased category_name
    description TEXT NOT NULL DEFAULT '',
    image TEXT NULL, -- JSON object, StoredImage
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL,
    package_name TEXT NOT NULL,
    package_desc TEXT NOT NULL,
    price TEXT NOT NULL,
    discount_price TEXT NOT NULL,
    package_review TEXT NOT NULL,
    experience TEXT NOT NULL,
    location TEXT NOT NULL,
    policy TEXT NOT NULL DEFAULT '[]', -- JSON array of {point}
    need_to_know TEXT NOT NULL DEFAULT '[]', -- JSON array of {name}
    images TEXT NOT NULL DEFAULT '[]', -- JSON array of StoredImage
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_packages_category_id ON packages(category_id);

CREATE TABLE IF NOT EXISTS inclusions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    package_id INTEGER NOT NULL,
    points TEXT NOT NULL DEFAULT '[]', -- JSON array of {IconName, Point}
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_inclusions_package_id ON inclusions(package_id);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_num INTEGER NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    hashed_pass TEXT NOT NULL,
    salt_pass TEXT NOT NULL,
    user_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    expires_at INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;

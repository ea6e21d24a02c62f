pub const CREATE_FILES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY,
        path TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
";

pub const CREATE_TAGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
";

pub const CREATE_FILE_TAGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS file_tags (
        file_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        FOREIGN KEY (file_id) REFERENCES files(id),
        FOREIGN KEY (tag_id) REFERENCES tags(id),
        UNIQUE(file_id, tag_id)
    )
";

pub const CREATE_INDEX_FILE_TAGS_TAG_ID: &str =
    "CREATE INDEX IF NOT EXISTS idx_file_tags_tag_id ON file_tags(tag_id)";

/// Every statement needed to bring an empty database up to date, in order.
pub const ALL: [&str; 4] = [
    CREATE_FILES_TABLE,
    CREATE_TAGS_TABLE,
    CREATE_FILE_TAGS_TABLE,
    CREATE_INDEX_FILE_TAGS_TAG_ID,
];

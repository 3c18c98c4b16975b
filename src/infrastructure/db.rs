use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create members table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            identifier TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL DEFAULT 'student',
            status TEXT NOT NULL DEFAULT 'active',
            phone TEXT,
            address TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_members_role ON members(role);
        CREATE INDEX IF NOT EXISTS idx_members_status ON members(status);
        "#
        .to_owned(),
    ))
    .await?;

    // Create books table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT,
            isbn TEXT,
            barcode TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'available',
            category TEXT,
            sub_category TEXT,
            call_number TEXT,
            publisher TEXT,
            publication_year INTEGER,
            language TEXT,
            pages INTEGER,
            description TEXT,
            location TEXT,
            acquisition_date TEXT,
            acquisition_method TEXT,
            price REAL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_books_status ON books(status);
        CREATE INDEX IF NOT EXISTS idx_books_category ON books(category);
        CREATE INDEX IF NOT EXISTS idx_books_isbn ON books(isbn);
        "#
        .to_owned(),
    ))
    .await?;

    // Migration: sub_category and acquisition fields arrived after the first
    // deployments. SQLite has no ALTER ... IF NOT EXISTS, so failures are
    // ignored.
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE books ADD COLUMN sub_category TEXT".to_owned(),
        ))
        .await;
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE books ADD COLUMN acquisition_method TEXT".to_owned(),
        ))
        .await;

    // Create borrow_records table (historical ledger, append-only)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS borrow_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            book_id INTEGER NOT NULL,
            borrow_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            return_date TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_borrow_records_member_id ON borrow_records(member_id);
        CREATE INDEX IF NOT EXISTS idx_borrow_records_book_id ON borrow_records(book_id);
        CREATE INDEX IF NOT EXISTS idx_borrow_records_status ON borrow_records(status);
        "#
        .to_owned(),
    ))
    .await?;

    // Create active_borrowings table (open-loan projection).
    // UNIQUE(book_id): a copy can be out to at most one member at a time.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS active_borrowings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            book_id INTEGER NOT NULL UNIQUE,
            borrow_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            renewal_count INTEGER NOT NULL DEFAULT 0,
            fine_amount REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_active_borrowings_member_id ON active_borrowings(member_id);
        CREATE INDEX IF NOT EXISTS idx_active_borrowings_status ON active_borrowings(status);
        "#
        .to_owned(),
    ))
    .await?;

    // Create book_labels table.
    // UNIQUE(book_id): label generation is idempotent per book.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS book_labels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL UNIQUE,
            barcode TEXT NOT NULL,
            label_template TEXT NOT NULL DEFAULT 'standard',
            size TEXT NOT NULL DEFAULT 'medium',
            print_count INTEGER NOT NULL DEFAULT 0,
            last_printed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create notifications table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'info',
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notifications_is_read ON notifications(is_read);
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}

use anyhow::Context;
use rusqlite::Connection;

/// Applied in order; a name is never re-run once recorded in `_migrations`.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_init.sql",
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('admin', 'empresa', 'freelancer')),
            company TEXT,
            phone TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS spaces (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            address TEXT NOT NULL,
            price_per_day REAL NOT NULL,
            rating REAL NOT NULL DEFAULT 0,
            image_url TEXT,
            amenities TEXT NOT NULL DEFAULT '[]',
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            space_id INTEGER NOT NULL REFERENCES spaces(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id, date);",
    ),
    (
        "002_seed.sql",
        "INSERT INTO users (email, name, role, company, phone) VALUES
            ('admin@coworking.com', 'Administrador', 'admin', NULL, '+34 600 123 456'),
            ('empresa@techcorp.com', 'Tech Corp Solutions', 'empresa', 'TechCorp Solutions', '+34 600 234 567'),
            ('freelancer@gmail.com', 'Carlos Rodríguez', 'freelancer', NULL, '+34 600 345 678');

        INSERT INTO spaces (name, city, address, price_per_day, rating, image_url, amenities, description) VALUES
            ('Innova Coworking Center', 'Madrid', 'Calle Gran Vía, 123', 25, 4.8,
             'https://picsum.photos/seed/madrid1/600/400', '[\"wifi\",\"cafe\",\"sala-reuniones\"]',
             'Un espacio moderno y vibrante en el corazón de Madrid, perfecto para startups y freelancers.'),
            ('BCN Hub Creativo', 'Barcelona', 'Passeig de Gràcia, 45', 30, 4.9,
             'https://picsum.photos/seed/bcn1/600/400', '[\"wifi\",\"cafe\",\"acceso-24-7\"]',
             'Fomenta tu creatividad en nuestro hub de Barcelona, con acceso ininterrumpido y una comunidad increíble.'),
            ('Valencia Tech Place', 'Valencia', 'Avenida del Puerto, 78', 22, 4.7,
             'https://picsum.photos/seed/valencia1/600/400', '[\"wifi\",\"cafe\",\"parking\"]',
             'El punto de encuentro para la tecnología en Valencia. Ofrecemos instalaciones de primera y parking gratuito.'),
            ('Madrid Connect', 'Madrid', 'Calle de Alcalá, 200', 28, 4.6,
             'https://picsum.photos/seed/madrid2/600/400', '[\"wifi\",\"cafe\",\"escritorio-de-pie\"]',
             'Espacio de trabajo ergonómico y bien conectado en una de las zonas más emblemáticas de Madrid.');",
    ),
];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let spaces: i64 = conn
            .query_row("SELECT COUNT(*) FROM spaces", [], |row| row.get(0))
            .unwrap();
        assert_eq!(spaces, 4);

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }
}

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{BookingRecord, BookingStatus, CatalogEntry, NewSpace, SearchCriteria, User};

// ── Spaces ──

const SPACE_COLUMNS: &str =
    "id, name, city, address, price_per_day, rating, image_url, amenities, description";

/// City is matched case-insensitively; every requested amenity must be present.
pub fn list_spaces(conn: &Connection, filter: &SearchCriteria) -> anyhow::Result<Vec<CatalogEntry>> {
    let mut conditions: Vec<&str> = vec![];
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(city) = &filter.city {
        conditions.push("LOWER(city) = LOWER(?)");
        params_vec.push(Box::new(city.clone()));
    }
    for amenity in filter.amenity_list() {
        conditions.push("amenities LIKE ?");
        params_vec.push(Box::new(format!("%\"{amenity}\"%")));
    }

    let mut sql = format!("SELECT {SPACE_COLUMNS} FROM spaces");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_space_row(row)))?;

    let mut spaces = vec![];
    for row in rows {
        spaces.push(row??);
    }
    Ok(spaces)
}

pub fn get_space(conn: &Connection, id: i64) -> anyhow::Result<Option<CatalogEntry>> {
    let sql = format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE id = ?1");
    let space = conn
        .query_row(&sql, params![id], |row| Ok(parse_space_row(row)))
        .optional()?;
    space.transpose()
}

pub fn insert_space(conn: &Connection, space: &NewSpace) -> anyhow::Result<CatalogEntry> {
    let amenities = serde_json::to_string(&space.amenities)?;
    conn.execute(
        "INSERT INTO spaces (name, city, address, price_per_day, rating, image_url, amenities, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            space.name,
            space.city,
            space.address,
            space.price_per_day,
            space.rating,
            space.image_url,
            amenities,
            space.description,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_space(conn, id)?.ok_or_else(|| anyhow::anyhow!("inserted space {id} not found"))
}

fn parse_space_row(row: &Row) -> anyhow::Result<CatalogEntry> {
    let amenities_json: String = row.get(7)?;
    Ok(CatalogEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        address: row.get(3)?,
        price_per_day: row.get(4)?,
        rating: row.get(5)?,
        image_url: row.get(6)?,
        amenities: serde_json::from_str(&amenities_json).unwrap_or_default(),
        description: row.get(8)?,
    })
}

// ── Users ──

pub fn get_user(conn: &Connection, id: i64) -> anyhow::Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, name, role, company, phone FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                    role: row.get(3)?,
                    company: row.get(4)?,
                    phone: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

// ── Bookings ──

const BOOKING_SELECT: &str =
    "SELECT b.id, b.space_id, b.user_id, b.date, b.status, s.name, u.name, s.address, s.price_per_day, b.created_at
     FROM bookings b
     LEFT JOIN spaces s ON b.space_id = s.id
     LEFT JOIN users u ON b.user_id = u.id";

pub fn create_booking(
    conn: &Connection,
    space_id: i64,
    user_id: i64,
    date: &str,
    status: &BookingStatus,
) -> anyhow::Result<BookingRecord> {
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO bookings (id, space_id, user_id, date, status) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, space_id, user_id, date, status.as_str()],
    )?;
    get_booking_by_id(conn, &id)?.ok_or_else(|| anyhow::anyhow!("inserted booking {id} not found"))
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<BookingRecord>> {
    let sql = format!("{BOOKING_SELECT} WHERE b.id = ?1");
    let booking = conn
        .query_row(&sql, params![id], |row| Ok(parse_booking_row(row)))
        .optional()?;
    booking.transpose()
}

pub fn get_bookings_for_user(conn: &Connection, user_id: i64) -> anyhow::Result<Vec<BookingRecord>> {
    let sql = format!("{BOOKING_SELECT} WHERE b.user_id = ?1 ORDER BY b.date ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_recent_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<BookingRecord>> {
    let sql = format!("{BOOKING_SELECT} ORDER BY b.created_at DESC, b.rowid DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Returns `(total, active)`, where active bookings are pending or confirmed.
pub fn count_bookings(conn: &Connection) -> anyhow::Result<(i64, i64)> {
    let counts: (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COUNT(CASE WHEN status IN ('pending', 'confirmed') THEN 1 END)
         FROM bookings",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}

fn parse_booking_row(row: &Row) -> anyhow::Result<BookingRecord> {
    let status_str: String = row.get(4)?;
    Ok(BookingRecord {
        id: row.get(0)?,
        space_id: row.get(1)?,
        user_id: row.get(2)?,
        date: row.get(3)?,
        status: BookingStatus::parse(&status_str),
        space_name: row.get(5)?,
        user_name: row.get(6)?,
        address: row.get(7)?,
        price_per_day: row.get(8)?,
        created_at: row.get(9)?,
    })
}

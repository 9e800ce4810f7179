use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{
    Booking, BookingListing, BookingStatus, Customer, NewBooking, PaymentMethod, Service, Totals,
};

// ── Customers ──

pub fn insert_customer(
    conn: &Connection,
    name: &str,
    contact_no: &str,
    email: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO customers (name, contact_no, email) VALUES (?1, ?2, ?3)",
        params![name, contact_no, email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_customers(conn: &Connection) -> rusqlite::Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT customer_id, name, contact_no, email FROM customers ORDER BY customer_id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Customer {
            customer_id: row.get(0)?,
            name: row.get(1)?,
            contact_no: row.get(2)?,
            email: row.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn delete_customer(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM customers WHERE customer_id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Services ──

const SERVICE_COLUMNS: &str =
    "s.service_id, s.service_type, s.service_price, s.staff_id, st.staff_name \
     FROM services s JOIN staff st ON s.staff_id = st.staff_id";

fn parse_service_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        service_id: row.get(0)?,
        service_type: row.get(1)?,
        service_price: row.get(2)?,
        staff_id: row.get(3)?,
        staff_name: row.get(4)?,
    })
}

pub fn list_services(
    conn: &Connection,
    service_type: Option<&str>,
) -> rusqlite::Result<Vec<Service>> {
    match service_type {
        Some(service_type) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SERVICE_COLUMNS} WHERE s.service_type = ?1 ORDER BY s.service_id ASC"
            ))?;
            let rows = stmt.query_map(params![service_type], parse_service_row)?;
            rows.collect()
        }
        None => {
            let mut stmt =
                conn.prepare(&format!("SELECT {SERVICE_COLUMNS} ORDER BY s.service_id ASC"))?;
            let rows = stmt.query_map([], parse_service_row)?;
            rows.collect()
        }
    }
}

pub fn find_service(conn: &Connection, service_type: &str) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        &format!("SELECT {SERVICE_COLUMNS} WHERE s.service_type = ?1 LIMIT 1"),
        params![service_type],
        parse_service_row,
    )
    .optional()
}

// ── Bookings ──

fn parse_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let payment_method: String = row.get(9)?;
    let status: String = row.get(10)?;
    Ok(Booking {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        service_id: row.get(2)?,
        staff_id: row.get(3)?,
        name: row.get(4)?,
        contact_no: row.get(5)?,
        email: row.get(6)?,
        date: row.get(7)?,
        time: row.get(8)?,
        payment_method: PaymentMethod::parse(&payment_method).unwrap_or(PaymentMethod::PayInStore),
        status: BookingStatus::from_str(&status),
        created_at: row.get(11)?,
    })
}

pub fn insert_booking(
    conn: &Connection,
    customer_id: i64,
    service: &Service,
    booking: &NewBooking,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (customer_id, service_id, staff_id, name, contact_no, email, date, time, payment_method, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            customer_id,
            service.service_id,
            service.staff_id,
            booking.name,
            booking.contact_no,
            booking.email,
            booking.date,
            booking.time,
            booking.payment_method.as_str(),
            BookingStatus::Pending.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        "SELECT id, customer_id, service_id, staff_id, name, contact_no, email, date, time, payment_method, status, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    )
    .optional()
}

/// Stored times of every booking on `date`, ascending.
pub fn booked_times(conn: &Connection, date: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT time FROM bookings WHERE date = ?1 ORDER BY time ASC")?;
    let rows = stmt.query_map(params![date], |row| row.get(0))?;
    rows.collect()
}

pub fn list_bookings(conn: &Connection) -> rusqlite::Result<Vec<BookingListing>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, c.name, b.contact_no, s.service_type, st.staff_name, s.service_price,
                b.date, b.time, b.payment_method, b.status
         FROM bookings b
         JOIN customers c ON b.customer_id = c.customer_id
         JOIN services s ON b.service_id = s.service_id
         JOIN staff st ON b.staff_id = st.staff_id
         ORDER BY b.date ASC, b.time ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let payment_method: String = row.get(8)?;
        let status: String = row.get(9)?;
        Ok(BookingListing {
            id: row.get(0)?,
            customer_name: row.get(1)?,
            contact_no: row.get(2)?,
            service_type: row.get(3)?,
            staff_name: row.get(4)?,
            service_price: row.get(5)?,
            date: row.get(6)?,
            time: row.get(7)?,
            payment_method: PaymentMethod::parse(&payment_method)
                .unwrap_or(PaymentMethod::PayInStore),
            status: BookingStatus::from_str(&status),
        })
    })?;
    rows.collect()
}

pub fn delete_booking(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

/// Deletes a booking only while it is still pending.
pub fn delete_pending_booking(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "DELETE FROM bookings WHERE id = ?1 AND status = ?2",
        params![id, BookingStatus::Pending.as_str()],
    )?;
    Ok(count > 0)
}

/// Service price of a booking.
pub fn booking_price(conn: &Connection, id: i64) -> rusqlite::Result<Option<f64>> {
    conn.query_row(
        "SELECT s.service_price
         FROM bookings b JOIN services s ON b.service_id = s.service_id
         WHERE b.id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

/// Moves a pending booking to completed. Returns false if the booking was not pending.
pub fn mark_completed(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![
            BookingStatus::Completed.as_str(),
            id,
            BookingStatus::Pending.as_str()
        ],
    )?;
    Ok(count > 0)
}

// ── Income ──

pub fn add_income(conn: &Connection, amount: f64) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE income SET total_income = total_income + ?1 WHERE id = 1",
        params![amount],
    )?;
    Ok(())
}

pub fn get_income(conn: &Connection) -> rusqlite::Result<f64> {
    conn.query_row(
        "SELECT COALESCE((SELECT total_income FROM income WHERE id = 1), 0)",
        [],
        |row| row.get(0),
    )
}

pub fn get_totals(conn: &Connection) -> rusqlite::Result<Totals> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(s.service_price), 0)
         FROM bookings b JOIN services s ON b.service_id = s.service_id
         WHERE b.status = ?1",
        params![BookingStatus::Completed.as_str()],
        |row| {
            Ok(Totals {
                total_bookings: row.get(0)?,
                total_income: row.get(1)?,
            })
        },
    )
}

// ── Admins ──

pub fn get_admin_hash(conn: &Connection, username: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT password_hash FROM admins WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )
    .optional()
}

pub fn upsert_admin(conn: &Connection, username: &str, password_hash: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO admins (username, password_hash) VALUES (?1, ?2)
         ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash",
        params![username, password_hash],
    )?;
    Ok(())
}

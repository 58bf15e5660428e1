#![allow(dead_code)]

use tokio_postgres::{Client, NoTls};

/// Connect to `DATABASE_URL` and seed temporary `companies` / `jobs` tables.
///
/// Temporary tables shadow any real ones for this session only, so tests
/// never touch persistent data. Returns `None` when `DATABASE_URL` is unset.
pub async fn seeded_client() -> Option<Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });

    client
        .batch_execute(
            r#"
            CREATE TEMPORARY TABLE companies (
                handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
                name TEXT UNIQUE NOT NULL,
                num_employees INTEGER CHECK (num_employees >= 0),
                description TEXT,
                logo_url TEXT
            );

            CREATE TEMPORARY TABLE jobs (
                id SERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                salary INTEGER CHECK (salary >= 0),
                equity NUMERIC CHECK (equity <= 1.0),
                company_handle VARCHAR(25) NOT NULL
                    REFERENCES companies ON DELETE CASCADE
            );

            INSERT INTO companies (handle, name, num_employees, description, logo_url)
            VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                   ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                   ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ('j1', 100, 0.11, 'c1'),
                   ('j2', 200, 0.22, 'c1'),
                   ('j3', 300, 0.33, 'c2'),
                   ('j4', 400, 0.44, 'c2');
            "#,
        )
        .await
        .expect("failed to seed temporary tables");

    Some(client)
}

pub async fn job_id(client: &Client, title: &str) -> i32 {
    client
        .query_one("SELECT id FROM jobs WHERE title = $1", &[&title])
        .await
        .expect("seeded job")
        .get(0)
}

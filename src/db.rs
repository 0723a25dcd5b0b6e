use sqlx::MySqlPool;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates the four tables if they are missing. Order matters: every table
/// only references tables created before it.
const SCHEMA: [(&str, &str); 4] = [
    (
        "departments",
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            department_name VARCHAR(255) NOT NULL,
            max_clock_in_time TIME NOT NULL,
            max_clock_out_time TIME NOT NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3)
        ) ENGINE=InnoDB
        "#,
    ),
    (
        "employees",
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id VARCHAR(50) NOT NULL UNIQUE,
            department_id BIGINT UNSIGNED NOT NULL,
            name VARCHAR(255) NOT NULL,
            address TEXT NOT NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
            FOREIGN KEY (department_id) REFERENCES departments(id)
                ON UPDATE CASCADE
                ON DELETE CASCADE
        ) ENGINE=InnoDB
        "#,
    ),
    (
        "attendances",
        r#"
        CREATE TABLE IF NOT EXISTS attendances (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id VARCHAR(50) NOT NULL,
            attendance_id VARCHAR(100) NOT NULL UNIQUE,
            clock_in DATETIME(3) NOT NULL,
            clock_out DATETIME(3) NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
            FOREIGN KEY (employee_id) REFERENCES employees(employee_id)
                ON UPDATE CASCADE
                ON DELETE CASCADE
        ) ENGINE=InnoDB
        "#,
    ),
    (
        "attendance_histories",
        r#"
        CREATE TABLE IF NOT EXISTS attendance_histories (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id VARCHAR(50) NOT NULL,
            attendance_id VARCHAR(100) NOT NULL,
            date_attendance DATETIME(3) NOT NULL,
            attendance_type TINYINT UNSIGNED NOT NULL,
            description TEXT NOT NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
            INDEX idx_attendance_histories_date (date_attendance),
            FOREIGN KEY (employee_id) REFERENCES employees(employee_id),
            FOREIGN KEY (attendance_id) REFERENCES attendances(attendance_id)
                ON UPDATE CASCADE
                ON DELETE CASCADE
        ) ENGINE=InnoDB
        "#,
    ),
];

pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
        info!(table, "Table ready");
    }
    Ok(())
}

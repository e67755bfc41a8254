use jiff::{civil::date, tz::TimeZone, Zoned};
use tempfile::TempDir;
use verdant_core::{Garden, GardenBuilder};

/// Helper function to create a test garden
pub async fn create_test_garden() -> (TempDir, Garden) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let garden = GardenBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create garden");
    (temp_dir, garden)
}

/// Noon UTC on the given day.
pub fn noon(year: i16, month: i8, day: i8) -> Zoned {
    date(year, month, day)
        .at(12, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .expect("valid instant")
}

use crate::db::Database;
use crate::error::{CropSenseError, Result};
use crate::models::{Crop, GrowthStage, LogEntry, Reading, SoilLabel, SoilType};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

/// Surface unique-name and foreign-key failures as constraint violations
/// instead of generic database errors.
fn map_constraint(err: rusqlite::Error) -> CropSenseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            CropSenseError::ConstraintViolation(
                msg.clone().unwrap_or_else(|| e.to_string()),
            )
        }
        _ => CropSenseError::Database(err),
    }
}

// Reference data queries

impl Database {
    pub fn create_crop(&self, crop: &Crop) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO crops (name) VALUES (?1)", [&crop.name])
                .map_err(map_constraint)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_crop(&self, id: i64) -> Result<Option<Crop>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM crops WHERE id = ?1", [id], row_to_crop)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_crops(&self) -> Result<Vec<Crop>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM crops ORDER BY id")?;
            let crops = stmt
                .query_map([], row_to_crop)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(crops)
        })
    }

    pub fn create_soil_type(&self, soil: &SoilType) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO soil_types (name) VALUES (?1)", [&soil.name])
                .map_err(map_constraint)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_soil_types(&self) -> Result<Vec<SoilType>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM soil_types ORDER BY id")?;
            let soils = stmt
                .query_map([], row_to_soil_type)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(soils)
        })
    }

    pub fn create_growth_stage(&self, stage: &GrowthStage) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO growth_stages (name) VALUES (?1)", [&stage.name])
                .map_err(map_constraint)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_growth_stage(&self, id: i64) -> Result<Option<GrowthStage>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM growth_stages WHERE id = ?1",
                [id],
                row_to_growth_stage,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn list_growth_stages(&self) -> Result<Vec<GrowthStage>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM growth_stages ORDER BY id")?;
            let stages = stmt
                .query_map([], row_to_growth_stage)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(stages)
        })
    }
}

fn row_to_crop(row: &Row) -> rusqlite::Result<Crop> {
    Ok(Crop {
        id: Some(row.get("id")?),
        name: row.get("name")?,
    })
}

fn row_to_soil_type(row: &Row) -> rusqlite::Result<SoilType> {
    Ok(SoilType {
        id: Some(row.get("id")?),
        name: row.get("name")?,
    })
}

fn row_to_growth_stage(row: &Row) -> rusqlite::Result<GrowthStage> {
    Ok(GrowthStage {
        id: Some(row.get("id")?),
        name: row.get("name")?,
    })
}

// Reading queries

impl Database {
    pub fn insert_reading(&self, reading: &Reading) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO readings
                    (crop_id, soil_name, growth_stage_id, moi, temp, humidity, result, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    reading.crop_id,
                    reading.soil.as_str(),
                    reading.growth_stage_id,
                    reading.moi,
                    reading.temp,
                    reading.humidity,
                    reading.result,
                    reading.timestamp.to_rfc3339(),
                ],
            )
            .map_err(map_constraint)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_reading(&self, id: i64) -> Result<Option<Reading>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM readings WHERE id = ?1", [id], row_to_reading)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn get_latest_reading(&self) -> Result<Option<Reading>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM readings ORDER BY id DESC LIMIT 1",
                [],
                row_to_reading,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Persist a class index on a reading. Callers own the overwrite
    /// policy; this is a plain update.
    pub fn store_result(&self, reading_id: i64, class_index: i64) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE readings SET result = ?1 WHERE id = ?2",
                params![class_index, reading_id],
            )?;
            if updated == 0 {
                return Err(CropSenseError::NotFound(format!(
                    "reading {}",
                    reading_id
                )));
            }
            Ok(())
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<Reading> {
    let soil_name: String = row.get("soil_name")?;
    let timestamp_str: String = row.get("timestamp")?;

    Ok(Reading {
        id: Some(row.get("id")?),
        crop_id: row.get("crop_id")?,
        soil: SoilLabel::from(soil_name),
        growth_stage_id: row.get("growth_stage_id")?,
        moi: row.get("moi")?,
        temp: row.get("temp")?,
        humidity: row.get("humidity")?,
        result: row.get("result")?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

// Diagnostic log queries

impl Database {
    pub fn append_log(&self, message: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO logs (message, timestamp) VALUES (?1, ?2)",
                params![message, Utc::now().to_rfc3339()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM logs ORDER BY id DESC LIMIT ?1")?;
            let logs = stmt
                .query_map([limit as i64], row_to_log)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(logs)
        })
    }
}

fn row_to_log(row: &Row) -> rusqlite::Result<LogEntry> {
    let timestamp_str: String = row.get("timestamp")?;
    Ok(LogEntry {
        id: Some(row.get("id")?),
        message: row.get("message")?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("in-memory database")
    }

    #[test]
    fn crop_round_trip() {
        let db = test_db();
        let id = db.create_crop(&Crop::new("Tomato")).unwrap();

        let crop = db.get_crop(id).unwrap().unwrap();
        assert_eq!(crop.name, "Tomato");
        assert_eq!(crop.id, Some(id));

        assert!(db.get_crop(9999).unwrap().is_none());
    }

    #[test]
    fn duplicate_crop_name_is_constraint_violation() {
        let db = test_db();
        db.create_crop(&Crop::new("Wheat")).unwrap();

        let err = db.create_crop(&Crop::new("Wheat")).unwrap_err();
        assert!(matches!(err, CropSenseError::ConstraintViolation(_)));
    }

    #[test]
    fn duplicate_growth_stage_name_is_constraint_violation() {
        let db = test_db();
        db.create_growth_stage(&GrowthStage::new("Flowering")).unwrap();

        let err = db.create_growth_stage(&GrowthStage::new("Flowering")).unwrap_err();
        assert!(matches!(err, CropSenseError::ConstraintViolation(_)));
    }

    #[test]
    fn reading_with_dangling_crop_is_rejected() {
        let db = test_db();
        let stage_id = db.create_growth_stage(&GrowthStage::new("Seedling")).unwrap();

        let reading = Reading::new(42, "Loamy", stage_id, 35.0, 24.0, 60.0);
        let err = db.insert_reading(&reading).unwrap_err();
        assert!(matches!(err, CropSenseError::ConstraintViolation(_)));
    }

    #[test]
    fn soil_name_carries_no_foreign_key() {
        let db = test_db();
        let crop_id = db.create_crop(&Crop::new("Maize")).unwrap();
        let stage_id = db.create_growth_stage(&GrowthStage::new("Vegetative")).unwrap();

        // No such row in soil_types; the insert must still succeed.
        let reading = Reading::new(crop_id, "Volcanic Ash", stage_id, 20.0, 30.0, 55.0);
        let id = db.insert_reading(&reading).unwrap();

        let stored = db.get_reading(id).unwrap().unwrap();
        assert_eq!(stored.soil.as_str(), "Volcanic Ash");
    }

    #[test]
    fn latest_reading_is_most_recent_insert() {
        let db = test_db();
        let crop_id = db.create_crop(&Crop::new("Rice")).unwrap();
        let stage_id = db.create_growth_stage(&GrowthStage::new("Harvest")).unwrap();

        db.insert_reading(&Reading::new(crop_id, "Clay", stage_id, 10.0, 20.0, 30.0))
            .unwrap();
        let second = db
            .insert_reading(&Reading::new(crop_id, "Clay", stage_id, 11.0, 21.0, 31.0))
            .unwrap();

        let latest = db.get_latest_reading().unwrap().unwrap();
        assert_eq!(latest.id, Some(second));
        assert_eq!(latest.moi, 11.0);
    }

    #[test]
    fn store_result_round_trip() {
        let db = test_db();
        let crop_id = db.create_crop(&Crop::new("Barley")).unwrap();
        let stage_id = db.create_growth_stage(&GrowthStage::new("Flowering")).unwrap();
        let id = db
            .insert_reading(&Reading::new(crop_id, "Sandy", stage_id, 15.0, 22.0, 48.0))
            .unwrap();

        assert!(db.get_reading(id).unwrap().unwrap().result.is_none());

        db.store_result(id, 2).unwrap();
        assert_eq!(db.get_reading(id).unwrap().unwrap().result, Some(2));

        let err = db.store_result(9999, 1).unwrap_err();
        assert!(matches!(err, CropSenseError::NotFound(_)));
    }

    #[test]
    fn logs_are_append_only_and_listed_newest_first() {
        let db = test_db();
        db.append_log("first").unwrap();
        db.append_log("second").unwrap();

        let logs = db.recent_logs(10).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "second");
        assert_eq!(logs[1].message, "first");

        let limited = db.recent_logs(1).unwrap();
        assert_eq!(limited.len(), 1);
    }
}

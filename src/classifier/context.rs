use crate::db::Database;
use crate::error::{CropSenseError, Result};
use crate::models::{Reading, ReadingContext};

/// Resolves a reading's categorical ids into the names the model was
/// trained on. Read-only. A dangling crop or growth stage id is fatal
/// for the classification attempt; no fallback value is substituted.
pub struct ContextResolver<'a> {
    db: &'a Database,
}

impl<'a> ContextResolver<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn resolve(&self, reading: &Reading) -> Result<ReadingContext> {
        let crop = self
            .db
            .get_crop(reading.crop_id)?
            .ok_or(CropSenseError::MissingReference {
                entity: "crop",
                id: reading.crop_id,
            })?;

        let stage = self.db.get_growth_stage(reading.growth_stage_id)?.ok_or(
            CropSenseError::MissingReference {
                entity: "growth stage",
                id: reading.growth_stage_id,
            },
        )?;

        // The soil label needs no lookup: readings store the name itself.
        Ok(ReadingContext {
            crop_name: crop.name,
            soil: reading.soil.clone(),
            growth_stage_name: stage.name,
        })
    }
}

// Generated by crudgen. Do not edit; regenerate instead.

use super::dto::{Pet, PetCreate, PetDetail, PetSummary, PetUpdate};
///Conversions between `Pet` and its generated payloads.
pub trait PetMapper {
    fn to_detail(&self, entity: &Pet) -> PetDetail;
    fn to_summary(&self, entity: &Pet) -> PetSummary;
    /// Builds a fresh record from a create payload. Server-assigned
    /// fields such as the id start at their defaults.
    fn from_create(&self, payload: PetCreate) -> Pet;
    /// Applies the set fields of `payload` onto `current`.
    fn apply_update(&self, current: Pet, payload: PetUpdate) -> Pet;
    /// Column names for CSV export, aligned with [`Self::export_row`].
    fn export_header(&self) -> Vec<String>;
    fn export_row(&self, entity: &Pet) -> Vec<String>;
}

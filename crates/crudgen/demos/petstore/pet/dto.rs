// Generated by crudgen. Do not edit; regenerate instead.

///A pet listed for adoption.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    ///Adoption pipeline state.
    pub status: Option<String>,
    pub adopted_on: Option<chrono::NaiveDate>,
    pub owner: uuid::Uuid,
}
impl crudgen_support::HasId for Pet {
    type Id = i64;
    fn id(&self) -> Option<&i64> {
        Some(&self.id)
    }
}
///Full read view of a `Pet`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PetDetail {
    pub id: i64,
    pub name: String,
    ///Adoption pipeline state.
    pub status: Option<String>,
    pub adopted_on: Option<chrono::NaiveDate>,
    pub owner: uuid::Uuid,
}
///Compact listing view of a `Pet`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PetSummary {
    pub id: i64,
    pub name: String,
    ///Adoption pipeline state.
    pub status: Option<String>,
    pub adopted_on: Option<chrono::NaiveDate>,
    pub owner: uuid::Uuid,
}
///Payload for creating a `Pet`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, validator::Validate)]
pub struct PetCreate {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    ///Adoption pipeline state.
    pub status: Option<String>,
    pub adopted_on: Option<chrono::NaiveDate>,
    pub owner: uuid::Uuid,
}
///Partial update for a `Pet`. Absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, validator::Validate)]
pub struct PetUpdate {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    ///Adoption pipeline state.
    pub status: Option<String>,
    pub adopted_on: Option<chrono::NaiveDate>,
    pub owner: Option<uuid::Uuid>,
}
impl crudgen_support::HasId for PetUpdate {
    type Id = i64;
    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }
}

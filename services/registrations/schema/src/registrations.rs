use sea_orm::entity::prelude::*;

/// Unique index over `team_name_key`.
pub const TEAM_NAME_KEY_INDEX: &str = "uq_registrations_team_name_key";

/// Unique index over `team_number`.
pub const TEAM_NUMBER_INDEX: &str = "uq_registrations_team_number";

/// One team's hackathon registration.
/// `team_name_key` is the trimmed, lowercased team name and carries the
/// case-insensitive uniqueness constraint.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub team_name: String,
    #[sea_orm(unique)]
    pub team_name_key: String,
    pub head_name: String,
    pub head_email: String,
    pub password: String,
    pub head_reg_no: String,
    pub contact: String,
    pub alt_contact: Option<String>,
    pub member1_name: String,
    pub member1_reg: String,
    pub member2_name: String,
    pub member2_reg: String,
    #[sea_orm(unique)]
    pub team_number: String,
    pub round2: bool,
    pub certificate_sent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

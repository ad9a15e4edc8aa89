//! Car specification database entity for SeaORM.
//!
//! Exists iff its car exists; written in the same unit as the car row.

use sea_orm::entity::prelude::*;

use crate::domain::SpecificationView;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "car_specifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub car_id: i64,
    pub width: i16,
    pub height: i16,
    pub length: i16,
    pub engine: String,
    pub torque: i16,
    pub transmission: String,
    #[sea_orm(column_type = "Float")]
    pub acceleration: f32,
    pub horse_power: i16,
    pub braking_front: String,
    pub braking_rear: String,
    pub fuel: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SpecificationView {
    fn from(model: Model) -> Self {
        SpecificationView {
            width: model.width,
            height: model.height,
            length: model.length,
            engine: model.engine,
            torque: model.torque,
            transmission: model.transmission,
            acceleration: model.acceleration,
            horse_power: model.horse_power,
            braking_front: model.braking_front,
            braking_rear: model.braking_rear,
            fuel: model.fuel,
        }
    }
}
